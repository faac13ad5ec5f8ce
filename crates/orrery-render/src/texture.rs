//! GPU textures for body materials.
//!
//! [`TextureCache`] holds one texture per file name plus a 1×1 white texture
//! that stands in for anything not loaded (yet, or ever). Sampling white
//! leaves the material colour unchanged, so a missing map degrades to an
//! untextured body.

use std::collections::HashMap;

use crate::assets::DecodedImage;

/// Colour maps are authored in sRGB.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

const BYTES_PER_PIXEL: u32 = 4;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error(
        "texture data size ({actual}) does not match expected ({expected}) for {width}x{height}"
    )]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("mip level {level} is {actual:?}, expected {expected:?}")]
    MipSizeMismatch {
        level: u32,
        actual: (u32, u32),
        expected: (u32, u32),
    },
}

/// Number of mip levels down to 1×1 for the given dimensions.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    (width.max(height).max(1) as f32).log2().floor() as u32 + 1
}

fn mip_dimensions(width: u32, height: u32, level: u32) -> (u32, u32) {
    ((width >> level).max(1), (height >> level).max(1))
}

fn validate_dimensions(width: u32, height: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    Ok(())
}

fn validate_data_size(data: &[u8], width: u32, height: u32) -> Result<(), TextureError> {
    let expected = width as usize * height as usize * BYTES_PER_PIXEL as usize;
    if data.len() != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: data.len(),
            expected,
            width,
            height,
        });
    }
    Ok(())
}

fn validate_mip_chain(image: &DecodedImage) -> Result<(), TextureError> {
    let (width, height) = (image.width(), image.height());
    validate_dimensions(width, height)?;
    for (level, mip) in image.mip_chain.iter().enumerate() {
        let level = level as u32;
        let expected = mip_dimensions(width, height, level);
        let actual = (mip.width(), mip.height());
        if actual != expected {
            return Err(TextureError::MipSizeMismatch {
                level,
                actual,
                expected,
            });
        }
        validate_data_size(mip.as_raw(), actual.0, actual.1)?;
    }
    Ok(())
}

/// A sampled 2D texture and its default view.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub dimensions: (u32, u32),
    pub mip_level_count: u32,
}

impl GpuTexture {
    /// Upload `levels` (level 0 first) as one mipmapped texture.
    fn from_levels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        levels: &[(&[u8], u32, u32)],
    ) -> Result<Self, TextureError> {
        let Some(&(_, width, height)) = levels.first() else {
            return Err(TextureError::ZeroDimensions {
                width: 0,
                height: 0,
            });
        };
        validate_dimensions(width, height)?;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, &(data, w, h)) in levels.iter().enumerate() {
            validate_data_size(data, w, h)?;
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                data,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(w * BYTES_PER_PIXEL),
                    rows_per_image: None,
                },
                wgpu::Extent3d {
                    width: w,
                    height: h,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Self {
            texture,
            view,
            dimensions: (width, height),
            mip_level_count: levels.len() as u32,
        })
    }

    /// Upload a single-level RGBA8 image.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Self, TextureError> {
        validate_dimensions(width, height)?;
        validate_data_size(data, width, height)?;
        Self::from_levels(device, queue, label, &[(data, width, height)])
    }

    /// Upload a decoded image with its mip chain.
    pub fn from_decoded(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &DecodedImage,
    ) -> Result<Self, TextureError> {
        validate_mip_chain(image)?;
        let levels: Vec<(&[u8], u32, u32)> = image
            .mip_chain
            .iter()
            .map(|mip| (mip.as_raw().as_slice(), mip.width(), mip.height()))
            .collect();
        Self::from_levels(device, queue, label, &levels)
    }

    /// Opaque white 1×1.
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("fallback-white"),
            size: wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &[255, 255, 255, 255],
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(BYTES_PER_PIXEL),
                rows_per_image: None,
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            dimensions: (1, 1),
            mip_level_count: 1,
        }
    }
}

/// Loaded textures by file name, the white fallback, and the shared sampler.
pub struct TextureCache {
    textures: HashMap<String, GpuTexture>,
    fallback: GpuTexture,
    sampler: wgpu::Sampler,
}

impl TextureCache {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        // Equirectangular maps wrap in u and clamp at the poles.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("body-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        Self {
            textures: HashMap::new(),
            fallback: GpuTexture::white(device, queue),
            sampler,
        }
    }

    /// Upload a decoded image under `name`, replacing any previous one.
    pub fn insert(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        image: &DecodedImage,
    ) -> Result<(), TextureError> {
        let texture = GpuTexture::from_decoded(device, queue, name, image)?;
        log::info!(
            "Created texture '{name}' ({}x{}, {} mips)",
            texture.dimensions.0,
            texture.dimensions.1,
            texture.mip_level_count
        );
        self.textures.insert(name.to_string(), texture);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    /// The view for `name`, or the white fallback when absent or unloaded.
    pub fn view_or_fallback(&self, name: Option<&str>) -> &wgpu::TextureView {
        name.and_then(|n| self.textures.get(n))
            .map_or(&self.fallback.view, |t| &t.view)
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// Create a test GPU device and queue. Returns `None` if no GPU is available.
#[cfg(test)]
pub(crate) fn create_test_device_queue() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok()?;

        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .ok()
    })
}

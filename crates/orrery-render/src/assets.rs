//! Background texture loading.
//!
//! Image files are decoded and mipmapped on a worker thread; the main thread
//! picks up finished images once per frame with [`TextureLoader::drain`] and
//! never waits on disk or the decoder.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use tracing::{debug, warn};

/// Errors from reading or decoding an image file.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image {path} has no pixels")]
    Empty { path: PathBuf },

    #[error("failed to start texture loader thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// An RGBA8 image with its full mip chain, level 0 first.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub mip_chain: Vec<image::RgbaImage>,
}

impl DecodedImage {
    /// Build the mip chain for `base` by repeated halving.
    pub fn from_rgba(base: image::RgbaImage) -> Self {
        let levels = crate::texture::mip_level_count(base.width(), base.height()) as usize;
        let mut mip_chain = Vec::with_capacity(levels);
        mip_chain.push(base);
        for level in 1..levels {
            let prev = &mip_chain[level - 1];
            let w = (prev.width() / 2).max(1);
            let h = (prev.height() / 2).max(1);
            let next = image::imageops::resize(prev, w, h, image::imageops::FilterType::Triangle);
            mip_chain.push(next);
        }
        Self { mip_chain }
    }

    pub fn width(&self) -> u32 {
        self.mip_chain.first().map_or(0, |img| img.width())
    }

    pub fn height(&self) -> u32 {
        self.mip_chain.first().map_or(0, |img| img.height())
    }
}

/// Read and decode one image file.
pub fn decode_image(path: &Path) -> Result<DecodedImage, AssetError> {
    let rgba = image::open(path)
        .map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(AssetError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(DecodedImage::from_rgba(rgba))
}

/// Outcome for one requested texture name.
#[derive(Debug)]
pub struct LoadedTexture {
    pub name: String,
    pub result: Result<DecodedImage, AssetError>,
}

/// Decodes a fixed list of textures on a worker thread.
///
/// Dropping the loader stops the worker after the image it is decoding.
pub struct TextureLoader {
    receiver: crossbeam_channel::Receiver<LoadedTexture>,
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    requested: usize,
    received: usize,
}

impl TextureLoader {
    /// Start decoding `names`, each resolved against `asset_dir`.
    pub fn spawn(asset_dir: impl Into<PathBuf>, names: Vec<String>) -> Result<Self, AssetError> {
        let asset_dir = asset_dir.into();
        let requested = names.len();
        let (sender, receiver) = crossbeam_channel::unbounded();
        let cancelled = Arc::new(AtomicBool::new(false));
        let worker_cancelled = Arc::clone(&cancelled);

        let handle = std::thread::Builder::new()
            .name("texture-loader".into())
            .spawn(move || {
                for name in names {
                    if worker_cancelled.load(Ordering::Relaxed) {
                        debug!("Texture loader cancelled");
                        return;
                    }
                    let path = asset_dir.join(&name);
                    let result = decode_image(&path);
                    if let Ok(image) = &result {
                        debug!(
                            texture = %name,
                            width = image.width(),
                            height = image.height(),
                            mips = image.mip_chain.len(),
                            "Texture decoded"
                        );
                    }
                    if sender.send(LoadedTexture { name, result }).is_err() {
                        // Receiver dropped: the renderer is gone.
                        return;
                    }
                }
            })?;

        Ok(Self {
            receiver,
            cancelled,
            handle: Some(handle),
            requested,
            received: 0,
        })
    }

    /// Everything decoded since the last call. Failures are logged here and
    /// still returned so the caller knows the name is settled.
    pub fn drain(&mut self) -> Vec<LoadedTexture> {
        let loaded: Vec<LoadedTexture> = self.receiver.try_iter().collect();
        for texture in &loaded {
            if let Err(e) = &texture.result {
                warn!(texture = %texture.name, "Texture unavailable, drawing untextured: {e}");
            }
        }
        self.received += loaded.len();
        loaded
    }

    /// Textures requested but not yet drained.
    pub fn pending(&self) -> usize {
        self.requested.saturating_sub(self.received)
    }

    pub fn is_done(&self) -> bool {
        self.pending() == 0
    }
}

impl Drop for TextureLoader {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

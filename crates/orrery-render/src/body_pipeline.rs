//! Pipeline for solid bodies: the Sun, planets and the flat demo sphere.
//!
//! One shader covers every non-glow material. Lit materials get one point
//! light plus ambient; unlit ones output their colour (times map) directly.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use orrery_scene::{Material, SceneNode};

use crate::depth::DepthBuffer;
use crate::sphere::SphereVertex;
use crate::texture::TextureCache;

pub const BODY_SHADER_SOURCE: &str = include_str!("body.wgsl");

/// Per-node uniform (group 1, binding 0).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct BodyUniform {
    pub model: [[f32; 4]; 4],
    /// rgb base colour, w unlit brightness.
    pub color: [f32; 4],
    /// rgb emissive colour pre-multiplied by its intensity.
    pub emissive: [f32; 4],
    /// bump scale, displacement scale, lit flag, unused.
    pub params: [f32; 4],
}

impl BodyUniform {
    /// Uniform for `node`, or `None` for glow shells.
    ///
    /// Bump and displacement only switch on once their map is loaded, so a
    /// body never deforms against the white fallback.
    pub fn from_node(node: &SceneNode, is_loaded: impl Fn(&str) -> bool) -> Option<Self> {
        let model = node.transform.matrix();
        Self::from_material(model, &node.material, is_loaded)
    }

    pub fn from_material(
        model: Mat4,
        material: &Material,
        is_loaded: impl Fn(&str) -> bool,
    ) -> Option<Self> {
        let model = model.to_cols_array_2d();
        let scale_if_loaded = |map: &Option<String>, scale: f32| match map {
            Some(name) if is_loaded(name) => scale,
            _ => 0.0,
        };

        match material {
            Material::Basic { color } => Some(Self {
                model,
                color: [color.r, color.g, color.b, 1.0],
                emissive: [0.0; 4],
                params: [0.0; 4],
            }),
            Material::Standard {
                color,
                bump_map,
                bump_scale,
                displacement_map,
                displacement_scale,
                emissive,
                emissive_intensity,
                ..
            } => {
                let glow = emissive.scaled(*emissive_intensity);
                Some(Self {
                    model,
                    color: [color.r, color.g, color.b, 1.0],
                    emissive: [glow.r, glow.g, glow.b, 0.0],
                    params: [
                        scale_if_loaded(bump_map, *bump_scale),
                        scale_if_loaded(displacement_map, *displacement_scale),
                        1.0,
                        0.0,
                    ],
                })
            }
            Material::Emissive {
                color, intensity, ..
            } => Some(Self {
                model,
                color: [color.r, color.g, color.b, *intensity],
                emissive: [0.0; 4],
                params: [0.0; 4],
            }),
            Material::Glow { .. } => None,
        }
    }

    pub fn is_lit(&self) -> bool {
        self.params[2] > 0.5
    }
}

/// Colour, bump and displacement map names of a material, in binding order.
pub fn material_maps(material: &Material) -> [Option<&str>; 3] {
    match material {
        Material::Standard {
            map,
            bump_map,
            displacement_map,
            ..
        } => [map, bump_map, displacement_map].map(|m| m.as_deref()),
        Material::Emissive { map, .. } => [map.as_deref(), None, None],
        Material::Basic { .. } | Material::Glow { .. } => [None, None, None],
    }
}

pub struct BodyPipeline {
    pub pipeline: wgpu::RenderPipeline,
    /// Group 1: uniform, colour map, bump map, displacement map, sampler.
    pub material_bind_group_layout: wgpu::BindGroupLayout,
}

impl BodyPipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        frame_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("body-shader"),
            source: wgpu::ShaderSource::Wgsl(BODY_SHADER_SOURCE.into()),
        });

        let texture_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let material_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("body-material-bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: std::num::NonZeroU64::new(
                                std::mem::size_of::<BodyUniform>() as u64,
                            ),
                        },
                        count: None,
                    },
                    texture_entry(1),
                    texture_entry(2),
                    texture_entry(3),
                    wgpu::BindGroupLayoutEntry {
                        binding: 4,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("body-pipeline-layout"),
            bind_group_layouts: &[frame_layout, &material_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("body-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_body"),
                buffers: &[SphereVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::state(true)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_body"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            material_bind_group_layout,
        }
    }

    /// Bind `uniform_buffer` with the material's maps, falling back to white
    /// for any map that is absent or not loaded yet.
    pub fn create_bind_group(
        &self,
        device: &wgpu::Device,
        label: &str,
        uniform_buffer: &wgpu::Buffer,
        material: &Material,
        textures: &TextureCache,
    ) -> wgpu::BindGroup {
        let [map, bump, displacement] = material_maps(material);
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.material_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(textures.view_or_fallback(map)),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(textures.view_or_fallback(bump)),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(
                        textures.view_or_fallback(displacement),
                    ),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(textures.sampler()),
                },
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use orrery_scene::{Color, NodeRole, SceneDescription, SceneKind, SceneSettings, Transform};

    fn glowing_sun() -> SceneDescription {
        SceneDescription::build(SceneKind::GlowingSun, &SceneSettings::default())
    }

    #[test]
    fn test_body_uniform_is_gpu_aligned() {
        assert_eq!(std::mem::size_of::<BodyUniform>(), 112);
        assert_eq!(std::mem::size_of::<BodyUniform>() % 16, 0);
    }

    #[test]
    fn test_flat_sphere_is_unlit_yellow() {
        let scene = SceneDescription::build(SceneKind::FlatSphere, &SceneSettings::default());
        let uniform = BodyUniform::from_node(&scene.nodes[0], |_| true).unwrap();
        assert_eq!(uniform.color, [1.0, 1.0, 0.0, 1.0]);
        assert!(!uniform.is_lit());
        assert_eq!(uniform.model, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn test_bump_and_displacement_wait_for_texture() {
        let scene = glowing_sun();
        let sun = scene.node("Sun").unwrap();

        let pending = BodyUniform::from_node(sun, |_| false).unwrap();
        assert_eq!(pending.params[0], 0.0);
        assert_eq!(pending.params[1], 0.0);
        assert!(pending.is_lit());

        let loaded = BodyUniform::from_node(sun, |_| true).unwrap();
        assert_eq!(loaded.params[0], 0.05);
        assert_eq!(loaded.params[1], 0.05);
    }

    #[test]
    fn test_emissive_premultiplied() {
        let sun = glowing_sun();
        let uniform = BodyUniform::from_node(sun.node("Sun").unwrap(), |_| true).unwrap();
        let expected = Color::from_hex(0xff6600).scaled(0.6);
        assert!((uniform.emissive[0] - expected.r).abs() < 1e-6);
        assert!((uniform.emissive[1] - expected.g).abs() < 1e-6);
        assert_eq!(uniform.emissive[2], 0.0);
    }

    #[test]
    fn test_glow_has_no_body_uniform() {
        let scene = glowing_sun();
        assert!(BodyUniform::from_node(scene.node("Glow").unwrap(), |_| true).is_none());
    }

    #[test]
    fn test_solar_sun_is_unlit_emissive() {
        let settings = SceneSettings {
            star_count: 0,
            ..SceneSettings::default()
        };
        let scene = SceneDescription::build(SceneKind::SolarSystem, &settings);
        let sun = BodyUniform::from_node(scene.node("Sun").unwrap(), |_| true).unwrap();
        assert!(!sun.is_lit());
        assert_eq!(sun.color[3], 1.0);
        let earth = BodyUniform::from_node(scene.node("Earth").unwrap(), |_| true).unwrap();
        assert!(earth.is_lit());
        assert_eq!(earth.emissive, [0.0; 4]);
    }

    #[test]
    fn test_model_matrix_follows_transform() {
        let mut node = glowing_sun().node("Sun").unwrap().clone();
        node.role = NodeRole::Orbiting;
        node.transform = Transform {
            translation: Vec3::new(50.0, 0.0, 0.0),
            rotation: Quat::from_rotation_y(1.0),
            scale: Vec3::splat(2.0),
        };
        let uniform = BodyUniform::from_node(&node, |_| true).unwrap();
        let model = Mat4::from_cols_array_2d(&uniform.model);
        let centre = model.transform_point3(Vec3::ZERO);
        assert!((centre - Vec3::new(50.0, 0.0, 0.0)).length() < 1e-5);
        let surface = model.transform_point3(Vec3::Y);
        assert!((surface - Vec3::new(50.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_material_maps_in_binding_order() {
        let scene = glowing_sun();
        let sun = scene.node("Sun").unwrap();
        assert_eq!(
            material_maps(&sun.material),
            [Some("sun.jpg"), Some("sun.jpg"), Some("sun.jpg")]
        );
        assert_eq!(
            material_maps(&Material::textured("mars.jpg")),
            [Some("mars.jpg"), None, None]
        );
        assert_eq!(
            material_maps(&Material::Basic {
                color: Color::WHITE
            }),
            [None, None, None]
        );
    }
}

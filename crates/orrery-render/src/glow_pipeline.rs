//! Translucent glow shells around the Sun.
//!
//! Drawn after opaque bodies with depth testing but no depth writes, so the
//! shell never hides what it surrounds. One pipeline variant exists per
//! face side and blend mode a glow material can ask for.

use bytemuck::{Pod, Zeroable};
use orrery_scene::{Blending, Material, SceneNode, Side};

use crate::depth::DepthBuffer;
use crate::sphere::SphereVertex;

pub const GLOW_SHADER_SOURCE: &str = include_str!("glow.wgsl");

/// Per-shell uniform (group 1, binding 0).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct GlowUniform {
    pub model: [[f32; 4]; 4],
    /// rgb colour, a opacity.
    pub color: [f32; 4],
}

impl GlowUniform {
    /// Uniform for a glow node, or `None` for any other material.
    pub fn from_node(node: &SceneNode) -> Option<Self> {
        match &node.material {
            Material::Glow { color, opacity, .. } => Some(Self {
                model: node.transform.matrix().to_cols_array_2d(),
                color: [color.r, color.g, color.b, opacity.clamp(0.0, 1.0)],
            }),
            _ => None,
        }
    }
}

/// Faces to cull so that only `side` is drawn.
pub fn cull_mode_for(side: Side) -> wgpu::Face {
    match side {
        Side::Front => wgpu::Face::Back,
        Side::Back => wgpu::Face::Front,
    }
}

pub fn blend_state_for(blending: Blending) -> wgpu::BlendState {
    match blending {
        Blending::Additive => wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        },
        // The shader premultiplies by opacity.
        Blending::Opaque => wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
    }
}

const VARIANTS: [(Side, Blending); 4] = [
    (Side::Back, Blending::Additive),
    (Side::Front, Blending::Additive),
    (Side::Back, Blending::Opaque),
    (Side::Front, Blending::Opaque),
];

pub struct GlowPipeline {
    pipelines: Vec<((Side, Blending), wgpu::RenderPipeline)>,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl GlowPipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        frame_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("glow-shader"),
            source: wgpu::ShaderSource::Wgsl(GLOW_SHADER_SOURCE.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glow-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<GlowUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("glow-pipeline-layout"),
            bind_group_layouts: &[frame_layout, &bind_group_layout],
            immediate_size: 0,
        });

        let pipelines = VARIANTS
            .into_iter()
            .map(|(side, blending)| {
                let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("glow-pipeline"),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_glow"),
                        buffers: &[SphereVertex::layout()],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    },
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: Some(cull_mode_for(side)),
                        ..Default::default()
                    },
                    depth_stencil: Some(DepthBuffer::state(false)),
                    multisample: wgpu::MultisampleState::default(),
                    fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: Some("fs_glow"),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: surface_format,
                            blend: Some(blend_state_for(blending)),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    }),
                    multiview_mask: None,
                    cache: None,
                });
                ((side, blending), pipeline)
            })
            .collect();

        Self {
            pipelines,
            bind_group_layout,
        }
    }

    pub fn pipeline(&self, side: Side, blending: Blending) -> &wgpu::RenderPipeline {
        self.pipelines
            .iter()
            .find(|(key, _)| *key == (side, blending))
            .map(|(_, pipeline)| pipeline)
            .unwrap_or(&self.pipelines[0].1)
    }

    pub fn create_bind_group(
        &self,
        device: &wgpu::Device,
        label: &str,
        uniform_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_scene::{SceneDescription, SceneKind, SceneSettings};

    #[test]
    fn test_glow_uniform_is_gpu_aligned() {
        assert_eq!(std::mem::size_of::<GlowUniform>(), 80);
        assert_eq!(std::mem::size_of::<GlowUniform>() % 16, 0);
    }

    #[test]
    fn test_glow_uniform_from_shell() {
        let scene = SceneDescription::build(SceneKind::GlowingSun, &SceneSettings::default());
        let uniform = GlowUniform::from_node(scene.node("Glow").unwrap()).unwrap();
        assert!((uniform.color[3] - 0.35).abs() < 1e-6);
        assert!((uniform.model[0][0] - 1.2).abs() < 1e-6);
        assert!(GlowUniform::from_node(scene.node("Sun").unwrap()).is_none());
    }

    #[test]
    fn test_back_side_culls_front_faces() {
        assert_eq!(cull_mode_for(Side::Back), wgpu::Face::Front);
        assert_eq!(cull_mode_for(Side::Front), wgpu::Face::Back);
    }

    #[test]
    fn test_additive_blend_adds_onto_destination() {
        let blend = blend_state_for(Blending::Additive);
        assert_eq!(blend.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.color.operation, wgpu::BlendOperation::Add);
    }

    #[test]
    fn test_every_material_variant_has_a_pipeline() {
        for side in [Side::Front, Side::Back] {
            for blending in [Blending::Opaque, Blending::Additive] {
                assert!(VARIANTS.contains(&(side, blending)));
            }
        }
    }
}

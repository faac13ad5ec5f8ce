//! Background stars as one-pixel points.

use bytemuck::{Pod, Zeroable};
use orrery_scene::Star;

use crate::buffer::BufferAllocator;
use crate::depth::DepthBuffer;

pub const STARFIELD_SHADER_SOURCE: &str = include_str!("starfield.wgsl");

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct StarVertex {
    pub position: [f32; 3],
    /// Colour already scaled by brightness.
    pub color: [f32; 3],
}

impl StarVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

pub fn star_vertices(stars: &[Star]) -> Vec<StarVertex> {
    stars
        .iter()
        .map(|star| StarVertex {
            position: star.position.to_array(),
            color: star.color.map(|c| c * star.brightness),
        })
        .collect()
}

pub struct StarfieldPipeline {
    pub pipeline: wgpu::RenderPipeline,
    vertex_buffer: Option<wgpu::Buffer>,
    star_count: u32,
}

impl StarfieldPipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        frame_layout: &wgpu::BindGroupLayout,
        stars: &[Star],
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("starfield-shader"),
            source: wgpu::ShaderSource::Wgsl(STARFIELD_SHADER_SOURCE.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("starfield-pipeline-layout"),
            bind_group_layouts: &[frame_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("starfield-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_star"),
                buffers: &[StarVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::PointList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::state(false)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_star"),
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

        let vertices = star_vertices(stars);
        // wgpu rejects zero-sized buffers.
        let vertex_buffer = (!vertices.is_empty()).then(|| {
            BufferAllocator::new(device)
                .create_vertex_buffer("starfield-vertices", bytemuck::cast_slice(&vertices))
        });

        Self {
            pipeline,
            vertex_buffer,
            star_count: vertices.len() as u32,
        }
    }

    pub fn star_count(&self) -> u32 {
        self.star_count
    }

    /// Draw the stars. Expects the frame bind group at group 0.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        let Some(buffer) = &self.vertex_buffer else {
            return;
        };
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, buffer.slice(..));
        render_pass.draw(0..self.star_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_star_vertex_layout() {
        assert_eq!(std::mem::size_of::<StarVertex>(), 24);
        assert_eq!(StarVertex::layout().array_stride, 24);
    }

    #[test]
    fn test_brightness_scales_colour() {
        let stars = [Star {
            position: Vec3::new(3000.0, 0.0, 0.0),
            brightness: 0.5,
            color: [1.0, 0.8, 0.6],
        }];
        let vertices = star_vertices(&stars);
        assert_eq!(vertices.len(), 1);
        assert_eq!(vertices[0].position, [3000.0, 0.0, 0.0]);
        assert_eq!(vertices[0].color, [0.5, 0.4, 0.3]);
    }

    #[test]
    fn test_empty_starfield_has_no_vertices() {
        assert!(star_vertices(&[]).is_empty());
    }
}

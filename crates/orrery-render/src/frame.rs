//! Per-frame uniforms shared by every pipeline (bind group 0): camera and
//! lighting.

use bytemuck::{Pod, Zeroable};
use orrery_scene::{Camera, Light};

use crate::buffer::BufferAllocator;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    /// xyz camera position, w unused.
    pub camera_position: [f32; 4],
    /// xyz point light position, w intensity. Intensity 0 means no point light.
    pub light_position: [f32; 4],
    /// rgb point light colour, w range (0 = no falloff).
    pub light_color: [f32; 4],
    /// rgb summed ambient light, w unused.
    pub ambient: [f32; 4],
}

impl FrameUniform {
    pub fn new(camera: &Camera, lights: &[Light]) -> Self {
        let (light_position, light_color) = match Light::first_point(lights) {
            Some(Light::Point {
                position,
                color,
                intensity,
                range,
            }) => (
                position.extend(*intensity).to_array(),
                [color.r, color.g, color.b, *range],
            ),
            _ => ([0.0; 4], [0.0; 4]),
        };
        let ambient = Light::total_ambient(lights);

        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).to_array(),
            light_position,
            light_color,
            ambient: [ambient.r, ambient.g, ambient.b, 0.0],
        }
    }
}

/// Layout, buffer and bind group for [`FrameUniform`].
pub struct FrameBindings {
    pub layout: wgpu::BindGroupLayout,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl FrameBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<FrameUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let buffer = BufferAllocator::new(device)
            .create_uniform_buffer("frame-uniform", &FrameUniform::zeroed());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bg"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            layout,
            buffer,
            bind_group,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniform: &FrameUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniform));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use orrery_scene::{Color, SceneDescription, SceneKind, SceneSettings};

    #[test]
    fn test_frame_uniform_is_gpu_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 128);
        assert_eq!(std::mem::size_of::<FrameUniform>() % 16, 0);
    }

    #[test]
    fn test_solar_system_lighting_packed() {
        let settings = SceneSettings {
            star_count: 0,
            ..SceneSettings::default()
        };
        let scene = SceneDescription::build(SceneKind::SolarSystem, &settings);
        let uniform = FrameUniform::new(&scene.camera, &scene.lights);
        assert_eq!(uniform.light_position, [0.0, 0.0, 0.0, 2.0]);
        assert_eq!(uniform.light_color, [1.0, 1.0, 1.0, 0.0]);
        assert!((uniform.ambient[0] - 0.08).abs() < 1e-6);
        assert_eq!(uniform.camera_position, [0.0, 120.0, 260.0, 1.0]);
        assert_eq!(
            uniform.view_proj,
            scene.camera.view_projection_matrix().to_cols_array_2d()
        );
    }

    #[test]
    fn test_no_lights_means_dark_and_no_point_light() {
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 75.0, 0.1, 1000.0);
        let uniform = FrameUniform::new(&camera, &[]);
        assert_eq!(uniform.light_position[3], 0.0);
        assert_eq!(uniform.ambient, [0.0; 4]);

        let lights = [Light::Ambient {
            color: Color::WHITE,
            intensity: 0.8,
        }];
        let uniform = FrameUniform::new(&camera, &lights);
        assert_eq!(uniform.light_position[3], 0.0);
        assert!((uniform.ambient[1] - 0.8).abs() < 1e-6);
    }
}

//! Latitude/longitude sphere meshes.
//!
//! The seam column is duplicated so `u` runs 0..=1 without wrapping, and each
//! pole row keeps one vertex per column so the texture pinches cleanly.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};

/// Position, normal and equirectangular UV of a unit-sphere vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl SphereVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereVertex>() as wgpu::BufferAddress,
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
                wgpu::VertexAttribute {
                    offset: 24,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// A unit-radius sphere. Scale comes from the node transform.
#[derive(Clone, Debug)]
pub struct SphereMesh {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Build a UV sphere with counter-clockwise outward-facing triangles.
///
/// Segment counts below the minimum that still encloses a volume (3 around,
/// 2 from pole to pole) are raised to it.
pub fn generate_uv_sphere(width_segments: u32, height_segments: u32) -> SphereMesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let columns = width_segments + 1;

    let mut vertices = Vec::with_capacity((columns * (height_segments + 1)) as usize);
    for row in 0..=height_segments {
        let v = row as f32 / height_segments as f32;
        let theta = v * PI;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for col in 0..=width_segments {
            let u = col as f32 / width_segments as f32;
            let phi = u * TAU;
            let (sin_phi, cos_phi) = phi.sin_cos();

            // u = 0 starts at -X and sweeps through +Z, so the texture's centre column faces +X.
            let position = [-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
            vertices.push(SphereVertex {
                position,
                normal: position,
                uv: [u, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
    for row in 0..height_segments {
        for col in 0..width_segments {
            let a = row * columns + col;
            let b = a + columns;
            let c = b + 1;
            let d = a + 1;

            if row != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if row != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    SphereMesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_vertex_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<SphereVertex>(), 32);
        let layout = SphereVertex::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[2].offset, 24);
    }

    #[test]
    fn test_vertex_and_triangle_counts() {
        let mesh = generate_uv_sphere(32, 32);
        assert_eq!(mesh.vertices.len(), 33 * 33);
        // Pole rows contribute one triangle per column, other rows two.
        assert_eq!(mesh.triangle_count(), 32 * 2 + 32 * 30 * 2);
    }

    #[test]
    fn test_vertices_lie_on_unit_sphere() {
        let mesh = generate_uv_sphere(16, 12);
        for v in &mesh.vertices {
            let p = Vec3::from(v.position);
            assert!((p.length() - 1.0).abs() < 1e-5);
            assert_eq!(v.position, v.normal);
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
    }

    #[test]
    fn test_indices_in_range() {
        let mesh = generate_uv_sphere(64, 64);
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn test_triangles_face_outward() {
        let mesh = generate_uv_sphere(24, 16);
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] =
                [tri[0], tri[1], tri[2]].map(|i| Vec3::from(mesh.vertices[i as usize].position));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "triangle {tri:?} winds inward");
        }
    }

    #[test]
    fn test_degenerate_segments_are_raised() {
        let mesh = generate_uv_sphere(0, 0);
        assert_eq!(mesh.vertices.len(), 4 * 3);
        assert!(mesh.triangle_count() > 0);
    }

    #[test]
    fn test_poles_and_seam() {
        let mesh = generate_uv_sphere(8, 4);
        assert!((mesh.vertices[0].position[1] - 1.0).abs() < 1e-6);
        let last = mesh.vertices.last().unwrap();
        assert!((last.position[1] + 1.0).abs() < 1e-6);
        // Seam column duplicates the first column's position with u = 1.
        let row = 2usize;
        let first = mesh.vertices[row * 9];
        let seam = mesh.vertices[row * 9 + 8];
        assert!((Vec3::from(first.position) - Vec3::from(seam.position)).length() < 1e-5);
        assert_eq!(seam.uv[0], 1.0);
    }
}

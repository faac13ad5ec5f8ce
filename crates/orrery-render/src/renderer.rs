//! Draws a [`SceneGraph`] once per frame.
//!
//! GPU resources are created once from the graph: one mesh per distinct
//! sphere tessellation, and one uniform buffer plus bind group per node.
//! Node resources are kept in draw order, so each frame rewrites the node
//! uniforms from the graph's transforms and then draws stars, solid bodies
//! and glow shells in one sweep.

use std::collections::HashMap;
use std::path::Path;

use bytemuck::Zeroable;
use orrery_scene::{Camera, Color, Material, SceneGraph, SceneNode, SphereGeometry};
use tracing::{debug, info, warn};

use crate::assets::TextureLoader;
use crate::body_pipeline::{BodyPipeline, BodyUniform};
use crate::buffer::{BufferAllocator, MeshBuffer};
use crate::depth::DepthBuffer;
use crate::frame::{FrameBindings, FrameUniform};
use crate::glow_pipeline::{GlowPipeline, GlowUniform};
use crate::gpu::{RenderContext, SurfaceError};
use crate::sphere::generate_uv_sphere;
use crate::starfield_pipeline::StarfieldPipeline;
use crate::texture::TextureCache;

/// Which pipeline draws a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawPass {
    Body,
    Glow,
}

fn draw_pass(material: &Material) -> DrawPass {
    match material {
        Material::Glow { .. } => DrawPass::Glow,
        _ => DrawPass::Body,
    }
}

struct NodeResources {
    /// Index into the graph's node list.
    index: usize,
    name: String,
    pass: DrawPass,
    geometry: SphereGeometry,
    material: Material,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Node indices in the order they are drawn: solid bodies, then glow shells.
fn draw_order(nodes: &[SceneNode]) -> Vec<usize> {
    let (mut order, glows): (Vec<usize>, Vec<usize>) =
        (0..nodes.len()).partition(|&i| draw_pass(&nodes[i].material) == DrawPass::Body);
    order.extend(glows);
    order
}

fn to_wgpu_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: color.r as f64,
        g: color.g as f64,
        b: color.b as f64,
        a: 1.0,
    }
}

pub struct SceneRenderer {
    frame: FrameBindings,
    body_pipeline: BodyPipeline,
    glow_pipeline: GlowPipeline,
    starfield: StarfieldPipeline,
    depth: DepthBuffer,
    meshes: HashMap<SphereGeometry, MeshBuffer>,
    nodes: Vec<NodeResources>,
    textures: TextureCache,
    loader: Option<TextureLoader>,
}

impl SceneRenderer {
    /// Build GPU resources for `graph` and start loading its textures from
    /// `asset_dir` in the background.
    pub fn new(ctx: &RenderContext, graph: &SceneGraph, asset_dir: &Path) -> Self {
        Self::with_device(
            &ctx.device,
            &ctx.queue,
            ctx.surface_format,
            ctx.size(),
            graph,
            asset_dir,
        )
    }

    /// Same as [`new`](Self::new) without a window surface.
    pub fn with_device(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
        (width, height): (u32, u32),
        graph: &SceneGraph,
        asset_dir: &Path,
    ) -> Self {
        let frame = FrameBindings::new(device);
        let body_pipeline = BodyPipeline::new(device, target_format, &frame.layout);
        let glow_pipeline = GlowPipeline::new(device, target_format, &frame.layout);
        let starfield = StarfieldPipeline::new(device, target_format, &frame.layout, graph.stars());
        let depth = DepthBuffer::new(device, width, height);
        let textures = TextureCache::new(device, queue);

        let allocator = BufferAllocator::new(device);
        let mut meshes = HashMap::new();
        let mut nodes = Vec::with_capacity(graph.nodes().len());

        for index in draw_order(graph.nodes()) {
            let node = &graph.nodes()[index];
            meshes.entry(node.geometry).or_insert_with(|| {
                let mesh = generate_uv_sphere(
                    node.geometry.width_segments,
                    node.geometry.height_segments,
                );
                debug!(
                    width_segments = node.geometry.width_segments,
                    height_segments = node.geometry.height_segments,
                    triangles = mesh.triangle_count(),
                    "Sphere mesh uploaded"
                );
                allocator.create_mesh("sphere", &mesh)
            });

            let pass = draw_pass(&node.material);
            let label = format!("{}-uniform", node.name);
            let (uniform_buffer, bind_group) = match pass {
                DrawPass::Body => {
                    let uniform = BodyUniform::from_node(node, |_| false)
                        .unwrap_or_else(BodyUniform::zeroed);
                    let buffer = allocator.create_uniform_buffer(&label, &uniform);
                    let bind_group = body_pipeline.create_bind_group(
                        device,
                        &node.name,
                        &buffer,
                        &node.material,
                        &textures,
                    );
                    (buffer, bind_group)
                }
                DrawPass::Glow => {
                    let uniform = GlowUniform::from_node(node)
                        .unwrap_or_else(GlowUniform::zeroed);
                    let buffer = allocator.create_uniform_buffer(&label, &uniform);
                    let bind_group = glow_pipeline.create_bind_group(device, &node.name, &buffer);
                    (buffer, bind_group)
                }
            };

            nodes.push(NodeResources {
                index,
                name: node.name.clone(),
                pass,
                geometry: node.geometry,
                material: node.material.clone(),
                uniform_buffer,
                bind_group,
            });
        }

        let names = graph.texture_names();
        let loader = if names.is_empty() {
            None
        } else {
            match TextureLoader::spawn(asset_dir, names) {
                Ok(loader) => Some(loader),
                Err(e) => {
                    warn!("Textures disabled: {e}");
                    None
                }
            }
        };

        info!(
            nodes = nodes.len(),
            meshes = meshes.len(),
            stars = starfield.star_count(),
            textures_pending = loader.as_ref().map_or(0, TextureLoader::pending),
            "Scene renderer ready"
        );

        Self {
            frame,
            body_pipeline,
            glow_pipeline,
            starfield,
            depth,
            meshes,
            nodes,
            textures,
            loader,
        }
    }

    /// Match the depth buffer to a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
    }

    /// Textures still being decoded.
    pub fn pending_textures(&self) -> usize {
        self.loader.as_ref().map_or(0, TextureLoader::pending)
    }

    pub fn loaded_textures(&self) -> usize {
        self.textures.len()
    }

    /// Upload whatever the loader finished since last frame and rebind the
    /// nodes that use it.
    pub fn poll_textures(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        let Some(loader) = &mut self.loader else {
            return;
        };

        let mut arrived = Vec::new();
        for loaded in loader.drain() {
            let Ok(image) = loaded.result else {
                continue;
            };
            match self.textures.insert(device, queue, &loaded.name, &image) {
                Ok(()) => arrived.push(loaded.name),
                Err(e) => warn!(texture = %loaded.name, "Texture upload failed: {e}"),
            }
        }

        if loader.is_done() {
            info!(loaded = self.textures.len(), "Texture loading finished");
            self.loader = None;
        }

        if arrived.is_empty() {
            return;
        }
        for node in &mut self.nodes {
            let uses_arrival = node
                .material
                .texture_names()
                .iter()
                .any(|name| arrived.iter().any(|a| a == name));
            if node.pass == DrawPass::Body && uses_arrival {
                node.bind_group = self.body_pipeline.create_bind_group(
                    device,
                    &node.name,
                    &node.uniform_buffer,
                    &node.material,
                    &self.textures,
                );
            }
        }
    }

    fn write_uniforms(&self, queue: &wgpu::Queue, graph: &SceneGraph, camera: &Camera) {
        self.frame
            .update(queue, &FrameUniform::new(camera, graph.lights()));

        let is_loaded = |name: &str| self.textures.contains(name);
        for resources in &self.nodes {
            let Some(node) = graph.nodes().get(resources.index) else {
                continue;
            };
            match resources.pass {
                DrawPass::Body => {
                    if let Some(uniform) = BodyUniform::from_node(node, is_loaded) {
                        queue.write_buffer(
                            &resources.uniform_buffer,
                            0,
                            bytemuck::bytes_of(&uniform),
                        );
                    }
                }
                DrawPass::Glow => {
                    if let Some(uniform) = GlowUniform::from_node(node) {
                        queue.write_buffer(
                            &resources.uniform_buffer,
                            0,
                            bytemuck::bytes_of(&uniform),
                        );
                    }
                }
            }
        }
    }

    /// Draw `graph` from `camera` into the window surface and present it.
    pub fn render(
        &mut self,
        ctx: &RenderContext,
        graph: &SceneGraph,
        camera: &Camera,
    ) -> Result<(), SurfaceError> {
        self.poll_textures(&ctx.device, &ctx.queue);
        let output = ctx.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.render_to_view(&ctx.device, &ctx.queue, &view, graph, camera);
        output.present();
        Ok(())
    }

    /// Draw into any colour target matching the format given at construction.
    pub fn render_to_view(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        graph: &SceneGraph,
        camera: &Camera,
    ) {
        self.write_uniforms(queue, graph, camera);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene-encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(to_wgpu_color(graph.clear_color())),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(self.depth.attachment()),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_bind_group(0, &self.frame.bind_group, &[]);
            self.starfield.draw(&mut pass);

            for resources in &self.nodes {
                match resources.pass {
                    DrawPass::Body => pass.set_pipeline(&self.body_pipeline.pipeline),
                    DrawPass::Glow => {
                        let material = &resources.material;
                        pass.set_pipeline(
                            self.glow_pipeline
                                .pipeline(material.side(), material.blending()),
                        );
                    }
                }
                self.draw_node(&mut pass, resources);
            }
        }
        queue.submit(std::iter::once(encoder.finish()));
    }

    fn draw_node(&self, pass: &mut wgpu::RenderPass<'_>, resources: &NodeResources) {
        let Some(mesh) = self.meshes.get(&resources.geometry) else {
            return;
        };
        pass.set_bind_group(1, &resources.bind_group, &[]);
        mesh.bind(pass);
        mesh.draw(pass);
    }
}

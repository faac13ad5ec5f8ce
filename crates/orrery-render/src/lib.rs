//! wgpu rendering for the orrery: GPU setup, sphere meshes, textures loaded
//! off the main thread, and the body, glow and starfield pipelines.

pub mod assets;
pub mod body_pipeline;
pub mod buffer;
pub mod depth;
pub mod frame;
pub mod glow_pipeline;
pub mod gpu;
pub mod renderer;
pub mod sphere;
pub mod starfield_pipeline;
pub mod surface;
pub mod texture;

pub use assets::{AssetError, DecodedImage, LoadedTexture, TextureLoader, decode_image};
pub use body_pipeline::{BodyPipeline, BodyUniform};
pub use buffer::{BufferAllocator, MeshBuffer};
pub use depth::DepthBuffer;
pub use frame::{FrameBindings, FrameUniform};
pub use glow_pipeline::{GlowPipeline, GlowUniform};
pub use gpu::{
    RenderContext, RenderContextError, SurfaceError, init_render_context_blocking,
    select_present_mode,
};
pub use renderer::SceneRenderer;
pub use sphere::{SphereMesh, SphereVertex, generate_uv_sphere};
pub use starfield_pipeline::{StarVertex, StarfieldPipeline, star_vertices};
pub use surface::{PhysicalSize, SurfaceResizeEvent, SurfaceWrapper};
pub use texture::{GpuTexture, TextureCache, TextureError};

pub mod camera;
pub mod gpu_context;
pub mod gpu_texture;
pub mod recording;
pub mod sprite_pipeline;
pub mod surface;
pub mod text;
pub mod texture;
pub mod vertex;
pub mod wgpu_surface;

pub use camera::{CameraUniform, ScreenProjection};
pub use gpu_context::GpuContext;
pub use recording::{DrawCommand, RecordedTexture, RecordingSurface};
pub use sprite_pipeline::SpritePipeline;
pub use surface::{Color, RenderSurface};
pub use text::{TextRasterizer, TtfFont};
pub use texture::{TextureId, TextureRegistry, TextureResource};
pub use vertex::SpriteVertex;
pub use wgpu_surface::{WgpuSurface, WgpuTexture};

//! GPU-backed [`RenderSurface`].
//!
//! Draw commands are batched on the CPU into one vertex/index stream per
//! frame, then streamed into GPU buffers at present time. Consecutive quads
//! that sample the same texture collapse into a single `draw_indexed` call.
//! Buffers grow to the next power of two and never shrink.

use std::sync::Arc;

use image::RgbaImage;
use tw_core::Rect;
use winit::window::Window;

use crate::camera::ScreenProjection;
use crate::gpu_context::GpuContext;
use crate::gpu_texture::GpuTexture;
use crate::sprite_pipeline::SpritePipeline;
use crate::surface::{Color, RenderSurface};
use crate::vertex::{quad_vertices, source_uv, SpriteVertex};

/// Texture handle owned by game code. Dropping it releases the GPU texture
/// once no queued draw still references it.
pub struct WgpuTexture {
    id: u64,
    gpu: GpuTexture,
    bind_group: wgpu::BindGroup,
}

impl WgpuTexture {
    pub fn size(&self) -> (u32, u32) {
        (self.gpu.width, self.gpu.height)
    }
}

#[derive(Debug, Clone)]
struct DrawCall {
    texture_id: u64,
    bind_group: wgpu::BindGroup,
    index_start: u32,
    index_count: u32,
}

/// Append a draw call, merging with the previous one when the texture matches
/// and indices are contiguous.
fn push_draw_call(draw_calls: &mut Vec<DrawCall>, next: DrawCall) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == next.index_start;
        if last.texture_id == next.texture_id && contiguous {
            last.index_count += next.index_count;
            return;
        }
    }
    draw_calls.push(next);
}

fn srgb_to_linear(c: f32) -> f64 {
    let c = f64::from(c);
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub struct WgpuSurface {
    gpu: GpuContext,
    pipeline: SpritePipeline,
    projection: ScreenProjection,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    white: WgpuTexture,
    next_texture_id: u64,

    clear_color: Color,
    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
    draw_calls: Vec<DrawCall>,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,
    last_draw_calls: usize,
    last_quads: usize,
}

impl WgpuSurface {
    /// `screen_width` x `screen_height` is the logical drawing area. It is
    /// stretched over the whole window regardless of physical pixel size.
    pub fn new(
        window: Arc<Window>,
        screen_width: i32,
        screen_height: i32,
        vsync: bool,
    ) -> Result<Self, String> {
        let gpu = GpuContext::new(window, vsync)?;
        let pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let projection = ScreenProjection::new(screen_width, screen_height);

        let camera_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Screen Projection Buffer"),
            size: std::mem::size_of::<crate::camera::CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group = pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);

        let white_image = RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        let white_gpu = GpuTexture::from_image(&gpu.device, &gpu.queue, &white_image, "__white")?;
        let white = WgpuTexture {
            id: 0,
            bind_group: pipeline.create_texture_bind_group(&gpu.device, &white_gpu),
            gpu: white_gpu,
        };

        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        Ok(Self {
            gpu,
            pipeline,
            projection,
            camera_buffer,
            camera_bind_group,
            white,
            next_texture_id: 1,
            clear_color: Color::BLACK,
            vertices: Vec::new(),
            indices: Vec::new(),
            draw_calls: Vec::new(),
            vertex_buffer,
            index_buffer,
            vertex_capacity: 1,
            index_capacity: 1,
            last_draw_calls: 0,
            last_quads: 0,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.gpu.device
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.gpu.surface_format
    }

    pub fn physical_size(&self) -> (u32, u32) {
        self.gpu.size
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    /// Draw calls and quads submitted by the previous present.
    pub fn last_frame_stats(&self) -> (usize, usize) {
        (self.last_draw_calls, self.last_quads)
    }

    fn push_quad(&mut self, texture_id: u64, bind_group: &wgpu::BindGroup, quad: [SpriteVertex; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&quad);
        let index_start = self.indices.len() as u32;
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        push_draw_call(
            &mut self.draw_calls,
            DrawCall {
                texture_id,
                bind_group: bind_group.clone(),
                index_start,
                index_count: 6,
            },
        );
    }

    fn ensure_capacity(&mut self) {
        let needed_vertices = self.vertices.len().max(1);
        if needed_vertices > self.vertex_capacity {
            self.vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.vertex_capacity);
        }
        let needed_indices = self.indices.len().max(1);
        if needed_indices > self.index_capacity {
            self.index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.index_capacity);
        }
    }

    fn reset_batch(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
    }

    /// Submit the batched frame, then hand the encoder and target view to
    /// `overlay` so it can draw on top before the frame is presented.
    pub fn present_with<F>(&mut self, overlay: F)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        self.last_draw_calls = self.draw_calls.len();
        self.last_quads = self.vertices.len() / 4;

        let Some((output, view)) = self.gpu.begin_frame() else {
            self.reset_batch();
            return;
        };

        self.ensure_capacity();
        let uniform = self.projection.build_uniform();
        self.gpu
            .queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
        if !self.vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.vertices));
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&self.indices));
        }

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let [r, g, b, a] = self.clear_color.to_f32();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sprite Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: srgb_to_linear(r),
                            g: srgb_to_linear(g),
                            b: srgb_to_linear(b),
                            a: f64::from(a),
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            if !self.draw_calls.is_empty() {
                render_pass.set_pipeline(&self.pipeline.render_pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                for draw in &self.draw_calls {
                    render_pass.set_bind_group(1, &draw.bind_group, &[]);
                    render_pass.draw_indexed(
                        draw.index_start..(draw.index_start + draw.index_count),
                        0,
                        0..1,
                    );
                }
            }
        }

        overlay(&self.gpu.device, &self.gpu.queue, &mut encoder, &view);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.reset_batch();
    }
}

impl RenderSurface for WgpuSurface {
    type Texture = WgpuTexture;

    fn create_texture(&mut self, image: &RgbaImage, label: &str) -> Result<WgpuTexture, String> {
        let gpu = GpuTexture::from_image(&self.gpu.device, &self.gpu.queue, image, label)?;
        let bind_group = self.pipeline.create_texture_bind_group(&self.gpu.device, &gpu);
        let id = self.next_texture_id;
        self.next_texture_id += 1;
        log::debug!("Created texture '{label}' ({}x{}) as #{id}", gpu.width, gpu.height);
        Ok(WgpuTexture {
            id,
            gpu,
            bind_group,
        })
    }

    fn copy(&mut self, texture: &WgpuTexture, src: Option<Rect>, dst: Rect) {
        let (w, h) = texture.size();
        let quad = quad_vertices(dst, source_uv(src, w, h), Color::WHITE.to_f32());
        self.push_quad(texture.id, &texture.bind_group, quad);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let quad = quad_vertices(rect, [0.0, 0.0, 1.0, 1.0], color.to_f32());
        let bind_group = self.white.bind_group.clone();
        self.push_quad(self.white.id, &bind_group, quad);
    }

    fn clear(&mut self, color: Color) {
        self.reset_batch();
        self.clear_color = color;
    }

    fn present(&mut self) {
        self.present_with(|_, _, _, _| {});
    }

    fn screen_size(&self) -> (i32, i32) {
        (self.projection.width as i32, self.projection.height as i32)
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_endpoints_are_preserved() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-9);
        assert!(srgb_to_linear(0.5) < 0.5);
    }
}

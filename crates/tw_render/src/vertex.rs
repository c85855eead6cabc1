use tw_core::Rect;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

impl SpriteVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Four corners of `dst` in screen pixels, clockwise from top-left, with
/// `uv` given as `[u0, v0, u1, v1]`.
pub fn quad_vertices(dst: Rect, uv: [f32; 4], color: [f32; 4]) -> [SpriteVertex; 4] {
    let (x0, y0) = (dst.x as f32, dst.y as f32);
    let (x1, y1) = ((dst.x + dst.w) as f32, (dst.y + dst.h) as f32);
    let [u0, v0, u1, v1] = uv;
    [
        SpriteVertex { position: [x0, y0], tex_coords: [u0, v0], color },
        SpriteVertex { position: [x1, y0], tex_coords: [u1, v0], color },
        SpriteVertex { position: [x1, y1], tex_coords: [u1, v1], color },
        SpriteVertex { position: [x0, y1], tex_coords: [u0, v1], color },
    ]
}

/// Normalized texture coordinates for `src` within a `width` x `height`
/// texture. `None` covers the whole texture.
pub fn source_uv(src: Option<Rect>, width: u32, height: u32) -> [f32; 4] {
    let Some(src) = src else {
        return [0.0, 0.0, 1.0, 1.0];
    };
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;
    [
        src.x as f32 / w,
        src.y as f32 / h,
        (src.x + src.w) as f32 / w,
        (src.y + src.h) as f32 / h,
    ]
}

use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Maps screen pixels (origin top-left, y down) to clip space.
///
/// The game never moves this projection. Scrolling is done by the game's
/// camera rectangle, which offsets destination rects before they get here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenProjection {
    pub width: f32,
    pub height: f32,
}

impl ScreenProjection {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(1) as f32,
            height: height.max(1) as f32,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(0.0, self.width, self.height, 0.0, -1.0, 1.0)
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.matrix().to_cols_array_2d(),
        }
    }
}

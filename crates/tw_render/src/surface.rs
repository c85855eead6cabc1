//! The renderer boundary.
//!
//! Game code never talks to the GPU directly. It issues screen-space draw
//! commands against a [`RenderSurface`]: blit a texture (or a sub-rectangle
//! of it) into a destination rectangle, fill a rectangle, clear, present.
//! Coordinates are pixels with the origin at the top-left of the screen.
//!
//! Textures are created by the surface and handed back as an owned
//! `Self::Texture`. Dropping that value releases the underlying resource, so
//! ownership alone decides texture lifetime.

use image::RgbaImage;
use tw_core::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

pub trait RenderSurface {
    type Texture;

    fn create_texture(&mut self, image: &RgbaImage, label: &str) -> Result<Self::Texture, String>;

    /// Draw `src` of `texture` (whole texture when `None`) stretched into `dst`.
    fn copy(&mut self, texture: &Self::Texture, src: Option<Rect>, dst: Rect);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn clear(&mut self, color: Color);

    fn present(&mut self);

    /// Logical screen size in pixels.
    fn screen_size(&self) -> (i32, i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_to_f32_normalizes_channels() {
        assert_eq!(Color::WHITE.to_f32(), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(Color::TRANSPARENT.to_f32(), [0.0, 0.0, 0.0, 0.0]);
        let c = Color::rgba(51, 102, 0, 255).to_f32();
        assert!((c[0] - 0.2).abs() < 1e-6);
        assert!((c[1] - 0.4).abs() < 1e-6);
    }
}

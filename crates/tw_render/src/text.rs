//! Text rasterization into RGBA images.

use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};

use crate::surface::Color;

pub trait TextRasterizer {
    /// Render a single line of `text` in `color` on a transparent background.
    fn rasterize(&self, text: &str, color: Color) -> Result<RgbaImage, String>;
}

/// TrueType font at a fixed pixel size.
///
/// Glyphs are rendered solid: a pixel is either fully `color` or fully
/// transparent, with no antialiased edges.
pub struct TtfFont {
    font: Font<'static>,
    scale: Scale,
}

impl TtfFont {
    pub fn from_bytes(data: Vec<u8>, pixel_size: f32) -> Result<Self, String> {
        if pixel_size <= 0.0 {
            return Err(format!("Invalid font size {pixel_size}"));
        }
        let font = Font::try_from_vec(data).ok_or_else(|| "Invalid font data".to_string())?;
        Ok(Self {
            font,
            scale: Scale::uniform(pixel_size),
        })
    }

    pub fn from_file(path: &std::path::Path, pixel_size: f32) -> Result<Self, String> {
        let data = std::fs::read(path)
            .map_err(|e| format!("Failed to load font {}: {e}", path.display()))?;
        Self::from_bytes(data, pixel_size)
    }

    /// Height in pixels of any rendered line.
    pub fn line_height(&self) -> i32 {
        let v = self.font.v_metrics(self.scale);
        (v.ascent - v.descent).ceil() as i32
    }
}

impl TextRasterizer for TtfFont {
    fn rasterize(&self, text: &str, color: Color) -> Result<RgbaImage, String> {
        if text.is_empty() {
            return Err("text is empty".to_string());
        }

        let v_metrics = self.font.v_metrics(self.scale);
        let glyphs: Vec<_> = self
            .font
            .layout(text, self.scale, point(0.0, v_metrics.ascent))
            .collect();

        let width = glyphs
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
            .ceil() as u32;
        let height = self.line_height().max(0) as u32;
        if width == 0 || height == 0 {
            return Err(format!("text '{text}' has no visible extent"));
        }

        let mut image = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
        let ink = Rgba([color.r, color.g, color.b, color.a]);
        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let x = bb.min.x + gx as i32;
                let y = bb.min.y + gy as i32;
                if coverage >= 0.5 && x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height
                {
                    image.put_pixel(x as u32, y as u32, ink);
                }
            });
        }

        Ok(image)
    }
}

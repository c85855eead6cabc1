//! Texture resources and the registry that owns them.
//!
//! A [`TextureResource`] exclusively owns at most one surface texture plus its
//! pixel size and an integer display scale. Loading always releases the
//! previous texture first, and a failed load leaves the resource empty.
//!
//! Every render call on an empty resource is a silent no-op.

use std::collections::HashMap;
use std::path::Path;

use image::RgbaImage;
use tw_core::Rect;

use crate::surface::{Color, RenderSurface};
use crate::text::TextRasterizer;

/// Pixels of exactly this colour become fully transparent on load.
pub const COLOR_KEY: [u8; 3] = [0, 0, 0];

pub fn decode_image_file(path: &Path) -> Result<RgbaImage, String> {
    let image = image::open(path)
        .map_err(|e| format!("Failed to load image {}: {e}", path.display()))?;
    Ok(image.to_rgba8())
}

pub fn apply_color_key(image: &mut RgbaImage, key: [u8; 3]) {
    for pixel in image.pixels_mut() {
        if pixel[0] == key[0] && pixel[1] == key[1] && pixel[2] == key[2] {
            pixel[3] = 0;
        }
    }
}

pub struct TextureResource<T> {
    handle: Option<T>,
    width: i32,
    height: i32,
    scale: i32,
}

impl<T> TextureResource<T> {
    pub fn new() -> Self {
        Self {
            handle: None,
            width: 0,
            height: 0,
            scale: 1,
        }
    }

    pub fn load_from_file<S>(&mut self, surface: &mut S, path: &Path) -> Result<(), String>
    where
        S: RenderSurface<Texture = T>,
    {
        self.free();
        let mut image = decode_image_file(path)?;
        apply_color_key(&mut image, COLOR_KEY);
        self.upload(surface, &image, &path.to_string_lossy())
    }

    pub fn load_from_text<S, F>(
        &mut self,
        surface: &mut S,
        font: &F,
        text: &str,
        color: Color,
    ) -> Result<(), String>
    where
        S: RenderSurface<Texture = T>,
        F: TextRasterizer + ?Sized,
    {
        self.free();
        let image = font
            .rasterize(text, color)
            .map_err(|e| format!("Unable to render text '{text}': {e}"))?;
        self.upload(surface, &image, "text")
    }

    /// Upload an already decoded image as-is (no colour key).
    pub fn load_from_image<S>(
        &mut self,
        surface: &mut S,
        image: &RgbaImage,
        label: &str,
    ) -> Result<(), String>
    where
        S: RenderSurface<Texture = T>,
    {
        self.free();
        self.upload(surface, image, label)
    }

    fn upload<S>(&mut self, surface: &mut S, image: &RgbaImage, label: &str) -> Result<(), String>
    where
        S: RenderSurface<Texture = T>,
    {
        if image.width() == 0 || image.height() == 0 {
            return Err(format!("Could not create texture '{label}': image is empty"));
        }
        let handle = surface
            .create_texture(image, label)
            .map_err(|e| format!("Could not create texture '{label}': {e}"))?;
        self.width = image.width() as i32;
        self.height = image.height() as i32;
        self.handle = Some(handle);
        Ok(())
    }

    pub fn free(&mut self) {
        self.handle = None;
        self.width = 0;
        self.height = 0;
    }

    pub fn render<S>(&self, surface: &mut S, x: i32, y: i32, clip: Option<Rect>)
    where
        S: RenderSurface<Texture = T>,
    {
        let Some(handle) = &self.handle else {
            log::trace!("Skipping render of empty texture at ({x}, {y})");
            return;
        };
        let (w, h) = match clip {
            Some(clip) => (clip.w, clip.h),
            None => (self.width, self.height),
        };
        surface.copy(
            handle,
            clip,
            Rect::new(x, y, w * self.scale, h * self.scale),
        );
    }

    pub fn render_stretch_to_fill<S>(&self, surface: &mut S)
    where
        S: RenderSurface<Texture = T>,
    {
        let Some(handle) = &self.handle else {
            log::trace!("Skipping fill render of empty texture");
            return;
        };
        let (w, h) = surface.screen_size();
        surface.copy(handle, None, Rect::new(0, 0, w, h));
    }

    /// Draw into exactly `(x, y, w, h)`, for UI that must keep its pixel size.
    pub fn render_ignoring_scale<S>(
        &self,
        surface: &mut S,
        dst: Rect,
        clip: Option<Rect>,
    ) where
        S: RenderSurface<Texture = T>,
    {
        let Some(handle) = &self.handle else {
            log::trace!("Skipping unscaled render of empty texture at ({}, {})", dst.x, dst.y);
            return;
        };
        surface.copy(handle, clip, dst);
    }

    pub fn set_scale(&mut self, scale: i32) -> bool {
        if scale < 1 {
            log::warn!("Could not set texture scale to {scale}: must be at least 1");
            return false;
        }
        self.scale = scale;
        true
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Width on screen, with scale applied.
    pub fn width(&self) -> i32 {
        self.width * self.scale
    }

    pub fn height(&self) -> i32 {
        self.height * self.scale
    }

    pub fn pixel_width(&self) -> i32 {
        self.width
    }

    pub fn pixel_height(&self) -> i32 {
        self.height
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<&T> {
        self.handle.as_ref()
    }
}

impl<T> Default for TextureResource<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(usize);

/// Owns every texture for the life of the game. Everything else refers to
/// textures by [`TextureId`].
pub struct TextureRegistry<T> {
    textures: Vec<TextureResource<T>>,
    keys: HashMap<String, TextureId>,
}

impl<T> TextureRegistry<T> {
    pub fn new() -> Self {
        Self {
            textures: Vec::new(),
            keys: HashMap::new(),
        }
    }

    /// Returns the existing id when `key` is already registered.
    pub fn register(&mut self, key: &str) -> TextureId {
        if let Some(id) = self.keys.get(key) {
            return *id;
        }
        let id = TextureId(self.textures.len());
        self.textures.push(TextureResource::new());
        self.keys.insert(key.to_string(), id);
        id
    }

    pub fn id_of(&self, key: &str) -> Option<TextureId> {
        self.keys.get(key).copied()
    }

    pub fn get(&self, id: TextureId) -> Option<&TextureResource<T>> {
        self.textures.get(id.0)
    }

    pub fn get_mut(&mut self, id: TextureId) -> Option<&mut TextureResource<T>> {
        self.textures.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn loaded_count(&self) -> usize {
        self.textures.iter().filter(|t| t.is_loaded()).count()
    }

    /// Raw RGBA bytes held by loaded textures.
    pub fn estimate_bytes(&self) -> usize {
        self.textures
            .iter()
            .map(|t| (t.pixel_width() as usize) * (t.pixel_height() as usize) * 4)
            .sum()
    }

    pub fn free_all(&mut self) {
        for texture in &mut self.textures {
            texture.free();
        }
    }
}

impl<T> Default for TextureRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

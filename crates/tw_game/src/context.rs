use std::path::Path;

use tw_core::{KeySnapshot, Rect};
use tw_render::{RenderSurface, TextureId, TextureRegistry, TextureResource};

/// Everything game objects need to draw: the surface, the textures they refer
/// to by id, and the key state for the current frame.
pub struct GameContext<S: RenderSurface> {
    pub surface: S,
    pub textures: TextureRegistry<S::Texture>,
    pub keys: KeySnapshot,
}

impl<S: RenderSurface> GameContext<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            textures: TextureRegistry::new(),
            keys: KeySnapshot::default(),
        }
    }

    pub fn texture(&self, id: TextureId) -> Option<&TextureResource<S::Texture>> {
        self.textures.get(id)
    }

    pub fn load_texture(&mut self, id: TextureId, path: &Path) -> Result<(), String> {
        let texture = self
            .textures
            .get_mut(id)
            .ok_or_else(|| format!("Unknown texture id {id:?}"))?;
        texture.load_from_file(&mut self.surface, path)?;
        log::info!(
            "Loaded texture '{}' ({}x{})",
            path.display(),
            texture.pixel_width(),
            texture.pixel_height()
        );
        Ok(())
    }

    pub fn set_texture_scale(&mut self, id: TextureId, scale: i32) {
        if let Some(texture) = self.textures.get_mut(id) {
            texture.set_scale(scale);
        }
    }

    /// Scale of `id`, or 1 when it was never registered.
    pub fn texture_scale(&self, id: TextureId) -> i32 {
        self.textures.get(id).map_or(1, |t| t.scale())
    }

    pub fn draw(&mut self, id: TextureId, x: i32, y: i32, clip: Option<Rect>) {
        if let Some(texture) = self.textures.get(id) {
            texture.render(&mut self.surface, x, y, clip);
        }
    }

    pub fn draw_ignoring_scale(&mut self, id: TextureId, dst: Rect, clip: Option<Rect>) {
        if let Some(texture) = self.textures.get(id) {
            texture.render_ignoring_scale(&mut self.surface, dst, clip);
        }
    }

    #[cfg(test)]
    pub fn draw_stretched(&mut self, id: TextureId) {
        if let Some(texture) = self.textures.get(id) {
            texture.render_stretch_to_fill(&mut self.surface);
        }
    }
}

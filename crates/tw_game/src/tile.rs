use tw_core::Rect;
use tw_render::{RenderSurface, TextureId};

use crate::context::GameContext;

/// A fixed block in the world. Its collider lives in screen space and is
/// refreshed from the camera once per frame.
#[derive(Debug, Clone)]
pub struct Tile {
    x: i32,
    y: i32,
    collider: Rect,
    texture: TextureId,
}

impl Tile {
    pub fn new(x: i32, y: i32, size: i32, texture: TextureId) -> Self {
        Self {
            x,
            y,
            collider: Rect::new(x, y, size, size),
            texture,
        }
    }

    pub fn apply_camera_offset(&mut self, cam_x: i32, cam_y: i32) {
        self.collider.x = self.x - cam_x;
        self.collider.y = self.y - cam_y;
    }

    pub fn collider(&self) -> &Rect {
        &self.collider
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn render<S: RenderSurface>(&self, ctx: &mut GameContext<S>, cam_x: i32, cam_y: i32) {
        let dst = Rect::new(
            self.x - cam_x,
            self.y - cam_y,
            self.collider.w,
            self.collider.h,
        );
        ctx.draw_ignoring_scale(self.texture, dst, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use tw_render::RecordingSurface;

    #[test]
    fn camera_offset_moves_collider_not_position() {
        let mut ctx = GameContext::new(RecordingSurface::new(10, 10));
        let id = ctx.textures.register("brick");
        let mut tile = Tile::new(300, 0, 100, id);
        tile.apply_camera_offset(250, 0);
        assert_eq!(*tile.collider(), Rect::new(50, 0, 100, 100));
        assert_eq!(tile.position(), (300, 0));
        tile.apply_camera_offset(0, 0);
        assert_eq!(*tile.collider(), Rect::new(300, 0, 100, 100));
    }

    #[test]
    fn render_uses_tile_size_regardless_of_texture_scale() {
        let mut ctx = GameContext::new(RecordingSurface::new(900, 900));
        let id = ctx.textures.register("brick");
        ctx.textures
            .get_mut(id)
            .expect("registered")
            .load_from_image(&mut ctx.surface, &RgbaImage::new(16, 16), "brick")
            .expect("upload");
        ctx.set_texture_scale(id, 4);

        Tile::new(100, 200, 100, id).render(&mut ctx, 40, 50);
        assert_eq!(ctx.surface.copies(), vec![(None, Rect::new(60, 150, 100, 100))]);
    }
}

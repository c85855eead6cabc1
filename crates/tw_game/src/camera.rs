use glam::IVec2;
use tw_core::Rect;

/// Viewport into the world, one screen in size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Camera {
    pub viewport: Rect,
}

impl Camera {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            viewport: Rect::new(0, 0, width, height),
        }
    }

    /// Centre on `target`, then keep the viewport inside `world`.
    pub fn follow(&mut self, target: Rect, world: IVec2) {
        let v = &mut self.viewport;
        v.x = (target.x + target.w / 2) - v.w / 2;
        v.y = (target.y + target.h / 2) - v.h / 2;

        if v.x < 0 {
            v.x = 0;
        }
        if v.x > world.x - v.w {
            v.x = world.x - v.w;
        }
        if v.y < 0 {
            v.y = 0;
        }
        if v.y > world.y - v.h {
            v.y = world.y - v.h;
        }
    }

    pub fn offset(&self) -> IVec2 {
        self.viewport.origin()
    }
}

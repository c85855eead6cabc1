//! Frame-animated sprites over a strip of clips in one texture.

use std::time::Duration;

use tw_core::{FrameAnimator, Rect};
use tw_render::{RenderSurface, TextureId};

use crate::context::GameContext;

pub struct AnimatedSprite {
    texture: TextureId,
    clips: &'static [Rect],
    animator: FrameAnimator,
}

impl AnimatedSprite {
    pub fn new(texture: TextureId, clips: &'static [Rect], fps: u32) -> Self {
        Self {
            texture,
            clips,
            animator: FrameAnimator::new(clips.len(), fps),
        }
    }

    /// Advance by `dt`, draw the current clip at `(x, y)` and report whether
    /// the frame changed.
    pub fn render<S: RenderSurface>(
        &mut self,
        ctx: &mut GameContext<S>,
        x: i32,
        y: i32,
        dt: Duration,
    ) -> bool {
        let moved = self.animator.advance(dt);
        ctx.draw(self.texture, x, y, self.current_clip());
        moved
    }

    pub fn current_clip(&self) -> Option<Rect> {
        self.clips.get(self.animator.current_frame()).copied()
    }

    /// On-screen size of the current frame: clip size times texture scale.
    pub fn frame_size<S: RenderSurface>(&self, ctx: &GameContext<S>) -> (i32, i32) {
        let scale = ctx.texture_scale(self.texture);
        match self.current_clip() {
            Some(clip) => (clip.w * scale, clip.h * scale),
            None => ctx
                .texture(self.texture)
                .map_or((0, 0), |t| (t.width(), t.height())),
        }
    }

    pub fn set_fps(&mut self, fps: i32) -> bool {
        self.animator.set_fps(fps)
    }

    pub fn set_frame(&mut self, frame: i32) -> bool {
        self.animator.set_frame(frame)
    }

    pub fn moved_frame(&self) -> bool {
        self.animator.moved_frame()
    }

    pub fn current_frame(&self) -> usize {
        self.animator.current_frame()
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }
}

use std::time::Duration;

use glam::IVec2;
use tw_core::{KeySnapshot, Rect};
use tw_render::{RenderSurface, TextureId};

use crate::collision::{move_and_collide, Body, MoveResult};
use crate::context::GameContext;
use crate::sprite::AnimatedSprite;
use crate::tile::Tile;

pub static PLAYER_CLIPS: [Rect; 2] = [Rect::new(0, 0, 16, 16), Rect::new(0, 16, 16, 16)];

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Pixels per processed frame along each held direction.
    pub speed: i32,
    /// Walk cycle rate while any direction is held.
    pub walk_fps: i32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 5,
            walk_fps: 4,
        }
    }
}

pub struct Player {
    body: Body,
    velocity: IVec2,
    tuning: PlayerTuning,
    pub sprite: AnimatedSprite,
}

impl Player {
    pub fn new(texture: TextureId, start: IVec2, tuning: PlayerTuning) -> Self {
        Self {
            body: Body::new(start),
            velocity: IVec2::ZERO,
            tuning,
            sprite: AnimatedSprite::new(texture, &PLAYER_CLIPS, 0),
        }
    }

    /// Velocity and walk animation follow the held arrow keys.
    pub fn apply_input(&mut self, keys: &KeySnapshot) {
        let axis = |neg: bool, pos: bool| i32::from(pos) - i32::from(neg);
        self.velocity = IVec2::new(axis(keys.left, keys.right), axis(keys.up, keys.down))
            * self.tuning.speed;
        let fps = if keys.any_direction() {
            self.tuning.walk_fps
        } else {
            0
        };
        self.sprite.set_fps(fps);
    }

    pub fn stop(&mut self) {
        self.velocity = IVec2::ZERO;
        self.sprite.set_fps(0);
    }

    pub fn move_and_collide<S: RenderSurface>(
        &mut self,
        ctx: &GameContext<S>,
        tiles: &[Tile],
        world_size: IVec2,
        camera: IVec2,
    ) -> MoveResult {
        let (w, h) = self.sprite.frame_size(ctx);
        move_and_collide(
            &mut self.body,
            self.velocity,
            IVec2::new(w, h),
            world_size,
            camera,
            tiles,
        )
    }

    /// Returns true when the walk cycle stepped to a new frame.
    pub fn render<S: RenderSurface>(
        &mut self,
        ctx: &mut GameContext<S>,
        camera: IVec2,
        dt: Duration,
    ) -> bool {
        let screen = self.body.position - camera;
        self.sprite.render(ctx, screen.x, screen.y, dt)
    }

    pub fn position(&self) -> IVec2 {
        self.body.position
    }

    pub fn velocity(&self) -> IVec2 {
        self.velocity
    }

    pub fn collider(&self) -> Rect {
        self.body.collider
    }

    pub fn size<S: RenderSurface>(&self, ctx: &GameContext<S>) -> IVec2 {
        let (w, h) = self.sprite.frame_size(ctx);
        IVec2::new(w, h)
    }
}

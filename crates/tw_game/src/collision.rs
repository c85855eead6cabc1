//! Axis-separated movement against static tiles.
//!
//! The body moves along X first and is reverted on that axis if it leaves the
//! world or overlaps any tile collider. Y is then resolved the same way from
//! the possibly reverted state. Tile colliders are screen-space (world minus
//! camera), and so is the body's collider after a successful move.
//!
//! A revert writes the world position straight into the collider without the
//! camera offset. The next axis test sees that value as-is.

use glam::IVec2;
use tw_core::Rect;

use crate::tile::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    pub position: IVec2,
    pub collider: Rect,
}

impl Body {
    pub fn new(position: IVec2) -> Self {
        Self {
            position,
            collider: Rect::new(position.x, position.y, 0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveResult {
    pub blocked_x: bool,
    pub blocked_y: bool,
}

/// Linear scan; tile counts here are small.
pub fn hits_any_tile(collider: &Rect, tiles: &[Tile]) -> bool {
    tiles.iter().any(|tile| collider.overlaps(tile.collider()))
}

pub fn move_and_collide(
    body: &mut Body,
    velocity: IVec2,
    frame_size: IVec2,
    world_size: IVec2,
    camera: IVec2,
    tiles: &[Tile],
) -> MoveResult {
    let mut result = MoveResult::default();

    body.position.x += velocity.x;
    body.collider.x = body.position.x - camera.x;
    body.collider.w = frame_size.x;
    if body.position.x < 0
        || body.position.x + frame_size.x > world_size.x
        || hits_any_tile(&body.collider, tiles)
    {
        body.position.x -= velocity.x;
        body.collider.x = body.position.x;
        result.blocked_x = true;
    }

    body.position.y += velocity.y;
    body.collider.y = body.position.y - camera.y;
    body.collider.h = frame_size.y;
    if body.position.y < 0
        || body.position.y + frame_size.y > world_size.y
        || hits_any_tile(&body.collider, tiles)
    {
        body.position.y -= velocity.y;
        body.collider.y = body.position.y;
        result.blocked_y = true;
    }

    result
}

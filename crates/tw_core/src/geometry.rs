//! Integer screen/world rectangles.
//!
//! All positions in the simulation are whole pixels. A rectangle covers the
//! half-open intervals `[x, x + w)` and `[y, y + h)`, so two rectangles that
//! only share an edge do not overlap.

use glam::IVec2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn origin(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.w, self.h)
    }

    /// Strict axis-aligned overlap. Any side of `self` lying on or beyond the
    /// opposite side of `other` means no collision.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.bottom() <= other.top() {
            return false;
        }
        if self.top() >= other.bottom() {
            return false;
        }
        if self.right() <= other.left() {
            return false;
        }
        if self.left() >= other.right() {
            return false;
        }
        true
    }

    /// Point containment with both edges inclusive, matching pointer hit tests
    /// on UI elements.
    pub fn contains_inclusive(&self, px: i32, py: i32) -> bool {
        px >= self.left() && px <= self.right() && py >= self.top() && py <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_rects_collide() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(!a.overlaps(&Rect::new(10, 0, 10, 10)));
        assert!(!a.overlaps(&Rect::new(0, 10, 10, 10)));
        assert!(!a.overlaps(&Rect::new(-10, 0, 10, 10)));
        assert!(!a.overlaps(&Rect::new(0, -10, 10, 10)));
    }

    #[test]
    fn overlap_on_one_axis_only_is_not_a_collision() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(!a.overlaps(&Rect::new(5, 20, 10, 10)));
        assert!(!a.overlaps(&Rect::new(20, 5, 10, 10)));
    }

    #[test]
    fn zero_sized_rect_never_collides_on_its_edge() {
        let a = Rect::new(100, 0, 0, 0);
        assert!(!a.overlaps(&Rect::new(100, 0, 100, 100)));
    }

    #[test]
    fn contains_inclusive_accepts_far_edges() {
        let r = Rect::new(0, 0, 89, 89);
        assert!(r.contains_inclusive(0, 0));
        assert!(r.contains_inclusive(89, 89));
        assert!(!r.contains_inclusive(90, 10));
        assert!(!r.contains_inclusive(-1, 10));
    }

    #[test]
    fn origin_and_size_as_vectors() {
        let r = Rect::new(3, 4, 5, 6);
        assert_eq!(r.origin(), IVec2::new(3, 4));
        assert_eq!(r.size(), IVec2::new(5, 6));
    }
}

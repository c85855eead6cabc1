//! Fixed-cadence frame animation timing.
//!
//! A [`FrameAnimator`] walks frame indices `0..frame_count` in a loop at a
//! configurable frames-per-second. Time is accumulated as an integer
//! [`Duration`] so a period split across any number of frames sums exactly.
//!
//! Cadence, not catch-up: each `advance` moves at most one frame. When the
//! timer reaches the period it flips to the next frame and resets to zero,
//! dropping any time beyond the period.
//!
//! The flip fires when the timer *reaches* the period (`>=`), not only once it
//! exceeds it. With an exact integer timer, a quarter second split over any
//! number of calls at 4 fps then flips exactly once, on the call that
//! completes the quarter second. A strict `>` would need one more call.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FrameAnimator {
    frame_count: usize,
    current_frame: usize,
    frame_timer: Duration,
    fps: u32,
    moved_frame: bool,
}

impl FrameAnimator {
    /// `frame_count` must be at least 1.
    pub fn new(frame_count: usize, fps: u32) -> Self {
        Self {
            frame_count: frame_count.max(1),
            current_frame: 0,
            frame_timer: Duration::ZERO,
            fps,
            moved_frame: false,
        }
    }

    /// Advance by `dt`. Returns whether the frame changed on this call.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.moved_frame = false;

        if self.fps > 0 {
            self.frame_timer += dt;
            // Inclusive: a timer exactly at the period flips.
            if self.frame_timer >= self.period() {
                self.moved_frame = true;
                self.current_frame = (self.current_frame + 1) % self.frame_count;
                self.frame_timer = Duration::ZERO;
            }
        }

        self.moved_frame
    }

    fn period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.fps))
    }

    /// Rejects negative rates, keeping the previous value.
    pub fn set_fps(&mut self, fps: i32) -> bool {
        if fps < 0 {
            log::warn!("Could not set animation fps to {fps}: out of bounds");
            return false;
        }
        self.fps = fps as u32;
        true
    }

    /// Rejects indices outside `0..frame_count`, keeping the current frame.
    pub fn set_frame(&mut self, frame: i32) -> bool {
        if frame < 0 || frame as usize >= self.frame_count {
            log::warn!(
                "Could not set animation frame to {frame}: valid range is 0..{}",
                self.frame_count
            );
            return false;
        }
        self.current_frame = frame as usize;
        true
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn frame_timer(&self) -> Duration {
        self.frame_timer
    }

    pub fn moved_frame(&self) -> bool {
        self.moved_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn quarter_second_at_4fps_moves_exactly_once() {
        for splits in [1u32, 2, 3, 7, 10, 250] {
            let mut anim = FrameAnimator::new(2, 4);
            let mut remaining = Duration::from_millis(250);
            let step = remaining / splits;
            let mut moves = Vec::new();
            for i in 0..splits {
                let dt = if i + 1 == splits { remaining } else { step };
                remaining -= dt;
                moves.push(anim.advance(dt));
            }
            assert_eq!(moves.iter().filter(|m| **m).count(), 1, "splits={splits}");
            assert_eq!(moves.last(), Some(&true), "splits={splits}");
            assert_eq!(anim.current_frame(), 1);
        }
    }

    #[test]
    fn flips_on_reaching_the_period_not_before() {
        let mut anim = FrameAnimator::new(2, 4);
        assert!(!anim.advance(Duration::from_nanos(249_999_999)));
        assert_eq!(anim.current_frame(), 0);
        assert!(anim.advance(Duration::from_nanos(1)));
        assert_eq!(anim.current_frame(), 1);
        assert_eq!(anim.frame_timer(), Duration::ZERO);
    }

    #[test]
    fn moved_frame_flag_is_only_true_on_the_transition_call() {
        let mut anim = FrameAnimator::new(2, 4);
        assert!(!anim.advance(ms(200)));
        assert!(!anim.moved_frame());
        assert!(anim.advance(ms(50)));
        assert!(anim.moved_frame());
        assert!(!anim.advance(ms(10)));
        assert!(!anim.moved_frame());
    }

    #[test]
    fn excess_time_is_dropped_not_caught_up() {
        let mut anim = FrameAnimator::new(3, 4);
        // A full second is four periods, but only one frame advances.
        assert!(anim.advance(Duration::from_secs(1)));
        assert_eq!(anim.current_frame(), 1);
        assert_eq!(anim.frame_timer(), Duration::ZERO);
    }

    #[test]
    fn wraps_back_to_first_frame() {
        let mut anim = FrameAnimator::new(2, 4);
        anim.advance(ms(250));
        anim.advance(ms(250));
        assert_eq!(anim.current_frame(), 0);
    }

    #[test]
    fn zero_fps_freezes_animation() {
        let mut anim = FrameAnimator::new(2, 0);
        for _ in 0..10 {
            assert!(!anim.advance(Duration::from_secs(1)));
        }
        assert_eq!(anim.current_frame(), 0);
        assert_eq!(anim.frame_timer(), Duration::ZERO);
    }

    #[test]
    fn set_fps_rejects_negative_and_keeps_state() {
        let mut anim = FrameAnimator::new(2, 4);
        assert!(!anim.set_fps(-1));
        assert_eq!(anim.fps(), 4);
        assert!(anim.set_fps(0));
        assert_eq!(anim.fps(), 0);
    }

    #[test]
    fn set_frame_validates_bounds() {
        let mut anim = FrameAnimator::new(2, 4);
        assert!(anim.set_frame(1));
        assert_eq!(anim.current_frame(), 1);
        assert!(!anim.set_frame(2));
        assert!(!anim.set_frame(-1));
        assert_eq!(anim.current_frame(), 1);
    }

    #[test]
    fn determinism_identical_results() {
        let dt = Duration::from_micros(8_333);
        let mut a = FrameAnimator::new(4, 6);
        let mut b = FrameAnimator::new(4, 6);
        for _ in 0..500 {
            assert_eq!(a.advance(dt), b.advance(dt));
        }
        assert_eq!(a.current_frame(), b.current_frame());
        assert_eq!(a.frame_timer(), b.frame_timer());
    }
}

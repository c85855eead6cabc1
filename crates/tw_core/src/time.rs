//! Frame pacing.
//!
//! The loop polls continuously and asks [`FrameClock::tick`] whether enough
//! time has passed since the last *processed* frame. Below the target period
//! the iteration is skipped outright: no simulation, no rendering, and the
//! last-frame timestamp is left alone so the delta keeps growing until it
//! crosses the threshold. The returned delta is the one value every
//! time-based component reads for that frame.

use std::time::Duration;

use crate::clock::Clock;

const FPS_SAMPLE_COUNT: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTick {
    Skip,
    Run(Duration),
}

/// Rate limiter: a frame is skipped while its delta is below the period.
pub fn should_skip_frame(delta: Duration, target_period: Duration) -> bool {
    delta < target_period
}

pub struct FrameClock {
    pub target_period: Duration,
    pub max_delta: Duration,
    last_frame: Duration,
    pub delta: Duration,
    pub frame_count: u64,
    pub skipped_count: u64,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new(target_fps: u32, clock: &dyn Clock) -> Self {
        let target_period = if target_fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(1_000_000_000 / u64::from(target_fps))
        };
        let sample = target_period.as_secs_f64().max(1.0 / 1000.0);
        Self {
            target_period,
            max_delta: Duration::from_millis(250),
            last_frame: clock.now(),
            delta: Duration::ZERO,
            frame_count: 0,
            skipped_count: 0,
            fps_samples: [sample; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / sample,
            smoothed_frame_time_ms: sample * 1000.0,
        }
    }

    pub fn tick(&mut self, clock: &dyn Clock) -> FrameTick {
        let now = clock.now();
        let raw = now.saturating_sub(self.last_frame);
        if should_skip_frame(raw, self.target_period) {
            self.skipped_count += 1;
            return FrameTick::Skip;
        }
        self.last_frame = now;

        self.delta = raw;
        if self.delta > self.max_delta {
            log::warn!(
                "Frame took {:.1}ms, capping delta to {}ms",
                raw.as_secs_f64() * 1000.0,
                self.max_delta.as_millis()
            );
            self.delta = self.max_delta;
        }
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.delta.as_secs_f64();
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        FrameTick::Run(self.delta)
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn skip_below_period_and_run_at_or_above() {
        let period = Duration::from_millis(8);
        assert!(should_skip_frame(Duration::from_millis(7), period));
        assert!(!should_skip_frame(Duration::from_millis(8), period));
        assert!(!should_skip_frame(Duration::from_millis(30), period));
    }

    #[test]
    fn skipped_iterations_keep_accumulating_delta() {
        let clock = ManualClock::new();
        let mut frames = FrameClock::new(100, &clock);

        clock.advance(Duration::from_millis(4));
        assert_eq!(frames.tick(&clock), FrameTick::Skip);
        clock.advance(Duration::from_millis(4));
        assert_eq!(frames.tick(&clock), FrameTick::Skip);
        clock.advance(Duration::from_millis(4));
        // 12ms since the last processed frame, not 4ms.
        assert_eq!(frames.tick(&clock), FrameTick::Run(Duration::from_millis(12)));
        assert_eq!(frames.frame_count, 1);
        assert_eq!(frames.skipped_count, 2);
    }

    #[test]
    fn processed_frame_rebases_the_delta() {
        let clock = ManualClock::new();
        let mut frames = FrameClock::new(100, &clock);
        clock.advance(Duration::from_millis(10));
        assert_eq!(frames.tick(&clock), FrameTick::Run(Duration::from_millis(10)));
        clock.advance(Duration::from_millis(5));
        assert_eq!(frames.tick(&clock), FrameTick::Skip);
        clock.advance(Duration::from_millis(5));
        assert_eq!(frames.tick(&clock), FrameTick::Run(Duration::from_millis(10)));
    }

    #[test]
    fn huge_delta_is_capped() {
        let clock = ManualClock::new();
        let mut frames = FrameClock::new(120, &clock);
        clock.advance(Duration::from_secs(5));
        assert_eq!(frames.tick(&clock), FrameTick::Run(frames.max_delta));
    }

    #[test]
    fn zero_target_fps_never_skips() {
        let clock = ManualClock::new();
        let mut frames = FrameClock::new(0, &clock);
        assert_eq!(frames.tick(&clock), FrameTick::Run(Duration::ZERO));
    }

    #[test]
    fn smoothed_fps_tracks_steady_rate() {
        let clock = ManualClock::new();
        let mut frames = FrameClock::new(50, &clock);
        for _ in 0..FPS_SAMPLE_COUNT {
            clock.advance(Duration::from_millis(20));
            frames.tick(&clock);
        }
        assert!((frames.smoothed_fps - 50.0).abs() < 0.01);
        assert!((frames.smoothed_frame_time_ms - 20.0).abs() < 0.01);
    }
}

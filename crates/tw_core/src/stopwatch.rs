use std::time::Duration;

use crate::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchState {
    Stopped,
    Running,
    Paused,
}

impl StopwatchState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
            Self::Paused => "paused",
        }
    }
}

/// Pause-aware run timer. Independent of the frame clock: it reads its own
/// clock whenever it is queried.
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    start: Duration,
    paused_elapsed: Duration,
    paused: bool,
    running: bool,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, clock: &dyn Clock) {
        self.running = true;
        self.paused = false;
        self.start = clock.now();
        self.paused_elapsed = Duration::ZERO;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.paused = false;
        self.start = Duration::ZERO;
        self.paused_elapsed = Duration::ZERO;
    }

    /// Only a running, unpaused stopwatch can pause.
    pub fn pause(&mut self, clock: &dyn Clock) {
        if self.running && !self.paused {
            self.paused = true;
            self.paused_elapsed = clock.now().saturating_sub(self.start);
            self.start = Duration::ZERO;
        }
    }

    pub fn unpause(&mut self, clock: &dyn Clock) {
        if self.running && self.paused {
            self.paused = false;
            // Rebase so elapsed continues from the frozen value.
            self.start = clock.now().saturating_sub(self.paused_elapsed);
            self.paused_elapsed = Duration::ZERO;
        }
    }

    pub fn elapsed(&self, clock: &dyn Clock) -> Duration {
        if !self.running {
            Duration::ZERO
        } else if self.paused {
            self.paused_elapsed
        } else {
            clock.now().saturating_sub(self.start)
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn state(&self) -> StopwatchState {
        match (self.running, self.paused) {
            (false, _) => StopwatchState::Stopped,
            (true, true) => StopwatchState::Paused,
            (true, false) => StopwatchState::Running,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn stopped_stopwatch_reports_zero() {
        let clock = ManualClock::new();
        let watch = Stopwatch::new();
        clock.advance(ms(500));
        assert_eq!(watch.elapsed(&clock), Duration::ZERO);
        assert_eq!(watch.state(), StopwatchState::Stopped);
    }

    #[test]
    fn running_stopwatch_tracks_wall_time() {
        let clock = ManualClock::new();
        clock.advance(ms(100));
        let mut watch = Stopwatch::new();
        watch.start(&clock);
        clock.advance(ms(250));
        assert_eq!(watch.elapsed(&clock), ms(250));
        assert_eq!(watch.state(), StopwatchState::Running);
    }

    #[test]
    fn pause_freezes_and_unpause_continues_without_jump() {
        let clock = ManualClock::new();
        let mut watch = Stopwatch::new();
        watch.start(&clock);
        clock.advance(ms(1000));
        watch.pause(&clock);
        let at_pause = watch.elapsed(&clock);
        assert_eq!(at_pause, ms(1000));

        clock.advance(ms(2000));
        assert_eq!(watch.elapsed(&clock), at_pause);

        watch.unpause(&clock);
        assert_eq!(watch.elapsed(&clock), at_pause);
        clock.advance(ms(10));
        assert_eq!(watch.elapsed(&clock), ms(1010));
    }

    #[test]
    fn pause_when_not_running_is_a_no_op() {
        let clock = ManualClock::new();
        let mut watch = Stopwatch::new();
        watch.pause(&clock);
        assert!(!watch.is_paused());
        assert!(!watch.is_running());
    }

    #[test]
    fn unpause_when_running_is_a_no_op() {
        let clock = ManualClock::new();
        let mut watch = Stopwatch::new();
        watch.start(&clock);
        clock.advance(ms(40));
        watch.unpause(&clock);
        assert_eq!(watch.elapsed(&clock), ms(40));
    }

    #[test]
    fn double_pause_keeps_first_frozen_value() {
        let clock = ManualClock::new();
        let mut watch = Stopwatch::new();
        watch.start(&clock);
        clock.advance(ms(30));
        watch.pause(&clock);
        clock.advance(ms(30));
        watch.pause(&clock);
        assert_eq!(watch.elapsed(&clock), ms(30));
    }

    #[test]
    fn start_from_paused_resets_timing() {
        let clock = ManualClock::new();
        let mut watch = Stopwatch::new();
        watch.start(&clock);
        clock.advance(ms(300));
        watch.pause(&clock);
        clock.advance(ms(50));
        watch.start(&clock);
        assert_eq!(watch.state(), StopwatchState::Running);
        assert_eq!(watch.elapsed(&clock), Duration::ZERO);
    }

    #[test]
    fn stop_clears_everything() {
        let clock = ManualClock::new();
        let mut watch = Stopwatch::new();
        watch.start(&clock);
        clock.advance(ms(300));
        watch.pause(&clock);
        watch.stop();
        assert_eq!(watch.state(), StopwatchState::Stopped);
        assert!(!watch.is_paused());
        assert_eq!(watch.elapsed(&clock), Duration::ZERO);
    }

    #[test]
    fn paused_implies_running() {
        let clock = ManualClock::new();
        let mut watch = Stopwatch::new();
        watch.start(&clock);
        watch.pause(&clock);
        assert!(watch.is_paused() && watch.is_running());
        watch.stop();
        assert!(!watch.is_paused());
    }
}

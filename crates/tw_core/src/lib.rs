pub mod animation;
pub mod clock;
pub mod geometry;
pub mod input;
pub mod stopwatch;
pub mod time;

pub use animation::FrameAnimator;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use geometry::Rect;
pub use input::{InputState, Key, KeySnapshot, PointerEvent, TextEdit};
pub use stopwatch::{Stopwatch, StopwatchState};
pub use time::{should_skip_frame, FrameClock, FrameTick};

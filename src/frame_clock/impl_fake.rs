use crate::frame_clock::interface::FrameClock;
use std::time::{Duration, Instant};

/// Advances a fixed step per frame without sleeping.
pub struct FrameClockFake {
    now: Instant,
    step: Duration,
}

impl FrameClockFake {
    pub fn new(step: Duration) -> Self {
        Self {
            now: Instant::now(),
            step,
        }
    }
}

impl FrameClock for FrameClockFake {
    fn next_frame(&mut self) -> Instant {
        self.now += self.step;
        self.now
    }
}

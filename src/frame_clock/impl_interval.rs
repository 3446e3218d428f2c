use crate::frame_clock::interface::FrameClock;
use std::time::{Duration, Instant};

/// Emulates vsync with a fixed refresh period. Missed frames are skipped
/// rather than queued, the way a display drops them.
pub struct FrameClockInterval {
    period: Duration,
    next: Instant,
}

impl FrameClockInterval {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next: Instant::now() + period,
        }
    }
}

impl FrameClock for FrameClockInterval {
    fn next_frame(&mut self) -> Instant {
        let now = Instant::now();
        if now < self.next {
            std::thread::sleep(self.next - now);
        } else if !self.period.is_zero() {
            let behind = now.duration_since(self.next).as_nanos() / self.period.as_nanos();
            // Too far behind to count in periods: restart the grid at now.
            self.next = u32::try_from(behind)
                .ok()
                .and_then(|n| self.period.checked_mul(n))
                .and_then(|skipped| self.next.checked_add(skipped))
                .unwrap_or(now);
        }
        let frame = self.next;
        self.next += self.period;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_land_on_period_boundaries() {
        let period = Duration::from_millis(2);
        let mut clock = FrameClockInterval::new(period);
        let first = clock.next_frame();
        let second = clock.next_frame();
        assert!(second > first);
        assert_eq!(second.duration_since(first).as_nanos() % period.as_nanos(), 0);
        assert!(Instant::now() >= first);
    }

    #[test]
    fn long_stall_does_not_wrap_the_skip_count() {
        let period = Duration::from_nanos(1);
        let mut clock = FrameClockInterval::new(period);
        let Some(stalled) = Instant::now().checked_sub(Duration::from_secs(5)) else {
            return;
        };
        clock.next = stalled;

        let before = Instant::now();
        let frame = clock.next_frame();

        assert!(frame >= before);
    }
}

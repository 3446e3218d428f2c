use std::time::Instant;

/// Display refresh cadence. Each call blocks until the next redraw and
/// returns its timestamp.
pub trait FrameClock {
    fn next_frame(&mut self) -> Instant;
}

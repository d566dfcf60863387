//! Wall-clock frame timing.

use std::time::Instant;

/// Measures the time between successive frames.
///
/// The first [`tick`](Self::tick) returns the time since the timer was created,
/// which at startup is effectively the time since the process began.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    previous: Instant,
    frame_count: u64,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            previous: start,
            frame_count: 0,
        }
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Seconds between the previous tick and `now`. A `now` earlier than the previous tick yields zero.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let delta = now.saturating_duration_since(self.previous).as_secs_f32();
        self.previous = now;
        self.frame_count += 1;
        delta
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

//! Frame timing.
//!
//! The engine ticks its [`Clock`] once per `run`. The measured delta is
//! available to anyone who asks, but systems are still stepped with a delta
//! of 0 and integrate per tick.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Clock {
    startup: Instant,
    frame_start: Instant,
    delta: Duration,
    elapsed: Duration,
    frame_count: u64,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            startup: now,
            frame_start: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Start a new frame.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        self.delta = now.saturating_duration_since(self.frame_start);
        self.frame_start = now;
        self.elapsed = now.saturating_duration_since(self.startup);
        self.frame_count += 1;
    }

    /// Duration of the previous frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Time since the clock was created, as of the last tick.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Estimated FPS from the last delta.
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_measure_delta_and_elapsed() {
        let mut clock = Clock::new();
        let start = clock.startup;
        clock.tick_at(start + Duration::from_millis(16));
        clock.tick_at(start + Duration::from_millis(48));

        assert_eq!(clock.frame_count(), 2);
        assert_eq!(clock.delta(), Duration::from_millis(32));
        assert_eq!(clock.elapsed(), Duration::from_millis(48));
        assert!((clock.fps() - 31.25).abs() < 1e-3);
    }

    #[test]
    fn fresh_clock_reports_zero() {
        let clock = Clock::default();
        assert_eq!(clock.frame_count(), 0);
        assert_eq!(clock.fps(), 0.0);
    }
}

//! Frame clock for the animation loop.
//!
//! # Example
//!
//! ```
//! use galaxy_gen::Clock;
//!
//! let mut clock = Clock::new();
//!
//! // Once per frame:
//! let elapsed = clock.tick();
//! assert_eq!(elapsed, clock.elapsed());
//! ```

use std::time::{Duration, Instant};

/// Elapsed time and a smoothed FPS estimate.
#[derive(Debug)]
pub struct Clock {
    start: Instant,
    elapsed_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_window_start: Instant,
    fps_window: Duration,
}

impl Clock {
    /// Start a clock at the current instant.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            elapsed_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_window_start: now,
            fps_window: Duration::from_millis(500),
        }
    }

    /// Advance to the current instant. Call once per frame.
    ///
    /// Returns seconds since the clock started.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();

        self.elapsed_secs = now.duration_since(self.start).as_secs_f32();
        self.frame_count += 1;

        let window = now.duration_since(self.fps_window_start);
        if window >= self.fps_window {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / window.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_window_start = now;
        }

        self.elapsed_secs
    }

    /// Seconds since the clock started, as of the last tick.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Frames per second, refreshed twice a second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

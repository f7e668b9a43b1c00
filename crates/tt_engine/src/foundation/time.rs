//! Time management utilities
//!
//! [`FixedTimestep`] converts wall-clock frame times into a whole number of
//! fixed simulation ticks. The remainder ("lag") is carried over to the next
//! frame and exposed as an interpolation fraction for rendering.

use std::time::{Duration, Instant};

/// Fixed-timestep accumulator
///
/// Every real frame adds its elapsed time to `lag`. While `lag >= dt` one
/// update tick may run, consuming `dt`. An update never runs with `lag < dt`.
/// There is no clamp on `lag` unless `max_steps_per_frame` is set: if
/// updates cannot keep up the lag grows without bound.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f64,
    lag: f64,
    max_steps_per_frame: Option<u32>,
    steps_this_frame: u32,
    total_ticks: u64,
    frame_count: u64,
}

impl FixedTimestep {
    /// Create an accumulator with the given step in seconds
    ///
    /// Configuration validation guarantees a usable `dt` for engine-created
    /// accumulators.
    ///
    /// # Panics
    ///
    /// If `dt` is not a positive finite number, since stepping would never
    /// consume any lag.
    pub fn new(dt: f64) -> Self {
        assert!(dt.is_finite() && dt > 0.0, "fixed timestep must be positive, got {dt}");
        Self {
            dt,
            lag: 0.0,
            max_steps_per_frame: None,
            steps_this_frame: 0,
            total_ticks: 0,
            frame_count: 0,
        }
    }

    /// Limit the number of ticks per frame, dropping lag beyond the limit
    ///
    /// This deviates from plain accumulation and is off by default.
    #[must_use]
    pub const fn with_max_steps_per_frame(mut self, max_steps: Option<u32>) -> Self {
        self.max_steps_per_frame = max_steps;
        self
    }

    /// Begin a frame by accumulating `elapsed` seconds of wall-clock time
    pub fn advance(&mut self, elapsed: f64) {
        self.lag += elapsed.max(0.0);
        self.steps_this_frame = 0;
        self.frame_count += 1;
    }

    /// Consume one step if enough lag has accumulated
    pub fn should_step(&mut self) -> bool {
        if self.lag < self.dt {
            return false;
        }
        if let Some(max) = self.max_steps_per_frame {
            if self.steps_this_frame >= max {
                let dropped = self.lag - self.lag % self.dt;
                log::warn!(
                    "Update loop fell behind: dropping {:.1}ms after {} ticks",
                    dropped * 1000.0,
                    max
                );
                self.lag -= dropped;
                return false;
            }
        }
        self.lag -= self.dt;
        self.steps_this_frame += 1;
        self.total_ticks += 1;
        true
    }

    /// Fraction of a step that remains after the update spin, in `0.0..1.0`
    pub fn interpolation(&self) -> f64 {
        self.lag / self.dt
    }

    /// The fixed step in seconds
    pub const fn dt(&self) -> f64 {
        self.dt
    }

    /// Time not yet consumed by update ticks
    pub const fn lag(&self) -> f64 {
        self.lag
    }

    /// Ticks run since creation
    pub const fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Ticks run during the current frame
    pub const fn steps_this_frame(&self) -> u32 {
        self.steps_this_frame
    }

    /// Frames started since creation
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Simulated time in seconds
    #[allow(clippy::cast_precision_loss)]
    pub fn sim_time(&self) -> f64 {
        self.total_ticks as f64 * self.dt
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub const fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Reset the stopwatch to zero
    pub fn reset(&mut self) {
        self.start_time = None;
        self.elapsed = Duration::ZERO;
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let running = self.start_time.map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + running
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }

    /// Check if the stopwatch is currently running
    pub const fn is_running(&self) -> bool {
        self.start_time.is_some()
    }
}

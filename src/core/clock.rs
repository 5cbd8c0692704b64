//! Render clock for frame delta timing.

use std::time::Instant;

/// A clock for measuring elapsed time and delta time.
pub struct Clock {
    /// Whether the clock is running.
    running: bool,
    /// Total elapsed time while running.
    elapsed_time: f64,
    /// Monotonic reference point, set on start.
    instant: Option<Instant>,
    /// Time of the last delta query in seconds since start.
    old_time: f64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Create a new clock (not started).
    pub fn new() -> Self {
        Self {
            running: false,
            elapsed_time: 0.0,
            instant: None,
            old_time: 0.0,
        }
    }

    /// Create and start a new clock.
    pub fn start_new() -> Self {
        let mut clock = Self::new();
        clock.start();
        clock
    }

    fn now(&self) -> f64 {
        self.instant
            .map(|i| i.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Start the clock.
    pub fn start(&mut self) {
        self.instant = Some(Instant::now());
        self.old_time = 0.0;
        self.elapsed_time = 0.0;
        self.running = true;
    }

    /// Stop the clock.
    pub fn stop(&mut self) {
        self.get_elapsed_time();
        self.running = false;
    }

    /// Get the elapsed time since the clock started (in seconds).
    pub fn get_elapsed_time(&mut self) -> f64 {
        self.get_delta();
        self.elapsed_time
    }

    /// Get the time since the last call to get_delta (in seconds).
    pub fn get_delta(&mut self) -> f64 {
        if !self.running {
            self.start();
            return 0.0;
        }

        let new_time = self.now();
        let diff = new_time - self.old_time;
        self.old_time = new_time;
        self.elapsed_time += diff;

        diff
    }

    /// Check if the clock is running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_stopped() {
        let clock = Clock::new();
        assert!(!clock.is_running());
    }

    #[test]
    fn test_first_delta_is_zero() {
        let mut clock = Clock::new();
        assert_eq!(clock.get_delta(), 0.0);
        assert!(clock.is_running());
    }
}

//! Application configuration.

/// Configuration for a game run.
#[derive(Debug, Clone)]
pub struct Setting {
    /// Human-readable title, used for log context.
    pub title: String,
    /// Fixed simulation tick duration, in seconds.
    pub seconds_per_update: f32,
    /// Maximum number of simulation ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl Setting {
    /// Create a new setting with the given title and default timing
    /// (100 simulation ticks per second, unlimited run).
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            seconds_per_update: 0.01,
            max_ticks: 0,
        }
    }

    /// Override the fixed simulation tick duration.
    #[must_use]
    pub fn with_seconds_per_update(mut self, seconds: f32) -> Self {
        self.seconds_per_update = seconds;
        self
    }

    /// Bound the run to a fixed number of simulation ticks.
    #[must_use]
    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = ticks;
        self
    }
}

impl Default for Setting {
    fn default() -> Self {
        Self::new("loom")
    }
}

//! Configuration Module
//!
//! Handles loading server and scheduler configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Shortest sleep between eviction ticks, in milliseconds
    pub min_interval_ms: u64,
    /// Longest sleep between eviction ticks, in milliseconds
    pub max_interval_ms: u64,
    /// Look-ahead added to "now" when draining, in microseconds
    pub lookahead_us: u64,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `MIN_INTERVAL_MS` - Minimum eviction tick interval (default: 1)
    /// - `MAX_INTERVAL_MS` - Maximum eviction tick interval (default: 10)
    /// - `LOOKAHEAD_US` - Drain look-ahead buffer (default: 300)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            min_interval_ms: env_or("MIN_INTERVAL_MS", defaults.min_interval_ms),
            max_interval_ms: env_or("MAX_INTERVAL_MS", defaults.max_interval_ms),
            lookahead_us: env_or("LOOKAHEAD_US", defaults.lookahead_us),
        }
    }

    /// Builds the eviction scheduler settings from this configuration.
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::default()
            .with_min_interval(Duration::from_millis(self.min_interval_ms))
            .with_max_interval(Duration::from_millis(self.max_interval_ms))
            .with_lookahead(Duration::from_micros(self.lookahead_us))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            min_interval_ms: 1,
            max_interval_ms: 10,
            lookahead_us: 300,
        }
    }
}

/// Tuning for the adaptive eviction scheduler.
///
/// # Example
///
/// ```rust
/// use rtexp::SchedulerConfig;
/// use std::time::Duration;
///
/// let config = SchedulerConfig::default()
///     .with_min_interval(Duration::from_millis(2))
///     .with_max_interval(Duration::from_millis(50));
/// assert_eq!(config.max_interval, Duration::from_millis(50));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Lower bound on the sleep between ticks (default: 1ms)
    pub min_interval: Duration,
    /// Upper bound on the sleep between ticks (default: 10ms)
    pub max_interval: Duration,
    /// Added to the current time when deciding what is due (default: 300µs)
    pub lookahead: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(1),
            max_interval: Duration::from_millis(10),
            lookahead: Duration::from_micros(300),
        }
    }
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum interval. The maximum is raised to match if needed.
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self.max_interval = self.max_interval.max(interval);
        self
    }

    /// Sets the maximum interval, never below the minimum.
    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval.max(self.min_interval);
        self
    }

    pub fn with_lookahead(mut self, lookahead: Duration) -> Self {
        self.lookahead = lookahead;
        self
    }
}

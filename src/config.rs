//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use crate::cache::DEFAULT_CAPACITY;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of artifacts the map caches
    pub max_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Statistics report interval in seconds
    pub stats_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cached artifacts (default: 500)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STATS_INTERVAL` - Statistics report frequency in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env::var("MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.max_entries),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            stats_interval: env::var("STATS_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &u64| n > 0)
                .unwrap_or(defaults.stats_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CAPACITY,
            server_port: 3000,
            stats_interval: 30,
        }
    }
}

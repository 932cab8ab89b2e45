//! Run configuration
//!
//! Loaded from an optional TOML file; every key falls back to its default and
//! command line flags override on top via the `with_*` builders.

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default delay between slot dispatches in milliseconds
const DEFAULT_DELAY_MS: u64 = 50;

/// Default probe target host
const DEFAULT_DOMAIN: &str = "sixflags.com";

/// Default probe timeout in milliseconds
const DEFAULT_TIMEOUT_MS: u64 = 50_000;

const DEFAULT_GOOD_MS: u64 = 1000;
const DEFAULT_BAD_MS: u64 = 5000;

/// Latency display boundaries in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Anything faster than this is good
    pub good: u64,
    /// Anything at or above this is bad
    pub bad: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            good: DEFAULT_GOOD_MS,
            bad: DEFAULT_BAD_MS,
        }
    }
}

/// Probe run configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Milliseconds between successive dispatches within a batch
    pub delay: u64,
    /// Host every probe requests through its proxy
    pub domain: String,
    /// Milliseconds before a probe counts as failed
    pub timeout: u64,
    pub thresholds: Thresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY_MS,
            domain: DEFAULT_DOMAIN.to_string(),
            timeout: DEFAULT_TIMEOUT_MS,
            thresholds: Thresholds::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay = delay_ms;
        self
    }

    pub fn with_domain(mut self, domain: String) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = timeout_ms;
        self
    }

    pub fn with_good_threshold(mut self, good_ms: u64) -> Self {
        self.thresholds.good = good_ms;
        self
    }

    pub fn with_bad_threshold(mut self, bad_ms: u64) -> Self {
        self.thresholds.bad = bad_ms;
        self
    }

    pub fn delay_duration(&self) -> Duration {
        Duration::from_millis(self.delay)
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// URL every probe requests
    pub fn target_url(&self) -> String {
        format!("http://{}/", self.domain)
    }

    /// Reject values no run could use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain.trim().is_empty() {
            return Err(ConfigError::EmptyDomain);
        }
        if self.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.thresholds.good > self.thresholds.bad {
            return Err(ConfigError::Thresholds {
                good: self.thresholds.good,
                bad: self.thresholds.bad,
            });
        }
        Ok(())
    }
}

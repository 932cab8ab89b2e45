//! Proxy data models

use crate::config::Thresholds;
use std::fmt;

/// Proxy authentication credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

impl ProxyAuth {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }
}

/// A single parsed proxy line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRecord {
    pub host: String,
    pub port: u16,
    pub auth: Option<ProxyAuth>,
}

impl ProxyRecord {
    /// Create a proxy record without authentication
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            auth: None,
        }
    }

    /// Create a proxy record with authentication
    pub fn with_auth(host: String, port: u16, username: String, password: String) -> Self {
        Self {
            host,
            port,
            auth: Some(ProxyAuth::new(username, password)),
        }
    }

    pub fn user(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.username.as_str())
    }

    pub fn pass(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.password.as_str())
    }

    /// Proxy URL without credentials; those travel as basic auth
    pub fn url(&self) -> String {
        format!("http://{}", self.label())
    }

    /// `host:port`, the label shown on the status board
    pub fn label(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for ProxyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Whether a probe reached the target at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Success,
    Failure,
}

/// Display class for latency and status text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeClass {
    Good,
    Neutral,
    Bad,
}

impl TimeClass {
    /// Bucket an elapsed time: `[0, good)` good, `[good, bad)` neutral, `[bad, ..)` bad
    pub fn classify(elapsed_ms: u64, thresholds: &Thresholds) -> Self {
        if elapsed_ms < thresholds.good {
            TimeClass::Good
        } else if elapsed_ms < thresholds.bad {
            TimeClass::Neutral
        } else {
            TimeClass::Bad
        }
    }
}

/// Final result of one slot's probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// 1-based slot within the batch
    pub slot: usize,
    pub classification: Classification,
    /// Status code for successes, error text for failures
    pub code_or_message: String,
    pub elapsed_ms: Option<u64>,
}

impl ProbeOutcome {
    pub fn success(slot: usize, status: u16, elapsed_ms: u64) -> Self {
        Self {
            slot,
            classification: Classification::Success,
            code_or_message: status.to_string(),
            elapsed_ms: Some(elapsed_ms),
        }
    }

    pub fn failure(slot: usize, message: String, elapsed_ms: u64) -> Self {
        Self {
            slot,
            classification: Classification::Failure,
            code_or_message: message,
            elapsed_ms: Some(elapsed_ms),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.classification, Classification::Success)
    }

    /// Only 2xx responses get the good message style
    pub fn message_class(&self) -> TimeClass {
        let ok = self.is_success()
            && self
                .code_or_message
                .parse::<u16>()
                .map_or(false, |code| (200..300).contains(&code));
        if ok {
            TimeClass::Good
        } else {
            TimeClass::Bad
        }
    }
}

//! Error types for configuration, parsing and planning failures
//!
//! These are the only errors that abort a run. Probe failures never show up
//! here; they become a `ProbeOutcome` for their slot.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid or unreadable configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path:?}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    #[error("good threshold ({good}ms) must not exceed bad threshold ({bad}ms)")]
    Thresholds { good: u64, bad: u64 },
    #[error("target domain must not be empty")]
    EmptyDomain,
    #[error("{rows} rows plus the done marker do not fit a terminal {height} rows high")]
    RowsExceedTerminal { rows: usize, height: u16 },
}

/// Malformed proxy list line
///
/// Blank lines anywhere in the list and lines starting with `#` are skipped
/// and never produce one of these. Every other line must be well formed, and
/// the first one that is not fails the whole list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: expected host:port or host:port:user:pass, got {fields} field(s)")]
    FieldCount { line: usize, fields: usize },
    #[error("line {line}: missing host")]
    MissingHost { line: usize },
    #[error("line {line}: invalid port {port:?}")]
    InvalidPort { line: usize, port: String },
}

/// Unusable batch planning input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("display capacity must be at least one row")]
    InvalidCapacity,
}

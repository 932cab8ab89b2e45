//! Proxy Board - batched proxy reachability checker
//!
//! Probes a list of HTTP proxies against one target host and shows live
//! per-proxy status on a fixed-height board, one screenful at a time.

pub mod batch;
pub mod config;
pub mod error;
pub mod logging;
pub mod proxy;
pub mod tui;

pub use batch::*;
pub use config::{Config, Thresholds};
pub use error::{ConfigError, ParseError, PlanError};
pub use proxy::*;

/// Application result type
pub type Result<T> = anyhow::Result<T>;

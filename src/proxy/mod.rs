//! Proxy module for parsing and probing proxies
//!
//! This module provides functionality for:
//! - Parsing proxy lists (IP:PORT, IP:PORT:USER:PASS)
//! - Probing a target host through a proxy
//! - The records and outcomes passed between them

pub mod checker;
pub mod models;
pub mod parser;

pub use checker::{HttpProbe, ProbeClient, ProbeConfig, ProbeError, ProbeReply};
pub use models::{Classification, ProbeOutcome, ProxyAuth, ProxyRecord, TimeClass};
pub use parser::ProxyParser;

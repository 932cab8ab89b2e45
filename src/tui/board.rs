//! Status board abstraction and the lines written to it

use crate::config::Thresholds;
use crate::proxy::{ProbeOutcome, ProxyRecord, TimeClass};
use crate::Result;
use std::fmt;

/// Text written on the row below the last slot once every batch is done
pub const DONE_MARKER: &str = "Done";

/// Message shown while a slot's probe is in flight
pub const RUNNING_MESSAGE: &str = "Running...";

/// One row of the status board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// 1-based slot, row `slot - 1`
    pub slot: usize,
    /// Proxy address without credentials
    pub label: String,
    pub message: String,
    pub elapsed_ms: Option<u64>,
    pub time_class: Option<TimeClass>,
    pub message_class: Option<TimeClass>,
}

impl StatusLine {
    /// Line for a slot whose probe was just dispatched
    pub fn running(slot: usize, proxy: &ProxyRecord) -> Self {
        Self {
            slot,
            label: proxy.label(),
            message: RUNNING_MESSAGE.to_string(),
            elapsed_ms: None,
            time_class: None,
            message_class: None,
        }
    }

    /// Line for a settled probe
    pub fn settled(outcome: &ProbeOutcome, proxy: &ProxyRecord, thresholds: &Thresholds) -> Self {
        Self {
            slot: outcome.slot,
            label: proxy.label(),
            message: outcome.code_or_message.clone(),
            elapsed_ms: outcome.elapsed_ms,
            time_class: outcome
                .elapsed_ms
                .map(|ms| TimeClass::classify(ms, thresholds)),
            message_class: Some(outcome.message_class()),
        }
    }

    /// Zero-based display row
    pub fn row(&self) -> usize {
        self.slot.saturating_sub(1)
    }

    /// `0001 - host:port`
    pub fn index_text(&self) -> String {
        format!("{:04} - {}", self.slot, self.label)
    }

    /// Elapsed seconds with millisecond precision
    pub fn elapsed_text(&self) -> Option<String> {
        self.elapsed_ms
            .map(|ms| format!("{:.3}s", ms as f64 / 1000.0))
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index_text())?;
        if let Some(elapsed) = self.elapsed_text() {
            write!(f, "  {}", elapsed)?;
        }
        write!(f, "  {}", self.message)
    }
}

/// Fixed-height display the scheduler reports into.
///
/// Rows are addressed by slot and reused from one batch to the next, so a
/// `reset` must separate batches.
pub trait StatusBoard {
    /// Write or restyle the row for `line.slot`
    fn write_row(&mut self, line: &StatusLine) -> Result<()>;

    /// Clear every row and return to the first one
    fn reset(&mut self) -> Result<()>;

    /// Write the terminal marker below the last slot row
    fn finish(&mut self, marker: &str) -> Result<()>;
}

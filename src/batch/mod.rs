//! Batched probing
//!
//! - Planning the proxy list into display-sized batches
//! - Running one batch with staggered dispatch
//! - Sequencing batches until the list is exhausted

pub mod planner;
pub mod run_loop;
pub mod scheduler;

pub use planner::{plan_batches, Batch};
pub use run_loop::{RunLoop, RunPhase, RunSummary};
pub use scheduler::{BatchReport, BatchRun, ProbeScheduler};

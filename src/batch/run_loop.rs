//! Run loop: drives the scheduler across every batch in order

use crate::batch::planner::Batch;
use crate::batch::scheduler::{BatchReport, ProbeScheduler};
use crate::proxy::ProbeClient;
use crate::tui::{StatusBoard, DONE_MARKER};
use crate::Result;
use tracing::{debug, info};

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    /// Slots of batch `k` are still being dispatched
    BatchRunning(usize),
    /// Every slot of batch `k` is dispatched; waiting for the rest to settle
    BatchSettling(usize),
    Terminated,
}

/// Totals over a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub batches: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, report: &BatchReport) {
        self.batches += 1;
        self.succeeded += report.succeeded();
        self.failed += report.failed();
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

#[derive(Debug)]
struct PhaseLog {
    current: RunPhase,
    history: Vec<RunPhase>,
}

impl PhaseLog {
    fn enter(&mut self, phase: RunPhase) {
        debug!(?phase, "run phase");
        self.current = phase;
        self.history.push(phase);
    }
}

/// Sequences batches: run, settle, reset the board, next, until done
pub struct RunLoop<P> {
    scheduler: ProbeScheduler<P>,
    phases: PhaseLog,
}

impl<P: ProbeClient> RunLoop<P> {
    pub fn new(scheduler: ProbeScheduler<P>) -> Self {
        Self {
            scheduler,
            phases: PhaseLog {
                current: RunPhase::Idle,
                history: vec![RunPhase::Idle],
            },
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phases.current
    }

    /// Every phase entered so far, starting with `Idle`
    pub fn history(&self) -> &[RunPhase] {
        &self.phases.history
    }

    /// Run every batch in order. Batch `k + 1` never starts before every
    /// slot of batch `k` has settled; the board is reset in between and gets
    /// the done marker at the end.
    pub async fn run_all<B: StatusBoard>(
        &mut self,
        batches: &[Batch],
        board: &mut B,
    ) -> Result<RunSummary> {
        if self.phases.current != RunPhase::Idle {
            anyhow::bail!("run loop already used ({:?})", self.phases.current);
        }

        let scheduler = &self.scheduler;
        let mut summary = RunSummary::default();

        for (k, batch) in batches.iter().enumerate() {
            self.phases.enter(RunPhase::BatchRunning(k));
            let mut run = scheduler.start(batch);
            run.dispatch_all(board).await?;

            self.phases.enter(RunPhase::BatchSettling(k));
            let report = run.settle(board).await?;
            summary.record(&report);

            if k + 1 < batches.len() {
                board.reset()?;
            }
        }

        board.finish(DONE_MARKER)?;
        self.phases.enter(RunPhase::Terminated);
        info!(
            batches = summary.batches,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "run complete"
        );
        Ok(summary)
    }
}

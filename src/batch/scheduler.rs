//! Probe scheduler: runs one batch to completion
//!
//! Slot `i` is dispatched `i × delay` after the batch starts. Every probe of
//! the batch is a future in one `FuturesUnordered` driven by the calling task,
//! so the per-batch state needs no locking. The batch is complete when the
//! last outcome has been observed, whatever order the probes finish in.

use crate::batch::planner::Batch;
use crate::config::{Config, Thresholds};
use crate::proxy::{ProbeClient, ProbeOutcome, ProbeReply};
use crate::tui::{StatusBoard, StatusLine};
use crate::Result;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

type InFlight<'a> = FuturesUnordered<BoxFuture<'a, (usize, ProbeReply)>>;

/// Outcomes of one settled batch, in completion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub batch: usize,
    pub outcomes: Vec<ProbeOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Dispatches the probes of a batch at a fixed stagger
pub struct ProbeScheduler<P> {
    probe: P,
    delay: Duration,
    thresholds: Thresholds,
}

impl<P: ProbeClient> ProbeScheduler<P> {
    pub fn new(probe: P, delay: Duration, thresholds: Thresholds) -> Self {
        Self {
            probe,
            delay,
            thresholds,
        }
    }

    pub fn from_config(probe: P, config: &Config) -> Self {
        Self::new(probe, config.delay_duration(), config.thresholds)
    }

    /// Begin a batch; the clock for the stagger starts now
    pub fn start<'a>(&'a self, batch: &'a Batch) -> BatchRun<'a, P> {
        info!(batch = batch.index(), size = batch.len(), "batch started");
        BatchRun {
            scheduler: self,
            batch,
            started_at: Instant::now(),
            dispatched_at: vec![None; batch.len()],
            next_slot: 1,
            in_flight: FuturesUnordered::new(),
            outcomes: Vec::with_capacity(batch.len()),
        }
    }

    /// Run a whole batch; resolves once every slot has settled
    pub async fn run_batch<B: StatusBoard>(
        &self,
        batch: &Batch,
        board: &mut B,
    ) -> Result<BatchReport> {
        let mut run = self.start(batch);
        run.dispatch_all(board).await?;
        run.settle(board).await
    }
}

/// State of one batch in progress, owned by a single scheduler invocation
pub struct BatchRun<'a, P> {
    scheduler: &'a ProbeScheduler<P>,
    batch: &'a Batch,
    started_at: Instant,
    /// Dispatch timestamp per slot, index `slot - 1`
    dispatched_at: Vec<Option<Instant>>,
    /// Next 1-based slot to dispatch
    next_slot: usize,
    in_flight: InFlight<'a>,
    outcomes: Vec<ProbeOutcome>,
}

impl<'a, P: ProbeClient> BatchRun<'a, P> {
    /// Every slot has been dispatched
    pub fn is_dispatched(&self) -> bool {
        self.next_slot > self.batch.len()
    }

    pub fn completed(&self) -> usize {
        self.outcomes.len()
    }

    /// Every slot has produced its outcome
    pub fn is_settled(&self) -> bool {
        self.completed() == self.batch.len()
    }

    fn deadline(&self, slot: usize) -> Instant {
        self.started_at + self.scheduler.delay * slot as u32
    }

    /// Dispatch the remaining slots on schedule, rendering any probe that
    /// settles in the meantime. Returns once the last slot is dispatched.
    pub async fn dispatch_all<B: StatusBoard>(&mut self, board: &mut B) -> Result<()> {
        while !self.is_dispatched() {
            let deadline = self.deadline(self.next_slot);
            tokio::select! {
                _ = sleep_until(deadline) => self.dispatch(board)?,
                Some((slot, reply)) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.record(slot, reply, board)?;
                }
            }
        }
        Ok(())
    }

    /// Wait for every in-flight probe and hand back the batch report
    pub async fn settle<B: StatusBoard>(mut self, board: &mut B) -> Result<BatchReport> {
        if !self.is_dispatched() {
            self.dispatch_all(board).await?;
        }
        while let Some((slot, reply)) = self.in_flight.next().await {
            self.record(slot, reply, board)?;
        }
        debug_assert!(self.is_settled());

        let report = BatchReport {
            batch: self.batch.index(),
            outcomes: self.outcomes,
        };
        info!(
            batch = report.batch,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "batch settled"
        );
        Ok(report)
    }

    fn dispatch<B: StatusBoard>(&mut self, board: &mut B) -> Result<()> {
        let slot = self.next_slot;
        let batch: &'a Batch = self.batch;
        let scheduler: &'a ProbeScheduler<P> = self.scheduler;
        let Some(proxy) = batch.slot(slot) else {
            anyhow::bail!("slot {} outside batch of {}", slot, batch.len());
        };

        board.write_row(&StatusLine::running(slot, proxy))?;
        self.dispatched_at[slot - 1] = Some(Instant::now());
        self.next_slot += 1;
        debug!(batch = batch.index(), slot, proxy = %proxy, "probe dispatched");

        let probe = scheduler.probe.probe(proxy);
        self.in_flight.push(async move { (slot, probe.await) }.boxed());
        Ok(())
    }

    fn record<B: StatusBoard>(
        &mut self,
        slot: usize,
        reply: ProbeReply,
        board: &mut B,
    ) -> Result<()> {
        let Some(proxy) = self.batch.slot(slot) else {
            anyhow::bail!("slot {} outside batch of {}", slot, self.batch.len());
        };
        let elapsed_ms = self.dispatched_at[slot - 1]
            .map(|at| u64::try_from(at.elapsed().as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();

        let outcome = match reply {
            Ok(status) => ProbeOutcome::success(slot, status, elapsed_ms),
            Err(e) => ProbeOutcome::failure(slot, e.display_message(), elapsed_ms),
        };
        debug!(
            batch = self.batch.index(),
            slot,
            elapsed_ms,
            result = %outcome.code_or_message,
            "probe settled"
        );

        board.write_row(&StatusLine::settled(&outcome, proxy, &self.scheduler.thresholds))?;
        self.outcomes.push(outcome);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::proxy::{ProbeClient, ProbeError, ProbeReply, ProxyRecord};
    use futures::future::{BoxFuture, FutureExt};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Probe whose latency and reply are scripted per host
    #[derive(Default)]
    pub struct ScriptedProbe {
        script: HashMap<String, (Duration, ProbeReply)>,
        default_latency: Duration,
        pub calls: AtomicUsize,
    }

    impl ScriptedProbe {
        pub fn new(default_latency: Duration) -> Self {
            Self {
                default_latency,
                ..Default::default()
            }
        }

        pub fn respond(mut self, host: &str, latency_ms: u64, status: u16) -> Self {
            self.script
                .insert(host.to_string(), (Duration::from_millis(latency_ms), Ok(status)));
            self
        }

        pub fn fail(mut self, host: &str, latency_ms: u64, error: ProbeError) -> Self {
            self.script
                .insert(host.to_string(), (Duration::from_millis(latency_ms), Err(error)));
            self
        }
    }

    impl ProbeClient for ScriptedProbe {
        fn probe<'a>(&'a self, proxy: &'a ProxyRecord) -> BoxFuture<'a, ProbeReply> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (latency, reply) = self
                .script
                .get(&proxy.host)
                .cloned()
                .unwrap_or((self.default_latency, Ok(200)));
            async move {
                tokio::time::sleep(latency).await;
                reply
            }
            .boxed()
        }
    }

    pub fn proxies(n: usize) -> Vec<ProxyRecord> {
        (1..=n)
            .map(|i| ProxyRecord::new(format!("10.0.0.{}", i), 8080))
            .collect()
    }
}

//! Off-thread query dispatch for interactive front ends.
//!
//! A session runs at most one query at a time. `submit` returns immediately
//! with a [`PendingQuery`]; the outcome is delivered exactly once through it.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

use crate::{
    error::{PipelineOutcome, QueryError},
    model::PlaceName,
    pipeline::WeatherPipeline,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("A weather query is already in progress")]
pub struct SessionBusy;

#[derive(Debug, Clone)]
pub struct QuerySession {
    pipeline: Arc<WeatherPipeline>,
    pending: Arc<AtomicBool>,
}

/// Handle to a query running on the runtime.
#[derive(Debug)]
pub struct PendingQuery {
    rx: oneshot::Receiver<PipelineOutcome>,
}

/// Owned by the worker. Frees the session and then delivers exactly one
/// outcome, including when the worker unwinds.
struct Delivery {
    pending: Arc<AtomicBool>,
    tx: Option<oneshot::Sender<PipelineOutcome>>,
}

impl Delivery {
    fn finish(&mut self, outcome: PipelineOutcome) {
        self.pending.store(false, Ordering::Release);
        if let Some(tx) = self.tx.take() {
            // Receiver may have been dropped; the outcome is then discarded.
            let _ = tx.send(outcome);
        }
    }
}

impl Drop for Delivery {
    fn drop(&mut self) {
        if self.tx.is_some() {
            self.finish(Err(worker_stopped()));
        }
    }
}

fn worker_stopped() -> QueryError {
    QueryError::Network("query worker stopped before delivering an outcome".into())
}

impl QuerySession {
    pub fn new(pipeline: WeatherPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Start a query on the current tokio runtime.
    ///
    /// Must be called from within a runtime context.
    pub fn submit(&self, place: PlaceName) -> Result<PendingQuery, SessionBusy> {
        if self
            .pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(%place, "rejected query while another is pending");
            return Err(SessionBusy);
        }

        let (tx, rx) = oneshot::channel();
        let mut delivery = Delivery { pending: Arc::clone(&self.pending), tx: Some(tx) };
        let pipeline = Arc::clone(&self.pipeline);

        tokio::spawn(async move {
            let outcome = pipeline.query(&place).await;
            delivery.finish(outcome);
        });

        Ok(PendingQuery { rx })
    }
}

impl PendingQuery {
    pub async fn outcome(self) -> PipelineOutcome {
        self.rx.await.unwrap_or_else(|_| Err(worker_stopped()))
    }
}

//! Scoring queue — decouples "applicant submitted" from "applicant scored".
//!
//! The queue is a deployment-time indirection, not a behavioral fork: the
//! dispatcher either submits to the worker pool or invokes the same
//! `ApplicantProcessor` inline when async scoring is disabled. A failed job
//! may be re-submitted at any time; the keyed score upsert makes
//! reprocessing safe.

pub mod worker;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::scoring::orchestrator::{ApplicantProcessor, ScoreOutcome};

/// Payload of one scoring job.
#[derive(Debug, Clone, Copy)]
pub struct ScoringJob {
    pub applicant_id: Uuid,
}

/// Producer side of the scoring queue. Delivery is at-least-once and may be
/// out of order; consumers tolerate both.
#[async_trait]
pub trait ScoringQueue: Send + Sync {
    async fn submit(&self, job: ScoringJob) -> Result<(), AppError>;
}

/// In-process queue over a tokio channel; the worker pool owns the receiver.
pub struct InMemoryQueue {
    tx: mpsc::UnboundedSender<ScoringJob>,
}

impl InMemoryQueue {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ScoringJob>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl ScoringQueue for InMemoryQueue {
    async fn submit(&self, job: ScoringJob) -> Result<(), AppError> {
        self.tx
            .send(job)
            .map_err(|_| AppError::Queue("scoring worker pool is not running".to_string()))
    }
}

/// Pushed to real-time listeners when an applicant's score lands.
/// Fire-and-forget: no acknowledgment, no delivery guarantee.
#[derive(Debug, Clone, Serialize)]
pub struct RankUpdateEvent {
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub score: f64,
    pub rank: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

impl From<&ScoreOutcome> for RankUpdateEvent {
    fn from(outcome: &ScoreOutcome) -> Self {
        RankUpdateEvent {
            job_id: outcome.job_id,
            applicant_id: outcome.applicant_id,
            score: outcome.final_score,
            rank: outcome.rank,
            timestamp: Utc::now(),
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit_rank_update(&self, event: RankUpdateEvent);
}

/// Default sink: structured log line for the push channel to pick up.
pub struct LoggingEventSink;

impl EventSink for LoggingEventSink {
    fn emit_rank_update(&self, event: RankUpdateEvent) {
        info!(
            job_id = %event.job_id,
            applicant_id = %event.applicant_id,
            score = event.score,
            rank = ?event.rank,
            "rank_update"
        );
    }
}

/// Where a dispatched submission ended up.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Accepted onto the queue; a worker will score it.
    Queued,
    /// Scored inline on the caller (async scoring disabled).
    Completed(ScoreOutcome),
}

/// Routes submissions to the queue, or straight through the processor when
/// asynchronous scoring is administratively disabled.
pub struct Dispatcher {
    processor: Arc<dyn ApplicantProcessor>,
    queue: Option<Arc<dyn ScoringQueue>>,
    events: Arc<dyn EventSink>,
}

impl Dispatcher {
    pub fn new(
        processor: Arc<dyn ApplicantProcessor>,
        queue: Option<Arc<dyn ScoringQueue>>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            processor,
            queue,
            events,
        }
    }

    pub async fn dispatch(&self, applicant_id: Uuid) -> Result<DispatchOutcome, AppError> {
        match &self.queue {
            Some(queue) => {
                queue.submit(ScoringJob { applicant_id }).await?;
                Ok(DispatchOutcome::Queued)
            }
            None => {
                let outcome = self.processor.process_applicant(applicant_id).await?;
                self.events.emit_rank_update(RankUpdateEvent::from(&outcome));
                Ok(DispatchOutcome::Completed(outcome))
            }
        }
    }
}

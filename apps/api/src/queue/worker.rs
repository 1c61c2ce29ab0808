//! Bounded worker pool for scoring jobs.
//!
//! At most `max_concurrent` jobs run at once (semaphore) and job starts are
//! globally throttled by a token bucket (`jobs_per_sec`), which keeps a bulk
//! import from hammering the AI collaborator. A job failure is logged with
//! the applicant id and marks only that job failed; the pool keeps running.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, Mutex, Semaphore};
use tracing::{debug, error, info};

use crate::queue::{EventSink, RankUpdateEvent, ScoringJob};
use crate::scoring::orchestrator::ApplicantProcessor;

/// Token bucket: capacity of one second's worth of job starts, refilled
/// continuously.
struct TokenBucket {
    tokens: f64,
    max_tokens: f64,
    refill_rate: f64, // tokens per second
    last_refill: Instant,
}

impl TokenBucket {
    fn new(rate_per_sec: f64) -> Self {
        Self {
            tokens: rate_per_sec,
            max_tokens: rate_per_sec,
            refill_rate: rate_per_sec,
            last_refill: Instant::now(),
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.max_tokens);
        self.last_refill = now;
    }

    fn try_acquire(&mut self) -> bool {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn time_to_acquire(&mut self) -> Duration {
        self.refill();
        if self.tokens >= 1.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64((1.0 - self.tokens) / self.refill_rate)
        }
    }
}

/// Async wrapper around the bucket; `acquire` sleeps until a job start slot
/// is available.
struct JobRateLimiter {
    bucket: Mutex<TokenBucket>,
}

impl JobRateLimiter {
    fn new(rate_per_sec: f64) -> Self {
        Self {
            bucket: Mutex::new(TokenBucket::new(rate_per_sec)),
        }
    }

    async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                if bucket.try_acquire() {
                    return;
                }
                bucket.time_to_acquire()
            };
            debug!(wait_ms = wait.as_millis(), "Rate limited: delaying job start");
            tokio::time::sleep(wait).await;
        }
    }
}

pub struct WorkerPool {
    processor: Arc<dyn ApplicantProcessor>,
    events: Arc<dyn EventSink>,
    semaphore: Arc<Semaphore>,
    limiter: Arc<JobRateLimiter>,
}

impl WorkerPool {
    pub fn new(
        processor: Arc<dyn ApplicantProcessor>,
        events: Arc<dyn EventSink>,
        max_concurrent: usize,
        jobs_per_sec: f64,
    ) -> Self {
        Self {
            processor,
            events,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            limiter: Arc::new(JobRateLimiter::new(jobs_per_sec)),
        }
    }

    /// Consumes the queue until the sender side is dropped. Each job:
    /// queued → processing → completed | failed.
    pub fn spawn(self, rx: mpsc::UnboundedReceiver<ScoringJob>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run(rx))
    }

    async fn run(self, mut rx: mpsc::UnboundedReceiver<ScoringJob>) {
        info!("Scoring worker pool started");
        while let Some(job) = rx.recv().await {
            self.limiter.acquire().await;
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .expect("worker semaphore closed");

            let processor = self.processor.clone();
            let events = self.events.clone();
            tokio::spawn(async move {
                let _permit = permit;
                let applicant_id = job.applicant_id;
                debug!(%applicant_id, "scoring job processing");
                match processor.process_applicant(applicant_id).await {
                    Ok(outcome) => {
                        events.emit_rank_update(RankUpdateEvent::from(&outcome));
                        info!(%applicant_id, score = outcome.final_score, "scoring job completed");
                    }
                    Err(e) => {
                        // The applicant was rolled back to `received` by the
                        // orchestrator; an operator or retry policy may
                        // re-submit at any time.
                        error!(%applicant_id, "scoring job failed: {e}");
                    }
                }
            });
        }
        info!("Scoring queue closed, worker pool shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::queue::InMemoryQueue;
    use crate::scoring::orchestrator::ScoreOutcome;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use uuid::Uuid;

    struct TrackingProcessor {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        processed: AtomicUsize,
        fail_for: Option<Uuid>,
        delay: Duration,
    }

    impl TrackingProcessor {
        fn new(delay: Duration, fail_for: Option<Uuid>) -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                processed: AtomicUsize::new(0),
                fail_for,
                delay,
            }
        }
    }

    #[async_trait]
    impl ApplicantProcessor for TrackingProcessor {
        async fn process_applicant(&self, applicant_id: Uuid) -> Result<ScoreOutcome, AppError> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.processed.fetch_add(1, Ordering::SeqCst);

            if self.fail_for == Some(applicant_id) {
                return Err(AppError::Queue("boom".to_string()));
            }
            Ok(ScoreOutcome {
                job_id: Uuid::new_v4(),
                applicant_id,
                final_score: 50.0,
                rank: Some(1),
            })
        }
    }

    #[derive(Default)]
    struct CollectingSink {
        events: StdMutex<Vec<RankUpdateEvent>>,
    }

    impl EventSink for CollectingSink {
        fn emit_rank_update(&self, event: RankUpdateEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    async fn wait_for(processor: &TrackingProcessor, count: usize) {
        for _ in 0..200 {
            if processor.processed.load(Ordering::SeqCst) >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "workers processed {} of {count} jobs",
            processor.processed.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn pool_never_exceeds_concurrency_bound() {
        let processor = Arc::new(TrackingProcessor::new(Duration::from_millis(30), None));
        let sink = Arc::new(CollectingSink::default());
        let (queue, rx) = InMemoryQueue::channel();
        let pool = WorkerPool::new(processor.clone(), sink, 3, 1000.0);
        let handle = pool.spawn(rx);

        use crate::queue::ScoringQueue;
        for _ in 0..12 {
            queue
                .submit(ScoringJob {
                    applicant_id: Uuid::new_v4(),
                })
                .await
                .unwrap();
        }

        wait_for(&processor, 12).await;
        assert!(processor.max_in_flight.load(Ordering::SeqCst) <= 3);
        drop(queue);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn failed_job_does_not_stop_the_pool_or_emit_an_event() {
        let failing_id = Uuid::new_v4();
        let processor = Arc::new(TrackingProcessor::new(
            Duration::from_millis(1),
            Some(failing_id),
        ));
        let sink = Arc::new(CollectingSink::default());
        let (queue, rx) = InMemoryQueue::channel();
        let pool = WorkerPool::new(processor.clone(), sink.clone(), 2, 1000.0);
        let handle = pool.spawn(rx);

        use crate::queue::ScoringQueue;
        let ok_id = Uuid::new_v4();
        queue
            .submit(ScoringJob {
                applicant_id: failing_id,
            })
            .await
            .unwrap();
        queue
            .submit(ScoringJob {
                applicant_id: ok_id,
            })
            .await
            .unwrap();

        wait_for(&processor, 2).await;
        drop(queue);
        handle.await.unwrap();

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].applicant_id, ok_id);
    }

    #[tokio::test]
    async fn successful_jobs_emit_rank_updates() {
        let processor = Arc::new(TrackingProcessor::new(Duration::from_millis(1), None));
        let sink = Arc::new(CollectingSink::default());
        let (queue, rx) = InMemoryQueue::channel();
        let pool = WorkerPool::new(processor.clone(), sink.clone(), 5, 1000.0);
        let handle = pool.spawn(rx);

        use crate::queue::ScoringQueue;
        for _ in 0..4 {
            queue
                .submit(ScoringJob {
                    applicant_id: Uuid::new_v4(),
                })
                .await
                .unwrap();
        }

        wait_for(&processor, 4).await;
        drop(queue);
        handle.await.unwrap();
        assert_eq!(sink.events.lock().unwrap().len(), 4);
    }

    #[test]
    fn token_bucket_enforces_rate() {
        let mut bucket = TokenBucket::new(10.0);
        // Full burst available immediately.
        for _ in 0..10 {
            assert!(bucket.try_acquire());
        }
        // Bucket drained; next slot is ~100ms out.
        assert!(!bucket.try_acquire());
        let wait = bucket.time_to_acquire();
        assert!(wait > Duration::from_millis(50) && wait <= Duration::from_millis(150));
    }

    #[tokio::test]
    async fn rate_limiter_spaces_out_acquisitions() {
        let limiter = JobRateLimiter::new(50.0);
        let start = Instant::now();
        // Burst of 50 is free; the next 5 must wait ~20ms each.
        for _ in 0..55 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() >= Duration::from_millis(80));
    }
}

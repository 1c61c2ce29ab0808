//! Narrow, per-entity repository contracts. The orchestrator and ranking
//! updater depend on these traits rather than on a database handle, so tests
//! substitute in-memory fakes.

pub mod pg;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::applicant::{ApplicantRow, ApplicantStatus};
use crate::models::assessment::AssessmentRow;
use crate::models::job::JobRow;
use crate::models::score::{ScoreRow, ScoreUpsert};

#[async_trait]
pub trait ApplicantRepo: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<ApplicantRow>, AppError>;
    async fn set_status(&self, id: Uuid, status: ApplicantStatus) -> Result<(), AppError>;
}

#[async_trait]
pub trait JobRepo: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<JobRow>, AppError>;
}

#[async_trait]
pub trait AssessmentRepo: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<AssessmentRow>, AppError>;
    async fn find_for_applicant(
        &self,
        applicant_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<AssessmentRow>, AppError>;
    /// Records a graded submission: answers, score, completion timestamp.
    async fn save_submission(
        &self,
        id: Uuid,
        answers: &Value,
        score: f64,
        finished_at: DateTime<Utc>,
    ) -> Result<(), AppError>;
}

#[async_trait]
pub trait ScoreRepo: Send + Sync {
    /// Keyed create-or-update on (applicant_id, job_id). Reprocessing an
    /// applicant overwrites; review status resets to `pending`.
    async fn upsert(&self, score: &ScoreUpsert) -> Result<(), AppError>;
    async fn find_for_applicant(
        &self,
        applicant_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<ScoreRow>, AppError>;
    /// All scores for a job, ordered by creation time ascending. The ranking
    /// updater relies on this order for stable tie-breaking.
    async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<ScoreRow>, AppError>;
    async fn set_ranking(&self, score_id: Uuid, rank: i32, percentile: i32)
        -> Result<(), AppError>;
}

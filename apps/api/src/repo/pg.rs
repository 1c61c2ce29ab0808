//! Postgres implementations of the repository traits over `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::applicant::{ApplicantRow, ApplicantStatus};
use crate::models::assessment::AssessmentRow;
use crate::models::job::JobRow;
use crate::models::score::{ScoreRow, ScoreStatus, ScoreUpsert};
use crate::repo::{ApplicantRepo, AssessmentRepo, JobRepo, ScoreRepo};

#[derive(Clone)]
pub struct PgApplicantRepo {
    pool: PgPool,
}

impl PgApplicantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicantRepo for PgApplicantRepo {
    async fn find(&self, id: Uuid) -> Result<Option<ApplicantRow>, AppError> {
        let row = sqlx::query_as("SELECT * FROM applicants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn set_status(&self, id: Uuid, status: ApplicantStatus) -> Result<(), AppError> {
        sqlx::query("UPDATE applicants SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgJobRepo {
    pool: PgPool,
}

impl PgJobRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepo for PgJobRepo {
    async fn find(&self, id: Uuid) -> Result<Option<JobRow>, AppError> {
        let row = sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[derive(Clone)]
pub struct PgAssessmentRepo {
    pool: PgPool,
}

impl PgAssessmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssessmentRepo for PgAssessmentRepo {
    async fn find(&self, id: Uuid) -> Result<Option<AssessmentRow>, AppError> {
        let row = sqlx::query_as("SELECT * FROM assessments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_for_applicant(
        &self,
        applicant_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<AssessmentRow>, AppError> {
        let row =
            sqlx::query_as("SELECT * FROM assessments WHERE applicant_id = $1 AND job_id = $2")
                .bind(applicant_id)
                .bind(job_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    async fn save_submission(
        &self,
        id: Uuid,
        answers: &Value,
        score: f64,
        finished_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE assessments \
             SET answers = $2, score = $3, status = 'completed', finished_at = $4 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(answers)
        .bind(score)
        .bind(finished_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgScoreRepo {
    pool: PgPool,
}

impl PgScoreRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScoreRepo for PgScoreRepo {
    async fn upsert(&self, score: &ScoreUpsert) -> Result<(), AppError> {
        // The unique (applicant_id, job_id) key serializes concurrent writes
        // for the same applicant at the storage layer; no app-level locking.
        sqlx::query(
            "INSERT INTO scores \
                 (id, applicant_id, job_id, composite_score, ml_prob, final_score, \
                  breakdown, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now(), now()) \
             ON CONFLICT (applicant_id, job_id) DO UPDATE SET \
                 composite_score = EXCLUDED.composite_score, \
                 ml_prob = EXCLUDED.ml_prob, \
                 final_score = EXCLUDED.final_score, \
                 breakdown = EXCLUDED.breakdown, \
                 status = EXCLUDED.status, \
                 updated_at = now()",
        )
        .bind(Uuid::new_v4())
        .bind(score.applicant_id)
        .bind(score.job_id)
        .bind(score.composite_score)
        .bind(score.ml_prob)
        .bind(score.final_score)
        .bind(&score.breakdown)
        .bind(ScoreStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_for_applicant(
        &self,
        applicant_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<ScoreRow>, AppError> {
        let row = sqlx::query_as("SELECT * FROM scores WHERE applicant_id = $1 AND job_id = $2")
            .bind(applicant_id)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<ScoreRow>, AppError> {
        let rows =
            sqlx::query_as("SELECT * FROM scores WHERE job_id = $1 ORDER BY created_at ASC")
                .bind(job_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    async fn set_ranking(
        &self,
        score_id: Uuid,
        rank: i32,
        percentile: i32,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE scores SET rank = $2, percentile = $3, updated_at = now() WHERE id = $1")
            .bind(score_id)
            .bind(rank)
            .bind(percentile)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

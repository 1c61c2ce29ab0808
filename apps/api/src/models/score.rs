use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
    Pending,
    Approved,
    Rejected,
}

impl ScoreStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreStatus::Pending => "pending",
            ScoreStatus::Approved => "approved",
            ScoreStatus::Rejected => "rejected",
        }
    }
}

/// The engine's central artifact: exactly one row per (applicant, job),
/// maintained by keyed upsert so reprocessing overwrites instead of
/// duplicating.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScoreRow {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub job_id: Uuid,
    /// Rule-based weighted sum, 0–100.
    pub composite_score: f64,
    /// The AI's self-reported confidence, 0–1.
    pub ml_prob: f64,
    /// Hybrid of composite and confidence-weighted AI fit, 0–100, 2 dp.
    pub final_score: f64,
    /// Full AI analysis plus the assessment sub-score, kept verbatim for
    /// audit and recruiter feedback.
    pub breakdown: Value,
    /// 1-based dense rank within the job; only among scored applicants.
    pub rank: Option<i32>,
    /// 0–100, higher is better; 100 is the top of the pool.
    pub percentile: Option<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for the (applicant_id, job_id) keyed upsert. Rank and percentile
/// are never written here; the ranking updater owns those columns.
#[derive(Debug, Clone)]
pub struct ScoreUpsert {
    pub applicant_id: Uuid,
    pub job_id: Uuid,
    pub composite_score: f64,
    pub ml_prob: f64,
    pub final_score: f64,
    pub breakdown: Value,
}

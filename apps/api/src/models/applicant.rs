use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of one submission. Only the scoring orchestrator moves an
/// applicant between `received`, `processing` and `scored`; `shortlisted`
/// and `rejected` are recruiter actions outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantStatus {
    Received,
    Processing,
    Scored,
    Shortlisted,
    Rejected,
}

impl ApplicantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicantStatus::Received => "received",
            ApplicantStatus::Processing => "processing",
            ApplicantStatus::Scored => "scored",
            ApplicantStatus::Shortlisted => "shortlisted",
            ApplicantStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicantRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Free-form answers to the job's custom form questions.
    pub custom_answers: Option<Value>,
    /// Opaque handle to the uploaded CV (URL into the file store).
    pub cv_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

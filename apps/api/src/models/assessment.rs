use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Pending,
    Started,
    Completed,
}

impl AssessmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentStatus::Pending => "pending",
            AssessmentStatus::Started => "started",
            AssessmentStatus::Completed => "completed",
        }
    }
}

/// At most one per (applicant, job) pair for the timed MCQ flow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentRow {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub job_id: Uuid,
    /// Ordered list of submitted answer indices (JSON array).
    pub answers: Option<Value>,
    pub score: Option<f64>,
    pub status: String,
    pub time_limit_minutes: i32,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl AssessmentRow {
    pub fn is_completed(&self) -> bool {
        self.status == AssessmentStatus::Completed.as_str()
    }

    /// Seconds left on the clock at `now`, floored at zero. The limit is
    /// computed, not enforced: a late submission is still accepted and scored.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        let Some(started) = self.started_at else {
            return i64::from(self.time_limit_minutes) * 60;
        };
        let deadline = started + chrono::Duration::minutes(i64::from(self.time_limit_minutes));
        (deadline - now).num_seconds().max(0)
    }

    /// Whether the submission landed after the time limit elapsed. Late
    /// assessments are scored anyway but flagged for the recruiter.
    pub fn finished_late(&self) -> bool {
        match (self.started_at, self.finished_at) {
            (Some(started), Some(finished)) => {
                finished > started + chrono::Duration::minutes(i64::from(self.time_limit_minutes))
            }
            _ => false,
        }
    }
}

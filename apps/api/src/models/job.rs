use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Per-job weighting of the composite sub-scores. Each weight is expected in
/// [0, 1]; they conventionally sum to 1 but are trusted as-is. Keys omitted
/// by the recruiter keep the platform defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_skills")]
    pub skills: f64,
    #[serde(default = "default_experience")]
    pub experience: f64,
    #[serde(default = "default_education")]
    pub education: f64,
    #[serde(default = "default_assessment")]
    pub assessment: f64,
}

fn default_skills() -> f64 {
    0.4
}
fn default_experience() -> f64 {
    0.3
}
fn default_education() -> f64 {
    0.2
}
fn default_assessment() -> f64 {
    0.1
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            skills: 0.4,
            experience: 0.3,
            education: 0.2,
            assessment: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub experience_level: Option<String>,
    pub education: Option<String>,
    /// JSON weight map; partial maps are valid (missing keys take defaults).
    pub weights: Option<Value>,
    /// MCQ question bank for the optional timed assessment
    /// (JSON array of {prompt, options, correctAnswer, category}).
    pub assessment_questions: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl JobRow {
    /// Effective weights for this job: recruiter overrides merged over the
    /// platform defaults. An unparseable weight column falls back to defaults
    /// rather than blocking scoring.
    pub fn score_weights(&self) -> ScoreWeights {
        self.weights
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }
}

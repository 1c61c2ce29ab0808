//! External triggers into the scoring engine: submit an applicant for
//! (re)scoring, submit a timed assessment, and read a job's leaderboard.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::score::ScoreRow;
use crate::queue::DispatchOutcome;
use crate::scoring::assessment::{grade_assessment, AssessmentGrade};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ScoreSubmissionResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<i32>,
}

/// POST /api/v1/applicants/:id/score
///
/// Enqueues the applicant for scoring, or scores inline when async
/// processing is disabled. Safe to call again for a failed or already-scored
/// applicant; the keyed upsert makes reprocessing idempotent.
pub async fn handle_score_applicant(
    State(state): State<AppState>,
    Path(applicant_id): Path<Uuid>,
) -> Result<Json<ScoreSubmissionResponse>, AppError> {
    match state.dispatcher.dispatch(applicant_id).await? {
        DispatchOutcome::Queued => Ok(Json(ScoreSubmissionResponse {
            status: "queued".to_string(),
            final_score: None,
            rank: None,
        })),
        DispatchOutcome::Completed(outcome) => Ok(Json(ScoreSubmissionResponse {
            status: "scored".to_string(),
            final_score: Some(outcome.final_score),
            rank: outcome.rank,
        })),
    }
}

#[derive(Serialize)]
pub struct AssessmentStatusResponse {
    pub status: String,
    pub time_limit_minutes: i32,
    /// Floored at zero once the limit elapses; late submissions are still
    /// accepted.
    pub remaining_seconds: i64,
    pub finished_late: bool,
}

/// GET /api/v1/assessments/:id
///
/// Countdown view for the timed MCQ flow.
pub async fn handle_assessment_status(
    State(state): State<AppState>,
    Path(assessment_id): Path<Uuid>,
) -> Result<Json<AssessmentStatusResponse>, AppError> {
    let assessment = state
        .assessments
        .find(assessment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assessment {assessment_id} not found")))?;

    Ok(Json(AssessmentStatusResponse {
        status: assessment.status.clone(),
        time_limit_minutes: assessment.time_limit_minutes,
        remaining_seconds: assessment.remaining_seconds(Utc::now()),
        finished_late: assessment.finished_late(),
    }))
}

#[derive(Deserialize)]
pub struct AssessmentSubmission {
    pub answers: Value,
}

#[derive(Debug, Serialize)]
pub struct AssessmentSubmissionResponse {
    pub grade: AssessmentGrade,
    pub finished_late: bool,
    pub scoring: String,
}

/// POST /api/v1/assessments/:id/submit
///
/// Grades the MCQ answers against the job's question bank, stores the
/// result, and triggers a rescore of the applicant. Late submissions are
/// accepted and graded; they are only flagged. A completed assessment
/// cannot be submitted again.
pub async fn handle_submit_assessment(
    State(state): State<AppState>,
    Path(assessment_id): Path<Uuid>,
    Json(submission): Json<AssessmentSubmission>,
) -> Result<Json<AssessmentSubmissionResponse>, AppError> {
    let assessment = state
        .assessments
        .find(assessment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assessment {assessment_id} not found")))?;

    if assessment.is_completed() {
        return Err(AppError::InvalidInput(format!(
            "Assessment {assessment_id} has already been submitted"
        )));
    }

    let job = state
        .jobs
        .find(assessment.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", assessment.job_id)))?;

    let questions = job.assessment_questions.ok_or_else(|| {
        AppError::InvalidInput(format!("Job {} has no assessment configured", job.id))
    })?;

    let grade = grade_assessment(&submission.answers, &questions)?;

    let now = Utc::now();
    state
        .assessments
        .save_submission(assessment_id, &submission.answers, grade.score, now)
        .await?;

    let mut finished = assessment;
    finished.finished_at = Some(now);
    let finished_late = finished.finished_late();

    let scoring = match state.dispatcher.dispatch(finished.applicant_id).await? {
        DispatchOutcome::Queued => "queued".to_string(),
        DispatchOutcome::Completed(_) => "scored".to_string(),
    };

    Ok(Json(AssessmentSubmissionResponse {
        grade,
        finished_late,
        scoring,
    }))
}

#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub job_id: Uuid,
    pub scores: Vec<ScoreRow>,
}

/// GET /api/v1/jobs/:id/leaderboard
///
/// Scored applicants of the job, best first. Unranked rows (scores written
/// while a ranking recompute is still in flight) sort last.
pub async fn handle_leaderboard(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let mut scores = state.scores.list_for_job(job_id).await?;
    scores.sort_by_key(|s| s.rank.unwrap_or(i32::MAX));
    Ok(Json(LeaderboardResponse { job_id, scores }))
}

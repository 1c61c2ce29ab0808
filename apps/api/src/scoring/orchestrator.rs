//! Scoring orchestrator — runs the full pipeline for one applicant: gather
//! inputs, analyze the CV, blend the composite and AI scores, upsert the
//! score row and refresh the job's leaderboard.
//!
//! Constructor-injected over the repository and collaborator traits; the
//! worker pool and the synchronous fallback both drive it through
//! `ApplicantProcessor`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::cv::CvTextExtractor;
use crate::errors::AppError;
use crate::models::applicant::{ApplicantRow, ApplicantStatus};
use crate::models::assessment::AssessmentRow;
use crate::models::job::JobRow;
use crate::models::score::ScoreUpsert;
use crate::repo::{ApplicantRepo, AssessmentRepo, JobRepo, ScoreRepo};
use crate::scoring::analysis::{AnalysisContext, CvAnalyzer};
use crate::scoring::composite::composite_score;
use crate::scoring::ranking::update_rankings;
use crate::scoring::round2;

/// α in `final = α·composite + (1 − α)·(fit.score × fit.confidence)`.
/// The AI's holistic opinion is discounted by its own stated confidence, so
/// low-confidence judgments move the final score less.
const COMPOSITE_WEIGHT: f64 = 0.7;

/// Substituted when the CV is missing or text extraction fails; scoring
/// never blocks on CV availability.
const CV_TEXT_PLACEHOLDER: &str = "CV text unavailable";

/// What the queue layer needs to emit a rank_update event.
#[derive(Debug, Clone)]
pub struct ScoreOutcome {
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub final_score: f64,
    pub rank: Option<i32>,
}

/// Seam between the queue layer and the orchestrator.
#[async_trait]
pub trait ApplicantProcessor: Send + Sync {
    async fn process_applicant(&self, applicant_id: Uuid) -> Result<ScoreOutcome, AppError>;
}

pub struct ScoringService {
    applicants: Arc<dyn ApplicantRepo>,
    jobs: Arc<dyn JobRepo>,
    assessments: Arc<dyn AssessmentRepo>,
    scores: Arc<dyn ScoreRepo>,
    analyzer: CvAnalyzer,
    cv_extractor: Arc<dyn CvTextExtractor>,
    /// Neutral sub-score for applicants without a completed assessment.
    default_assessment_score: f64,
}

impl ScoringService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        applicants: Arc<dyn ApplicantRepo>,
        jobs: Arc<dyn JobRepo>,
        assessments: Arc<dyn AssessmentRepo>,
        scores: Arc<dyn ScoreRepo>,
        analyzer: CvAnalyzer,
        cv_extractor: Arc<dyn CvTextExtractor>,
        default_assessment_score: f64,
    ) -> Self {
        Self {
            applicants,
            jobs,
            assessments,
            scores,
            analyzer,
            cv_extractor,
            default_assessment_score,
        }
    }

    async fn resolve_cv_text(&self, applicant: &ApplicantRow) -> String {
        let Some(url) = applicant.cv_url.as_deref() else {
            return CV_TEXT_PLACEHOLDER.to_string();
        };
        match self.cv_extractor.extract(url).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "CV extraction failed for applicant {}, using placeholder: {e}",
                    applicant.id
                );
                CV_TEXT_PLACEHOLDER.to_string()
            }
        }
    }

    /// Steps 3–10: everything after the status flip to `processing`. A
    /// failure here rolls the applicant back to `received` in the caller.
    async fn score(
        &self,
        applicant: &ApplicantRow,
        job: &JobRow,
        assessment: Option<&AssessmentRow>,
    ) -> Result<ScoreOutcome, AppError> {
        let cv_text = self.resolve_cv_text(applicant).await;

        let ctx = AnalysisContext {
            job_title: job.title.clone(),
            job_description: job.description.clone(),
            required_skills: job.required_skills.clone(),
            experience_level: job.experience_level.clone(),
            education: job.education.clone(),
            cv_text,
            custom_answers: applicant.custom_answers.clone(),
        };
        let analysis = self.analyzer.analyze(&ctx).await;

        let assessment_score = assessment
            .filter(|a| a.is_completed())
            .and_then(|a| a.score)
            .unwrap_or(self.default_assessment_score);

        let weights = job.score_weights();
        let composite = composite_score(&analysis, assessment_score, &weights);

        let fit = &analysis.overall_fit;
        let final_score = round2(
            COMPOSITE_WEIGHT * composite
                + (1.0 - COMPOSITE_WEIGHT) * (fit.score * fit.confidence),
        );
        let ml_prob = fit.confidence;

        self.scores
            .upsert(&ScoreUpsert {
                applicant_id: applicant.id,
                job_id: job.id,
                composite_score: composite,
                ml_prob,
                final_score,
                breakdown: json!({
                    "analysis": analysis,
                    "assessmentScore": assessment_score,
                }),
            })
            .await?;

        update_rankings(self.scores.as_ref(), job.id).await?;

        self.applicants
            .set_status(applicant.id, ApplicantStatus::Scored)
            .await?;

        let rank = self
            .scores
            .find_for_applicant(applicant.id, job.id)
            .await?
            .and_then(|s| s.rank);

        info!(
            "Scored applicant {}: composite={composite}, final={final_score}, rank={rank:?}",
            applicant.id
        );

        Ok(ScoreOutcome {
            job_id: job.id,
            applicant_id: applicant.id,
            final_score,
            rank,
        })
    }
}

#[async_trait]
impl ApplicantProcessor for ScoringService {
    async fn process_applicant(&self, applicant_id: Uuid) -> Result<ScoreOutcome, AppError> {
        let applicant = self
            .applicants
            .find(applicant_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Applicant {applicant_id} not found")))?;
        let job = self.jobs.find(applicant.job_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Job {} not found", applicant.job_id))
        })?;
        let assessment = self
            .assessments
            .find_for_applicant(applicant.id, job.id)
            .await?;

        self.applicants
            .set_status(applicant.id, ApplicantStatus::Processing)
            .await?;

        match self.score(&applicant, &job, assessment.as_ref()).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                // Leave the applicant visibly retryable, then surface the
                // error to the queue layer's retry policy.
                if let Err(rollback) = self
                    .applicants
                    .set_status(applicant.id, ApplicantStatus::Received)
                    .await
                {
                    error!(
                        "Failed to roll back status for applicant {}: {rollback}",
                        applicant.id
                    );
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
pub mod test_support {
    //! In-memory repository fakes for scoring pipeline tests.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Mutex;

    use chrono::{Duration, Utc};
    use serde_json::Value;

    use super::*;
    use crate::models::score::ScoreRow;

    #[derive(Default)]
    pub struct FakeApplicants {
        pub rows: Mutex<HashMap<Uuid, ApplicantRow>>,
    }

    impl FakeApplicants {
        pub fn insert(&self, row: ApplicantRow) {
            self.rows.lock().unwrap().insert(row.id, row);
        }

        pub fn status_of(&self, id: Uuid) -> Option<String> {
            self.rows.lock().unwrap().get(&id).map(|a| a.status.clone())
        }
    }

    #[async_trait]
    impl ApplicantRepo for FakeApplicants {
        async fn find(&self, id: Uuid) -> Result<Option<ApplicantRow>, AppError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn set_status(&self, id: Uuid, status: ApplicantStatus) -> Result<(), AppError> {
            if let Some(row) = self.rows.lock().unwrap().get_mut(&id) {
                row.status = status.as_str().to_string();
            }
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct FakeJobs {
        pub rows: Mutex<HashMap<Uuid, JobRow>>,
    }

    impl FakeJobs {
        pub fn insert(&self, row: JobRow) {
            self.rows.lock().unwrap().insert(row.id, row);
        }
    }

    #[async_trait]
    impl JobRepo for FakeJobs {
        async fn find(&self, id: Uuid) -> Result<Option<JobRow>, AppError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }
    }

    #[derive(Default)]
    pub struct FakeAssessments {
        pub rows: Mutex<Vec<AssessmentRow>>,
    }

    impl FakeAssessments {
        pub fn insert(&self, row: AssessmentRow) {
            self.rows.lock().unwrap().push(row);
        }
    }

    #[async_trait]
    impl AssessmentRepo for FakeAssessments {
        async fn find(&self, id: Uuid) -> Result<Option<AssessmentRow>, AppError> {
            Ok(self.rows.lock().unwrap().iter().find(|a| a.id == id).cloned())
        }

        async fn find_for_applicant(
            &self,
            applicant_id: Uuid,
            job_id: Uuid,
        ) -> Result<Option<AssessmentRow>, AppError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.applicant_id == applicant_id && a.job_id == job_id)
                .cloned())
        }

        async fn save_submission(
            &self,
            id: Uuid,
            answers: &Value,
            score: f64,
            finished_at: chrono::DateTime<Utc>,
        ) -> Result<(), AppError> {
            let mut rows = self.rows.lock().unwrap();
            if let Some(row) = rows.iter_mut().find(|a| a.id == id) {
                row.answers = Some(answers.clone());
                row.score = Some(score);
                row.status = "completed".to_string();
                row.finished_at = Some(finished_at);
            }
            Ok(())
        }
    }

    /// Upsert-by-key score store; `fail_upserts` simulates a storage outage
    /// for the transient-failure path.
    #[derive(Default)]
    pub struct FakeScores {
        pub rows: Mutex<Vec<ScoreRow>>,
        pub fail_upserts: std::sync::atomic::AtomicBool,
        seq: AtomicI64,
    }

    impl FakeScores {
        pub fn snapshot(&self) -> Vec<ScoreRow> {
            self.rows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ScoreRepo for FakeScores {
        async fn upsert(&self, score: &ScoreUpsert) -> Result<(), AppError> {
            if self.fail_upserts.load(Ordering::SeqCst) {
                return Err(AppError::Queue("score store unavailable".to_string()));
            }
            let mut rows = self.rows.lock().unwrap();
            if let Some(existing) = rows
                .iter_mut()
                .find(|s| s.applicant_id == score.applicant_id && s.job_id == score.job_id)
            {
                existing.composite_score = score.composite_score;
                existing.ml_prob = score.ml_prob;
                existing.final_score = score.final_score;
                existing.breakdown = score.breakdown.clone();
                existing.status = "pending".to_string();
                existing.updated_at = Utc::now();
            } else {
                let seq = self.seq.fetch_add(1, Ordering::SeqCst);
                rows.push(ScoreRow {
                    id: Uuid::new_v4(),
                    applicant_id: score.applicant_id,
                    job_id: score.job_id,
                    composite_score: score.composite_score,
                    ml_prob: score.ml_prob,
                    final_score: score.final_score,
                    breakdown: score.breakdown.clone(),
                    rank: None,
                    percentile: None,
                    status: "pending".to_string(),
                    created_at: Utc::now() + Duration::milliseconds(seq),
                    updated_at: Utc::now(),
                });
            }
            Ok(())
        }

        async fn find_for_applicant(
            &self,
            applicant_id: Uuid,
            job_id: Uuid,
        ) -> Result<Option<ScoreRow>, AppError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.applicant_id == applicant_id && s.job_id == job_id)
                .cloned())
        }

        async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<ScoreRow>, AppError> {
            let mut rows: Vec<ScoreRow> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.job_id == job_id)
                .cloned()
                .collect();
            rows.sort_by_key(|s| s.created_at);
            Ok(rows)
        }

        async fn set_ranking(
            &self,
            score_id: Uuid,
            rank: i32,
            percentile: i32,
        ) -> Result<(), AppError> {
            let mut rows = self.rows.lock().unwrap();
            if let Some(row) = rows.iter_mut().find(|s| s.id == score_id) {
                row.rank = Some(rank);
                row.percentile = Some(percentile);
            }
            Ok(())
        }
    }

    pub struct FakeCvExtractor {
        pub fail: bool,
    }

    #[async_trait]
    impl CvTextExtractor for FakeCvExtractor {
        async fn extract(&self, _cv_url: &str) -> anyhow::Result<String> {
            if self.fail {
                anyhow::bail!("document store unreachable")
            }
            Ok("Experienced Rust engineer, 8 years of backend work".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;

    use super::test_support::*;
    use super::*;
    use crate::ai_client::{AiError, AnalysisBackend};

    struct CannedBackend {
        response: Result<String, ()>,
    }

    #[async_trait]
    impl AnalysisBackend for CannedBackend {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, AiError> {
            self.response.clone().map_err(|_| AiError::EmptyContent)
        }
    }

    /// Backend response matching the documented worked example:
    /// sub-scores {80, 70, 90}, overallFit {75, 0.8}.
    const WORKED_EXAMPLE_RESPONSE: &str = r#"{
        "skillsMatch": {"score": 80, "matchedSkills": ["rust"], "missingSkills": []},
        "experienceMatch": {"score": 70, "yearsRelevant": 6, "relevance": "high"},
        "educationMatch": {"score": 90, "level": "masters", "relevant": true},
        "overallFit": {"score": 75, "confidence": 0.8, "recommendation": "moderate"},
        "insights": {"strengths": ["rust depth"], "concerns": [], "summary": "good"}
    }"#;

    struct Harness {
        applicants: Arc<FakeApplicants>,
        jobs: Arc<FakeJobs>,
        assessments: Arc<FakeAssessments>,
        scores: Arc<FakeScores>,
        service: ScoringService,
    }

    fn harness(backend_response: Result<String, ()>) -> Harness {
        let applicants = Arc::new(FakeApplicants::default());
        let jobs = Arc::new(FakeJobs::default());
        let assessments = Arc::new(FakeAssessments::default());
        let scores = Arc::new(FakeScores::default());
        let analyzer = CvAnalyzer::new(Arc::new(CannedBackend {
            response: backend_response,
        }));
        let service = ScoringService::new(
            applicants.clone(),
            jobs.clone(),
            assessments.clone(),
            scores.clone(),
            analyzer,
            Arc::new(FakeCvExtractor { fail: false }),
            50.0,
        );
        Harness {
            applicants,
            jobs,
            assessments,
            scores,
            service,
        }
    }

    fn seed_job(h: &Harness, weights: serde_json::Value) -> Uuid {
        let job_id = Uuid::new_v4();
        h.jobs.insert(JobRow {
            id: job_id,
            title: "Backend Engineer".to_string(),
            description: "Services in Rust".to_string(),
            required_skills: vec!["rust".to_string()],
            experience_level: Some("senior".to_string()),
            education: Some("bachelors".to_string()),
            weights: Some(weights),
            assessment_questions: None,
            created_at: Utc::now(),
        });
        job_id
    }

    fn seed_applicant(h: &Harness, job_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        h.applicants.insert(ApplicantRow {
            id,
            job_id,
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            custom_answers: Some(json!({"why": "I like compilers"})),
            cv_url: Some("https://files.example.com/cv.pdf".to_string()),
            status: "received".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        id
    }

    fn seed_completed_assessment(h: &Harness, applicant_id: Uuid, job_id: Uuid, score: f64) {
        h.assessments.insert(AssessmentRow {
            id: Uuid::new_v4(),
            applicant_id,
            job_id,
            answers: Some(json!([0, 1])),
            score: Some(score),
            status: "completed".to_string(),
            time_limit_minutes: 30,
            started_at: Some(Utc::now()),
            finished_at: Some(Utc::now()),
        });
    }

    #[tokio::test]
    async fn worked_example_produces_71_20() {
        let h = harness(Ok(WORKED_EXAMPLE_RESPONSE.to_string()));
        let job_id = seed_job(
            &h,
            json!({"skills": 0.5, "experience": 0.3, "education": 0.1, "assessment": 0.1}),
        );
        let applicant_id = seed_applicant(&h, job_id);
        seed_completed_assessment(&h, applicant_id, job_id, 60.0);

        let outcome = h.service.process_applicant(applicant_id).await.unwrap();

        // composite = 0.5·80 + 0.3·70 + 0.1·90 + 0.1·60 = 76.00
        // final = 0.7·76 + 0.3·(75 × 0.8) = 71.20
        assert_eq!(outcome.final_score, 71.2);
        assert_eq!(outcome.rank, Some(1));

        let rows = h.scores.snapshot();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].composite_score, 76.0);
        assert_eq!(rows[0].ml_prob, 0.8);
        assert_eq!(rows[0].percentile, Some(100));
        assert_eq!(rows[0].breakdown["assessmentScore"], json!(60.0));
        assert_eq!(h.applicants.status_of(applicant_id).unwrap(), "scored");
    }

    #[tokio::test]
    async fn missing_assessment_uses_neutral_default() {
        let h = harness(Ok(WORKED_EXAMPLE_RESPONSE.to_string()));
        let job_id = seed_job(&h, json!({}));
        let applicant_id = seed_applicant(&h, job_id);

        h.service.process_applicant(applicant_id).await.unwrap();

        let rows = h.scores.snapshot();
        assert_eq!(rows[0].breakdown["assessmentScore"], json!(50.0));
        // default weights: 0.4·80 + 0.3·70 + 0.2·90 + 0.1·50 = 76.0
        assert_eq!(rows[0].composite_score, 76.0);
    }

    #[tokio::test]
    async fn incomplete_assessment_is_ignored() {
        let h = harness(Ok(WORKED_EXAMPLE_RESPONSE.to_string()));
        let job_id = seed_job(&h, json!({}));
        let applicant_id = seed_applicant(&h, job_id);
        h.assessments.insert(AssessmentRow {
            id: Uuid::new_v4(),
            applicant_id,
            job_id,
            answers: None,
            score: None,
            status: "started".to_string(),
            time_limit_minutes: 30,
            started_at: Some(Utc::now()),
            finished_at: None,
        });

        h.service.process_applicant(applicant_id).await.unwrap();

        let rows = h.scores.snapshot();
        assert_eq!(rows[0].breakdown["assessmentScore"], json!(50.0));
    }

    #[tokio::test]
    async fn unknown_applicant_is_not_found() {
        let h = harness(Ok(WORKED_EXAMPLE_RESPONSE.to_string()));
        let err = h.service.process_applicant(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(h.scores.snapshot().is_empty());
    }

    #[tokio::test]
    async fn ai_failure_still_completes_with_concern_recorded() {
        let h = harness(Err(()));
        let job_id = seed_job(&h, json!({}));
        let applicant_id = seed_applicant(&h, job_id);

        let outcome = h.service.process_applicant(applicant_id).await.unwrap();

        assert_eq!(h.applicants.status_of(applicant_id).unwrap(), "scored");
        let rows = h.scores.snapshot();
        let concerns = rows[0].breakdown["analysis"]["insights"]["concerns"]
            .as_array()
            .unwrap()
            .clone();
        assert!(!concerns.is_empty());
        // All-neutral analysis with default weights and assessment 50:
        // composite = 50, final = 0.7·50 + 0.3·(50 × 0.5) = 42.5
        assert_eq!(outcome.final_score, 42.5);
    }

    #[tokio::test]
    async fn reprocessing_is_idempotent() {
        let h = harness(Ok(WORKED_EXAMPLE_RESPONSE.to_string()));
        let job_id = seed_job(&h, json!({}));
        let applicant_id = seed_applicant(&h, job_id);
        seed_completed_assessment(&h, applicant_id, job_id, 60.0);

        let first = h.service.process_applicant(applicant_id).await.unwrap();
        let second = h.service.process_applicant(applicant_id).await.unwrap();

        assert_eq!(first.final_score, second.final_score);
        assert_eq!(first.rank, second.rank);
        let rows = h.scores.snapshot();
        assert_eq!(rows.len(), 1, "upsert must not duplicate the score row");
        assert_eq!(rows[0].status, "pending");
    }

    #[tokio::test]
    async fn transient_failure_rolls_status_back_to_received() {
        let h = harness(Ok(WORKED_EXAMPLE_RESPONSE.to_string()));
        let job_id = seed_job(&h, json!({}));
        let applicant_id = seed_applicant(&h, job_id);
        h.scores.fail_upserts.store(true, Ordering::SeqCst);

        let err = h.service.process_applicant(applicant_id).await.unwrap_err();

        assert!(matches!(err, AppError::Queue(_)));
        assert_eq!(h.applicants.status_of(applicant_id).unwrap(), "received");
    }

    #[tokio::test]
    async fn cv_extraction_failure_does_not_block_scoring() {
        let h = harness(Ok(WORKED_EXAMPLE_RESPONSE.to_string()));
        let job_id = seed_job(&h, json!({}));
        let applicant_id = seed_applicant(&h, job_id);

        let service = ScoringService::new(
            h.applicants.clone(),
            h.jobs.clone(),
            h.assessments.clone(),
            h.scores.clone(),
            CvAnalyzer::new(Arc::new(CannedBackend {
                response: Ok(WORKED_EXAMPLE_RESPONSE.to_string()),
            })),
            Arc::new(FakeCvExtractor { fail: true }),
            50.0,
        );

        service.process_applicant(applicant_id).await.unwrap();
        assert_eq!(h.applicants.status_of(applicant_id).unwrap(), "scored");
    }

    #[tokio::test]
    async fn scoring_several_applicants_yields_dense_ranks() {
        let h = harness(Ok(WORKED_EXAMPLE_RESPONSE.to_string()));
        let job_id = seed_job(&h, json!({}));

        let a = seed_applicant(&h, job_id);
        let b = seed_applicant(&h, job_id);
        let c = seed_applicant(&h, job_id);
        // Give one applicant a completed assessment so scores differ.
        seed_completed_assessment(&h, b, job_id, 100.0);

        h.service.process_applicant(a).await.unwrap();
        h.service.process_applicant(b).await.unwrap();
        h.service.process_applicant(c).await.unwrap();

        let mut ranks: Vec<i32> = h
            .scores
            .snapshot()
            .iter()
            .map(|s| s.rank.unwrap())
            .collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3]);

        let top = h
            .scores
            .snapshot()
            .into_iter()
            .find(|s| s.applicant_id == b)
            .unwrap();
        assert_eq!(top.rank, Some(1));
        assert_eq!(top.percentile, Some(100));
    }

    #[tokio::test]
    async fn concurrent_completions_settle_with_dense_ranks() {
        // Two applicants of the same job finishing together each trigger a
        // full leaderboard recompute; whichever recompute lands last must
        // leave ranks {1, 2} with nothing duplicated or skipped.
        for _ in 0..25 {
            let h = harness(Ok(WORKED_EXAMPLE_RESPONSE.to_string()));
            let job_id = seed_job(&h, json!({}));
            let a = seed_applicant(&h, job_id);
            let b = seed_applicant(&h, job_id);
            seed_completed_assessment(&h, b, job_id, 100.0);

            let service = Arc::new(h.service);
            let first = tokio::spawn({
                let service = service.clone();
                async move { service.process_applicant(a).await }
            });
            let second = tokio::spawn({
                let service = service.clone();
                async move { service.process_applicant(b).await }
            });
            let (first, second) = tokio::join!(first, second);
            first.unwrap().unwrap();
            second.unwrap().unwrap();

            let mut ranks: Vec<i32> = h
                .scores
                .snapshot()
                .iter()
                .map(|s| s.rank.unwrap())
                .collect();
            ranks.sort_unstable();
            assert_eq!(ranks, vec![1, 2]);
            assert_eq!(h.applicants.status_of(a).unwrap(), "scored");
            assert_eq!(h.applicants.status_of(b).unwrap(), "scored");
        }
    }
}

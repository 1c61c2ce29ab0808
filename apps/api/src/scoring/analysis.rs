//! AI analysis adapter — the fragile seam between free-form model output and
//! the scoring math.
//!
//! Two-stage by design: the raw backend call returns text, then this module
//! extracts the first balanced JSON object, deserializes it leniently, and
//! clamps every numeric field into range. Any failure along the way degrades
//! to a complete neutral fallback; `analyze` never returns an error, because
//! an unavailable AI collaborator must never abort a scoring run.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::ai_client::prompts::{CV_ANALYSIS_PROMPT_TEMPLATE, CV_ANALYSIS_SYSTEM};
use crate::ai_client::AnalysisBackend;

const NEUTRAL_SCORE: f64 = 50.0;
const NEUTRAL_CONFIDENCE: f64 = 0.5;
const NEUTRAL_RECOMMENDATION: &str = "weak";

/// Everything the analysis prompt needs about one applicant and their job.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub job_title: String,
    pub job_description: String,
    pub required_skills: Vec<String>,
    pub experience_level: Option<String>,
    pub education: Option<String>,
    pub cv_text: String,
    pub custom_answers: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsMatch {
    pub score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceMatch {
    pub score: f64,
    pub years_relevant: i64,
    /// "high" | "medium" | "low"
    pub relevance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationMatch {
    pub score: f64,
    pub level: String,
    pub relevant: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallFit {
    pub score: f64,
    /// 0–1; the final-score hybrid discounts the fit score by this.
    pub confidence: f64,
    /// "strong" | "moderate" | "weak"
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub summary: String,
}

/// Fully validated analysis: every score in 0–100, confidence in 0–1,
/// enums normalized. Stored verbatim in the score breakdown for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvAnalysis {
    pub skills_match: SkillsMatch,
    pub experience_match: ExperienceMatch,
    pub education_match: EducationMatch,
    pub overall_fit: OverallFit,
    pub insights: Insights,
}

// Lenient mirror of the response schema: every field optional, so a model
// that drops half the object still yields whatever it did provide.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    #[serde(default)]
    skills_match: RawSkillsMatch,
    #[serde(default)]
    experience_match: RawExperienceMatch,
    #[serde(default)]
    education_match: RawEducationMatch,
    #[serde(default)]
    overall_fit: RawOverallFit,
    #[serde(default)]
    insights: RawInsights,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSkillsMatch {
    score: Option<f64>,
    #[serde(default)]
    matched_skills: Vec<String>,
    #[serde(default)]
    missing_skills: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExperienceMatch {
    score: Option<f64>,
    years_relevant: Option<i64>,
    relevance: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEducationMatch {
    score: Option<f64>,
    level: Option<String>,
    relevant: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOverallFit {
    score: Option<f64>,
    confidence: Option<f64>,
    recommendation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInsights {
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    concerns: Vec<String>,
    summary: Option<String>,
}

/// CV analyzer over a pluggable raw backend.
#[derive(Clone)]
pub struct CvAnalyzer {
    backend: Arc<dyn AnalysisBackend>,
}

impl CvAnalyzer {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self { backend }
    }

    /// Analyzes one applicant's CV against the job. Infallible by contract:
    /// on any backend or parse failure the returned analysis is the neutral
    /// fallback with the degradation recorded under `insights.concerns`.
    pub async fn analyze(&self, ctx: &AnalysisContext) -> CvAnalysis {
        let prompt = build_prompt(ctx);

        let text = match self.backend.complete(&prompt, CV_ANALYSIS_SYSTEM).await {
            Ok(text) => text,
            Err(e) => {
                warn!("AI analysis call failed, using fallback scores: {e}");
                return fallback_analysis("AI analysis was unavailable; neutral fallback scores applied");
            }
        };

        match parse_analysis(&text) {
            Some(analysis) => analysis,
            None => {
                warn!("AI analysis response was unparseable, using fallback scores");
                fallback_analysis("AI response could not be parsed; neutral fallback scores applied")
            }
        }
    }
}

fn build_prompt(ctx: &AnalysisContext) -> String {
    let custom_answers = ctx
        .custom_answers
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "none provided".to_string());

    CV_ANALYSIS_PROMPT_TEMPLATE
        .replace("{job_title}", &ctx.job_title)
        .replace("{job_description}", &ctx.job_description)
        .replace("{required_skills}", &ctx.required_skills.join(", "))
        .replace(
            "{experience_level}",
            ctx.experience_level.as_deref().unwrap_or("unspecified"),
        )
        .replace("{education}", ctx.education.as_deref().unwrap_or("unspecified"))
        .replace("{cv_text}", &ctx.cv_text)
        .replace("{custom_answers}", &custom_answers)
}

/// Stage two: pull the first balanced JSON object out of the response text
/// and sanitize it. Surrounding prose, code fences and trailing chatter are
/// all discarded.
fn parse_analysis(text: &str) -> Option<CvAnalysis> {
    let json = extract_json_object(text)?;
    let raw: RawAnalysis = serde_json::from_str(json).ok()?;
    Some(sanitize(raw))
}

/// Returns the first balanced `{...}` span in `text`, respecting string
/// literals and escapes.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn clamp_score(score: Option<f64>) -> f64 {
    score
        .filter(|s| s.is_finite())
        .map(|s| s.clamp(0.0, 100.0))
        .unwrap_or(NEUTRAL_SCORE)
}

fn clamp_confidence(confidence: Option<f64>) -> f64 {
    confidence
        .filter(|c| c.is_finite())
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(NEUTRAL_CONFIDENCE)
}

fn normalize_enum(value: Option<String>, allowed: &[&str], default: &str) -> String {
    match value {
        Some(v) => {
            let lower = v.trim().to_lowercase();
            if allowed.contains(&lower.as_str()) {
                lower
            } else {
                default.to_string()
            }
        }
        None => default.to_string(),
    }
}

fn sanitize(raw: RawAnalysis) -> CvAnalysis {
    CvAnalysis {
        skills_match: SkillsMatch {
            score: clamp_score(raw.skills_match.score),
            matched_skills: raw.skills_match.matched_skills,
            missing_skills: raw.skills_match.missing_skills,
        },
        experience_match: ExperienceMatch {
            score: clamp_score(raw.experience_match.score),
            years_relevant: raw.experience_match.years_relevant.unwrap_or(0).max(0),
            relevance: normalize_enum(
                raw.experience_match.relevance,
                &["high", "medium", "low"],
                "medium",
            ),
        },
        education_match: EducationMatch {
            score: clamp_score(raw.education_match.score),
            level: raw
                .education_match
                .level
                .unwrap_or_else(|| "unknown".to_string()),
            relevant: raw.education_match.relevant.unwrap_or(false),
        },
        overall_fit: OverallFit {
            score: clamp_score(raw.overall_fit.score),
            confidence: clamp_confidence(raw.overall_fit.confidence),
            recommendation: normalize_enum(
                raw.overall_fit.recommendation,
                &["strong", "moderate", "weak"],
                NEUTRAL_RECOMMENDATION,
            ),
        },
        insights: Insights {
            strengths: raw.insights.strengths,
            concerns: raw.insights.concerns,
            summary: raw
                .insights
                .summary
                .unwrap_or_else(|| "No summary provided".to_string()),
        },
    }
}

/// Complete neutral analysis used when the collaborator fails outright.
/// The concern string is what recruiters see in the breakdown, so it names
/// the degradation.
pub fn fallback_analysis(concern: &str) -> CvAnalysis {
    CvAnalysis {
        skills_match: SkillsMatch {
            score: NEUTRAL_SCORE,
            matched_skills: vec![],
            missing_skills: vec![],
        },
        experience_match: ExperienceMatch {
            score: NEUTRAL_SCORE,
            years_relevant: 0,
            relevance: "medium".to_string(),
        },
        education_match: EducationMatch {
            score: NEUTRAL_SCORE,
            level: "unknown".to_string(),
            relevant: false,
        },
        overall_fit: OverallFit {
            score: NEUTRAL_SCORE,
            confidence: NEUTRAL_CONFIDENCE,
            recommendation: NEUTRAL_RECOMMENDATION.to_string(),
        },
        insights: Insights {
            strengths: vec![],
            concerns: vec![concern.to_string()],
            summary: "Automated analysis degraded; scores are neutral defaults".to_string(),
        },
    }
}

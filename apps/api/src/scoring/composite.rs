//! Composite score calculator — the rule-based half of the final score.
//! A weighted sum of the AI sub-scores and the assessment result,
//! deliberately independent of the AI's self-reported confidence.

use crate::models::job::ScoreWeights;
use crate::scoring::analysis::CvAnalysis;
use crate::scoring::round2;

/// `round(Σ weightᵢ × scoreᵢ, 2)`. Sub-scores arrive pre-clamped to 0–100 by
/// the analysis adapter; weights are trusted input (no clamping here).
pub fn composite_score(analysis: &CvAnalysis, assessment_score: f64, weights: &ScoreWeights) -> f64 {
    round2(
        weights.skills * analysis.skills_match.score
            + weights.experience * analysis.experience_match.score
            + weights.education * analysis.education_match.score
            + weights.assessment * assessment_score,
    )
}

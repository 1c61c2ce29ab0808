//! The applicant scoring pipeline: pure calculators at the bottom
//! (`assessment`, `composite`), the AI analysis adapter with its fallback
//! behavior (`analysis`), the per-job leaderboard recompute (`ranking`), and
//! the orchestrator that ties them together per applicant (`orchestrator`).

pub mod analysis;
pub mod assessment;
pub mod composite;
pub mod orchestrator;
pub mod ranking;

/// Rounds to two decimal places; final and composite scores are stored at
/// this precision.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

//! Ranking updater — recomputes one job's entire leaderboard.
//!
//! A full recompute per completed applicant is O(N log N) with N bounded by
//! applicants-per-job. The idempotent rewrite tolerates races: when two
//! applicants of the same job finish together, the last recompute wins and
//! rankings converge once all in-flight jobs settle.

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::score::ScoreRow;
use crate::repo::ScoreRepo;

/// Percentile for a 1-based dense rank in a pool of `total` scored
/// applicants: `round(((total − rank) / (total − 1)) × 100)`; a pool of one
/// is at the 100th percentile.
pub fn percentile_for_rank(rank: usize, total: usize) -> i32 {
    if total <= 1 {
        return 100;
    }
    (((total - rank) as f64 / (total - 1) as f64) * 100.0).round() as i32
}

/// Orders scores by final score descending and assigns dense ranks 1..N with
/// percentiles. Sorting is stable, so ties keep the input (creation) order.
pub fn assign_rankings(scores: &[ScoreRow]) -> Vec<(Uuid, i32, i32)> {
    let mut ordered: Vec<&ScoreRow> = scores.iter().collect();
    ordered.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total = ordered.len();
    ordered
        .iter()
        .enumerate()
        .map(|(i, score)| {
            let rank = i + 1;
            (score.id, rank as i32, percentile_for_rank(rank, total))
        })
        .collect()
}

/// Reads every score of the job and rewrites rank and percentile for all of
/// them. Invoked once per scored applicant.
pub async fn update_rankings(scores: &dyn ScoreRepo, job_id: Uuid) -> Result<(), AppError> {
    let rows = scores.list_for_job(job_id).await?;
    for (score_id, rank, percentile) in assign_rankings(&rows) {
        scores.set_ranking(score_id, rank, percentile).await?;
    }
    Ok(())
}

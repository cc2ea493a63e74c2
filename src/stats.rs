// src/stats.rs
// ============================================================================
// DISTRIBUTION SUMMARIZER - min/max/mean/median/quantiles
// ============================================================================

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("empty dataset: no values for {0}")]
    EmptySequence(&'static str),
}

/// Five-number-style summary of one per-example sequence.
///
/// The two quantiles are the 10th and 90th percentile, but they serialize
/// under the literal keys `p5`/`p95`: the historical report format labeled
/// them that way, and consumers key on those names. Kept for output
/// compatibility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSummary {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub median: f64,
    #[serde(rename = "p5")]
    pub p10: f64,
    #[serde(rename = "p95")]
    pub p90: f64,
}

/// Summarizes a non-empty sequence. The name only feeds the error message.
pub fn summarize(name: &'static str, values: &[usize]) -> Result<DistributionSummary, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptySequence(name));
    }

    let mut sorted: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let sum: usize = values.iter().sum();

    Ok(DistributionSummary {
        min: *values.iter().min().unwrap(),
        max: *values.iter().max().unwrap(),
        mean: sum as f64 / values.len() as f64,
        median: quantile(&sorted, 0.5),
        p10: quantile(&sorted, 0.1),
        p90: quantile(&sorted, 0.9),
    })
}

/// Linear-interpolation quantile over an ascending-sorted sequence.
///
/// Position q·(n−1); interpolates between the two surrounding values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let frac = pos - lower as f64;

    if lower + 1 < sorted.len() {
        sorted[lower] + frac * (sorted[lower + 1] - sorted[lower])
    } else {
        sorted[lower]
    }
}

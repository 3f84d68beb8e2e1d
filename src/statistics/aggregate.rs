//! Summary statistics over a sample of roll totals.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Percentile ranks reported for every distribution.
pub const PERCENTILE_RANKS: [u8; 9] = [0, 5, 10, 25, 50, 75, 90, 95, 100];

/// Decimal places kept on every floating output.
pub const DECIMAL_PLACES: i32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResult {
    pub min: i64,
    pub max: i64,
    pub mean: f64,
    pub variance: f64,
    #[serde(rename = "standardDeviation")]
    pub stddev: f64,
    pub skewness: f64,
    /// Excess kurtosis; a normal distribution scores about 0.
    pub kurtosis: f64,
    pub percentiles: BTreeMap<u8, f64>,
}

impl StatisticsResult {
    pub fn percentile(&self, rank: u8) -> Option<f64> {
        self.percentiles.get(&rank).copied()
    }

    pub fn median(&self) -> Option<f64> {
        self.percentile(50)
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let shift = 10f64.powi(places);
    (value * shift).round() / shift
}

/// Computes [`StatisticsResult`] for `samples`; `None` when there are none.
pub fn aggregate(samples: &[i64]) -> Option<StatisticsResult> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let n = sorted.len() as f64;
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let sum: i128 = sorted.iter().map(|&v| i128::from(v)).sum();
    let mean = sum as f64 / n;

    // deviations are taken in exact integer arithmetic (n·v - sum) so values
    // beyond f64 precision still give zero spread for a constant sample
    let count = sorted.len() as i128;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &v in &sorted {
        let diff = (i128::from(v) * count - sum) as f64 / n;
        let sq = diff * diff;
        m2 += sq;
        m3 += sq * diff;
        m4 += sq * sq;
    }

    let variance = m2 / n;
    let stddev = variance.sqrt();
    // constant samples have no spread; keep the shape moments finite
    let (skewness, kurtosis) = if stddev > 0.0 {
        ((m3 / n) / stddev.powi(3), (m4 / n) / variance.powi(2) - 3.0)
    } else {
        (0.0, 0.0)
    };

    let percentiles = PERCENTILE_RANKS
        .iter()
        .map(|&rank| (rank, round_to(percentile(&sorted, rank), DECIMAL_PLACES)))
        .collect();

    Some(StatisticsResult {
        min,
        max,
        mean: round_to(mean, DECIMAL_PLACES),
        variance: round_to(variance, DECIMAL_PLACES),
        stddev: round_to(stddev, DECIMAL_PLACES),
        skewness: round_to(skewness, DECIMAL_PLACES),
        kurtosis: round_to(kurtosis, DECIMAL_PLACES),
        percentiles,
    })
}

// Linear interpolation between order statistics; `sorted` must be non-empty.
fn percentile(sorted: &[i64], rank: u8) -> f64 {
    let index = (sorted.len() - 1) as f64 * f64::from(rank) / 100.0;
    let lower = index.floor() as usize;
    if lower >= sorted.len() - 1 {
        return sorted[sorted.len() - 1] as f64;
    }
    let (a, b) = (sorted[lower] as f64, sorted[lower + 1] as f64);
    a + (b - a) * (index - lower as f64)
}

//! Impact scoring model.
//!
//! Pure functions only. Every formula produces a value in `[0.0, 1.0]`,
//! rounded to two decimals, from status weights (see
//! [`ComponentStatus::weight`]) and simple structural measures.

// Component counts are far below 2^52, so usize -> f64 is exact in practice.
#![allow(clippy::cast_precision_loss)]

use crate::domain::ComponentStatus;

/// Depth at which the depth factor of an impact score saturates.
pub const DEPTH_SATURATION: f64 = 5.0;

/// Variance of domain sizes at which the variance factor saturates.
pub const VARIANCE_SATURATION: f64 = 100.0;

/// Round to two decimals.
///
/// Rounds the exact binary value rather than `value * 100`, so `0.475`
/// (stored just below the tie) becomes `0.47`.
pub fn round_score(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Clamp to `[0, 1]` and round.
pub fn finalize(value: f64) -> f64 {
    round_score(value.clamp(0.0, 1.0))
}

/// `part / whole`, or `0.0` for an empty whole.
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Mean status weight, or `0.0` when there are no statuses.
pub fn mean_weight<I>(statuses: I) -> f64
where
    I: IntoIterator<Item = ComponentStatus>,
{
    let (sum, count) = statuses
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), status| {
            (sum + status.weight(), count + 1)
        });
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Population variance of a set of sizes.
pub fn population_variance(sizes: &[usize]) -> f64 {
    if sizes.is_empty() {
        return 0.0;
    }
    let n = sizes.len() as f64;
    let mean = sizes.iter().map(|&s| s as f64).sum::<f64>() / n;
    sizes
        .iter()
        .map(|&s| {
            let d = s as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n
}

/// Inputs to the single-source impact score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactFactors {
    /// `|affected| / |all components|`
    pub affected_ratio: f64,
    /// Mean status weight over the affected set
    pub criticality: f64,
    /// Largest BFS depth reached from the source
    pub max_depth: usize,
}

impl ImpactFactors {
    /// `min(max_depth / 5, 1)`
    pub fn depth_factor(&self) -> f64 {
        (self.max_depth as f64 / DEPTH_SATURATION).min(1.0)
    }

    /// `0.4·ratio + 0.4·criticality + 0.2·depth`, clamped and rounded.
    pub fn score(&self) -> f64 {
        finalize(0.4 * self.affected_ratio + 0.4 * self.criticality + 0.2 * self.depth_factor())
    }
}

/// Inputs to the partition score: one entry per failure domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionFactors {
    /// Number of members per domain
    pub domain_sizes: Vec<usize>,
    /// Mean status weight per domain
    pub domain_criticality: Vec<f64>,
}

impl PartitionFactors {
    /// `1 / (1 + 0.2·domains)`: more, smaller domains mean less coupling.
    pub fn domain_factor(&self) -> f64 {
        1.0 / (1.0 + 0.2 * self.domain_sizes.len() as f64)
    }

    /// `min(variance(sizes) / 100, 1)`
    pub fn variance_factor(&self) -> f64 {
        (population_variance(&self.domain_sizes) / VARIANCE_SATURATION).min(1.0)
    }

    /// Mean of the per-domain criticalities.
    pub fn average_criticality(&self) -> f64 {
        if self.domain_criticality.is_empty() {
            0.0
        } else {
            self.domain_criticality.iter().sum::<f64>() / self.domain_criticality.len() as f64
        }
    }

    /// `0.4·domain + 0.3·variance + 0.3·criticality`, clamped and rounded.
    ///
    /// With no domains the domain factor is 1, so the score is `0.4`.
    pub fn score(&self) -> f64 {
        finalize(
            0.4 * self.domain_factor()
                + 0.3 * self.variance_factor()
                + 0.3 * self.average_criticality(),
        )
    }
}

/// `0.5·ratio + 0.5·criticality`, clamped and rounded.
pub fn health_score(affected_ratio: f64, criticality: f64) -> f64 {
    finalize(0.5 * affected_ratio + 0.5 * criticality)
}

//! Combining scalar scores across an ordered sequence of snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    #[default]
    Mean,
    WeightedMean,
}

impl AggregationMethod {
    pub const ALL: [AggregationMethod; 2] = [AggregationMethod::Mean, AggregationMethod::WeightedMean];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMethod::Mean => "mean",
            AggregationMethod::WeightedMean => "weighted_mean",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.as_str() == s)
    }
}

impl fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotWeighting {
    #[default]
    Uniform,
    /// Later snapshots weigh more
    RecencyDecay,
}

impl SnapshotWeighting {
    pub const ALL: [SnapshotWeighting; 2] = [SnapshotWeighting::Uniform, SnapshotWeighting::RecencyDecay];

    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotWeighting::Uniform => "uniform",
            SnapshotWeighting::RecencyDecay => "recency_decay",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|w| w.as_str() == s)
    }
}

impl fmt::Display for SnapshotWeighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregation settings from the weights config
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub method: AggregationMethod,
    pub weighting: SnapshotWeighting,
    pub decay_lambda: f64,
}

impl Default for Aggregation {
    fn default() -> Self {
        Self {
            method: AggregationMethod::Mean,
            weighting: SnapshotWeighting::Uniform,
            decay_lambda: 0.15,
        }
    }
}

impl Aggregation {
    pub fn apply(&self, scores: &[f64]) -> f64 {
        aggregate(scores, self.method, self.weighting, self.decay_lambda)
    }
}

/// Normalized weights for `n` ordered snapshots.
///
/// Recency decay gives index `i` a weight proportional to
/// `exp(-lambda * (n - 1 - i))`, so the last snapshot weighs the most.
pub fn snapshot_weights(n: usize, weighting: SnapshotWeighting, lambda: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    match weighting {
        SnapshotWeighting::Uniform => vec![1.0 / n as f64; n],
        SnapshotWeighting::RecencyDecay => {
            let raw: Vec<f64> = (0..n)
                .map(|i| (-lambda * (n - 1 - i) as f64).exp())
                .collect();
            let total: f64 = raw.iter().sum();
            if total <= 0.0 || !total.is_finite() {
                return vec![1.0 / n as f64; n];
            }
            raw.into_iter().map(|w| w / total).collect()
        }
    }
}

/// Combine ordered scores into one value; 0.0 for an empty slice
pub fn aggregate(
    scores: &[f64],
    method: AggregationMethod,
    weighting: SnapshotWeighting,
    lambda: f64,
) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    match method {
        AggregationMethod::Mean => scores.iter().sum::<f64>() / scores.len() as f64,
        AggregationMethod::WeightedMean => snapshot_weights(scores.len(), weighting, lambda)
            .iter()
            .zip(scores)
            .map(|(w, s)| w * s)
            .sum(),
    }
}

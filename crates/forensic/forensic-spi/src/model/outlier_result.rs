//! Outlier detection result types.

use serde::{Deserialize, Serialize};

/// Outlier detection result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierResult {
    /// Boolean mask indicating outliers.
    pub is_outlier: Vec<bool>,
    /// Outlier scores for each point. Higher is more anomalous.
    pub scores: Vec<f64>,
    /// Score threshold used for detection.
    pub threshold: f64,
}

impl OutlierResult {
    /// Create a new outlier result.
    pub fn new(is_outlier: Vec<bool>, scores: Vec<f64>, threshold: f64) -> Self {
        Self {
            is_outlier,
            scores,
            threshold,
        }
    }

    /// Get indices of detected outliers.
    pub fn outlier_indices(&self) -> Vec<usize> {
        self.is_outlier
            .iter()
            .enumerate()
            .filter_map(|(i, &flagged)| if flagged { Some(i) } else { None })
            .collect()
    }

    /// Count of detected outliers.
    pub fn outlier_count(&self) -> usize {
        self.is_outlier.iter().filter(|&&x| x).count()
    }
}

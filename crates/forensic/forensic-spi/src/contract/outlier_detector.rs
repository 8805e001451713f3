//! Outlier detector trait definition.

use crate::error::Result;
use crate::model::OutlierResult;

/// Unsupervised outlier detector over transaction amounts.
///
/// Implementations are fit once per batch and must be deterministic for a
/// fixed configuration.
pub trait OutlierDetector: Send + Sync {
    /// Detector name, for logs.
    fn name(&self) -> &str;

    /// Fit the detector to a batch of amounts.
    fn fit(&mut self, amounts: &[f64]) -> Result<()>;

    /// Detect outliers in amounts.
    fn detect(&self, amounts: &[f64]) -> Result<OutlierResult>;

    /// Compute outlier scores without thresholding.
    fn score(&self, amounts: &[f64]) -> Result<Vec<f64>>;

    /// Check if detector has been fitted.
    fn is_fitted(&self) -> bool;

    /// Fit on `amounts` and classify every amount of the same batch.
    ///
    /// An empty batch yields an empty mask.
    fn fit_and_score(&mut self, amounts: &[f64]) -> Result<Vec<bool>> {
        if amounts.is_empty() {
            return Ok(Vec::new());
        }
        self.fit(amounts)?;
        Ok(self.detect(amounts)?.is_outlier)
    }
}

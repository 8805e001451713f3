//! Outlier detector implementations.

use forensic_api::{DetectorConfig, DetectorKind};
use forensic_spi::{ForensicError, OutlierDetector, OutlierResult, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Euler-Mascheroni constant.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Build the detector selected by `config`.
pub fn build_detector(config: &DetectorConfig) -> Box<dyn OutlierDetector> {
    match config.kind {
        DetectorKind::IsolationForest => Box::new(IsolationForest::from_config(config)),
        DetectorKind::RobustZScore => Box::new(RobustZScoreDetector::from_config(config)),
    }
}

// ============================================================================
// Isolation Forest
// ============================================================================

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        value: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn grow(values: &[f64], depth: usize, limit: usize, rng: &mut StdRng) -> Node {
        if depth >= limit || values.len() <= 1 {
            return Node::Leaf { size: values.len() };
        }
        let (min, max) = min_max(values);
        if max <= min {
            return Node::Leaf { size: values.len() };
        }

        let value = rng.gen_range(min..max);
        let (left, right): (Vec<f64>, Vec<f64>) = values.iter().partition(|&&x| x < value);
        Node::Split {
            value,
            left: Box::new(Node::grow(&left, depth + 1, limit, rng)),
            right: Box::new(Node::grow(&right, depth + 1, limit, rng)),
        }
    }

    fn path_length(&self, x: f64) -> f64 {
        let mut node = self;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split { value, left, right } => {
                    node = if x < *value { left.as_ref() } else { right.as_ref() };
                    depth += 1.0;
                }
            }
        }
    }
}

/// Isolation forest over univariate amounts.
///
/// Each tree isolates points with random splits on a sub-sample; outliers
/// have short average paths. Scores are `2^(-E[h(x)] / c(psi))`, and the
/// threshold is the `1 - contamination` percentile of the training scores.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    n_estimators: usize,
    max_samples: usize,
    contamination: f64,
    seed: u64,
    trees: Vec<Node>,
    sample_size: usize,
    threshold: f64,
    fitted: bool,
}

impl IsolationForest {
    /// Create a new isolation forest.
    pub fn new(n_estimators: usize, max_samples: usize, contamination: f64, seed: u64) -> Self {
        Self {
            n_estimators,
            max_samples,
            contamination,
            seed,
            trees: Vec::new(),
            sample_size: 0,
            threshold: f64::INFINITY,
            fitted: false,
        }
    }

    /// Create from configuration.
    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(
            config.n_estimators,
            config.max_samples,
            config.contamination_rate,
            config.seed,
        )
    }

    /// Score threshold learned during fit.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self::from_config(&DetectorConfig::default())
    }
}

impl OutlierDetector for IsolationForest {
    fn name(&self) -> &str {
        "isolation_forest"
    }

    fn fit(&mut self, amounts: &[f64]) -> Result<()> {
        check_fit_input(amounts)?;

        let n = amounts.len();
        self.sample_size = self.max_samples.min(n);
        let limit = (self.sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(self.seed);

        self.trees = (0..self.n_estimators)
            .map(|_| {
                let sample: Vec<f64> = rand::seq::index::sample(&mut rng, n, self.sample_size)
                    .iter()
                    .map(|i| amounts[i])
                    .collect();
                Node::grow(&sample, 0, limit, &mut rng)
            })
            .collect();
        self.fitted = true;

        let scores = self.score(amounts)?;
        self.threshold = percentile(&scores, 1.0 - self.contamination);
        Ok(())
    }

    fn detect(&self, amounts: &[f64]) -> Result<OutlierResult> {
        let scores = self.score(amounts)?;
        let is_outlier = scores.iter().map(|&s| s > self.threshold).collect();
        Ok(OutlierResult::new(is_outlier, scores, self.threshold))
    }

    fn score(&self, amounts: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(ForensicError::NotFitted);
        }
        let normalizer = average_path_length(self.sample_size);
        Ok(amounts
            .iter()
            .map(|&x| {
                let mean_path = self
                    .trees
                    .iter()
                    .map(|tree| tree.path_length(x))
                    .sum::<f64>()
                    / self.trees.len() as f64;
                if normalizer > 0.0 {
                    2f64.powf(-mean_path / normalizer)
                } else {
                    0.5
                }
            })
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

// ============================================================================
// Robust Z-Score Detector
// ============================================================================

/// Modified z-score detector based on the median absolute deviation.
///
/// Scores are `0.6745 * |x - median| / MAD`; the contamination percentile of
/// the training scores is the threshold. Deterministic without a seed.
#[derive(Debug, Clone)]
pub struct RobustZScoreDetector {
    contamination: f64,
    median: f64,
    spread: f64,
    threshold: f64,
    fitted: bool,
}

impl RobustZScoreDetector {
    /// Create a new robust z-score detector.
    pub fn new(contamination: f64) -> Self {
        Self {
            contamination,
            median: 0.0,
            spread: 0.0,
            threshold: f64::INFINITY,
            fitted: false,
        }
    }

    /// Create from configuration.
    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.contamination_rate)
    }

    /// Get the fitted median
    pub fn median(&self) -> f64 {
        self.median
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for RobustZScoreDetector {
    fn default() -> Self {
        Self::new(0.06)
    }
}

impl OutlierDetector for RobustZScoreDetector {
    fn name(&self) -> &str {
        "robust_zscore"
    }

    fn fit(&mut self, amounts: &[f64]) -> Result<()> {
        check_fit_input(amounts)?;

        self.median = median(amounts);
        let deviations: Vec<f64> = amounts.iter().map(|x| (x - self.median).abs()).collect();
        let mad = median(&deviations);
        // MAD collapses when more than half the batch shares one value
        self.spread = if mad > 0.0 {
            mad / 0.6745
        } else {
            1.253_314 * deviations.iter().sum::<f64>() / deviations.len() as f64
        };
        self.fitted = true;

        let scores = self.score(amounts)?;
        self.threshold = percentile(&scores, 1.0 - self.contamination);
        Ok(())
    }

    fn detect(&self, amounts: &[f64]) -> Result<OutlierResult> {
        let scores = self.score(amounts)?;
        let is_outlier = scores.iter().map(|&s| s > self.threshold).collect();
        Ok(OutlierResult::new(is_outlier, scores, self.threshold))
    }

    fn score(&self, amounts: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(ForensicError::NotFitted);
        }
        if self.spread == 0.0 {
            return Ok(vec![0.0; amounts.len()]);
        }
        Ok(amounts
            .iter()
            .map(|&x| (x - self.median).abs() / self.spread)
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn check_fit_input(amounts: &[f64]) -> Result<()> {
    if let Some(i) = amounts.iter().position(|x| !x.is_finite()) {
        return Err(ForensicError::DetectionError(format!(
            "non-finite amount at index {}",
            i
        )));
    }
    let distinct = distinct_count(amounts);
    if distinct < 2 {
        return Err(ForensicError::InsufficientData {
            required: 2,
            got: distinct,
        });
    }
    let (min, max) = min_max(amounts);
    if !(max - min).is_finite() {
        return Err(ForensicError::DetectionError(format!(
            "amount range [{}, {}] overflows",
            min, max
        )));
    }
    Ok(())
}

fn distinct_count(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        })
}

/// Average path length of an unsuccessful BST search over `n` points.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

fn median(values: &[f64]) -> f64 {
    percentile(values, 0.5)
}

/// Linear-interpolation percentile, `q` in [0, 1].
fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

//! Batch annotation engine.

use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

use forensic_api::DetectorConfig;
use forensic_spi::{RawAward, Result, Transaction};
use tracing::{info, warn};

use crate::detectors::build_detector;
use crate::digits::leading_digit;
use crate::identifier::award_id;

/// An immutable, annotated batch of transactions.
///
/// Cloning is cheap; clones share the same transactions.
#[derive(Debug, Clone)]
pub struct AnnotatedBatch {
    transactions: Arc<[Transaction]>,
    total_amount: f64,
    outlier_count: usize,
}

impl AnnotatedBatch {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        let total_amount = transactions.iter().map(|t| t.amount).sum();
        let outlier_count = transactions.iter().filter(|t| t.is_outlier).count();
        Self {
            transactions: transactions.into(),
            total_amount,
            outlier_count,
        }
    }

    /// The "no data available" batch.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn amounts(&self) -> Vec<f64> {
        self.transactions.iter().map(|t| t.amount).collect()
    }

    /// Sum of every amount in the batch.
    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    pub fn outlier_count(&self) -> usize {
        self.outlier_count
    }
}

impl Default for AnnotatedBatch {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for AnnotatedBatch {
    type Target = [Transaction];

    fn deref(&self) -> &[Transaction] {
        &self.transactions
    }
}

/// Scores a raw batch once at ingestion time.
#[derive(Debug, Clone, Default)]
pub struct ForensicEngine {
    config: DetectorConfig,
}

impl ForensicEngine {
    /// Create an engine, validating the detector configuration.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Annotate every record with its leading digit and outlier flag.
    ///
    /// The detector is fit once over the whole amount column. A fit failure
    /// degrades to no outliers flagged. An empty batch yields an empty result.
    pub fn annotate(&self, batch: &[RawAward]) -> AnnotatedBatch {
        if batch.is_empty() {
            return AnnotatedBatch::empty();
        }

        let amounts: Vec<f64> = batch.iter().map(|r| r.amount).collect();
        let mut detector = build_detector(&self.config);
        let flags = match detector.fit_and_score(&amounts) {
            Ok(flags) => flags,
            Err(e) => {
                warn!(
                    detector = detector.name(),
                    records = batch.len(),
                    error = %e,
                    "outlier fit failed, no records flagged"
                );
                vec![false; batch.len()]
            }
        };

        let transactions: Vec<Transaction> = batch
            .iter()
            .zip(flags)
            .enumerate()
            .map(|(index, (record, is_outlier))| Transaction {
                index,
                id: award_id(&record.short_id),
                recipient_name: record.recipient_name.clone(),
                amount: record.amount,
                is_outlier,
                leading_digit: leading_digit(record.amount),
            })
            .collect();

        let mut seen = HashSet::with_capacity(transactions.len());
        let duplicates = transactions
            .iter()
            .filter(|t| !seen.insert(t.id.as_str()))
            .count();
        if duplicates > 0 {
            warn!(duplicates, "batch contains repeated award ids");
        }

        let annotated = AnnotatedBatch::new(transactions);
        info!(
            detector = detector.name(),
            records = annotated.len(),
            outliers = annotated.outlier_count(),
            total_amount = annotated.total_amount(),
            "batch annotated"
        );
        annotated
    }
}

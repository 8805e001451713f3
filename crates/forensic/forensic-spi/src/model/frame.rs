//! Display frame produced once per tick.

use serde::{Deserialize, Serialize};

use super::{DigitDistribution, ScanStatus, Transaction};

/// One line of the live forensic feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub time: String,
    /// Recipient name truncated for display.
    pub name: String,
    pub status: ScanStatus,
    pub color: String,
}

/// A point of the amount-vs-index scatter plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub index: usize,
    pub amount: f64,
}

/// Scatter data partitioned into background and flagged points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScatterData {
    pub background: Vec<ScatterPoint>,
    pub flagged: Vec<ScatterPoint>,
}

/// Everything a renderer needs for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayFrame {
    pub clock: String,
    pub tick: u64,
    pub cycle: u64,
    pub position: usize,
    pub feed: Vec<FeedEntry>,
    pub capital_analyzed: f64,
    pub capital_display: String,
    /// Color of the status of the transaction visited this tick.
    pub capital_color: Option<String>,
    pub ledger_count: usize,
    pub observed: DigitDistribution,
    pub expected: DigitDistribution,
    /// Chi-squared statistic of the observed leading digits against Benford.
    pub benford_chi_squared: f64,
    pub scatter: ScatterData,
    pub ledger: Vec<Transaction>,
}

impl DisplayFrame {
    /// Steady "no data" frame: the clock keeps ticking, everything else is empty.
    pub fn no_data(clock: impl Into<String>) -> Self {
        Self {
            clock: clock.into(),
            tick: 0,
            cycle: 0,
            position: 0,
            feed: Vec::new(),
            capital_analyzed: 0.0,
            capital_display: "$0.00".to_string(),
            capital_color: None,
            ledger_count: 0,
            observed: DigitDistribution::zeros(),
            expected: DigitDistribution::zeros(),
            benford_chi_squared: 0.0,
            scatter: ScatterData::default(),
            ledger: Vec::new(),
        }
    }

    /// Whether this frame represents the "no data" state.
    pub fn is_empty(&self) -> bool {
        self.feed.is_empty() && self.ledger.is_empty() && self.scatter.background.is_empty()
    }
}

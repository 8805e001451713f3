//! Scan status of a replayed transaction.

use serde::{Deserialize, Serialize};

/// Status reported for a transaction when the replay cursor visits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanStatus {
    /// Outlier seen for the first time.
    Flagged,
    /// Outlier already recorded in the ledger.
    Monitored,
    /// Not an outlier.
    Passed,
}

impl ScanStatus {
    /// Display label used in the feed.
    pub fn label(&self) -> &'static str {
        match self {
            ScanStatus::Flagged => "FLAGGED",
            ScanStatus::Monitored => "MONITORED",
            ScanStatus::Passed => "PASSED",
        }
    }

    /// Color code used by renderers.
    pub fn color(&self) -> &'static str {
        match self {
            ScanStatus::Flagged => "#ff4d4d",
            ScanStatus::Monitored => "#FFD700",
            ScanStatus::Passed => "#00f5d4",
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

//! Forensic Scoring Service Provider Interface
//!
//! Defines traits and types shared by the forensic scoring engine.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{AwardSource, OutlierDetector};
pub use error::{ForensicError, Result};
pub use model::{
    DigitDistribution, DisplayFrame, FeedEntry, OutlierResult, RawAward, ScanStatus, ScatterData,
    ScatterPoint, Transaction,
};

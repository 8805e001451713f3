//! Data models for forensic scoring.
//!
//! This module contains data structures used throughout the forensic engine.

mod award;
mod distribution;
mod frame;
mod outlier_result;
mod status;

pub use award::{RawAward, Transaction};
pub use distribution::DigitDistribution;
pub use frame::{DisplayFrame, FeedEntry, ScatterData, ScatterPoint};
pub use outlier_result::OutlierResult;
pub use status::ScanStatus;

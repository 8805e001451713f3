//! # forensic
//!
//! Forensic anomaly scoring for award records.
//!
//! This facade provides a single entry point to all forensic functionality:
//! - `OutlierDetector` and `AwardSource` traits and the models from SPI
//! - Configuration types from API
//! - Detectors (`IsolationForest`, `RobustZScoreDetector`), Benford profiling,
//!   `ForensicEngine`, `ReplayCursor`, `AnomalyLedger` and `Session` from Core

// Re-export everything from SPI
pub use forensic_spi::*;

// Re-export everything from API
pub use forensic_api::*;

// Re-export everything from Core
pub use forensic_core::*;

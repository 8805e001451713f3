//! Contract definitions for forensic scoring.
//!
//! This module contains trait definitions that providers must implement.

mod award_source;
mod outlier_detector;

pub use award_source::AwardSource;
pub use outlier_detector::OutlierDetector;

//! Error types for forensic scoring.
//!
//! This module contains error types and the Result alias.

mod forensic_error;

pub use forensic_error::{ForensicError, Result};

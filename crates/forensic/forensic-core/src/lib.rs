//! Forensic Scoring Core
//!
//! Implementations for leading-digit profiling, outlier detection, batch
//! annotation, cyclic replay and the anomaly ledger.

mod cursor;
mod detectors;
mod digits;
mod engine;
mod feed;
mod format;
mod identifier;
mod ledger;
mod session;
mod sources;

pub use cursor::*;
pub use detectors::*;
pub use digits::*;
pub use engine::*;
pub use feed::*;
pub use format::*;
pub use identifier::*;
pub use ledger::*;
pub use session::*;
pub use sources::*;

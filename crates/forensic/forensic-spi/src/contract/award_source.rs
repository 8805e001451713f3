//! Award source trait definition.

use crate::error::Result;
use crate::model::RawAward;

/// Trait for sources that return a batch of raw award records.
pub trait AwardSource: Send + Sync {
    /// Data source name.
    fn name(&self) -> &str;

    /// Fetch the batch.
    fn fetch(&self) -> Result<Vec<RawAward>>;
}

//! Award record types.

use serde::{Deserialize, Deserializer, Serialize};

/// An award record as returned by a data source, before annotation.
///
/// Field names from the award-search API (`"Award ID"`, `"Recipient Name"`,
/// `"Award Amount"`) are accepted as aliases. A null name reads as empty and
/// a null amount reads as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAward {
    #[serde(alias = "Award ID")]
    pub short_id: String,
    #[serde(alias = "Recipient Name", default, deserialize_with = "null_as_empty")]
    pub recipient_name: String,
    #[serde(alias = "Award Amount", alias = "Amount", deserialize_with = "null_as_nan")]
    pub amount: f64,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl RawAward {
    pub fn new(
        short_id: impl Into<String>,
        recipient_name: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            short_id: short_id.into(),
            recipient_name: recipient_name.into(),
            amount,
        }
    }
}

/// An annotated transaction. Immutable once produced by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Position in the ingested batch.
    pub index: usize,
    /// Full identifier derived from the source short id.
    pub id: String,
    pub recipient_name: String,
    pub amount: f64,
    /// Outlier flag assigned by the batch-level detector fit.
    pub is_outlier: bool,
    /// Leading significant digit of `|amount|`, 0 for a zero magnitude.
    pub leading_digit: u8,
}

//! Deduplicated anomaly ledger.

use std::collections::HashSet;
use std::io;

use forensic_spi::{ForensicError, Result, ScanStatus, Transaction};
use serde::{Deserialize, Serialize};

/// Outcome of offering one transaction to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Whether the transaction was inserted by this call.
    pub added: bool,
    pub status: ScanStatus,
}

#[derive(Serialize)]
struct LedgerRow<'a> {
    id: &'a str,
    recipient_name: &'a str,
    amount: f64,
}

/// Append-only set of flagged transactions, keyed by id, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct AnomalyLedger {
    entries: Vec<Transaction>,
    ids: HashSet<String>,
}

impl AnomalyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `transaction` if it is an outlier not seen before.
    pub fn observe(&mut self, transaction: &Transaction) -> Observation {
        if !transaction.is_outlier {
            return Observation {
                added: false,
                status: ScanStatus::Passed,
            };
        }
        if self.ids.contains(&transaction.id) {
            return Observation {
                added: false,
                status: ScanStatus::Monitored,
            };
        }
        self.ids.insert(transaction.id.clone());
        self.entries.push(transaction.clone());
        Observation {
            added: true,
            status: ScanStatus::Flagged,
        }
    }

    /// Number of distinct entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Entries in insertion order.
    pub fn snapshot(&self) -> &[Transaction] {
        &self.entries
    }

    /// Write the ledger as CSV with columns `id,recipient_name,amount`.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        if self.entries.is_empty() {
            csv_writer
                .write_record(["id", "recipient_name", "amount"])
                .map_err(|e| ForensicError::Export(e.to_string()))?;
        }
        for entry in &self.entries {
            csv_writer
                .serialize(LedgerRow {
                    id: &entry.id,
                    recipient_name: &entry.recipient_name,
                    amount: entry.amount,
                })
                .map_err(|e| ForensicError::Export(e.to_string()))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| ForensicError::Export(e.to_string()))
    }
}

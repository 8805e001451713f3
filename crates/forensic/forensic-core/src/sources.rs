//! Award source implementations.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use forensic_spi::{AwardSource, ForensicError, RawAward, Result};
use serde::Deserialize;
use tracing::{info, warn};

/// Fetch from `source`, degrading any failure to an empty batch.
pub fn fetch_or_empty(source: &dyn AwardSource) -> Vec<RawAward> {
    match source.fetch() {
        Ok(awards) => {
            info!(source = source.name(), records = awards.len(), "awards fetched");
            awards
        }
        Err(e) => {
            warn!(
                source = source.name(),
                error = %e,
                "award fetch failed, continuing with no data"
            );
            Vec::new()
        }
    }
}

/// Drop records whose amount is missing or not finite.
fn retain_usable(source_name: &str, mut awards: Vec<RawAward>) -> Vec<RawAward> {
    let before = awards.len();
    awards.retain(|a| a.amount.is_finite());
    let dropped = before - awards.len();
    if dropped > 0 {
        warn!(source = source_name, dropped, "skipped records without a usable amount");
    }
    awards
}

// ============================================================================
// In-memory Source
// ============================================================================

/// A fixed, in-memory batch.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    awards: Vec<RawAward>,
}

impl StaticSource {
    pub fn new(awards: Vec<RawAward>) -> Self {
        Self { awards }
    }
}

impl AwardSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self) -> Result<Vec<RawAward>> {
        Ok(self.awards.clone())
    }
}

// ============================================================================
// JSON File Source
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum AwardPayload {
    List(Vec<RawAward>),
    Search { results: Vec<RawAward> },
}

/// Awards stored as JSON: either an array of records or a search response
/// object with a `results` array.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl AwardSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<Vec<RawAward>> {
        let file =
            File::open(&self.path).map_err(|e| ForensicError::source(&self.name, e.to_string()))?;
        let payload: AwardPayload = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| ForensicError::source(&self.name, format!("malformed response: {}", e)))?;
        let awards = match payload {
            AwardPayload::List(awards) => awards,
            AwardPayload::Search { results } => results,
        };
        Ok(retain_usable(&self.name, awards))
    }
}

// ============================================================================
// CSV File Source
// ============================================================================

/// Awards stored as CSV with a header row.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
    name: String,
}

impl CsvFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl AwardSource for CsvFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<Vec<RawAward>> {
        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| ForensicError::source(&self.name, e.to_string()))?;
        let awards = reader
            .deserialize()
            .map(|row| row.map_err(|e| ForensicError::source(&self.name, e.to_string())))
            .collect::<Result<Vec<RawAward>>>()?;
        Ok(retain_usable(&self.name, awards))
    }
}

/// Pick a file source by extension: `.csv` reads CSV, anything else JSON.
pub fn file_source(path: impl AsRef<Path>) -> Box<dyn AwardSource> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        Box::new(CsvFileSource::new(path))
    } else {
        Box::new(JsonFileSource::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_json_list() {
        let file = write_temp(
            ".json",
            r#"[{"short_id": "A1", "recipient_name": "Acme", "amount": 12.5}]"#,
        );
        let awards = JsonFileSource::new(file.path()).fetch().unwrap();
        assert_eq!(awards, vec![RawAward::new("A1", "Acme", 12.5)]);
    }

    #[test]
    fn test_json_search_response() {
        let file = write_temp(
            ".json",
            r#"{"results": [
                {"Award ID": "N001", "Recipient Name": "Acme", "Award Amount": 1000000.0, "Awarding Agency": "DoD"},
                {"Award ID": "N002", "Recipient Name": "Beta", "Award Amount": 25.0}
            ], "page_metadata": {"page": 1}}"#,
        );
        let awards = JsonFileSource::new(file.path()).fetch().unwrap();
        assert_eq!(awards.len(), 2);
        assert_eq!(awards[0].short_id, "N001");
        assert_eq!(awards[1].amount, 25.0);
    }

    #[test]
    fn test_json_null_fields_keep_batch() {
        let file = write_temp(
            ".json",
            r#"{"results": [
                {"Award ID": "N001", "Recipient Name": null, "Award Amount": 500.0},
                {"Award ID": "N002", "Recipient Name": "Beta", "Award Amount": null},
                {"Award ID": "N003", "Recipient Name": "Gamma", "Award Amount": 75.0}
            ]}"#,
        );
        let awards = JsonFileSource::new(file.path()).fetch().unwrap();
        assert_eq!(
            awards,
            vec![RawAward::new("N001", "", 500.0), RawAward::new("N003", "Gamma", 75.0)]
        );
    }

    #[test]
    fn test_csv_empty_amount_is_skipped() {
        let file = write_temp(
            ".csv",
            "Award ID,Recipient Name,Award Amount\nC1,,300.25\nC2,Delta Inc,\n",
        );
        let awards = CsvFileSource::new(file.path()).fetch().unwrap();
        assert_eq!(awards, vec![RawAward::new("C1", "", 300.25)]);
    }

    #[test]
    fn test_json_malformed_is_source_error() {
        let file = write_temp(".json", "{\"oops\": true}");
        let err = JsonFileSource::new(file.path()).fetch().unwrap_err();
        assert!(matches!(err, ForensicError::Source { .. }));
    }

    #[test]
    fn test_csv_source() {
        let file = write_temp(
            ".csv",
            "Award ID,Recipient Name,Award Amount\nC1,Gamma LLC,300.25\nC2,Delta Inc,-15\n",
        );
        let awards = file_source(file.path()).fetch().unwrap();
        assert_eq!(awards.len(), 2);
        assert_eq!(awards[1], RawAward::new("C2", "Delta Inc", -15.0));
    }

    #[test]
    fn test_fetch_or_empty_degrades() {
        let source = JsonFileSource::new("/nonexistent/awards.json");
        assert!(fetch_or_empty(&source).is_empty());

        let source = StaticSource::new(vec![RawAward::new("A", "B", 1.0)]);
        assert_eq!(fetch_or_empty(&source).len(), 1);
    }
}

use std::fs;
use std::path::Path;

use crate::types::{validate_records, TestRecord};

/// Load and validate the suite's test records.
///
/// Malformed data fails the whole run: a record with no cross-references or
/// a missing field means the upstream extraction broke, and silently
/// skipping it would publish an incomplete report.
pub fn load_records(path: &Path) -> Result<Vec<TestRecord>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let records: Vec<TestRecord> = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))?;
    validate_records(&records)
        .map_err(|e| format!("Invalid record in {}: {}", path.display(), e))?;
    Ok(records)
}

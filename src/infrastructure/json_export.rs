//! JSON export of harvested records
//!
//! Records are written as one pretty-printed array. Non-ASCII text is kept
//! as-is rather than escaped.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::domain::records::MergedRecord;

pub fn to_json(records: &[MergedRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize records")
}

/// Write records to `path`, creating parent directories as needed
pub async fn save_records(path: &Path, records: &[MergedRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    fs::write(path, to_json(records)?)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

pub async fn write_records_to_stdout(records: &[MergedRecord]) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(to_json(records)?.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await.context("Failed to flush stdout")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::FieldMap;

    fn record(id: &str, university: &str) -> MergedRecord {
        let mut fields = FieldMap::new();
        fields.insert("id".into(), id.into());
        fields.insert("university".into(), university.into());
        MergedRecord {
            id: id.into(),
            fields,
            error: None,
        }
    }

    #[tokio::test]
    async fn writes_pretty_array_keeping_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("applicant_data.json");

        save_records(&path, &[record("1", "Université de Montréal"), record("2", "MIT")])
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Université de Montréal"));
        assert!(content.starts_with("[\n"));

        let parsed: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1]["university"], "MIT");
    }

    #[test]
    fn empty_run_exports_empty_array() {
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }
}

//! Typed CSV reading

use super::{SourceError, SourceResult};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Deserialize every row of a headed CSV file into `T`, stopping after
/// `limit` rows when one is given.
pub fn read_csv<T: DeserializeOwned>(path: &Path, limit: Option<usize>) -> SourceResult<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::new();
    for (index, result) in reader.deserialize().enumerate() {
        if limit.map_or(false, |limit| index >= limit) {
            break;
        }
        let row: T = result.map_err(|source| SourceError::Row {
            path: path.to_path_buf(),
            row: index + 1,
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::records::ExemptionRecord;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_with_missing_columns_and_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "exemptions.csv",
            "company_number,etag\n 0001 ,e1\n0002,\n0003,e3\n",
        );

        let rows: Vec<ExemptionRecord> = read_csv(&path, None).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].company_number.as_deref(), Some("0001"));
        assert!(rows[0].notified_on.is_none());
        assert!(rows[1].etag.is_none());

        let sample: Vec<ExemptionRecord> = read_csv(&path, Some(2)).unwrap();
        assert_eq!(sample.len(), 2);
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let result: SourceResult<Vec<ExemptionRecord>> =
            read_csv(&dir.path().join("nope.csv"), None);
        assert!(matches!(result, Err(SourceError::Open { .. })));
    }
}

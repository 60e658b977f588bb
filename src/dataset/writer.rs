//! Dataset export
//!
//! Tables go to `<dir>/<name>.csv` with a header row, flushed every
//! `chunk_size` rows.

use super::table::Table;
use std::path::{Path, PathBuf};

pub struct DatasetWriter {
    dir: PathBuf,
    chunk_size: usize,
}

impl DatasetWriter {
    pub fn new(dir: impl Into<PathBuf>, chunk_size: usize) -> Self {
        DatasetWriter {
            dir: dir.into(),
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn location(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", name))
    }

    /// Write `table` as `<name>.csv` and return where it went
    pub fn write(&self, name: &str, table: &Table) -> csv::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let location = self.location(name);
        let mut writer = csv::Writer::from_path(&location)?;
        writer.write_record(table.columns())?;
        for chunk in table.rows().chunks(self.chunk_size) {
            for row in chunk {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }
        writer.flush()?;
        Ok(location)
    }
}

/// Read a dataset back as a [`Table`]
pub fn read_table(location: &Path) -> csv::Result<Table> {
    let mut reader = csv::Reader::from_path(location)?;
    let headers = reader.headers()?.clone();
    let mut table = Table::new(&headers.iter().collect::<Vec<_>>());
    for record in reader.records() {
        table.push(record?.iter().map(str::to_string).collect());
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DatasetWriter::new(dir.path().join("out"), 1);
        let mut table = Table::new(&["uid", "name"]);
        table.push(vec!["C1".into(), "ACME, LTD".into()]);
        table.push(vec!["C2".into(), "".into()]);

        let location = writer.write("company_nodes", &table).unwrap();
        assert_eq!(location, dir.path().join("out").join("company_nodes.csv"));
        assert_eq!(read_table(&location).unwrap(), table);
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DatasetWriter::new(dir.path(), 10);
        let location = writer.write("empty", &Table::new(&["uid_x", "uid_y"])).unwrap();
        let contents = std::fs::read_to_string(location).unwrap();
        assert_eq!(contents.trim(), "uid_x,uid_y");
    }
}

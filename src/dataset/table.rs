//! Column-named, string-celled tables
//!
//! Every intermediate dataset is a [`Table`]: a fixed header plus rows of
//! string cells, where the empty string means "no value". That is also
//! the on-disk convention of the exported CSV files.

use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Self {
        Table {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append a row; missing trailing cells are padded, extra cells dropped
    pub fn push(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Append a row given as `(column, value)` pairs. Unknown columns are
    /// ignored and absent values become empty cells.
    pub fn push_named<'a, I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (&'a str, Option<String>)>,
    {
        let mut row = vec![String::new(); self.columns.len()];
        for (column, value) in cells {
            if let (Some(index), Some(value)) = (self.column_index(column), value) {
                row[index] = value.trim().to_string();
            }
        }
        self.rows.push(row);
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| r[index].as_str())
    }

    /// Values of one column, in row order
    pub fn column_values<'a>(&'a self, column: &str) -> impl Iterator<Item = &'a str> + 'a {
        let index = self.column_index(column);
        self.rows
            .iter()
            .filter_map(move |row| index.map(|i| row[i].as_str()))
    }

    /// Drop rows where any of `columns` is empty
    pub fn retain_present(&mut self, columns: &[&str]) {
        let indexes: Vec<usize> = columns.iter().filter_map(|c| self.column_index(c)).collect();
        self.rows
            .retain(|row| indexes.iter().all(|&i| !row[i].is_empty()));
    }

    /// Keep the first row for each distinct combination of `columns`
    pub fn dedup_on(&mut self, columns: &[&str]) {
        let indexes: Vec<usize> = columns.iter().filter_map(|c| self.column_index(c)).collect();
        let mut seen: FxHashSet<Vec<String>> = FxHashSet::default();
        self.rows.retain(|row| {
            let key: Vec<String> = indexes.iter().map(|&i| row[i].clone()).collect();
            seen.insert(key)
        });
    }

    /// Drop exact duplicate rows, keeping the first
    pub fn dedup(&mut self) {
        let mut seen: FxHashSet<Vec<String>> = FxHashSet::default();
        self.rows.retain(|row| seen.insert(row.clone()));
    }

    /// Rewrite every cell of the named columns
    pub fn map_columns<F>(&mut self, columns: &[&str], mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        let indexes: Vec<usize> = columns.iter().filter_map(|c| self.column_index(c)).collect();
        for row in &mut self.rows {
            for &i in &indexes {
                row[i] = f(&row[i]);
            }
        }
    }

    /// Rewrite every cell
    pub fn map_all<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                *cell = f(cell);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges() -> Table {
        let mut table = Table::new(&["company_number", "uid", "notified_on"]);
        table.push(vec!["01".into(), "A".into(), "2020-01-01".into()]);
        table.push(vec!["01".into(), "A".into(), "2021-01-01".into()]);
        table.push(vec!["02".into(), "".into()]);
        table
    }

    #[test]
    fn test_push_pads_short_rows() {
        let table = edges();
        assert_eq!(table.rows()[2], vec!["02".to_string(), String::new(), String::new()]);
        assert_eq!(table.cell(0, "notified_on"), Some("2020-01-01"));
        assert_eq!(table.cell(0, "missing"), None);
    }

    #[test]
    fn test_dedup_on_keeps_first() {
        let mut table = edges();
        table.dedup_on(&["company_number", "uid"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, "notified_on"), Some("2020-01-01"));
    }

    #[test]
    fn test_retain_present() {
        let mut table = edges();
        table.retain_present(&["uid"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_push_named_ignores_unknown_columns() {
        let mut table = Table::new(&["uid", "name"]);
        table.push_named([
            ("name", Some(" ACME ".to_string())),
            ("other", Some("x".to_string())),
            ("uid", None),
        ]);
        assert_eq!(table.rows()[0], vec![String::new(), "ACME".to_string()]);
        assert_eq!(table.column_values("name").collect::<Vec<_>>(), vec!["ACME"]);
    }

    #[test]
    fn test_map_columns() {
        let mut table = edges();
        table.map_columns(&["uid"], |v| v.to_lowercase());
        assert_eq!(table.cell(0, "uid"), Some("a"));
        table.dedup();
        assert_eq!(table.len(), 3);
    }
}

//! Attribute-set union of same-UID rows
//!
//! Each UID accumulates one sorted set of distinct non-empty values per
//! attribute. Finishing joins every set with the separator, so the output
//! only depends on the set of contributed values, never on row order.
//! Incoming cells are split on the separator first, which makes merging
//! an already-merged table a no-op.

use super::table::Table;
use indexmap::IndexMap;
use std::collections::BTreeSet;

pub struct AttributeMerger {
    columns: Vec<String>,
    key_column: String,
    separator: String,
    groups: IndexMap<String, Vec<BTreeSet<String>>>,
}

impl AttributeMerger {
    /// `columns` is the output header; `key_column` must be one of them
    pub fn new<S: AsRef<str>>(columns: &[S], key_column: &str, separator: &str) -> Self {
        AttributeMerger {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            key_column: key_column.to_string(),
            separator: separator.to_string(),
            groups: IndexMap::new(),
        }
    }

    /// Fold every row of `table` in. Columns are matched by name; output
    /// columns the table lacks contribute nothing, rows with an empty key
    /// are skipped.
    pub fn add_table(&mut self, table: &Table) {
        let Some(key_index) = table.column_index(&self.key_column) else {
            return;
        };
        let mapping: Vec<Option<usize>> = self
            .columns
            .iter()
            .map(|column| table.column_index(column))
            .collect();

        for row in table.rows() {
            let key = row[key_index].trim();
            if key.is_empty() {
                continue;
            }
            let width = self.columns.len();
            let sets = self
                .groups
                .entry(key.to_string())
                .or_insert_with(|| vec![BTreeSet::new(); width]);
            for (set, source) in sets.iter_mut().zip(&mapping) {
                let Some(source) = source else { continue };
                for value in row[*source].split(self.separator.as_str()) {
                    let value = value.trim();
                    if !value.is_empty() {
                        set.insert(value.to_string());
                    }
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// One row per UID, in first-seen order
    pub fn finish(self) -> Table {
        let key_index = self.columns.iter().position(|c| *c == self.key_column);
        let mut table = Table::new(&self.columns);
        for (key, sets) in self.groups {
            let row = sets
                .into_iter()
                .enumerate()
                .map(|(i, set)| {
                    if Some(i) == key_index {
                        return key.clone();
                    }
                    let joined = set.into_iter().collect::<Vec<_>>().join(&self.separator);
                    joined.trim_matches(|c| c == '|' || c == ' ').to_string()
                })
                .collect();
            table.push(row);
        }
        table
    }
}

/// Merge `tables` into one row per distinct `key_column` value
pub fn merge_tables<S: AsRef<str>>(
    columns: &[S],
    key_column: &str,
    separator: &str,
    tables: &[&Table],
) -> Table {
    let mut merger = AttributeMerger::new(columns, key_column, separator);
    for table in tables {
        merger.add_table(table);
    }
    merger.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[[&str; 3]]) -> Table {
        let mut table = Table::new(&["uid", "name", "nationality"]);
        for row in data {
            table.push(row.iter().map(|s| s.to_string()).collect());
        }
        table
    }

    #[test]
    fn test_union_of_distinct_values() {
        let table = rows(&[
            ["P1", "JOHN SMITH", "BRITISH"],
            ["P1", "JOHN SMITH", "IRISH"],
            ["P1", "", "BRITISH"],
            ["P2", "JANE DOE", ""],
        ]);
        let merged = merge_tables(&["uid", "name", "nationality"], "uid", " | ", &[&table]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.cell(0, "name"), Some("JOHN SMITH"));
        assert_eq!(merged.cell(0, "nationality"), Some("BRITISH | IRISH"));
        assert_eq!(merged.cell(1, "nationality"), Some(""));
    }

    #[test]
    fn test_order_independent() {
        let a = rows(&[["P1", "A", "X"], ["P1", "B", "Y"]]);
        let b = rows(&[["P1", "B", "Y"], ["P1", "A", "X"]]);
        let columns = ["uid", "name", "nationality"];
        assert_eq!(
            merge_tables(&columns, "uid", " | ", &[&a]),
            merge_tables(&columns, "uid", " | ", &[&b])
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let columns = ["uid", "name", "nationality"];
        let table = rows(&[["P1", "A", "X"], ["P1", "B", "X"]]);
        let once = merge_tables(&columns, "uid", " | ", &[&table]);
        let twice = merge_tables(&columns, "uid", " | ", &[&once]);
        assert_eq!(once, twice);
        let again = merge_tables(&columns, "uid", " | ", &[&table, &table]);
        assert_eq!(once, again);
    }

    #[test]
    fn test_tables_with_different_columns() {
        let mut filing = Table::new(&["uid", "name"]);
        filing.push(vec!["C1".into(), "ACME".into()]);
        let mut target = Table::new(&["uid", "legal_form"]);
        target.push(vec!["C1".into(), "PLC".into()]);
        target.push(vec!["".into(), "ORPHAN".into()]);

        let merged =
            merge_tables(&["uid", "name", "legal_form"], "uid", " | ", &[&filing, &target]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.cell(0, "name"), Some("ACME"));
        assert_eq!(merged.cell(0, "legal_form"), Some("PLC"));
    }

    #[test]
    fn test_stray_separators_stripped() {
        let table = rows(&[["P1", "| A |", ""]]);
        let merged = merge_tables(&["uid", "name", "nationality"], "uid", " | ", &[&table]);
        assert_eq!(merged.cell(0, "name"), Some("A"));
    }
}

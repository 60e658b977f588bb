//! Approximate identity matching between person nodes
//!
//! Person rows are blocked on exact join key. Within each block every
//! unordered pair of distinct UIDs becomes a candidate `PROBABLY_SAME_PERSON`
//! edge. Pairs are normalized by sorting their UIDs and only the first
//! occurrence is kept. Matches are not transitively closed.

use crate::dataset::{EdgeSet, EdgeShape, EndpointMatch, Table};
use crate::graph::{EdgeType, Label};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{info, warn};

/// Block statistics of one matching run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub candidates: usize,
    pub blocks: usize,
    pub largest_block: usize,
    /// Blocks over the size limit, left unmatched
    pub skipped_blocks: usize,
    pub pairs: usize,
}

/// Group UIDs by join key, first-seen order. Rows with an empty key or
/// UID are left out.
pub fn block_by_join_key<'a>(
    table: &'a Table,
    uid_column: &str,
    key_column: &str,
) -> IndexMap<&'a str, Vec<&'a str>> {
    let mut blocks: IndexMap<&str, Vec<&str>> = IndexMap::new();
    let (Some(uid_index), Some(key_index)) =
        (table.column_index(uid_column), table.column_index(key_column))
    else {
        return blocks;
    };
    let mut seen: FxHashSet<(&str, &str)> = FxHashSet::default();
    for row in table.rows() {
        let (uid, key) = (row[uid_index].as_str(), row[key_index].as_str());
        if uid.is_empty() || key.is_empty() || !seen.insert((key, uid)) {
            continue;
        }
        blocks.entry(key).or_default().push(uid);
    }
    blocks
}

/// Candidate pairs from `people` (columns `uid`, `join_id`). Blocks with
/// more than `max_block_size` members are skipped with a warning.
pub fn match_people(people: &Table, max_block_size: usize) -> (EdgeSet, MatchReport) {
    let blocks = block_by_join_key(people, "uid", "join_id");
    let mut report = MatchReport {
        candidates: blocks.values().map(Vec::len).sum(),
        blocks: blocks.len(),
        largest_block: blocks.values().map(Vec::len).max().unwrap_or(0),
        ..MatchReport::default()
    };

    let mut seen: FxHashSet<(&str, &str)> = FxHashSet::default();
    let mut table = Table::new(&["uid_x", "uid_y"]);
    for (key, members) in &blocks {
        if members.len() > max_block_size {
            warn!(
                "Skipping block {} with {} members (limit {})",
                key,
                members.len(),
                max_block_size
            );
            report.skipped_blocks += 1;
            continue;
        }
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                let pair = if a <= b { (*a, *b) } else { (*b, *a) };
                if seen.insert(pair) {
                    table.push(vec![pair.0.to_string(), pair.1.to_string()]);
                }
            }
        }
    }
    report.pairs = table.len();
    info!(
        "Matched {} candidate pairs from {} blocks ({} skipped, largest {})",
        report.pairs, report.blocks, report.skipped_blocks, report.largest_block
    );

    let edges = EdgeSet {
        name: "probable_id_edges".to_string(),
        shape: EdgeShape {
            relationship: EdgeType::new(EdgeType::PROBABLY_SAME_PERSON),
            source: EndpointMatch::uid(Label::PERSON, "uid_x"),
            target: EndpointMatch::uid(Label::PERSON, "uid_y"),
            directional: false,
            attributes: None,
        },
        table,
    };
    (edges, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people(rows: &[(&str, &str)]) -> Table {
        let mut table = Table::new(&["uid", "name", "join_id"]);
        for (uid, key) in rows {
            table.push(vec![uid.to_string(), String::new(), key.to_string()]);
        }
        table
    }

    #[test]
    fn test_pairs_within_block_only() {
        let table = people(&[
            ("A", "JOHN-SMITH_1980-01"),
            ("B", "JOHN-SMITH_1980-01"),
            ("C", "JOHN-SMITH_1980-01"),
            ("D", "JANE-DOE_1970-05"),
            ("E", ""),
        ]);
        let (edges, report) = match_people(&table, 500);

        assert_eq!(report.blocks, 2);
        assert_eq!(report.candidates, 4);
        assert_eq!(report.pairs, 3);
        let pairs: Vec<(&str, &str)> = edges
            .table
            .rows()
            .iter()
            .map(|r| (r[0].as_str(), r[1].as_str()))
            .collect();
        assert_eq!(pairs, vec![("A", "B"), ("A", "C"), ("B", "C")]);
        assert!(!edges.shape.directional);
        assert!(edges.shape.attributes.is_none());
    }

    #[test]
    fn test_symmetric_pair_emitted_once() {
        let table = people(&[("B", "K"), ("A", "K"), ("A", "K")]);
        let (edges, report) = match_people(&table, 500);
        assert_eq!(report.pairs, 1);
        assert_eq!(edges.table.rows()[0], vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_not_transitively_closed() {
        // A~B via one key, B~C via another; A~C is never inferred
        let mut table = Table::new(&["uid", "join_id"]);
        table.push(vec!["A".into(), "K1".into()]);
        table.push(vec!["B".into(), "K1".into()]);
        table.push(vec!["B2".into(), "K2".into()]);
        table.push(vec!["C".into(), "K2".into()]);
        let (edges, _) = match_people(&table, 500);
        assert_eq!(edges.table.len(), 2);
        assert!(!edges.table.rows().contains(&vec!["A".to_string(), "C".to_string()]));
    }

    #[test]
    fn test_repeated_uid_counted_once_per_block() {
        let table = people(&[("A", "K"), ("A", "K"), ("B", "K"), ("A", "L")]);
        let blocks = block_by_join_key(&table, "uid", "join_id");
        assert_eq!(blocks["K"], vec!["A", "B"]);
        assert_eq!(blocks["L"], vec!["A"]);
    }

    #[test]
    fn test_oversized_block_skipped() {
        let table = people(&[("A", "K"), ("B", "K"), ("C", "K"), ("D", "L"), ("E", "L")]);
        let (edges, report) = match_people(&table, 2);
        assert_eq!(report.skipped_blocks, 1);
        assert_eq!(report.largest_block, 3);
        assert_eq!(edges.table.rows(), &[vec!["D".to_string(), "E".to_string()]]);
    }
}

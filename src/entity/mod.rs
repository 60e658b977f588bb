//! Entity builder
//!
//! Projects the typed source collections into one canonical node table per
//! label and merges same-UID rows with [`crate::dataset::AttributeMerger`].
//! Rows without a key are dropped here; they are not errors.

pub mod company;
pub mod filing;
pub mod person;

pub use company::{build_company_nodes, corporate_psc_uid, CompanyNameIndex};
pub use filing::{
    build_exemption_nodes, build_legal_person_nodes, build_postcode_nodes,
    build_statement_nodes, build_super_secure_nodes,
};
pub use person::{build_person_nodes, officer_person_uid, psc_person_uid};

use crate::dataset::Table;
use crate::source::Address;
use regex::Regex;
use rustc_hash::FxHashMap;
use std::sync::OnceLock;
use tracing::{info, warn};

/// Trimmed, uppercased company register number
pub fn company_key(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
}

fn separator_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(,\s*)+").expect("Invalid address separator regex"))
}

/// Join address parts with `, `, collapsing the gaps left by empty parts
pub fn compose_address(parts: &[Option<&str>]) -> String {
    let joined = parts
        .iter()
        .map(|part| part.map(str::trim).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");
    separator_run()
        .replace_all(&joined, ", ")
        .trim_matches(|c| c == ',' || c == ' ')
        .to_string()
}

/// Full address in the order companies use
pub fn company_address(address: &Address) -> String {
    compose_address(&[
        address.line_1.as_deref(),
        address.line_2.as_deref(),
        address.county.as_deref(),
        address.country.as_deref(),
        address.town.as_deref(),
        address.postcode.as_deref(),
    ])
}

/// Full address in the order people use
pub fn person_address(address: &Address) -> String {
    compose_address(&[
        address.line_1.as_deref(),
        address.line_2.as_deref(),
        address.care_of.as_deref(),
        address.po_box.as_deref(),
        address.county.as_deref(),
        address.locality.as_deref(),
        address.country.as_deref(),
        address.town.as_deref(),
        address.postcode.as_deref(),
    ])
}

/// Outcome of a UID uniqueness check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniquenessReport {
    pub rows: usize,
    pub duplicate_keys: usize,
    /// Up to the configured number of rows sharing a key
    pub sample: Vec<Vec<String>>,
}

impl UniquenessReport {
    pub fn is_unique(&self) -> bool {
        self.duplicate_keys == 0
    }
}

/// Check that `key_column` is unique within `table`. Violations are logged
/// with a bounded sample and returned, never raised.
pub fn check_uid_uniqueness(
    name: &str,
    table: &Table,
    key_column: &str,
    sample_size: usize,
) -> UniquenessReport {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for key in table.column_values(key_column) {
        *counts.entry(key).or_insert(0) += 1;
    }
    let duplicate_keys = counts.values().filter(|&&n| n > 1).count();

    let report = match table.column_index(key_column) {
        Some(index) if duplicate_keys > 0 => UniquenessReport {
            rows: table.len(),
            duplicate_keys,
            sample: table
                .rows()
                .iter()
                .filter(|row| counts.get(row[index].as_str()).map_or(false, |&n| n > 1))
                .take(sample_size)
                .cloned()
                .collect(),
        },
        _ => UniquenessReport {
            rows: table.len(),
            duplicate_keys,
            sample: Vec::new(),
        },
    };

    if report.is_unique() {
        info!("{}: {} is unique over {} rows", name, key_column, report.rows);
    } else {
        warn!(
            "{}: {} is not unique ({} duplicated keys), e.g. {:?}",
            name, key_column, report.duplicate_keys, report.sample
        );
    }
    report
}

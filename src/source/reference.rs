//! Reference tables keyed by person join key

use super::records::{clean, DisqualifiedDirectorRecord, PoliticianRecord};
use crate::identity::{derive_join_key, BirthMonth};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// One legislature membership a join key may belong to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoliticianEntry {
    pub leg_country: Option<String>,
    pub leg_name: Option<String>,
    pub active_periods: Option<String>,
}

/// Politicians grouped by join key
#[derive(Debug, Clone, Default)]
pub struct PoliticianIndex {
    entries: IndexMap<String, Vec<PoliticianEntry>>,
}

impl PoliticianIndex {
    pub fn from_records(records: &[PoliticianRecord]) -> Self {
        let mut entries: IndexMap<String, Vec<PoliticianEntry>> = IndexMap::new();
        for record in records {
            let Some(key) = clean(&record.join_id) else {
                continue;
            };
            let entry = PoliticianEntry {
                leg_country: clean(&record.leg_country).map(str::to_string),
                leg_name: clean(&record.leg_name).map(str::to_string),
                active_periods: clean(&record.active_periods).map(str::to_string),
            };
            let bucket = entries.entry(key.to_uppercase()).or_default();
            if !bucket.contains(&entry) {
                bucket.push(entry);
            }
        }
        PoliticianIndex { entries }
    }

    pub fn lookup(&self, join_key: &str) -> &[PoliticianEntry] {
        self.entries.get(join_key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Join keys of disqualified directors whose birth month is known
#[derive(Debug, Clone, Default)]
pub struct DisqualifiedIndex {
    keys: FxHashSet<String>,
}

impl DisqualifiedIndex {
    pub fn from_records(records: &[DisqualifiedDirectorRecord]) -> Self {
        let keys = records
            .iter()
            .filter_map(|record| {
                let birth = clean(&record.date_of_birth).and_then(BirthMonth::parse);
                derive_join_key(
                    record.forenames.as_deref(),
                    record.surname.as_deref(),
                    birth,
                )
            })
            .collect();
        DisqualifiedIndex { keys }
    }

    pub fn contains(&self, join_key: &str) -> bool {
        self.keys.contains(join_key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

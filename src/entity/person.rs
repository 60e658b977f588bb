//! Person nodes
//!
//! Humans appear as individual PSCs and as non-corporate officers. Both
//! projections carry the join key and the reference-table flags, then
//! merge on UID.

use super::{check_uid_uniqueness, person_address};
use crate::config::PipelineConfig;
use crate::dataset::{merge_tables, NodeSet, Table};
use crate::graph::Label;
use crate::identity::{derive_join_key, derive_person_uid, PersonIdentity};
use crate::source::{
    Address, IndividualPsc, Jurisdiction, OfficerRecord, PscFiling, SourceSnapshot,
};
use regex::Regex;
use std::sync::OnceLock;
use tracing::info;

pub const PERSON_COLUMNS: [&str; 16] = [
    "uid",
    "name",
    "title",
    "honours",
    "full_address",
    "nationality",
    "month_year_birth",
    "country_of_residence_normal",
    "address_country_normal",
    "secret_base",
    "join_id",
    "psc_likely_disqualified_director",
    "possible_politician",
    "politician_leg_country",
    "politician_leg_name",
    "politician_active_periods",
];

const FLAG_COLUMNS: [&str; 2] = ["psc_likely_disqualified_director", "possible_politician"];

const HONORIFICS: [&str; 14] = [
    "MR", "MRS", "DR", "MISS", "SIR", "PROFESSOR", "PROF", "LORD", "LADY", "RT HON", "DOCTOR",
    "ESQ", "DAME", "MX",
];

fn honorific_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(r"^(?:{})\.?\s+", HONORIFICS.join("|")))
            .expect("Invalid honorific regex")
    })
}

/// Uppercase a display name and drop a leading honorific
pub fn clean_person_name(name: &str) -> String {
    let upper = name.trim().to_uppercase();
    honorific_pattern().replace(&upper, "").trim().to_string()
}

/// UID of an individual PSC; its etag is the fallback
pub fn psc_person_uid(psc: &IndividualPsc) -> Option<String> {
    let uid = derive_person_uid(&PersonIdentity {
        forename: psc.forename.as_deref(),
        surname: psc.surname.as_deref(),
        birth: psc.birth,
        postcode: psc.address.postcode.as_deref(),
        fallback: psc.control.etag.as_deref(),
    });
    (!uid.is_empty()).then_some(uid)
}

/// UID of a human officer; its person number is the fallback
pub fn officer_person_uid(officer: &OfficerRecord) -> Option<String> {
    let uid = derive_person_uid(&PersonIdentity {
        forename: officer.forenames.as_deref(),
        surname: officer.surname.as_deref(),
        birth: officer.birth(),
        postcode: officer.person_postcode.as_deref(),
        fallback: officer.person_number.as_deref(),
    });
    (!uid.is_empty()).then_some(uid)
}

/// Fields common to both human projections
struct PersonRow<'a> {
    uid: Option<String>,
    join_key: Option<String>,
    name: Option<String>,
    title: Option<&'a str>,
    honours: Option<&'a str>,
    nationality: Option<&'a str>,
    birth: Option<String>,
    address: &'a Address,
    jurisdiction: &'a Jurisdiction,
}

fn flag(value: bool) -> Option<String> {
    Some(if value { "True" } else { "False" }.to_string())
}

fn push_person(table: &mut Table, row: PersonRow<'_>, snapshot: &SourceSnapshot) {
    let disqualified = row
        .join_key
        .as_deref()
        .map_or(false, |key| snapshot.disqualified.contains(key));
    let politicians = row
        .join_key
        .as_deref()
        .map(|key| snapshot.politicians.lookup(key))
        .unwrap_or(&[]);

    let base = [
        ("uid", row.uid),
        ("name", row.name.as_deref().map(clean_person_name)),
        ("title", row.title.map(str::to_string)),
        ("honours", row.honours.map(str::to_string)),
        ("full_address", Some(person_address(row.address))),
        ("nationality", row.nationality.map(str::to_uppercase)),
        ("month_year_birth", row.birth),
        ("country_of_residence_normal", row.jurisdiction.country_of_residence_normal.clone()),
        ("address_country_normal", row.jurisdiction.address_country_normal.clone()),
        ("secret_base", row.jurisdiction.secret_base.clone()),
        ("join_id", row.join_key),
        ("psc_likely_disqualified_director", flag(disqualified)),
        ("possible_politician", flag(!politicians.is_empty())),
    ];

    if politicians.is_empty() {
        table.push_named(base);
        return;
    }
    for entry in politicians {
        table.push_named(base.clone().into_iter().chain([
            ("politician_leg_country", entry.leg_country.clone()),
            ("politician_leg_name", entry.leg_name.clone()),
            ("politician_active_periods", entry.active_periods.clone()),
        ]));
    }
}

fn psc_people(snapshot: &SourceSnapshot) -> Table {
    let mut table = Table::new(&PERSON_COLUMNS);
    for filing in &snapshot.psc_filings {
        let PscFiling::Individual(psc) = filing else {
            continue;
        };
        let name = psc.name.clone().or_else(|| {
            let joined = format!(
                "{} {}",
                psc.forename.as_deref().unwrap_or(""),
                psc.surname.as_deref().unwrap_or("")
            );
            Some(joined.trim().to_string())
        });
        let row = PersonRow {
            uid: psc_person_uid(psc),
            join_key: derive_join_key(psc.forename.as_deref(), psc.surname.as_deref(), psc.birth),
            name,
            title: psc.title.as_deref(),
            honours: None,
            nationality: psc.nationality.as_deref(),
            birth: psc.birth.map(|b| b.to_string()),
            address: &psc.address,
            jurisdiction: &psc.jurisdiction,
        };
        push_person(&mut table, row, snapshot);
    }
    table
}

fn officer_people(snapshot: &SourceSnapshot) -> Table {
    let mut table = Table::new(&PERSON_COLUMNS);
    for officer in snapshot.officers.iter().filter(|o| !o.is_corporate()) {
        let address = officer.address();
        let jurisdiction = officer.jurisdiction();
        let birth = officer.birth();
        let name = format!(
            "{} {}",
            officer.forenames.as_deref().unwrap_or("").trim(),
            officer.surname.as_deref().unwrap_or("").trim()
        );
        let row = PersonRow {
            uid: officer_person_uid(officer),
            join_key: derive_join_key(
                officer.forenames.as_deref(),
                officer.surname.as_deref(),
                birth,
            ),
            name: Some(name.trim().to_string()),
            title: officer.title.as_deref(),
            honours: officer.honours.as_deref(),
            nationality: officer.nationality.as_deref(),
            birth: birth.map(|b| b.to_string()),
            address: &address,
            jurisdiction: &jurisdiction,
        };
        push_person(&mut table, row, snapshot);
    }
    table
}

fn collapse_flag(merged: &str, separator: &str) -> String {
    if merged.is_empty() {
        return String::new();
    }
    let set = merged
        .split(separator)
        .any(|value| value.trim().eq_ignore_ascii_case("true"));
    let value = if set { "TRUE" } else { "FALSE" };
    value.to_string()
}

/// Uppercase every cell and drop one trailing backslash from all but `uid`,
/// so that values differing only in case merge as one
fn normalize_cells(table: &mut Table) {
    table.map_columns(&["uid"], str::to_uppercase);
    let attributes: Vec<&str> = PERSON_COLUMNS.iter().copied().filter(|c| *c != "uid").collect();
    table.map_columns(&attributes, |cell| {
        let upper = cell.to_uppercase();
        upper.strip_suffix('\\').map(str::to_string).unwrap_or(upper)
    });
}

/// Merge officer and PSC humans into `person_nodes`
pub fn build_person_nodes(snapshot: &SourceSnapshot, config: &PipelineConfig) -> NodeSet {
    let mut officers = officer_people(snapshot);
    let mut pscs = psc_people(snapshot);
    normalize_cells(&mut officers);
    normalize_cells(&mut pscs);

    let separator = config.separator.as_str();
    let mut table = merge_tables(&PERSON_COLUMNS, "uid", separator, &[&officers, &pscs]);

    // One join key per person: the first in sorted order
    table.map_columns(&["join_id"], |merged| {
        merged.split(separator).next().unwrap_or("").trim().to_string()
    });
    table.map_columns(&FLAG_COLUMNS, |merged| collapse_flag(merged, separator));

    check_uid_uniqueness("person_nodes", &table, "uid", config.uniqueness_sample_size);
    info!("Built {} Person nodes", table.len());
    NodeSet {
        name: "person_nodes".to_string(),
        label: Label::new(Label::PERSON),
        table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::BirthMonth;
    use crate::source::{
        ControlFiling, DisqualifiedDirectorRecord, DisqualifiedIndex, PoliticianIndex,
        PoliticianRecord,
    };

    fn individual(etag: &str, postcode: Option<&str>, birth: Option<BirthMonth>) -> PscFiling {
        PscFiling::Individual(IndividualPsc {
            control: ControlFiling {
                company_number: Some("00000001".to_string()),
                etag: Some(etag.to_string()),
                ..ControlFiling::default()
            },
            name: Some("Mr John Paul Smith".to_string()),
            title: Some("Mr".to_string()),
            forename: Some("John Paul".to_string()),
            surname: Some("Smith".to_string()),
            birth,
            nationality: Some("British".to_string()),
            address: Address {
                postcode: postcode.map(str::to_string),
                ..Address::default()
            },
            jurisdiction: Jurisdiction::default(),
        })
    }

    fn officer(number: &str) -> OfficerRecord {
        OfficerRecord {
            company_number: Some("00000002".to_string()),
            person_number: Some(number.to_string()),
            forenames: Some("JOHN".to_string()),
            surname: Some("SMITH".to_string()),
            honours: Some("OBE".to_string()),
            partial_date_of_birth: Some("1980-01".to_string()),
            person_postcode: Some("SW1A 1AA".to_string()),
            nationality: Some("Irish".to_string()),
            ..OfficerRecord::default()
        }
    }

    #[test]
    fn test_clean_person_name() {
        assert_eq!(clean_person_name("Mr John Smith"), "JOHN SMITH");
        assert_eq!(clean_person_name("mrs. Jane Doe"), "JANE DOE");
        assert_eq!(clean_person_name("Rt Hon Ann Lee"), "ANN LEE");
        assert_eq!(clean_person_name("Mrsmith Jones"), "MRSMITH JONES");
    }

    #[test]
    fn test_same_identity_merges_across_sources() {
        let snapshot = SourceSnapshot {
            psc_filings: vec![individual("e1", Some("SW1A 1AA"), BirthMonth::new(1980, 1))],
            officers: vec![officer("p1")],
            ..SourceSnapshot::default()
        };
        let nodes = build_person_nodes(&snapshot, &PipelineConfig::default());

        assert_eq!(nodes.table.len(), 1);
        assert_eq!(nodes.table.cell(0, "uid"), Some("JOHN-SMITH-1980-01-SW1A1AA"));
        assert_eq!(nodes.table.cell(0, "nationality"), Some("BRITISH | IRISH"));
        assert_eq!(nodes.table.cell(0, "honours"), Some("OBE"));
        assert_eq!(nodes.table.cell(0, "join_id"), Some("JOHN-SMITH_1980-01"));
        assert_eq!(nodes.table.cell(0, "possible_politician"), Some("FALSE"));
    }

    #[test]
    fn test_trailing_backslash_stripped() {
        let mut escaped = officer("p7");
        escaped.forenames = Some("ANNE".to_string());
        escaped.title = Some("MS\\".to_string());
        let snapshot = SourceSnapshot {
            officers: vec![escaped],
            ..SourceSnapshot::default()
        };
        let nodes = build_person_nodes(&snapshot, &PipelineConfig::default());
        assert_eq!(nodes.table.cell(0, "title"), Some("MS"));
    }

    #[test]
    fn test_case_variants_merge_to_one_value() {
        let mut titled = officer("p1");
        titled.title = Some("MR".to_string());
        titled.nationality = Some("british".to_string());
        let snapshot = SourceSnapshot {
            psc_filings: vec![individual("e1", Some("SW1A 1AA"), BirthMonth::new(1980, 1))],
            officers: vec![titled],
            ..SourceSnapshot::default()
        };
        let nodes = build_person_nodes(&snapshot, &PipelineConfig::default());

        assert_eq!(nodes.table.len(), 1);
        assert_eq!(nodes.table.cell(0, "title"), Some("MR"));
        assert_eq!(nodes.table.cell(0, "nationality"), Some("BRITISH"));
    }

    #[test]
    fn test_uid_keeps_trailing_backslash() {
        let mut undated = officer("P9\\");
        undated.partial_date_of_birth = None;
        let uid = officer_person_uid(&undated);
        let snapshot = SourceSnapshot {
            officers: vec![undated],
            ..SourceSnapshot::default()
        };
        let nodes = build_person_nodes(&snapshot, &PipelineConfig::default());

        assert_eq!(uid.as_deref(), Some("P9\\"));
        assert_eq!(nodes.table.cell(0, "uid"), uid.as_deref());
    }

    #[test]
    fn test_missing_birth_falls_back_to_etag() {
        let snapshot = SourceSnapshot {
            psc_filings: vec![individual("etag-x", Some("SW1A 1AA"), None)],
            ..SourceSnapshot::default()
        };
        let nodes = build_person_nodes(&snapshot, &PipelineConfig::default());
        assert_eq!(nodes.table.cell(0, "uid"), Some("ETAG-X"));
        assert_eq!(nodes.table.cell(0, "join_id"), Some(""));
    }

    #[test]
    fn test_reference_flags() {
        let politicians = PoliticianIndex::from_records(&[
            PoliticianRecord {
                join_id: Some("JOHN-SMITH_1980-01".to_string()),
                leg_name: Some("House of Commons".to_string()),
                ..PoliticianRecord::default()
            },
            PoliticianRecord {
                join_id: Some("JOHN-SMITH_1980-01".to_string()),
                leg_name: Some("House of Lords".to_string()),
                ..PoliticianRecord::default()
            },
        ]);
        let disqualified = DisqualifiedIndex::from_records(&[DisqualifiedDirectorRecord {
            forenames: Some("John".to_string()),
            surname: Some("Smith".to_string()),
            date_of_birth: Some("1980-01-20".to_string()),
        }]);
        let snapshot = SourceSnapshot {
            psc_filings: vec![individual("e1", Some("SW1A 1AA"), BirthMonth::new(1980, 1))],
            politicians,
            disqualified,
            ..SourceSnapshot::default()
        };
        let nodes = build_person_nodes(&snapshot, &PipelineConfig::default());

        assert_eq!(nodes.table.len(), 1);
        assert_eq!(nodes.table.cell(0, "possible_politician"), Some("TRUE"));
        assert_eq!(nodes.table.cell(0, "psc_likely_disqualified_director"), Some("TRUE"));
        assert_eq!(
            nodes.table.cell(0, "politician_leg_name"),
            Some("HOUSE OF COMMONS | HOUSE OF LORDS")
        );
        assert_eq!(nodes.table.cell(0, "name"), Some("JOHN PAUL SMITH"));
    }
}

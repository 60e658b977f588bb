//! Company nodes
//!
//! A company can be observed three ways: as the filing company of a PSC,
//! statement or exemption record (plus its register entry), as a corporate
//! controller named in a PSC filing, and as a corporate officer. All three
//! projections merge on UID.

use super::{check_uid_uniqueness, company_address, company_key};
use crate::config::PipelineConfig;
use crate::dataset::{merge_tables, NodeSet, Table};
use crate::graph::Label;
use crate::identity::{company_name_key, derive_company_control_uid, pad_company_number};
use crate::source::records::clean;
use crate::source::{CompanyRecord, CorporatePsc, OfficerRecord, PscFiling, SourceSnapshot};
use rustc_hash::FxHashMap;
use tracing::info;

pub const COMPANY_COLUMNS: [&str; 16] = [
    "uid",
    "company_number",
    "name",
    "full_address",
    "company_category",
    "country_of_origin",
    "country_registered",
    "dissolution_date",
    "incorporation_date",
    "legal_authority",
    "legal_form",
    "place_registered",
    "resident_country",
    "country_of_residence_normal",
    "address_country_normal",
    "secret_base",
];

/// Live companies keyed by normalized name and postcode, used to resolve
/// corporate officers to a register number
#[derive(Debug, Clone, Default)]
pub struct CompanyNameIndex {
    numbers: FxHashMap<String, String>,
}

impl CompanyNameIndex {
    pub fn from_companies(companies: &[CompanyRecord]) -> Self {
        let mut numbers = FxHashMap::default();
        for company in companies {
            let key = company_name_key(
                company.company_name.as_deref(),
                company.regaddress_postcode.as_deref(),
            );
            let number = company_key(company.company_number.as_deref());
            if let (Some(key), Some(number)) = (key, number) {
                numbers.entry(key).or_insert(number);
            }
        }
        CompanyNameIndex { numbers }
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Register number of the live company matching this corporate officer,
    /// else the officer's own person number
    pub fn officer_uid(&self, officer: &OfficerRecord) -> Option<String> {
        company_name_key(officer.surname.as_deref(), officer.person_postcode.as_deref())
            .and_then(|key| self.numbers.get(&key).cloned())
            .or_else(|| clean(&officer.person_number).map(str::to_uppercase))
    }
}

/// UID of a corporate PSC; `None` without an etag to fall back on
pub fn corporate_psc_uid(psc: &CorporatePsc) -> Option<String> {
    let etag = psc.control.etag.as_deref()?;
    let uid = derive_company_control_uid(
        psc.identification.place_registered.as_deref(),
        psc.identification.registration_number.as_deref(),
        etag,
    );
    (!uid.is_empty()).then_some(uid)
}

fn filing_companies(snapshot: &SourceSnapshot) -> Table {
    let mut table = Table::new(&COMPANY_COLUMNS);
    for company in &snapshot.companies {
        let uid = company_key(company.company_number.as_deref());
        table.push_named([
            ("uid", uid.clone()),
            ("company_number", uid),
            ("name", company.company_name.clone()),
            ("full_address", Some(company_address(&company.address()))),
            ("company_category", company.companycategory.clone()),
            ("country_of_origin", company.countryoforigin.clone()),
            ("dissolution_date", company.dissolutiondate.clone()),
            ("incorporation_date", company.incorporationdate.clone()),
        ]);
    }

    // Companies that file but are missing from the register snapshot
    let referenced = snapshot
        .psc_filings
        .iter()
        .map(|filing| filing.control().company_number.as_deref())
        .chain(snapshot.statements.iter().map(|s| s.company_number.as_deref()))
        .chain(snapshot.exemptions.iter().map(|e| e.company_number.as_deref()));
    for number in referenced.filter_map(company_key) {
        table.push_named([("uid", Some(number.clone())), ("company_number", Some(number))]);
    }
    table
}

fn controlling_companies(snapshot: &SourceSnapshot) -> Table {
    let mut table = Table::new(&COMPANY_COLUMNS);
    for filing in &snapshot.psc_filings {
        let PscFiling::CorporateEntity(psc) = filing else {
            continue;
        };
        let id = &psc.identification;
        table.push_named([
            ("uid", corporate_psc_uid(psc)),
            ("company_number", id.registration_number.as_deref().map(pad_company_number)),
            ("name", psc.name.clone()),
            ("full_address", Some(company_address(&psc.address))),
            ("country_registered", id.country_registered.clone()),
            ("legal_authority", id.legal_authority.clone()),
            ("legal_form", id.legal_form.clone()),
            ("place_registered", id.place_registered.clone()),
            ("country_of_residence_normal", psc.jurisdiction.country_of_residence_normal.clone()),
            ("address_country_normal", psc.jurisdiction.address_country_normal.clone()),
            ("secret_base", psc.jurisdiction.secret_base.clone()),
        ]);
    }
    table
}

fn officer_companies(snapshot: &SourceSnapshot, names: &CompanyNameIndex) -> Table {
    let mut table = Table::new(&COMPANY_COLUMNS);
    for officer in snapshot.officers.iter().filter(|o| o.is_corporate()) {
        let jurisdiction = officer.jurisdiction();
        table.push_named([
            ("uid", names.officer_uid(officer)),
            ("name", officer.surname.clone()),
            ("full_address", Some(company_address(&officer.address()))),
            ("resident_country", officer.resident_country.clone()),
            ("country_of_residence_normal", jurisdiction.country_of_residence_normal),
            ("address_country_normal", jurisdiction.address_country_normal),
            ("secret_base", jurisdiction.secret_base),
        ]);
    }
    table
}

/// Merge all company observations into `company_nodes`
pub fn build_company_nodes(
    snapshot: &SourceSnapshot,
    names: &CompanyNameIndex,
    config: &PipelineConfig,
) -> NodeSet {
    let mut parts = [
        filing_companies(snapshot),
        controlling_companies(snapshot),
        officer_companies(snapshot, names),
    ];
    // Before merging, so case variants count as one value
    for part in &mut parts {
        part.map_all(str::to_uppercase);
    }

    let [filing, controlling, officers] = &parts;
    let table = merge_tables(
        &COMPANY_COLUMNS,
        "uid",
        &config.separator,
        &[filing, controlling, officers],
    );

    check_uid_uniqueness("company_nodes", &table, "uid", config.uniqueness_sample_size);
    info!("Built {} Company nodes", table.len());
    NodeSet {
        name: "company_nodes".to_string(),
        label: Label::new(Label::COMPANY),
        table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ControlFiling, Identification};

    fn live(number: &str, name: &str, postcode: &str) -> CompanyRecord {
        CompanyRecord {
            company_number: Some(number.to_string()),
            company_name: Some(name.to_string()),
            regaddress_addressline1: Some("1 High St".to_string()),
            regaddress_posttown: Some("London".to_string()),
            regaddress_postcode: Some(postcode.to_string()),
            ..CompanyRecord::default()
        }
    }

    fn corporate(place: &str, number: &str, etag: &str) -> PscFiling {
        PscFiling::CorporateEntity(CorporatePsc {
            control: ControlFiling {
                company_number: Some("00000001".to_string()),
                etag: Some(etag.to_string()),
                ..ControlFiling::default()
            },
            name: Some("Parent Holdings Ltd".to_string()),
            address: Default::default(),
            identification: Identification {
                place_registered: Some(place.to_string()),
                registration_number: Some(number.to_string()),
                legal_form: Some("Private Limited".to_string()),
                ..Identification::default()
            },
            jurisdiction: Default::default(),
        })
    }

    #[test]
    fn test_officer_resolves_to_live_company() {
        let companies = [live("00000042", "Acme Widgets Limited", "AB1 2CD")];
        let index = CompanyNameIndex::from_companies(&companies);
        let officer = OfficerRecord {
            corporate_indicator: Some("Y".to_string()),
            surname: Some("ACME WIDGETS LTD".to_string()),
            person_postcode: Some("ab1 2cd".to_string()),
            person_number: Some("p-9".to_string()),
            ..OfficerRecord::default()
        };
        assert_eq!(index.officer_uid(&officer).as_deref(), Some("00000042"));

        let stranger = OfficerRecord {
            surname: Some("Other Co".to_string()),
            ..officer
        };
        assert_eq!(index.officer_uid(&stranger).as_deref(), Some("P-9"));
    }

    #[test]
    fn test_controller_merges_with_register_entry() {
        let snapshot = SourceSnapshot {
            companies: vec![
                live("00001234", "Parent Holdings Ltd", "E1 1AA"),
                live("00000001", "Child Ltd", "E2 2BB"),
            ],
            psc_filings: vec![
                corporate("England", "1234", "etag-1"),
                corporate("Foreign", "99", "etag-2"),
            ],
            ..SourceSnapshot::default()
        };
        let names = CompanyNameIndex::from_companies(&snapshot.companies);
        let nodes = build_company_nodes(&snapshot, &names, &PipelineConfig::default());

        let uids: Vec<&str> = nodes.table.column_values("uid").collect();
        assert_eq!(uids, vec!["00001234", "00000001", "ETAG-2"]);
        assert_eq!(nodes.table.cell(0, "legal_form"), Some("PRIVATE LIMITED"));
        assert_eq!(nodes.table.cell(0, "name"), Some("PARENT HOLDINGS LTD"));
        assert_eq!(nodes.table.cell(0, "full_address"), Some("1 HIGH ST, LONDON, E1 1AA"));
    }

    #[test]
    fn test_case_variant_names_merge_to_one() {
        let mut controller = corporate("England", "1234", "etag-1");
        if let PscFiling::CorporateEntity(psc) = &mut controller {
            psc.name = Some("ACME LTD".to_string());
        }
        let snapshot = SourceSnapshot {
            companies: vec![live("00001234", "Acme Ltd", "E1 1AA")],
            psc_filings: vec![controller],
            ..SourceSnapshot::default()
        };
        let names = CompanyNameIndex::from_companies(&snapshot.companies);
        let nodes = build_company_nodes(&snapshot, &names, &PipelineConfig::default());

        let row = nodes
            .table
            .column_values("uid")
            .position(|uid| uid == "00001234")
            .unwrap();
        assert_eq!(nodes.table.cell(row, "name"), Some("ACME LTD"));
    }
}

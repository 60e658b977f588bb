//! Legal persons and the minimal filing nodes
//!
//! Exemption, Statement and SuperSecure nodes are keyed by the filing etag
//! as published. Postcode nodes are keyed by the postcode itself.

use super::{check_uid_uniqueness, person_address};
use crate::config::PipelineConfig;
use crate::dataset::{merge_tables, NodeSet, Table};
use crate::graph::Label;
use crate::identity::derive_legal_person_uid;
use crate::source::records::clean;
use crate::source::{LegalPersonPsc, PscFiling, SourceSnapshot};
use tracing::info;

const LEGAL_PERSON_COLUMNS: [&str; 8] = [
    "uid",
    "name",
    "full_address",
    "postcode",
    "nationality",
    "month_year_birth",
    "country_of_residence_normal",
    "address_country_normal",
];

pub fn legal_person_uid(psc: &LegalPersonPsc) -> Option<String> {
    derive_legal_person_uid(psc.name.as_deref(), psc.address.postcode.as_deref())
}

fn finish(
    name: &str,
    label: &str,
    columns: &[&str],
    parts: &[&Table],
    config: &PipelineConfig,
) -> NodeSet {
    let table = merge_tables(columns, "uid", &config.separator, parts);
    check_uid_uniqueness(name, &table, "uid", config.uniqueness_sample_size);
    info!("Built {} {} nodes", table.len(), label);
    NodeSet {
        name: name.to_string(),
        label: Label::new(label),
        table,
    }
}

pub fn build_legal_person_nodes(snapshot: &SourceSnapshot, config: &PipelineConfig) -> NodeSet {
    let mut table = Table::new(&LEGAL_PERSON_COLUMNS);
    for filing in &snapshot.psc_filings {
        let PscFiling::LegalPerson(psc) = filing else {
            continue;
        };
        table.push_named([
            ("uid", legal_person_uid(psc)),
            ("name", psc.name.clone()),
            ("full_address", Some(person_address(&psc.address))),
            ("postcode", psc.address.postcode.clone()),
            ("nationality", psc.nationality.clone()),
            ("month_year_birth", psc.birth.map(|b| b.to_string())),
            ("country_of_residence_normal", psc.jurisdiction.country_of_residence_normal.clone()),
            ("address_country_normal", psc.jurisdiction.address_country_normal.clone()),
        ]);
    }
    table.map_all(str::to_uppercase);
    finish("active_legal_psc_nodes", Label::LEGAL_PERSON, &LEGAL_PERSON_COLUMNS, &[&table], config)
}

pub fn build_exemption_nodes(snapshot: &SourceSnapshot, config: &PipelineConfig) -> NodeSet {
    let mut table = Table::new(&["uid"]);
    for exemption in &snapshot.exemptions {
        table.push_named([("uid", clean(&exemption.etag).map(str::to_string))]);
    }
    finish("active_exemptions_psc_nodes", Label::EXEMPTION, &["uid"], &[&table], config)
}

pub fn build_statement_nodes(snapshot: &SourceSnapshot, config: &PipelineConfig) -> NodeSet {
    let columns = ["uid", "statement"];
    let mut table = Table::new(&columns);
    for statement in &snapshot.statements {
        table.push_named([
            ("uid", clean(&statement.etag).map(str::to_string)),
            ("statement", statement.statement.clone()),
        ]);
    }
    finish("active_psc_statements_nodes", Label::STATEMENT, &columns, &[&table], config)
}

pub fn build_super_secure_nodes(snapshot: &SourceSnapshot, config: &PipelineConfig) -> NodeSet {
    let mut table = Table::new(&["uid"]);
    for filing in &snapshot.psc_filings {
        if let PscFiling::SuperSecure(psc) = filing {
            table.push_named([("uid", psc.control.etag.clone())]);
        }
    }
    finish("active_super_secure_psc_nodes", Label::SUPER_SECURE, &["uid"], &[&table], config)
}

pub fn build_postcode_nodes(snapshot: &SourceSnapshot, config: &PipelineConfig) -> NodeSet {
    let columns = ["uid", "postcode"];
    let mut table = Table::new(&columns);
    for company in &snapshot.companies {
        let postcode = clean(&company.regaddress_postcode).map(str::to_string);
        table.push_named([("uid", postcode.clone()), ("postcode", postcode)]);
    }
    finish("active_address_nodes", Label::POSTCODE, &columns, &[&table], config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{
        Address, CompanyRecord, ControlFiling, ExemptionRecord, Jurisdiction, StatementRecord,
        SuperSecurePsc,
    };

    fn control(etag: &str) -> ControlFiling {
        ControlFiling {
            company_number: Some("00000001".to_string()),
            etag: Some(etag.to_string()),
            ..ControlFiling::default()
        }
    }

    #[test]
    fn test_legal_person_uid_and_nodes() {
        let psc = LegalPersonPsc {
            control: control("e1"),
            name: Some("The Crown Estate".to_string()),
            nationality: None,
            birth: None,
            address: Address {
                postcode: Some("SW1Y 4AH".to_string()),
                ..Address::default()
            },
            jurisdiction: Jurisdiction::default(),
        };
        assert_eq!(legal_person_uid(&psc).as_deref(), Some("THE CROWN ESTATE-SW1Y 4AH"));

        let snapshot = SourceSnapshot {
            psc_filings: vec![PscFiling::LegalPerson(psc.clone()), PscFiling::LegalPerson(psc)],
            ..SourceSnapshot::default()
        };
        let nodes = build_legal_person_nodes(&snapshot, &PipelineConfig::default());
        assert_eq!(nodes.table.len(), 1);
        assert_eq!(nodes.label, Label::new(Label::LEGAL_PERSON));
        assert_eq!(nodes.table.cell(0, "name"), Some("THE CROWN ESTATE"));
    }

    #[test]
    fn test_filing_nodes_keep_raw_etag() {
        let snapshot = SourceSnapshot {
            exemptions: vec![
                ExemptionRecord {
                    etag: Some("ex-1".to_string()),
                    ..ExemptionRecord::default()
                },
                ExemptionRecord::default(),
            ],
            statements: vec![StatementRecord {
                etag: Some("st-1".to_string()),
                statement: Some("no-individual-or-entity-with-signficant-control".to_string()),
                ..StatementRecord::default()
            }],
            psc_filings: vec![PscFiling::SuperSecure(SuperSecurePsc { control: control("ss-1") })],
            ..SourceSnapshot::default()
        };
        let config = PipelineConfig::default();

        let exemptions = build_exemption_nodes(&snapshot, &config);
        assert_eq!(exemptions.table.column_values("uid").collect::<Vec<_>>(), vec!["ex-1"]);

        let statements = build_statement_nodes(&snapshot, &config);
        assert_eq!(statements.table.cell(0, "uid"), Some("st-1"));
        assert!(statements.table.cell(0, "statement").unwrap().starts_with("no-individual"));

        let secure = build_super_secure_nodes(&snapshot, &config);
        assert_eq!(secure.table.cell(0, "uid"), Some("ss-1"));
    }

    #[test]
    fn test_postcode_nodes_deduplicated() {
        let company = |postcode: Option<&str>| CompanyRecord {
            regaddress_postcode: postcode.map(str::to_string),
            ..CompanyRecord::default()
        };
        let snapshot = SourceSnapshot {
            companies: vec![company(Some("E1 1AA")), company(Some("E1 1AA")), company(None)],
            ..SourceSnapshot::default()
        };
        let nodes = build_postcode_nodes(&snapshot, &PipelineConfig::default());
        assert_eq!(nodes.table.len(), 1);
        assert_eq!(nodes.table.cell(0, "postcode"), Some("E1 1AA"));
    }
}

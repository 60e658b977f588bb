//! Relationship builder
//!
//! Every collection that implies a relationship projects to
//! `(source key, target key, attributes...)`. Rows missing either key are
//! dropped, and duplicate `(source, target)` pairs keep their first row.

use crate::dataset::{EdgeSet, EdgeShape, EndpointMatch, Table};
use crate::entity::company::corporate_psc_uid;
use crate::entity::filing::legal_person_uid;
use crate::entity::person::{officer_person_uid, psc_person_uid};
use crate::entity::{company_key, CompanyNameIndex};
use crate::graph::{EdgeType, Label};
use crate::identity::appointment_type_label;
use crate::source::records::clean;
use crate::source::{ControlFiling, OfficerRecord, PscFiling, SourceSnapshot};
use tracing::info;

const CONTROL_ATTRIBUTES: [&str; 2] = ["natures_of_control", "notified_on"];
const OFFICER_ATTRIBUTES: [&str; 2] = ["appointment_type_label", "appointment_date"];

fn edge_set(name: &str, shape: EdgeShape, mut table: Table) -> EdgeSet {
    let keys = [
        shape.source.dataset_column.as_str(),
        shape.target.dataset_column.as_str(),
    ];
    table.retain_present(&keys);
    table.dedup_on(&keys);
    info!("Built {} {} edges ({})", table.len(), shape.relationship, name);
    EdgeSet {
        name: name.to_string(),
        shape,
        table,
    }
}

fn shape(
    relationship: &str,
    source: EndpointMatch,
    target: EndpointMatch,
    attributes: Option<&[&str]>,
) -> EdgeShape {
    EdgeShape {
        relationship: EdgeType::new(relationship),
        source,
        target,
        directional: true,
        attributes: attributes.map(|a| a.iter().map(|s| s.to_string()).collect()),
    }
}

fn control_cells(control: &ControlFiling) -> [(&'static str, Option<String>); 3] {
    let natures = control.natures_of_control.join(";");
    [
        ("company_number", company_key(control.company_number.as_deref())),
        ("natures_of_control", (!natures.is_empty()).then_some(natures)),
        ("notified_on", control.notified_on.clone()),
    ]
}

/// CONTROLS from one PSC kind to the company it controls
fn controls_edges<F>(
    snapshot: &SourceSnapshot,
    name: &str,
    source_label: &str,
    uid_of: F,
) -> EdgeSet
where
    F: Fn(&PscFiling) -> Option<Option<String>>,
{
    let mut table = Table::new(&["uid", "company_number", "natures_of_control", "notified_on"]);
    for filing in &snapshot.psc_filings {
        let Some(uid) = uid_of(filing) else {
            continue;
        };
        table.push_named(
            std::iter::once(("uid", uid)).chain(control_cells(filing.control())),
        );
    }
    edge_set(
        name,
        shape(
            EdgeType::CONTROLS,
            EndpointMatch::uid(source_label, "uid"),
            EndpointMatch::uid(Label::COMPANY, "company_number"),
            Some(&CONTROL_ATTRIBUTES[..]),
        ),
        table,
    )
}

pub fn build_person_control_edges(snapshot: &SourceSnapshot) -> EdgeSet {
    controls_edges(snapshot, "psc_human_edges", Label::PERSON, |filing| match filing {
        PscFiling::Individual(psc) => Some(psc_person_uid(psc)),
        _ => None,
    })
}

pub fn build_company_control_edges(snapshot: &SourceSnapshot) -> EdgeSet {
    controls_edges(snapshot, "psc_company_edges", Label::COMPANY, |filing| match filing {
        PscFiling::CorporateEntity(psc) => Some(corporate_psc_uid(psc)),
        _ => None,
    })
}

pub fn build_legal_person_control_edges(snapshot: &SourceSnapshot) -> EdgeSet {
    controls_edges(snapshot, "legal_person_edges", Label::LEGAL_PERSON, |filing| match filing {
        PscFiling::LegalPerson(psc) => Some(legal_person_uid(psc)),
        _ => None,
    })
}

pub fn build_super_secure_control_edges(snapshot: &SourceSnapshot) -> EdgeSet {
    controls_edges(snapshot, "super_secure_edges", Label::SUPER_SECURE, |filing| match filing {
        PscFiling::SuperSecure(psc) => Some(psc.control.etag.clone()),
        _ => None,
    })
}

fn officer_cells(officer: &OfficerRecord) -> [(&'static str, Option<String>); 3] {
    [
        ("company_number", company_key(officer.company_number.as_deref())),
        (
            "appointment_type_label",
            clean(&officer.appointment_type)
                .and_then(appointment_type_label)
                .map(str::to_string),
        ),
        ("appointment_date", officer.appointment_date.clone()),
    ]
}

fn officer_edges<F>(
    snapshot: &SourceSnapshot,
    name: &str,
    corporate: bool,
    source_label: &str,
    uid_of: F,
) -> EdgeSet
where
    F: Fn(&OfficerRecord) -> Option<String>,
{
    let mut table = Table::new(&[
        "uid",
        "company_number",
        "appointment_type_label",
        "appointment_date",
    ]);
    for officer in snapshot.officers.iter().filter(|o| o.is_corporate() == corporate) {
        table.push_named(std::iter::once(("uid", uid_of(officer))).chain(officer_cells(officer)));
    }
    edge_set(
        name,
        shape(
            EdgeType::OFFICER_OF,
            EndpointMatch::uid(source_label, "uid"),
            EndpointMatch::uid(Label::COMPANY, "company_number"),
            Some(&OFFICER_ATTRIBUTES[..]),
        ),
        table,
    )
}

pub fn build_person_officer_edges(snapshot: &SourceSnapshot) -> EdgeSet {
    officer_edges(snapshot, "active_officers_human_edges", false, Label::PERSON, officer_person_uid)
}

pub fn build_company_officer_edges(snapshot: &SourceSnapshot, names: &CompanyNameIndex) -> EdgeSet {
    officer_edges(snapshot, "active_officers_companies_edges", true, Label::COMPANY, |officer| {
        names.officer_uid(officer)
    })
}

pub fn build_exemption_edges(snapshot: &SourceSnapshot) -> EdgeSet {
    let mut table = Table::new(&["company_number", "uid", "notified_on"]);
    for exemption in &snapshot.exemptions {
        table.push_named([
            ("company_number", company_key(exemption.company_number.as_deref())),
            ("uid", clean(&exemption.etag).map(str::to_string)),
            ("notified_on", exemption.notified_on.clone()),
        ]);
    }
    edge_set(
        "exemption_edges",
        shape(
            EdgeType::EXEMPT,
            EndpointMatch::uid(Label::COMPANY, "company_number"),
            EndpointMatch::uid(Label::EXEMPTION, "uid"),
            Some(&["notified_on"][..]),
        ),
        table,
    )
}

pub fn build_statement_edges(snapshot: &SourceSnapshot) -> EdgeSet {
    let mut table = Table::new(&["company_number", "uid", "notified_on"]);
    for statement in &snapshot.statements {
        table.push_named([
            ("company_number", company_key(statement.company_number.as_deref())),
            ("uid", clean(&statement.etag).map(str::to_string)),
            ("notified_on", statement.notified_on.clone()),
        ]);
    }
    edge_set(
        "statement_edges",
        shape(
            EdgeType::STATES,
            EndpointMatch::uid(Label::COMPANY, "company_number"),
            EndpointMatch::uid(Label::STATEMENT, "uid"),
            Some(&["notified_on"][..]),
        ),
        table,
    )
}

pub fn build_address_edges(snapshot: &SourceSnapshot) -> EdgeSet {
    let mut table = Table::new(&["company_number", "uid"]);
    for company in &snapshot.companies {
        table.push_named([
            ("company_number", company_key(company.company_number.as_deref())),
            ("uid", clean(&company.regaddress_postcode).map(str::to_string)),
        ]);
    }
    edge_set(
        "address_edges",
        shape(
            EdgeType::ADDRESS,
            EndpointMatch::uid(Label::COMPANY, "company_number"),
            EndpointMatch::uid(Label::POSTCODE, "uid"),
            None,
        ),
        table,
    )
}

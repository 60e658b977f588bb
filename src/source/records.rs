//! Declared record schemas for every input collection
//!
//! Rows are deserialized straight from the upstream CSV files. Missing
//! columns and empty cells both become `None`; [`clean`] additionally
//! trims whitespace so that a blank cell never counts as a value.

use crate::identity::BirthMonth;
use serde::Deserialize;
use tracing::debug;

/// Trimmed, non-empty view of an optional cell
pub fn clean(cell: &Option<String>) -> Option<&str> {
    cell.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn owned(cell: Option<String>) -> Option<String> {
    cell.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Postal address, in whatever subset of fields a source publishes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub line_1: Option<String>,
    pub line_2: Option<String>,
    pub care_of: Option<String>,
    pub po_box: Option<String>,
    pub locality: Option<String>,
    pub town: Option<String>,
    pub county: Option<String>,
    pub country: Option<String>,
    pub postcode: Option<String>,
}

/// Live company register snapshot row
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompanyRecord {
    pub company_number: Option<String>,
    pub company_name: Option<String>,
    pub regaddress_addressline1: Option<String>,
    pub regaddress_addressline2: Option<String>,
    pub regaddress_posttown: Option<String>,
    pub regaddress_county: Option<String>,
    pub regaddress_country: Option<String>,
    pub regaddress_postcode: Option<String>,
    pub companycategory: Option<String>,
    pub countryoforigin: Option<String>,
    pub dissolutiondate: Option<String>,
    pub incorporationdate: Option<String>,
}

impl CompanyRecord {
    pub fn address(&self) -> Address {
        Address {
            line_1: owned(self.regaddress_addressline1.clone()),
            line_2: owned(self.regaddress_addressline2.clone()),
            town: owned(self.regaddress_posttown.clone()),
            county: owned(self.regaddress_county.clone()),
            country: owned(self.regaddress_country.clone()),
            postcode: owned(self.regaddress_postcode.clone()),
            ..Address::default()
        }
    }
}

/// Flat PSC snapshot row as published; see [`PscFiling`] for the typed view
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PscRow {
    pub company_number: Option<String>,
    pub kind: Option<String>,
    pub etag: Option<String>,
    pub name: Option<String>,
    pub name_elements_title: Option<String>,
    pub name_elements_forename: Option<String>,
    pub name_elements_surname: Option<String>,
    pub month_year_birth: Option<String>,
    pub nationality: Option<String>,
    pub address_address_line_1: Option<String>,
    pub address_address_line_2: Option<String>,
    pub address_care_of: Option<String>,
    pub address_country: Option<String>,
    pub address_locality: Option<String>,
    pub address_po_box: Option<String>,
    pub address_postal_code: Option<String>,
    pub country_of_residence_normal: Option<String>,
    pub address_country_normal: Option<String>,
    pub secret_base: Option<String>,
    pub natures_of_control: Option<String>,
    pub notified_on: Option<String>,
    pub identification_country_registered: Option<String>,
    pub identification_legal_authority: Option<String>,
    pub identification_legal_form: Option<String>,
    pub identification_place_registered: Option<String>,
    pub identification_registration_number: Option<String>,
}

/// What every controlling-interest filing says about the company it controls
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlFiling {
    pub company_number: Option<String>,
    pub etag: Option<String>,
    pub natures_of_control: Vec<String>,
    pub notified_on: Option<String>,
}

/// Residence and secrecy-jurisdiction annotations added upstream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Jurisdiction {
    pub country_of_residence_normal: Option<String>,
    pub address_country_normal: Option<String>,
    pub secret_base: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndividualPsc {
    pub control: ControlFiling,
    pub name: Option<String>,
    pub title: Option<String>,
    pub forename: Option<String>,
    pub surname: Option<String>,
    pub birth: Option<BirthMonth>,
    pub nationality: Option<String>,
    pub address: Address,
    pub jurisdiction: Jurisdiction,
}

/// Registration details of a corporate controller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identification {
    pub country_registered: Option<String>,
    pub legal_authority: Option<String>,
    pub legal_form: Option<String>,
    pub place_registered: Option<String>,
    pub registration_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorporatePsc {
    pub control: ControlFiling,
    pub name: Option<String>,
    pub address: Address,
    pub identification: Identification,
    pub jurisdiction: Jurisdiction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegalPersonPsc {
    pub control: ControlFiling,
    pub name: Option<String>,
    pub nationality: Option<String>,
    pub birth: Option<BirthMonth>,
    pub address: Address,
    pub jurisdiction: Jurisdiction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuperSecurePsc {
    pub control: ControlFiling,
}

/// A PSC filing, keyed by its `kind`
#[derive(Debug, Clone, PartialEq)]
pub enum PscFiling {
    Individual(IndividualPsc),
    CorporateEntity(CorporatePsc),
    LegalPerson(LegalPersonPsc),
    SuperSecure(SuperSecurePsc),
}

impl PscFiling {
    pub const INDIVIDUAL: &'static str = "individual-person-with-significant-control";
    pub const CORPORATE_ENTITY: &'static str = "corporate-entity-person-with-significant-control";
    pub const LEGAL_PERSON: &'static str = "legal-person-person-with-significant-control";
    pub const SUPER_SECURE: &'static str = "super-secure-person-with-significant-control";

    pub fn control(&self) -> &ControlFiling {
        match self {
            PscFiling::Individual(p) => &p.control,
            PscFiling::CorporateEntity(p) => &p.control,
            PscFiling::LegalPerson(p) => &p.control,
            PscFiling::SuperSecure(p) => &p.control,
        }
    }
}

/// Split a control-nature list cell. Accepts a bracketed, quoted list
/// (`['a', 'b']`) or a `;`/`,` separated one.
pub fn parse_control_list(cell: Option<&str>) -> Vec<String> {
    let Some(cell) = cell else {
        return Vec::new();
    };
    cell.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(|c| c == ',' || c == ';')
        .map(|item| item.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl PscRow {
    fn address(&self) -> Address {
        Address {
            line_1: owned(self.address_address_line_1.clone()),
            line_2: owned(self.address_address_line_2.clone()),
            care_of: owned(self.address_care_of.clone()),
            po_box: owned(self.address_po_box.clone()),
            locality: owned(self.address_locality.clone()),
            country: owned(self.address_country.clone()),
            postcode: owned(self.address_postal_code.clone()),
            ..Address::default()
        }
    }

    fn birth(&self) -> Option<BirthMonth> {
        clean(&self.month_year_birth).and_then(BirthMonth::parse)
    }

    /// Typed view of this row, or `None` for kinds the graph does not model
    pub fn into_filing(self) -> Option<PscFiling> {
        let kind = clean(&self.kind).unwrap_or_default().to_string();
        let address = self.address();
        let birth = self.birth();
        let control = ControlFiling {
            company_number: owned(self.company_number),
            etag: owned(self.etag),
            natures_of_control: parse_control_list(self.natures_of_control.as_deref()),
            notified_on: owned(self.notified_on),
        };
        let jurisdiction = Jurisdiction {
            country_of_residence_normal: owned(self.country_of_residence_normal),
            address_country_normal: owned(self.address_country_normal),
            secret_base: owned(self.secret_base),
        };

        let filing = match kind.as_str() {
            PscFiling::INDIVIDUAL => PscFiling::Individual(IndividualPsc {
                control,
                name: owned(self.name),
                title: owned(self.name_elements_title),
                forename: owned(self.name_elements_forename),
                surname: owned(self.name_elements_surname),
                birth,
                nationality: owned(self.nationality),
                address,
                jurisdiction,
            }),
            PscFiling::CORPORATE_ENTITY => PscFiling::CorporateEntity(CorporatePsc {
                control,
                name: owned(self.name),
                address,
                identification: Identification {
                    country_registered: owned(self.identification_country_registered),
                    legal_authority: owned(self.identification_legal_authority),
                    legal_form: owned(self.identification_legal_form),
                    place_registered: owned(self.identification_place_registered),
                    registration_number: owned(self.identification_registration_number),
                },
                jurisdiction,
            }),
            PscFiling::LEGAL_PERSON => PscFiling::LegalPerson(LegalPersonPsc {
                control,
                name: owned(self.name),
                nationality: owned(self.nationality),
                birth,
                address,
                jurisdiction,
            }),
            PscFiling::SUPER_SECURE => PscFiling::SuperSecure(SuperSecurePsc { control }),
            other => {
                debug!("Skipping PSC row of kind '{}'", other);
                return None;
            }
        };
        Some(filing)
    }
}

/// PSC exemption filing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExemptionRecord {
    pub company_number: Option<String>,
    pub etag: Option<String>,
    pub notified_on: Option<String>,
}

/// PSC statement filing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatementRecord {
    pub company_number: Option<String>,
    pub etag: Option<String>,
    pub statement: Option<String>,
    pub notified_on: Option<String>,
}

/// Officer appointment row; people and corporate officers share the file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OfficerRecord {
    pub company_number: Option<String>,
    pub person_number: Option<String>,
    pub corporate_indicator: Option<String>,
    pub title: Option<String>,
    pub forenames: Option<String>,
    pub surname: Option<String>,
    pub honours: Option<String>,
    pub nationality: Option<String>,
    pub resident_country: Option<String>,
    pub partial_date_of_birth: Option<String>,
    pub appointment_type: Option<String>,
    pub appointment_date: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub post_town: Option<String>,
    pub county: Option<String>,
    pub country: Option<String>,
    pub person_postcode: Option<String>,
    pub country_of_residence_normal: Option<String>,
    pub address_country_normal: Option<String>,
    pub secret_base: Option<String>,
}

impl OfficerRecord {
    pub fn is_corporate(&self) -> bool {
        clean(&self.corporate_indicator).map_or(false, |flag| flag.eq_ignore_ascii_case("Y"))
    }

    pub fn birth(&self) -> Option<BirthMonth> {
        clean(&self.partial_date_of_birth).and_then(BirthMonth::parse)
    }

    pub fn address(&self) -> Address {
        Address {
            line_1: owned(self.address_line_1.clone()),
            line_2: owned(self.address_line_2.clone()),
            town: owned(self.post_town.clone()),
            county: owned(self.county.clone()),
            country: owned(self.country.clone()),
            postcode: owned(self.person_postcode.clone()),
            ..Address::default()
        }
    }

    pub fn jurisdiction(&self) -> Jurisdiction {
        Jurisdiction {
            country_of_residence_normal: owned(self.country_of_residence_normal.clone()),
            address_country_normal: owned(self.address_country_normal.clone()),
            secret_base: owned(self.secret_base.clone()),
        }
    }
}

/// Politician reference row, already keyed by join key upstream
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PoliticianRecord {
    pub join_id: Option<String>,
    pub leg_country: Option<String>,
    pub leg_name: Option<String>,
    pub active_periods: Option<String>,
}

/// Disqualified director register row
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DisqualifiedDirectorRecord {
    pub forenames: Option<String>,
    pub surname: Option<String>,
    pub date_of_birth: Option<String>,
}

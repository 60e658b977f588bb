//! Identity resolution
//!
//! Pure functions that turn partial record fields into node UIDs and into
//! the coarser join key used for blocking. Nothing here fails: records that
//! lack identity-forming fields are routed to their fallback identifier.
//!
//! Two different people who share first name, surname, birth month and
//! postcode get the same person UID. That collision is part of the identity
//! policy and is left as is.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::sync::OnceLock;

/// Place-of-registration fragments that mark a UK company register number
const UK_REGISTRIES: [&str; 5] = [
    "COMPANIES HOUSE",
    "ENGLAND",
    "WALES",
    "UNITED KINGDOM",
    "SCOTLAND",
];

/// Legal-form suffixes dropped before comparing company names
const COMPANY_SUFFIXES: [&str; 9] = [
    "LLP",
    "LIMITED",
    "LTD",
    "L.T.D",
    "PARTNERSHIP",
    "LP",
    "B.V.",
    "PLC",
    "CO",
];

/// Year and month of birth, the only birth precision the registers publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BirthMonth {
    pub year: i32,
    pub month: u32,
}

impl BirthMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(BirthMonth { year, month })
    }

    /// Parse `YYYY-MM`, `YYYYMM`, `YYYYMMDD`, `YYYY-MM-DD` or
    /// `YYYY-MM-DD HH:MM:SS`. Anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || !raw.is_ascii() {
            return None;
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return BirthMonth::new(dt.year(), dt.month());
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return BirthMonth::new(date.year(), date.month());
        }
        if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
            let date = NaiveDate::parse_from_str(raw, "%Y%m%d").ok()?;
            return BirthMonth::new(date.year(), date.month());
        }
        let (year, month) = match (raw.len(), raw.split_once('-')) {
            (7, Some((y, m))) => (y, m),
            (6, None) => raw.split_at(4),
            _ => return None,
        };
        BirthMonth::new(year.parse().ok()?, month.parse().ok()?)
    }
}

impl fmt::Display for BirthMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl<'de> Deserialize<'de> for BirthMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        BirthMonth::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised birth month '{}'", raw)))
    }
}

/// The fields a person UID is built from, already picked out of whichever
/// source columns carry them.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonIdentity<'a> {
    pub forename: Option<&'a str>,
    pub surname: Option<&'a str>,
    pub birth: Option<BirthMonth>,
    pub postcode: Option<&'a str>,
    /// Filing identifier used when any of the above is missing
    pub fallback: Option<&'a str>,
}

fn present(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

fn first_token(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or("")
}

fn squash(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// `FIRST-SURNAME-YYYY-MM-POSTCODE`, uppercased with whitespace removed, or
/// the uppercased fallback when any part is missing. Returns an empty
/// string when even the fallback is absent; callers drop such rows.
pub fn derive_person_uid(identity: &PersonIdentity<'_>) -> String {
    let parts = (
        present(identity.forename).map(first_token).filter(|s| !s.is_empty()),
        present(identity.surname),
        identity.birth,
        present(identity.postcode),
    );
    match parts {
        (Some(forename), Some(surname), Some(birth), Some(postcode)) => {
            squash(&format!("{}-{}-{}-{}", forename, surname, birth, postcode))
        }
        _ => present(identity.fallback)
            .map(str::to_uppercase)
            .unwrap_or_default(),
    }
}

/// `FIRST-SURNAME_YYYY-MM`, the blocking key shared with the politician
/// reference table. `None` when any input is missing.
pub fn derive_join_key(
    forename: Option<&str>,
    surname: Option<&str>,
    birth: Option<BirthMonth>,
) -> Option<String> {
    let forename = first_token(present(forename)?);
    let surname = present(surname)?;
    let birth = birth?;
    if forename.is_empty() {
        return None;
    }
    let key = format!("{}-{}_{}", forename, surname, birth);
    let key = squash(key.trim_matches(|c: char| c == '-' || c == '_' || c == ' '));
    (!key.is_empty()).then_some(key)
}

/// UID of a corporate controller: its register number padded to 8 digits
/// when it is registered in the UK, otherwise its own etag.
pub fn derive_company_control_uid(
    place_registered: Option<&str>,
    registration_number: Option<&str>,
    etag: &str,
) -> String {
    let uk_registered = present(place_registered)
        .map(|place| {
            let place = place.to_uppercase();
            UK_REGISTRIES.iter().any(|fragment| place.contains(fragment))
        })
        .unwrap_or(false);

    match (uk_registered, present(registration_number)) {
        (true, Some(number)) => pad_company_number(number),
        _ => etag.trim().to_uppercase(),
    }
}

/// Left-pad a register number with zeros to 8 characters, uppercased
pub fn pad_company_number(number: &str) -> String {
    format!("{:0>8}", number.trim()).to_uppercase()
}

/// `NAME-POSTCODE` uppercased with stray separators trimmed. `None` without a name.
pub fn derive_legal_person_uid(name: Option<&str>, postcode: Option<&str>) -> Option<String> {
    let name = present(name)?;
    let uid = format!("{}-{}", name, present(postcode).unwrap_or("")).to_uppercase();
    let uid = uid.trim_matches(|c: char| c == '-' || c == '_' || c == ' ');
    (!uid.is_empty()).then(|| uid.to_string())
}

fn suffix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let alternatives: Vec<String> = COMPANY_SUFFIXES.iter().map(|s| regex::escape(s)).collect();
        Regex::new(&format!(r"\s+(?:{})$", alternatives.join("|")))
            .expect("Invalid company suffix regex")
    })
}

/// Uppercase a company name and strip one trailing legal-form suffix
pub fn normalize_company_name(name: &str) -> String {
    let upper = name.trim().to_uppercase();
    suffix_pattern().replace(&upper, "").trim().to_string()
}

/// Key matching a corporate officer to a live company: normalized name
/// plus postcode.
pub fn company_name_key(name: Option<&str>, postcode: Option<&str>) -> Option<String> {
    let name = normalize_company_name(present(name)?);
    let postcode = present(postcode)?.to_uppercase();
    (!name.is_empty()).then(|| format!("{}_{}", name, postcode))
}

/// Human-readable label for an officer appointment type code
pub fn appointment_type_label(code: &str) -> Option<&'static str> {
    let label = match code.trim().trim_end_matches(".0") {
        "0" => "Current Secretary",
        "1" => "Current Director",
        "4" => "Current non-designated LLP Member",
        "5" => "Current designated LLP Member",
        "11" => "Current Judicial Factor",
        "12" => "Current Receiver or Manager appointed under the Charities Act",
        "13" => "Current Manager appointed under the CAICE Act",
        "17" => "Current SE Member of Administrative Organ",
        "18" => "Current SE Member of Supervisory Organ",
        "19" => "Current SE Member of Management Organ",
        _ => return None,
    };
    Some(label)
}

//! Input collections
//!
//! Upstream collaborators hand over one CSV per collection with a fixed
//! column contract. [`SourceSnapshot::load`] reads all of them into
//! declared record types; nothing downstream sees raw rows.

pub mod reader;
pub mod records;
pub mod reference;

pub use reader::read_csv;
pub use records::{
    parse_control_list, Address, CompanyRecord, ControlFiling, CorporatePsc,
    DisqualifiedDirectorRecord, ExemptionRecord, Identification, IndividualPsc, Jurisdiction,
    LegalPersonPsc, OfficerRecord, PoliticianRecord, PscFiling, PscRow, StatementRecord,
    SuperSecurePsc,
};
pub use reference::{DisqualifiedIndex, PoliticianEntry, PoliticianIndex};

use crate::config::InputConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Bad row {row} in {path}: {source}")]
    Row {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Every input collection of one run, read once and never mutated
#[derive(Debug, Clone, Default)]
pub struct SourceSnapshot {
    pub companies: Vec<CompanyRecord>,
    pub psc_filings: Vec<PscFiling>,
    pub statements: Vec<StatementRecord>,
    pub exemptions: Vec<ExemptionRecord>,
    pub officers: Vec<OfficerRecord>,
    pub politicians: PoliticianIndex,
    pub disqualified: DisqualifiedIndex,
}

impl SourceSnapshot {
    /// Read every collection under `input.dir`. The politician and
    /// disqualified-director tables may be absent.
    pub fn load(input: &InputConfig, sample_rows: Option<usize>) -> SourceResult<Self> {
        let companies: Vec<CompanyRecord> = read_csv(&input.path(&input.companies), sample_rows)?;
        let psc_rows: Vec<PscRow> = read_csv(&input.path(&input.psc_records), sample_rows)?;
        let statements = read_csv(&input.path(&input.psc_statements), sample_rows)?;
        let exemptions = read_csv(&input.path(&input.exemptions), sample_rows)?;
        let officers = read_csv(&input.path(&input.officers), sample_rows)?;

        let politicians: Vec<PoliticianRecord> =
            read_optional(&input.path(&input.politicians), sample_rows)?;
        let disqualified: Vec<DisqualifiedDirectorRecord> =
            read_optional(&input.path(&input.disqualified_directors), sample_rows)?;

        let psc_filings: Vec<PscFiling> =
            psc_rows.into_iter().filter_map(PscRow::into_filing).collect();

        let snapshot = SourceSnapshot {
            companies,
            psc_filings,
            statements,
            exemptions,
            officers,
            politicians: PoliticianIndex::from_records(&politicians),
            disqualified: DisqualifiedIndex::from_records(&disqualified),
        };
        info!(
            "Read {} companies, {} PSC filings, {} statements, {} exemptions, {} officers",
            snapshot.companies.len(),
            snapshot.psc_filings.len(),
            snapshot.statements.len(),
            snapshot.exemptions.len(),
            snapshot.officers.len()
        );
        Ok(snapshot)
    }
}

fn read_optional<T: serde::de::DeserializeOwned>(
    path: &Path,
    sample_rows: Option<usize>,
) -> SourceResult<Vec<T>> {
    if !path.exists() {
        warn!("Optional input {} not found, continuing without it", path.display());
        return Ok(Vec::new());
    }
    read_csv(path, sample_rows)
}

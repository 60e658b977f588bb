//! Pipeline configuration
//!
//! Every field has a default, so a YAML file only needs the keys it wants to
//! change:
//!
//! ```yaml
//! input:
//!   dir: data/processed
//! output_dir: data/graph
//! max_block_size: 200
//! ```

use crate::error::PipelineResult;
use crate::graph::Label;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the normalized input collections live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub dir: PathBuf,
    pub companies: String,
    pub psc_records: String,
    pub psc_statements: String,
    pub exemptions: String,
    pub officers: String,
    /// Optional: a missing file yields an empty reference table
    pub politicians: String,
    /// Optional: a missing file yields an empty reference table
    pub disqualified_directors: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("processed"),
            companies: "companies.csv".to_string(),
            psc_records: "active_psc_records.csv".to_string(),
            psc_statements: "active_psc_statements.csv".to_string(),
            exemptions: "active_exemption_records.csv".to_string(),
            officers: "active_officers.csv".to_string(),
            politicians: "politicians.csv".to_string(),
            disqualified_directors: "disqualified_directors.csv".to_string(),
        }
    }
}

impl InputConfig {
    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input: InputConfig,
    /// Directory receiving the node/edge datasets and `manifest.json`
    pub output_dir: PathBuf,
    /// Joins the distinct values of a merged attribute
    pub separator: String,
    /// Nodes removed per reset batch
    pub delete_batch_size: usize,
    /// Rows buffered before each dataset flush
    pub export_chunk_size: usize,
    /// Blocks with more members are skipped by the matcher
    pub max_block_size: usize,
    /// Duplicate rows shown when a UID check fails
    pub uniqueness_sample_size: usize,
    /// Labels that get a `uid` uniqueness constraint before loading
    pub constraint_labels: Vec<Label>,
    /// Read at most this many rows from each input
    pub sample_rows: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            output_dir: PathBuf::from("graph-output"),
            separator: " | ".to_string(),
            delete_batch_size: 10_000,
            export_chunk_size: 100_000,
            max_block_size: 500,
            uniqueness_sample_size: 10,
            constraint_labels: Label::all_entity_labels(),
            sample_rows: None,
        }
    }
}

impl PipelineConfig {
    /// Load config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> PipelineResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.separator, " | ");
        assert_eq!(config.delete_batch_size, 10_000);
        assert_eq!(config.constraint_labels.len(), 7);
        assert!(config.sample_rows.is_none());
        assert_eq!(
            config.input.path(&config.input.companies),
            PathBuf::from("processed/companies.csv")
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = PipelineConfig::from_yaml(
            "input:\n  dir: /data/in\noutput_dir: /data/out\nmax_block_size: 50\nconstraint_labels: [Person, Company]\n",
        )
        .unwrap();
        assert_eq!(config.input.dir, PathBuf::from("/data/in"));
        assert_eq!(config.input.officers, "active_officers.csv");
        assert_eq!(config.output_dir, PathBuf::from("/data/out"));
        assert_eq!(config.max_block_size, 50);
        assert_eq!(config.constraint_labels, vec![Label::new("Person"), Label::new("Company")]);
        assert_eq!(config.export_chunk_size, 100_000);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(PipelineConfig::from_yaml("max_block_size: [").is_err());
    }
}

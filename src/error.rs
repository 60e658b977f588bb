//! Top-level error type for the build, export and load stages

use crate::load::LoadError;
use crate::source::SourceError;
use thiserror::Error;

/// Errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Reading or decoding an input collection failed
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Writing a dataset file failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Config file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Manifest entries are inconsistent with each other
    #[error("Malformed manifest: {0}")]
    Manifest(String),

    /// A load step failed; the run stops here
    #[error("Load step '{step}' failed: {source}")]
    Load {
        step: String,
        #[source]
        source: LoadError,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    pub(crate) fn load(step: impl Into<String>) -> impl FnOnce(LoadError) -> PipelineError {
        let step = step.into();
        move |source| PipelineError::Load { step, source }
    }
}

//! Error types for the shoplens core
//!
//! None of these abort an analysis pass. Parse failures are rendered to strings
//! and recorded on the extraction result; contract violations are logged and
//! the offending item is dropped.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("JSON-LD block {index} is not valid JSON: {source}")]
    JsonLdParse {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON-LD block {index} has an unusable top level ({kind})")]
    InvalidTopLevel { index: usize, kind: &'static str },

    #[error("unknown recommendation template: {0}")]
    UnknownRecommendation(String),

    #[error("invalid network facts: {0}")]
    InvalidFacts(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

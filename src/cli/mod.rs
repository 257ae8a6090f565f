//! CLI support for tablequery
//!
//! Provides programmatic access to the `tq` command functionality so other
//! front doors can embed it.

mod check;
mod convert;
mod docs;
mod onboard;

pub use check::{execute_check, CheckOptions, CheckResult};
pub use convert::query_to_json;
pub use docs::{get_doc_category, get_docs_overview, DocCategory};
pub use onboard::get_onboarding_content;

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Query text did not match the grammar
    #[error("{0}")]
    Parse(#[from] crate::ParseError),

    /// Query matched but could not be compiled
    #[error("Compile error: {0}")]
    Compile(#[from] crate::CompileError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Output could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No query provided
    #[error("No query provided. Pass it as an argument or pipe it to stdin.")]
    NoInput,

    /// Unknown documentation category
    #[error("Unknown category: '{0}'\nRun 'tq docs' to see available categories.")]
    UnknownCategory(String),
}

impl From<crate::QueryError> for CliError {
    fn from(e: crate::QueryError) -> Self {
        match e {
            crate::QueryError::Parse(e) => CliError::Parse(e),
            crate::QueryError::Compile(e) => CliError::Compile(e),
        }
    }
}

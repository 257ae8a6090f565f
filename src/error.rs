use thiserror::Error;

use crate::{compiler::CompileError, parser::ParseError};

/// Failure of the whole text-to-query pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl QueryError {
    /// True when the input text itself was malformed.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, QueryError::Parse(_))
    }
}

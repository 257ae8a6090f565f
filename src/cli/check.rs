//! Validate and compile table queries

use crate::{describe_query, print_syntax_tree, Parser, ParserSettings};
use super::{query_to_json, CliError};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The query text
    pub query: String,
    /// Only validate syntax, don't compile
    pub syntax_only: bool,
    /// Print the syntax tree instead of the compiled query
    pub tree: bool,
    /// Print an outline of the compiled query
    pub explain: bool,
    /// Colour rule names in syntax errors and trees
    pub color: bool,
    /// Override the maximum where clause nesting depth
    pub max_depth: Option<usize>,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Rendered syntax tree
    Tree(String),
    /// Rendered query outline
    Explained(String),
    /// Compiled query as JSON
    Compiled(serde_json::Value),
}

impl CheckOptions {
    fn settings(&self) -> ParserSettings {
        let settings = ParserSettings::default().with_pretty_errors(self.color);
        match self.max_depth {
            Some(depth) => settings.with_max_nesting_depth(depth),
            None => settings,
        }
    }
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let query = options.query.trim_end_matches(['\n', '\r']);
    if query.trim().is_empty() {
        return Err(CliError::NoInput);
    }

    let parser = Parser::with_settings(options.settings());

    if options.tree {
        let tokens = parser.tokenize(query)?;
        return Ok(CheckResult::Tree(print_syntax_tree(&tokens, query, options.color)));
    }

    if options.syntax_only {
        parser.tokenize(query)?;
        return Ok(CheckResult::SyntaxValid);
    }

    let compiled = parser.parse_query(query)?;

    if options.explain {
        return Ok(CheckResult::Explained(describe_query(&compiled)));
    }
    Ok(CheckResult::Compiled(query_to_json(&compiled)))
}

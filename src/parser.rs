use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::{
    ast::{QueryAst, RuleTag, Token},
    error::QueryError,
    matcher::Matcher,
    position::Position,
    query::Query,
    replay,
};

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserSettings {
    /// Maximum number of nested where clauses
    pub max_nesting_depth: usize,
    /// Initial number of token slots; the buffer doubles when full
    pub token_capacity: usize,
    /// Highlight rule names in syntax errors with ANSI colour
    pub pretty_errors: bool,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            max_nesting_depth: 100,
            token_capacity: 256,
            pretty_errors: false,
        }
    }
}

impl ParserSettings {
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn with_token_capacity(mut self, capacity: usize) -> Self {
        self.token_capacity = capacity;
        self
    }

    pub fn with_pretty_errors(mut self, pretty: bool) -> Self {
        self.pretty_errors = pretty;
        self
    }
}

/// Input does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{0}")]
    Syntax(SyntaxError),

    #[error("parse error: where clauses nested deeper than {limit} at {position}")]
    NestingTooDeep { limit: usize, position: Position },

    #[error("parse error: input of {len} characters is too long")]
    InputTooLong { len: usize },
}

/// The rule that got furthest through the input before failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub rule: RuleTag,
    pub begin: Position,
    pub end: Position,
    /// Input covered by the rule up to the failure point
    pub excerpt: String,
    /// Character at the failure point, `None` at end of input
    pub found: Option<char>,
    pub pretty: bool,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pretty {
            write!(f, "parse error near \x1B[34m{}\x1B[m", self.rule)?;
        } else {
            write!(f, "parse error near {}", self.rule)?;
        }

        write!(
            f,
            " (line {} column {} - line {} column {}): {:?}",
            self.begin.line, self.begin.column, self.end.line, self.end.column, self.excerpt
        )?;

        match self.found {
            Some(ch) => write!(f, ", unexpected {:?}", ch),
            None => write!(f, ", unexpected end of input"),
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Entry point from query text to AST or compiled [`Query`].
///
/// Holds only settings; every call works on its own matcher state, so one
/// parser can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    settings: ParserSettings,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ParserSettings) -> Self {
        Parser { settings }
    }

    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Runs the grammar matcher only, returning its token buffer.
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, ParseError> {
        let input: Vec<char> = source.chars().collect();
        self.match_input(&input)
    }

    /// Matches `source` and replays the recorded actions into a fresh AST.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablequery::Parser;
    ///
    /// let ast = Parser::new().parse("select books limit 3").unwrap();
    /// assert_eq!(ast.command, "select");
    /// assert_eq!(ast.table_key, "books");
    /// assert_eq!(ast.select.limit, "3");
    /// ```
    pub fn parse(&self, source: &str) -> Result<QueryAst, ParseError> {
        let input: Vec<char> = source.chars().collect();
        let tokens = self.match_input(&input)?;

        let mut ast = QueryAst::new();
        replay::replay(&tokens, &input, &mut ast);
        Ok(ast)
    }

    /// Parses and compiles `source`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablequery::{Parser, PredicateOpCode, WhereOpCode};
    ///
    /// let query = Parser::new()
    ///     .parse_query("select books where str_eq(lang, 'en')")
    ///     .unwrap();
    /// let clause = query.select.unwrap().where_clause.unwrap();
    /// assert_eq!(clause.op_code, WhereOpCode::Predicate);
    /// assert_eq!(clause.predicate.unwrap().op_code, PredicateOpCode::StrEq);
    /// ```
    pub fn parse_query(&self, source: &str) -> Result<Query, QueryError> {
        let ast = self.parse(source)?;
        Ok(ast.compile()?)
    }

    fn match_input(&self, input: &[char]) -> Result<Vec<Token>, ParseError> {
        match Matcher::new(input, &self.settings).run() {
            Ok(tokens) => {
                debug!(chars = input.len(), tokens = tokens.len(), "matched query");
                Ok(tokens)
            }
            Err(e) => {
                debug!(error = %e, "query did not match");
                Err(e)
            }
        }
    }
}

//! Documentation content for the tq CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Where,
    Predicates,
    Limit,
    Errors,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" | "select" => Some(Self::Syntax),
            "where" | "clauses" | "where_clauses" => Some(Self::Where),
            "predicates" | "predicate" | "str_eq" | "str_neq" => Some(Self::Predicates),
            "limit" | "limits" => Some(Self::Limit),
            "errors" | "error" => Some(Self::Errors),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"TQ DOCUMENTATION

tq checks and compiles table queries. A query names a table, optionally
filters its rows with a where clause, and optionally caps the number of
rows returned.

DOCUMENTATION CATEGORIES

  syntax            Query shape, table keys, escapes, and whitespace
  where             Where clauses and nested and()/or() groups
  predicates        str_eq / str_neq and their argument forms
  limit             Row limits
  errors            Reading syntax and compile errors

QUICK REFERENCE

  select <table>                      Select every row of a table
  select <table> where <clause>       Filter rows
  select <table> limit <n>            Cap the row count (n >= 1)
  and(<clause>, <clause>, ...)        All clauses must hold
  or(<clause>, <clause>, ...)         Any clause must hold
  str_eq(<value>, <value>, ...)       Values are equal
  str_neq(<value>, <value>, ...)      Values differ
  @key                                The row key
  'text'                              A literal

Run 'tq doc <category>' for detailed documentation.
Run 'tq onboard' for an interactive tutorial.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_str(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Where) => Ok(WHERE_DOC),
        Some(DocCategory::Predicates) => Ok(PREDICATES_DOC),
        Some(DocCategory::Limit) => Ok(LIMIT_DOC),
        Some(DocCategory::Errors) => Ok(ERRORS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Query Shape

Every query is a select. The where section comes before the limit section
and both are optional.

  select <table> [where <clause>] [limit <n>]

TABLE KEYS

A key is one or more ASCII letters, digits, or escape sequences.

  select Foo
  select table42
  select my\tkey

ESCAPES

A backslash followed by one of  a b f n r t v \ ? " '  is part of the key.
The escape is kept as written; it is not translated.

WHITESPACE

Spaces, tabs, and newlines separate words. Leading whitespace is allowed,
trailing whitespace after the last word is not.

  tq check 'select Foo'              valid
  tq check '  select Foo'            valid
  tq check 'select Foo '             error: unexpected end of input

KEYWORDS

select, where, limit, and, or, str_eq, and str_neq are lowercase and exact.
"#;

const WHERE_DOC: &str = r#"WHERE - Filtering Rows

A where section holds exactly one clause. A clause is a predicate or a
group of clauses.

  select Foo where str_eq(@key, 'abc')

GROUPS

and() holds when every inner clause holds. or() holds when any inner clause
holds. Both take one or more clauses separated by commas, and nest freely.

  select Foo where and(str_eq(@key, 'a'), str_neq(name, 'b'))
  select Foo where or(str_eq(@key, 'a'), and(str_eq(x, 'b'), str_eq(y, 'c')))

Whitespace is allowed around the parentheses and commas of a group.

NESTING

Groups nest up to 100 levels by default. Deeper queries are rejected with
"nesting too deep". Raise or lower the bound with --max-depth or the
TQ_MAX_DEPTH environment variable.

  tq check --max-depth 8 'select Foo where and(and(str_eq(a, b)))'
"#;

const PREDICATES_DOC: &str = r#"PREDICATES - Comparing Values

  str_eq(<value>, <value>, ...)      all values are equal
  str_neq(<value>, <value>, ...)     values are not equal

ARGUMENT FORMS

  @key          the key of the row being tested
  name          the value stored under a column key
  'text'        a literal; may be empty, may not contain a single quote

Arguments are separated by commas. Whitespace may follow a comma and may
precede the closing parenthesis.

  select Foo where str_eq(@key, 'abc')
  select Foo where str_neq(owner, 'root', '')

The first argument must be followed directly by a comma or the closing
parenthesis:

  str_eq(@key, 'a')        valid
  str_eq(@key , 'a')       error

Any other name in predicate position is rejected:

  tq check "select Foo where bogus(@key, 'a')"
  => parse error near Predicate ...
"#;

const LIMIT_DOC: &str = r#"LIMIT - Capping Rows

  select Foo limit 10
  select Foo where str_eq(@key, 'a') limit 1

The limit is a positive integer without leading zeros. A query without a
limit returns every row; the compiled form records that as limit 0.

  limit 0          parse error near PositiveInteger
  limit 007        parse error
  limit 99999999999999999999
                   compile error: the limit must fit in 64 bits
"#;

const ERRORS_DOC: &str = r#"ERRORS - Reading Diagnostics

SYNTAX ERRORS

A syntax error names the innermost rule that was being matched at the point
the input was read furthest, the span from that rule's start to the
offending character, the text of that span, and the character found.

  tq check "select Foo where str_eq(@key, 'abc'"
  => parse error near PredicateClause (line 1 column 18 - line 1 column 36):
     "str_eq(@key, 'abc'", unexpected end of input

Lines and columns start at 1. --color highlights the rule name.

COMPILE ERRORS

Compile errors describe the path to the problem, outermost first:

  Compile error: select compile failed: convert limit '99999999999999999999'
  failed: number too large to fit in target type

EXIT STATUS

  0    query is valid
  1    syntax error, compile error, or no input
"#;

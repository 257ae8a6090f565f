//! # Table Query Language - Abstract Syntax Tree
//!
//! This module defines the build-time representation of a table query: the
//! interval tokens produced by the grammar matcher and the mutable
//! [`QueryAst`] that the token replayer fills in before compilation.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Rule tags, interval tokens and the token buffer
//! - **[clauses]** - Where clause and predicate nodes
//! - **[operators]** - Op-codes the compiler resolves command strings to
//! - **[query]** - The query AST and its where-stack builder
//!
//! ## Quick Start
//!
//! ```text
//! select people where and(str_eq(city, 'Oslo'), str_neq(@key, 'bob')) limit 10
//! ```
//!
//! Selects at most ten rows of the `people` table whose `city` entry equals
//! `Oslo` and whose row key is not `bob`.
//!
//! ## Core Concepts
//!
//! ### Clause Trees
//!
//! A where section holds exactly one clause. Clauses nest:
//!
//! - **Predicate** `str_eq(...)` / `str_neq(...)` - Leaf comparison
//! - **Conjunction** `and(...)` - Every child must hold
//! - **Disjunction** `or(...)` - At least one child must hold
//!
//! ### Predicate Arguments
//!
//! - `@key` - The row's own key
//! - `'text'` - A literal (anything but a single quote)
//! - `name` - An entry key, alphanumerics plus backslash escapes
//!
//! ### Deferred Building
//!
//! The matcher backtracks freely, so it never touches the AST. It records
//! zero-width action markers instead, and the replayer later turns those into
//! builder calls in source order:
//!
//! ```text
//! where and(str_eq(a,'x'))
//!
//! InitWhere PushWhere InitAndClause PushWhere InitPredicate
//! SetPredicateCommand("str_eq") AddPredicateKey("a")
//! AddPredicateLiteral("x") PopWhere PopWhere
//! ```
//!
//! ## Examples
//!
//! ### Whole Table
//!
//! ```text
//! select books
//! ```
//!
//! ### Row Key Lookup
//!
//! ```text
//! select books where str_eq(@key, 'isbn-0451524934')
//! ```
//!
//! ### Alternatives
//!
//! ```text
//! select books where or(str_eq(lang, 'en'), str_eq(lang, 'no')) limit 50
//! ```
pub mod tokens;
pub mod clauses;
pub mod operators;
pub mod query;

pub use tokens::{RuleTag, Token, TokenBuffer};
pub use clauses::{PredicateNode, WhereId, WhereNode};
pub use operators::{PredicateOpCode, QueryOpCode, WhereOpCode};
pub use query::{JoinAst, QueryAst, SelectAst};

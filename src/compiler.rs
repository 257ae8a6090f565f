//! Validating transform from [`QueryAst`] into [`Query`].
//!
//! The AST is only ever produced by the builder, so every failure here means
//! the grammar and the compiler disagree about what a query can contain.
//! Errors say which stage failed and keep the lower-level cause as their
//! source.

use std::num::ParseIntError;

use thiserror::Error;
use tracing::debug;

use crate::{
    ast::{PredicateNode, PredicateOpCode, QueryAst, QueryOpCode, WhereId, WhereNode, WhereOpCode},
    query::{Query, QueryJoin, QueryPredicate, QuerySelect, QueryWhere},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("no command matching '{0}'")]
    UnknownCommand(String),

    #[error("select compile failed: {0}")]
    Select(#[source] Box<CompileError>),

    #[error("join compile failed: {0}")]
    Join(#[source] Box<CompileError>),

    #[error("convert limit '{text}' failed: {source}")]
    Limit {
        text: String,
        #[source]
        source: ParseIntError,
    },

    #[error("where clause compile failed: {0}")]
    Where(#[source] Box<CompileError>),

    #[error("and clause compile failed: {0}")]
    And(#[source] Box<CompileError>),

    #[error("or clause compile failed: {0}")]
    Or(#[source] Box<CompileError>),

    #[error("failed compiling child clause {index}: {source}")]
    Clause {
        index: usize,
        #[source]
        source: Box<CompileError>,
    },

    #[error("unsupported where op-code '{0}'")]
    UnsupportedWhere(String),

    #[error("predicate compile failed: {0}")]
    Predicate(#[source] Box<CompileError>),

    #[error("unsupported predicate '{0}'")]
    UnsupportedPredicate(String),
}

/// Compiles `ast` into a [`Query`]. Pure; `ast` is left untouched.
pub fn compile(ast: &QueryAst) -> Result<Query, CompileError> {
    let Some(op_code) = QueryOpCode::from_command(&ast.command) else {
        return Err(CompileError::UnknownCommand(ast.command.clone()));
    };

    let mut query = Query {
        op_code,
        table_key: ast.table_key.clone(),
        select: None,
        join: None,
        ast: ast.clone(),
    };

    match op_code {
        QueryOpCode::Select => {
            let select =
                compile_select(ast).map_err(|e| CompileError::Select(Box::new(e)))?;
            query.select = Some(select);
        }
        QueryOpCode::Join => {
            let join = compile_join(ast).map_err(|e| CompileError::Join(Box::new(e)))?;
            query.join = Some(join);
        }
    }

    debug!(op_code = %op_code, table = %query.table_key, "compiled query");
    Ok(query)
}

fn compile_select(ast: &QueryAst) -> Result<QuerySelect, CompileError> {
    let mut select = QuerySelect::default();

    if !ast.select.limit.is_empty() {
        select.limit = ast
            .select
            .limit
            .parse::<u64>()
            .map_err(|source| CompileError::Limit {
                text: ast.select.limit.clone(),
                source,
            })?;
    }

    if let Some(root) = ast.select.where_root {
        let clause = compile_where_root(ast, root).map_err(|e| CompileError::Where(Box::new(e)))?;
        select.where_clause = Some(clause);
    }

    Ok(select)
}

fn compile_join(ast: &QueryAst) -> Result<QueryJoin, CompileError> {
    Ok(QueryJoin {
        rows: ast.join.rows.clone(),
    })
}

/// The root made by `init_where` only wraps the outermost clause, so a root
/// holding a single clause compiles to that clause.
fn compile_where_root(ast: &QueryAst, root: WhereId) -> Result<QueryWhere, CompileError> {
    match ast.where_node(root).clauses.as_slice() {
        [only] => compile_where(ast, *only),
        _ => compile_where(ast, root),
    }
}

fn compile_where(ast: &QueryAst, id: WhereId) -> Result<QueryWhere, CompileError> {
    let node = ast.where_node(id);

    match (WhereOpCode::from_command(&node.command), &node.predicate) {
        (Some(WhereOpCode::And), _) => {
            let clauses =
                compile_clauses(ast, node).map_err(|e| CompileError::And(Box::new(e)))?;
            Ok(QueryWhere::and(clauses))
        }
        (Some(WhereOpCode::Or), _) => {
            let clauses = compile_clauses(ast, node).map_err(|e| CompileError::Or(Box::new(e)))?;
            Ok(QueryWhere::or(clauses))
        }
        (Some(WhereOpCode::Predicate), Some(predicate)) => {
            let predicate =
                compile_predicate(predicate).map_err(|e| CompileError::Predicate(Box::new(e)))?;
            Ok(QueryWhere::predicate(predicate))
        }
        _ => Err(CompileError::UnsupportedWhere(node.command.clone())),
    }
}

fn compile_clauses(ast: &QueryAst, node: &WhereNode) -> Result<Vec<QueryWhere>, CompileError> {
    node.clauses
        .iter()
        .enumerate()
        .map(|(index, &child)| {
            compile_where(ast, child).map_err(|e| CompileError::Clause {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

fn compile_predicate(predicate: &PredicateNode) -> Result<QueryPredicate, CompileError> {
    let op_code = PredicateOpCode::from_command(&predicate.command)
        .ok_or_else(|| CompileError::UnsupportedPredicate(predicate.command.clone()))?;

    Ok(QueryPredicate {
        op_code,
        keys: predicate.keys.clone(),
        literals: predicate.literals.clone(),
        include_row_key: predicate.include_row_key,
    })
}

use std::collections::BTreeMap;

use crate::ast::{PredicateOpCode, QueryAst, QueryOpCode, WhereOpCode};

/// A compiled, validated query ready for the storage engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub op_code: QueryOpCode,
    pub table_key: String,
    /// Present when `op_code` is [`QueryOpCode::Select`]
    pub select: Option<QuerySelect>,
    /// Present when `op_code` is [`QueryOpCode::Join`]
    pub join: Option<QueryJoin>,

    pub(crate) ast: QueryAst,
}

/// Compiled select section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuerySelect {
    pub where_clause: Option<QueryWhere>,
    /// Maximum number of rows, 0 meaning unlimited
    pub limit: u64,
}

/// Compiled where clause.
///
/// `clauses` is populated for [`WhereOpCode::And`] and [`WhereOpCode::Or`],
/// `predicate` for [`WhereOpCode::Predicate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWhere {
    pub op_code: WhereOpCode,
    pub clauses: Vec<QueryWhere>,
    pub predicate: Option<QueryPredicate>,
}

/// Compiled leaf comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPredicate {
    pub op_code: PredicateOpCode,
    /// Entry keys, in source order
    pub keys: Vec<String>,
    /// Literal values, in source order
    pub literals: Vec<String>,
    /// Whether the row's own key takes part in the comparison
    pub include_row_key: bool,
}

/// Compiled join section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryJoin {
    pub rows: Vec<Row>,
}

/// A table row as handed over by the storage collaborator.
///
/// Each entry maps to its set of CRDT points.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub key: String,
    pub entries: BTreeMap<String, Vec<String>>,
}

impl Query {
    /// AST this query was compiled from.
    pub fn ast(&self) -> &QueryAst {
        &self.ast
    }

    /// Walks the query, calling `visitor` for each part.
    ///
    /// Order: AST, op-code, table key, then either the select section (where
    /// clauses depth first, each `visit_where` matched by a `leave_where`) or
    /// the join section row by row.
    pub fn visit<V: QueryVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_ast(&self.ast);
        visitor.visit_op_code(self.op_code);
        visitor.visit_table_key(&self.table_key);

        if let Some(select) = &self.select {
            visitor.visit_select(select);
            if let Some(clause) = &select.where_clause {
                clause.visit(0, visitor);
            }
        }

        if let Some(join) = &self.join {
            visitor.visit_join(join);
            for (position, row) in join.rows.iter().enumerate() {
                visitor.visit_row_join(position, row);
            }
        }
    }
}

impl QuerySelect {
    /// The row limit, or `None` when unlimited.
    pub fn row_limit(&self) -> Option<u64> {
        (self.limit > 0).then_some(self.limit)
    }
}

impl QueryWhere {
    pub fn and(clauses: Vec<QueryWhere>) -> Self {
        QueryWhere {
            op_code: WhereOpCode::And,
            clauses,
            predicate: None,
        }
    }

    pub fn or(clauses: Vec<QueryWhere>) -> Self {
        QueryWhere {
            op_code: WhereOpCode::Or,
            clauses,
            predicate: None,
        }
    }

    pub fn predicate(predicate: QueryPredicate) -> Self {
        QueryWhere {
            op_code: WhereOpCode::Predicate,
            clauses: Vec::new(),
            predicate: Some(predicate),
        }
    }

    fn visit<V: QueryVisitor + ?Sized>(&self, position: usize, visitor: &mut V) {
        visitor.visit_where(position, self);
        if let Some(predicate) = &self.predicate {
            visitor.visit_predicate(predicate);
        }
        for (i, clause) in self.clauses.iter().enumerate() {
            clause.visit(i, visitor);
        }
        visitor.leave_where(self);
    }
}

/// Callbacks for [`Query::visit`]. Every method defaults to doing nothing.
pub trait QueryVisitor {
    fn visit_ast(&mut self, _ast: &QueryAst) {}
    fn visit_op_code(&mut self, _op_code: QueryOpCode) {}
    fn visit_table_key(&mut self, _table_key: &str) {}
    fn visit_select(&mut self, _select: &QuerySelect) {}
    /// `position` is the clause's index among its siblings
    fn visit_where(&mut self, _position: usize, _clause: &QueryWhere) {}
    fn leave_where(&mut self, _clause: &QueryWhere) {}
    fn visit_predicate(&mut self, _predicate: &QueryPredicate) {}
    fn visit_join(&mut self, _join: &QueryJoin) {}
    fn visit_row_join(&mut self, _position: usize, _row: &Row) {}
}

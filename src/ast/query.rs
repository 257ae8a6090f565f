use tracing::trace;

use crate::{
    ast::{PredicateNode, WhereId, WhereNode},
    compiler::{self, CompileError},
    query::{Query, Row},
    replay::QueryBuilder,
};

/// Select part of a query under construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectAst {
    /// Synthetic root created by `init_where`, wrapping the outermost clause
    pub where_root: Option<WhereId>,

    /// Raw `limit` text, empty when absent
    pub limit: String,
}

/// Join part of a query under construction.
///
/// The text grammar never produces joins; rows are supplied directly by the
/// storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JoinAst {
    pub rows: Vec<Row>,
}

/// Mutable query representation filled in by the token replayer.
///
/// Where clauses live in an arena and refer to their children by [`WhereId`].
/// The where-stack tracks which clause is currently being populated; its
/// bottom entry is always the root created by `init_where`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryAst {
    pub command: String,
    pub table_key: String,
    pub select: SelectAst,
    pub join: JoinAst,

    nodes: Vec<WhereNode>,
    where_stack: Vec<WhereId>,
}

impl QueryAst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_node(&self, id: WhereId) -> &WhereNode {
        &self.nodes[id.0]
    }

    pub fn where_root(&self) -> Option<&WhereNode> {
        self.select.where_root.map(|id| self.where_node(id))
    }

    /// Children of `id`, in source order.
    pub fn clauses(&self, id: WhereId) -> impl Iterator<Item = &WhereNode> + '_ {
        self.nodes[id.0].clauses.iter().map(|child| &self.nodes[child.0])
    }

    /// Current depth of the where-stack, root included.
    pub fn where_depth(&self) -> usize {
        self.where_stack.len()
    }

    /// Compiles into an immutable [`Query`].
    pub fn compile(&self) -> Result<Query, CompileError> {
        compiler::compile(self)
    }

    fn alloc(&mut self, node: WhereNode) -> WhereId {
        let id = WhereId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn peek_where(&mut self) -> &mut WhereNode {
        let Some(&top) = self.where_stack.last() else {
            panic!("BUG where stack empty");
        };
        &mut self.nodes[top.0]
    }

    fn current_predicate(&mut self) -> &mut PredicateNode {
        let node = self.peek_where();
        match node.predicate.as_mut() {
            Some(predicate) => predicate,
            None => panic!(
                "BUG predicate not initialised on '{}' where clause",
                node.command
            ),
        }
    }
}

impl QueryBuilder for QueryAst {
    fn add_select(&mut self) {
        self.command = "select".to_string();
    }

    fn set_table_name(&mut self, name: &str) {
        self.table_key = name.to_string();
    }

    fn set_limit(&mut self, limit: &str) {
        self.select.limit = limit.to_string();
    }

    fn init_where(&mut self) {
        let root = self.alloc(WhereNode::new("and"));
        self.select.where_root = Some(root);
        self.where_stack = vec![root];
    }

    fn push_where(&mut self) {
        let child = self.alloc(WhereNode::default());
        self.peek_where().clauses.push(child);
        self.where_stack.push(child);
        trace!(depth = self.where_stack.len(), "pushed where clause");
    }

    fn pop_where(&mut self) {
        match self.where_stack.len() {
            0 => panic!("BUG where stack empty"),
            1 => panic!("BUG attempted to pop the root where clause"),
            _ => {
                self.where_stack.pop();
            }
        }
    }

    fn init_predicate(&mut self) {
        let node = self.peek_where();
        node.command = "predicate".to_string();
        node.predicate = Some(PredicateNode::default());
    }

    fn init_and_clause(&mut self) {
        self.peek_where().command = "and".to_string();
    }

    fn init_or_clause(&mut self) {
        self.peek_where().command = "or".to_string();
    }

    fn set_predicate_command(&mut self, command: &str) {
        self.current_predicate().command = command.to_string();
    }

    fn use_predicate_row_key(&mut self) {
        self.current_predicate().include_row_key = true;
    }

    fn add_predicate_key(&mut self, key: &str) {
        self.current_predicate().keys.push(key.to_string());
    }

    fn add_predicate_literal(&mut self, literal: &str) {
        self.current_predicate().literals.push(literal.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_appends_to_top() {
        let mut ast = QueryAst::new();
        ast.init_where();
        ast.push_where();
        ast.init_and_clause();
        ast.push_where();
        ast.init_predicate();
        ast.pop_where();
        ast.push_where();
        ast.init_or_clause();
        ast.pop_where();
        ast.pop_where();

        assert_eq!(ast.where_depth(), 1);
        let root = ast.select.where_root.unwrap();
        let outer: Vec<_> = ast.clauses(root).collect();
        assert_eq!(outer.len(), 1);
        assert_eq!(outer[0].command, "and");

        let inner: Vec<_> = ast.clauses(root_child(&ast, root)).map(|n| n.command.as_str()).collect();
        assert_eq!(inner, vec!["predicate", "or"]);
    }

    fn root_child(ast: &QueryAst, root: WhereId) -> WhereId {
        ast.where_node(root).clauses[0]
    }

    #[test]
    fn test_init_where_resets_stack() {
        let mut ast = QueryAst::new();
        ast.init_where();
        ast.push_where();
        ast.init_where();
        assert_eq!(ast.where_depth(), 1);
        assert_eq!(ast.where_root().unwrap().command, "and");
        assert!(ast.where_root().unwrap().clauses.is_empty());
    }

    #[test]
    #[should_panic(expected = "root where clause")]
    fn test_pop_root_panics() {
        let mut ast = QueryAst::new();
        ast.init_where();
        ast.pop_where();
    }

    #[test]
    #[should_panic(expected = "where stack empty")]
    fn test_pop_empty_panics() {
        let mut ast = QueryAst::new();
        ast.pop_where();
    }

    #[test]
    #[should_panic(expected = "where stack empty")]
    fn test_push_without_root_panics() {
        let mut ast = QueryAst::new();
        ast.push_where();
    }

    #[test]
    #[should_panic(expected = "predicate not initialised")]
    fn test_predicate_key_without_predicate_panics() {
        let mut ast = QueryAst::new();
        ast.init_where();
        ast.push_where();
        ast.add_predicate_key("name");
    }
}

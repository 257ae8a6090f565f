/// Handle of a [`WhereNode`] inside its owning [`QueryAst`](crate::ast::QueryAst).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WhereId(pub(crate) usize);

impl WhereId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where clause as recorded by the builder.
///
/// The command is a plain string so that the compiler, not the builder,
/// decides what is valid. An empty command means the clause was entered but
/// never told what kind it is.
///
/// # Commands
/// ```text
/// "and"        and(<clause>, ...)
/// "or"         or(<clause>, ...)
/// "predicate"  str_eq(...) / str_neq(...)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WhereNode {
    pub command: String,

    /// Child clauses in source order
    pub clauses: Vec<WhereId>,

    /// Set once the clause turns out to be a predicate
    pub predicate: Option<PredicateNode>,
}

impl WhereNode {
    pub fn new(command: impl Into<String>) -> Self {
        WhereNode {
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn is_initialized(&self) -> bool {
        !self.command.is_empty()
    }
}

/// Leaf comparison as recorded by the builder.
///
/// # Example
/// ```text
/// str_eq(@key, name, 'alice')
/// ```
/// gives `command = "str_eq"`, `include_row_key = true`, `keys = ["name"]`,
/// `literals = ["alice"]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PredicateNode {
    pub command: String,
    pub keys: Vec<String>,
    pub literals: Vec<String>,
    pub include_row_key: bool,
}

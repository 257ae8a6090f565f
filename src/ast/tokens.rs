use std::fmt;

/// Grammar production or semantic-action marker a [`Token`] is attributed to.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RuleTag {
    /// Placeholder for unused token buffer slots
    #[default]
    Unknown,

    // Productions
    /// Whole input: `Spacing Select !.`
    Query,
    /// `select <key> [where ...] [limit ...]`
    Select,
    /// Table key following `select`
    SelectKey,
    /// `limit <n>`
    Limit,
    /// `where <clause>`
    Where,
    /// One clause: predicate, `or(...)` or `and(...)`
    WhereClause,
    /// `and(<clause>, ...)`
    AndClause,
    /// `or(<clause>, ...)`
    OrClause,
    /// `str_eq(...)` / `str_neq(...)`
    PredicateClause,
    /// Predicate name
    Predicate,
    /// One predicate argument
    PredicateValue,
    /// `@key`
    PredicateRowKey,
    /// Bare key argument
    PredicateKey,
    /// Quoted literal argument
    PredicateLiteralValue,
    /// `[1-9][0-9]*`
    PositiveInteger,
    /// Run of alphanumerics and escapes
    Key,
    /// Backslash escape inside a key
    Escape,
    /// One or more whitespace characters
    MustSpacing,
    /// Zero or more whitespace characters
    Spacing,

    /// Captured text span consumed by the next text-taking action
    Text,

    // Action markers, always zero width
    ActionAddSelect,
    ActionSetTableName,
    ActionSetLimit,
    ActionInitWhere,
    ActionPushWhere,
    ActionPopWhere,
    ActionInitPredicate,
    ActionInitAndClause,
    ActionInitOrClause,
    ActionSetPredicateCommand,
    ActionUsePredicateRowKey,
    ActionAddPredicateKey,
    ActionAddPredicateLiteral,
}

impl RuleTag {
    /// Display name of the rule, as used in diagnostics and syntax trees.
    pub fn name(self) -> &'static str {
        match self {
            RuleTag::Unknown => "Unknown",
            RuleTag::Query => "Query",
            RuleTag::Select => "Select",
            RuleTag::SelectKey => "SelectKey",
            RuleTag::Limit => "Limit",
            RuleTag::Where => "Where",
            RuleTag::WhereClause => "WhereClause",
            RuleTag::AndClause => "AndClause",
            RuleTag::OrClause => "OrClause",
            RuleTag::PredicateClause => "PredicateClause",
            RuleTag::Predicate => "Predicate",
            RuleTag::PredicateValue => "PredicateValue",
            RuleTag::PredicateRowKey => "PredicateRowKey",
            RuleTag::PredicateKey => "PredicateKey",
            RuleTag::PredicateLiteralValue => "PredicateLiteralValue",
            RuleTag::PositiveInteger => "PositiveInteger",
            RuleTag::Key => "Key",
            RuleTag::Escape => "Escape",
            RuleTag::MustSpacing => "MustSpacing",
            RuleTag::Spacing => "Spacing",
            RuleTag::Text => "Text",
            RuleTag::ActionAddSelect => "ActionAddSelect",
            RuleTag::ActionSetTableName => "ActionSetTableName",
            RuleTag::ActionSetLimit => "ActionSetLimit",
            RuleTag::ActionInitWhere => "ActionInitWhere",
            RuleTag::ActionPushWhere => "ActionPushWhere",
            RuleTag::ActionPopWhere => "ActionPopWhere",
            RuleTag::ActionInitPredicate => "ActionInitPredicate",
            RuleTag::ActionInitAndClause => "ActionInitAndClause",
            RuleTag::ActionInitOrClause => "ActionInitOrClause",
            RuleTag::ActionSetPredicateCommand => "ActionSetPredicateCommand",
            RuleTag::ActionUsePredicateRowKey => "ActionUsePredicateRowKey",
            RuleTag::ActionAddPredicateKey => "ActionAddPredicateKey",
            RuleTag::ActionAddPredicateLiteral => "ActionAddPredicateLiteral",
        }
    }

    /// True for the zero-width markers that drive the AST builder.
    pub fn is_action(self) -> bool {
        matches!(
            self,
            RuleTag::ActionAddSelect
                | RuleTag::ActionSetTableName
                | RuleTag::ActionSetLimit
                | RuleTag::ActionInitWhere
                | RuleTag::ActionPushWhere
                | RuleTag::ActionPopWhere
                | RuleTag::ActionInitPredicate
                | RuleTag::ActionInitAndClause
                | RuleTag::ActionInitOrClause
                | RuleTag::ActionSetPredicateCommand
                | RuleTag::ActionUsePredicateRowKey
                | RuleTag::ActionAddPredicateKey
                | RuleTag::ActionAddPredicateLiteral
        )
    }
}

impl fmt::Display for RuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Half-open span `[begin, end)` of the input matched by one rule.
///
/// Offsets count chars, not bytes.
///
/// # Example
/// ```text
/// select Foo
///        ^^^  Key 7..10
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Token {
    pub rule: RuleTag,
    pub begin: u32,
    pub end: u32,
}

impl Token {
    pub fn new(rule: RuleTag, begin: u32, end: u32) -> Self {
        Token { rule, begin, end }
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    pub fn len(&self) -> usize {
        (self.end - self.begin) as usize
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.rule, self.begin, self.end)
    }
}

/// Append-only token store used while matching.
///
/// Slots are pre-allocated and the allocation doubles whenever an append
/// lands past the end. Backtracking only moves the logical length back.
#[derive(Debug, Clone)]
pub struct TokenBuffer {
    slots: Vec<Token>,
    len: usize,
}

impl TokenBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        TokenBuffer {
            slots: vec![Token::default(); capacity.max(1)],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn add(&mut self, rule: RuleTag, begin: u32, end: u32) {
        if self.len >= self.slots.len() {
            let doubled = self.slots.len() * 2;
            self.slots.resize(doubled, Token::default());
        }
        self.slots[self.len] = Token::new(rule, begin, end);
        self.len += 1;
    }

    /// Drops every token appended after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        debug_assert!(len <= self.len, "truncating past the end of the token buffer");
        self.len = len;
    }

    pub fn tokens(&self) -> &[Token] {
        &self.slots[..self.len]
    }

    pub fn into_tokens(mut self) -> Vec<Token> {
        self.slots.truncate(self.len);
        self.slots
    }
}

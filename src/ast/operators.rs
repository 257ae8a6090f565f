use std::fmt;

/// Top-level query operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryOpCode {
    /// `select <table> ...`
    Select,
    /// Row join; not reachable from the text grammar
    Join,
}

/// Kind of a compiled where clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WhereOpCode {
    /// All child clauses must hold (`and(...)`)
    And,
    /// Any child clause must hold (`or(...)`)
    Or,
    /// Leaf comparison
    Predicate,
}

/// Leaf comparison operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateOpCode {
    /// String equality (`str_eq`)
    StrEq,
    /// String inequality (`str_neq`)
    StrNeq,
}

impl QueryOpCode {
    pub fn from_command(command: &str) -> Option<Self> {
        match command {
            "select" => Some(Self::Select),
            "join" => Some(Self::Join),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Join => "join",
        }
    }
}

impl WhereOpCode {
    pub fn from_command(command: &str) -> Option<Self> {
        match command {
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "predicate" => Some(Self::Predicate),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Predicate => "predicate",
        }
    }
}

impl PredicateOpCode {
    pub fn from_command(command: &str) -> Option<Self> {
        match command {
            "str_eq" => Some(Self::StrEq),
            "str_neq" => Some(Self::StrNeq),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StrEq => "str_eq",
            Self::StrNeq => "str_neq",
        }
    }
}

impl fmt::Display for QueryOpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WhereOpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PredicateOpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

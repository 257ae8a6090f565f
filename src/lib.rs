pub mod ast;
pub mod cli;
pub mod compiler;
pub mod error;
pub mod matcher;
pub mod output;
pub mod parser;
pub mod position;
pub mod query;
pub mod replay;

pub use ast::{PredicateOpCode, QueryAst, QueryOpCode, RuleTag, Token, WhereOpCode};
pub use compiler::{compile, CompileError};
pub use error::QueryError;
pub use output::{describe_query, print_syntax_tree};
pub use parser::{ParseError, Parser, ParserSettings, SyntaxError};
pub use position::Position;
pub use query::{Query, QueryJoin, QueryPredicate, QuerySelect, QueryVisitor, QueryWhere, Row};
pub use replay::QueryBuilder;

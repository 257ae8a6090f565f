//! Human-readable renderings of match results and compiled queries.
//!
//! - **Syntax trees** via [`syntax_tree()`] and [`print_syntax_tree()`] -
//!   nesting of the rules that matched, rebuilt from the flat token buffer
//! - **Query outlines** via [`describe_query()`] - indented summary of a
//!   compiled [`Query`]
//!
//! # Examples
//!
//! ```
//! use tablequery::Parser;
//! use tablequery::output::print_syntax_tree;
//!
//! let source = "select Foo";
//! let tokens = Parser::new().tokenize(source).unwrap();
//! let tree = print_syntax_tree(&tokens, source, false);
//!
//! assert!(tree.starts_with("Query \"select Foo\"\n"));
//! assert!(tree.contains("  SelectKey \"Foo\"\n"));
//! ```

use crate::{
    ast::{QueryOpCode, RuleTag, Token},
    query::{Query, QueryPredicate, QuerySelect, QueryVisitor, QueryWhere, Row},
};

/// One matched rule together with the rules matched inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub token: Token,
    pub children: Vec<SyntaxNode>,
}

/// Rebuilds rule nesting from a token buffer.
///
/// Tokens are appended when their rule completes, so a parent always follows
/// its children. Each token adopts the pending nodes its span contains.
/// Zero-width tokens are dropped.
pub fn syntax_tree(tokens: &[Token]) -> Vec<SyntaxNode> {
    let mut stack: Vec<SyntaxNode> = Vec::new();

    for &token in tokens.iter().filter(|t| !t.is_empty()) {
        let mut children = Vec::new();
        while let Some(top) = stack.last() {
            if top.token.begin < token.begin || top.token.end > token.end {
                break;
            }
            children.extend(stack.pop());
        }
        children.reverse();
        stack.push(SyntaxNode { token, children });
    }

    stack
}

/// Renders [`syntax_tree()`] with one node per line.
///
/// Each line holds the rule name and its quoted text, indented one space per
/// level. `pretty` colours the rule names.
pub fn print_syntax_tree(tokens: &[Token], source: &str, pretty: bool) -> String {
    let input: Vec<char> = source.chars().collect();
    let mut out = String::new();
    for node in syntax_tree(tokens) {
        print_node(&node, &input, 0, pretty, &mut out);
    }
    out
}

fn print_node(node: &SyntaxNode, input: &[char], depth: usize, pretty: bool, out: &mut String) {
    let text: String = input[node.token.begin as usize..node.token.end as usize]
        .iter()
        .collect();

    out.push_str(&" ".repeat(depth));
    if pretty {
        out.push_str(&format!("\x1B[34m{}\x1B[m {:?}\n", node.token.rule, text));
    } else {
        out.push_str(&format!("{} {:?}\n", node.token.rule, text));
    }

    for child in &node.children {
        print_node(child, input, depth + 1, pretty, out);
    }
}

/// Indented outline of a compiled query.
///
/// # Examples
///
/// ```
/// use tablequery::Parser;
/// use tablequery::output::describe_query;
///
/// let query = Parser::new()
///     .parse_query("select Foo where str_eq(@key, 'abc') limit 5")
///     .unwrap();
///
/// assert_eq!(
///     describe_query(&query),
///     "select Foo\n  limit 5\n  where\n    str_eq row-key literals ['abc']\n"
/// );
/// ```
pub fn describe_query(query: &Query) -> String {
    let mut describer = QueryDescriber::default();
    query.visit(&mut describer);
    describer.out
}

#[derive(Default)]
struct QueryDescriber {
    out: String,
    depth: usize,
}

impl QueryDescriber {
    fn line(&mut self, text: &str) {
        self.out.push_str(&"  ".repeat(self.depth));
        self.out.push_str(text);
        self.out.push('\n');
    }
}

impl QueryVisitor for QueryDescriber {
    fn visit_op_code(&mut self, op_code: QueryOpCode) {
        self.out.push_str(op_code.as_str());
    }

    fn visit_table_key(&mut self, table_key: &str) {
        self.out.push(' ');
        self.out.push_str(table_key);
        self.out.push('\n');
        self.depth = 1;
    }

    fn visit_select(&mut self, select: &QuerySelect) {
        if let Some(limit) = select.row_limit() {
            self.line(&format!("limit {limit}"));
        }
        if select.where_clause.is_some() {
            self.line("where");
        }
    }

    fn visit_where(&mut self, _position: usize, clause: &QueryWhere) {
        self.depth += 1;
        if clause.predicate.is_none() {
            self.line(clause.op_code.as_str());
        }
    }

    fn leave_where(&mut self, _clause: &QueryWhere) {
        self.depth -= 1;
    }

    fn visit_predicate(&mut self, predicate: &QueryPredicate) {
        let mut parts = vec![predicate.op_code.as_str().to_string()];
        if predicate.include_row_key {
            parts.push("row-key".to_string());
        }
        if !predicate.keys.is_empty() {
            parts.push(format!("keys [{}]", predicate.keys.join(", ")));
        }
        if !predicate.literals.is_empty() {
            let quoted: Vec<String> = predicate.literals.iter().map(|l| format!("'{l}'")).collect();
            parts.push(format!("literals [{}]", quoted.join(", ")));
        }
        self.line(&parts.join(" "));
    }

    fn visit_row_join(&mut self, _position: usize, row: &Row) {
        self.line(&format!("row {} ({} entries)", row.key, row.entries.len()));
    }
}

// tests/compiler_tests.rs

use std::collections::BTreeMap;
use std::error::Error;

use tablequery::ast::QueryAst;
use tablequery::{
    compile, CompileError, Parser, PredicateOpCode, Query, QueryBuilder, QueryOpCode,
    QueryPredicate, QueryWhere, Row, WhereOpCode,
};

fn compile_source(source: &str) -> Query {
    Parser::new().parse_query(source).unwrap()
}

fn where_clause(query: &Query) -> &QueryWhere {
    query
        .select
        .as_ref()
        .and_then(|s| s.where_clause.as_ref())
        .expect("select with where clause")
}

fn predicate(op_code: PredicateOpCode, keys: &[&str], literals: &[&str], row_key: bool) -> QueryWhere {
    QueryWhere::predicate(QueryPredicate {
        op_code,
        keys: keys.iter().map(|s| s.to_string()).collect(),
        literals: literals.iter().map(|s| s.to_string()).collect(),
        include_row_key: row_key,
    })
}

// ============================================================================
// Select
// ============================================================================

#[test]
fn test_select_with_where_and_limit() {
    let query = compile_source("select Foo where str_eq(@key, 'abc') limit 5");

    assert_eq!(query.op_code, QueryOpCode::Select);
    assert_eq!(query.table_key, "Foo");
    assert!(query.join.is_none());

    let select = query.select.as_ref().unwrap();
    assert_eq!(select.limit, 5);
    assert_eq!(select.row_limit(), Some(5));
    assert_eq!(
        select.where_clause,
        Some(predicate(PredicateOpCode::StrEq, &[], &["abc"], true))
    );
}

#[test]
fn test_select_without_limit_is_unlimited() {
    let query = compile_source("select Foo");

    let select = query.select.as_ref().unwrap();
    assert_eq!(select.limit, 0);
    assert_eq!(select.row_limit(), None);
    assert!(select.where_clause.is_none());
}

#[test]
fn test_str_neq_with_keys() {
    let query = compile_source("select Foo where str_neq(owner, group)");

    assert_eq!(
        where_clause(&query),
        &predicate(PredicateOpCode::StrNeq, &["owner", "group"], &[], false)
    );
}

// ============================================================================
// Where nesting
// ============================================================================

#[test]
fn test_and_clause() {
    let query = compile_source("select Foo where and(str_eq(a, 'x'), str_neq(b, 'y'))");

    assert_eq!(
        where_clause(&query),
        &QueryWhere::and(vec![
            predicate(PredicateOpCode::StrEq, &["a"], &["x"], false),
            predicate(PredicateOpCode::StrNeq, &["b"], &["y"], false),
        ])
    );
}

#[test]
fn test_nested_or_and() {
    let query =
        compile_source("select t where or(str_eq(@key, 'a'), and(str_eq(x, 'b'), str_neq(y, 'c')))");

    let clause = where_clause(&query);
    assert_eq!(clause.op_code, WhereOpCode::Or);
    assert!(clause.predicate.is_none());
    assert_eq!(clause.clauses.len(), 2);
    assert_eq!(clause.clauses[0].op_code, WhereOpCode::Predicate);
    assert_eq!(clause.clauses[1].op_code, WhereOpCode::And);
    assert_eq!(
        clause.clauses[1].clauses,
        vec![
            predicate(PredicateOpCode::StrEq, &["x"], &["b"], false),
            predicate(PredicateOpCode::StrNeq, &["y"], &["c"], false),
        ]
    );
}

#[test]
fn test_single_child_groups_are_kept() {
    // only the synthetic root is unwrapped
    let query = compile_source("select t where and(or(str_eq(a, b)))");

    let clause = where_clause(&query);
    assert_eq!(clause.op_code, WhereOpCode::And);
    assert_eq!(clause.clauses.len(), 1);
    assert_eq!(clause.clauses[0].op_code, WhereOpCode::Or);
    assert_eq!(clause.clauses[0].clauses[0].op_code, WhereOpCode::Predicate);
}

#[test]
fn test_compile_is_repeatable() {
    let ast = Parser::new()
        .parse("select Foo where and(str_eq(a, 'x'), or(str_neq(b, c))) limit 9")
        .unwrap();

    let first = ast.compile().unwrap();
    let second = compile(&ast).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.ast(), &ast);
}

// ============================================================================
// Join
// ============================================================================

#[test]
fn test_join_passes_rows_through() {
    let mut entries = BTreeMap::new();
    entries.insert("name".to_string(), vec!["p1".to_string(), "p2".to_string()]);
    let row = Row {
        key: "r1".to_string(),
        entries,
    };

    let mut ast = QueryAst::new();
    ast.command = "join".to_string();
    ast.table_key = "Foo".to_string();
    ast.join.rows.push(row.clone());

    let query = compile(&ast).unwrap();
    assert_eq!(query.op_code, QueryOpCode::Join);
    assert!(query.select.is_none());
    assert_eq!(query.join.unwrap().rows, vec![row]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unknown_command() {
    let mut ast = QueryAst::new();
    ast.command = "delete".to_string();

    let err = compile(&ast).unwrap_err();
    assert_eq!(err, CompileError::UnknownCommand("delete".to_string()));
    assert_eq!(err.to_string(), "no command matching 'delete'");
}

#[test]
fn test_empty_ast_has_no_command() {
    assert!(matches!(
        compile(&QueryAst::new()),
        Err(CompileError::UnknownCommand(ref c)) if c.is_empty()
    ));
}

#[test]
fn test_limit_overflow() {
    let mut ast = QueryAst::new();
    ast.add_select();
    ast.set_table_name("Foo");
    ast.set_limit("99999999999999999999");

    let err = compile(&ast).unwrap_err();
    let CompileError::Select(inner) = &err else {
        panic!("expected select error, got {:?}", err);
    };
    assert!(matches!(**inner, CompileError::Limit { ref text, .. } if text == "99999999999999999999"));
    assert!(err.to_string().starts_with(
        "select compile failed: convert limit '99999999999999999999' failed:"
    ));
}

#[test]
fn test_uninitialized_clause_is_unsupported() {
    let mut ast = QueryAst::new();
    ast.add_select();
    ast.init_where();
    ast.push_where();
    ast.pop_where();

    let err = compile(&ast).unwrap_err();
    assert_eq!(
        err.to_string(),
        "select compile failed: where clause compile failed: unsupported where op-code ''"
    );
}

#[test]
fn test_unsupported_predicate_chain() {
    let mut ast = QueryAst::new();
    ast.add_select();
    ast.set_table_name("Foo");
    ast.init_where();
    ast.push_where();
    ast.init_and_clause();
    ast.push_where();
    ast.init_predicate();
    ast.pop_where();
    ast.push_where();
    ast.init_predicate();
    ast.set_predicate_command("str_like");
    ast.pop_where();
    ast.pop_where();

    let err = compile(&ast).unwrap_err();
    assert_eq!(
        err.to_string(),
        "select compile failed: where clause compile failed: and clause compile failed: \
         failed compiling child clause 0: predicate compile failed: unsupported predicate ''"
    );
}

#[test]
fn test_error_sources_are_chained() {
    let mut ast = QueryAst::new();
    ast.add_select();
    ast.init_where();
    ast.push_where();
    ast.init_or_clause();
    ast.push_where();
    ast.pop_where();
    ast.pop_where();

    let err = compile(&ast).unwrap_err();

    let mut depth = 0;
    let mut current: Option<&dyn Error> = Some(&err);
    while let Some(e) = current {
        depth += 1;
        current = e.source();
    }
    // select -> where -> or -> child clause -> unsupported
    assert_eq!(depth, 5);
}

#[test]
fn test_root_with_several_clauses_compiles_as_and() {
    let mut ast = QueryAst::new();
    ast.add_select();
    ast.init_where();
    for key in ["a", "b"] {
        ast.push_where();
        ast.init_predicate();
        ast.set_predicate_command("str_eq");
        ast.add_predicate_key(key);
        ast.pop_where();
    }

    let query = compile(&ast).unwrap();
    assert_eq!(
        where_clause(&query),
        &QueryWhere::and(vec![
            predicate(PredicateOpCode::StrEq, &["a"], &[], false),
            predicate(PredicateOpCode::StrEq, &["b"], &[], false),
        ])
    );
}

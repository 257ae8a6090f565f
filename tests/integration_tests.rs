use tablequery::cli::{self, CheckOptions, CheckResult, CliError, DocCategory};
use tablequery::output::syntax_tree;
use tablequery::{
    describe_query, print_syntax_tree, ParseError, Parser, ParserSettings, QueryError,
    QueryOpCode, QueryPredicate, QuerySelect, QueryVisitor, QueryWhere, RuleTag, WhereOpCode,
};

fn check(query: &str) -> Result<CheckResult, CliError> {
    cli::execute_check(&CheckOptions {
        query: query.to_string(),
        ..Default::default()
    })
}

// ============================================================================
// Parse and compile
// ============================================================================

#[test]
fn test_parse_query_end_to_end() {
    let query = Parser::new()
        .parse_query("select Foo where str_eq(@key, 'abc') limit 5")
        .unwrap();

    assert_eq!(query.op_code, QueryOpCode::Select);
    assert_eq!(query.table_key, "Foo");
    let select = query.select.unwrap();
    assert_eq!(select.limit, 5);
    let clause = select.where_clause.unwrap();
    assert_eq!(clause.op_code, WhereOpCode::Predicate);
    let predicate = clause.predicate.unwrap();
    assert!(predicate.include_row_key);
    assert_eq!(predicate.literals, vec!["abc"]);
}

#[test]
fn test_query_error_kinds() {
    let parse = Parser::new().parse_query("select").unwrap_err();
    assert!(parse.is_parse_error());
    assert!(matches!(parse, QueryError::Parse(ParseError::Syntax(_))));

    let compile = Parser::new()
        .parse_query("select Foo limit 99999999999999999999")
        .unwrap_err();
    assert!(!compile.is_parse_error());
    assert!(compile.to_string().starts_with("select compile failed"));
}

#[test]
fn test_parser_shared_between_threads() {
    let parser = Parser::with_settings(ParserSettings::default().with_max_nesting_depth(8));

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let parser = &parser;
                s.spawn(move || {
                    let source = format!("select t{} where or(str_eq(@key, '{}')) limit {}", i, i, i + 1);
                    parser.parse_query(&source).unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let query = handle.join().unwrap();
            assert_eq!(query.table_key, format!("t{}", i));
            assert_eq!(query.select.unwrap().limit, i as u64 + 1);
        }
    });
}

// ============================================================================
// Renderings
// ============================================================================

#[test]
fn test_print_syntax_tree() {
    let source = "select Foo";
    let tokens = Parser::new().tokenize(source).unwrap();

    assert_eq!(
        print_syntax_tree(&tokens, source, false),
        "Query \"select Foo\"\n\
         \x20Select \"select Foo\"\n\
         \x20 MustSpacing \" \"\n\
         \x20 SelectKey \"Foo\"\n\
         \x20  Text \"Foo\"\n\
         \x20   Key \"Foo\"\n"
    );
}

#[test]
fn test_syntax_tree_has_single_root() {
    let source = "select Foo where and(str_eq(@key, 'a'), str_neq(b, 'c')) limit 3";
    let tokens = Parser::new().tokenize(source).unwrap();

    let roots = syntax_tree(&tokens);
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].token.rule, RuleTag::Query);
    assert_eq!(roots[0].children.len(), 1);
    assert_eq!(roots[0].children[0].token.rule, RuleTag::Select);
}

#[test]
fn test_pretty_syntax_tree_colours_rules() {
    let source = "select Foo";
    let tokens = Parser::new().tokenize(source).unwrap();

    let tree = print_syntax_tree(&tokens, source, true);
    assert!(tree.starts_with("\x1B[34mQuery\x1B[m \"select Foo\"\n"));
}

#[test]
fn test_describe_nested_query() {
    let query = Parser::new()
        .parse_query("select Foo where or(str_eq(@key, 'a'), and(str_neq(x, y), str_eq(z, '')))")
        .unwrap();

    assert_eq!(
        describe_query(&query),
        "select Foo\n\
         \x20 where\n\
         \x20   or\n\
         \x20     str_eq row-key literals ['a']\n\
         \x20     and\n\
         \x20       str_neq keys [x, y]\n\
         \x20       str_eq keys [z] literals ['']\n"
    );
}

// ============================================================================
// Visitor
// ============================================================================

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl QueryVisitor for Recorder {
    fn visit_ast(&mut self, ast: &tablequery::QueryAst) {
        self.events.push(format!("ast {}", ast.command));
    }
    fn visit_op_code(&mut self, op_code: QueryOpCode) {
        self.events.push(format!("op {}", op_code));
    }
    fn visit_table_key(&mut self, table_key: &str) {
        self.events.push(format!("table {}", table_key));
    }
    fn visit_select(&mut self, select: &QuerySelect) {
        self.events.push(format!("select {}", select.limit));
    }
    fn visit_where(&mut self, position: usize, clause: &QueryWhere) {
        self.events.push(format!("where {} {}", position, clause.op_code));
    }
    fn leave_where(&mut self, clause: &QueryWhere) {
        self.events.push(format!("leave {}", clause.op_code));
    }
    fn visit_predicate(&mut self, predicate: &QueryPredicate) {
        self.events.push(format!("predicate {}", predicate.op_code));
    }
}

#[test]
fn test_visitor_order() {
    let query = Parser::new()
        .parse_query("select Foo where and(str_eq(a, 'x'), str_neq(b, 'y')) limit 2")
        .unwrap();

    let mut recorder = Recorder::default();
    query.visit(&mut recorder);

    assert_eq!(
        recorder.events,
        vec![
            "ast select",
            "op select",
            "table Foo",
            "select 2",
            "where 0 and",
            "where 0 predicate",
            "predicate str_eq",
            "leave predicate",
            "where 1 predicate",
            "predicate str_neq",
            "leave predicate",
            "leave and",
        ]
    );
}

// ============================================================================
// CLI
// ============================================================================

#[test]
fn test_check_compiles_to_json() {
    let result = check("select Foo where str_eq(@key, 'abc') limit 5").unwrap();

    let CheckResult::Compiled(json) = result else {
        panic!("expected compiled output");
    };
    assert_eq!(json["op_code"], "select");
    assert_eq!(json["table_key"], "Foo");
    assert_eq!(json["select"]["limit"], 5);
    assert_eq!(json["select"]["where"]["op_code"], "predicate");
    assert_eq!(json["select"]["where"]["predicate"]["op_code"], "str_eq");
    assert_eq!(json["select"]["where"]["predicate"]["include_row_key"], true);
    assert_eq!(json["select"]["where"]["predicate"]["literals"][0], "abc");
}

#[test]
fn test_check_group_json() {
    let CheckResult::Compiled(json) = check("select Foo where or(str_eq(a, b), str_neq(c, 'd'))").unwrap()
    else {
        panic!("expected compiled output");
    };

    let clauses = json["select"]["where"]["clauses"].as_array().unwrap();
    assert_eq!(json["select"]["where"]["op_code"], "or");
    assert_eq!(clauses.len(), 2);
    assert_eq!(clauses[1]["predicate"]["op_code"], "str_neq");
}

#[test]
fn test_check_syntax_only() {
    let result = cli::execute_check(&CheckOptions {
        query: "select Foo limit 99999999999999999999".to_string(),
        syntax_only: true,
        ..Default::default()
    })
    .unwrap();

    assert!(matches!(result, CheckResult::SyntaxValid));
}

#[test]
fn test_check_tree_and_explain() {
    let tree = cli::execute_check(&CheckOptions {
        query: "select Foo\n".to_string(),
        tree: true,
        ..Default::default()
    })
    .unwrap();
    assert!(matches!(tree, CheckResult::Tree(ref t) if t.starts_with("Query \"select Foo\"")));

    let explained = cli::execute_check(&CheckOptions {
        query: "select Foo limit 3".to_string(),
        explain: true,
        ..Default::default()
    })
    .unwrap();
    assert!(matches!(explained, CheckResult::Explained(ref t) if t == "select Foo\n  limit 3\n"));
}

#[test]
fn test_check_errors() {
    assert!(matches!(check("   "), Err(CliError::NoInput)));
    assert!(matches!(check("select"), Err(CliError::Parse(_))));
    assert!(matches!(
        check("select Foo limit 99999999999999999999"),
        Err(CliError::Compile(_))
    ));

    let too_deep = cli::execute_check(&CheckOptions {
        query: "select Foo where and(and(str_eq(a, b)))".to_string(),
        max_depth: Some(2),
        ..Default::default()
    });
    assert!(matches!(
        too_deep,
        Err(CliError::Parse(ParseError::NestingTooDeep { limit: 2, .. }))
    ));
}

#[test]
fn test_docs_categories() {
    assert_eq!(DocCategory::from_str("Where-Clauses"), Some(DocCategory::Where));
    assert_eq!(DocCategory::from_str("str_eq"), Some(DocCategory::Predicates));

    for name in ["syntax", "where", "predicates", "limit", "errors"] {
        assert!(cli::get_doc_category(name).is_ok(), "{}", name);
    }
    assert!(matches!(
        cli::get_doc_category("joins"),
        Err(CliError::UnknownCategory(ref c)) if c == "joins"
    ));
    assert!(cli::get_docs_overview().contains("tq doc <category>"));
    assert!(cli::get_onboarding_content().contains("tq check"));
}

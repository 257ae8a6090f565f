//! Query -> JSON conversion utilities

use serde_json::{json, Map, Value};

use crate::{Query, QueryPredicate, QuerySelect, QueryWhere, Row};

/// Convert a compiled query to serde_json::Value
pub fn query_to_json(query: &Query) -> Value {
    let mut obj = Map::new();
    obj.insert("op_code".to_string(), json!(query.op_code.as_str()));
    obj.insert("table_key".to_string(), json!(query.table_key));

    if let Some(select) = &query.select {
        obj.insert("select".to_string(), select_to_json(select));
    }
    if let Some(join) = &query.join {
        let rows: Vec<Value> = join.rows.iter().map(row_to_json).collect();
        obj.insert("join".to_string(), json!({ "rows": rows }));
    }

    Value::Object(obj)
}

fn select_to_json(select: &QuerySelect) -> Value {
    let mut obj = Map::new();
    obj.insert("limit".to_string(), json!(select.limit));
    if let Some(clause) = &select.where_clause {
        obj.insert("where".to_string(), where_to_json(clause));
    }
    Value::Object(obj)
}

fn where_to_json(clause: &QueryWhere) -> Value {
    match &clause.predicate {
        Some(predicate) => json!({
            "op_code": clause.op_code.as_str(),
            "predicate": predicate_to_json(predicate),
        }),
        None => json!({
            "op_code": clause.op_code.as_str(),
            "clauses": clause.clauses.iter().map(where_to_json).collect::<Vec<_>>(),
        }),
    }
}

fn predicate_to_json(predicate: &QueryPredicate) -> Value {
    json!({
        "op_code": predicate.op_code.as_str(),
        "keys": predicate.keys,
        "literals": predicate.literals,
        "include_row_key": predicate.include_row_key,
    })
}

fn row_to_json(row: &Row) -> Value {
    json!({
        "key": row.key,
        "entries": row.entries,
    })
}

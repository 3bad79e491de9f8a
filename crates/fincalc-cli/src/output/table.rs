use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::ROW_KEYS;

/// Periods shown per schedule table before eliding to the final row.
const MAX_VISIBLE_ROWS: usize = 12;

/// Format output as tables: one key/value table for the scalar result
/// fields, then one row table per schedule/breakdown, elided in the
/// middle when long.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result, map);
            } else {
                print_scalar_table(value);
            }
        }
        Value::Array(arr) => print_row_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value, envelope: &serde_json::Map<String, Value>) {
    if let Value::Object(res_map) = result {
        // Scalar fields first (nested objects summarize as their own table
        // would be noise here).
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in res_map {
            if !matches!(val, Value::Array(_) | Value::Object(_)) {
                builder.push_record([key.as_str(), &format_value(val)]);
            }
        }
        println!("{}", Table::from(builder));

        for key in ROW_KEYS {
            if let Some(Value::Array(rows)) = find_rows(res_map, key) {
                if !rows.is_empty() {
                    println!("\n{}:", key);
                    print_elided_rows(rows);
                }
            }
        }
    } else {
        print_scalar_table(result);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Row arrays live either directly under the result or one level down
/// (the mortgage result nests its schedule under principal_and_interest).
fn find_rows<'a>(res_map: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(rows) = res_map.get(key) {
        return Some(rows);
    }
    res_map.values().find_map(|v| match v {
        Value::Object(inner) => inner.get(key),
        _ => None,
    })
}

fn print_elided_rows(rows: &[Value]) {
    if rows.len() <= MAX_VISIBLE_ROWS {
        print_row_table(rows);
        return;
    }

    let head = &rows[..MAX_VISIBLE_ROWS - 1];
    print_row_table(head);
    println!(
        "  ... {} rows elided ...",
        rows.len() - MAX_VISIBLE_ROWS
    );
    print_row_table(&rows[rows.len() - 1..]);
}

fn print_scalar_table(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_row_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

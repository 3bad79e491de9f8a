use serde_json::Value;
use std::io;

use super::ROW_KEYS;

/// Write output as CSV to stdout. When the result carries a schedule or
/// breakdown, those rows are the CSV body; otherwise a two-column
/// field/value dump.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            if let Some(rows) = find_rows(map) {
                write_rows_csv(&mut wtr, rows);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        }
        Value::Array(arr) => write_rows_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(result)]);
        }
    }

    let _ = wtr.flush();
}

fn find_rows(map: &serde_json::Map<String, Value>) -> Option<&Vec<Value>> {
    for key in ROW_KEYS {
        if let Some(Value::Array(rows)) = map.get(key) {
            if !rows.is_empty() {
                return Some(rows);
            }
        }
        // Nested one level down, e.g. the mortgage P&I schedule.
        for val in map.values() {
            if let Value::Object(inner) = val {
                if let Some(Value::Array(rows)) = inner.get(key) {
                    if !rows.is_empty() {
                        return Some(rows);
                    }
                }
            }
        }
    }
    None
}

fn write_rows_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

use serde_json::{Map, Value};
use std::io;

/// Write output as CSV to stdout.
///
/// Scalar fields of the result (nested objects flattened to dotted keys)
/// become `field,value` rows. A result with no scalars, such as the pair
/// ranking, is written as the table of its first array of objects.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = match value {
        Value::Object(map) => map.get("result").unwrap_or(value),
        other => other,
    };

    match body {
        Value::Object(map) => {
            let mut rows = Vec::new();
            flatten_scalars("", map, &mut rows);
            if !rows.is_empty() {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in rows {
                    let _ = wtr.write_record([key, val]);
                }
            } else if let Some(arr) = map.values().find_map(|v| match v {
                Value::Array(arr) if matches!(arr.first(), Some(Value::Object(_))) => Some(arr),
                _ => None,
            }) {
                write_array_csv(&mut wtr, arr);
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        other => {
            let _ = wtr.write_record([&format_csv_value(other)]);
        }
    }

    let _ = wtr.flush();
}

/// Collect `(dotted.key, value)` for every non-array leaf.
fn flatten_scalars(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, String)>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match val {
            Value::Object(inner) => flatten_scalars(&name, inner, out),
            Value::Array(_) => {}
            scalar => out.push((name, format_csv_value(scalar))),
        }
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

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
        Value::Array(arr) => arr.iter().map(format_csv_value).collect::<Vec<_>>().join(";"),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_metrics() {
        let v = json!({
            "metrics": { "sharpe_ratio": 1.5, "max_drawdown": null },
            "bars": [{ "equity": 1.0 }],
            "open_position": null
        });
        let mut rows = Vec::new();
        flatten_scalars("", v.as_object().unwrap(), &mut rows);
        assert_eq!(
            rows,
            vec![
                ("metrics.max_drawdown".to_string(), String::new()),
                ("metrics.sharpe_ratio".to_string(), "1.5".to_string()),
                ("open_position".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_array_table() {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_array_csv(
            &mut wtr,
            &[json!({"id": "A-B", "tags": ["Fast Reversion"]}), json!({"id": "C-D", "tags": []})],
        );
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert_eq!(text, "id,tags\nA-B,Fast Reversion\nC-D,\n");
    }
}

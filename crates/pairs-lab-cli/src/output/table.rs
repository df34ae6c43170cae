use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Rows shown for long per-bar arrays; the full series is in JSON/CSV output.
const MAX_SERIES_ROWS: usize = 20;

/// Format output as tables using the tabled crate.
///
/// Scalars of the result go into one Field/Value table; nested objects
/// (e.g. `metrics`) and arrays of objects (`trades`, `pairs`, `bars`) each
/// get a table of their own.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object(res_map),
        other => println!("{}", format_value(other)),
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

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut scalars = 0;
    for (key, val) in map {
        if !is_tabular(val) {
            builder.push_record([key.as_str(), &format_value(val)]);
            scalars += 1;
        }
    }
    if scalars > 0 {
        println!("{}", Table::from(builder));
    }

    for (key, val) in map {
        match val {
            Value::Object(inner) => {
                println!("\n{}:", key);
                print_object(inner);
            }
            Value::Array(arr) if is_tabular(val) => {
                let skip = arr.len().saturating_sub(MAX_SERIES_ROWS);
                if skip > 0 {
                    println!("\n{} (last {} of {}):", key, MAX_SERIES_ROWS, arr.len());
                } else {
                    println!("\n{}:", key);
                }
                print_array_table(&arr[skip..]);
            }
            _ => {}
        }
    }
}

/// Objects and non-empty arrays of objects are rendered as their own table.
fn is_tabular(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(arr) => matches!(arr.first(), Some(Value::Object(_))),
        _ => false,
    }
}

fn print_array_table(arr: &[Value]) {
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
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{:.6}", f)
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string(),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => "n/a".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_value_trims_floats() {
        assert_eq!(format_value(&json!(0.25)), "0.25");
        assert_eq!(format_value(&json!(1.0)), "1");
        assert_eq!(format_value(&json!(-0.1234567)), "-0.123457");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&Value::Null), "n/a");
    }

    #[test]
    fn test_tabular_detection() {
        assert!(is_tabular(&json!({"a": 1})));
        assert!(is_tabular(&json!([{"a": 1}])));
        assert!(!is_tabular(&json!(["AAPL", "MSFT"])));
        assert!(!is_tabular(&json!([])));
        assert!(!is_tabular(&json!(0.5)));
    }
}

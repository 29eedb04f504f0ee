//! Output formatting: plain text (human-readable) and JSON.

use redash_lib::QueryResult;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

const CELL_WIDTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable tables and key-value
    #[default]
    Plain,
    /// JSON (pretty-printed)
    Json,
}

/// Serialize `value` and print it in `format`.
pub fn print<T: Serialize>(value: &T, format: OutputFormat) -> Result<(), String> {
    let v = serde_json::to_value(value).map_err(|e| e.to_string())?;
    match format {
        OutputFormat::Plain => print!("{}", format_plain(&v)),
        OutputFormat::Json => println!("{}", format_json(&v).map_err(|e| e.to_string())?),
    }
    Ok(())
}

/// Print a result set: a column table in plain mode, the full object in JSON mode.
pub fn print_result(result: &QueryResult, format: OutputFormat) -> Result<(), String> {
    match format {
        OutputFormat::Plain => {
            print!("{}", format_result_table(result));
            Ok(())
        }
        OutputFormat::Json => print(result, format),
    }
}

/// Render rows under their columns, in column order.
pub fn format_result_table(result: &QueryResult) -> String {
    let mut out = String::new();
    let columns = &result.data.columns;
    if columns.is_empty() {
        let _ = writeln!(out, "<empty>");
        return out;
    }
    let header: String = columns
        .iter()
        .map(|c| {
            let label = c.friendly_name.as_deref().unwrap_or(&c.name);
            format!("{:<w$}", truncate(label, CELL_WIDTH), w = CELL_WIDTH)
        })
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(out, "{}", header.trim_end());
    let _ = writeln!(out, "{}", "-".repeat(header.trim_end().chars().count()));
    for row in &result.data.rows {
        let line: String = columns
            .iter()
            .map(|c| {
                let cell = row
                    .get(&c.name)
                    .and_then(as_short_str)
                    .unwrap_or_else(|| "-".to_string());
                format!("{:<w$}", truncate(&cell, CELL_WIDTH), w = CELL_WIDTH)
            })
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "{}", line.trim_end());
    }
    let _ = writeln!(out, "({} rows, {:.3}s)", result.data.rows.len(), result.runtime);
    out
}

/// Format value as plain text (tables for arrays of objects, key-value for objects).
pub fn format_plain(value: &Value) -> String {
    let mut out = String::new();
    format_plain_impl(value, &mut out, 0);
    out
}

fn format_plain_impl(v: &Value, out: &mut String, indent: usize) {
    let pad = "  ".repeat(indent);
    match v {
        Value::Array(arr) if arr.is_empty() => {
            let _ = writeln!(out, "{}<empty>", pad);
        }
        Value::Array(arr) if arr.iter().all(Value::is_object) && arr.len() > 1 => {
            // a few scalar columns read better than every field of a query
            let keys = summary_keys(arr);
            let header: String = keys
                .iter()
                .map(|k| format!("{:>w$}", k, w = CELL_WIDTH))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(out, "{}{}", pad, header);
            let _ = writeln!(out, "{}{}", pad, "-".repeat(header.len().min(100)));
            for obj in arr {
                let row: String = keys
                    .iter()
                    .map(|k| {
                        let val = obj
                            .get(k)
                            .and_then(as_short_str)
                            .unwrap_or_else(|| "-".to_string());
                        format!("{:>w$}", truncate(&val, CELL_WIDTH), w = CELL_WIDTH)
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = writeln!(out, "{}{}", pad, row);
            }
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                if item.is_object() || item.is_array() {
                    let _ = writeln!(out, "{}[{}]", pad, i + 1);
                    format_plain_impl(item, out, indent + 1);
                } else {
                    let _ = writeln!(out, "{}{}", pad, item);
                }
            }
        }
        Value::Object(map) => {
            for (k, val) in map {
                if val.is_object() || val.is_array() {
                    let _ = writeln!(out, "{}{}:", pad, k);
                    format_plain_impl(val, out, indent + 1);
                } else {
                    let s = as_short_str(val).unwrap_or_else(|| "null".to_string());
                    let _ = writeln!(out, "{}{}: {}", pad, k, s);
                }
            }
        }
        scalar => {
            let s = as_short_str(scalar).unwrap_or_default();
            let _ = writeln!(out, "{}{}", pad, s);
        }
    }
}

/// Column set for a table of objects: the preferred keys when present,
/// otherwise the first object's scalar keys.
fn summary_keys(arr: &[Value]) -> Vec<String> {
    const PREFERRED: [&str; 5] = ["id", "name", "data_source_id", "is_draft", "updated_at"];
    let Some(first) = arr.first().and_then(Value::as_object) else {
        return Vec::new();
    };
    let preferred: Vec<String> = PREFERRED
        .iter()
        .filter(|k| first.contains_key(**k))
        .map(|k| k.to_string())
        .collect();
    if preferred.len() >= 2 {
        return preferred;
    }
    first
        .iter()
        .filter(|(_, v)| !v.is_object() && !v.is_array())
        .map(|(k, _)| k.clone())
        .collect()
}

fn as_short_str(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        _ => None,
    }
}

fn truncate(s: &str, max: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max {
        s
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Format value as JSON (pretty).
pub fn format_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_plain_scalars() {
        assert!(format_plain(&Value::Null).contains("null"));
        assert!(format_plain(&Value::Bool(true)).contains("true"));
        assert!(format_plain(&json!(42)).contains("42"));
        assert!(format_plain(&json!("hello")).contains("hello"));
    }

    #[test]
    fn format_plain_empty_array() {
        assert!(format_plain(&json!([])).contains("empty"));
    }

    #[test]
    fn format_plain_object() {
        let out = format_plain(&json!({"name": "helloQuery", "id": 1}));
        assert!(out.contains("name: helloQuery"));
        assert!(out.contains("id: 1"));
    }

    #[test]
    fn format_plain_query_list_uses_summary_columns() {
        let v = json!([
            {"id": 1, "name": "a", "query": "select 1", "options": {}},
            {"id": 2, "name": "b", "query": "select 2", "options": {}}
        ]);
        let out = format_plain(&v);
        let header = out.lines().next().unwrap();
        assert!(header.contains("id"));
        assert!(header.contains("name"));
        assert!(!header.contains("query"));
        assert!(out.contains('a'));
        assert!(out.contains('b'));
    }

    #[test]
    fn result_table_in_column_order() {
        let result: QueryResult = serde_json::from_value(json!({
            "id": 2,
            "runtime": 0.5,
            "data": {
                "columns": [
                    {"name": "name", "friendly_name": "name", "type": "string"},
                    {"name": "id", "friendly_name": "id", "type": "integer"}
                ],
                "rows": [{"id": 1, "name": "test1"}, {"id": 2, "name": "test2\nline"}]
            }
        }))
        .unwrap();
        let out = format_result_table(&result);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("name"));
        assert!(lines[0].ends_with("id"));
        assert!(lines[2].starts_with("test1"));
        assert!(lines[3].starts_with("test2 line"));
        assert!(out.contains("(2 rows, 0.500s)"));
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("héllo wörld", 5), "héll…");
        assert_eq!(truncate("short", 16), "short");
    }

    #[test]
    fn format_json_roundtrip() {
        let v = json!({"x": 1, "y": [2, 3]});
        let parsed: Value = serde_json::from_str(&format_json(&v).unwrap()).unwrap();
        assert_eq!(parsed, v);
    }
}

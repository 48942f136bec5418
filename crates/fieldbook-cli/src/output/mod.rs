pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod report;
pub mod table;

use crate::OutputFormat;
use rust_decimal::Decimal;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Report => report::print_report(value),
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` member of a computation envelope, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Flatten nested objects into dotted keys (`savings.months_saved`).
/// Arrays of objects are left for the caller to render separately.
pub(crate) fn flatten_scalars(prefix: &str, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                if is_record_list(val) {
                    continue;
                }
                flatten_scalars(&path, val, out);
            }
        }
        other => out.push((prefix.to_string(), other.clone())),
    }
}

/// Array members whose elements are all objects, e.g. schedules and rankings.
pub(crate) fn record_lists(value: &Value) -> Vec<(&str, &[Value])> {
    match value {
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| is_record_list(v))
            .filter_map(|(k, v)| v.as_array().map(|a| (k.as_str(), a.as_slice())))
            .collect(),
        _ => Vec::new(),
    }
}

fn is_record_list(value: &Value) -> bool {
    matches!(value, Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object))
}

/// Render a scalar for a table cell or CSV field.
pub(crate) fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_cell).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

pub(crate) fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

/// Two-decimal rendering of a money or hours value.
pub(crate) fn money(value: &Value) -> String {
    match decimal(value) {
        Some(d) => format!("{:.2}", d.round_dp(2)),
        None => format_cell(value),
    }
}

use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten_scalars, format_cell, record_lists, result_of};

/// Format output as tables using the tabled crate: one Field/Value table for
/// scalar results, then one table per list of records (schedules, rankings).
pub fn print_table(value: &Value) {
    let result = result_of(value);

    match result {
        Value::Object(_) => {
            let mut scalars = Vec::new();
            flatten_scalars("", result, &mut scalars);
            if !scalars.is_empty() {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (key, val) in &scalars {
                    builder.push_record([key.clone(), format_cell(val)]);
                }
                println!("{}", Table::from(builder));
            }

            for (name, records) in record_lists(result) {
                println!("\n{name}:");
                println!("{}", records_table(records));
            }
        }
        Value::Array(arr) => println!("{}", records_table(arr)),
        other => println!("{}", format_cell(other)),
    }

    print_envelope_notes(value);
}

/// Build a table whose headers come from the first record's keys.
pub(crate) fn records_table(records: &[Value]) -> Table {
    let mut builder = Builder::default();
    let headers: Vec<String> = match records.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => Vec::new(),
    };
    builder.push_record(headers.clone());

    for item in records {
        let row: Vec<String> = match item {
            Value::Object(map) => headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_cell).unwrap_or_default())
                .collect(),
            other => vec![format_cell(other)],
        };
        builder.push_record(row);
    }
    Table::from(builder)
}

fn print_envelope_notes(value: &Value) {
    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

use serde_json::Value;

use super::{format_cell, money, result_of};

/// Dotted paths to the headline number of each command, in priority order.
const PRIORITY_PATHS: &[&str] = &[
    "savings.interest_saved",
    "scenario_a.result.reason",
    "scenario_b.result.reason",
    "top_risk_equipment.0.equipment",
    "months",
    "reason",
    "baseline_status",
];

/// Headline paths holding money, printed to cents.
const MONEY_PATHS: &[&str] = &["savings.interest_saved"];

/// Print just the key answer value from the output.
///
/// Looks up well-known headline fields first, then falls back to the first
/// field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(result_of(value)));
}

fn minimal_line(result: &Value) -> String {
    for path in PRIORITY_PATHS {
        if let Some(val) = lookup(result, path) {
            if val.is_null() {
                continue;
            }
            return if MONEY_PATHS.contains(path) {
                money(val)
            } else {
                format_cell(val)
            };
        }
    }

    match result {
        Value::Object(map) => match map.iter().next() {
            Some((key, val)) => format!("{}: {}", key, format_cell(val)),
            None => String::new(),
        },
        other => format_cell(other),
    }
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        other => other.get(segment),
    })
}

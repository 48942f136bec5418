use serde_json::Value;
use std::fmt::Write;

use super::table::{print_table, records_table};
use super::{decimal, format_cell, money, result_of};

const RULE_HEAVY: &str = "================ RESULTS ================";
const RULE_LIGHT: &str = "----------------------------------------";

/// Human-readable console report. Money and hours are shown to 2 decimals;
/// unrecognised results fall back to the table formatter.
pub fn print_report(value: &Value) {
    let result = result_of(value);

    let report = if result.get("scenario_a").is_some() {
        loan_comparison_report(result)
    } else if result.get("keyword_frequency").is_some() {
        maintenance_report(result) + &warnings_section(value)
    } else if result.get("rows").is_some() {
        sweep_report(result) + &warnings_section(value)
    } else if result.get("outcome").is_some() {
        payoff_report(result)
    } else {
        print_table(value);
        return;
    };

    print!("{report}");
}

fn loan_comparison_report(result: &Value) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{RULE_HEAVY}");
    out += &scenario_lines("A", &result["scenario_a"]);
    let _ = writeln!(out, "{RULE_LIGHT}");
    out += &scenario_lines("B", &result["scenario_b"]);

    if let Value::Object(savings) = &result["savings"] {
        let _ = writeln!(
            out,
            "\n>>> Months saved: {}",
            savings.get("months_saved").map(format_cell).unwrap_or_default()
        );
        let _ = writeln!(
            out,
            ">>> Interest saved: ${}",
            money(savings.get("interest_saved").unwrap_or(&Value::Null))
        );
    }
    out
}

fn scenario_lines(tag: &str, scenario: &Value) -> String {
    let mut out = String::new();
    let sim = &scenario["result"];

    if sim["paid_off"].as_bool().unwrap_or(false) {
        let _ = writeln!(out, "{tag}) Months: {}", format_cell(&sim["months"]));
        let _ = writeln!(out, "{tag}) Payoff date: {}", format_cell(&scenario["payoff_date"]));
        let _ = writeln!(out, "{tag}) Total interest: ${}", money(&sim["total_interest"]));
        let _ = writeln!(out, "{tag}) Total paid:     ${}", money(&sim["total_paid"]));
    } else {
        let reason = sim["reason"].as_str().unwrap_or("Unknown");
        let _ = writeln!(out, "{tag}) Not paid off: {reason}");
    }
    out
}

fn payoff_report(result: &Value) -> String {
    let mut out = String::new();
    if result["paid_off"].as_bool().unwrap_or(false) {
        let _ = writeln!(out, "Months: {}", format_cell(&result["months"]));
        let _ = writeln!(out, "Total interest: ${}", money(&result["total_interest"]));
        let _ = writeln!(out, "Total paid:     ${}", money(&result["total_paid"]));
    } else {
        let reason = result["reason"].as_str().unwrap_or("Unknown");
        let _ = writeln!(out, "Not paid off: {reason}");
    }

    if let Some(rows) = result["schedule"].as_array().filter(|r| !r.is_empty()) {
        let rounded: Vec<Value> = rows.iter().map(round_record).collect();
        let _ = writeln!(out, "\nSchedule:\n{}", records_table(&rounded));
    }
    out
}

fn maintenance_report(result: &Value) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\nMost Frequent Failure Keywords:");
    for kw in records(&result["keyword_frequency"]) {
        let _ = writeln!(
            out,
            "- {}: {}",
            format_cell(&kw["keyword"]),
            format_cell(&kw["count"])
        );
    }

    let _ = writeln!(out, "\nDowntime by Equipment:");
    for eq in records(&result["downtime_by_equipment"]) {
        let _ = writeln!(
            out,
            "{}: {} hours",
            format_cell(&eq["equipment"]),
            money(&eq["downtime_hours"])
        );
    }

    let _ = writeln!(out, "\nHighest Risk Equipment (by downtime):");
    for eq in records(&result["top_risk_equipment"]) {
        let _ = writeln!(
            out,
            "- {} ({} hrs)",
            format_cell(&eq["equipment"]),
            money(&eq["downtime_hours"])
        );
    }
    out
}

fn sweep_report(result: &Value) -> String {
    let rows: Vec<Value> = records(&result["rows"]).iter().map(round_record).collect();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Baseline (no extra payment): {}",
        format_cell(&result["baseline_status"])
    );
    if !rows.is_empty() {
        let _ = writeln!(out, "{}", records_table(&rows));
    }
    out
}

fn warnings_section(value: &Value) -> String {
    let mut out = String::new();
    for w in records(&value["warnings"]).iter().filter_map(Value::as_str) {
        let _ = writeln!(out, "warning: {w}");
    }
    out
}

fn records(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// Round every decimal-looking string field of a record to 2 places.
fn round_record(record: &Value) -> Value {
    match record {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let cell = match decimal(v) {
                        Some(_) if v.is_string() => Value::String(money(v)),
                        _ => v.clone(),
                    };
                    (k.clone(), cell)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

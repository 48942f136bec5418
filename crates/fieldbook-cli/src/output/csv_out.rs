use serde_json::Value;
use std::io;

use super::{flatten_scalars, format_cell, result_of};

/// Lists folded into one long-format CSV for maintenance results:
/// (result key, name field, value field).
const MAINTENANCE_SECTIONS: &[(&str, &str, &str)] = &[
    ("keyword_frequency", "keyword", "count"),
    ("downtime_by_equipment", "equipment", "downtime_hours"),
    ("top_risk_equipment", "equipment", "downtime_hours"),
];

/// Write output as CSV to stdout.
///
/// Payoff schedules and sweep rows are written as one row per record.
/// Maintenance results become section,name,value rows covering every list.
/// Anything else is a two-column field,value CSV with nested keys dotted.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Err(e) = write_result(&mut wtr, result_of(value)) {
        eprintln!("CSV write error: {}", e);
    }
}

fn write_result<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Value) -> csv::Result<()> {
    let list = |key: &str| result.get(key).and_then(Value::as_array);

    if let Some(rows) = list("schedule").or_else(|| list("rows")) {
        write_records(wtr, rows)?;
    } else if result.get("keyword_frequency").is_some() {
        write_sections(wtr, result)?;
    } else {
        write_fields(wtr, result)?;
    }
    wtr.flush().map_err(csv::Error::from)
}

fn write_sections<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Value) -> csv::Result<()> {
    wtr.write_record(["section", "name", "value"])?;
    for (section, name_field, value_field) in MAINTENANCE_SECTIONS {
        let records = result
            .get(*section)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        for record in records {
            wtr.write_record([
                section.to_string(),
                format_cell(&record[*name_field]),
                format_cell(&record[*value_field]),
            ])?;
        }
    }
    Ok(())
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Value) -> csv::Result<()> {
    let mut fields = Vec::new();
    flatten_scalars("", result, &mut fields);
    wtr.write_record(["field", "value"])?;
    for (key, val) in &fields {
        wtr.write_record([key.as_str(), &format_cell(val)])?;
    }
    Ok(())
}

fn write_records<W: io::Write>(wtr: &mut csv::Writer<W>, records: &[Value]) -> csv::Result<()> {
    let headers: Vec<&str> = match records.first() {
        Some(Value::Object(first)) => first.keys().map(String::as_str).collect(),
        _ => return Ok(()),
    };
    wtr.write_record(&headers)?;

    for item in records {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_cell).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(f: impl FnOnce(&mut csv::Writer<Vec<u8>>) -> csv::Result<()>) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        f(&mut wtr).unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_records_csv() {
        let rows = vec![
            json!({"equipment": "Main Engine", "downtime_hours": "10.5"}),
            json!({"equipment": "Boiler", "downtime_hours": "5"}),
        ];
        let out = render(|w| write_records(w, &rows));
        assert_eq!(
            out,
            "downtime_hours,equipment\n10.5,Main Engine\n5,Boiler\n"
        );
    }

    #[test]
    fn test_fields_csv_dots_nested_keys() {
        let result = json!({"savings": {"months_saved": 9}, "paid_off": true});
        let out = render(|w| write_fields(w, &result));
        assert_eq!(out, "field,value\npaid_off,true\nsavings.months_saved,9\n");
    }

    #[test]
    fn test_maintenance_csv_keeps_every_list() {
        let result = json!({
            "entry_count": 2,
            "keyword_frequency": [{"keyword": "leak", "count": 2}],
            "downtime_by_equipment": [
                {"equipment": "Boiler", "downtime_hours": "5"},
                {"equipment": "Fuel Pump", "downtime_hours": "1.25"}
            ],
            "top_risk_equipment": [{"equipment": "Boiler", "downtime_hours": "5"}]
        });
        let out = render(|w| write_result(w, &result));
        assert_eq!(
            out,
            "section,name,value\n\
             keyword_frequency,leak,2\n\
             downtime_by_equipment,Boiler,5\n\
             downtime_by_equipment,Fuel Pump,1.25\n\
             top_risk_equipment,Boiler,5\n"
        );
    }

    #[test]
    fn test_sweep_rows_chosen_over_fields() {
        let result = json!({
            "baseline_status": "paid_off",
            "rows": [{"extra_payment": "0", "months": 41}]
        });
        let out = render(|w| write_result(w, &result));
        assert_eq!(out, "extra_payment,months\n0,41\n");
    }
}

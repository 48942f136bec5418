use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::FieldbookError;
use crate::types::{parse_decimal, Hours};
use crate::FieldbookResult;

pub const EQUIPMENT_COLUMN: &str = "equipment";
pub const LOG_TEXT_COLUMN: &str = "log_text";
pub const DOWNTIME_COLUMN: &str = "downtime_hours";

/// One row of the maintenance log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub equipment: String,
    pub log_text: String,
    pub downtime_hours: Hours,
}

impl LogEntry {
    pub fn new(equipment: impl Into<String>, log_text: impl Into<String>, downtime_hours: Hours) -> Self {
        LogEntry {
            equipment: equipment.into(),
            log_text: log_text.into(),
            downtime_hours,
        }
    }
}

/// Read maintenance logs from a CSV file on disk.
pub fn load_logs_from_path(path: impl AsRef<Path>) -> FieldbookResult<Vec<LogEntry>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(FieldbookError::FileNotFound(path.to_path_buf()));
    }
    let entries = load_logs(File::open(path)?)?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "loaded maintenance logs");
    Ok(entries)
}

/// Parse maintenance logs from CSV.
///
/// The header must name `equipment`, `log_text` and `downtime_hours`; other
/// columns are ignored. Text fields are trimmed. A row whose downtime is not
/// a non-negative number fails the whole load.
pub fn load_logs<R: Read>(reader: R) -> FieldbookResult<Vec<LogEntry>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| FieldbookError::MissingColumn(name.to_string()))
    };
    let equipment_idx = column(EQUIPMENT_COLUMN)?;
    let text_idx = column(LOG_TEXT_COLUMN)?;
    let downtime_idx = column(DOWNTIME_COLUMN)?;

    let mut entries = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let field = |idx: usize, name: &str| {
            record
                .get(idx)
                .map(str::trim)
                .ok_or_else(|| FieldbookError::MalformedRow {
                    line,
                    field: name.to_string(),
                    reason: "value missing".into(),
                })
        };

        let equipment = field(equipment_idx, EQUIPMENT_COLUMN)?;
        let log_text = field(text_idx, LOG_TEXT_COLUMN)?;
        let downtime_hours = parse_downtime(field(downtime_idx, DOWNTIME_COLUMN)?)
            .map_err(|reason| FieldbookError::MalformedRow {
                line,
                field: DOWNTIME_COLUMN.to_string(),
                reason,
            })?;

        entries.push(LogEntry::new(equipment, log_text, downtime_hours));
    }

    Ok(entries)
}

fn parse_downtime(raw: &str) -> Result<Hours, String> {
    let hours = parse_decimal(raw)?;
    if hours < Decimal::ZERO {
        return Err(format!("downtime cannot be negative ({hours})"));
    }
    Ok(hours)
}

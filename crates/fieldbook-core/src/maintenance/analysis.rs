use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::maintenance::downtime::{self, EquipmentRisk, DEFAULT_TOP_N};
use crate::maintenance::keywords::{self, KeywordCount, KeywordVocabulary};
use crate::maintenance::logs::LogEntry;
use crate::types::*;
use crate::FieldbookResult;

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceAnalysisInput {
    pub entries: Vec<LogEntry>,
    #[serde(default)]
    pub keywords: KeywordVocabulary,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceAnalysisOutput {
    pub entry_count: usize,
    pub total_downtime_hours: Hours,
    /// Most frequent first
    pub keyword_frequency: Vec<KeywordCount>,
    /// Highest downtime first
    pub downtime_by_equipment: Vec<EquipmentRisk>,
    pub top_risk_equipment: Vec<EquipmentRisk>,
}

/// Keyword frequencies, downtime per equipment and the top-N risk ranking
/// for a batch of maintenance log entries.
pub fn analyze_logs(
    input: &MaintenanceAnalysisInput,
) -> FieldbookResult<ComputationOutput<MaintenanceAnalysisOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.entries.is_empty() {
        warnings.push("No log entries to analyse".into());
    }
    if input.keywords.is_empty() {
        warnings.push("Keyword vocabulary is empty; no keywords counted".into());
    }

    let counts = keywords::keyword_frequency(&input.entries, &input.keywords);
    let totals = downtime::downtime_by_equipment(&input.entries);

    let output = MaintenanceAnalysisOutput {
        entry_count: input.entries.len(),
        total_downtime_hours: totals.total_hours(),
        keyword_frequency: counts.most_common(),
        downtime_by_equipment: totals.ranked(),
        top_risk_equipment: downtime::top_risk_equipment(&totals, input.top_n),
    };

    tracing::debug!(
        entries = output.entry_count,
        keywords_matched = output.keyword_frequency.len(),
        equipment = output.downtime_by_equipment.len(),
        "maintenance log analysis finished"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Failure Keyword Frequency and Downtime Ranking",
        &serde_json::json!({
            "keywords": input.keywords,
            "top_n": input.top_n,
            "matching": "Case-insensitive substring, counted at most once per entry",
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_analysis_summary() {
        let input = MaintenanceAnalysisInput {
            entries: vec![
                LogEntry::new("Pump A", "Bearing vibration high", dec!(3)),
                LogEntry::new("Boiler", "Pressure trip", dec!(6)),
                LogEntry::new("Pump A", "Seal leak, vibration", dec!(4)),
            ],
            keywords: KeywordVocabulary::default(),
            top_n: 1,
        };
        let out = analyze_logs(&input).unwrap().result;
        assert_eq!(out.entry_count, 3);
        assert_eq!(out.total_downtime_hours, dec!(13));
        assert_eq!(out.keyword_frequency[0].keyword, "vibration");
        assert_eq!(out.keyword_frequency[0].count, 2);
        assert_eq!(out.downtime_by_equipment[0].equipment, "Pump A");
        assert_eq!(out.top_risk_equipment.len(), 1);
        assert_eq!(out.top_risk_equipment[0].downtime_hours, dec!(7));
    }

    #[test]
    fn test_empty_input_warns() {
        let input = MaintenanceAnalysisInput {
            entries: Vec::new(),
            keywords: KeywordVocabulary::default(),
            top_n: DEFAULT_TOP_N,
        };
        let output = analyze_logs(&input).unwrap();
        assert_eq!(output.result.total_downtime_hours, Decimal::ZERO);
        assert!(output.result.keyword_frequency.is_empty());
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn test_input_defaults_from_json() {
        let input: MaintenanceAnalysisInput = serde_json::from_str(
            r#"{"entries": [{"equipment": "Fan", "log_text": "clog", "downtime_hours": "1.5"}]}"#,
        )
        .unwrap();
        assert_eq!(input.top_n, DEFAULT_TOP_N);
        assert_eq!(input.keywords, KeywordVocabulary::default());
    }
}

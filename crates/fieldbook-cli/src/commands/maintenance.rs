use clap::Args;
use serde_json::Value;

use fieldbook_core::maintenance::analysis::{self, MaintenanceAnalysisInput};
use fieldbook_core::maintenance::downtime::DEFAULT_TOP_N;
use fieldbook_core::maintenance::keywords::KeywordVocabulary;
use fieldbook_core::maintenance::logs;

/// Arguments for maintenance log analysis
#[derive(Args)]
pub struct MaintenanceArgs {
    /// Maintenance log CSV with equipment, log_text and downtime_hours columns
    #[arg(long, default_value = "data/engine_room_logs.csv")]
    pub csv: String,

    /// Failure keywords to count (comma-separated); defaults to the stock
    /// vocabulary (vibration, pressure, temp, ...)
    #[arg(long, value_delimiter = ',')]
    pub keywords: Option<Vec<String>>,

    /// Number of equipment items in the risk ranking
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,
}

pub fn run_maintenance(args: MaintenanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let entries = logs::load_logs_from_path(&args.csv)?;

    let keywords = match args.keywords {
        Some(list) => KeywordVocabulary::new(list),
        None => KeywordVocabulary::default(),
    };

    let result = analysis::analyze_logs(&MaintenanceAnalysisInput {
        entries,
        keywords,
        top_n: args.top_n,
    })?;
    Ok(serde_json::to_value(result)?)
}

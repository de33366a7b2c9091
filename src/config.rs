use std::env;
use std::path::PathBuf;

pub const BUDGET_PATH_VAR: &str = "SEEDLINK_BUDGET_PATH";
pub const OUTPUT_DIR_VAR: &str = "SEEDLINK_OUTPUT_DIR";
pub const PREVIEW_ROWS_VAR: &str = "SEEDLINK_PREVIEW_ROWS";

const DEFAULT_BUDGET_PATH: &str = "farm_budget.json";
const DEFAULT_PREVIEW_ROWS: usize = 5;

pub const REPORT_FILE: &str = "farm_report.txt";
pub const ENTERPRISE_CSV_FILE: &str = "enterprise_summary.csv";
pub const SUMMARY_JSON_FILE: &str = "summary.json";

/// Runtime settings for the CLI. The library entry points take no
/// configuration; locale and formatting are fixed in `util`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub preview_rows: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_BUDGET_PATH),
            output_dir: PathBuf::from("."),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl ReportConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source; empty values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            input_path: get(BUDGET_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.input_path),
            output_dir: get(OUTPUT_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            preview_rows: get(PREVIEW_ROWS_VAR)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.preview_rows),
        }
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(REPORT_FILE)
    }

    pub fn enterprise_csv_path(&self) -> PathBuf {
        self.output_dir.join(ENTERPRISE_CSV_FILE)
    }

    pub fn summary_json_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_JSON_FILE)
    }
}

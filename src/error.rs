use thiserror::Error;

/// Faults surfaced to the caller.
///
/// Only structural problems with the budget payload are errors; numeric
/// irregularities are absorbed by the engine as zero contributions.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Malformed budget: {0}")]
    Malformed(String),
    #[error("Malformed budget payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;

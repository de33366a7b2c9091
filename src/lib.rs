//! Seedlink farm budget reports.
//!
//! A farmer-submitted enterprise budget is decoded ([`loader`]), recomputed
//! from its item-level figures ([`aggregate`]) and rendered as a paginated
//! document ([`reports`]). [`produce_report`] runs the whole pipeline; any
//! totals the client computed are ignored.

pub mod aggregate;
pub mod commentary;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;

use std::sync::Once;

pub use error::{ReportError, ReportResult};
pub use types::{BudgetSummary, FarmTotals, RawBudget};

static INIT_TRACING: Once = Once::new();

/// Installs the global tracing subscriber. `RUST_LOG` overrides the default
/// `seedlink_report=info` directive.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("seedlink_report=info"));
        // Another subscriber may already be installed by an embedding binary.
        let _ = fmt().with_env_filter(filter).try_init();
        tracing::info!("seedlink_report tracing initialized");
    });
}

/// The authoritative summary together with the compiled document.
#[derive(Debug, Clone)]
pub struct Report {
    pub summary: BudgetSummary,
    pub document: Vec<u8>,
}

/// Aggregate and compile an already-decoded JSON budget.
pub fn produce_report(raw_budget: serde_json::Value) -> ReportResult<Report> {
    let (budget, _) = loader::decode_budget(raw_budget)?;
    Ok(report_for(&budget))
}

pub fn produce_report_from_str(raw_budget: &str) -> ReportResult<Report> {
    let (budget, _) = loader::decode_budget_str(raw_budget)?;
    Ok(report_for(&budget))
}

/// Run the engine and the compiler on a decoded budget.
pub fn report_for(budget: &RawBudget) -> Report {
    let summary = aggregate::aggregate(budget);
    let document = reports::compile(&summary);
    Report { summary, document }
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}

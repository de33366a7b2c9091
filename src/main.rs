// Entry point and menu-driven CLI flow.
//
// - Option [1] loads and validates the budget JSON, printing diagnostics.
// - Option [2] aggregates it, compiles the report and writes the exports.
// - After generating, the user can go back to the menu or exit.
use once_cell::sync::Lazy;
use seedlink_report::config::ReportConfig;
use seedlink_report::loader::{self, LoadReport};
use seedlink_report::types::RawBudget;
use seedlink_report::{output, reports, util, ReportResult};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};
use tracing::error;

// Keeps the loaded budget between menu choices so a report can be generated
// several times in one run. Summaries are never cached here.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { budget: None }));

struct AppState {
    budget: Option<RawBudget>,
}

fn state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Read one trimmed line after printing `label`; `None` once stdin is closed.
fn prompt(label: &str) -> Option<String> {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        let Some(answer) = prompt("Back to menu (Y/N): ") else {
            return false;
        };
        match answer.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn handle_load(config: &ReportConfig) {
    match loader::load_budget(&config.input_path) {
        Ok((budget, load_report)) => {
            print_load_report(&budget, &load_report);
            state().budget = Some(budget);
        }
        Err(e) => {
            error!(path = %config.input_path.display(), error = %e, "budget load failed");
            eprintln!("Failed to load budget: {}\n", e);
        }
    }
}

fn print_load_report(budget: &RawBudget, load_report: &LoadReport) {
    println!(
        "Loaded budget for {} ({} enterprises, {} cost items)",
        budget.farm_name,
        util::format_int(load_report.enterprises),
        util::format_int(load_report.cost_items)
    );
    if load_report.defaulted_fields > 0 {
        println!(
            "Note: {} numeric fields were missing or unreadable and count as zero.",
            util::format_int(load_report.defaulted_fields)
        );
    }
    println!();
}

fn handle_generate(config: &ReportConfig) -> ReportResult<()> {
    let budget = state().budget.clone();
    let Some(budget) = budget else {
        println!("Error: No budget loaded. Please load the budget file first (option 1).\n");
        return Ok(());
    };

    let report = seedlink_report::report_for(&budget);
    std::fs::create_dir_all(&config.output_dir)?;

    let report_path = config.report_path();
    output::write_bytes(&report_path, &report.document)?;
    let rows = reports::enterprise_rows(&report.summary);
    output::write_csv(&config.enterprise_csv_path(), &rows)?;
    output::write_json(&config.summary_json_path(), &report.summary)?;

    let totals = &report.summary.farm_totals;
    println!("Farm Budget Report: {}\n", report.summary.farm_name);
    output::preview_table_rows(&rows, config.preview_rows);
    println!(
        "Gross income {} | Variable costs {} | Net income {} | Margin {}",
        util::format_currency(totals.total_gross_income),
        util::format_currency(totals.total_variable_costs),
        util::format_currency(totals.total_net_income),
        util::format_percent(totals.farm_profit_margin, 2)
    );
    println!("(Full report exported to {})\n", report_path.display());
    Ok(())
}

fn main() {
    seedlink_report::init();
    let config = ReportConfig::from_env();
    loop {
        println!("Seedlink Farm Budget Report");
        println!("[1] Load the budget file ({})", config.input_path.display());
        println!("[2] Generate report\n");
        let Some(choice) = prompt("Enter choice: ") else {
            break;
        };
        match choice.as_str() {
            "1" => handle_load(&config),
            "2" => {
                println!();
                if let Err(e) = handle_generate(&config) {
                    error!(error = %e, "report generation failed");
                    eprintln!("Write error: {}\n", e);
                }
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1 or 2.\n"),
        }
    }
}

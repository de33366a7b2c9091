//! Report compiler.
//!
//! Renders a [`BudgetSummary`] as a paginated plain-text document. Pages are
//! separated by a form feed and each one ends with a `Page N of M` footer.
//! Page order is fixed: title and farm summary, one page per enterprise in
//! input order, then the commentary page.
use crate::commentary::commentary;
use crate::output::markdown_table;
use crate::types::{
    BudgetSummary, CategoryRow, CostLineRow, EnterpriseRow, EnterpriseSummary, FarmTotals,
    SummaryRow,
};
use crate::util::{format_currency, format_number, format_percent, parse_amount, DATE_FORMAT};
use chrono::{Local, NaiveDateTime};
use tracing::info;

pub const PAGE_BREAK: &str = "\u{000C}";

pub const REPORT_TITLE: &str = "FARM ENTERPRISE BUDGET REPORT";

pub const REPORT_DISCLAIMER: &str = "Disclaimer: this report is generated from the budget \
figures supplied by the farmer. All totals were recalculated from the individual cost items \
and are estimates of variable costs and income only.";

const FARM_SUMMARY_HEADING: &str = "Farm Summary";
const GROSS_INCOME: &str = "Total Gross Income";
const VARIABLE_COSTS: &str = "Total Variable Costs";
const NET_INCOME: &str = "Total Net Income";
const PROFIT_MARGIN: &str = "Farm Profit Margin";

/// Compile the document, stamped with the current local time.
pub fn compile(summary: &BudgetSummary) -> Vec<u8> {
    compile_at(summary, Local::now().naive_local())
}

pub fn compile_at(summary: &BudgetSummary, generated_at: NaiveDateTime) -> Vec<u8> {
    let mut pages = Vec::with_capacity(summary.enterprise_summaries.len() + 2);
    pages.push(title_page(summary, generated_at));
    let count = summary.enterprise_summaries.len();
    for (idx, ent) in summary.enterprise_summaries.iter().enumerate() {
        pages.push(enterprise_page(ent, idx + 1, count));
    }
    pages.push(commentary_page(&summary.farm_totals));

    let total = pages.len();
    let document = pages
        .into_iter()
        .enumerate()
        .map(|(idx, body)| format!("{}\nPage {} of {}\n", body, idx + 1, total))
        .collect::<Vec<_>>()
        .join(PAGE_BREAK);

    info!(
        farm = %summary.farm_name,
        pages = total,
        bytes = document.len(),
        "report compiled"
    );
    document.into_bytes()
}

/// Rows of the enterprise overview, shared by the title page and the CSV export.
pub fn enterprise_rows(summary: &BudgetSummary) -> Vec<EnterpriseRow> {
    summary
        .enterprise_summaries
        .iter()
        .map(|e| EnterpriseRow {
            enterprise: e.name.clone(),
            enterprise_type: e.enterprise_type.label().to_string(),
            size: format!("{} {}", format_number(e.area, 2), e.unit_label),
            gross_income: format_currency(e.gross_income),
            variable_costs: format_currency(e.variable_costs),
            costs_per_unit: format_currency(e.costs_per_unit),
            net_income: format_currency(e.net_income),
            profit_margin: format_percent(e.profit_margin, 2),
        })
        .collect()
}

fn title_page(summary: &BudgetSummary, generated_at: NaiveDateTime) -> String {
    let t = &summary.farm_totals;
    let totals = vec![
        measure(GROSS_INCOME, format_currency(t.total_gross_income)),
        measure(VARIABLE_COSTS, format_currency(t.total_variable_costs)),
        measure(NET_INCOME, format_currency(t.total_net_income)),
        measure(PROFIT_MARGIN, format_percent(t.farm_profit_margin, 2)),
    ];
    let categories: Vec<CategoryRow> = summary
        .aggregated_costs
        .iter()
        .map(|(category, total)| CategoryRow {
            category: category.label().to_string(),
            total: format_currency(*total),
        })
        .collect();

    let mut page = String::new();
    page.push_str(REPORT_TITLE);
    page.push_str("\n\n");
    page.push_str(&format!("Farm: {}\n", summary.farm_name));
    page.push_str(&format!("Production region: {}\n", summary.production_region));
    page.push_str(&format!("Generated: {}\n\n", generated_at.format(DATE_FORMAT)));
    page.push_str(REPORT_DISCLAIMER);
    page.push_str("\n\n");
    page.push_str(FARM_SUMMARY_HEADING);
    page.push_str("\n\n");
    page.push_str(&markdown_table(totals));
    page.push_str("\n\nEnterprises\n\n");
    page.push_str(&markdown_table(enterprise_rows(summary)));
    page.push_str("\n\nVariable Costs by Category\n\n");
    page.push_str(&markdown_table(categories));
    page.push('\n');
    page
}

fn enterprise_page(ent: &EnterpriseSummary, position: usize, count: usize) -> String {
    let measures = vec![
        measure(&ent.area_label, format_number(ent.area, 2)),
        measure("Unit", ent.unit_label.clone()),
        measure("Gross Income", format_currency(ent.gross_income)),
        measure("Variable Costs", format_currency(ent.variable_costs)),
        measure(
            &format!("Costs per {}", ent.unit_label),
            format_currency(ent.costs_per_unit),
        ),
        measure("Net Income", format_currency(ent.net_income)),
        measure("Profit Margin", format_percent(ent.profit_margin, 2)),
    ];

    let mut page = format!("Enterprise {} of {}: {}\n\n", position, count, ent.name);
    page.push_str(&markdown_table(measures));
    page.push_str("\n\nCost Breakdown\n\n");
    let lines = cost_lines(ent);
    if lines.is_empty() {
        page.push_str("(no cost items)\n");
    } else {
        page.push_str(&markdown_table(lines));
        page.push('\n');
    }
    page
}

fn cost_lines(ent: &EnterpriseSummary) -> Vec<CostLineRow> {
    let mut rows: Vec<CostLineRow> = ent
        .costs
        .iter()
        .flat_map(|(category, items)| {
            items.iter().map(move |item| CostLineRow {
                category: category.label().to_string(),
                item: if item.name.is_empty() {
                    "-".to_string()
                } else {
                    item.name.clone()
                },
                quantity: format_number(item.quantity, 2),
                unit_price: format_currency(item.unit_price),
                per_unit: format_currency(item.total),
                total: format_currency(item.total * ent.area),
            })
        })
        .collect();
    if !rows.is_empty() {
        let rate: f64 = ent.costs.values().flatten().map(|i| i.total).sum();
        rows.push(CostLineRow {
            category: "Total".to_string(),
            item: String::new(),
            quantity: String::new(),
            unit_price: String::new(),
            per_unit: format_currency(rate),
            total: format_currency(ent.variable_costs),
        });
    }
    rows
}

fn commentary_page(totals: &FarmTotals) -> String {
    format!("Commentary\n\n{}\n", commentary(totals).text)
}

fn measure(label: &str, value: String) -> SummaryRow {
    SummaryRow {
        measure: label.to_string(),
        value,
    }
}

/// Re-read the farm summary table from a compiled document.
///
/// Values come back at the two-decimal precision they were printed with.
/// Returns `None` if the bytes are not a document produced by [`compile`].
pub fn extract_farm_totals(document: &[u8]) -> Option<FarmTotals> {
    let text = std::str::from_utf8(document).ok()?;
    let first_page = text.split(PAGE_BREAK).next()?;
    // Only the farm summary table; later tables may repeat the labels as names.
    let table = first_page
        .lines()
        .skip_while(|l| *l != FARM_SUMMARY_HEADING)
        .skip(1)
        .skip_while(|l| l.trim().is_empty())
        .take_while(|l| l.trim_start().starts_with('|'));
    let mut gross = None;
    let mut costs = None;
    let mut net = None;
    let mut margin = None;
    for line in table {
        let cells: Vec<&str> = line.split('|').map(str::trim).collect();
        let [_, label, value, ..] = cells.as_slice() else {
            continue;
        };
        let slot = match *label {
            GROSS_INCOME => &mut gross,
            VARIABLE_COSTS => &mut costs,
            NET_INCOME => &mut net,
            PROFIT_MARGIN => &mut margin,
            _ => continue,
        };
        *slot = parse_amount(value);
    }
    Some(FarmTotals {
        total_gross_income: gross?,
        total_variable_costs: costs?,
        total_net_income: net?,
        farm_profit_margin: margin?,
    })
}

//! Aggregation engine.
//!
//! Turns a [`RawBudget`] into a [`BudgetSummary`]. Every figure in the
//! summary is derived here from item-level inputs; nothing the client sent
//! as a total is trusted. The function is total: bad numbers were already
//! reduced to zero by the loader, and the remaining zero-division cases are
//! guarded below.
use crate::types::{
    BudgetSummary, CostCategory, EnterpriseSummary, FarmTotals, RawBudget, RawEnterprise,
};
use crate::util::{finite_or_zero, percent_of};
use std::collections::BTreeMap;
use tracing::debug;

/// Aggregate a raw budget in a single pass over its enterprises.
pub fn aggregate(raw: &RawBudget) -> BudgetSummary {
    let mut aggregated_costs: BTreeMap<CostCategory, f64> =
        CostCategory::ALL.iter().map(|c| (*c, 0.0)).collect();
    let mut total_gross_income = 0.0;
    let mut total_variable_costs = 0.0;

    let enterprise_summaries: Vec<EnterpriseSummary> = raw
        .enterprises
        .iter()
        .map(|ent| {
            for (category, rate) in category_rates(ent) {
                if let Some(acc) = aggregated_costs.get_mut(&category) {
                    *acc += finite_or_zero(rate * ent.area);
                }
            }
            let summary = summarize_enterprise(ent);
            total_gross_income += summary.gross_income;
            total_variable_costs += summary.variable_costs;
            summary
        })
        .collect();

    let farm_totals = farm_totals(total_gross_income, total_variable_costs);
    debug!(
        farm = %raw.farm_name,
        enterprises = enterprise_summaries.len(),
        gross_income = farm_totals.total_gross_income,
        variable_costs = farm_totals.total_variable_costs,
        "budget aggregated"
    );

    BudgetSummary {
        farm_name: raw.farm_name.clone(),
        production_region: raw.production_region.clone(),
        farm_totals,
        enterprise_summaries,
        aggregated_costs,
    }
}

/// Per-unit cost rate of each category present on the enterprise.
fn category_rates(ent: &RawEnterprise) -> impl Iterator<Item = (CostCategory, f64)> + '_ {
    ent.costs
        .iter()
        .map(|(category, items)| (*category, items.iter().map(|i| i.total).sum::<f64>()))
}

pub fn summarize_enterprise(ent: &RawEnterprise) -> EnterpriseSummary {
    let cost_rate: f64 = category_rates(ent).map(|(_, rate)| rate).sum();
    let gross_income = finite_or_zero(ent.area * ent.expected_yield_per_unit * ent.expected_price);
    let variable_costs = finite_or_zero(ent.area * cost_rate);
    let net_income = gross_income - variable_costs;
    let costs_per_unit = if ent.area > 0.0 {
        finite_or_zero(variable_costs / ent.area)
    } else {
        0.0
    };
    let unit_label = if ent.unit.trim().is_empty() {
        ent.enterprise_type.default_unit().to_string()
    } else {
        ent.unit.trim().to_string()
    };

    EnterpriseSummary {
        name: ent.name.clone(),
        enterprise_type: ent.enterprise_type,
        area_label: ent.enterprise_type.area_label().to_string(),
        area: ent.area,
        gross_income,
        variable_costs,
        costs_per_unit,
        net_income,
        profit_margin: percent_of(net_income, gross_income),
        unit_label,
        costs: ent.costs.clone(),
    }
}

/// Farm-level totals from the summed enterprise figures. The margin is
/// computed once here, on the completed sums. A sum that overflows to an
/// infinity counts as zero, like any other non-finite figure.
pub fn farm_totals(total_gross_income: f64, total_variable_costs: f64) -> FarmTotals {
    let total_gross_income = finite_or_zero(total_gross_income);
    let total_variable_costs = finite_or_zero(total_variable_costs);
    let total_net_income = finite_or_zero(total_gross_income - total_variable_costs);
    FarmTotals {
        total_variable_costs,
        total_gross_income,
        total_net_income,
        farm_profit_margin: percent_of(total_net_income, total_gross_income),
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tabled::Tabled;

use crate::loader::{lenient_enterprise_type, lenient_f64, lenient_string, null_as_default};

/// Closed set of variable-cost classifications shared by every enterprise.
///
/// The wire id is the snake_case variant name; anything else in a `costs`
/// mapping is rejected as malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    LandPreparation,
    Seed,
    Fertilizer,
    CropProtection,
    Irrigation,
    Labour,
    Machinery,
    Harvesting,
    Packaging,
    Transport,
    Marketing,
    Feed,
    AnimalHealth,
    Other,
}

impl CostCategory {
    pub const ALL: [CostCategory; 14] = [
        CostCategory::LandPreparation,
        CostCategory::Seed,
        CostCategory::Fertilizer,
        CostCategory::CropProtection,
        CostCategory::Irrigation,
        CostCategory::Labour,
        CostCategory::Machinery,
        CostCategory::Harvesting,
        CostCategory::Packaging,
        CostCategory::Transport,
        CostCategory::Marketing,
        CostCategory::Feed,
        CostCategory::AnimalHealth,
        CostCategory::Other,
    ];

    /// Human readable label used in report tables.
    pub fn label(self) -> &'static str {
        match self {
            CostCategory::LandPreparation => "Land Preparation",
            CostCategory::Seed => "Seed",
            CostCategory::Fertilizer => "Fertilizer",
            CostCategory::CropProtection => "Crop Protection",
            CostCategory::Irrigation => "Irrigation",
            CostCategory::Labour => "Labour",
            CostCategory::Machinery => "Machinery & Fuel",
            CostCategory::Harvesting => "Harvesting",
            CostCategory::Packaging => "Packaging",
            CostCategory::Transport => "Transport",
            CostCategory::Marketing => "Marketing",
            CostCategory::Feed => "Feed",
            CostCategory::AnimalHealth => "Animal Health",
            CostCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnterpriseType {
    #[default]
    Crop,
    Livestock,
}

impl EnterpriseType {
    pub fn label(self) -> &'static str {
        match self {
            EnterpriseType::Crop => "Crop",
            EnterpriseType::Livestock => "Livestock",
        }
    }

    pub fn area_label(self) -> &'static str {
        match self {
            EnterpriseType::Crop => "Hectares",
            EnterpriseType::Livestock => "Head",
        }
    }

    pub fn default_unit(self) -> &'static str {
        match self {
            EnterpriseType::Crop => "ha",
            EnterpriseType::Livestock => "head",
        }
    }
}

/// Top-level budget payload as submitted by the farmer.
///
/// Client-computed totals that may travel alongside these fields are ignored;
/// the aggregation engine is the only source of summary figures.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBudget {
    #[serde(deserialize_with = "lenient_string")]
    pub farm_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub production_region: String,
    pub enterprises: Vec<RawEnterprise>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnterprise {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_enterprise_type")]
    pub enterprise_type: EnterpriseType,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub area: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub expected_yield_per_unit: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub expected_price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub costs: BTreeMap<CostCategory, Vec<CostItem>>,
}

/// One cost line, already normalized to a per-hectare / per-head figure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub unit_price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseSummary {
    pub name: String,
    pub enterprise_type: EnterpriseType,
    pub area_label: String,
    pub area: f64,
    pub gross_income: f64,
    pub variable_costs: f64,
    pub costs_per_unit: f64,
    pub net_income: f64,
    pub profit_margin: f64,
    pub unit_label: String,
    pub costs: BTreeMap<CostCategory, Vec<CostItem>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmTotals {
    pub total_variable_costs: f64,
    pub total_gross_income: f64,
    pub total_net_income: f64,
    pub farm_profit_margin: f64,
}

/// Verified output of the aggregation engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub farm_name: String,
    pub production_region: String,
    pub farm_totals: FarmTotals,
    pub enterprise_summaries: Vec<EnterpriseSummary>,
    pub aggregated_costs: BTreeMap<CostCategory, f64>,
}

// Table rows. Cells are pre-formatted strings, the same way the CSV export
// and the document render them.

#[derive(Debug, Tabled, Clone)]
pub struct SummaryRow {
    #[tabled(rename = "Measure")]
    pub measure: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct EnterpriseRow {
    #[serde(rename = "Enterprise")]
    #[tabled(rename = "Enterprise")]
    pub enterprise: String,
    #[serde(rename = "Type")]
    #[tabled(rename = "Type")]
    pub enterprise_type: String,
    #[serde(rename = "Size")]
    #[tabled(rename = "Size")]
    pub size: String,
    #[serde(rename = "GrossIncome")]
    #[tabled(rename = "GrossIncome")]
    pub gross_income: String,
    #[serde(rename = "VariableCosts")]
    #[tabled(rename = "VariableCosts")]
    pub variable_costs: String,
    #[serde(rename = "CostsPerUnit")]
    #[tabled(rename = "CostsPerUnit")]
    pub costs_per_unit: String,
    #[serde(rename = "NetIncome")]
    #[tabled(rename = "NetIncome")]
    pub net_income: String,
    #[serde(rename = "ProfitMargin")]
    #[tabled(rename = "ProfitMargin")]
    pub profit_margin: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct CategoryRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Total")]
    pub total: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct CostLineRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Item")]
    pub item: String,
    #[tabled(rename = "Quantity")]
    pub quantity: String,
    #[tabled(rename = "UnitPrice")]
    pub unit_price: String,
    #[tabled(rename = "PerUnit")]
    pub per_unit: String,
    #[tabled(rename = "Total")]
    pub total: String,
}

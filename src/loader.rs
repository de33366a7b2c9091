use crate::error::{ReportError, ReportResult};
use crate::types::{EnterpriseType, RawBudget};
use crate::util::parse_f64_safe;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

const ENTERPRISE_NUMERIC_FIELDS: [&str; 3] = ["area", "expectedYieldPerUnit", "expectedPrice"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub enterprises: usize,
    pub cost_items: usize,
    /// Numeric leaves that were missing or unreadable and count as zero.
    pub defaulted_fields: usize,
}

/// Decode an already-parsed JSON budget.
///
/// Structural faults (wrong container types, missing `farmName` or
/// `enterprises`, unknown cost categories) fail fast. Numeric leaves never do.
pub fn decode_budget(value: Value) -> ReportResult<(RawBudget, LoadReport)> {
    let Some(obj) = value.as_object() else {
        return Err(ReportError::Malformed("budget must be a JSON object".into()));
    };
    if !obj.contains_key("farmName") {
        return Err(ReportError::Malformed("missing required field `farmName`".into()));
    }
    let enterprises = match obj.get("enterprises") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ReportError::Malformed(format!(
                "`enterprises` must be a sequence, found {}",
                json_kind(other)
            )))
        }
        None => return Err(ReportError::Malformed("missing required field `enterprises`".into())),
    };

    let mut report = LoadReport {
        enterprises: enterprises.len(),
        ..LoadReport::default()
    };
    for (idx, ent) in enterprises.iter().enumerate() {
        let Some(ent) = ent.as_object() else {
            return Err(ReportError::Malformed(format!(
                "enterprise #{} must be an object, found {}",
                idx + 1,
                json_kind(ent)
            )));
        };
        report.defaulted_fields += ENTERPRISE_NUMERIC_FIELDS
            .iter()
            .filter(|key| !is_numeric(ent.get(**key)))
            .count();
        if let Some(Value::Object(costs)) = ent.get("costs") {
            for items in costs.values().filter_map(Value::as_array) {
                report.cost_items += items.len();
                report.defaulted_fields += items
                    .iter()
                    .filter(|item| !is_numeric(item.get("total")))
                    .count();
            }
        }
    }

    let budget = RawBudget::deserialize(value)?;
    if report.defaulted_fields > 0 {
        warn!(
            farm = %budget.farm_name,
            defaulted = report.defaulted_fields,
            "numeric fields missing or unreadable, treated as zero"
        );
    }
    debug!(
        enterprises = report.enterprises,
        cost_items = report.cost_items,
        "budget decoded"
    );
    Ok((budget, report))
}

pub fn decode_budget_str(json: &str) -> ReportResult<(RawBudget, LoadReport)> {
    let value: Value = serde_json::from_str(json)?;
    decode_budget(value)
}

pub fn load_budget(path: impl AsRef<Path>) -> ReportResult<(RawBudget, LoadReport)> {
    let data = std::fs::read_to_string(path.as_ref())?;
    decode_budget_str(&data)
}

fn is_numeric(v: Option<&Value>) -> bool {
    match v {
        Some(Value::Number(n)) => n.as_f64().is_some_and(f64::is_finite),
        Some(Value::String(s)) => parse_f64_safe(Some(s)).is_some(),
        _ => false,
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "an object",
    }
}

// Field-level deserializers used by the raw input types. Each one accepts
// any JSON value and falls back to a zero/empty default instead of failing.

pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let n = match &value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_f64_safe(Some(s)),
        _ => None,
    };
    Ok(n.unwrap_or(0.0))
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

pub(crate) fn lenient_enterprise_type<'de, D>(deserializer: D) -> Result<EnterpriseType, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let is_livestock = value
        .as_str()
        .is_some_and(|s| s.trim().eq_ignore_ascii_case("livestock"));
    Ok(if is_livestock {
        EnterpriseType::Livestock
    } else {
        EnterpriseType::Crop
    })
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

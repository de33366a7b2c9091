use seedlink_report::commentary::{commentary, Bucket, ADVISORY_DISCLAIMER, ZERO_INCOME_WARNING};
use seedlink_report::reports::{extract_farm_totals, PAGE_BREAK};
use seedlink_report::types::CostCategory;
use seedlink_report::util::format_number;
use seedlink_report::{produce_report, produce_report_from_str, ReportError};
use serde_json::{json, Value};

fn sample_budget() -> Value {
    json!({
        "farmName": "Rietvlei Farm",
        "productionRegion": "Free State",
        "enterprises": [
            {
                "name": "Maize",
                "type": "crop",
                "unit": "ha",
                "area": 120,
                "expectedYieldPerUnit": 6.5,
                "expectedPrice": 3800,
                "costs": {
                    "seed": [{ "name": "Hybrid seed", "quantity": 1, "unitPrice": 4200, "total": 4200 }],
                    "fertilizer": [
                        { "name": "MAP", "quantity": 0.2, "unitPrice": 12000, "total": 2400 },
                        { "name": "LAN", "quantity": 0.25, "unitPrice": 8000, "total": "2,000" }
                    ],
                    "crop_protection": [{ "name": "Herbicide", "total": 950.5 }]
                }
            },
            {
                "name": "Weaners",
                "type": "livestock",
                "unit": "head",
                "area": 40,
                "expectedYieldPerUnit": 1,
                "expectedPrice": 7500,
                "costs": {
                    "feed": [{ "name": "Lick", "total": 1200 }],
                    "animal_health": [{ "name": "Vaccines", "total": 180 }]
                }
            }
        ],
        "farmTotals": { "totalGrossIncome": 1, "totalVariableCosts": 1 }
    })
}

#[test]
fn worked_example_single_enterprise() {
    let report = produce_report(json!({
        "farmName": "Example",
        "productionRegion": "Overberg",
        "enterprises": [{
            "name": "Wheat",
            "type": "crop",
            "unit": "ha",
            "area": 10,
            "expectedYieldPerUnit": 5,
            "expectedPrice": 20,
            "costs": { "seed": [{ "total": 4 }], "labour": [{ "total": 2 }] }
        }]
    }))
    .unwrap();
    let s = &report.summary;
    let ent = &s.enterprise_summaries[0];
    assert_eq!(ent.gross_income, 1000.0);
    assert_eq!(ent.variable_costs, 60.0);
    assert_eq!(ent.net_income, 940.0);
    assert_eq!(ent.profit_margin, 94.0);
    assert_eq!(commentary(&s.farm_totals).bucket, Bucket::Excellent);
}

#[test]
fn client_totals_are_recomputed() {
    let report = produce_report(sample_budget()).unwrap();
    let t = report.summary.farm_totals;
    // Maize: 120 x 6.5 x 3800, Weaners: 40 x 1 x 7500.
    assert_eq!(t.total_gross_income, 2_964_000.0 + 300_000.0);
    // Maize: 120 x 9550.5, Weaners: 40 x 1380.
    assert_eq!(t.total_variable_costs, 1_146_060.0 + 55_200.0);
    assert_eq!(t.total_net_income, t.total_gross_income - t.total_variable_costs);

    let costs = &report.summary.aggregated_costs;
    assert_eq!(costs[&CostCategory::Fertilizer], 120.0 * 4400.0);
    assert_eq!(costs[&CostCategory::Feed], 40.0 * 1200.0);
    assert_eq!(costs[&CostCategory::Irrigation], 0.0);
}

#[test]
fn document_round_trips_farm_totals() {
    let report = produce_report(sample_budget()).unwrap();
    let extracted = extract_farm_totals(&report.document).unwrap();
    let t = report.summary.farm_totals;
    let two = |v: f64| format_number(v, 2);
    assert_eq!(two(extracted.total_gross_income), two(t.total_gross_income));
    assert_eq!(two(extracted.total_variable_costs), two(t.total_variable_costs));
    assert_eq!(two(extracted.total_net_income), two(t.total_net_income));
    assert_eq!(two(extracted.farm_profit_margin), two(t.farm_profit_margin));
}

#[test]
fn document_pages_follow_enterprises() {
    let report = produce_report(sample_budget()).unwrap();
    let text = String::from_utf8(report.document).unwrap();
    let pages: Vec<&str> = text.split(PAGE_BREAK).collect();
    assert_eq!(pages.len(), 4);
    assert!(pages[1].contains("Maize"));
    assert!(pages[2].contains("Weaners"));
    assert!(pages[2].contains("Costs per head"));
    assert!(pages[3].contains(ADVISORY_DISCLAIMER));
}

#[test]
fn zero_income_budget_gets_only_the_warning() {
    let report = produce_report(json!({
        "farmName": "Dry Year",
        "enterprises": [{
            "name": "Sunflower",
            "area": 50,
            "expectedYieldPerUnit": 0,
            "expectedPrice": 6000,
            "costs": { "seed": [{ "total": 900 }] }
        }]
    }))
    .unwrap();
    let t = report.summary.farm_totals;
    assert_eq!(t.total_gross_income, 0.0);
    assert_eq!(t.farm_profit_margin, 0.0);
    assert_eq!(commentary(&t).text, ZERO_INCOME_WARNING);

    let text = String::from_utf8(report.document).unwrap();
    let last = text.split(PAGE_BREAK).last().unwrap();
    assert!(last.contains(ZERO_INCOME_WARNING));
    assert!(!last.contains(ADVISORY_DISCLAIMER));
}

#[test]
fn empty_enterprises_is_not_an_error() {
    let report = produce_report_from_str(r#"{"farmName":"New","enterprises":[]}"#).unwrap();
    assert!(report.summary.enterprise_summaries.is_empty());
    assert_eq!(report.summary.farm_totals.total_net_income, 0.0);
    assert!(!report.document.is_empty());
}

#[test]
fn structural_faults_fail_fast() {
    let err = produce_report(json!({ "farmName": "X", "enterprises": "none" })).unwrap_err();
    assert!(matches!(err, ReportError::Malformed(_)));
    let err = produce_report(json!({ "productionRegion": "X", "enterprises": [] })).unwrap_err();
    assert!(matches!(err, ReportError::Malformed(_)));
    let err = produce_report(json!({
        "farmName": "X",
        "enterprises": [{ "name": "A", "costs": { "seed": { "total": 2 } } }]
    }))
    .unwrap_err();
    assert!(matches!(err, ReportError::Json(_)));
}

#[test]
fn summary_serializes_for_downstream_consumers() {
    let report = produce_report(sample_budget()).unwrap();
    let value = serde_json::to_value(&report.summary).unwrap();
    assert_eq!(value["farmName"], "Rietvlei Farm");
    assert!(value["farmTotals"]["totalGrossIncome"].is_number());
    assert_eq!(value["enterpriseSummaries"][1]["areaLabel"], "Head");
    assert_eq!(value["aggregatedCosts"].as_object().unwrap().len(), 14);
    assert!(value["aggregatedCosts"]["animal_health"].is_number());
}

#[test]
fn shipped_demo_budget_loads_and_reports() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/farm_budget.json");
    let (budget, load_report) = seedlink_report::loader::load_budget(&path).unwrap();
    assert_eq!(load_report.enterprises, 2);
    assert_eq!(load_report.cost_items, 9);
    assert_eq!(load_report.defaulted_fields, 0);

    let report = seedlink_report::report_for(&budget);
    let t = report.summary.farm_totals;
    assert_eq!(t.total_gross_income, 3_264_000.0);
    assert_eq!(t.total_variable_costs, 1_450_260.0);
    assert_eq!(t.total_net_income, 1_813_740.0);
    assert_eq!(report.summary.aggregated_costs[&CostCategory::Marketing], 15_000.0);

    let extracted = extract_farm_totals(&report.document).unwrap();
    assert_eq!(extracted.total_net_income, 1_813_740.0);
}

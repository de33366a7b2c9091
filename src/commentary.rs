//! Narrative commentary for the closing page of the report.
//!
//! The policy is an ordered table of rules; the first rule whose predicate
//! holds picks the narrative. Threshold changes stay inside [`RULES`].
use crate::types::FarmTotals;
use crate::util::{finite_or_zero, format_currency, format_percent};

pub const ZERO_INCOME_WARNING: &str = "Warning: this budget projects no gross income. \
Check the expected yield and expected price of each enterprise before relying on these figures.";

pub const ADVISORY_DISCLAIMER: &str = "These figures are projections based on the yields, \
prices and variable costs that were entered. Fixed overheads are not included and actual \
results will vary with the season and the market. Discuss major decisions with an advisor.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    ZeroIncome,
    Excellent,
    Good,
    Marginal,
    Loss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commentary {
    pub bucket: Bucket,
    /// Paragraphs separated by a blank line.
    pub text: String,
}

struct Rule {
    bucket: Bucket,
    applies: fn(&FarmTotals) -> bool,
    render: fn(&FarmTotals) -> String,
    /// Terminal rules are printed alone, without the advisory disclaimer.
    terminal: bool,
}

const RULES: &[Rule] = &[
    Rule {
        bucket: Bucket::ZeroIncome,
        applies: no_gross_income,
        render: zero_income_text,
        terminal: true,
    },
    Rule {
        bucket: Bucket::Excellent,
        applies: margin_above_25,
        render: excellent_text,
        terminal: false,
    },
    Rule {
        bucket: Bucket::Good,
        applies: margin_above_10,
        render: good_text,
        terminal: false,
    },
    Rule {
        bucket: Bucket::Marginal,
        applies: margin_above_0,
        render: marginal_text,
        terminal: false,
    },
    Rule {
        bucket: Bucket::Loss,
        applies: always,
        render: loss_text,
        terminal: false,
    },
];

fn no_gross_income(t: &FarmTotals) -> bool {
    finite_or_zero(t.total_gross_income) <= 0.0
}

fn margin_above_25(t: &FarmTotals) -> bool {
    margin(t) > 25.0
}

fn margin_above_10(t: &FarmTotals) -> bool {
    margin(t) > 10.0
}

fn margin_above_0(t: &FarmTotals) -> bool {
    margin(t) > 0.0
}

fn always(_: &FarmTotals) -> bool {
    true
}

fn zero_income_text(_: &FarmTotals) -> String {
    ZERO_INCOME_WARNING.to_string()
}

fn excellent_text(t: &FarmTotals) -> String {
    format!(
        "Excellent outlook. The farm is projected to achieve a profit margin of {} \
         with net income of {} on gross income of {}. Variable costs are well covered.",
        format_percent(margin(t), 1),
        format_currency(t.total_net_income),
        format_currency(t.total_gross_income),
    )
}

fn good_text(t: &FarmTotals) -> String {
    format!(
        "Good outlook. The projected profit margin of {} leaves net income of {}. \
         Review the largest cost categories for further savings.",
        format_percent(margin(t), 1),
        format_currency(t.total_net_income),
    )
}

fn marginal_text(t: &FarmTotals) -> String {
    format!(
        "Marginal outlook. A profit margin of {} (net income {}) leaves little room \
         for lower yields or prices. Consider reducing variable costs of {}.",
        format_percent(margin(t), 1),
        format_currency(t.total_net_income),
        format_currency(t.total_variable_costs),
    )
}

fn loss_text(t: &FarmTotals) -> String {
    format!(
        "Warning: the budget projects a loss. Variable costs of {} against gross income \
         of {} give a net result of {} and a profit margin of {}. Revisit the enterprise \
         mix, expected prices and input costs.",
        format_currency(t.total_variable_costs),
        format_currency(t.total_gross_income),
        format_currency(t.total_net_income),
        format_percent(margin(t), 1),
    )
}

fn margin(t: &FarmTotals) -> f64 {
    finite_or_zero(t.farm_profit_margin)
}

/// Select and render the narrative for `totals`.
pub fn commentary(totals: &FarmTotals) -> Commentary {
    // The final rule always applies, so the table is exhaustive.
    let rule = RULES
        .iter()
        .find(|rule| (rule.applies)(totals))
        .unwrap_or(&RULES[RULES.len() - 1]);
    let mut text = (rule.render)(totals);
    if !rule.terminal {
        text.push_str("\n\n");
        text.push_str(ADVISORY_DISCLAIMER);
    }
    Commentary {
        bucket: rule.bucket,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn totals(gross: f64, margin: f64) -> FarmTotals {
        let net = gross * margin / 100.0;
        FarmTotals {
            total_variable_costs: gross - net,
            total_gross_income: gross,
            total_net_income: net,
            farm_profit_margin: margin,
        }
    }

    #[test]
    fn buckets_by_margin() {
        assert_eq!(commentary(&totals(1000.0, 94.0)).bucket, Bucket::Excellent);
        assert_eq!(commentary(&totals(1000.0, 18.0)).bucket, Bucket::Good);
        assert_eq!(commentary(&totals(1000.0, 4.0)).bucket, Bucket::Marginal);
        assert_eq!(commentary(&totals(1000.0, -12.0)).bucket, Bucket::Loss);
    }

    #[test]
    fn boundaries_fall_into_lower_bucket() {
        assert_eq!(commentary(&totals(1000.0, 25.0)).bucket, Bucket::Good);
        assert_eq!(commentary(&totals(1000.0, 10.0)).bucket, Bucket::Marginal);
        assert_eq!(commentary(&totals(1000.0, 0.0)).bucket, Bucket::Loss);
    }

    #[test]
    fn zero_income_is_exactly_the_warning() {
        let c = commentary(&totals(0.0, 80.0));
        assert_eq!(c.bucket, Bucket::ZeroIncome);
        assert_eq!(c.text, ZERO_INCOME_WARNING);

        let negative = commentary(&totals(-50.0, 40.0));
        assert_eq!(negative.text, ZERO_INCOME_WARNING);
    }

    #[test]
    fn disclaimer_follows_non_terminal_buckets() {
        let c = commentary(&totals(1000.0, 94.0));
        assert!(c.text.ends_with(ADVISORY_DISCLAIMER));
        assert!(c.text.contains("94.0%"), "{}", c.text);
        assert!(c.text.contains("R 940.00"), "{}", c.text);
    }

    #[test]
    fn loss_text_reports_figures() {
        let t = FarmTotals {
            total_variable_costs: 1500.0,
            total_gross_income: 1000.0,
            total_net_income: -500.0,
            farm_profit_margin: -50.0,
        };
        let c = commentary(&t);
        assert_eq!(c.bucket, Bucket::Loss);
        assert!(c.text.contains("-R 500.00"), "{}", c.text);
        assert!(c.text.contains("-50.0%"), "{}", c.text);
    }

    #[test]
    fn non_finite_margin_is_treated_as_zero() {
        assert_eq!(commentary(&totals(1000.0, f64::NAN)).bucket, Bucket::Loss);
    }

    proptest! {
        #[test]
        fn prop_selection_is_deterministic(gross in -1e6f64..1e6, margin in -200f64..200.0) {
            let t = totals(gross, margin);
            let first = commentary(&t);
            prop_assert_eq!(&first, &commentary(&t));
            let expected = if gross <= 0.0 {
                Bucket::ZeroIncome
            } else if margin > 25.0 {
                Bucket::Excellent
            } else if margin > 10.0 {
                Bucket::Good
            } else if margin > 0.0 {
                Bucket::Marginal
            } else {
                Bucket::Loss
            };
            prop_assert_eq!(first.bucket, expected);
        }
    }
}

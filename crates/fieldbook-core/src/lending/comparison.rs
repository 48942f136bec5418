use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::lending::calendar::add_months;
use crate::lending::payoff::{self, default_max_months, PayoffInput, SimulationResult};
use crate::types::*;
use crate::FieldbookResult;

/// Inputs for comparing a baseline payment against baseline + extra.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanComparisonInput {
    pub principal: Money,
    pub apr_percent: Decimal,
    pub payment: Money,
    /// First month of the loan; payoff dates are projected from here.
    pub start_date: NaiveDate,
    /// Extra monthly payment applied in scenario B only
    #[serde(default)]
    pub extra_payment: Money,
    #[serde(default = "default_max_months")]
    pub max_months: u32,
}

/// One side of the comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub label: String,
    pub monthly_payment: Money,
    pub result: SimulationResult,
    /// Only set when the scenario pays off
    pub payoff_date: Option<NaiveDate>,
}

/// What scenario B saves relative to scenario A.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffSavings {
    pub months_saved: i64,
    pub interest_saved: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanComparisonOutput {
    pub scenario_a: ScenarioReport,
    pub scenario_b: ScenarioReport,
    /// None unless both scenarios pay off
    pub savings: Option<PayoffSavings>,
}

/// Run scenario A (no extra payment) and scenario B (with extra payment)
/// and report the months and interest saved when both pay off.
pub fn compare_scenarios(
    input: &LoanComparisonInput,
) -> FieldbookResult<ComputationOutput<LoanComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let scenario_a = run_scenario(input, "A: no extra payment", Decimal::ZERO)?;
    let scenario_b = run_scenario(input, "B: with extra payment", input.extra_payment)?;

    for scenario in [&scenario_a, &scenario_b] {
        if let Some(reason) = &scenario.result.reason {
            warnings.push(format!("Scenario {} not paid off: {}", scenario.label, reason));
        }
    }

    let savings = savings_between(&scenario_a.result, &scenario_b.result);
    if savings.is_none() {
        warnings.push("Savings not computed: both scenarios must pay off".into());
    }

    let output = LoanComparisonOutput {
        scenario_a,
        scenario_b,
        savings,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Two-scenario Loan Payoff Comparison",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "apr_percent": input.apr_percent.to_string(),
            "payment": input.payment.to_string(),
            "extra_payment": input.extra_payment.to_string(),
            "start_date": input.start_date.to_string(),
            "max_months": input.max_months,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Months and interest saved going from `baseline` to `accelerated`.
/// Returns None unless both results are paid off.
pub fn savings_between(
    baseline: &SimulationResult,
    accelerated: &SimulationResult,
) -> Option<PayoffSavings> {
    if !(baseline.paid_off && accelerated.paid_off) {
        return None;
    }
    let months_saved = i64::from(baseline.months?) - i64::from(accelerated.months?);
    let interest_saved = baseline.total_interest? - accelerated.total_interest?;
    Some(PayoffSavings {
        months_saved,
        interest_saved,
    })
}

fn run_scenario(
    input: &LoanComparisonInput,
    label: &str,
    extra_payment: Money,
) -> FieldbookResult<ScenarioReport> {
    let result = payoff::simulate(&PayoffInput {
        principal: input.principal,
        apr_percent: input.apr_percent,
        payment: input.payment,
        extra_payment,
        max_months: input.max_months,
        record_schedule: false,
    })?;

    let payoff_date = match (result.paid_off, result.months) {
        (true, Some(months)) => Some(add_months(input.start_date, months)?),
        _ => None,
    };

    // simulate() has already rejected a payment sum outside the decimal range
    let monthly_payment = input
        .payment
        .checked_add(extra_payment)
        .unwrap_or(Decimal::MAX);

    Ok(ScenarioReport {
        label: label.to_string(),
        monthly_payment,
        result,
        payoff_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(extra: Decimal) -> LoanComparisonInput {
        LoanComparisonInput {
            principal: dec!(10000),
            apr_percent: dec!(12),
            payment: dec!(300),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            extra_payment: extra,
            max_months: 1200,
        }
    }

    #[test]
    fn test_extra_payment_saves_time_and_interest() {
        let out = compare_scenarios(&input(dec!(200))).unwrap().result;
        let savings = out.savings.unwrap();
        assert!(savings.months_saved > 0);
        assert!(savings.interest_saved > Decimal::ZERO);
        assert_eq!(out.scenario_a.monthly_payment, dec!(300));
        assert_eq!(out.scenario_b.monthly_payment, dec!(500));
    }

    #[test]
    fn test_payoff_date_clamped_to_month_end() {
        let out = compare_scenarios(&input(dec!(200))).unwrap().result;
        // 41 months after 2025-01-31 is June 2028, which has 30 days
        assert_eq!(out.scenario_a.result.months, Some(41));
        assert_eq!(
            out.scenario_a.payoff_date,
            NaiveDate::from_ymd_opt(2028, 6, 30)
        );
    }

    #[test]
    fn test_zero_extra_saves_nothing() {
        let out = compare_scenarios(&input(Decimal::ZERO)).unwrap().result;
        let savings = out.savings.unwrap();
        assert_eq!(savings.months_saved, 0);
        assert_eq!(savings.interest_saved, Decimal::ZERO);
    }

    #[test]
    fn test_failed_scenario_suppresses_savings() {
        let mut inp = input(dec!(500));
        inp.payment = dec!(50);
        let output = compare_scenarios(&inp).unwrap();
        let out = output.result;
        assert!(!out.scenario_a.result.paid_off);
        assert!(out.scenario_a.payoff_date.is_none());
        assert!(out.scenario_b.result.paid_off);
        assert!(out.savings.is_none());
        assert!(output
            .warnings
            .iter()
            .any(|w| w.contains("too small to cover monthly interest")));
    }

    #[test]
    fn test_oversized_extra_payment_is_error() {
        let mut inp = input(Decimal::MAX);
        inp.payment = Decimal::MAX;
        assert!(matches!(
            compare_scenarios(&inp),
            Err(crate::FieldbookError::InvalidInput { .. })
        ));
    }
}

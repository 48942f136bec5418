use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FieldbookError;
use crate::lending::comparison::savings_between;
use crate::lending::payoff::{self, default_max_months, PayoffInput};
use crate::types::*;
use crate::FieldbookResult;

const MAX_SWEEP_POINTS: usize = 1000;

/// Sweep of extra monthly payments over `[min_extra, max_extra]` by `step`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraPaymentSweepInput {
    pub principal: Money,
    pub apr_percent: Decimal,
    pub payment: Money,
    pub min_extra: Money,
    pub max_extra: Money,
    pub step: Money,
    #[serde(default = "default_max_months")]
    pub max_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRow {
    pub extra_payment: Money,
    pub status: String,
    pub months: Option<u32>,
    pub total_interest: Option<Money>,
    /// Relative to paying no extra; None if either side fails to pay off
    pub months_saved: Option<i64>,
    pub interest_saved: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraPaymentSweepOutput {
    pub baseline_status: String,
    pub rows: Vec<SweepRow>,
}

/// Run the payoff simulation once per extra-payment level and tabulate the
/// months and interest saved against the no-extra baseline.
pub fn sweep_extra_payments(
    input: &ExtraPaymentSweepInput,
) -> FieldbookResult<ComputationOutput<ExtraPaymentSweepOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let levels = extra_levels(input)?;

    let simulate_with = |extra_payment: Money| {
        payoff::simulate(&PayoffInput {
            principal: input.principal,
            apr_percent: input.apr_percent,
            payment: input.payment,
            extra_payment,
            max_months: input.max_months,
            record_schedule: false,
        })
    };

    let baseline = simulate_with(Decimal::ZERO)?;
    if let Some(reason) = &baseline.reason {
        warnings.push(format!("Baseline not paid off, savings omitted: {reason}"));
    }

    let mut rows = Vec::with_capacity(levels.len());
    for extra in levels {
        let result = simulate_with(extra)?;
        let savings = savings_between(&baseline, &result);
        rows.push(SweepRow {
            extra_payment: extra,
            status: result.outcome.tag().to_string(),
            months: result.months,
            total_interest: result.total_interest,
            months_saved: savings.as_ref().map(|s| s.months_saved),
            interest_saved: savings.map(|s| s.interest_saved),
        });
    }

    let output = ExtraPaymentSweepOutput {
        baseline_status: baseline.outcome.tag().to_string(),
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Extra Payment Sensitivity Sweep",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "apr_percent": input.apr_percent.to_string(),
            "payment": input.payment.to_string(),
            "min_extra": input.min_extra.to_string(),
            "max_extra": input.max_extra.to_string(),
            "step": input.step.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn extra_levels(input: &ExtraPaymentSweepInput) -> FieldbookResult<Vec<Money>> {
    if input.step <= Decimal::ZERO {
        return Err(FieldbookError::InvalidInput {
            field: "step".into(),
            reason: "Step must be positive".into(),
        });
    }
    if input.min_extra < Decimal::ZERO {
        return Err(FieldbookError::InvalidInput {
            field: "min_extra".into(),
            reason: "Extra payment range cannot start below zero".into(),
        });
    }
    if input.min_extra > input.max_extra {
        return Err(FieldbookError::InvalidInput {
            field: "max_extra".into(),
            reason: "max_extra must be at least min_extra".into(),
        });
    }

    let mut levels = Vec::new();
    let mut current = input.min_extra;
    while current <= input.max_extra {
        if levels.len() == MAX_SWEEP_POINTS {
            return Err(FieldbookError::InvalidInput {
                field: "step".into(),
                reason: format!("Sweep would exceed {MAX_SWEEP_POINTS} points"),
            });
        }
        levels.push(current);
        // Nothing lies past Decimal::MAX, so an overflowing step ends the range.
        match current.checked_add(input.step) {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sweep_input() -> ExtraPaymentSweepInput {
        ExtraPaymentSweepInput {
            principal: dec!(10000),
            apr_percent: dec!(12),
            payment: dec!(300),
            min_extra: Decimal::ZERO,
            max_extra: dec!(500),
            step: dec!(100),
            max_months: 1200,
        }
    }

    #[test]
    fn test_sweep_inclusive_range() {
        let out = sweep_extra_payments(&sweep_input()).unwrap().result;
        let extras: Vec<Money> = out.rows.iter().map(|r| r.extra_payment).collect();
        assert_eq!(
            extras,
            vec![dec!(0), dec!(100), dec!(200), dec!(300), dec!(400), dec!(500)]
        );
        assert_eq!(out.baseline_status, "paid_off");
        assert_eq!(out.rows[0].months_saved, Some(0));
    }

    #[test]
    fn test_sweep_savings_grow_with_extra() {
        let out = sweep_extra_payments(&sweep_input()).unwrap().result;
        for pair in out.rows.windows(2) {
            assert!(pair[1].months.unwrap() <= pair[0].months.unwrap());
            assert!(pair[1].interest_saved.unwrap() >= pair[0].interest_saved.unwrap());
        }
    }

    #[test]
    fn test_sweep_failed_baseline_has_no_savings() {
        let mut input = sweep_input();
        input.payment = dec!(50);
        input.min_extra = dec!(100);
        let output = sweep_extra_payments(&input).unwrap();
        assert_eq!(output.result.baseline_status, "payment_too_small");
        assert!(output.result.rows.iter().all(|r| r.interest_saved.is_none()));
        assert!(!output.warnings.is_empty());
    }

    #[test]
    fn test_sweep_rejects_bad_ranges() {
        let mut input = sweep_input();
        input.step = Decimal::ZERO;
        assert!(sweep_extra_payments(&input).is_err());

        let mut input = sweep_input();
        input.min_extra = dec!(600);
        assert!(sweep_extra_payments(&input).is_err());

        let mut input = sweep_input();
        input.step = dec!(0.1);
        assert!(sweep_extra_payments(&input).is_err());
    }

    #[test]
    fn test_levels_stop_at_decimal_max() {
        let mut input = sweep_input();
        input.min_extra = Decimal::MAX - Decimal::ONE;
        input.max_extra = Decimal::MAX;
        input.step = Decimal::ONE;
        assert_eq!(
            extra_levels(&input).unwrap(),
            vec![Decimal::MAX - Decimal::ONE, Decimal::MAX]
        );
    }

    #[test]
    fn test_sweep_with_huge_extra_is_error() {
        let mut input = sweep_input();
        input.payment = Decimal::MAX;
        input.min_extra = Decimal::MAX;
        input.max_extra = Decimal::MAX;
        assert!(matches!(
            sweep_extra_payments(&input),
            Err(FieldbookError::InvalidInput { .. })
        ));
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FieldbookError;
use crate::types::*;
use crate::FieldbookResult;

/// Month cap applied when the caller does not supply one (100 years).
pub const DEFAULT_MAX_MONTHS: u32 = 1200;

pub(crate) fn default_max_months() -> u32 {
    DEFAULT_MAX_MONTHS
}

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Input for a single payoff simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffInput {
    pub principal: Money,
    /// Annual percentage rate as a percentage (14.54 = 14.54%)
    pub apr_percent: Decimal,
    /// Base monthly payment
    pub payment: Money,
    #[serde(default)]
    pub extra_payment: Money,
    #[serde(default = "default_max_months")]
    pub max_months: u32,
    /// Keep a month-by-month schedule in the result
    #[serde(default)]
    pub record_schedule: bool,
}

/// How a simulation ended. Only `PaidOff` carries meaningful totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PayoffOutcome {
    PaidOff,
    /// payment + extra was zero or negative
    PaymentNonPositive { payment: Money },
    /// payment + extra does not exceed the first month's interest
    PaymentTooSmall {
        payment: Money,
        first_month_interest: Money,
    },
    /// The month cap was hit with a positive balance left
    MonthLimitReached {
        max_months: u32,
        remaining_balance: Money,
    },
}

impl PayoffOutcome {
    pub fn is_paid_off(&self) -> bool {
        matches!(self, PayoffOutcome::PaidOff)
    }

    /// Stable snake_case tag, matching the serialized `status` field.
    pub fn tag(&self) -> &'static str {
        match self {
            PayoffOutcome::PaidOff => "paid_off",
            PayoffOutcome::PaymentNonPositive { .. } => "payment_non_positive",
            PayoffOutcome::PaymentTooSmall { .. } => "payment_too_small",
            PayoffOutcome::MonthLimitReached { .. } => "month_limit_reached",
        }
    }

    /// Human-readable explanation of the outcome.
    pub fn message(&self) -> String {
        match self {
            PayoffOutcome::PaidOff => "Loan paid off.".to_string(),
            PayoffOutcome::PaymentNonPositive { payment } => format!(
                "Monthly payment must be greater than 0 (got {}).",
                payment.round_dp(2)
            ),
            PayoffOutcome::PaymentTooSmall {
                payment,
                first_month_interest,
            } => format!(
                "Payment too small to cover monthly interest (loan will grow): \
                 {} per month vs {} interest in the first month.",
                payment.round_dp(2),
                first_month_interest.round_dp(2)
            ),
            PayoffOutcome::MonthLimitReached {
                max_months,
                remaining_balance,
            } => format!(
                "Hit max_months limit of {max_months} with {} still owed (check inputs).",
                remaining_balance.round_dp(2)
            ),
        }
    }
}

/// One simulated month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffMonth {
    pub month: u32,
    pub opening_balance: Money,
    pub interest: Money,
    pub payment: Money,
    pub closing_balance: Money,
}

/// Result of a payoff simulation.
///
/// `months`, `total_interest` and `total_paid` are `None` when the simulation
/// was rejected before the first month. For `MonthLimitReached` they hold the
/// totals accumulated up to the cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub outcome: PayoffOutcome,
    pub paid_off: bool,
    pub months: Option<u32>,
    pub total_interest: Option<Money>,
    pub total_paid: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<PayoffMonth>,
}

impl SimulationResult {
    fn rejected(outcome: PayoffOutcome) -> Self {
        SimulationResult {
            reason: Some(outcome.message()),
            paid_off: false,
            outcome,
            months: None,
            total_interest: None,
            total_paid: None,
            schedule: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loan state
// ---------------------------------------------------------------------------

/// Running state of a loan while it is being paid down.
#[derive(Debug, Clone)]
pub struct LoanState {
    pub balance: Money,
    pub monthly_rate: Rate,
    pub months: u32,
    pub total_interest: Money,
    pub total_paid: Money,
}

impl LoanState {
    pub fn new(principal: Money, apr_percent: Decimal) -> Self {
        LoanState {
            balance: principal,
            monthly_rate: monthly_rate(apr_percent),
            months: 0,
            total_interest: Decimal::ZERO,
            total_paid: Decimal::ZERO,
        }
    }

    /// Accrue one month of interest, then pay up to `scheduled_payment`.
    ///
    /// The payment is capped at the post-interest balance, so the balance
    /// lands on exactly zero in the final month and never goes below it.
    /// Fails with `InvalidInput` if a running total overflows `Decimal`.
    pub fn advance_month(&mut self, scheduled_payment: Money) -> FieldbookResult<PayoffMonth> {
        let opening_balance = self.balance;

        let interest = self
            .balance
            .checked_mul(self.monthly_rate)
            .ok_or_else(|| overflow("principal"))?;
        let total_interest = self
            .total_interest
            .checked_add(interest)
            .ok_or_else(|| overflow("principal"))?;
        let accrued = self
            .balance
            .checked_add(interest)
            .ok_or_else(|| overflow("principal"))?;

        let payment = scheduled_payment.min(accrued);
        let total_paid = self
            .total_paid
            .checked_add(payment)
            .ok_or_else(|| overflow("payment"))?;

        self.total_interest = total_interest;
        self.balance = accrued - payment;
        self.total_paid = total_paid;
        self.months += 1;

        debug_assert!(self.balance >= Decimal::ZERO);

        Ok(PayoffMonth {
            month: self.months,
            opening_balance,
            interest,
            payment,
            closing_balance: self.balance,
        })
    }

    pub fn is_paid_off(&self) -> bool {
        self.balance <= Decimal::ZERO
    }
}

fn overflow(field: &str) -> FieldbookError {
    FieldbookError::InvalidInput {
        field: field.into(),
        reason: "Amount too large to simulate (exceeds decimal range)".into(),
    }
}

/// Convert an APR percentage into a monthly decimal rate: APR / 100 / 12.
pub fn monthly_rate(apr_percent: Decimal) -> Rate {
    apr_percent / dec!(100) / dec!(12)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the month-by-month payoff simulation without the metadata envelope.
///
/// Invalid inputs (non-positive principal, negative APR, zero month cap) are
/// errors. Payments that can never retire the loan are reported through
/// [`PayoffOutcome`] instead.
pub fn simulate(input: &PayoffInput) -> FieldbookResult<SimulationResult> {
    validate_input(input)?;

    let scheduled = input
        .payment
        .checked_add(input.extra_payment)
        .ok_or_else(|| overflow("payment"))?;
    if scheduled <= Decimal::ZERO {
        tracing::debug!(payment = %scheduled, "rejected non-positive payment");
        return Ok(SimulationResult::rejected(
            PayoffOutcome::PaymentNonPositive { payment: scheduled },
        ));
    }

    let mut state = LoanState::new(input.principal, input.apr_percent);

    // A payment at or below interest-only never touches principal, so the
    // loop would only stop at the cap.
    let first_month_interest = state
        .balance
        .checked_mul(state.monthly_rate)
        .ok_or_else(|| overflow("principal"))?;
    if scheduled <= first_month_interest {
        tracing::debug!(
            payment = %scheduled,
            first_month_interest = %first_month_interest,
            "rejected payment below first-month interest"
        );
        return Ok(SimulationResult::rejected(PayoffOutcome::PaymentTooSmall {
            payment: scheduled,
            first_month_interest,
        }));
    }

    let mut schedule = Vec::new();
    while !state.is_paid_off() && state.months < input.max_months {
        let month = state.advance_month(scheduled)?;
        if input.record_schedule {
            schedule.push(month);
        }
    }

    let outcome = if state.is_paid_off() {
        PayoffOutcome::PaidOff
    } else {
        PayoffOutcome::MonthLimitReached {
            max_months: input.max_months,
            remaining_balance: state.balance,
        }
    };

    tracing::debug!(
        outcome = outcome.tag(),
        months = state.months,
        total_interest = %state.total_interest,
        "payoff simulation finished"
    );

    let paid_off = outcome.is_paid_off();
    Ok(SimulationResult {
        reason: if paid_off { None } else { Some(outcome.message()) },
        paid_off,
        outcome,
        months: Some(state.months),
        total_interest: Some(state.total_interest),
        total_paid: Some(state.total_paid),
        schedule,
    })
}

/// Simulate paying off a loan with a fixed monthly payment (plus optional
/// extra), reporting months to payoff, total interest and total paid.
pub fn simulate_payoff(
    input: &PayoffInput,
) -> FieldbookResult<ComputationOutput<SimulationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.extra_payment < Decimal::ZERO {
        warnings.push(format!(
            "Negative extra payment {} reduces the monthly payment",
            input.extra_payment
        ));
    }

    let result = simulate(input)?;
    if !result.paid_off {
        warnings.push(result.outcome.message());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly Amortisation Payoff Simulation",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "apr_percent": input.apr_percent.to_string(),
            "monthly_rate": monthly_rate(input.apr_percent).to_string(),
            "payment": input.payment.to_string(),
            "extra_payment": input.extra_payment.to_string(),
            "max_months": input.max_months,
            "interest": "Compounded monthly on the outstanding balance before payment",
        }),
        warnings,
        elapsed,
        result,
    ))
}

fn validate_input(input: &PayoffInput) -> FieldbookResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(FieldbookError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if input.apr_percent < Decimal::ZERO {
        return Err(FieldbookError::InvalidInput {
            field: "apr_percent".into(),
            reason: "APR cannot be negative".into(),
        });
    }
    if input.max_months == 0 {
        return Err(FieldbookError::InvalidInput {
            field: "max_months".into(),
            reason: "Month limit must be at least 1".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_input() -> PayoffInput {
        PayoffInput {
            principal: dec!(10000),
            apr_percent: dec!(12),
            payment: dec!(300),
            extra_payment: Decimal::ZERO,
            max_months: DEFAULT_MAX_MONTHS,
            record_schedule: false,
        }
    }

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(dec!(24)), dec!(0.02));
    }

    #[test]
    fn test_pays_off() {
        let result = simulate(&base_input()).unwrap();
        assert_eq!(result.outcome, PayoffOutcome::PaidOff);
        assert!(result.paid_off);
        assert!(result.reason.is_none());
        // 10k at 1%/month with 300/month amortises in 41 months
        assert_eq!(result.months, Some(41));
        let interest = result.total_interest.unwrap();
        let paid = result.total_paid.unwrap();
        assert!((paid - (dec!(10000) + interest)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_zero_apr_is_straight_division() {
        let mut input = base_input();
        input.apr_percent = Decimal::ZERO;
        input.principal = dec!(1000);
        input.payment = dec!(300);
        let result = simulate(&input).unwrap();
        assert_eq!(result.months, Some(4));
        assert_eq!(result.total_interest, Some(Decimal::ZERO));
        assert_eq!(result.total_paid, Some(dec!(1000)));
    }

    #[test]
    fn test_final_payment_clamped_to_balance() {
        let mut input = base_input();
        input.record_schedule = true;
        let result = simulate(&input).unwrap();
        let last = result.schedule.last().unwrap();
        assert_eq!(last.closing_balance, Decimal::ZERO);
        assert!(last.payment < dec!(300));
        assert!(result.schedule.iter().all(|m| m.closing_balance >= Decimal::ZERO));
        assert_eq!(result.schedule.len() as u32, result.months.unwrap());
    }

    #[test]
    fn test_schedule_omitted_by_default() {
        let result = simulate(&base_input()).unwrap();
        assert!(result.schedule.is_empty());
    }

    #[test]
    fn test_payment_non_positive() {
        let mut input = base_input();
        input.payment = Decimal::ZERO;
        let result = simulate(&input).unwrap();
        assert_eq!(
            result.outcome,
            PayoffOutcome::PaymentNonPositive {
                payment: Decimal::ZERO
            }
        );
        assert!(result.months.is_none());
        assert!(result.total_interest.is_none());
        assert!(result.reason.unwrap().contains("greater than 0"));
    }

    #[test]
    fn test_negative_extra_cancels_payment() {
        let mut input = base_input();
        input.extra_payment = dec!(-300);
        let result = simulate(&input).unwrap();
        assert_eq!(result.outcome.tag(), "payment_non_positive");
    }

    #[test]
    fn test_payment_equal_to_interest_is_too_small() {
        let mut input = base_input();
        input.payment = dec!(100); // exactly 1% of 10k
        let result = simulate(&input).unwrap();
        assert_eq!(
            result.outcome,
            PayoffOutcome::PaymentTooSmall {
                payment: dec!(100),
                first_month_interest: dec!(100),
            }
        );
        assert!(!result.paid_off);
        assert!(result.months.is_none());
    }

    #[test]
    fn test_month_limit_reached_keeps_totals() {
        let mut input = base_input();
        input.max_months = 12;
        let result = simulate(&input).unwrap();
        assert_eq!(result.months, Some(12));
        assert_eq!(result.total_paid, Some(dec!(3600)));
        match result.outcome {
            PayoffOutcome::MonthLimitReached {
                max_months,
                remaining_balance,
            } => {
                assert_eq!(max_months, 12);
                assert!(remaining_balance > Decimal::ZERO);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(result.reason.unwrap().contains("max_months"));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut input = base_input();
        input.principal = Decimal::ZERO;
        assert!(simulate(&input).is_err());

        let mut input = base_input();
        input.apr_percent = dec!(-1);
        assert!(simulate(&input).is_err());

        let mut input = base_input();
        input.max_months = 0;
        assert!(simulate(&input).is_err());
    }

    #[test]
    fn test_balance_near_decimal_max_is_error_not_panic() {
        let mut input = base_input();
        input.principal = Decimal::MAX - Decimal::ONE;
        input.payment = Decimal::MAX / dec!(2);
        let err = simulate(&input).unwrap_err();
        assert!(matches!(
            err,
            FieldbookError::InvalidInput { ref field, .. } if field == "principal"
        ));
    }

    #[test]
    fn test_payment_plus_extra_overflow_is_error() {
        let mut input = base_input();
        input.principal = dec!(1000);
        input.payment = Decimal::MAX;
        input.extra_payment = Decimal::MAX;
        let err = simulate(&input).unwrap_err();
        assert!(matches!(
            err,
            FieldbookError::InvalidInput { ref field, .. } if field == "payment"
        ));
    }

    #[test]
    fn test_advance_month_overflow_leaves_state_untouched() {
        let mut state = LoanState::new(Decimal::MAX, dec!(12));
        assert!(state.advance_month(dec!(1)).is_err());
        assert_eq!(state.balance, Decimal::MAX);
        assert_eq!(state.months, 0);
    }

    #[test]
    fn test_envelope_warns_on_failure() {
        let mut input = base_input();
        input.payment = dec!(50);
        let output = simulate_payoff(&input).unwrap();
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("too small"));
        assert_eq!(output.methodology, "Monthly Amortisation Payoff Simulation");
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = PayoffOutcome::PaymentTooSmall {
            payment: dec!(10),
            first_month_interest: dec!(20),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "payment_too_small");
    }
}

//! Amortizing loan engine: fixed-payment installment schedules with
//! optional recurring prepayment, early payoff, and a hard iteration
//! ceiling. The per-period step is shared with the mortgage engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use crate::arithmetic::{is_effectively_zero, round_to_precision, safe_divide, safe_power};
use crate::normalize::{normalize_field, sanitize};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, MAX_SCHEDULE_PERIODS};

/// Balance below this is considered fully paid.
const BALANCE_EPSILON: f64 = 0.01;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Amortizing loan input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    /// Amount borrowed.
    pub principal: Money,
    /// Annual interest rate as a percentage (8.5 = 8.5%/year).
    #[serde(alias = "rate")]
    pub annual_rate_pct: Rate,
    /// Term in years. Fractional terms round to whole months.
    #[serde(alias = "years")]
    pub term_years: f64,
    /// Recurring extra principal paid every month on top of the installment.
    #[serde(default, alias = "extra")]
    pub extra_monthly_payment: Money,
}

impl LoanInput {
    /// Build an input from a raw mapping, normalizing each field. Missing
    /// or unparseable fields become zero.
    pub fn from_raw(raw: &Value) -> Self {
        LoanInput {
            principal: normalize_field(raw, &["principal"]),
            annual_rate_pct: normalize_field(raw, &["annual_rate_pct", "rate"]),
            term_years: normalize_field(raw, &["term_years", "years"]),
            extra_monthly_payment: normalize_field(raw, &["extra_monthly_payment", "extra"]),
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Why a schedule stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleTermination {
    /// Balance reached zero.
    #[default]
    PaidOff,
    /// The full term elapsed with a residual balance (payment too small to
    /// amortize).
    TermEnded,
    /// The hard iteration ceiling cut the simulation short of the term.
    CeilingReached,
}

/// One period of an amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentScheduleEntry {
    /// 1-based period number.
    pub period_index: u32,
    /// Principal-and-interest actually paid this period (equals the fixed
    /// installment except in the final period).
    pub scheduled_payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    /// Extra principal applied after the scheduled portion.
    pub extra_principal: Money,
    pub ending_balance: Money,
    pub cumulative_interest: Money,
}

/// Aggregate loan result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanResult {
    /// Fixed monthly installment.
    pub periodic_payment: Money,
    /// Total of all payments made, extra principal included.
    pub total_paid: Money,
    pub total_interest: Money,
    /// Number of periods until the schedule stopped.
    pub payoff_periods: u32,
    /// Interest avoided relative to the same loan with no extra payment.
    pub interest_saved: Money,
    pub termination: ScheduleTermination,
    pub schedule: Vec<PaymentScheduleEntry>,
}

// ---------------------------------------------------------------------------
// Shared amortization steps
// ---------------------------------------------------------------------------

/// Raw, unrounded simulation output shared with the mortgage engine.
pub(crate) struct AmortizationRun {
    pub payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
    pub termination: ScheduleTermination,
    pub schedule: Vec<PaymentScheduleEntry>,
}

/// Fixed installment from the standard annuity formula
/// `P·r·(1+r)^n / ((1+r)^n − 1)`; straight-line `P/n` when the rate is
/// effectively zero.
pub(crate) fn periodic_payment(principal: f64, monthly_rate: f64, periods: u32) -> f64 {
    if periods == 0 {
        return 0.0;
    }
    if is_effectively_zero(monthly_rate) {
        return safe_divide(principal, periods as f64, 0.0);
    }
    let factor = safe_power(1.0 + monthly_rate, periods as f64);
    safe_divide(principal * monthly_rate * factor, factor - 1.0, 0.0)
}

/// Period-by-period amortization. Runs until the balance is paid off or
/// `term_periods` elapse, but never past `ceiling`.
pub(crate) fn simulate_schedule(
    principal: f64,
    monthly_rate: f64,
    term_periods: u32,
    extra_payment: f64,
    ceiling: u32,
) -> AmortizationRun {
    let payment = periodic_payment(principal, monthly_rate, term_periods);
    let cap = term_periods.min(ceiling);

    let mut schedule = Vec::with_capacity(cap as usize);
    let mut balance = principal;
    let mut cumulative_interest = 0.0;
    let mut total_paid = 0.0;
    let mut paid_off = false;

    for period in 1..=cap {
        let interest = balance * monthly_rate;
        let mut principal_portion = payment - interest;
        if principal_portion > balance {
            principal_portion = balance;
        }

        // Extra principal applies to whatever remains after the scheduled
        // portion, never more.
        let after_scheduled = balance - principal_portion;
        let extra = extra_payment.min(after_scheduled).max(0.0);

        balance = after_scheduled - extra;
        cumulative_interest += interest;
        let paid_this_period = interest + principal_portion + extra;
        total_paid += paid_this_period;

        schedule.push(PaymentScheduleEntry {
            period_index: period,
            scheduled_payment: round_to_precision(interest + principal_portion, 2),
            principal_portion: round_to_precision(principal_portion, 2),
            interest_portion: round_to_precision(interest, 2),
            extra_principal: round_to_precision(extra, 2),
            ending_balance: round_to_precision(balance.max(0.0), 2),
            cumulative_interest: round_to_precision(cumulative_interest, 2),
        });

        if balance < BALANCE_EPSILON {
            paid_off = true;
            break;
        }
    }

    let termination = if paid_off {
        ScheduleTermination::PaidOff
    } else if cap < term_periods {
        ScheduleTermination::CeilingReached
    } else {
        ScheduleTermination::TermEnded
    };

    AmortizationRun {
        payment,
        total_paid,
        total_interest: cumulative_interest,
        termination,
        schedule,
    }
}

/// Round a raw run into the public result shape.
pub(crate) fn finish_run(run: AmortizationRun, interest_saved: f64) -> LoanResult {
    LoanResult {
        periodic_payment: round_to_precision(run.payment, 2),
        total_paid: round_to_precision(run.total_paid, 2),
        total_interest: round_to_precision(run.total_interest, 2),
        payoff_periods: run.schedule.len() as u32,
        interest_saved: round_to_precision(interest_saved, 2),
        termination: run.termination,
        schedule: run.schedule,
    }
}

/// Push a warning describing a schedule that did not pay off.
pub(crate) fn truncation_warning(termination: ScheduleTermination, warnings: &mut Vec<String>) {
    match termination {
        ScheduleTermination::PaidOff => {}
        ScheduleTermination::TermEnded => warnings.push(
            "Payment does not fully amortize the balance within the term; a residual balance remains".into(),
        ),
        ScheduleTermination::CeilingReached => warnings.push(format!(
            "Schedule truncated at the {MAX_SCHEDULE_PERIODS}-period iteration ceiling with a residual balance"
        )),
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute a fixed-payment installment schedule. Total: malformed or
/// degenerate numeric input degrades to a zeroed result, never an error.
pub fn calculate_loan(input: &LoanInput) -> ComputationOutput<LoanResult> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let principal = sanitize(input.principal);
    let rate_pct = sanitize(input.annual_rate_pct).max(0.0);
    let term_years = sanitize(input.term_years);
    let extra = sanitize(input.extra_monthly_payment).max(0.0);

    let term_periods = (term_years * 12.0).round() as u32;

    if principal <= 0.0 || term_years <= 0.0 || term_periods == 0 {
        let elapsed = start.elapsed().as_micros() as u64;
        return with_metadata(
            "Amortizing loan schedule (degenerate input, zeroed result)",
            input,
            warnings,
            elapsed,
            LoanResult::default(),
        );
    }

    let monthly_rate = rate_pct / 1200.0;
    let run = simulate_schedule(principal, monthly_rate, term_periods, extra, MAX_SCHEDULE_PERIODS);

    let interest_saved = if extra > 0.0 {
        let baseline = simulate_schedule(principal, monthly_rate, term_periods, 0.0, MAX_SCHEDULE_PERIODS);
        (baseline.total_interest - run.total_interest).max(0.0)
    } else {
        0.0
    };

    truncation_warning(run.termination, &mut warnings);

    let result = finish_run(run, interest_saved);
    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Amortizing loan schedule (EMI annuity formula)",
        input,
        warnings,
        elapsed,
        result,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn standard_loan() -> LoanInput {
        LoanInput {
            principal: 100_000.0,
            annual_rate_pct: 5.0,
            term_years: 10.0,
            extra_monthly_payment: 0.0,
        }
    }

    #[test]
    fn test_standard_loan_payment() {
        let out = calculate_loan(&standard_loan());
        assert_close(out.result.periodic_payment, 1060.66, 0.01, "monthly payment");
        assert_eq!(out.result.payoff_periods, 120);
        assert_eq!(out.result.termination, ScheduleTermination::PaidOff);
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let input = LoanInput {
            principal: 12_000.0,
            annual_rate_pct: 0.0,
            term_years: 10.0,
            extra_monthly_payment: 0.0,
        };
        let out = calculate_loan(&input);
        assert_eq!(out.result.periodic_payment, 100.0);
        assert_eq!(out.result.total_interest, 0.0);
        assert_eq!(out.result.payoff_periods, 120);
    }

    #[test]
    fn test_degenerate_inputs_zeroed() {
        let zero_principal = LoanInput {
            principal: 0.0,
            annual_rate_pct: 5.0,
            term_years: 10.0,
            extra_monthly_payment: 0.0,
        };
        let out = calculate_loan(&zero_principal);
        assert_eq!(out.result.periodic_payment, 0.0);
        assert!(out.result.schedule.is_empty());

        let zero_term = LoanInput {
            principal: 1000.0,
            annual_rate_pct: 5.0,
            term_years: 0.0,
            extra_monthly_payment: 0.0,
        };
        assert!(calculate_loan(&zero_term).result.schedule.is_empty());
    }

    #[test]
    fn test_non_finite_inputs_degrade() {
        let input = LoanInput {
            principal: f64::NAN,
            annual_rate_pct: f64::INFINITY,
            term_years: 10.0,
            extra_monthly_payment: 0.0,
        };
        let out = calculate_loan(&input);
        assert!(out.result.schedule.is_empty());
        assert_eq!(out.result.total_paid, 0.0);
    }

    #[test]
    fn test_extra_payment_shortens_payoff() {
        let mut input = standard_loan();
        input.extra_monthly_payment = 200.0;
        let out = calculate_loan(&input);
        assert!(out.result.payoff_periods < 120);
        assert!(out.result.interest_saved > 0.0);
        assert_eq!(out.result.termination, ScheduleTermination::PaidOff);
    }

    #[test]
    fn test_ceiling_bounds_pathological_term() {
        let input = LoanInput {
            principal: 100_000.0,
            annual_rate_pct: 5.0,
            term_years: 500.0,
            extra_monthly_payment: 0.0,
        };
        let out = calculate_loan(&input);
        assert!(out.result.payoff_periods <= MAX_SCHEDULE_PERIODS);
        assert_eq!(out.result.termination, ScheduleTermination::CeilingReached);
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_from_raw_normalizes_fields() {
        let raw = serde_json::json!({
            "principal": "₹10,00,000",
            "rate": "8.5%",
            "years": 15,
            "extra": null,
        });
        let input = LoanInput::from_raw(&raw);
        assert_eq!(input.principal, 1_000_000.0);
        assert_eq!(input.annual_rate_pct, 8.5);
        assert_eq!(input.term_years, 15.0);
        assert_eq!(input.extra_monthly_payment, 0.0);
    }

    #[test]
    fn test_final_balance_near_zero() {
        let out = calculate_loan(&standard_loan());
        let last = out.result.schedule.last().unwrap();
        assert!(last.ending_balance.abs() <= 0.01);
    }
}

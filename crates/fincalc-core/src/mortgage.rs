//! Mortgage engine: principal-and-interest amortization (shared with the
//! loan engine) plus flat monthly escrow components and loan-to-value.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use crate::arithmetic::{round_to_precision, safe_divide};
use crate::loan::{finish_run, simulate_schedule, truncation_warning, LoanResult};
use crate::normalize::{normalize_field, sanitize};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, MAX_SCHEDULE_PERIODS};

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// Mortgage input. Escrow components are annual amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    pub home_price: Money,
    pub down_payment: Money,
    /// Annual interest rate as a percentage (4.5 = 4.5%/year).
    #[serde(alias = "rate")]
    pub annual_rate_pct: Rate,
    #[serde(alias = "years")]
    pub term_years: f64,
    #[serde(default, alias = "property_tax")]
    pub annual_property_tax: Money,
    #[serde(default, alias = "insurance")]
    pub annual_insurance: Money,
    #[serde(default, alias = "pmi")]
    pub annual_pmi: Money,
}

impl MortgageInput {
    /// Build an input from a raw mapping, normalizing each field.
    pub fn from_raw(raw: &Value) -> Self {
        MortgageInput {
            home_price: normalize_field(raw, &["home_price", "price"]),
            down_payment: normalize_field(raw, &["down_payment"]),
            annual_rate_pct: normalize_field(raw, &["annual_rate_pct", "rate"]),
            term_years: normalize_field(raw, &["term_years", "years"]),
            annual_property_tax: normalize_field(raw, &["annual_property_tax", "property_tax"]),
            annual_insurance: normalize_field(raw, &["annual_insurance", "insurance"]),
            annual_pmi: normalize_field(raw, &["annual_pmi", "pmi"]),
        }
    }
}

/// Mortgage result: the amortizing loan core plus escrow and LTV.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MortgageResult {
    /// `max(0, home_price - down_payment)`.
    pub loan_amount: Money,
    /// Loan amount over home price, as a percentage. 0 when the price is 0.
    pub loan_to_value: f64,
    pub monthly_principal_and_interest: Money,
    pub monthly_property_tax: Money,
    pub monthly_insurance: Money,
    pub monthly_pmi: Money,
    /// Principal-and-interest plus all escrow components.
    pub monthly_payment: Money,
    pub principal_and_interest: LoanResult,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute a mortgage payment breakdown and amortization schedule. Total:
/// a down payment at or above the price yields an empty schedule and
/// zeroed loan totals, not an error.
pub fn calculate_mortgage(input: &MortgageInput) -> ComputationOutput<MortgageResult> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let home_price = sanitize(input.home_price).max(0.0);
    let down_payment = sanitize(input.down_payment).max(0.0);
    let rate_pct = sanitize(input.annual_rate_pct).max(0.0);
    let term_years = sanitize(input.term_years);
    let property_tax = sanitize(input.annual_property_tax).max(0.0);
    let insurance = sanitize(input.annual_insurance).max(0.0);
    let pmi = sanitize(input.annual_pmi).max(0.0);

    let loan_amount = (home_price - down_payment).max(0.0);
    let loan_to_value = round_to_precision(safe_divide(loan_amount, home_price, 0.0) * 100.0, 2);

    let monthly_property_tax = round_to_precision(property_tax / 12.0, 2);
    let monthly_insurance = round_to_precision(insurance / 12.0, 2);
    let monthly_pmi = round_to_precision(pmi / 12.0, 2);
    let escrow = monthly_property_tax + monthly_insurance + monthly_pmi;

    let term_periods = (term_years * 12.0).round() as u32;

    let principal_and_interest = if loan_amount > 0.0 && term_years > 0.0 && term_periods > 0 {
        let monthly_rate = rate_pct / 1200.0;
        let run = simulate_schedule(
            loan_amount,
            monthly_rate,
            term_periods,
            0.0,
            MAX_SCHEDULE_PERIODS,
        );
        truncation_warning(run.termination, &mut warnings);
        finish_run(run, 0.0)
    } else {
        LoanResult::default()
    };

    let monthly_pi = principal_and_interest.periodic_payment;
    let result = MortgageResult {
        loan_amount: round_to_precision(loan_amount, 2),
        loan_to_value,
        monthly_principal_and_interest: monthly_pi,
        monthly_property_tax,
        monthly_insurance,
        monthly_pmi,
        monthly_payment: round_to_precision(monthly_pi + escrow, 2),
        principal_and_interest,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Mortgage payment breakdown (EMI annuity plus flat escrow)",
        input,
        warnings,
        elapsed,
        result,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Compounding-growth engine: future value of a lump sum plus periodic
//! monthly contributions, with a year-by-year breakdown produced by
//! re-simulating month by month.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use crate::arithmetic::{is_effectively_zero, round_to_precision, safe_divide, safe_power};
use crate::normalize::{normalize_field, sanitize};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, MAX_SCHEDULE_PERIODS};

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// How often interest is credited per year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundingFrequency {
    Annually,
    Semiannually,
    Quarterly,
    #[default]
    Monthly,
    Daily,
}

impl CompoundingFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            CompoundingFrequency::Annually => 1,
            CompoundingFrequency::Semiannually => 2,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Daily => 365,
        }
    }

    /// Permissive label lookup; unrecognized labels default to monthly.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "annually" | "annual" | "yearly" => CompoundingFrequency::Annually,
            "semiannually" | "semiannual" | "half-yearly" => CompoundingFrequency::Semiannually,
            "quarterly" => CompoundingFrequency::Quarterly,
            "daily" => CompoundingFrequency::Daily,
            _ => CompoundingFrequency::Monthly,
        }
    }

    fn from_periods(periods: f64) -> Self {
        match periods as i64 {
            1 => CompoundingFrequency::Annually,
            2 => CompoundingFrequency::Semiannually,
            4 => CompoundingFrequency::Quarterly,
            365 => CompoundingFrequency::Daily,
            _ => CompoundingFrequency::Monthly,
        }
    }
}

/// Investment growth input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthInput {
    /// Lump sum invested up front.
    #[serde(alias = "initial")]
    pub initial_amount: Money,
    /// Contribution added at the end of every month.
    #[serde(default, alias = "contribution")]
    pub periodic_contribution: Money,
    /// Annual growth rate as a percentage (8 = 8%/year).
    #[serde(alias = "rate")]
    pub annual_rate_pct: Rate,
    #[serde(alias = "years")]
    pub term_years: f64,
    #[serde(default, alias = "frequency")]
    pub compounding_frequency: CompoundingFrequency,
}

impl GrowthInput {
    /// Build an input from a raw mapping, normalizing each field. The
    /// frequency may be a label ("quarterly") or a periods-per-year number.
    pub fn from_raw(raw: &Value) -> Self {
        let frequency = ["compounding_frequency", "frequency"]
            .iter()
            .find_map(|key| raw.get(*key))
            .map(|v| match v {
                Value::String(s) => CompoundingFrequency::from_label(s),
                Value::Number(n) => {
                    CompoundingFrequency::from_periods(n.as_f64().unwrap_or(12.0))
                }
                _ => CompoundingFrequency::Monthly,
            })
            .unwrap_or_default();

        GrowthInput {
            initial_amount: normalize_field(raw, &["initial_amount", "initial"]),
            periodic_contribution: normalize_field(raw, &["periodic_contribution", "contribution"]),
            annual_rate_pct: normalize_field(raw, &["annual_rate_pct", "rate"]),
            term_years: normalize_field(raw, &["term_years", "years"]),
            compounding_frequency: frequency,
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One year of the growth breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthBreakdownEntry {
    /// 1-based year number.
    pub period_index: u32,
    pub opening_balance: Money,
    /// Contributions added during the year.
    pub contributions: Money,
    /// Growth credited during the year.
    pub growth: Money,
    pub closing_balance: Money,
    /// Running contributions, initial lump sum included.
    pub cumulative_contributions: Money,
    pub cumulative_growth: Money,
}

/// Aggregate investment result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrowthResult {
    pub final_amount: Money,
    /// Initial lump sum plus all periodic contributions.
    pub total_contributions: Money,
    pub total_growth: Money,
    /// Geometric-mean annual return over total contributions; 0 when
    /// nothing was contributed.
    pub annualized_return: f64,
    pub breakdown: Vec<GrowthBreakdownEntry>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Simulate compound growth of a lump sum plus monthly contributions.
/// Total: degenerate input (term ≤ 0) yields a zeroed result.
///
/// The closed-form totals and the month-by-month breakdown share one
/// effective monthly factor `g = (1 + r/n)^(n/12)`, so the breakdown's
/// final closing balance agrees with `final_amount` and each year's
/// closing balance equals the next year's opening balance.
pub fn calculate_investment(input: &GrowthInput) -> ComputationOutput<GrowthResult> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let initial = sanitize(input.initial_amount).max(0.0);
    let contribution = sanitize(input.periodic_contribution).max(0.0);
    let rate_pct = sanitize(input.annual_rate_pct).max(0.0);
    let term_years = sanitize(input.term_years);

    let requested_months = (term_years * 12.0).round() as u32;

    if term_years <= 0.0 || requested_months == 0 {
        let elapsed = start.elapsed().as_micros() as u64;
        return with_metadata(
            "Compound growth projection (degenerate input, zeroed result)",
            input,
            warnings,
            elapsed,
            GrowthResult::default(),
        );
    }

    let months = requested_months.min(MAX_SCHEDULE_PERIODS);
    if months < requested_months {
        warnings.push(format!(
            "Projection truncated at the {MAX_SCHEDULE_PERIODS}-period iteration ceiling"
        ));
    }

    let periods_per_year = input.compounding_frequency.periods_per_year() as f64;
    let rate = rate_pct / 100.0;

    // Effective monthly growth factor: compounding at n periods/year is
    // equivalent to one multiplication by (1 + r/n)^(n/12) per month.
    let monthly_factor = if is_effectively_zero(rate) {
        1.0
    } else {
        safe_power(1.0 + rate / periods_per_year, periods_per_year / 12.0)
    };

    // Closed-form totals.
    let growth_factor = safe_power(monthly_factor, months as f64);
    let fv_lump = initial * growth_factor;
    let monthly_rate = monthly_factor - 1.0;
    let fv_contributions = if is_effectively_zero(monthly_rate) {
        contribution * months as f64
    } else {
        contribution * (growth_factor - 1.0) / monthly_rate
    };

    let final_amount = round_to_precision(fv_lump + fv_contributions, 2);
    let total_contributions =
        round_to_precision(initial + contribution * months as f64, 2);
    let total_growth = round_to_precision(final_amount - total_contributions, 2);

    let years = months as f64 / 12.0;
    let annualized_return = if is_effectively_zero(total_contributions) {
        0.0
    } else {
        let ratio = safe_divide(final_amount, total_contributions, 0.0);
        round_to_precision(safe_power(ratio, 1.0 / years) - 1.0, 6)
    };

    // Year-by-year breakdown via month-by-month re-simulation.
    let mut breakdown: Vec<GrowthBreakdownEntry> = Vec::new();
    let mut balance = initial;
    let mut cumulative_contributions = initial;
    let mut cumulative_growth = 0.0;
    let mut month = 0u32;

    while month < months {
        let opening_balance = balance;
        let months_this_year = (months - month).min(12);
        let mut contributions = 0.0;
        let mut growth = 0.0;

        for _ in 0..months_this_year {
            let grown = balance * monthly_factor;
            growth += grown - balance;
            balance = grown + contribution;
            contributions += contribution;
        }
        month += months_this_year;

        cumulative_contributions += contributions;
        cumulative_growth += growth;

        breakdown.push(GrowthBreakdownEntry {
            period_index: breakdown.len() as u32 + 1,
            opening_balance: round_to_precision(opening_balance, 2),
            contributions: round_to_precision(contributions, 2),
            growth: round_to_precision(growth, 2),
            closing_balance: round_to_precision(balance, 2),
            cumulative_contributions: round_to_precision(cumulative_contributions, 2),
            cumulative_growth: round_to_precision(cumulative_growth, 2),
        });
    }

    let result = GrowthResult {
        final_amount,
        total_contributions,
        total_growth,
        annualized_return,
        breakdown,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Compound growth projection (lump sum plus ordinary annuity)",
        input,
        warnings,
        elapsed,
        result,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

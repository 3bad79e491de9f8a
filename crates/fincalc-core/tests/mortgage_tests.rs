use fincalc_core::loan::ScheduleTermination;
use fincalc_core::mortgage::{calculate_mortgage, MortgageInput};

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

fn standard_mortgage() -> MortgageInput {
    MortgageInput {
        home_price: 300_000.0,
        down_payment: 60_000.0,
        annual_rate_pct: 4.5,
        term_years: 30.0,
        annual_property_tax: 3600.0,
        annual_insurance: 1200.0,
        annual_pmi: 1800.0,
    }
}

// ===========================================================================
// Concrete scenario: 300k price, 20% down, 4.5% over 30 years
// ===========================================================================

#[test]
fn test_scenario_300k_20pct_down() {
    let out = calculate_mortgage(&standard_mortgage());
    let m = &out.result;

    assert_eq!(m.loan_amount, 240_000.0);
    assert_eq!(m.loan_to_value, 80.0);
    assert_close(m.monthly_principal_and_interest, 1216.04, 0.02, "monthly P&I");
    assert_eq!(m.monthly_property_tax, 300.0);
    assert_eq!(m.monthly_insurance, 100.0);
    assert_eq!(m.monthly_pmi, 150.0);
    assert_close(m.monthly_payment, 1766.04, 0.02, "all-in monthly payment");
    assert_eq!(
        m.principal_and_interest.termination,
        ScheduleTermination::PaidOff
    );
    assert_eq!(m.principal_and_interest.payoff_periods, 360);
}

// ===========================================================================
// LTV identities
// ===========================================================================

#[test]
fn test_ltv_formula() {
    for (price, down, expected_ltv) in [
        (300_000.0, 60_000.0, 80.0),
        (500_000.0, 125_000.0, 75.0),
        (100_000.0, 0.0, 100.0),
        (100_000.0, 100_000.0, 0.0),
        (100_000.0, 150_000.0, 0.0),
    ] {
        let input = MortgageInput {
            home_price: price,
            down_payment: down,
            annual_rate_pct: 5.0,
            term_years: 30.0,
            annual_property_tax: 0.0,
            annual_insurance: 0.0,
            annual_pmi: 0.0,
        };
        let out = calculate_mortgage(&input);
        assert_close(
            out.result.loan_to_value,
            expected_ltv,
            0.001,
            &format!("LTV for price={price}, down={down}"),
        );
    }
}

// ===========================================================================
// Fully-funded purchase is a well-defined zero result
// ===========================================================================

#[test]
fn test_full_down_payment_yields_zeroed_loan() {
    let mut input = standard_mortgage();
    input.down_payment = 350_000.0;
    let out = calculate_mortgage(&input);
    let m = &out.result;

    assert_eq!(m.loan_amount, 0.0);
    assert_eq!(m.loan_to_value, 0.0);
    assert_eq!(m.monthly_principal_and_interest, 0.0);
    assert!(m.principal_and_interest.schedule.is_empty());
    assert_eq!(m.principal_and_interest.total_paid, 0.0);
    // Escrow components are independent of the loan.
    assert_close(m.monthly_payment, 550.0, 0.001, "escrow-only payment");
}

// ===========================================================================
// P&I schedule matches an equivalent bare loan
// ===========================================================================

#[test]
fn test_escrow_does_not_perturb_amortization() {
    let with_escrow = calculate_mortgage(&standard_mortgage());

    let mut without_escrow = standard_mortgage();
    without_escrow.annual_property_tax = 0.0;
    without_escrow.annual_insurance = 0.0;
    without_escrow.annual_pmi = 0.0;
    let bare = calculate_mortgage(&without_escrow);

    assert_eq!(
        with_escrow.result.principal_and_interest.total_interest,
        bare.result.principal_and_interest.total_interest
    );
    assert_eq!(
        with_escrow.result.monthly_principal_and_interest,
        bare.result.monthly_principal_and_interest
    );
    assert_eq!(bare.result.monthly_payment, bare.result.monthly_principal_and_interest);
}

#[test]
fn test_raw_mortgage_input() {
    let raw = serde_json::json!({
        "home_price": "₹50,00,000",
        "down_payment": "₹10,00,000",
        "rate": 9.0,
        "years": 20,
    });
    let input = MortgageInput::from_raw(&raw);
    let out = calculate_mortgage(&input);
    assert_eq!(out.result.loan_amount, 4_000_000.0);
    assert_eq!(out.result.loan_to_value, 80.0);
}

use chrono::NaiveDate;
use idr_core::config::{PlanCatalog, PlanKey};
use idr_core::projector::{project_repayment, ProjectionInput};
use idr_core::{BorrowerProfile, FilingStatus, LoanProfile, LoanType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn input_as_of(date: NaiveDate) -> ProjectionInput {
    ProjectionInput {
        loan: LoanProfile {
            balance: dec!(50_000),
            interest_rate: dec!(0.065),
            loan_type: LoanType::Direct,
            years_in_repayment: 0,
        },
        borrower: BorrowerProfile {
            annual_income: dec!(60_000),
            income_growth_rate: dec!(0.03),
            filing_status: FilingStatus::Single,
            family_size: 1,
            state: "TX".into(),
        },
        as_of: date,
        pslf_payments_made: None,
    }
}

fn pre_rap() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
}

fn post_rap() -> NaiveDate {
    NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()
}

// ===========================================================================
// Recommendation consistency
// ===========================================================================

#[test]
fn test_recommended_plan_has_minimum_net_cost() {
    let catalog = PlanCatalog::builtin();
    let out = project_repayment(&catalog, &input_as_of(pre_rap())).unwrap();

    let best = out
        .result
        .recommendation
        .best_plan
        .expect("a plan should be open");
    let best_cost = out.result.plans[&best].net_cost;
    let min_cost = out
        .result
        .plans
        .values()
        .filter(|r| r.available)
        .map(|r| r.net_cost)
        .min()
        .unwrap();

    assert_eq!(best_cost, min_cost);
}

#[test]
fn test_reasoning_names_the_winner() {
    let catalog = PlanCatalog::builtin();
    let out = project_repayment(&catalog, &input_as_of(pre_rap())).unwrap();

    let rec = &out.result.recommendation;
    let best = rec.best_plan.unwrap();
    assert!(
        rec.reasoning.contains(&best.to_string()),
        "reasoning '{}' should name {}",
        rec.reasoning,
        best
    );
}

// ===========================================================================
// Availability windows drive the candidate set
// ===========================================================================

#[test]
fn test_availability_flips_with_evaluation_date() {
    let catalog = PlanCatalog::builtin();

    let before = project_repayment(&catalog, &input_as_of(pre_rap())).unwrap();
    assert!(!before.result.plans[&PlanKey::Rap].available);
    assert!(before.result.plans[&PlanKey::Paye].available);

    let after = project_repayment(&catalog, &input_as_of(post_rap())).unwrap();
    assert!(after.result.plans[&PlanKey::Rap].available);
    assert!(!after.result.plans[&PlanKey::Paye].available);
    assert!(!after.result.plans[&PlanKey::Icr].available);
}

#[test]
fn test_parent_plus_limited_to_icr_and_standard() {
    let catalog = PlanCatalog::builtin();
    let mut input = input_as_of(pre_rap());
    input.loan.loan_type = LoanType::ParentPlus;
    let out = project_repayment(&catalog, &input).unwrap();

    let available: Vec<PlanKey> = out
        .result
        .plans
        .values()
        .filter(|r| r.available)
        .map(|r| r.plan)
        .collect();
    assert_eq!(available, vec![PlanKey::Icr, PlanKey::Standard]);

    let best = out.result.recommendation.best_plan.unwrap();
    assert!(best == PlanKey::Icr || best == PlanKey::Standard);
}

// ===========================================================================
// Envelope
// ===========================================================================

#[test]
fn test_envelope_carries_methodology_and_assumptions() {
    let catalog = PlanCatalog::builtin();
    let out = project_repayment(&catalog, &input_as_of(pre_rap())).unwrap();

    assert!(out.methodology.contains("projection"));
    assert_eq!(
        out.assumptions.get("as_of").and_then(|v| v.as_str()),
        Some("2025-10-01")
    );
    assert!(!out.metadata.version.is_empty());
}

#[test]
fn test_output_serializes_with_plan_keys_as_strings() {
    let catalog = PlanCatalog::builtin();
    let out = project_repayment(&catalog, &input_as_of(pre_rap())).unwrap();

    let value = serde_json::to_value(&out).unwrap();
    let plans = value["result"]["plans"].as_object().unwrap();
    assert!(plans.contains_key("standard"));
    assert!(plans.contains_key("ibr"));
}

// ===========================================================================
// PSLF overlay wiring
// ===========================================================================

#[test]
fn test_pslf_overlay_attached_when_requested() {
    let catalog = PlanCatalog::builtin();
    let mut input = input_as_of(pre_rap());
    input.pslf_payments_made = Some(119);
    let out = project_repayment(&catalog, &input).unwrap();

    let pslf = out.result.pslf.expect("overlay requested");
    assert_eq!(pslf.payments_remaining, 1);
    assert_eq!(pslf.tax_on_forgiveness, Decimal::ZERO);

    let without = project_repayment(&catalog, &input_as_of(pre_rap())).unwrap();
    assert!(without.result.pslf.is_none());
}

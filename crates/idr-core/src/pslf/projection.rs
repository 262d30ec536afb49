use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::plans::{PaymentBasis, PlanCatalog, PlanDefinition, PlanKey};
use crate::error::ProjectorError;
use crate::projector::simulate::roll_forward;
use crate::types::{with_metadata, BorrowerProfile, ComputationOutput, LoanProfile, Money};
use crate::ProjectorResult;

/// Qualifying payments required for Public Service Loan Forgiveness.
pub const PSLF_TERM_PAYMENTS: u32 = 120;

/// Input for the PSLF overlay projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PslfInput {
    pub loan: LoanProfile,
    pub borrower: BorrowerProfile,
    /// Qualifying payments already certified.
    pub payments_made: u32,
    pub as_of: NaiveDate,
    /// IDR plan the borrower pays under while pursuing PSLF. When absent,
    /// the cheapest open income-driven plan is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanKey>,
}

/// Fixed 120-payment forgiveness track, independent of the plan comparison.
/// PSLF forgiveness is tax-exempt unconditionally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PslfResult {
    pub payments_remaining: u32,
    /// Plan used to price the remaining payments.
    pub qualifying_plan: PlanKey,
    pub monthly_payment: Money,
    pub total_remaining_paid: Money,
    /// Projected balance at the 120th payment.
    pub estimated_forgiveness_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_forgiveness_year: Option<i32>,
    pub tax_on_forgiveness: Money,
}

/// Cheapest open income-driven plan for this borrower, by first payment.
fn cheapest_idr_plan<'a>(
    catalog: &'a PlanCatalog,
    loan: &LoanProfile,
    borrower: &BorrowerProfile,
    as_of: NaiveDate,
) -> ProjectorResult<&'a PlanDefinition> {
    let mut best: Option<(&PlanDefinition, Money)> = None;
    for plan in catalog.plans() {
        if matches!(plan.payment_basis, PaymentBasis::StandardAmortization { .. }) {
            continue;
        }
        if !plan.is_available(as_of, loan.loan_type) {
            continue;
        }
        let schedule = roll_forward(catalog, loan, borrower, plan, as_of, 1, 0)?;
        let payment = schedule.first_monthly_payment;
        match best {
            Some((_, cheapest)) if payment >= cheapest => {}
            _ => best = Some((plan, payment)),
        }
    }
    best.map(|(plan, _)| plan).ok_or_else(|| {
        ProjectorError::MissingRuleTable(
            "no income-driven plan is open to this borrower for PSLF pricing".into(),
        )
    })
}

/// Project the PSLF track: remaining qualifying payments and the balance
/// left to forgive at payment 120, priced with the borrower's IDR formula.
pub fn pslf_overlay(
    catalog: &PlanCatalog,
    loan: &LoanProfile,
    borrower: &BorrowerProfile,
    payments_made: u32,
    plan: Option<PlanKey>,
    as_of: NaiveDate,
) -> ProjectorResult<PslfResult> {
    let plan = match plan {
        Some(key) => catalog
            .plan(key)
            .ok_or_else(|| ProjectorError::MissingRuleTable(format!("plan {key} not in catalog")))?,
        None => cheapest_idr_plan(catalog, loan, borrower, as_of)?,
    };

    let payments_remaining = PSLF_TERM_PAYMENTS.saturating_sub(payments_made);
    let start_month = payments_made.min(PSLF_TERM_PAYMENTS);

    let schedule = roll_forward(
        catalog,
        loan,
        borrower,
        plan,
        as_of,
        PSLF_TERM_PAYMENTS,
        start_month,
    )?;

    let projected_forgiveness_year = if schedule.ending_balance > Decimal::ZERO {
        let year = as_of
            .checked_add_months(Months::new(payments_remaining))
            .map(|d| d.year())
            .ok_or_else(|| {
                ProjectorError::DateError(format!("date overflow at +{payments_remaining} months"))
            })?;
        Some(year)
    } else {
        None
    };

    Ok(PslfResult {
        payments_remaining,
        qualifying_plan: plan.key,
        monthly_payment: schedule.first_monthly_payment,
        total_remaining_paid: schedule.total_paid,
        estimated_forgiveness_amount: schedule.ending_balance,
        projected_forgiveness_year,
        tax_on_forgiveness: Decimal::ZERO,
    })
}

/// Envelope-wrapped PSLF projection for the CLI and bindings.
pub fn project_pslf(
    catalog: &PlanCatalog,
    input: &PslfInput,
) -> ProjectorResult<ComputationOutput<PslfResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.loan.balance < Decimal::ZERO {
        return Err(ProjectorError::InvalidInput {
            field: "loan.balance".into(),
            reason: "balance must be >= 0".into(),
        });
    }
    if input.payments_made > PSLF_TERM_PAYMENTS {
        warnings.push(format!(
            "payments_made {} exceeds the {}-payment term; treated as complete",
            input.payments_made, PSLF_TERM_PAYMENTS
        ));
    }

    let result = pslf_overlay(
        catalog,
        &input.loan,
        &input.borrower,
        input.payments_made,
        input.plan,
        input.as_of,
    )?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "PSLF overlay: remaining qualifying payments and projected balance \
         at payment 120 under an income-driven formula. Forgiveness is \
         tax-exempt.",
        &serde_json::json!({
            "as_of": input.as_of.to_string(),
            "payments_made": input.payments_made,
            "term_payments": PSLF_TERM_PAYMENTS,
        }),
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FilingStatus, LoanType};
    use rust_decimal_macros::dec;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    fn loan() -> LoanProfile {
        LoanProfile {
            balance: dec!(50_000),
            interest_rate: dec!(0.065),
            loan_type: LoanType::Direct,
            years_in_repayment: 0,
        }
    }

    fn borrower() -> BorrowerProfile {
        BorrowerProfile {
            annual_income: dec!(45_000),
            income_growth_rate: dec!(0.03),
            filing_status: FilingStatus::Single,
            family_size: 1,
            state: "OH".into(),
        }
    }

    #[test]
    fn test_near_completion_one_payment_left() {
        let catalog = PlanCatalog::builtin();
        let r = pslf_overlay(&catalog, &loan(), &borrower(), 119, None, as_of()).unwrap();

        assert_eq!(r.payments_remaining, 1);
        assert_eq!(r.tax_on_forgiveness, Decimal::ZERO);
        assert!(r.estimated_forgiveness_amount > Decimal::ZERO);
        assert_eq!(r.projected_forgiveness_year, Some(2025));
    }

    #[test]
    fn test_full_term_accrues_payments() {
        let catalog = PlanCatalog::builtin();
        let r = pslf_overlay(&catalog, &loan(), &borrower(), 0, None, as_of()).unwrap();

        assert_eq!(r.payments_remaining, 120);
        assert!(r.total_remaining_paid > Decimal::ZERO);
        assert!(r.estimated_forgiveness_amount > Decimal::ZERO);
        assert_eq!(r.projected_forgiveness_year, Some(2035));
    }

    #[test]
    fn test_payments_beyond_term_floor_at_zero_remaining() {
        let catalog = PlanCatalog::builtin();
        let r = pslf_overlay(&catalog, &loan(), &borrower(), 150, None, as_of()).unwrap();

        assert_eq!(r.payments_remaining, 0);
        assert_eq!(r.estimated_forgiveness_amount, loan().balance);
        assert_eq!(r.projected_forgiveness_year, Some(2025));
    }

    #[test]
    fn test_named_plan_is_used() {
        let catalog = PlanCatalog::builtin();
        let r =
            pslf_overlay(&catalog, &loan(), &borrower(), 60, Some(PlanKey::Ibr), as_of()).unwrap();
        assert_eq!(r.qualifying_plan, PlanKey::Ibr);
    }

    #[test]
    fn test_envelope_wraps_result() {
        let catalog = PlanCatalog::builtin();
        let input = PslfInput {
            loan: loan(),
            borrower: borrower(),
            payments_made: 30,
            as_of: as_of(),
            plan: None,
        };
        let out = project_pslf(&catalog, &input).unwrap();
        assert_eq!(out.result.payments_remaining, 90);
        assert!(out.warnings.is_empty());
    }
}

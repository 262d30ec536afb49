pub mod forgiveness_tax;
pub mod payment;
pub mod recommend;
pub mod simulate;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::config::plans::{PlanCatalog, PlanKey};
use crate::error::ProjectorError;
use crate::types::{with_metadata, BorrowerProfile, ComputationOutput, LoanProfile};
use crate::ProjectorResult;

pub use recommend::Recommendation;
pub use simulate::{PlanYear, SimulationResult};

/// Input for a full multi-plan projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub loan: LoanProfile,
    pub borrower: BorrowerProfile,
    /// Evaluation date for plan availability windows and forgiveness-year
    /// math. Passed in rather than read from the clock so runs reproduce.
    pub as_of: NaiveDate,
    /// Qualifying PSLF payments already made, when the borrower is tracking
    /// Public Service Loan Forgiveness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pslf_payments_made: Option<u32>,
}

/// Per-plan results, the recommendation, and the optional PSLF overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionOutput {
    pub plans: BTreeMap<PlanKey, SimulationResult>,
    pub recommendation: Recommendation,
    #[cfg(feature = "pslf")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pslf: Option<crate::pslf::PslfResult>,
}

fn validate(input: &ProjectionInput) -> ProjectorResult<Vec<String>> {
    let mut warnings: Vec<String> = Vec::new();

    if input.loan.balance < Decimal::ZERO {
        return Err(ProjectorError::InvalidInput {
            field: "loan.balance".into(),
            reason: "balance must be >= 0".into(),
        });
    }
    if input.loan.interest_rate < Decimal::ZERO {
        return Err(ProjectorError::InvalidInput {
            field: "loan.interest_rate".into(),
            reason: "interest rate must be >= 0".into(),
        });
    }
    if input.borrower.annual_income < Decimal::ZERO {
        return Err(ProjectorError::InvalidInput {
            field: "borrower.annual_income".into(),
            reason: "income must be >= 0".into(),
        });
    }
    if input.borrower.income_growth_rate <= dec!(-1) {
        return Err(ProjectorError::InvalidInput {
            field: "borrower.income_growth_rate".into(),
            reason: "growth rate must be greater than -100%".into(),
        });
    }
    if input.borrower.family_size < 1 {
        warnings.push("family_size below 1 clamped to 1".into());
    }

    Ok(warnings)
}

/// Project every catalog plan for one borrower and recommend the cheapest.
///
/// Pure and deterministic: all rule tables come from the catalog and the
/// evaluation date from the input. Unavailable plans are simulated anyway so
/// the comparison table always renders; `years_in_repayment` advances the
/// forgiveness clock without re-simulating prior payments.
pub fn project_repayment(
    catalog: &PlanCatalog,
    input: &ProjectionInput,
) -> ProjectorResult<ComputationOutput<ProjectionOutput>> {
    let start = Instant::now();
    let mut warnings = validate(input)?;

    let mut plans: BTreeMap<PlanKey, SimulationResult> = BTreeMap::new();
    for plan in catalog.plans() {
        let result = simulate::simulate(catalog, &input.loan, &input.borrower, plan, input.as_of)?;
        if !result.available {
            warnings.push(format!(
                "{} is not open to this borrower as of {}; shown for comparison only",
                plan.key, input.as_of
            ));
        }
        plans.insert(plan.key, result);
    }

    let recommendation = recommend::recommend(catalog, &plans);

    #[cfg(feature = "pslf")]
    let pslf = match input.pslf_payments_made {
        Some(payments_made) => Some(crate::pslf::pslf_overlay(
            catalog,
            &input.loan,
            &input.borrower,
            payments_made,
            None,
            input.as_of,
        )?),
        None => None,
    };

    let output = ProjectionOutput {
        plans,
        recommendation,
        #[cfg(feature = "pslf")]
        pslf,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Multi-plan repayment projection: per-plan monthly amortisation to \
         payoff or forgiveness, flat-rate forgiveness tax estimate, and \
         lowest-net-cost recommendation. Prior repayment years advance the \
         forgiveness clock; prior payments are not re-simulated.",
        &serde_json::json!({
            "as_of": input.as_of.to_string(),
            "plans_compared": catalog.plans().len(),
            "loan_type": input.loan.loan_type,
            "years_in_repayment": input.loan.years_in_repayment,
            "income_growth_rate": input.borrower.income_growth_rate.to_string(),
            "forgiveness_tax_exempt_through": forgiveness_tax::TAX_EXEMPT_THROUGH_YEAR,
        }),
        warnings,
        elapsed,
        output,
    ))
}

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::prelude::ToPrimitive;

use idr_core::config::{PlanCatalog, PlanKey};
use idr_core::ParsedField;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[napi]
pub fn project_repayment(input_json: String) -> NapiResult<String> {
    let input: idr_core::projector::ProjectionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let catalog = PlanCatalog::builtin();
    let output =
        idr_core::projector::project_repayment(&catalog, &input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn project_pslf(input_json: String) -> NapiResult<String> {
    let input: idr_core::pslf::PslfInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let catalog = PlanCatalog::builtin();
    let output = idr_core::pslf::project_pslf(&catalog, &input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Payment quote
// ---------------------------------------------------------------------------

/// Quote the first-month payment for one plan from a loose payload.
///
/// Front-end form state sends values that may arrive as numbers, numeric
/// strings, or missing fields, so each is resolved through ParsedField
/// before touching the calculators.
#[napi]
pub fn monthly_payment(input_json: String) -> NapiResult<String> {
    let payload: serde_json::Value = serde_json::from_str(&input_json).map_err(to_napi_error)?;

    let plan_key: PlanKey = payload
        .get("plan")
        .and_then(|v| v.as_str())
        .ok_or_else(|| to_napi_error("'plan' is required"))?
        .parse()
        .map_err(to_napi_error)?;

    let balance = ParsedField::from_json(payload.get("balance"))
        .require("balance")
        .map_err(to_napi_error)?;
    let rate = ParsedField::from_json(payload.get("interest_rate"))
        .require("interest_rate")
        .map_err(to_napi_error)?;
    let income = ParsedField::from_json(payload.get("annual_income"))
        .require("annual_income")
        .map_err(to_napi_error)?;
    let family_size = ParsedField::from_json(payload.get("family_size"))
        .optional("family_size")
        .map_err(to_napi_error)?
        .and_then(|d| d.to_u32())
        .unwrap_or(1);

    let catalog = PlanCatalog::builtin();
    let plan = catalog
        .plan(plan_key)
        .ok_or_else(|| to_napi_error(format!("plan {plan_key} not in catalog")))?;

    let discretionary = idr_core::config::poverty::discretionary_income(
        catalog.poverty(),
        income,
        family_size,
        plan.poverty_line_multiplier,
    );
    let amortized = match plan.amortization_term_months() {
        Some(months) => Some(
            idr_core::time_value::amortized_monthly_payment(balance, rate, months)
                .map_err(to_napi_error)?,
        ),
        None => None,
    };
    let payment = idr_core::projector::payment::monthly_payment(
        plan,
        &idr_core::projector::payment::PaymentInputs {
            discretionary_income: discretionary,
            agi: income,
            family_size,
            amortized_payment: amortized,
        },
    )
    .map_err(to_napi_error)?;

    let quote = serde_json::json!({
        "plan": plan_key,
        "monthly_payment": payment,
        "discretionary_income": discretionary,
        "minimum_monthly_payment": plan.minimum_monthly_payment,
    });
    serde_json::to_string(&quote).map_err(to_napi_error)
}

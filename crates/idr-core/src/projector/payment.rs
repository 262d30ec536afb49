use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::plans::{sliding_scale_percent, PaymentBasis, PlanDefinition};
use crate::error::ProjectorError;
use crate::types::Money;
use crate::ProjectorResult;

/// Everything a plan formula may need for one month's payment.
#[derive(Debug, Clone)]
pub struct PaymentInputs {
    pub discretionary_income: Money,
    /// Adjusted gross income; the sliding-scale basis consumes this directly.
    pub agi: Money,
    pub family_size: u32,
    /// Fixed amortised payment priced once at simulation entry, for plans
    /// whose basis is an amortisation or whose percent formula is capped by one.
    pub amortized_payment: Option<Money>,
}

/// Monthly payment under a plan's formula, floored at the plan minimum and
/// rounded to cents.
pub fn monthly_payment(plan: &PlanDefinition, inputs: &PaymentInputs) -> ProjectorResult<Money> {
    let raw = match &plan.payment_basis {
        PaymentBasis::PercentOfDiscretionary(pct) => {
            let formula = inputs.discretionary_income * pct / dec!(12);
            match (plan.amortization_cap_years, inputs.amortized_payment) {
                // Published cap: pay the lesser of the percent formula and
                // the amortised alternative
                (Some(_), Some(cap)) => formula.min(cap),
                _ => formula,
            }
        }
        PaymentBasis::SlidingScale(brackets) => {
            let pct = sliding_scale_percent(brackets, inputs.agi);
            let dependents = Decimal::from(inputs.family_size.max(1) - 1);
            inputs.agi * pct / dec!(12) - plan.dependent_deduction_monthly * dependents
        }
        PaymentBasis::StandardAmortization { .. } => {
            inputs.amortized_payment.ok_or_else(|| {
                ProjectorError::MissingRuleTable(format!(
                    "{} has an amortised basis but no payment was priced at entry",
                    plan.key
                ))
            })?
        }
    };

    Ok(raw.max(plan.minimum_monthly_payment).round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::plans::{PlanCatalog, PlanKey};
    use pretty_assertions::assert_eq;

    fn inputs(discretionary: Money, agi: Money, family_size: u32) -> PaymentInputs {
        PaymentInputs {
            discretionary_income: discretionary,
            agi,
            family_size,
            amortized_payment: None,
        }
    }

    #[test]
    fn test_percent_of_discretionary() {
        let catalog = PlanCatalog::builtin();
        let ibr = catalog.plan(PlanKey::Ibr).unwrap();
        // 36,525 * 15% / 12 = 456.5625 -> 456.56
        let p = monthly_payment(ibr, &inputs(dec!(36_525), dec!(60_000), 1)).unwrap();
        assert_eq!(p, dec!(456.56));
    }

    #[test]
    fn test_minimum_floor_binds_at_zero_discretionary() {
        let catalog = PlanCatalog::builtin();
        let paye = catalog.plan(PlanKey::Paye).unwrap();
        let p = monthly_payment(paye, &inputs(Decimal::ZERO, Decimal::ZERO, 1)).unwrap();
        assert_eq!(p, paye.minimum_monthly_payment);
    }

    #[test]
    fn test_sliding_scale_with_dependent_deduction() {
        let catalog = PlanCatalog::builtin();
        let rap = catalog.plan(PlanKey::Rap).unwrap();
        // 60k AGI -> 5% band -> 250/month, minus 2 dependents * $50 = 150
        let p = monthly_payment(rap, &inputs(Decimal::ZERO, dec!(60_000), 3)).unwrap();
        assert_eq!(p, dec!(150));
    }

    #[test]
    fn test_sliding_scale_deduction_floors_at_plan_minimum() {
        let catalog = PlanCatalog::builtin();
        let rap = catalog.plan(PlanKey::Rap).unwrap();
        // 15k AGI -> 1% band -> 12.50/month, minus one $50 dependent -> floor
        let p = monthly_payment(rap, &inputs(Decimal::ZERO, dec!(15_000), 2)).unwrap();
        assert_eq!(p, dec!(10));
    }

    #[test]
    fn test_amortization_cap_takes_lesser() {
        let catalog = PlanCatalog::builtin();
        let icr = catalog.plan(PlanKey::Icr).unwrap();
        let mut i = inputs(dec!(44_350), dec!(60_000), 1);
        i.amortized_payment = Some(dec!(501.11));
        // 20% formula = 739.17 > 12-year cap
        let p = monthly_payment(icr, &i).unwrap();
        assert_eq!(p, dec!(501.11));
    }

    #[test]
    fn test_standard_basis_requires_priced_payment() {
        let catalog = PlanCatalog::builtin();
        let standard = catalog.plan(PlanKey::Standard).unwrap();
        assert!(monthly_payment(standard, &inputs(Decimal::ZERO, dec!(60_000), 1)).is_err());

        let mut i = inputs(Decimal::ZERO, dec!(60_000), 1);
        i.amortized_payment = Some(dec!(567.74));
        assert_eq!(monthly_payment(standard, &i).unwrap(), dec!(567.74));
    }
}

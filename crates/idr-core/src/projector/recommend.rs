use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::plans::{PlanCatalog, PlanKey};
use crate::projector::simulate::SimulationResult;
use crate::types::Money;

/// The plan with the lowest projected net cost, with templated reasoning for
/// the comparison table. `best_plan` is None when no plan is open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_plan: Option<PlanKey>,
    pub reasoning: String,
}

fn dollars(amount: Money) -> String {
    format!("${}", amount.round_dp(0))
}

/// Years until a plan resolves the debt, for tie-breaking equal net costs:
/// the forgiveness term, or the amortisation term for plans that pay off.
fn resolution_years(catalog: &PlanCatalog, key: PlanKey) -> u32 {
    catalog
        .plan(key)
        .map(|p| p.term_months() / 12)
        .unwrap_or(u32::MAX)
}

/// Select the open plan with the lowest net cost. Ties break toward the
/// shorter term (faster debt resolution).
pub fn recommend(
    catalog: &PlanCatalog,
    results: &BTreeMap<PlanKey, SimulationResult>,
) -> Recommendation {
    let mut open: Vec<&SimulationResult> = results.values().filter(|r| r.available).collect();
    open.sort_by(|a, b| {
        a.net_cost.cmp(&b.net_cost).then_with(|| {
            resolution_years(catalog, a.plan).cmp(&resolution_years(catalog, b.plan))
        })
    });

    match open.as_slice() {
        [] => Recommendation {
            best_plan: None,
            reasoning: "No repayment plan is currently open to this borrower; \
                        the comparison is shown for reference only."
                .to_string(),
        },
        [only] => Recommendation {
            best_plan: Some(only.plan),
            reasoning: format!(
                "{} is the only plan currently open to this borrower, with a \
                 projected net cost of {}.",
                only.plan,
                dollars(only.net_cost)
            ),
        },
        [best, runner_up, ..] => {
            let margin = runner_up.net_cost - best.net_cost;
            let mut reasoning = format!(
                "{} has the lowest projected net cost at {}, {} less than {} \
                 over the life of the loan.",
                best.plan,
                dollars(best.net_cost),
                dollars(margin),
                runner_up.plan
            );
            if best.forgiveness_amount > Decimal::ZERO {
                if best.tax_on_forgiveness.is_zero() {
                    reasoning.push_str(&format!(
                        " It projects {} forgiven tax-free.",
                        dollars(best.forgiveness_amount)
                    ));
                } else {
                    reasoning.push_str(&format!(
                        " It projects {} forgiven, with an estimated {} tax bill.",
                        dollars(best.forgiveness_amount),
                        dollars(best.tax_on_forgiveness)
                    ));
                }
            } else {
                reasoning.push_str(" It fully repays the loan with nothing left to forgive.");
            }
            Recommendation {
                best_plan: Some(best.plan),
                reasoning,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn result(plan: PlanKey, available: bool, net_cost: Money) -> SimulationResult {
        SimulationResult {
            plan,
            available,
            monthly_payment_year1: dec!(100),
            monthly_payment_final: dec!(100),
            total_paid: net_cost,
            forgiveness_amount: Decimal::ZERO,
            forgiveness_year: None,
            tax_on_forgiveness: Decimal::ZERO,
            net_cost,
            months_simulated: 120,
            year_by_year: Vec::new(),
        }
    }

    fn results_map(entries: Vec<SimulationResult>) -> BTreeMap<PlanKey, SimulationResult> {
        entries.into_iter().map(|r| (r.plan, r)).collect()
    }

    #[test]
    fn test_picks_minimum_net_cost_among_open_plans() {
        let catalog = PlanCatalog::builtin();
        let results = results_map(vec![
            result(PlanKey::Ibr, true, dec!(70_000)),
            result(PlanKey::Paye, true, dec!(55_000)),
            result(PlanKey::Standard, true, dec!(68_000)),
        ]);
        let rec = recommend(&catalog, &results);
        assert_eq!(rec.best_plan, Some(PlanKey::Paye));
        assert!(rec.reasoning.contains("PAYE"));
    }

    #[test]
    fn test_unavailable_plan_excluded_even_when_cheapest() {
        let catalog = PlanCatalog::builtin();
        let results = results_map(vec![
            result(PlanKey::Save, false, dec!(40_000)),
            result(PlanKey::Ibr, true, dec!(70_000)),
        ]);
        let rec = recommend(&catalog, &results);
        assert_eq!(rec.best_plan, Some(PlanKey::Ibr));
    }

    #[test]
    fn test_tie_breaks_toward_shorter_term() {
        let catalog = PlanCatalog::builtin();
        // PAYE (20y) vs IBR (25y) at identical net cost
        let results = results_map(vec![
            result(PlanKey::Ibr, true, dec!(60_000)),
            result(PlanKey::Paye, true, dec!(60_000)),
        ]);
        let rec = recommend(&catalog, &results);
        assert_eq!(rec.best_plan, Some(PlanKey::Paye));
    }

    #[test]
    fn test_no_open_plan_yields_none_with_reasoning() {
        let catalog = PlanCatalog::builtin();
        let results = results_map(vec![
            result(PlanKey::Save, false, dec!(40_000)),
            result(PlanKey::Rap, false, dec!(45_000)),
        ]);
        let rec = recommend(&catalog, &results);
        assert_eq!(rec.best_plan, None);
        assert!(!rec.reasoning.is_empty());
    }

    #[test]
    fn test_single_open_plan() {
        let catalog = PlanCatalog::builtin();
        let results = results_map(vec![result(PlanKey::Standard, true, dec!(68_000))]);
        let rec = recommend(&catalog, &results);
        assert_eq!(rec.best_plan, Some(PlanKey::Standard));
        assert!(rec.reasoning.contains("only plan"));
    }
}

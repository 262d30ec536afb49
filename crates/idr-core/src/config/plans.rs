use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::poverty::PovertyGuidelines;
use crate::config::tax_tables::TaxTables;
use crate::types::{LoanType, Money, Rate};

/// Repayment plan identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PlanKey {
    Ibr,
    Paye,
    Icr,
    Save,
    Rap,
    Standard,
}

impl fmt::Display for PlanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlanKey::Ibr => "IBR",
            PlanKey::Paye => "PAYE",
            PlanKey::Icr => "ICR",
            PlanKey::Save => "SAVE",
            PlanKey::Rap => "RAP",
            PlanKey::Standard => "Standard",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for PlanKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ibr" => Ok(PlanKey::Ibr),
            "paye" => Ok(PlanKey::Paye),
            "icr" => Ok(PlanKey::Icr),
            "save" => Ok(PlanKey::Save),
            "rap" => Ok(PlanKey::Rap),
            "standard" => Ok(PlanKey::Standard),
            _ => Err(format!(
                "Unknown plan '{s}'. Use: ibr, paye, icr, save, rap, standard"
            )),
        }
    }
}

/// One band of the sliding-scale payment table. Bands are ordered ascending;
/// the final band carries `agi_up_to = None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgiBracket {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agi_up_to: Option<Money>,
    pub percent_of_agi: Rate,
}

/// How a plan prices its monthly payment. Exactly one formula per plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PaymentBasis {
    /// Fixed percentage of discretionary income, annualised.
    PercentOfDiscretionary(Rate),
    /// AGI-banded percentage of gross income (bypasses discretionary income).
    SlidingScale(Vec<AgiBracket>),
    /// Level payment fully amortising the balance over the term.
    StandardAmortization { term_years: u32 },
}

/// Static rule set for one repayment plan. Not user-mutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDefinition {
    pub key: PlanKey,
    pub payment_basis: PaymentBasis,
    /// Poverty-guideline multiple subtracted from income (1.5 = 150%).
    pub poverty_line_multiplier: Rate,
    /// Years until any remaining balance is forgiven. None = no forgiveness.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forgiveness_term_years: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_until: Option<NaiveDate>,
    pub minimum_monthly_payment: Money,
    /// Monthly deduction per household member beyond the borrower
    /// (sliding-scale plans only).
    pub dependent_deduction_monthly: Money,
    /// Cap the percent formula at the payment that would amortise the
    /// balance over this many years.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amortization_cap_years: Option<u32>,
    /// Whether Parent PLUS balances may enrol.
    pub parent_plus_eligible: bool,
}

impl PlanDefinition {
    /// Whether the plan is open for enrolment on the evaluation date.
    pub fn is_open(&self, as_of: NaiveDate) -> bool {
        if let Some(from) = self.available_from {
            if as_of < from {
                return false;
            }
        }
        if let Some(until) = self.available_until {
            if as_of >= until {
                return false;
            }
        }
        true
    }

    /// Availability for a specific loan on the evaluation date.
    pub fn is_available(&self, as_of: NaiveDate, loan_type: LoanType) -> bool {
        if loan_type == LoanType::ParentPlus && !self.parent_plus_eligible {
            return false;
        }
        self.is_open(as_of)
    }

    /// Simulation horizon in months: the forgiveness term, or the
    /// amortisation term for plans that simply pay off.
    pub fn term_months(&self) -> u32 {
        match (self.forgiveness_term_years, &self.payment_basis) {
            (Some(years), _) => years * 12,
            (None, PaymentBasis::StandardAmortization { term_years }) => term_years * 12,
            (None, _) => 0,
        }
    }

    /// Months over which a fixed amortised payment applies, when any:
    /// the plan's own amortisation term, or a percent-formula cap.
    pub fn amortization_term_months(&self) -> Option<u32> {
        match &self.payment_basis {
            PaymentBasis::StandardAmortization { term_years } => Some(term_years * 12),
            _ => self.amortization_cap_years.map(|y| y * 12),
        }
    }
}

/// Immutable rule tables for a projection run: plan definitions, poverty
/// guidelines, and forgiveness-tax tables. Constructed once and injected
/// into the projector so tests can swap tables without touching globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanCatalog {
    plans: Vec<PlanDefinition>,
    poverty: PovertyGuidelines,
    tax: TaxTables,
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

impl PlanCatalog {
    /// The published plan rules as of the 2025 reconciliation law: IBR stays
    /// open, PAYE/ICR close to new enrolment mid-2026, SAVE is wound down,
    /// and RAP opens July 2026.
    pub fn builtin() -> Self {
        let plans = vec![
            PlanDefinition {
                key: PlanKey::Ibr,
                payment_basis: PaymentBasis::PercentOfDiscretionary(dec!(0.15)),
                poverty_line_multiplier: dec!(1.5),
                forgiveness_term_years: Some(25),
                available_from: None,
                available_until: None,
                minimum_monthly_payment: dec!(5),
                dependent_deduction_monthly: Decimal::ZERO,
                amortization_cap_years: None,
                parent_plus_eligible: false,
            },
            PlanDefinition {
                key: PlanKey::Paye,
                payment_basis: PaymentBasis::PercentOfDiscretionary(dec!(0.10)),
                poverty_line_multiplier: dec!(1.5),
                forgiveness_term_years: Some(20),
                available_from: None,
                available_until: Some(date(2026, 7, 1)),
                minimum_monthly_payment: dec!(5),
                dependent_deduction_monthly: Decimal::ZERO,
                amortization_cap_years: None,
                parent_plus_eligible: false,
            },
            PlanDefinition {
                key: PlanKey::Icr,
                payment_basis: PaymentBasis::PercentOfDiscretionary(dec!(0.20)),
                poverty_line_multiplier: dec!(1.0),
                forgiveness_term_years: Some(25),
                available_from: None,
                available_until: Some(date(2026, 7, 1)),
                minimum_monthly_payment: dec!(5),
                dependent_deduction_monthly: Decimal::ZERO,
                // Lesser of 20% of discretionary and the 12-year amortised payment
                amortization_cap_years: Some(12),
                parent_plus_eligible: true,
            },
            PlanDefinition {
                key: PlanKey::Save,
                payment_basis: PaymentBasis::PercentOfDiscretionary(dec!(0.10)),
                poverty_line_multiplier: dec!(2.25),
                forgiveness_term_years: Some(25),
                available_from: None,
                available_until: Some(date(2025, 7, 1)),
                minimum_monthly_payment: dec!(5),
                dependent_deduction_monthly: Decimal::ZERO,
                amortization_cap_years: None,
                parent_plus_eligible: false,
            },
            PlanDefinition {
                key: PlanKey::Rap,
                payment_basis: PaymentBasis::SlidingScale(rap_brackets()),
                poverty_line_multiplier: Decimal::ZERO,
                forgiveness_term_years: Some(30),
                available_from: Some(date(2026, 7, 1)),
                available_until: None,
                minimum_monthly_payment: dec!(10),
                dependent_deduction_monthly: dec!(50),
                amortization_cap_years: None,
                parent_plus_eligible: false,
            },
            PlanDefinition {
                key: PlanKey::Standard,
                payment_basis: PaymentBasis::StandardAmortization { term_years: 10 },
                poverty_line_multiplier: Decimal::ZERO,
                forgiveness_term_years: None,
                available_from: None,
                available_until: None,
                minimum_monthly_payment: dec!(50),
                dependent_deduction_monthly: Decimal::ZERO,
                amortization_cap_years: None,
                parent_plus_eligible: true,
            },
        ];

        PlanCatalog {
            plans,
            poverty: PovertyGuidelines::builtin(),
            tax: TaxTables::builtin(),
        }
    }

    pub fn plans(&self) -> &[PlanDefinition] {
        &self.plans
    }

    pub fn plan(&self, key: PlanKey) -> Option<&PlanDefinition> {
        self.plans.iter().find(|p| p.key == key)
    }

    pub fn poverty(&self) -> &PovertyGuidelines {
        &self.poverty
    }

    pub fn tax_tables(&self) -> &TaxTables {
        &self.tax
    }
}

/// RAP payment bands: AGI at or below $10k pays the plan floor, then the
/// percentage climbs 1 point per $10k band to 10% above $100k.
fn rap_brackets() -> Vec<AgiBracket> {
    let mut brackets = vec![AgiBracket {
        agi_up_to: Some(dec!(10_000)),
        percent_of_agi: Decimal::ZERO,
    }];
    for band in 1..=9u32 {
        brackets.push(AgiBracket {
            agi_up_to: Some(Decimal::from((band + 1) * 10_000)),
            percent_of_agi: Decimal::from(band) / dec!(100),
        });
    }
    brackets.push(AgiBracket {
        agi_up_to: None,
        percent_of_agi: dec!(0.10),
    });
    brackets
}

/// Percentage applying to an AGI under a sliding-scale table.
pub fn sliding_scale_percent(brackets: &[AgiBracket], agi: Money) -> Rate {
    for bracket in brackets {
        match bracket.agi_up_to {
            Some(ceiling) if agi <= ceiling => return bracket.percent_of_agi,
            Some(_) => continue,
            None => return bracket.percent_of_agi,
        }
    }
    Decimal::ZERO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_has_all_plans() {
        let catalog = PlanCatalog::builtin();
        for key in [
            PlanKey::Ibr,
            PlanKey::Paye,
            PlanKey::Icr,
            PlanKey::Save,
            PlanKey::Rap,
            PlanKey::Standard,
        ] {
            assert!(catalog.plan(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_rap_not_open_before_launch() {
        let catalog = PlanCatalog::builtin();
        let rap = catalog.plan(PlanKey::Rap).unwrap();
        assert!(!rap.is_open(date(2025, 10, 1)));
        assert!(rap.is_open(date(2026, 7, 1)));
    }

    #[test]
    fn test_save_closed_after_wind_down() {
        let catalog = PlanCatalog::builtin();
        let save = catalog.plan(PlanKey::Save).unwrap();
        assert!(save.is_open(date(2025, 6, 30)));
        assert!(!save.is_open(date(2025, 7, 1)));
    }

    #[test]
    fn test_parent_plus_restricted_to_icr_and_standard() {
        let catalog = PlanCatalog::builtin();
        let as_of = date(2025, 10, 1);
        let available: Vec<PlanKey> = catalog
            .plans()
            .iter()
            .filter(|p| p.is_available(as_of, LoanType::ParentPlus))
            .map(|p| p.key)
            .collect();
        assert_eq!(available, vec![PlanKey::Icr, PlanKey::Standard]);
    }

    #[test]
    fn test_sliding_scale_band_edges() {
        let brackets = rap_brackets();
        assert_eq!(sliding_scale_percent(&brackets, dec!(10_000)), dec!(0));
        assert_eq!(sliding_scale_percent(&brackets, dec!(10_001)), dec!(0.01));
        assert_eq!(sliding_scale_percent(&brackets, dec!(60_000)), dec!(0.05));
        assert_eq!(sliding_scale_percent(&brackets, dec!(100_000)), dec!(0.09));
        assert_eq!(sliding_scale_percent(&brackets, dec!(100_001)), dec!(0.10));
    }

    #[test]
    fn test_term_months() {
        let catalog = PlanCatalog::builtin();
        assert_eq!(catalog.plan(PlanKey::Paye).unwrap().term_months(), 240);
        assert_eq!(catalog.plan(PlanKey::Standard).unwrap().term_months(), 120);
    }
}

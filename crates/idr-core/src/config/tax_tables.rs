use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{FilingStatus, Money, Rate};

/// One federal bracket: the marginal rate applying to income above the floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederalBracket {
    pub income_above: Money,
    pub marginal_rate: Rate,
}

/// Rate tables for the forgiveness-tax estimate: federal marginal brackets
/// per filing status plus a flat rate per state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxTables {
    pub single: Vec<FederalBracket>,
    pub married: Vec<FederalBracket>,
    pub head_of_household: Vec<FederalBracket>,
    pub state_rates: BTreeMap<String, Rate>,
    /// Applied when the state is not in the table.
    pub default_state_rate: Rate,
}

fn bracket(income_above: Money, marginal_rate: Rate) -> FederalBracket {
    FederalBracket {
        income_above,
        marginal_rate,
    }
}

impl TaxTables {
    /// 2025 federal brackets and a flat-rate state table.
    pub fn builtin() -> Self {
        let single = vec![
            bracket(Decimal::ZERO, dec!(0.10)),
            bracket(dec!(11_925), dec!(0.12)),
            bracket(dec!(48_475), dec!(0.22)),
            bracket(dec!(103_350), dec!(0.24)),
            bracket(dec!(197_300), dec!(0.32)),
            bracket(dec!(250_525), dec!(0.35)),
            bracket(dec!(626_350), dec!(0.37)),
        ];
        let married = vec![
            bracket(Decimal::ZERO, dec!(0.10)),
            bracket(dec!(23_850), dec!(0.12)),
            bracket(dec!(96_950), dec!(0.22)),
            bracket(dec!(206_700), dec!(0.24)),
            bracket(dec!(394_600), dec!(0.32)),
            bracket(dec!(501_050), dec!(0.35)),
            bracket(dec!(751_600), dec!(0.37)),
        ];
        let head_of_household = vec![
            bracket(Decimal::ZERO, dec!(0.10)),
            bracket(dec!(17_000), dec!(0.12)),
            bracket(dec!(64_850), dec!(0.22)),
            bracket(dec!(103_350), dec!(0.24)),
            bracket(dec!(197_300), dec!(0.32)),
            bracket(dec!(250_525), dec!(0.35)),
            bracket(dec!(626_350), dec!(0.37)),
        ];

        let mut state_rates = BTreeMap::new();
        for (state, rate) in [
            ("AK", dec!(0)),
            ("AZ", dec!(0.025)),
            ("CA", dec!(0.093)),
            ("CO", dec!(0.044)),
            ("FL", dec!(0)),
            ("GA", dec!(0.0539)),
            ("IL", dec!(0.0495)),
            ("MA", dec!(0.05)),
            ("MI", dec!(0.0425)),
            ("MN", dec!(0.0785)),
            ("NC", dec!(0.0425)),
            ("NH", dec!(0)),
            ("NJ", dec!(0.0637)),
            ("NV", dec!(0)),
            ("NY", dec!(0.0685)),
            ("OH", dec!(0.035)),
            ("OR", dec!(0.099)),
            ("PA", dec!(0.0307)),
            ("SD", dec!(0)),
            ("TN", dec!(0)),
            ("TX", dec!(0)),
            ("VA", dec!(0.0575)),
            ("WA", dec!(0)),
            ("WY", dec!(0)),
        ] {
            state_rates.insert(state.to_string(), rate);
        }

        TaxTables {
            single,
            married,
            head_of_household,
            state_rates,
            default_state_rate: dec!(0.05),
        }
    }

    /// Marginal federal rate for the bracket the income falls in.
    pub fn federal_marginal_rate(&self, filing_status: FilingStatus, income: Money) -> Rate {
        let brackets = match filing_status {
            FilingStatus::Single => &self.single,
            FilingStatus::Married => &self.married,
            FilingStatus::HeadOfHousehold => &self.head_of_household,
        };

        let mut rate = Decimal::ZERO;
        for b in brackets {
            if income >= b.income_above {
                rate = b.marginal_rate;
            } else {
                break;
            }
        }
        rate
    }

    /// Flat rate for a state, falling back to the default for states not
    /// listed. Lookup is case-insensitive.
    pub fn state_rate(&self, state: &str) -> Rate {
        self.state_rates
            .get(state.trim().to_uppercase().as_str())
            .copied()
            .unwrap_or(self.default_state_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_federal_marginal_rate_single() {
        let t = TaxTables::builtin();
        assert_eq!(
            t.federal_marginal_rate(FilingStatus::Single, dec!(60_000)),
            dec!(0.22)
        );
        assert_eq!(
            t.federal_marginal_rate(FilingStatus::Single, dec!(10_000)),
            dec!(0.10)
        );
        assert_eq!(
            t.federal_marginal_rate(FilingStatus::Single, dec!(700_000)),
            dec!(0.37)
        );
    }

    #[test]
    fn test_federal_marginal_rate_married_wider_bands() {
        let t = TaxTables::builtin();
        // 60k is 22% single but still 12% married filing jointly
        assert_eq!(
            t.federal_marginal_rate(FilingStatus::Married, dec!(60_000)),
            dec!(0.12)
        );
    }

    #[test]
    fn test_state_rate_lookup_and_default() {
        let t = TaxTables::builtin();
        assert_eq!(t.state_rate("CA"), dec!(0.093));
        assert_eq!(t.state_rate("tx"), Decimal::ZERO);
        assert_eq!(t.state_rate("ZZ"), t.default_state_rate);
    }
}

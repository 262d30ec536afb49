use rust_decimal::Decimal;

use crate::config::tax_tables::TaxTables;
use crate::types::{FilingStatus, Money};

/// Forgiven balances are excluded from gross income through this tax year.
pub const TAX_EXEMPT_THROUGH_YEAR: i32 = 2026;

/// Estimated ordinary-income tax on a forgiven balance.
///
/// A flat-rate approximation: the borrower's combined federal-marginal and
/// state rate applied to the whole forgiven amount, not a full bracket
/// integral. Forgiveness inside the exemption window is untaxed; PSLF
/// forgiveness never reaches this function.
pub fn tax_on_forgiveness(
    tables: &TaxTables,
    amount: Money,
    income_in_forgiveness_year: Money,
    filing_status: FilingStatus,
    state: &str,
    year_of_forgiveness: i32,
) -> Money {
    if amount <= Decimal::ZERO || year_of_forgiveness <= TAX_EXEMPT_THROUGH_YEAR {
        return Decimal::ZERO;
    }

    let rate = tables.federal_marginal_rate(filing_status, income_in_forgiveness_year)
        + tables.state_rate(state);
    (amount * rate).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exempt_through_policy_window() {
        let t = TaxTables::builtin();
        let tax = tax_on_forgiveness(&t, dec!(40_000), dec!(80_000), FilingStatus::Single, "CA", 2026);
        assert_eq!(tax, Decimal::ZERO);
    }

    #[test]
    fn test_taxed_after_window_at_combined_rate() {
        let t = TaxTables::builtin();
        // 80k single -> 22% federal; CA 9.3% -> 31.3% of 40k = 12,520
        let tax = tax_on_forgiveness(&t, dec!(40_000), dec!(80_000), FilingStatus::Single, "CA", 2030);
        assert_eq!(tax, dec!(12_520));
    }

    #[test]
    fn test_no_income_tax_state() {
        let t = TaxTables::builtin();
        // 22% federal only
        let tax = tax_on_forgiveness(&t, dec!(10_000), dec!(80_000), FilingStatus::Single, "TX", 2030);
        assert_eq!(tax, dec!(2_200));
    }

    #[test]
    fn test_zero_amount_is_zero_tax() {
        let t = TaxTables::builtin();
        let tax = tax_on_forgiveness(&t, Decimal::ZERO, dec!(80_000), FilingStatus::Single, "NY", 2035);
        assert_eq!(tax, Decimal::ZERO);
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::ProjectorError;
use crate::types::{Money, Rate};
use crate::ProjectorResult;

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound(rate: Rate, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

/// Level monthly payment that fully amortises `balance` over `term_months`
/// at the given annual rate: pmt = B * r * (1+r)^n / ((1+r)^n - 1).
pub fn amortized_monthly_payment(
    balance: Money,
    annual_rate: Rate,
    term_months: u32,
) -> ProjectorResult<Money> {
    if term_months == 0 {
        return Err(ProjectorError::InvalidInput {
            field: "term_months".into(),
            reason: "Amortisation term must be at least 1 month".into(),
        });
    }
    if balance <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let monthly_rate = annual_rate / dec!(12);
    if monthly_rate.is_zero() {
        return Ok(balance / Decimal::from(term_months));
    }

    let factor = compound(monthly_rate, term_months);
    let denom = factor - Decimal::ONE;
    if denom.is_zero() {
        return Ok(balance / Decimal::from(term_months));
    }

    Ok(balance * monthly_rate * factor / denom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_basic() {
        // 1.1^3 = 1.331
        assert_eq!(compound(dec!(0.10), 3), dec!(1.331));
    }

    #[test]
    fn test_amortized_payment_ten_year() {
        // $50,000 at 6.5% over 120 months ≈ $567.74/month
        let pmt = amortized_monthly_payment(dec!(50_000), dec!(0.065), 120).unwrap();
        assert!(pmt > dec!(567) && pmt < dec!(569), "pmt={}", pmt);
    }

    #[test]
    fn test_amortized_payment_zero_rate() {
        let pmt = amortized_monthly_payment(dec!(12_000), Decimal::ZERO, 120).unwrap();
        assert_eq!(pmt, dec!(100));
    }

    #[test]
    fn test_amortized_payment_zero_balance() {
        let pmt = amortized_monthly_payment(Decimal::ZERO, dec!(0.05), 120).unwrap();
        assert_eq!(pmt, Decimal::ZERO);
    }

    #[test]
    fn test_amortized_payment_zero_term_error() {
        assert!(amortized_monthly_payment(dec!(1000), dec!(0.05), 0).is_err());
    }
}

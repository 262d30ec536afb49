use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Federal poverty guideline table (48 contiguous states), keyed by household
/// size with a fixed increment for each member beyond the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PovertyGuidelines {
    /// Guideline amounts for household sizes 1 through `table.len()`.
    pub table: Vec<Money>,
    /// Increment per additional member beyond the table.
    pub per_additional_member: Money,
}

impl PovertyGuidelines {
    /// The published 2025 guidelines.
    pub fn builtin() -> Self {
        PovertyGuidelines {
            table: vec![
                dec!(15_650),
                dec!(21_150),
                dec!(26_650),
                dec!(32_150),
                dec!(37_650),
                dec!(43_150),
                dec!(48_650),
                dec!(54_150),
            ],
            per_additional_member: dec!(5_500),
        }
    }

    /// Guideline amount for a household. Sizes below 1 clamp to 1.
    pub fn guideline(&self, family_size: u32) -> Money {
        let size = family_size.max(1) as usize;
        if size <= self.table.len() {
            self.table[size - 1]
        } else {
            let last = *self.table.last().unwrap_or(&Decimal::ZERO);
            let extra = (size - self.table.len()) as i64;
            last + self.per_additional_member * Decimal::from(extra)
        }
    }
}

/// Income minus a multiple of the poverty guideline, floored at zero. The
/// base for every percent-of-income payment formula except the sliding-scale
/// plan, which consumes AGI directly.
pub fn discretionary_income(
    guidelines: &PovertyGuidelines,
    income: Money,
    family_size: u32,
    poverty_multiplier: Rate,
) -> Money {
    let threshold = guidelines.guideline(family_size) * poverty_multiplier;
    (income - threshold).max(Decimal::ZERO)
}

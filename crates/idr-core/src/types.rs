use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ProjectorError;
use crate::ProjectorResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.065 = 6.5%). Never as percentages.
pub type Rate = Decimal;

/// Tax filing status, as reported on the borrower's federal return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Single,
    Married,
    HeadOfHousehold,
}

/// Federal loan program the balance sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    Direct,
    ParentPlus,
    FfelConsolidation,
}

/// A borrower's loan position. Recreated per calculation; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanProfile {
    pub balance: Money,
    /// Annual interest rate as a decimal (0.065 = 6.5%).
    pub interest_rate: Rate,
    pub loan_type: LoanType,
    /// Completed years of repayment, used to fast-forward the forgiveness clock.
    pub years_in_repayment: u32,
}

/// A borrower's income and household position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowerProfile {
    pub annual_income: Money,
    /// Expected annual income growth as a decimal (0.03 = 3%/year).
    pub income_growth_rate: Rate,
    pub filing_status: FilingStatus,
    /// Household size, minimum 1 (the borrower). Smaller values are clamped.
    pub family_size: u32,
    /// Two-letter state code for the forgiveness tax estimate.
    pub state: String,
}

/// A field extracted from a loosely-typed upstream payload.
///
/// Upstream profile data arrives as JSON where a number may be a number, a
/// numeric string, or missing entirely. Extraction resolves each field to one
/// of these three states so typed inputs never silently receive junk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedField<T> {
    Present(T),
    Absent,
    Invalid(String),
}

impl<T> ParsedField<T> {
    /// The value, or an `InvalidInput` error naming the field.
    pub fn require(self, field: &str) -> ProjectorResult<T> {
        match self {
            ParsedField::Present(v) => Ok(v),
            ParsedField::Absent => Err(ProjectorError::InvalidInput {
                field: field.into(),
                reason: "required field is missing".into(),
            }),
            ParsedField::Invalid(reason) => Err(ProjectorError::InvalidInput {
                field: field.into(),
                reason,
            }),
        }
    }

    /// The value, `None` when absent, or an error when present but unparseable.
    pub fn optional(self, field: &str) -> ProjectorResult<Option<T>> {
        match self {
            ParsedField::Present(v) => Ok(Some(v)),
            ParsedField::Absent => Ok(None),
            ParsedField::Invalid(reason) => Err(ProjectorError::InvalidInput {
                field: field.into(),
                reason,
            }),
        }
    }

    /// The value, or a fallback when absent or invalid.
    pub fn unwrap_or(self, fallback: T) -> T {
        match self {
            ParsedField::Present(v) => v,
            _ => fallback,
        }
    }
}

impl ParsedField<Decimal> {
    /// Extract a decimal from a JSON value that may be a number, a numeric
    /// string, or null/missing.
    pub fn from_json(value: Option<&serde_json::Value>) -> Self {
        match value {
            None | Some(serde_json::Value::Null) => ParsedField::Absent,
            Some(serde_json::Value::Number(n)) => match n.to_string().parse::<Decimal>() {
                Ok(d) => ParsedField::Present(d),
                Err(e) => ParsedField::Invalid(e.to_string()),
            },
            Some(serde_json::Value::String(s)) => match s.trim().parse::<Decimal>() {
                Ok(d) => ParsedField::Present(d),
                Err(_) => ParsedField::Invalid(format!("'{s}' is not a number")),
            },
            Some(other) => ParsedField::Invalid(format!("expected a number, got {other}")),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parsed_field_from_json_number() {
        let v = json!(60000);
        assert_eq!(
            ParsedField::from_json(Some(&v)),
            ParsedField::Present(dec!(60000))
        );
    }

    #[test]
    fn test_parsed_field_from_json_numeric_string() {
        let v = json!("1234.56");
        assert_eq!(
            ParsedField::from_json(Some(&v)),
            ParsedField::Present(dec!(1234.56))
        );
    }

    #[test]
    fn test_parsed_field_from_json_garbage_string() {
        let v = json!("not a number");
        assert!(matches!(
            ParsedField::from_json(Some(&v)),
            ParsedField::Invalid(_)
        ));
    }

    #[test]
    fn test_parsed_field_absent_and_null() {
        assert_eq!(
            ParsedField::from_json(None),
            ParsedField::<Decimal>::Absent
        );
        let v = json!(null);
        assert_eq!(
            ParsedField::from_json(Some(&v)),
            ParsedField::<Decimal>::Absent
        );
    }

    #[test]
    fn test_parsed_field_require_errors_on_absent() {
        let f: ParsedField<Decimal> = ParsedField::Absent;
        assert!(f.require("annual_income").is_err());
    }

    #[test]
    fn test_parsed_field_optional_passes_absent() {
        let f: ParsedField<Decimal> = ParsedField::Absent;
        assert_eq!(f.optional("annual_income").unwrap(), None);
    }
}

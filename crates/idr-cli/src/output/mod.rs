pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Human name for a plan-map key.
pub fn plan_display_name(key: &str) -> String {
    match key {
        "ibr" => "IBR".to_string(),
        "paye" => "PAYE".to_string(),
        "icr" => "ICR".to_string(),
        "save" => "SAVE".to_string(),
        "rap" => "RAP".to_string(),
        "standard" => "Standard".to_string(),
        other => other.to_string(),
    }
}

/// Render a serialized Money value (a decimal string) to two places.
pub fn format_money(value: &Value) -> String {
    match value {
        Value::String(s) => s
            .parse::<rust_decimal::Decimal>()
            .map(|d| d.round_dp(2).to_string())
            .unwrap_or_else(|_| s.clone()),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

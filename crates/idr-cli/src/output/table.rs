use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{format_money, plan_display_name};

/// Format output as tables using the tabled crate.
///
/// Projection output gets a per-plan comparison table with the recommended
/// plan marked; anything else falls back to a field/value table.
pub fn print_table(value: &Value) {
    let envelope = match value.as_object() {
        Some(map) => map,
        None => {
            println!("{}", value);
            return;
        }
    };

    match envelope.get("result") {
        Some(result) if result.get("plans").is_some() => {
            print_projection(result);
            print_envelope_footer(envelope);
        }
        Some(Value::Object(result)) => {
            print_field_value(result);
            print_envelope_footer(envelope);
        }
        _ => print_field_value(envelope),
    }
}

fn print_projection(result: &Value) {
    let plans = match result.get("plans").and_then(|p| p.as_object()) {
        Some(p) => p,
        None => return,
    };
    let best_plan = result
        .get("recommendation")
        .and_then(|r| r.get("best_plan"))
        .and_then(|b| b.as_str());

    let mut builder = Builder::default();
    builder.push_record([
        "Plan",
        "Open",
        "First pmt",
        "Final pmt",
        "Total paid",
        "Forgiveness",
        "Tax",
        "Net cost",
    ]);

    for (key, plan) in plans {
        let mut name = plan_display_name(key);
        if best_plan == Some(key.as_str()) {
            name.push_str(" *");
        }
        let open = if plan.get("available").and_then(|a| a.as_bool()).unwrap_or(false) {
            "yes"
        } else {
            "not open"
        };
        builder.push_record([
            name.as_str(),
            open,
            &money_field(plan, "monthly_payment_year1"),
            &money_field(plan, "monthly_payment_final"),
            &money_field(plan, "total_paid"),
            &money_field(plan, "forgiveness_amount"),
            &money_field(plan, "tax_on_forgiveness"),
            &money_field(plan, "net_cost"),
        ]);
    }

    println!("{}", Table::from(builder));

    if let Some(reasoning) = result
        .get("recommendation")
        .and_then(|r| r.get("reasoning"))
        .and_then(|s| s.as_str())
    {
        println!("\nRecommendation: {}", reasoning);
    }

    if let Some(Value::Object(pslf)) = result.get("pslf") {
        println!("\nPSLF:");
        print_field_value(pslf);
    }
}

fn print_field_value(map: &serde_json::Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &scalar(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_footer(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn money_field(plan: &Value, field: &str) -> String {
    plan.get(field).map(format_money).unwrap_or_default()
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s
            .parse::<rust_decimal::Decimal>()
            .map(|d| d.round_dp(2).to_string())
            .unwrap_or_else(|_| s.clone()),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(scalar).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

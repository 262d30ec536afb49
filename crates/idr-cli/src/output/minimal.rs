use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Projection output prints the recommended plan; otherwise look for
/// well-known result fields in priority order, then fall back to the first
/// field of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Recommendation first
    if let Some(best) = result_obj
        .get("recommendation")
        .and_then(|r| r.get("best_plan"))
    {
        if !best.is_null() {
            println!("{}", format_minimal(best));
            return;
        }
    }

    let priority_keys = [
        "net_cost",
        "monthly_payment",
        "monthly_payment_year1",
        "payments_remaining",
        "estimated_forgiveness_amount",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

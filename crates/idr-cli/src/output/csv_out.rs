use serde_json::Value;
use std::io;

use super::{format_money, plan_display_name};

const PLAN_COLUMNS: [&str; 8] = [
    "available",
    "monthly_payment_year1",
    "monthly_payment_final",
    "total_paid",
    "forgiveness_amount",
    "forgiveness_year",
    "tax_on_forgiveness",
    "net_cost",
];

/// Write output as CSV to stdout: one row per plan for projection output,
/// field/value pairs otherwise.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let plans = value
        .get("result")
        .and_then(|r| r.get("plans"))
        .and_then(|p| p.as_object());

    match plans {
        Some(plans) => {
            let mut header = vec!["plan"];
            header.extend(PLAN_COLUMNS);
            let _ = wtr.write_record(&header);

            for (key, plan) in plans {
                let mut row = vec![plan_display_name(key)];
                for col in PLAN_COLUMNS {
                    row.push(csv_value(plan.get(col)));
                }
                let _ = wtr.write_record(&row);
            }
        }
        None => {
            let flat = value
                .get("result")
                .and_then(|r| r.as_object())
                .or_else(|| value.as_object());
            if let Some(map) = flat {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &csv_value(Some(val))]);
                }
            }
        }
    }

    let _ = wtr.flush();
}

fn csv_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(v @ Value::String(_)) => format_money(v),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => serde_json::to_string(other).unwrap_or_default(),
    }
}

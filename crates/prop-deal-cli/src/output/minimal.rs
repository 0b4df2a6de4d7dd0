use serde_json::Value;

/// Headline fields per command, most decision-relevant first.
const PRIORITY_KEYS: [&str; 7] = [
    "total_upfront",
    "total_monthly",
    "deal_rating",
    "stamp_duty",
    "monthly_payment",
    "tdsr_pct",
    "qualifies",
];

/// Print just the key answer from the output: the highest-priority
/// well-known field, falling back to the first field present.
pub fn print_minimal(value: &Value) {
    // unwrap the computation envelope when present
    let result = value
        .as_object()
        .and_then(|map| map.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result {
        for key in PRIORITY_KEYS {
            if let Some(field) = map.get(key) {
                if !field.is_null() {
                    println!("{}", render(field));
                    return;
                }
            }
        }
        if let Some((key, field)) = map.iter().next() {
            println!("{}: {}", key, render(field));
            return;
        }
    }

    println!("{}", render(result));
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Render the output as Field/Value tables using the tabled crate.
///
/// The computation envelope is split apart: the result object becomes the
/// main table, warnings and methodology print underneath. Nested arrays of
/// objects (the duty breakdown, the transaction sample) get their own table.
pub fn print_table(value: &Value) {
    let Value::Object(map) = value else {
        println!("{}", value);
        return;
    };

    let result = map.get("result").unwrap_or(value);

    if let Value::Object(fields) = result {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        let mut sub_tables: Vec<(&str, &Vec<Value>)> = Vec::new();

        for (key, field) in fields {
            match field {
                Value::Array(items) if items.first().is_some_and(Value::is_object) => {
                    sub_tables.push((key, items));
                }
                other => builder.push_record([key.clone(), scalar(other)]),
            }
        }
        println!("{}", Table::from(builder));

        for (name, items) in sub_tables {
            println!("\n{}:", name);
            print_records(items);
        }
    } else {
        println!("{}", result);
    }

    if let Some(Value::Array(warnings)) = map.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for warning in warnings {
                if let Value::String(text) = warning {
                    println!("  - {}", text);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = map.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

fn print_records(items: &[Value]) {
    let Some(Value::Object(first)) = items.first() else {
        return;
    };
    let headers: Vec<&String> = first.keys().collect();

    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| h.as_str()));
    for item in items {
        if let Value::Object(record) = item {
            builder.push_record(
                headers
                    .iter()
                    .map(|h| record.get(h.as_str()).map(scalar).unwrap_or_default()),
            );
        }
    }
    println!("{}", Table::from(builder));
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        nested => serde_json::to_string(nested).unwrap_or_default(),
    }
}

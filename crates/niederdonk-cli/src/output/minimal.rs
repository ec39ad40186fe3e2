use serde_json::Value;

use super::{flatten, plain};

/// Headline figure of each calculator, in order of priority.
const PRIORITY_KEYS: [&str; 5] = [
    "ebt",
    "current_ebt",
    "leverage.net_cashflow",
    "total_price",
    "roi_pct",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            let fields = flatten(map);
            for key in PRIORITY_KEYS {
                if let Some((_, val)) = fields.iter().find(|(k, v)| k == key && !v.is_null()) {
                    println!("{}", plain(val));
                    return;
                }
            }
            if let Some((key, val)) = fields.first() {
                println!("{}: {}", key, plain(val));
            }
        }
        Value::Array(arr) => println!("{}", arr.len()),
        other => println!("{}", plain(other)),
    }
}

use serde_json::Value;
use std::io;

use super::{flatten, plain};

type CsvWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout, raw decimal values.
///
/// Envelopes become `field,value` pairs with dotted keys, arrays of objects
/// one row per object, and sensitivity results the EBT grid.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = match value {
        Value::Object(map) => map.get("result").unwrap_or(value),
        other => other,
    };

    let written = match result {
        Value::Object(map) if map.contains_key("ebt_matrix") => write_grid(&mut wtr, result),
        Value::Object(map) => {
            let mut ok = wtr.write_record(["field", "value"]).is_ok();
            for (key, val) in flatten(map) {
                ok &= wtr.write_record([key, plain(&val)]).is_ok();
            }
            ok
        }
        Value::Array(arr) => write_rows(&mut wtr, arr),
        other => wtr.write_record([plain(other)]).is_ok(),
    };

    if !written || wtr.flush().is_err() {
        eprintln!("CSV output failed");
    }
}

fn write_rows(wtr: &mut CsvWriter<'_>, arr: &[Value]) -> bool {
    let Some(Value::Object(first)) = arr.first() else {
        return arr.iter().all(|item| wtr.write_record([plain(item)]).is_ok());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let mut ok = wtr.write_record(&headers).is_ok();
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(plain).unwrap_or_default())
            .collect();
        ok &= wtr.write_record(&row).is_ok();
    }
    ok
}

/// `sale_price_per_m2,<build cost 1>,<build cost 2>,...` then one EBT row per sale price.
fn write_grid(wtr: &mut CsvWriter<'_>, result: &Value) -> bool {
    let empty = Vec::new();
    let cols = result["build_cost_values"].as_array().unwrap_or(&empty);
    let rows = result["sale_price_values"].as_array().unwrap_or(&empty);
    let matrix = result["ebt_matrix"].as_array().unwrap_or(&empty);

    let mut header = vec!["sale_price_per_m2".to_string()];
    header.extend(cols.iter().map(plain));
    let mut ok = wtr.write_record(&header).is_ok();

    for (label, row) in rows.iter().zip(matrix) {
        let mut record = vec![plain(label)];
        if let Some(cells) = row.as_array() {
            record.extend(cells.iter().map(plain));
        }
        ok &= wtr.write_record(&record).is_ok();
    }
    ok
}

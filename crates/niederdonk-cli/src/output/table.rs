use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use niederdonk_core::format::{
    format_currency, format_millions, format_number, format_percent, Locale,
};

use super::{as_decimal, flatten, plain};

const TABLE_LOCALE: Locale = Locale::De;

/// Leaf names rendered as whole euros.
const MONEY_MARKERS: [&str; 10] = [
    "price", "cost", "revenue", "ebt", "investment", "amount", "cashflow", "rent", "buffer",
    "break_even",
];

/// Render output as human-readable tables with German number formatting.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result(result, map),
            _ => print_fields(map),
        },
        Value::Array(arr) => print_rows(arr),
        other => println!("{}", plain(other)),
    }
}

fn print_result(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    if let (Some(rows), Some(cols), Some(Value::Array(ebt))) = (
        result.get("sale_price_values").and_then(Value::as_array),
        result.get("build_cost_values").and_then(Value::as_array),
        result.get("ebt_matrix"),
    ) {
        print_grid(rows, cols, ebt);
        let scalars: Map<String, Value> = result
            .iter()
            .filter(|(_, v)| !v.is_array())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        print_fields(&scalars);
    } else {
        print_fields(result);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten(map) {
        let cell = format_field(&key, &val);
        builder.push_record([key, cell]);
    }
    println!("{}", Table::from(builder));
}

/// One row per object, headers from the first object (catalog listing).
fn print_rows(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", plain(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.iter().cloned());
    for item in arr.iter().filter_map(Value::as_object) {
        builder.push_record(headers.iter().map(|h| {
            item.get(h)
                .map(|v| format_field(h, v))
                .unwrap_or_default()
        }));
    }
    println!("{}", Table::from(builder));
}

/// EBT grid: sale price per m² down, build cost per m² across, in millions.
fn print_grid(rows: &[Value], cols: &[Value], matrix: &[Value]) {
    let mut builder = Builder::default();

    let mut header = vec!["sale \\ build €/m²".to_string()];
    header.extend(cols.iter().map(|c| decimal_cell(c, |d| format_number(d, 0, TABLE_LOCALE))));
    builder.push_record(header);

    for (row_label, row) in rows.iter().zip(matrix) {
        let mut record = vec![decimal_cell(row_label, |d| format_number(d, 0, TABLE_LOCALE))];
        if let Value::Array(cells) = row {
            record.extend(cells.iter().map(|c| decimal_cell(c, |d| format_millions(d, TABLE_LOCALE))));
        }
        builder.push_record(record);
    }

    println!("EBT by sale price and build cost\n{}", Table::from(builder));
}

fn decimal_cell(value: &Value, fmt: impl Fn(rust_decimal::Decimal) -> String) -> String {
    as_decimal(value).map(fmt).unwrap_or_else(|| plain(value))
}

fn format_field(key: &str, value: &Value) -> String {
    let leaf = key.rsplit('.').next().unwrap_or(key);
    if value.is_number() {
        // counts and indices are serialised as JSON numbers, decimals as strings
        return plain(value);
    }
    match as_decimal(value) {
        Some(d) if leaf.ends_with("_pct") => format_percent(d, TABLE_LOCALE),
        Some(d) if leaf.contains("area") => format!("{} m²", format_number(d, 0, TABLE_LOCALE)),
        Some(d) if MONEY_MARKERS.iter().any(|m| leaf.contains(m)) => {
            format_currency(d, TABLE_LOCALE)
        }
        _ => plain(value),
    }
}

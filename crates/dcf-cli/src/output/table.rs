use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::currency::{format_millions, format_pct};

/// Result fields shown as $ millions in the scalar table.
const MONEY_FIELDS: &[&str] = &[
    "intrinsic_value",
    "pv_of_cash_flows",
    "terminal_value",
    "terminal_value_discounted",
];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                println!("{}", flat_object_table(map));
            }
        }
        Value::Array(arr) => {
            println!("{}", array_table(arr));
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) if res_map.contains_key("matrix") => {
            println!("{}", sensitivity_table(res_map));
        }
        Value::Object(res_map) => {
            println!("{}", scalar_table(res_map));
            for (key, val) in res_map {
                if let Value::Array(rows) = val {
                    println!("\n{}:", title_case(key));
                    println!("{}", array_table(rows));
                }
            }
        }
        _ => println!("{}", flat_object_table(envelope)),
    }

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

/// Field / value table of every non-array entry.
fn scalar_table(map: &Map<String, Value>) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if !val.is_array() {
            builder.push_record([key.as_str(), &scalar_cell(key, val)]);
        }
    }
    Table::from(builder).to_string()
}

fn scalar_cell(key: &str, val: &Value) -> String {
    match as_decimal(val) {
        Some(d) if MONEY_FIELDS.contains(&key) => format_millions(d),
        Some(d) if key == "terminal_value_pct" => format_pct(d),
        _ => format_value(val),
    }
}

fn flat_object_table(map: &Map<String, Value>) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    Table::from(builder).to_string()
}

fn array_table(arr: &[Value]) -> String {
    if arr.is_empty() {
        return "(empty)".to_string();
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        Table::from(builder).to_string()
    } else {
        arr.iter().map(format_value).collect::<Vec<_>>().join("\n")
    }
}

/// WACC rows x terminal growth columns; the base case cell is starred.
pub(crate) fn sensitivity_table(map: &Map<String, Value>) -> String {
    let waccs = decimals(map.get("wacc_values"));
    let growths = decimals(map.get("terminal_growth_values"));
    let base = map
        .get("base_case_position")
        .and_then(Value::as_array)
        .and_then(|pos| Some((pos.first()?.as_u64()?, pos.get(1)?.as_u64()?)));

    let mut builder = Builder::default();
    let mut header = vec!["WACC \\ g".to_string()];
    header.extend(growths.iter().map(|g| format_pct(*g)));
    builder.push_record(header);

    let rows = map.get("matrix").and_then(Value::as_array);
    for (i, wacc) in waccs.iter().enumerate() {
        let mut record = vec![format_pct(*wacc)];
        let cells = rows
            .and_then(|r| r.get(i))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        for (j, cell) in cells.iter().enumerate() {
            let mut text = match as_decimal(cell) {
                Some(d) => format!("{:.2}", d.round_dp(2)),
                None => "n/a".to_string(),
            };
            if base == Some((i as u64, j as u64)) {
                text.push_str(" *");
            }
            record.push(text);
        }
        builder.push_record(record);
    }

    Table::from(builder).to_string()
}

fn decimals(value: Option<&Value>) -> Vec<Decimal> {
    value
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(as_decimal).collect())
        .unwrap_or_default()
}

/// Decimal from a JSON string or number.
pub(crate) fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

fn title_case(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_value(value: &Value) -> String {
    match value {
        // Decimals arrive as strings; trim them to a readable precision
        Value::String(s) => s
            .parse::<Decimal>()
            .map(|d| d.round_dp(4).to_string())
            .unwrap_or_else(|_| s.clone()),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

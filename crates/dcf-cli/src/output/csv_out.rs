use serde_json::{Map, Value};
use std::io;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(value, stdout.lock()) {
        eprintln!("CSV write error: {}", e);
    }
}

pub(crate) fn write_csv<W: io::Write>(value: &Value, out: W) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(out);

    match value.get("result") {
        Some(Value::Object(result)) if result.contains_key("cash_flows") => {
            write_cash_flows(&mut wtr, result)?;
        }
        Some(Value::Object(result)) if result.contains_key("matrix") => {
            write_matrix(&mut wtr, result)?;
        }
        Some(Value::Object(result)) => {
            wtr.write_record(["field", "value"])?;
            for (key, val) in result {
                wtr.write_record([key.as_str(), &format_csv_value(val)])?;
            }
        }
        _ => match value {
            Value::Array(arr) => write_array_csv(&mut wtr, arr)?,
            Value::Object(map) => {
                wtr.write_record(["field", "value"])?;
                for (key, val) in map {
                    wtr.write_record([key.as_str(), &format_csv_value(val)])?;
                }
            }
            _ => wtr.write_record([&format_csv_value(value)])?,
        },
    }

    wtr.flush()?;
    Ok(())
}

/// One row per projected year followed by a terminal value row.
fn write_cash_flows<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    result: &Map<String, Value>,
) -> Result<(), csv::Error> {
    wtr.write_record(["year", "undiscounted_fcf", "discount_factor", "discounted_fcf"])?;

    if let Some(Value::Array(rows)) = result.get("cash_flows") {
        for row in rows {
            let field = |k: &str| row.get(k).map(format_csv_value).unwrap_or_default();
            wtr.write_record([
                field("year"),
                field("undiscounted_fcf"),
                field("discount_factor"),
                field("discounted_fcf"),
            ])?;
        }
    }

    let field = |k: &str| result.get(k).map(format_csv_value).unwrap_or_default();
    wtr.write_record([
        "terminal".to_string(),
        field("terminal_value"),
        String::new(),
        field("terminal_value_discounted"),
    ])?;
    Ok(())
}

fn write_matrix<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    result: &Map<String, Value>,
) -> Result<(), csv::Error> {
    let empty = Vec::new();
    let growths = result
        .get("terminal_growth_values")
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    let waccs = result
        .get("wacc_values")
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    let matrix = result
        .get("matrix")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    let mut header = vec!["wacc".to_string()];
    header.extend(growths.iter().map(format_csv_value));
    wtr.write_record(&header)?;

    for (wacc, row) in waccs.iter().zip(matrix) {
        let mut record = vec![format_csv_value(wacc)];
        if let Value::Array(cells) = row {
            record.extend(cells.iter().map(format_csv_value));
        }
        wtr.write_record(&record)?;
    }
    Ok(())
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> Result<(), csv::Error> {
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        wtr.write_record(&headers)?;

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                wtr.write_record(&row)?;
            }
        }
    } else {
        for item in arr {
            wtr.write_record([&format_csv_value(item)])?;
        }
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use dcf_core::valuation::ValuationInputs;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Ask for a single value, re-prompting until the answer parses.
/// An empty answer accepts `default`.
pub fn prompt_value<T, R, W>(reader: &mut R, writer: &mut W, label: &str, default: T) -> io::Result<T>
where
    T: FromStr + Display,
    R: BufRead,
    W: Write,
{
    loop {
        write!(writer, "{label} [{default}]: ")?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("input closed while reading '{label}'"),
            ));
        }

        let answer = line.trim();
        if answer.is_empty() {
            return Ok(default);
        }
        match answer.parse::<T>() {
            Ok(value) => return Ok(value),
            Err(_) => writeln!(writer, "  '{answer}' is not a valid number, try again")?,
        }
    }
}

/// Prompt for all five valuation inputs. Rates are asked for in percent.
pub fn prompt_inputs<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    defaults: &ValuationInputs,
) -> io::Result<ValuationInputs> {
    let free_cash_flow = prompt_value(
        reader,
        writer,
        "Current free cash flow ($ millions)",
        defaults.free_cash_flow,
    )?;
    let growth_rate = prompt_percent(
        reader,
        writer,
        "Expected annual growth rate (%)",
        defaults.growth_rate,
    )?;
    let wacc = prompt_percent(reader, writer, "Discount rate / WACC (%)", defaults.wacc)?;
    let projection_years = prompt_value(
        reader,
        writer,
        "Number of years to project",
        defaults.projection_years,
    )?;
    let terminal_growth = prompt_percent(
        reader,
        writer,
        "Terminal growth rate (%)",
        defaults.terminal_growth,
    )?;

    Ok(ValuationInputs {
        free_cash_flow,
        growth_rate,
        wacc,
        projection_years,
        terminal_growth,
    })
}

fn prompt_percent<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    label: &str,
    default_rate: Decimal,
) -> io::Result<Decimal> {
    let default_pct = (default_rate * dec!(100)).normalize();
    let pct: Decimal = prompt_value(reader, writer, label, default_pct)?;
    Ok(pct / dec!(100))
}

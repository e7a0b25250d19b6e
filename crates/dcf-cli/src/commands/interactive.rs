use std::io::{self, BufRead, Write};

use colored::Colorize;
use serde_json::Value;

use dcf_core::valuation::{self, ValuationInputs};
use dcf_core::DcfError;

use crate::config::DcfConfig;
use crate::input::prompt;

/// Prompt on the terminal until the inputs produce a valuation.
pub fn run_interactive(config: &DcfConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stderr();

    writeln!(writer, "{}", "DCF Valuation".bold())?;
    writeln!(
        writer,
        "Estimate a company's intrinsic value with a discounted cash flow model."
    )?;
    writeln!(writer, "Press enter to accept the value in brackets.\n")?;

    let inputs = prompt_until_valid(&mut reader, &mut writer, config.defaults.inputs())?;
    let result = valuation::calculate_dcf(&inputs)?;
    Ok(serde_json::to_value(result)?)
}

/// Re-prompt after invalid input, offering the rejected answers as the new defaults.
fn prompt_until_valid<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    mut defaults: ValuationInputs,
) -> Result<ValuationInputs, Box<dyn std::error::Error>> {
    loop {
        let inputs = prompt::prompt_inputs(reader, writer, &defaults)?;
        match valuation::compute(&inputs) {
            Ok(_) => return Ok(inputs),
            Err(e @ DcfError::InvalidInput { .. }) => {
                tracing::debug!(error = %e, "rejected interactive inputs");
                writeln!(writer, "{} {}\n", "error:".red().bold(), e)?;
                defaults = inputs;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    #[test]
    fn test_reprompts_after_invalid_input() {
        // First round: terminal growth 10% == WACC; second round fixes it.
        let answers = "\n\n\n\n10\n\n\n\n\n2\n";
        let mut reader = Cursor::new(answers);
        let mut out = Vec::new();

        let inputs =
            prompt_until_valid(&mut reader, &mut out, DcfConfig::default().defaults.inputs())
                .unwrap();

        assert_eq!(inputs.terminal_growth, dec!(0.02));
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("must be less than WACC"));
        // Second round offers the rejected answer as the default
        assert!(shown.contains("Terminal growth rate (%) [10]: "));
    }

    #[test]
    fn test_eof_during_prompt_is_error() {
        let mut reader = Cursor::new("100\n");
        let mut out = Vec::new();
        let defaults = DcfConfig::default().defaults.inputs();
        assert!(prompt_until_valid(&mut reader, &mut out, defaults).is_err());
    }
}

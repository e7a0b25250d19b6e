use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use dcf_core::valuation::{self, ValuationInputs};

use crate::config::DcfConfig;
use crate::input;

/// Valuation inputs shared by every subcommand that runs a DCF
#[derive(Args, Debug, Default)]
#[command(allow_hyphen_values = true)]
pub struct InputArgs {
    /// Current free cash flow in $ millions
    #[arg(long, alias = "free-cash-flow")]
    pub fcf: Option<Decimal>,

    /// Annual FCF growth rate (e.g. 0.05 for 5%)
    #[arg(long)]
    pub growth_rate: Option<Decimal>,

    /// Discount rate / WACC (e.g. 0.10 for 10%)
    #[arg(long, alias = "discount-rate")]
    pub wacc: Option<Decimal>,

    /// Number of explicit projection years
    #[arg(long)]
    pub years: Option<u32>,

    /// Terminal (perpetuity) growth rate
    #[arg(long)]
    pub terminal_growth: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a single DCF valuation
#[derive(Args)]
pub struct ValueArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Resolve inputs from, in order: `--input` file, piped stdin, flags over configured defaults.
pub fn resolve_inputs(
    args: &InputArgs,
    config: &DcfConfig,
) -> Result<ValuationInputs, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(inputs) = input::stdin::read_stdin()? {
        return Ok(inputs);
    }
    Ok(merge_flags(args, config))
}

fn merge_flags(args: &InputArgs, config: &DcfConfig) -> ValuationInputs {
    let defaults = &config.defaults;
    ValuationInputs {
        free_cash_flow: args.fcf.unwrap_or(defaults.free_cash_flow),
        growth_rate: args.growth_rate.unwrap_or(defaults.growth_rate),
        wacc: args.wacc.unwrap_or(defaults.wacc),
        projection_years: args.years.unwrap_or(defaults.projection_years),
        terminal_growth: args.terminal_growth.unwrap_or(defaults.terminal_growth),
    }
}

pub fn run_value(args: ValueArgs, config: &DcfConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = resolve_inputs(&args.inputs, config)?;
    let result = valuation::calculate_dcf(&inputs)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_flags_override_defaults() {
        let args = InputArgs {
            fcf: Some(dec!(250)),
            years: Some(8),
            ..InputArgs::default()
        };
        let inputs = merge_flags(&args, &DcfConfig::default());

        assert_eq!(inputs.free_cash_flow, dec!(250));
        assert_eq!(inputs.projection_years, 8);
        assert_eq!(inputs.growth_rate, dec!(0.05));
        assert_eq!(inputs.wacc, dec!(0.10));
        assert_eq!(inputs.terminal_growth, dec!(0.02));
    }

    #[test]
    fn test_missing_input_file_is_error() {
        let args = InputArgs {
            input: Some("/nonexistent/valuation.json".into()),
            ..InputArgs::default()
        };
        assert!(resolve_inputs(&args, &DcfConfig::default()).is_err());
    }
}

use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use dcf_core::scenarios::sensitivity::{self, SensitivityInput, SweepRange};

use super::valuation::{resolve_inputs, InputArgs};
use crate::config::DcfConfig;

/// Arguments for the WACC x terminal growth sensitivity table
#[derive(Args)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// WACC sweep in format min:max:step (e.g. "0.08:0.12:0.01")
    #[arg(long)]
    pub wacc_range: Option<String>,

    /// Terminal growth sweep in format min:max:step (e.g. "0.01:0.05:0.01")
    #[arg(long)]
    pub growth_range: Option<String>,
}

fn parse_range(spec: &str) -> Result<SweepRange, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("Sweep range must be min:max:step, got '{}'", spec).into());
    }
    Ok(SweepRange {
        min: parts[0].trim().parse::<Decimal>()?,
        max: parts[1].trim().parse::<Decimal>()?,
        step: parts[2].trim().parse::<Decimal>()?,
    })
}

pub fn run_sensitivity(
    args: SensitivityArgs,
    config: &DcfConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let base = resolve_inputs(&args.inputs, config)?;

    let wacc_range = match args.wacc_range.as_deref() {
        Some(spec) => parse_range(spec)?,
        None => config.sensitivity.wacc_range.clone(),
    };
    let terminal_growth_range = match args.growth_range.as_deref() {
        Some(spec) => parse_range(spec)?,
        None => config.sensitivity.terminal_growth_range.clone(),
    };

    let input = SensitivityInput {
        base,
        wacc_range,
        terminal_growth_range,
    };
    let result = sensitivity::evaluate_sensitivity(&input)?;
    Ok(serde_json::to_value(result)?)
}

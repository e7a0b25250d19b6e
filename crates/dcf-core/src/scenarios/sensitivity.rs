use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::DcfError;
use crate::types::*;
use crate::valuation::dcf::{compute, ValuationInputs};
use crate::DcfResult;

/// Upper bound on sweep points per axis.
pub const MAX_SWEEP_POINTS: usize = 101;

/// Inclusive sweep from `min` to `max` in increments of `step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    pub min: Rate,
    pub max: Rate,
    pub step: Rate,
}

/// WACC sweep used when none is supplied: 8% to 12% in 1% steps.
pub fn default_wacc_range() -> SweepRange {
    SweepRange {
        min: dec!(0.08),
        max: dec!(0.12),
        step: dec!(0.01),
    }
}

/// Terminal growth sweep used when none is supplied: 1% to 5% in 1% steps.
pub fn default_terminal_growth_range() -> SweepRange {
    SweepRange {
        min: dec!(0.01),
        max: dec!(0.05),
        step: dec!(0.01),
    }
}

/// Input for the WACC x terminal growth sensitivity table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    /// Base case; `wacc` and `terminal_growth` are overridden per cell
    pub base: ValuationInputs,
    #[serde(default = "default_wacc_range")]
    pub wacc_range: SweepRange,
    #[serde(default = "default_terminal_growth_range")]
    pub terminal_growth_range: SweepRange,
}

/// Output of the sensitivity table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub wacc_values: Vec<Rate>,
    pub terminal_growth_values: Vec<Rate>,
    /// matrix[i][j] = intrinsic value at wacc_values[i], terminal_growth_values[j];
    /// `None` where WACC does not exceed terminal growth
    pub matrix: Vec<Vec<Option<Money>>>,
    /// Intrinsic value of the unmodified base case
    pub base_case_value: Money,
    /// Cell closest to the base case (row, col)
    pub base_case_position: (usize, usize),
}

/// Generate the sweep values for a range from min to max with step.
pub fn generate_sweep_values(field: &str, range: &SweepRange) -> DcfResult<Vec<Rate>> {
    if range.step <= Decimal::ZERO {
        return Err(DcfError::invalid(field, "Step must be positive"));
    }
    if range.min > range.max {
        return Err(DcfError::invalid(field, "Min must be <= max"));
    }

    let mut values = Vec::new();
    let mut current = range.min;
    while current <= range.max {
        if values.len() == MAX_SWEEP_POINTS {
            return Err(DcfError::invalid(
                field,
                format!("Sweep exceeds {MAX_SWEEP_POINTS} points; increase the step"),
            ));
        }
        values.push(current);
        current = match current.checked_add(range.step) {
            Some(next) => next,
            None => break,
        };
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < range.max {
            values.push(range.max);
        }
    }

    Ok(values)
}

/// Find the closest index to a target value.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| v.checked_sub(target).map_or(Decimal::MAX, |d| d.abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Evaluate intrinsic value over every (WACC, terminal growth) pair.
///
/// Infeasible cells are reported as `None` with a warning rather than
/// failing the whole table. The base case itself must be valid.
pub fn evaluate_sensitivity(
    input: &SensitivityInput,
) -> DcfResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let base_case_value = compute(&input.base)?.intrinsic_value;

    let wacc_values = generate_sweep_values("wacc_range", &input.wacc_range)?;
    let growth_values =
        generate_sweep_values("terminal_growth_range", &input.terminal_growth_range)?;

    let mut matrix = Vec::with_capacity(wacc_values.len());
    for &wacc in &wacc_values {
        let mut row = Vec::with_capacity(growth_values.len());
        for &terminal_growth in &growth_values {
            let scenario = ValuationInputs {
                wacc,
                terminal_growth,
                ..input.base.clone()
            };
            match compute(&scenario) {
                Ok(result) => row.push(Some(result.intrinsic_value)),
                Err(e) => {
                    warnings.push(format!(
                        "Evaluation failed at (wacc {wacc}, terminal growth {terminal_growth}): {e}"
                    ));
                    row.push(None);
                }
            }
        }
        matrix.push(row);
    }

    let base_row = closest_index(&wacc_values, input.base.wacc);
    let base_col = closest_index(&growth_values, input.base.terminal_growth);

    tracing::debug!(
        rows = wacc_values.len(),
        cols = growth_values.len(),
        infeasible = warnings.len(),
        "evaluated sensitivity table"
    );

    let output = SensitivityOutput {
        wacc_values,
        terminal_growth_values: growth_values,
        matrix,
        base_case_value,
        base_case_position: (base_row, base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "2-Way Sensitivity: WACC x Terminal Growth",
        input,
        warnings,
        elapsed,
        output,
    ))
}

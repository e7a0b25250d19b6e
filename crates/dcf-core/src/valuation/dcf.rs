use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::DcfError;
use crate::time_value::{discount_factor, gordon_growth_value, growth_factor, npv, present_value};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::DcfResult;

/// Longest explicit forecast horizon accepted.
pub const MAX_PROJECTION_YEARS: u32 = 100;

/// Terminal share of intrinsic value above which a warning is raised.
const TERMINAL_SHARE_WARNING: Decimal = dec!(0.75);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Inputs for a single-stage free cash flow DCF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInputs {
    /// Current (Year 0) free cash flow, in millions
    pub free_cash_flow: Money,
    /// Annual FCF growth over the explicit forecast period
    pub growth_rate: Rate,
    /// Weighted average cost of capital (discount rate)
    pub wacc: Rate,
    /// Number of explicit forecast years
    pub projection_years: u32,
    /// Perpetuity growth rate after the forecast period
    pub terminal_growth: Rate,
}

/// A single explicit forecast year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedCashFlow {
    pub year: u32,
    pub undiscounted_fcf: Money,
    pub discount_factor: Rate,
    pub discounted_fcf: Money,
}

/// Output of the DCF valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// PV(explicit flows) + PV(terminal value)
    pub intrinsic_value: Money,
    /// Year-by-year projections, Year 1 first
    pub cash_flows: Vec<ProjectedCashFlow>,
    /// Sum of discounted explicit-period flows
    pub pv_of_cash_flows: Money,
    /// Gordon growth terminal value at the end of the horizon
    pub terminal_value: Money,
    /// Terminal value discounted to today
    pub terminal_value_discounted: Money,
    /// Discounted terminal value as a fraction of intrinsic value
    pub terminal_value_pct: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the intrinsic value of a company from its current free cash flow.
///
/// Each explicit year `y` grows FCF at `growth_rate` and discounts it at `wacc`.
/// The terminal value is the Gordon growth value of the final year's FCF,
/// discounted over the full horizon.
pub fn compute(inputs: &ValuationInputs) -> DcfResult<ValuationResult> {
    validate_inputs(inputs)?;

    let cash_flows = project_cash_flows(inputs)?;
    let undiscounted: Vec<Money> = cash_flows.iter().map(|cf| cf.undiscounted_fcf).collect();
    let pv_of_cash_flows = npv(inputs.wacc, &undiscounted)?;

    let last = cash_flows
        .last()
        .ok_or_else(|| DcfError::invalid("projection_years", "No projection years generated"))?;

    let terminal_value =
        gordon_growth_value(last.undiscounted_fcf, inputs.wacc, inputs.terminal_growth)?;
    let terminal_value_discounted =
        present_value(terminal_value, inputs.wacc, inputs.projection_years)?;

    let intrinsic_value = pv_of_cash_flows
        .checked_add(terminal_value_discounted)
        .ok_or_else(|| DcfError::invalid("free_cash_flow", "intrinsic value overflows"))?;

    let terminal_value_pct = if intrinsic_value.is_zero() {
        Decimal::ZERO
    } else {
        terminal_value_discounted
            .checked_div(intrinsic_value)
            .ok_or_else(|| {
                DcfError::invalid("free_cash_flow", "terminal value share overflows")
            })?
    };

    tracing::debug!(
        free_cash_flow = %inputs.free_cash_flow,
        wacc = %inputs.wacc,
        years = inputs.projection_years,
        %intrinsic_value,
        "computed DCF valuation"
    );

    Ok(ValuationResult {
        intrinsic_value,
        cash_flows,
        pv_of_cash_flows,
        terminal_value,
        terminal_value_discounted,
        terminal_value_pct,
    })
}

/// Run [`compute`] and wrap the result with methodology, warnings and timing.
pub fn calculate_dcf(
    inputs: &ValuationInputs,
) -> DcfResult<ComputationOutput<ValuationResult>> {
    let start = Instant::now();

    let result = compute(inputs)?;
    let warnings = collect_warnings(inputs, &result);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Single-Stage FCF DCF (Gordon Growth terminal)",
        inputs,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_inputs(inputs: &ValuationInputs) -> DcfResult<()> {
    if inputs.projection_years == 0 {
        return Err(DcfError::invalid(
            "projection_years",
            "At least one projection year is required",
        ));
    }
    if inputs.projection_years > MAX_PROJECTION_YEARS {
        return Err(DcfError::invalid(
            "projection_years",
            format!("At most {MAX_PROJECTION_YEARS} projection years are supported"),
        ));
    }
    if inputs.wacc <= Decimal::ZERO {
        return Err(DcfError::invalid("wacc", "WACC must be positive"));
    }
    if inputs.growth_rate <= dec!(-1) {
        return Err(DcfError::invalid(
            "growth_rate",
            "Growth rate must be greater than -100%",
        ));
    }
    if inputs.terminal_growth <= dec!(-1) {
        return Err(DcfError::invalid(
            "terminal_growth",
            "Terminal growth rate must be greater than -100%",
        ));
    }
    // Gordon growth model constraint
    if inputs.terminal_growth >= inputs.wacc {
        return Err(DcfError::invalid(
            "terminal_growth",
            format!(
                "Terminal growth rate ({}) must be less than WACC ({}) for a finite terminal value",
                inputs.terminal_growth, inputs.wacc
            ),
        ));
    }
    Ok(())
}

fn project_cash_flows(inputs: &ValuationInputs) -> DcfResult<Vec<ProjectedCashFlow>> {
    let mut cash_flows = Vec::with_capacity(inputs.projection_years as usize);

    for year in 1..=inputs.projection_years {
        let undiscounted_fcf = inputs
            .free_cash_flow
            .checked_mul(growth_factor(inputs.growth_rate, year)?)
            .ok_or_else(|| {
                DcfError::invalid("free_cash_flow", format!("Year {year} FCF overflows"))
            })?;
        let discounted_fcf = present_value(undiscounted_fcf, inputs.wacc, year)?;

        cash_flows.push(ProjectedCashFlow {
            year,
            undiscounted_fcf,
            discount_factor: discount_factor(inputs.wacc, year)?,
            discounted_fcf,
        });
    }

    Ok(cash_flows)
}

fn collect_warnings(inputs: &ValuationInputs, result: &ValuationResult) -> Vec<String> {
    let mut warnings = Vec::new();

    if inputs.free_cash_flow <= Decimal::ZERO {
        warnings.push(format!(
            "Free cash flow ({}) is not positive; intrinsic value is not meaningful",
            inputs.free_cash_flow
        ));
    }
    if inputs.growth_rate >= inputs.wacc {
        warnings.push(format!(
            "Growth rate ({}) is at or above WACC ({}); explicit-period value grows with the horizon",
            inputs.growth_rate, inputs.wacc
        ));
    }
    if result.terminal_value_pct > TERMINAL_SHARE_WARNING {
        let share = match result.terminal_value_pct.checked_mul(dec!(100)) {
            Some(pct) => format!("{:.1}%", pct.round_dp(1)),
            None => "nearly all".to_string(),
        };
        warnings.push(format!(
            "Terminal value represents {share} of intrinsic value; consider extending the explicit forecast period"
        ));
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

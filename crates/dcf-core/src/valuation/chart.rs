//! Chart-ready series derived from a [`ValuationResult`].
//!
//! Renderers (terminal bar charts, web front ends) consume these series
//! without touching the valuation arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

use super::dcf::ValuationResult;

/// Whether a point is an explicit-period cash flow or the terminal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    CashFlow,
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    pub value: Money,
    pub kind: PointKind,
}

/// Split of intrinsic value between the explicit period and the terminal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBreakdown {
    pub pv_of_cash_flows: Money,
    pub pv_of_terminal: Money,
    pub cash_flow_pct: Rate,
    pub terminal_pct: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationChart {
    /// Year -> discounted FCF, followed by the discounted terminal value
    pub discounted: Vec<ChartPoint>,
    /// Year -> undiscounted projected FCF
    pub projected: Vec<ChartPoint>,
    pub breakdown: ValueBreakdown,
}

impl ValuationChart {
    /// Largest absolute value across both series; zero when empty.
    pub fn max_abs_value(&self) -> Money {
        self.discounted
            .iter()
            .chain(self.projected.iter())
            .map(|p| p.value.abs())
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

pub fn build_chart(result: &ValuationResult) -> ValuationChart {
    let mut discounted: Vec<ChartPoint> = result
        .cash_flows
        .iter()
        .map(|cf| ChartPoint {
            label: format!("Year {}", cf.year),
            year: Some(cf.year),
            value: cf.discounted_fcf,
            kind: PointKind::CashFlow,
        })
        .collect();
    discounted.push(ChartPoint {
        label: "Terminal".to_string(),
        year: None,
        value: result.terminal_value_discounted,
        kind: PointKind::Terminal,
    });

    let projected = result
        .cash_flows
        .iter()
        .map(|cf| ChartPoint {
            label: format!("Year {}", cf.year),
            year: Some(cf.year),
            value: cf.undiscounted_fcf,
            kind: PointKind::CashFlow,
        })
        .collect();

    ValuationChart {
        discounted,
        projected,
        breakdown: breakdown(result),
    }
}

fn breakdown(result: &ValuationResult) -> ValueBreakdown {
    let (cash_flow_pct, terminal_pct) = if result.intrinsic_value.is_zero() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let terminal_pct = result.terminal_value_pct;
        (Decimal::ONE.saturating_sub(terminal_pct), terminal_pct)
    };

    ValueBreakdown {
        pv_of_cash_flows: result.pv_of_cash_flows,
        pv_of_terminal: result.terminal_value_discounted,
        cash_flow_pct,
        terminal_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::dcf::{compute, ValuationInputs};
    use rust_decimal_macros::dec;

    fn sample_result() -> ValuationResult {
        compute(&ValuationInputs {
            free_cash_flow: dec!(100),
            growth_rate: dec!(0.05),
            wacc: dec!(0.10),
            projection_years: 5,
            terminal_growth: dec!(0.02),
        })
        .unwrap()
    }

    #[test]
    fn test_discounted_series_ends_with_terminal() {
        let result = sample_result();
        let chart = build_chart(&result);

        assert_eq!(chart.discounted.len(), 6);
        let last = chart.discounted.last().unwrap();
        assert_eq!(last.kind, PointKind::Terminal);
        assert_eq!(last.year, None);
        assert_eq!(last.value, result.terminal_value_discounted);
        assert!(chart.discounted[..5]
            .iter()
            .all(|p| p.kind == PointKind::CashFlow));
    }

    #[test]
    fn test_projected_series_uses_undiscounted_fcf() {
        let result = sample_result();
        let chart = build_chart(&result);

        assert_eq!(chart.projected.len(), 5);
        assert_eq!(chart.projected[0].label, "Year 1");
        assert_eq!(chart.projected[0].value, dec!(105));
        assert_eq!(chart.projected[4].value, result.cash_flows[4].undiscounted_fcf);
    }

    #[test]
    fn test_breakdown_sums_to_one() {
        let chart = build_chart(&sample_result());
        let b = &chart.breakdown;
        assert_eq!(b.cash_flow_pct + b.terminal_pct, Decimal::ONE);
        assert!(b.terminal_pct > dec!(0.69) && b.terminal_pct < dec!(0.70));
    }

    #[test]
    fn test_breakdown_saturates_on_extreme_share() {
        let mut result = sample_result();
        result.terminal_value_pct = Decimal::MIN;
        let b = build_chart(&result).breakdown;
        assert_eq!(b.terminal_pct, Decimal::MIN);
        assert_eq!(b.cash_flow_pct, Decimal::MAX);
    }

    #[test]
    fn test_max_abs_value_is_terminal() {
        let result = sample_result();
        let chart = build_chart(&result);
        assert_eq!(chart.max_abs_value(), result.terminal_value_discounted);
    }

    #[test]
    fn test_point_kind_serializes_snake_case() {
        let json = serde_json::to_value(PointKind::CashFlow).unwrap();
        assert_eq!(json, "cash_flow");
    }
}

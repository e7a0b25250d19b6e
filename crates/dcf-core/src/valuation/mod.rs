pub mod chart;
pub mod dcf;

pub use chart::{build_chart, ChartPoint, PointKind, ValuationChart, ValueBreakdown};
pub use dcf::{calculate_dcf, compute, ProjectedCashFlow, ValuationInputs, ValuationResult};

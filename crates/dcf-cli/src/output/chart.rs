use colored::Colorize;
use dcf_core::valuation::{build_chart, ChartPoint, PointKind, ValuationResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use super::currency::{format_millions, format_pct};
use super::table;

/// Widest bar, in characters.
const BAR_WIDTH: usize = 40;

/// Render a valuation as a headline figure plus terminal bar charts.
///
/// Anything that is not a single valuation (e.g. a sensitivity table)
/// falls back to the table formatter.
pub fn print_chart(value: &Value) {
    let parsed = value
        .get("result")
        .filter(|r| r.get("cash_flows").is_some())
        .and_then(|r| serde_json::from_value::<ValuationResult>(r.clone()).ok());

    let Some(result) = parsed else {
        table::print_table(value);
        return;
    };

    let chart = build_chart(&result);
    let scale = chart.max_abs_value();

    println!(
        "{} {}",
        "Estimated Intrinsic Value:".bold(),
        format_millions(result.intrinsic_value).green().bold()
    );

    println!("\n{}", "Discounted Free Cash Flows ($ millions)".bold());
    for (kind, line) in render_bars(&chart.discounted, scale) {
        match kind {
            PointKind::CashFlow => println!("{}", line.cyan()),
            PointKind::Terminal => println!("{}", line.magenta()),
        }
    }

    println!("\n{}", "Projected Free Cash Flows ($ millions)".bold());
    for (_, line) in render_bars(&chart.projected, scale) {
        println!("{}", line.blue());
    }

    let b = &chart.breakdown;
    println!("\n{}", "Intrinsic Value Breakdown".bold());
    println!(
        "  Discounted FCF             {} ({})",
        format_millions(b.pv_of_cash_flows),
        format_pct(b.cash_flow_pct)
    );
    println!(
        "  Discounted Terminal Value  {} ({})",
        format_millions(b.pv_of_terminal),
        format_pct(b.terminal_pct)
    );

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        for w in warnings.iter().filter_map(Value::as_str) {
            println!("{} {}", "warning:".yellow().bold(), w);
        }
    }
}

/// One uncoloured line per point: label, bar scaled against `scale`, value.
pub(crate) fn render_bars(points: &[ChartPoint], scale: Decimal) -> Vec<(PointKind, String)> {
    let label_width = points.iter().map(|p| p.label.len()).max().unwrap_or(0);

    points
        .iter()
        .map(|p| {
            let len = bar_len(p.value, scale);
            let glyph = if p.value.is_sign_negative() { '░' } else { '█' };
            let bar: String = std::iter::repeat(glyph).take(len).collect();
            let line = format!(
                "{:>lw$} │{:<bw$} {:.2}",
                p.label,
                bar,
                p.value.round_dp(2),
                lw = label_width,
                bw = BAR_WIDTH,
            );
            (p.kind, line)
        })
        .collect()
}

fn bar_len(value: Decimal, scale: Decimal) -> usize {
    if scale.is_zero() {
        return 0;
    }
    (value.abs() / scale * Decimal::from(BAR_WIDTH as u64))
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(BAR_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn point(label: &str, value: Decimal, kind: PointKind) -> ChartPoint {
        ChartPoint {
            label: label.to_string(),
            year: None,
            value,
            kind,
        }
    }

    #[test]
    fn test_bar_len_scales_to_width() {
        assert_eq!(bar_len(dec!(100), dec!(100)), BAR_WIDTH);
        assert_eq!(bar_len(dec!(50), dec!(100)), BAR_WIDTH / 2);
        assert_eq!(bar_len(dec!(-50), dec!(100)), BAR_WIDTH / 2);
        assert_eq!(bar_len(dec!(5), Decimal::ZERO), 0);
    }

    #[test]
    fn test_render_bars() {
        let points = vec![
            point("Year 1", dec!(50), PointKind::CashFlow),
            point("Terminal", dec!(100), PointKind::Terminal),
        ];
        let lines = render_bars(&points, dec!(100));

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, PointKind::CashFlow);
        assert!(lines[0].1.starts_with("  Year 1 │"));
        assert_eq!(lines[0].1.matches('█').count(), 20);
        assert_eq!(lines[1].0, PointKind::Terminal);
        assert!(lines[1].1.ends_with(" 100.00"));
        assert_eq!(lines[1].1.matches('█').count(), 40);
    }

    #[test]
    fn test_negative_values_use_light_bars() {
        let points = vec![point("Year 1", dec!(-10), PointKind::CashFlow)];
        let lines = render_bars(&points, dec!(10));
        assert_eq!(lines[0].1.matches('░').count(), BAR_WIDTH);
        assert!(lines[0].1.ends_with("-10.00"));
    }
}

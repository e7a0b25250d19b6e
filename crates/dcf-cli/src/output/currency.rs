use rust_decimal::{Decimal, RoundingStrategy};

/// Format a value in $ millions, e.g. `$1,446.21 million`.
pub fn format_millions(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!("{sign}${}.{cents} million", group_thousands(whole))
}

/// Format a fractional rate as a percentage with one decimal, e.g. `69.9%`.
pub fn format_pct(rate: Decimal) -> String {
    match rate.checked_mul(Decimal::ONE_HUNDRED) {
        Some(pct) => format!(
            "{:.1}%",
            pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        ),
        None => format!("{rate}x"),
    }
}

fn group_thousands(whole: &str) -> String {
    let mut out = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_millions() {
        assert_eq!(format_millions(dec!(1446.2118899)), "$1,446.21 million");
        assert_eq!(format_millions(dec!(95.455)), "$95.46 million");
        assert_eq!(format_millions(dec!(1234567.8)), "$1,234,567.80 million");
        assert_eq!(format_millions(dec!(0)), "$0.00 million");
    }

    #[test]
    fn test_format_negative_millions() {
        assert_eq!(format_millions(dec!(-50)), "-$50.00 million");
        assert_eq!(format_millions(dec!(-0.001)), "$0.00 million");
    }

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(dec!(0.69865)), "69.9%");
        assert_eq!(format_pct(dec!(0.1)), "10.0%");
    }
}

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::DcfError;
use crate::types::{Money, Rate};
use crate::DcfResult;

/// Compounding factor `(1 + rate)^periods`.
pub fn growth_factor(rate: Rate, periods: u32) -> DcfResult<Decimal> {
    compound(rate, periods, "growth_rate")
}

/// Discount factor `1 / (1 + rate)^periods`.
pub fn discount_factor(rate: Rate, periods: u32) -> DcfResult<Decimal> {
    if rate <= dec!(-1) {
        return Err(DcfError::invalid(
            "rate",
            "Discount rate must be greater than -100%",
        ));
    }
    let compounded = compound(rate, periods, "rate")?;
    Decimal::ONE.checked_div(compounded).ok_or_else(|| {
        DcfError::invalid("rate", format!("discount factor at period {periods} is undefined"))
    })
}

/// Present value of `amount` received `periods` periods from now:
/// `amount / (1 + rate)^periods`.
pub fn present_value(amount: Money, rate: Rate, periods: u32) -> DcfResult<Money> {
    if rate <= dec!(-1) {
        return Err(DcfError::invalid(
            "rate",
            "Discount rate must be greater than -100%",
        ));
    }
    let compounded = compound(rate, periods, "rate")?;
    amount.checked_div(compounded).ok_or_else(|| {
        DcfError::invalid("rate", format!("present value at period {periods} is undefined"))
    })
}

/// Gordon growth perpetuity value one period after `final_cash_flow`:
/// `CF * (1 + g) / (r - g)`.
pub fn gordon_growth_value(
    final_cash_flow: Money,
    discount_rate: Rate,
    growth_rate: Rate,
) -> DcfResult<Money> {
    let spread = discount_rate.checked_sub(growth_rate).ok_or_else(|| {
        DcfError::invalid(
            "terminal_growth",
            format!("{discount_rate} - {growth_rate} overflows decimal precision"),
        )
    })?;
    if spread <= Decimal::ZERO {
        return Err(DcfError::invalid(
            "terminal_growth",
            format!(
                "Discount rate ({discount_rate}) must exceed terminal growth rate ({growth_rate}) for a finite terminal value"
            ),
        ));
    }
    Decimal::ONE
        .checked_add(growth_rate)
        .and_then(|factor| final_cash_flow.checked_mul(factor))
        .and_then(|next| next.checked_div(spread))
        .ok_or_else(|| {
            DcfError::invalid("terminal_growth", "terminal value overflows decimal precision")
        })
}

/// Present value of `cash_flows`, where the first flow lands at t = 1.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> DcfResult<Money> {
    let mut total = Decimal::ZERO;
    for (idx, cf) in cash_flows.iter().enumerate() {
        let pv = present_value(*cf, rate, idx as u32 + 1)?;
        total = total.checked_add(pv).ok_or_else(|| {
            DcfError::invalid("free_cash_flow", "sum of present values overflows decimal precision")
        })?;
    }
    Ok(total)
}

fn compound(rate: Rate, periods: u32, field: &str) -> DcfResult<Decimal> {
    Decimal::ONE
        .checked_add(rate)
        .and_then(|base| base.checked_powi(i64::from(periods)))
        .ok_or_else(|| {
            DcfError::invalid(field, format!("(1 + {rate})^{periods} overflows decimal precision"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_growth_factor() {
        assert_eq!(growth_factor(dec!(0.10), 2).unwrap(), dec!(1.21));
        assert_eq!(growth_factor(dec!(0.10), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_growth_factor_overflow() {
        assert!(growth_factor(dec!(1000), 100).is_err());
    }

    #[test]
    fn test_discount_factor() {
        assert_eq!(discount_factor(dec!(0.25), 1).unwrap(), dec!(0.8));
        assert_eq!(discount_factor(dec!(0.25), 2).unwrap(), dec!(0.64));
    }

    #[test]
    fn test_discount_factor_rejects_total_loss_rate() {
        assert!(discount_factor(dec!(-1), 1).is_err());
        assert!(discount_factor(dec!(-1.5), 1).is_err());
    }

    #[test]
    fn test_present_value() {
        assert_eq!(present_value(dec!(121), dec!(0.10), 2).unwrap(), dec!(100));
        assert_eq!(present_value(dec!(50), dec!(0.10), 0).unwrap(), dec!(50));
        assert!(present_value(dec!(50), dec!(-1), 1).is_err());
    }

    #[test]
    fn test_gordon_growth_value() {
        // 100 * 1.02 / (0.10 - 0.02) = 1275
        assert_eq!(
            gordon_growth_value(dec!(100), dec!(0.10), dec!(0.02)).unwrap(),
            dec!(1275)
        );
    }

    #[test]
    fn test_gordon_growth_equal_rates() {
        let err = gordon_growth_value(dec!(100), dec!(0.05), dec!(0.05)).unwrap_err();
        assert!(matches!(err, DcfError::InvalidInput { ref field, .. } if field == "terminal_growth"));
    }

    #[test]
    fn test_npv() {
        // 110 / 1.1 + 121 / 1.21 = 200
        let pv = npv(dec!(0.10), &[dec!(110), dec!(121)]).unwrap();
        assert_eq!(pv, dec!(200));
    }

    #[test]
    fn test_extreme_rates_are_errors_not_panics() {
        assert!(growth_factor(Decimal::MAX, 1).is_err());
        assert!(discount_factor(Decimal::MAX, 1).is_err());
        assert!(present_value(dec!(100), Decimal::MAX, 1).is_err());
        assert!(gordon_growth_value(dec!(100), Decimal::MAX, dec!(-1)).is_err());
        assert!(gordon_growth_value(dec!(100), dec!(0.10), Decimal::MIN).is_err());
    }

    #[test]
    fn test_npv_sum_overflow() {
        let err = npv(dec!(0.0000001), &[Decimal::MAX, Decimal::MAX]).unwrap_err();
        assert!(matches!(err, DcfError::InvalidInput { ref field, .. } if field == "free_cash_flow"));
    }

    #[test]
    fn test_npv_empty() {
        assert_eq!(npv(dec!(0.10), &[]).unwrap(), Decimal::ZERO);
    }
}

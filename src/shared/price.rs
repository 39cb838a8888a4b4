//! Unit conversion for the dYdX v4 CLOB.
//!
//! Prices are carried on-chain as integer subticks and sizes as integer base
//! quantums. The float helpers truncate toward zero, matching an integer cast
//! of the quotient; precision loss for non-exact ratios is accepted. The
//! `_exact` variants use [`Decimal`] arithmetic for callers that need exact
//! ratios.
//!
//! For BTC-USD on the single-node deployment: 1 subtick = 0.01 USD and
//! 1 quantum = 0.00001 BTC.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Convert a human-readable price into subticks: `floor(price / tick_size)`.
///
/// A zero `tick_size` is the caller's responsibility; the float quotient is
/// infinite and the cast saturates.
///
/// # Example
///
/// ```
/// use dydx_client::shared::price::price_to_subticks;
///
/// assert_eq!(price_to_subticks(30000.0, 0.01), 3_000_000);
/// ```
pub fn price_to_subticks(price: f64, tick_size: f64) -> u64 {
    (price / tick_size) as u64
}

/// Convert a human-readable size into base quantums: `floor(size / step_size)`.
///
/// # Example
///
/// ```
/// use dydx_client::shared::price::size_to_quantums;
///
/// assert_eq!(size_to_quantums(0.001, 0.00001), 100);
/// ```
pub fn size_to_quantums(size: f64, step_size: f64) -> u64 {
    (size / step_size) as u64
}

/// Exact price conversion. Returns `None` for a zero tick size, a negative
/// price, or a result that does not fit in `u64`.
pub fn price_to_subticks_exact(price: Decimal, tick_size: Decimal) -> Option<u64> {
    exact_units(price, tick_size)
}

/// Exact size conversion. Returns `None` for a zero step size, a negative
/// size, or a result that does not fit in `u64`.
pub fn size_to_quantums_exact(size: Decimal, step_size: Decimal) -> Option<u64> {
    exact_units(size, step_size)
}

fn exact_units(value: Decimal, step: Decimal) -> Option<u64> {
    if step.is_zero() {
        return None;
    }
    value.checked_div(step)?.trunc().to_u64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_price_to_subticks() {
        assert_eq!(price_to_subticks(30000.0, 0.01), 3_000_000);
        assert_eq!(price_to_subticks(50000.0, 0.01), 5_000_000);
        assert_eq!(price_to_subticks(0.0, 0.01), 0);
    }

    #[test]
    fn test_size_to_quantums() {
        assert_eq!(size_to_quantums(0.001, 0.00001), 100);
        assert_eq!(size_to_quantums(0.1, 0.00001), 10_000);
        assert_eq!(size_to_quantums(0.0, 0.00001), 0);
    }

    #[test]
    fn test_conversion_truncates() {
        assert_eq!(price_to_subticks(10.009, 0.01), 1000);
        assert_eq!(size_to_quantums(2.9, 1.0), 2);
    }

    #[test]
    fn test_exact_conversions() {
        let price = Decimal::from_str("30000").unwrap();
        let tick = Decimal::from_str("0.01").unwrap();
        assert_eq!(price_to_subticks_exact(price, tick), Some(3_000_000));

        let size = Decimal::from_str("0.001").unwrap();
        let step = Decimal::from_str("0.00001").unwrap();
        assert_eq!(size_to_quantums_exact(size, step), Some(100));

        let odd = Decimal::from_str("0.0010099").unwrap();
        assert_eq!(size_to_quantums_exact(odd, step), Some(100));
    }

    #[test]
    fn test_exact_rejects_zero_step_and_negative() {
        assert_eq!(price_to_subticks_exact(Decimal::ONE, Decimal::ZERO), None);
        assert_eq!(size_to_quantums_exact(Decimal::NEGATIVE_ONE, Decimal::ONE), None);
    }
}

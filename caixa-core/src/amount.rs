//! Totals over money amounts.
//!
//! `Decimal` addition panics on overflow, and statements can carry amounts
//! near the edge of its range. Totals here saturate instead.

use rust_decimal::Decimal;

/// `a + b`, clamped to the `Decimal` range.
pub fn add_amounts(a: Decimal, b: Decimal) -> Decimal {
    match a.checked_add(b) {
        Some(total) => total,
        None => {
            tracing::warn!("amount total overflowed adding {a} and {b}, saturating");
            a.saturating_add(b)
        }
    }
}

pub fn sum_amounts<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, add_amounts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_in_range_is_exact() {
        let amounts = ["-45.90", "120.00", "0.10"].map(|s| Decimal::from_str_exact(s).unwrap());
        assert_eq!(sum_amounts(amounts), Decimal::from_str_exact("74.20").unwrap());
        assert_eq!(sum_amounts(Vec::new()), Decimal::ZERO);
    }

    #[test]
    fn test_overflow_saturates() {
        assert_eq!(sum_amounts([Decimal::MAX, Decimal::MAX]), Decimal::MAX);
        assert_eq!(sum_amounts([Decimal::MIN, Decimal::MIN]), Decimal::MIN);
        // Saturation is per step; later amounts still count.
        assert_eq!(
            sum_amounts([Decimal::MAX, Decimal::ONE, Decimal::NEGATIVE_ONE]),
            Decimal::MAX - Decimal::ONE
        );
    }
}

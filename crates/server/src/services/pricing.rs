//! Line-total math for order items.
//!
//! Totals are derived on read from the product's *current* unit price.
//! Nothing here is persisted, so a later price change is reflected the
//! next time the order is fetched.

use rust_decimal::Decimal;

/// Computes `unit_price * quantity` with exact decimal arithmetic.
#[must_use]
pub fn line_total(unit_price: Decimal, quantity: i64) -> Decimal {
    unit_price * Decimal::from(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplies_price_by_quantity() {
        assert_eq!(line_total(Decimal::new(5000, 2), 3), Decimal::new(15000, 2));
    }

    #[test]
    fn reflects_a_changed_unit_price() {
        let before = line_total(Decimal::new(5000, 2), 3);
        let after = line_total(Decimal::new(6000, 2), 3);
        assert_eq!(before, Decimal::new(15000, 2));
        assert_eq!(after, Decimal::new(18000, 2));
    }

    #[test]
    fn zero_quantity_is_zero() {
        assert_eq!(line_total(Decimal::new(1999, 2), 0), Decimal::ZERO);
    }
}

//! Order totals computed client-side for display.
//!
//! These figures are advisory only: the backend recomputes the charged
//! amount from the raw checkout payload, and nothing here is ever sent as a
//! trusted total.

use rust_decimal::Decimal;

use crate::api::types::CartLine;

/// Flat shipping fee, in the store currency.
pub const SHIPPING_FEE: Decimal = Decimal::from_parts(999, 0, 0, false, 2);

/// Flat tax rate applied to the subtotal.
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Subtotal, shipping, tax, and total for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// Compute display totals for the given cart lines.
    ///
    /// Tax is 10% of the subtotal rounded to two decimal places.
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        let subtotal: Decimal = lines
            .iter()
            .map(|line| line.price * Decimal::from(line.quantity))
            .sum();
        let tax = (subtotal * TAX_RATE).round_dp(2);
        Self {
            subtotal,
            shipping: SHIPPING_FEE,
            tax,
            total: subtotal + SHIPPING_FEE + tax,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use glownest_core::ProductId;

    fn line(price: Decimal, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new("p1"),
            product_name: "Serum".to_string(),
            price,
            image_url: None,
            quantity,
        }
    }

    #[test]
    fn one_line_cart_totals() {
        // {price: 50.00, qty: 2} + 9.99 shipping
        let totals = Totals::from_lines(&[line(Decimal::new(5000, 2), 2)]);
        assert_eq!(totals.subtotal, Decimal::new(10_000, 2));
        assert_eq!(totals.shipping, Decimal::new(999, 2));
        assert_eq!(totals.tax, Decimal::new(1000, 2));
        assert_eq!(totals.total, Decimal::new(11_999, 2));
    }

    #[test]
    fn tax_rounds_to_two_decimals() {
        // 19.99 * 0.1 = 1.999 -> 2.00
        let totals = Totals::from_lines(&[line(Decimal::new(1999, 2), 1)]);
        assert_eq!(totals.tax, Decimal::new(200, 2));
    }

    #[test]
    fn empty_cart_is_all_shipping() {
        let totals = Totals::from_lines(&[]);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.total, SHIPPING_FEE);
    }
}

//! Order pricing: items total, flat tax/shipping, and the coupon rule.
//!
//! Totals are computed from the submitted line snapshot, never re-read from
//! the live catalog — a price change mid-checkout neither raises nor lowers
//! what the buyer saw, and a stale cart price is honored as-is.

use crate::types::Money;

/// The one recognized coupon code. Flat 10% off the items total.
pub const COUPON_CODE: &str = "SAVE10";

/// Discount percentage granted by [`COUPON_CODE`].
pub const COUPON_PERCENT: u32 = 10;

/// Evaluate a coupon code against an items total.
///
/// The recognized code yields a 10% discount rounded to a whole rupee
/// (halves away from zero); any other code yields zero. Matching ignores
/// surrounding whitespace and case.
#[must_use]
pub fn coupon_discount(code: &str, items_price: Money) -> Money {
    if code.trim().eq_ignore_ascii_case(COUPON_CODE) {
        items_price.percent(COUPON_PERCENT).round_rupee()
    } else {
        Money::ZERO
    }
}

/// `Σ unit_price × quantity` over submitted lines.
#[must_use]
pub fn items_price<I>(lines: I) -> Money
where
    I: IntoIterator<Item = (Money, u32)>,
{
    lines
        .into_iter()
        .map(|(unit_price, quantity)| unit_price.times(quantity))
        .sum()
}

/// The price breakdown stamped onto a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub items_price: Money,
    pub tax_price: Money,
    pub shipping_price: Money,
    pub discount: Money,
    pub total_price: Money,
}

impl OrderTotals {
    /// Compute the breakdown for an items total and an optional coupon.
    ///
    /// Tax and shipping are flat zero; the invariant
    /// `total = items + tax + shipping − discount` holds by construction.
    #[must_use]
    pub fn compute(items_price: Money, coupon_code: Option<&str>) -> Self {
        let tax_price = Money::ZERO;
        let shipping_price = Money::ZERO;
        let discount = coupon_code.map_or(Money::ZERO, |code| coupon_discount(code, items_price));

        Self {
            items_price,
            tax_price,
            shipping_price,
            discount,
            total_price: items_price + tax_price + shipping_price - discount,
        }
    }
}

//! Checkout price breakdowns.
//!
//! All arithmetic is exact [`Decimal`] arithmetic; nothing is rounded
//! mid-calculation. Rounding to two decimal places happens only when an
//! amount is rendered for display via [`display_usd`], so repeated
//! recomputation never compounds rounding error.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso};
use serde::Serialize;
use thiserror::Error;

/// Errors from price breakdown computation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The base price was negative.
    #[error("base price must not be negative")]
    NegativeBasePrice,

    /// The discount percent was outside `0..=100`.
    #[error("discount percent must be between 0 and 100")]
    PercentOutOfRange,

    /// The VAT rate was outside `0..=1`.
    #[error("VAT rate must be between 0 and 1")]
    VatRateOutOfRange,

    /// Decimal arithmetic overflowed.
    #[error("price arithmetic overflowed")]
    Overflow,
}

/// Derived, immutable price breakdown for a single checkout.
///
/// Recomputed from scratch whenever base price, discount percent or VAT
/// rate changes; never mutated in place. Satisfies
/// `total == subtotal - discount_amount + tax_amount` and
/// `discount_amount <= subtotal` by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Course base price before discount and tax.
    pub subtotal: Decimal,

    /// Amount removed by the discount: `subtotal * percent / 100`.
    pub discount_amount: Decimal,

    /// VAT charged on the discounted subtotal.
    pub tax_amount: Decimal,

    /// Amount due: `subtotal - discount_amount + tax_amount`.
    pub total: Decimal,
}

impl PriceBreakdown {
    /// A breakdown with every field zero (free course, no charge).
    #[must_use]
    pub fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    /// The discounted subtotal before tax.
    #[must_use]
    pub fn discounted_subtotal(&self) -> Decimal {
        self.subtotal - self.discount_amount
    }
}

/// Computes the price breakdown for a base price, discount percent and
/// VAT rate.
///
/// VAT is charged on the discounted subtotal. Out-of-range inputs are
/// rejected rather than clamped, so a caller can surface the bad input
/// instead of silently charging a different amount.
///
/// # Errors
///
/// - [`PriceError::NegativeBasePrice`]: `base_price < 0`.
/// - [`PriceError::PercentOutOfRange`]: `discount_percent` outside `0..=100`.
/// - [`PriceError::VatRateOutOfRange`]: `vat_rate` outside `0..=1`.
/// - [`PriceError::Overflow`]: decimal arithmetic overflowed.
pub fn compute(
    base_price: Decimal,
    discount_percent: Decimal,
    vat_rate: Decimal,
) -> Result<PriceBreakdown, PriceError> {
    if base_price < Decimal::ZERO {
        return Err(PriceError::NegativeBasePrice);
    }

    if vat_rate < Decimal::ZERO || vat_rate > Decimal::ONE {
        return Err(PriceError::VatRateOutOfRange);
    }

    let discount_amount = percent_of(discount_percent, base_price)?;

    let discounted = base_price
        .checked_sub(discount_amount)
        .ok_or(PriceError::Overflow)?;

    let tax_amount = discounted
        .checked_mul(vat_rate)
        .ok_or(PriceError::Overflow)?;

    let total = discounted
        .checked_add(tax_amount)
        .ok_or(PriceError::Overflow)?;

    Ok(PriceBreakdown {
        subtotal: base_price,
        discount_amount,
        tax_amount,
        total,
    })
}

/// Calculates `percent` percent of `amount` without intermediate rounding.
fn percent_of(percent: Decimal, amount: Decimal) -> Result<Decimal, PriceError> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(PriceError::PercentOutOfRange);
    }

    amount
        .checked_mul(percent)
        .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(PriceError::Overflow)
}

/// Renders an amount as display money: USD, two decimal places, half-up.
///
/// This is the only place rounding occurs.
#[must_use]
pub fn display_usd(amount: Decimal) -> Money<'static, iso::Currency> {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Money::from_decimal(rounded, iso::USD)
}

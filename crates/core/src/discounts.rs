//! Discount codes and offers.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::{self, PriceBreakdown, PriceError};

/// Errors specific to discount modelling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// The offer percent was outside `0..=100`.
    #[error("discount percent must be between 0 and 100")]
    PercentOutOfRange,
}

/// A normalised, non-empty discount code.
///
/// Blank or whitespace-only input means "no discount requested" and is
/// not an error: [`DiscountCode::parse`] returns `None` for it, so the
/// distinction is carried in the type rather than a sentinel string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscountCode(String);

impl DiscountCode {
    /// Parses user input into a code, trimming surrounding whitespace.
    ///
    /// Returns `None` when the input is empty or whitespace-only.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// The normalised code text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiscountCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only client projection of a server-side discount offer.
///
/// Offers are created server-side and applied at most once per checkout
/// session; the pricing service owns existence and expiry. This type
/// only guarantees the percent is within range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountOffer {
    code: DiscountCode,
    percent: Decimal,
}

impl DiscountOffer {
    /// Creates an offer, validating the percent.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::PercentOutOfRange`] when `percent` is
    /// outside `0..=100`.
    pub fn new(code: DiscountCode, percent: Decimal) -> Result<Self, DiscountError> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(DiscountError::PercentOutOfRange);
        }

        Ok(Self { code, percent })
    }

    /// The code this offer was redeemed with.
    #[must_use]
    pub fn code(&self) -> &DiscountCode {
        &self.code
    }

    /// The percentage reduction, in `0..=100`.
    #[must_use]
    pub fn percent(&self) -> Decimal {
        self.percent
    }

    /// Prices a course against this offer.
    ///
    /// # Errors
    ///
    /// Propagates [`PriceError`] from [`pricing::compute`] for a
    /// negative base price or out-of-range VAT rate.
    pub fn apply(
        &self,
        base_price: Decimal,
        vat_rate: Decimal,
    ) -> Result<PriceBreakdown, PriceError> {
        pricing::compute(base_price, self.percent, vat_rate)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let code = DiscountCode::parse("  SUMMER25 ");

        assert_eq!(code.map(|c| c.as_str().to_owned()), Some("SUMMER25".to_owned()));
    }

    #[test]
    fn blank_input_is_no_discount_requested() {
        assert_eq!(DiscountCode::parse(""), None);
        assert_eq!(DiscountCode::parse("   "), None);
        assert_eq!(DiscountCode::parse("\t\n"), None);
    }

    #[test]
    fn offer_rejects_out_of_range_percent() -> TestResult {
        let code = DiscountCode::parse("LAUNCH").ok_or("code should parse")?;

        assert_eq!(
            DiscountOffer::new(code.clone(), "101".parse()?),
            Err(DiscountError::PercentOutOfRange)
        );
        assert_eq!(
            DiscountOffer::new(code, "-1".parse()?),
            Err(DiscountError::PercentOutOfRange)
        );

        Ok(())
    }

    #[test]
    fn offer_applies_through_the_price_calculator() -> TestResult {
        let code = DiscountCode::parse("LAUNCH").ok_or("code should parse")?;
        let offer = DiscountOffer::new(code, "25".parse()?)?;

        let breakdown = offer.apply("200".parse()?, "0.2".parse()?)?;

        assert_eq!(breakdown.discount_amount, "50".parse()?);
        assert_eq!(breakdown.total, "180".parse()?);

        Ok(())
    }
}

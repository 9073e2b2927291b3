//! Discount code validation.

use std::sync::Arc;

use coursepay::{
    discounts::{DiscountCode, DiscountOffer},
    pricing::PriceBreakdown,
};
use rust_decimal::Decimal;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::clients::PricingApi;

/// User-facing fallback message when the pricing service is unreachable.
const UNAVAILABLE_MESSAGE: &str =
    "could not check the discount code right now; try again or continue without it";

/// Result of validating a discount code, as shown at checkout.
///
/// Every failure mode is recovered into a variant with a user-facing
/// message; validation itself never surfaces an error to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Blank or whitespace-only input: nothing to validate.
    NoneRequested,

    /// Code accepted. The breakdown is recomputed client-side from the
    /// reported percent and the configured VAT rate.
    Valid {
        /// The redeemed offer.
        offer: DiscountOffer,

        /// Client-computed price breakdown.
        breakdown: PriceBreakdown,

        /// Success message from the pricing service.
        message: String,
    },

    /// Code rejected (unknown, expired or not applicable to the course).
    Invalid {
        /// User-facing rejection message.
        message: String,
    },

    /// The pricing service could not be reached; checkout proceeds with
    /// no discount applied.
    Unavailable {
        /// Retryable failure message.
        message: String,
    },
}

impl ValidationOutcome {
    /// The computed breakdown, when the code validated.
    #[must_use]
    pub fn breakdown(&self) -> Option<&PriceBreakdown> {
        match self {
            Self::Valid { breakdown, .. } => Some(breakdown),
            _ => None,
        }
    }
}

/// Validates discount codes against the pricing service and prices the
/// result.
#[derive(Clone)]
pub struct DiscountValidator {
    pricing: Arc<dyn PricingApi>,
    vat_rate: Decimal,
}

impl DiscountValidator {
    /// Create a validator using the given VAT rate for breakdowns.
    #[must_use]
    pub fn new(pricing: Arc<dyn PricingApi>, vat_rate: Decimal) -> Self {
        Self { pricing, vat_rate }
    }

    /// Validate `raw_code` for `course_id`.
    ///
    /// Blank input short-circuits to [`ValidationOutcome::NoneRequested`]
    /// without a network call.
    pub async fn validate(&self, course_id: Uuid, raw_code: &str) -> ValidationOutcome {
        let Some(code) = DiscountCode::parse(raw_code) else {
            return ValidationOutcome::NoneRequested;
        };

        let response = match self.pricing.validate_discount(course_id, code.as_str()).await {
            Ok(response) => response,
            Err(error) => {
                warn!(%course_id, %error, "discount validation unavailable");

                return ValidationOutcome::Unavailable {
                    message: UNAVAILABLE_MESSAGE.to_owned(),
                };
            }
        };

        if !response.is_valid {
            return ValidationOutcome::Invalid {
                message: response.message,
            };
        }

        let offer = match DiscountOffer::new(code, response.discount_percent) {
            Ok(offer) => offer,
            Err(error) => {
                warn!(%course_id, %error, percent = %response.discount_percent, "service reported an unusable discount percent");

                return ValidationOutcome::Invalid {
                    message: "this discount cannot be applied".to_owned(),
                };
            }
        };

        let breakdown = match offer.apply(response.original_price, self.vat_rate) {
            Ok(breakdown) => breakdown,
            Err(error) => {
                warn!(%course_id, %error, "could not price the validated discount");

                return ValidationOutcome::Invalid {
                    message: "this discount cannot be applied".to_owned(),
                };
            }
        };

        // The service's final_price has unspecified VAT handling; the
        // client breakdown is authoritative. Surface drift for triage.
        if breakdown.discounted_subtotal() != response.final_price {
            debug!(
                %course_id,
                server = %response.final_price,
                client = %breakdown.discounted_subtotal(),
                "server final price differs from client breakdown"
            );
        }

        ValidationOutcome::Valid {
            offer,
            breakdown,
            message: response.message,
        }
    }
}

//! Checkout orchestration.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::clients::{CheckoutSession, PricingApi};

use super::{
    errors::CheckoutError,
    validation::{DiscountValidator, ValidationOutcome},
};

/// Result of beginning a checkout: the hosted session to redirect to,
/// plus the validation outcome that was actually applied to it.
#[derive(Debug, Clone)]
pub struct BeginCheckout {
    /// Provider-hosted session; hand `session_url` to the redirect.
    pub session: CheckoutSession,

    /// What happened to the discount code, for display.
    pub validation: ValidationOutcome,
}

/// Orchestrates a purchase attempt: optional discount validation, then
/// checkout session creation for the external payment redirect.
#[derive(Clone)]
pub struct CheckoutService {
    pricing: Arc<dyn PricingApi>,
    vat_rate: Decimal,
}

impl CheckoutService {
    /// Create a checkout service with the configured VAT rate.
    #[must_use]
    pub fn new(pricing: Arc<dyn PricingApi>, vat_rate: Decimal) -> Self {
        Self { pricing, vat_rate }
    }

    /// A validator sharing this service's pricing client and VAT rate.
    #[must_use]
    pub fn validator(&self) -> DiscountValidator {
        DiscountValidator::new(Arc::clone(&self.pricing), self.vat_rate)
    }

    /// Begin a checkout for `course_id` with the discount input as typed.
    ///
    /// A rejected code fails the checkout so the user can correct or
    /// clear it. An unreachable pricing service during validation falls
    /// back to no discount rather than blocking the purchase.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InvalidDiscount`]: the code was rejected.
    /// - [`CheckoutError::Api`]: session creation failed.
    pub async fn begin_checkout(
        &self,
        course_id: Uuid,
        raw_code: &str,
    ) -> Result<BeginCheckout, CheckoutError> {
        let validation = self.validator().validate(course_id, raw_code).await;

        let discount_code = match &validation {
            ValidationOutcome::Valid { offer, .. } => Some(offer.code().as_str().to_owned()),
            ValidationOutcome::NoneRequested => None,
            ValidationOutcome::Unavailable { .. } => {
                debug!(%course_id, "proceeding to checkout without the unverifiable discount");
                None
            }
            ValidationOutcome::Invalid { message } => {
                return Err(CheckoutError::InvalidDiscount {
                    message: message.clone(),
                });
            }
        };

        let session = self
            .pricing
            .create_checkout_session(course_id, discount_code)
            .await?;

        Ok(BeginCheckout {
            session,
            validation,
        })
    }
}

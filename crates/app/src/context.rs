//! App context.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    checkout::{CheckoutService, DebouncedDiscountValidator},
    clients::{
        HttpPaymentsApi, HttpPricingApi, PaymentsApi, PaymentsApiConfig, PricingApi,
        PricingApiConfig,
    },
    config::AppConfig,
    refunds::RefundService,
    session::Session,
};

/// Errors raised while building the application context.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The configured VAT rate was outside `0..=1`.
    #[error("VAT rate must be between 0 and 1, got {0}")]
    InvalidVatRate(Decimal),

    /// The configured refund window was negative.
    #[error("refund window days must not be negative, got {0}")]
    InvalidRefundWindow(i64),
}

/// Shared application context wiring clients, services and session
/// state together.
#[derive(Clone)]
pub struct AppContext {
    /// Pricing service client.
    pub pricing: Arc<dyn PricingApi>,

    /// Payments service client.
    pub payments: Arc<dyn PaymentsApi>,

    /// Checkout orchestration.
    pub checkout: CheckoutService,

    /// Refund workflow.
    pub refunds: RefundService,

    /// Process-wide session handle.
    pub session: Session,

    discount_debounce: Duration,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the pricing or refund settings are out of
    /// range.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let vat_rate = config.checkout.vat_rate;

        if vat_rate < Decimal::ZERO || vat_rate > Decimal::ONE {
            return Err(AppInitError::InvalidVatRate(vat_rate));
        }

        if config.refunds.window_days < 0 {
            return Err(AppInitError::InvalidRefundWindow(config.refunds.window_days));
        }

        let pricing: Arc<dyn PricingApi> = Arc::new(HttpPricingApi::new(PricingApiConfig {
            base_url: config.services.pricing_api_url.clone(),
        }));

        let payments: Arc<dyn PaymentsApi> = Arc::new(HttpPaymentsApi::new(PaymentsApiConfig {
            base_url: config.services.payments_api_url.clone(),
        }));

        Ok(Self {
            checkout: CheckoutService::new(Arc::clone(&pricing), vat_rate),
            refunds: RefundService::new(Arc::clone(&payments), config.refunds.window_days),
            pricing,
            payments,
            session: Session::new(),
            discount_debounce: Duration::from_millis(config.checkout.discount_debounce_ms),
        })
    }

    /// Debounced discount validator for a new checkout dialog.
    #[must_use]
    pub fn discount_validator(&self) -> DebouncedDiscountValidator {
        DebouncedDiscountValidator::new(self.checkout.validator(), self.discount_debounce)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use crate::config::AppConfig;

    use super::*;

    #[test]
    fn builds_from_default_configuration() -> TestResult {
        let config = AppConfig::try_parse_from(["coursepay"])?;

        let context = AppContext::from_config(&config)?;

        assert!(!context.session.is_authenticated());

        Ok(())
    }

    #[test]
    fn rejects_an_out_of_range_vat_rate() -> TestResult {
        let config = AppConfig::try_parse_from(["coursepay", "--vat-rate", "1.5"])?;

        let result = AppContext::from_config(&config);

        assert!(
            matches!(result, Err(AppInitError::InvalidVatRate(_))),
            "expected InvalidVatRate"
        );

        Ok(())
    }

    #[test]
    fn rejects_a_negative_refund_window() -> TestResult {
        let config = AppConfig::try_parse_from(["coursepay", "--window-days=-1"])?;

        let result = AppContext::from_config(&config);

        assert!(
            matches!(result, Err(AppInitError::InvalidRefundWindow(-1))),
            "expected InvalidRefundWindow"
        );

        Ok(())
    }
}

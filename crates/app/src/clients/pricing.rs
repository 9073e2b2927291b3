//! Pricing service client: discount validation and checkout sessions.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ApiError;

/// Configuration for connecting to the pricing service.
#[derive(Debug, Clone)]
pub struct PricingApiConfig {
    /// Pricing service base URL, e.g. `"http://localhost:8700"`.
    pub base_url: String,
}

/// Wire request for discount validation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountValidationRequest {
    /// Course the code is being redeemed against.
    pub course_id: Uuid,

    /// Raw discount code as typed.
    pub discount_code: String,
}

/// Wire response from the discount-validation endpoint.
///
/// The service owns existence, expiry and per-course applicability; the
/// client recomputes the breakdown from `discount_percent` rather than
/// trusting `final_price` (its VAT handling is unspecified).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountValidationResponse {
    /// Whether the code is valid for this course right now.
    pub is_valid: bool,

    /// Course base price.
    pub original_price: Decimal,

    /// Service-computed discount amount.
    pub discount_amount: Decimal,

    /// Service-computed price after discount.
    pub final_price: Decimal,

    /// Percentage reduction the code grants.
    pub discount_percent: Decimal,

    /// User-facing message (why invalid, or a success blurb).
    pub message: String,
}

/// Wire request for checkout session creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionRequest {
    /// Course being purchased.
    pub course_id: Uuid,

    /// Validated discount code, when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
}

/// A payment-provider-hosted checkout session.
///
/// The session URL is handed to the external payment redirect; nothing
/// else in this codebase touches the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    /// Provider session identifier.
    pub session_id: String,

    /// Hosted payment page URL.
    pub session_url: String,
}

/// Pricing service operations used by checkout.
#[automock]
#[async_trait]
pub trait PricingApi: Send + Sync {
    /// Validate a discount code against a course.
    async fn validate_discount(
        &self,
        course_id: Uuid,
        code: &str,
    ) -> Result<DiscountValidationResponse, ApiError>;

    /// Create a hosted checkout session for a purchase attempt.
    async fn create_checkout_session(
        &self,
        course_id: Uuid,
        discount_code: Option<String>,
    ) -> Result<CheckoutSession, ApiError>;
}

/// HTTP implementation of [`PricingApi`].
#[derive(Debug, Clone)]
pub struct HttpPricingApi {
    config: PricingApiConfig,
    http: Client,
}

impl HttpPricingApi {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: PricingApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl PricingApi for HttpPricingApi {
    async fn validate_discount(
        &self,
        course_id: Uuid,
        code: &str,
    ) -> Result<DiscountValidationResponse, ApiError> {
        let url = format!("{}/api/discounts/validate", self.config.base_url);

        let body = DiscountValidationRequest {
            course_id,
            discount_code: code.to_owned(),
        };

        let response = self.http.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(ApiError::UnexpectedResponse(format!(
                "discount validation failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }

    async fn create_checkout_session(
        &self,
        course_id: Uuid,
        discount_code: Option<String>,
    ) -> Result<CheckoutSession, ApiError> {
        let url = format!("{}/api/checkout/sessions", self.config.base_url);

        let body = CheckoutSessionRequest {
            course_id,
            discount_code,
        };

        let response = self.http.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(ApiError::UnexpectedResponse(format!(
                "checkout session creation failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }
}

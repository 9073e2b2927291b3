//! Payments service client: payment history reads and refund requests.

use async_trait::async_trait;
use coursepay::payments::Payment;
use mockall::automock;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ApiError;

/// Configuration for connecting to the payments service.
#[derive(Debug, Clone)]
pub struct PaymentsApiConfig {
    /// Payments service base URL, e.g. `"http://localhost:8701"`.
    pub base_url: String,
}

/// Wire request for a refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    /// Course whose purchase is being refunded.
    pub course_id: Uuid,

    /// Free-text reason supplied by the student.
    pub reason: String,
}

/// Backend verdict on a refund request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundStatus {
    /// Accepted and queued for processing.
    Requested,

    /// Processed and approved.
    Approved,

    /// Rejected; the server's decision supersedes any client-side
    /// eligibility computation.
    Rejected,
}

/// Wire response from the refund endpoint. Authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundReceipt {
    /// Backend refund identifier.
    pub id: Uuid,

    /// Verdict on the request.
    pub status: RefundStatus,
}

/// Payments service operations used by the dashboards and refund flow.
#[automock]
#[async_trait]
pub trait PaymentsApi: Send + Sync {
    /// Fetch the signed-in student's payment history.
    async fn list_payments(&self) -> Result<Vec<Payment>, ApiError>;

    /// Fetch a single payment by id.
    async fn get_payment(&self, id: Uuid) -> Result<Payment, ApiError>;

    /// Request a refund. The backend re-validates eligibility; its
    /// verdict supersedes any client-side check.
    async fn request_refund(&self, request: RefundRequest) -> Result<RefundReceipt, ApiError>;
}

/// HTTP implementation of [`PaymentsApi`].
#[derive(Debug, Clone)]
pub struct HttpPaymentsApi {
    config: PaymentsApiConfig,
    http: Client,
}

impl HttpPaymentsApi {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: PaymentsApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl PaymentsApi for HttpPaymentsApi {
    async fn list_payments(&self) -> Result<Vec<Payment>, ApiError> {
        let url = format!("{}/api/payments", self.config.base_url);

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(ApiError::UnexpectedResponse(format!(
                "payment history fetch failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }

    async fn get_payment(&self, id: Uuid) -> Result<Payment, ApiError> {
        let url = format!("{}/api/payments/{id}", self.config.base_url);

        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(ApiError::UnexpectedResponse(format!(
                "payment fetch failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }

    async fn request_refund(&self, request: RefundRequest) -> Result<RefundReceipt, ApiError> {
        let url = format!("{}/api/refunds", self.config.base_url);

        let response = self.http.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(ApiError::UnexpectedResponse(format!(
                "refund request failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn refund_request_serialises_camel_case() -> TestResult {
        let course_id: Uuid = "019212d3-87f4-7cc5-b500-9f3ce1fd5fd1".parse()?;

        let body = RefundRequest {
            course_id,
            reason: "course not as described".to_owned(),
        };

        assert_eq!(
            serde_json::to_value(&body)?,
            json!({
                "courseId": "019212d3-87f4-7cc5-b500-9f3ce1fd5fd1",
                "reason": "course not as described",
            })
        );

        Ok(())
    }

    #[test]
    fn refund_receipt_deserialises_and_ignores_extra_fields() -> TestResult {
        let receipt: RefundReceipt = serde_json::from_value(json!({
            "id": "019212d3-87f4-7cc5-b500-9f3ce1fd5fd2",
            "status": "REJECTED",
            "processedBy": "ops@example.com",
        }))?;

        assert_eq!(receipt.status, RefundStatus::Rejected);

        Ok(())
    }
}

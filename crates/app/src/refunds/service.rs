//! Refund service.
//!
//! Client-side eligibility is advisory UX guidance only; every actual
//! refund request defers to the payments service, which re-validates
//! and whose decision always wins.

use std::sync::Arc;

use coursepay::{
    payments::Payment,
    refunds::{self, RefundEligibility},
};
use jiff::Timestamp;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::clients::{PaymentsApi, RefundReceipt, RefundRequest, RefundStatus};

use super::errors::RefundError;

/// Refund workflow over the payments service.
#[derive(Clone)]
pub struct RefundService {
    payments: Arc<dyn PaymentsApi>,
    window_days: i64,
}

impl RefundService {
    /// Create a refund service with the configured window.
    #[must_use]
    pub fn new(payments: Arc<dyn PaymentsApi>, window_days: i64) -> Self {
        Self {
            payments,
            window_days,
        }
    }

    /// Advisory eligibility for a single payment at `now`.
    ///
    /// # Errors
    ///
    /// - [`RefundError::NotFound`]: the payment does not exist.
    /// - [`RefundError::Api`]: the payments service call failed.
    pub async fn eligibility(
        &self,
        payment_id: Uuid,
        now: Timestamp,
    ) -> Result<RefundEligibility, RefundError> {
        let payment = self.payments.get_payment(payment_id).await?;

        Ok(refunds::check_eligibility(&payment, now, self.window_days))
    }

    /// Payments still inside the refund window at `now`, for the
    /// student dashboard.
    ///
    /// # Errors
    ///
    /// - [`RefundError::Api`]: the payment-history fetch failed.
    pub async fn refundable_payments(&self, now: Timestamp) -> Result<Vec<Payment>, RefundError> {
        let history = self.payments.list_payments().await?;

        Ok(refunds::refundable_payments(&history, now, self.window_days)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Request a refund for `payment`'s course purchase.
    ///
    /// The local eligibility check runs first purely to log surprises;
    /// the request is sent regardless and the server decides.
    ///
    /// # Errors
    ///
    /// - [`RefundError::Rejected`]: the server rejected the refund.
    /// - [`RefundError::Api`]: the refund call failed.
    pub async fn request_refund(
        &self,
        payment: &Payment,
        course_id: Uuid,
        reason: String,
        now: Timestamp,
    ) -> Result<RefundReceipt, RefundError> {
        let advisory = refunds::check_eligibility(payment, now, self.window_days);

        if !advisory.eligible {
            debug!(
                payment = %payment.id,
                reason = ?advisory.reason,
                "requesting refund despite advisory ineligibility"
            );
        }

        let receipt = self
            .payments
            .request_refund(RefundRequest { course_id, reason })
            .await?;

        if receipt.status == RefundStatus::Rejected {
            if advisory.eligible {
                warn!(
                    payment = %payment.id,
                    refund = %receipt.id,
                    "refund rejected server-side despite client-side eligibility"
                );
            }

            return Err(RefundError::Rejected { receipt });
        }

        Ok(receipt)
    }
}

//! Payment projections.
//!
//! Payments are owned by the backend; the client holds read-only
//! snapshots deserialised from the payment-history endpoint and never
//! mutates them.

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a payment, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Checkout started but not yet settled.
    Pending,

    /// Settled successfully.
    Completed,

    /// Provider reported failure.
    Failed,

    /// Cancelled before settlement.
    Cancelled,
}

impl PaymentStatus {
    /// Whether this status can ever enter the refund-requestable state.
    ///
    /// Only completed payments can; every other status is terminal for
    /// refund purposes.
    #[must_use]
    pub fn is_refundable(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };

        f.write_str(text)
    }
}

/// Read-only projection of a backend payment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Backend payment identifier.
    pub id: Uuid,

    /// Amount charged, in major units.
    pub amount: Decimal,

    /// ISO currency code, e.g. `"USD"`.
    pub currency: String,

    /// Current lifecycle status.
    pub status: PaymentStatus,

    /// When the payment record was created.
    pub created_at: Timestamp,
}

//! Refund errors.

use thiserror::Error;

use crate::clients::{ApiError, RefundReceipt};

/// Errors raised by the refund workflow.
#[derive(Debug, Error)]
pub enum RefundError {
    /// The payments service rejected the refund. Its verdict is
    /// authoritative and supersedes any client-side eligibility check.
    #[error("refund rejected by the payments service")]
    Rejected {
        /// The rejection receipt.
        receipt: RefundReceipt,
    },

    /// The payment does not exist.
    #[error("payment not found")]
    NotFound,

    /// Transport or unexpected-response failure.
    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for RefundError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::NotFound => Self::NotFound,
            other => Self::Api(other),
        }
    }
}

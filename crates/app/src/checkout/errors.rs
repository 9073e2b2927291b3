//! Checkout errors.

use thiserror::Error;

use crate::clients::ApiError;

/// Errors raised while beginning a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The pricing service rejected the discount code; the user should
    /// correct or clear it before retrying.
    #[error("invalid discount code: {message}")]
    InvalidDiscount {
        /// User-facing message from the pricing service.
        message: String,
    },

    /// Session creation failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

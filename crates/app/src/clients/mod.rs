//! HTTP clients for the marketplace's external services.

mod error;
mod payments;
mod pricing;

pub use error::ApiError;
pub use payments::*;
pub use pricing::*;

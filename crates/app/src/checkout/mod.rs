//! Checkout flow: discount validation and session creation.

mod debounce;
mod errors;
mod service;
mod validation;

pub use debounce::*;
pub use errors::*;
pub use service::*;
pub use validation::*;

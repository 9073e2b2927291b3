//! Refund workflow over the payments service.

mod errors;
mod service;

pub use errors::*;
pub use service::*;

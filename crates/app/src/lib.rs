//! Coursepay application layer.
//!
//! Async glue between the pure pricing/refund domain in `coursepay` and
//! the marketplace's external REST services: discount validation (with
//! debounce/supersede semantics), checkout session creation, refund
//! requests and payment-history reads, plus process-wide session state
//! and configuration.

pub mod checkout;
pub mod clients;
pub mod config;
pub mod context;
pub mod refunds;
pub mod session;

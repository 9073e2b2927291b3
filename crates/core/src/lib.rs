//! Coursepay
//!
//! Coursepay is the checkout-side pricing and refund domain for an
//! online-course marketplace: price/discount/VAT breakdowns, discount
//! code modelling, payment projections and refund-eligibility windows.
//!
//! Everything in this crate is pure and synchronous; the asynchronous
//! application layer lives in `coursepay-app`.

pub mod discounts;
pub mod payments;
pub mod pricing;
pub mod refunds;

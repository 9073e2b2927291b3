//! Refund-eligibility windows.
//!
//! The window computed here is advisory: it drives what the dashboard
//! shows, but the backend re-validates eligibility when a refund is
//! actually requested and its verdict always wins.

use std::fmt;

use jiff::Timestamp;

use crate::payments::{Payment, PaymentStatus};

/// Default refund window: days after payment completion during which a
/// refund may be requested.
pub const DEFAULT_WINDOW_DAYS: i64 = 3;

const SECONDS_PER_DAY: i64 = 86_400;

/// Outcome of an advisory refund-eligibility check.
///
/// Derived from a [`Payment`] snapshot and a point in time; never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundEligibility {
    /// Whether a refund request would currently be accepted, as far as
    /// the client can tell.
    pub eligible: bool,

    /// Whole days left in the window; zero when ineligible or on the
    /// final day.
    pub days_remaining: i64,

    /// Why the payment is ineligible, when it is.
    pub reason: Option<IneligibilityReason>,
}

/// Why a payment cannot be refunded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibilityReason {
    /// The payment never completed; its status is terminal for refund
    /// purposes.
    NotCompleted(PaymentStatus),

    /// The payment completed but the window has closed.
    WindowExpired {
        /// Whole days elapsed since the payment was created.
        days_elapsed: i64,
    },
}

impl fmt::Display for IneligibilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotCompleted(status) => {
                write!(f, "payment is {status}; only completed payments can be refunded")
            }
            Self::WindowExpired { days_elapsed } => {
                write!(f, "refund window expired; payment was made {days_elapsed} days ago")
            }
        }
    }
}

/// Checks whether `payment` is still inside its refund window at `now`.
///
/// Elapsed time is floored to whole days; exactly `window_days` elapsed
/// days is still eligible. A `created_at` in the future (clock skew
/// between client and backend) counts as zero elapsed days.
#[must_use]
pub fn check_eligibility(payment: &Payment, now: Timestamp, window_days: i64) -> RefundEligibility {
    if !payment.status.is_refundable() {
        return RefundEligibility {
            eligible: false,
            days_remaining: 0,
            reason: Some(IneligibilityReason::NotCompleted(payment.status)),
        };
    }

    let days_elapsed = days_between(payment.created_at, now);

    if days_elapsed > window_days {
        return RefundEligibility {
            eligible: false,
            days_remaining: 0,
            reason: Some(IneligibilityReason::WindowExpired { days_elapsed }),
        };
    }

    RefundEligibility {
        eligible: true,
        days_remaining: (window_days - days_elapsed).clamp(0, window_days),
        reason: None,
    }
}

/// Filters a payment history down to entries still inside the refund
/// window at `now`.
#[must_use]
pub fn refundable_payments(
    payments: &[Payment],
    now: Timestamp,
    window_days: i64,
) -> Vec<&Payment> {
    payments
        .iter()
        .filter(|payment| check_eligibility(payment, now, window_days).eligible)
        .collect()
}

/// Whole elapsed days between two instants, floored.
fn days_between(from: Timestamp, to: Timestamp) -> i64 {
    (to.as_second() - from.as_second()).div_euclid(SECONDS_PER_DAY)
}

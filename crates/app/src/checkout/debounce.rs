//! Debounced, supersedable discount validation.
//!
//! Checkout dialogs validate while the user types. Each submission is
//! tagged with a monotonically increasing sequence number and waits out
//! a quiet period before touching the network; a finished validation is
//! applied only if it still corresponds to the newest submission. The
//! guard is the sequence number, not response-arrival order, so a slow
//! response for an earlier keystroke can never overwrite a later one.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use tokio::{sync::watch, task::JoinHandle, time};
use uuid::Uuid;

use super::validation::{DiscountValidator, ValidationOutcome};

/// Debounce wrapper around [`DiscountValidator`] for a single checkout
/// dialog.
pub struct DebouncedDiscountValidator {
    validator: Arc<DiscountValidator>,
    quiet_period: Duration,
    issued: Arc<AtomicU64>,
    applied: Arc<Mutex<u64>>,
    outcome_tx: watch::Sender<ValidationOutcome>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl DebouncedDiscountValidator {
    /// Create a debounced validator with the given quiet period.
    #[must_use]
    pub fn new(validator: DiscountValidator, quiet_period: Duration) -> Self {
        let (outcome_tx, _) = watch::channel(ValidationOutcome::NoneRequested);

        Self {
            validator: Arc::new(validator),
            quiet_period,
            issued: Arc::new(AtomicU64::new(0)),
            applied: Arc::new(Mutex::new(0)),
            outcome_tx,
            in_flight: Mutex::new(None),
        }
    }

    /// Subscribe to the latest applied outcome.
    ///
    /// The channel starts at [`ValidationOutcome::NoneRequested`] and
    /// only ever moves to results of the newest submission.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ValidationOutcome> {
        self.outcome_tx.subscribe()
    }

    /// Submit the current contents of the discount code input.
    ///
    /// Starts a fresh quiet period. Any earlier submission is logically
    /// cancelled: it may still be running, but its result is discarded.
    pub fn submit(&self, course_id: Uuid, raw_code: String) {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let validator = Arc::clone(&self.validator);
        let issued = Arc::clone(&self.issued);
        let applied = Arc::clone(&self.applied);
        let outcome_tx = self.outcome_tx.clone();
        let quiet_period = self.quiet_period;

        let handle = tokio::spawn(async move {
            time::sleep(quiet_period).await;

            // Superseded while waiting out the quiet period.
            if issued.load(Ordering::SeqCst) != seq {
                return;
            }

            let outcome = validator.validate(course_id, &raw_code).await;

            let mut last_applied = applied.lock().unwrap_or_else(PoisonError::into_inner);

            // Apply only if this is still the newest submission and no
            // newer result has already been published.
            if issued.load(Ordering::SeqCst) == seq && *last_applied < seq {
                *last_applied = seq;
                _ = outcome_tx.send_replace(outcome);
            }
        });

        let previous = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);

        // An unfinished predecessor keeps running but can no longer
        // publish; dropping the handle is enough.
        drop(previous);
    }

    /// Cancel any in-flight validation and reset the displayed outcome.
    ///
    /// Used when the checkout dialog closes or the course changes; a
    /// late result from before the cancel is ignored.
    pub fn cancel(&self) {
        self.issued.fetch_add(1, Ordering::SeqCst);

        if let Some(handle) = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }

        _ = self.outcome_tx.send_replace(ValidationOutcome::NoneRequested);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use coursepay::pricing::PriceBreakdown;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::clients::{
        ApiError, CheckoutSession, DiscountValidationResponse, PricingApi,
    };

    use super::*;

    /// Pricing stub with a scripted delay and response per code, so
    /// response-arrival order can be controlled from the test.
    struct ScriptedPricingApi {
        scripts: HashMap<String, (Duration, DiscountValidationResponse)>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedPricingApi {
        fn new(scripts: HashMap<String, (Duration, DiscountValidationResponse)>) -> Self {
            Self {
                scripts,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl PricingApi for ScriptedPricingApi {
        async fn validate_discount(
            &self,
            _course_id: Uuid,
            code: &str,
        ) -> Result<DiscountValidationResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            let (delay, response) = self
                .scripts
                .get(code)
                .cloned()
                .ok_or_else(|| ApiError::UnexpectedResponse(format!("unscripted code {code}")))?;

            time::sleep(delay).await;

            Ok(response)
        }

        async fn create_checkout_session(
            &self,
            _course_id: Uuid,
            _discount_code: Option<String>,
        ) -> Result<CheckoutSession, ApiError> {
            Err(ApiError::UnexpectedResponse("not scripted".to_owned()))
        }
    }

    fn valid_response(percent: &str) -> Result<DiscountValidationResponse, rust_decimal::Error> {
        let original_price: Decimal = "100".parse()?;
        let discount_percent: Decimal = percent.parse()?;
        let discount_amount = original_price * discount_percent / Decimal::ONE_HUNDRED;

        Ok(DiscountValidationResponse {
            is_valid: true,
            original_price,
            discount_amount,
            final_price: original_price - discount_amount,
            discount_percent,
            message: format!("{percent}% off applied"),
        })
    }

    fn debounced(
        api: ScriptedPricingApi,
        quiet_ms: u64,
    ) -> Result<DebouncedDiscountValidator, rust_decimal::Error> {
        let validator = DiscountValidator::new(Arc::new(api), "0.1".parse()?);

        Ok(DebouncedDiscountValidator::new(
            validator,
            Duration::from_millis(quiet_ms),
        ))
    }

    fn applied_breakdown(
        rx: &watch::Receiver<ValidationOutcome>,
    ) -> Option<(String, PriceBreakdown)> {
        match &*rx.borrow() {
            ValidationOutcome::Valid {
                offer, breakdown, ..
            } => Some((offer.code().as_str().to_owned(), *breakdown)),
            _ => None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_earlier_response_never_overwrites_newer_result() -> TestResult {
        // "A" answers slowly, "B" quickly: A's response arrives after
        // B's even though A was submitted first.
        let scripts = HashMap::from([
            ("A".to_owned(), (Duration::from_millis(500), valid_response("50")?)),
            ("B".to_owned(), (Duration::from_millis(10), valid_response("20")?)),
        ]);

        let debounced = debounced(ScriptedPricingApi::new(scripts), 50)?;
        let rx = debounced.subscribe();
        let course = Uuid::now_v7();

        debounced.submit(course, "A".to_owned());

        // Let "A" clear its quiet period and go in flight.
        time::sleep(Duration::from_millis(60)).await;
        debounced.submit(course, "B".to_owned());

        // Both responses have arrived by now.
        time::sleep(Duration::from_secs(2)).await;

        let (code, breakdown) = applied_breakdown(&rx).ok_or("expected a valid outcome")?;
        assert_eq!(code, "B", "only the newest submission may be applied");
        assert_eq!(breakdown.discount_amount, "20".parse::<Decimal>()?);

        // Nothing later flips it back to "A".
        time::sleep(Duration::from_secs(2)).await;
        let (code, _) = applied_breakdown(&rx).ok_or("expected a valid outcome")?;
        assert_eq!(code, "B", "a stale result must be discarded silently");

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_keystrokes_within_the_quiet_period_coalesce() -> TestResult {
        let scripts = HashMap::from([
            ("SAVE".to_owned(), (Duration::from_millis(5), valid_response("10")?)),
            ("SAVE20".to_owned(), (Duration::from_millis(5), valid_response("20")?)),
        ]);

        let api = ScriptedPricingApi::new(scripts);
        let calls = Arc::clone(&api.calls);
        let debounced = debounced(api, 50)?;
        let rx = debounced.subscribe();
        let course = Uuid::now_v7();

        debounced.submit(course, "SAVE".to_owned());
        time::sleep(Duration::from_millis(10)).await;
        debounced.submit(course, "SAVE20".to_owned());

        time::sleep(Duration::from_secs(1)).await;

        assert_eq!(
            calls.load(Ordering::SeqCst),
            1,
            "the superseded keystroke must not reach the network"
        );

        let (code, _) = applied_breakdown(&rx).ok_or("expected a valid outcome")?;
        assert_eq!(code, "SAVE20");

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_a_late_result() -> TestResult {
        let scripts = HashMap::from([(
            "A".to_owned(),
            (Duration::from_millis(500), valid_response("50")?),
        )]);

        let debounced = debounced(ScriptedPricingApi::new(scripts), 50)?;
        let rx = debounced.subscribe();
        let course = Uuid::now_v7();

        debounced.submit(course, "A".to_owned());
        time::sleep(Duration::from_millis(60)).await;

        // Dialog closed while the validation is in flight.
        debounced.cancel();
        time::sleep(Duration::from_secs(2)).await;

        assert_eq!(
            *rx.borrow(),
            ValidationOutcome::NoneRequested,
            "a cancelled validation must not publish"
        );

        Ok(())
    }
}

// Copyright (c) The Damper Project Authors.
// Licensed under the MIT License.

use tally::Window;
use tick::Clock;

use crate::options::clamp_inspiration_success_rate;
use crate::rnd::{DropDecision, Rnd, drop_when_below};
use crate::{CircuitBreaker, Rejected, ThrottleOptions};

/// Adaptive throttle implementing the Google SRE client-side throttling
/// algorithm.
///
/// The throttle keeps a rolling window of recent request outcomes. On every
/// [`allow`][Self::allow] call it reads the aggregated success and total
/// counts and computes a drop probability
///
/// ```text
/// drop = max(0, (total - success / isr) / (total + 1))
/// ```
///
/// which is zero while the observed success rate is at or above the
/// configured inspiration success rate (ISR) and grows toward one as the rate
/// falls further below it. The request is then rejected with that
/// probability. There is no persisted open/closed/half-open state and no
/// timer forcing transitions: throttling deepens and recovers continuously as
/// the window accumulates and forgets samples.
///
/// Two guards keep the throttle from engaging on noise: it never rejects
/// while the window holds fewer than `ignore_requests` samples, and never
/// while the success rate is at or above the ISR.
///
/// One instance governs one logical request stream; instances share no state.
///
/// # Examples
///
/// ```
/// use damper::AdaptiveThrottle;
/// # use tick::Clock;
///
/// # fn example(clock: &Clock, send_request: impl Fn() -> bool) {
/// let throttle = AdaptiveThrottle::new(clock);
///
/// if throttle.allow().is_ok() {
///     if send_request() {
///         throttle.mark_success();
///     } else {
///         throttle.mark_failed();
///     }
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct AdaptiveThrottle {
    window: Window,
    rnd: Rnd,
    drop_decision: DropDecision,
    inspiration_success_rate: f64,
    ignore_requests: u64,
}

impl AdaptiveThrottle {
    /// Creates a throttle with default options.
    #[must_use]
    pub fn new(clock: &Clock) -> Self {
        Self::with_options(clock, ThrottleOptions::default())
    }

    /// Creates a throttle with the given options.
    #[must_use]
    pub fn with_options(clock: &Clock, options: ThrottleOptions) -> Self {
        Self {
            window: Window::new(clock, options.buckets(), options.bucket_duration()),
            rnd: Rnd::default(),
            drop_decision: drop_when_below,
            // Options built through the setters are already in range; values
            // arriving through deserialization may not be.
            inspiration_success_rate: clamp_inspiration_success_rate(options.inspiration_success_rate()),
            ignore_requests: options.ignore_requests(),
        }
    }

    /// Checks whether an outgoing request should be admitted.
    ///
    /// Returns [`Rejected`] when the request should not be sent right now.
    /// The check is synchronous and non-blocking; it performs only in-memory
    /// aggregate reads and a single random draw. It does not record anything
    /// about the request it admits — report the outcome through
    /// [`mark_success`][Self::mark_success] or
    /// [`mark_failed`][Self::mark_failed].
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`] when the admission check decides to throttle the
    /// request. This is an expected outcome, not a fault.
    pub fn allow(&self) -> Result<(), Rejected> {
        let (success, total) = self.summary();

        #[expect(clippy::cast_precision_loss, reason = "window counts stay far below 2^53")]
        let (success_f, total_f) = (success as f64, total as f64);

        // The number of requests the window would need for the observed
        // successes to meet the target rate.
        let inspiration_requests = success_f / self.inspiration_success_rate;

        // Self-protection: too few samples to judge, or success rate still at
        // or above the target.
        if total < self.ignore_requests || total_f < inspiration_requests {
            return Ok(());
        }

        // The +1 denominator avoids division by zero and dampens the
        // probability at small volumes.
        let drop_probability = ((total_f - inspiration_requests) / (total_f + 1.0)).max(0.0);

        if (self.drop_decision)(self.rnd.next_f64(), drop_probability) {
            tracing::debug!(success, total, drop_probability, "request throttled");
            return Err(Rejected);
        }

        Ok(())
    }

    /// Records a successful request outcome in the statistics window.
    pub fn mark_success(&self) {
        self.window.add(1);
    }

    /// Records a failed request outcome in the statistics window.
    pub fn mark_failed(&self) {
        self.window.add(0);
    }

    fn summary(&self) -> (u64, u64) {
        let aggregate = self.window.aggregate();
        (aggregate.sum(), aggregate.count())
    }
}

impl CircuitBreaker for AdaptiveThrottle {
    fn allow(&self) -> Result<(), Rejected> {
        Self::allow(self)
    }

    fn mark_success(&self) {
        Self::mark_success(self);
    }

    fn mark_failed(&self) {
        Self::mark_failed(self);
    }
}

// Copyright (c) The Damper Project Authors.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Client-side adaptive throttling for protecting degraded backends.
//!
//! This crate implements the adaptive throttling algorithm from the Google
//! SRE book: a caller-side admission check that probabilistically rejects
//! outgoing requests once the locally observed success ratio drops below a
//! configured floor, without ever fully cutting off the backend. Request
//! volume is shed in proportion to the observed failure severity, which
//! smooths backend load instead of producing the load-shedding cliffs of a
//! binary open/closed breaker.
//!
//! # How it works
//!
//! Every outgoing request first calls [`allow`][AdaptiveThrottle::allow]. An
//! admitted request is issued by the caller, which then reports the outcome
//! through [`mark_success`][AdaptiveThrottle::mark_success] or
//! [`mark_failed`][AdaptiveThrottle::mark_failed]. Outcomes feed a rolling
//! statistics window; the admission check reads the aggregated counts on
//! every call, so evaluation lives entirely on the request path with no
//! background loop.
//!
//! The classic open, closed, and half-open breaker states exist here only as
//! emergent properties of the continuously recomputed drop probability.
//! Recovery needs no timer: the window simply forgets old failures as time
//! passes and new outcomes arrive.
//!
//! # Quick Start
//!
//! ```
//! use damper::{AdaptiveThrottle, Rejected, ThrottleOptions};
//! # use tick::Clock;
//!
//! # fn example(clock: &Clock) -> Result<(), Rejected> {
//! let throttle = AdaptiveThrottle::with_options(
//!     clock,
//!     ThrottleOptions::default().with_inspiration_success_rate(0.8),
//! );
//!
//! throttle.allow()?;
//! // issue the request, then:
//! throttle.mark_success();
//! # Ok(())
//! # }
//! ```
//!
//! > **Note**: The throttle takes a [`Clock`][tick::Clock] from the [`tick`]
//! > crate so that window rotation is controllable in tests.
//!
//! # Thread safety
//!
//! One [`AdaptiveThrottle`] instance is meant to be shared by many concurrent
//! callers. All three operations are safe to call from independent threads
//! without external locking, never block on I/O, and complete in bounded
//! time. Window aggregates are eventually consistent across threads: an
//! outcome marked on one thread becomes visible to admission checks on other
//! threads promptly but without a strict ordering guarantee.
//!
//! # Features
//!
//! - `serde`: serialization support for [`ThrottleOptions`].

mod constants;
mod error;
mod options;
mod rnd;
mod throttle;

pub use error::Rejected;
pub use options::ThrottleOptions;
pub use throttle::AdaptiveThrottle;

/// Contract for caller-side circuit breakers guarding one request stream.
///
/// Implementations decide per request whether the caller should proceed, and
/// learn from the outcomes the caller reports back. [`AdaptiveThrottle`] is
/// the implementation this crate provides; the trait is the seam for swapping
/// in a different admission policy or a test double.
pub trait CircuitBreaker: Send + Sync {
    /// Checks whether an outgoing request should be admitted.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`] when the request should not be sent right now.
    /// Rejection is an expected outcome, not a fault; callers typically fall
    /// back or retry later.
    fn allow(&self) -> Result<(), Rejected>;

    /// Records a successful request outcome.
    fn mark_success(&self);

    /// Records a failed request outcome.
    fn mark_failed(&self);
}

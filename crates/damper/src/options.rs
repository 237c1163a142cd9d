// Copyright (c) The Damper Project Authors.
// Licensed under the MIT License.

use std::time::Duration;

use crate::constants::{
    DEFAULT_BUCKET_DURATION, DEFAULT_BUCKETS, DEFAULT_IGNORE_REQUESTS,
    DEFAULT_INSPIRATION_SUCCESS_RATE, MIN_INSPIRATION_SUCCESS_RATE,
};

/// Raises out-of-range ISR values to the representable minimum and lowers
/// values above 1. `NaN` maps to the minimum.
pub(crate) fn clamp_inspiration_success_rate(isr: f64) -> f64 {
    if isr.is_nan() || isr < MIN_INSPIRATION_SUCCESS_RATE {
        MIN_INSPIRATION_SUCCESS_RATE
    } else {
        isr.min(1.0)
    }
}

/// Configuration for an [`AdaptiveThrottle`][crate::AdaptiveThrottle].
///
/// Options are immutable once the throttle is constructed. Unset options fall
/// back to their defaults:
///
/// | option | default |
/// |---|---|
/// | [`inspiration_success_rate`][Self::with_inspiration_success_rate] | 0.5 |
/// | [`ignore_requests`][Self::with_ignore_requests] | 100 |
/// | [`buckets`][Self::with_buckets] | 10 |
/// | [`bucket_duration`][Self::with_bucket_duration] | 30s |
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use damper::ThrottleOptions;
///
/// let options = ThrottleOptions::default()
///     .with_inspiration_success_rate(0.8)
///     .with_ignore_requests(50)
///     .with_buckets(20)
///     .with_bucket_duration(Duration::from_secs(5));
///
/// assert_eq!(options.ignore_requests(), 50);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct ThrottleOptions {
    inspiration_success_rate: f64,
    ignore_requests: u64,
    buckets: u32,
    bucket_duration: Duration,
}

impl Default for ThrottleOptions {
    fn default() -> Self {
        Self {
            inspiration_success_rate: DEFAULT_INSPIRATION_SUCCESS_RATE,
            ignore_requests: DEFAULT_IGNORE_REQUESTS,
            buckets: DEFAULT_BUCKETS,
            bucket_duration: DEFAULT_BUCKET_DURATION,
        }
    }
}

impl ThrottleOptions {
    /// Sets the inspiration success rate (ISR).
    ///
    /// The throttle engages only while the observed success rate over the
    /// statistics window is below this floor. Increasing the ISR makes
    /// throttling more aggressive, reducing it makes throttling less
    /// aggressive.
    ///
    /// The value is defensively clamped into `(0, 1]` rather than rejected;
    /// an ISR of zero or below would otherwise divide by zero during the
    /// admission check.
    #[must_use]
    pub fn with_inspiration_success_rate(mut self, isr: f64) -> Self {
        self.inspiration_success_rate = clamp_inspiration_success_rate(isr);
        self
    }

    /// Sets the minimum number of requests the statistics window must contain
    /// before the throttle can engage.
    ///
    /// Below this volume the admission check always admits, no matter how low
    /// the success rate is. This keeps a handful of failures during startup
    /// or idle periods from tripping the throttle on statistically
    /// insignificant data.
    #[must_use]
    pub fn with_ignore_requests(mut self, ignore_requests: u64) -> Self {
        self.ignore_requests = ignore_requests;
        self
    }

    /// Sets the number of buckets composing the statistics window.
    ///
    /// Raised to at least 1.
    #[must_use]
    pub fn with_buckets(mut self, buckets: u32) -> Self {
        self.buckets = buckets.max(1);
        self
    }

    /// Sets the maximum duration of a single bucket.
    ///
    /// The window spans `buckets × bucket_duration`; samples older than the
    /// span stop influencing admission decisions, which is how the throttle
    /// recovers once a degradation episode ends.
    #[must_use]
    pub fn with_bucket_duration(mut self, bucket_duration: Duration) -> Self {
        self.bucket_duration = bucket_duration;
        self
    }

    /// The configured inspiration success rate.
    #[must_use]
    pub fn inspiration_success_rate(&self) -> f64 {
        self.inspiration_success_rate
    }

    /// The configured ignore-requests floor.
    #[must_use]
    pub fn ignore_requests(&self) -> u64 {
        self.ignore_requests
    }

    /// The configured bucket count.
    #[must_use]
    pub fn buckets(&self) -> u32 {
        self.buckets
    }

    /// The configured bucket duration.
    #[must_use]
    pub fn bucket_duration(&self) -> Duration {
        self.bucket_duration
    }
}

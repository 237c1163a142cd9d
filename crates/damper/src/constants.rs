// Copyright (c) The Damper Project Authors.
// Licensed under the MIT License.

use std::time::Duration;

/// Default inspiration success rate (ISR).
///
/// Throttling can only engage while the observed success rate over the
/// statistics window is below this floor.
pub(crate) const DEFAULT_INSPIRATION_SUCCESS_RATE: f64 = 0.5;

/// Smallest ISR accepted after normalization.
///
/// Values at or below zero would make the inspiration-requests computation
/// divide by zero, so out-of-range inputs are raised to this floor instead of
/// being rejected.
pub(crate) const MIN_INSPIRATION_SUCCESS_RATE: f64 = 1e-6;

/// Default minimum number of requests in the statistics window before the
/// throttle can engage, no matter how low the success rate is.
pub(crate) const DEFAULT_IGNORE_REQUESTS: u64 = 100;

/// Default number of buckets composing the statistics window.
pub(crate) const DEFAULT_BUCKETS: u32 = 10;

/// Default duration of a single bucket. With the default bucket count the
/// window spans five minutes.
pub(crate) const DEFAULT_BUCKET_DURATION: Duration = Duration::from_secs(30);

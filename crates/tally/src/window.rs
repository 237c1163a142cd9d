// Copyright (c) The Damper Project Authors.
// Licensed under the MIT License.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tick::Clock;

/// Minimum allowed duration of a single bucket.
pub(crate) const MIN_BUCKET_DURATION: Duration = Duration::from_millis(1);

pub(crate) const ERR_POISONED_LOCK: &str =
    "poisoned lock - cannot continue execution because aggregate consistency can no longer be upheld";

/// A rolling window of time-bucketed weighted samples.
///
/// The window covers a trailing span of `buckets × bucket_duration`. Samples
/// recorded via [`add`][Self::add] land in the bucket covering the current
/// instant; buckets whose start is older than the span stop contributing to
/// [`aggregate`][Self::aggregate] results. Expiry happens lazily on the
/// recording and querying paths.
///
/// Constructor inputs are normalized rather than rejected: the bucket count
/// is raised to at least 1 and the bucket duration to at least 1ms.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use tally::Window;
/// # use tick::Clock;
///
/// # fn example(clock: &Clock) {
/// let window = Window::new(clock, 10, Duration::from_secs(30));
/// window.add(1);
/// window.add(0);
/// assert_eq!(window.aggregate().count(), 2);
/// # }
/// ```
#[derive(Debug)]
pub struct Window {
    clock: Clock,
    bucket_duration: Duration,
    span: Duration,
    buckets: Mutex<VecDeque<Bucket>>,
}

impl Window {
    /// Creates a window of `buckets` buckets, each covering `bucket_duration`.
    #[must_use]
    pub fn new(clock: &Clock, buckets: u32, bucket_duration: Duration) -> Self {
        let buckets = buckets.max(1);
        let bucket_duration = bucket_duration.max(MIN_BUCKET_DURATION);

        Self {
            clock: clock.clone(),
            bucket_duration,
            span: bucket_duration.saturating_mul(buckets),
            buckets: Mutex::new(VecDeque::with_capacity(buckets as usize)),
        }
    }

    /// Records one sample with the given weight in the current bucket.
    pub fn add(&self, value: u64) {
        let now = self.clock.instant();

        let mut buckets = self.buckets.lock().expect(ERR_POISONED_LOCK);

        // Drop buckets that rotated out of the span.
        while let Some(front) = buckets.front()
            && now.duration_since(front.started_at) > self.span
        {
            buckets.pop_front();
        }

        if let Some(back) = buckets.back_mut()
            && now.duration_since(back.started_at) < self.bucket_duration
        {
            back.sum = back.sum.saturating_add(value);
            back.count = back.count.saturating_add(1);
        } else {
            buckets.push_back(Bucket {
                started_at: now,
                sum: value,
                count: 1,
            });
        }
    }

    /// Returns a snapshot of the aggregates over the trailing span.
    ///
    /// Buckets that rotated out of the span are excluded even when nothing
    /// was recorded since they expired.
    #[must_use]
    pub fn aggregate(&self) -> Aggregate {
        let now = self.clock.instant();

        let buckets = self.buckets.lock().expect(ERR_POISONED_LOCK);

        let mut sum = 0_u64;
        let mut count = 0_u64;
        for bucket in buckets.iter() {
            if now.duration_since(bucket.started_at) <= self.span {
                sum = sum.saturating_add(bucket.sum);
                count = count.saturating_add(bucket.count);
            }
        }

        Aggregate { sum, count }
    }
}

/// One fixed-duration slice of the window.
#[derive(Debug)]
struct Bucket {
    started_at: Instant,
    sum: u64,
    count: u64,
}

/// Aggregated view of a [`Window`] over its trailing span.
#[must_use]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Aggregate {
    sum: u64,
    count: u64,
}

impl Aggregate {
    /// The total of all recorded sample weights within the span.
    #[must_use]
    pub fn sum(&self) -> u64 {
        self.sum
    }

    /// The number of samples recorded within the span.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}

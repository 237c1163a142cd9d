// Copyright (c) The Damper Project Authors.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Time-bucketed rolling window for recent-activity statistics.
//!
//! This crate provides a [`Window`] that aggregates weighted samples over a
//! trailing time span. The span is divided into a fixed number of buckets of
//! equal duration; a recorded sample lands in the bucket covering the current
//! instant, and buckets older than the span silently stop contributing to
//! aggregates as time advances. Rotation is driven purely by clock reads on
//! the recording and querying paths, so there is no background task to manage.
//!
//! The aggregate view exposes only the weighted [`sum`][Aggregate::sum] and
//! the sample [`count`][Aggregate::count]. Consumers that need a ratio over
//! recent traffic, such as a success rate, record successes with weight 1 and
//! failures with weight 0 and divide the two aggregates.
//!
//! # Time control
//!
//! All wall-clock access goes through [`tick::Clock`]. Production code passes
//! a real clock; tests pass a clock created from `tick::ClockControl` and
//! advance time manually to drive bucket expiry:
//!
//! ```
//! use std::time::Duration;
//!
//! use tally::Window;
//! use tick::ClockControl;
//!
//! let control = ClockControl::new();
//! let clock = control.to_clock();
//!
//! let window = Window::new(&clock, 10, Duration::from_millis(100));
//! window.add(1);
//! window.add(0);
//!
//! let aggregate = window.aggregate();
//! assert_eq!(aggregate.sum(), 1);
//! assert_eq!(aggregate.count(), 2);
//!
//! // Advancing past the full span expires everything.
//! control.advance(Duration::from_secs(2));
//! assert_eq!(window.aggregate().count(), 0);
//! ```
//!
//! # Thread safety
//!
//! [`Window`] is `Send + Sync` and safe for concurrent recording and querying
//! without external locking. Aggregates are a best-effort snapshot of recent
//! activity, not a strictly consistent point-in-time view.

mod window;

pub use window::{Aggregate, Window};

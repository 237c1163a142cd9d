// Copyright (c) The Damper Project Authors.
// Licensed under the MIT License.

use std::fmt;

/// The admission check declined the request.
///
/// This is the only error this crate produces and it is a normal, expected
/// outcome rather than a fault: the throttle has decided the request should
/// not be sent right now. Callers typically treat it as "service unavailable,
/// try later" and apply their own retry or fallback policy.
///
/// The error carries no payload, so it can be matched by equality:
///
/// ```
/// use damper::Rejected;
///
/// fn handle(result: Result<(), Rejected>) {
///     if result == Err(Rejected) {
///         // fall back or surface upstream
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected;

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("request not currently allowed")
    }
}

impl std::error::Error for Rejected {}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::error::Error as StdError;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Rejected: Send, Sync, Clone, Copy);

    #[test]
    fn display_is_stable() {
        assert_eq!(Rejected.to_string(), "request not currently allowed");
    }

    #[test]
    fn has_no_source() {
        assert!(Rejected.source().is_none());
    }

    #[test]
    fn comparable_by_equality() {
        let result: Result<(), Rejected> = Err(Rejected);
        assert_eq!(result, Err(Rejected));
    }
}

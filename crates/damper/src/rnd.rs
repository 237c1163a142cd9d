// Copyright (c) The Damper Project Authors.
// Licensed under the MIT License.

use std::fmt::Debug;

/// Decides whether a drawn sample means the request should be dropped, given
/// the computed drop probability.
///
/// Kept as a plain function pointer so tests can substitute a constant
/// decision and make the admission check fully deterministic.
pub(crate) type DropDecision = fn(sample: f64, probability: f64) -> bool;

/// Default drop policy: drop when the uniform sample falls below the
/// probability.
pub(crate) fn drop_when_below(sample: f64, probability: f64) -> bool {
    sample < probability
}

/// Source of uniform `[0, 1)` samples for the admission check.
///
/// Not cryptographically secure, and deliberately so: the check only needs
/// statistically uniform draws. `Real` goes through `fastrand`, which keeps
/// one generator per OS thread, seeded from entropy when the thread first
/// draws. Concurrent admission checks therefore never contend on a shared
/// generator, and no per-call reseeding happens. The `Test` variant lets
/// tests pin the sample stream to make verdicts deterministic.
#[derive(Clone, Default)]
pub(crate) enum Rnd {
    #[default]
    Real,

    #[cfg(test)]
    Test(std::sync::Arc<dyn Fn() -> f64 + Send + Sync>),
}

impl Rnd {
    /// Draws the next sample.
    pub fn next_f64(&self) -> f64 {
        match self {
            Self::Real => fastrand::f64(),
            #[cfg(test)]
            Self::Test(sample) => sample(),
        }
    }

    /// A sampler that always returns `value`.
    #[cfg(test)]
    pub fn new_fixed(value: f64) -> Self {
        Self::new_function(move || value)
    }

    /// A sampler backed by an arbitrary closure.
    #[cfg(test)]
    pub fn new_function<F>(f: F) -> Self
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        Self::Test(std::sync::Arc::new(f))
    }
}

impl Debug for Rnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let variant = match self {
            Self::Real => "Real",
            #[cfg(test)]
            Self::Test(_) => "Test",
        };

        f.write_str(variant)
    }
}

//! Thread-safe wrapper around [`P2Estimator`]

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::estimator::P2Estimator;

/// A [`P2Estimator`] that can be fed and read from many threads at once
///
/// Every call takes an internal lock for its whole duration, so no caller ever sees a partially
/// updated set of markers. Share it behind an [`Arc`](std::sync::Arc) or a scoped borrow.
#[derive(Debug, Default)]
pub struct SharedEstimator {
    inner: Mutex<P2Estimator>,
}

impl From<P2Estimator> for SharedEstimator {
    fn from(estimator: P2Estimator) -> Self {
        Self {
            inner: Mutex::new(estimator),
        }
    }
}

impl SharedEstimator {
    /// Constructs a new [`Self`] tracking the given quantile
    ///
    /// See [`P2Estimator::new`].
    pub fn new(quantile: f64) -> Result<Self> {
        P2Estimator::new(quantile).map(Self::from)
    }

    /// Processes a new observation, returning the updated estimate
    ///
    /// See [`P2Estimator::add`].
    pub fn add(&self, value: f64) -> Result<f64> {
        self.lock().add(value)
    }

    /// See [`P2Estimator::get`]
    pub fn get(&self) -> f64 {
        self.lock().get()
    }

    /// See [`P2Estimator::estimate`]
    pub fn estimate(&self) -> Option<f64> {
        self.lock().estimate()
    }

    /// Total number of observations accepted so far
    pub fn count(&self) -> u64 {
        self.lock().count()
    }

    /// Quantile this estimator tracks
    pub fn quantile(&self) -> f64 {
        self.lock().quantile()
    }

    /// Consistent copy of the current state
    pub fn snapshot(&self) -> P2Estimator {
        self.lock().clone()
    }

    /// Unwraps the underlying estimator
    pub fn into_inner(self) -> P2Estimator {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // Updates validate before mutating and cannot panic midway, so a poisoned lock still guards
    // consistent markers
    fn lock(&self) -> MutexGuard<'_, P2Estimator> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};

    use crate::error::Error;

    use super::*;

    #[test]
    fn delegates_to_estimator() {
        let shared = SharedEstimator::new(0.5).unwrap();
        for v in [5.0, 3.0, 1.0, 4.0] {
            shared.add(v).unwrap();
        }
        assert_eq!(shared.estimate(), None);

        assert_eq!(shared.add(2.0).unwrap(), 3.0);
        assert_eq!(shared.get(), 3.0);
        assert_eq!(shared.estimate(), Some(3.0));
        assert_eq!(shared.count(), 5);
        assert_eq!(shared.quantile(), 0.5);
    }

    #[test]
    fn propagates_errors() {
        assert!(matches!(
            SharedEstimator::new(1.0),
            Err(Error::InvalidQuantile { .. })
        ));

        let shared = SharedEstimator::default();
        assert!(shared.add(f64::NAN).is_err());
        assert_eq!(shared.count(), 0);
    }

    #[test]
    fn snapshot_is_detached() {
        let shared = SharedEstimator::default();
        for v in 0..10 {
            shared.add(v as f64).unwrap();
        }

        let snapshot = shared.snapshot();
        shared.add(100.0).unwrap();

        assert_eq!(snapshot.count(), 10);
        assert_eq!(shared.count(), 11);
        assert_eq!(shared.into_inner().max(), Some(100.0));
    }

    #[test]
    fn recovers_from_poison() {
        let shared = SharedEstimator::default();
        for v in 0..5 {
            shared.add(v as f64).unwrap();
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = shared.lock();
            panic!("poisoning the lock");
        }));
        assert!(result.is_err());

        assert_eq!(shared.add(10.0).unwrap(), shared.get());
        assert_eq!(shared.count(), 6);
    }
}

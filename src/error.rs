//! Error types for the estimator

use thiserror::Error;

/// Errors that can occur while constructing or feeding an estimator
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// Target quantile outside the open interval (0, 1)
    #[error("Target quantile {quantile} must lie strictly between 0 and 1")]
    InvalidQuantile {
        /// The rejected quantile
        quantile: f64,
    },

    /// NaN or infinite observation
    #[error("Observation {value} is not finite")]
    NonFiniteObservation {
        /// The rejected observation
        value: f64,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check that `quantile` is a usable target quantile
    pub fn check_quantile(quantile: f64) -> Result<()> {
        // NaN fails both comparisons
        if quantile > 0.0 && quantile < 1.0 {
            Ok(())
        } else {
            Err(Error::InvalidQuantile { quantile })
        }
    }

    /// Check that `value` can be folded into the markers
    pub fn check_observation(value: f64) -> Result<()> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(Error::NonFiniteObservation { value })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_bounds_are_open() {
        assert!(Error::check_quantile(0.5).is_ok());
        assert!(Error::check_quantile(1e-9).is_ok());
        assert!(Error::check_quantile(0.999_999).is_ok());

        for q in [0.0, 1.0, -0.25, 1.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Error::check_quantile(q),
                Err(Error::InvalidQuantile { .. })
            ));
        }
    }

    #[test]
    fn observation_must_be_finite() {
        assert!(Error::check_observation(-1e300).is_ok());
        assert!(Error::check_observation(0.0).is_ok());

        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                Error::check_observation(v),
                Err(Error::NonFiniteObservation { .. })
            ));
        }
    }

    #[test]
    fn messages_name_the_value() {
        let err = Error::InvalidQuantile { quantile: 1.5 };
        assert_eq!(
            err.to_string(),
            "Target quantile 1.5 must lie strictly between 0 and 1"
        );

        let err = Error::NonFiniteObservation { value: f64::INFINITY };
        assert_eq!(err.to_string(), "Observation inf is not finite");
    }
}

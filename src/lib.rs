#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod error;
mod estimator;
mod shared;

pub use error::{Error, Result};
pub use estimator::{Markers, P2Estimator, Phase};
pub use shared::SharedEstimator;

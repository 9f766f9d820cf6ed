//! The P² quantile estimator
//!
//! Five markers track the minimum, the maximum, the target quantile, and two points halfway
//! between the target and each extreme. Every observation nudges the marker positions, and
//! interior markers whose actual position drifts a whole rank away from where it should be are
//! moved one rank and re-interpolated from their neighbours.

use std::cmp::Ordering;

use crate::error::{Error, Result};

/// Number of markers kept by the estimator
const MARKERS: usize = 5;

/// Where the estimator is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fewer than five observations have arrived, and they are buffered as raw marker heights
    Filling,
    /// The markers are sorted and maintained on every observation
    Steady,
}

/// Snapshot of the marker state, only available once the estimator is [`Phase::Steady`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Markers {
    /// Estimated value at each marker, non-decreasing
    pub heights: [f64; MARKERS],
    /// Actual 1-based rank of each marker, strictly increasing
    pub positions: [u64; MARKERS],
    /// Rank each marker would occupy if the estimate were exact
    pub desired: [f64; MARKERS],
}

/// Streaming estimator for a single quantile
///
/// Construct one with [`Self::new`], feed it with [`Self::add`], and read the estimate back with
/// [`Self::get`] or [`Self::estimate`].
///
/// Memory use is fixed: five markers and a counter, no matter how long the stream runs.
/// The estimator is not synchronised. To share one between threads, use
/// [`SharedEstimator`](crate::SharedEstimator).
#[derive(Debug, Clone)]
pub struct P2Estimator {
    /// Quantile being tracked, in (0, 1)
    quantile: f64,

    /// Total accepted observations
    count: u64,

    phase: Phase,

    /// Marker heights
    ///
    /// While filling, the first [`Self::count`] slots hold the raw observations in arrival order.
    heights: [f64; MARKERS],
    /// Actual marker positions
    positions: [u64; MARKERS],
    /// Desired marker positions
    desired: [f64; MARKERS],
    /// Per-observation increment of [`Self::desired`]
    increments: [f64; MARKERS],
}

impl Default for P2Estimator {
    /// Initializes a median estimator
    fn default() -> Self {
        Self::with_quantile(0.5)
    }
}

impl P2Estimator {
    /// Constructs a new [`Self`] tracking the given quantile, without any observations
    ///
    /// `quantile` must lie strictly between 0 and 1. For example, use 0.5 for the median or 0.99
    /// for p99.
    pub fn new(quantile: f64) -> Result<Self> {
        if let Err(err) = Error::check_quantile(quantile) {
            #[cfg(feature = "log")]
            log::warn!("Refusing to build estimator for quantile {}", quantile);

            return Err(err);
        }

        Ok(Self::with_quantile(quantile))
    }

    fn with_quantile(quantile: f64) -> Self {
        let increments = [0.0, quantile / 2.0, quantile, (1.0 + quantile) / 2.0, 1.0];

        Self {
            quantile,
            count: 0,
            phase: Phase::Filling,
            heights: [0.0; MARKERS],
            positions: std::array::from_fn(|i| i as u64 + 1),
            desired: increments.map(|dn| dn * 4.0 + 1.0),
            increments,
        }
    }

    /// Quantile this estimator tracks
    pub fn quantile(&self) -> f64 {
        self.quantile
    }

    /// Total number of observations accepted so far
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether enough observations have arrived for the estimate to mean anything
    pub fn is_steady(&self) -> bool {
        self.phase == Phase::Steady
    }

    /// Processes a new observation, returning the updated estimate
    ///
    /// Until five observations have been accepted, the returned value is a placeholder.
    /// See [`Self::get`].
    ///
    /// Non-finite observations are rejected, and leave the estimator untouched.
    pub fn add(&mut self, value: f64) -> Result<f64> {
        if let Err(err) = Error::check_observation(value) {
            #[cfg(feature = "log")]
            log::warn!("Rejecting non-finite observation {}", value);

            return Err(err);
        }

        match self.phase {
            Phase::Filling => self.fill(value),
            Phase::Steady => self.update(value),
        }
        self.count += 1;

        Ok(self.get())
    }

    /// Current height of the middle marker
    ///
    /// Once the estimator is steady, this is the quantile estimate. Before that it is just
    /// whatever sits in the middle slot of the fill buffer (zero if nothing has reached it yet).
    /// Use [`Self::estimate`] to tell the two apart.
    pub fn get(&self) -> f64 {
        self.heights[2]
    }

    /// Quantile estimate, or [`None`] while still filling
    pub fn estimate(&self) -> Option<f64> {
        self.is_steady().then(|| self.get())
    }

    /// Smallest observation seen, once steady
    pub fn min(&self) -> Option<f64> {
        self.is_steady().then(|| self.heights[0])
    }

    /// Largest observation seen, once steady
    pub fn max(&self) -> Option<f64> {
        self.is_steady().then(|| self.heights[MARKERS - 1])
    }

    /// Copy of the marker state, once steady
    pub fn markers(&self) -> Option<Markers> {
        self.is_steady().then_some(Markers {
            heights: self.heights,
            positions: self.positions,
            desired: self.desired,
        })
    }

    fn fill(&mut self, value: f64) {
        // Filling only lasts while count < MARKERS
        let slot = self.count as usize;
        self.heights[slot] = value;

        if slot + 1 < MARKERS {
            return;
        }

        // Stable, so equal heights such as 0.0 and -0.0 keep their arrival order
        self.heights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        self.phase = Phase::Steady;

        #[cfg(feature = "log")]
        log::debug!("Initial markers sorted: {:?}", self.heights);
    }

    fn update(&mut self, value: f64) {
        // Cell k holds the observation: heights[k - 1] <= value < heights[k]
        let k = match self.heights.iter().position(|&h| value < h) {
            Some(0) => {
                self.heights[0] = value;
                1
            }
            Some(k) => k,
            None => {
                self.heights[MARKERS - 1] = value;
                MARKERS - 1
            }
        };

        for position in &mut self.positions[k..] {
            *position += 1;
        }
        for (desired, increment) in self.desired.iter_mut().zip(&self.increments) {
            *desired += increment;
        }

        for i in 1..MARKERS - 1 {
            self.adjust(i);
        }
    }

    /// Moves interior marker `i` one rank towards its desired position, if it has drifted far
    /// enough and there is room to do so without colliding with a neighbour
    fn adjust(&mut self, i: usize) {
        let drift = self.desired[i] - self.positions[i] as f64;

        let (sign, neighbour) =
            if drift >= 1.0 && self.positions[i + 1] - self.positions[i] > 1 {
                (1.0, i + 1)
            } else if drift <= -1.0 && self.positions[i] - self.positions[i - 1] > 1 {
                (-1.0, i - 1)
            } else {
                return;
            };

        let candidate = self.parabolic(i, sign);
        if self.heights[i - 1] < candidate && candidate < self.heights[i + 1] {
            #[cfg(feature = "log")]
            log::trace!("Marker {} moved parabolically to {}", i, candidate);

            self.heights[i] = candidate;
        } else {
            let fallback = self.linear(i, sign, neighbour);

            #[cfg(feature = "log")]
            log::trace!("Marker {} moved linearly to {}", i, fallback);

            self.heights[i] = fallback;
        }

        if sign > 0.0 {
            self.positions[i] += 1;
        } else {
            self.positions[i] -= 1;
        }
    }

    /// Piecewise-parabolic prediction of marker `i`'s height after moving `sign` ranks
    fn parabolic(&self, i: usize, sign: f64) -> f64 {
        let (q0, q1, q2) = (self.heights[i - 1], self.heights[i], self.heights[i + 1]);
        let (n0, n1, n2) = (
            self.positions[i - 1] as f64,
            self.positions[i] as f64,
            self.positions[i + 1] as f64,
        );

        q1 + sign / (n2 - n0)
            * ((n1 - n0 + sign) * (q2 - q1) / (n2 - n1) + (n2 - n1 - sign) * (q1 - q0) / (n1 - n0))
    }

    /// Linear prediction of marker `i`'s height, moving towards `neighbour`
    fn linear(&self, i: usize, sign: f64, neighbour: usize) -> f64 {
        let (qi, qn) = (self.heights[i], self.heights[neighbour]);
        let (ni, nn) = (self.positions[i] as f64, self.positions[neighbour] as f64);

        qi + sign * (qn - qi) / (nn - ni)
    }
}

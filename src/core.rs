//! Core module defining the synchrony analysis of spike trains.
//!
//! This module consists of the following components:
//!
//! - [`spikes`]: Handles multi-channel spike trains and their binning into delta trains
//! - [`kernel`]: Implements the Gaussian smoothing of delta trains into rate signals
//! - [`metrics`]: Computes the population synchrony from pairwise correlations of rate signals
//! - [`utils`]: Provides basic statistics on real-valued signals
//!
//! # Examples
//!
//! ```
//! use approx::assert_relative_eq;
//! use spike_sync::core::metrics::SynchronyEstimator;
//!
//! // Bin width of 1 ms, 200 bins, 200 ms of simulation
//! let estimator = SynchronyEstimator::new(1.0, 200, 200.0).unwrap();
//!
//! // Two identical cells are perfectly synchronous
//! let spike_trains = vec![vec![10.0, 20.0, 30.0], vec![10.0, 20.0, 30.0]];
//! let synchrony = estimator.measure(&spike_trains).unwrap();
//!
//! assert_relative_eq!(synchrony.mean, 1.0, epsilon = 1e-9);
//! assert_relative_eq!(synchrony.std, 0.0, epsilon = 1e-9);
//! assert_eq!(synchrony.num_pairs, 1);
//! ```
pub mod kernel;
pub mod metrics;
pub mod spikes;
pub mod utils;

/// The width of the smoothing window, in ms (the window spans one extra ms).
pub const KERNEL_WINDOW_MS: f64 = 50.0;
/// The standard deviation of the smoothing window, in ms.
pub const KERNEL_STD_MS: f64 = 5.0;
/// Minimum number of cells to consider parallel processing.
pub const MIN_PARALLEL_CELLS: usize = 100;
/// Maximum number of samples of the smoothing window, i.e., the bin width must be at least 51 ns.
pub const MAX_KERNEL_LEN: usize = 1_000_000;

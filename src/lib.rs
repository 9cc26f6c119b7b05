//! This crate provides tools for analyzing the spiking activity of simulated neural populations in Rust.
//!
//! # Measuring Synchrony
//!
//! Spike trains are binned, smoothed by a Gaussian kernel into rate signals, and the synchrony of the population is summarized by the mean and standard deviation of the pairwise correlation coefficients between rate signals.
//!
//! ```rust
//! use spike_sync::core::metrics::compute_synchrony;
//!
//! // Three cells, simulated for 200 ms, binned at 1 ms
//! let spike_trains = vec![vec![10.0, 20.0, 30.0], vec![10.0, 20.0, 30.0], vec![100.0]];
//! let (mean, std) = compute_synchrony(&spike_trains, 1.0, 200, 200.0).unwrap();
//!
//! assert!(mean > -1.0 && mean < 1.0);
//! assert!(std > 0.0);
//! ```
//!
//! Cells without any spike are ignored, and an error is returned if no pair of active cells remains.
//!
//! ```rust
//! use spike_sync::core::metrics::compute_synchrony;
//! use spike_sync::error::SyncError;
//!
//! let spike_trains = vec![vec![], vec![50.0]];
//! assert!(matches!(
//!     compute_synchrony(&spike_trains, 1.0, 200, 200.0),
//!     Err(SyncError::InsufficientData(_))
//! ));
//! ```
//!
//! # Decimating Signals
//!
//! ```rust
//! use spike_sync::signal::decimate::Decimator;
//!
//! // Keep one sample out of 10 after a zero-phase Chebyshev anti-aliasing filter of order 4
//! let decimator = Decimator::default();
//! let signal = vec![1.0; 500];
//! let decimated = decimator.decimate(&signal).unwrap();
//!
//! assert_eq!(decimated.len(), 50);
//! ```

pub mod core;
pub mod error;
pub mod signal;

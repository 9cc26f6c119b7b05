//! Signal conditioning of sampled signals, e.g., firing rates or local field potentials.
//!
//! This module provides two components:
//! - `filter`: Provides the design and the (zero-phase) application of IIR low-pass filters.
//! - `decimate`: Provides the down-sampling of signals after anti-aliasing.
//!
//! # Example
//! ```rust
//! use approx::assert_relative_eq;
//! use spike_sync::signal::filter::{FilterDesign, IirFilter};
//!
//! // A second-order Butterworth low-pass filter with a critical frequency at half the Nyquist frequency
//! let filter = IirFilter::lowpass(2, 0.5, FilterDesign::Butterworth).unwrap();
//! assert_relative_eq!(filter.dc_gain(), 1.0, epsilon = 1e-12);
//!
//! // Zero-phase filtering preserves constant signals
//! let y = filter.filtfilt(&[1.0; 20]).unwrap();
//! assert_relative_eq!(y[10], 1.0, epsilon = 1e-9);
//! ```

pub mod decimate;
pub mod filter;

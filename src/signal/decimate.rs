//! Down-sampling of signals with zero-phase anti-aliasing.
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::filter::{FilterDesign, IirFilter};
use crate::error::SyncError;

/// Decimation parameters.
///
/// The anti-aliasing low-pass filter has a critical frequency of `critical_factor / factor` (relative to the Nyquist frequency) and is applied forward and backward.
///
/// # Examples
///
/// ```rust
/// use spike_sync::signal::decimate::Decimator;
///
/// let decimator = Decimator::default();
/// let signal: Vec<f64> = (0..1000).map(|n| (0.01 * n as f64).sin()).collect();
/// let decimated = decimator.decimate(&signal).unwrap();
///
/// assert_eq!(decimated.len(), 100);
/// ```
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Decimator {
    /// The down-sampling factor, i.e., one sample is kept out of `factor`.
    pub factor: usize,
    /// The order of the anti-aliasing filter.
    pub order: usize,
    /// The critical frequency of the filter, relative to the Nyquist frequency of the decimated signal.
    pub critical_factor: f64,
    /// The analog prototype of the anti-aliasing filter.
    pub design: FilterDesign,
}

impl Default for Decimator {
    fn default() -> Self {
        Decimator {
            factor: 10,
            order: 4,
            critical_factor: 0.8,
            design: FilterDesign::Chebyshev1 { ripple_db: 0.05 },
        }
    }
}

impl Decimator {
    /// Returns the anti-aliasing filter.
    pub fn filter(&self) -> Result<IirFilter, SyncError> {
        if self.factor == 0 {
            return Err(SyncError::InvalidParameter(
                "The decimation factor must be positive.".to_string(),
            ));
        }
        IirFilter::lowpass(
            self.order,
            self.critical_factor / self.factor as f64,
            self.design,
        )
    }

    /// Returns the filtered signal, down-sampled by keeping every `factor`-th sample starting from the first.
    pub fn decimate(&self, x: &[f64]) -> Result<Vec<f64>, SyncError> {
        let filter = self.filter()?;
        self.decimate_with(&filter, x)
    }

    /// Decimate every channel of a multi-channel signal with the same filter.
    pub fn decimate_channels(&self, xs: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, SyncError> {
        let filter = self.filter()?;
        log::debug!(
            "Decimating {} channels by a factor {} (filter of order {})",
            xs.len(),
            self.factor,
            filter.num_states()
        );
        xs.par_iter()
            .map(|x| self.decimate_with(&filter, x))
            .collect()
    }

    fn decimate_with(&self, filter: &IirFilter, x: &[f64]) -> Result<Vec<f64>, SyncError> {
        Ok(filter
            .filtfilt(x)?
            .into_iter()
            .step_by(self.factor)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_decimate_len() {
        let decimator = Decimator::default();
        assert_eq!(decimator.decimate(&[0.0; 1000]).unwrap().len(), 100);
        assert_eq!(decimator.decimate(&[0.0; 1001]).unwrap().len(), 101);

        let decimator = Decimator {
            factor: 1,
            ..Decimator::default()
        };
        assert_eq!(decimator.decimate(&[0.0; 100]).unwrap().len(), 100);
    }

    #[test]
    fn test_decimate_constant() {
        let y = Decimator::default().decimate(&[3.0; 1000]).unwrap();
        // the passband gain at zero frequency is applied twice
        let gain = 10_f64.powf(-0.05 / 20.0);
        for yn in y {
            assert_relative_eq!(yn, 3.0 * gain * gain, epsilon = 1e-9);
        }

        let decimator = Decimator {
            design: FilterDesign::Butterworth,
            ..Decimator::default()
        };
        for yn in decimator.decimate(&[3.0; 1000]).unwrap() {
            assert_relative_eq!(yn, 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_decimate_passband() {
        let x: Vec<f64> = (0..1000)
            .map(|n| (2.0 * PI * 0.005 * n as f64).sin())
            .collect();
        let y = Decimator::default().decimate(&x).unwrap();
        for m in 10..90 {
            assert!((y[m] - x[10 * m]).abs() < 0.02);
        }
    }

    #[test]
    fn test_decimate_stopband() {
        let x: Vec<f64> = (0..1000).map(|n| (0.9 * PI * n as f64).sin()).collect();
        let y = Decimator::default().decimate(&x).unwrap();
        for yn in &y[20..80] {
            assert!(yn.abs() < 1e-3);
        }
    }

    #[test]
    fn test_decimate_channels() {
        let xs = vec![vec![1.0; 200], vec![-2.0; 200]];
        let decimator = Decimator {
            design: FilterDesign::Butterworth,
            ..Decimator::default()
        };
        let ys = decimator.decimate_channels(&xs).unwrap();
        assert_eq!(ys.len(), 2);
        assert_eq!(ys[0].len(), 20);
        assert_relative_eq!(ys[1][5], -2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_decimate_invalid() {
        let decimator = Decimator {
            factor: 0,
            ..Decimator::default()
        };
        assert!(matches!(
            decimator.decimate(&[0.0; 100]),
            Err(SyncError::InvalidParameter(_))
        ));

        let decimator = Decimator {
            factor: 1,
            critical_factor: 1.5,
            ..Decimator::default()
        };
        assert!(matches!(
            decimator.decimate(&[0.0; 100]),
            Err(SyncError::InvalidParameter(_))
        ));

        // shorter than the odd extension of the filtfilt
        assert!(matches!(
            Decimator::default().decimate(&[0.0; 15]),
            Err(SyncError::InvalidParameter(_))
        ));
    }
}

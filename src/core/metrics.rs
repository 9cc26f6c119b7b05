//! Synchrony metrics module.
use itertools::Itertools;
use log;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::kernel::GaussianKernel;
use crate::core::spikes::histogram;
use crate::core::utils::{is_zero, mean, std_dev, CenteredSignal};
use crate::core::MIN_PARALLEL_CELLS;
use crate::error::SyncError;

/// The population synchrony, i.e., the statistics of the pairwise correlation coefficients between the rate signals of distinct active cells.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Synchrony {
    /// The mean of the pairwise correlation coefficients.
    pub mean: f64,
    /// The (population) standard deviation of the pairwise correlation coefficients.
    pub std: f64,
    /// The number of pairs which contributed a correlation coefficient.
    pub num_pairs: usize,
}

/// An estimator of the synchrony of a population of cells from their spike trains.
///
/// Every spike train is binned into a delta train over [0, tstop], then smoothed by a Gaussian kernel into a rate signal.
/// The synchrony is obtained from the Pearson correlation coefficients of all pairs of cells with a non-zero rate signal.
/// The cost is quadratic in the number of cells.
///
/// # Examples
///
/// ```rust
/// use spike_sync::core::metrics::SynchronyEstimator;
///
/// let estimator = SynchronyEstimator::new(1.0, 200, 200.0).unwrap();
/// let spike_trains = vec![vec![10.0, 20.0, 30.0], vec![10.0, 20.0, 30.0], vec![100.0]];
/// let synchrony = estimator.measure(&spike_trains).unwrap();
///
/// assert_eq!(synchrony.num_pairs, 3);
/// assert!(synchrony.mean < 1.0 && synchrony.mean > -1.0);
/// assert!(synchrony.std > 0.0);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct SynchronyEstimator {
    /// The bin width, in ms.
    dt: f64,
    /// The number of bins of the delta trains.
    num_bins: usize,
    /// The end of the binning range, in ms.
    tstop: f64,
    /// The smoothing kernel, shared by all cells.
    kernel: GaussianKernel,
}

impl SynchronyEstimator {
    /// Create a new estimator for a bin width `dt` (in ms), `num_bins` bins, and a binning range [0, `tstop`] (in ms).
    /// Returns an error for invalid parameters.
    pub fn new(dt: f64, num_bins: usize, tstop: f64) -> Result<Self, SyncError> {
        if num_bins == 0 {
            return Err(SyncError::InvalidParameter(
                "The number of bins must be positive.".to_string(),
            ));
        }
        if !(tstop > 0.0 && tstop.is_finite()) {
            return Err(SyncError::InvalidParameter(format!(
                "The simulation end time must be a positive number, got {}.",
                tstop
            )));
        }
        let kernel = GaussianKernel::from_dt(dt)?;
        log::debug!(
            "Smoothing kernel with {} samples and a standard deviation of {} samples",
            kernel.len(),
            kernel.std()
        );

        Ok(SynchronyEstimator {
            dt,
            num_bins,
            tstop,
            kernel,
        })
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    pub fn tstop(&self) -> f64 {
        self.tstop
    }

    pub fn kernel(&self) -> &GaussianKernel {
        &self.kernel
    }

    /// Returns the spike counts of the spike train in each bin.
    pub fn delta_train(&self, times: &[f64]) -> Result<Vec<f64>, SyncError> {
        histogram(times, self.num_bins, self.tstop)
    }

    /// Returns the rate signal of the spike train, i.e., its smoothed delta train.
    pub fn rate_signal(&self, times: &[f64]) -> Result<Vec<f64>, SyncError> {
        Ok(self.kernel.apply(&self.delta_train(times)?))
    }

    /// Returns the rate signals of all spike trains, in order.
    pub fn rate_signals(&self, spike_trains: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, SyncError> {
        if spike_trains.len() >= MIN_PARALLEL_CELLS {
            spike_trains
                .par_iter()
                .map(|times| self.rate_signal(times))
                .collect()
        } else {
            spike_trains
                .iter()
                .map(|times| self.rate_signal(times))
                .collect()
        }
    }

    /// Returns the synchrony of the population.
    /// Progress through the cells is reported at the trace level.
    pub fn measure(&self, spike_trains: &[Vec<f64>]) -> Result<Synchrony, SyncError> {
        self.measure_with_progress(spike_trains, |i, num_cells| {
            log::trace!("Computing correlations of cell {}/{}", i, num_cells);
        })
    }

    /// Returns the synchrony of the population.
    /// The observer is called with (i, number of cells) before the correlations of cell i with the cells after it are computed.
    ///
    /// Returns an error if no pair of distinct cells with non-zero rate signals exists, e.g., if there are less than two cells or no spikes at all.
    pub fn measure_with_progress<F>(
        &self,
        spike_trains: &[Vec<f64>],
        mut observer: F,
    ) -> Result<Synchrony, SyncError>
    where
        F: FnMut(usize, usize),
    {
        let num_cells = spike_trains.len();
        let rate_signals = self.rate_signals(spike_trains)?;

        // The correlation is undefined for cells without any spike
        let num_active = rate_signals.iter().filter(|signal| !is_zero(signal)).count();
        log::debug!("{} active cells out of {}", num_active, num_cells);

        // Every active signal is centered once and shared by all its pairs
        let center = |signal: &Vec<f64>| -> Result<Option<CenteredSignal>, SyncError> {
            if num_active < 2 || is_zero(signal) {
                Ok(None)
            } else {
                CenteredSignal::new(signal).map(Some)
            }
        };
        let centered: Vec<Option<CenteredSignal>> = if num_cells >= MIN_PARALLEL_CELLS {
            rate_signals.par_iter().map(center).collect::<Result<_, _>>()?
        } else {
            rate_signals.iter().map(center).collect::<Result<_, _>>()?
        };

        let mut coefs: Vec<f64> = Vec::with_capacity(num_active * num_active.saturating_sub(1) / 2);
        for i in 0..num_cells {
            observer(i, num_cells);
            let Some(x) = &centered[i] else {
                continue;
            };

            let others = centered[i + 1..].iter().flatten().collect_vec();
            let row: Vec<f64> = if num_cells >= MIN_PARALLEL_CELLS {
                others
                    .par_iter()
                    .map(|y| x.correlation(y))
                    .collect::<Result<_, _>>()?
            } else {
                others
                    .iter()
                    .map(|y| x.correlation(y))
                    .collect::<Result<_, _>>()?
            };
            coefs.extend(row);
        }

        if coefs.is_empty() {
            return Err(SyncError::InsufficientData(format!(
                "No pair of cells with spikes among {} cells.",
                num_cells
            )));
        }

        let synchrony = Synchrony {
            mean: mean(&coefs),
            std: std_dev(&coefs),
            num_pairs: coefs.len(),
        };
        log::info!(
            "Synchrony over {} pairs: mean is {:.4} and std is {:.4}",
            synchrony.num_pairs,
            synchrony.mean,
            synchrony.std
        );
        Ok(synchrony)
    }
}

/// Returns the mean and the standard deviation of the pairwise correlation coefficients of the smoothed spike trains.
///
/// The spike trains are binned into `numpoints_sims` bins over [0, `tstop`] and smoothed by a Gaussian kernel derived from the bin width `dt` (in ms), see [`SynchronyEstimator`].
pub fn compute_synchrony(
    spike_trains: &[Vec<f64>],
    dt: f64,
    numpoints_sims: usize,
    tstop: f64,
) -> Result<(f64, f64), SyncError> {
    let synchrony = SynchronyEstimator::new(dt, numpoints_sims, tstop)?.measure(spike_trains)?;
    Ok((synchrony.mean, synchrony.std))
}

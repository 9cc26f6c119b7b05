//! Infinite impulse response (IIR) filters.
use itertools::Itertools;
use nalgebra::{Complex, DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::SyncError;

/// The sampling frequency of the normalized digital design, i.e., frequencies are relative to the Nyquist frequency.
const DESIGN_FS: f64 = 2.0;

/// The analog prototype of a low-pass filter.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum FilterDesign {
    /// Maximally flat passband.
    Butterworth,
    /// Equiripple passband with the prescribed peak-to-peak ripple (in dB).
    Chebyshev1 { ripple_db: f64 },
}

/// A digital IIR filter given by the coefficients of its transfer function.
///
/// Both coefficient vectors are ordered by decreasing powers, have the same length (padded with zeros), and the leading denominator coefficient is one.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct IirFilter {
    b: Vec<f64>,
    a: Vec<f64>,
}

impl IirFilter {
    /// Create a filter from the numerator `b` and denominator `a` coefficients.
    /// Returns an error if a coefficient vector is empty or if the leading denominator coefficient is zero.
    pub fn build(b: &[f64], a: &[f64]) -> Result<Self, SyncError> {
        if b.is_empty() || a.is_empty() {
            return Err(SyncError::InvalidParameter(
                "The filter coefficients cannot be empty.".to_string(),
            ));
        }
        if a[0] == 0.0 || !a[0].is_finite() {
            return Err(SyncError::InvalidParameter(
                "The leading denominator coefficient must be non-zero.".to_string(),
            ));
        }

        let len = a.len().max(b.len());
        let pad = |c: &[f64]| {
            c.iter()
                .map(|ci| ci / a[0])
                .pad_using(len, |_| 0.0)
                .collect_vec()
        };
        Ok(IirFilter { b: pad(b), a: pad(a) })
    }

    /// Design a digital low-pass filter of the given order with a critical frequency `wn` relative to the Nyquist frequency.
    ///
    /// The analog prototype is pre-warped, scaled to the critical frequency, then mapped to the digital domain by the bilinear transform.
    pub fn lowpass(order: usize, wn: f64, design: FilterDesign) -> Result<Self, SyncError> {
        if order == 0 {
            return Err(SyncError::InvalidParameter(
                "The filter order must be positive.".to_string(),
            ));
        }
        if !(wn > 0.0 && wn < 1.0) {
            return Err(SyncError::InvalidParameter(format!(
                "The critical frequency must be in (0, 1), got {}.",
                wn
            )));
        }

        let (poles, gain) = prototype(order, design)?;

        // Pre-warp the critical frequency and scale the prototype
        let warped = 2.0 * DESIGN_FS * (PI * wn / DESIGN_FS).tan();
        let poles = poles.into_iter().map(|p| p * warped).collect_vec();
        let gain = gain * warped.powi(order as i32);

        // Bilinear transform, all zeros are sent to -1
        let fs2 = Complex::new(2.0 * DESIGN_FS, 0.0);
        let gain = gain
            * poles
                .iter()
                .fold(Complex::new(1.0, 0.0), |acc, p| acc * (fs2 - p))
                .inv()
                .re;
        let poles = poles.iter().map(|p| (fs2 + p) / (fs2 - p)).collect_vec();
        let zeros = vec![Complex::new(-1.0, 0.0); order];

        let b = poly(&zeros).into_iter().map(|c| gain * c.re).collect_vec();
        let a = poly(&poles).into_iter().map(|c| c.re).collect_vec();
        IirFilter::build(&b, &a)
    }

    pub fn b(&self) -> &[f64] {
        &self.b[..]
    }

    pub fn a(&self) -> &[f64] {
        &self.a[..]
    }

    /// Returns the dimension of the filter state.
    pub fn num_states(&self) -> usize {
        self.a.len() - 1
    }

    /// Returns the gain of the filter at zero frequency.
    pub fn dc_gain(&self) -> f64 {
        self.b.iter().sum::<f64>() / self.a.iter().sum::<f64>()
    }

    /// Filter the signal with the direct form II transposed structure, starting from the state `zi` (zero if none).
    /// Returns the filtered signal and the final state.
    pub fn lfilter(&self, x: &[f64], zi: Option<&[f64]>) -> Result<(Vec<f64>, Vec<f64>), SyncError> {
        let num_states = self.num_states();
        let mut z = match zi {
            Some(zi) if zi.len() != num_states => {
                return Err(SyncError::IncompatibleSignals(format!(
                    "The initial state has {} entries, expected {}.",
                    zi.len(),
                    num_states
                )));
            }
            Some(zi) => zi.to_vec(),
            None => vec![0.0; num_states],
        };

        let y = x
            .iter()
            .map(|&xn| {
                let yn = self.b[0] * xn + z.first().copied().unwrap_or(0.0);
                for i in 0..num_states {
                    let next = z.get(i + 1).copied().unwrap_or(0.0);
                    z[i] = self.b[i + 1] * xn + next - self.a[i + 1] * yn;
                }
                yn
            })
            .collect_vec();

        Ok((y, z))
    }

    /// Returns the initial state for which the response to a unit step is the steady state.
    ///
    /// The state solves (I - A^T) zi = b[1:] - a[1:] b[0], with A the companion matrix of the denominator.
    pub fn lfilter_zi(&self) -> Result<Vec<f64>, SyncError> {
        let dim = self.num_states();
        if dim == 0 {
            return Ok(vec![]);
        }

        let mut mat = DMatrix::<f64>::identity(dim, dim);
        for i in 0..dim {
            mat[(i, 0)] += self.a[i + 1];
            if i + 1 < dim {
                mat[(i, i + 1)] -= 1.0;
            }
        }
        let rhs = DVector::from_iterator(dim, (1..=dim).map(|i| self.b[i] - self.a[i] * self.b[0]));

        let zi = mat.lu().solve(&rhs).ok_or_else(|| {
            SyncError::InvalidOperation(
                "The steady-state system of the filter is singular.".to_string(),
            )
        })?;
        Ok(zi.iter().copied().collect())
    }

    /// Apply the filter forward then backward, resulting in a zero-phase filtering.
    ///
    /// The signal is extended at both ends by odd reflection over 3 times the number of coefficients, and each pass starts from the steady state of its first sample.
    /// Returns an error if the signal is not longer than the extension.
    pub fn filtfilt(&self, x: &[f64]) -> Result<Vec<f64>, SyncError> {
        let padlen = 3 * self.a.len();
        if x.len() <= padlen {
            return Err(SyncError::InvalidParameter(format!(
                "The signal must have more than {} samples, got {}.",
                padlen,
                x.len()
            )));
        }

        let last = x.len() - 1;
        let ext = (1..=padlen)
            .rev()
            .map(|k| 2.0 * x[0] - x[k])
            .chain(x.iter().copied())
            .chain((1..=padlen).map(|k| 2.0 * x[last] - x[last - k]))
            .collect_vec();

        let zi = self.lfilter_zi()?;
        let scaled = |s: f64| zi.iter().map(|z| z * s).collect_vec();

        let (mut y, _) = self.lfilter(&ext, Some(&scaled(ext[0])))?;
        y.reverse();
        let (mut y, _) = self.lfilter(&y, Some(&scaled(y[0])))?;
        y.reverse();

        Ok(y[padlen..y.len() - padlen].to_vec())
    }
}

/// Returns the poles and the gain of the analog low-pass prototype (unit critical frequency, no zeros).
fn prototype(order: usize, design: FilterDesign) -> Result<(Vec<Complex<f64>>, f64), SyncError> {
    let n = order as f64;
    let thetas = (0..order).map(|k| PI * (2.0 * k as f64 + 1.0 - n) / (2.0 * n));

    match design {
        FilterDesign::Butterworth => {
            let poles = thetas.map(|theta| -Complex::new(0.0, theta).exp()).collect();
            Ok((poles, 1.0))
        }
        FilterDesign::Chebyshev1 { ripple_db } => {
            if !(ripple_db > 0.0 && ripple_db.is_finite()) {
                return Err(SyncError::InvalidParameter(format!(
                    "The passband ripple must be a positive number of dB, got {}.",
                    ripple_db
                )));
            }
            let eps = (10_f64.powf(0.1 * ripple_db) - 1.0).sqrt();
            let mu = (1.0 / eps).asinh() / n;
            let poles = thetas
                .map(|theta| -Complex::new(mu, theta).sinh())
                .collect_vec();

            let mut gain = poles
                .iter()
                .fold(Complex::new(1.0, 0.0), |acc, p| acc * -p)
                .re;
            if order % 2 == 0 {
                gain /= (1.0 + eps * eps).sqrt();
            }
            Ok((poles, gain))
        }
    }
}

/// Returns the coefficients, by decreasing powers, of the monic polynomial with the given roots.
fn poly(roots: &[Complex<f64>]) -> Vec<Complex<f64>> {
    roots.iter().fold(vec![Complex::new(1.0, 0.0)], |coefs, root| {
        (0..=coefs.len())
            .map(|k| {
                let high = coefs.get(k).copied().unwrap_or_default();
                let low = match k {
                    0 => Complex::new(0.0, 0.0),
                    _ => coefs[k - 1] * root,
                };
                high - low
            })
            .collect()
    })
}

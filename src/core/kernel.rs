//! Smoothing kernels turning delta trains into rate signals.
use serde::{Deserialize, Serialize};

use crate::core::{KERNEL_STD_MS, KERNEL_WINDOW_MS, MAX_KERNEL_LEN};
use crate::error::SyncError;

/// A symmetric Gaussian window, sampled at integer offsets from its center.
/// The value at sample n is exp(-((n - (len - 1) / 2) / std)^2 / 2), i.e., the peak is 1 for odd lengths.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct GaussianKernel {
    values: Vec<f64>,
    std: f64,
}

impl GaussianKernel {
    /// Create a Gaussian window with `len` samples and a standard deviation of `std` samples.
    pub fn build(len: usize, std: f64) -> Result<Self, SyncError> {
        if len == 0 {
            return Err(SyncError::InvalidParameter(
                "The kernel must have at least one sample.".to_string(),
            ));
        }
        if !(std > 0.0 && std.is_finite()) {
            return Err(SyncError::InvalidParameter(format!(
                "The kernel standard deviation must be a positive number, got {}.",
                std
            )));
        }

        let center = (len as f64 - 1.0) / 2.0;
        let values = (0..len)
            .map(|n| {
                let z = (n as f64 - center) / std;
                (-0.5 * z * z).exp()
            })
            .collect();

        Ok(GaussianKernel { values, std })
    }

    /// Create the smoothing kernel associated with a bin width `dt` (in ms).
    ///
    /// The window spans `KERNEL_WINDOW_MS + 1` ms and the spread is `KERNEL_STD_MS` ms, both expressed in samples and truncated toward zero.
    /// Returns an error if `dt` is not positive, so small that the kernel would exceed [`MAX_KERNEL_LEN`] samples, or so large that the kernel would be empty or have no width.
    pub fn from_dt(dt: f64) -> Result<Self, SyncError> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(SyncError::InvalidParameter(format!(
                "The bin width must be a positive number, got {}.",
                dt
            )));
        }

        let len = ((KERNEL_WINDOW_MS + 1.0) / dt).trunc();
        if len > MAX_KERNEL_LEN as f64 {
            return Err(SyncError::InvalidParameter(format!(
                "The bin width {} ms is too small, the smoothing kernel would exceed {} samples.",
                dt, MAX_KERNEL_LEN
            )));
        }
        let len = len as usize;
        let std = (KERNEL_STD_MS / dt).trunc();
        if len == 0 || std == 0.0 {
            return Err(SyncError::InvalidParameter(format!(
                "The bin width {} ms is too large for a {} ms smoothing kernel.",
                dt, KERNEL_STD_MS
            )));
        }
        GaussianKernel::build(len, std)
    }

    pub fn values(&self) -> &[f64] {
        &self.values[..]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the standard deviation of the window, in samples.
    pub fn std(&self) -> f64 {
        self.std
    }

    /// Smooth the signal with the kernel, see [`convolve_same`].
    pub fn apply(&self, signal: &[f64]) -> Vec<f64> {
        convolve_same(signal, &self.values)
    }
}

/// Returns the central part of the discrete linear convolution of x and y.
///
/// The output has the length of the longer operand and is aligned such that its sample k is the sample k + (m - 1) / 2 of the full convolution, with m the length of the shorter operand.
/// Returns an empty vector if one of the operands is empty.
pub fn convolve_same(x: &[f64], y: &[f64]) -> Vec<f64> {
    let (long, short) = if x.len() >= y.len() { (x, y) } else { (y, x) };
    if short.is_empty() {
        return vec![];
    }

    let n = long.len();
    let offset = (short.len() - 1) / 2;
    let mut out = vec![0.0; n];

    // Scatter every non-zero sample, delta trains are mostly empty
    for (t, &value) in long.iter().enumerate().filter(|(_, v)| **v != 0.0) {
        for (j, &weight) in short.iter().enumerate() {
            let pos = t + j;
            if pos < offset {
                continue;
            }
            match out.get_mut(pos - offset) {
                Some(o) => *o += value * weight,
                None => break,
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_build() {
        let kernel = GaussianKernel::build(5, 1.0).unwrap();
        assert_eq!(kernel.len(), 5);
        assert_relative_eq!(kernel.values()[2], 1.0);
        assert_relative_eq!(kernel.values()[1], (-0.5_f64).exp());
        assert_relative_eq!(kernel.values()[0], (-2.0_f64).exp());
        assert_eq!(kernel.values()[0], kernel.values()[4]);

        let kernel = GaussianKernel::build(4, 2.0).unwrap();
        assert_relative_eq!(kernel.values()[1], (-0.5_f64 * 0.0625).exp());
        assert_eq!(kernel.values()[1], kernel.values()[2]);

        assert!(matches!(
            GaussianKernel::build(0, 1.0),
            Err(SyncError::InvalidParameter(_))
        ));
        assert!(matches!(
            GaussianKernel::build(3, 0.0),
            Err(SyncError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_from_dt() {
        let kernel = GaussianKernel::from_dt(1.0).unwrap();
        assert_eq!(kernel.len(), 51);
        assert_eq!(kernel.std(), 5.0);
        assert_relative_eq!(kernel.values()[25], 1.0);

        let kernel = GaussianKernel::from_dt(0.1).unwrap();
        assert_eq!(kernel.len(), 510);
        assert_eq!(kernel.std(), 50.0);

        let kernel = GaussianKernel::from_dt(1e-4).unwrap();
        assert_eq!(kernel.len(), 510_000);
        assert!(kernel.len() <= MAX_KERNEL_LEN);

        let kernel = GaussianKernel::from_dt(5.0).unwrap();
        assert_eq!(kernel.len(), 10);
        assert_eq!(kernel.std(), 1.0);

        // same bin width, same kernel
        assert_eq!(
            GaussianKernel::from_dt(0.25).unwrap(),
            GaussianKernel::from_dt(0.25).unwrap()
        );
    }

    #[test]
    fn test_from_dt_invalid() {
        for dt in [0.0, -1.0, f64::NAN, f64::INFINITY, 5.5, 1e-8, 1e-300, f64::MIN_POSITIVE] {
            assert!(matches!(
                GaussianKernel::from_dt(dt),
                Err(SyncError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_convolve_same() {
        assert_eq!(
            convolve_same(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.5]),
            vec![1.0, 2.5, 4.0]
        );
        assert_eq!(convolve_same(&[1.0, 2.0, 3.0], &[1.0, 1.0]), vec![1.0, 3.0, 5.0]);
        assert_eq!(
            convolve_same(&[0.0, 0.0, 1.0, 0.0, 0.0], &[1.0, 2.0, 3.0]),
            vec![0.0, 1.0, 2.0, 3.0, 0.0]
        );
        // the longer operand sets the output length
        assert_eq!(
            convolve_same(&[1.0], &[1.0, 2.0, 3.0]),
            vec![1.0, 2.0, 3.0]
        );
        assert_eq!(convolve_same(&[], &[1.0, 2.0]), Vec::<f64>::new());
    }
}

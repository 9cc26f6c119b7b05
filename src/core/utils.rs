//! Utility functions for the statistics of real-valued signals.
use crate::error::SyncError;

/// Returns the mean of the vector z.
/// The mean of an empty vector is NaN.
pub fn mean(z: &[f64]) -> f64 {
    z.iter().sum::<f64>() / z.len() as f64
}

/// Returns the population standard deviation (no degree of freedom correction) of the vector z.
pub fn std_dev(z: &[f64]) -> f64 {
    let mu = mean(z);
    (z.iter().map(|zi| (zi - mu) * (zi - mu)).sum::<f64>() / z.len() as f64).sqrt()
}

/// Returns the norm of the vector z.
pub fn l2_norm(z: &[f64]) -> f64 {
    z.iter().map(|zi| zi * zi).sum::<f64>().sqrt()
}

/// Returns the inner product of x and y.
pub fn inner(x: &[f64], y: &[f64]) -> f64 {
    x.iter()
        .zip(y.iter())
        .map(|(x_i, y_i)| x_i * y_i)
        .sum::<f64>()
}

/// Subtract the scalar a from the vector z (in-place).
pub fn sub_scalar_in(z: &mut [f64], a: f64) {
    z.iter_mut().for_each(|zi| *zi -= a);
}

/// Returns true if every entry of z is exactly zero.
pub fn is_zero(z: &[f64]) -> bool {
    z.iter().all(|zi| *zi == 0.0)
}

/// A signal shifted to zero mean, along with its norm, i.e., ready to be correlated with many others.
#[derive(Debug, PartialEq, Clone)]
pub struct CenteredSignal {
    values: Vec<f64>,
    norm: f64,
}

impl CenteredSignal {
    /// Center the signal z.
    /// Returns an error if z has less than two samples or is constant.
    pub fn new(z: &[f64]) -> Result<Self, SyncError> {
        if z.len() < 2 {
            return Err(SyncError::InsufficientData(
                "At least two samples are required to compute a correlation.".to_string(),
            ));
        }

        let mut values = z.to_vec();
        sub_scalar_in(&mut values, mean(z));
        let norm = l2_norm(&values);
        if norm == 0.0 {
            return Err(SyncError::DegenerateSignal(
                "The correlation coefficient is undefined for a constant signal.".to_string(),
            ));
        }

        Ok(CenteredSignal { values, norm })
    }

    pub fn values(&self) -> &[f64] {
        &self.values[..]
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the Pearson correlation coefficient with the other signal, clipped to [-1, 1].
    pub fn correlation(&self, other: &CenteredSignal) -> Result<f64, SyncError> {
        if self.len() != other.len() {
            return Err(SyncError::IncompatibleSignals(format!(
                "Cannot correlate signals of lengths {} and {}.",
                self.len(),
                other.len()
            )));
        }
        Ok((inner(&self.values, &other.values) / (self.norm * other.norm)).clamp(-1.0, 1.0))
    }
}

/// Returns the Pearson correlation coefficient between x and y, clipped to [-1, 1].
///
/// Returns an error if the signals have different (or less than two) lengths, or if one of them is constant.
/// To correlate a signal with many others, center it once with [`CenteredSignal`] instead.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64, SyncError> {
    if x.len() != y.len() {
        return Err(SyncError::IncompatibleSignals(format!(
            "Cannot correlate signals of lengths {} and {}.",
            x.len(),
            y.len()
        )));
    }
    CenteredSignal::new(x)?.correlation(&CenteredSignal::new(y)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_std() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_relative_eq!(std_dev(&[1.0, 2.0, 3.0, 4.0]), 1.25_f64.sqrt());
        assert_relative_eq!(std_dev(&[0.5, 0.5, 0.5]), 0.0);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_pearson() {
        assert_relative_eq!(
            pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap(),
            1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap(),
            -1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            pearson(&[1.0, 0.0, -1.0, 0.0], &[0.0, 1.0, 0.0, -1.0]).unwrap(),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_pearson_invalid() {
        assert!(matches!(
            pearson(&[1.0, 2.0], &[1.0, 2.0, 3.0]),
            Err(SyncError::IncompatibleSignals(_))
        ));
        assert!(matches!(
            pearson(&[1.0], &[1.0]),
            Err(SyncError::InsufficientData(_))
        ));
        assert!(matches!(
            pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]),
            Err(SyncError::DegenerateSignal(_))
        ));
    }

    #[test]
    fn test_centered_signal() {
        let x = CenteredSignal::new(&[1.0, 2.0, 3.0, 6.0]).unwrap();
        assert_eq!(x.values(), &[-2.0, -1.0, 0.0, 3.0]);
        assert_relative_eq!(x.norm(), 14.0_f64.sqrt());

        let y = CenteredSignal::new(&[0.5, 0.0, 2.0, 1.0]).unwrap();
        assert_relative_eq!(
            x.correlation(&y).unwrap(),
            pearson(&[1.0, 2.0, 3.0, 6.0], &[0.5, 0.0, 2.0, 1.0]).unwrap(),
            epsilon = 1e-12
        );
        assert_relative_eq!(x.correlation(&y).unwrap(), y.correlation(&x).unwrap());
        assert_relative_eq!(x.correlation(&x).unwrap(), 1.0, epsilon = 1e-12);

        let z = CenteredSignal::new(&[1.0, 2.0, 3.0]).unwrap();
        assert!(matches!(
            x.correlation(&z),
            Err(SyncError::IncompatibleSignals(_))
        ));
        assert!(matches!(
            CenteredSignal::new(&[2.0, 2.0]),
            Err(SyncError::DegenerateSignal(_))
        ));
        assert!(matches!(
            CenteredSignal::new(&[2.0]),
            Err(SyncError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_is_zero() {
        assert!(is_zero(&[0.0, 0.0]));
        assert!(is_zero(&[]));
        assert!(!is_zero(&[0.0, 1e-300]));
    }
}

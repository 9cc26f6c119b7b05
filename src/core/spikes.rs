//! Spike train related structures.
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::SyncError;

/// A multi-channel spike train, i.e., the firing times of a population of cells (one channel per cell).
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MultiChannelSpikeTrain {
    pub spike_train: Vec<Vec<f64>>,
}

impl MultiChannelSpikeTrain {
    /// Creates a new multi-channel spike train from a collection of firing times.
    /// The firing times of every channel are sorted.
    pub fn new_from(mut spike_train: Vec<Vec<f64>>) -> Self {
        spike_train.iter_mut().for_each(|train| {
            train.sort_by(|a, b| a.total_cmp(b));
        });
        MultiChannelSpikeTrain { spike_train }
    }

    pub fn num_channels(&self) -> usize {
        self.spike_train.len()
    }

    pub fn num_spikes(&self) -> usize {
        self.spike_train.iter().map(|spikes| spikes.len()).sum()
    }

    pub fn get(&self, channel: usize) -> Option<&Vec<f64>> {
        self.spike_train.get(channel)
    }

    pub fn as_slice(&self) -> &[Vec<f64>] {
        &self.spike_train[..]
    }

    /// Save the spike train to a (pretty) JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SyncError> {
        let file = File::create(path).map_err(|e| SyncError::IOError(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| SyncError::IOError(e.to_string()))?;
        writer.flush().map_err(|e| SyncError::IOError(e.to_string()))
    }

    /// Load a spike train from a JSON file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SyncError> {
        let file = File::open(path).map_err(|e| SyncError::IOError(e.to_string()))?;
        let reader = BufReader::new(file);
        let spike_train: Vec<Vec<f64>> = serde_json::from_reader::<_, Self>(reader)
            .map_err(|e| SyncError::IOError(e.to_string()))?
            .spike_train;
        Ok(Self::new_from(spike_train))
    }
}

/// Returns the number of firing times falling in each of the `num_bins` equal-width bins covering [0, tstop].
///
/// Every bin is half-open on the right except the last one, which also counts firing times equal to `tstop`.
/// Firing times outside the range (or not finite) are ignored.
pub fn histogram(times: &[f64], num_bins: usize, tstop: f64) -> Result<Vec<f64>, SyncError> {
    if num_bins == 0 {
        return Err(SyncError::InvalidParameter(
            "The number of bins must be positive.".to_string(),
        ));
    }
    if !(tstop > 0.0 && tstop.is_finite()) {
        return Err(SyncError::InvalidParameter(format!(
            "The histogram range end must be a positive number, got {}.",
            tstop
        )));
    }

    let width = tstop / num_bins as f64;
    let edge = |k: usize| {
        if k == num_bins {
            tstop
        } else {
            k as f64 * width
        }
    };
    let norm = num_bins as f64 / tstop;

    let mut counts = vec![0.0; num_bins];
    for &time in times.iter().filter(|t| **t >= 0.0 && **t <= tstop) {
        let mut pos = ((time * norm) as usize).min(num_bins - 1);
        // The scaled position can be off by one bin due to rounding near the edges
        if time < edge(pos) && pos > 0 {
            pos -= 1;
        } else if pos + 1 < num_bins && time >= edge(pos + 1) {
            pos += 1;
        }
        counts[pos] += 1.0;
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_from() {
        let spike_train = MultiChannelSpikeTrain::new_from(vec![vec![3.0, 1.0, 2.0], vec![], vec![5.0]]);
        assert_eq!(spike_train.num_channels(), 3);
        assert_eq!(spike_train.num_spikes(), 4);
        assert_eq!(spike_train.get(0), Some(&vec![1.0, 2.0, 3.0]));
        assert_eq!(spike_train.get(1), Some(&vec![]));
        assert_eq!(spike_train.get(3), None);
    }

    #[test]
    fn test_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spike_train.json");

        let spike_train = MultiChannelSpikeTrain::new_from(vec![vec![10.0, 20.5], vec![], vec![100.25]]);
        spike_train.save_to(&path).unwrap();
        assert_eq!(MultiChannelSpikeTrain::load_from(&path).unwrap(), spike_train);

        assert!(matches!(
            MultiChannelSpikeTrain::load_from(dir.path().join("missing.json")),
            Err(SyncError::IOError(_))
        ));
    }

    #[test]
    fn test_histogram() {
        assert_eq!(
            histogram(&[0.0, 0.5, 1.0, 3.9, 4.0], 4, 4.0).unwrap(),
            vec![2.0, 1.0, 0.0, 2.0]
        );
        assert_eq!(
            histogram(&[-1.0, 4.5, f64::NAN, f64::INFINITY], 4, 4.0).unwrap(),
            vec![0.0; 4]
        );
        assert_eq!(histogram(&[], 3, 1.0).unwrap(), vec![0.0; 3]);
        assert_eq!(
            histogram(&[10.0, 20.0, 30.0, 30.0], 200, 200.0).unwrap()[10..31]
                .iter()
                .sum::<f64>(),
            4.0
        );
        assert_eq!(histogram(&[0.25, 0.75], 4, 1.0).unwrap(), vec![0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_histogram_invalid() {
        assert!(matches!(
            histogram(&[1.0], 0, 4.0),
            Err(SyncError::InvalidParameter(_))
        ));
        assert!(matches!(
            histogram(&[1.0], 4, 0.0),
            Err(SyncError::InvalidParameter(_))
        ));
        assert!(matches!(
            histogram(&[1.0], 4, f64::NAN),
            Err(SyncError::InvalidParameter(_))
        ));
    }
}

//! Error module for the spike synchrony library.
use std::error::Error;
use std::fmt;

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum SyncError {
    /// Error for invalid parameters, e.g., a non-positive bin width or simulation duration.
    InvalidParameter(String),
    /// Not enough usable data to compute a statistic, e.g., no pair of active cells.
    InsufficientData(String),
    /// A signal without variance, for which the correlation coefficient is undefined.
    DegenerateSignal(String),
    /// Error for incompatible signals, e.g., different lengths.
    IncompatibleSignals(String),
    /// Error for invalid operation, e.g., a singular linear system.
    InvalidOperation(String),
    /// Error for I/O operations.
    IOError(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SyncError::InvalidParameter(e) => write!(f, "Invalid parameters: {}", e),
            SyncError::InsufficientData(e) => write!(f, "Insufficient data: {}", e),
            SyncError::DegenerateSignal(e) => write!(f, "Degenerate signal: {}", e),
            SyncError::IncompatibleSignals(e) => write!(f, "Incompatible signals: {}", e),
            SyncError::InvalidOperation(e) => write!(f, "Invalid operation: {}", e),
            SyncError::IOError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for SyncError {}

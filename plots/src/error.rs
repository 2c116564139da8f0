//! Error types for viewer operations.

use thiserror::Error;

/// Rejections raised when data handed to a viewer does not fit it
///
/// A viewer that returns an error keeps the data it had before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlotError {
    /// The array rank does not match the rank the viewer draws
    #[error("Dimension mismatch: viewer draws {expected}-dim data, got {actual}-dim")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The number of axis descriptors does not match the array rank
    #[error("Data dimension and number of axes do not match: {rank} != {axes}")]
    AxisCountMismatch { rank: usize, axes: usize },

    /// An axis descriptor has a different number of values than its dimension
    #[error("Size mismatch in axis '{axis}': expected {expected} values, got {actual}")]
    SizeMismatch {
        axis: String,
        expected: usize,
        actual: usize,
    },

    /// No viewer exists for data of this rank
    #[error("Main plot does not support {rank}-dim data")]
    UnsupportedRank { rank: usize },
}

// Type alias for Result using PlotError
pub type Result<T> = std::result::Result<T, PlotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let error = PlotError::SizeMismatch {
            axis: "t".into(),
            expected: 3,
            actual: 2,
        };
        assert!(error.to_string().contains("axis 't'"));
        assert!(
            PlotError::UnsupportedRank { rank: 3 }
                .to_string()
                .contains("3-dim")
        );
    }
}

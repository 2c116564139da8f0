//! Error types for selection state operations.
//!
//! `ViewerError` wraps the errors of the scan and plot crates so that every
//! transition of the selection state can be handled through one type.

use crate::fetch::RequestId;
use iquip_plots::PlotError;
use iquip_scan::ScanError;
use thiserror::Error;

/// Custom error type for selection state operations.
///
/// A transition that returns an error leaves the selection state exactly as
/// it was before the call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ViewerError {
    /// Dataset, axis or index validation failures
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The main plot rejected the extracted data
    #[error(transparent)]
    Plot(#[from] PlotError),

    /// The operation needs a dataset and none has been loaded
    #[error("No dataset loaded: cannot {action}")]
    NoDataset { action: String },

    /// An axis was requested but the dataset has no scan parameters
    #[error("No scan parameter available to select as an axis")]
    NoAvailableAxis,

    /// A fetch completed that is not the newest one issued
    #[error("Discarded stale fetch {id}: newest issued is {newest}")]
    StaleFetch { id: RequestId, newest: String },
}

impl ViewerError {
    /// Create a NoDataset error naming the rejected action
    pub fn no_dataset(action: impl Into<String>) -> Self {
        Self::NoDataset {
            action: action.into(),
        }
    }

    /// Create a StaleFetch error
    pub fn stale_fetch(id: RequestId, newest: Option<RequestId>) -> Self {
        Self::StaleFetch {
            id,
            newest: newest.map_or_else(|| "none".to_string(), |newest| newest.to_string()),
        }
    }
}

// Type alias for Result using ViewerError
pub type Result<T> = std::result::Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scan_error() {
        let error: ViewerError = ScanError::unknown_parameter("t").into();
        assert!(matches!(error, ViewerError::Scan(_)));
        assert_eq!(error.to_string(), "Unknown scan parameter 't'");
    }

    #[test]
    fn test_stale_fetch_message() {
        let error = ViewerError::stale_fetch(RequestId::new(1), Some(RequestId::new(3)));
        assert_eq!(error.to_string(), "Discarded stale fetch #1: newest issued is #3");
        let error = ViewerError::stale_fetch(RequestId::new(1), None);
        assert!(error.to_string().ends_with("none"));
    }

    #[test]
    fn test_no_dataset_message() {
        let error = ViewerError::no_dataset("select axes");
        assert_eq!(error.to_string(), "No dataset loaded: cannot select axes");
    }
}

//! # iquip-viewer
//!
//! Keeps the scan data viewer's dataset, choices and outputs consistent.
//!
//! ## Overview
//!
//! A data viewer shows one reduced array in its main plot and the raw shots
//! of one data point in its inspector. [`SelectionState`] tracks what those
//! depend on:
//!
//! - the [`Dataset`](iquip_scan::Dataset), replaced wholesale on every fetch
//! - the [`AxisChoice`](iquip_scan::AxisChoice), carried over by name
//! - the [`DataType`](iquip_scan::DataType) reduction of the main plot
//! - the P1 threshold
//! - the inspected [`DataPointIndex`](iquip_scan::DataPointIndex)
//!
//! Fetches may finish out of order; [`FetchSequencer`] makes sure only the
//! newest one is applied.
//!
//! ## Basic Usage
//!
//! ```rust
//! use iquip_scan::{DataPointIndex, Dataset, ParameterSpec};
//! use iquip_viewer::{SelectionState, ViewerConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rows = vec![vec![1.0, 0.0], vec![0.0, 0.0], vec![1.0, 1.0]];
//! let dataset = Dataset::from_rows(&rows, vec![ParameterSpec::new("t", Some("s"))])?;
//!
//! let mut state = SelectionState::new(ViewerConfig::default());
//! let fetch = state.begin_fetch();
//! state.apply_fetch(fetch, dataset)?;
//! state.set_axes_by_name(&["t"])?;
//!
//! let extracted = state.extracted().expect("an axis is selected");
//! assert_eq!(extracted.data.as_slice(), Some(&[0.5, 1.0][..]));
//! assert_eq!(state.index(), Some(&DataPointIndex::from([0])));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod inspector;
pub mod state;

pub use config::{ViewerConfig, ViewerConfigBuilder};
pub use error::{Result, ViewerError};
pub use fetch::{FetchSequencer, RequestId};
pub use inspector::PointInspection;
pub use state::{Redraw, SelectionState};

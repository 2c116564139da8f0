//! # iquip-scan
//!
//! Scan datasets and the group-reduce engine that turns them into plot arrays.
//!
//! ## Overview
//!
//! An experiment records one integer measurement per shot (e.g. a photon
//! count) together with the values of the scan parameters used for that shot.
//! This crate holds such a table as a [`Dataset`] and reduces it into a dense
//! array over one or two chosen parameters:
//!
//! - [`ScanDataPolicy::symbolize`] ranks each record's value on every selected axis
//! - [`ScanDataPolicy::extract`] groups records with equal ranks and reduces each group
//! - [`ScanDataPolicy::point_sample`] maps a cell back to its raw measurements
//!
//! The reductions (total, average and the thresholded fraction "P1") live in
//! [`reduce`], selected by [`DataType`].
//!
//! ## Basic Usage
//!
//! ```rust
//! use iquip_scan::{AxisChoice, DataType, Dataset, ParameterSpec, ScanDataPolicy};
//!
//! # fn main() -> Result<(), iquip_scan::ScanError> {
//! let rows = vec![
//!     vec![3.0, 0.0, 1.0],
//!     vec![0.0, 0.0, 1.0],
//!     vec![5.0, 1.0, 1.0],
//! ];
//! let specs = vec![ParameterSpec::new("t", Some("s")), ParameterSpec::new("f", Some("Hz"))];
//! let dataset = Dataset::from_rows(&rows, specs)?;
//!
//! let policy = ScanDataPolicy::new(&dataset);
//! let reduction = DataType::P1.reduction(1);
//! let extracted = policy.extract(&AxisChoice::x(0), &reduction)?;
//! assert_eq!(extracted.data.as_slice(), Some(&[0.5, 1.0][..]));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`ScanError`]. Errors are raised before any
//! output is built, so there is never a partially filled array.

pub mod axis;
pub mod dataset;
pub mod error;
pub mod index;
pub mod parameter;
pub mod policy;
pub mod reduce;
pub mod sample;

pub use axis::{AxisChoice, AxisInfo, MAX_AXES};
pub use dataset::{Dataset, DatasetSnapshot, MeasuredValue, ParameterValue, RawRecord};
pub use error::{Result, ScanError};
pub use index::DataPointIndex;
pub use parameter::{ParameterName, ParameterSpec, ParameterSpecBuilder, UnitName};
pub use policy::{Extracted, Group, ScanDataPolicy, Symbols, check_axes};
pub use reduce::{DataType, Reducer, Reduction};
pub use sample::{HISTOGRAM_AXIS_NAME, Histogram, PointSample, PointSummary};

//! # iquip-plots
//!
//! Renderer-independent models of the scan viewer's plots.
//!
//! ## Overview
//!
//! The widgets that actually draw are out of reach of this crate; what lives
//! here is everything they need to stay consistent with the data:
//!
//! - [`CurveViewer`] holds 1-D data and maps a click to the nearest sample
//! - [`ImageViewer`] holds 2-D data and maps a click to the cell under it
//! - [`HistogramViewer`] holds the value histogram of one inspected point
//! - [`MainPlot`] picks the curve or the image by the rank of the data
//!
//! All of them implement [`NdArrayViewer`], which validates incoming arrays
//! against their axis descriptors before accepting them.
//!
//! ## Basic Usage
//!
//! ```rust
//! use iquip_plots::{MainPlot, PlotKind, Point, Rect, ViewBox};
//! use iquip_scan::{AxisInfo, DataPointIndex};
//! use ndarray::array;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut plot = MainPlot::default();
//! plot.set_view_box(
//!     PlotKind::Curve,
//!     ViewBox::new()
//!         .scene(Rect::new(0.0, 0.0, 200.0, 100.0))
//!         .view(Rect::new(0.0, 0.0, 2.0, 1.0))
//!         .build()?,
//! );
//! let axes = [AxisInfo::new("t", vec![0.0, 1.0, 2.0], Some("s"))];
//! plot.set_data(&array![0.1, 0.8, 0.4].into_dyn(), &axes)?;
//!
//! // Sample 1 is drawn at scene (100, 20)
//! let index = plot.click(PlotKind::Curve, Point::new(103.0, 24.0));
//! assert_eq!(index, Some(DataPointIndex::from([1])));
//! # Ok(())
//! # }
//! ```
//!
//! ## Coordinates
//!
//! Clicks arrive in scene coordinates (widget pixels, y down). A [`ViewBox`]
//! maps them into view coordinates (axis units, y up).

pub mod curve;
pub mod error;
pub mod geometry;
pub mod histogram;
pub mod image;
pub mod main_plot;
pub mod viewer;

pub use curve::{AxisLabel, CurveViewer, nearest_sample};
pub use error::{PlotError, Result};
pub use geometry::{Point, Rect, ViewBox, ViewBoxBuilder};
pub use histogram::HistogramViewer;
pub use image::{ImageViewer, locate_pixel};
pub use main_plot::{MainPlot, MainPlotContent, PlotKind};
pub use viewer::{DEFAULT_CLICK_TOLERANCE, NdArrayViewer, check_data};

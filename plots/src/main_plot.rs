use crate::curve::CurveViewer;
use crate::error::{PlotError, Result};
use crate::geometry::{Point, ViewBox};
use crate::image::ImageViewer;
use crate::viewer::{DEFAULT_CLICK_TOLERANCE, NdArrayViewer};
use iquip_scan::{AxisInfo, DataPointIndex};
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::debug;

/// The locating viewer a click was made on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    Curve,
    Image,
}

impl PlotKind {
    /// Viewer kind that draws data of the given rank
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Self::Curve),
            2 => Some(Self::Image),
            _ => None,
        }
    }

    pub fn rank(self) -> usize {
        match self {
            Self::Curve => 1,
            Self::Image => 2,
        }
    }
}

/// What the main plot currently shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MainPlotContent {
    /// Nothing has been set, or the data was cleared
    Empty,
    /// Rank-0 data: a single value, shown as a readout
    Scalar(f64),
    /// Rank-1 or rank-2 data drawn by one of the viewers
    Plot(PlotKind),
}

/// Main plot that switches between a curve and an image by data rank
#[derive(Debug, Clone)]
pub struct MainPlot {
    curve: CurveViewer,
    image: ImageViewer,
    content: MainPlotContent,
    tolerance: f64,
}

impl Default for MainPlot {
    fn default() -> Self {
        Self::new(DEFAULT_CLICK_TOLERANCE)
    }
}

impl MainPlot {
    pub fn new(tolerance: f64) -> Self {
        Self {
            curve: CurveViewer::default(),
            image: ImageViewer::default(),
            content: MainPlotContent::Empty,
            tolerance,
        }
    }

    pub fn content(&self) -> MainPlotContent {
        self.content
    }

    /// Kind of the viewer on display, if any
    pub fn active(&self) -> Option<PlotKind> {
        match self.content {
            MainPlotContent::Plot(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn curve(&self) -> &CurveViewer {
        &self.curve
    }

    pub fn image(&self) -> &ImageViewer {
        &self.image
    }

    /// Scene distance within which a curve click selects a sample
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Set the scene geometry of the viewer of the given kind
    pub fn set_view_box(&mut self, kind: PlotKind, view_box: ViewBox) {
        match kind {
            PlotKind::Curve => self.curve.view_box = view_box,
            PlotKind::Image => self.image.view_box = view_box,
        }
    }

    /// Show new data, choosing the viewer by its rank
    ///
    /// # Errors
    /// Returns [`PlotError::UnsupportedRank`] for rank 3 and above, or the
    /// chosen viewer's rejection. The previous content is kept on error.
    pub fn set_data(&mut self, data: &ArrayD<f64>, axes: &[AxisInfo]) -> Result<MainPlotContent> {
        let content = match data.ndim() {
            0 => {
                if !axes.is_empty() {
                    return Err(PlotError::AxisCountMismatch {
                        rank: 0,
                        axes: axes.len(),
                    });
                }
                MainPlotContent::Scalar(data.iter().copied().next().unwrap_or_default())
            }
            1 => {
                self.curve.set_data(data, axes)?;
                MainPlotContent::Plot(PlotKind::Curve)
            }
            2 => {
                self.image.set_data(data, axes)?;
                MainPlotContent::Plot(PlotKind::Image)
            }
            rank => return Err(PlotError::UnsupportedRank { rank }),
        };
        debug!("Main plot shows {:?} for shape {:?}", content, data.shape());
        self.content = content;
        Ok(content)
    }

    pub fn clear(&mut self) {
        self.content = MainPlotContent::Empty;
    }

    /// Locate a click on the viewer of the given kind
    ///
    /// Clicks on a viewer that is not on display never match.
    pub fn nearest_data_point(
        &self,
        kind: PlotKind,
        scene: Point,
        tolerance: Option<f64>,
    ) -> Option<DataPointIndex> {
        if self.active() != Some(kind) {
            return None;
        }
        match kind {
            PlotKind::Curve => self.curve.nearest_data_point(scene, tolerance),
            PlotKind::Image => self.image.nearest_data_point(scene, tolerance),
        }
    }

    /// Locate a click with the plot's click tolerance
    pub fn click(&self, kind: PlotKind, scene: Point) -> Option<DataPointIndex> {
        self.nearest_data_point(kind, scene, Some(self.tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use ndarray::{arr0, array};
    use std::str::FromStr;

    fn curve_axes() -> Vec<AxisInfo> {
        vec![AxisInfo::new("t", vec![0.0, 1.0], None)]
    }

    #[test]
    fn test_plot_kind_by_rank() {
        assert_eq!(PlotKind::for_rank(1), Some(PlotKind::Curve));
        assert_eq!(PlotKind::for_rank(2), Some(PlotKind::Image));
        assert_eq!(PlotKind::for_rank(0), None);
        assert_eq!(PlotKind::Image.rank(), 2);
        assert_eq!(PlotKind::from_str("Curve"), Ok(PlotKind::Curve));
        assert_eq!(PlotKind::Image.to_string(), "image");
    }

    #[test]
    fn test_dispatch_by_rank() {
        let mut plot = MainPlot::default();
        assert_eq!(plot.content(), MainPlotContent::Empty);

        let content = plot.set_data(&arr0(7.0).into_dyn(), &[]).expect("scalar");
        assert_eq!(content, MainPlotContent::Scalar(7.0));

        plot.set_data(&array![1.0, 2.0].into_dyn(), &curve_axes())
            .expect("curve");
        assert_eq!(plot.active(), Some(PlotKind::Curve));

        let axes = vec![
            AxisInfo::new("t", vec![0.0, 1.0], None),
            AxisInfo::new("f", vec![0.0], None),
        ];
        plot.set_data(&array![[1.0], [2.0]].into_dyn(), &axes)
            .expect("image");
        assert_eq!(plot.active(), Some(PlotKind::Image));
        assert_eq!(plot.image().width(), 2);
    }

    #[test]
    fn test_rejects_rank_three_and_keeps_content() {
        let mut plot = MainPlot::default();
        plot.set_data(&array![1.0, 2.0].into_dyn(), &curve_axes())
            .expect("curve");
        let data = ArrayD::<f64>::zeros(vec![1, 1, 1]);
        assert_eq!(
            plot.set_data(&data, &[]),
            Err(PlotError::UnsupportedRank { rank: 3 })
        );
        assert_eq!(plot.active(), Some(PlotKind::Curve));
    }

    #[test]
    fn test_click_uses_tolerance_and_active_kind() {
        let mut plot = MainPlot::default();
        let view_box = ViewBox::new()
            .scene(Rect::new(0.0, 0.0, 100.0, 100.0))
            .view(Rect::new(0.0, 0.0, 1.0, 10.0))
            .build()
            .expect("view box");
        plot.set_view_box(PlotKind::Curve, view_box);
        plot.set_data(&array![5.0, 5.0].into_dyn(), &curve_axes())
            .expect("curve");

        // Sample 1 sits at scene (100, 50)
        assert_eq!(
            plot.click(PlotKind::Curve, Point::new(95.0, 50.0)),
            Some(DataPointIndex::from([1]))
        );
        assert_eq!(plot.click(PlotKind::Curve, Point::new(50.0, 0.0)), None);
        assert_eq!(plot.click(PlotKind::Image, Point::new(95.0, 50.0)), None);
        assert_eq!(
            plot.nearest_data_point(PlotKind::Curve, Point::new(50.0, 0.0), None),
            Some(DataPointIndex::from([0]))
        );
    }
}

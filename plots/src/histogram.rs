use crate::curve::AxisLabel;
use crate::error::Result;
use crate::viewer::{NdArrayViewer, check_data};
use iquip_scan::{AxisInfo, Histogram, MeasuredValue};
use ndarray::ArrayD;

/// Bar graph of how many shots measured each value at the inspected point
///
/// A vertical marker sits half a unit above the threshold, between the last
/// value counted as "0" and the first counted as "1".
#[derive(Debug, Clone, Default)]
pub struct HistogramViewer {
    positions: Vec<f64>,
    heights: Vec<f64>,
    bottom_label: AxisLabel,
    threshold_line: f64,
}

impl HistogramViewer {
    pub fn new(threshold: MeasuredValue) -> Self {
        let mut viewer = Self::default();
        viewer.set_threshold(threshold);
        viewer
    }

    /// Bar centers along the value axis
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    pub fn bottom_label(&self) -> &AxisLabel {
        &self.bottom_label
    }

    /// Bars are one value wide
    pub fn bar_width(&self) -> f64 {
        1.0
    }

    pub fn threshold_line(&self) -> f64 {
        self.threshold_line
    }

    pub fn set_threshold(&mut self, threshold: MeasuredValue) {
        self.threshold_line = threshold as f64 + 0.5;
    }

    /// Replace the bars with a sample histogram
    pub fn set_histogram(&mut self, histogram: &Histogram) -> Result<()> {
        let (heights, axis) = histogram.to_bars();
        self.set_data(&heights.into_dyn(), &[axis])
    }
}

impl NdArrayViewer for HistogramViewer {
    fn ndim(&self) -> usize {
        1
    }

    fn set_data(&mut self, data: &ArrayD<f64>, axes: &[AxisInfo]) -> Result<()> {
        check_data(self.ndim(), data, axes)?;
        let axis = &axes[0];
        self.bottom_label = AxisLabel::from(axis);
        self.positions = axis.values.clone();
        self.heights = data.iter().copied().collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use iquip_scan::PointSample;

    #[test]
    fn test_threshold_line() {
        let mut viewer = HistogramViewer::new(2);
        assert_eq!(viewer.threshold_line(), 2.5);
        viewer.set_threshold(0);
        assert_eq!(viewer.threshold_line(), 0.5);
    }

    #[test]
    fn test_set_histogram() {
        let mut viewer = HistogramViewer::new(0);
        let histogram = PointSample::new(vec![0, 0, 3]).histogram();
        viewer.set_histogram(&histogram).expect("bars");
        assert_eq!(viewer.positions(), &[0.0, 3.0]);
        assert_eq!(viewer.heights(), &[2.0, 1.0]);
        assert_eq!(viewer.bottom_label().text, "value");
    }

    #[test]
    fn test_histogram_does_not_locate_points() {
        let viewer = HistogramViewer::new(0);
        assert_eq!(viewer.nearest_data_point(Point::new(0.0, 0.0), None), None);
    }
}

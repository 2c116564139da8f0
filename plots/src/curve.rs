use crate::error::Result;
use crate::geometry::{Point, ViewBox};
use crate::viewer::{NdArrayViewer, check_data};
use iquip_scan::{AxisInfo, DataPointIndex};
use ndarray::ArrayD;

/// Label of a plot axis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisLabel {
    pub text: String,
    pub unit: Option<String>,
}

impl From<&AxisInfo> for AxisLabel {
    fn from(info: &AxisInfo) -> Self {
        Self {
            text: info.name.clone(),
            unit: info.unit.clone(),
        }
    }
}

/// Viewer for 1-D data drawn as a curve
///
/// The curve's samples are `(axis value, data value)` pairs. A click picks the
/// sample nearest to it on screen: distances are measured in scene pixels, so
/// a sample that looks close is judged close whatever the zoom of each axis.
#[derive(Debug, Clone, Default)]
pub struct CurveViewer {
    pub view_box: ViewBox,
    bottom_label: AxisLabel,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl CurveViewer {
    pub fn new(view_box: ViewBox) -> Self {
        Self {
            view_box,
            ..Self::default()
        }
    }

    /// Sample positions along the x axis
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Sample values
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn bottom_label(&self) -> &AxisLabel {
        &self.bottom_label
    }
}

impl NdArrayViewer for CurveViewer {
    fn ndim(&self) -> usize {
        1
    }

    fn set_data(&mut self, data: &ArrayD<f64>, axes: &[AxisInfo]) -> Result<()> {
        check_data(self.ndim(), data, axes)?;
        let axis = &axes[0];
        self.bottom_label = AxisLabel::from(axis);
        self.x = axis.values.clone();
        self.y = data.iter().copied().collect();
        Ok(())
    }

    fn nearest_data_point(&self, scene: Point, tolerance: Option<f64>) -> Option<DataPointIndex> {
        let view = self.view_box.map_scene_to_view(scene);
        nearest_sample(
            view,
            self.view_box.pixels_per_unit(),
            &self.x,
            &self.y,
            tolerance,
        )
        .map(|index| DataPointIndex::from([index]))
    }
}

/// Index of the sample closest to `view`, measured in scene units
///
/// Offsets along each axis are scaled by `pixels_per_unit` before the squared
/// Euclidean distance is taken. Ties resolve to the lowest index. With a
/// tolerance the nearest sample is only returned when its distance is within
/// it.
pub fn nearest_sample(
    view: Point,
    pixels_per_unit: (f64, f64),
    xs: &[f64],
    ys: &[f64],
    tolerance: Option<f64>,
) -> Option<usize> {
    let (rx, ry) = pixels_per_unit;
    let (index, distance_squared) = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| {
            let dx = (view.x - x) * rx;
            let dy = (view.y - y) * ry;
            dx * dx + dy * dy
        })
        .enumerate()
        .filter(|(_, d)| !d.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((i, d)),
        })?;

    match tolerance {
        Some(tolerance) if distance_squared > tolerance * tolerance => None,
        _ => Some(index),
    }
}

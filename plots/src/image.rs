use crate::curve::AxisLabel;
use crate::error::{PlotError, Result};
use crate::geometry::{Point, Rect, ViewBox};
use crate::viewer::{NdArrayViewer, check_data};
use iquip_scan::{AxisInfo, DataPointIndex};
use ndarray::{Array2, ArrayD, Ix2};

/// Viewer for 2-D data drawn as a color-mapped image
///
/// Array axis 0 runs along the image width (the X parameter) and axis 1 along
/// its height (the Y parameter). The image is stretched over the rectangle
/// spanned by the first and last value of each axis, so the axes should be
/// evenly spaced for the picture to be faithful.
///
/// Every pixel belongs to exactly one cell, so locating a click needs no
/// tolerance.
#[derive(Debug, Clone)]
pub struct ImageViewer {
    pub view_box: ViewBox,
    image: Array2<f64>,
    rect: Rect,
    bottom_label: AxisLabel,
    left_label: AxisLabel,
}

impl Default for ImageViewer {
    fn default() -> Self {
        Self {
            view_box: ViewBox::default(),
            image: Array2::zeros((1, 1)),
            rect: Rect::default(),
            bottom_label: AxisLabel::default(),
            left_label: AxisLabel::default(),
        }
    }
}

impl ImageViewer {
    pub fn new(view_box: ViewBox) -> Self {
        Self {
            view_box,
            ..Self::default()
        }
    }

    pub fn image(&self) -> &Array2<f64> {
        &self.image
    }

    /// Number of cells along the X axis
    pub fn width(&self) -> usize {
        self.image.nrows()
    }

    /// Number of cells along the Y axis
    pub fn height(&self) -> usize {
        self.image.ncols()
    }

    /// Area the image covers, in axis units
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn bottom_label(&self) -> &AxisLabel {
        &self.bottom_label
    }

    pub fn left_label(&self) -> &AxisLabel {
        &self.left_label
    }

    /// Map a scene position into the image's local pixel space
    pub fn map_scene_to_pixel(&self, scene: Point) -> Point {
        let view = self.view_box.map_scene_to_view(scene);
        Point::new(
            (view.x - self.rect.x) / self.rect.width * self.width() as f64,
            (view.y - self.rect.y) / self.rect.height * self.height() as f64,
        )
    }
}

impl NdArrayViewer for ImageViewer {
    fn ndim(&self) -> usize {
        2
    }

    fn set_data(&mut self, data: &ArrayD<f64>, axes: &[AxisInfo]) -> Result<()> {
        check_data(self.ndim(), data, axes)?;
        let (haxis, vaxis) = (&axes[0], &axes[1]);
        let (x, width) = span(&haxis.values);
        let (y, height) = span(&vaxis.values);

        self.image = data
            .clone()
            .into_dimensionality::<Ix2>()
            .map_err(|_| PlotError::DimensionMismatch {
                expected: 2,
                actual: data.ndim(),
            })?;
        self.rect = Rect::new(x, y, width, height);
        self.bottom_label = AxisLabel::from(haxis);
        self.left_label = AxisLabel::from(vaxis);
        Ok(())
    }

    fn nearest_data_point(&self, scene: Point, _tolerance: Option<f64>) -> Option<DataPointIndex> {
        let pixel = self.map_scene_to_pixel(scene);
        locate_pixel(pixel, self.width(), self.height())
            .map(|(column, row)| DataPointIndex::from([column, row]))
    }
}

/// Grid cell containing a point in image pixel space
///
/// Both coordinates are floored; the result is `(column, row)` when it lies
/// within `[0, width) x [0, height)` and `None` otherwise.
pub fn locate_pixel(pixel: Point, width: usize, height: usize) -> Option<(usize, usize)> {
    let x = pixel.x.floor();
    let y = pixel.y.floor();
    let inside = (0.0..width as f64).contains(&x) && (0.0..height as f64).contains(&y);
    inside.then(|| (x as usize, y as usize))
}

/// Origin and extent covered by an axis; a degenerate axis spans one unit
fn span(values: &[f64]) -> (f64, f64) {
    match (values.first(), values.last()) {
        (Some(&first), Some(&last)) if last - first > 0.0 && (last - first).is_finite() => {
            (first, last - first)
        }
        (Some(&first), _) if first.is_finite() => (first, 1.0),
        _ => (0.0, 1.0),
    }
}

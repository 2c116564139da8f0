use crate::error::{PlotError, Result};
use crate::geometry::Point;
use iquip_scan::{AxisInfo, DataPointIndex};
use ndarray::ArrayD;

/// Scene distance within which a click selects a curve sample
pub const DEFAULT_CLICK_TOLERANCE: f64 = 20.0;

/// Trait for viewers that draw an n-dimensional array
///
/// Each viewer draws arrays of one fixed rank. A viewer that also supports
/// point inspection overrides [`NdArrayViewer::nearest_data_point`] to map a
/// click back to an array index.
pub trait NdArrayViewer {
    /// Rank of the arrays this viewer draws
    fn ndim(&self) -> usize;

    /// Replace the viewer's data
    ///
    /// # Arguments
    ///
    /// * `data` - The array to draw; its rank must be [`NdArrayViewer::ndim`]
    /// * `axes` - One descriptor per array dimension, in dimension order; each
    ///   descriptor's value count must equal the size of its dimension
    ///
    /// # Errors
    /// Any mismatch is rejected and the previous data is kept.
    fn set_data(&mut self, data: &ArrayD<f64>, axes: &[AxisInfo]) -> Result<()>;

    /// Index of the data point nearest to a scene position
    ///
    /// `tolerance` is the maximum distance in scene units; `None` means no
    /// limit. Viewers without point inspection never match.
    fn nearest_data_point(&self, _scene: Point, _tolerance: Option<f64>) -> Option<DataPointIndex> {
        None
    }
}

/// Check an array and its axes against a viewer of rank `ndim`
pub fn check_data(ndim: usize, data: &ArrayD<f64>, axes: &[AxisInfo]) -> Result<()> {
    if data.ndim() != ndim {
        return Err(PlotError::DimensionMismatch {
            expected: ndim,
            actual: data.ndim(),
        });
    }
    if data.ndim() != axes.len() {
        return Err(PlotError::AxisCountMismatch {
            rank: data.ndim(),
            axes: axes.len(),
        });
    }
    for (&size, info) in data.shape().iter().zip(axes) {
        if size != info.values.len() {
            return Err(PlotError::SizeMismatch {
                axis: info.name.clone(),
                expected: size,
                actual: info.values.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_check_data() {
        let data = array![1.0, 2.0].into_dyn();
        let axes = vec![AxisInfo::new("t", vec![0.0, 1.0], Some("s"))];
        assert!(check_data(1, &data, &axes).is_ok());
        assert_eq!(
            check_data(2, &data, &axes),
            Err(PlotError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            check_data(1, &data, &[]),
            Err(PlotError::AxisCountMismatch { rank: 1, axes: 0 })
        );
        let short = vec![AxisInfo::new("t", vec![0.0], None)];
        assert!(matches!(
            check_data(1, &data, &short),
            Err(PlotError::SizeMismatch { expected: 2, actual: 1, .. })
        ));
    }
}

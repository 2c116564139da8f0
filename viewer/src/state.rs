//! Selection state of the scan data viewer.
//!
//! [`SelectionState`] owns the dataset and the user's choices (axes, data
//! type, threshold and inspected point) together with everything derived from
//! them: the reduced main-plot array, the main plot viewer, the point
//! inspection and its histogram. Each transition recomputes what depends on
//! the change and reports it as a [`Redraw`].
//!
//! Transitions validate first and commit last, so a rejected call leaves the
//! state untouched.

use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::fetch::{FetchSequencer, RequestId};
use crate::inspector::PointInspection;
use iquip_plots::{HistogramViewer, MainPlot, PlotKind, Point, ViewBox};
use iquip_scan::{
    AxisChoice, DataPointIndex, DataType, Dataset, Extracted, MeasuredValue, ScanDataPolicy,
    ScanError,
};
use serde::Serialize;
use tracing::{debug, warn};

/// Parts of the display a transition changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Redraw {
    pub main_plot: bool,
    pub inspector: bool,
}

impl Redraw {
    pub const NONE: Self = Self {
        main_plot: false,
        inspector: false,
    };

    pub const ALL: Self = Self {
        main_plot: true,
        inspector: true,
    };

    pub fn is_none(&self) -> bool {
        !self.main_plot && !self.inspector
    }
}

/// Values derived from the dataset and the current choices
#[derive(Debug, Clone, Default)]
struct Derived {
    extracted: Option<Extracted>,
    index: Option<DataPointIndex>,
    inspection: Option<PointInspection>,
}

/// Dataset, choices and derived outputs of one data viewer
#[derive(Debug, Clone)]
pub struct SelectionState {
    config: ViewerConfig,
    dataset: Option<Dataset>,
    axes: AxisChoice,
    data_type: DataType,
    threshold: MeasuredValue,
    derived: Derived,
    main_plot: MainPlot,
    histogram: HistogramViewer,
    fetches: FetchSequencer,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl SelectionState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            dataset: None,
            axes: AxisChoice::none(),
            data_type: config.data_type,
            threshold: config.threshold,
            derived: Derived::default(),
            main_plot: MainPlot::new(config.click_tolerance),
            histogram: HistogramViewer::new(config.threshold),
            fetches: FetchSequencer::new(),
            config,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn axes(&self) -> &AxisChoice {
        &self.axes
    }

    /// Names of the selected axes, X first
    pub fn axis_names(&self) -> Vec<&str> {
        self.dataset
            .as_ref()
            .map(|dataset| {
                self.axes
                    .indices()
                    .iter()
                    .filter_map(|&index| dataset.spec(index).ok())
                    .map(|spec| &*spec.name)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn threshold(&self) -> MeasuredValue {
        self.threshold
    }

    /// The inspected data point, if the reduced array has any cell
    pub fn index(&self) -> Option<&DataPointIndex> {
        self.derived.index.as_ref()
    }

    /// Reduced array and axes shown by the main plot
    ///
    /// `None` until a dataset is loaded and at least one axis is selected.
    pub fn extracted(&self) -> Option<&Extracted> {
        self.derived.extracted.as_ref()
    }

    pub fn main_plot(&self) -> &MainPlot {
        &self.main_plot
    }

    pub fn inspection(&self) -> Option<&PointInspection> {
        self.derived.inspection.as_ref()
    }

    pub fn histogram(&self) -> &HistogramViewer {
        &self.histogram
    }

    /// Set the scene geometry of one of the main plot viewers
    pub fn set_view_box(&mut self, kind: PlotKind, view_box: ViewBox) {
        self.main_plot.set_view_box(kind, view_box);
    }

    /// Start a dataset fetch; its result is applied with [`Self::apply_fetch`]
    pub fn begin_fetch(&mut self) -> RequestId {
        self.fetches.issue()
    }

    /// Apply the result of a fetch started with [`Self::begin_fetch`]
    ///
    /// # Errors
    /// [`ViewerError::StaleFetch`] if a newer fetch has been started since, or
    /// this one was already applied. The state is left untouched.
    pub fn apply_fetch(&mut self, id: RequestId, dataset: Dataset) -> Result<Redraw> {
        self.fetches.check(id)?;
        let redraw = self.replace_dataset(dataset)?;
        self.fetches.mark_applied(id);
        Ok(redraw)
    }

    /// Replace the dataset wholesale
    ///
    /// The axis choice is carried over by parameter name. If the X parameter
    /// is gone the choice becomes empty and no main plot is shown until axes
    /// are selected again; if only Y is gone it is dropped.
    pub fn replace_dataset(&mut self, dataset: Dataset) -> Result<Redraw> {
        let axes = self.preserved_axes(&dataset);
        let derived = self.derive(&dataset, &axes, self.data_type, self.threshold)?;
        debug!(
            records = dataset.len(),
            parameters = dataset.n_parameters(),
            axes = ?axes.indices(),
            "Replaced dataset"
        );
        self.commit(derived)?;
        self.dataset = Some(dataset);
        self.axes = axes;
        Ok(Redraw::ALL)
    }

    /// Choose the plot axes by parameter index, X first
    ///
    /// # Errors
    /// - [`ViewerError::NoDataset`] before a dataset is loaded
    /// - [`ViewerError::NoAvailableAxis`] if the dataset has no parameters
    /// - [`ViewerError::Scan`] if an index is out of range
    pub fn set_axes(&mut self, axes: AxisChoice) -> Result<Redraw> {
        let dataset = self
            .dataset
            .as_ref()
            .ok_or_else(|| ViewerError::no_dataset("select axes"))?;
        if !axes.is_empty() && dataset.n_parameters() == 0 {
            return Err(ViewerError::NoAvailableAxis);
        }
        axes.check_against(dataset.n_parameters())?;
        let derived = self.derive(dataset, &axes, self.data_type, self.threshold)?;
        debug!(axes = ?axes.indices(), "Axis choice changed");
        self.commit(derived)?;
        self.axes = axes;
        Ok(Redraw::ALL)
    }

    /// Choose the plot axes by parameter name, X first
    pub fn set_axes_by_name<S: AsRef<str>>(&mut self, names: &[S]) -> Result<Redraw> {
        let dataset = self
            .dataset
            .as_ref()
            .ok_or_else(|| ViewerError::no_dataset("select axes"))?;
        if !names.is_empty() && dataset.n_parameters() == 0 {
            return Err(ViewerError::NoAvailableAxis);
        }
        let indices = names
            .iter()
            .map(|name| {
                dataset
                    .parameter_index(name.as_ref())
                    .ok_or_else(|| ScanError::unknown_parameter(name.as_ref()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.set_axes(AxisChoice::new(indices)?)
    }

    /// Change the reduction used by the main plot
    ///
    /// The inspector always shows all three scalars, so it is refreshed but
    /// its values do not depend on the data type.
    pub fn set_data_type(&mut self, data_type: DataType) -> Result<Redraw> {
        if data_type == self.data_type {
            return Ok(Redraw::NONE);
        }
        let Some(dataset) = self.dataset.as_ref() else {
            self.data_type = data_type;
            return Ok(Redraw::NONE);
        };
        let derived = self.derive(dataset, &self.axes, data_type, self.threshold)?;
        debug!(%data_type, "Data type changed");
        let redraw = Redraw {
            main_plot: derived.extracted.is_some(),
            inspector: derived.inspection.is_some(),
        };
        self.commit(derived)?;
        self.data_type = data_type;
        Ok(redraw)
    }

    /// Change the P1 threshold
    ///
    /// P1 is recomputed for the currently inspected point. The main plot is
    /// only re-extracted when it shows P1.
    pub fn set_threshold(&mut self, threshold: MeasuredValue) -> Result<Redraw> {
        if threshold == self.threshold {
            return Ok(Redraw::NONE);
        }
        let mut redraw = Redraw::NONE;
        if self.data_type == DataType::P1
            && let Some(dataset) = self.dataset.as_ref()
            && !self.axes.is_empty()
        {
            let extracted = extract(dataset, &self.axes, self.data_type, threshold)?;
            self.main_plot.set_data(&extracted.data, &extracted.axes)?;
            self.derived.extracted = Some(extracted);
            redraw.main_plot = true;
        }

        debug!(threshold, "Threshold changed");
        self.threshold = threshold;
        self.histogram.set_threshold(threshold);
        if let Some(inspection) = self.derived.inspection.as_mut() {
            inspection.rethreshold(threshold);
            redraw.inspector = true;
        }
        Ok(redraw)
    }

    /// Handle a click on the main plot
    ///
    /// A click that matches no data point changes nothing.
    pub fn click(&mut self, kind: PlotKind, scene: Point) -> Result<Redraw> {
        match self.main_plot.click(kind, scene) {
            Some(index) => self.select_point(index),
            None => {
                debug!(%kind, x = scene.x, y = scene.y, "Click matched no data point");
                Ok(Redraw::NONE)
            }
        }
    }

    /// Inspect the data point at `index`
    ///
    /// # Errors
    /// [`ViewerError::Scan`] with a shape mismatch if the index does not fit
    /// the reduced array.
    pub fn select_point(&mut self, index: DataPointIndex) -> Result<Redraw> {
        let dataset = self
            .dataset
            .as_ref()
            .ok_or_else(|| ViewerError::no_dataset("select a data point"))?;
        let inspection = PointInspection::compute(dataset, &self.axes, index, self.threshold)?;
        self.histogram.set_histogram(&inspection.histogram)?;
        debug!(index = %inspection.index, count = inspection.summary.count, "Selected data point");
        self.derived.index = Some(inspection.index.clone());
        self.derived.inspection = Some(inspection);
        Ok(Redraw {
            main_plot: false,
            inspector: true,
        })
    }

    /// Axis choice carried over to a new dataset by parameter name
    fn preserved_axes(&self, dataset: &Dataset) -> AxisChoice {
        let names = self.axis_names();
        let Some(x_name) = names.first() else {
            return AxisChoice::none();
        };
        let Some(x) = dataset.parameter_index(x_name) else {
            warn!("X axis '{}' is missing from the new dataset, clearing the axis choice", x_name);
            return AxisChoice::none();
        };
        let Some(y_name) = names.get(1) else {
            return AxisChoice::x(x);
        };
        match dataset.parameter_index(y_name) {
            Some(y) => AxisChoice::xy(x, y).unwrap_or_else(|_| AxisChoice::x(x)),
            None => {
                warn!("Y axis '{}' is missing from the new dataset, dropping it", y_name);
                AxisChoice::x(x)
            }
        }
    }

    /// Compute extraction, index and inspection without touching the state
    fn derive(
        &self,
        dataset: &Dataset,
        axes: &AxisChoice,
        data_type: DataType,
        threshold: MeasuredValue,
    ) -> Result<Derived> {
        let (extracted, shape) = if axes.is_empty() {
            (None, Vec::new())
        } else {
            let extracted = extract(dataset, axes, data_type, threshold)?;
            let shape = extracted.shape().to_vec();
            (Some(extracted), shape)
        };

        let previous = self
            .derived
            .index
            .clone()
            .unwrap_or_else(|| DataPointIndex::zeros(shape.len()));
        let index = previous.revalidated(&shape);
        let inspection = index
            .clone()
            .map(|index| PointInspection::compute(dataset, axes, index, threshold))
            .transpose()?;

        Ok(Derived {
            extracted,
            index,
            inspection,
        })
    }

    fn commit(&mut self, derived: Derived) -> Result<()> {
        match &derived.extracted {
            Some(extracted) => {
                self.main_plot.set_data(&extracted.data, &extracted.axes)?;
            }
            None => self.main_plot.clear(),
        }
        match &derived.inspection {
            Some(inspection) => self.histogram.set_histogram(&inspection.histogram)?,
            None => self.histogram = HistogramViewer::new(self.threshold),
        }
        self.derived = derived;
        Ok(())
    }
}

fn extract(
    dataset: &Dataset,
    axes: &AxisChoice,
    data_type: DataType,
    threshold: MeasuredValue,
) -> Result<Extracted> {
    let reduction = data_type.reduction(threshold);
    Ok(ScanDataPolicy::new(dataset).extract(axes, &reduction)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iquip_plots::{MainPlotContent, Rect};
    use iquip_scan::ParameterSpec;

    /// Two shots per (t, f) pair with t in {0, 1, 2} and f in {10, 20}
    fn dataset() -> Dataset {
        let mut rows = Vec::new();
        for (i, t) in [0.0, 1.0, 2.0].into_iter().enumerate() {
            for (j, f) in [10.0, 20.0].into_iter().enumerate() {
                let value = (i * 2 + j) as f64;
                rows.push(vec![value, t, f]);
                rows.push(vec![value + 1.0, t, f]);
            }
        }
        let specs = vec![
            ParameterSpec::new("t", Some("s")),
            ParameterSpec::new("f", Some("Hz")),
        ];
        Dataset::from_rows(&rows, specs).expect("dataset")
    }

    fn loaded() -> SelectionState {
        let mut state = SelectionState::default();
        state.replace_dataset(dataset()).expect("dataset");
        state
    }

    #[test]
    fn test_first_dataset_has_no_main_plot() {
        let state = loaded();
        assert!(state.axes().is_empty());
        assert!(state.extracted().is_none());
        assert_eq!(state.main_plot().content(), MainPlotContent::Empty);
        // The inspector covers every shot at the rank-0 index
        let inspection = state.inspection().expect("inspection");
        assert_eq!(inspection.index, DataPointIndex::zeros(0));
        assert_eq!(inspection.summary.count, 12);
    }

    #[test]
    fn test_set_axes_extracts_and_resets_index() {
        let mut state = loaded();
        let redraw = state.set_axes(AxisChoice::x(0)).expect("axes");
        assert_eq!(redraw, Redraw::ALL);
        assert_eq!(state.extracted().expect("plot").shape(), &[3]);
        assert_eq!(state.main_plot().active(), Some(PlotKind::Curve));
        assert_eq!(state.index(), Some(&DataPointIndex::from([0])));

        state.select_point(DataPointIndex::from([2])).expect("point");
        state.set_axes(AxisChoice::xy(0, 1).expect("xy")).expect("axes");
        // Rank changed, so the index falls back to zeros of the new rank
        assert_eq!(state.index(), Some(&DataPointIndex::from([0, 0])));
        assert_eq!(state.main_plot().active(), Some(PlotKind::Image));
    }

    #[test]
    fn test_valid_index_survives_axis_change() {
        let mut state = loaded();
        state.set_axes(AxisChoice::x(0)).expect("axes");
        state.select_point(DataPointIndex::from([1])).expect("point");
        state.set_data_type(DataType::Total).expect("data type");
        assert_eq!(state.index(), Some(&DataPointIndex::from([1])));
        // Axis 1 has only two values
        state.set_axes(AxisChoice::x(1)).expect("axes");
        assert_eq!(state.index(), Some(&DataPointIndex::from([1])));
    }

    #[test]
    fn test_invalid_axes_leave_state_untouched() {
        let mut state = loaded();
        state.set_axes(AxisChoice::x(0)).expect("axes");
        assert!(matches!(
            state.set_axes(AxisChoice::x(5)),
            Err(ViewerError::Scan(ScanError::AxisOutOfRange { .. }))
        ));
        assert_eq!(state.axes(), &AxisChoice::x(0));
        assert!(matches!(
            state.set_axes_by_name(&["missing"]),
            Err(ViewerError::Scan(ScanError::UnknownParameter { .. }))
        ));
        assert_eq!(state.extracted().expect("plot").shape(), &[3]);
    }

    #[test]
    fn test_set_axes_without_dataset() {
        let mut state = SelectionState::default();
        assert!(matches!(
            state.set_axes(AxisChoice::x(0)),
            Err(ViewerError::NoDataset { .. })
        ));
    }

    #[test]
    fn test_set_axes_without_parameters() {
        let mut state = SelectionState::default();
        state
            .replace_dataset(Dataset::empty(Vec::new()))
            .expect("empty dataset");
        assert_eq!(
            state.set_axes(AxisChoice::x(0)),
            Err(ViewerError::NoAvailableAxis)
        );
    }

    #[test]
    fn test_data_type_changes_main_plot_only() {
        let mut state = loaded();
        state.set_axes(AxisChoice::x(0)).expect("axes");
        let before = state.inspection().expect("inspection").summary;
        let redraw = state.set_data_type(DataType::Total).expect("data type");
        assert!(redraw.main_plot);
        // t = 0 holds the values 0, 1, 1, 2
        assert_eq!(state.extracted().expect("plot").data[[0]], 4.0);
        assert_eq!(state.inspection().expect("inspection").summary, before);
        assert_eq!(state.set_data_type(DataType::Total), Ok(Redraw::NONE));
    }

    #[test]
    fn test_threshold_recomputes_selected_point() {
        let mut state = loaded();
        state.set_axes(AxisChoice::x(0)).expect("axes");
        state.select_point(DataPointIndex::from([2])).expect("point");
        // t = 2 holds the values 4, 5, 5, 6
        let redraw = state.set_threshold(4).expect("threshold");
        assert_eq!(redraw, Redraw::ALL);
        let inspection = state.inspection().expect("inspection");
        assert_eq!(inspection.index, DataPointIndex::from([2]));
        assert_eq!(inspection.summary.p1, 0.75);
        assert_eq!(state.extracted().expect("plot").data[[2]], 0.75);
        assert_eq!(state.histogram().threshold_line(), 4.5);
    }

    #[test]
    fn test_threshold_leaves_non_p1_plot_alone() {
        let mut state = loaded();
        state.set_axes(AxisChoice::x(0)).expect("axes");
        state.set_data_type(DataType::Average).expect("data type");
        let before = state.extracted().cloned();
        let redraw = state.set_threshold(3).expect("threshold");
        assert!(!redraw.main_plot);
        assert!(redraw.inspector);
        assert_eq!(state.extracted().cloned(), before);
    }

    #[test]
    fn test_click_selects_point() {
        let mut state = loaded();
        state.set_view_box(
            PlotKind::Curve,
            ViewBox::new()
                .scene(Rect::new(0.0, 0.0, 200.0, 100.0))
                .view(Rect::new(0.0, 0.0, 2.0, 1.0))
                .build()
                .expect("view box"),
        );
        state.set_axes(AxisChoice::x(0)).expect("axes");
        // P1 at threshold 0 is 1.0 for t = 1, drawn at scene (100, 0)
        let redraw = state
            .click(PlotKind::Curve, Point::new(102.0, 5.0))
            .expect("click");
        assert!(redraw.inspector);
        assert_eq!(state.index(), Some(&DataPointIndex::from([1])));

        let redraw = state
            .click(PlotKind::Curve, Point::new(100.0, 90.0))
            .expect("click");
        assert!(redraw.is_none());
        assert_eq!(state.index(), Some(&DataPointIndex::from([1])));
    }

    #[test]
    fn test_select_point_rejects_wrong_rank() {
        let mut state = loaded();
        state.set_axes(AxisChoice::x(0)).expect("axes");
        assert!(matches!(
            state.select_point(DataPointIndex::from([0, 0])),
            Err(ViewerError::Scan(ScanError::ShapeMismatch { .. }))
        ));
        assert_eq!(state.index(), Some(&DataPointIndex::from([0])));
    }
}

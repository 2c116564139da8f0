use crate::axis::AxisInfo;
use crate::dataset::MeasuredValue;
use crate::reduce::{self, DataType};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The raw measured values that fall on one data point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSample {
    pub values: Vec<MeasuredValue>,
}

/// The three per-point scalars shown by the point inspector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSummary {
    /// Number of shots at the point
    pub count: usize,
    pub total: f64,
    pub average: f64,
    /// Fraction of shots above the threshold
    pub p1: f64,
}

impl PointSummary {
    /// Scalar for one data type
    pub fn value(&self, data_type: DataType) -> f64 {
        match data_type {
            DataType::Total => self.total,
            DataType::Average => self.average,
            DataType::P1 => self.p1,
        }
    }
}

/// Count of shots per distinct measured value, in ascending value order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    pub counts: BTreeMap<MeasuredValue, usize>,
}

/// Name of the value axis of a histogram
pub const HISTOGRAM_AXIS_NAME: &str = "value";

impl Histogram {
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of shots counted
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Bar data for a 1-D viewer: bar heights plus the matching value axis
    pub fn to_bars(&self) -> (Array1<f64>, AxisInfo) {
        let heights: Array1<f64> = self.counts.values().map(|&count| count as f64).collect();
        let positions = self.counts.keys().map(|&value| value as f64).collect();
        (heights, AxisInfo::new(HISTOGRAM_AXIS_NAME, positions, None))
    }
}

impl PointSample {
    pub fn new(values: Vec<MeasuredValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum, mean and P1 at once
    pub fn summary(&self, threshold: MeasuredValue) -> PointSummary {
        PointSummary {
            count: self.values.len(),
            total: reduce::sum(&self.values),
            average: reduce::mean(&self.values),
            p1: reduce::fraction_above(&self.values, threshold),
        }
    }

    pub fn histogram(&self) -> Histogram {
        let mut counts = BTreeMap::new();
        for &value in &self.values {
            *counts.entry(value).or_insert(0) += 1;
        }
        Histogram { counts }
    }
}

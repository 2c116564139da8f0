use crate::error::Result;
use iquip_scan::{
    AxisChoice, DataPointIndex, DataType, Dataset, Histogram, MeasuredValue, PointSample,
    PointSummary, ScanDataPolicy,
};
use serde::Serialize;

/// Everything the point inspector shows about the selected data point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointInspection {
    pub index: DataPointIndex,
    pub summary: PointSummary,
    pub histogram: Histogram,
    /// Position of the threshold marker on the histogram's value axis
    pub threshold_line: f64,
    #[serde(skip)]
    sample: PointSample,
}

impl PointInspection {
    /// Look up the raw shots at `index` and summarise them
    pub fn compute(
        dataset: &Dataset,
        axes: &AxisChoice,
        index: DataPointIndex,
        threshold: MeasuredValue,
    ) -> Result<Self> {
        let sample = ScanDataPolicy::new(dataset).point_sample(axes, &index)?;
        Ok(Self {
            summary: sample.summary(threshold),
            histogram: sample.histogram(),
            threshold_line: threshold_line(threshold),
            index,
            sample,
        })
    }

    /// Recompute the threshold-dependent scalar for the same shots
    pub fn rethreshold(&mut self, threshold: MeasuredValue) {
        self.summary = self.sample.summary(threshold);
        self.threshold_line = threshold_line(threshold);
    }

    pub fn value(&self, data_type: DataType) -> f64 {
        self.summary.value(data_type)
    }

    pub fn sample(&self) -> &PointSample {
        &self.sample
    }
}

fn threshold_line(threshold: MeasuredValue) -> f64 {
    threshold as f64 + 0.5
}

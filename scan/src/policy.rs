//! Group-reduce extraction of a dataset into a dense plot array.
//!
//! Each selected parameter column is *symbolized*: its distinct values are
//! sorted and every record is replaced by the rank of its value. Records that
//! share the same rank on every selected axis form one group, and each group is
//! reduced to one cell of the output array at the coordinate given by those
//! ranks.
//!
//! Grouping uses exact value equality. Scan parameters come from discrete
//! settings repeated verbatim across shots, so no tolerance is applied. The
//! only normalisation is that `-0.0` equals `0.0` and every NaN is one value
//! sorted after all numbers.

use crate::axis::{AxisChoice, AxisInfo};
use crate::dataset::Dataset;
use crate::error::{Result, ScanError};
use crate::index::DataPointIndex;
use crate::reduce::Reducer;
use crate::sample::PointSample;
use itertools::Itertools;
use ndarray::{Array2, ArrayD, ArrayView1, Axis, IxDyn};
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

/// Ranks of the records along each selected axis
#[derive(Debug, Clone, PartialEq)]
pub struct Symbols {
    /// Ascending unique values, one list per selected axis
    pub unique_values: Vec<Vec<f64>>,
    /// `rank x N` matrix: row `k` holds each record's rank on axis `k`
    pub symbols: Array2<usize>,
}

impl Symbols {
    /// Shape of the array these symbols index into
    pub fn shape(&self) -> Vec<usize> {
        self.unique_values.iter().map(Vec::len).collect()
    }

    /// Symbol vector of one record
    pub fn coordinate(&self, row: usize) -> Vec<usize> {
        self.symbols.column(row).to_vec()
    }
}

/// Records sharing one symbol vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub coordinate: Vec<usize>,
    /// Row indices into the dataset, ascending
    pub rows: Vec<usize>,
}

/// Output of [`ScanDataPolicy::extract`]: the reduced array and one axis
/// descriptor per dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extracted {
    pub data: ArrayD<f64>,
    pub axes: Vec<AxisInfo>,
}

impl Extracted {
    pub fn rank(&self) -> usize {
        self.data.ndim()
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }
}

/// Turns a [`Dataset`] into dense arrays for a chosen set of axes
///
/// # Example
///
/// ```rust
/// use iquip_scan::{AxisChoice, Dataset, ParameterSpec, Reduction, ScanDataPolicy};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let rows = vec![vec![1.0, 0.0], vec![0.0, 0.0], vec![1.0, 1.0]];
/// let dataset = Dataset::from_rows(&rows, vec![ParameterSpec::new("p", None)])?;
///
/// let extracted = ScanDataPolicy::new(&dataset).extract(&AxisChoice::x(0), &Reduction::Mean)?;
/// assert_eq!(extracted.axes[0].values, vec![0.0, 1.0]);
/// assert_eq!(extracted.data.as_slice(), Some(&[0.5, 1.0][..]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScanDataPolicy<'a> {
    dataset: &'a Dataset,
}

impl<'a> ScanDataPolicy<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Rank every record along each selected axis
    ///
    /// # Errors
    /// `ScanError::AxisOutOfRange` if an axis refers to a missing column.
    pub fn symbolize(&self, axes: &AxisChoice) -> Result<Symbols> {
        axes.check_against(self.dataset.n_parameters())?;

        let n_records = self.dataset.len();
        let mut unique_values = Vec::with_capacity(axes.rank());
        let mut symbols = Array2::<usize>::zeros((axes.rank(), n_records));

        for (k, &index) in axes.indices().iter().enumerate() {
            let column = self.dataset.parameter_column(index)?;
            let (unique, ranks) = symbolize_column(column);
            symbols
                .index_axis_mut(Axis(0), k)
                .iter_mut()
                .zip(ranks)
                .for_each(|(slot, rank)| *slot = rank);
            unique_values.push(unique);
        }

        Ok(Symbols {
            unique_values,
            symbols,
        })
    }

    /// Partition the records by their symbol vector
    ///
    /// Groups are returned in ascending coordinate order, so the result does
    /// not depend on the order of the rows in the dataset.
    pub fn group(&self, axes: &AxisChoice) -> Result<Vec<Group>> {
        let symbols = self.symbolize(axes)?;
        Ok(group_symbols(&symbols, self.dataset.len()))
    }

    /// Reduce every group into a dense array
    ///
    /// With no axes the result is a rank-0 array holding the reduction of all
    /// measured values. Otherwise dimension `k` has one entry per unique value
    /// of axis `k`, and cells that no record maps to hold
    /// [`Reducer::default_value`].
    pub fn extract<R: Reducer + ?Sized>(&self, axes: &AxisChoice, reducer: &R) -> Result<Extracted> {
        if axes.is_empty() {
            let values = self.dataset.values().to_vec();
            let scalar = reducer.reduce(&values);
            debug!(records = values.len(), "extracted scalar over all records");
            return Ok(Extracted {
                data: ArrayD::from_elem(IxDyn(&[]), scalar),
                axes: Vec::new(),
            });
        }

        let symbols = self.symbolize(axes)?;
        let shape = symbols.shape();
        let mut data = ArrayD::from_elem(IxDyn(&shape), reducer.default_value());

        let groups = group_symbols(&symbols, self.dataset.len());
        for group in &groups {
            let values = self.dataset.values_at(&group.rows);
            data[IxDyn(&group.coordinate)] = reducer.reduce(&values);
        }

        let axis_infos = self.axis_infos(axes, symbols.unique_values)?;
        debug!(
            ?shape,
            groups = groups.len(),
            records = self.dataset.len(),
            "extracted reduced array"
        );
        Ok(Extracted {
            data,
            axes: axis_infos,
        })
    }

    /// Number of records in each cell of the array `extract` would produce
    pub fn cell_counts(&self, axes: &AxisChoice) -> Result<ArrayD<usize>> {
        if axes.is_empty() {
            return Ok(ArrayD::from_elem(IxDyn(&[]), self.dataset.len()));
        }
        let symbols = self.symbolize(axes)?;
        let mut counts = ArrayD::<usize>::zeros(IxDyn(&symbols.shape()));
        for row in 0..self.dataset.len() {
            counts[IxDyn(&symbols.coordinate(row))] += 1;
        }
        Ok(counts)
    }

    /// Rows of the dataset that fall on one data point
    ///
    /// # Errors
    /// `ScanError::ShapeMismatch` if the index rank differs from the number of
    /// axes or a component is out of range.
    pub fn sample_rows(&self, axes: &AxisChoice, index: &DataPointIndex) -> Result<Vec<usize>> {
        if axes.is_empty() {
            index
                .check(&[])
                .map_err(|e| e.with_context("sample lookup"))?;
            return Ok((0..self.dataset.len()).collect());
        }
        let symbols = self.symbolize(axes)?;
        index
            .check(&symbols.shape())
            .map_err(|e| e.with_context("sample lookup"))?;

        let target = index.as_slice();
        Ok((0..self.dataset.len())
            .filter(|&row| {
                symbols
                    .symbols
                    .column(row)
                    .iter()
                    .zip(target)
                    .all(|(symbol, wanted)| symbol == wanted)
            })
            .collect())
    }

    /// Measured values that fall on one data point
    pub fn point_sample(&self, axes: &AxisChoice, index: &DataPointIndex) -> Result<PointSample> {
        let rows = self.sample_rows(axes, index)?;
        Ok(PointSample::new(self.dataset.values_at(&rows)))
    }

    fn axis_infos(&self, axes: &AxisChoice, unique_values: Vec<Vec<f64>>) -> Result<Vec<AxisInfo>> {
        axes.indices()
            .iter()
            .zip(unique_values)
            .map(|(&index, values)| {
                let spec = self.dataset.spec(index)?;
                Ok(AxisInfo::new(&*spec.name, values, spec.unit.as_deref()))
            })
            .collect()
    }
}

/// Check that an array and its axis descriptors agree
///
/// # Errors
/// `ScanError::ShapeMismatch` if the number of descriptors differs from the
/// array rank, or a descriptor's value count differs from its dimension.
pub fn check_axes(data: &ArrayD<f64>, axes: &[AxisInfo]) -> Result<()> {
    if data.ndim() != axes.len() {
        return Err(ScanError::shape_mismatch(format!(
            "array has rank {} but {} axes were given",
            data.ndim(),
            axes.len()
        )));
    }
    for (&size, info) in data.shape().iter().zip(axes) {
        if size != info.len() {
            return Err(ScanError::shape_mismatch(format!(
                "axis '{}' has {} values, expected {}",
                info.name,
                info.len(),
                size
            )));
        }
    }
    Ok(())
}

fn group_symbols(symbols: &Symbols, n_records: usize) -> Vec<Group> {
    (0..n_records)
        .into_group_map_by(|&row| symbols.coordinate(row))
        .into_iter()
        .map(|(coordinate, rows)| Group { coordinate, rows })
        .sorted_unstable_by(|a, b| a.coordinate.cmp(&b.coordinate))
        .collect()
}

/// Sorted unique values of a column and each record's rank among them
fn symbolize_column(column: ArrayView1<'_, f64>) -> (Vec<f64>, Vec<usize>) {
    let mut unique: Vec<f64> = column.iter().map(|&v| canonical(v)).collect();
    unique.sort_unstable_by(f64::total_cmp);
    unique.dedup_by(|a, b| a.to_bits() == b.to_bits());

    let ranks: FxHashMap<u64, usize> = unique
        .iter()
        .enumerate()
        .map(|(rank, value)| (value.to_bits(), rank))
        .collect();
    let symbols = column
        .iter()
        .map(|&v| ranks[&canonical(v).to_bits()])
        .collect();
    (unique, symbols)
}

/// Collapse `-0.0` onto `0.0` and every NaN payload onto one NaN
fn canonical(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else if value.is_nan() {
        f64::NAN
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::ParameterSpec;
    use crate::reduce::Reduction;
    use ndarray::{arr0, array};

    fn dataset(rows: &[[f64; 3]]) -> Dataset {
        Dataset::from_rows(
            rows,
            vec![
                ParameterSpec::new("t", Some("s")),
                ParameterSpec::new("f", Some("Hz")),
            ],
        )
        .expect("valid rows")
    }

    #[test]
    fn test_symbolize_column() {
        let column = array![0.3, 0.1, 0.3, -0.0, 0.0];
        let (unique, ranks) = symbolize_column(column.view());
        assert_eq!(unique, vec![0.0, 0.1, 0.3]);
        assert_eq!(ranks, vec![2, 1, 2, 0, 0]);
    }

    #[test]
    fn test_symbolize_nan_is_one_value_sorted_last() {
        let column = array![f64::NAN, 1.0, -f64::NAN, 0.5];
        let (unique, ranks) = symbolize_column(column.view());
        assert_eq!(unique.len(), 3);
        assert!(unique[2].is_nan());
        assert_eq!(ranks, vec![2, 1, 2, 0]);
    }

    #[test]
    fn test_symbolize_matrix() {
        let data = dataset(&[[1.0, 0.2, 10.0], [2.0, 0.1, 20.0], [3.0, 0.2, 20.0]]);
        let symbols = ScanDataPolicy::new(&data)
            .symbolize(&AxisChoice::xy(1, 0).expect("axes"))
            .expect("symbolize");
        assert_eq!(symbols.unique_values, vec![vec![10.0, 20.0], vec![0.1, 0.2]]);
        assert_eq!(symbols.symbols, array![[0, 1, 1], [1, 0, 1]]);
        assert_eq!(symbols.shape(), vec![2, 2]);
    }

    #[test]
    fn test_extract_mean_example() {
        let rows = vec![vec![1.0, 0.0], vec![0.0, 0.0], vec![1.0, 1.0]];
        let data = Dataset::from_rows(&rows, vec![ParameterSpec::new("p", None)]).expect("rows");
        let extracted = ScanDataPolicy::new(&data)
            .extract(&AxisChoice::x(0), &Reduction::Mean)
            .expect("extract");
        assert_eq!(extracted.axes, vec![AxisInfo::new("p", vec![0.0, 1.0], None)]);
        assert_eq!(extracted.data, array![0.5, 1.0].into_dyn());
    }

    #[test]
    fn test_extract_without_axes_is_scalar() {
        let data = dataset(&[[4.0, 0.0, 0.0], [6.0, 1.0, 0.0]]);
        let extracted = ScanDataPolicy::new(&data)
            .extract(&AxisChoice::none(), &Reduction::Sum)
            .expect("extract");
        assert_eq!(extracted.rank(), 0);
        assert!(extracted.axes.is_empty());
        assert_eq!(extracted.data, arr0(10.0).into_dyn());
    }

    #[test]
    fn test_extract_2d_fills_missing_cells_with_default() {
        let data = dataset(&[[2.0, 0.0, 1.0], [4.0, 0.0, 1.0], [3.0, 1.0, 2.0]]);
        let axes = AxisChoice::xy(0, 1).expect("axes");
        let extracted = ScanDataPolicy::new(&data)
            .extract(&axes, &Reduction::Mean)
            .expect("extract");
        assert_eq!(extracted.shape(), &[2, 2]);
        assert_eq!(extracted.data, array![[3.0, 0.0], [0.0, 3.0]].into_dyn());
        assert_eq!(extracted.axes[0].unit.as_deref(), Some("s"));
        assert_eq!(extracted.axes[1].name, "f");
    }

    #[test]
    fn test_extract_out_of_range_axis() {
        let data = dataset(&[[2.0, 0.0, 1.0]]);
        let result = ScanDataPolicy::new(&data).extract(&AxisChoice::x(2), &Reduction::Sum);
        assert_eq!(
            result,
            Err(ScanError::AxisOutOfRange {
                index: 2,
                parameters: 2
            })
        );
    }

    #[test]
    fn test_extract_empty_dataset() {
        let data = Dataset::empty(vec![ParameterSpec::new("t", None)]);
        let policy = ScanDataPolicy::new(&data);
        let extracted = policy
            .extract(&AxisChoice::x(0), &Reduction::Mean)
            .expect("extract");
        assert_eq!(extracted.shape(), &[0]);
        let scalar = policy
            .extract(&AxisChoice::none(), &Reduction::Mean)
            .expect("extract");
        assert_eq!(scalar.data, arr0(0.0).into_dyn());
    }

    #[test]
    fn test_group_is_sorted_by_coordinate() {
        let data = dataset(&[[0.0, 1.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let groups = ScanDataPolicy::new(&data)
            .group(&AxisChoice::x(0))
            .expect("group");
        assert_eq!(
            groups,
            vec![
                Group {
                    coordinate: vec![0],
                    rows: vec![1]
                },
                Group {
                    coordinate: vec![1],
                    rows: vec![0, 2]
                },
            ]
        );
    }

    #[test]
    fn test_point_sample() {
        let data = dataset(&[[5.0, 0.0, 1.0], [7.0, 1.0, 1.0], [9.0, 0.0, 1.0]]);
        let policy = ScanDataPolicy::new(&data);
        let axes = AxisChoice::x(0);
        let sample = policy
            .point_sample(&axes, &DataPointIndex::from([0]))
            .expect("sample");
        assert_eq!(sample.values, vec![5, 9]);

        let error = policy
            .point_sample(&axes, &DataPointIndex::from([2]))
            .expect_err("out of range");
        assert!(error.to_string().contains("sample lookup"));

        let all = policy
            .point_sample(&AxisChoice::none(), &DataPointIndex::zeros(0))
            .expect("all rows");
        assert_eq!(all.values, vec![5, 7, 9]);
    }

    #[test]
    fn test_cell_counts() {
        let data = dataset(&[[5.0, 0.0, 1.0], [7.0, 1.0, 1.0], [9.0, 0.0, 2.0]]);
        let counts = ScanDataPolicy::new(&data)
            .cell_counts(&AxisChoice::xy(0, 1).expect("axes"))
            .expect("counts");
        assert_eq!(counts, array![[1, 1], [1, 0]].into_dyn());
    }

    #[test]
    fn test_check_axes() {
        let data = array![[1.0, 2.0, 3.0]].into_dyn();
        let good = vec![
            AxisInfo::new("y", vec![0.0], None),
            AxisInfo::new("x", vec![0.0, 1.0, 2.0], None),
        ];
        assert!(check_axes(&data, &good).is_ok());
        assert!(check_axes(&data, &good[..1]).is_err());
        let wrong_size = vec![good[0].clone(), AxisInfo::new("x", vec![0.0], None)];
        assert!(check_axes(&data, &wrong_size).is_err());
    }
}

use crate::error::{Result, ScanError};
use crate::parameter::ParameterSpec;
use itertools::Itertools;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// The measured quantity of one shot, e.g. a photon count
pub type MeasuredValue = i64;
/// The value of one scan parameter for one shot
pub type ParameterValue = f64;

/// One measured shot: the integer measurement and the scan-parameter values
/// that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub value: MeasuredValue,
    pub parameters: Vec<ParameterValue>,
}

/// Wire form of a dataset as it arrives from the result server
///
/// Each row is `[value, p1, ..., pP]`. `units` may be omitted, in which case
/// no parameter has a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSnapshot {
    pub rows: Vec<Vec<f64>>,
    pub names: Vec<String>,
    #[serde(default)]
    pub units: Vec<Option<String>>,
}

/// An immutable table of shots sharing the same scan parameters
///
/// The table is stored column-wise: measured values in one `i64` column and
/// the scan parameters in an `N x P` matrix. A dataset is never patched in
/// place; a re-fetch builds a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    values: Array1<MeasuredValue>,
    parameters: Array2<ParameterValue>,
    specs: Vec<ParameterSpec>,
}

impl Dataset {
    /// Create a dataset from its columns
    ///
    /// # Errors
    /// Returns `ScanError::ShapeMismatch` if the number of values differs from
    /// the number of parameter rows, or if the number of parameter columns
    /// differs from the number of specs. Returns `ScanError::Configuration`
    /// if two parameters share a name, since axes are looked up by name.
    pub fn new(
        values: Array1<MeasuredValue>,
        parameters: Array2<ParameterValue>,
        specs: Vec<ParameterSpec>,
    ) -> Result<Self> {
        if values.len() != parameters.nrows() {
            return Err(ScanError::shape_mismatch(format!(
                "{} measured values but {} parameter rows",
                values.len(),
                parameters.nrows()
            )));
        }
        if parameters.ncols() != specs.len() {
            return Err(ScanError::shape_mismatch(format!(
                "{} parameter columns but {} parameter specs",
                parameters.ncols(),
                specs.len()
            )));
        }
        if let Some(name) = specs.iter().map(|spec| &*spec.name).duplicates().next() {
            return Err(ScanError::configuration(format!(
                "parameter '{}' appears more than once",
                name
            )));
        }
        Ok(Self {
            values,
            parameters,
            specs,
        })
    }

    /// Create an empty dataset with the given parameter columns
    pub fn empty(specs: Vec<ParameterSpec>) -> Self {
        let n_parameters = specs.len();
        Self {
            values: Array1::zeros(0),
            parameters: Array2::zeros((0, n_parameters)),
            specs,
        }
    }

    /// Create a dataset from raw rows of `[value, p1, ..., pP]`
    ///
    /// Column 0 must hold a finite, integral measurement.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R], specs: Vec<ParameterSpec>) -> Result<Self> {
        let n_parameters = specs.len();
        let width = n_parameters + 1;
        let mut values = Vec::with_capacity(rows.len());
        let mut parameters = Vec::with_capacity(rows.len() * n_parameters);

        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(ScanError::invalid_record(
                    row_index,
                    format!("expected {} columns, got {}", width, row.len()),
                ));
            }
            values.push(measured_value(row_index, row[0])?);
            parameters.extend_from_slice(&row[1..]);
        }

        let parameters = Array2::from_shape_vec((rows.len(), n_parameters), parameters)
            .map_err(|e| ScanError::shape_mismatch(e.to_string()))?;
        Self::new(Array1::from(values), parameters, specs)
    }

    /// Create a dataset from records that all carry `specs.len()` parameters
    pub fn from_records(records: &[RawRecord], specs: Vec<ParameterSpec>) -> Result<Self> {
        let n_parameters = specs.len();
        let mut parameters = Vec::with_capacity(records.len() * n_parameters);
        for (row, record) in records.iter().enumerate() {
            if record.parameters.len() != n_parameters {
                return Err(ScanError::invalid_record(
                    row,
                    format!(
                        "expected {} parameters, got {}",
                        n_parameters,
                        record.parameters.len()
                    ),
                ));
            }
            parameters.extend_from_slice(&record.parameters);
        }
        let values: Array1<MeasuredValue> = records.iter().map(|r| r.value).collect();
        let parameters = Array2::from_shape_vec((records.len(), n_parameters), parameters)
            .map_err(|e| ScanError::shape_mismatch(e.to_string()))?;
        Self::new(values, parameters, specs)
    }

    /// Number of records (shots)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of scan-parameter columns
    pub fn n_parameters(&self) -> usize {
        self.specs.len()
    }

    pub fn specs(&self) -> &[ParameterSpec] {
        &self.specs
    }

    /// Get the spec of a parameter column
    pub fn spec(&self, index: usize) -> Result<&ParameterSpec> {
        self.specs.get(index).ok_or(ScanError::AxisOutOfRange {
            index,
            parameters: self.specs.len(),
        })
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|spec| &*spec.name)
    }

    /// Find the column index of a parameter by name
    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|spec| &*spec.name == name)
    }

    /// All measured values in row order
    pub fn values(&self) -> ArrayView1<'_, MeasuredValue> {
        self.values.view()
    }

    /// The values of one parameter column in row order
    pub fn parameter_column(&self, index: usize) -> Result<ArrayView1<'_, ParameterValue>> {
        if index >= self.n_parameters() {
            return Err(ScanError::AxisOutOfRange {
                index,
                parameters: self.n_parameters(),
            });
        }
        Ok(self.parameters.column(index))
    }

    /// Reassemble one row as a record
    pub fn record(&self, row: usize) -> Option<RawRecord> {
        if row >= self.len() {
            return None;
        }
        Some(RawRecord {
            value: self.values[row],
            parameters: self.parameters.index_axis(Axis(0), row).to_vec(),
        })
    }

    pub fn records(&self) -> impl Iterator<Item = RawRecord> + '_ {
        (0..self.len()).filter_map(|row| self.record(row))
    }

    /// Collect the measured values of the given rows, in the given order
    pub fn values_at(&self, rows: &[usize]) -> Vec<MeasuredValue> {
        rows.iter().map(|&row| self.values[row]).collect()
    }
}

impl TryFrom<DatasetSnapshot> for Dataset {
    type Error = ScanError;

    fn try_from(snapshot: DatasetSnapshot) -> Result<Self> {
        let units = if snapshot.units.is_empty() {
            vec![None; snapshot.names.len()]
        } else {
            snapshot.units
        };
        let specs = ParameterSpec::from_names_and_units(&snapshot.names, &units).ok_or_else(
            || {
                ScanError::shape_mismatch(format!(
                    "{} parameter names but {} units",
                    snapshot.names.len(),
                    units.len()
                ))
            },
        )?;
        Self::from_rows(&snapshot.rows, specs)
    }
}

fn measured_value(row: usize, raw: f64) -> Result<MeasuredValue> {
    if !raw.is_finite() {
        return Err(ScanError::invalid_record(
            row,
            format!("measured value {} is not finite", raw),
        ));
    }
    if raw.fract() != 0.0 {
        return Err(ScanError::invalid_record(
            row,
            format!("measured value {} is not an integer", raw),
        ));
    }
    if raw < i64::MIN as f64 || raw >= i64::MAX as f64 {
        return Err(ScanError::invalid_record(
            row,
            format!("measured value {} does not fit in 64 bits", raw),
        ));
    }
    Ok(raw as MeasuredValue)
}

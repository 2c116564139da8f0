use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};

/// Maximum number of parameters that can be selected as plot axes
pub const MAX_AXES: usize = 2;

/// Descriptor of one dimension of a reduced array
///
/// `values` holds the ascending unique parameter values observed for the axis,
/// one per array index along that dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisInfo {
    pub name: String,
    pub values: Vec<f64>,
    pub unit: Option<String>,
}

impl AxisInfo {
    pub fn new(name: impl Into<String>, values: Vec<f64>, unit: Option<&str>) -> Self {
        Self {
            name: name.into(),
            values,
            unit: unit.map(str::to_string),
        }
    }

    /// Number of array cells along this axis
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The parameter columns selected as plot axes, X first
///
/// An `AxisChoice` holds at most [`MAX_AXES`] distinct parameter indices.
/// Because the indices are stored as an ordered list, a Y axis can only exist
/// once an X axis is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct AxisChoice(Vec<usize>);

impl AxisChoice {
    /// Validate and create an axis choice
    ///
    /// # Errors
    /// `ScanError::TooManyAxes` for more than two indices and
    /// `ScanError::DuplicateAxis` when an index repeats. Range checks against
    /// a dataset happen in [`AxisChoice::check_against`].
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Result<Self> {
        let indices: Vec<usize> = indices.into_iter().collect();
        if indices.len() > MAX_AXES {
            return Err(ScanError::TooManyAxes {
                count: indices.len(),
                max: MAX_AXES,
            });
        }
        for (position, index) in indices.iter().enumerate() {
            if indices[..position].contains(index) {
                return Err(ScanError::DuplicateAxis { index: *index });
            }
        }
        Ok(Self(indices))
    }

    /// No axes selected: extraction reduces the whole dataset to a scalar
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn x(index: usize) -> Self {
        Self(vec![index])
    }

    /// X and Y axes; fails if both are the same parameter
    pub fn xy(x: usize, y: usize) -> Result<Self> {
        Self::new([x, y])
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of selected axes, which is also the rank of the reduced array
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn x_axis(&self) -> Option<usize> {
        self.0.first().copied()
    }

    pub fn y_axis(&self) -> Option<usize> {
        self.0.get(1).copied()
    }

    /// Check every index against the number of parameter columns
    pub fn check_against(&self, n_parameters: usize) -> Result<()> {
        match self.0.iter().find(|&&index| index >= n_parameters) {
            Some(&index) => Err(ScanError::AxisOutOfRange {
                index,
                parameters: n_parameters,
            }),
            None => Ok(()),
        }
    }
}

impl TryFrom<Vec<usize>> for AxisChoice {
    type Error = ScanError;

    fn try_from(indices: Vec<usize>) -> Result<Self> {
        Self::new(indices)
    }
}

impl From<AxisChoice> for Vec<usize> {
    fn from(choice: AxisChoice) -> Self {
        choice.0
    }
}

use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinates of one cell of a reduced array, one component per axis
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DataPointIndex(Vec<usize>);

impl DataPointIndex {
    pub fn new(components: impl Into<Vec<usize>>) -> Self {
        Self(components.into())
    }

    /// The all-zero index of the given rank
    pub fn zeros(rank: usize) -> Self {
        Self(vec![0; rank])
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Check that the index addresses a cell of an array with `shape`
    ///
    /// # Errors
    /// `ScanError::ShapeMismatch` if the rank differs or a component is out
    /// of range for its dimension.
    pub fn check(&self, shape: &[usize]) -> Result<()> {
        if self.rank() != shape.len() {
            return Err(ScanError::shape_mismatch(format!(
                "index {} has rank {}, array has rank {}",
                self,
                self.rank(),
                shape.len()
            )));
        }
        for (axis, (&component, &size)) in self.0.iter().zip(shape).enumerate() {
            if component >= size {
                return Err(ScanError::shape_mismatch(format!(
                    "index {} is out of range along axis {} of size {}",
                    self, axis, size
                )));
            }
        }
        Ok(())
    }

    pub fn is_within(&self, shape: &[usize]) -> bool {
        self.check(shape).is_ok()
    }

    /// Keep this index if it is valid for `shape`, otherwise fall back to the
    /// all-zero index of matching rank
    ///
    /// Returns `None` when `shape` has an empty dimension, since no cell
    /// exists to point at.
    pub fn revalidated(self, shape: &[usize]) -> Option<Self> {
        if self.is_within(shape) {
            return Some(self);
        }
        let zeros = Self::zeros(shape.len());
        zeros.is_within(shape).then_some(zeros)
    }
}

impl From<Vec<usize>> for DataPointIndex {
    fn from(components: Vec<usize>) -> Self {
        Self(components)
    }
}

impl<const N: usize> From<[usize; N]> for DataPointIndex {
    fn from(components: [usize; N]) -> Self {
        Self(components.to_vec())
    }
}

impl fmt::Display for DataPointIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", component)?;
        }
        write!(f, ")")
    }
}

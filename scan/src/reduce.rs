//! Reduction catalog: the functions that collapse the measured values of one
//! group of shots into a single plotted number.
//!
//! [`DataType`] is the user-facing tag (total, average, P1) and [`Reduction`]
//! is the strategy it selects. Anything implementing [`Reducer`] can be handed
//! to [`ScanDataPolicy::extract`](crate::ScanDataPolicy::extract), including
//! plain closures.

use crate::dataset::MeasuredValue;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// A function from the measured values of one group to a scalar
pub trait Reducer {
    /// Reduce the values of one group
    fn reduce(&self, values: &[MeasuredValue]) -> f64;

    /// Value of a cell that no record maps to
    fn default_value(&self) -> f64 {
        0.0
    }
}

impl<F> Reducer for F
where
    F: Fn(&[MeasuredValue]) -> f64,
{
    fn reduce(&self, values: &[MeasuredValue]) -> f64 {
        self(values)
    }
}

/// Type of each data point shown on the main plot
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Sum of the measured values
    Total,
    /// Arithmetic mean of the measured values
    Average,
    /// Fraction of shots whose value exceeds the threshold
    #[default]
    #[strum(serialize = "p1")]
    P1,
}

impl DataType {
    /// The reduction this data type selects
    ///
    /// `threshold` only matters for [`DataType::P1`].
    pub fn reduction(self, threshold: MeasuredValue) -> Reduction {
        match self {
            DataType::Total => Reduction::Sum,
            DataType::Average => Reduction::Mean,
            DataType::P1 => Reduction::FractionAbove { threshold },
        }
    }
}

/// Strategy for reducing a group of measured values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reduction {
    Sum,
    Mean,
    /// "P1": share of values strictly greater than `threshold`
    FractionAbove { threshold: MeasuredValue },
}

impl Reducer for Reduction {
    fn reduce(&self, values: &[MeasuredValue]) -> f64 {
        match *self {
            Reduction::Sum => sum(values),
            Reduction::Mean => mean(values),
            Reduction::FractionAbove { threshold } => fraction_above(values, threshold),
        }
    }
}

/// Total of the values; `i128` accumulation keeps large counts exact
pub fn sum(values: &[MeasuredValue]) -> f64 {
    values.iter().map(|&v| v as i128).sum::<i128>() as f64
}

/// Arithmetic mean, 0 for an empty group
pub fn mean(values: &[MeasuredValue]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sum(values) / values.len() as f64
}

/// Fraction of values strictly above `threshold`, 0 for an empty group
pub fn fraction_above(values: &[MeasuredValue], threshold: MeasuredValue) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let above = values.iter().filter(|&&v| v > threshold).count();
    above as f64 / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_sum_and_mean() {
        let values = [1, 0, 3, 4];
        assert_eq!(Reduction::Sum.reduce(&values), 8.0);
        assert_eq!(Reduction::Mean.reduce(&values), 2.0);
    }

    #[test]
    fn test_fraction_above_is_strict() {
        let values = [0, 1, 2, 2, 5];
        let p1 = Reduction::FractionAbove { threshold: 2 };
        assert_eq!(p1.reduce(&values), 0.2);
        let p1 = Reduction::FractionAbove { threshold: 1 };
        assert_eq!(p1.reduce(&values), 0.6);
    }

    #[test]
    fn test_empty_groups_reduce_to_zero() {
        for data_type in DataType::iter() {
            let value = data_type.reduction(0).reduce(&[]);
            assert_eq!(value, 0.0, "{data_type} of an empty group");
        }
    }

    #[test]
    fn test_data_type_parsing() {
        assert_eq!(DataType::from_str("P1"), Ok(DataType::P1));
        assert_eq!(DataType::from_str("average"), Ok(DataType::Average));
        assert_eq!(DataType::Total.to_string(), "total");
        assert_eq!(DataType::default(), DataType::P1);
    }

    #[test]
    fn test_closure_reducer() {
        let max = |values: &[MeasuredValue]| values.iter().copied().max().unwrap_or(0) as f64;
        assert_eq!(max.reduce(&[3, 9, 1]), 9.0);
        assert_eq!(max.default_value(), 0.0);
    }
}

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type ParameterName = Arc<str>;
pub type UnitName = Arc<str>;

/// Name and unit of one scan-parameter column
///
/// Parameter specs are positionally aligned with the parameter columns of a
/// [`Dataset`](crate::Dataset): spec `i` describes column `i + 1` of the raw
/// table (column 0 is the measured value).
///
/// # Example
///
/// ```rust
/// use iquip_scan::ParameterSpecBuilder;
/// use std::sync::Arc;
///
/// let spec = ParameterSpecBuilder::default()
///     .name("detuning")
///     .unit(Some(Arc::<str>::from("Hz")))
///     .build()
///     .expect("valid spec");
/// assert_eq!(spec.unit.as_deref(), Some("Hz"));
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Builder, PartialEq, Eq, Hash)]
#[builder(setter(into))]
pub struct ParameterSpec {
    /// The name of the scan parameter, e.g. "t" or "detuning"
    pub name: ParameterName,
    /// The unit of the values without any prefix, e.g. "s" rather than "ms"
    #[builder(default)]
    #[serde(default)]
    pub unit: Option<UnitName>,
}

impl ParameterSpec {
    /// Creates a new `ParameterSpec` with the given name and optional unit
    #[must_use]
    pub fn new(name: impl Into<ParameterName>, unit: Option<&str>) -> Self {
        Self {
            name: name.into(),
            unit: unit.map(Arc::from),
        }
    }

    /// Zips parallel name and unit lists into parameter specs
    ///
    /// Returns `None` when the lists have different lengths.
    pub fn from_names_and_units<N, U>(names: &[N], units: &[Option<U>]) -> Option<Vec<Self>>
    where
        N: AsRef<str>,
        U: AsRef<str>,
    {
        if names.len() != units.len() {
            return None;
        }
        Some(
            names
                .iter()
                .zip(units)
                .map(|(name, unit)| Self::new(name.as_ref(), unit.as_ref().map(|u| u.as_ref())))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_unit_to_none() {
        let spec = ParameterSpecBuilder::default()
            .name("shot")
            .build()
            .expect("name is set");
        assert_eq!(&*spec.name, "shot");
        assert!(spec.unit.is_none());
    }

    #[test]
    fn test_from_names_and_units() {
        let specs = ParameterSpec::from_names_and_units(&["t", "f"], &[Some("s"), None])
            .expect("same length");
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].unit.as_deref(), Some("s"));
        assert_eq!(specs[1].unit, None);

        assert!(ParameterSpec::from_names_and_units(&["t"], &[None::<&str>, None]).is_none());
    }
}

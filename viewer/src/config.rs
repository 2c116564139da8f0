use derive_builder::Builder;
use iquip_plots::DEFAULT_CLICK_TOLERANCE;
use iquip_scan::{DataType, MeasuredValue};
use serde::{Deserialize, Serialize};

/// Initial settings of a [`SelectionState`](crate::SelectionState)
///
/// # Example
///
/// ```rust
/// use iquip_scan::DataType;
/// use iquip_viewer::ViewerConfig;
///
/// let config = ViewerConfig::new()
///     .data_type(DataType::Average)
///     .threshold(3)
///     .build()
///     .expect("all fields have defaults");
/// assert_eq!(config.click_tolerance, 20.0);
/// ```
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct ViewerConfig {
    /// Scene distance within which a curve click selects a sample
    #[builder(default = "DEFAULT_CLICK_TOLERANCE")]
    pub click_tolerance: f64,

    /// Reduction the main plot starts with
    pub data_type: DataType,

    /// Values strictly above the threshold count towards P1
    pub threshold: MeasuredValue,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            click_tolerance: DEFAULT_CLICK_TOLERANCE,
            data_type: DataType::default(),
            threshold: 0,
        }
    }
}

impl ViewerConfig {
    /// Create a new builder for ViewerConfig
    pub fn new() -> ViewerConfigBuilder {
        ViewerConfigBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.click_tolerance, 20.0);
        assert_eq!(config.data_type, DataType::P1);
        assert_eq!(config.threshold, 0);
        assert_eq!(ViewerConfig::new().build().expect("defaults"), config);
    }

    #[test]
    fn test_partial_json() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{"data_type": "average"}"#).expect("json");
        assert_eq!(config.data_type, DataType::Average);
        assert_eq!(config.click_tolerance, 20.0);
    }
}

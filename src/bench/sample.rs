//! Measurement samples

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Unit tag for elapsed-time samples.
pub const UNIT_SECONDS: &str = "seconds";

/// A single named, unit-tagged measurement produced by a benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Metric name.
    pub metric: String,
    /// Measured value.
    pub value: f64,
    /// Unit the value is expressed in.
    pub unit: String,
    /// Free-form labels; empty for this benchmark.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Sample {
    /// An elapsed-time sample with no metadata.
    pub fn seconds(metric: impl Into<String>, value: f64) -> Self {
        Self {
            metric: metric.into(),
            value,
            unit: UNIT_SECONDS.to_string(),
            metadata: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_sample_shape() {
        let sample = Sample::seconds("BigQuery index search", 1.25);
        assert_eq!(sample.metric, "BigQuery index search");
        assert_eq!(sample.value, 1.25);
        assert_eq!(sample.unit, "seconds");
        assert!(sample.metadata.is_empty());
    }
}

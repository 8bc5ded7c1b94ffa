use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Computed metrics for one domain, keyed by output metric name
pub type MetricMap = BTreeMap<String, MetricValue>;

/// Health vocabulary shared by the `Health` and `HealthState` attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    Ok,
    Warning,
    Critical,
    Failed,
    Overloaded,
    Unavailable,
}

impl HealthStatus {
    /// Translates a raw bean value by substring containment.
    ///
    /// Anything unrecognized, including an empty value, is `Unavailable`.
    pub fn from_raw(raw: &str) -> Self {
        const VOCABULARY: [(&str, HealthStatus); 5] = [
            ("HEALTH_OK", HealthStatus::Ok),
            ("HEALTH_WARN", HealthStatus::Warning),
            ("HEALTH_CRITICAL", HealthStatus::Critical),
            ("HEALTH_FAILED", HealthStatus::Failed),
            ("HEALTH_OVERLOADED", HealthStatus::Overloaded),
        ];
        VOCABULARY
            .iter()
            .find(|(marker, _)| raw.contains(marker))
            .map(|(_, status)| *status)
            .unwrap_or(HealthStatus::Unavailable)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Ok => "Ok",
            HealthStatus::Warning => "Warning",
            HealthStatus::Critical => "Critical",
            HealthStatus::Failed => "Failed",
            HealthStatus::Overloaded => "Overloaded",
            HealthStatus::Unavailable => "Unavailable",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A computed metric value
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Integer(i64),
    /// Always rounded to two decimal places
    Float(f64),
    Text(String),
    Status(HealthStatus),
}

impl MetricValue {
    /// Numeric view of the value; text and status values have none
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Integer(i) => Some(*i as f64),
            MetricValue::Float(f) => Some(*f),
            MetricValue::Text(_) | MetricValue::Status(_) => None,
        }
    }

    /// Builds a float value rounded to two decimal places.
    pub fn rounded(value: f64) -> Self {
        MetricValue::Float(round2(value))
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Integer(i) => serializer.serialize_i64(*i),
            MetricValue::Float(f) => serializer.serialize_f64(*f),
            MetricValue::Text(s) => serializer.serialize_str(s),
            MetricValue::Status(status) => serializer.serialize_str(status.as_str()),
        }
    }
}

/// Round half away from zero to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

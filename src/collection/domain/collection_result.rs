use super::metric_value::MetricMap;
use super::target::DomainIdentity;
use serde::{Serialize, Serializer};
use std::fmt;

/// Outcome of one target's collection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionStatus {
    Up,
    Down,
    Blackout,
    Excluded,
    ConfigError,
}

impl CollectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionStatus::Up => "Up",
            CollectionStatus::Down => "Down",
            CollectionStatus::Blackout => "Blackout",
            CollectionStatus::Excluded => "Excluded",
            CollectionStatus::ConfigError => "Config Error",
        }
    }

    /// Down and Config Error are the statuses that need operator attention
    pub fn is_failure(&self) -> bool {
        matches!(self, CollectionStatus::Down | CollectionStatus::ConfigError)
    }
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CollectionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Keys the result record uses for itself; metric names may not reuse them
pub const RESERVED_RESULT_KEYS: &[&str] = &[
    "domain_name",
    "domain_type",
    "purpose",
    "app",
    "env",
    "appenv",
    "serverName",
    "host",
    "tools_version",
    "weblogic_version",
    "status",
    "errorMsg",
];

/// Metrics (or the reason there are none) for one target, tagged with its
/// inventory identity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionResult {
    #[serde(flatten)]
    pub metrics: MetricMap,
    #[serde(flatten)]
    pub identity: DomainIdentity,
    pub status: CollectionStatus,
    #[serde(rename = "errorMsg", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl CollectionResult {
    pub fn new(identity: DomainIdentity, status: CollectionStatus, metrics: MetricMap) -> Self {
        Self {
            metrics,
            identity,
            status,
            error_message: None,
        }
    }

    pub fn failed(
        identity: DomainIdentity,
        status: CollectionStatus,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            metrics: MetricMap::new(),
            identity,
            status,
            error_message: Some(error_message.into()),
        }
    }

    pub fn domain_name(&self) -> &str {
        &self.identity.domain_name
    }
}

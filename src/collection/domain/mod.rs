pub mod collection_result;
pub mod metric_definition;
pub mod metric_value;
pub mod policy;
pub mod raw_sample;
pub mod target;

pub use collection_result::{CollectionResult, CollectionStatus};
pub use metric_definition::{AggregationKind, FilterClause, MetricDefinition};
pub use metric_value::{round2, HealthStatus, MetricMap, MetricValue};
pub use policy::{BlackoutEntry, ExclusionEntry};
pub use raw_sample::RawSample;
pub use target::{Credentials, Domain, DomainIdentity, DomainType};

#[cfg(test)]
pub(crate) use target::sample_domain;

use crate::collection::domain::{Domain, MetricDefinition};
use std::sync::Arc;

/// QueryJob - one target's unit of work for a collection cycle
///
/// Definitions and query strings are shared between every job of the same
/// domain type.
#[derive(Debug, Clone)]
pub struct QueryJob {
    pub id: usize,
    pub domain: Domain,
    pub definitions: Arc<Vec<MetricDefinition>>,
    pub queries: Arc<Vec<String>>,
}

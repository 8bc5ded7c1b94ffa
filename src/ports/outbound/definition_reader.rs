use crate::collection::domain::MetricDefinition;
use crate::shared::error::CollectorError;
use std::path::Path;

/// MetricDefinitionReader port for loading one metric-definition document
///
/// This port abstracts where catalog documents come from so the catalog
/// can be staged from files in production and from memory in tests.
pub trait MetricDefinitionReader: Send + Sync {
    /// Reads and validates every definition in the document
    ///
    /// # Arguments
    /// * `source` - Location of the definition document
    ///
    /// # Returns
    /// The definitions in document order
    ///
    /// # Errors
    /// Returns `CollectorError::Config` if:
    /// - The document cannot be read
    /// - The document is not valid YAML or lacks the `metrics` list
    /// - A record names an unknown aggregation kind or an invalid pattern
    fn read_definitions(&self, source: &Path) -> Result<Vec<MetricDefinition>, CollectorError>;
}

use crate::collection::domain::{BlackoutEntry, Domain, ExclusionEntry};
use crate::shared::error::CollectorError;
use std::path::Path;

/// InventoryReader port for the record files produced by inventory tooling
///
/// Targets, blackouts and exclusions are re-read at the start of every
/// collection cycle.
pub trait InventoryReader: Send + Sync {
    /// Reads the target inventory, one domain per record
    ///
    /// # Errors
    /// Returns `CollectorError::Config` if the file is missing, unreadable,
    /// or holds a record with too few fields
    fn read_targets(&self, source: &Path) -> Result<Vec<Domain>, CollectorError>;

    /// Reads the blackout records
    fn read_blackouts(&self, source: &Path) -> Result<Vec<BlackoutEntry>, CollectorError>;

    /// Reads the exclusion records
    fn read_exclusions(&self, source: &Path) -> Result<Vec<ExclusionEntry>, CollectorError>;
}

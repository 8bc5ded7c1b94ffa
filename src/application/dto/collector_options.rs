use crate::collection::services::CatalogSources;
use std::path::PathBuf;
use std::time::Duration;

/// CollectorOptions - what the collector needs from configuration
#[derive(Debug, Clone)]
pub struct CollectorOptions {
    pub catalog: CatalogSources,
    pub inventory_file: PathBuf,
    pub blackout_file: PathBuf,
    pub exclusion_file: PathBuf,
    pub workers: usize,
    /// Overall deadline for one cycle; in-flight queries are abandoned when it passes
    pub collection_timeout: Option<Duration>,
}

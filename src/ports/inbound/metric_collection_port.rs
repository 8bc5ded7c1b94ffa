use crate::application::dto::CollectionResponse;
use crate::shared::error::CollectorError;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// MetricCollectionPort - Inbound port for running collection cycles
///
/// This is the interface the CLI (or any scheduler) drives. The collector
/// behind it is already started; `shutdown` must be called before it is
/// dropped.
#[async_trait]
pub trait MetricCollectionPort: Send + Sync {
    /// Runs one collection cycle over the current inventory
    ///
    /// # Errors
    /// Returns an error only when the inventory itself cannot be read.
    /// Per-target failures are reported inside the response.
    async fn collect_cycle(
        &self,
        cancel: CancellationToken,
    ) -> Result<CollectionResponse, CollectorError>;

    /// Re-reads the metric catalog, returning the number of definitions
    fn reload_catalog(&self) -> Result<usize, CollectorError>;

    /// Diagnostic statistics from the helper process
    async fn helper_stats(&self) -> Result<String, CollectorError>;

    /// Stops the helper process
    async fn shutdown(&self) -> Result<(), CollectorError>;
}

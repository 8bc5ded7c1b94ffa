use super::collect_metrics::CollectMetricsUseCase;
use crate::application::dto::{CollectionResponse, CollectorOptions};
use crate::collection::policies::PolicySet;
use crate::collection::services::{CatalogStore, MetricCatalog};
use crate::ports::inbound::MetricCollectionPort;
use crate::ports::outbound::{
    BeanQueryExecutor, HelperLifecycle, HelperState, InventoryReader, MetricDefinitionReader,
    ProgressReporter,
};
use crate::shared::error::CollectorError;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;

/// MetricsCollector - the long-lived collector client
///
/// Owns the metric catalog and the helper process for its whole life and
/// runs one collection cycle per `collect` call. The inventory and policy
/// files are re-read every cycle; the catalog only on `reload_catalog`.
///
/// # Type Parameters
/// * `DR` - MetricDefinitionReader implementation
/// * `IR` - InventoryReader implementation
/// * `HL` - HelperLifecycle implementation
/// * `E` - BeanQueryExecutor implementation
/// * `PR` - ProgressReporter implementation
pub struct MetricsCollector<DR, IR, HL, E, PR> {
    options: CollectorOptions,
    definition_reader: DR,
    inventory_reader: IR,
    lifecycle: HL,
    executor: Arc<E>,
    progress_reporter: Arc<PR>,
    catalog: CatalogStore,
    use_case: CollectMetricsUseCase<E, PR>,
}

impl<DR, IR, HL, E, PR> MetricsCollector<DR, IR, HL, E, PR>
where
    DR: MetricDefinitionReader,
    IR: InventoryReader,
    HL: HelperLifecycle,
    E: BeanQueryExecutor + 'static,
    PR: ProgressReporter + 'static,
{
    /// Loads the catalog, starts the helper and checks the inventory loads.
    ///
    /// # Errors
    /// Any of the three steps failing is fatal. A helper that was already
    /// started is stopped again before the error is returned.
    pub async fn start(
        options: CollectorOptions,
        definition_reader: DR,
        inventory_reader: IR,
        lifecycle: HL,
        executor: Arc<E>,
        progress_reporter: Arc<PR>,
    ) -> Result<Self, CollectorError> {
        let catalog = MetricCatalog::load(&definition_reader, &options.catalog)?;
        progress_reporter.report(&format!(
            "📖 Loaded {} metric definition(s)",
            catalog.total_definitions()
        ));

        lifecycle.start().await?;
        progress_reporter.report("🚀 Helper process is running");

        match inventory_reader.read_targets(&options.inventory_file) {
            Ok(targets) => {
                tracing::info!(targets = targets.len(), "Inventory check passed");
            }
            Err(e) => {
                if let Err(stop_err) = lifecycle.stop().await {
                    tracing::warn!("Failed to stop helper after startup error: {}", stop_err);
                }
                return Err(e);
            }
        }

        let use_case = CollectMetricsUseCase::new(
            Arc::clone(&executor),
            Arc::clone(&progress_reporter),
            options.workers,
        );

        Ok(Self {
            definition_reader,
            inventory_reader,
            lifecycle,
            executor,
            progress_reporter,
            catalog: CatalogStore::new(catalog),
            use_case,
            options,
        })
    }

    /// Runs one collection cycle.
    pub async fn collect(&self) -> Result<CollectionResponse, CollectorError> {
        self.collect_with_cancel(CancellationToken::new()).await
    }

    /// Runs one collection cycle that stops early when `cancel` fires or the
    /// configured collection timeout passes. Targets still in flight are
    /// reported Down.
    ///
    /// # Errors
    /// Returns `CollectorError::Config` if the inventory cannot be read.
    pub async fn collect_with_cancel(
        &self,
        cancel: CancellationToken,
    ) -> Result<CollectionResponse, CollectorError> {
        let started_at = Utc::now();
        let targets = self
            .inventory_reader
            .read_targets(&self.options.inventory_file)?;
        let policies = load_policies(&self.inventory_reader, &self.options);
        self.progress_reporter
            .report(&format!("🔍 Collecting from {} target(s)", targets.len()));

        let cycle_cancel = cancel.child_token();
        let _deadline = self.options.collection_timeout.map(|timeout| {
            let token = cycle_cancel.clone();
            AbortOnDropHandle::new(tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                tracing::warn!(
                    seconds = timeout.as_secs(),
                    "Collection timeout reached, cancelling in-flight queries"
                );
                token.cancel();
            }))
        });

        let results = self
            .use_case
            .execute(targets, self.catalog.snapshot(), policies, cycle_cancel)
            .await;

        let response = CollectionResponse::new(started_at, Utc::now(), results);
        tracing::info!(cycle_id = %response.cycle_id, "{}", response.summary());
        self.progress_reporter
            .report_completion(&format!("✅ {}", response.summary()));
        Ok(response)
    }

    /// Re-reads the three definition documents and swaps the catalog in one
    /// step. The previous catalog stays live if any document fails.
    pub fn reload_catalog(&self) -> Result<usize, CollectorError> {
        let catalog = self
            .catalog
            .load(&self.definition_reader, &self.options.catalog)?;
        tracing::info!(
            definitions = catalog.total_definitions(),
            "Metric catalog reloaded"
        );
        Ok(catalog.total_definitions())
    }

    /// Diagnostic statistics reported by the helper
    pub async fn helper_stats(&self) -> Result<String, CollectorError> {
        self.executor.stats().await
    }

    pub fn helper_state(&self) -> HelperState {
        self.lifecycle.state()
    }

    pub fn catalog(&self) -> Arc<MetricCatalog> {
        self.catalog.snapshot()
    }

    /// Stops the helper process.
    pub async fn shutdown(&self) -> Result<(), CollectorError> {
        self.lifecycle.stop().await?;
        self.progress_reporter.report("🛑 Helper process stopped");
        Ok(())
    }
}

#[async_trait]
impl<DR, IR, HL, E, PR> MetricCollectionPort for MetricsCollector<DR, IR, HL, E, PR>
where
    DR: MetricDefinitionReader,
    IR: InventoryReader,
    HL: HelperLifecycle,
    E: BeanQueryExecutor + 'static,
    PR: ProgressReporter + 'static,
{
    async fn collect_cycle(
        &self,
        cancel: CancellationToken,
    ) -> Result<CollectionResponse, CollectorError> {
        self.collect_with_cancel(cancel).await
    }

    fn reload_catalog(&self) -> Result<usize, CollectorError> {
        MetricsCollector::reload_catalog(self)
    }

    async fn helper_stats(&self) -> Result<String, CollectorError> {
        MetricsCollector::helper_stats(self).await
    }

    async fn shutdown(&self) -> Result<(), CollectorError> {
        MetricsCollector::shutdown(self).await
    }
}

/// Reads the blackout and exclusion lists for a cycle. Either file being
/// absent or unreadable leaves that list empty.
pub fn load_policies(reader: &dyn InventoryReader, options: &CollectorOptions) -> PolicySet {
    let blackouts = reader
        .read_blackouts(&options.blackout_file)
        .unwrap_or_else(|e| {
            tracing::warn!("Ignoring blackout list: {}", e);
            Vec::new()
        });
    let exclusions = reader
        .read_exclusions(&options.exclusion_file)
        .unwrap_or_else(|e| {
            tracing::warn!("Ignoring exclusion list: {}", e);
            Vec::new()
        });
    PolicySet::new(blackouts, exclusions)
}

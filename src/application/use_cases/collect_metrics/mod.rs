use super::worker_pool::WorkerPool;
use crate::application::dto::QueryJob;
use crate::collection::domain::{CollectionResult, CollectionStatus, Domain, DomainType, MetricMap};
use crate::collection::policies::PolicySet;
use crate::collection::services::{connector_url, MetricAggregator, MetricCatalog};
use crate::ports::outbound::{BeanQuery, BeanQueryExecutor, ProgressReporter};
use crate::shared::error::CollectorError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// CollectMetricsUseCase - runs one collection cycle over a target list
///
/// Each target goes through the request state machine: policy check,
/// connector URL, live query, status classification, aggregation. A worker
/// pool drives the targets concurrently. Every submitted target yields
/// exactly one result, whatever happens to its query.
///
/// # Type Parameters
/// * `E` - BeanQueryExecutor implementation
/// * `PR` - ProgressReporter implementation
pub struct CollectMetricsUseCase<E, PR> {
    executor: Arc<E>,
    progress_reporter: Arc<PR>,
    aggregator: MetricAggregator,
    pool: WorkerPool,
}

/// Builds one job per target with its type's definitions and the
/// de-duplicated query list.
pub fn build_jobs(targets: Vec<Domain>, catalog: &MetricCatalog) -> Vec<QueryJob> {
    let mut queries_by_type: HashMap<DomainType, Arc<Vec<String>>> = HashMap::new();
    targets
        .into_iter()
        .enumerate()
        .map(|(id, domain)| {
            let queries = queries_by_type
                .entry(domain.domain_type.clone())
                .or_insert_with(|| Arc::new(catalog.build_query_strings(&domain.domain_type)))
                .clone();
            QueryJob {
                id,
                definitions: catalog.lookup_for_type(&domain.domain_type),
                queries,
                domain,
            }
        })
        .collect()
}

/// Read-only state shared by every worker of a cycle
struct CycleContext<E, PR> {
    executor: Arc<E>,
    progress_reporter: Arc<PR>,
    aggregator: MetricAggregator,
    policies: PolicySet,
    cancel: CancellationToken,
    completed: AtomicUsize,
    total: usize,
}

impl<E, PR> CollectMetricsUseCase<E, PR>
where
    E: BeanQueryExecutor + 'static,
    PR: ProgressReporter + 'static,
{
    /// Creates a new CollectMetricsUseCase with injected dependencies
    pub fn new(executor: Arc<E>, progress_reporter: Arc<PR>, workers: usize) -> Self {
        Self {
            executor,
            progress_reporter,
            aggregator: MetricAggregator::new(),
            pool: WorkerPool::new(workers),
        }
    }

    pub fn with_aggregator(mut self, aggregator: MetricAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Runs the cycle and returns one result per target, in completion order.
    pub async fn execute(
        &self,
        targets: Vec<Domain>,
        catalog: Arc<MetricCatalog>,
        policies: PolicySet,
        cancel: CancellationToken,
    ) -> Vec<CollectionResult> {
        let jobs = build_jobs(targets, &catalog);
        let context = Arc::new(CycleContext {
            executor: Arc::clone(&self.executor),
            progress_reporter: Arc::clone(&self.progress_reporter),
            aggregator: self.aggregator.clone(),
            policies,
            cancel,
            completed: AtomicUsize::new(0),
            total: jobs.len(),
        });

        tracing::info!(
            targets = context.total,
            workers = self.pool.workers(),
            blackouts = context.policies.blackout_count(),
            exclusions = context.policies.exclusion_count(),
            "Starting collection cycle"
        );

        let recovery = Arc::clone(&context);
        self.pool
            .run(
                jobs,
                move |job| {
                    let context = Arc::clone(&context);
                    async move {
                        let result = context.process(job).await;
                        context.record_progress(&result);
                        result
                    }
                },
                move |job, panic| {
                    let result = CollectionResult::failed(
                        job.domain.identity(),
                        CollectionStatus::Down,
                        format!("collection task failed: {}", panic),
                    );
                    recovery.record_progress(&result);
                    result
                },
            )
            .await
    }
}

impl<E, PR> CycleContext<E, PR>
where
    E: BeanQueryExecutor,
    PR: ProgressReporter,
{
    /// The per-target request state machine
    async fn process(&self, job: QueryJob) -> CollectionResult {
        let QueryJob {
            domain,
            definitions,
            queries,
            ..
        } = job;
        let identity = domain.identity();

        let decision = self.policies.evaluate(&domain);
        if let Some(status) = decision.skip_status() {
            tracing::debug!(domain = %domain.domain_name, decision = decision.as_str(), "Skipping live query");
            return CollectionResult::new(identity, status, MetricMap::new());
        }
        if self.cancel.is_cancelled() {
            return CollectionResult::failed(identity, CollectionStatus::Down, CollectorError::Cancelled.to_string());
        }

        if definitions.is_empty() {
            tracing::warn!(
                domain = %domain.domain_name,
                domain_type = %domain.domain_type,
                "No metric definitions for domain type; reporting Up without querying"
            );
            return CollectionResult::new(identity, CollectionStatus::Up, MetricMap::new());
        }

        let query = BeanQuery {
            target: domain.domain_name.clone(),
            connector_url: connector_url(&domain),
            queries: queries.as_ref().clone(),
            credentials: domain.credentials.clone(),
        };

        let reply = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(CollectorError::Cancelled),
            reply = self.executor.run_bean_query(&query) => reply,
        };

        let raw = match reply {
            Ok(raw) => raw,
            Err(e) => {
                let status = if e.indicates_credential_failure() {
                    CollectionStatus::ConfigError
                } else {
                    CollectionStatus::Down
                };
                tracing::error!(domain = %domain.domain_name, status = %status, "Bean query failed: {}", e);
                self.progress_reporter
                    .report_error(&format!("⚠️  {}: {}", domain.domain_name, status));
                return CollectionResult::failed(identity, status, e.to_string());
            }
        };

        match self
            .aggregator
            .map_reply(&domain.domain_type, &definitions, &raw)
        {
            Ok(metrics) => {
                tracing::debug!(domain = %domain.domain_name, metrics = metrics.len(), "Collected");
                CollectionResult::new(identity, CollectionStatus::Up, metrics)
            }
            Err(e) => {
                tracing::error!(domain = %domain.domain_name, "Failed to map reply: {}", e);
                CollectionResult::failed(identity, CollectionStatus::ConfigError, e.to_string())
            }
        }
    }

    fn record_progress(&self, result: &CollectionResult) {
        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        self.progress_reporter.report_progress(
            done,
            self.total,
            Some(&format!("{} {}", result.domain_name(), result.status)),
        );
    }
}

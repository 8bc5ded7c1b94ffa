/// Use cases module containing application orchestration
mod collect_metrics;
mod metrics_collector;
mod plan_cycle;
mod worker_pool;

pub use collect_metrics::{build_jobs, CollectMetricsUseCase};
pub use metrics_collector::{load_policies, MetricsCollector};
pub use plan_cycle::plan_cycle;
pub use worker_pool::WorkerPool;

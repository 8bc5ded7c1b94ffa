use super::collect_metrics::build_jobs;
use crate::application::dto::PlannedJob;
use crate::collection::domain::Domain;
use crate::collection::policies::{PolicyDecision, PolicySet};
use crate::collection::services::{connector_url, MetricCatalog};

/// Lists what a cycle would do for each target without contacting any of them.
///
/// Targets keep their inventory order.
pub fn plan_cycle(
    targets: Vec<Domain>,
    catalog: &MetricCatalog,
    policies: &PolicySet,
) -> Vec<PlannedJob> {
    build_jobs(targets, catalog)
        .into_iter()
        .map(|job| {
            let decision = policies.evaluate(&job.domain);
            let queried = decision == PolicyDecision::Query;
            PlannedJob {
                domain_name: job.domain.domain_name.clone(),
                domain_type: job.domain.domain_type.as_str().to_string(),
                action: decision.as_str().to_string(),
                connector_url: queried.then(|| connector_url(&job.domain)),
                query_count: if queried { job.queries.len() } else { 0 },
            }
        })
        .collect()
}

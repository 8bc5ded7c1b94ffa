use crate::collection::domain::{CollectionResult, CollectionStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// CollectionResponse - everything one collection cycle produced
///
/// Results are in completion order, not inventory order.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionResponse {
    pub cycle_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<CollectionResult>,
}

impl CollectionResponse {
    pub fn new(
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        results: Vec<CollectionResult>,
    ) -> Self {
        Self {
            cycle_id: Uuid::new_v4(),
            started_at,
            finished_at,
            results,
        }
    }

    pub fn count(&self, status: CollectionStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// True when any target ended the cycle Down or with a config error
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| r.status.is_failure())
    }

    /// One-line tally, e.g. "3 up, 1 down, 0 blackout, 0 excluded, 0 config error"
    pub fn summary(&self) -> String {
        format!(
            "{} up, {} down, {} blackout, {} excluded, {} config error",
            self.count(CollectionStatus::Up),
            self.count(CollectionStatus::Down),
            self.count(CollectionStatus::Blackout),
            self.count(CollectionStatus::Excluded),
            self.count(CollectionStatus::ConfigError),
        )
    }
}

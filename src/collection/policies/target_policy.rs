use crate::collection::domain::{BlackoutEntry, CollectionStatus, Domain, ExclusionEntry};

/// What the operational policy says about querying a target this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    Query,
    Blackout,
    Excluded,
}

impl PolicyDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyDecision::Query => "query",
            PolicyDecision::Blackout => "blackout",
            PolicyDecision::Excluded => "excluded",
        }
    }

    /// Status reported for a target that is not queried
    pub fn skip_status(&self) -> Option<CollectionStatus> {
        match self {
            PolicyDecision::Query => None,
            PolicyDecision::Blackout => Some(CollectionStatus::Blackout),
            PolicyDecision::Excluded => Some(CollectionStatus::Excluded),
        }
    }
}

/// Blackout and exclusion lists in force for one collection cycle
#[derive(Debug, Clone, Default)]
pub struct PolicySet {
    blackouts: Vec<BlackoutEntry>,
    exclusions: Vec<ExclusionEntry>,
}

impl PolicySet {
    pub fn new(blackouts: Vec<BlackoutEntry>, exclusions: Vec<ExclusionEntry>) -> Self {
        Self {
            blackouts,
            exclusions,
        }
    }

    pub fn blackout_count(&self) -> usize {
        self.blackouts.len()
    }

    pub fn exclusion_count(&self) -> usize {
        self.exclusions.len()
    }

    pub fn in_blackout(&self, domain: &Domain) -> bool {
        self.blackouts.iter().any(|entry| entry.covers(domain))
    }

    pub fn is_excluded(&self, domain: &Domain) -> bool {
        self.exclusions.iter().any(|entry| entry.covers(domain))
    }

    /// Blackout is checked first and wins over exclusion.
    pub fn evaluate(&self, domain: &Domain) -> PolicyDecision {
        if self.in_blackout(domain) {
            PolicyDecision::Blackout
        } else if self.is_excluded(domain) {
            PolicyDecision::Excluded
        } else {
            PolicyDecision::Query
        }
    }
}

use serde::Serialize;

/// PlannedJob - what a cycle would do for one target, without querying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedJob {
    pub domain_name: String,
    pub domain_type: String,
    /// "query", "blackout" or "excluded"
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector_url: Option<String>,
    pub query_count: usize,
}

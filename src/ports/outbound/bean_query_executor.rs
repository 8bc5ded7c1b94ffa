use crate::collection::domain::Credentials;
use crate::shared::error::CollectorError;
use async_trait::async_trait;

/// One live bean query against a single domain
#[derive(Debug, Clone)]
pub struct BeanQuery {
    /// Domain name, used for log context only
    pub target: String,
    pub connector_url: String,
    /// `<classPattern>/<attributeName>` pairs, sent semicolon-joined
    pub queries: Vec<String>,
    pub credentials: Credentials,
}

impl BeanQuery {
    /// Argument vector understood by the query adapter inside the helper
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "-url".to_string(),
            self.connector_url.clone(),
            "-q".to_string(),
            self.queries.join(";"),
            "-u".to_string(),
            self.credentials.user().to_string(),
            "-p".to_string(),
            self.credentials.password().to_string(),
        ]
    }
}

/// BeanQueryExecutor port for running commands on the helper process
///
/// # Async Support
/// Implementations must be `Send + Sync`; every worker in the pool calls
/// the same executor concurrently and each call opens its own connection.
#[async_trait]
pub trait BeanQueryExecutor: Send + Sync {
    /// Runs a bean query and returns the raw reply payload (standard output)
    ///
    /// # Errors
    /// - `CollectorError::Transport` when the helper cannot be reached
    /// - `CollectorError::Protocol` when the command exits non-zero
    /// - `CollectorError::Timeout` when the request outlives its deadline
    async fn run_bean_query(&self, query: &BeanQuery) -> Result<String, CollectorError>;

    /// Runs the helper's diagnostic stats command
    async fn stats(&self) -> Result<String, CollectorError>;
}

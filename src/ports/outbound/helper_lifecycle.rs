use crate::shared::error::CollectorError;
use async_trait::async_trait;
use std::fmt;

/// Lifecycle states of the helper process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl fmt::Display for HelperState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HelperState::Stopped => "stopped",
            HelperState::Starting => "starting",
            HelperState::Running => "running",
            HelperState::Stopping => "stopping",
        };
        f.write_str(name)
    }
}

/// HelperLifecycle port owning the long-lived helper process
///
/// Keeping the process behind this port lets the collector run against a
/// fake helper in tests.
#[async_trait]
pub trait HelperLifecycle: Send + Sync {
    /// Launches the helper and waits until it reports readiness
    ///
    /// # Errors
    /// Returns `CollectorError::ProcessLifecycle` if the process cannot be
    /// spawned, reports a startup failure, or is not ready in time
    async fn start(&self) -> Result<(), CollectorError>;

    /// Asks the helper to stop, then makes sure it is gone
    async fn stop(&self) -> Result<(), CollectorError>;

    fn state(&self) -> HelperState;
}

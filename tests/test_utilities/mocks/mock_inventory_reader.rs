use jmx_collector::collection::domain::{BlackoutEntry, Credentials, ExclusionEntry};
use jmx_collector::prelude::*;
use std::path::Path;

/// Mock InventoryReader holding the records in memory
///
/// `None` lists behave like a missing file.
#[derive(Clone, Default)]
pub struct MockInventoryReader {
    pub targets: Option<Vec<Domain>>,
    pub blackouts: Option<Vec<BlackoutEntry>>,
    pub exclusions: Option<Vec<ExclusionEntry>>,
}

impl MockInventoryReader {
    pub fn new(targets: Vec<Domain>) -> Self {
        Self {
            targets: Some(targets),
            blackouts: None,
            exclusions: None,
        }
    }

    pub fn with_blackouts(mut self, blackouts: Vec<BlackoutEntry>) -> Self {
        self.blackouts = Some(blackouts);
        self
    }

    pub fn with_exclusions(mut self, exclusions: Vec<ExclusionEntry>) -> Self {
        self.exclusions = Some(exclusions);
        self
    }
}

fn missing(source: &Path) -> CollectorError {
    CollectorError::config(source.display().to_string(), "No such file or directory")
}

impl InventoryReader for MockInventoryReader {
    fn read_targets(&self, source: &Path) -> std::result::Result<Vec<Domain>, CollectorError> {
        self.targets.clone().ok_or_else(|| missing(source))
    }

    fn read_blackouts(
        &self,
        source: &Path,
    ) -> std::result::Result<Vec<BlackoutEntry>, CollectorError> {
        self.blackouts.clone().ok_or_else(|| missing(source))
    }

    fn read_exclusions(
        &self,
        source: &Path,
    ) -> std::result::Result<Vec<ExclusionEntry>, CollectorError> {
        self.exclusions.clone().ok_or_else(|| missing(source))
    }
}

/// A domain as an inventory row would describe it
pub fn domain(name: &str, domain_type: DomainType, app: &str, env: &str) -> Domain {
    Domain {
        domain_name: name.to_string(),
        domain_type,
        app: app.to_string(),
        env: env.to_string(),
        purpose: "online".to_string(),
        server_name: "PIA".to_string(),
        host_name: format!("{}.example.edu", name.to_lowercase()),
        tools_version: "8.60".to_string(),
        weblogic_version: "14.1.1".to_string(),
        jmx_port: "10100".to_string(),
        credentials: Credentials::new("monitor", "secret"),
    }
}

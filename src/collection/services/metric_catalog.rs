use crate::collection::domain::{DomainType, MetricDefinition};
use crate::ports::outbound::MetricDefinitionReader;
use crate::shared::error::CollectorError;
use arc_swap::ArcSwap;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Locations of the three metric-definition documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSources {
    pub web: PathBuf,
    pub app: PathBuf,
    pub prc: PathBuf,
}

/// Metric definitions per domain type, read-only once built
#[derive(Debug, Clone, Default)]
pub struct MetricCatalog {
    web: Arc<Vec<MetricDefinition>>,
    app: Arc<Vec<MetricDefinition>>,
    prc: Arc<Vec<MetricDefinition>>,
    empty: Arc<Vec<MetricDefinition>>,
}

impl MetricCatalog {
    pub fn new(
        web: Vec<MetricDefinition>,
        app: Vec<MetricDefinition>,
        prc: Vec<MetricDefinition>,
    ) -> Self {
        Self {
            web: Arc::new(web),
            app: Arc::new(app),
            prc: Arc::new(prc),
            empty: Arc::new(Vec::new()),
        }
    }

    /// Reads all three documents. Nothing is returned unless every one of
    /// them loads and validates.
    pub fn load(
        reader: &dyn MetricDefinitionReader,
        sources: &CatalogSources,
    ) -> Result<Self, CollectorError> {
        let web = reader.read_definitions(&sources.web)?;
        let app = reader.read_definitions(&sources.app)?;
        let prc = reader.read_definitions(&sources.prc)?;
        tracing::debug!(
            web = web.len(),
            app = app.len(),
            prc = prc.len(),
            "Loaded metric definitions"
        );
        Ok(Self::new(web, app, prc))
    }

    /// Definitions for a domain type; unknown types get an empty list.
    pub fn lookup_for_type(&self, domain_type: &DomainType) -> Arc<Vec<MetricDefinition>> {
        match domain_type {
            DomainType::Web => Arc::clone(&self.web),
            DomainType::App => Arc::clone(&self.app),
            DomainType::Prc => Arc::clone(&self.prc),
            DomainType::Unknown(_) => Arc::clone(&self.empty),
        }
    }

    /// Ordered `<classPattern>/<attributeName>` list with exact duplicates
    /// dropped, first occurrence kept.
    pub fn build_query_strings(&self, domain_type: &DomainType) -> Vec<String> {
        let definitions = self.lookup_for_type(domain_type);
        let mut seen = HashSet::new();
        definitions
            .iter()
            .map(MetricDefinition::query_string)
            .filter(|query| seen.insert(query.clone()))
            .collect()
    }

    pub fn total_definitions(&self) -> usize {
        self.web.len() + self.app.len() + self.prc.len()
    }
}

/// Holds the live catalog and swaps in a fully staged replacement on reload
pub struct CatalogStore {
    current: ArcSwap<MetricCatalog>,
}

impl CatalogStore {
    pub fn new(catalog: MetricCatalog) -> Self {
        Self {
            current: ArcSwap::from_pointee(catalog),
        }
    }

    /// Loads a new catalog and publishes it. On failure the previous
    /// catalog stays in place untouched.
    pub fn load(
        &self,
        reader: &dyn MetricDefinitionReader,
        sources: &CatalogSources,
    ) -> Result<Arc<MetricCatalog>, CollectorError> {
        let staged = Arc::new(MetricCatalog::load(reader, sources)?);
        self.current.store(Arc::clone(&staged));
        Ok(staged)
    }

    pub fn snapshot(&self) -> Arc<MetricCatalog> {
        self.current.load_full()
    }
}

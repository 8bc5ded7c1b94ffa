use jmx_collector::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Mock MetricDefinitionReader serving the same definitions for every source
#[derive(Clone)]
pub struct MockDefinitionReader {
    definitions: Arc<Mutex<Vec<MetricDefinition>>>,
    failing_source: Option<PathBuf>,
}

impl MockDefinitionReader {
    pub fn new(definitions: Vec<MetricDefinition>) -> Self {
        Self {
            definitions: Arc::new(Mutex::new(definitions)),
            failing_source: None,
        }
    }

    pub fn failing_on(mut self, source: &str) -> Self {
        self.failing_source = Some(PathBuf::from(source));
        self
    }

    /// Definitions served from now on; clones share them
    pub fn replace(&self, definitions: Vec<MetricDefinition>) {
        *self.definitions.lock().unwrap() = definitions;
    }
}

impl MetricDefinitionReader for MockDefinitionReader {
    fn read_definitions(
        &self,
        source: &Path,
    ) -> std::result::Result<Vec<MetricDefinition>, CollectorError> {
        if self.failing_source.as_deref() == Some(source) {
            return Err(CollectorError::config(
                source.display().to_string(),
                "Unknown attrType 'median'",
            ));
        }
        Ok(self.definitions.lock().unwrap().clone())
    }
}

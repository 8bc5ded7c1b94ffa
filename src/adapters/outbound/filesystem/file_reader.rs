use crate::collection::domain::{
    AggregationKind, BlackoutEntry, Credentials, Domain, DomainType, ExclusionEntry,
    MetricDefinition,
};
use crate::ports::outbound::{InventoryReader, MetricDefinitionReader};
use crate::shared::error::CollectorError;
use crate::shared::security::{validate_file_size, validate_regular_file, MAX_FILE_SIZE};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Fields per inventory record
const INVENTORY_FIELDS: usize = 12;

/// FileSystemReader adapter for reading catalog and inventory files
///
/// This adapter implements both MetricDefinitionReader and InventoryReader
/// ports, providing file system access for the collector's record files.
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemReader {
    /// Safely read a file with security checks:
    /// - Reject symbolic links
    /// - Check file size limits
    /// - Validate file is a regular file
    fn safe_read_file(&self, path: &Path, file_type: &str) -> Result<String, CollectorError> {
        let read_error = |details: String| CollectorError::FileReadError {
            path: path.to_path_buf(),
            details,
        };

        let file_size =
            validate_regular_file(path, file_type).map_err(|e| read_error(e.to_string()))?;
        validate_file_size(file_size, path, MAX_FILE_SIZE).map_err(|e| read_error(e.to_string()))?;

        fs::read_to_string(path).map_err(|e| read_error(format!("Failed to read {}: {}", file_type, e)))
    }

    /// Like `safe_read_file`, but read failures become `Config` errors
    /// naming the file.
    fn read_config_source(&self, path: &Path, file_type: &str) -> Result<String, CollectorError> {
        self.safe_read_file(path, file_type).map_err(|e| {
            let details = match e {
                CollectorError::FileReadError { details, .. } => details,
                other => other.to_string(),
            };
            CollectorError::config(path.display().to_string(), details)
        })
    }
}

/// Non-blank, non-comment lines with their 1-based line numbers
fn records(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn parse_inventory_record(
    source: &Path,
    line_number: usize,
    line: &str,
) -> Result<Domain, CollectorError> {
    // one space per separator; a doubled space is an empty field
    let fields: Vec<&str> = line.split(' ').collect();
    if fields.len() < INVENTORY_FIELDS {
        return Err(CollectorError::config(
            source.display().to_string(),
            format!(
                "line {}: expected {} space-separated fields, found {}",
                line_number,
                INVENTORY_FIELDS,
                fields.len()
            ),
        ));
    }

    Ok(Domain {
        domain_name: fields[0].to_string(),
        domain_type: DomainType::parse(fields[1]),
        app: fields[2].to_string(),
        env: fields[3].to_string(),
        purpose: fields[4].to_string(),
        server_name: fields[5].to_string(),
        host_name: fields[6].to_string(),
        tools_version: fields[7].to_string(),
        weblogic_version: fields[8].to_string(),
        jmx_port: fields[9].to_string(),
        credentials: Credentials::new(fields[10], fields[11]),
    })
}

impl InventoryReader for FileSystemReader {
    fn read_targets(&self, source: &Path) -> Result<Vec<Domain>, CollectorError> {
        let content = self.read_config_source(source, "inventory file")?;
        let targets = records(&content)
            .map(|(line_number, line)| parse_inventory_record(source, line_number, line))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(file = %source.display(), count = targets.len(), "Loaded targets");
        Ok(targets)
    }

    fn read_blackouts(&self, source: &Path) -> Result<Vec<BlackoutEntry>, CollectorError> {
        let content = self.safe_read_file(source, "blackout file")?;
        let blackouts: Vec<BlackoutEntry> = records(&content)
            .map(|(_, line)| {
                let mut fields = line.splitn(3, '|').map(str::trim);
                let identifier = fields.next().unwrap_or_default();
                let end_time = fields.next().unwrap_or_default();
                let reason = fields.next().unwrap_or_default();
                BlackoutEntry::new(identifier, end_time, reason)
            })
            .filter(|entry| !entry.identifier.is_empty())
            .collect();
        tracing::debug!(file = %source.display(), count = blackouts.len(), "Loaded blackouts");
        Ok(blackouts)
    }

    fn read_exclusions(&self, source: &Path) -> Result<Vec<ExclusionEntry>, CollectorError> {
        let content = self.safe_read_file(source, "exclusion file")?;
        let exclusions: Vec<ExclusionEntry> = records(&content)
            .filter_map(|(_, line)| {
                let name = line.split(',').next().unwrap_or_default().trim();
                (!name.is_empty()).then(|| ExclusionEntry::new(name))
            })
            .collect();
        tracing::debug!(file = %source.display(), count = exclusions.len(), "Loaded exclusions");
        Ok(exclusions)
    }
}

/// Metric-definition document layout
#[derive(Debug, Deserialize)]
struct DefinitionDocument {
    metrics: Vec<DefinitionRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefinitionRecord {
    metric_name: String,
    #[serde(default)]
    role: String,
    attr_type: String,
    jmx_class: String,
    jmx_attr_name: String,
    #[serde(default)]
    attr_where: Option<String>,
}

impl DefinitionRecord {
    fn into_definition(self, source_name: &str) -> Result<MetricDefinition, CollectorError> {
        let kind: AggregationKind = self.attr_type.parse().map_err(|e: String| {
            CollectorError::config(source_name, format!("metric '{}': {}", self.metric_name, e))
        })?;

        let mut definition = MetricDefinition::new(self.metric_name, kind, self.jmx_class, self.jmx_attr_name)
            .with_role(self.role);
        if let Some(clause) = self.attr_where.as_deref() {
            definition = definition.with_filter(clause);
        }
        definition.validate(source_name)?;
        Ok(definition)
    }
}

impl MetricDefinitionReader for FileSystemReader {
    fn read_definitions(&self, source: &Path) -> Result<Vec<MetricDefinition>, CollectorError> {
        let source_name = source.display().to_string();
        let content = self.read_config_source(source, "metric definition file")?;

        let document: DefinitionDocument = serde_yaml_ng::from_str(&content)
            .map_err(|e| CollectorError::config(&source_name, format!("Failed to parse YAML: {}", e)))?;

        document
            .metrics
            .into_iter()
            .map(|record| record.into_definition(&source_name))
            .collect()
    }
}

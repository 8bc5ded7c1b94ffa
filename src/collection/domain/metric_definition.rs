use super::collection_result::RESERVED_RESULT_KEYS;
use crate::shared::error::CollectorError;
use std::fmt;
use std::str::FromStr;

/// How raw samples matching a definition are reduced to one value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationKind {
    /// First matching sample, passed through with type coercion
    Class,
    Sum,
    Avg,
    Max,
    Pct,
    Stdev,
}

impl AggregationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationKind::Class => "class",
            AggregationKind::Sum => "sum",
            AggregationKind::Avg => "avg",
            AggregationKind::Max => "max",
            AggregationKind::Pct => "pct",
            AggregationKind::Stdev => "stdev",
        }
    }
}

impl FromStr for AggregationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "class" => Ok(AggregationKind::Class),
            "sum" => Ok(AggregationKind::Sum),
            "avg" => Ok(AggregationKind::Avg),
            "max" => Ok(AggregationKind::Max),
            "pct" => Ok(AggregationKind::Pct),
            "stdev" => Ok(AggregationKind::Stdev),
            _ => Err(format!(
                "Invalid aggregation kind: {}. Expected one of class, sum, avg, max, pct, stdev",
                s
            )),
        }
    }
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equality filter on the raw textual value of a sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterClause {
    /// `value`: keep only samples whose value equals this text
    Equals(String),
    /// `!value`: drop samples whose value equals this text
    NotEquals(String),
}

impl FilterClause {
    /// Parses a filter clause. Clauses shorter than two characters are
    /// treated as absent.
    pub fn parse(clause: &str) -> Option<Self> {
        if clause.chars().count() < 2 {
            return None;
        }
        match clause.strip_prefix('!') {
            Some(rest) => Some(FilterClause::NotEquals(rest.trim_start_matches('!').to_string())),
            None => Some(FilterClause::Equals(clause.to_string())),
        }
    }

    pub fn admits(&self, value: &str) -> bool {
        match self {
            FilterClause::Equals(expected) => value == expected,
            FilterClause::NotEquals(rejected) => value != rejected,
        }
    }
}

/// One output metric and the bean attribute it is computed from
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDefinition {
    pub metric_name: String,
    pub role: String,
    pub kind: AggregationKind,
    pub class_pattern: String,
    pub attribute_name: String,
    pub filter: Option<FilterClause>,
}

impl MetricDefinition {
    pub fn new(
        metric_name: impl Into<String>,
        kind: AggregationKind,
        class_pattern: impl Into<String>,
        attribute_name: impl Into<String>,
    ) -> Self {
        Self {
            metric_name: metric_name.into(),
            role: String::new(),
            kind,
            class_pattern: class_pattern.into(),
            attribute_name: attribute_name.into(),
            filter: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_filter(mut self, clause: &str) -> Self {
        self.filter = FilterClause::parse(clause);
        self
    }

    /// `<classPattern>/<attributeName>`, the form the helper's query adapter accepts
    pub fn query_string(&self) -> String {
        format!("{}/{}", self.class_pattern, self.attribute_name)
    }

    /// Rejects definitions that could never match anything.
    pub fn validate(&self, source_name: &str) -> Result<(), CollectorError> {
        if self.metric_name.trim().is_empty() {
            return Err(CollectorError::config(
                source_name,
                "metric definition is missing metricName",
            ));
        }
        if RESERVED_RESULT_KEYS.contains(&self.metric_name.as_str()) {
            return Err(CollectorError::config(
                source_name,
                format!(
                    "metricName '{}' collides with a result field",
                    self.metric_name
                ),
            ));
        }
        if self.class_pattern.trim().is_empty() || self.attribute_name.trim().is_empty() {
            return Err(CollectorError::config(
                source_name,
                format!(
                    "metric '{}' needs both jmxClass and jmxAttrName",
                    self.metric_name
                ),
            ));
        }
        glob::Pattern::new(&self.class_pattern).map_err(|e| {
            CollectorError::config(
                source_name,
                format!(
                    "metric '{}' has an invalid jmxClass pattern: {}",
                    self.metric_name, e
                ),
            )
        })?;
        Ok(())
    }
}

use super::bean_pattern::BeanPattern;
use super::reply_decoder::decode_reply;
use crate::collection::domain::{
    round2, AggregationKind, DomainType, HealthStatus, MetricDefinition, MetricMap, MetricValue,
    RawSample,
};
use crate::shared::error::CollectorError;

/// Attribute names whose raw values are translated into `HealthStatus`
const HEALTH_ATTRIBUTES: [&str; 2] = ["Health", "HealthState"];

/// Raw integer health value meaning the server is completely down
const HEALTH_DOWN_CODE: i64 = 5;

/// Names of the metrics feeding the derived app-server load metric
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedLoadMetric {
    pub health: String,
    pub active_pct: String,
    pub queue_depth: String,
    pub queue_server_count: String,
    pub output: String,
}

impl Default for DerivedLoadMetric {
    fn default() -> Self {
        Self {
            health: "Health".to_string(),
            active_pct: "appsrv.active_pct".to_string(),
            queue_depth: "appsrv.queue.depth".to_string(),
            queue_server_count: "appsrv.queue.server_count".to_string(),
            output: "appsrv.load".to_string(),
        }
    }
}

/// MetricAggregator - reduces raw bean samples into a typed metric map,
/// definition by definition in catalog order.
#[derive(Debug, Clone, Default)]
pub struct MetricAggregator {
    derived: DerivedLoadMetric,
}

impl MetricAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_derived_metric(derived: DerivedLoadMetric) -> Self {
        Self { derived }
    }

    /// Decodes a helper reply and maps it.
    ///
    /// # Errors
    /// Returns `CollectorError::Mapping` when the reply cannot be decoded.
    pub fn map_reply(
        &self,
        domain_type: &DomainType,
        definitions: &[MetricDefinition],
        reply: &str,
    ) -> Result<MetricMap, CollectorError> {
        let samples = decode_reply(reply)?;
        Ok(self.map_samples(domain_type, definitions, &samples))
    }

    pub fn map_samples(
        &self,
        domain_type: &DomainType,
        definitions: &[MetricDefinition],
        samples: &[RawSample],
    ) -> MetricMap {
        let mut mapped = MetricMap::new();

        for definition in definitions {
            let pattern = match BeanPattern::new(&definition.class_pattern) {
                Ok(pattern) => pattern,
                Err(e) => {
                    tracing::warn!(
                        metric = %definition.metric_name,
                        "Skipping metric with invalid bean pattern: {}",
                        e
                    );
                    continue;
                }
            };

            let value = match definition.kind {
                AggregationKind::Class => select_class_value(definition, &pattern, samples),
                _ => aggregate(definition, &pattern, samples),
            };

            match value {
                Some(value) => {
                    mapped.insert(definition.metric_name.clone(), value);
                }
                None if is_health_attribute(&definition.attribute_name) => {
                    mapped.insert(
                        definition.metric_name.clone(),
                        MetricValue::Status(HealthStatus::Unavailable),
                    );
                }
                None => {}
            }
        }

        self.apply_derived_load(domain_type, &mut mapped);
        mapped
    }

    /// `load = active_pct + round(queue_depth / queue_server_count, 2)` for
    /// healthy app domains. Skipped whenever an input is missing or not numeric.
    fn apply_derived_load(&self, domain_type: &DomainType, mapped: &mut MetricMap) {
        if *domain_type != DomainType::App {
            return;
        }
        if mapped.get(&self.derived.health).is_some_and(is_fully_down) {
            return;
        }
        let numeric = |name: &str| mapped.get(name).and_then(MetricValue::as_f64);

        let Some(server_count) = numeric(&self.derived.queue_server_count) else {
            return;
        };
        if server_count <= 0.0 {
            return;
        }
        let (Some(active_pct), Some(queue_depth)) = (
            numeric(&self.derived.active_pct),
            numeric(&self.derived.queue_depth),
        ) else {
            tracing::debug!("Skipping derived load metric: inputs missing or not numeric");
            return;
        };

        let load = active_pct + round2(queue_depth / server_count);
        mapped.insert(self.derived.output.clone(), MetricValue::rounded(load));
    }
}

fn is_health_attribute(attribute: &str) -> bool {
    HEALTH_ATTRIBUTES.contains(&attribute)
}

fn is_fully_down(health: &MetricValue) -> bool {
    matches!(
        health,
        MetricValue::Status(HealthStatus::Failed) | MetricValue::Integer(HEALTH_DOWN_CODE)
    )
}

/// First sample on the attribute whose bean matches, coerced to a typed value
fn select_class_value(
    definition: &MetricDefinition,
    pattern: &BeanPattern,
    samples: &[RawSample],
) -> Option<MetricValue> {
    samples
        .iter()
        .filter(|sample| sample.attribute == definition.attribute_name)
        .find(|sample| pattern.matches(&sample.bean_name))
        .map(|sample| coerce_class_value(&definition.attribute_name, &sample.value))
}

fn coerce_class_value(attribute: &str, raw: &str) -> MetricValue {
    if is_health_attribute(attribute) {
        return MetricValue::Status(HealthStatus::from_raw(raw));
    }
    let trimmed = raw.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return MetricValue::Integer(int);
    }
    match trimmed.parse::<f64>() {
        Ok(float) if float.is_finite() => MetricValue::rounded(float),
        _ => MetricValue::Text(raw.to_string()),
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Sum/avg/max/pct/stdev over the matching samples.
///
/// The avg and pct denominator is the number of samples carrying the
/// attribute, counted before the bean pattern and filter are applied.
fn aggregate(
    definition: &MetricDefinition,
    pattern: &BeanPattern,
    samples: &[RawSample],
) -> Option<MetricValue> {
    let mut attribute_matches = 0usize;
    let mut filtered_matches = 0usize;
    let mut sum = 0.0;
    let mut max: Option<f64> = None;
    let mut values = Vec::new();

    for sample in samples
        .iter()
        .filter(|sample| sample.attribute == definition.attribute_name)
    {
        attribute_matches += 1;
        if !pattern.matches(&sample.bean_name) {
            continue;
        }
        if let Some(filter) = &definition.filter {
            if !filter.admits(&sample.value) {
                continue;
            }
        }
        filtered_matches += 1;

        match parse_number(&sample.value) {
            Some(number) => {
                sum += number;
                max = Some(max.map_or(number, |current| current.max(number)));
                values.push(number);
            }
            // non-numeric states count as one each so sums can tally them
            None => sum += 1.0,
        }
    }

    let ratio = |numerator: f64| {
        if attribute_matches == 0 {
            0.0
        } else {
            numerator / attribute_matches as f64
        }
    };

    match definition.kind {
        AggregationKind::Sum => Some(MetricValue::rounded(sum)),
        AggregationKind::Avg => Some(MetricValue::rounded(ratio(sum))),
        AggregationKind::Max => Some(MetricValue::rounded(max.unwrap_or(0.0))),
        AggregationKind::Pct => Some(MetricValue::rounded(ratio(filtered_matches as f64))),
        AggregationKind::Stdev => sample_std_dev(&values).map(MetricValue::rounded),
        AggregationKind::Class => None,
    }
}

/// Sample (n - 1) standard deviation; a single value has none to speak of
/// and yields 0.0.
fn sample_std_dev(values: &[f64]) -> Option<f64> {
    match values.len() {
        0 => None,
        1 => Some(0.0),
        n => {
            let mean = values.iter().sum::<f64>() / n as f64;
            let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            Some((squares / (n - 1) as f64).sqrt())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUEUE_BEAN: &str = "PeopleSoft:Type=Queue,Name=APPQ";
    const SERVER_BEAN: &str = "PeopleSoft:Type=Server,Name=PSAPPSRV_1";

    fn def(name: &str, kind: AggregationKind, class: &str, attr: &str) -> MetricDefinition {
        MetricDefinition::new(name, kind, class, attr)
    }

    fn sample(bean: &str, attr: &str, value: &str) -> RawSample {
        RawSample::new(bean, attr, value)
    }

    fn map(definitions: &[MetricDefinition], samples: &[RawSample]) -> MetricMap {
        MetricAggregator::new().map_samples(&DomainType::Prc, definitions, samples)
    }

    #[test]
    fn test_class_integer_then_float_then_text() {
        let defs = vec![
            def("int", AggregationKind::Class, "x:*", "A"),
            def("float", AggregationKind::Class, "x:*", "B"),
            def("text", AggregationKind::Class, "x:*", "C"),
        ];
        let samples = vec![
            sample("x:1", "A", "42"),
            sample("x:1", "B", "3.14159"),
            sample("x:1", "C", "RUNNING"),
        ];
        let mapped = map(&defs, &samples);
        assert_eq!(mapped["int"], MetricValue::Integer(42));
        assert_eq!(mapped["float"], MetricValue::Float(3.14));
        assert_eq!(mapped["text"], MetricValue::Text("RUNNING".to_string()));
    }

    #[test]
    fn test_class_takes_first_matching_sample() {
        let defs = vec![def("busy", AggregationKind::Class, "x:Name=B*", "Busy")];
        let samples = vec![
            sample("x:Name=A", "Busy", "1"),
            sample("x:Name=B1", "Busy", "2"),
            sample("x:Name=B2", "Busy", "3"),
        ];
        assert_eq!(map(&defs, &samples)["busy"], MetricValue::Integer(2));
    }

    #[test]
    fn test_health_state_translation() {
        let defs = vec![def("health", AggregationKind::Class, "com.bea:*", "HealthState")];
        let samples = vec![sample(
            "com.bea:Name=PIA",
            "HealthState",
            "Component:null,State:HEALTH_WARN,MBean:null",
        )];
        assert_eq!(
            map(&defs, &samples)["health"],
            MetricValue::Status(HealthStatus::Warning)
        );
    }

    #[test]
    fn test_health_unmatched_or_empty_is_unavailable() {
        let defs = vec![
            def("Health", AggregationKind::Class, "com.bea:*", "Health"),
            def("state", AggregationKind::Class, "com.bea:*", "HealthState"),
        ];
        let samples = vec![sample("com.bea:Name=PIA", "Health", "")];
        let mapped = map(&defs, &samples);
        assert_eq!(mapped["Health"], MetricValue::Status(HealthStatus::Unavailable));
        assert_eq!(mapped["state"], MetricValue::Status(HealthStatus::Unavailable));
    }

    #[test]
    fn test_unmatched_class_metric_is_absent() {
        let defs = vec![def("busy", AggregationKind::Class, "x:*", "Busy")];
        assert!(map(&defs, &[]).is_empty());
    }

    #[test]
    fn test_sum_counts_non_numeric_as_one() {
        let defs = vec![def("sum", AggregationKind::Sum, "x:*", "State")];
        let samples = vec![
            sample("x:1", "State", "BUSY"),
            sample("x:2", "State", "3.0"),
            sample("x:3", "State", "4.0"),
        ];
        assert_eq!(map(&defs, &samples)["sum"], MetricValue::Float(8.0));
    }

    #[test]
    fn test_avg_and_max_with_no_samples_are_zero() {
        let defs = vec![
            def("avg", AggregationKind::Avg, "x:*", "Busy"),
            def("max", AggregationKind::Max, "x:*", "Busy"),
        ];
        let mapped = map(&defs, &[]);
        assert_eq!(mapped["avg"], MetricValue::Float(0.0));
        assert_eq!(mapped["max"], MetricValue::Float(0.0));
    }

    #[test]
    fn test_pct_with_no_samples_is_zero() {
        let defs = vec![def("pct", AggregationKind::Pct, "x:*", "Busy")];
        assert_eq!(map(&defs, &[])["pct"], MetricValue::Float(0.0));
    }

    #[test]
    fn test_pct_uses_unfiltered_denominator() {
        let defs = vec![def("busy_pct", AggregationKind::Pct, "x:*", "State").with_filter("!IDLE")];
        let samples = vec![
            sample("x:1", "State", "BUSY"),
            sample("x:2", "State", "IDLE"),
            sample("x:3", "State", "IDLE"),
            sample("x:4", "State", "BUSY"),
        ];
        assert_eq!(map(&defs, &samples)["busy_pct"], MetricValue::Float(0.5));
    }

    #[test]
    fn test_avg_denominator_counts_filtered_out_samples() {
        let defs = vec![def("avg", AggregationKind::Avg, "x:*", "Busy").with_filter("!0")];
        let samples = vec![
            sample("x:1", "Busy", "6"),
            sample("x:2", "Busy", "0"),
            sample("x:3", "Busy", "0"),
        ];
        // 6 / 3 rather than 6 / 1
        assert_eq!(map(&defs, &samples)["avg"], MetricValue::Float(2.0));
    }

    #[test]
    fn test_equality_filter_keeps_only_matching_values() {
        let defs = vec![def("busy", AggregationKind::Sum, "x:*", "State").with_filter("BUSY")];
        let samples = vec![
            sample("x:1", "State", "BUSY"),
            sample("x:2", "State", "IDLE"),
            sample("x:3", "State", "BUSY"),
        ];
        assert_eq!(map(&defs, &samples)["busy"], MetricValue::Float(2.0));
    }

    #[test]
    fn test_max_picks_largest_numeric() {
        let defs = vec![def("max", AggregationKind::Max, "x:*", "Depth")];
        let samples = vec![
            sample("x:1", "Depth", "3"),
            sample("x:2", "Depth", "n/a"),
            sample("x:3", "Depth", "11.456"),
        ];
        assert_eq!(map(&defs, &samples)["max"], MetricValue::Float(11.46));
    }

    #[test]
    fn test_stdev_sample_deviation() {
        let defs = vec![def("sd", AggregationKind::Stdev, "x:*", "Busy")];
        let samples = vec![
            sample("x:1", "Busy", "2"),
            sample("x:2", "Busy", "4"),
            sample("x:3", "Busy", "4"),
            sample("x:4", "Busy", "4"),
            sample("x:5", "Busy", "5"),
            sample("x:6", "Busy", "5"),
            sample("x:7", "Busy", "7"),
            sample("x:8", "Busy", "9"),
        ];
        // population sd is 2.0; the sample sd is sqrt(32 / 7)
        assert_eq!(map(&defs, &samples)["sd"], MetricValue::Float(2.14));
    }

    #[test]
    fn test_stdev_with_no_values_is_omitted() {
        let defs = vec![def("sd", AggregationKind::Stdev, "x:*", "Busy").with_filter("BUSY")];
        let samples = vec![sample("x:1", "Busy", "IDLE")];
        assert!(!map(&defs, &samples).contains_key("sd"));
    }

    #[test]
    fn test_bean_pattern_limits_candidates() {
        let defs = vec![def("depth", AggregationKind::Sum, "PeopleSoft:Type=Queue,*", "Depth")];
        let samples = vec![
            sample(QUEUE_BEAN, "Depth", "2"),
            sample(SERVER_BEAN, "Depth", "100"),
        ];
        assert_eq!(map(&defs, &samples)["depth"], MetricValue::Float(2.0));
    }

    fn load_inputs(health: MetricValue, server_count: &str) -> Vec<RawSample> {
        let health_raw = match health {
            MetricValue::Status(HealthStatus::Failed) => "HEALTH_FAILED",
            _ => "HEALTH_OK",
        };
        vec![
            sample("x:srv", "HealthState", health_raw),
            sample("x:srv", "ActivePct", "50.0"),
            sample(QUEUE_BEAN, "Depth", "2"),
            sample(QUEUE_BEAN, "Servers", server_count),
        ]
    }

    fn load_definitions() -> Vec<MetricDefinition> {
        vec![
            def("Health", AggregationKind::Class, "x:*", "HealthState"),
            def("appsrv.active_pct", AggregationKind::Class, "x:*", "ActivePct"),
            def("appsrv.queue.depth", AggregationKind::Sum, "PeopleSoft:*", "Depth"),
            def("appsrv.queue.server_count", AggregationKind::Sum, "PeopleSoft:*", "Servers"),
        ]
    }

    #[test]
    fn test_derived_load_metric() {
        let mapped = MetricAggregator::new().map_samples(
            &DomainType::App,
            &load_definitions(),
            &load_inputs(MetricValue::Status(HealthStatus::Ok), "4"),
        );
        assert_eq!(mapped["appsrv.load"], MetricValue::Float(50.5));
    }

    #[test]
    fn test_derived_load_skipped_when_health_failed() {
        let mapped = MetricAggregator::new().map_samples(
            &DomainType::App,
            &load_definitions(),
            &load_inputs(MetricValue::Status(HealthStatus::Failed), "4"),
        );
        assert!(!mapped.contains_key("appsrv.load"));
    }

    #[test]
    fn test_derived_load_skipped_for_zero_servers_or_other_types() {
        let aggregator = MetricAggregator::new();
        let inputs = load_inputs(MetricValue::Status(HealthStatus::Ok), "0");
        let mapped = aggregator.map_samples(&DomainType::App, &load_definitions(), &inputs);
        assert!(!mapped.contains_key("appsrv.load"));

        let inputs = load_inputs(MetricValue::Status(HealthStatus::Ok), "4");
        let mapped = aggregator.map_samples(&DomainType::Web, &load_definitions(), &inputs);
        assert!(!mapped.contains_key("appsrv.load"));
    }

    #[test]
    fn test_derived_load_skipped_when_input_not_numeric() {
        let mut inputs = load_inputs(MetricValue::Status(HealthStatus::Ok), "4");
        inputs[1] = sample("x:srv", "ActivePct", "unknown");
        let mapped =
            MetricAggregator::new().map_samples(&DomainType::App, &load_definitions(), &inputs);
        assert!(!mapped.contains_key("appsrv.load"));
    }

    #[test]
    fn test_map_reply_rejects_malformed_payload() {
        let err = MetricAggregator::new()
            .map_reply(&DomainType::App, &load_definitions(), "{not: [valid")
            .unwrap_err();
        assert!(matches!(err, CollectorError::Mapping { .. }));
    }
}

use crate::collection::domain::RawSample;
use crate::shared::error::CollectorError;

/// Decodes the helper's query output: a YAML (or JSON) sequence of
/// `mBeanName` / `attribute` / `attributeType` / `value` records.
///
/// An empty reply decodes to no samples.
pub fn decode_reply(reply: &str) -> Result<Vec<RawSample>, CollectorError> {
    if reply.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yaml_ng::from_str::<Option<Vec<RawSample>>>(reply)
        .map(Option::unwrap_or_default)
        .map_err(|e| CollectorError::Mapping {
            details: e.to_string(),
        })
}

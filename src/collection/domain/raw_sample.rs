use serde::{Deserialize, Deserializer};

/// One bean/attribute/value triple as reported by the helper's query adapter
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawSample {
    #[serde(rename = "mBeanName")]
    pub bean_name: String,
    pub attribute: String,
    #[serde(rename = "attributeType", default)]
    pub attribute_type: String,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub value: String,
}

impl RawSample {
    pub fn new(
        bean_name: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            bean_name: bean_name.into(),
            attribute: attribute.into(),
            attribute_type: String::new(),
            value: value.into(),
        }
    }
}

/// Keeps the reply's raw text regardless of how YAML would type the scalar.
fn scalar_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_yaml_ng::Value;

    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s,
        other => serde_yaml_ng::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    })
}

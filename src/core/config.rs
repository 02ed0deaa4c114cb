use super::error::{NodeError, NodeResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Read-only settings supplied once at initialization.
///
/// Absent keys mean "use the node's default". Present but malformed values are
/// surfaced as [`NodeError::Configuration`] instead of being silently replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigurationMap {
    entries: HashMap<String, String>,
}

impl ConfigurationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from a JSON object. Non-string scalars are stringified,
    /// `null` entries are treated as absent.
    pub fn from_json(config: &Value) -> NodeResult<Self> {
        let mut entries = HashMap::new();

        match config {
            Value::Null => {}
            Value::Object(object) => {
                for (key, value) in object {
                    let value = match value {
                        Value::Null => continue,
                        Value::String(s) => s.clone(),
                        Value::Bool(_) | Value::Number(_) => value.to_string(),
                        _ => {
                            return Err(NodeError::configuration(
                                key.as_str(),
                                "nested values are not supported",
                            ))
                        }
                    };
                    entries.insert(key.clone(), value);
                }
            }
            _ => {
                return Err(NodeError::configuration(
                    "<root>",
                    "configuration must be a JSON object",
                ))
            }
        }

        Ok(Self { entries })
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Parses `key` when present, otherwise returns `default`.
    pub fn parse_or<T>(&self, key: &str, default: T) -> NodeResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e: T::Err| NodeError::configuration(key, format!("`{}`: {}", raw, e))),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<HashMap<String, String>> for ConfigurationMap {
    fn from(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

impl<K, V> FromIterator<(K, V)> for ConfigurationMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Description of one node instance: which registered node to load and how to
/// configure it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: String,
    pub node: String,
    #[serde(default)]
    pub configuration: Value,
}

impl NodeDescriptor {
    pub fn new(id: impl Into<String>, node: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node: node.into(),
            configuration: Value::Null,
        }
    }

    pub fn with_configuration(mut self, configuration: Value) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn from_json(config: Value) -> NodeResult<Self> {
        Ok(serde_json::from_value(config)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> NodeResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn configuration_map(&self) -> NodeResult<ConfigurationMap> {
        ConfigurationMap::from_json(&self.configuration)
    }
}

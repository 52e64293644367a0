use std::fmt;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::errors::ConfigurationError;

const TYPE_KEY: &str = "Type";
const ACTION_KEY: &str = "Action";

/// What the generator does with a configured field.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum FieldAction {
    /// Copy the seed value unchanged.
    #[serde(alias = "preserve")]
    Preserve,
    /// Produce a structurally similar but different value from the seed.
    #[serde(alias = "anonymize")]
    Anonymize,
    /// Produce a fresh value, ignoring the seed.
    #[default]
    #[serde(alias = "randomize")]
    Randomize,
    /// Copy the generated value of another field.
    #[serde(alias = "link")]
    Link,
}

/// Declared value type of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FieldType {
    #[default]
    String,
    Int,
    Long,
    Double,
    Bool,
    Datetime,
    Guid,
    Array,
    /// Type name that no generator understands.
    Unknown(String),
}

impl FieldType {
    /// Parse a type name; matching is case-insensitive and never fails.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "string" | "text" => FieldType::String,
            "int" | "integer" => FieldType::Int,
            "long" => FieldType::Long,
            "double" | "float" | "decimal" => FieldType::Double,
            "bool" | "boolean" => FieldType::Bool,
            "datetime" | "date" => FieldType::Datetime,
            "guid" | "uuid" => FieldType::Guid,
            "array" => FieldType::Array,
            _ => FieldType::Unknown(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Long => "long",
            FieldType::Double => "double",
            FieldType::Bool => "bool",
            FieldType::Datetime => "datetime",
            FieldType::Guid => "guid",
            FieldType::Array => "array",
            FieldType::Unknown(name) => name.as_str(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(FieldType::parse(&name))
    }
}

/// Leaf node of a configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldConfig {
    /// Value type; defaults to `string`.
    #[serde(rename = "Type", default)]
    #[schemars(with = "String")]
    pub field_type: FieldType,
    /// Generation action; defaults to `Randomize`.
    #[serde(rename = "Action", default)]
    pub action: FieldAction,
    /// Dotted path of the field a `Link` copies from.
    #[serde(rename = "LinkTo", default, skip_serializing_if = "Option::is_none")]
    pub link_to: Option<String>,
    /// Number of elements generated for array fields.
    #[serde(rename = "ArrayCount", default, skip_serializing_if = "Option::is_none")]
    pub array_count: Option<usize>,
    /// Element type of a simple (scalar-item) array.
    #[serde(rename = "ItemType", default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub item_type: Option<FieldType>,
    /// Element action of a simple (scalar-item) array.
    #[serde(rename = "ItemAction", default, skip_serializing_if = "Option::is_none")]
    pub item_action: Option<FieldAction>,
    /// Shape of each element of a structured array.
    #[serde(
        rename = "ItemStructure",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub item_structure: Option<Configuration>,
}

impl FieldConfig {
    pub fn new(field_type: FieldType, action: FieldAction) -> Self {
        Self {
            field_type,
            action,
            ..Self::default()
        }
    }

    /// Link field copying the value at `target`.
    pub fn link(target: impl Into<String>) -> Self {
        Self {
            action: FieldAction::Link,
            link_to: Some(target.into()),
            ..Self::default()
        }
    }

    /// Array of scalar items.
    pub fn simple_array(item_type: FieldType, item_action: FieldAction, count: usize) -> Self {
        Self {
            field_type: FieldType::Array,
            array_count: Some(count),
            item_type: Some(item_type),
            item_action: Some(item_action),
            ..Self::default()
        }
    }

    /// Array whose elements follow `structure`.
    pub fn structured_array(structure: Configuration, count: usize) -> Self {
        Self {
            field_type: FieldType::Array,
            array_count: Some(count),
            item_structure: Some(structure),
            ..Self::default()
        }
    }

    pub fn is_link(&self) -> bool {
        self.action == FieldAction::Link
    }

    /// Copy of this field with `Randomize` in place of its action.
    pub fn randomized(&self) -> Self {
        Self {
            action: FieldAction::Randomize,
            link_to: None,
            ..self.clone()
        }
    }
}

/// Node of a configuration tree: a configured field or a group of children.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum ConfigNode {
    Field(FieldConfig),
    Group(Configuration),
}

impl<'de> Deserialize<'de> for ConfigNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        let is_field = map.contains_key(TYPE_KEY) || map.contains_key(ACTION_KEY);
        let value = Value::Object(map);
        if is_field {
            serde_json::from_value(value)
                .map(ConfigNode::Field)
                .map_err(D::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(ConfigNode::Group)
                .map_err(D::Error::custom)
        }
    }
}

impl From<FieldConfig> for ConfigNode {
    fn from(field: FieldConfig) -> Self {
        ConfigNode::Field(field)
    }
}

impl From<Configuration> for ConfigNode {
    fn from(group: Configuration) -> Self {
        ConfigNode::Group(group)
    }
}

/// Ordered tree of field configurations, authored independently of any sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Configuration {
    fields: IndexMap<String, ConfigNode>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from an already parsed document.
    pub fn from_value(value: Value) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Builder-style insert that keeps declaration order.
    pub fn with(mut self, name: impl Into<String>, node: impl Into<ConfigNode>) -> Self {
        self.insert(name, node);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, node: impl Into<ConfigNode>) {
        self.fields.insert(name.into(), node.into());
    }

    pub fn get(&self, name: &str) -> Option<&ConfigNode> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigNode)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Find the node declared at a dotted path below this configuration.
    ///
    /// Groups are entered by name; a structured array is entered through its
    /// item structure.
    pub fn lookup(&self, path: &str) -> Option<&ConfigNode> {
        let mut segments = path.split('.').filter(|segment| !segment.is_empty());
        let mut node = self.get(segments.next()?)?;
        for segment in segments {
            let children = match node {
                ConfigNode::Group(group) => group,
                ConfigNode::Field(field) => field.item_structure.as_ref()?,
            };
            node = children.get(segment)?;
        }
        Some(node)
    }
}

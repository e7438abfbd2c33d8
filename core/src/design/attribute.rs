#![deny(missing_docs)]

//! # Attributes
//!
//! Typed, possibly nested field collections. The same structure describes
//! payloads, path and query parameters, headers and media type bodies.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, BTreeSet};

/// Object fields indexed by name, in declaration order.
pub type Object = IndexMap<String, AttributeDefinition>;

/// Free-form key/value metadata attached to definitions.
pub type Metadata = BTreeMap<String, Vec<String>>;

/// The type of an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// `true` / `false`.
    Boolean,
    /// Signed integer.
    Integer,
    /// Floating point number.
    Number,
    /// UTF-8 string.
    String,
    /// RFC 3339 timestamp.
    DateTime,
    /// RFC 4122 UUID.
    Uuid,
    /// Any JSON value.
    Any,
    /// Homogeneous list.
    Array(Box<AttributeDefinition>),
    /// Map with typed keys and values.
    Hash {
        /// Key attribute.
        key: Box<AttributeDefinition>,
        /// Value attribute.
        elem: Box<AttributeDefinition>,
    },
    /// Named fields.
    Object(Object),
    /// Reference to a user type, by type name.
    UserType(String),
    /// Reference to a media type, by identifier.
    MediaType(String),
}

impl Default for DataType {
    fn default() -> Self {
        DataType::Object(Object::new())
    }
}

impl DataType {
    /// Name of the type as used in messages and generated documentation.
    pub fn name(&self) -> &str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Integer => "integer",
            DataType::Number => "number",
            DataType::String => "string",
            DataType::DateTime => "datetime",
            DataType::Uuid => "uuid",
            DataType::Any => "any",
            DataType::Array(_) => "array",
            DataType::Hash { .. } => "hash",
            DataType::Object(_) => "object",
            DataType::UserType(name) => name,
            DataType::MediaType(id) => id,
        }
    }

    /// Whether the type is a primitive (non-composite, non-reference) type.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            DataType::Boolean
                | DataType::Integer
                | DataType::Number
                | DataType::String
                | DataType::DateTime
                | DataType::Uuid
                | DataType::Any
        )
    }
}

/// Validation rules attached to an attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationDefinition {
    /// Allowed values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<JsonValue>,
    /// Well-known string format (`email`, `uri`, `date-time`, `uuid`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Regular expression the value must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Inclusive lower bound for numbers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Inclusive upper bound for numbers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Minimum length of strings and arrays.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum length of strings and arrays.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Names of required object fields.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// A typed field node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeDefinition {
    /// Attribute type.
    #[serde(rename = "type")]
    pub data_type: DataType,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Validation rules, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationDefinition>,
    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<JsonValue>,
    /// Example value, used verbatim by example generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<JsonValue>,
    /// Names of child attributes that can never be empty (path parameters).
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub non_zero_attributes: BTreeSet<String>,
    /// Metadata.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl AttributeDefinition {
    /// Creates an attribute of the given type.
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            ..Self::default()
        }
    }

    /// Creates an empty object attribute.
    pub fn object_type() -> Self {
        Self::new(DataType::Object(Object::new()))
    }

    /// Creates a string attribute.
    pub fn string() -> Self {
        Self::new(DataType::String)
    }

    /// Adds (or replaces) a child field. Turns the attribute into an object
    /// if it was not one already.
    pub fn with_field(mut self, name: impl Into<String>, att: AttributeDefinition) -> Self {
        self.ensure_object().insert(name.into(), att);
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the validation rules.
    pub fn with_validation(mut self, validation: ValidationDefinition) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Sets the example value.
    pub fn with_example(mut self, example: JsonValue) -> Self {
        self.example = Some(example);
        self
    }

    /// Marks a child field as required.
    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        self.validation
            .get_or_insert_with(ValidationDefinition::default)
            .required
            .push(name.into());
        self
    }

    /// Returns the child fields if the attribute is an object.
    pub fn object(&self) -> Option<&Object> {
        match &self.data_type {
            DataType::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the child fields mutably if the attribute is an object.
    pub fn object_mut(&mut self) -> Option<&mut Object> {
        match &mut self.data_type {
            DataType::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the child fields, replacing a non-object type by an empty object.
    pub fn ensure_object(&mut self) -> &mut Object {
        match self.data_type {
            DataType::Object(ref mut o) => o,
            _ => {
                self.data_type = DataType::Object(Object::new());
                self.ensure_object()
            }
        }
    }

    /// Returns the named child field.
    pub fn field(&self, name: &str) -> Option<&AttributeDefinition> {
        self.object().and_then(|o| o.get(name))
    }

    /// Names of the child fields in declaration order.
    pub fn field_names(&self) -> Vec<String> {
        self.object()
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns a deep copy of the attribute.
    pub fn dup(&self) -> Self {
        self.clone()
    }

    /// Adds the fields of `other` that the receiver does not define.
    /// Fields already present on the receiver are kept as is. Required names
    /// are unioned. A non-object `other` leaves the receiver untouched.
    pub fn merge(mut self, other: Option<&AttributeDefinition>) -> Self {
        let Some(other) = other else {
            return self;
        };
        let Some(other_fields) = other.object() else {
            return self;
        };
        let fields = self.ensure_object();
        for (name, att) in other_fields {
            if !fields.contains_key(name) {
                fields.insert(name.clone(), att.clone());
            }
        }
        if let Some(other_validation) = &other.validation {
            let validation = self
                .validation
                .get_or_insert_with(ValidationDefinition::default);
            for name in &other_validation.required {
                if !validation.required.contains(name) {
                    validation.required.push(name.clone());
                }
            }
        }
        self
    }

    /// Whether the named child field is required.
    pub fn is_required(&self, name: &str) -> bool {
        self.validation
            .as_ref()
            .is_some_and(|v| v.required.iter().any(|r| r == name))
    }

    /// Whether the named child field can never be empty.
    pub fn is_non_zero(&self, name: &str) -> bool {
        self.non_zero_attributes.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_receiver_fields() {
        let base = AttributeDefinition::object_type()
            .with_field("id", AttributeDefinition::new(DataType::Integer));
        let other = AttributeDefinition::object_type()
            .with_field("id", AttributeDefinition::string())
            .with_field("page", AttributeDefinition::new(DataType::Integer))
            .with_required("page");

        let merged = base.merge(Some(&other));
        assert_eq!(merged.field_names(), vec!["id", "page"]);
        assert_eq!(merged.field("id").unwrap().data_type, DataType::Integer);
        assert!(merged.is_required("page"));
    }

    #[test]
    fn test_merge_none_is_noop() {
        let base = AttributeDefinition::object_type().with_field("a", AttributeDefinition::string());
        assert_eq!(base.clone().merge(None), base);
    }

    #[test]
    fn test_ensure_object_replaces_primitive() {
        let mut att = AttributeDefinition::string();
        att.ensure_object()
            .insert("x".into(), AttributeDefinition::string());
        assert_eq!(att.field_names(), vec!["x"]);

        // an existing object keeps its fields
        att.ensure_object()
            .insert("y".into(), AttributeDefinition::string());
        assert_eq!(att.field_names(), vec!["x", "y"]);
    }

    #[test]
    fn test_is_primitive() {
        assert!(DataType::String.is_primitive());
        assert!(DataType::Uuid.is_primitive());
        assert!(DataType::Any.is_primitive());
        assert!(!DataType::Object(Object::new()).is_primitive());
        assert!(!DataType::Array(Box::new(AttributeDefinition::string())).is_primitive());
        assert!(!DataType::UserType("Bottle".into()).is_primitive());
        assert!(!DataType::MediaType("application/vnd.bottle".into()).is_primitive());
    }

    #[test]
    fn test_deserialize_nested_object() {
        let yaml = r#"
type:
  object:
    id: { type: integer }
    tags:
      type:
        array: { type: string }
"#;
        let att: AttributeDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(att.field_names(), vec!["id", "tags"]);
        match &att.field("tags").unwrap().data_type {
            DataType::Array(elem) => assert_eq!(elem.data_type, DataType::String),
            other => panic!("unexpected type {:?}", other),
        }
    }
}

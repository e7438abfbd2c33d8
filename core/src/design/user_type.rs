#![deny(missing_docs)]

//! # User Types
//!
//! Named attribute types declared by the design, referenced by name from
//! payloads, attributes and responses.

use crate::design::attribute::AttributeDefinition;
use serde::{Deserialize, Serialize};

/// A named, reusable type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserTypeDefinition {
    /// Type name, unique within the API.
    pub type_name: String,
    /// Type shape.
    pub attribute: AttributeDefinition,
    /// API versions exposing the type. Empty means unversioned.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub api_versions: Vec<String>,
}

impl UserTypeDefinition {
    /// Creates a user type.
    pub fn new(type_name: impl Into<String>, attribute: AttributeDefinition) -> Self {
        Self {
            type_name: type_name.into(),
            attribute,
            api_versions: Vec::new(),
        }
    }

    /// Adds a version exposing the type.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.api_versions.push(version.into());
        self
    }

    /// Whether the type is exposed by the given version ("" means no version).
    pub fn supports_version(&self, version: &str) -> bool {
        supports_version(&self.api_versions, version)
    }

    /// Whether the type is exposed by unversioned APIs.
    pub fn supports_no_version(&self) -> bool {
        self.api_versions.is_empty()
    }

    /// Human readable name used in messages.
    pub fn context(&self) -> String {
        if self.type_name.is_empty() {
            "unnamed type".to_string()
        } else {
            format!("type {:?}", self.type_name)
        }
    }
}

/// Version support rule shared by resources, user types and media types:
/// an empty version matches definitions without explicit versions, any other
/// version must be listed.
pub(crate) fn supports_version(versions: &[String], version: &str) -> bool {
    if version.is_empty() {
        versions.is_empty()
    } else {
        versions.iter().any(|v| v == version)
    }
}

#![deny(missing_docs)]

//! # Version Scopes
//!
//! Per-version API defaults: base path and parameters, encodings, traits and
//! response templates. The API root embeds the default scope whose version
//! string is empty; it applies to unversioned definitions.

use crate::design::attribute::{AttributeDefinition, Metadata};
use crate::design::response::{
    standard_response_templates, ResponseDefinition, ResponseTemplateDefinition,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// MIME types used when a scope declares no encodings.
pub const DEFAULT_ENCODING_MIME_TYPES: [&str; 3] =
    ["application/json", "application/xml", "text/xml"];

/// A set of MIME types consumed or produced by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingDefinition {
    /// MIME types handled by the encoding.
    pub mime_types: Vec<String>,
}

impl EncodingDefinition {
    /// Creates an encoding for the given MIME types.
    pub fn new<I, S>(mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mime_types: mime_types.into_iter().map(Into::into).collect(),
        }
    }

    /// The encodings applied when none are declared.
    pub fn defaults() -> Vec<EncodingDefinition> {
        vec![EncodingDefinition::new(DEFAULT_ENCODING_MIME_TYPES)]
    }

    /// Human readable name used in messages.
    pub fn context(&self) -> String {
        format!("encoding for {}", self.mime_types.join(", "))
    }
}

/// API contact information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactDefinition {
    /// Contact person or organization.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact URL.
    pub url: String,
}

/// API license.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseDefinition {
    /// License name.
    pub name: String,
    /// License URL.
    pub url: String,
}

/// Pointer to external documentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsDefinition {
    /// Description of the documentation.
    pub description: String,
    /// Documentation URL.
    pub url: String,
}

/// A named, reusable fragment applied to resources or actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraitDefinition {
    /// Trait name.
    pub name: String,
    /// Parameters contributed by the trait.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<AttributeDefinition>,
    /// Request headers contributed by the trait.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<AttributeDefinition>,
    /// Responses contributed by the trait.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<String, ResponseDefinition>,
}

/// The defaults of one API version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionScope {
    /// API name.
    pub name: String,
    /// API title.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// API description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Version string, empty for the default scope.
    pub version: String,
    /// API hostname.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
    /// URL schemes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
    /// Common base path of all actions.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_path: String,
    /// Parameters appearing in the base path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_params: Option<AttributeDefinition>,
    /// Encodings accepted in request bodies.
    pub consumes: Vec<EncodingDefinition>,
    /// Encodings used in response bodies.
    pub produces: Vec<EncodingDefinition>,
    /// Terms of service.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub terms_of_service: String,
    /// Contact information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactDefinition>,
    /// License.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseDefinition>,
    /// External documentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<DocsDefinition>,
    /// Traits indexed by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub traits: BTreeMap<String, TraitDefinition>,
    /// Responses available to all actions, indexed by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<String, ResponseDefinition>,
    /// Response templates indexed by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub response_templates: BTreeMap<String, ResponseTemplateDefinition>,
    /// Metadata.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl VersionScope {
    /// Creates the scope of a named version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    /// Sets the base path.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Adds a base parameter.
    pub fn with_base_param(mut self, name: impl Into<String>, att: AttributeDefinition) -> Self {
        self.base_params
            .get_or_insert_with(AttributeDefinition::object_type)
            .ensure_object()
            .insert(name.into(), att);
        self
    }

    /// Adds a response available to all actions of the scope.
    pub fn with_response(mut self, response: ResponseDefinition) -> Self {
        self.responses.insert(response.name.clone(), response);
        self
    }

    /// Adds a trait.
    pub fn with_trait(mut self, t: TraitDefinition) -> Self {
        self.traits.insert(t.name.clone(), t);
        self
    }

    /// Whether the scope is the default (unversioned) one.
    pub fn is_default(&self) -> bool {
        self.version.is_empty()
    }

    /// Sets consumes and produces to the default encodings when empty.
    pub fn finalize(&mut self) {
        if self.consumes.is_empty() {
            self.consumes = EncodingDefinition::defaults();
        }
        if self.produces.is_empty() {
            self.produces = EncodingDefinition::defaults();
        }
    }

    /// Looks up a response template, falling back to the built-in ones.
    pub fn response_template(&self, name: &str) -> Option<&ResponseTemplateDefinition> {
        self.response_templates
            .get(name)
            .or_else(|| standard_response_templates().get(name))
    }

    /// Iterates the scope responses in name order.
    pub fn responses(&self) -> impl Iterator<Item = &ResponseDefinition> {
        self.responses.values()
    }

    /// Calls `it` on each response in name order, stopping at the first error.
    pub fn iterate_responses<E, F>(&self, it: F) -> Result<(), E>
    where
        F: FnMut(&ResponseDefinition) -> Result<(), E>,
    {
        self.responses().try_for_each(it)
    }

    /// Human readable name used in messages.
    pub fn context(&self) -> String {
        let api = if self.name.is_empty() {
            "unnamed API".to_string()
        } else {
            format!("API {:?}", self.name)
        };
        if self.version.is_empty() {
            api
        } else {
            format!("{} version {}", api, self.version)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_sets_default_encodings() {
        let mut scope = VersionScope::new("1.0");
        scope.produces = vec![EncodingDefinition::new(["application/msgpack"])];
        scope.finalize();
        assert_eq!(scope.consumes, EncodingDefinition::defaults());
        assert_eq!(scope.produces[0].mime_types, vec!["application/msgpack"]);
    }

    #[test]
    fn test_response_template_fallback() {
        let mut scope = VersionScope::default();
        assert!(scope.response_template("OK").is_some());
        scope.response_templates.insert(
            "OK".into(),
            ResponseTemplateDefinition::new("OK", ResponseDefinition::new("OK", 299)),
        );
        assert_eq!(scope.response_template("OK").unwrap().response.status, 299);
        assert!(scope.response_template("Nope").is_none());
    }

    #[test]
    fn test_iterate_responses_fail_fast() {
        let scope = VersionScope::default()
            .with_response(ResponseDefinition::new("NotFound", 404))
            .with_response(ResponseDefinition::new("BadRequest", 400))
            .with_response(ResponseDefinition::new("OK", 200));
        let mut seen = Vec::new();
        let res = scope.iterate_responses(|r| {
            seen.push(r.name.clone());
            if r.name == "NotFound" {
                Err("stop")
            } else {
                Ok(())
            }
        });
        assert_eq!(res, Err("stop"));
        assert_eq!(seen, vec!["BadRequest", "NotFound"]);
    }

    #[test]
    fn test_context() {
        let mut scope = VersionScope::new("2.0");
        scope.name = "cellar".into();
        assert_eq!(scope.context(), r#"API "cellar" version 2.0"#);
    }
}

#![deny(missing_docs)]

//! # Media Types
//!
//! Media type definitions and their canonical identifiers.
//!
//! The canonical identifier drops the `+suffix` encoding hint of the base
//! type and re-serializes the parameters in normalized form, so that
//! `application/vnd.foo+json`, `application/vnd.foo+xml` and
//! `application/vnd.foo` all denote the same representation.

use crate::design::attribute::{AttributeDefinition, DataType};
use crate::design::mime::parse_media_type;
use crate::design::user_type::{supports_version, UserTypeDefinition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Returns the canonical form of a media type identifier.
///
/// Identifiers that do not parse as MIME values are returned verbatim.
pub fn canonical_identifier(identifier: &str) -> String {
    let Some(mut value) = parse_media_type(identifier) else {
        return identifier.to_string();
    };
    if let Some(i) = value.base.find('+') {
        value.base.truncate(i);
    }
    value.format().unwrap_or_else(|| identifier.to_string())
}

/// A rendering of a media type: the subset of attributes it includes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewDefinition {
    /// View name.
    pub name: String,
    /// Names of the rendered attributes.
    pub attributes: Vec<String>,
}

/// A link to a related resource embedded in a media type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkDefinition {
    /// Name of the linked attribute.
    pub name: String,
    /// View used to render the link, `"link"` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
}

impl LinkDefinition {
    /// Name of the view used to render the link.
    pub fn view_name(&self) -> &str {
        self.view.as_deref().unwrap_or("link")
    }
}

/// A user type with an identifier, views and links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaTypeDefinition {
    /// Underlying type.
    #[serde(flatten)]
    pub user_type: UserTypeDefinition,
    /// MIME identifier as written by the design, e.g. `application/vnd.bottle+json`.
    pub identifier: String,
    /// Views indexed by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub views: BTreeMap<String, ViewDefinition>,
    /// Links indexed by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, LinkDefinition>,
}

impl MediaTypeDefinition {
    /// Creates a media type.
    pub fn new(
        identifier: impl Into<String>,
        type_name: impl Into<String>,
        attribute: AttributeDefinition,
    ) -> Self {
        Self {
            user_type: UserTypeDefinition::new(type_name, attribute),
            identifier: identifier.into(),
            views: BTreeMap::new(),
            links: BTreeMap::new(),
        }
    }

    /// Adds a view.
    pub fn with_view<I, S>(mut self, name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        self.views.insert(
            name.clone(),
            ViewDefinition {
                name,
                attributes: attributes.into_iter().map(Into::into).collect(),
            },
        );
        self
    }

    /// Adds a link.
    pub fn with_link(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.links.insert(
            name.clone(),
            LinkDefinition {
                name,
                view: None,
            },
        );
        self
    }

    /// Adds a version exposing the media type.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.user_type.api_versions.push(version.into());
        self
    }

    /// Type name of the media type.
    pub fn type_name(&self) -> &str {
        &self.user_type.type_name
    }

    /// Canonical identifier, see [`canonical_identifier`].
    pub fn canonical_identifier(&self) -> String {
        canonical_identifier(&self.identifier)
    }

    /// Whether the media type is exposed by the given version.
    pub fn supports_version(&self, version: &str) -> bool {
        supports_version(&self.user_type.api_versions, version)
    }

    /// Whether the media type is exposed by unversioned APIs.
    pub fn supports_no_version(&self) -> bool {
        self.user_type.api_versions.is_empty()
    }

    /// Derives the collection media type whose elements are `self`.
    ///
    /// The identifier gains the `type=collection` parameter, the type name
    /// the `Collection` suffix, and each element view is mirrored.
    pub fn collection(&self) -> MediaTypeDefinition {
        let identifier = match parse_media_type(&self.identifier) {
            Some(mut value) => {
                value
                    .params
                    .insert("type".to_string(), "collection".to_string());
                value
                    .format()
                    .unwrap_or_else(|| format!("{}; type=collection", self.identifier))
            }
            None => format!("{}; type=collection", self.identifier),
        };
        let elem = AttributeDefinition::new(DataType::MediaType(self.identifier.clone()));
        let mut collection = MediaTypeDefinition::new(
            identifier,
            format!("{}Collection", self.type_name()),
            AttributeDefinition::new(DataType::Array(Box::new(elem))),
        );
        collection.user_type.api_versions = self.user_type.api_versions.clone();
        for (name, view) in &self.views {
            collection.views.insert(
                name.clone(),
                ViewDefinition {
                    name: name.clone(),
                    attributes: view.attributes.clone(),
                },
            );
        }
        collection
    }

    /// Human readable name used in messages.
    pub fn context(&self) -> String {
        if self.identifier.is_empty() {
            "unidentified media type".to_string()
        } else {
            format!("media type {:?}", self.identifier)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_canonical_strips_suffix() {
        let plain = canonical_identifier("application/vnd.foo");
        assert_eq!(plain, "application/vnd.foo");
        assert_eq!(canonical_identifier("application/vnd.foo+json"), plain);
        assert_eq!(canonical_identifier("application/vnd.foo+xml"), plain);
    }

    #[test]
    fn test_canonical_normalizes_params() {
        assert_eq!(
            canonical_identifier("Application/Vnd.Foo+JSON;  View=Tiny ; type=collection"),
            "application/vnd.foo; type=collection; view=Tiny"
        );
    }

    #[test]
    fn test_canonical_degrades_to_verbatim() {
        assert_eq!(canonical_identifier("not a media type"), "not a media type");
        assert_eq!(canonical_identifier(""), "");
        assert_eq!(canonical_identifier("application/+json"), "application/+json");
    }

    #[test]
    fn test_collection_derivation() {
        let bottle = MediaTypeDefinition::new(
            "application/vnd.goa.bottle+json",
            "Bottle",
            AttributeDefinition::object_type(),
        )
        .with_view("default", ["id", "name"])
        .with_version("1.0");
        let coll = bottle.collection();
        assert_eq!(
            coll.identifier,
            "application/vnd.goa.bottle+json; type=collection"
        );
        assert_eq!(
            coll.canonical_identifier(),
            "application/vnd.goa.bottle; type=collection"
        );
        assert_eq!(coll.type_name(), "BottleCollection");
        assert_eq!(coll.views["default"].attributes, vec!["id", "name"]);
        assert!(coll.supports_version("1.0"));
        match &coll.user_type.attribute.data_type {
            DataType::Array(elem) => assert_eq!(
                elem.data_type,
                DataType::MediaType("application/vnd.goa.bottle+json".into())
            ),
            other => panic!("unexpected type {:?}", other),
        }
    }

    #[test]
    fn test_link_view_defaults_to_link() {
        let mut link = LinkDefinition {
            name: "account".into(),
            view: None,
        };
        assert_eq!(link.view_name(), "link");
        link.view = Some("tiny".into());
        assert_eq!(link.view_name(), "tiny");
    }

    proptest! {
        #[test]
        fn prop_canonical_idempotent(id in "[a-zA-Z./+ ;=\"-]{0,32}") {
            let once = canonical_identifier(&id);
            prop_assert_eq!(canonical_identifier(&once), once);
        }
    }
}

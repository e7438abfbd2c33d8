#![deny(missing_docs)]

//! # Resources
//!
//! A resource groups actions under a common base path. Nested resources name
//! their parent; the parent is looked up in the API root by name on every
//! access so declaration order never matters.

use crate::design::action::ActionDefinition;
use crate::design::api::ApiDefinition;
use crate::design::attribute::{AttributeDefinition, Metadata};
use crate::design::response::ResponseDefinition;
use crate::design::route::{clean_path, extract_wildcards, join_paths, RouteDefinition};
use crate::design::user_type::supports_version;
use crate::design::version::VersionScope;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Name of the canonical action when a resource does not set one.
pub const DEFAULT_CANONICAL_ACTION: &str = "show";

/// Media type of a resource that does not set one.
pub const DEFAULT_RESOURCE_MEDIA_TYPE: &str = "plain/text";

/// A REST resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceDefinition {
    /// Resource name, unique within the API.
    pub name: String,
    /// URL prefix common to all the resource actions.
    pub base_path: String,
    /// Parameters appearing in the base path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_params: Option<AttributeDefinition>,
    /// Name of the parent resource, if nested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// API versions exposing the resource. Empty means unversioned.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub api_versions: Vec<String>,
    /// Default media type identifier.
    pub media_type: String,
    /// Actions indexed by name.
    pub actions: BTreeMap<String, ActionDefinition>,
    /// Canonical action name, [`DEFAULT_CANONICAL_ACTION`] when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_action_name: Option<String>,
    /// Responses shared by all actions, indexed by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<String, ResponseDefinition>,
    /// Parameters shared by all actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<AttributeDefinition>,
    /// Request headers shared by all actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<AttributeDefinition>,
    /// Metadata.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl Default for ResourceDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_path: String::new(),
            base_params: None,
            parent_name: None,
            description: String::new(),
            api_versions: Vec::new(),
            media_type: DEFAULT_RESOURCE_MEDIA_TYPE.to_string(),
            actions: BTreeMap::new(),
            canonical_action_name: None,
            responses: BTreeMap::new(),
            params: None,
            headers: None,
            metadata: Metadata::new(),
        }
    }
}

impl ResourceDefinition {
    /// Creates an empty resource.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
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

    /// Sets the parent resource name.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_name = Some(parent.into());
        self
    }

    /// Adds a version exposing the resource.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.api_versions.push(version.into());
        self
    }

    /// Sets the default media type.
    pub fn with_media_type(mut self, identifier: impl Into<String>) -> Self {
        self.media_type = identifier.into();
        self
    }

    /// Sets the canonical action name.
    pub fn with_canonical_action(mut self, name: impl Into<String>) -> Self {
        self.canonical_action_name = Some(name.into());
        self
    }

    /// Adds (or replaces) an action.
    pub fn with_action(mut self, action: ActionDefinition) -> Self {
        self.actions.insert(action.name.clone(), action);
        self
    }

    /// Adds a response shared by all actions.
    pub fn with_response(mut self, response: ResponseDefinition) -> Self {
        self.responses.insert(response.name.clone(), response);
        self
    }

    /// Adds a request header shared by all actions.
    pub fn with_header(mut self, name: impl Into<String>, att: AttributeDefinition) -> Self {
        self.headers
            .get_or_insert_with(AttributeDefinition::object_type)
            .ensure_object()
            .insert(name.into(), att);
        self
    }

    /// Name of the canonical action.
    pub fn canonical_action_name(&self) -> &str {
        self.canonical_action_name
            .as_deref()
            .unwrap_or(DEFAULT_CANONICAL_ACTION)
    }

    /// The action used to compute hrefs to the resource, if any.
    pub fn canonical_action(&self) -> Option<&ActionDefinition> {
        self.actions.get(self.canonical_action_name())
    }

    /// First route of the canonical action, if any.
    pub fn canonical_route(&self) -> Option<&RouteDefinition> {
        self.canonical_action().and_then(|a| a.routes.first())
    }

    /// The parent resource, resolved by name against the API root.
    pub fn parent<'a>(&self, api: &'a ApiDefinition) -> Option<&'a ResourceDefinition> {
        self.parent_name
            .as_deref()
            .and_then(|name| api.resources.get(name))
    }

    /// Base path of the resource actions: the API (or parent canonical route)
    /// path joined with the resource base path.
    pub fn full_path(&self, api: &ApiDefinition, scope: &VersionScope) -> String {
        self.full_path_at(api, scope, 0)
    }

    pub(crate) fn full_path_at(
        &self,
        api: &ApiDefinition,
        scope: &VersionScope,
        depth: usize,
    ) -> String {
        let base = match self.parent(api) {
            Some(_) if depth > api.resources.len() => {
                warn!(resource = %self.name, "cyclic parent chain, ignoring parent path");
                String::new()
            }
            Some(parent) => match parent.canonical_route() {
                Some(route) => route.full_path_at(parent, api, scope, depth + 1),
                None => {
                    warn!(
                        resource = %self.name,
                        parent = %parent.name,
                        "parent has no canonical route"
                    );
                    String::new()
                }
            },
            None => {
                if let Some(name) = &self.parent_name {
                    warn!(resource = %self.name, parent = %name, "unknown parent resource");
                }
                scope.base_path.clone()
            }
        };
        clean_path(&join_paths(&[&base, &self.base_path]))
    }

    /// Full path of the canonical route, empty if there is none.
    pub fn uri_template(&self, api: &ApiDefinition, scope: &VersionScope) -> String {
        self.canonical_route()
            .map(|r| r.full_path(self, api, scope))
            .unwrap_or_default()
    }

    /// Wildcards of the canonical route, in order.
    pub fn canonical_params(&self, api: &ApiDefinition, scope: &VersionScope) -> Vec<String> {
        extract_wildcards(&self.uri_template(api, scope))
    }

    /// Whether the resource is exposed by the given version ("" means no version).
    pub fn supports_version(&self, version: &str) -> bool {
        supports_version(&self.api_versions, version)
    }

    /// Whether the resource is exposed by unversioned APIs.
    pub fn supports_no_version(&self) -> bool {
        self.api_versions.is_empty()
    }

    /// Actions in name order.
    pub fn actions(&self) -> impl Iterator<Item = &ActionDefinition> {
        self.actions.values()
    }

    /// Calls `it` on each action in name order, stopping at the first error.
    pub fn iterate_actions<E, F>(&self, it: F) -> Result<(), E>
    where
        F: FnMut(&ActionDefinition) -> Result<(), E>,
    {
        self.actions().try_for_each(it)
    }

    /// Human readable name used in messages.
    pub fn context(&self) -> String {
        if self.name.is_empty() {
            "unnamed resource".to_string()
        } else {
            format!("resource {:?}", self.name)
        }
    }
}

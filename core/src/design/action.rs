#![deny(missing_docs)]

//! # Actions
//!
//! One operation on a resource: its routes, parameters, payload, headers and
//! responses. The query parameter set is derived by finalization.

use crate::design::api::ApiDefinition;
use crate::design::attribute::{AttributeDefinition, Metadata};
use crate::design::resource::ResourceDefinition;
use crate::design::response::ResponseDefinition;
use crate::design::route::RouteDefinition;
use crate::design::version::{DocsDefinition, TraitDefinition, VersionScope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A resource action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionDefinition {
    /// Action name, e.g. "create".
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// External documentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<DocsDefinition>,
    /// Action specific URL schemes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
    /// Routes, in declaration order.
    pub routes: Vec<RouteDefinition>,
    /// Responses indexed by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<String, ResponseDefinition>,
    /// Path and query string parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<AttributeDefinition>,
    /// Query string parameters, computed by finalization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_params: Option<AttributeDefinition>,
    /// Request body user type name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Request headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<AttributeDefinition>,
    /// Names of the traits applied when the action is registered.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub traits: Vec<String>,
    /// Metadata.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl ActionDefinition {
    /// Creates an action without routes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a route.
    pub fn with_route(mut self, route: RouteDefinition) -> Self {
        self.routes.push(route);
        self
    }

    /// Adds (or replaces) a parameter.
    pub fn with_param(mut self, name: impl Into<String>, att: AttributeDefinition) -> Self {
        self.params
            .get_or_insert_with(AttributeDefinition::object_type)
            .ensure_object()
            .insert(name.into(), att);
        self
    }

    /// Sets the payload user type.
    pub fn with_payload(mut self, type_name: impl Into<String>) -> Self {
        self.payload = Some(type_name.into());
        self
    }

    /// Adds a request header.
    pub fn with_header(mut self, name: impl Into<String>, att: AttributeDefinition) -> Self {
        self.headers
            .get_or_insert_with(AttributeDefinition::object_type)
            .ensure_object()
            .insert(name.into(), att);
        self
    }

    /// Adds a response.
    pub fn with_response(mut self, response: ResponseDefinition) -> Self {
        self.responses.insert(response.name.clone(), response);
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Requests a trait by name, applied at registration time.
    pub fn with_trait(mut self, name: impl Into<String>) -> Self {
        self.traits.push(name.into());
        self
    }

    /// Merges the trait fragments into the action. Whatever the action
    /// already declares is kept.
    pub fn apply_trait(&mut self, t: &TraitDefinition) {
        if let Some(params) = &t.params {
            let current = self.params.take().unwrap_or_else(AttributeDefinition::object_type);
            self.params = Some(current.merge(Some(params)));
        }
        if let Some(headers) = &t.headers {
            let current = self.headers.take().unwrap_or_else(AttributeDefinition::object_type);
            self.headers = Some(current.merge(Some(headers)));
        }
        for (name, resp) in &t.responses {
            self.responses
                .entry(name.clone())
                .or_insert_with(|| resp.clone());
        }
    }

    /// Whether every route is absolute. Vacuously true without routes.
    pub fn has_absolute_routes(&self) -> bool {
        self.routes.iter().all(RouteDefinition::is_absolute)
    }

    /// Query string parameters, available after finalization.
    pub fn query_params(&self) -> Option<&AttributeDefinition> {
        self.query_params.as_ref()
    }

    /// Path and query parameters of the action, including the resource and
    /// API base parameters and the parent canonical action parameters,
    /// unless every route is absolute.
    pub fn all_params(&self, resource: &ResourceDefinition, api: &ApiDefinition) -> AttributeDefinition {
        self.all_params_at(resource, api, 0)
    }

    fn all_params_at(
        &self,
        resource: &ResourceDefinition,
        api: &ApiDefinition,
        depth: usize,
    ) -> AttributeDefinition {
        let res = self
            .params
            .clone()
            .unwrap_or_else(AttributeDefinition::object_type);
        if self.has_absolute_routes() {
            return res;
        }
        let mut res = res
            .merge(resource.base_params.as_ref())
            .merge(api.default_scope.base_params.as_ref());
        if depth <= api.resources.len() {
            if let Some(parent) = resource.parent(api) {
                if let Some(ca) = parent.canonical_action() {
                    res = res.merge(Some(&ca.all_params_at(parent, api, depth + 1)));
                }
            }
        }
        res
    }

    /// Path parameters of the action across all its routes under `scope`.
    pub fn path_params(
        &self,
        resource: &ResourceDefinition,
        api: &ApiDefinition,
        scope: &VersionScope,
    ) -> AttributeDefinition {
        self.path_params_at(resource, api, scope, 0)
    }

    fn path_params_at(
        &self,
        resource: &ResourceDefinition,
        api: &ApiDefinition,
        scope: &VersionScope,
        depth: usize,
    ) -> AttributeDefinition {
        let mut res = AttributeDefinition::object_type();
        let fields = res.ensure_object();
        for route in &self.routes {
            for name in route.params(resource, api, scope) {
                if fields.contains_key(&name) {
                    continue;
                }
                let att = self
                    .params
                    .as_ref()
                    .and_then(|p| p.field(&name))
                    .cloned()
                    .unwrap_or_else(AttributeDefinition::string);
                fields.insert(name, att);
            }
        }
        if self.has_absolute_routes() {
            return res;
        }
        res = res
            .merge(resource.base_params.as_ref())
            .merge(scope.base_params.as_ref())
            .merge(api.default_scope.base_params.as_ref());
        if depth <= api.resources.len() {
            if let Some(parent) = resource.parent(api) {
                if let Some(ca) = parent.canonical_action() {
                    res = res.merge(Some(&ca.path_params_at(parent, api, scope, depth + 1)));
                }
            }
        }
        res
    }

    /// Action responses completed with the resource responses the action
    /// does not declare itself.
    pub fn merged_responses(
        &self,
        resource: &ResourceDefinition,
    ) -> BTreeMap<String, ResponseDefinition> {
        let mut merged = resource.responses.clone();
        for (name, resp) in &self.responses {
            merged.insert(name.clone(), resp.clone());
        }
        merged
    }

    /// Resource request headers completed with the action headers.
    pub fn merged_headers(&self, resource: &ResourceDefinition) -> Option<AttributeDefinition> {
        match (&resource.headers, &self.headers) {
            (None, None) => None,
            (Some(r), a) => Some(r.clone().merge(a.as_ref())),
            (None, Some(a)) => Some(a.clone()),
        }
    }

    /// Human readable name used in messages.
    pub fn context(&self, resource: &ResourceDefinition) -> String {
        let action = if self.name.is_empty() {
            "unnamed action".to_string()
        } else {
            format!("action {:?}", self.name)
        };
        format!("{} {}", resource.context(), action)
    }
}

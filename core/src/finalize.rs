#![deny(missing_docs)]

//! # Finalization
//!
//! The one-time derivation pass run after the design is fully built.
//!
//! For every action, in resource then action name order:
//! 1. Each response the action declares is completed from the same-named
//!    response of the resource, then of the API root, then of the standard
//!    catalog. Each step only fills fields left empty by the previous ones.
//! 2. Every wildcard of every route, under every version scope, that the
//!    action does not declare becomes a string parameter.
//! 3. Wildcard names are marked non-zero on the parameters and removed from
//!    a copy of them; the copy becomes the query parameters.
//!
//! Finalization consumes the [`ApiDefinition`] and returns a [`FinalizedApi`]
//! which only hands out shared references.

use crate::design::action::ActionDefinition;
use crate::design::api::ApiDefinition;
use crate::design::attribute::AttributeDefinition;
use crate::design::response::{standard_responses, ResponseDefinition};
use crate::error::AppResult;
use crate::example::RandomGenerator;
use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::{debug, trace};

/// Wildcard names of each action, keyed by (resource name, action name).
type WildcardPlan = BTreeMap<(String, String), Vec<String>>;

/// Runs the finalization pass over `api`.
pub fn finalize(mut api: ApiDefinition) -> FinalizedApi {
    debug!(
        api = %api.name(),
        resources = api.resources.len(),
        versions = api.versions.len(),
        "finalizing design"
    );
    api.fold_generated_media_types();
    api.default_scope.finalize();
    for scope in api.versions.values_mut() {
        scope.finalize();
    }

    let plan = plan_wildcards(&api);
    let mut action_count = 0usize;
    let ApiDefinition {
        resources,
        default_scope,
        ..
    } = &mut api;
    for resource in resources.values_mut() {
        for action in resource.actions.values_mut() {
            merge_responses(
                &resource.name,
                action,
                &resource.responses,
                &default_scope.responses,
            );
            let key = (resource.name.clone(), action.name.clone());
            let wildcards = plan.get(&key).map(Vec::as_slice).unwrap_or_default();
            synthesize_params(&resource.name, action, wildcards);
            partition_params(action, wildcards);
            action_count += 1;
        }
    }

    debug!(api = %api.name(), actions = action_count, "design finalized");
    FinalizedApi::new(api)
}

/// Collects, per action, the wildcards of all its routes under all scopes,
/// default scope first. Route order wins, duplicates keep their first slot.
fn plan_wildcards(api: &ApiDefinition) -> WildcardPlan {
    let mut plan = WildcardPlan::new();
    for resource in api.resources() {
        for action in resource.actions() {
            let mut names: Vec<String> = Vec::new();
            for route in &action.routes {
                for scope in api.scopes() {
                    for wc in route.params(resource, api, scope) {
                        if !names.contains(&wc) {
                            names.push(wc);
                        }
                    }
                }
            }
            plan.insert((resource.name.clone(), action.name.clone()), names);
        }
    }
    plan
}

fn merge_responses(
    resource: &str,
    action: &mut ActionDefinition,
    resource_responses: &BTreeMap<String, ResponseDefinition>,
    api_responses: &BTreeMap<String, ResponseDefinition>,
) {
    for (name, resp) in action.responses.iter_mut() {
        let sources = [
            ("resource", resource_responses.get(name)),
            ("api", api_responses.get(name)),
            ("standard", standard_responses().get(name)),
        ];
        for (origin, source) in sources {
            if let Some(source) = source {
                trace!(resource, action = %action.name, response = %name, origin, "merging response");
                resp.merge(source);
            }
        }
    }
}

fn synthesize_params(resource: &str, action: &mut ActionDefinition, wildcards: &[String]) {
    if wildcards.is_empty() {
        return;
    }
    let fields = action
        .params
        .get_or_insert_with(AttributeDefinition::object_type)
        .ensure_object();
    for wc in wildcards {
        if !fields.contains_key(wc) {
            debug!(resource, action = %action.name, param = %wc, "adding implicit path parameter");
            fields.insert(wc.clone(), AttributeDefinition::string());
        }
    }
}

/// A name that is a wildcard under any scope is a path parameter, even if
/// another scope's route lacks it.
fn partition_params(action: &mut ActionDefinition, wildcards: &[String]) {
    let Some(params) = action.params.as_mut() else {
        return;
    };
    let mut query = params.dup();
    params.non_zero_attributes.clear();
    for wc in wildcards {
        params.non_zero_attributes.insert(wc.clone());
        if let Some(fields) = query.object_mut() {
            fields.shift_remove(wc);
        }
    }
    action.query_params = Some(query);
}

/// A finalized, read-only API definition.
#[derive(Debug)]
pub struct FinalizedApi {
    api: ApiDefinition,
    rand: OnceLock<Mutex<RandomGenerator>>,
}

impl FinalizedApi {
    fn new(api: ApiDefinition) -> Self {
        Self {
            api,
            rand: OnceLock::new(),
        }
    }

    /// The underlying definition.
    pub fn api(&self) -> &ApiDefinition {
        &self.api
    }

    /// Example generator seeded from the API name, created on first use.
    pub fn random_generator(&self) -> &Mutex<RandomGenerator> {
        self.rand
            .get_or_init(|| Mutex::new(RandomGenerator::new(self.api.name())))
    }

    /// Generates an example value for `att`.
    pub fn generate_example(&self, att: &AttributeDefinition) -> serde_json::Value {
        let mut rand = self
            .random_generator()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        rand.generate(att, &self.api)
    }

    /// Serializes the finalized design. Maps are emitted in key order.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&self.api)?)
    }

    /// Serializes the finalized design as a JSON value.
    pub fn to_json_value(&self) -> AppResult<serde_json::Value> {
        Ok(serde_json::to_value(&self.api)?)
    }
}

impl Deref for FinalizedApi {
    type Target = ApiDefinition;

    fn deref(&self) -> &ApiDefinition {
        &self.api
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::attribute::DataType;
    use crate::design::resource::ResourceDefinition;
    use crate::design::route::RouteDefinition;
    use crate::design::version::{EncodingDefinition, VersionScope};
    use pretty_assertions::assert_eq;

    fn widgets_api() -> ApiDefinition {
        let mut api = ApiDefinition::new("shop");
        api.add_resource(
            ResourceDefinition::new("widgets")
                .with_base_path("/widgets")
                .with_action(
                    ActionDefinition::new("show")
                        .with_route(RouteDefinition::get("/:id"))
                        .with_param("view", AttributeDefinition::string()),
                )
                .with_action(ActionDefinition::new("list").with_route(RouteDefinition::get(""))),
        )
        .unwrap();
        api
    }

    #[test]
    fn test_implicit_path_param() {
        let api = widgets_api().finalize();
        let widgets = &api.resources["widgets"];
        let show = &widgets.actions["show"];
        let params = show.params.as_ref().unwrap();
        assert_eq!(params.field_names(), vec!["view", "id"]);
        assert_eq!(params.field("id").unwrap().data_type, DataType::String);
        assert!(params.is_non_zero("id"));
        assert!(!params.is_non_zero("view"));
        assert_eq!(show.query_params().unwrap().field_names(), vec!["view"]);
    }

    #[test]
    fn test_action_without_params_or_wildcards() {
        let api = widgets_api().finalize();
        let list = &api.resources["widgets"].actions["list"];
        assert!(list.params.is_none());
        assert!(list.query_params().is_none());
    }

    #[test]
    fn test_response_priority_chain() {
        let mut api = ApiDefinition::new("shop");
        api.add_response(
            ResponseDefinition::new("OK", 200)
                .with_description("global ok")
                .with_media_type("application/json"),
        )
        .unwrap();
        api.add_resource(
            ResourceDefinition::new("widgets")
                .with_response(ResponseDefinition::new("OK", 0).with_description("resource ok"))
                .with_action(
                    ActionDefinition::new("show")
                        .with_route(RouteDefinition::get("/:id"))
                        .with_response(ResponseDefinition::new("OK", 0))
                        .with_response(ResponseDefinition::new("NotFound", 0)),
                ),
        )
        .unwrap();
        let api = api.finalize();
        let show = &api.resources["widgets"].actions["show"];
        let ok = &show.responses["OK"];
        assert_eq!(ok.name, "OK");
        assert_eq!(ok.status, 200);
        assert_eq!(ok.description, "resource ok");
        assert_eq!(ok.media_type, "application/json");
        assert_eq!(show.responses["NotFound"].status, 404);
    }

    #[test]
    fn test_wildcards_from_every_version() {
        let mut api = ApiDefinition::new("shop");
        api.add_version(
            VersionScope::new("2.0")
                .with_base_path("/:tenant")
                .with_base_param("tenant", AttributeDefinition::string()),
        )
        .unwrap();
        api.add_resource(
            ResourceDefinition::new("widgets")
                .with_base_path("/widgets")
                .with_action(
                    ActionDefinition::new("show")
                        .with_route(RouteDefinition::get("/:id"))
                        .with_param("id", AttributeDefinition::new(DataType::Integer))
                        .with_param("tenant", AttributeDefinition::string()),
                ),
        )
        .unwrap();
        let api = api.finalize();
        let show = &api.resources["widgets"].actions["show"];
        let params = show.params.as_ref().unwrap();
        assert_eq!(params.field("id").unwrap().data_type, DataType::Integer);
        assert!(params.is_non_zero("tenant"));
        assert!(params.is_non_zero("id"));
        assert!(show.query_params().unwrap().field_names().is_empty());
    }

    #[test]
    fn test_scopes_get_default_encodings() {
        let mut api = ApiDefinition::new("shop");
        api.add_version(VersionScope::new("1.0")).unwrap();
        let api = api.finalize();
        assert_eq!(api.default_scope.consumes, EncodingDefinition::defaults());
        assert_eq!(api.versions["1.0"].produces, EncodingDefinition::defaults());
    }

    #[test]
    fn test_examples_are_stable() {
        let att = AttributeDefinition::object_type()
            .with_field("id", AttributeDefinition::new(DataType::Integer))
            .with_field("sku", AttributeDefinition::string());
        let a = widgets_api().finalize();
        let b = widgets_api().finalize();
        assert_eq!(a.generate_example(&att), b.generate_example(&att));
    }

    #[test]
    fn test_to_json_is_deterministic() {
        let a = widgets_api().finalize().to_json().unwrap();
        let b = widgets_api().finalize().to_json().unwrap();
        assert_eq!(a, b);
        let value: serde_json::Value = serde_json::from_str(&a).unwrap();
        assert_eq!(
            value["resources"]["widgets"]["actions"]["show"]["query_params"]["type"]["object"]
                ["view"]["type"],
            "string"
        );
    }
}

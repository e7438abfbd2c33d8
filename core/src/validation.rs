#![deny(missing_docs)]

//! # Validation
//!
//! Referential integrity checks run on a built design before finalization.
//! The first violation found is returned as [`AppError::Validation`].
//!
//! Finalization never calls this pass: it degrades instead of failing, so
//! callers that want hard errors validate first.

use crate::design::action::ActionDefinition;
use crate::design::api::ApiDefinition;
use crate::design::attribute::{AttributeDefinition, DataType};
use crate::design::resource::{ResourceDefinition, DEFAULT_RESOURCE_MEDIA_TYPE};
use crate::design::response::ResponseDefinition;
use crate::design::route::HTTP_VERBS;
use crate::error::{AppError, AppResult};
use std::collections::BTreeSet;

/// Validates the whole design, resources first, in name order.
pub fn validate_design(api: &ApiDefinition) -> AppResult<()> {
    api.iterate_resources(|r| validate_resource(r, api))?;
    for resp in api.default_scope.responses() {
        validate_response(resp, api, &api.context())?;
    }
    api.iterate_user_types(|t| {
        validate_versions(&t.api_versions, api, &t.context())?;
        validate_attribute(&t.attribute, api, &t.context())
    })?;
    api.media_types()
        .chain(api.generated_media_types.values())
        .try_for_each(|mt| {
            validate_versions(&mt.user_type.api_versions, api, &mt.context())?;
            validate_attribute(&mt.user_type.attribute, api, &mt.context())
        })
}

fn invalid(message: String) -> AppError {
    AppError::Validation(message)
}

/// Validates a single resource and its actions.
pub fn validate_resource(resource: &ResourceDefinition, api: &ApiDefinition) -> AppResult<()> {
    let ctx = resource.context();
    if let Some(parent_name) = &resource.parent_name {
        let Some(parent) = resource.parent(api) else {
            return Err(invalid(format!(
                "{}: unknown parent resource {:?}",
                ctx, parent_name
            )));
        };
        check_acyclic(resource, api)?;
        if parent.canonical_route().is_none() {
            return Err(invalid(format!(
                "{}: parent {} has no canonical action with a route",
                ctx,
                parent.context()
            )));
        }
    }
    if let Some(name) = &resource.canonical_action_name {
        if !resource.actions.contains_key(name) {
            return Err(invalid(format!("{}: unknown canonical action {:?}", ctx, name)));
        }
    }
    validate_versions(&resource.api_versions, api, &ctx)?;
    if !resource.media_type.is_empty()
        && resource.media_type != DEFAULT_RESOURCE_MEDIA_TYPE
        && api.find_media_type(&resource.media_type).is_none()
    {
        return Err(invalid(format!(
            "{}: unknown media type {:?}",
            ctx, resource.media_type
        )));
    }
    for resp in resource.responses.values() {
        validate_response(resp, api, &ctx)?;
    }
    for att in [&resource.base_params, &resource.params, &resource.headers]
        .into_iter()
        .flatten()
    {
        validate_attribute(att, api, &ctx)?;
    }
    resource.iterate_actions(|a| validate_action(a, resource, api))
}

fn check_acyclic(resource: &ResourceDefinition, api: &ApiDefinition) -> AppResult<()> {
    let mut seen = BTreeSet::new();
    let mut current = Some(resource);
    while let Some(r) = current {
        if !seen.insert(r.name.as_str()) {
            return Err(invalid(format!(
                "{}: cyclic parent chain through {}",
                resource.context(),
                r.context()
            )));
        }
        current = r.parent(api);
    }
    Ok(())
}

fn validate_versions(versions: &[String], api: &ApiDefinition, ctx: &str) -> AppResult<()> {
    match versions.iter().find(|v| !api.versions.contains_key(*v)) {
        Some(v) => Err(invalid(format!("{}: unknown API version {:?}", ctx, v))),
        None => Ok(()),
    }
}

fn validate_action(
    action: &ActionDefinition,
    resource: &ResourceDefinition,
    api: &ApiDefinition,
) -> AppResult<()> {
    let ctx = action.context(resource);
    if action.routes.is_empty() {
        return Err(invalid(format!("{}: no route defined", ctx)));
    }
    for route in &action.routes {
        if !HTTP_VERBS.contains(&route.verb.as_str()) {
            return Err(invalid(format!(
                "{}: unknown HTTP verb {:?}",
                route.context(&ctx),
                route.verb
            )));
        }
        for scope in api.scopes() {
            let mut names = BTreeSet::new();
            for wc in route.params(resource, api, scope) {
                if !names.insert(wc.clone()) {
                    return Err(invalid(format!(
                        "{}: wildcard {:?} appears more than once in {:?}",
                        route.context(&ctx),
                        wc,
                        route.full_path(resource, api, scope)
                    )));
                }
            }
        }
    }
    if let Some(payload) = &action.payload {
        if !api.types.contains_key(payload) && api.find_media_type(payload).is_none() {
            return Err(invalid(format!("{}: unknown payload type {:?}", ctx, payload)));
        }
    }
    for att in [&action.params, &action.headers].into_iter().flatten() {
        validate_attribute(att, api, &ctx)?;
    }
    for resp in action.responses.values() {
        validate_response(resp, api, &ctx)?;
    }
    Ok(())
}

fn validate_response(resp: &ResponseDefinition, api: &ApiDefinition, ctx: &str) -> AppResult<()> {
    if !resp.media_type.is_empty() && api.find_media_type(&resp.media_type).is_none() {
        return Err(invalid(format!(
            "{} {}: unknown media type {:?}",
            ctx,
            resp.context(),
            resp.media_type
        )));
    }
    if let Some(type_name) = &resp.type_name {
        if !api.types.contains_key(type_name) {
            return Err(invalid(format!(
                "{} {}: unknown type {:?}",
                ctx,
                resp.context(),
                type_name
            )));
        }
    }
    Ok(())
}

/// Checks that every user type and media type referenced from `att` exists.
fn validate_attribute(att: &AttributeDefinition, api: &ApiDefinition, ctx: &str) -> AppResult<()> {
    match &att.data_type {
        DataType::UserType(name) if !api.types.contains_key(name) => {
            Err(invalid(format!("{}: unknown type {:?}", ctx, name)))
        }
        DataType::MediaType(id) if api.find_media_type(id).is_none() => {
            Err(invalid(format!("{}: unknown media type {:?}", ctx, id)))
        }
        DataType::Array(elem) => validate_attribute(elem, api, ctx),
        DataType::Hash { key, elem } => {
            validate_attribute(key, api, ctx)?;
            validate_attribute(elem, api, ctx)
        }
        DataType::Object(fields) => fields
            .iter()
            .try_for_each(|(name, field)| {
                validate_attribute(field, api, &format!("{} field {:?}", ctx, name))
            }),
        _ => Ok(()),
    }
}

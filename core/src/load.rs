#![deny(missing_docs)]

//! # Design Documents
//!
//! Builds an [`ApiDefinition`] from a YAML or JSON document.
//!
//! Top level keys are the default scope fields (`name`, `title`, `base_path`,
//! `base_params`, `responses`, `traits`, ...) plus `versions`, `resources`,
//! `types`, `media_types` and `collections`. Map keys name their entries when
//! the entries do not carry a name themselves. Every entry is registered
//! through the [`ApiDefinition`] builder methods, so duplicates are rejected
//! the same way as in code.

use crate::design::api::ApiDefinition;
use crate::design::media_type::MediaTypeDefinition;
use crate::design::resource::ResourceDefinition;
use crate::design::response::ResponseDefinition;
use crate::design::user_type::UserTypeDefinition;
use crate::design::version::VersionScope;
use crate::error::AppResult;
use serde::Deserialize;
use std::collections::BTreeMap;

/// The document shape accepted by [`parse_design_yaml`] and [`parse_design_json`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DesignDocument {
    /// Default scope fields.
    #[serde(flatten)]
    pub scope: VersionScope,
    /// Version scopes by version string.
    pub versions: BTreeMap<String, VersionScope>,
    /// Resources by name.
    pub resources: BTreeMap<String, ResourceDefinition>,
    /// User types by type name.
    pub types: BTreeMap<String, UserTypeDefinition>,
    /// Media types by identifier.
    pub media_types: BTreeMap<String, MediaTypeDefinition>,
    /// Identifiers of the media types whose collections must be generated.
    pub collections: Vec<String>,
}

/// Parses a YAML design document.
pub fn parse_design_yaml(input: &str) -> AppResult<ApiDefinition> {
    let doc: DesignDocument = serde_yaml::from_str(input)?;
    doc.into_api()
}

/// Parses a JSON design document.
pub fn parse_design_json(input: &str) -> AppResult<ApiDefinition> {
    let doc: DesignDocument = serde_json::from_str(input)?;
    doc.into_api()
}

/// Re-keys `map` by the names of its entries, naming unnamed entries after
/// their key.
fn named<T>(
    map: BTreeMap<String, T>,
    name: impl Fn(&mut T) -> &mut String,
) -> BTreeMap<String, T> {
    map.into_iter()
        .map(|(key, mut value)| {
            let slot = name(&mut value);
            if slot.is_empty() {
                *slot = key;
            }
            (slot.clone(), value)
        })
        .collect()
}

fn named_responses(
    responses: BTreeMap<String, ResponseDefinition>,
) -> BTreeMap<String, ResponseDefinition> {
    named(responses, |r| &mut r.name)
}

impl DesignDocument {
    /// Registers the document entries on a new API definition.
    pub fn into_api(self) -> AppResult<ApiDefinition> {
        let DesignDocument {
            mut scope,
            versions,
            resources,
            types,
            media_types,
            collections,
        } = self;

        scope.version.clear();
        scope.traits = named(scope.traits, |t| &mut t.name);
        let root_responses = named_responses(std::mem::take(&mut scope.responses));
        let mut api = ApiDefinition::default();
        api.default_scope = scope;
        for resp in root_responses.into_values() {
            api.add_response(resp)?;
        }

        for mut version in named(versions, |v| &mut v.version).into_values() {
            version.traits = named(version.traits, |t| &mut t.name);
            version.responses = named_responses(version.responses);
            api.add_version(version)?;
        }
        for user_type in named(types, |t| &mut t.type_name).into_values() {
            api.add_type(user_type)?;
        }
        for mut media_type in named(media_types, |m| &mut m.identifier).into_values() {
            media_type.views = named(media_type.views, |v| &mut v.name);
            media_type.links = named(media_type.links, |l| &mut l.name);
            api.add_media_type(media_type)?;
        }
        for identifier in &collections {
            api.collection_of(identifier)?;
        }

        for mut resource in named(resources, |r| &mut r.name).into_values() {
            resource.responses = named_responses(resource.responses);
            resource.actions = named(resource.actions, |a| &mut a.name);
            for action in resource.actions.values_mut() {
                action.responses = named_responses(std::mem::take(&mut action.responses));
                for route in action.routes.iter_mut() {
                    route.verb = route.verb.to_ascii_uppercase();
                }
            }
            api.add_resource(resource)?;
        }
        Ok(api)
    }
}

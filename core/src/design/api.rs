#![deny(missing_docs)]

//! # API Definition
//!
//! The root of the definition graph. Owns resources, user types, media
//! types and version scopes, and exposes the deterministic enumerations used
//! by generators: every enumeration walks its keys in lexicographic order and
//! stops at the first error returned by the visitor.

use crate::design::action::ActionDefinition;
use crate::design::media_type::{canonical_identifier, MediaTypeDefinition};
use crate::design::resource::ResourceDefinition;
use crate::design::response::ResponseDefinition;
use crate::design::user_type::UserTypeDefinition;
use crate::design::version::{TraitDefinition, VersionScope};
use crate::error::{AppError, AppResult};
use crate::finalize::{self, FinalizedApi};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// The API definition under construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiDefinition {
    /// Default values shared by all versions; its version string is empty.
    pub default_scope: VersionScope,
    /// Version scopes indexed by version string.
    pub versions: BTreeMap<String, VersionScope>,
    /// Resources indexed by name.
    pub resources: BTreeMap<String, ResourceDefinition>,
    /// User types indexed by type name.
    pub types: BTreeMap<String, UserTypeDefinition>,
    /// Media types indexed by canonical identifier.
    pub media_types: BTreeMap<String, MediaTypeDefinition>,
    /// Derived media types waiting to be folded into `media_types`.
    #[serde(skip)]
    pub generated_media_types: BTreeMap<String, MediaTypeDefinition>,
}

impl ApiDefinition {
    /// Creates an empty, unversioned API.
    pub fn new(name: impl Into<String>) -> Self {
        let mut api = Self::default();
        api.default_scope.name = name.into();
        api
    }

    /// API name.
    pub fn name(&self) -> &str {
        &self.default_scope.name
    }

    /// Human readable name used in messages.
    pub fn context(&self) -> String {
        self.default_scope.context()
    }

    /// Runs the finalization pass. The returned handle is read-only.
    pub fn finalize(self) -> FinalizedApi {
        finalize::finalize(self)
    }

    /// Registers a version scope.
    pub fn add_version(&mut self, mut scope: VersionScope) -> AppResult<()> {
        if scope.version.is_empty() {
            return Err(AppError::General(
                "version scopes must have a non-empty version".into(),
            ));
        }
        if self.versions.contains_key(&scope.version) {
            return Err(AppError::Duplicate(format!("version {:?}", scope.version)));
        }
        if scope.name.is_empty() {
            scope.name = self.default_scope.name.clone();
        }
        self.versions.insert(scope.version.clone(), scope);
        Ok(())
    }

    /// Declares a response available to all actions of the API.
    pub fn add_response(&mut self, mut response: ResponseDefinition) -> AppResult<()> {
        if self.default_scope.responses.contains_key(&response.name) {
            return Err(AppError::Duplicate(response.context()));
        }
        response.global = true;
        self.default_scope
            .responses
            .insert(response.name.clone(), response);
        Ok(())
    }

    /// Declares a trait on the default scope.
    pub fn add_trait(&mut self, t: TraitDefinition) -> AppResult<()> {
        if self.default_scope.traits.contains_key(&t.name) {
            return Err(AppError::Duplicate(format!("trait {:?}", t.name)));
        }
        self.default_scope.traits.insert(t.name.clone(), t);
        Ok(())
    }

    /// Registers a resource, applying the traits its actions request.
    pub fn add_resource(&mut self, mut resource: ResourceDefinition) -> AppResult<()> {
        if self.resources.contains_key(&resource.name) {
            return Err(AppError::Duplicate(resource.context()));
        }
        for action in resource.actions.values_mut() {
            self.apply_traits(action)?;
        }
        self.resources.insert(resource.name.clone(), resource);
        Ok(())
    }

    fn apply_traits(&self, action: &mut ActionDefinition) -> AppResult<()> {
        for name in action.traits.clone() {
            let t = self
                .default_scope
                .traits
                .get(&name)
                .or_else(|| self.versions.values().find_map(|v| v.traits.get(&name)))
                .ok_or_else(|| AppError::Unknown(format!("trait {:?}", name)))?;
            action.apply_trait(t);
        }
        Ok(())
    }

    /// Registers a user type.
    pub fn add_type(&mut self, user_type: UserTypeDefinition) -> AppResult<()> {
        if self.types.contains_key(&user_type.type_name) {
            return Err(AppError::Duplicate(user_type.context()));
        }
        self.types.insert(user_type.type_name.clone(), user_type);
        Ok(())
    }

    /// Registers a media type under its canonical identifier.
    pub fn add_media_type(&mut self, media_type: MediaTypeDefinition) -> AppResult<()> {
        let key = media_type.canonical_identifier();
        if self.media_types.contains_key(&key) {
            return Err(AppError::Duplicate(media_type.context()));
        }
        self.media_types.insert(key, media_type);
        Ok(())
    }

    /// Derives the collection media type of a registered (or generated)
    /// media type and queues it for folding. Returns the collection
    /// identifier; deriving the same collection twice is a no-op.
    pub fn collection_of(&mut self, element_identifier: &str) -> AppResult<String> {
        let element = self
            .find_media_type(element_identifier)
            .ok_or_else(|| AppError::Unknown(format!("media type {:?}", element_identifier)))?;
        let collection = element.collection();
        let identifier = collection.identifier.clone();
        let key = collection.canonical_identifier();
        self.generated_media_types.entry(key).or_insert(collection);
        Ok(identifier)
    }

    /// Moves the generated media types into `media_types`, keyed by canonical
    /// identifier. Existing entries win.
    pub fn fold_generated_media_types(&mut self) {
        if self.generated_media_types.is_empty() {
            return;
        }
        let generated = std::mem::take(&mut self.generated_media_types);
        debug!(count = generated.len(), "folding generated media types");
        for (key, mt) in generated {
            self.media_types.entry(key).or_insert(mt);
        }
    }

    /// Instantiates a response template of the default scope.
    pub fn response_from_template(&self, name: &str, args: &[&str]) -> Option<ResponseDefinition> {
        self.default_scope
            .response_template(name)
            .map(|t| t.instantiate(args))
    }

    /// Returns the media type whose canonical identifier matches the
    /// canonical form of `id`, if any.
    pub fn media_type_with_identifier(&self, id: &str) -> Option<&MediaTypeDefinition> {
        let canonical = canonical_identifier(id);
        if let Some(mt) = self.media_types.get(&canonical) {
            return Some(mt);
        }
        self.media_types
            .values()
            .find(|mt| mt.canonical_identifier() == canonical)
    }

    /// Like [`ApiDefinition::media_type_with_identifier`], but also looks at
    /// the generated media types that are not folded in yet.
    pub fn find_media_type(&self, id: &str) -> Option<&MediaTypeDefinition> {
        self.media_type_with_identifier(id).or_else(|| {
            let canonical = canonical_identifier(id);
            self.generated_media_types.get(&canonical).or_else(|| {
                self.generated_media_types
                    .values()
                    .find(|mt| mt.canonical_identifier() == canonical)
            })
        })
    }

    /// Whether the API declares no version.
    pub fn supports_no_version(&self) -> bool {
        self.versions.is_empty()
    }

    /// Whether the API exposes the given version. The empty version, which
    /// stands for the default scope, is always supported.
    pub fn supports_version(&self, version: &str) -> bool {
        version.is_empty() || self.versions.contains_key(version)
    }

    /// Named versions in sorted order.
    pub fn versions(&self) -> Vec<String> {
        self.versions.keys().cloned().collect()
    }

    /// Version scopes: the default scope first, then named versions sorted.
    pub fn scopes(&self) -> impl Iterator<Item = &VersionScope> {
        std::iter::once(&self.default_scope).chain(self.versions.values())
    }

    /// Calls `it` on each version scope, default scope first.
    pub fn iterate_versions<E, F>(&self, it: F) -> Result<(), E>
    where
        F: FnMut(&VersionScope) -> Result<(), E>,
    {
        self.scopes().try_for_each(it)
    }

    /// Resources in name order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceDefinition> {
        self.resources.values()
    }

    /// Calls `it` on each resource in name order.
    pub fn iterate_resources<E, F>(&self, it: F) -> Result<(), E>
    where
        F: FnMut(&ResourceDefinition) -> Result<(), E>,
    {
        self.resources().try_for_each(it)
    }

    /// Calls `it` on each resource exposed by `scope`, in name order.
    pub fn iterate_resources_in<E, F>(&self, scope: &VersionScope, mut it: F) -> Result<(), E>
    where
        F: FnMut(&ResourceDefinition) -> Result<(), E>,
    {
        self.resources()
            .filter(|r| r.supports_version(&scope.version))
            .try_for_each(|r| it(r))
    }

    /// User types in name order.
    pub fn user_types(&self) -> impl Iterator<Item = &UserTypeDefinition> {
        self.types.values()
    }

    /// Calls `it` on each user type in name order.
    pub fn iterate_user_types<E, F>(&self, it: F) -> Result<(), E>
    where
        F: FnMut(&UserTypeDefinition) -> Result<(), E>,
    {
        self.user_types().try_for_each(it)
    }

    /// Calls `it` on each user type exposed by `scope`, in name order.
    pub fn iterate_user_types_in<E, F>(&self, scope: &VersionScope, mut it: F) -> Result<(), E>
    where
        F: FnMut(&UserTypeDefinition) -> Result<(), E>,
    {
        self.user_types()
            .filter(|t| t.supports_version(&scope.version))
            .try_for_each(|t| it(t))
    }

    /// Media types in canonical identifier order.
    pub fn media_types(&self) -> impl Iterator<Item = &MediaTypeDefinition> {
        self.media_types.values()
    }

    /// Calls `it` on each media type in canonical identifier order.
    pub fn iterate_media_types<E, F>(&self, it: F) -> Result<(), E>
    where
        F: FnMut(&MediaTypeDefinition) -> Result<(), E>,
    {
        self.media_types().try_for_each(it)
    }

    /// Calls `it` on each media type exposed by `scope`, in canonical
    /// identifier order.
    pub fn iterate_media_types_in<E, F>(&self, scope: &VersionScope, mut it: F) -> Result<(), E>
    where
        F: FnMut(&MediaTypeDefinition) -> Result<(), E>,
    {
        self.media_types()
            .filter(|mt| mt.supports_version(&scope.version))
            .try_for_each(|mt| it(mt))
    }
}

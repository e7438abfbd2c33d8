#![deny(missing_docs)]

//! # Design Model
//!
//! The definition graph, leaves first:
//!
//! - **attribute**: typed, possibly nested field sets.
//! - **route**: verb + path pairs, path cleaning and wildcards.
//! - **response**: responses, templates and the standard catalog.
//! - **mime** / **media_type**: MIME parsing and canonical media type identity.
//! - **user_type**: named attribute types.
//! - **version**: per-version defaults.
//! - **resource** / **action**: the REST surface.
//! - **api**: the root registry.

pub mod action;
pub mod api;
pub mod attribute;
pub mod media_type;
pub mod mime;
pub mod resource;
pub mod response;
pub mod route;
pub mod user_type;
pub mod version;

pub use action::ActionDefinition;
pub use api::ApiDefinition;
pub use attribute::{AttributeDefinition, DataType, Metadata, Object, ValidationDefinition};
pub use media_type::{canonical_identifier, LinkDefinition, MediaTypeDefinition, ViewDefinition};
pub use resource::{ResourceDefinition, DEFAULT_CANONICAL_ACTION, DEFAULT_RESOURCE_MEDIA_TYPE};
pub use response::{
    standard_response_templates, standard_responses, ResponseDefinition,
    ResponseTemplateDefinition,
};
pub use route::{clean_path, extract_wildcards, join_paths, RouteDefinition, HTTP_VERBS};
pub use user_type::UserTypeDefinition;
pub use version::{
    ContactDefinition, DocsDefinition, EncodingDefinition, LicenseDefinition, TraitDefinition,
    VersionScope, DEFAULT_ENCODING_MIME_TYPES,
};

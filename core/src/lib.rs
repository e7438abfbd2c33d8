#![deny(missing_docs)]

//! # API Design Core
//!
//! In-memory API definition graph and its finalization pass.
//!
//! A design is built with the [`ApiDefinition`] builder methods (or loaded
//! from a YAML/JSON document), optionally checked with
//! [`validate_design`], then consumed by [`ApiDefinition::finalize`]. The
//! returned [`FinalizedApi`] is read-only and enumerates its content in a
//! deterministic order.

/// Shared error types.
pub mod error;

/// The definition graph.
pub mod design;

/// Finalization pass.
pub mod finalize;

/// Referential integrity checks.
pub mod validation;

/// Example value generation.
pub mod example;

/// YAML/JSON design documents.
pub mod load;

pub use design::{
    canonical_identifier, ActionDefinition, ApiDefinition, AttributeDefinition, DataType,
    MediaTypeDefinition, ResourceDefinition, ResponseDefinition, RouteDefinition,
    UserTypeDefinition, VersionScope,
};
pub use error::{AppError, AppResult};
pub use example::RandomGenerator;
pub use finalize::FinalizedApi;
pub use load::{parse_design_json, parse_design_yaml, DesignDocument};
pub use validation::validate_design;

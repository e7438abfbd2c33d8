#![deny(missing_docs)]

//! # Routes
//!
//! HTTP verb + path template pairs, path cleaning and wildcard extraction.
//!
//! A path starting with `//` is absolute: it ignores the API and resource
//! base paths. Any other path is joined onto the owning resource full path.

use crate::design::api::ApiDefinition;
use crate::design::resource::ResourceDefinition;
use crate::design::version::VersionScope;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// HTTP verbs accepted by route definitions.
pub const HTTP_VERBS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "TRACE", "CONNECT",
];

/// One verb + path template pair of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// HTTP method, e.g. "GET".
    pub verb: String,
    /// Path template, e.g. "/tasks/:id".
    pub path: String,
}

impl RouteDefinition {
    /// Creates a route. The verb is uppercased.
    pub fn new(verb: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            verb: verb.into().to_ascii_uppercase(),
            path: path.into(),
        }
    }

    /// `GET` route.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    /// `POST` route.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new("POST", path)
    }

    /// `PUT` route.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new("PUT", path)
    }

    /// `PATCH` route.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new("PATCH", path)
    }

    /// `DELETE` route.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new("DELETE", path)
    }

    /// Whether the path is absolute (prefixed with `//`).
    pub fn is_absolute(&self) -> bool {
        self.path.starts_with("//")
    }

    /// Computes the full path of the route under the given scope.
    ///
    /// `resource` is the resource owning the action the route belongs to.
    pub fn full_path(
        &self,
        resource: &ResourceDefinition,
        api: &ApiDefinition,
        scope: &VersionScope,
    ) -> String {
        self.full_path_at(resource, api, scope, 0)
    }

    pub(crate) fn full_path_at(
        &self,
        resource: &ResourceDefinition,
        api: &ApiDefinition,
        scope: &VersionScope,
        depth: usize,
    ) -> String {
        if self.is_absolute() {
            return clean_path(&self.path[1..]);
        }
        let base = resource.full_path_at(api, scope, depth);
        clean_path(&join_paths(&[&base, &self.path]))
    }

    /// Names of the wildcards in the route full path, in order of appearance.
    pub fn params(
        &self,
        resource: &ResourceDefinition,
        api: &ApiDefinition,
        scope: &VersionScope,
    ) -> Vec<String> {
        extract_wildcards(&self.full_path(resource, api, scope))
    }

    /// Human readable name used in messages.
    pub fn context(&self, owner: &str) -> String {
        format!(r#"route {} "{}" of {}"#, self.verb, self.path, owner)
    }
}

fn wildcard_regex() -> &'static Regex {
    static WILDCARD_RE: OnceLock<Regex> = OnceLock::new();
    WILDCARD_RE.get_or_init(|| Regex::new(r"/(?::|\*)([a-zA-Z0-9_]+)").expect("Invalid regex"))
}

/// Returns the names of the wildcards (`:name` or `*name` right after a `/`)
/// that appear in `path`, left to right.
pub fn extract_wildcards(path: &str) -> Vec<String> {
    wildcard_regex()
        .captures_iter(path)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Returns the canonical form of a URL path.
///
/// - The result always starts with `/`.
/// - Repeated slashes collapse, `.` elements vanish and `..` removes the
///   previous element (never climbing above the root).
/// - A trailing slash is kept, as is the slash implied by a final `.`.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    let mut trailing = path.len() > 1 && path.ends_with('/');
    let mut stack: Vec<&str> = Vec::new();
    let mut segments = path.split('/').peekable();
    while let Some(seg) = segments.next() {
        match seg {
            "" => {}
            "." => {
                if segments.peek().is_none() {
                    trailing = true;
                }
            }
            ".." => {
                stack.pop();
            }
            s => stack.push(s),
        }
    }
    let mut out = String::with_capacity(path.len() + 1);
    out.push('/');
    out.push_str(&stack.join("/"));
    if trailing && out.len() > 1 {
        out.push('/');
    }
    out
}

/// Joins path elements with `/`, skipping empty ones, and cleans the result.
/// Unlike [`clean_path`] the result never ends with a slash (except `/`).
pub fn join_paths(parts: &[&str]) -> String {
    let joined = parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    let cleaned = clean_path(&joined);
    match cleaned.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => cleaned,
    }
}

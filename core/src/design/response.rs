#![deny(missing_docs)]

//! # Responses
//!
//! Named response definitions, declarative response templates and the
//! built-in standard response catalog.
//!
//! Responses sharing a name at different scopes (action, resource, API,
//! built-in) are combined field by field with [`ResponseDefinition::merge`].

use crate::design::attribute::{AttributeDefinition, Metadata};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// A named HTTP response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseDefinition {
    /// Response name, e.g. "OK".
    pub name: String,
    /// HTTP status, `0` when unset.
    pub status: u16,
    /// Description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Body user type name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Body media type identifier, empty when unset.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub media_type: String,
    /// Response headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<AttributeDefinition>,
    /// Metadata.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
    /// Whether the definition comes from the built-in catalog.
    pub standard: bool,
    /// Whether the definition was declared at the API root.
    pub global: bool,
}

impl ResponseDefinition {
    /// Creates a response with a name and status.
    pub fn new(name: impl Into<String>, status: u16) -> Self {
        Self {
            name: name.into(),
            status,
            ..Self::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the body media type identifier.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    /// Adds a response header.
    pub fn with_header(mut self, name: impl Into<String>, att: AttributeDefinition) -> Self {
        self.headers
            .get_or_insert_with(AttributeDefinition::object_type)
            .ensure_object()
            .insert(name.into(), att);
        self
    }

    /// Returns a copy holding name, status, description, media type and headers.
    pub fn dup(&self) -> Self {
        Self {
            name: self.name.clone(),
            status: self.status,
            description: self.description.clone(),
            media_type: self.media_type.clone(),
            headers: self.headers.clone(),
            ..Self::default()
        }
    }

    /// Fills the fields of the receiver that are not set yet from `other`.
    ///
    /// Headers are merged by name; headers the receiver already declares are
    /// left untouched.
    pub fn merge(&mut self, other: &ResponseDefinition) {
        if self.name.is_empty() {
            self.name = other.name.clone();
        }
        if self.status == 0 {
            self.status = other.status;
        }
        if self.description.is_empty() {
            self.description = other.description.clone();
        }
        if self.media_type.is_empty() {
            self.media_type = other.media_type.clone();
        }
        let Some(other_headers) = other.headers.as_ref().and_then(|h| h.object()) else {
            return;
        };
        if other_headers.is_empty() {
            return;
        }
        let headers = self
            .headers
            .get_or_insert_with(AttributeDefinition::object_type)
            .ensure_object();
        for (name, header) in other_headers {
            if !headers.contains_key(name) {
                headers.insert(name.clone(), header.clone());
            }
        }
    }

    /// Human readable name used in messages.
    pub fn context(&self) -> String {
        if self.name.is_empty() {
            "unnamed response".to_string()
        } else {
            format!("response {:?}", self.name)
        }
    }
}

/// A named factory producing response definitions.
///
/// `{0}`, `{1}`, ... in the description and media type are replaced by the
/// arguments given to [`ResponseTemplateDefinition::instantiate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseTemplateDefinition {
    /// Template name.
    pub name: String,
    /// Response prototype.
    pub response: ResponseDefinition,
}

impl ResponseTemplateDefinition {
    /// Creates a template.
    pub fn new(name: impl Into<String>, response: ResponseDefinition) -> Self {
        Self {
            name: name.into(),
            response,
        }
    }

    /// Builds a response from the template. Missing arguments substitute
    /// the empty string.
    pub fn instantiate(&self, args: &[&str]) -> ResponseDefinition {
        let mut resp = self.response.clone();
        if resp.name.is_empty() {
            resp.name = self.name.clone();
        }
        resp.description = substitute(&resp.description, args);
        resp.media_type = substitute(&resp.media_type, args);
        resp
    }
}

fn substitute(template: &str, args: &[&str]) -> String {
    static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{(\d+)\}").expect("Invalid regex"));
    re.replace_all(template, |caps: &Captures| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|i| args.get(i).copied())
            .unwrap_or("")
            .to_string()
    })
    .into_owned()
}

const STANDARD_RESPONSES: [(&str, u16); 41] = [
    ("Continue", 100),
    ("SwitchingProtocols", 101),
    ("OK", 200),
    ("Created", 201),
    ("Accepted", 202),
    ("NonAuthoritativeInfo", 203),
    ("NoContent", 204),
    ("ResetContent", 205),
    ("PartialContent", 206),
    ("MultipleChoices", 300),
    ("MovedPermanently", 301),
    ("Found", 302),
    ("SeeOther", 303),
    ("NotModified", 304),
    ("UseProxy", 305),
    ("TemporaryRedirect", 307),
    ("BadRequest", 400),
    ("Unauthorized", 401),
    ("PaymentRequired", 402),
    ("Forbidden", 403),
    ("NotFound", 404),
    ("MethodNotAllowed", 405),
    ("NotAcceptable", 406),
    ("ProxyAuthRequired", 407),
    ("RequestTimeout", 408),
    ("Conflict", 409),
    ("Gone", 410),
    ("LengthRequired", 411),
    ("PreconditionFailed", 412),
    ("RequestEntityTooLarge", 413),
    ("RequestURITooLong", 414),
    ("UnsupportedMediaType", 415),
    ("RequestedRangeNotSatisfiable", 416),
    ("ExpectationFailed", 417),
    ("Teapot", 418),
    ("InternalServerError", 500),
    ("NotImplemented", 501),
    ("BadGateway", 502),
    ("ServiceUnavailable", 503),
    ("GatewayTimeout", 504),
    ("HTTPVersionNotSupported", 505),
];

/// The built-in response catalog, indexed by name.
pub fn standard_responses() -> &'static BTreeMap<String, ResponseDefinition> {
    static CATALOG: OnceLock<BTreeMap<String, ResponseDefinition>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        STANDARD_RESPONSES
            .iter()
            .map(|(name, status)| {
                let mut resp = ResponseDefinition::new(*name, *status);
                resp.standard = true;
                (name.to_string(), resp)
            })
            .collect()
    })
}

/// The built-in response templates, indexed by name.
pub fn standard_response_templates() -> &'static BTreeMap<String, ResponseTemplateDefinition> {
    static TEMPLATES: OnceLock<BTreeMap<String, ResponseTemplateDefinition>> = OnceLock::new();
    TEMPLATES.get_or_init(|| {
        let mut ok = ResponseDefinition::new("OK", 200).with_media_type("{0}");
        ok.standard = true;
        let mut templates = BTreeMap::new();
        templates.insert("OK".to_string(), ResponseTemplateDefinition::new("OK", ok));
        templates
    })
}

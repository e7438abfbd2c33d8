#![deny(missing_docs)]

//! # MIME Values
//!
//! Minimal RFC 2045 / RFC 2616 media type parsing and formatting, enough to
//! compute canonical media type identifiers.
//!
//! - Type, subtype and parameter names are lowercased.
//! - Parameter values may be tokens or quoted strings.
//! - Formatting sorts parameters by name and quotes values that are not tokens.

use std::collections::BTreeMap;

/// A parsed media type: base type (`type/subtype`) plus parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaValue {
    /// Lowercased base type, e.g. `application/vnd.goa.bottle+json`.
    pub base: String,
    /// Parameters indexed by lowercased name.
    pub params: BTreeMap<String, String>,
}

/// Parses a media type value such as `application/json; charset=utf-8`.
///
/// Returns `None` when the value is not a well-formed media type; callers
/// decide how to degrade.
pub fn parse_media_type(value: &str) -> Option<MediaValue> {
    let (base, mut rest) = match value.find(';') {
        Some(i) => (&value[..i], &value[i..]),
        None => (value, ""),
    };
    let base = base.trim().to_ascii_lowercase();
    if !is_valid_base(&base) {
        return None;
    }

    let mut params = BTreeMap::new();
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        match consume_param(rest) {
            Some((name, val, remaining)) => {
                if params.insert(name, val).is_some() {
                    // duplicate parameter
                    return None;
                }
                rest = remaining;
            }
            None => {
                // trailing semicolons are tolerated
                if rest.trim() == ";" {
                    break;
                }
                return None;
            }
        }
    }

    Some(MediaValue { base, params })
}

/// Serializes a base type and parameters back into a media type string.
///
/// Returns `None` if the base type or a parameter name is not a valid token.
pub fn format_media_type(base: &str, params: &BTreeMap<String, String>) -> Option<String> {
    let base = base.to_ascii_lowercase();
    if !is_valid_base(&base) {
        return None;
    }
    let mut out = base;
    for (name, value) in params {
        if !is_token(name) {
            return None;
        }
        out.push_str("; ");
        out.push_str(&name.to_ascii_lowercase());
        out.push('=');
        if is_token(value) {
            out.push_str(value);
        } else {
            out.push('"');
            for c in value.chars() {
                if c == '"' || c == '\\' {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push('"');
        }
    }
    Some(out)
}

impl MediaValue {
    /// Formats the value, see [`format_media_type`].
    pub fn format(&self) -> Option<String> {
        format_media_type(&self.base, &self.params)
    }
}

fn is_valid_base(base: &str) -> bool {
    match base.split_once('/') {
        Some((major, sub)) => is_token(major) && is_token(sub),
        None => is_token(base),
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii() && c > ' ' && c != '\x7f' && !"()<>@,;:\\\"/[]?=".contains(c)
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_token_char)
}

fn consume_token(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !is_token_char(c)).unwrap_or(s.len());
    (&s[..end], &s[end..])
}

/// Consumes a token or a quoted string. Returns `None` when nothing valid
/// could be consumed.
fn consume_value(s: &str) -> Option<(String, &str)> {
    if let Some(quoted) = s.strip_prefix('"') {
        let mut value = String::new();
        let mut chars = quoted.char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => return Some((value, &quoted[i + 1..])),
                '\\' => {
                    let (_, escaped) = chars.next()?;
                    value.push(escaped);
                }
                '\r' | '\n' => return None,
                _ => value.push(c),
            }
        }
        // unterminated
        return None;
    }
    let (token, rest) = consume_token(s);
    if token.is_empty() {
        None
    } else {
        Some((token.to_string(), rest))
    }
}

fn consume_param(s: &str) -> Option<(String, String, &str)> {
    let rest = s.trim_start().strip_prefix(';')?.trim_start();
    let (name, rest) = consume_token(rest);
    if name.is_empty() {
        return None;
    }
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let (value, rest) = consume_value(rest)?;
    Some((name.to_ascii_lowercase(), value, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_params() {
        let v = parse_media_type("Application/JSON; Charset=utf-8; q=\"a b\"").unwrap();
        assert_eq!(v.base, "application/json");
        assert_eq!(v.params.get("charset").map(String::as_str), Some("utf-8"));
        assert_eq!(v.params.get("q").map(String::as_str), Some("a b"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_media_type("").is_none());
        assert!(parse_media_type("application/").is_none());
        assert!(parse_media_type("text/plain; charset").is_none());
        assert!(parse_media_type("text/plain; a=1; a=2").is_none());
        assert!(parse_media_type("text/plain; a=\"open").is_none());
    }

    #[test]
    fn test_parse_tolerates_trailing_semicolon() {
        let v = parse_media_type("text/plain;").unwrap();
        assert_eq!(v.base, "text/plain");
        assert!(v.params.is_empty());
    }

    #[test]
    fn test_format_sorts_and_quotes() {
        let mut params = BTreeMap::new();
        params.insert("view".to_string(), "tiny".to_string());
        params.insert("name".to_string(), "a \"b\"".to_string());
        let s = format_media_type("application/vnd.foo", &params).unwrap();
        assert_eq!(s, r#"application/vnd.foo; name="a \"b\""; view=tiny"#);
    }
}

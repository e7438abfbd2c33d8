#![deny(missing_docs)]

//! # Example Generation
//!
//! Produces random but reproducible example values for attributes. The
//! generator is seeded from a stable hash of the API name so that two runs
//! over the same design emit the same examples.

use crate::design::api::ApiDefinition;
use crate::design::attribute::{AttributeDefinition, DataType, ValidationDefinition};
use chrono::{DateTime, SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Map, Value as JsonValue};
use xxhash_rust::xxh64::xxh64;

/// Maximum nesting of type references followed while generating an example.
pub const MAX_EXAMPLE_DEPTH: usize = 8;

/// Range of generated timestamps: 1990-01-01 up to the end of 2030.
const TIMESTAMP_RANGE: std::ops::RangeInclusive<i64> = 631_152_000..=1_924_991_999;

const WORDS: [&str; 16] = [
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india", "juliet",
    "kilo", "lima", "mike", "november", "oscar", "papa",
];

/// A seeded random source for example values.
#[derive(Debug)]
pub struct RandomGenerator {
    seed: u64,
    rng: StdRng,
}

impl RandomGenerator {
    /// Creates a generator seeded from `name`.
    pub fn new(name: &str) -> Self {
        let seed = xxh64(name.as_bytes(), 0);
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The seed derived from the name.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates an example for `att`, resolving type references against `api`.
    pub fn generate(&mut self, att: &AttributeDefinition, api: &ApiDefinition) -> JsonValue {
        self.generate_at(att, api, 0)
    }

    fn generate_at(&mut self, att: &AttributeDefinition, api: &ApiDefinition, depth: usize) -> JsonValue {
        if let Some(example) = &att.example {
            return example.clone();
        }
        if depth > MAX_EXAMPLE_DEPTH {
            return JsonValue::Null;
        }
        let validation = att.validation.as_ref();
        if let Some(values) = validation.map(|v| &v.values).filter(|v| !v.is_empty()) {
            let i = self.rng.gen_range(0..values.len());
            return values[i].clone();
        }
        match &att.data_type {
            DataType::Boolean => JsonValue::Bool(self.rng.gen_bool(0.5)),
            DataType::Integer => json!(self.integer(validation)),
            DataType::Number => json!(self.number(validation)),
            DataType::String => self.string(validation),
            DataType::DateTime => JsonValue::String(self.date_time()),
            DataType::Uuid => JsonValue::String(self.uuid()),
            DataType::Any => JsonValue::String(self.word(validation)),
            DataType::Array(elem) => {
                let len = self.length(validation, 1, 3);
                JsonValue::Array(
                    (0..len)
                        .map(|_| self.generate_at(elem, api, depth + 1))
                        .collect(),
                )
            }
            DataType::Hash { key, elem } => {
                let len = self.length(validation, 1, 3);
                let mut map = Map::new();
                for _ in 0..len {
                    let k = match self.generate_at(key, api, depth + 1) {
                        JsonValue::String(s) => s,
                        other => other.to_string(),
                    };
                    let v = self.generate_at(elem, api, depth + 1);
                    map.insert(k, v);
                }
                JsonValue::Object(map)
            }
            DataType::Object(fields) => {
                let mut map = Map::new();
                for (name, field) in fields {
                    map.insert(name.clone(), self.generate_at(field, api, depth + 1));
                }
                JsonValue::Object(map)
            }
            DataType::UserType(name) => match api.types.get(name) {
                Some(ut) => self.generate_at(&ut.attribute, api, depth + 1),
                None => JsonValue::Null,
            },
            DataType::MediaType(id) => match api.media_type_with_identifier(id) {
                Some(mt) => self.generate_at(&mt.user_type.attribute, api, depth + 1),
                None => JsonValue::Null,
            },
        }
    }

    fn integer(&mut self, validation: Option<&ValidationDefinition>) -> i64 {
        let lo = validation
            .and_then(|v| v.minimum)
            .map(|m| m.ceil() as i64)
            .unwrap_or(0);
        let hi = validation
            .and_then(|v| v.maximum)
            .map(|m| m.floor() as i64)
            .unwrap_or_else(|| lo.saturating_add(1000));
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    fn number(&mut self, validation: Option<&ValidationDefinition>) -> f64 {
        let lo = validation.and_then(|v| v.minimum).unwrap_or(0.0);
        let hi = validation
            .and_then(|v| v.maximum)
            .unwrap_or(lo + 1000.0);
        if hi <= lo || !lo.is_finite() || !hi.is_finite() {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    fn length(&mut self, validation: Option<&ValidationDefinition>, min: usize, max: usize) -> usize {
        let lo = validation.and_then(|v| v.min_length).unwrap_or(min);
        let hi = validation
            .and_then(|v| v.max_length)
            .unwrap_or_else(|| lo.max(max));
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    fn string(&mut self, validation: Option<&ValidationDefinition>) -> JsonValue {
        let format = validation.and_then(|v| v.format.as_deref());
        let s = match format {
            Some("email") => format!("{}@example.com", self.pick_word()),
            Some("uri") => format!("https://example.com/{}", self.pick_word()),
            Some("date-time") => self.date_time(),
            Some("uuid") => self.uuid(),
            _ => self.word(validation),
        };
        JsonValue::String(s)
    }

    fn pick_word(&mut self) -> &'static str {
        WORDS[self.rng.gen_range(0..WORDS.len())]
    }

    /// Lowercase text whose length honors the length bounds.
    fn word(&mut self, validation: Option<&ValidationDefinition>) -> String {
        let len = self.length(validation, 3, 12);
        let mut out = String::with_capacity(len);
        while out.len() < len {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(self.pick_word());
        }
        out.truncate(len);
        // no trailing blank
        if out.ends_with(' ') {
            out.pop();
            out.push('x');
        }
        out
    }

    fn date_time(&mut self) -> String {
        DateTime::<Utc>::from_timestamp(self.rng.gen_range(TIMESTAMP_RANGE), 0)
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    fn uuid(&mut self) -> String {
        uuid::Builder::from_random_bytes(self.rng.gen())
            .into_uuid()
            .to_string()
    }
}

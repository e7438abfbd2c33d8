//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the crate.
//!
//! Enumeration visitors are generic over their own error type and never go
//! through `AppError`: whatever a visitor returns is handed back unchanged.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// A definition was registered twice under the same key.
    #[from(ignore)]
    #[display("Duplicate definition: {_0}")]
    Duplicate(String),

    /// A definition looked up by name does not exist.
    #[from(ignore)]
    #[display("Unknown definition: {_0}")]
    Unknown(String),

    /// The design failed the pre-finalization validation pass.
    #[from(ignore)]
    #[display("Validation Error: {_0}")]
    Validation(String),

    /// Wrapper for JSON (de)serialization errors.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// Wrapper for YAML deserialization errors.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_conversion() {
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_json_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(matches!(app_err, AppError::Json(_)));
    }

    #[test]
    fn test_display_prefixes() {
        let err = AppError::Duplicate(r#"resource "bottles""#.into());
        assert_eq!(err.to_string(), r#"Duplicate definition: resource "bottles""#);
        let err = AppError::Validation("bad parent".into());
        assert_eq!(err.to_string(), "Validation Error: bad parent");
    }
}

use crate::i18n::Language;
use thiserror::Error;

/// Errors raised while building or configuring an [`I18n`](crate::I18n) engine.
///
/// Lookups never fail: missing keys, languages and params all degrade to a
/// fallback string. Only malformed construction input ends up here.
#[derive(Debug, Error)]
pub enum I18nError {
    /// The `languages` construction field was not a mapping of catalogs.
    #[error("invalid configuration: `languages` must be an object of catalogs, found {found}")]
    InvalidCatalogSet { found: &'static str },

    /// A single language catalog was not a mapping.
    #[error("invalid configuration: catalog for language '{language}' must be an object, found {found}")]
    InvalidCatalog {
        language: Language,
        found: &'static str,
    },

    /// The configured default language has no catalog.
    #[error("invalid configuration: default language '{0}' has no catalog")]
    MissingDefaultLanguage(Language),

    /// Interpolation delimiters could not be compiled into a pattern.
    #[error("invalid interpolation delimiters: {0}")]
    Interpolation(#[from] regex::Error),

    /// The construction document was not valid JSON.
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The process-wide facade was used before `global::init`.
    #[error("global i18n instance is not initialized")]
    NotInitialized,
}

pub type Result<T> = std::result::Result<T, I18nError>;

/// Human-readable JSON type name, used in configuration errors.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

use crate::error::{json_kind, I18nError, Result};
use crate::i18n::{Catalog, Language};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// The set of catalogs, one per language.
pub type CatalogSet = HashMap<Language, Catalog>;

/// Construction input for [`I18n`](crate::I18n).
///
/// JSON form:
/// ```json
/// {
///   "defaultLanguage": "en",
///   "language": "zh",
///   "languages": { "en": { "hello": "Hello" }, "zh": { "hello": "你好" } },
///   "interpolation": { "prefix": "{", "suffix": "}" }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nOptions {
    // Fallback source for keys missing in the active language
    pub default_language: Language,

    // Initial active language; the default language when absent
    #[serde(default)]
    pub language: Option<Language>,

    pub languages: CatalogSet,

    #[serde(default)]
    pub interpolation: Option<InterpolationConfig>,
}

impl I18nOptions {
    pub fn new(default_language: impl Into<Language>) -> Self {
        Self {
            default_language: default_language.into(),
            language: None,
            languages: CatalogSet::new(),
            interpolation: None,
        }
    }

    /// Start in `language` instead of the default language.
    pub fn with_language(mut self, language: impl Into<Language>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Add (or replace) the catalog for `language`.
    pub fn with_catalog(mut self, language: impl Into<Language>, catalog: Catalog) -> Self {
        self.languages.insert(language.into(), catalog);
        self
    }

    /// Use custom placeholder delimiters.
    pub fn with_interpolation(mut self, interpolation: InterpolationConfig) -> Self {
        self.interpolation = Some(interpolation);
        self
    }

    /// Parse a JSON construction document.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build options from a JSON value, failing fast on a malformed catalog set.
    pub fn from_value(value: Value) -> Result<Self> {
        // Check container shapes first so the error names the offending field
        // instead of surfacing as a generic serde message.
        if let Some(languages) = value.get("languages") {
            let Value::Object(catalogs) = languages else {
                return Err(I18nError::InvalidCatalogSet {
                    found: json_kind(languages),
                });
            };
            for (code, catalog) in catalogs {
                if !catalog.is_object() {
                    return Err(I18nError::InvalidCatalog {
                        language: Language::new(code.as_str()),
                        found: json_kind(catalog),
                    });
                }
            }
        }

        Ok(serde_json::from_value(value)?)
    }

    pub(crate) fn initial_language(&self) -> Language {
        self.language
            .clone()
            .unwrap_or_else(|| self.default_language.clone())
    }
}

/// Placeholder delimiters, treated as literal text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InterpolationConfig {
    pub prefix: String,
    pub suffix: String,
}

impl InterpolationConfig {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self::new("{", "}")
    }
}

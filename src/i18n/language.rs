//! Language type: opaque, comparable language identifier.
//!
//! Any string is accepted as a language code. Whether a catalog exists for it
//! is decided by the engine at lookup time, not when the identifier is built.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A language identifier (e.g. "en", "zh", "pt-BR").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language {
    code: String,
}

impl Language {
    /// Create a Language from a language code string.
    ///
    /// # Example
    /// ```
    /// use mini_i18n::Language;
    ///
    /// let chinese = Language::new("zh");
    /// assert_eq!(chinese.code(), "zh");
    /// ```
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// Get the language code.
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl From<&str> for Language {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for Language {
    fn from(code: String) -> Self {
        Self { code }
    }
}

impl Borrow<str> for Language {
    fn borrow(&self) -> &str {
        &self.code
    }
}

impl PartialEq<str> for Language {
    fn eq(&self, other: &str) -> bool {
        self.code == other
    }
}

impl PartialEq<&str> for Language {
    fn eq(&self, other: &&str) -> bool {
        self.code == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // ==================== Construction Tests ====================

    #[test]
    fn test_new_keeps_code() {
        let language = Language::new("en");
        assert_eq!(language.code(), "en");
    }

    #[test]
    fn test_from_str_and_string_agree() {
        assert_eq!(Language::from("zh"), Language::from("zh".to_string()));
    }

    #[test]
    fn test_any_code_is_accepted() {
        // Unknown codes are valid identifiers; the engine treats them as empty.
        assert_eq!(Language::new("xx-unknown").code(), "xx-unknown");
        assert_eq!(Language::new("").code(), "");
    }

    // ==================== Trait Tests ====================

    #[test]
    fn test_language_equality() {
        assert_eq!(Language::new("en"), "en");
        assert_ne!(Language::new("en"), Language::new("EN"));
    }

    #[test]
    fn test_language_display() {
        assert_eq!(Language::new("pt-BR").to_string(), "pt-BR");
    }

    #[test]
    fn test_borrow_allows_str_lookup() {
        let mut map = HashMap::new();
        map.insert(Language::new("en"), 1);
        assert_eq!(map.get("en"), Some(&1));
    }

    #[test]
    fn test_serde_transparent() {
        let language = Language::new("fr");
        assert_eq!(serde_json::to_string(&language).unwrap(), "\"fr\"");
        let parsed: Language = serde_json::from_str("\"fr\"").unwrap();
        assert_eq!(parsed, language);
    }
}

//! Placeholder interpolation.
//!
//! A placeholder is `<prefix><name><suffix>` where `name` is one or more ASCII
//! letters, digits or underscores. Delimiters are literal text and are escaped
//! before the pattern is compiled, so `{{`, `$(` or `[[` work as-is.

use crate::config::InterpolationConfig;
use crate::error::Result;
use crate::i18n::Params;
use regex::{Captures, Regex};

/// Compiled placeholder pattern for one pair of delimiters.
#[derive(Debug, Clone)]
pub struct Interpolator {
    pattern: Regex,
}

impl Interpolator {
    /// Compile the placeholder pattern for `config`'s delimiters.
    pub fn new(config: &InterpolationConfig) -> Result<Self> {
        let pattern = format!(
            "{}([A-Za-z0-9_]+){}",
            regex::escape(&config.prefix),
            regex::escape(&config.suffix)
        );
        Ok(Self {
            pattern: Regex::new(&pattern)?,
        })
    }

    /// Replace every placeholder whose name is in `params`.
    ///
    /// Unknown placeholders are kept byte-for-byte. The scan is a single pass:
    /// substituted values are never searched for further placeholders.
    pub fn interpolate(&self, template: &str, params: &Params) -> String {
        self.pattern
            .replace_all(template, |caps: &Captures| match params.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Placeholder names appearing in `template`, in order of appearance.
    pub fn placeholders(&self, template: &str) -> Vec<String> {
        self.pattern
            .captures_iter(template)
            .map(|caps| caps[1].to_string())
            .collect()
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Interpolation parameters, keyed by placeholder name.
///
/// Values are stringified when inserted, so numbers and booleans render the
/// way their `Display` impl does (`95`, `true`).
pub type Params = BTreeMap<String, String>;

/// Per-call options for [`I18n::t`](crate::I18n::t).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TOptions {
    /// Returned (uncached) when the key is missing in the active language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Placeholder values substituted into the resolved template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

impl TOptions {
    /// Empty options: no default value, no params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value returned when the key is missing.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Add one interpolation parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params
            .get_or_insert_with(Params::new)
            .insert(name.into(), value.to_string());
        self
    }

    /// Replace all interpolation parameters.
    pub fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }
}

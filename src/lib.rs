//! Localized string resolution from nested key paths.
//!
//! An [`I18n`] engine holds one [`Catalog`] per language, an active language
//! and a default language. [`I18n::t`] walks a dotted key path (`nested.greeting`,
//! `tags.0`) through the active catalog, falls back to the default language,
//! interpolates `{param}` placeholders and caches the result. Language changes
//! and missing keys are published through a typed [`EventEmitter`].

pub mod config;
pub mod emitter;
pub mod error;
pub mod global;
pub mod i18n;

pub use config::{CatalogSet, I18nOptions, InterpolationConfig};
pub use emitter::{Event, EventEmitter, Listener, Subscription};
pub use error::{I18nError, Result};
pub use i18n::{
    Catalog, EventName, I18n, I18nEvent, Language, LanguagePayload, MetricsReport,
    MissingKeyPayload, Params, TOptions, ValidationReport,
};

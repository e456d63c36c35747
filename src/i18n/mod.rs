//! Translation engine: catalogs, lookup, interpolation and language events.
//!
//! # Architecture
//!
//! - `language`: Opaque language identifier
//! - `catalog`: Per-language nested catalogs and dotted key-path lookup
//! - `interpolation`: Single-pass placeholder substitution with literal delimiters
//! - `options`: Per-call options (`defaultValue`, `params`)
//! - `events`: Engine events and their payloads
//! - `engine`: The `I18n` engine tying the above together with a resolved-string cache
//! - `metrics`: Per-engine resolution counters
//! - `validator`: Cross-language catalog consistency checks
//!
//! # Example
//!
//! ```rust
//! use mini_i18n::{Catalog, I18n, I18nOptions};
//!
//! let options = I18nOptions::new("en")
//!     .with_catalog("en", Catalog::new().with("hello", "Hello"))
//!     .with_catalog("zh", Catalog::new().with("hello", "你好"));
//! let mut i18n = I18n::new(options)?;
//!
//! i18n.set_language("zh");
//! assert_eq!(i18n.t("hello"), "你好");
//! # Ok::<(), mini_i18n::I18nError>(())
//! ```

mod catalog;
mod engine;
mod events;
mod interpolation;
mod language;
mod metrics;
mod options;
mod validator;

pub use catalog::{Catalog, KEY_SEPARATOR};
pub use engine::I18n;
pub use events::{EventName, I18nEvent, LanguagePayload, MissingKeyPayload};
pub use interpolation::Interpolator;
pub use language::Language;
pub use metrics::{MetricsReport, ResolveMetrics};
pub use options::{Params, TOptions};
pub use validator::{CatalogValidator, ValidationReport};

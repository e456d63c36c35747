//! Process-wide i18n instance.
//!
//! A convenience facade over one shared [`I18n`] engine for applications that
//! want a single global translator. State is explicit: nothing works until
//! [`init`] is called, and [`reset`] drops the instance again.
//!
//! Unlike [`I18n::set_language`], [`use_language`] refuses to switch to a
//! language without a catalog and keeps the current one. [`t`] and [`t_with`]
//! also accept bracket subscripts: `tags[1]` resolves like `tags.1`.
//!
//! Listeners must not call back into this module's mutating functions
//! (`init`, `reset`, `use_language`, `add_language`): they run while the
//! instance is locked.

use crate::config::I18nOptions;
use crate::error::{I18nError, Result};
use crate::i18n::{Catalog, I18n, Language, TOptions};
use regex::Regex;
use std::borrow::Cow;
use std::sync::{OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

/// Global instance slot (initialized lazily)
static INSTANCE: OnceLock<RwLock<Option<I18n>>> = OnceLock::new();

static SUBSCRIPT_REGEX: OnceLock<Regex> = OnceLock::new();

fn slot() -> &'static RwLock<Option<I18n>> {
    INSTANCE.get_or_init(|| RwLock::new(None))
}

fn read() -> RwLockReadGuard<'static, Option<I18n>> {
    slot().read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write() -> RwLockWriteGuard<'static, Option<I18n>> {
    slot().write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Build the global instance, replacing any previous one.
pub fn init(options: I18nOptions) -> Result<()> {
    let i18n = I18n::new(options)?;
    info!(language = %i18n.language(), "Global i18n instance initialized");
    *write() = Some(i18n);
    Ok(())
}

/// Drop the global instance.
pub fn reset() {
    *write() = None;
}

/// Whether [`init`] has been called since the last [`reset`].
pub fn is_initialized() -> bool {
    read().is_some()
}

/// Run `f` against the global instance.
pub fn with<R>(f: impl FnOnce(&I18n) -> R) -> Result<R> {
    let guard = read();
    let i18n = guard.as_ref().ok_or(I18nError::NotInitialized)?;
    Ok(f(i18n))
}

fn with_mut<R>(f: impl FnOnce(&mut I18n) -> R) -> Result<R> {
    let mut guard = write();
    let i18n = guard.as_mut().ok_or(I18nError::NotInitialized)?;
    Ok(f(i18n))
}

/// Rewrite `[segment]` subscripts as dotted segments.
///
/// The engine caches and reports the rewritten key.
fn normalize_key(key: &str) -> Cow<'_, str> {
    let regex = SUBSCRIPT_REGEX.get_or_init(|| Regex::new(r"\[([A-Za-z0-9_]+)\]").unwrap());
    regex.replace_all(key, ".$1")
}

/// Resolve `key` with the global instance.
pub fn t(key: &str) -> Result<String> {
    let key = normalize_key(key);
    with(|i18n| i18n.t(&key))
}

/// Resolve `key` with options using the global instance.
pub fn t_with(key: &str, options: &TOptions) -> Result<String> {
    let key = normalize_key(key);
    with(|i18n| i18n.t_with(&key, options))
}

/// The global instance's active language.
pub fn language() -> Result<Language> {
    with(|i18n| i18n.language().clone())
}

/// Switch the global language and return the language now in use.
///
/// `None` just reports the current language. A language without a catalog
/// is refused with a warning and the current language is kept.
pub fn use_language(language: Option<&str>) -> Result<Language> {
    with_mut(|i18n| {
        let Some(language) = language else {
            return i18n.language().clone();
        };
        if !i18n.has_language(language) {
            warn!(
                requested = language,
                current = %i18n.language(),
                "Language switch failed: no catalog for requested language"
            );
            return i18n.language().clone();
        }
        i18n.set_language(language);
        i18n.language().clone()
    })
}

/// Insert or replace a catalog on the global instance.
pub fn add_language(language: impl Into<Language>, catalog: Catalog) -> Result<()> {
    with_mut(|i18n| i18n.add_language(language, catalog))
}

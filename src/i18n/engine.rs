use crate::config::{CatalogSet, I18nOptions};
use crate::emitter::{EventEmitter, Listener, Subscription};
use crate::error::{I18nError, Result};
use crate::i18n::{
    Catalog, CatalogValidator, EventName, I18nEvent, Interpolator, Language, LanguagePayload,
    MetricsReport, MissingKeyPayload, ResolveMetrics, TOptions, ValidationReport,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// The translation engine.
///
/// Owns the catalogs, the active and default languages, the resolved-string
/// cache and the event hub. Lookups take `&self`; language changes take
/// `&mut self`, so a switch is never observed half-done by a lookup.
///
/// # Example
/// ```
/// use mini_i18n::{Catalog, I18n, I18nOptions, TOptions};
/// use serde_json::json;
///
/// let options = I18nOptions::new("en")
///     .with_catalog("en", Catalog::new().with("nested", json!({ "greeting": "Hi, {name}!" })))
///     .with_catalog("zh", Catalog::new().with("hello", "你好"));
/// let mut i18n = I18n::new(options)?;
///
/// assert_eq!(i18n.t_with("nested.greeting", &TOptions::new().param("name", "John")), "Hi, John!");
///
/// i18n.set_language("zh");
/// assert_eq!(i18n.t("hello"), "你好");
/// assert_eq!(i18n.t("nested.greeting"), "Hi, {name}!");
/// # Ok::<(), mini_i18n::I18nError>(())
/// ```
#[derive(Debug)]
pub struct I18n {
    default_language: Language,
    language: Language,
    languages: CatalogSet,
    interpolator: Interpolator,
    // Keyed by the raw lookup key only; cleared on every language switch
    cache: Mutex<HashMap<String, String>>,
    events: EventEmitter<I18nEvent>,
    metrics: ResolveMetrics,
}

impl I18n {
    /// Build an engine from construction options.
    ///
    /// # Errors
    /// * `MissingDefaultLanguage` if `languages` has no catalog for the default language
    /// * `Interpolation` if the delimiters cannot be compiled
    pub fn new(options: I18nOptions) -> Result<Self> {
        if !options.languages.contains_key(&options.default_language) {
            return Err(I18nError::MissingDefaultLanguage(options.default_language));
        }

        let interpolation = options.interpolation.clone().unwrap_or_default();
        let interpolator = Interpolator::new(&interpolation)?;
        let language = options.initial_language();

        debug!(
            default_language = %options.default_language,
            language = %language,
            catalogs = options.languages.len(),
            "Initialized i18n engine"
        );

        Ok(Self {
            default_language: options.default_language,
            language,
            languages: options.languages,
            interpolator,
            cache: Mutex::new(HashMap::new()),
            events: EventEmitter::new(),
            metrics: ResolveMetrics::new(),
        })
    }

    /// Build an engine from a JSON construction document.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(I18nOptions::from_json(json)?)
    }

    // ==================== Resolution ====================

    /// Resolve `key` in the active language without options.
    pub fn t(&self, key: &str) -> String {
        self.resolve(key, None)
    }

    /// Resolve `key` with a default value and/or interpolation params.
    pub fn t_with(&self, key: &str, options: &TOptions) -> String {
        self.resolve(key, Some(options))
    }

    /// Resolve a dotted key path to its final string.
    ///
    /// Order of precedence:
    /// 1. A cached result for `key` (options are not part of the cache key)
    /// 2. The active language's catalog
    /// 3. `options.default_value`, returned without caching
    /// 4. The default language's catalog
    /// 5. `key` itself
    ///
    /// A `missingKey` event is emitted whenever step 2 fails. Params are only
    /// interpolated into values found in a catalog.
    ///
    /// The cache lock is held for the whole call, `missingKey` listeners
    /// included. A listener must not call `t`, `t_with`, `resolve`,
    /// `clear_cache` or `cache_len` on the same engine: that deadlocks.
    pub fn resolve(&self, key: &str, options: Option<&TOptions>) -> String {
        // One guard for the whole operation: concurrent resolves of the same
        // key serialize into one miss followed by hits.
        let mut cache = self.cache();
        if let Some(cached) = cache.get(key) {
            self.metrics.record_cache_hit();
            debug!(key, "Translation cache hit");
            return cached.clone();
        }
        self.metrics.record_cache_miss();

        let mut value = self.lookup(&self.language, key);

        if value.is_none() {
            self.metrics.record_missing_key();
            warn!(key, language = %self.language, "Missing translation key");
            self.events.emit(&I18nEvent::MissingKey(MissingKeyPayload {
                key: key.to_string(),
                options: options.cloned(),
            }));

            // Any default wins here, an empty one included
            if let Some(default_value) = options.and_then(|o| o.default_value.as_ref()) {
                return default_value.clone();
            }

            if self.language != self.default_language {
                value = self.lookup(&self.default_language, key);
                if value.is_some() {
                    self.metrics.record_fallback();
                }
            }
        }

        let rendered = match (value, options.and_then(|o| o.params.as_ref())) {
            (Some(template), Some(params)) => self.interpolator.interpolate(&template, params),
            (Some(template), None) => template,
            (None, _) => {
                self.metrics.record_echoed_key();
                key.to_string()
            }
        };

        cache.insert(key.to_string(), rendered.clone());
        rendered
    }

    fn lookup(&self, language: &Language, key: &str) -> Option<String> {
        self.languages.get(language)?.lookup(key)
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // Poisoning means a listener panicked mid-resolve, before anything
        // was inserted, so the map is still consistent.
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Drop every cached resolution.
    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    /// Number of cached resolutions.
    pub fn cache_len(&self) -> usize {
        self.cache().len()
    }

    // ==================== Languages ====================

    /// The active language.
    pub fn language(&self) -> &Language {
        &self.language
    }

    /// The fallback language fixed at construction.
    pub fn default_language(&self) -> &Language {
        &self.default_language
    }

    /// Whether a catalog is registered for `language`.
    pub fn has_language(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    /// Registered languages, sorted by code.
    pub fn languages(&self) -> Vec<&Language> {
        let mut languages: Vec<&Language> = self.languages.keys().collect();
        languages.sort();
        languages
    }

    /// Switch the active language.
    ///
    /// Emits `language:changed` first, then clears the cache and switches.
    /// The language is not required to have a catalog; lookups then fall
    /// through to the default language. The cache is cleared even when the
    /// language does not change.
    pub fn set_language(&mut self, language: impl Into<Language>) {
        let language = language.into();
        self.events
            .emit(&I18nEvent::LanguageChanged(LanguagePayload {
                language: language.clone(),
            }));

        self.clear_cache();
        debug!(
            from = %self.language,
            to = %language,
            has_catalog = self.languages.contains_key(&language),
            "Language changed"
        );
        self.language = language;
    }

    /// Insert or replace the catalog for `language`.
    ///
    /// Replacement is wholesale. The cache and the active language are left
    /// untouched.
    pub fn add_language(&mut self, language: impl Into<Language>, catalog: Catalog) {
        let language = language.into();
        let replaced = self.languages.insert(language.clone(), catalog).is_some();
        info!(language = %language, replaced, "Language catalog added");

        self.events
            .emit(&I18nEvent::LanguageAdded(LanguagePayload { language }));
    }

    // ==================== Events ====================

    /// Subscribe to an engine event.
    pub fn on<F>(&self, name: EventName, callback: F) -> Subscription<I18nEvent>
    where
        F: Fn(&I18nEvent) + Send + Sync + 'static,
    {
        self.events.on(name, callback)
    }

    /// Subscribe a shared listener; the same `Arc` registers only once per event.
    pub fn on_listener(&self, name: EventName, listener: Listener<I18nEvent>) -> Subscription<I18nEvent> {
        self.events.on_listener(name, listener)
    }

    /// Subscribe to the next occurrence of an engine event only.
    pub fn once<F>(&self, name: EventName, callback: F) -> Subscription<I18nEvent>
    where
        F: Fn(&I18nEvent) + Send + Sync + 'static,
    {
        self.events.once(name, callback)
    }

    /// Remove the registration of `listener` for `name`. No-op if absent.
    pub fn off(&self, name: EventName, listener: &Listener<I18nEvent>) {
        self.events.off(name, listener);
    }

    /// Remove listeners for one event, or for all events when `None`.
    pub fn clear_listeners(&self, name: Option<EventName>) {
        self.events.clear(name);
    }

    /// Subscribe to `missingKey` with its payload.
    ///
    /// The callback runs inside [`I18n::resolve`] while the cache lock is
    /// held; it must not resolve keys on the same engine.
    pub fn on_missing_key<F>(&self, callback: F) -> Subscription<I18nEvent>
    where
        F: Fn(&MissingKeyPayload) + Send + Sync + 'static,
    {
        self.events.on(EventName::MissingKey, move |event: &I18nEvent| {
            if let I18nEvent::MissingKey(payload) = event {
                callback(payload);
            }
        })
    }

    /// Subscribe to `language:changed` with its payload.
    pub fn on_language_changed<F>(&self, callback: F) -> Subscription<I18nEvent>
    where
        F: Fn(&LanguagePayload) + Send + Sync + 'static,
    {
        self.events.on(EventName::LanguageChanged, move |event: &I18nEvent| {
            if let I18nEvent::LanguageChanged(payload) = event {
                callback(payload);
            }
        })
    }

    /// Subscribe to `language:added` with its payload.
    pub fn on_language_added<F>(&self, callback: F) -> Subscription<I18nEvent>
    where
        F: Fn(&LanguagePayload) + Send + Sync + 'static,
    {
        self.events.on(EventName::LanguageAdded, move |event: &I18nEvent| {
            if let I18nEvent::LanguageAdded(payload) = event {
                callback(payload);
            }
        })
    }

    // ==================== Diagnostics ====================

    /// Snapshot of this engine's resolution counters.
    pub fn metrics(&self) -> MetricsReport {
        self.metrics.report()
    }

    /// Reset this engine's resolution counters to zero.
    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }

    /// Check every catalog against the default language's catalog.
    pub fn validate(&self) -> ValidationReport {
        CatalogValidator::new(&self.interpolator).validate(&self.default_language, &self.languages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterpolationConfig;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn catalog(value: serde_json::Value) -> Catalog {
        Catalog::from_value(&Language::new("test"), value).expect("catalog should be an object")
    }

    fn engine() -> I18n {
        I18n::new(
            I18nOptions::new("en")
                .with_catalog(
                    "en",
                    catalog(json!({
                        "hello": "Hello",
                        "nested": { "greeting": "Hi, {name}!" },
                        "only_en": "English only"
                    })),
                )
                .with_catalog(
                    "zh",
                    catalog(json!({
                        "hello": "你好",
                        "nested": { "greeting": "你好, {name}!" }
                    })),
                ),
        )
        .expect("engine should build")
    }

    fn missing_key_counter(i18n: &I18n) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        i18n.on_missing_key(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_new_starts_in_default_language() {
        let i18n = engine();
        assert_eq!(i18n.language(), &Language::new("en"));
        assert_eq!(i18n.default_language(), &Language::new("en"));
    }

    #[test]
    fn test_new_with_explicit_language() {
        let i18n = I18n::new(
            I18nOptions::new("en")
                .with_language("zh")
                .with_catalog("en", Catalog::new())
                .with_catalog("zh", Catalog::new().with("hello", "你好")),
        )
        .unwrap();
        assert_eq!(i18n.language(), &Language::new("zh"));
        assert_eq!(i18n.t("hello"), "你好");
    }

    #[test]
    fn test_new_requires_default_catalog() {
        let err = I18n::new(I18nOptions::new("en").with_catalog("zh", Catalog::new())).unwrap_err();
        assert!(matches!(err, I18nError::MissingDefaultLanguage(lang) if lang == "en"));
    }

    #[test]
    fn test_from_json() {
        let i18n = I18n::from_json(
            r#"{ "defaultLanguage": "en", "languages": { "en": { "hello": "Hello" } } }"#,
        )
        .unwrap();
        assert_eq!(i18n.t("hello"), "Hello");
    }

    #[test]
    fn test_languages_sorted() {
        let i18n = engine();
        let codes: Vec<&str> = i18n.languages().iter().map(|l| l.code()).collect();
        assert_eq!(codes, vec!["en", "zh"]);
        assert!(i18n.has_language("zh"));
        assert!(!i18n.has_language("fr"));
    }

    // ==================== Resolution Tests ====================

    #[test]
    fn test_t_returns_leaf() {
        assert_eq!(engine().t("hello"), "Hello");
    }

    #[test]
    fn test_t_with_params() {
        let i18n = engine();
        let result = i18n.t_with("nested.greeting", &TOptions::new().param("name", "John"));
        assert_eq!(result, "Hi, John!");
    }

    #[test]
    fn test_missing_key_echoes_key() {
        let i18n = engine();
        let count = missing_key_counter(&i18n);

        assert_eq!(i18n.t("a.b.x"), "a.b.x");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_echoed_key_is_not_interpolated() {
        let i18n = engine();
        let result = i18n.t_with("{name}", &TOptions::new().param("name", "X"));
        assert_eq!(result, "{name}");
    }

    #[test]
    fn test_fallback_to_default_language() {
        let mut i18n = engine();
        i18n.set_language("zh");
        let count = missing_key_counter(&i18n);

        assert_eq!(i18n.t("only_en"), "English only");
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(i18n.metrics().fallbacks, 1);
    }

    #[test]
    fn test_unknown_active_language_falls_back() {
        let mut i18n = engine();
        i18n.set_language("fr");
        assert_eq!(i18n.language(), &Language::new("fr"));
        assert_eq!(i18n.t("hello"), "Hello");
    }

    #[test]
    fn test_default_value_skips_cache_and_fallback() {
        let mut i18n = engine();
        i18n.set_language("zh");
        let count = missing_key_counter(&i18n);

        let options = TOptions::new().default_value("fallback");
        assert_eq!(i18n.t_with("only_en", &options), "fallback");
        assert_eq!(i18n.cache_len(), 0);

        let options = TOptions::new().default_value("other");
        assert_eq!(i18n.t_with("only_en", &options), "other");
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_default_value_unused_when_key_found() {
        let i18n = engine();
        let options = TOptions::new().default_value("unused");
        assert_eq!(i18n.t_with("hello", &options), "Hello");
    }

    // ==================== Cache Tests ====================

    #[test]
    fn test_cache_ignores_options() {
        let i18n = engine();
        let first = i18n.t_with("nested.greeting", &TOptions::new().param("name", "A"));
        let second = i18n.t_with("nested.greeting", &TOptions::new().param("name", "B"));

        assert_eq!(first, "Hi, A!");
        assert_eq!(second, "Hi, A!");
        assert_eq!(i18n.metrics().cache_hits, 1);
    }

    #[test]
    fn test_echoed_key_is_cached() {
        let i18n = engine();
        let count = missing_key_counter(&i18n);

        i18n.t("missing");
        i18n.t("missing");

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(i18n.cache_len(), 1);
    }

    #[test]
    fn test_clear_cache_recomputes() {
        let i18n = engine();
        i18n.t_with("nested.greeting", &TOptions::new().param("name", "A"));
        i18n.clear_cache();
        assert_eq!(i18n.cache_len(), 0);

        let result = i18n.t_with("nested.greeting", &TOptions::new().param("name", "B"));
        assert_eq!(result, "Hi, B!");
    }

    #[test]
    fn test_set_language_clears_cache_even_when_unchanged() {
        let mut i18n = engine();
        i18n.t("hello");
        assert_eq!(i18n.cache_len(), 1);

        i18n.set_language("en");
        assert_eq!(i18n.cache_len(), 0);
    }

    #[test]
    fn test_add_language_keeps_cache_and_language() {
        let mut i18n = engine();
        i18n.t("hello");
        i18n.add_language("fr", Catalog::new().with("hello", "Bonjour"));

        assert_eq!(i18n.cache_len(), 1);
        assert_eq!(i18n.language(), &Language::new("en"));
        assert!(i18n.has_language("fr"));
    }

    #[test]
    fn test_add_language_replaces_wholesale() {
        let mut i18n = engine();
        i18n.add_language("zh", Catalog::new().with("bye", "再见"));
        i18n.set_language("zh");

        assert_eq!(i18n.t("bye"), "再见");
        // "hello" was dropped with the old catalog, so it falls back to English
        assert_eq!(i18n.t("hello"), "Hello");
    }

    // ==================== Event Tests ====================

    #[test]
    fn test_language_changed_emitted() {
        let mut i18n = engine();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        i18n.on_language_changed(move |payload| s.lock().unwrap().push(payload.clone()));

        i18n.set_language("zh");

        assert_eq!(
            *seen.lock().unwrap(),
            vec![LanguagePayload {
                language: Language::new("zh")
            }]
        );
    }

    #[test]
    fn test_language_added_emitted() {
        let mut i18n = engine();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        i18n.on_language_added(move |payload| s.lock().unwrap().push(payload.language.clone()));

        i18n.add_language("fr", Catalog::new());

        assert_eq!(*seen.lock().unwrap(), vec![Language::new("fr")]);
    }

    #[test]
    fn test_missing_key_payload_carries_options() {
        let i18n = engine();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        i18n.on_missing_key(move |payload| s.lock().unwrap().push(payload.clone()));

        let options = TOptions::new().default_value("default value").param("name", "Tom");
        assert_eq!(i18n.t_with("greeting.nonexistent", &options), "default value");

        assert_eq!(
            *seen.lock().unwrap(),
            vec![MissingKeyPayload {
                key: "greeting.nonexistent".to_string(),
                options: Some(options),
            }]
        );
    }

    #[test]
    fn test_off_removes_shared_listener() {
        let i18n = engine();
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let listener: Listener<I18nEvent> = Arc::new(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        i18n.on_listener(EventName::MissingKey, Arc::clone(&listener));
        i18n.t("first");
        i18n.off(EventName::MissingKey, &listener);
        i18n.t("second");

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_once_and_clear_listeners() {
        let mut i18n = engine();
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        i18n.once(EventName::LanguageChanged, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        i18n.set_language("zh");
        i18n.set_language("en");
        assert_eq!(count.load(Ordering::SeqCst), 1);

        let missing = missing_key_counter(&i18n);
        i18n.clear_listeners(None);
        i18n.t("nope");
        assert_eq!(missing.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_panicking_listener_leaves_language_unchanged() {
        let mut i18n = engine();
        i18n.on(EventName::LanguageChanged, |_| panic!("listener failed"));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            i18n.set_language("zh");
        }));

        assert!(result.is_err());
        assert_eq!(i18n.language(), &Language::new("en"));
    }

    #[test]
    fn test_panicking_missing_key_listener_caches_nothing() {
        let i18n = engine();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        i18n.on_missing_key(move |_| {
            if c.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("listener failed");
            }
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| i18n.t("missing")));
        assert!(result.is_err());
        assert_eq!(i18n.cache_len(), 0);

        // Retrying emits again and yields the same value as an undisturbed call
        assert_eq!(i18n.t("missing"), "missing");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(i18n.cache_len(), 1);
    }

    #[test]
    fn test_empty_default_value_is_returned() {
        let i18n = engine();
        let options = TOptions::new().default_value("");

        assert_eq!(i18n.t_with("missing", &options), "");
        assert_eq!(i18n.cache_len(), 0);
    }

    #[test]
    fn test_fallback_value_is_cached() {
        let mut i18n = engine();
        i18n.set_language("zh");
        let count = missing_key_counter(&i18n);

        assert_eq!(i18n.t("only_en"), "English only");
        assert_eq!(i18n.t("only_en"), "English only");

        assert_eq!(count.load(Ordering::SeqCst), 1);
        let report = i18n.metrics();
        assert_eq!(report.cache_hits, 1);
        assert_eq!(report.fallbacks, 1);
    }

    // ==================== Concurrency Tests ====================

    #[test]
    fn test_concurrent_resolves_of_same_key_miss_once() {
        let i18n = Arc::new(engine());
        let emitted = Arc::new(AtomicUsize::new(0));
        let e = Arc::clone(&emitted);
        i18n.on_missing_key(move |_| {
            e.fetch_add(1, Ordering::SeqCst);
            // Widen the window between the cache check and the insert
            std::thread::sleep(std::time::Duration::from_millis(50));
        });

        let barrier = Arc::new(std::sync::Barrier::new(2));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let i18n = Arc::clone(&i18n);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    i18n.t("missing")
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "missing");
        }

        assert_eq!(emitted.load(Ordering::SeqCst), 1);
        let report = i18n.metrics();
        assert_eq!(report.cache_misses, 1);
        assert_eq!(report.cache_hits, 1);
    }

    // ==================== Interpolation Config Tests ====================

    #[test]
    fn test_custom_delimiters() {
        let i18n = I18n::new(
            I18nOptions::new("en")
                .with_catalog("en", Catalog::new().with("greet", "Hi <<name>>! {name}"))
                .with_interpolation(InterpolationConfig::new("<<", ">>")),
        )
        .unwrap();

        let result = i18n.t_with("greet", &TOptions::new().param("name", "Lete"));
        assert_eq!(result, "Hi Lete! {name}");
    }

    // ==================== Metrics Tests ====================

    #[test]
    fn test_metrics_track_resolution() {
        let i18n = engine();
        i18n.t("hello");
        i18n.t("hello");
        i18n.t("missing");

        let report = i18n.metrics();
        assert_eq!(report.cache_hits, 1);
        assert_eq!(report.cache_misses, 2);
        assert_eq!(report.missing_keys, 1);
        assert_eq!(report.echoed_keys, 1);

        i18n.reset_metrics();
        assert_eq!(i18n.metrics().cache_misses, 0);
    }
}

//! Events emitted by the translation engine.
//!
//! Payload shapes are part of the public contract:
//! - `language:added`   `{ language }`
//! - `language:changed` `{ language }`
//! - `missingKey`       `{ key, options }`

use crate::emitter::Event;
use crate::i18n::{Language, TOptions};
use serde::Serialize;
use std::fmt;

/// Tag for each engine event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    LanguageAdded,
    LanguageChanged,
    MissingKey,
}

impl EventName {
    /// Wire name of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::LanguageAdded => "language:added",
            EventName::LanguageChanged => "language:changed",
            EventName::MissingKey => "missingKey",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of `language:added` and `language:changed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguagePayload {
    pub language: Language,
}

/// Payload of `missingKey`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingKeyPayload {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<TOptions>,
}

/// An engine event with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "payload")]
pub enum I18nEvent {
    #[serde(rename = "language:added")]
    LanguageAdded(LanguagePayload),
    #[serde(rename = "language:changed")]
    LanguageChanged(LanguagePayload),
    #[serde(rename = "missingKey")]
    MissingKey(MissingKeyPayload),
}

impl Event for I18nEvent {
    type Name = EventName;

    fn name(&self) -> EventName {
        match self {
            I18nEvent::LanguageAdded(_) => EventName::LanguageAdded,
            I18nEvent::LanguageChanged(_) => EventName::LanguageChanged,
            I18nEvent::MissingKey(_) => EventName::MissingKey,
        }
    }
}

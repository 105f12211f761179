use std::time::Duration;

use serde::Serialize;

use crate::{
    config::options::VisualEditOptions,
    toggle::locale::{DEFAULT_LANGUAGE, LocaleTable},
};

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Resolved configuration the overlay runtime reads. Built once, never mutated.
///
/// Serializes to the camelCase shape embedded in the served page.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    pub persist_state: bool,
    /// Milliseconds
    #[serde(rename = "submitTimeout")]
    pub submit_timeout_ms: u64,
    pub show_badge: bool,
    pub enable_keyboard_shortcut: bool,
    pub message_type_data_request: String,
    pub message_type_data_response: String,
    pub message_type_toggle: String,
    pub message_type_language: String,
    pub default_enabled: bool,
    pub color_hover: String,
    pub color_selected: String,
    pub color_submit: String,
    pub attribute_source_location: String,
    pub attribute_dynamic_content: String,
    /// Initial language; the live one belongs to the toggle controller
    pub language: String,
    pub translations: LocaleTable,
    pub storage_key: String,
    pub runtime_src: String,
}

impl RuntimeConfig {
    pub fn from_options(options: &VisualEditOptions) -> Self {
        let defaults = VisualEditOptions::default();
        let translations = LocaleTable::with_overrides(&options.translations);
        let language = if translations.contains(&options.language) {
            options.language.clone()
        } else {
            DEFAULT_LANGUAGE.to_string()
        };

        Self {
            persist_state: options.persist_state,
            submit_timeout_ms: seconds_to_millis(options.submit_timeout),
            show_badge: options.show_badge,
            enable_keyboard_shortcut: options.enable_keyboard_shortcut,
            message_type_data_request: or_default(
                &options.message_type_data_request,
                &defaults.message_type_data_request,
            ),
            message_type_data_response: or_default(
                &options.message_type_data_response,
                &defaults.message_type_data_response,
            ),
            message_type_toggle: or_default(&options.message_type_toggle, &defaults.message_type_toggle),
            message_type_language: or_default(
                &options.message_type_language,
                &defaults.message_type_language,
            ),
            default_enabled: options.default_enabled,
            color_hover: or_default(&options.color_hover, &defaults.color_hover),
            color_selected: or_default(&options.color_selected, &defaults.color_selected),
            color_submit: or_default(&options.color_submit, &defaults.color_submit),
            attribute_source_location: or_default(
                &options.attribute_source_location,
                &defaults.attribute_source_location,
            ),
            attribute_dynamic_content: or_default(
                &options.attribute_dynamic_content,
                &defaults.attribute_dynamic_content,
            ),
            language,
            translations,
            storage_key: or_default(&options.storage_key, &defaults.storage_key),
            runtime_src: or_default(&options.runtime_src, &defaults.runtime_src),
        }
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_options(&VisualEditOptions::default())
    }
}

/// Non-finite or negative timeouts fall back to the default.
fn seconds_to_millis(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds >= 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        DEFAULT_TIMEOUT_MS
    }
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

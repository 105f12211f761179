use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    tagger::{
        source_path::{DEFAULT_EXCLUDE, DEFAULT_SOURCE_ROOT},
        tagger::{DEFAULT_ATTR_DYNAMIC_CONTENT, DEFAULT_ATTR_SOURCE_LOCATION},
    },
    toggle::locale::{DEFAULT_LANGUAGE, TranslationOverride},
};

// ============================================================================
// Authored options (optional YAML: `visual-edit.yaml`)
// ============================================================================

/// Options as a developer writes them. Timeout is in seconds here; it is
/// converted once when the runtime configuration is resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisualEditOptions {
    /// Regex sources; matching files are never tagged
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    #[serde(default = "default_source_root")]
    pub source_root: String,

    /// Save toggle state in the origin's key-value store
    #[serde(default = "default_true")]
    pub persist_state: bool,

    /// Seconds to wait for the parent's response
    #[serde(default = "default_submit_timeout")]
    pub submit_timeout: f64,

    #[serde(default)]
    pub show_badge: bool,

    /// Ctrl/Cmd+Shift+E flips the engine
    #[serde(default)]
    pub enable_keyboard_shortcut: bool,

    #[serde(default = "default_request_type")]
    pub message_type_data_request: String,

    #[serde(default = "default_response_type")]
    pub message_type_data_response: String,

    #[serde(default = "default_toggle_type")]
    pub message_type_toggle: String,

    #[serde(default = "default_language_type")]
    pub message_type_language: String,

    #[serde(default)]
    pub default_enabled: bool,

    #[serde(default = "default_color_hover")]
    pub color_hover: String,

    #[serde(default = "default_color_selected")]
    pub color_selected: String,

    #[serde(default = "default_color_selected")]
    pub color_submit: String,

    #[serde(default = "default_attr_source_location")]
    pub attribute_source_location: String,

    #[serde(default = "default_attr_dynamic_content")]
    pub attribute_dynamic_content: String,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub translations: BTreeMap<String, TranslationOverride>,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// URL the injected bootstrap loads the runtime bundle from
    #[serde(default = "default_runtime_src")]
    pub runtime_src: String,
}

impl Default for VisualEditOptions {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
            source_root: default_source_root(),
            persist_state: true,
            submit_timeout: default_submit_timeout(),
            show_badge: false,
            enable_keyboard_shortcut: false,
            message_type_data_request: default_request_type(),
            message_type_data_response: default_response_type(),
            message_type_toggle: default_toggle_type(),
            message_type_language: default_language_type(),
            default_enabled: false,
            color_hover: default_color_hover(),
            color_selected: default_color_selected(),
            color_submit: default_color_selected(),
            attribute_source_location: default_attr_source_location(),
            attribute_dynamic_content: default_attr_dynamic_content(),
            language: default_language(),
            translations: BTreeMap::new(),
            storage_key: default_storage_key(),
            runtime_src: default_runtime_src(),
        }
    }
}

// Serde default helpers
fn default_exclude() -> Vec<String> { DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect() }
fn default_source_root() -> String { DEFAULT_SOURCE_ROOT.to_string() }
fn default_true() -> bool { true }
fn default_submit_timeout() -> f64 { 10.0 }
fn default_request_type() -> String { "visual-edit-request".to_string() }
fn default_response_type() -> String { "visual-edit-response".to_string() }
fn default_toggle_type() -> String { "visual-edit-toggle".to_string() }
fn default_language_type() -> String { "visual-edit-language".to_string() }
fn default_color_hover() -> String { "#3b82f6".to_string() }
fn default_color_selected() -> String { "#10b981".to_string() }
fn default_attr_source_location() -> String { DEFAULT_ATTR_SOURCE_LOCATION.to_string() }
fn default_attr_dynamic_content() -> String { DEFAULT_ATTR_DYNAMIC_CONTENT.to_string() }
fn default_language() -> String { DEFAULT_LANGUAGE.to_string() }
fn default_storage_key() -> String { "visual-edit-enabled".to_string() }
fn default_runtime_src() -> String { "/@visual-edit/runtime.js".to_string() }

// ============================================================================
// Loading
// ============================================================================

pub const DEFAULT_OPTIONS_PATH: &str = "visual-edit.yaml";

/// Load options from a YAML file. Returns defaults if the file is missing or malformed.
pub fn load_options(path: Option<&str>) -> VisualEditOptions {
    let options_path = path.unwrap_or(DEFAULT_OPTIONS_PATH);
    match std::fs::read_to_string(options_path) {
        Ok(content) => parse_options(&content),
        Err(_) => VisualEditOptions::default(),
    }
}

/// Parse YAML options text; malformed input yields the defaults.
pub fn parse_options(yaml: &str) -> VisualEditOptions {
    match serde_yaml::from_str::<VisualEditOptions>(yaml) {
        Ok(options) => options,
        Err(e) => {
            warn!(error = %e, "malformed options, using defaults");
            VisualEditOptions::default()
        }
    }
}

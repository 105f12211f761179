use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::runtime_config::RuntimeConfig,
    overlay::scene::Badge,
    toggle::{locale::LocaleTable, store::KeyValueStore},
};

/// A key press with its modifier state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
}

impl KeyChord {
    pub fn key(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    pub fn ctrl_shift(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ctrl: true,
            shift: true,
            ..Self::default()
        }
    }
}

/// Enabled flag, its persistence, and the live locale.
pub struct ToggleController {
    enabled: bool,
    persist: bool,
    storage_key: String,
    store: Box<dyn KeyValueStore>,
    shortcut: bool,
    show_badge: bool,
    badge_color: String,
    language: String,
    translations: LocaleTable,
}

impl ToggleController {
    /// Start from the configured default, then let a persisted value win.
    /// A store that cannot be read is treated as empty.
    pub fn new(config: &RuntimeConfig, store: Box<dyn KeyValueStore>) -> Self {
        let mut enabled = config.default_enabled;
        if config.persist_state {
            match store.get(&config.storage_key) {
                Ok(Some(saved)) => enabled = saved == "true",
                Ok(None) => {}
                Err(e) => warn!(error = %e, "could not read persisted toggle state"),
            }
        }

        Self {
            enabled,
            persist: config.persist_state,
            storage_key: config.storage_key.clone(),
            store,
            shortcut: config.enable_keyboard_shortcut,
            show_badge: config.show_badge,
            badge_color: config.color_submit.clone(),
            language: config.language.clone(),
            translations: config.translations.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if self.persist {
            let value = if enabled { "true" } else { "false" };
            if let Err(e) = self.store.set(&self.storage_key, value) {
                warn!(error = %e, "could not persist toggle state");
            }
        }
        debug!(enabled, "visual edit toggled");
    }

    /// Ctrl or Cmd, plus Shift, plus E.
    pub fn matches_shortcut(&self, chord: &KeyChord) -> bool {
        self.shortcut && (chord.ctrl || chord.meta) && chord.shift && chord.key.eq_ignore_ascii_case("e")
    }

    pub fn badge(&self) -> Option<Badge> {
        self.show_badge
            .then(|| Badge::new(self.enabled, &self.badge_color))
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Switch locale; unknown codes are ignored. Returns whether it switched.
    pub fn set_language(&mut self, code: &str) -> bool {
        if !self.translations.contains(code) {
            debug!(language = %code, "unknown language ignored");
            return false;
        }
        self.language = code.to_string();
        true
    }

    pub fn placeholder(&self) -> &str {
        self.translations.placeholder(&self.language)
    }
}

impl std::fmt::Debug for ToggleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToggleController")
            .field("enabled", &self.enabled)
            .field("persist", &self.persist)
            .field("language", &self.language)
            .finish()
    }
}

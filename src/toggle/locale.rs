use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Translation {
    /// Placeholder of the edit-request input
    pub placeholder: String,
}

/// Authored override; missing fields keep the built-in text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TranslationOverride {
    #[serde(default)]
    pub placeholder: Option<String>,
}

/// Language code → strings of the edit form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct LocaleTable(BTreeMap<String, Translation>);

impl LocaleTable {
    pub fn builtin() -> Self {
        let entries = [
            ("en", "Describe the change you want..."),
            ("ko", "원하는 변경 사항을 입력하세요..."),
            ("vn", "Mô tả thay đổi bạn muốn..."),
            ("jp", "変更したい内容を入力してください..."),
            ("ch", "描述你想要的修改..."),
        ];
        Self(
            entries
                .into_iter()
                .map(|(code, placeholder)| {
                    (
                        code.to_string(),
                        Translation {
                            placeholder: placeholder.to_string(),
                        },
                    )
                })
                .collect(),
        )
    }

    /// Built-ins with authored overrides laid on top. Overrides for unknown
    /// codes only take effect when they carry a placeholder.
    pub fn with_overrides(overrides: &BTreeMap<String, TranslationOverride>) -> Self {
        let mut table = Self::builtin();
        for (code, over) in overrides {
            match (table.0.get_mut(code), &over.placeholder) {
                (Some(existing), Some(text)) => existing.placeholder = text.clone(),
                (None, Some(text)) => {
                    table.0.insert(
                        code.clone(),
                        Translation {
                            placeholder: text.clone(),
                        },
                    );
                }
                (_, None) => {}
            }
        }
        table
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains_key(code)
    }

    /// Placeholder for `code`, falling back to English.
    pub fn placeholder(&self, code: &str) -> &str {
        self.0
            .get(code)
            .or_else(|| self.0.get(DEFAULT_LANGUAGE))
            .map(|t| t.placeholder.as_str())
            .unwrap_or("")
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Default for LocaleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

use tracing::debug;

use crate::config::runtime_config::RuntimeConfig;

const BODY_CLOSE: &str = "</body>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    /// Development when the mode says so or the dev server is running.
    pub fn detect(mode: &str, command: &str) -> Self {
        if mode == "development" || command == "serve" {
            BuildMode::Development
        } else {
            BuildMode::Production
        }
    }
}

/// Bootstrap markup: the config object, then the runtime bundle.
pub fn bootstrap_snippet(config: &RuntimeConfig) -> String {
    // `</` inside a string literal would end the inline script early.
    let json = config.to_json().to_string().replace("</", "<\\/");
    format!(
        "<script>window.__VISUAL_EDIT_CONFIG__={};</script>\n<script type=\"module\" src=\"{}\"></script>",
        json,
        escape_attribute(&config.runtime_src)
    )
}

/// Insert the bootstrap right before the closing body tag.
///
/// Production builds and documents without a body close tag come back unchanged.
pub fn inject_runtime(html: &str, config: &RuntimeConfig, mode: BuildMode) -> String {
    if mode == BuildMode::Production {
        return html.to_string();
    }
    let Some(at) = html.rfind(BODY_CLOSE) else {
        debug!("no closing body tag, runtime not injected");
        return html.to_string();
    };

    let snippet = bootstrap_snippet(config);
    let mut out = String::with_capacity(html.len() + snippet.len() + 1);
    out.push_str(&html[..at]);
    out.push_str(&snippet);
    out.push('\n');
    out.push_str(&html[at..]);
    out
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

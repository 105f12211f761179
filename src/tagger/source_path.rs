use regex::Regex;
use tracing::warn;

pub const DEFAULT_EXCLUDE: &[&str] = &["node_modules", "components/ui/"];
pub const DEFAULT_SOURCE_ROOT: &str = "src";

/// Decides which files get tagged and what their location prefix is.
#[derive(Debug, Clone)]
pub struct SourceScope {
    exclude: Vec<Regex>,
    root_pattern: Option<Regex>,
    root_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathResolution {
    /// Matched an exclusion pattern
    Excluded,
    /// No `<root>/` segment in the path
    OutsideRoot,
    /// Path below the root, without extension
    Relative(String),
}

impl SourceScope {
    /// Build a scope from regex source strings. Patterns that fail to compile
    /// are dropped; if none survive out of a non-empty list the defaults apply.
    pub fn new(exclude: &[String], source_root: &str) -> Self {
        let mut compiled: Vec<Regex> = exclude
            .iter()
            .filter_map(|p| match Regex::new(p) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!(pattern = %p, error = %e, "dropping invalid exclude pattern");
                    None
                }
            })
            .collect();

        if compiled.is_empty() && !exclude.is_empty() {
            compiled = default_excludes();
        }

        let root = source_root.trim_matches('/');
        let root = if root.is_empty() { DEFAULT_SOURCE_ROOT } else { root };
        let escaped = regex::escape(root);

        Self {
            exclude: compiled,
            root_pattern: Regex::new(&format!("(?:^|/)({}/.*)$", escaped)).ok(),
            root_prefix: format!("{}/", root),
        }
    }

    pub fn resolve(&self, path: &str) -> PathResolution {
        let normalized = path.replace('\\', "/");

        if self.exclude.iter().any(|re| re.is_match(&normalized)) {
            return PathResolution::Excluded;
        }

        let Some(captured) = self
            .root_pattern
            .as_ref()
            .and_then(|re| re.captures(&normalized))
            .and_then(|c| c.get(1))
        else {
            return PathResolution::OutsideRoot;
        };

        let below_root = captured
            .as_str()
            .strip_prefix(&self.root_prefix)
            .unwrap_or(captured.as_str());

        PathResolution::Relative(strip_script_extension(below_root).to_string())
    }
}

impl Default for SourceScope {
    fn default() -> Self {
        let exclude: Vec<String> = DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect();
        Self::new(&exclude, DEFAULT_SOURCE_ROOT)
    }
}

fn strip_script_extension(path: &str) -> &str {
    for ext in [".tsx", ".jsx", ".ts", ".js"] {
        if let Some(stem) = path.strip_suffix(ext) {
            return stem;
        }
    }
    path
}

fn default_excludes() -> Vec<Regex> {
    DEFAULT_EXCLUDE
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
}

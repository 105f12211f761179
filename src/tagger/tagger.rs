use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    config::options::VisualEditOptions,
    tagger::{
        dynamic::{DynamicFlags, ElementIndex, compute_dynamic_flags},
        source_path::{PathResolution, SourceScope},
        tree_model::{AttributeItem, Element, MarkupNode, SourceFile},
    },
};

pub const DEFAULT_ATTR_SOURCE_LOCATION: &str = "data-source-location";
pub const DEFAULT_ATTR_DYNAMIC_CONTENT: &str = "data-dynamic-content";

#[derive(Debug, Error)]
pub enum TagError {
    #[error("tree JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("tree JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Stamps source-location and dynamic-content attributes onto markup elements.
#[derive(Debug, Clone)]
pub struct Tagger {
    scope: SourceScope,
    attr_source_location: String,
    attr_dynamic_content: String,
}

/// What happened to one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagReport {
    /// Relative location prefix, `None` when the file was passed through
    pub relative_path: Option<String>,
    pub tagged: usize,
    pub already_tagged: usize,
    pub unpositioned: usize,
}

impl Default for Tagger {
    fn default() -> Self {
        Self {
            scope: SourceScope::default(),
            attr_source_location: DEFAULT_ATTR_SOURCE_LOCATION.to_string(),
            attr_dynamic_content: DEFAULT_ATTR_DYNAMIC_CONTENT.to_string(),
        }
    }
}

impl Tagger {
    pub fn new(scope: SourceScope, attr_source_location: &str, attr_dynamic_content: &str) -> Self {
        Self {
            scope,
            attr_source_location: non_empty_or(attr_source_location, DEFAULT_ATTR_SOURCE_LOCATION),
            attr_dynamic_content: non_empty_or(attr_dynamic_content, DEFAULT_ATTR_DYNAMIC_CONTENT),
        }
    }

    pub fn from_options(options: &VisualEditOptions) -> Self {
        Self::new(
            SourceScope::new(&options.exclude, &options.source_root),
            &options.attribute_source_location,
            &options.attribute_dynamic_content,
        )
    }

    pub fn attr_source_location(&self) -> &str {
        &self.attr_source_location
    }

    pub fn attr_dynamic_content(&self) -> &str {
        &self.attr_dynamic_content
    }

    /// Tag every element of a file in place.
    ///
    /// Excluded files and files outside the source root are left untouched.
    /// Elements that already carry the location attribute keep it as is, but
    /// their descendants are still visited.
    pub fn tag_file(&self, file: &mut SourceFile) -> TagReport {
        let relative = match self.scope.resolve(&file.path) {
            PathResolution::Relative(rel) => rel,
            other => {
                debug!(path = %file.path, resolution = ?other, "file passed through");
                return TagReport::default();
            }
        };

        let flags = compute_dynamic_flags(&file.nodes);
        let mut walk = StampWalk {
            tagger: self,
            relative: &relative,
            flags: &flags,
            next_index: 0,
            report: TagReport {
                relative_path: Some(relative.clone()),
                ..TagReport::default()
            },
        };

        for node in &mut file.nodes {
            walk.visit(node);
        }

        debug!(
            path = %file.path,
            tagged = walk.report.tagged,
            already_tagged = walk.report.already_tagged,
            "file tagged"
        );
        walk.report
    }
}

struct StampWalk<'a> {
    tagger: &'a Tagger,
    relative: &'a str,
    flags: &'a DynamicFlags,
    next_index: usize,
    report: TagReport,
}

impl StampWalk<'_> {
    // Must number elements exactly like `compute_dynamic_flags` does.
    fn visit(&mut self, node: &mut MarkupNode) {
        match node {
            MarkupNode::Element(el) => {
                let index = ElementIndex(self.next_index);
                self.next_index += 1;
                self.stamp(el, index);
                for child in &mut el.children {
                    self.visit(child);
                }
            }
            MarkupNode::Fragment(fragment) => {
                for child in &mut fragment.children {
                    self.visit(child);
                }
            }
            MarkupNode::Expression { .. } | MarkupNode::Text { .. } => {}
        }
    }

    fn stamp(&mut self, el: &mut Element, index: ElementIndex) {
        if el.has_attribute(&self.tagger.attr_source_location) {
            self.report.already_tagged += 1;
            return;
        }

        let Some(loc) = el.loc else {
            self.report.unpositioned += 1;
            return;
        };

        let dynamic = self.flags.get(index).unwrap_or(false);
        let location = format!("{}:{}:{}", self.relative, loc.line, loc.column);

        // A stray dynamic attribute without a location is replaced, never doubled.
        let dynamic_attr = self.tagger.attr_dynamic_content.as_str();
        el.attributes.retain(|a| a.name() != Some(dynamic_attr));
        el.attributes
            .push(AttributeItem::string(&self.tagger.attr_source_location, location));
        el.attributes.push(AttributeItem::string(
            &self.tagger.attr_dynamic_content,
            if dynamic { "true" } else { "false" },
        ));
        self.report.tagged += 1;
    }
}

/// Tag a file given as JSON text and return the rewritten JSON.
///
/// Any failure hands back the original text unchanged so one bad file never
/// stops the surrounding build.
pub fn tag_source(json: &str, path: &str, tagger: &Tagger) -> String {
    match try_tag_source(json, path, tagger) {
        Ok(out) => out,
        Err(e) => {
            warn!(path = %path, error = %e, "tagging failed, passing file through");
            json.to_string()
        }
    }
}

pub fn try_tag_source(json: &str, path: &str, tagger: &Tagger) -> Result<String, TagError> {
    let (nodes, shape) = match serde_json::from_str::<SourceFile>(json) {
        Ok(file) => (file.nodes, TreeShape::File),
        Err(_) => {
            let nodes: Vec<MarkupNode> = serde_json::from_str(json).map_err(|e| TagError::JsonParse {
                context: path.to_string(),
                source: e,
            })?;
            (nodes, TreeShape::Bare)
        }
    };

    let mut file = SourceFile {
        path: path.to_string(),
        nodes,
    };
    let report = tagger.tag_file(&mut file);
    if report.relative_path.is_none() {
        return Ok(json.to_string());
    }

    // Answer in the shape we were given.
    let out = match shape {
        TreeShape::File => serde_json::to_string_pretty(&file),
        TreeShape::Bare => serde_json::to_string_pretty(&file.nodes),
    };
    out.map_err(|e| TagError::JsonSerialize {
        context: path.to_string(),
        source: e,
    })
}

/// How the tree arrived: a full `SourceFile` object or a bare node array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TreeShape {
    File,
    Bare,
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

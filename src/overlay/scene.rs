use serde::Serialize;

use crate::overlay::{
    geometry::{BoxPlacement, FormPlacement, LabelPlacement},
    host::NodeId,
};

pub const BADGE_OFF_COLOR: &str = "#6b7280";
pub const BADGE_TITLE: &str = "Toggle Visual Edit (Ctrl+Shift+E)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    Hover,
    Selection,
}

/// One box + label pair bound to a document node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightVisual {
    pub node: NodeId,
    /// Label text (lowercase tag name)
    pub tag: String,
    pub color: String,
    pub frame: BoxPlacement,
    pub label: LabelPlacement,
}

/// All visuals drawn for one location id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightGroup {
    pub kind: HighlightKind,
    pub location: String,
    pub visuals: Vec<HighlightVisual>,
}

impl HighlightGroup {
    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }
}

/// The edit-request form anchored to the clicked element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditForm {
    pub anchor: NodeId,
    pub element_tag: Option<String>,
    pub input: String,
    pub placeholder: String,
    pub placement: FormPlacement,
    /// Request in flight: submit disabled, busy indicator shown
    pub submitting: bool,
    /// Host should focus the input on its next render
    pub focus_requested: bool,
}

impl EditForm {
    pub fn trimmed_input(&self) -> &str {
        self.input.trim()
    }

    pub fn submit_enabled(&self) -> bool {
        !self.submitting && !self.trimmed_input().is_empty()
    }

    pub fn busy(&self) -> bool {
        self.submitting
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub enabled: bool,
    pub text: String,
    pub background: String,
    pub title: String,
}

impl Badge {
    pub fn new(enabled: bool, on_color: &str) -> Self {
        Self {
            enabled,
            text: if enabled { "Edit ON" } else { "Edit OFF" }.to_string(),
            background: if enabled { on_color } else { BADGE_OFF_COLOR }.to_string(),
            title: BADGE_TITLE.to_string(),
        }
    }
}

/// Everything the overlay currently shows. Exactly one of each kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Scene {
    pub hover: Option<HighlightGroup>,
    pub selection: Option<HighlightGroup>,
    pub form: Option<EditForm>,
    pub badge: Option<Badge>,
    /// Crosshair cursor style sheet installed
    pub cursor_sheet: bool,
}

impl Scene {
    pub fn hover_count(&self) -> usize {
        self.hover.as_ref().map_or(0, HighlightGroup::len)
    }

    pub fn selection_count(&self) -> usize {
        self.selection.as_ref().map_or(0, HighlightGroup::len)
    }

    pub fn hover_location(&self) -> Option<&str> {
        self.hover.as_ref().map(|g| g.location.as_str())
    }

    pub fn selected_location(&self) -> Option<&str> {
        self.selection.as_ref().map(|g| g.location.as_str())
    }
}

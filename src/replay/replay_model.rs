use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::options::VisualEditOptions,
    host::static_page::PageSpec,
    overlay::{engine_model::FormKey, geometry::Rect, host::OverlayPart},
    toggle::controller::KeyChord,
};

/// A scripted session against a static page, loaded from YAML or JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplayScript {
    pub name: String,

    #[serde(default)]
    pub page: PageSpec,

    /// Options for this session; unset fields take their defaults
    #[serde(default)]
    pub options: VisualEditOptions,

    /// Value held in the toggle store before the session starts
    #[serde(default)]
    pub stored_enabled: Option<bool>,

    pub steps: Vec<ReplayStep>,
}

/// A single user or host action, or a block of expectations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReplayStep {
    /// Pointer over a page node
    Hover { node: u64 },

    /// Pointer leaves; to another node, into an overlay part, or off the page
    Leave {
        #[serde(default)]
        to: Option<u64>,
        #[serde(default)]
        overlay: Option<OverlayPart>,
    },

    EnterForm,

    /// Click a node; no node means empty background
    Click {
        #[serde(default)]
        node: Option<u64>,
    },

    ClickOverlay { part: OverlayPart },

    Type { text: String },

    Key { key: FormKey },

    Submit,

    Close,

    ClickBadge,

    Shortcut { chord: KeyChord },

    /// Parent answers the request
    Respond {
        success: bool,
        #[serde(default)]
        error: Option<String>,
    },

    /// Raw message from the embedding context
    Message { data: Value },

    /// Move the clock; due timers fire in order
    Advance { ms: u64 },

    Scroll { x: f64, y: f64 },

    Resize { width: f64, height: f64 },

    MoveNode { node: u64, rect: Rect },

    Enable,

    Disable,

    Toggle,

    SetLanguage { language: String },

    Expect { assertions: Vec<Expectation> },
}

/// Something to check against the engine or the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    /// `idle`, `hovering`, `selected` or `submitting`
    Phase { expected: String },
    Selected { expected: Option<String> },
    HoverCount { expected: usize },
    SelectionCount { expected: usize },
    FormOpen { expected: bool },
    FormInput { expected: String },
    SubmitEnabled { expected: bool },
    Busy { expected: bool },
    Enabled { expected: bool },
    Placeholder { expected: String },
    Posted { expected: usize },
    Broadcasts { expected: usize },
    PendingTimers { expected: usize },
    TimersStarted { expected: usize },
}

impl Expectation {
    pub fn name(&self) -> &'static str {
        match self {
            Expectation::Phase { .. } => "Phase",
            Expectation::Selected { .. } => "Selected",
            Expectation::HoverCount { .. } => "HoverCount",
            Expectation::SelectionCount { .. } => "SelectionCount",
            Expectation::FormOpen { .. } => "FormOpen",
            Expectation::FormInput { .. } => "FormInput",
            Expectation::SubmitEnabled { .. } => "SubmitEnabled",
            Expectation::Busy { .. } => "Busy",
            Expectation::Enabled { .. } => "Enabled",
            Expectation::Placeholder { .. } => "Placeholder",
            Expectation::Posted { .. } => "Posted",
            Expectation::Broadcasts { .. } => "Broadcasts",
            Expectation::PendingTimers { .. } => "PendingTimers",
            Expectation::TimersStarted { .. } => "TimersStarted",
        }
    }
}

/// Result of evaluating a single expectation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpectationResult {
    /// Which step this expectation belongs to (0-indexed)
    pub step_index: usize,

    pub spec: Expectation,

    pub passed: bool,

    /// Actual value found (for debugging failures)
    pub actual: Option<String>,

    pub message: Option<String>,
}

/// Result of running a complete script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayResult {
    pub script_name: String,

    /// Whether all steps ran and every expectation held
    pub passed: bool,

    pub steps_run: usize,

    pub expectation_results: Vec<ExpectationResult>,

    /// Set when a step could not run (not an expectation failure)
    pub error: Option<String>,
}

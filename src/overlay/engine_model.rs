use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    overlay::host::{HitTarget, TimerId},
    toggle::controller::KeyChord,
};

/// Where the hover/select/submit machine stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "location", rename_all = "snake_case")]
pub enum EnginePhase {
    Idle,
    Hovering(String),
    Selected(String),
    Submitting(String),
}

impl EnginePhase {
    pub fn name(&self) -> &'static str {
        match self {
            EnginePhase::Idle => "idle",
            EnginePhase::Hovering(_) => "hovering",
            EnginePhase::Selected(_) => "selected",
            EnginePhase::Submitting(_) => "submitting",
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            EnginePhase::Idle => None,
            EnginePhase::Hovering(l) | EnginePhase::Selected(l) | EnginePhase::Submitting(l) => Some(l),
        }
    }
}

/// Keys the form input handles itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKey {
    Enter,
    Escape,
}

/// Everything the host forwards to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    PointerOver { target: HitTarget },
    /// `related` is where the pointer went; `None` when it left the page
    PointerOut { related: Option<HitTarget> },
    PointerEnterForm,
    Click { target: HitTarget },
    FormInput { value: String },
    FormKey { key: FormKey },
    SubmitClicked,
    /// Back or close control of the form
    CloseClicked,
    BadgeClicked,
    KeyDown { chord: KeyChord },
    Message { data: Value },
    TimerFired { timer: TimerId },
    Scroll,
    Resize,
}

impl EngineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::PointerOver { .. } => "pointer_over",
            EngineEvent::PointerOut { .. } => "pointer_out",
            EngineEvent::PointerEnterForm => "pointer_enter_form",
            EngineEvent::Click { .. } => "click",
            EngineEvent::FormInput { .. } => "form_input",
            EngineEvent::FormKey { .. } => "form_key",
            EngineEvent::SubmitClicked => "submit_clicked",
            EngineEvent::CloseClicked => "close_clicked",
            EngineEvent::BadgeClicked => "badge_clicked",
            EngineEvent::KeyDown { .. } => "key_down",
            EngineEvent::Message { .. } => "message",
            EngineEvent::TimerFired { .. } => "timer_fired",
            EngineEvent::Scroll => "scroll",
            EngineEvent::Resize => "resize",
        }
    }
}

/// What the host should do with the native event after the engine saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl Dispatch {
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn consumed() -> Self {
        Self {
            prevent_default: true,
            stop_propagation: true,
        }
    }

    pub fn prevent_default() -> Self {
        Self {
            prevent_default: true,
            stop_propagation: false,
        }
    }
}

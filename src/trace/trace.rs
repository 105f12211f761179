use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::overlay::engine_model::{Dispatch, EngineEvent, EnginePhase};

/// One engine transition, written as a JSON line.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub event: String,
    pub phase_before: String,
    pub phase_after: Option<String>,
    pub location: Option<String>,

    pub prevent_default: bool,
}

impl TraceEvent {
    pub fn now(step: u64, event: &EngineEvent, phase: &EnginePhase) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            step,
            event: event.name().to_string(),
            phase_before: phase.name().to_string(),
            phase_after: None,
            location: phase.location().map(str::to_string),
            prevent_default: false,
        }
    }

    pub fn with_outcome(mut self, phase: &EnginePhase, dispatch: Dispatch) -> Self {
        self.phase_after = Some(phase.name().to_string());
        if let Some(location) = phase.location() {
            self.location = Some(location.to_string());
        }
        self.prevent_default = dispatch.prevent_default;
        self
    }
}

use tracing::debug;

use crate::overlay::host::TimerId;

/// The single outstanding request: the response listener and its timer.
///
/// The timer id doubles as the episode id, since the host never reuses one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flight {
    pub location: String,
    pub timer: TimerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightOutcome {
    Succeeded,
    Failed,
    TimedOut,
}

/// Why an unresolved flight was dropped without an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    NewSelection,
    Disabled,
    Dismissed,
    Superseded,
}

/// Holds at most one flight system-wide.
///
/// Every way out of the slot (`settle_response`, `settle_timer`, `cancel`)
/// takes the flight, so whichever watcher fires first empties it and the
/// other one finds nothing to act on.
#[derive(Debug, Default)]
pub struct FlightSlot {
    current: Option<Flight>,
}

impl FlightSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new episode. Callers cancel any earlier flight first.
    pub fn arm(&mut self, location: &str, timer: TimerId) {
        self.current = Some(Flight {
            location: location.to_string(),
            timer,
        });
    }

    pub fn cancel(&mut self, reason: CancelReason) -> Option<Flight> {
        let flight = self.current.take();
        if let Some(f) = &flight {
            debug!(location = %f.location, ?reason, "edit request cancelled");
        }
        flight
    }

    /// A matching response arrived.
    pub fn settle_response(&mut self) -> Option<Flight> {
        self.current.take()
    }

    /// A timer fired; only the current flight's own timer counts.
    pub fn settle_timer(&mut self, timer: TimerId) -> Option<Flight> {
        match &self.current {
            Some(f) if f.timer == timer => self.current.take(),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }
}

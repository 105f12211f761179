use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    channel::bridge::ChannelError,
    overlay::geometry::{Rect, ScrollOffset, Size, Viewport},
};

/// Opaque handle to a node of the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(pub u64);

/// Overlay nodes the engine itself put on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayPart {
    Highlight,
    Label,
    Form,
    Badge,
}

/// What an event target resolves to after walking up its ancestors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HitTarget {
    /// Inside one of the engine's own overlay nodes
    Overlay { part: OverlayPart },
    /// Nearest ancestor carrying a source location
    Located { node: NodeId, location: String },
    /// Neither
    Plain,
}

impl HitTarget {
    pub fn located(node: u64, location: &str) -> Self {
        HitTarget::Located {
            node: NodeId(node),
            location: location.to_string(),
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            HitTarget::Located { location, .. } => Some(location),
            _ => None,
        }
    }
}

/// Read-only view of the live document layout.
pub trait Document {
    /// All nodes whose `attribute` equals `location`, in document order.
    fn nodes_with_location(&self, attribute: &str, location: &str) -> Vec<NodeId>;

    /// Viewport-relative bounding box; `None` once the node is gone.
    fn bounding_rect(&self, node: NodeId) -> Option<Rect>;

    fn tag_name(&self, node: NodeId) -> Option<String>;

    fn scroll_offset(&self) -> ScrollOffset;

    fn viewport(&self) -> Viewport;

    /// Rendered size of the edit form
    fn form_size(&self) -> Size;
}

/// Frame boundary, same-context notifications, and timers.
pub trait FrameHost {
    /// Whether this context is the top-level one. Errors when the
    /// comparison itself is refused.
    fn is_top_level(&self) -> Result<bool, ChannelError>;

    fn post_to_parent(&mut self, message: &Value) -> Result<(), ChannelError>;

    fn broadcast(&mut self, name: &str, detail: &Value);

    fn start_timer(&mut self, after: Duration) -> TimerId;

    fn cancel_timer(&mut self, timer: TimerId);
}

/// Everything the overlay engine needs from its environment.
pub trait Host: Document + FrameHost {
    fn as_frame_host(&mut self) -> &mut dyn FrameHost;
}

impl<T: Document + FrameHost> Host for T {
    fn as_frame_host(&mut self) -> &mut dyn FrameHost {
        self
    }
}

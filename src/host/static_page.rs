use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    channel::bridge::ChannelError,
    overlay::{
        geometry::{Rect, ScrollOffset, Size, Viewport},
        host::{Document, FrameHost, HitTarget, NodeId, TimerId},
    },
    tagger::tagger::DEFAULT_ATTR_SOURCE_LOCATION,
};

/// One laid-out node of a static page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageNode {
    pub id: u64,
    pub tag: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub rect: Rect,
}

/// Declarative description of a page and its frame situation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageSpec {
    #[serde(default)]
    pub nodes: Vec<PageNode>,
    #[serde(default)]
    pub scroll: ScrollOffset,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub form_size: Size,
    /// Running inside a parent frame
    #[serde(default)]
    pub embedded: bool,
    /// Comparing against the top-level context throws
    #[serde(default)]
    pub detection_fails: bool,
    /// Posting to the parent throws
    #[serde(default)]
    pub post_fails: bool,
    #[serde(default = "default_location_attribute")]
    pub location_attribute: String,
}

fn default_location_attribute() -> String {
    DEFAULT_ATTR_SOURCE_LOCATION.to_string()
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            scroll: ScrollOffset::default(),
            viewport: Viewport::default(),
            form_size: Size::default(),
            embedded: false,
            detection_fails: false,
            post_fails: false,
            location_attribute: default_location_attribute(),
        }
    }
}

/// In-memory document and frame host with a manual clock.
///
/// Records everything sent out of the page so callers can inspect it.
#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    spec: PageSpec,
    now: Duration,
    next_timer: u64,
    timers: BTreeMap<TimerId, Duration>,
    timers_started: usize,
    posted: Vec<Value>,
    broadcasts: Vec<(String, Value)>,
}

impl StaticPage {
    pub fn new(spec: PageSpec) -> Self {
        Self {
            spec,
            ..Self::default()
        }
    }

    pub fn standalone() -> Self {
        Self::new(PageSpec::default())
    }

    pub fn embedded() -> Self {
        Self::new(PageSpec {
            embedded: true,
            ..PageSpec::default()
        })
    }

    pub fn with_node(mut self, id: u64, tag: &str, location: Option<&str>, rect: Rect) -> Self {
        self.spec.nodes.push(PageNode {
            id,
            tag: tag.to_string(),
            location: location.map(str::to_string),
            rect,
        });
        self
    }

    pub fn spec_mut(&mut self) -> &mut PageSpec {
        &mut self.spec
    }

    /// Hit-test result for a node, as the host would compute it.
    pub fn target(&self, id: u64) -> HitTarget {
        match self.node(NodeId(id)).and_then(|n| n.location.clone()) {
            Some(location) => HitTarget::Located {
                node: NodeId(id),
                location,
            },
            None => HitTarget::Plain,
        }
    }

    pub fn has_node(&self, id: u64) -> bool {
        self.node(NodeId(id)).is_some()
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.spec.scroll = ScrollOffset { x, y };
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.spec.viewport = viewport;
    }

    pub fn move_node(&mut self, id: u64, rect: Rect) {
        if let Some(node) = self.spec.nodes.iter_mut().find(|n| n.id == id) {
            node.rect = rect;
        }
    }

    pub fn remove_node(&mut self, id: u64) {
        self.spec.nodes.retain(|n| n.id != id);
    }

    /// Move the clock forward and return the timers that came due, earliest first.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        self.now += by;
        let mut due: Vec<(Duration, TimerId)> = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= self.now)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        due.sort();
        for (_, id) in &due {
            self.timers.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    pub fn posted(&self) -> &[Value] {
        &self.posted
    }

    pub fn broadcasts(&self) -> &[(String, Value)] {
        &self.broadcasts
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn timers_started(&self) -> usize {
        self.timers_started
    }

    fn node(&self, id: NodeId) -> Option<&PageNode> {
        self.spec.nodes.iter().find(|n| n.id == id.0)
    }
}

impl Document for StaticPage {
    fn nodes_with_location(&self, attribute: &str, location: &str) -> Vec<NodeId> {
        if attribute != self.spec.location_attribute {
            return Vec::new();
        }
        self.spec
            .nodes
            .iter()
            .filter(|n| n.location.as_deref() == Some(location))
            .map(|n| NodeId(n.id))
            .collect()
    }

    fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        self.node(node).map(|n| n.rect)
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.node(node).map(|n| n.tag.to_uppercase())
    }

    fn scroll_offset(&self) -> ScrollOffset {
        self.spec.scroll
    }

    fn viewport(&self) -> Viewport {
        self.spec.viewport
    }

    fn form_size(&self) -> Size {
        self.spec.form_size
    }
}

impl FrameHost for StaticPage {
    fn is_top_level(&self) -> Result<bool, ChannelError> {
        if self.spec.detection_fails {
            return Err(ChannelError::TopAccessDenied("cross-origin parent".into()));
        }
        Ok(!self.spec.embedded)
    }

    fn post_to_parent(&mut self, message: &Value) -> Result<(), ChannelError> {
        if self.spec.post_fails {
            return Err(ChannelError::PostFailed("parent window unreachable".into()));
        }
        self.posted.push(message.clone());
        Ok(())
    }

    fn broadcast(&mut self, name: &str, detail: &Value) {
        self.broadcasts.push((name.to_string(), detail.clone()));
    }

    fn start_timer(&mut self, after: Duration) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.timers.insert(id, self.now + after);
        self.timers_started += 1;
        id
    }

    fn cancel_timer(&mut self, timer: TimerId) {
        self.timers.remove(&timer);
    }
}

use tracing::{debug, warn};

use crate::{
    channel::{
        bridge::{Delivery, deliver},
        flight::{CancelReason, FlightOutcome, FlightSlot},
        message::{EditRequest, InboundMessage, decode_inbound},
    },
    config::runtime_config::RuntimeConfig,
    overlay::{
        engine_model::{Dispatch, EngineEvent, EnginePhase, FormKey},
        geometry::{form_position, highlight_box, label_position},
        host::{Document, FrameHost, HitTarget, Host, NodeId, TimerId},
        scene::{EditForm, HighlightGroup, HighlightKind, HighlightVisual, Scene},
    },
    toggle::{
        controller::{KeyChord, ToggleController},
        store::KeyValueStore,
    },
};

/// Page-level overlay: hover highlights, the selection, its edit form, and
/// the request in flight. One instance per document; all state lives here.
#[derive(Debug)]
pub struct OverlayEngine {
    config: RuntimeConfig,
    toggle: ToggleController,
    scene: Scene,
    flights: FlightSlot,
}

impl OverlayEngine {
    pub fn new(config: RuntimeConfig, store: Box<dyn KeyValueStore>) -> Self {
        let toggle = ToggleController::new(&config, store);
        let scene = Scene {
            badge: toggle.badge(),
            cursor_sheet: toggle.is_enabled(),
            ..Scene::default()
        };
        Self {
            config,
            toggle,
            scene,
            flights: FlightSlot::new(),
        }
    }

    // ------------------------------------------------------------------
    // Programmatic surface
    // ------------------------------------------------------------------

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_enabled(&self) -> bool {
        self.toggle.is_enabled()
    }

    pub fn language(&self) -> &str {
        self.toggle.language()
    }

    pub fn has_pending_request(&self) -> bool {
        self.flights.is_pending()
    }

    pub fn enable<H: Host>(&mut self, host: &mut H) {
        self.set_enabled(true, host);
    }

    pub fn disable<H: Host>(&mut self, host: &mut H) {
        self.set_enabled(false, host);
    }

    pub fn toggle<H: Host>(&mut self, host: &mut H) {
        let next = !self.toggle.is_enabled();
        self.set_enabled(next, host);
    }

    /// Switch the form language. An open form picks up the new placeholder
    /// right away; unknown codes change nothing.
    pub fn set_language(&mut self, code: &str) {
        if !self.toggle.set_language(code) {
            return;
        }
        let placeholder = self.toggle.placeholder().to_string();
        if let Some(form) = self.scene.form.as_mut() {
            form.placeholder = placeholder;
        }
    }

    pub fn phase(&self) -> EnginePhase {
        if let Some(selection) = &self.scene.selection {
            let submitting = self.scene.form.as_ref().is_some_and(|f| f.submitting);
            return if submitting {
                EnginePhase::Submitting(selection.location.clone())
            } else {
                EnginePhase::Selected(selection.location.clone())
            };
        }
        match &self.scene.hover {
            Some(hover) => EnginePhase::Hovering(hover.location.clone()),
            None => EnginePhase::Idle,
        }
    }

    // ------------------------------------------------------------------
    // Event dispatch
    // ------------------------------------------------------------------

    pub fn handle<H: Host>(&mut self, event: EngineEvent, host: &mut H) -> Dispatch {
        match event {
            EngineEvent::PointerOver { target } => self.pointer_over(&target, host),
            EngineEvent::PointerOut { related } => self.pointer_out(related.as_ref()),
            EngineEvent::PointerEnterForm => {
                self.clear_hover();
                Dispatch::pass()
            }
            EngineEvent::Click { target } => self.click(&target, host),
            EngineEvent::FormInput { value } => {
                if let Some(form) = self.scene.form.as_mut() {
                    form.input = value;
                }
                Dispatch::pass()
            }
            EngineEvent::FormKey { key: FormKey::Enter } => {
                self.submit(host);
                Dispatch::pass()
            }
            EngineEvent::FormKey { key: FormKey::Escape } | EngineEvent::CloseClicked => {
                self.dismiss(host, CancelReason::Dismissed);
                Dispatch::pass()
            }
            EngineEvent::SubmitClicked => {
                self.submit(host);
                Dispatch::pass()
            }
            EngineEvent::BadgeClicked => {
                self.toggle(host);
                Dispatch::pass()
            }
            EngineEvent::KeyDown { chord } => self.key_down(&chord, host),
            EngineEvent::Message { data } => {
                if let Some(message) = decode_inbound(&data, &self.config) {
                    self.inbound(message, host);
                }
                Dispatch::pass()
            }
            EngineEvent::TimerFired { timer } => {
                self.timer_fired(timer, host);
                Dispatch::pass()
            }
            EngineEvent::Scroll | EngineEvent::Resize => {
                self.sync(host);
                Dispatch::pass()
            }
        }
    }

    fn pointer_over<H: Host>(&mut self, target: &HitTarget, host: &mut H) -> Dispatch {
        if !self.toggle.is_enabled() {
            return Dispatch::pass();
        }
        if let HitTarget::Located { location, .. } = target {
            self.hover(location, host);
        }
        Dispatch::pass()
    }

    fn hover<H: Host>(&mut self, location: &str, host: &mut H) {
        if self.scene.hover_location() == Some(location) {
            return;
        }
        // Same id as the selection: track it, but draw nothing extra.
        let visuals = if self.scene.selected_location() == Some(location) {
            Vec::new()
        } else {
            self.draw(location, HighlightKind::Hover, host)
        };
        self.scene.hover = Some(HighlightGroup {
            kind: HighlightKind::Hover,
            location: location.to_string(),
            visuals,
        });
    }

    fn pointer_out(&mut self, related: Option<&HitTarget>) -> Dispatch {
        if !self.toggle.is_enabled() {
            return Dispatch::pass();
        }
        match related {
            Some(HitTarget::Overlay { .. }) => {}
            Some(HitTarget::Located { location, .. })
                if self.scene.hover_location() == Some(location.as_str()) => {}
            _ => self.clear_hover(),
        }
        Dispatch::pass()
    }

    fn click<H: Host>(&mut self, target: &HitTarget, host: &mut H) -> Dispatch {
        if !self.toggle.is_enabled() {
            return Dispatch::pass();
        }
        match target {
            HitTarget::Overlay { .. } => Dispatch::pass(),
            HitTarget::Located { node, location } => {
                if self.scene.selected_location() == Some(location.as_str()) {
                    return Dispatch::pass();
                }
                self.select(*node, location, host);
                Dispatch::consumed()
            }
            HitTarget::Plain => {
                if self.scene.selection.is_some() {
                    self.dismiss(host, CancelReason::Dismissed);
                }
                Dispatch::pass()
            }
        }
    }

    /// Replace whatever was selected with `location`, anchored at `node`.
    fn select<H: Host>(&mut self, node: NodeId, location: &str, host: &mut H) {
        self.dismiss(host, CancelReason::NewSelection);
        self.clear_hover();

        let visuals = self.draw(location, HighlightKind::Selection, host);
        self.scene.selection = Some(HighlightGroup {
            kind: HighlightKind::Selection,
            location: location.to_string(),
            visuals,
        });

        let placement = host
            .bounding_rect(node)
            .map(|rect| form_position(rect, host.form_size(), host.scroll_offset(), host.viewport()))
            .unwrap_or_default();

        self.scene.form = Some(EditForm {
            anchor: node,
            element_tag: host.tag_name(node).map(|t| t.to_lowercase()),
            input: String::new(),
            placeholder: self.toggle.placeholder().to_string(),
            placement,
            submitting: false,
            focus_requested: true,
        });
        debug!(location = %location, "element selected");
    }

    fn submit<H: Host>(&mut self, host: &mut H) {
        let Some(location) = self.scene.selected_location().map(str::to_string) else {
            return;
        };
        let Some(form) = self.scene.form.as_mut() else {
            return;
        };
        if form.submitting || form.trimmed_input().is_empty() {
            return;
        }

        let request = EditRequest {
            source_location: location.clone(),
            content: form.trimmed_input().to_string(),
            element: form.element_tag.clone(),
        };
        form.submitting = true;
        form.focus_requested = false;

        if let Some(previous) = self.flights.cancel(CancelReason::Superseded) {
            host.cancel_timer(previous.timer);
        }

        match deliver(host.as_frame_host(), &self.config, &request) {
            Delivery::AwaitingResponse { timer } => {
                self.flights.arm(&location, timer);
            }
            Delivery::Broadcast => {
                self.dismiss(host, CancelReason::Dismissed);
            }
        }
    }

    fn inbound<H: Host>(&mut self, message: InboundMessage, host: &mut H) {
        match message {
            InboundMessage::Response { success, error } => {
                let Some(flight) = self.flights.settle_response() else {
                    debug!("response with no request in flight ignored");
                    return;
                };
                host.cancel_timer(flight.timer);
                if let Some(error) = &error {
                    warn!(location = %flight.location, error = %error, "edit request rejected");
                }
                let outcome = if success {
                    FlightOutcome::Succeeded
                } else {
                    FlightOutcome::Failed
                };
                self.finish(outcome, host);
            }
            InboundMessage::Toggle { enabled } => {
                let next = enabled.unwrap_or(!self.toggle.is_enabled());
                self.set_enabled(next, host);
            }
            InboundMessage::Language { language } => self.set_language(&language),
        }
    }

    fn timer_fired<H: Host>(&mut self, timer: TimerId, host: &mut H) {
        let Some(flight) = self.flights.settle_timer(timer) else {
            return;
        };
        warn!(location = %flight.location, "edit request timed out");
        self.finish(FlightOutcome::TimedOut, host);
    }

    fn finish<H: Host>(&mut self, outcome: FlightOutcome, host: &mut H) {
        match outcome {
            FlightOutcome::Succeeded => {
                if self.scene.form.is_some() {
                    self.dismiss(host, CancelReason::Dismissed);
                }
            }
            FlightOutcome::Failed | FlightOutcome::TimedOut => self.rearm(),
        }
    }

    /// Back to Selected with the form open and its text kept.
    fn rearm(&mut self) {
        if let Some(form) = self.scene.form.as_mut() {
            form.submitting = false;
        }
    }

    fn key_down<H: Host>(&mut self, chord: &KeyChord, host: &mut H) -> Dispatch {
        if self.toggle.matches_shortcut(chord) {
            self.toggle(host);
            return Dispatch::prevent_default();
        }
        Dispatch::pass()
    }

    fn set_enabled<H: Host>(&mut self, enabled: bool, host: &mut H) {
        self.toggle.set_enabled(enabled);
        self.scene.cursor_sheet = enabled;
        if !enabled {
            self.dismiss(host, CancelReason::Disabled);
            self.clear_hover();
        }
        self.scene.badge = self.toggle.badge();
    }

    // ------------------------------------------------------------------
    // Visuals
    // ------------------------------------------------------------------

    fn draw(&self, location: &str, kind: HighlightKind, host: &dyn Document) -> Vec<HighlightVisual> {
        let scroll = host.scroll_offset();
        let color = match kind {
            HighlightKind::Hover => &self.config.color_hover,
            HighlightKind::Selection => &self.config.color_selected,
        };

        host.nodes_with_location(&self.config.attribute_source_location, location)
            .into_iter()
            .filter_map(|node| {
                let rect = host.bounding_rect(node)?;
                Some(HighlightVisual {
                    node,
                    tag: host.tag_name(node).unwrap_or_default().to_lowercase(),
                    color: color.clone(),
                    frame: highlight_box(rect, scroll),
                    label: label_position(rect, scroll),
                })
            })
            .collect()
    }

    fn clear_hover(&mut self) {
        self.scene.hover = None;
    }

    /// Close the form, drop the selection, and cancel any request in flight.
    fn dismiss(&mut self, host: &mut dyn FrameHost, reason: CancelReason) {
        if let Some(flight) = self.flights.cancel(reason) {
            host.cancel_timer(flight.timer);
        }
        self.scene.form = None;
        self.scene.selection = None;
    }

    /// Re-read layout for every active visual. Cost follows the number of
    /// visuals on screen, not the size of the document.
    fn sync(&mut self, host: &dyn Document) {
        if !self.toggle.is_enabled() {
            return;
        }
        let scroll = host.scroll_offset();

        for group in [self.scene.hover.as_mut(), self.scene.selection.as_mut()]
            .into_iter()
            .flatten()
        {
            for visual in &mut group.visuals {
                if let Some(rect) = host.bounding_rect(visual.node) {
                    visual.frame = highlight_box(rect, scroll);
                    visual.label = label_position(rect, scroll);
                }
            }
        }

        if let Some(form) = self.scene.form.as_mut() {
            if let Some(rect) = host.bounding_rect(form.anchor) {
                form.placement = form_position(rect, host.form_size(), scroll, host.viewport());
            }
        }
    }
}


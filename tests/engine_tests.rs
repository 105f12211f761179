mod common;

use crate::common::fixtures::{HEADING, LIST_ITEM, TOP_BAR, embedded_page, engine, engine_with, options, standalone_page};
use visual_edit::{
    Dispatch, EngineEvent, EnginePhase, OverlayEngine, VisualEditOptions,
    channel::message::language_message,
    host::static_page::StaticPage,
    overlay::{
        engine_model::FormKey,
        geometry::{Rect, Viewport},
        host::{HitTarget, NodeId, OverlayPart},
        scene::BADGE_OFF_COLOR,
    },
    toggle::controller::KeyChord,
};

fn hover(engine: &mut OverlayEngine, page: &mut StaticPage, id: u64) -> Dispatch {
    let target = page.target(id);
    engine.handle(EngineEvent::PointerOver { target }, page)
}

fn click(engine: &mut OverlayEngine, page: &mut StaticPage, id: u64) -> Dispatch {
    let target = page.target(id);
    engine.handle(EngineEvent::Click { target }, page)
}

fn leave(engine: &mut OverlayEngine, page: &mut StaticPage, related: Option<HitTarget>) {
    engine.handle(EngineEvent::PointerOut { related }, page);
}

// ============================================================================
// Hover
// ============================================================================

#[test]
fn hover_highlights_single_node() {
    let (mut engine, mut page) = (engine(), standalone_page());

    hover(&mut engine, &mut page, 1);

    let scene = engine.scene();
    assert_eq!(engine.phase(), EnginePhase::Hovering(HEADING.into()));
    assert_eq!(scene.hover_count(), 1);
    let visual = &scene.hover.as_ref().unwrap().visuals[0];
    assert_eq!(visual.tag, "h1");
    assert_eq!(visual.color, "#3b82f6");
    assert_eq!(visual.frame.top, 100.0);
    assert_eq!(visual.label.top, 80.0);
    assert!(!visual.label.inside);
}

#[test]
fn hover_highlights_every_node_sharing_the_location() {
    let (mut engine, mut page) = (engine(), standalone_page());

    hover(&mut engine, &mut page, 2);

    let group = engine.scene().hover.as_ref().unwrap();
    assert_eq!(group.location, LIST_ITEM);
    let nodes: Vec<NodeId> = group.visuals.iter().map(|v| v.node).collect();
    assert_eq!(nodes, vec![NodeId(2), NodeId(3)]);
}

#[test]
fn label_moves_inside_box_near_viewport_top() {
    let (mut engine, mut page) = (engine(), standalone_page());

    hover(&mut engine, &mut page, 5);

    let visual = &engine.scene().hover.as_ref().unwrap().visuals[0];
    assert_eq!(engine.scene().hover_location(), Some(TOP_BAR));
    assert!(visual.label.inside);
    assert_eq!(visual.label.top, 2.0);
}

#[test]
fn hovering_new_location_replaces_previous_group() {
    let (mut engine, mut page) = (engine(), standalone_page());

    hover(&mut engine, &mut page, 2);
    hover(&mut engine, &mut page, 1);

    assert_eq!(engine.scene().hover_location(), Some(HEADING));
    assert_eq!(engine.scene().hover_count(), 1);
}

#[test]
fn hover_over_untagged_node_changes_nothing() {
    let (mut engine, mut page) = (engine(), standalone_page());

    hover(&mut engine, &mut page, 1);
    hover(&mut engine, &mut page, 4);

    assert_eq!(engine.scene().hover_location(), Some(HEADING));
}

#[test]
fn pointer_over_overlay_part_keeps_hover() {
    let (mut engine, mut page) = (engine(), standalone_page());
    hover(&mut engine, &mut page, 2);

    let dispatch = engine.handle(
        EngineEvent::PointerOver { target: HitTarget::Overlay { part: OverlayPart::Highlight } },
        &mut page,
    );

    assert_eq!(dispatch, Dispatch::pass());
    assert_eq!(engine.scene().hover_location(), Some(LIST_ITEM));
    assert_eq!(engine.scene().hover_count(), 2);
    assert_eq!(engine.phase(), EnginePhase::Hovering(LIST_ITEM.into()));
}

#[test]
fn pointer_over_label_keeps_selection_and_hover() {
    let (mut engine, mut page) = (engine(), standalone_page());
    click(&mut engine, &mut page, 1);
    hover(&mut engine, &mut page, 2);

    engine.handle(
        EngineEvent::PointerOver { target: HitTarget::Overlay { part: OverlayPart::Label } },
        &mut page,
    );

    assert_eq!(engine.scene().selection_count(), 1);
    assert_eq!(engine.scene().hover_location(), Some(LIST_ITEM));
    assert_eq!(engine.scene().hover_count(), 2);
    assert_eq!(engine.phase(), EnginePhase::Selected(HEADING.into()));
}

#[test]
fn leaving_to_overlay_or_same_location_keeps_hover() {
    let (mut engine, mut page) = (engine(), standalone_page());
    hover(&mut engine, &mut page, 2);

    leave(&mut engine, &mut page, Some(HitTarget::Overlay { part: OverlayPart::Label }));
    assert_eq!(engine.scene().hover_count(), 2);

    let sibling = page.target(3);
    leave(&mut engine, &mut page, Some(sibling));
    assert_eq!(engine.scene().hover_count(), 2);

    leave(&mut engine, &mut page, Some(HitTarget::Plain));
    assert_eq!(engine.scene().hover_count(), 0);
    assert_eq!(engine.phase(), EnginePhase::Idle);
}

#[test]
fn leaving_the_page_clears_hover() {
    let (mut engine, mut page) = (engine(), standalone_page());
    hover(&mut engine, &mut page, 1);

    leave(&mut engine, &mut page, None);

    assert!(engine.scene().hover.is_none());
}

#[test]
fn entering_the_form_clears_hover() {
    let (mut engine, mut page) = (engine(), standalone_page());
    click(&mut engine, &mut page, 1);
    hover(&mut engine, &mut page, 2);

    engine.handle(EngineEvent::PointerEnterForm, &mut page);

    assert!(engine.scene().hover.is_none());
    assert_eq!(engine.scene().selection_count(), 1);
}

// ============================================================================
// Selection and the edit form
// ============================================================================

#[test]
fn click_selects_and_opens_form() {
    let (mut engine, mut page) = (engine(), standalone_page());
    hover(&mut engine, &mut page, 1);

    let dispatch = click(&mut engine, &mut page, 1);

    assert_eq!(dispatch, Dispatch::consumed());
    assert_eq!(engine.phase(), EnginePhase::Selected(HEADING.into()));
    let scene = engine.scene();
    assert!(scene.hover.is_none());
    assert_eq!(scene.selection_count(), 1);
    assert_eq!(scene.selection.as_ref().unwrap().visuals[0].color, "#10b981");

    let form = scene.form.as_ref().unwrap();
    assert_eq!(form.anchor, NodeId(1));
    assert_eq!(form.element_tag.as_deref(), Some("h1"));
    assert_eq!(form.placeholder, "Describe the change you want...");
    assert!(form.focus_requested);
    assert!(!form.submit_enabled());
    assert_eq!(form.placement.top, 168.0);
    assert_eq!(form.placement.left, 40.0);
    assert!(!form.placement.flipped);
}

#[test]
fn clicking_current_selection_again_passes_through() {
    let (mut engine, mut page) = (engine(), standalone_page());
    click(&mut engine, &mut page, 2);
    engine.handle(EngineEvent::FormInput { value: "draft".into() }, &mut page);

    let dispatch = click(&mut engine, &mut page, 3);

    assert_eq!(dispatch, Dispatch::pass());
    assert_eq!(engine.scene().form.as_ref().unwrap().input, "draft");
    assert_eq!(engine.scene().form.as_ref().unwrap().anchor, NodeId(2));
}

#[test]
fn new_selection_replaces_old_one_entirely() {
    let (mut engine, mut page) = (engine(), standalone_page());
    click(&mut engine, &mut page, 1);
    engine.handle(EngineEvent::FormInput { value: "old text".into() }, &mut page);

    click(&mut engine, &mut page, 3);

    let scene = engine.scene();
    assert_eq!(scene.selected_location(), Some(LIST_ITEM));
    assert_eq!(scene.selection_count(), 2);
    assert!(scene.selection.as_ref().unwrap().visuals.iter().all(|v| v.tag == "li"));
    let form = scene.form.as_ref().unwrap();
    assert_eq!(form.anchor, NodeId(3));
    assert_eq!(form.input, "");
}

#[test]
fn hovering_selected_location_draws_nothing_extra() {
    let (mut engine, mut page) = (engine(), standalone_page());
    click(&mut engine, &mut page, 2);

    hover(&mut engine, &mut page, 3);

    let scene = engine.scene();
    assert_eq!(scene.hover_location(), Some(LIST_ITEM));
    assert_eq!(scene.hover_count(), 0);
    assert_eq!(scene.selection_count(), 2);
    assert_eq!(engine.phase(), EnginePhase::Selected(LIST_ITEM.into()));
}

#[test]
fn hover_elsewhere_keeps_selection() {
    let (mut engine, mut page) = (engine(), standalone_page());
    click(&mut engine, &mut page, 1);

    hover(&mut engine, &mut page, 2);

    assert_eq!(engine.scene().hover_count(), 2);
    assert_eq!(engine.phase(), EnginePhase::Selected(HEADING.into()));
}

#[test]
fn click_on_overlay_is_ignored() {
    let (mut engine, mut page) = (engine(), standalone_page());
    click(&mut engine, &mut page, 1);

    let dispatch = engine.handle(
        EngineEvent::Click { target: HitTarget::Overlay { part: OverlayPart::Form } },
        &mut page,
    );

    assert_eq!(dispatch, Dispatch::pass());
    assert_eq!(engine.phase(), EnginePhase::Selected(HEADING.into()));
}

#[test]
fn click_on_plain_content_dismisses() {
    let (mut engine, mut page) = (engine(), standalone_page());
    click(&mut engine, &mut page, 1);

    let dispatch = click(&mut engine, &mut page, 4);

    assert_eq!(dispatch, Dispatch::pass());
    assert_eq!(engine.phase(), EnginePhase::Idle);
    assert!(engine.scene().form.is_none());
}

#[test]
fn escape_and_close_dismiss_the_form() {
    let (mut engine, mut page) = (engine(), standalone_page());

    click(&mut engine, &mut page, 1);
    engine.handle(EngineEvent::FormKey { key: FormKey::Escape }, &mut page);
    assert_eq!(engine.phase(), EnginePhase::Idle);

    click(&mut engine, &mut page, 1);
    engine.handle(EngineEvent::CloseClicked, &mut page);
    assert_eq!(engine.phase(), EnginePhase::Idle);
    assert_eq!(engine.scene().selection_count(), 0);
}

#[test]
fn whitespace_input_keeps_submit_disabled() {
    let (mut engine, mut page) = (engine(), embedded_page());
    click(&mut engine, &mut page, 1);

    engine.handle(EngineEvent::FormInput { value: "   ".into() }, &mut page);
    engine.handle(EngineEvent::SubmitClicked, &mut page);

    assert!(!engine.scene().form.as_ref().unwrap().submit_enabled());
    assert!(page.posted().is_empty());
    assert_eq!(engine.phase(), EnginePhase::Selected(HEADING.into()));
}

// ============================================================================
// Layout sync
// ============================================================================

#[test]
fn scroll_recomputes_visuals_and_form() {
    let (mut engine, mut page) = (engine(), standalone_page());
    click(&mut engine, &mut page, 1);

    page.scroll_to(0.0, 50.0);
    engine.handle(EngineEvent::Scroll, &mut page);

    let scene = engine.scene();
    assert_eq!(scene.selection.as_ref().unwrap().visuals[0].frame.top, 150.0);
    assert_eq!(scene.form.as_ref().unwrap().placement.top, 218.0);
}

#[test]
fn form_flips_above_anchor_without_room_below() {
    let (mut engine, mut page) = (engine(), standalone_page());
    click(&mut engine, &mut page, 1);

    page.resize(Viewport { width: 1280.0, height: 200.0 });
    engine.handle(EngineEvent::Resize, &mut page);

    let placement = engine.scene().form.as_ref().unwrap().placement;
    assert!(placement.flipped);
    assert_eq!(placement.top, 44.0);
}

#[test]
fn form_never_hangs_past_right_edge() {
    let (mut engine, mut page) = (engine(), standalone_page());
    click(&mut engine, &mut page, 1);

    page.move_node(1, Rect::new(100.0, 1100.0, 150.0, 60.0));
    engine.handle(EngineEvent::Scroll, &mut page);

    let placement = engine.scene().form.as_ref().unwrap().placement;
    assert_eq!(placement.left, 944.0);
    assert_eq!(engine.scene().selection.as_ref().unwrap().visuals[0].frame.left, 1100.0);
}

#[test]
fn vanished_node_keeps_last_known_box() {
    let (mut engine, mut page) = (engine(), standalone_page());
    click(&mut engine, &mut page, 1);

    page.remove_node(1);
    page.scroll_to(0.0, 30.0);
    engine.handle(EngineEvent::Scroll, &mut page);

    assert_eq!(engine.scene().selection.as_ref().unwrap().visuals[0].frame.top, 100.0);
}

// ============================================================================
// Enable / disable
// ============================================================================

#[test]
fn disabled_engine_ignores_pointer_events() {
    let mut engine = engine_with(VisualEditOptions {
        default_enabled: false,
        ..options()
    });
    let mut page = standalone_page();

    hover(&mut engine, &mut page, 1);
    let dispatch = click(&mut engine, &mut page, 1);

    assert_eq!(dispatch, Dispatch::pass());
    assert_eq!(engine.phase(), EnginePhase::Idle);
    assert!(!engine.scene().cursor_sheet);
}

#[test]
fn disabling_clears_everything_and_enabling_restores_cursor() {
    let (mut engine, mut page) = (engine(), standalone_page());
    click(&mut engine, &mut page, 1);
    hover(&mut engine, &mut page, 2);
    assert!(engine.scene().cursor_sheet);

    engine.disable(&mut page);

    let scene = engine.scene();
    assert!(scene.hover.is_none());
    assert!(scene.selection.is_none());
    assert!(scene.form.is_none());
    assert!(!scene.cursor_sheet);

    engine.enable(&mut page);
    assert!(engine.scene().cursor_sheet);
    assert_eq!(engine.phase(), EnginePhase::Idle);
}

#[test]
fn badge_follows_enabled_state() {
    let mut engine = engine_with(VisualEditOptions {
        show_badge: true,
        ..options()
    });
    let mut page = standalone_page();

    let badge = engine.scene().badge.clone().unwrap();
    assert_eq!(badge.text, "Edit ON");
    assert_eq!(badge.background, "#10b981");

    engine.handle(EngineEvent::BadgeClicked, &mut page);

    let badge = engine.scene().badge.clone().unwrap();
    assert!(!engine.is_enabled());
    assert_eq!(badge.text, "Edit OFF");
    assert_eq!(badge.background, BADGE_OFF_COLOR);
}

#[test]
fn no_badge_unless_configured() {
    assert!(engine().scene().badge.is_none());
}

#[test]
fn shortcut_toggles_when_enabled_in_options() {
    let mut engine = engine_with(VisualEditOptions {
        enable_keyboard_shortcut: true,
        ..options()
    });
    let mut page = standalone_page();

    let dispatch = engine.handle(EngineEvent::KeyDown { chord: KeyChord::ctrl_shift("E") }, &mut page);
    assert_eq!(dispatch, Dispatch::prevent_default());
    assert!(!engine.is_enabled());

    let meta = KeyChord {
        key: "e".into(),
        meta: true,
        shift: true,
        ..KeyChord::default()
    };
    engine.handle(EngineEvent::KeyDown { chord: meta }, &mut page);
    assert!(engine.is_enabled());

    let no_shift = KeyChord {
        key: "e".into(),
        ctrl: true,
        ..KeyChord::default()
    };
    let dispatch = engine.handle(EngineEvent::KeyDown { chord: no_shift }, &mut page);
    assert_eq!(dispatch, Dispatch::pass());
    assert!(engine.is_enabled());
}

#[test]
fn shortcut_is_inert_by_default() {
    let (mut engine, mut page) = (engine(), standalone_page());

    let dispatch = engine.handle(EngineEvent::KeyDown { chord: KeyChord::ctrl_shift("e") }, &mut page);

    assert_eq!(dispatch, Dispatch::pass());
    assert!(engine.is_enabled());
}

// ============================================================================
// Language
// ============================================================================

#[test]
fn language_switch_updates_open_form() {
    let (mut engine, mut page) = (engine(), standalone_page());
    click(&mut engine, &mut page, 1);

    engine.set_language("ko");

    assert_eq!(engine.language(), "ko");
    assert_eq!(engine.scene().form.as_ref().unwrap().placeholder, "원하는 변경 사항을 입력하세요...");
}

#[test]
fn unknown_language_is_ignored() {
    let (mut engine, mut page) = (engine(), standalone_page());
    click(&mut engine, &mut page, 1);

    engine.set_language("xx");

    assert_eq!(engine.language(), "en");
    assert_eq!(engine.scene().form.as_ref().unwrap().placeholder, "Describe the change you want...");
}

#[test]
fn language_message_switches_locale() {
    let (mut engine, mut page) = (engine(), standalone_page());
    let data = language_message(engine.config(), "jp");

    engine.handle(EngineEvent::Message { data }, &mut page);
    click(&mut engine, &mut page, 1);

    assert_eq!(engine.language(), "jp");
    assert_eq!(engine.scene().form.as_ref().unwrap().placeholder, "変更したい内容を入力してください...");
}

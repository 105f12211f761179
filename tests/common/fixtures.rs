use visual_edit::{
    OverlayEngine, RuntimeConfig, VisualEditOptions,
    host::static_page::StaticPage,
    overlay::geometry::Rect,
    toggle::store::MemoryStore,
};

pub const HEADING: &str = "App:10:2";
pub const LIST_ITEM: &str = "App:14:6";
pub const TOP_BAR: &str = "components/Nav:3:4";

/// Options with the engine on and nothing persisted.
pub fn options() -> VisualEditOptions {
    VisualEditOptions {
        default_enabled: true,
        persist_state: false,
        ..VisualEditOptions::default()
    }
}

pub fn engine() -> OverlayEngine {
    engine_with(options())
}

pub fn engine_with(options: VisualEditOptions) -> OverlayEngine {
    OverlayEngine::new(RuntimeConfig::from_options(&options), Box::new(MemoryStore::new()))
}

/// Heading (1), two list items sharing one location (2, 3), an untagged
/// paragraph (4), and a bar hugging the viewport top (5).
pub fn sample_page(page: StaticPage) -> StaticPage {
    page.with_node(1, "h1", Some(HEADING), Rect::new(100.0, 40.0, 400.0, 60.0))
        .with_node(2, "li", Some(LIST_ITEM), Rect::new(200.0, 40.0, 300.0, 30.0))
        .with_node(3, "li", Some(LIST_ITEM), Rect::new(240.0, 40.0, 300.0, 30.0))
        .with_node(4, "p", None, Rect::new(300.0, 40.0, 300.0, 30.0))
        .with_node(5, "nav", Some(TOP_BAR), Rect::new(0.0, 0.0, 1280.0, 40.0))
}

pub fn standalone_page() -> StaticPage {
    sample_page(StaticPage::standalone())
}

pub fn embedded_page() -> StaticPage {
    sample_page(StaticPage::embedded())
}

use serde::{Deserialize, Serialize};

/// Label strip height; a box closer than this to the viewport top gets its
/// label drawn inside instead of above.
pub const LABEL_HEIGHT: f64 = 20.0;
pub const LABEL_INSET: f64 = 2.0;
pub const FORM_GAP: f64 = 8.0;
pub const FORM_EDGE_MARGIN: f64 = 16.0;

/// Viewport-relative rectangle, as `getBoundingClientRect` reports it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self { top, left, width, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1280.0, height: 800.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Default for Size {
    fn default() -> Self {
        Self { width: 320.0, height: 48.0 }
    }
}

/// Document-absolute box of a highlight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoxPlacement {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LabelPlacement {
    pub top: f64,
    pub left: f64,
    /// Drawn inside the box top edge (rounded bottom corners)
    pub inside: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FormPlacement {
    pub top: f64,
    pub left: f64,
    /// Placed above the anchor for lack of room below
    pub flipped: bool,
}

pub fn highlight_box(rect: Rect, scroll: ScrollOffset) -> BoxPlacement {
    BoxPlacement {
        top: rect.top + scroll.y,
        left: rect.left + scroll.x,
        width: rect.width,
        height: rect.height,
    }
}

pub fn label_position(rect: Rect, scroll: ScrollOffset) -> LabelPlacement {
    let inside = rect.top < LABEL_HEIGHT;
    let top = if inside {
        rect.top + scroll.y + LABEL_INSET
    } else {
        rect.top + scroll.y - LABEL_HEIGHT
    };
    LabelPlacement {
        top,
        left: rect.left + scroll.x,
        inside,
    }
}

/// Form goes just below the anchor, or just above it when the viewport
/// has no room below; it never hangs past the right viewport edge.
pub fn form_position(anchor: Rect, form: Size, scroll: ScrollOffset, viewport: Viewport) -> FormPlacement {
    let flipped = anchor.bottom() + form.height + FORM_GAP > viewport.height;
    let top = if flipped {
        anchor.top + scroll.y - form.height - FORM_GAP
    } else {
        anchor.bottom() + scroll.y + FORM_GAP
    };
    let left = (anchor.left + scroll.x).min(viewport.width - form.width - FORM_EDGE_MARGIN);
    FormPlacement { top, left, flipped }
}

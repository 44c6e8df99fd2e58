// ── Hover tooltips ──
//
// A tooltip sits above its anchor with a small gap and is pulled back inside
// the viewport when it would overflow on the right.

use serde::Serialize;

/// Vertical gap between the anchor and the tooltip.
pub const TOOLTIP_GAP: f64 = 5.0;

/// Right-hand margin kept when a tooltip is clamped into the viewport.
pub const VIEWPORT_MARGIN: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// A placed tooltip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub text: String,
    pub left: f64,
    pub top: f64,
}

impl Tooltip {
    /// Place `text` of rendered size `size` above `anchor`.
    pub fn place(text: impl Into<String>, anchor: Rect, size: Size, viewport_width: f64) -> Self {
        let mut left = anchor.left;
        if left + size.width > viewport_width {
            left = viewport_width - size.width - VIEWPORT_MARGIN;
        }
        Self {
            text: text.into(),
            left,
            top: anchor.top - size.height - TOOLTIP_GAP,
        }
    }
}

/// The page's single tooltip slot: hovering shows, leaving hides.
#[derive(Debug, Clone, Default)]
pub struct TooltipLayer {
    current: Option<Tooltip>,
}

impl TooltipLayer {
    pub fn show(&mut self, text: impl Into<String>, anchor: Rect, size: Size, viewport_width: f64) {
        self.current = Some(Tooltip::place(text, anchor, size, viewport_width));
    }

    pub fn hide(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Tooltip> {
        self.current.as_ref()
    }
}

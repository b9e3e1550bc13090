//! Small drawing and hit-testing helpers shared by the applications.

use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::ui::{UiFrame, rect_contains};

/// Clickable regions recorded during render, in content-local coordinates.
#[derive(Debug, Clone)]
pub(crate) struct HitMap<T> {
    hits: Vec<(Rect, T)>,
}

impl<T> Default for HitMap<T> {
    fn default() -> Self {
        Self { hits: Vec::new() }
    }
}

impl<T: Copy> HitMap<T> {
    pub fn clear(&mut self) {
        self.hits.clear();
    }

    pub fn push(&mut self, rect: Rect, value: T) {
        self.hits.push((rect, value));
    }

    pub fn at(&self, column: u16, row: u16) -> Option<T> {
        self.hits
            .iter()
            .find(|(rect, _)| rect_contains(*rect, column, row))
            .map(|(_, value)| *value)
    }

    #[cfg(test)]
    pub fn rect_of(&self, pred: impl Fn(&T) -> bool) -> Option<Rect> {
        self.hits
            .iter()
            .find(|(_, value)| pred(value))
            .map(|(rect, _)| *rect)
    }
}

/// Translate a content-local rectangle into the frame's coordinates.
pub(crate) fn to_frame(area: Rect, local: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(local.x),
        y: area.y.saturating_add(local.y),
        ..local
    }
}

/// Draw a one-row button with its label centred.
pub(crate) fn button(frame: &mut UiFrame<'_>, area: Rect, local: Rect, label: &str, style: Style) {
    let rect = to_frame(area, local);
    frame.fill(rect, style);
    let len = label.chars().count() as u16;
    let x = rect.x + rect.width.saturating_sub(len) / 2;
    let y = rect.y + rect.height.saturating_sub(1) / 2;
    frame.text(x, y, label, style);
}

/// Write text at a content-local position.
pub(crate) fn label(frame: &mut UiFrame<'_>, area: Rect, x: u16, y: u16, text: &str, style: Style) {
    if y >= area.height || x >= area.width {
        return;
    }
    frame.text(area.x + x, area.y + y, text, style);
}

/// Horizontally centre `text` on a content-local row.
pub(crate) fn centered(frame: &mut UiFrame<'_>, area: Rect, y: u16, text: &str, style: Style) {
    let len = text.chars().count() as u16;
    let x = area.width.saturating_sub(len) / 2;
    label(frame, area, x, y, text, style);
}

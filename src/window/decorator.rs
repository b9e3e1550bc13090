use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use super::FloatRect;
use crate::theme;
use crate::ui::{safe_set_string, truncate_to_width};

/// Width of one title bar control (`_`, `□`, `×`), in cells.
pub const CONTROL_WIDTH: u16 = 3;
const CONTROLS: [(&str, HeaderAction); 3] = [
    (" _ ", HeaderAction::Minimize),
    (" □ ", HeaderAction::Maximize),
    (" × ", HeaderAction::Close),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Minimize,
    Maximize,
    Close,
    Drag,
    None,
}

pub trait WindowDecorator: std::fmt::Debug {
    /// Draw chrome for a window occupying `rect` of `buffer`.
    fn render_window(&self, buffer: &mut Buffer, rect: Rect, title: &str, focused: bool);

    /// Classify a pointer position relative to a window's frame.
    fn hit_test(&self, frame: FloatRect, column: u16, row: u16) -> HeaderAction;

    /// Interior of `rect` handed to the hosted content.
    fn content_rect(&self, rect: Rect) -> Rect;
}

/// Title bar across the top row, single-line border on the other three sides.
#[derive(Debug, Default)]
pub struct ClassicDecorator;

impl ClassicDecorator {
    fn controls_width(width: u16) -> u16 {
        (CONTROL_WIDTH * CONTROLS.len() as u16).min(width)
    }
}

impl WindowDecorator for ClassicDecorator {
    fn render_window(&self, buffer: &mut Buffer, rect: Rect, title: &str, focused: bool) {
        let bounds = rect.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        let header_style = if focused {
            Style::default()
                .bg(theme::title_active_bg())
                .fg(theme::title_active_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(theme::title_inactive_bg())
                .fg(theme::title_inactive_fg())
        };
        let border_style = Style::default()
            .fg(theme::window_border())
            .bg(theme::window_bg());
        let control_style = Style::default()
            .bg(theme::control_bg())
            .fg(theme::control_fg());

        let left = rect.x;
        let right = rect.x.saturating_add(rect.width).saturating_sub(1);
        let top = rect.y;
        let bottom = rect.y.saturating_add(rect.height).saturating_sub(1);

        for x in left..=right {
            if let Some(cell) = buffer.cell_mut((x, top)) {
                cell.set_symbol(" ");
                cell.set_style(header_style);
            }
        }
        let controls = Self::controls_width(rect.width);
        let title_room = rect.width.saturating_sub(controls).saturating_sub(1);
        let label = truncate_to_width(title, title_room as usize);
        safe_set_string(buffer, bounds, left.saturating_add(1), top, &label, header_style);

        let mut x = right.saturating_add(1).saturating_sub(controls);
        for (glyph, _) in CONTROLS {
            safe_set_string(buffer, bounds, x, top, glyph, control_style);
            x = x.saturating_add(CONTROL_WIDTH);
        }

        if bottom <= top {
            return;
        }
        for y in top.saturating_add(1)..bottom {
            for (x, symbol) in [(left, "│"), (right, "│")] {
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.set_symbol(symbol);
                    cell.set_style(border_style);
                }
            }
        }
        for x in left..=right {
            if let Some(cell) = buffer.cell_mut((x, bottom)) {
                let symbol = if x == left {
                    "└"
                } else if x == right {
                    "┘"
                } else {
                    "─"
                };
                cell.set_symbol(symbol);
                cell.set_style(border_style);
            }
        }
    }

    fn hit_test(&self, frame: FloatRect, column: u16, row: u16) -> HeaderAction {
        if !frame.contains(column, row) || row as i32 != frame.y {
            return HeaderAction::None;
        }
        let controls = Self::controls_width(frame.width) as i32;
        let right_edge = frame.x + frame.width as i32;
        let from_controls = column as i32 - (right_edge - controls);
        if from_controls < 0 {
            return HeaderAction::Drag;
        }
        let slot = (from_controls / CONTROL_WIDTH as i32) as usize;
        CONTROLS
            .get(slot)
            .map(|(_, action)| *action)
            .unwrap_or(HeaderAction::Drag)
    }

    fn content_rect(&self, rect: Rect) -> Rect {
        Rect {
            x: rect.x.saturating_add(1),
            y: rect.y.saturating_add(1),
            width: rect.width.saturating_sub(2),
            height: rect.height.saturating_sub(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> FloatRect {
        FloatRect {
            x: 10,
            y: 4,
            width: 20,
            height: 8,
        }
    }

    #[test]
    fn hit_test_classifies_controls_and_title() {
        let deco = ClassicDecorator;
        assert_eq!(deco.hit_test(frame(), 12, 4), HeaderAction::Drag);
        assert_eq!(deco.hit_test(frame(), 21, 4), HeaderAction::Minimize);
        assert_eq!(deco.hit_test(frame(), 24, 4), HeaderAction::Maximize);
        assert_eq!(deco.hit_test(frame(), 29, 4), HeaderAction::Close);
        assert_eq!(deco.hit_test(frame(), 12, 5), HeaderAction::None);
        assert_eq!(deco.hit_test(frame(), 30, 4), HeaderAction::None);
    }

    #[test]
    fn hit_test_with_offscreen_origin() {
        let deco = ClassicDecorator;
        let rect = FloatRect {
            x: -5,
            y: 0,
            width: 20,
            height: 6,
        };
        assert_eq!(deco.hit_test(rect, 0, 0), HeaderAction::Drag);
        assert_eq!(deco.hit_test(rect, 14, 0), HeaderAction::Close);
    }

    #[test]
    fn render_draws_title_controls_and_border() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 20,
            height: 5,
        };
        let mut buf = Buffer::empty(area);
        ClassicDecorator.render_window(&mut buf, area, "Paint", true);
        assert_eq!(buf.cell((1, 0)).unwrap().symbol(), "P");
        assert_eq!(buf.cell((12, 0)).unwrap().symbol(), "_");
        assert_eq!(buf.cell((15, 0)).unwrap().symbol(), "□");
        assert_eq!(buf.cell((18, 0)).unwrap().symbol(), "×");
        assert_eq!(buf.cell((0, 2)).unwrap().symbol(), "│");
        assert_eq!(buf.cell((0, 4)).unwrap().symbol(), "└");
        assert_eq!(buf.cell((19, 4)).unwrap().symbol(), "┘");
    }

    #[test]
    fn content_rect_is_interior() {
        let rect = Rect {
            x: 0,
            y: 0,
            width: 20,
            height: 8,
        };
        assert_eq!(
            ClassicDecorator.content_rect(rect),
            Rect {
                x: 1,
                y: 1,
                width: 18,
                height: 6
            }
        );
    }
}

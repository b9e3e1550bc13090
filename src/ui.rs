//! Clipped drawing surface shared by the shell, the window chrome and the
//! hosted applications.
//!
//! Windows are composed into an off-screen buffer at their logical size and
//! then copied onto the desktop at a signed origin, so a window dragged past
//! the screen edge simply loses the cells that fall outside.
use crate::window::FloatRect;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

/// Wrapper around a ratatui buffer that clamps drawing to `area`.
pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a frame over an arbitrary buffer, e.g. an off-screen window surface.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    /// Paint every cell of `area` (clipped) with a blank symbol in `style`.
    pub fn fill(&mut self, area: Rect, style: Style) {
        let Some(clipped) = self.clip_rect(area) else {
            return;
        };
        for y in clipped.y..clipped.y.saturating_add(clipped.height) {
            for x in clipped.x..clipped.x.saturating_add(clipped.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.set_symbol(" ");
                    cell.set_style(style);
                }
            }
        }
    }

    /// Write `text` at `(x, y)`, truncated at the frame's right edge.
    pub fn text(&mut self, x: u16, y: u16, text: &str, style: Style) {
        safe_set_string(self.buffer, self.area, x, y, text, style);
    }

    /// Copy `src` (whose origin is `(0, 0)`) onto this frame at a signed offset.
    pub fn blit_from_signed(&mut self, src: &Buffer, dest: FloatRect) {
        let frame_x0 = self.area.x as i32;
        let frame_y0 = self.area.y as i32;
        let frame_x1 = frame_x0 + self.area.width as i32;
        let frame_y1 = frame_y0 + self.area.height as i32;
        for sy in 0..dest.height as i32 {
            let dy = dest.y + sy;
            if dy < frame_y0 || dy >= frame_y1 {
                continue;
            }
            for sx in 0..dest.width as i32 {
                let dx = dest.x + sx;
                if dx < frame_x0 || dx >= frame_x1 {
                    continue;
                }
                if let (Some(src_cell), Some(dst_cell)) = (
                    src.cell((sx as u16, sy as u16)),
                    self.buffer.cell_mut((dx as u16, dy as u16)),
                ) {
                    *dst_cell = src_cell.clone();
                }
            }
        }
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

/// Left-pad `value` so it occupies `width` columns, truncating when too long.
pub(crate) fn align_right(value: &str, width: usize) -> String {
    let value = truncate_to_width(value, width);
    format!("{value:>width$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn filled(area: Rect, symbol: &str) -> Buffer {
        let mut buf = Buffer::empty(area);
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_symbol(symbol);
                }
            }
        }
        buf
    }

    #[test]
    fn blit_from_signed_clips_negative_offsets() {
        let frame_area = Rect::new(0, 0, 4, 2);
        let mut dest = Buffer::empty(frame_area);
        let mut frame = UiFrame::from_parts(frame_area, &mut dest);
        let src = filled(Rect::new(0, 0, 3, 2), "#");
        frame.blit_from_signed(
            &src,
            FloatRect {
                x: -1,
                y: 0,
                width: 3,
                height: 2,
            },
        );
        assert_eq!(dest.cell((0, 0)).unwrap().symbol(), "#");
        assert_eq!(dest.cell((1, 1)).unwrap().symbol(), "#");
        assert_eq!(dest.cell((2, 0)).unwrap().symbol(), " ");
    }

    #[test]
    fn blit_from_signed_respects_frame_origin() {
        // desktop frame that ends above a taskbar row
        let screen = Rect::new(0, 0, 6, 4);
        let desktop = Rect::new(0, 0, 6, 3);
        let mut dest = Buffer::empty(screen);
        let mut frame = UiFrame::from_parts(desktop, &mut dest);
        let src = filled(Rect::new(0, 0, 2, 3), "W");
        frame.blit_from_signed(
            &src,
            FloatRect {
                x: 4,
                y: 2,
                width: 2,
                height: 3,
            },
        );
        assert_eq!(dest.cell((4, 2)).unwrap().symbol(), "W");
        assert_eq!(dest.cell((4, 3)).unwrap().symbol(), " ");
    }

    #[test]
    fn fill_and_text_clip_to_area() {
        let area = Rect::new(0, 0, 5, 2);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        frame.fill(Rect::new(3, 0, 10, 10), Style::default().bg(Color::Cyan));
        frame.text(2, 1, "hello", Style::default());
        assert_eq!(buf.cell((4, 1)).unwrap().bg, Color::Cyan);
        assert_eq!(buf.cell((2, 0)).unwrap().bg, Color::Reset);
        assert_eq!(buf.cell((2, 1)).unwrap().symbol(), "h");
        assert_eq!(buf.cell((4, 1)).unwrap().symbol(), "l");
    }

    #[test]
    fn rect_contains_edge_cases() {
        assert!(!rect_contains(Rect::new(0, 0, 0, 5), 0, 0));
        let r = Rect::new(2, 2, 3, 3);
        assert!(rect_contains(r, 2, 2));
        assert!(rect_contains(r, 4, 4));
        assert!(!rect_contains(r, 5, 4));
    }

    #[test]
    fn text_helpers() {
        assert_eq!(truncate_to_width("abc", 5), "abc");
        assert_eq!(truncate_to_width("abcdef", 3), "abc");
        assert_eq!(align_right("42", 5), "   42");
        assert_eq!(align_right("123456", 3), "123");
    }
}

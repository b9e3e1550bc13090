use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::widgets::{HitMap, centered, label};
use crate::components::{AppContext, HostApp};
use crate::theme;
use crate::ui::UiFrame;

const TREE_WIDTH: u16 = 20;
const PLACES: [(&str, &str); 5] = [
    ("💾", "Floppy (A:)"),
    ("💿", "CD Drive (D:)"),
    ("🖴", "Local Disk (C:)"),
    ("🌐", "Network"),
    ("🗑", "Recycle Bin"),
];
/// Drives shown as large icons in the right pane.
const DRIVES: usize = 3;
const DRIVE_COLUMN_WIDTH: u16 = 16;

#[derive(Debug, Default)]
pub struct MyComputer {
    selected: Option<usize>,
    hits: HitMap<usize>,
}

impl MyComputer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&'static str> {
        self.selected.map(|i| PLACES[i].1)
    }
}

impl HostApp for MyComputer {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &AppContext) {
        self.hits.clear();
        let base = Style::default()
            .bg(theme::field_bg())
            .fg(theme::field_fg());
        frame.fill(area, base);
        let selected = Style::default()
            .bg(theme::menu_selected_bg())
            .fg(theme::menu_selected_fg());

        label(frame, area, 1, 0, "My Computer", base.add_modifier(Modifier::BOLD));
        for (i, (icon, name)) in PLACES.iter().enumerate() {
            let y = 2 + i as u16;
            let style = if self.selected == Some(i) { selected } else { base };
            label(frame, area, 2, y, &format!("{icon} {name}"), style);
            self.hits.push(Rect::new(2, y, TREE_WIDTH - 2, 1), i);
        }
        for y in 0..area.height {
            label(frame, area, TREE_WIDTH, y, "│", base.fg(theme::window_border()));
        }

        for (i, (icon, name)) in PLACES.iter().take(DRIVES).enumerate() {
            let x = TREE_WIDTH + 2 + i as u16 * DRIVE_COLUMN_WIDTH;
            let style = if self.selected == Some(i) { selected } else { base };
            label(frame, area, x + DRIVE_COLUMN_WIDTH / 2 - 1, 1, icon, base);
            label(frame, area, x, 3, name, style);
            self.hits.push(Rect::new(x, 1, DRIVE_COLUMN_WIDTH - 1, 3), i);
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &AppContext) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return false;
        }
        self.selected = self.hits.at(mouse.column, mouse.row);
        true
    }
}

/// Always empty.
#[derive(Debug, Default)]
pub struct RecycleBin;

impl RecycleBin {
    pub fn new() -> Self {
        Self
    }
}

impl HostApp for RecycleBin {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &AppContext) {
        let base = Style::default()
            .bg(theme::window_bg())
            .fg(theme::window_fg());
        frame.fill(area, base);
        let mid = area.height / 2;
        centered(frame, area, mid.saturating_sub(2), "🗑", base);
        centered(frame, area, mid, "The Recycle Bin is empty.", base.add_modifier(Modifier::BOLD));
        centered(
            frame,
            area,
            mid + 2,
            "Drag items here to delete them.",
            base.fg(theme::title_inactive_bg()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseEvent};
    use ratatui::buffer::Buffer;

    fn draw(app: &mut dyn HostApp, area: Rect) -> Buffer {
        let mut buf = Buffer::empty(area);
        app.render(
            &mut UiFrame::from_parts(area, &mut buf),
            area,
            &AppContext::default(),
        );
        buf
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(""))
            .collect()
    }

    #[test]
    fn my_computer_lists_places_and_selects_on_click() {
        let mut app = MyComputer::new();
        let buf = draw(&mut app, Rect::new(0, 0, 54, 12));
        assert!(row_text(&buf, 0).contains("My Computer"));
        assert!(row_text(&buf, 6).contains("Recycle Bin"));

        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 3,
            modifiers: KeyModifiers::NONE,
        });
        assert!(app.handle_event(&click, &AppContext::default()));
        assert_eq!(app.selected(), Some("CD Drive (D:)"));
    }

    #[test]
    fn recycle_bin_reports_empty() {
        let buf = draw(&mut RecycleBin::new(), Rect::new(0, 0, 38, 8));
        assert!(row_text(&buf, 4).contains("The Recycle Bin is empty."));
    }
}

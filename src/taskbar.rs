use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
};

use crate::theme;
use crate::ui::{UiFrame, rect_contains, truncate_to_width};
use crate::window::{TaskbarEntry, WindowId};

pub const START_LABEL: &str = " ⊞ Start ";
const BUTTON_MAX_WIDTH: u16 = 22;
const BUTTON_MIN_WIDTH: u16 = 6;

/// Mirror of one live window. Created and removed only by the window manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarButton {
    pub window_id: WindowId,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskbarHit {
    Start,
    Window(WindowId),
    Tray,
    Empty,
}

#[derive(Debug, Clone, Copy)]
struct ButtonHit {
    id: WindowId,
    rect: Rect,
}

/// Bottom row of the screen: start button, one button per window, clock tray.
#[derive(Debug, Default)]
pub struct Taskbar {
    buttons: Vec<TaskbarButton>,
    area: Rect,
    start_rect: Option<Rect>,
    button_hits: Vec<ButtonHit>,
    tray_rect: Option<Rect>,
}

impl Taskbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_button(&mut self, window_id: WindowId, label: String) {
        self.buttons.push(TaskbarButton { window_id, label });
    }

    pub(crate) fn remove_button(&mut self, window_id: WindowId) {
        self.buttons.retain(|b| b.window_id != window_id);
    }

    pub fn buttons(&self) -> &[TaskbarButton] {
        &self.buttons
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn begin_frame(&mut self) {
        self.start_rect = None;
        self.button_hits.clear();
        self.tray_rect = None;
    }

    /// Split `area` into the desktop and the one-row taskbar below it.
    pub fn split_area(&mut self, area: Rect) -> (Rect, Rect) {
        let bar_h = 1u16.min(area.height);
        let bar = Rect {
            x: area.x,
            y: area.y.saturating_add(area.height).saturating_sub(bar_h),
            width: area.width,
            height: bar_h,
        };
        let desktop = Rect {
            height: area.height.saturating_sub(bar_h),
            ..area
        };
        self.area = bar;
        (desktop, bar)
    }

    /// Rectangle of the start button from the last render, used to anchor the start menu.
    pub fn start_rect(&self) -> Option<Rect> {
        self.start_rect
    }

    pub fn render(
        &mut self,
        frame: &mut UiFrame<'_>,
        entries: &[TaskbarEntry],
        clock: &str,
        start_open: bool,
    ) {
        self.begin_frame();
        let area = self.area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        frame.fill(
            area,
            Style::default()
                .bg(theme::taskbar_bg())
                .fg(theme::taskbar_fg()),
        );
        let y = area.y;
        let max_x = area.x.saturating_add(area.width);
        let mut x = area.x;

        let start_width = START_LABEL.chars().count() as u16;
        let start_style = if start_open {
            Style::default()
                .bg(theme::taskbar_active_bg())
                .fg(theme::taskbar_active_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(theme::taskbar_bg())
                .fg(theme::taskbar_fg())
                .add_modifier(Modifier::BOLD)
        };
        frame.text(x, y, START_LABEL, start_style);
        self.start_rect = Some(Rect {
            x,
            y,
            width: start_width.min(area.width),
            height: 1,
        });
        x = x.saturating_add(start_width).saturating_add(1);

        let tray = format!(" {clock} ");
        let tray_width = tray.chars().count() as u16;
        let tray_x = max_x.saturating_sub(tray_width);
        if tray_x > x {
            frame.text(tray_x, y, &tray, Style::default().fg(theme::tray_fg()));
            self.tray_rect = Some(Rect {
                x: tray_x,
                y,
                width: tray_width,
                height: 1,
            });
        }

        let list_end = tray_x.saturating_sub(1).max(x);
        let available = list_end.saturating_sub(x);
        if entries.is_empty() || available == 0 {
            return;
        }
        let width = (available / entries.len() as u16).clamp(BUTTON_MIN_WIDTH, BUTTON_MAX_WIDTH);
        for entry in entries {
            if x.saturating_add(width) > list_end {
                break;
            }
            let label = truncate_to_width(&entry.label, width.saturating_sub(2) as usize);
            let chunk = format!(" {label:<w$} ", w = width.saturating_sub(2) as usize);
            let style = if entry.highlighted {
                Style::default()
                    .bg(theme::taskbar_active_bg())
                    .fg(theme::taskbar_active_fg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
                    .bg(theme::taskbar_bg())
                    .fg(theme::taskbar_fg())
            };
            frame.text(x, y, &chunk, style);
            self.button_hits.push(ButtonHit {
                id: entry.id,
                rect: Rect {
                    x,
                    y,
                    width,
                    height: 1,
                },
            });
            x = x.saturating_add(width).saturating_add(1);
        }
    }

    /// What lies under the cell, if it is on the taskbar at all.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<TaskbarHit> {
        if !rect_contains(self.area, column, row) {
            return None;
        }
        if self
            .start_rect
            .is_some_and(|rect| rect_contains(rect, column, row))
        {
            return Some(TaskbarHit::Start);
        }
        if let Some(hit) = self
            .button_hits
            .iter()
            .find(|hit| rect_contains(hit.rect, column, row))
        {
            return Some(TaskbarHit::Window(hit.id));
        }
        if self
            .tray_rect
            .is_some_and(|rect| rect_contains(rect, column, row))
        {
            return Some(TaskbarHit::Tray);
        }
        Some(TaskbarHit::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    fn entry(raw: u64, label: &str, highlighted: bool) -> TaskbarEntry {
        TaskbarEntry {
            id: WindowId::new(raw),
            label: label.to_string(),
            highlighted,
        }
    }

    #[test]
    fn split_area_reserves_bottom_row() {
        let mut bar = Taskbar::new();
        let (desktop, row) = bar.split_area(Rect::new(0, 0, 80, 24));
        assert_eq!(desktop, Rect::new(0, 0, 80, 23));
        assert_eq!(row, Rect::new(0, 23, 80, 1));
        assert_eq!(bar.area(), row);
    }

    #[test]
    fn buttons_follow_add_and_remove() {
        let mut bar = Taskbar::new();
        bar.add_button(WindowId::new(1), "a".into());
        bar.add_button(WindowId::new(2), "b".into());
        bar.remove_button(WindowId::new(1));
        assert_eq!(bar.len(), 1);
        assert_eq!(bar.buttons()[0].window_id, WindowId::new(2));
    }

    #[test]
    fn render_then_hit_test_regions() {
        let screen = Rect::new(0, 0, 80, 3);
        let mut buf = Buffer::empty(screen);
        let mut bar = Taskbar::new();
        bar.split_area(screen);
        {
            let mut frame = UiFrame::from_parts(screen, &mut buf);
            bar.render(
                &mut frame,
                &[entry(1, "Notepad", true), entry(2, "Paint", false)],
                "12:34",
                false,
            );
        }
        assert_eq!(bar.hit_test(1, 2), Some(TaskbarHit::Start));
        assert_eq!(bar.hit_test(79, 2), Some(TaskbarHit::Tray));
        assert_eq!(bar.hit_test(1, 0), None);

        let first = bar.button_hits[0].rect;
        let second = bar.button_hits[1].rect;
        assert_eq!(
            bar.hit_test(first.x, 2),
            Some(TaskbarHit::Window(WindowId::new(1)))
        );
        assert_eq!(
            bar.hit_test(second.x + 1, 2),
            Some(TaskbarHit::Window(WindowId::new(2)))
        );
        assert_eq!(buf.cell((first.x + 1, 2)).unwrap().symbol(), "N");
        assert_eq!(buf.cell((74, 2)).unwrap().symbol(), "1");
    }
}

//! The desktop surface behind all windows: an icon column plus the
//! right-click context menu.

use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::apps::AppKind;
use crate::constants::DOUBLE_CLICK_WINDOW;
use crate::theme;
use crate::ui::{UiFrame, rect_contains, truncate_to_width};

const ICON_WIDTH: u16 = 13;
const ICON_HEIGHT: u16 = 3;
const MENU_WIDTH: u16 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopClick {
    /// Second click on the same icon within the double-click window.
    Launch(AppKind),
    Selected(AppKind),
    /// Bare desktop.
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextItem {
    Refresh,
    Properties,
}

impl ContextItem {
    const ALL: [ContextItem; 2] = [ContextItem::Refresh, ContextItem::Properties];

    fn label(self) -> &'static str {
        match self {
            ContextItem::Refresh => "Refresh",
            ContextItem::Properties => "Properties",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ContextMenu {
    column: u16,
    row: u16,
    area: Option<Rect>,
}

#[derive(Debug)]
pub struct Desktop {
    icons: Vec<AppKind>,
    selected: Option<usize>,
    last_click: Option<(usize, Instant)>,
    icon_hits: Vec<(Rect, usize)>,
    context_menu: Option<ContextMenu>,
}

impl Default for Desktop {
    fn default() -> Self {
        Self::new()
    }
}

impl Desktop {
    pub fn new() -> Self {
        Self {
            icons: AppKind::DESKTOP.to_vec(),
            selected: None,
            last_click: None,
            icon_hits: Vec::new(),
            context_menu: None,
        }
    }

    pub fn selected(&self) -> Option<AppKind> {
        self.selected.map(|i| self.icons[i])
    }

    pub fn deselect_all(&mut self) {
        self.selected = None;
        self.last_click = None;
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        self.icon_hits.clear();
        frame.fill(
            area,
            Style::default()
                .bg(theme::desktop_bg())
                .fg(theme::desktop_fg()),
        );
        let rows_per_column = (area.height / ICON_HEIGHT).max(1);
        for (index, kind) in self.icons.iter().enumerate() {
            let column = index as u16 / rows_per_column;
            let row = index as u16 % rows_per_column;
            let rect = Rect {
                x: area.x + 1 + column * ICON_WIDTH,
                y: area.y + row * ICON_HEIGHT,
                width: ICON_WIDTH - 1,
                height: ICON_HEIGHT - 1,
            };
            if !rect_contains(area, rect.x, rect.y) {
                break;
            }
            let descriptor = kind.descriptor();
            let label_style = if self.selected == Some(index) {
                Style::default()
                    .bg(theme::icon_selected_bg())
                    .fg(theme::icon_selected_fg())
            } else {
                Style::default()
                    .bg(theme::desktop_bg())
                    .fg(theme::desktop_fg())
            };
            let label = truncate_to_width(descriptor.title, rect.width as usize);
            let label_x = rect.x + (rect.width - label.chars().count() as u16) / 2;
            frame.text(
                rect.x + rect.width / 2 - 1,
                rect.y,
                descriptor.icon,
                Style::default().bg(theme::desktop_bg()),
            );
            frame.text(label_x, rect.y + 1, &label, label_style);
            self.icon_hits.push((rect, index));
        }
    }

    fn icon_at(&self, column: u16, row: u16) -> Option<usize> {
        self.icon_hits
            .iter()
            .find(|(rect, _)| rect_contains(*rect, column, row))
            .map(|(_, index)| *index)
    }

    /// Left click on the desktop layer.
    pub fn click(&mut self, column: u16, row: u16, now: Instant) -> DesktopClick {
        let Some(index) = self.icon_at(column, row) else {
            self.deselect_all();
            return DesktopClick::Blank;
        };
        let kind = self.icons[index];
        let double = self.last_click.is_some_and(|(last, at)| {
            last == index && now.saturating_duration_since(at) <= DOUBLE_CLICK_WINDOW
        });
        self.selected = Some(index);
        if double {
            self.last_click = None;
            tracing::debug!(?kind, "desktop icon double-clicked");
            DesktopClick::Launch(kind)
        } else {
            self.last_click = Some((index, now));
            DesktopClick::Selected(kind)
        }
    }

    pub fn open_context_menu(&mut self, column: u16, row: u16) {
        self.context_menu = Some(ContextMenu {
            column,
            row,
            area: None,
        });
    }

    pub fn hide_context_menu(&mut self) {
        self.context_menu = None;
    }

    pub fn context_menu_open(&self) -> bool {
        self.context_menu.is_some()
    }

    /// Drawn after the windows so it stays on top.
    pub fn render_context_menu(&mut self, frame: &mut UiFrame<'_>, bounds: Rect) {
        let Some(menu) = self.context_menu.as_mut() else {
            return;
        };
        let height = ContextItem::ALL.len() as u16 + 2;
        let width = MENU_WIDTH.min(bounds.width);
        let max_x = bounds.x + bounds.width.saturating_sub(width);
        let max_y = bounds.y + bounds.height.saturating_sub(height);
        let area = Rect {
            x: menu.column.min(max_x),
            y: menu.row.min(max_y),
            width,
            height: height.min(bounds.height),
        };
        menu.area = Some(area);

        let style = Style::default().bg(theme::menu_bg()).fg(theme::menu_fg());
        frame.fill(area, style);
        let horizontal = "─".repeat(width.saturating_sub(2) as usize);
        frame.text(area.x, area.y, &format!("┌{horizontal}┐"), style);
        for (i, item) in ContextItem::ALL.iter().enumerate() {
            let y = area.y + 1 + i as u16;
            let line = format!(" {:<w$}", item.label(), w = width.saturating_sub(3) as usize);
            frame.text(area.x, y, "│", style);
            frame.text(area.x + 1, y, &line, style);
            frame.text(area.x + width.saturating_sub(1), y, "│", style);
        }
        frame.text(area.x, area.y + height - 1, &format!("└{horizontal}┘"), style);
    }

    /// Item under the cell, when the context menu is showing.
    pub fn context_hit(&self, column: u16, row: u16) -> Option<ContextItem> {
        let area = self.context_menu?.area?;
        if !rect_contains(area, column, row) {
            return None;
        }
        let index = row.checked_sub(area.y + 1)? as usize;
        let inside_x = column > area.x && column < area.x + area.width - 1;
        ContextItem::ALL.get(index).copied().filter(|_| inside_x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;
    use std::time::Duration;

    fn rendered() -> (Desktop, Rect) {
        let mut desktop = Desktop::new();
        let area = Rect::new(0, 0, 80, 23);
        let mut buf = Buffer::empty(area);
        desktop.render(&mut UiFrame::from_parts(area, &mut buf), area);
        (desktop, area)
    }

    #[test]
    fn icons_stack_in_a_column() {
        let (desktop, _) = rendered();
        assert_eq!(desktop.icon_hits.len(), AppKind::DESKTOP.len());
        assert_eq!(desktop.icon_at(2, 0), Some(0));
        assert_eq!(desktop.icon_at(2, 4), Some(1));
        assert_eq!(desktop.icon_at(40, 4), None);
    }

    #[test]
    fn click_selects_and_double_click_launches() {
        let (mut desktop, _) = rendered();
        let t0 = Instant::now();
        assert_eq!(desktop.click(2, 6, t0), DesktopClick::Selected(AppKind::Notepad));
        assert_eq!(desktop.selected(), Some(AppKind::Notepad));
        assert_eq!(
            desktop.click(3, 7, t0 + Duration::from_millis(300)),
            DesktopClick::Launch(AppKind::Notepad)
        );
        // a third click starts a new pair
        assert_eq!(
            desktop.click(3, 7, t0 + Duration::from_millis(400)),
            DesktopClick::Selected(AppKind::Notepad)
        );
    }

    #[test]
    fn slow_or_split_clicks_do_not_launch() {
        let (mut desktop, _) = rendered();
        let t0 = Instant::now();
        desktop.click(2, 6, t0);
        assert_eq!(
            desktop.click(2, 6, t0 + Duration::from_millis(501)),
            DesktopClick::Selected(AppKind::Notepad)
        );
        assert_eq!(
            desktop.click(2, 9, t0 + Duration::from_millis(600)),
            DesktopClick::Selected(AppKind::Calculator)
        );
        assert_eq!(desktop.selected(), Some(AppKind::Calculator));
        assert_eq!(desktop.click(60, 10, t0), DesktopClick::Blank);
        assert_eq!(desktop.selected(), None);
    }

    #[test]
    fn context_menu_is_clamped_and_hit_tested() {
        let (mut desktop, area) = rendered();
        desktop.open_context_menu(78, 22);
        let mut buf = Buffer::empty(area);
        desktop.render_context_menu(&mut UiFrame::from_parts(area, &mut buf), area);
        let menu = desktop.context_menu.and_then(|m| m.area).unwrap();
        assert_eq!(menu.x + menu.width, 80);
        assert_eq!(menu.y + menu.height, 23);
        assert_eq!(desktop.context_hit(menu.x + 2, menu.y + 1), Some(ContextItem::Refresh));
        assert_eq!(desktop.context_hit(menu.x + 2, menu.y + 2), Some(ContextItem::Properties));
        assert_eq!(desktop.context_hit(menu.x + 2, menu.y), None);
        desktop.hide_context_menu();
        assert!(!desktop.context_menu_open());
        assert_eq!(desktop.context_hit(menu.x + 2, menu.y + 1), None);
    }
}

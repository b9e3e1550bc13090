use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::apps::AppKind;
use crate::theme;
use crate::ui::{UiFrame, rect_contains, truncate_to_width};

const BANNER_WIDTH: u16 = 2;
const ITEM_WIDTH: u16 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartItem {
    pub icon: &'static str,
    pub label: &'static str,
    pub kind: AppKind,
    /// Draw a separator line above this entry.
    pub separated: bool,
}

const fn item(icon: &'static str, label: &'static str, kind: AppKind, separated: bool) -> StartItem {
    StartItem {
        icon,
        label,
        kind,
        separated,
    }
}

pub const ITEMS: [StartItem; 10] = [
    item("💻", "My Computer", AppKind::MyComputer, false),
    item("📝", "Notepad", AppKind::Notepad, false),
    item("🧮", "Calculator", AppKind::Calculator, false),
    item("🎨", "Paint", AppKind::Paint, false),
    item("💣", "Minesweeper", AppKind::Minesweeper, false),
    item("⚡", "CPS Tester", AppKind::CpsTester, false),
    item("🗑", "Recycle Bin", AppKind::RecycleBin, false),
    item("❓", "Help", AppKind::NotImplemented("Help"), true),
    item("🏃", "Run...", AppKind::NotImplemented("Run..."), false),
    item("🔌", "Shut Down...", AppKind::ShutDown, true),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartHit {
    Item(AppKind),
    /// Inside the menu but not on an item (banner, border, separator).
    Inside,
}

/// Pop-up launcher anchored above the taskbar start button.
#[derive(Debug)]
pub struct StartMenu {
    open: bool,
    selected: usize,
    area: Option<Rect>,
    item_hits: Vec<(Rect, usize)>,
    hostname: Option<String>,
}

impl Default for StartMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl StartMenu {
    pub fn new() -> Self {
        Self {
            open: false,
            selected: 0,
            area: None,
            item_hits: Vec::new(),
            hostname: None,
        }
    }

    /// Preset host name instead of asking the OS on first render.
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
        self.selected = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.area = None;
        self.item_hits.clear();
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn selected(&self) -> StartItem {
        ITEMS[self.selected]
    }

    fn banner(&mut self) -> String {
        let hostname = match &self.hostname {
            Some(h) => h.clone(),
            None => {
                let h = hostname::get()
                    .ok()
                    .and_then(|s| s.into_string().ok())
                    .unwrap_or_else(|| "unknown-host".to_string());
                self.hostname = Some(h.clone());
                h
            }
        };
        format!("{} @ {hostname}", env!("CARGO_PKG_NAME"))
    }

    fn height() -> u16 {
        let separators = ITEMS.iter().filter(|i| i.separated).count() as u16;
        ITEMS.len() as u16 + separators + 2
    }

    /// Draw above `anchor` (the start button), clamped inside `screen`.
    pub fn render(&mut self, frame: &mut UiFrame<'_>, anchor: Rect, screen: Rect) {
        self.area = None;
        self.item_hits.clear();
        if !self.open {
            return;
        }
        let width = (BANNER_WIDTH + ITEM_WIDTH + 2).min(screen.width);
        let height = Self::height().min(anchor.y.saturating_sub(screen.y));
        if width == 0 || height < 3 {
            return;
        }
        let area = Rect {
            x: anchor.x,
            y: anchor.y - height,
            width,
            height,
        };
        self.area = Some(area);

        let base = Style::default().bg(theme::menu_bg()).fg(theme::menu_fg());
        frame.fill(area, base);
        let right = area.x + area.width - 1;
        let bottom = area.y + area.height - 1;
        let horizontal = "─".repeat(area.width.saturating_sub(2) as usize);
        frame.text(area.x, area.y, &format!("┌{horizontal}┐"), base);
        frame.text(area.x, bottom, &format!("└{horizontal}┘"), base);
        for y in area.y + 1..bottom {
            frame.text(area.x, y, "│", base);
            frame.text(right, y, "│", base);
        }

        // Vertical banner, read bottom to top like the classic one.
        let banner_style = Style::default()
            .bg(theme::menu_banner_bg())
            .fg(theme::menu_banner_fg())
            .add_modifier(Modifier::BOLD);
        let banner_x = area.x + 1;
        let inner_h = area.height - 2;
        frame.fill(Rect::new(banner_x, area.y + 1, BANNER_WIDTH, inner_h), banner_style);
        let banner = self.banner();
        for (i, ch) in banner.chars().take(inner_h as usize).enumerate() {
            let y = bottom - 1 - i as u16;
            frame.text(banner_x, y, &ch.to_string(), banner_style);
        }

        let item_x = banner_x + BANNER_WIDTH;
        let item_w = right.saturating_sub(item_x);
        let mut y = area.y + 1;
        for (index, entry) in ITEMS.iter().enumerate() {
            if y >= bottom {
                break;
            }
            if entry.separated {
                frame.text(item_x, y, &"─".repeat(item_w as usize), base);
                y += 1;
                if y >= bottom {
                    break;
                }
            }
            let style = if index == self.selected {
                Style::default()
                    .bg(theme::menu_selected_bg())
                    .fg(theme::menu_selected_fg())
            } else {
                base
            };
            let rect = Rect::new(item_x, y, item_w, 1);
            frame.fill(rect, style);
            let text = truncate_to_width(&format!(" {} {}", entry.icon, entry.label), item_w as usize);
            frame.text(item_x, y, &text, style);
            self.item_hits.push((rect, index));
            y += 1;
        }
    }

    pub fn area(&self) -> Option<Rect> {
        self.area
    }

    /// `None` when the cell is outside the open menu.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<StartHit> {
        let area = self.area?;
        if !rect_contains(area, column, row) {
            return None;
        }
        let hit = self
            .item_hits
            .iter()
            .find(|(rect, _)| rect_contains(*rect, column, row))
            .map_or(StartHit::Inside, |(_, index)| StartHit::Item(ITEMS[*index].kind));
        Some(hit)
    }

    /// Highlight the item under the pointer.
    pub fn hover(&mut self, column: u16, row: u16) {
        if let Some((_, index)) = self
            .item_hits
            .iter()
            .find(|(rect, _)| rect_contains(*rect, column, row))
        {
            self.selected = *index;
        }
    }

    /// Arrow keys move the highlight; Enter returns the chosen application.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<AppKind> {
        if !self.open || key.kind == KeyEventKind::Release {
            return None;
        }
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.checked_sub(1).unwrap_or(ITEMS.len() - 1);
                None
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1) % ITEMS.len();
                None
            }
            KeyCode::Enter => Some(ITEMS[self.selected].kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::buffer::Buffer;

    fn render_open(menu: &mut StartMenu) -> Buffer {
        let screen = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(screen);
        let anchor = Rect::new(0, 23, 9, 1);
        menu.render(&mut UiFrame::from_parts(screen, &mut buf), anchor, screen);
        buf
    }

    #[test]
    fn toggle_open_and_close() {
        let mut menu = StartMenu::new();
        assert!(!menu.is_open());
        menu.toggle();
        assert!(menu.is_open());
        menu.toggle();
        assert!(!menu.is_open());
        assert_eq!(menu.hit_test(3, 20), None);
    }

    #[test]
    fn renders_above_anchor_and_hits_items() {
        let mut menu = StartMenu::new().with_hostname("retro");
        menu.open();
        let buf = render_open(&mut menu);
        let area = menu.area().unwrap();
        assert_eq!(area.y + area.height, 23);
        assert_eq!(area.height, StartMenu::height());

        // first item sits on the first inner row
        assert_eq!(
            menu.hit_test(area.x + 5, area.y + 1),
            Some(StartHit::Item(AppKind::MyComputer))
        );
        assert_eq!(menu.hit_test(area.x + 1, area.y + 1), Some(StartHit::Inside));
        // last row above the bottom border is Shut Down
        assert_eq!(
            menu.hit_test(area.x + 5, area.y + area.height - 2),
            Some(StartHit::Item(AppKind::ShutDown))
        );
        assert_eq!(menu.hit_test(40, 5), None);

        // banner is drawn bottom-up starting with the crate name
        let first = env!("CARGO_PKG_NAME").chars().next().unwrap().to_string();
        assert_eq!(
            buf.cell((area.x + 1, area.y + area.height - 2)).unwrap().symbol(),
            first
        );
    }

    #[test]
    fn keyboard_navigation_wraps_and_enter_launches() {
        let mut menu = StartMenu::new().with_hostname("retro");
        menu.open();
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(menu.handle_key(&key(KeyCode::Up)), None);
        assert_eq!(menu.selected().kind, AppKind::ShutDown);
        menu.handle_key(&key(KeyCode::Down));
        menu.handle_key(&key(KeyCode::Down));
        assert_eq!(menu.handle_key(&key(KeyCode::Enter)), Some(AppKind::Notepad));
    }

    #[test]
    fn hover_moves_highlight() {
        let mut menu = StartMenu::new().with_hostname("retro");
        menu.open();
        render_open(&mut menu);
        let area = menu.area().unwrap();
        menu.hover(area.x + 6, area.y + 3);
        assert_eq!(menu.selected().kind, AppKind::Calculator);
    }
}

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::widgets::label;
use crate::components::{AppContext, HostApp};
use crate::theme;
use crate::ui::UiFrame;

const MENU: &str = " File  Edit  Search  Help";
const PLACEHOLDER: &str = "Type here...";

/// Plain text editor. The cursor always sits at the end of the text.
#[derive(Debug)]
pub struct Notepad {
    lines: Vec<String>,
}

impl Default for Notepad {
    fn default() -> Self {
        Self::new()
    }
}

impl Notepad {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn insert(&mut self, ch: char) {
        if let Some(line) = self.lines.last_mut() {
            line.push(ch);
        }
    }

    fn newline(&mut self) {
        self.lines.push(String::new());
    }

    fn backspace(&mut self) {
        let Some(line) = self.lines.last_mut() else {
            return;
        };
        if line.pop().is_none() && self.lines.len() > 1 {
            self.lines.pop();
        }
    }
}

impl HostApp for Notepad {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &AppContext) {
        let menu_style = Style::default()
            .bg(theme::window_bg())
            .fg(theme::window_fg());
        frame.fill(
            Rect {
                height: 1u16.min(area.height),
                ..area
            },
            menu_style,
        );
        label(frame, area, 0, 0, MENU, menu_style);

        let field = Rect {
            x: area.x,
            y: area.y.saturating_add(1),
            width: area.width,
            height: area.height.saturating_sub(1),
        };
        let field_style = Style::default()
            .bg(theme::field_bg())
            .fg(theme::field_fg());
        frame.fill(field, field_style);
        if field.height == 0 {
            return;
        }

        if self.text().is_empty() {
            frame.text(
                field.x,
                field.y,
                PLACEHOLDER,
                field_style.add_modifier(Modifier::DIM),
            );
        }
        let visible = field.height as usize;
        let skip = self.lines.len().saturating_sub(visible);
        let width = field.width as usize;
        for (row, line) in self.lines.iter().skip(skip).enumerate() {
            // keep the tail of long lines so the cursor stays in view
            let chars = line.chars().count();
            let shown: String = line
                .chars()
                .skip(chars.saturating_sub(width.saturating_sub(1)))
                .collect();
            frame.text(field.x, field.y + row as u16, &shown, field_style);
            if ctx.focused() && skip + row == self.lines.len() - 1 {
                let cursor_x = field.x + shown.chars().count() as u16;
                frame.text(cursor_x, field.y + row as u16, "▏", field_style);
            }
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &AppContext) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind == KeyEventKind::Release {
            return false;
        }
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        match key.code {
            KeyCode::Char(ch) => self.insert(ch),
            KeyCode::Tab => {
                for _ in 0..4 {
                    self.insert(' ');
                }
            }
            KeyCode::Enter => self.newline(),
            KeyCode::Backspace => self.backspace(),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use ratatui::buffer::Buffer;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(pad: &mut Notepad, text: &str) {
        let ctx = AppContext::default();
        for ch in text.chars() {
            let code = if ch == '\n' {
                KeyCode::Enter
            } else {
                KeyCode::Char(ch)
            };
            pad.handle_event(&key(code), &ctx);
        }
    }

    #[test]
    fn typing_enter_and_backspace_edit_the_buffer() {
        let mut pad = Notepad::new();
        type_str(&mut pad, "hi\nthere");
        assert_eq!(pad.text(), "hi\nthere");
        let ctx = AppContext::default();
        for _ in 0..6 {
            pad.handle_event(&key(KeyCode::Backspace), &ctx);
        }
        assert_eq!(pad.text(), "hi");
    }

    #[test]
    fn control_chords_are_left_for_the_shell() {
        let mut pad = Notepad::new();
        let ctrl_w = Event::Key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert!(!pad.handle_event(&ctrl_w, &AppContext::default()));
        assert_eq!(pad.text(), "");
    }

    #[test]
    fn render_shows_menu_and_text() {
        let mut pad = Notepad::new();
        type_str(&mut pad, "abc");
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        pad.render(&mut frame, area, &AppContext::default());
        assert_eq!(buf.cell((1, 0)).unwrap().symbol(), "F");
        assert_eq!(buf.cell((0, 1)).unwrap().symbol(), "a");
        assert_eq!(buf.cell((2, 1)).unwrap().symbol(), "c");
    }
}

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use indoc::indoc;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::widgets::{HitMap, button, label};
use crate::components::{AppContext, AppRequest, HostApp};
use crate::theme;
use crate::ui::UiFrame;

const CALCULATOR_HELP: &str = indoc! {"
    Basic operation
      0-9        enter digits
      + - × ÷    arithmetic
      =          result (repeat to reapply)
      C / CE     clear all / clear entry
      ←          backspace
    Memory
      MC MR MS   clear, recall, store
      M+ M-      add to / subtract from memory
    Functions
      √ x² 1/x   root, square, reciprocal
      % ±        percent, change sign
    Keyboard
      Enter = equals, Backspace deletes,
      Esc clears everything
"};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    CalculatorHelp,
    NotImplemented(&'static str),
    ShutDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Ok,
    Yes,
    No,
}

/// Modal-looking message box. Lives in an ordinary window.
#[derive(Debug)]
pub struct Dialog {
    kind: DialogKind,
    hits: HitMap<Choice>,
    requests: Vec<AppRequest>,
}

impl Dialog {
    pub fn new(kind: DialogKind) -> Self {
        Self {
            kind,
            hits: HitMap::default(),
            requests: Vec::new(),
        }
    }

    pub fn kind(&self) -> DialogKind {
        self.kind
    }

    fn choices(&self) -> &'static [Choice] {
        match self.kind {
            DialogKind::ShutDown => &[Choice::Yes, Choice::No],
            DialogKind::CalculatorHelp | DialogKind::NotImplemented(_) => &[Choice::Ok],
        }
    }

    fn choose(&mut self, choice: Choice) {
        let request = match choice {
            Choice::Yes => AppRequest::ShutDown,
            Choice::Ok | Choice::No => AppRequest::CloseSelf,
        };
        self.requests.push(request);
    }
}

impl HostApp for Dialog {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &AppContext) {
        self.hits.clear();
        let base = Style::default()
            .bg(theme::window_bg())
            .fg(theme::window_fg());
        frame.fill(area, base);

        let body_end = match self.kind {
            DialogKind::CalculatorHelp => {
                label(frame, area, 1, 0, "Calculator Help", base.add_modifier(Modifier::BOLD));
                for (i, line) in CALCULATOR_HELP.lines().enumerate() {
                    let style = if line.starts_with(' ') {
                        base
                    } else {
                        base.add_modifier(Modifier::UNDERLINED)
                    };
                    label(frame, area, 1, 2 + i as u16, line, style);
                }
                2 + CALCULATOR_HELP.lines().count() as u16
            }
            DialogKind::NotImplemented(feature) => {
                label(frame, area, 2, 1, "⚠", base.add_modifier(Modifier::BOLD));
                label(frame, area, 5, 1, &format!("\"{feature}\" is not"), base);
                label(frame, area, 5, 2, "implemented yet.", base);
                3
            }
            DialogKind::ShutDown => {
                label(frame, area, 2, 1, "🔌", base);
                label(frame, area, 5, 1, "Are you sure you want", base);
                label(frame, area, 5, 2, "to shut down?", base);
                3
            }
        };

        let choices = self.choices();
        let row = body_end.max(area.height.saturating_sub(2)).min(area.height.saturating_sub(1));
        let total = choices.len() as u16 * 9 - 1;
        let mut x = area.width.saturating_sub(total) / 2;
        let style = Style::default()
            .bg(theme::button_bg())
            .fg(theme::button_fg())
            .add_modifier(Modifier::BOLD);
        for &choice in choices {
            let text = match choice {
                Choice::Ok => "OK",
                Choice::Yes => "Yes",
                Choice::No => "No",
            };
            let local = Rect::new(x, row, 8, 1);
            button(frame, area, local, text, style);
            self.hits.push(local, choice);
            x += 9;
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &AppContext) -> bool {
        match event {
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let Some(choice) = self.hits.at(mouse.column, mouse.row) else {
                    return false;
                };
                self.choose(choice);
                true
            }
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                let choice = match key.code {
                    KeyCode::Enter => self.choices()[0],
                    KeyCode::Esc => *self.choices().last().unwrap_or(&Choice::Ok),
                    _ => return false,
                };
                self.choose(choice);
                true
            }
            _ => false,
        }
    }

    fn take_requests(&mut self) -> Vec<AppRequest> {
        std::mem::take(&mut self.requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::buffer::Buffer;

    fn rendered(kind: DialogKind, area: Rect) -> Dialog {
        let mut dialog = Dialog::new(kind);
        let mut buf = Buffer::empty(area);
        dialog.render(
            &mut UiFrame::from_parts(area, &mut buf),
            area,
            &AppContext::default(),
        );
        dialog
    }

    fn click_on(dialog: &mut Dialog, choice: Choice) -> bool {
        let rect = dialog.hits.rect_of(|c| *c == choice).unwrap();
        let event = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: rect.x,
            row: rect.y,
            modifiers: KeyModifiers::NONE,
        });
        dialog.handle_event(&event, &AppContext::default())
    }

    #[test]
    fn shutdown_yes_requests_shutdown_and_no_closes() {
        let area = Rect::new(0, 0, 38, 7);
        let mut dialog = rendered(DialogKind::ShutDown, area);
        assert!(click_on(&mut dialog, Choice::Yes));
        assert_eq!(dialog.take_requests(), vec![AppRequest::ShutDown]);

        let mut dialog = rendered(DialogKind::ShutDown, area);
        assert!(click_on(&mut dialog, Choice::No));
        assert_eq!(dialog.take_requests(), vec![AppRequest::CloseSelf]);
    }

    #[test]
    fn notice_ok_closes() {
        let mut dialog = rendered(DialogKind::NotImplemented("Run..."), Rect::new(0, 0, 38, 7));
        assert!(click_on(&mut dialog, Choice::Ok));
        assert_eq!(dialog.take_requests(), vec![AppRequest::CloseSelf]);
    }

    #[test]
    fn help_fits_its_window_and_keys_answer() {
        let area = Rect::new(0, 0, 44, 19);
        let mut dialog = rendered(DialogKind::CalculatorHelp, area);
        let ok = dialog.hits.rect_of(|c| *c == Choice::Ok).unwrap();
        assert!(ok.y < area.height);
        assert!(ok.y >= 2 + CALCULATOR_HELP.lines().count() as u16);

        let esc = Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(dialog.handle_event(&esc, &AppContext::default()));
        assert_eq!(dialog.take_requests(), vec![AppRequest::CloseSelf]);

        let mut shutdown = Dialog::new(DialogKind::ShutDown);
        let enter = Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(shutdown.handle_event(&enter, &AppContext::default()));
        assert_eq!(shutdown.take_requests(), vec![AppRequest::ShutDown]);
    }
}

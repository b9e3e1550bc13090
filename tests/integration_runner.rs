use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use term_desktop::apps::AppKind;
use term_desktop::audio::{Audio, BellPlayer};
use term_desktop::drivers::{InputDriver, OutputDriver};
use term_desktop::runner::run_shell;
use term_desktop::shell::Shell;
use term_desktop::start_menu::StartMenu;
use term_desktop::ui::UiFrame;

/// Replays a fixed list of events and fails once it runs dry, so a loop that
/// never quits ends the test instead of hanging it.
struct ScriptedInput {
    events: VecDeque<Event>,
    mouse_capture: bool,
}

impl ScriptedInput {
    fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
            mouse_capture: false,
        }
    }
}

impl InputDriver for ScriptedInput {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        if self.events.is_empty() {
            return Err(io::Error::other("script exhausted"));
        }
        Ok(true)
    }

    fn read(&mut self) -> io::Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::other("script exhausted"))
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        self.mouse_capture = enabled;
        Ok(())
    }
}

struct TestOutput {
    terminal: Terminal<TestBackend>,
    entered: usize,
    exited: usize,
    frames: usize,
}

impl TestOutput {
    fn new(width: u16, height: u16) -> Self {
        Self {
            terminal: Terminal::new(TestBackend::new(width, height)).unwrap(),
            entered: 0,
            exited: 0,
            frames: 0,
        }
    }

    fn row(&self, y: u16) -> String {
        let buf = self.terminal.backend().buffer();
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).map_or(" ", |c| c.symbol()))
            .collect()
    }
}

impl OutputDriver for TestOutput {
    fn enter(&mut self) -> io::Result<()> {
        self.entered += 1;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        self.exited += 1;
        Ok(())
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>),
    {
        self.frames += 1;
        self.terminal
            .draw(|frame| f(UiFrame::new(frame)))
            .map(|_| ())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
    Event::Key(KeyEvent::new(code, modifiers))
}

fn shell() -> Shell {
    Shell::new(Rect::new(0, 0, 80, 24), Audio::new(false, Box::new(BellPlayer)))
        .with_start_menu(StartMenu::new().with_hostname("testbox"))
}

#[test]
fn shut_down_from_keyboard_ends_the_session() {
    let mut input = ScriptedInput::new([
        key(KeyCode::Char('q'), KeyModifiers::CONTROL),
        key(KeyCode::Enter, KeyModifiers::NONE),
    ]);
    let mut output = TestOutput::new(80, 24);
    let mut shell = shell();
    shell.boot(&[AppKind::Notepad]);

    run_shell(&mut input, &mut output, &mut shell, Duration::from_millis(1)).unwrap();

    assert!(shell.should_quit());
    assert!(input.mouse_capture);
    assert_eq!((output.entered, output.exited), (1, 1));
    assert!(output.frames >= 1);
    assert!(output.row(23).contains("Start"));
    assert!(output.row(23).contains("Notepad"));
}

#[test]
fn terminal_is_restored_when_input_fails() {
    let mut input = ScriptedInput::new([key(KeyCode::Char('a'), KeyModifiers::NONE)]);
    let mut output = TestOutput::new(80, 24);
    let mut shell = shell();

    let result = run_shell(&mut input, &mut output, &mut shell, Duration::from_millis(1));

    assert!(result.is_err());
    assert!(!shell.should_quit());
    assert_eq!((output.entered, output.exited), (1, 1));
}

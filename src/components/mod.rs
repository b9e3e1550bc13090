use std::time::Instant;

use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::apps::AppKind;
use crate::audio::Sound;
use crate::ui::UiFrame;

pub use crate::component_context::AppContext;

/// Something a hosted application asks the shell to do on its behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRequest {
    /// Close the window hosting this application.
    CloseSelf,
    /// Launch another application in a new window.
    Open(AppKind),
    PlaySound(Sound),
    /// Put text on the system clipboard.
    Copy(String),
    /// Leave the desktop.
    ShutDown,
}

/// Content hosted inside a window.
///
/// The window manager never looks inside; the shell renders the app into the
/// window's content area and forwards input while its window is active.
/// Pointer events arrive relative to the content area's top-left cell.
pub trait HostApp: std::fmt::Debug {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &AppContext);

    /// Returns true when the event was used.
    fn handle_event(&mut self, _event: &Event, _ctx: &AppContext) -> bool {
        false
    }

    /// Periodic update for time-driven apps.
    fn tick(&mut self, _now: Instant) {}

    fn take_requests(&mut self) -> Vec<AppRequest> {
        Vec::new()
    }

    /// Called once when the hosting window is closed.
    fn release(&mut self) {}
}

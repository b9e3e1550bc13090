use crate::ui::UiFrame;
use std::io;

/// Owns the screen: terminal modes on `enter`/`exit`, one frame per `draw`.
pub trait OutputDriver {
    fn enter(&mut self) -> io::Result<()>;
    fn exit(&mut self) -> io::Result<()>;

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>);
}

pub mod decorator;
pub mod drag;

mod window_manager;

use std::fmt;
use std::ops::Sub;

use ratatui::prelude::Rect;

pub use window_manager::{
    Placement, PointerOutcome, TaskbarAction, TaskbarEntry, WindowDraw, WindowManager, WmEvent,
};

/// Identity of one open window. Allocated from a monotonic counter and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(u64);

impl WindowId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// Opaque reference to the content a host application renders into a window.
///
/// The shell owns the application behind the handle; a window only carries it
/// so the owner can be told when to release it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHandle(u64);

impl ContentHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn from_cell(column: u16, row: u16) -> Self {
        Self::new(column as i32, row as i32)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Signed floating rectangle origin with unsigned size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl FloatRect {
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x: rect.x as i32,
            y: rect.y as i32,
            width: rect.width,
            height: rect.height,
        }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        let (col, row) = (column as i32, row as i32);
        col >= self.x
            && col < self.x + self.width as i32
            && row >= self.y
            && row < self.y + self.height as i32
    }
}

/// One open window.
///
/// Fields are only written by [`WindowManager`]; everything outside the
/// `window` module sees them through the accessors below.
#[derive(Debug, Clone)]
pub struct Window {
    id: WindowId,
    title: String,
    icon: String,
    position: Point,
    size: Size,
    z_index: u64,
    state: WindowState,
    content: ContentHandle,
}

impl Window {
    fn new(
        id: WindowId,
        title: String,
        icon: String,
        content: ContentHandle,
        position: Point,
        size: Size,
        z_index: u64,
    ) -> Self {
        Self {
            id,
            title,
            icon,
            position,
            size,
            z_index,
            state: WindowState::Normal,
            content,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn z_index(&self) -> u64 {
        self.z_index
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn content(&self) -> ContentHandle {
        self.content
    }

    pub fn is_minimized(&self) -> bool {
        self.state == WindowState::Minimized
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.icon, self.title)
    }

    /// Geometry the window is drawn at.
    ///
    /// Maximized windows fill `desktop`. The stored position and size are
    /// left untouched while maximized, so restoring lands exactly where the
    /// window was before.
    pub fn frame(&self, desktop: Rect) -> FloatRect {
        match self.state {
            WindowState::Maximized => FloatRect::from_rect(desktop),
            WindowState::Normal | WindowState::Minimized => FloatRect {
                x: self.position.x,
                y: self.position.y,
                width: self.size.width,
                height: self.size.height,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(state: WindowState) -> Window {
        let mut window = Window::new(
            WindowId::new(1),
            "Notepad".to_string(),
            "📝".to_string(),
            ContentHandle::new(7),
            Point::new(-3, 4),
            Size::new(20, 8),
            101,
        );
        window.state = state;
        window
    }

    #[test]
    fn frame_uses_stored_geometry_unless_maximized() {
        let desktop = Rect {
            x: 0,
            y: 0,
            width: 80,
            height: 23,
        };
        let normal = sample(WindowState::Normal).frame(desktop);
        assert_eq!(
            normal,
            FloatRect {
                x: -3,
                y: 4,
                width: 20,
                height: 8
            }
        );
        let maximized = sample(WindowState::Maximized).frame(desktop);
        assert_eq!(maximized, FloatRect::from_rect(desktop));
    }

    #[test]
    fn float_rect_contains_handles_signed_origin() {
        let rect = FloatRect {
            x: -2,
            y: 0,
            width: 4,
            height: 2,
        };
        assert!(rect.contains(0, 0));
        assert!(rect.contains(1, 1));
        assert!(!rect.contains(2, 0));
        assert!(!rect.contains(0, 2));
    }

    #[test]
    fn window_id_display_and_label() {
        let window = sample(WindowState::Normal);
        assert_eq!(window.id().to_string(), "window-1");
        assert_eq!(window.label(), "📝 Notepad");
        assert_eq!(Point::new(5, 5) - Point::new(2, 3), Point::new(3, 2));
    }
}

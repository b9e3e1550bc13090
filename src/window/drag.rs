//! Title-bar drag tracking.
//!
//! A drag exists only between pointer-down on a title bar and the matching
//! pointer-up. It owns a [`PointerCapture`] so anything holding the capture
//! registry can tell whether a drag is routing pointer input.

use std::cell::Cell;
use std::rc::Rc;

use super::{Point, WindowId};

/// Registry of outstanding pointer captures.
#[derive(Debug, Clone, Default)]
pub struct PointerCaptures {
    held: Rc<Cell<usize>>,
}

impl PointerCaptures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> PointerCapture {
        self.held.set(self.held.get() + 1);
        PointerCapture {
            held: Rc::clone(&self.held),
        }
    }

    pub fn active(&self) -> usize {
        self.held.get()
    }
}

/// Released when dropped.
#[derive(Debug)]
pub struct PointerCapture {
    held: Rc<Cell<usize>>,
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.held.set(self.held.get().saturating_sub(1));
    }
}

#[derive(Debug)]
pub struct DragController {
    window: WindowId,
    offset: Point,
    _capture: PointerCapture,
}

impl DragController {
    /// Start dragging `window` whose top-left corner is at `origin`.
    pub fn begin(
        window: WindowId,
        pointer: Point,
        origin: Point,
        captures: &PointerCaptures,
    ) -> Self {
        Self {
            window,
            offset: pointer - origin,
            _capture: captures.acquire(),
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    /// New top-left corner for the dragged window. Never clamped.
    pub fn position_for(&self, pointer: Point) -> Point {
        pointer - self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_released_when_controller_dropped() {
        let captures = PointerCaptures::new();
        let drag = DragController::begin(
            WindowId::new(1),
            Point::new(12, 5),
            Point::new(10, 4),
            &captures,
        );
        assert_eq!(captures.active(), 1);
        assert_eq!(drag.position_for(Point::new(12, 5)), Point::new(10, 4));
        drop(drag);
        assert_eq!(captures.active(), 0);
    }

    #[test]
    fn position_keeps_grab_offset_and_allows_negative() {
        let captures = PointerCaptures::new();
        let drag = DragController::begin(
            WindowId::new(3),
            Point::new(8, 2),
            Point::new(4, 2),
            &captures,
        );
        assert_eq!(drag.position_for(Point::new(20, 9)), Point::new(16, 9));
        assert_eq!(drag.position_for(Point::new(0, 0)), Point::new(-4, 0));
        assert_eq!(drag.window(), WindowId::new(3));
    }
}

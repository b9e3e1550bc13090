use std::collections::BTreeMap;
use std::sync::Arc;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::Rect;

use super::decorator::{ClassicDecorator, HeaderAction, WindowDecorator};
use super::drag::{DragController, PointerCaptures};
use super::{ContentHandle, FloatRect, Point, Size, Window, WindowId, WindowState};
use crate::constants::{CASCADE_BASE, CASCADE_STEP, FIRST_Z_INDEX};
use crate::error::WmError;
use crate::ui::rect_contains;
use crate::taskbar::Taskbar;

/// Notification raised by a window manager transition.
///
/// Drained with [`WindowManager::take_events`] after every routed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmEvent {
    /// `id` became the active window; its content should receive keyboard input.
    Activated { id: WindowId, content: ContentHandle },
    /// No window is active any more.
    ActiveCleared,
    /// `id` was destroyed; whoever owns `content` should release it.
    Closed { id: WindowId, content: ContentHandle },
}

/// Branch taken by [`WindowManager::taskbar_click`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskbarAction {
    Restored,
    Minimized,
    Activated,
}

/// Where a routed pointer event ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// Not over any window; the caller may hand it to the desktop.
    Ignored,
    /// Chrome or drag handling used the event.
    Consumed,
    /// Belongs to the content of `id`; `event` is relative to the content area.
    Content {
        id: WindowId,
        content: ContentHandle,
        event: MouseEvent,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub id: WindowId,
    pub label: String,
    pub highlighted: bool,
}

/// One window to draw, in back-to-front order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDraw {
    pub id: WindowId,
    pub content: ContentHandle,
    pub label: String,
    pub frame: FloatRect,
    pub focused: bool,
}

/// Cascade placement for new windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub base: Point,
    pub step: i32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            base: CASCADE_BASE,
            step: CASCADE_STEP,
        }
    }
}

#[derive(Debug)]
pub struct WindowManager {
    registry: BTreeMap<WindowId, Window>,
    taskbar: Taskbar,
    next_id: u64,
    z_counter: u64,
    active: Option<WindowId>,
    drag: Option<DragController>,
    captures: PointerCaptures,
    events: Vec<WmEvent>,
    desktop: Rect,
    placement: Placement,
    decorator: Arc<dyn WindowDecorator>,
}

impl WindowManager {
    pub fn new(desktop: Rect) -> Self {
        Self {
            registry: BTreeMap::new(),
            taskbar: Taskbar::new(),
            next_id: 1,
            z_counter: FIRST_Z_INDEX,
            active: None,
            drag: None,
            captures: PointerCaptures::new(),
            events: Vec::new(),
            desktop,
            placement: Placement::default(),
            decorator: Arc::new(ClassicDecorator),
        }
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn set_desktop_area(&mut self, area: Rect) {
        self.desktop = area;
    }

    pub fn desktop_area(&self) -> Rect {
        self.desktop
    }

    pub fn decorator(&self) -> Arc<dyn WindowDecorator> {
        Arc::clone(&self.decorator)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.registry.get(&id)
    }

    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.registry.values()
    }

    pub fn active(&self) -> Option<WindowId> {
        self.active
    }

    pub fn z_counter(&self) -> u64 {
        self.z_counter
    }

    pub fn taskbar(&self) -> &Taskbar {
        &self.taskbar
    }

    pub fn taskbar_mut(&mut self) -> &mut Taskbar {
        &mut self.taskbar
    }

    pub fn dragging(&self) -> Option<WindowId> {
        self.drag.as_ref().map(DragController::window)
    }

    pub fn active_pointer_captures(&self) -> usize {
        self.captures.active()
    }

    pub fn take_events(&mut self) -> Vec<WmEvent> {
        std::mem::take(&mut self.events)
    }

    fn next_z(&mut self) -> u64 {
        self.z_counter += 1;
        self.z_counter
    }

    fn get_mut(&mut self, id: WindowId) -> Result<&mut Window, WmError> {
        self.registry.get_mut(&id).ok_or_else(|| {
            tracing::warn!(window_id = %id, "request for unknown window");
            WmError::UnknownWindow(id)
        })
    }

    fn get_unminimized_mut(&mut self, id: WindowId) -> Result<&mut Window, WmError> {
        let window = self.get_mut(id)?;
        if window.is_minimized() {
            tracing::warn!(window_id = %id, "request rejected for minimized window");
            return Err(WmError::Minimized(id));
        }
        Ok(window)
    }

    /// Register a new window and make it active.
    pub fn create(
        &mut self,
        title: impl Into<String>,
        icon: impl Into<String>,
        content: ContentHandle,
        size: Size,
    ) -> WindowId {
        let id = WindowId::new(self.next_id);
        self.next_id += 1;
        let slot = self.registry.len() as i32 * self.placement.step;
        let position = Point::new(self.placement.base.x + slot, self.placement.base.y + slot);
        let z_index = self.next_z();
        let window = Window::new(
            id,
            title.into(),
            icon.into(),
            content,
            position,
            size,
            z_index,
        );
        self.taskbar.add_button(id, window.label());
        tracing::debug!(window_id = %id, title = window.title(), z_index, "opened window");
        self.registry.insert(id, window);
        if let Err(err) = self.activate(id) {
            tracing::debug!(%err, "new window not activated");
        }
        id
    }

    /// Bring `id` to the front and give it focus, restoring it if minimized.
    pub fn activate(&mut self, id: WindowId) -> Result<(), WmError> {
        if !self.registry.contains_key(&id) {
            tracing::warn!(window_id = %id, "activate requested for unknown window");
            return Err(WmError::UnknownWindow(id));
        }
        let z_index = self.next_z();
        let window = self.get_mut(id)?;
        if window.state == WindowState::Minimized {
            window.state = WindowState::Normal;
        }
        window.z_index = z_index;
        let content = window.content;
        if self.active != Some(id) {
            self.active = Some(id);
            self.events.push(WmEvent::Activated { id, content });
        }
        tracing::debug!(window_id = %id, z_index, "activated window");
        Ok(())
    }

    pub fn minimize(&mut self, id: WindowId) -> Result<(), WmError> {
        let window = self.get_unminimized_mut(id)?;
        window.state = WindowState::Minimized;
        tracing::debug!(window_id = %id, "minimized window");
        if self.dragging() == Some(id) {
            self.cancel_drag();
        }
        if self.active == Some(id) {
            self.active = None;
            self.activate_fallback();
        }
        Ok(())
    }

    pub fn toggle_maximize(&mut self, id: WindowId) -> Result<(), WmError> {
        let window = self.get_unminimized_mut(id)?;
        window.state = match window.state {
            WindowState::Maximized => WindowState::Normal,
            _ => WindowState::Maximized,
        };
        let state = window.state;
        tracing::debug!(window_id = %id, ?state, "toggled maximize");
        if state == WindowState::Maximized && self.dragging() == Some(id) {
            self.cancel_drag();
        }
        Ok(())
    }

    pub fn close(&mut self, id: WindowId) -> Result<(), WmError> {
        let Some(window) = self.registry.remove(&id) else {
            tracing::warn!(window_id = %id, "close requested for unknown window");
            return Err(WmError::UnknownWindow(id));
        };
        self.taskbar.remove_button(id);
        if self.dragging() == Some(id) {
            self.cancel_drag();
        }
        tracing::debug!(window_id = %id, "closed window");
        self.events.push(WmEvent::Closed {
            id,
            content: window.content,
        });
        if self.active == Some(id) {
            self.active = None;
            self.activate_fallback();
        }
        Ok(())
    }

    /// Taskbar button semantics: restore, minimize, or bring forward.
    pub fn taskbar_click(&mut self, id: WindowId) -> Result<TaskbarAction, WmError> {
        let window = self.get_mut(id)?;
        if window.is_minimized() {
            self.activate(id)?;
            Ok(TaskbarAction::Restored)
        } else if self.active == Some(id) {
            self.minimize(id)?;
            Ok(TaskbarAction::Minimized)
        } else {
            self.activate(id)?;
            Ok(TaskbarAction::Activated)
        }
    }

    fn activate_fallback(&mut self) {
        let next = self
            .registry
            .values()
            .filter(|w| !w.is_minimized())
            .max_by_key(|w| w.z_index)
            .map(Window::id);
        match next {
            Some(next) => {
                if let Err(err) = self.activate(next) {
                    tracing::debug!(%err, "fallback activation failed");
                }
            }
            None => {
                tracing::debug!("no window left to activate");
                self.events.push(WmEvent::ActiveCleared);
            }
        }
    }

    /// Drop any drag in progress, releasing its pointer capture.
    pub fn cancel_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            tracing::debug!(window_id = %drag.window(), "drag cancelled");
        }
    }

    /// Topmost visible window whose frame contains the cell.
    pub fn window_at(&self, column: u16, row: u16) -> Option<WindowId> {
        if !rect_contains(self.desktop, column, row) {
            return None;
        }
        self.registry
            .values()
            .filter(|w| !w.is_minimized() && w.frame(self.desktop).contains(column, row))
            .max_by_key(|w| w.z_index)
            .map(Window::id)
    }

    /// Route a pointer event through drag handling, chrome and hit-testing.
    pub fn handle_pointer(&mut self, mouse: &MouseEvent) -> PointerOutcome {
        let pointer = Point::from_cell(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Drag(_) | MouseEventKind::Moved if self.drag.is_some() => {
                if let Some(drag) = self.drag.as_ref()
                    && let Some(window) = self.registry.get_mut(&drag.window())
                {
                    window.position = drag.position_for(pointer);
                }
                return PointerOutcome::Consumed;
            }
            MouseEventKind::Up(_) if self.drag.is_some() => {
                if let Some(drag) = self.drag.take() {
                    tracing::debug!(window_id = %drag.window(), "drag finished");
                }
                return PointerOutcome::Consumed;
            }
            _ => {}
        }

        let Some(id) = self.window_at(mouse.column, mouse.row) else {
            return PointerOutcome::Ignored;
        };
        if let MouseEventKind::Down(button) = mouse.kind {
            if let Err(err) = self.activate(id) {
                tracing::debug!(%err, "pointer activation failed");
            }
            if let Some(outcome) = self.handle_header_down(id, button, mouse, pointer) {
                return outcome;
            }
        }
        self.content_outcome(id, mouse)
    }

    fn handle_header_down(
        &mut self,
        id: WindowId,
        button: MouseButton,
        mouse: &MouseEvent,
        pointer: Point,
    ) -> Option<PointerOutcome> {
        let window = self.registry.get(&id)?;
        let frame = window.frame(self.desktop);
        let (state, origin) = (window.state, window.position);
        let action = self.decorator.hit_test(frame, mouse.column, mouse.row);
        if action == HeaderAction::None {
            return None;
        }
        if button != MouseButton::Left {
            return Some(PointerOutcome::Consumed);
        }
        let result = match action {
            HeaderAction::Minimize => self.minimize(id),
            HeaderAction::Maximize => self.toggle_maximize(id),
            HeaderAction::Close => self.close(id),
            HeaderAction::Drag => {
                if state != WindowState::Maximized {
                    self.drag = Some(DragController::begin(id, pointer, origin, &self.captures));
                    tracing::debug!(window_id = %id, "drag started");
                }
                Ok(())
            }
            HeaderAction::None => Ok(()),
        };
        if let Err(err) = result {
            tracing::debug!(%err, ?action, "title bar action failed");
        }
        Some(PointerOutcome::Consumed)
    }

    fn content_outcome(&self, id: WindowId, mouse: &MouseEvent) -> PointerOutcome {
        let Some(window) = self.registry.get(&id) else {
            return PointerOutcome::Ignored;
        };
        let frame = window.frame(self.desktop);
        let content_x = frame.x + 1;
        let content_y = frame.y + 1;
        let content = FloatRect {
            x: content_x,
            y: content_y,
            width: frame.width.saturating_sub(2),
            height: frame.height.saturating_sub(2),
        };
        if !content.contains(mouse.column, mouse.row) {
            return PointerOutcome::Consumed;
        }
        let mut local = *mouse;
        local.column = (mouse.column as i32 - content_x) as u16;
        local.row = (mouse.row as i32 - content_y) as u16;
        PointerOutcome::Content {
            id,
            content: window.content,
            event: local,
        }
    }

    /// Taskbar buttons in creation order with their derived highlight flag.
    pub fn taskbar_entries(&self) -> Vec<TaskbarEntry> {
        self.taskbar
            .buttons()
            .iter()
            .filter_map(|button| {
                let window = self.registry.get(&button.window_id)?;
                Some(TaskbarEntry {
                    id: button.window_id,
                    label: button.label.clone(),
                    highlighted: self.active == Some(window.id) && !window.is_minimized(),
                })
            })
            .collect()
    }

    /// Visible windows back to front.
    pub fn draw_plan(&self) -> Vec<WindowDraw> {
        let mut visible: Vec<&Window> = self
            .registry
            .values()
            .filter(|w| !w.is_minimized())
            .collect();
        visible.sort_by_key(|w| w.z_index);
        visible
            .into_iter()
            .map(|w| WindowDraw {
                id: w.id,
                content: w.content,
                label: w.label(),
                frame: w.frame(self.desktop),
                focused: self.active == Some(w.id),
            })
            .collect()
    }
}

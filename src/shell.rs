//! The desktop shell: owns the window manager and everything around it,
//! routes input, and draws one frame at a time.

use std::collections::BTreeMap;
use std::time::Instant;

use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::apps::AppKind;
use crate::audio::{Audio, Sound};
use crate::clipboard::{ClipboardSink, SystemClipboard};
use crate::clock::Clock;
use crate::components::{AppContext, AppRequest, HostApp};
use crate::desktop::{ContextItem, Desktop, DesktopClick};
use crate::keybindings::{Action, KeyBindings};
use crate::start_menu::{StartHit, StartMenu};
use crate::taskbar::{Taskbar, TaskbarHit};
use crate::ui::UiFrame;
use crate::window::{ContentHandle, PointerOutcome, WindowId, WindowManager, WmEvent};

/// Window that received the last pointer-down inside its content.
#[derive(Debug, Clone, Copy)]
struct PointerOwner {
    window: WindowId,
    content: ContentHandle,
}

#[derive(Debug)]
pub struct Shell {
    wm: WindowManager,
    apps: BTreeMap<ContentHandle, Box<dyn HostApp>>,
    next_content: u64,
    focused: Option<ContentHandle>,
    pointer_owner: Option<PointerOwner>,
    start_menu: StartMenu,
    desktop: Desktop,
    clock: Clock,
    audio: Audio,
    keybindings: KeyBindings,
    clipboard: Box<dyn ClipboardSink>,
    screen: Rect,
    quit: bool,
}

impl Shell {
    pub fn new(screen: Rect, audio: Audio) -> Self {
        let mut shell = Self {
            wm: WindowManager::new(screen),
            apps: BTreeMap::new(),
            next_content: 1,
            focused: None,
            pointer_owner: None,
            start_menu: StartMenu::new(),
            desktop: Desktop::new(),
            clock: Clock::new(),
            audio,
            keybindings: KeyBindings::default(),
            clipboard: Box::new(SystemClipboard),
            screen,
            quit: false,
        };
        shell.resize(screen);
        shell
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSink>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_start_menu(mut self, start_menu: StartMenu) -> Self {
        self.start_menu = start_menu;
        self
    }

    /// Startup chime, then any applications requested on the command line.
    pub fn boot(&mut self, open: &[AppKind]) {
        tracing::info!(apps = open.len(), "desktop starting");
        self.audio.play(Sound::Startup);
        for &kind in open {
            self.open_application(kind);
        }
    }

    pub fn resize(&mut self, screen: Rect) {
        self.screen = screen;
        let (desktop, _) = self.wm.taskbar_mut().split_area(screen);
        self.wm.set_desktop_area(desktop);
    }

    pub fn window_manager(&self) -> &WindowManager {
        &self.wm
    }

    pub fn window_manager_mut(&mut self) -> &mut WindowManager {
        &mut self.wm
    }

    pub fn start_menu(&self) -> &StartMenu {
        &self.start_menu
    }

    pub fn desktop(&self) -> &Desktop {
        &self.desktop
    }

    pub fn taskbar(&self) -> &Taskbar {
        self.wm.taskbar()
    }

    /// Content currently receiving keyboard input.
    pub fn focused_content(&self) -> Option<ContentHandle> {
        self.focused
    }

    pub fn app_count(&self) -> usize {
        self.apps.len()
    }

    pub fn has_app(&self, content: ContentHandle) -> bool {
        self.apps.contains_key(&content)
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Launch `kind` in a new, active window.
    pub fn open_application(&mut self, kind: AppKind) -> WindowId {
        self.audio.play(Sound::Click);
        let content = ContentHandle::new(self.next_content);
        self.next_content += 1;
        self.apps.insert(content, kind.launch());
        let descriptor = kind.descriptor();
        let id = self
            .wm
            .create(descriptor.title, descriptor.icon, content, descriptor.size);
        tracing::info!(window_id = %id, ?kind, "launched application");
        self.apply_wm_events();
        id
    }

    pub fn toggle_start_menu(&mut self) {
        self.audio.play(Sound::Click);
        self.start_menu.toggle();
    }

    /// Route one input event. Returns true when something used it.
    pub fn handle_event(&mut self, event: &Event, now: Instant) -> bool {
        let handled = match event {
            Event::Resize(width, height) => {
                self.resize(Rect::new(0, 0, *width, *height));
                true
            }
            Event::FocusLost => {
                self.wm.cancel_drag();
                true
            }
            Event::Key(key) => self.handle_key(key, now),
            Event::Mouse(mouse) => self.handle_mouse(mouse, now),
            _ => false,
        };
        self.drain();
        handled
    }

    /// Periodic work: clock refresh and time-driven applications.
    pub fn tick(&mut self, now: Instant) {
        self.clock.tick(now);
        for app in self.apps.values_mut() {
            app.tick(now);
        }
        self.drain();
    }

    fn context(&self, content: ContentHandle, now: Instant) -> AppContext {
        AppContext::new(self.focused == Some(content), now)
    }

    fn dispatch_to(&mut self, content: ContentHandle, event: &Event, now: Instant) -> bool {
        let ctx = self.context(content, now);
        self.apps
            .get_mut(&content)
            .is_some_and(|app| app.handle_event(event, &ctx))
    }

    fn handle_key(&mut self, key: &KeyEvent, now: Instant) -> bool {
        if key.kind != KeyEventKind::Release {
            let action = self.keybindings.action_for_key(key);
            if let Some(action) = action {
                tracing::debug!(%action, "shortcut");
            }
            match action {
                Some(Action::ToggleStartMenu) => {
                    self.toggle_start_menu();
                    return true;
                }
                Some(Action::Dismiss)
                    if self.start_menu.is_open() || self.desktop.context_menu_open() =>
                {
                    self.start_menu.close();
                    self.desktop.hide_context_menu();
                    return true;
                }
                Some(Action::CloseWindow) => {
                    if let Some(id) = self.wm.active()
                        && let Err(err) = self.wm.close(id)
                    {
                        tracing::debug!(%err, "close shortcut failed");
                    }
                    return true;
                }
                Some(Action::ShutDown) => {
                    self.open_application(AppKind::ShutDown);
                    return true;
                }
                _ => {}
            }
            if self.start_menu.is_open() {
                if let Some(kind) = self.start_menu.handle_key(key) {
                    self.start_menu.close();
                    self.open_application(kind);
                }
                return true;
            }
        }
        let Some(content) = self.focused else {
            return false;
        };
        self.dispatch_to(content, &Event::Key(*key), now)
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, now: Instant) -> bool {
        let (column, row) = (mouse.column, mouse.row);
        let left_down = mouse.kind == MouseEventKind::Down(MouseButton::Left);

        if self.wm.dragging().is_some() {
            self.wm.handle_pointer(mouse);
            return true;
        }

        if mouse.kind == MouseEventKind::Moved && self.start_menu.is_open() {
            self.start_menu.hover(column, row);
        }

        if left_down && self.desktop.context_menu_open() {
            let item = self.desktop.context_hit(column, row);
            self.desktop.hide_context_menu();
            if let Some(item) = item {
                self.run_context_item(item);
                return true;
            }
        }

        if matches!(mouse.kind, MouseEventKind::Down(_)) && self.start_menu.is_open() {
            match self.start_menu.hit_test(column, row) {
                Some(StartHit::Item(kind)) => {
                    if left_down {
                        self.start_menu.close();
                        self.open_application(kind);
                    }
                    return true;
                }
                Some(StartHit::Inside) => return true,
                None => {
                    let on_start = self.wm.taskbar().hit_test(column, row) == Some(TaskbarHit::Start);
                    if !on_start {
                        self.start_menu.close();
                    }
                }
            }
        }

        if let Some(hit) = self.wm.taskbar().hit_test(column, row) {
            if left_down {
                match hit {
                    TaskbarHit::Start => self.toggle_start_menu(),
                    TaskbarHit::Window(id) => {
                        if let Err(err) = self.wm.taskbar_click(id) {
                            tracing::debug!(%err, "taskbar click failed");
                        }
                    }
                    TaskbarHit::Tray | TaskbarHit::Empty => {}
                }
            }
            self.release_pointer_owner(mouse, now, None);
            return true;
        }

        match self.wm.handle_pointer(mouse) {
            PointerOutcome::Content { id, content, event } => {
                if matches!(mouse.kind, MouseEventKind::Down(_)) {
                    self.pointer_owner = Some(PointerOwner {
                        window: id,
                        content,
                    });
                }
                let used = self.dispatch_to(content, &Event::Mouse(event), now);
                self.release_pointer_owner(mouse, now, Some(content));
                used
            }
            PointerOutcome::Consumed => {
                self.release_pointer_owner(mouse, now, None);
                true
            }
            PointerOutcome::Ignored => {
                self.release_pointer_owner(mouse, now, None);
                self.handle_desktop_pointer(mouse, now)
            }
        }
    }

    /// A release outside the window that saw the press still ends its gesture.
    fn release_pointer_owner(
        &mut self,
        mouse: &MouseEvent,
        now: Instant,
        delivered_to: Option<ContentHandle>,
    ) {
        if !matches!(mouse.kind, MouseEventKind::Up(_)) {
            return;
        }
        let Some(owner) = self.pointer_owner.take() else {
            return;
        };
        if delivered_to == Some(owner.content) {
            return;
        }
        let Some(window) = self.wm.window(owner.window) else {
            return;
        };
        let frame = window.frame(self.wm.desktop_area());
        let mut local = *mouse;
        local.column = (i32::from(mouse.column) - frame.x - 1).max(0) as u16;
        local.row = (i32::from(mouse.row) - frame.y - 1).max(0) as u16;
        self.dispatch_to(owner.content, &Event::Mouse(local), now);
    }

    fn handle_desktop_pointer(&mut self, mouse: &MouseEvent, now: Instant) -> bool {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                match self.desktop.click(mouse.column, mouse.row, now) {
                    DesktopClick::Launch(kind) => {
                        self.open_application(kind);
                    }
                    DesktopClick::Selected(_) => {}
                    DesktopClick::Blank => self.start_menu.close(),
                }
                true
            }
            MouseEventKind::Down(MouseButton::Right) => {
                self.desktop
                    .open_context_menu(mouse.column, mouse.row);
                true
            }
            _ => false,
        }
    }

    fn run_context_item(&mut self, item: ContextItem) {
        tracing::debug!(?item, "desktop context menu");
        match item {
            ContextItem::Refresh => self.desktop.deselect_all(),
            ContextItem::Properties => {
                self.open_application(AppKind::NotImplemented("Properties"));
            }
        }
    }

    fn apply_wm_events(&mut self) {
        for event in self.wm.take_events() {
            match event {
                WmEvent::Activated { id, content } => {
                    tracing::debug!(window_id = %id, "keyboard focus moved");
                    self.focused = Some(content);
                }
                WmEvent::ActiveCleared => self.focused = None,
                WmEvent::Closed { id, content } => {
                    if let Some(mut app) = self.apps.remove(&content) {
                        app.release();
                    }
                    if self.focused == Some(content) {
                        self.focused = None;
                    }
                    if self.pointer_owner.is_some_and(|o| o.window == id) {
                        self.pointer_owner = None;
                    }
                }
            }
        }
    }

    /// Settle window manager notifications and application requests.
    fn drain(&mut self) {
        loop {
            self.apply_wm_events();
            let mut requests = Vec::new();
            for (&content, app) in self.apps.iter_mut() {
                requests.extend(app.take_requests().into_iter().map(|r| (content, r)));
            }
            if requests.is_empty() {
                break;
            }
            for (content, request) in requests {
                self.apply_request(content, request);
            }
        }
    }

    fn apply_request(&mut self, content: ContentHandle, request: AppRequest) {
        match request {
            AppRequest::CloseSelf => {
                let id = self
                    .wm
                    .windows()
                    .find(|w| w.content() == content)
                    .map(|w| w.id());
                if let Some(id) = id
                    && let Err(err) = self.wm.close(id)
                {
                    tracing::debug!(%err, "close request failed");
                }
            }
            AppRequest::Open(kind) => {
                self.open_application(kind);
            }
            AppRequest::PlaySound(sound) => self.audio.play(sound),
            AppRequest::Copy(text) => {
                if let Err(err) = self.clipboard.set_text(&text) {
                    tracing::warn!(%err, "copy to clipboard failed");
                    self.audio.play(Sound::Error);
                }
            }
            AppRequest::ShutDown => {
                tracing::info!("shutdown requested");
                self.quit = true;
            }
        }
    }

    /// Draw the desktop, windows back to front, taskbar and menus.
    pub fn render(&mut self, frame: &mut UiFrame<'_>, now: Instant) {
        if frame.area() != self.screen {
            self.resize(frame.area());
        }
        let desktop_area = self.wm.desktop_area();
        {
            let mut desktop_frame = UiFrame::from_parts(desktop_area, frame.buffer_mut());
            self.desktop.render(&mut desktop_frame, desktop_area);
            self.render_windows(&mut desktop_frame, now);
            self.desktop.render_context_menu(&mut desktop_frame, desktop_area);
        }

        let entries = self.wm.taskbar_entries();
        let start_open = self.start_menu.is_open();
        self.wm
            .taskbar_mut()
            .render(frame, &entries, self.clock.text(), start_open);
        if let Some(anchor) = self.wm.taskbar().start_rect() {
            self.start_menu.render(frame, anchor, self.screen);
        }
    }

    fn render_windows(&mut self, frame: &mut UiFrame<'_>, now: Instant) {
        let decorator = self.wm.decorator();
        for draw in self.wm.draw_plan() {
            if draw.frame.width == 0 || draw.frame.height == 0 {
                continue;
            }
            let local = Rect::new(0, 0, draw.frame.width, draw.frame.height);
            let mut surface = Buffer::empty(local);
            decorator.render_window(&mut surface, local, &draw.label, draw.focused);
            let content_area = decorator.content_rect(local);
            let ctx = AppContext::new(draw.focused, now);
            if let Some(app) = self.apps.get_mut(&draw.content) {
                let mut content_frame = UiFrame::from_parts(content_area, &mut surface);
                app.render(&mut content_frame, content_area, &ctx);
            }
            frame.blit_from_signed(&surface, draw.frame);
        }
    }
}

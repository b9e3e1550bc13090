//! A retro desktop shell for the terminal.
//!
//! [`window::WindowManager`] owns every window and the taskbar mirror;
//! [`shell::Shell`] wraps it with the desktop, start menu, clock, sound and
//! the hosted applications, and [`runner::run_shell`] drives it from a
//! terminal.

pub mod apps;
pub mod audio;
pub mod clipboard;
pub mod clock;
pub mod component_context;
pub mod components;
pub mod config;
pub mod constants;
pub mod desktop;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod keybindings;
pub mod runner;
pub mod shell;
pub mod start_menu;
pub mod taskbar;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;

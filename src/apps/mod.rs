//! Applications hosted inside desktop windows.

mod calculator;
mod cps_tester;
mod dialog;
mod explorer;
mod minesweeper;
mod notepad;
mod paint;
pub(crate) mod widgets;

pub use calculator::Calculator;
pub use cps_tester::{CpsTester, Rank};
pub use dialog::{Dialog, DialogKind};
pub use explorer::{MyComputer, RecycleBin};
pub use minesweeper::Minesweeper;
pub use notepad::Notepad;
pub use paint::Paint;

use crate::components::HostApp;
use crate::window::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppKind {
    MyComputer,
    RecycleBin,
    Notepad,
    Calculator,
    Paint,
    Minesweeper,
    CpsTester,
    CalculatorHelp,
    /// Notice for a menu entry that has no application behind it.
    NotImplemented(&'static str),
    ShutDown,
}

/// Window metadata for an application kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppDescriptor {
    pub title: &'static str,
    pub icon: &'static str,
    pub size: Size,
}

impl AppKind {
    /// Applications with an icon on the desktop, top to bottom.
    pub const DESKTOP: [AppKind; 7] = [
        AppKind::MyComputer,
        AppKind::RecycleBin,
        AppKind::Notepad,
        AppKind::Calculator,
        AppKind::Paint,
        AppKind::Minesweeper,
        AppKind::CpsTester,
    ];

    pub fn descriptor(self) -> AppDescriptor {
        let (title, icon, width, height) = match self {
            AppKind::MyComputer => ("My Computer", "💻", 56, 14),
            AppKind::RecycleBin => ("Recycle Bin", "🗑", 40, 10),
            AppKind::Notepad => ("Notepad", "📝", 50, 16),
            AppKind::Calculator => ("Calculator", "🧮", 38, 18),
            AppKind::Paint => ("Paint", "🎨", 60, 20),
            AppKind::Minesweeper => ("Minesweeper", "💣", 33, 16),
            AppKind::CpsTester => ("CPS Tester", "⚡", 40, 18),
            AppKind::CalculatorHelp => ("Calculator Help", "❓", 46, 21),
            AppKind::NotImplemented(_) => ("Notice", "⚠", 40, 9),
            AppKind::ShutDown => ("Shut Down", "🔌", 40, 9),
        };
        AppDescriptor {
            title,
            icon,
            size: Size::new(width, height),
        }
    }

    /// Construct a fresh instance of the application.
    pub fn launch(self) -> Box<dyn HostApp> {
        match self {
            AppKind::MyComputer => Box::new(MyComputer::new()),
            AppKind::RecycleBin => Box::new(RecycleBin::new()),
            AppKind::Notepad => Box::new(Notepad::new()),
            AppKind::Calculator => Box::new(Calculator::new()),
            AppKind::Paint => Box::new(Paint::new()),
            AppKind::Minesweeper => Box::new(Minesweeper::new()),
            AppKind::CpsTester => Box::new(CpsTester::new()),
            AppKind::CalculatorHelp => Box::new(Dialog::new(DialogKind::CalculatorHelp)),
            AppKind::NotImplemented(feature) => {
                Box::new(Dialog::new(DialogKind::NotImplemented(feature)))
            }
            AppKind::ShutDown => Box::new(Dialog::new(DialogKind::ShutDown)),
        }
    }
}

//! Shared crate-wide constants.

use std::time::Duration;

use crate::window::Point;

/// Top-left corner of the first window opened on an empty desktop.
pub const CASCADE_BASE: Point = Point::new(4, 2);

/// Offset applied per already-open window, on both axes, when placing a new one.
pub const CASCADE_STEP: i32 = 2;

/// Starting value of the stacking counter. The first window opened receives
/// the next value.
pub const FIRST_Z_INDEX: u64 = 100;

/// Maximum gap between two clicks on the same desktop icon for them to count
/// as a double-click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(500);

/// How often the taskbar clock is refreshed.
pub const CLOCK_REFRESH: Duration = Duration::from_secs(1);

/// Input poll interval used when none is configured.
pub const DEFAULT_POLL_MS: u64 = 16;

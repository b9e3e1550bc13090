//! Clicks-per-second tester.
//!
//! Idle until the start button is pressed, then counts every left click in
//! the content area until the chosen duration elapses. The result stays on
//! screen for [`RESULT_HOLD`] before the tester returns to idle.

use std::time::{Duration, Instant};

use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::widgets::{HitMap, button, centered};
use crate::components::{AppContext, HostApp};
use crate::theme;
use crate::ui::UiFrame;

pub const DURATIONS: [u64; 4] = [5, 10, 20, 30];
pub const DEFAULT_DURATION: u64 = 10;
pub const RESULT_HOLD: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Novice,
    Average,
    Skilled,
    Expert,
    Pro,
    Godlike,
}

impl Rank {
    pub fn for_cps(cps: f64) -> Self {
        match cps {
            c if c < 4.0 => Rank::Novice,
            c if c < 6.0 => Rank::Average,
            c if c < 8.0 => Rank::Skilled,
            c if c < 10.0 => Rank::Expert,
            c if c < 12.0 => Rank::Pro,
            _ => Rank::Godlike,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Rank::Novice => "Novice",
            Rank::Average => "Average",
            Rank::Skilled => "Skilled",
            Rank::Expert => "Expert",
            Rank::Pro => "Pro",
            Rank::Godlike => "Godlike",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    Testing { started: Instant, clicks: u32 },
    Finished { clicks: u32, cps: f64, at: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Duration(u64),
    Start,
}

#[derive(Debug)]
pub struct CpsTester {
    duration: u64,
    phase: Phase,
    /// Most recent clock reading, for the live counter.
    now: Option<Instant>,
    hits: HitMap<Target>,
}

impl Default for CpsTester {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            phase: Phase::Idle,
            now: None,
            hits: HitMap::default(),
        }
    }
}

impl CpsTester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Ignored unless idle.
    pub fn set_duration(&mut self, seconds: u64) {
        if self.phase == Phase::Idle && DURATIONS.contains(&seconds) {
            self.duration = seconds;
        }
    }

    pub fn start(&mut self, now: Instant) {
        if self.phase == Phase::Idle {
            tracing::debug!(duration = self.duration, "cps test started");
            self.phase = Phase::Testing {
                started: now,
                clicks: 0,
            };
        }
    }

    pub fn click(&mut self, now: Instant) {
        self.advance(now);
        if let Phase::Testing { clicks, .. } = &mut self.phase {
            *clicks += 1;
        }
    }

    /// Clicks per second so far, or the final score.
    pub fn cps(&self, now: Instant) -> f64 {
        match self.phase {
            Phase::Idle => 0.0,
            Phase::Testing { started, clicks } => {
                let elapsed = now.saturating_duration_since(started).as_secs_f64();
                if elapsed > 0.0 {
                    f64::from(clicks) / elapsed
                } else {
                    0.0
                }
            }
            Phase::Finished { cps, .. } => cps,
        }
    }

    fn advance(&mut self, now: Instant) {
        self.now = Some(now);
        let limit = Duration::from_secs(self.duration);
        match self.phase {
            Phase::Testing { started, clicks } if now.saturating_duration_since(started) >= limit => {
                let cps = f64::from(clicks) / limit.as_secs_f64();
                tracing::debug!(clicks, cps, "cps test finished");
                self.phase = Phase::Finished {
                    clicks,
                    cps,
                    at: now,
                };
            }
            Phase::Finished { at, .. } if now.saturating_duration_since(at) >= RESULT_HOLD => {
                self.phase = Phase::Idle;
            }
            _ => {}
        }
    }

    fn remaining(&self, now: Instant) -> u64 {
        match self.phase {
            Phase::Testing { started, .. } => {
                let elapsed = now.saturating_duration_since(started).as_secs();
                self.duration.saturating_sub(elapsed)
            }
            Phase::Idle => self.duration,
            Phase::Finished { .. } => 0,
        }
    }
}

impl HostApp for CpsTester {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &AppContext) {
        self.hits.clear();
        let now = self.now.unwrap_or(ctx.now());
        let base = Style::default()
            .bg(theme::window_bg())
            .fg(theme::window_fg());
        frame.fill(area, base);
        centered(frame, area, 0, "CPS Tester", base.add_modifier(Modifier::BOLD));

        let mut x = area.width.saturating_sub(DURATIONS.len() as u16 * 6) / 2;
        for seconds in DURATIONS {
            let local = Rect::new(x, 2, 5, 1);
            let mut style = Style::default()
                .bg(theme::button_bg())
                .fg(theme::button_fg());
            if seconds == self.duration {
                style = style.add_modifier(Modifier::REVERSED);
            }
            button(frame, area, local, &format!("{seconds}s"), style);
            self.hits.push(local, Target::Duration(seconds));
            x += 6;
        }

        let clicks = match self.phase {
            Phase::Idle => 0,
            Phase::Testing { clicks, .. } | Phase::Finished { clicks, .. } => clicks,
        };
        centered(frame, area, 4, &format!("Time: {}s", self.remaining(now)), base);
        centered(frame, area, 5, &format!("Clicks: {clicks}"), base);
        centered(frame, area, 6, &format!("CPS: {:.2}", self.cps(now)), base);

        let (prompt, show_start) = match self.phase {
            Phase::Idle => ("Press start, then click as fast as you can", true),
            Phase::Testing { .. } => ("Click anywhere!", false),
            Phase::Finished { .. } => ("Time's up!", false),
        };
        centered(frame, area, 8, prompt, base);
        if let Phase::Finished { cps, .. } = self.phase {
            let rank = format!("Rank: {}", Rank::for_cps(cps).name());
            centered(frame, area, 9, &rank, base.add_modifier(Modifier::BOLD));
        }
        if show_start {
            let local = Rect::new(area.width.saturating_sub(11) / 2, 11, 11, 1);
            let style = Style::default()
                .bg(theme::button_bg())
                .fg(theme::button_accent_fg())
                .add_modifier(Modifier::BOLD);
            button(frame, area, local, "Start", style);
            self.hits.push(local, Target::Start);
        }
    }

    fn handle_event(&mut self, event: &Event, ctx: &AppContext) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return false;
        }
        let now = ctx.now();
        self.advance(now);
        match self.phase {
            Phase::Testing { .. } => self.click(now),
            Phase::Idle => match self.hits.at(mouse.column, mouse.row) {
                Some(Target::Duration(seconds)) => self.set_duration(seconds),
                Some(Target::Start) => self.start(now),
                None => return false,
            },
            Phase::Finished { .. } => return false,
        }
        true
    }

    fn tick(&mut self, now: Instant) {
        self.advance(now);
    }
}

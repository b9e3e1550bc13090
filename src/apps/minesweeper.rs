use std::time::{SystemTime, UNIX_EPOCH};

use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use super::widgets::{button, centered, label};
use crate::audio::Sound;
use crate::components::{AppContext, AppRequest, HostApp};
use crate::theme;
use crate::ui::{UiFrame, rect_contains};

pub const BOARD_SIZE: usize = 9;
pub const MINE_COUNT: usize = 10;
const CELL_WIDTH: u16 = 3;
const BOARD_LEFT: u16 = 2;
const BOARD_TOP: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    mine: bool,
    revealed: bool,
    flagged: bool,
    adjacent: u8,
}

/// splitmix64; enough to scatter ten mines.
#[derive(Debug, Clone)]
struct SplitMix(u64);

impl SplitMix {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

#[derive(Debug)]
pub struct Minesweeper {
    rng: SplitMix,
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    state: GameState,
    face_rect: Rect,
    requests: Vec<AppRequest>,
}

impl Default for Minesweeper {
    fn default() -> Self {
        Self::new()
    }
}

impl Minesweeper {
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5EED);
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut game = Self {
            rng: SplitMix(seed),
            cells: [[Cell::default(); BOARD_SIZE]; BOARD_SIZE],
            state: GameState::Playing,
            face_rect: Rect::default(),
            requests: Vec::new(),
        };
        game.restart();
        game
    }

    /// Fresh board with newly scattered mines.
    pub fn restart(&mut self) {
        let mut mines = Vec::with_capacity(MINE_COUNT);
        while mines.len() < MINE_COUNT {
            let index = (self.rng.next() % (BOARD_SIZE * BOARD_SIZE) as u64) as usize;
            let pos = (index % BOARD_SIZE, index / BOARD_SIZE);
            if !mines.contains(&pos) {
                mines.push(pos);
            }
        }
        self.lay_mines(&mines);
    }

    fn lay_mines(&mut self, mines: &[(usize, usize)]) {
        self.cells = [[Cell::default(); BOARD_SIZE]; BOARD_SIZE];
        self.state = GameState::Playing;
        for &(x, y) in mines {
            self.cells[y][x].mine = true;
        }
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let adjacent = neighbours(x, y)
                    .filter(|&(nx, ny)| self.cells[ny][nx].mine)
                    .count();
                self.cells[y][x].adjacent = adjacent as u8;
            }
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_mine(&self, x: usize, y: usize) -> bool {
        self.cells[y][x].mine
    }

    pub fn is_revealed(&self, x: usize, y: usize) -> bool {
        self.cells[y][x].revealed
    }

    pub fn is_flagged(&self, x: usize, y: usize) -> bool {
        self.cells[y][x].flagged
    }

    pub fn flags_left(&self) -> i32 {
        let flags = self.cells.iter().flatten().filter(|c| c.flagged).count();
        MINE_COUNT as i32 - flags as i32
    }

    pub fn reveal(&mut self, x: usize, y: usize) {
        if self.state != GameState::Playing {
            return;
        }
        let cell = self.cells[y][x];
        if cell.revealed || cell.flagged {
            return;
        }
        if cell.mine {
            self.state = GameState::Lost;
            for cell in self.cells.iter_mut().flatten().filter(|c| c.mine) {
                cell.revealed = true;
            }
            self.requests.push(AppRequest::PlaySound(Sound::Error));
            return;
        }

        let mut pending = vec![(x, y)];
        while let Some((cx, cy)) = pending.pop() {
            let cell = &mut self.cells[cy][cx];
            if cell.revealed || cell.flagged || cell.mine {
                continue;
            }
            cell.revealed = true;
            if cell.adjacent == 0 {
                pending.extend(neighbours(cx, cy));
            }
        }

        let hidden_safe = self
            .cells
            .iter()
            .flatten()
            .any(|c| !c.mine && !c.revealed);
        if !hidden_safe {
            self.state = GameState::Won;
        }
    }

    pub fn toggle_flag(&mut self, x: usize, y: usize) {
        if self.state != GameState::Playing {
            return;
        }
        let cell = &mut self.cells[y][x];
        if !cell.revealed {
            cell.flagged = !cell.flagged;
        }
    }

    fn face(&self) -> &'static str {
        match self.state {
            GameState::Playing => "(:",
            GameState::Won => "B)",
            GameState::Lost => "X(",
        }
    }

    fn cell_at(column: u16, row: u16) -> Option<(usize, usize)> {
        let x = column.checked_sub(BOARD_LEFT)? / CELL_WIDTH;
        let y = row.checked_sub(BOARD_TOP)?;
        (usize::from(x) < BOARD_SIZE && usize::from(y) < BOARD_SIZE)
            .then_some((usize::from(x), usize::from(y)))
    }

    fn cell_glyph(&self, cell: Cell) -> (String, Style) {
        let hidden = Style::default()
            .bg(theme::button_bg())
            .fg(theme::button_fg());
        let open = Style::default()
            .bg(theme::button_pressed_bg())
            .fg(theme::window_fg());
        if cell.flagged && !cell.revealed {
            return (" ⚑ ".into(), hidden.fg(Color::Red));
        }
        if !cell.revealed {
            return (" ■ ".into(), hidden);
        }
        if cell.mine {
            return (" * ".into(), open.bg(Color::Red).add_modifier(Modifier::BOLD));
        }
        match cell.adjacent {
            0 => ("   ".into(), open),
            n => {
                let fg = match n {
                    1 => Color::Blue,
                    2 => Color::Green,
                    3 => Color::Red,
                    _ => Color::Magenta,
                };
                (format!(" {n} "), open.fg(fg).add_modifier(Modifier::BOLD))
            }
        }
    }

    #[cfg(test)]
    fn with_mines(mines: &[(usize, usize)]) -> Self {
        let mut game = Self::with_seed(0);
        game.lay_mines(mines);
        game
    }
}

fn neighbours(x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> {
    let xs = x.saturating_sub(1)..=(x + 1).min(BOARD_SIZE - 1);
    xs.flat_map(move |nx| {
        (y.saturating_sub(1)..=(y + 1).min(BOARD_SIZE - 1)).map(move |ny| (nx, ny))
    })
    .filter(move |&pos| pos != (x, y))
}

impl HostApp for Minesweeper {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &AppContext) {
        let base = Style::default()
            .bg(theme::window_bg())
            .fg(theme::window_fg());
        frame.fill(area, base);

        let counter = Style::default().bg(Color::Black).fg(Color::Red);
        label(frame, area, BOARD_LEFT, 0, &format!("{:03}", self.flags_left()), counter);
        let face = self.face();
        let face_x = area.width.saturating_sub(4) / 2;
        self.face_rect = Rect::new(face_x, 0, 4, 1);
        button(
            frame,
            area,
            self.face_rect,
            face,
            Style::default()
                .bg(theme::button_bg())
                .fg(theme::button_fg())
                .add_modifier(Modifier::BOLD),
        );

        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let (glyph, style) = self.cell_glyph(self.cells[y][x]);
                label(
                    frame,
                    area,
                    BOARD_LEFT + x as u16 * CELL_WIDTH,
                    BOARD_TOP + y as u16,
                    &glyph,
                    style,
                );
            }
        }

        let status = match self.state {
            GameState::Playing => "",
            GameState::Won => "You win!",
            GameState::Lost => "Game over",
        };
        centered(frame, area, BOARD_TOP + BOARD_SIZE as u16 + 1, status, base);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &AppContext) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        let MouseEventKind::Down(btn) = mouse.kind else {
            return false;
        };
        if btn == MouseButton::Left && rect_contains(self.face_rect, mouse.column, mouse.row) {
            self.restart();
            return true;
        }
        let Some((x, y)) = Self::cell_at(mouse.column, mouse.row) else {
            return false;
        };
        match btn {
            MouseButton::Left => self.reveal(x, y),
            MouseButton::Right => self.toggle_flag(x, y),
            MouseButton::Middle => return false,
        }
        true
    }

    fn take_requests(&mut self) -> Vec<AppRequest> {
        std::mem::take(&mut self.requests)
    }
}

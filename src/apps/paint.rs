use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use super::widgets::{HitMap, label};
use crate::components::{AppContext, HostApp};
use crate::theme;
use crate::ui::UiFrame;

const CANVAS_TOP: u16 = 2;
const PALETTE: [Color; 8] = [
    Color::Black,
    Color::Gray,
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Brush,
    Pencil,
    Eraser,
}

impl Tool {
    const ALL: [Tool; 3] = [Tool::Brush, Tool::Pencil, Tool::Eraser];

    fn label(self) -> &'static str {
        match self {
            Tool::Brush => " Brush ",
            Tool::Pencil => " Pencil ",
            Tool::Eraser => " Eraser ",
        }
    }

    /// Horizontal reach either side of the pointer.
    fn reach(self) -> u16 {
        match self {
            Tool::Pencil => 0,
            Tool::Brush | Tool::Eraser => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Tool(Tool),
    Color(Color),
}

/// Cell grid. Resizing keeps what still fits.
#[derive(Debug, Clone, Default)]
struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Option<Color>>,
}

impl Canvas {
    fn resize(&mut self, width: u16, height: u16) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        let mut cells = vec![None; width as usize * height as usize];
        for y in 0..height.min(self.height) {
            for x in 0..width.min(self.width) {
                cells[y as usize * width as usize + x as usize] = self.get(x, y);
            }
        }
        self.width = width;
        self.height = height;
        self.cells = cells;
    }

    fn get(&self, x: u16, y: u16) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    fn set(&mut self, x: u16, y: u16, value: Option<Color>) {
        if x < self.width && y < self.height {
            self.cells[y as usize * self.width as usize + x as usize] = value;
        }
    }
}

#[derive(Debug)]
pub struct Paint {
    tool: Tool,
    color: Color,
    canvas: Canvas,
    /// Last painted cell of the stroke in progress.
    stroke: Option<(u16, u16)>,
    hits: HitMap<Target>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            tool: Tool::Brush,
            color: Color::Black,
            canvas: Canvas::default(),
            stroke: None,
            hits: HitMap::default(),
        }
    }
}

impl Paint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    /// Color at a canvas cell, `None` when blank.
    pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        self.canvas.get(x, y)
    }

    fn canvas_cell(&self, column: u16, row: u16) -> Option<(u16, u16)> {
        let y = row.checked_sub(CANVAS_TOP)?;
        (column < self.canvas.width && y < self.canvas.height).then_some((column, y))
    }

    fn dab(&mut self, x: u16, y: u16) {
        let value = match self.tool {
            Tool::Eraser => None,
            Tool::Brush | Tool::Pencil => Some(self.color),
        };
        let reach = self.tool.reach();
        for cx in x.saturating_sub(reach)..=x.saturating_add(reach) {
            self.canvas.set(cx, y, value);
        }
    }

    /// Paint every cell on the segment from the previous stroke point.
    fn stroke_to(&mut self, to: (u16, u16)) {
        let from = self.stroke.unwrap_or(to);
        let (x0, y0) = (from.0 as i32, from.1 as i32);
        let (x1, y1) = (to.0 as i32, to.1 as i32);
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
        for i in 0..=steps {
            let x = x0 + (x1 - x0) * i / steps;
            let y = y0 + (y1 - y0) * i / steps;
            self.dab(x as u16, y as u16);
        }
        self.stroke = Some(to);
    }
}

impl HostApp for Paint {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &AppContext) {
        self.hits.clear();
        let base = Style::default()
            .bg(theme::window_bg())
            .fg(theme::window_fg());
        frame.fill(area, base);

        let mut x = 0u16;
        for tool in Tool::ALL {
            let text = tool.label();
            let width = text.chars().count() as u16;
            let style = if tool == self.tool {
                base.add_modifier(Modifier::REVERSED | Modifier::BOLD)
            } else {
                base
            };
            label(frame, area, x, 0, text, style);
            self.hits.push(Rect::new(x, 0, width, 1), Target::Tool(tool));
            x += width + 1;
        }

        x = 1;
        for color in PALETTE {
            let swatch = if color == self.color { "[]" } else { "  " };
            label(frame, area, x, 1, swatch, Style::default().bg(color).fg(Color::White));
            self.hits.push(Rect::new(x, 1, 2, 1), Target::Color(color));
            x += 3;
        }

        self.canvas
            .resize(area.width, area.height.saturating_sub(CANVAS_TOP));
        for cy in 0..self.canvas.height {
            for cx in 0..self.canvas.width {
                let bg = self.canvas.get(cx, cy).unwrap_or(theme::field_bg());
                frame.text(
                    area.x + cx,
                    area.y + CANVAS_TOP + cy,
                    " ",
                    Style::default().bg(bg),
                );
            }
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &AppContext) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(target) = self.hits.at(mouse.column, mouse.row) {
                    match target {
                        Target::Tool(tool) => self.tool = tool,
                        Target::Color(color) => self.color = color,
                    }
                    return true;
                }
                let Some(cell) = self.canvas_cell(mouse.column, mouse.row) else {
                    return false;
                };
                self.stroke = None;
                self.stroke_to(cell);
                true
            }
            MouseEventKind::Drag(MouseButton::Left) if self.stroke.is_some() => {
                if let Some(cell) = self.canvas_cell(mouse.column, mouse.row) {
                    self.stroke_to(cell);
                }
                true
            }
            MouseEventKind::Up(_) if self.stroke.is_some() => {
                self.stroke = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseEvent};
    use ratatui::buffer::Buffer;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn rendered() -> Paint {
        let mut paint = Paint::new();
        let area = Rect::new(0, 0, 30, 12);
        let mut buf = Buffer::empty(area);
        paint.render(
            &mut UiFrame::from_parts(area, &mut buf),
            area,
            &AppContext::default(),
        );
        paint
    }

    #[test]
    fn pencil_stroke_paints_a_line_until_release() {
        let mut paint = rendered();
        let ctx = AppContext::default();
        // " Brush " is 7 wide, the pencil label starts after a gap.
        assert!(paint.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 9, 0), &ctx));
        assert_eq!(paint.tool(), Tool::Pencil);

        paint.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 2, 4), &ctx);
        assert!(paint.is_drawing());
        paint.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 6, 4), &ctx);
        for x in 2..=6 {
            assert_eq!(paint.pixel(x, 2), Some(Color::Black), "x={x}");
        }
        assert_eq!(paint.pixel(7, 2), None);

        paint.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 6, 4), &ctx);
        assert!(!paint.is_drawing());
        assert!(!paint.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 6, 8), &ctx));
        assert_eq!(paint.pixel(6, 6), None);
    }

    #[test]
    fn brush_is_wider_and_eraser_clears() {
        let mut paint = rendered();
        let ctx = AppContext::default();
        paint.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 10, 5), &ctx);
        paint.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 10, 5), &ctx);
        assert_eq!(paint.pixel(9, 3), Some(Color::Black));
        assert_eq!(paint.pixel(11, 3), Some(Color::Black));

        paint.tool = Tool::Eraser;
        paint.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 10, 5), &ctx);
        assert_eq!(paint.pixel(10, 3), None);
    }

    #[test]
    fn palette_selects_color() {
        let mut paint = rendered();
        let ctx = AppContext::default();
        // third swatch
        paint.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 7, 1), &ctx);
        paint.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 0, 2), &ctx);
        assert_eq!(paint.pixel(0, 0), Some(Color::Red));
    }

    #[test]
    fn resize_keeps_overlapping_cells() {
        let mut canvas = Canvas::default();
        canvas.resize(4, 4);
        canvas.set(1, 1, Some(Color::Red));
        canvas.set(3, 3, Some(Color::Blue));
        canvas.resize(2, 2);
        assert_eq!(canvas.get(1, 1), Some(Color::Red));
        canvas.resize(4, 4);
        assert_eq!(canvas.get(3, 3), None);
    }
}

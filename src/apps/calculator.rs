use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use thiserror::Error;

use super::AppKind;
use super::widgets::{HitMap, button, label};
use crate::audio::Sound;
use crate::components::{AppContext, AppRequest, HostApp};
use crate::theme;
use crate::ui::{UiFrame, align_right};

const MAX_DISPLAY_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sqrt,
    Reciprocal,
    Percent,
    Sign,
    Sin,
    Cos,
    Tan,
    Log,
    Ln,
    Square,
    Cube,
    Pi,
    E,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemOp {
    Clear,
    Recall,
    Store,
    Add,
    Subtract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("division by zero")]
    DivideByZero,
    #[error("{0:?} is undefined for this input")]
    Domain(Func),
}

/// Calculator state machine behind the buttons and keyboard.
#[derive(Debug, Clone)]
pub struct CalcEngine {
    current: String,
    previous: Option<f64>,
    operation: Option<Op>,
    waiting_for_operand: bool,
    memory: f64,
    last_operation: Option<Op>,
    last_operand: Option<f64>,
}

impl Default for CalcEngine {
    fn default() -> Self {
        Self {
            current: "0".to_string(),
            previous: None,
            operation: None,
            waiting_for_operand: false,
            memory: 0.0,
            last_operation: None,
            last_operand: None,
        }
    }
}

impl CalcEngine {
    /// The raw value being edited or shown.
    pub fn value(&self) -> &str {
        &self.current
    }

    /// Value as it fits on the display.
    pub fn display(&self) -> String {
        fit_display(&self.current)
    }

    pub fn has_memory(&self) -> bool {
        self.memory != 0.0
    }

    fn current_number(&self) -> f64 {
        self.current.parse().unwrap_or(0.0)
    }

    fn show(&mut self, value: f64) {
        self.current = format_number(value);
        self.waiting_for_operand = true;
    }

    pub fn digit(&mut self, digit: char) {
        if self.waiting_for_operand {
            self.current = digit.to_string();
            self.waiting_for_operand = false;
        } else if self.current == "0" {
            self.current = digit.to_string();
        } else {
            self.current.push(digit);
        }
    }

    pub fn decimal(&mut self) {
        if self.waiting_for_operand {
            self.current = "0.".to_string();
            self.waiting_for_operand = false;
        } else if !self.current.contains('.') {
            self.current.push('.');
        }
    }

    pub fn operation(&mut self, next: Op) -> Result<(), CalcError> {
        let input = self.current_number();
        let mut outcome = Ok(());
        match (self.previous, self.operation) {
            (None, _) => self.previous = Some(input),
            (Some(_), Some(_)) if !self.waiting_for_operand => {
                let (result, err) = self.calculate();
                self.current = format_number(result);
                self.previous = Some(result);
                outcome = err.map_or(Ok(()), Err);
            }
            _ => {}
        }
        self.waiting_for_operand = true;
        self.operation = Some(next);
        outcome
    }

    fn calculate(&self) -> (f64, Option<CalcError>) {
        let prev = self.previous.unwrap_or(0.0);
        let current = self.current_number();
        match self.operation {
            Some(Op::Add) => (prev + current, None),
            Some(Op::Subtract) => (prev - current, None),
            Some(Op::Multiply) => (prev * current, None),
            Some(Op::Divide) if current == 0.0 => (0.0, Some(CalcError::DivideByZero)),
            Some(Op::Divide) => (prev / current, None),
            Some(Op::Power) => (prev.powf(current), None),
            None => (current, None),
        }
    }

    /// `=`: apply the pending operation, or repeat the last one with its right operand.
    pub fn equals(&mut self) -> Result<(), CalcError> {
        if let (Some(op), Some(_)) = (self.operation, self.previous) {
            let rhs = self.current_number();
            let (result, err) = self.calculate();
            self.last_operation = Some(op);
            self.last_operand = Some(rhs);
            self.finish(result);
            return err.map_or(Ok(()), Err);
        }
        if let (Some(op), Some(rhs)) = (self.last_operation, self.last_operand) {
            self.previous = Some(self.current_number());
            self.operation = Some(op);
            self.current = format_number(rhs);
            let (result, err) = self.calculate();
            self.finish(result);
            return err.map_or(Ok(()), Err);
        }
        Ok(())
    }

    fn finish(&mut self, result: f64) {
        self.previous = None;
        self.operation = None;
        self.show(result);
    }

    pub fn function(&mut self, func: Func) -> Result<(), CalcError> {
        let value = self.current_number();
        let result = match func {
            Func::Sqrt if value < 0.0 => return Err(CalcError::Domain(func)),
            Func::Sqrt => value.sqrt(),
            Func::Reciprocal if value == 0.0 => return Err(CalcError::Domain(func)),
            Func::Reciprocal => 1.0 / value,
            Func::Percent => value / 100.0,
            Func::Sign => -value,
            Func::Sin => value.to_radians().sin(),
            Func::Cos => value.to_radians().cos(),
            Func::Tan => value.to_radians().tan(),
            Func::Log | Func::Ln if value <= 0.0 => return Err(CalcError::Domain(func)),
            Func::Log => value.log10(),
            Func::Ln => value.ln(),
            Func::Square => value * value,
            Func::Cube => value * value * value,
            Func::Pi => std::f64::consts::PI,
            Func::E => std::f64::consts::E,
        };
        self.show(result);
        Ok(())
    }

    pub fn memory(&mut self, op: MemOp) {
        let value = self.current_number();
        match op {
            MemOp::Clear => self.memory = 0.0,
            MemOp::Recall => self.show(self.memory),
            MemOp::Store => self.memory = value,
            MemOp::Add => self.memory += value,
            MemOp::Subtract => self.memory -= value,
        }
    }

    /// `C`: forget everything except memory.
    pub fn clear(&mut self) {
        let memory = self.memory;
        *self = Self {
            memory,
            ..Self::default()
        };
    }

    /// Esc / Delete: like `C` but keeps the repeat-equals operation.
    pub fn reset_input(&mut self) {
        self.current = "0".to_string();
        self.previous = None;
        self.operation = None;
        self.waiting_for_operand = false;
    }

    pub fn clear_entry(&mut self) {
        self.current = "0".to_string();
    }

    pub fn backspace(&mut self) {
        if self.current.chars().count() > 1 {
            self.current.pop();
        } else {
            self.current = "0".to_string();
        }
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

fn fit_display(value: &str) -> String {
    if value.chars().count() <= MAX_DISPLAY_LEN {
        return value.to_string();
    }
    let Ok(number) = value.parse::<f64>() else {
        return value.chars().take(MAX_DISPLAY_LEN).collect();
    };
    let magnitude = if number == 0.0 {
        0
    } else {
        number.abs().log10().floor() as i32
    };
    if value.contains('e') || !(-6..6).contains(&magnitude) {
        let formatted = format!("{number:.5e}");
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        }
    } else {
        let decimals = (5 - magnitude).max(0) as usize;
        format!("{number:.decimals$}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Digit(char),
    Decimal,
    Op(Op),
    Equals,
    Func(Func),
    Mem(MemOp),
    Clear,
    ClearEntry,
    Backspace,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Key(Key),
    View,
    Edit,
    Help,
    Mode { scientific: bool },
}

type Row = &'static [(&'static str, Key, u16)];

const STANDARD: &[Row] = &[
    &[
        ("MC", Key::Mem(MemOp::Clear), 1),
        ("MR", Key::Mem(MemOp::Recall), 1),
        ("MS", Key::Mem(MemOp::Store), 1),
        ("M+", Key::Mem(MemOp::Add), 1),
        ("M-", Key::Mem(MemOp::Subtract), 1),
    ],
    &[
        ("←", Key::Backspace, 1),
        ("CE", Key::ClearEntry, 1),
        ("C", Key::Clear, 1),
        ("±", Key::Func(Func::Sign), 1),
        ("√", Key::Func(Func::Sqrt), 1),
    ],
    &[
        ("7", Key::Digit('7'), 1),
        ("8", Key::Digit('8'), 1),
        ("9", Key::Digit('9'), 1),
        ("÷", Key::Op(Op::Divide), 1),
        ("%", Key::Func(Func::Percent), 1),
    ],
    &[
        ("4", Key::Digit('4'), 1),
        ("5", Key::Digit('5'), 1),
        ("6", Key::Digit('6'), 1),
        ("×", Key::Op(Op::Multiply), 1),
        ("1/x", Key::Func(Func::Reciprocal), 1),
    ],
    &[
        ("1", Key::Digit('1'), 1),
        ("2", Key::Digit('2'), 1),
        ("3", Key::Digit('3'), 1),
        ("-", Key::Op(Op::Subtract), 1),
        ("=", Key::Equals, 1),
    ],
    &[
        ("0", Key::Digit('0'), 2),
        (".", Key::Decimal, 1),
        ("+", Key::Op(Op::Add), 1),
    ],
];

const SCIENTIFIC: &[Row] = &[
    &[
        ("sin", Key::Func(Func::Sin), 1),
        ("cos", Key::Func(Func::Cos), 1),
        ("tan", Key::Func(Func::Tan), 1),
        ("log", Key::Func(Func::Log), 1),
        ("ln", Key::Func(Func::Ln), 1),
        ("C", Key::Clear, 1),
    ],
    &[
        ("MC", Key::Mem(MemOp::Clear), 1),
        ("MR", Key::Mem(MemOp::Recall), 1),
        ("MS", Key::Mem(MemOp::Store), 1),
        ("M+", Key::Mem(MemOp::Add), 1),
        ("M-", Key::Mem(MemOp::Subtract), 1),
        ("←", Key::Backspace, 1),
    ],
    &[
        ("x²", Key::Func(Func::Square), 1),
        ("x³", Key::Func(Func::Cube), 1),
        ("xʸ", Key::Op(Op::Power), 1),
        ("1/x", Key::Func(Func::Reciprocal), 1),
        ("√", Key::Func(Func::Sqrt), 1),
        ("÷", Key::Op(Op::Divide), 1),
    ],
    &[
        ("π", Key::Func(Func::Pi), 1),
        ("e", Key::Func(Func::E), 1),
        ("7", Key::Digit('7'), 1),
        ("8", Key::Digit('8'), 1),
        ("9", Key::Digit('9'), 1),
        ("×", Key::Op(Op::Multiply), 1),
    ],
    &[
        ("%", Key::Func(Func::Percent), 1),
        ("±", Key::Func(Func::Sign), 1),
        ("4", Key::Digit('4'), 1),
        ("5", Key::Digit('5'), 1),
        ("6", Key::Digit('6'), 1),
        ("-", Key::Op(Op::Subtract), 1),
    ],
    &[
        ("CE", Key::ClearEntry, 1),
        ("0", Key::Digit('0'), 1),
        ("1", Key::Digit('1'), 1),
        ("2", Key::Digit('2'), 1),
        ("3", Key::Digit('3'), 1),
        ("+", Key::Op(Op::Add), 1),
    ],
    &[(".", Key::Decimal, 1), ("=", Key::Equals, 5)],
];

const MENU: [(&str, Target); 3] = [
    (" View ", Target::View),
    (" Edit ", Target::Edit),
    (" Help ", Target::Help),
];
const GRID_TOP: u16 = 4;

#[derive(Debug, Default)]
pub struct Calculator {
    engine: CalcEngine,
    scientific: bool,
    hits: HitMap<Target>,
    requests: Vec<AppRequest>,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(&self) -> &CalcEngine {
        &self.engine
    }

    pub fn is_scientific(&self) -> bool {
        self.scientific
    }

    fn press(&mut self, key: Key) {
        let result = match key {
            Key::Digit(d) => {
                self.engine.digit(d);
                Ok(())
            }
            Key::Decimal => {
                self.engine.decimal();
                Ok(())
            }
            Key::Op(op) => self.engine.operation(op),
            Key::Equals => self.engine.equals(),
            Key::Func(func) => self.engine.function(func),
            Key::Mem(op) => {
                self.engine.memory(op);
                Ok(())
            }
            Key::Clear => {
                self.engine.clear();
                Ok(())
            }
            Key::ClearEntry => {
                self.engine.clear_entry();
                Ok(())
            }
            Key::Backspace => {
                self.engine.backspace();
                Ok(())
            }
            Key::Reset => {
                self.engine.reset_input();
                Ok(())
            }
        };
        if let Err(err) = result {
            tracing::debug!(%err, "calculator rejected input");
            self.requests.push(AppRequest::PlaySound(Sound::Error));
        }
    }

    fn activate(&mut self, target: Target) {
        match target {
            Target::Key(key) => {
                self.requests.push(AppRequest::PlaySound(Sound::Click));
                self.press(key);
            }
            Target::View => self.scientific = !self.scientific,
            Target::Mode { scientific } => self.scientific = scientific,
            Target::Edit => self
                .requests
                .push(AppRequest::Copy(self.engine.value().to_string())),
            Target::Help => self.requests.push(AppRequest::Open(AppKind::CalculatorHelp)),
        }
    }

    fn key_for(code: KeyCode) -> Option<Key> {
        let key = match code {
            KeyCode::Char(c) if c.is_ascii_digit() => Key::Digit(c),
            KeyCode::Char('+') => Key::Op(Op::Add),
            KeyCode::Char('-') => Key::Op(Op::Subtract),
            KeyCode::Char('*') => Key::Op(Op::Multiply),
            KeyCode::Char('/') => Key::Op(Op::Divide),
            KeyCode::Char('=') | KeyCode::Enter => Key::Equals,
            KeyCode::Char('.') => Key::Decimal,
            KeyCode::Char('%') => Key::Func(Func::Percent),
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Esc | KeyCode::Delete => Key::Reset,
            _ => return None,
        };
        Some(key)
    }

    fn render_grid(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        let rows = if self.scientific { SCIENTIFIC } else { STANDARD };
        let columns = rows.iter().map(|r| r.iter().map(|b| b.2).sum::<u16>()).max().unwrap_or(1);
        let cell_w = (area.width / columns).max(1);
        let step = if GRID_TOP + rows.len() as u16 * 2 <= area.height {
            2
        } else {
            1
        };
        for (r, row) in rows.iter().enumerate() {
            let y = GRID_TOP + r as u16 * step;
            if y >= area.height {
                break;
            }
            let mut col = 0u16;
            for (text, key, span) in row.iter().copied() {
                let local = Rect {
                    x: col * cell_w,
                    y,
                    width: (cell_w * span).saturating_sub(1).max(1),
                    height: 1,
                };
                let fg = match key {
                    Key::Digit(_) | Key::Decimal => theme::button_fg(),
                    _ => theme::button_accent_fg(),
                };
                let style = Style::default().bg(theme::button_bg()).fg(fg);
                button(frame, area, local, text, style);
                self.hits.push(local, Target::Key(key));
                col += span;
            }
        }
    }
}

impl HostApp for Calculator {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &AppContext) {
        self.hits.clear();
        let base = Style::default()
            .bg(theme::window_bg())
            .fg(theme::window_fg());
        frame.fill(area, base);

        let mut x = 0u16;
        for (text, target) in MENU {
            let width = text.chars().count() as u16;
            label(frame, area, x, 0, text, base);
            self.hits.push(Rect::new(x, 0, width, 1), target);
            x += width;
        }

        if self.engine.has_memory() {
            label(frame, area, 0, 1, "M", base.add_modifier(Modifier::BOLD));
        }
        let field_w = area.width.saturating_sub(2);
        let field = Style::default()
            .bg(theme::field_bg())
            .fg(theme::field_fg());
        let shown = align_right(&self.engine.display(), field_w as usize);
        label(frame, area, 2, 1, &shown, field);

        let mut x = 0u16;
        for (text, scientific) in [(" Standard ", false), (" Scientific ", true)] {
            let width = text.chars().count() as u16;
            let style = if scientific == self.scientific {
                base.add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                base
            };
            label(frame, area, x, 2, text, style);
            self.hits.push(Rect::new(x, 2, width, 1), Target::Mode { scientific });
            x += width + 1;
        }

        self.render_grid(frame, area);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &AppContext) -> bool {
        match event {
            Event::Mouse(mouse) => {
                if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                    return false;
                }
                let Some(target) = self.hits.at(mouse.column, mouse.row) else {
                    return false;
                };
                self.activate(target);
                true
            }
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release
                    || key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    return false;
                }
                let Some(k) = Self::key_for(key.code) else {
                    return false;
                };
                self.requests.push(AppRequest::PlaySound(Sound::Click));
                self.press(k);
                true
            }
            _ => false,
        }
    }

    fn take_requests(&mut self) -> Vec<AppRequest> {
        std::mem::take(&mut self.requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, MouseEvent};
    use ratatui::buffer::Buffer;

    fn run(engine: &mut CalcEngine, keys: &str) -> Result<(), CalcError> {
        for ch in keys.chars() {
            match ch {
                '0'..='9' => engine.digit(ch),
                '.' => engine.decimal(),
                '+' => engine.operation(Op::Add)?,
                '-' => engine.operation(Op::Subtract)?,
                '*' => engine.operation(Op::Multiply)?,
                '/' => engine.operation(Op::Divide)?,
                '^' => engine.operation(Op::Power)?,
                '=' => engine.equals()?,
                _ => panic!("unsupported key {ch}"),
            }
        }
        Ok(())
    }

    #[test]
    fn chained_operations_evaluate_left_to_right() {
        let mut engine = CalcEngine::default();
        run(&mut engine, "2+3*4=").unwrap();
        assert_eq!(engine.value(), "20");
    }

    #[test]
    fn repeated_equals_reapplies_last_operand() {
        let mut engine = CalcEngine::default();
        run(&mut engine, "5+3==").unwrap();
        assert_eq!(engine.value(), "11");
        run(&mut engine, "=").unwrap();
        assert_eq!(engine.value(), "14");
    }

    #[test]
    fn divide_by_zero_reports_error_and_shows_zero() {
        let mut engine = CalcEngine::default();
        assert_eq!(run(&mut engine, "8/0="), Err(CalcError::DivideByZero));
        assert_eq!(engine.value(), "0");
    }

    #[test]
    fn functions_and_domain_errors() {
        let mut engine = CalcEngine::default();
        run(&mut engine, "9").unwrap();
        engine.function(Func::Sqrt).unwrap();
        assert_eq!(engine.value(), "3");
        engine.function(Func::Sign).unwrap();
        assert_eq!(
            engine.function(Func::Sqrt),
            Err(CalcError::Domain(Func::Sqrt))
        );
        assert_eq!(engine.value(), "-3");
        engine.clear();
        run(&mut engine, "30").unwrap();
        engine.function(Func::Sin).unwrap();
        assert!((engine.value().parse::<f64>().unwrap() - 0.5).abs() < 1e-9);
        engine.clear();
        run(&mut engine, "2^10=").unwrap();
        assert_eq!(engine.value(), "1024");
    }

    #[test]
    fn memory_survives_clear() {
        let mut engine = CalcEngine::default();
        run(&mut engine, "7").unwrap();
        engine.memory(MemOp::Store);
        engine.memory(MemOp::Add);
        engine.clear();
        assert!(engine.has_memory());
        engine.memory(MemOp::Recall);
        assert_eq!(engine.value(), "14");
        engine.memory(MemOp::Clear);
        assert!(!engine.has_memory());
    }

    #[test]
    fn decimal_backspace_and_clear_entry() {
        let mut engine = CalcEngine::default();
        run(&mut engine, "1..5").unwrap();
        assert_eq!(engine.value(), "1.5");
        engine.backspace();
        engine.backspace();
        engine.backspace();
        assert_eq!(engine.value(), "0");
        run(&mut engine, "0.1+0.2=").unwrap();
        assert_eq!(engine.value(), "0.30000000000000004");
        assert_eq!(engine.display(), "0.300000");
    }

    #[test]
    fn long_values_are_shortened_for_display() {
        assert_eq!(fit_display("123456789012345"), "1.23457e+14");
        assert_eq!(fit_display("42"), "42");
    }

    #[test]
    fn keyboard_input_plays_click_and_computes() {
        let mut calc = Calculator::new();
        let ctx = AppContext::default();
        for code in [
            KeyCode::Char('6'),
            KeyCode::Char('*'),
            KeyCode::Char('7'),
            KeyCode::Enter,
        ] {
            assert!(calc.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)), &ctx));
        }
        assert_eq!(calc.engine().value(), "42");
        let requests = calc.take_requests();
        assert_eq!(requests.len(), 4);
        assert!(
            requests
                .iter()
                .all(|r| *r == AppRequest::PlaySound(Sound::Click))
        );
    }

    #[test]
    fn clicking_buttons_and_menu_after_render() {
        let mut calc = Calculator::new();
        let area = Rect::new(0, 0, 36, 16);
        let mut buf = Buffer::empty(area);
        calc.render(
            &mut UiFrame::from_parts(area, &mut buf),
            area,
            &AppContext::default(),
        );
        let seven = calc
            .hits
            .rect_of(|t| *t == Target::Key(Key::Digit('7')))
            .unwrap();
        let click = |column, row| {
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            })
        };
        let ctx = AppContext::default();
        assert!(calc.handle_event(&click(seven.x, seven.y), &ctx));
        assert_eq!(calc.engine().value(), "7");

        // Edit copies the raw value, Help opens the help window.
        assert!(calc.handle_event(&click(7, 0), &ctx));
        assert!(calc.handle_event(&click(13, 0), &ctx));
        let requests = calc.take_requests();
        assert!(requests.contains(&AppRequest::Copy("7".to_string())));
        assert!(requests.contains(&AppRequest::Open(AppKind::CalculatorHelp)));

        assert!(calc.handle_event(&click(1, 0), &ctx));
        assert!(calc.is_scientific());
    }

    #[test]
    fn invalid_function_plays_error_sound() {
        let mut calc = Calculator::new();
        calc.press(Key::Func(Func::Reciprocal));
        assert_eq!(
            calc.take_requests(),
            vec![AppRequest::PlaySound(Sound::Error)]
        );
    }
}

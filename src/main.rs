// SPDX-License-Identifier: MIT
//
// tally — a keyboard-driven terminal calculator.
//
// This is the main binary that wires together the crates:
//
//   tally-term → terminal control, input parsing, diff rendering, event loop
//   tally-core → the accumulator, operations, display formatting
//
// The Calculator struct implements tally-term's App trait, connecting
// the event loop to the accumulator. Each keypress flows through:
//
//   stdin → parser → on_key → accumulator call
//   paint → panel layout → frame → diff renderer → terminal
//
// Layout (centered in the terminal):
//
//   ┌─ tally ────────────────┐
//   │               1,234 ×  │  ← secondary operand + pending operation
//   │                  56.7  │  ← primary operand (being typed)
//   ├────────────────────────┤
//   │   AC   ⌫    ÷    ×     │
//   │   7    8    9    -     │  ← keypad echo (display only; input is
//   │   4    5    6    +     │    the keyboard)
//   │   1    2    3    =     │
//   │        0    .          │
//   └────────────────────────┘
//        q quit · esc clears

use std::env;
use std::process;

use tally_core::accumulator::Accumulator;
use tally_core::format;
use tally_core::operation::Operation;

use tally_term::event_loop::{Action, App, EventLoop};
use tally_term::frame::{Attr, Color, Frame, Style};
use tally_term::input::{KeyCode, KeyEvent, Modifiers};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

// ─── Panel geometry ─────────────────────────────────────────────────────────

/// Total panel width including borders.
const PANEL_WIDTH: u16 = 26;

/// Total panel height: border + 2 display rows + divider + 5 keypad rows
/// + border.
const PANEL_HEIGHT: u16 = 10;

/// Columns available to the display rows (borders plus one space margin
/// each side).
const DISPLAY_WIDTH: u16 = PANEL_WIDTH - 4;

/// The keypad echo, row by row. Empty labels leave a gap.
///
/// This mirrors the button grid of a hand calculator; input comes from
/// the keyboard, so the grid is purely a legend.
const KEYPAD: [[&str; 4]; 5] = [
    ["AC", "⌫", "÷", "×"],
    ["7", "8", "9", "-"],
    ["4", "5", "6", "+"],
    ["1", "2", "3", "="],
    ["", "0", ".", ""],
];

/// Column spacing between keypad labels.
const KEY_PITCH: u16 = 5;

// ─── Calculator ─────────────────────────────────────────────────────────────

/// The application: an accumulator plus its display preferences.
///
/// The calculator exclusively owns the accumulator. State flows one way:
/// a key maps to exactly one accumulator call, then the state is read
/// back and painted.
struct Calculator {
    acc: Accumulator,
    /// Thousands separator used by the display (locale-derived).
    separator: char,
}

impl Calculator {
    /// A calculator using the ambient locale's thousands separator.
    fn new() -> Self {
        Self::with_separator(format::locale_separator())
    }

    /// A calculator with an explicit thousands separator.
    fn with_separator(separator: char) -> Self {
        Self {
            acc: Accumulator::new(),
            separator,
        }
    }

    /// The two display lines: secondary operand with its operation
    /// symbol, and the primary operand.
    fn display_lines(&self) -> (String, String) {
        let secondary = format::display_value(self.acc.secondary(), self.separator);
        let upper = match self.acc.operation() {
            Some(op) => format!("{secondary} {}", op.symbol()),
            None => secondary,
        };
        let lower = format::display_operand(self.acc.primary().text(), self.separator);
        (upper, lower)
    }

    /// The style for one keypad label.
    ///
    /// Operators are accented; the pending operation renders inverse so
    /// the captured state is visible at a glance.
    fn key_style(&self, label: &str) -> Style {
        match label {
            "AC" | "⌫" => Style::fg(Color::Ansi256(9)),
            "=" => Style::fg(Color::Ansi256(2)),
            "÷" | "×" | "-" | "+" => {
                let pending = self.acc.operation().map(Operation::symbol);
                let accent = Style::fg(Color::Ansi256(3));
                if pending == label.chars().next() {
                    accent.with(Attr::INVERSE)
                } else {
                    accent
                }
            }
            _ => Style::PLAIN,
        }
    }
}

impl App for Calculator {
    fn on_key(&mut self, key: &KeyEvent) -> Action {
        if key.modifiers.contains(Modifiers::CTRL) {
            return match key.code {
                KeyCode::Char('c' | 'q') => Action::Quit,
                _ => Action::Continue,
            };
        }
        if key.modifiers.contains(Modifiers::ALT) {
            return Action::Continue;
        }

        match key.code {
            KeyCode::Char(token @ ('0'..='9' | '.')) => self.acc.append_digit(token),
            KeyCode::Char('q' | 'Q') => return Action::Quit,
            KeyCode::Char('=') | KeyCode::Enter => {
                self.acc.evaluate();
            }
            KeyCode::Backspace | KeyCode::Delete => self.acc.delete_digit(),
            KeyCode::Escape => self.acc.clear(),
            KeyCode::Char(c) => {
                if let Some(op) = Operation::from_key(c) {
                    self.acc.choose_operation(op);
                }
            }
            _ => {}
        }
        Action::Continue
    }

    fn paint(&mut self, frame: &mut Frame) {
        let w = frame.width();
        let h = frame.height();

        if w < PANEL_WIDTH || h < PANEL_HEIGHT {
            frame.put_str(
                0,
                0,
                "tally needs a larger terminal",
                Style::PLAIN.with(Attr::DIM),
            );
            return;
        }

        let px = (w - PANEL_WIDTH) / 2;
        let py = (h - PANEL_HEIGHT) / 2;
        let border = Style::PLAIN.with(Attr::DIM);

        // ── Borders ──────────────────────────────────────────────
        frame.put_str(px, py, &horizontal_border('┌', '┐'), border);
        frame.put_str(px, py + 3, &horizontal_border('├', '┤'), border);
        frame.put_str(px, py + PANEL_HEIGHT - 1, &horizontal_border('└', '┘'), border);
        for dy in 1..PANEL_HEIGHT - 1 {
            if dy == 3 {
                continue;
            }
            frame.put_str(px, py + dy, "│", border);
            frame.put_str(px + PANEL_WIDTH - 1, py + dy, "│", border);
        }
        frame.put_str(px + 2, py, " tally ", Style::PLAIN.with(Attr::BOLD));

        // ── Display ──────────────────────────────────────────────
        let (upper, lower) = self.display_lines();
        let inner_x = px + 2;
        put_right(
            frame,
            inner_x,
            py + 1,
            DISPLAY_WIDTH,
            &upper,
            Style::PLAIN.with(Attr::DIM),
        );
        put_right(
            frame,
            inner_x,
            py + 2,
            DISPLAY_WIDTH,
            &lower,
            Style::PLAIN.with(Attr::BOLD),
        );

        // ── Keypad echo ──────────────────────────────────────────
        let pad_x = px + 3;
        for (r, row) in KEYPAD.iter().enumerate() {
            let y = py + 4 + r as u16;
            for (c, label) in row.iter().enumerate() {
                if label.is_empty() {
                    continue;
                }
                let x = pad_x + c as u16 * KEY_PITCH;
                frame.put_str(x, y, label, self.key_style(label));
            }
        }

        // ── Hint line ────────────────────────────────────────────
        let hint = "q quit · esc clears";
        let hint_y = py + PANEL_HEIGHT + 1;
        if hint_y < h {
            let hint_w = UnicodeWidthStr::width(hint) as u16;
            let hint_x = px + PANEL_WIDTH.saturating_sub(hint_w) / 2;
            frame.put_str(hint_x, hint_y, hint, Style::PLAIN.with(Attr::DIM));
        }
    }
}

// ─── Layout helpers ─────────────────────────────────────────────────────────

/// One horizontal border run of the panel width.
fn horizontal_border(left: char, right: char) -> String {
    let mut s = String::with_capacity(usize::from(PANEL_WIDTH) * 3);
    s.push(left);
    for _ in 0..PANEL_WIDTH - 2 {
        s.push('─');
    }
    s.push(right);
    s
}

/// Paint `text` right-aligned within `width` columns starting at `x`.
fn put_right(frame: &mut Frame, x: u16, y: u16, width: u16, text: &str, style: Style) {
    let text = fit_tail(text, width);
    let text_w = UnicodeWidthStr::width(text.as_str()) as u16;
    let start = x + width.saturating_sub(text_w);
    frame.put_str(start, y, &text, style);
}

/// Keep the tail of `text` that fits in `max` columns, with a leading
/// `…` when truncated.
///
/// The tail is what matters on a calculator display — it holds the
/// digits most recently typed.
fn fit_tail(text: &str, max: u16) -> String {
    if UnicodeWidthStr::width(text) as u16 <= max {
        return text.to_string();
    }

    let budget = usize::from(max.saturating_sub(1));
    let mut used = 0;
    let mut tail: Vec<char> = Vec::new();
    for ch in text.chars().rev() {
        let ch_w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_w > budget {
            break;
        }
        used += ch_w;
        tail.push(ch);
    }

    let mut out = String::from("…");
    out.extend(tail.iter().rev());
    out
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    if let Some(arg) = env::args().nth(1) {
        eprintln!("tally: unexpected argument `{arg}` (tally takes no arguments)");
        process::exit(2);
    }

    let mut calculator = Calculator::new();

    let mut event_loop = EventLoop::new().unwrap_or_else(|e| {
        eprintln!("tally: failed to initialize terminal: {e}");
        process::exit(1);
    });

    if let Err(e) = event_loop.run(&mut calculator) {
        eprintln!("tally: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

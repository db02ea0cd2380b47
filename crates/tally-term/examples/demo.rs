// SPDX-License-Identifier: MIT
//
// tally-term demo — a live key viewer that proves the modules work
// together.
//
// This wires the complete pipeline: Terminal → InputReader → Parser →
// KeyEvents → Frame → Renderer → single write(). Run it, press keys,
// resize the terminal. Ctrl-Q to quit.
//
// Usage:
//   cargo run -p tally-term --example demo

use std::collections::VecDeque;

use tally_term::event_loop::{Action, App, EventLoop};
use tally_term::frame::{Attr, Color, Frame, Style};
use tally_term::input::{KeyCode, KeyEvent, Modifiers};

/// Maximum number of keys kept in the scrolling log.
const MAX_LOG_ENTRIES: usize = 64;

struct Demo {
    log: VecDeque<String>,
    key_count: u64,
}

impl Demo {
    fn new() -> Self {
        Self {
            log: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            key_count: 0,
        }
    }

    fn push_log(&mut self, line: String) {
        if self.log.len() >= MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }
}

fn describe(key: &KeyEvent) -> String {
    let mut out = String::new();
    if key.modifiers.contains(Modifiers::CTRL) {
        out.push_str("Ctrl+");
    }
    if key.modifiers.contains(Modifiers::ALT) {
        out.push_str("Alt+");
    }
    if key.modifiers.contains(Modifiers::SHIFT) {
        out.push_str("Shift+");
    }
    match key.code {
        KeyCode::Char(c) => out.push(c),
        code => out.push_str(&format!("{code:?}")),
    }
    out
}

impl App for Demo {
    fn on_key(&mut self, key: &KeyEvent) -> Action {
        if key.modifiers.contains(Modifiers::CTRL) && key.code == KeyCode::Char('q') {
            return Action::Quit;
        }
        self.key_count += 1;
        let line = format!("{:>4}  {}", self.key_count, describe(key));
        self.push_log(line);
        Action::Continue
    }

    fn paint(&mut self, frame: &mut Frame) {
        let header = Style::PLAIN.with(Attr::INVERSE | Attr::BOLD);
        let width = frame.width();
        frame.fill_rect(0, 0, width, 1, ' ', header);
        frame.put_str(1, 0, "tally-term demo — press keys, Ctrl-Q quits", header);

        let rows = usize::from(frame.height().saturating_sub(2));
        let visible = self.log.iter().rev().take(rows);
        for (i, line) in visible.enumerate() {
            let y = frame.height().saturating_sub(2) - i as u16;
            let style = if i == 0 {
                Style::fg(Color::Ansi256(2))
            } else {
                Style::PLAIN.with(Attr::DIM)
            };
            frame.put_str(1, y, line, style);
        }
    }
}

fn main() {
    let mut demo = Demo::new();
    let mut event_loop = EventLoop::new().unwrap_or_else(|e| {
        eprintln!("demo: failed to initialize terminal: {e}");
        std::process::exit(1);
    });

    if let Err(e) = event_loop.run(&mut demo) {
        eprintln!("demo: {e}");
        std::process::exit(1);
    }
}

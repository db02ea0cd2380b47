// SPDX-License-Identifier: MIT
//
// tally-term — Terminal backend for tally.
//
// A small, direct terminal layer: raw mode and alternate screen via
// termios, a background stdin reader, a byte-level input parser, a styled
// cell frame, and a differential renderer that only touches changed
// cells. The calculator redraws a few dozen cells per keypress; the
// renderer makes sure that is all the terminal ever sees.
//
// This crate intentionally avoids external TUI frameworks (ratatui,
// crossterm) in favor of direct terminal control via ANSI escape
// sequences and raw termios. Every byte sent to the terminal is
// accounted for. Every frame is diffed.

pub mod ansi;
pub mod event_loop;
pub mod frame;
pub mod input;
pub mod reader;
pub mod render;
pub mod terminal;

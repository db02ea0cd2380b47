// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop — the heartbeat of the application.
//
// Stdin bytes flow in from the background reader, get parsed into key
// events, the application handles them, paints a frame, and the diff
// renderer outputs only what changed. One loop.
//
// The loop blocks on the stdin channel with a short timeout. Three
// behaviors fall out of that:
//
//   1. Instant response: typed bytes arrive on the channel immediately.
//   2. Zero CPU idle: `recv_timeout` blocks the thread; the OS schedules
//      us out between keypresses.
//   3. Escape resolution: a lone ESC byte is ambiguous — Escape key or
//      the start of a CSI sequence. The parser holds it pending; when
//      the timeout fires with no new bytes, pending bytes are flushed as
//      literal keys. The user sees at most one timeout of lag on Escape.
//
// Terminal resize is a SIGWINCH handler setting an `AtomicBool`; the
// loop checks the flag each iteration and triggers a full redraw.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::frame::Frame;
use crate::input::{KeyEvent, Parser};
use crate::reader::InputReader;
use crate::render::Renderer;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

/// Global flag set by the SIGWINCH handler. Checked each loop iteration.
static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Install a signal handler for SIGWINCH (terminal resize).
///
/// The handler only sets the flag — writing to an atomic is one of the
/// few operations permitted inside signal handlers.
#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {
    // No-op on non-unix platforms.
}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Application interface for the event loop.
///
/// Implement this to create a terminal application. The loop calls
/// [`on_key`](App::on_key) for each parsed key event,
/// [`on_resize`](App::on_resize) when the terminal size changes, and
/// [`paint`](App::paint) when the frame is dirty. Only `paint` is
/// required.
pub trait App {
    /// Handle a parsed key event.
    ///
    /// Return [`Action::Quit`] to exit the event loop.
    fn on_key(&mut self, _key: &KeyEvent) -> Action {
        Action::Continue
    }

    /// Handle terminal resize.
    ///
    /// Called with the new dimensions; the frame has already been
    /// resized before this is called.
    fn on_resize(&mut self, _size: Size) {}

    /// Paint the current application state into the frame.
    ///
    /// Called only when the frame is dirty (input arrived or the
    /// terminal resized). The frame has been cleared before this call —
    /// paint everything you want visible.
    fn paint(&mut self, frame: &mut Frame);
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Configuration for the event loop timing.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// Timeout for the channel `recv_timeout` call (microseconds).
    ///
    /// This doubles as the escape-sequence timeout. Default: 16667μs
    /// (60 Hz) — far quicker than a human noticing Escape lag, far
    /// slower than burning CPU.
    pub tick_interval_us: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_interval_us: 16_667, // 60 Hz
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// Owns the terminal, parser, and renderer. Call [`run`](Self::run) to
/// enter the loop — it returns when the application signals
/// [`Action::Quit`].
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    renderer: Renderer,
    config: LoopConfig,
}

impl EventLoop {
    /// Create a new event loop with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn new() -> io::Result<Self> {
        Self::with_config(LoopConfig::default())
    }

    /// Create a new event loop with custom timing configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn with_config(config: LoopConfig) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
            parser: Parser::new(),
            renderer: Renderer::new(),
            config,
        })
    }

    /// The current terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run the event loop until the application returns [`Action::Quit`].
    ///
    /// Enters TUI mode, installs the SIGWINCH handler, spawns the
    /// background stdin reader, runs the loop, and restores the terminal
    /// on exit (even on error).
    ///
    /// # Errors
    ///
    /// Returns an error if terminal enter/leave or rendering fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let (mut reader, rx) = InputReader::spawn();

        let result = self.run_inner(app, &rx);

        // Always clean up, even if the loop errored.
        reader.stop();
        self.terminal.leave()?;

        result
    }

    /// The inner loop, separated so cleanup runs regardless of outcome.
    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<()> {
        let size = self.terminal.size();
        let mut frame = Frame::new(size.cols, size.rows);
        let mut dirty = true; // First frame always renders.
        let timeout = Duration::from_micros(self.config.tick_interval_us);

        loop {
            // ── Receive stdin bytes ──────────────────────────────
            match rx.recv_timeout(timeout) {
                Ok(bytes) => {
                    let keys = self.parser.advance(&bytes);
                    for key in &keys {
                        if app.on_key(key) == Action::Quit {
                            return Ok(());
                        }
                    }
                    if !keys.is_empty() {
                        dirty = true;
                    }
                }
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                    // Flush pending escape sequences (lone ESC → Escape).
                    if self.parser.has_pending() {
                        let keys = self.parser.flush();
                        for key in &keys {
                            if app.on_key(key) == Action::Quit {
                                return Ok(());
                            }
                        }
                        if !keys.is_empty() {
                            dirty = true;
                        }
                    }
                }
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                    // Reader thread died (stdin EOF) — exit gracefully.
                    return Ok(());
                }
            }

            // ── Check for terminal resize ────────────────────────
            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let new_size = self.terminal.refresh_size();
                frame.resize(new_size.cols, new_size.rows);
                self.renderer.force_redraw();
                app.on_resize(new_size);
                dirty = true;
            }

            // ── Render if dirty ──────────────────────────────────
            if dirty {
                frame.clear();
                app.paint(&mut frame);
                self.renderer.render(&frame);
                self.renderer.flush()?;
                dirty = false;
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

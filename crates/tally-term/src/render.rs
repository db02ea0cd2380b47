// SPDX-License-Identifier: MIT
//
// Differential renderer — emits ANSI only for cells that changed.
//
// Instead of redrawing the whole screen every frame, the renderer
// compares the current frame against the previous one. A keypress on the
// calculator changes a handful of display cells; that handful is all the
// terminal sees. The pipeline per frame:
//
//   1. The application paints into a Frame.
//   2. render() diffs it against the stored previous frame.
//   3. Changed cells become minimal ANSI: cursor moves are skipped when
//      the cursor is already in place, SGR is skipped when the style
//      hasn't changed since the last emitted cell.
//   4. Everything accumulates in one byte buffer — flush() is a single
//      write() syscall.
//
// Entire unchanged rows are detected with one slice comparison and
// skipped without touching individual cells. Frames are wrapped in
// synchronized output (DEC 2026) so they never appear half-drawn.

use std::io::{self, Write};

use unicode_width::UnicodeWidthChar;

use crate::ansi;
use crate::frame::{Frame, Style};

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// Statistics from a render pass, for profiling and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Cells that differed from the previous frame and were emitted.
    pub cells_drawn: usize,
    /// Cells that matched the previous frame and were skipped.
    pub cells_skipped: usize,
    /// Total bytes of ANSI output generated.
    pub bytes_written: usize,
}

// ─── Renderer ────────────────────────────────────────────────────────────────

/// Differential renderer with a single-write output buffer.
///
/// Maintains the previous frame for comparison. All output accumulates
/// in memory; [`flush`](Self::flush) writes it to the terminal in one
/// syscall.
pub struct Renderer {
    out: Vec<u8>,
    previous: Option<Frame>,
}

impl Renderer {
    /// Create a renderer with no previous frame (the first render draws
    /// everything).
    #[must_use]
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(4096),
            previous: None,
        }
    }

    /// Diff `current` against the previous frame and generate ANSI output.
    ///
    /// After calling this, use [`flush`](Self::flush) or
    /// [`flush_to`](Self::flush_to) to write the output, or
    /// [`output_bytes`](Self::output_bytes) to inspect it in tests.
    ///
    /// # Panics
    ///
    /// Panics only on internal logic errors (in-bounds cell access).
    pub fn render(&mut self, current: &Frame) -> RenderStats {
        self.out.clear();

        let width = current.width();
        let height = current.height();
        let mut stats = RenderStats::default();

        if width == 0 || height == 0 {
            self.store_frame(current);
            return stats;
        }

        ansi::begin_sync(&mut self.out).ok();

        let size_matches = self
            .previous
            .as_ref()
            .is_some_and(|prev| prev.width() == width && prev.height() == height);
        let full_redraw = !size_matches;

        if full_redraw {
            ansi::clear_screen(&mut self.out).ok();
        }

        // Terminal state tracked across the frame: where the cursor is
        // and which style was last emitted. `None` = unknown.
        let mut cursor: Option<(u16, u16)> = None;
        let mut style: Option<Style> = None;

        for y in 0..height {
            // Row-skip: an unchanged row is one slice comparison.
            if !full_redraw {
                if let Some(prev) = &self.previous {
                    if current.row(y) == prev.row(y) {
                        stats.cells_skipped += usize::from(width);
                        continue;
                    }
                }
            }

            for x in 0..width {
                // Safety: x < width and y < height, so unwrap is safe.
                let cell = *current.get(x, y).unwrap();

                let changed = full_redraw
                    || self.previous.as_ref().and_then(|p| p.get(x, y)) != Some(&cell);

                if !changed {
                    stats.cells_skipped += 1;
                    continue;
                }

                // The continuation half of a wide glyph emits nothing;
                // the glyph to its left already covers this column.
                if cell.is_continuation() {
                    stats.cells_skipped += 1;
                    continue;
                }

                if cursor != Some((x, y)) {
                    ansi::cursor_to(&mut self.out, x, y).ok();
                }

                if style != Some(cell.style) {
                    ansi::reset(&mut self.out).ok();
                    ansi::attrs(&mut self.out, cell.style.attrs).ok();
                    ansi::fg(&mut self.out, cell.style.fg).ok();
                    ansi::bg(&mut self.out, cell.style.bg).ok();
                    style = Some(cell.style);
                }

                let mut utf8 = [0u8; 4];
                self.out
                    .extend_from_slice(cell.ch.encode_utf8(&mut utf8).as_bytes());

                let advance = UnicodeWidthChar::width(cell.ch).unwrap_or(1) as u16;
                cursor = Some((x + advance, y));
                stats.cells_drawn += 1;
            }
        }

        // Leave the terminal's attributes clean at frame end.
        ansi::reset(&mut self.out).ok();
        ansi::end_sync(&mut self.out).ok();

        stats.bytes_written = self.out.len();

        self.store_frame(current);

        stats
    }

    /// The raw ANSI bytes from the last render (for tests and debugging).
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        &self.out
    }

    /// Write accumulated output to stdout and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush(&mut self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.flush_to(&mut lock)
    }

    /// Write accumulated output to an arbitrary writer and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(&self.out)?;
        w.flush()?;
        self.out.clear();
        Ok(())
    }

    /// Discard the previous frame so the next render draws everything.
    ///
    /// Needed after a resize or anything else that invalidates what's on
    /// screen.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }

    /// Store the current frame for the next render's comparison.
    ///
    /// Reuses the existing allocation when dimensions match; only the
    /// first render or a resize allocates.
    fn store_frame(&mut self, current: &Frame) {
        match &mut self.previous {
            Some(prev)
                if prev.width() == current.width() && prev.height() == current.height() =>
            {
                prev.copy_from(current);
            }
            _ => {
                self.previous = Some(current.clone());
            }
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Attr, Color};
    use pretty_assertions::assert_eq;

    fn output_of(renderer: &Renderer) -> String {
        String::from_utf8_lossy(renderer.output_bytes()).into_owned()
    }

    // ── First render ──────────────────────────────────────────────

    #[test]
    fn first_render_clears_and_draws_everything() {
        let mut renderer = Renderer::new();
        let mut frame = Frame::new(4, 1);
        frame.put_str(0, 0, "12+3", Style::PLAIN);

        let stats = renderer.render(&frame);
        assert_eq!(stats.cells_drawn, 4);

        let out = output_of(&renderer);
        assert!(out.contains("\x1b[2J"));
        assert!(out.contains("12+3"));
    }

    #[test]
    fn frames_are_wrapped_in_synchronized_output() {
        let mut renderer = Renderer::new();
        let frame = Frame::new(2, 1);
        renderer.render(&frame);

        let out = output_of(&renderer);
        assert!(out.starts_with("\x1b[?2026h"));
        assert!(out.ends_with("\x1b[?2026l"));
    }

    // ── Diffing ───────────────────────────────────────────────────

    #[test]
    fn identical_frame_draws_nothing() {
        let mut renderer = Renderer::new();
        let mut frame = Frame::new(8, 2);
        frame.put_str(0, 0, "42", Style::PLAIN);

        renderer.render(&frame);
        let stats = renderer.render(&frame);

        assert_eq!(stats.cells_drawn, 0);
        assert_eq!(stats.cells_skipped, 16);
    }

    #[test]
    fn only_changed_cells_are_drawn() {
        let mut renderer = Renderer::new();
        let mut frame = Frame::new(8, 2);
        frame.put_str(0, 0, "42", Style::PLAIN);
        renderer.render(&frame);

        frame.put_str(0, 0, "43", Style::PLAIN);
        let stats = renderer.render(&frame);

        assert_eq!(stats.cells_drawn, 1);
        let out = output_of(&renderer);
        assert!(out.contains('3'));
        assert!(!out.contains("42"));
    }

    #[test]
    fn style_change_alone_redraws_the_cell() {
        let mut renderer = Renderer::new();
        let mut frame = Frame::new(2, 1);
        frame.put_str(0, 0, "9", Style::PLAIN);
        renderer.render(&frame);

        frame.put_str(0, 0, "9", Style::PLAIN.with(Attr::BOLD));
        let stats = renderer.render(&frame);

        assert_eq!(stats.cells_drawn, 1);
        assert!(output_of(&renderer).contains("\x1b[1m"));
    }

    // ── Redraw triggers ───────────────────────────────────────────

    #[test]
    fn resize_forces_full_redraw() {
        let mut renderer = Renderer::new();
        let mut frame = Frame::new(4, 1);
        renderer.render(&frame);

        frame.resize(6, 2);
        renderer.render(&frame);

        assert!(output_of(&renderer).contains("\x1b[2J"));
    }

    #[test]
    fn force_redraw_discards_the_previous_frame() {
        let mut renderer = Renderer::new();
        let mut frame = Frame::new(4, 1);
        frame.put_str(0, 0, "77", Style::PLAIN);
        renderer.render(&frame);

        renderer.force_redraw();
        let stats = renderer.render(&frame);
        assert_eq!(stats.cells_drawn, 4);
    }

    // ── Output details ────────────────────────────────────────────

    #[test]
    fn colored_cell_emits_sgr() {
        let mut renderer = Renderer::new();
        let mut frame = Frame::new(1, 1);
        frame.put_str(0, 0, "x", Style::fg(Color::Ansi256(2)));
        renderer.render(&frame);

        assert!(output_of(&renderer).contains("\x1b[32m"));
    }

    #[test]
    fn run_of_same_style_emits_sgr_once() {
        let mut renderer = Renderer::new();
        let mut frame = Frame::new(5, 1);
        frame.put_str(0, 0, "12345", Style::fg(Color::Ansi256(4)));
        renderer.render(&frame);

        let out = output_of(&renderer);
        assert_eq!(out.matches("\x1b[34m").count(), 1);
    }

    #[test]
    fn wide_glyph_is_emitted_once() {
        let mut renderer = Renderer::new();
        let mut frame = Frame::new(4, 1);
        frame.put_str(0, 0, "日", Style::PLAIN);
        renderer.render(&frame);

        assert_eq!(output_of(&renderer).matches('日').count(), 1);
    }

    // ── Flush ─────────────────────────────────────────────────────

    #[test]
    fn flush_to_writes_and_clears() {
        let mut renderer = Renderer::new();
        let mut frame = Frame::new(2, 1);
        frame.put_str(0, 0, "ok", Style::PLAIN);
        renderer.render(&frame);

        let mut sink = Vec::new();
        renderer.flush_to(&mut sink).unwrap();
        assert!(!sink.is_empty());
        assert!(renderer.output_bytes().is_empty());
    }

    #[test]
    fn zero_size_frame_renders_nothing() {
        let mut renderer = Renderer::new();
        let frame = Frame::new(0, 0);
        let stats = renderer.render(&frame);
        assert_eq!(stats, RenderStats::default());
    }
}

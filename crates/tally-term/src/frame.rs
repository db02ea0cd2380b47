// SPDX-License-Identifier: MIT
//
// The frame — a grid of styled cells the application paints into.
//
// Painting never touches the terminal. The application writes cells and
// strings into the frame; the renderer later diffs it against the
// previous frame and emits ANSI for what changed. Wide glyphs occupy two
// columns: the left cell holds the character, the right cell holds a
// continuation marker that the renderer skips.

use bitflags::bitflags;
use unicode_width::UnicodeWidthChar;

// ─── Style ───────────────────────────────────────────────────────────────────

bitflags! {
    /// Text attribute flags (SGR 1, 2, 4, 7).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        const BOLD      = 0b0000_0001;
        const DIM       = 0b0000_0010;
        const UNDERLINE = 0b0000_0100;
        const INVERSE   = 0b0000_1000;
    }
}

/// A terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Color {
    /// Terminal default (inherits the user's theme).
    #[default]
    Default,
    /// ANSI 256-color palette index (0-15 are the standard colors).
    Ansi256(u8),
    /// 24-bit `TrueColor`.
    Rgb(u8, u8, u8),
}

/// A complete cell style: foreground, background, attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    /// Foreground (text) color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Attribute flags.
    pub attrs: Attr,
}

impl Style {
    /// Default colors, no attributes.
    pub const PLAIN: Self = Self {
        fg: Color::Default,
        bg: Color::Default,
        attrs: Attr::empty(),
    };

    /// A style with the given foreground over the default background.
    #[must_use]
    pub const fn fg(color: Color) -> Self {
        Self {
            fg: color,
            bg: Color::Default,
            attrs: Attr::empty(),
        }
    }

    /// This style with a different background.
    #[must_use]
    pub const fn on(self, bg: Color) -> Self {
        Self { bg, ..self }
    }

    /// This style with the given attributes added.
    #[must_use]
    pub const fn with(self, attrs: Attr) -> Self {
        Self {
            attrs: self.attrs.union(attrs),
            ..self
        }
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// One character cell: a glyph plus its style.
///
/// `'\0'` marks the continuation half of a wide glyph; the renderer emits
/// nothing for it because the glyph to its left already covers the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The glyph, or `'\0'` for a wide-glyph continuation.
    pub ch: char,
    /// The cell's style.
    pub style: Style,
}

impl Cell {
    /// A blank cell with default style.
    pub const EMPTY: Self = Self {
        ch: ' ',
        style: Style::PLAIN,
    };

    /// The continuation half of a wide glyph.
    #[must_use]
    pub const fn continuation(style: Style) -> Self {
        Self { ch: '\0', style }
    }

    /// Whether this cell is a wide-glyph continuation.
    #[inline]
    #[must_use]
    pub const fn is_continuation(self) -> bool {
        self.ch == '\0'
    }
}

// ─── Frame ───────────────────────────────────────────────────────────────────

/// A width × height grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Frame {
    /// Create a frame of blank cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; usize::from(width) * usize::from(height)],
        }
    }

    /// Width in columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Resize the grid, clearing all content.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::EMPTY);
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    /// The cell at `(x, y)`, or `None` out of bounds.
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.cells.get(i)
        } else {
            None
        }
    }

    /// Set the cell at `(x, y)`. Returns `false` out of bounds.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.cells[i] = cell;
            true
        } else {
            false
        }
    }

    /// One full row of cells, or `None` out of bounds.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            self.cells.get(start..start + usize::from(self.width))
        } else {
            None
        }
    }

    /// Paint a string starting at `(x, y)`, clipped at the right edge.
    ///
    /// Wide glyphs take two columns (character + continuation cell);
    /// zero-width characters are dropped. Returns the column after the
    /// last painted cell.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0) as u16;
            if w == 0 {
                continue;
            }
            if y >= self.height || col >= self.width || col + w > self.width {
                break;
            }
            self.set(col, y, Cell { ch, style });
            if w == 2 {
                self.set(col + 1, y, Cell::continuation(style));
            }
            col += w;
        }
        col
    }

    /// Fill a rectangle with one character, clipped to the frame.
    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: Style) {
        for row in y..y.saturating_add(h).min(self.height) {
            for col in x..x.saturating_add(w).min(self.width) {
                self.set(col, row, Cell { ch, style });
            }
        }
    }

    /// Copy another frame's cells into this one (dimensions must match).
    ///
    /// Used by the renderer to reuse its previous-frame allocation.
    pub fn copy_from(&mut self, other: &Self) {
        debug_assert_eq!(self.width, other.width);
        debug_assert_eq!(self.height, other.height);
        self.cells.copy_from_slice(&other.cells);
    }

    /// The characters of one row as a `String` (continuations dropped).
    ///
    /// A debugging and test helper — rendering goes through the renderer.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .map(|cells| {
                cells
                    .iter()
                    .filter(|c| !c.is_continuation())
                    .map(|c| c.ch)
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Style ─────────────────────────────────────────────────────

    #[test]
    fn plain_style_is_all_defaults() {
        assert_eq!(Style::PLAIN.fg, Color::Default);
        assert_eq!(Style::PLAIN.bg, Color::Default);
        assert!(Style::PLAIN.attrs.is_empty());
    }

    #[test]
    fn style_builders_compose() {
        let style = Style::fg(Color::Ansi256(3))
            .on(Color::Ansi256(0))
            .with(Attr::BOLD)
            .with(Attr::INVERSE);
        assert_eq!(style.fg, Color::Ansi256(3));
        assert_eq!(style.bg, Color::Ansi256(0));
        assert_eq!(style.attrs, Attr::BOLD | Attr::INVERSE);
    }

    // ── Frame basics ──────────────────────────────────────────────

    #[test]
    fn new_frame_is_blank() {
        let frame = Frame::new(4, 2);
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.get(3, 1), Some(&Cell::EMPTY));
    }

    #[test]
    fn get_out_of_bounds_is_none() {
        let frame = Frame::new(4, 2);
        assert_eq!(frame.get(4, 0), None);
        assert_eq!(frame.get(0, 2), None);
    }

    #[test]
    fn set_and_get() {
        let mut frame = Frame::new(4, 2);
        let cell = Cell {
            ch: 'x',
            style: Style::PLAIN,
        };
        assert!(frame.set(1, 1, cell));
        assert_eq!(frame.get(1, 1), Some(&cell));
    }

    #[test]
    fn set_out_of_bounds_is_rejected() {
        let mut frame = Frame::new(4, 2);
        assert!(!frame.set(9, 0, Cell::EMPTY));
    }

    #[test]
    fn clear_resets_all_cells() {
        let mut frame = Frame::new(3, 1);
        frame.put_str(0, 0, "abc", Style::PLAIN);
        frame.clear();
        assert_eq!(frame.row_text(0), "   ");
    }

    #[test]
    fn resize_clears_content() {
        let mut frame = Frame::new(3, 1);
        frame.put_str(0, 0, "abc", Style::PLAIN);
        frame.resize(5, 2);
        assert_eq!(frame.width(), 5);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.row_text(0), "     ");
    }

    // ── put_str ───────────────────────────────────────────────────

    #[test]
    fn put_str_writes_and_returns_next_column() {
        let mut frame = Frame::new(10, 1);
        let next = frame.put_str(2, 0, "abc", Style::PLAIN);
        assert_eq!(next, 5);
        assert_eq!(frame.row_text(0), "  abc     ");
    }

    #[test]
    fn put_str_clips_at_right_edge() {
        let mut frame = Frame::new(4, 1);
        frame.put_str(2, 0, "abcdef", Style::PLAIN);
        assert_eq!(frame.row_text(0), "  ab");
    }

    #[test]
    fn put_str_off_frame_row_is_a_no_op() {
        let mut frame = Frame::new(4, 1);
        let next = frame.put_str(0, 5, "abc", Style::PLAIN);
        assert_eq!(next, 0);
    }

    #[test]
    fn wide_glyph_occupies_two_columns() {
        let mut frame = Frame::new(6, 1);
        let next = frame.put_str(0, 0, "日x", Style::PLAIN);
        assert_eq!(next, 3);
        assert_eq!(frame.get(0, 0).unwrap().ch, '日');
        assert!(frame.get(1, 0).unwrap().is_continuation());
        assert_eq!(frame.get(2, 0).unwrap().ch, 'x');
    }

    #[test]
    fn wide_glyph_does_not_straddle_the_edge() {
        let mut frame = Frame::new(3, 1);
        frame.put_str(2, 0, "日", Style::PLAIN);
        assert_eq!(frame.get(2, 0), Some(&Cell::EMPTY));
    }

    #[test]
    fn calculator_symbols_are_single_width() {
        let mut frame = Frame::new(4, 1);
        let next = frame.put_str(0, 0, "×÷", Style::PLAIN);
        assert_eq!(next, 2);
    }

    // ── fill_rect ─────────────────────────────────────────────────

    #[test]
    fn fill_rect_fills_the_rectangle() {
        let mut frame = Frame::new(4, 3);
        frame.fill_rect(1, 1, 2, 2, '#', Style::PLAIN);
        assert_eq!(frame.row_text(0), "    ");
        assert_eq!(frame.row_text(1), " ## ");
        assert_eq!(frame.row_text(2), " ## ");
    }

    #[test]
    fn fill_rect_clips_to_frame() {
        let mut frame = Frame::new(3, 2);
        frame.fill_rect(2, 1, 10, 10, '#', Style::PLAIN);
        assert_eq!(frame.row_text(1), "  #");
    }

    // ── copy_from ─────────────────────────────────────────────────

    #[test]
    fn copy_from_duplicates_cells() {
        let mut a = Frame::new(3, 1);
        a.put_str(0, 0, "abc", Style::PLAIN);
        let mut b = Frame::new(3, 1);
        b.copy_from(&a);
        assert_eq!(a, b);
    }
}

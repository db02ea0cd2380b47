// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into structured key events. The calculator only
// listens to the keyboard, so the protocol surface is deliberately small:
//
// - Printable ASCII and multi-byte UTF-8 characters
// - Control characters (Enter, Tab, Backspace, Ctrl-chords)
// - Legacy CSI sequences (arrows, Home/End/Delete, xterm modifiers)
// - SS3 sequences (arrow/Home/End alternate encoding)
// - Alt+key (ESC followed by a printable character)
//
// The parser keeps a small internal byte buffer because escape sequences
// can span multiple `read()` calls. Feed bytes with [`Parser::advance`];
// after a timeout with no new bytes, call [`Parser::flush`] to emit a
// pending lone ESC as a real Escape keypress.
//
// CSI parameter numbers are decoded directly from `&[u8]` — no
// intermediate `String` allocation.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A keyboard event: key identity plus active modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key event with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A key event with modifiers.
    #[must_use]
    pub const fn with(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

/// Identity of a key.
///
/// Named keys have dedicated variants; printable characters use
/// [`Char`](KeyCode::Char).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A Unicode character (printable).
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Matches the xterm CSI modifier encoding (`param = 1 + bitmask`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Terminal input parser.
///
/// Feed raw bytes via [`advance`](Parser::advance) and collect
/// [`KeyEvent`]s. Incomplete sequences are buffered internally and resume
/// parsing when more bytes arrive.
///
/// # Escape vs escape-sequence ambiguity
///
/// A bare `ESC` byte (0x1B) could be a standalone Escape keypress or the
/// start of a multi-byte sequence. The parser holds it as pending; the
/// event loop calls [`flush`](Parser::flush) after a short timeout to
/// resolve it as a real Escape key.
pub struct Parser {
    /// Accumulated raw bytes waiting to be parsed.
    buf: Vec<u8>,
}

impl Parser {
    /// Create a new parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(32),
        }
    }

    /// Feed raw bytes from stdin and return all events that can be parsed.
    ///
    /// Bytes that form an incomplete sequence are kept and combined with
    /// future calls.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Key(key, consumed) => {
                    events.push(key);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }

        events
    }

    /// Are there unconsumed bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Flush pending bytes as literal key events.
    ///
    /// Called after a timeout to resolve the ESC ambiguity: a lone ESC
    /// becomes an Escape key event, and other leftover bytes become their
    /// literal keys.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        for &byte in &self.buf {
            let key = match byte {
                0x1B => KeyEvent::plain(KeyCode::Escape),
                0x00 => KeyEvent::with(KeyCode::Char('@'), Modifiers::CTRL),
                b @ 0x01..=0x1A => {
                    KeyEvent::with(KeyCode::Char((b + b'a' - 1) as char), Modifiers::CTRL)
                }
                0x7F => KeyEvent::plain(KeyCode::Backspace),
                b @ 0x20..=0x7E => KeyEvent::plain(KeyCode::Char(b as char)),
                _ => continue,
            };
            events.push(key);
        }
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────
//
// All parse functions are pure — they read from the slice and return what
// they found plus how many bytes to consume.

/// Result of trying to parse one event from the buffer.
enum Parsed {
    /// Successfully parsed a key, consuming `usize` bytes.
    Key(KeyEvent, usize),
    /// Sequence is incomplete — need more bytes.
    Incomplete,
    /// Unrecognized byte(s), skip `usize` bytes.
    Skip(usize),
}

/// Try to parse a single event from the start of `buf`.
fn try_parse(buf: &[u8]) -> Parsed {
    let Some(&first) = buf.first() else {
        return Parsed::Skip(0);
    };

    match first {
        // ESC — could be an escape sequence or a standalone Escape key.
        0x1B => parse_escape(buf),
        // Control characters.
        0x00 => Parsed::Key(ctrl(KeyCode::Char('@')), 1),
        b @ (0x01..=0x07 | 0x0B..=0x0C | 0x0E..=0x1A) => {
            Parsed::Key(ctrl(KeyCode::Char((b + b'a' - 1) as char)), 1)
        }
        0x08 | 0x7F => Parsed::Key(KeyEvent::plain(KeyCode::Backspace), 1),
        0x09 => Parsed::Key(KeyEvent::plain(KeyCode::Tab), 1),
        0x0A | 0x0D => Parsed::Key(KeyEvent::plain(KeyCode::Enter), 1),
        // ASCII printable.
        b @ 0x20..=0x7E => Parsed::Key(KeyEvent::plain(KeyCode::Char(b as char)), 1),
        // UTF-8 multi-byte.
        0xC0..=0xFF => parse_utf8(buf),
        // Bare continuation bytes (0x80..=0xBF) — invalid lead, skip.
        _ => Parsed::Skip(1),
    }
}

const fn ctrl(code: KeyCode) -> KeyEvent {
    KeyEvent::with(code, Modifiers::CTRL)
}

// ── Escape sequences ────────────────────────────────────────────────────────

fn parse_escape(buf: &[u8]) -> Parsed {
    debug_assert_eq!(buf[0], 0x1B);

    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        // CSI: ESC [
        b'[' => parse_csi(buf),
        // SS3: ESC O
        b'O' => parse_ss3(buf),
        // Alt+ESC.
        0x1B => Parsed::Key(
            KeyEvent::with(KeyCode::Escape, Modifiers::ALT),
            2,
        ),
        // Alt+printable character.
        b @ 0x20..=0x7E => Parsed::Key(
            KeyEvent::with(KeyCode::Char(b as char), Modifiers::ALT),
            2,
        ),
        // Unknown byte after ESC — emit standalone Escape.
        _ => Parsed::Key(KeyEvent::plain(KeyCode::Escape), 1),
    }
}

// ── CSI (Control Sequence Introducer) ───────────────────────────────────────

fn parse_csi(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'[');

    // Scan for the final byte (0x40..=0x7E). Everything between the CSI
    // introducer and the final byte is parameter/intermediate bytes.
    let Some(offset) = buf[2..].iter().position(|b| (0x40..=0x7E).contains(b)) else {
        return Parsed::Incomplete;
    };

    let final_byte = buf[2 + offset];
    let params = &buf[2..2 + offset];
    let len = 3 + offset;

    let modifiers = csi_modifiers(params);

    let code = match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'~' => match first_param(params) {
            Some(1 | 7) => KeyCode::Home,
            Some(3) => KeyCode::Delete,
            Some(4 | 8) => KeyCode::End,
            _ => return Parsed::Skip(len),
        },
        _ => return Parsed::Skip(len),
    };

    Parsed::Key(KeyEvent::with(code, modifiers), len)
}

/// The first semicolon-separated CSI parameter as a number.
fn first_param(params: &[u8]) -> Option<u16> {
    let digits = params.split(|&b| b == b';').next()?;
    parse_u16(digits)
}

/// Modifiers from the second CSI parameter (xterm: `param = 1 + bitmask`).
fn csi_modifiers(params: &[u8]) -> Modifiers {
    let Some(digits) = params.split(|&b| b == b';').nth(1) else {
        return Modifiers::empty();
    };
    parse_u16(digits).map_or(Modifiers::empty(), |param| {
        let bits = param.saturating_sub(1);
        Modifiers::from_bits_truncate(bits.min(255) as u8)
    })
}

/// Decode an ASCII digit run. `None` if empty or non-digit.
fn parse_u16(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let mut n: u16 = 0;
    for &b in digits {
        n = n.checked_mul(10)?.checked_add(u16::from(b - b'0'))?;
    }
    Some(n)
}

// ── SS3 ─────────────────────────────────────────────────────────────────────

fn parse_ss3(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'O');

    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    let code = match buf[2] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return Parsed::Skip(3),
    };

    Parsed::Key(KeyEvent::plain(code), 3)
}

// ── UTF-8 ───────────────────────────────────────────────────────────────────

fn parse_utf8(buf: &[u8]) -> Parsed {
    let len = match buf[0] {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        // Overlong or invalid lead byte.
        _ => return Parsed::Skip(1),
    };

    if buf.len() < len {
        return Parsed::Incomplete;
    }

    std::str::from_utf8(&buf[..len]).map_or(Parsed::Skip(1), |s| {
        s.chars().next().map_or(Parsed::Skip(1), |ch| {
            Parsed::Key(KeyEvent::plain(KeyCode::Char(ch)), len)
        })
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(bytes: &[u8]) -> Vec<KeyEvent> {
        Parser::new().advance(bytes)
    }

    // ── Plain characters ──────────────────────────────────────────

    #[test]
    fn digits_parse_as_chars() {
        let events = parse(b"42");
        assert_eq!(
            events,
            vec![
                KeyEvent::plain(KeyCode::Char('4')),
                KeyEvent::plain(KeyCode::Char('2')),
            ]
        );
    }

    #[test]
    fn operators_parse_as_chars() {
        let events = parse(b"+-*/.=");
        let chars: Vec<char> = events
            .iter()
            .map(|e| match e.code {
                KeyCode::Char(c) => c,
                _ => panic!("expected Char"),
            })
            .collect();
        assert_eq!(chars, vec!['+', '-', '*', '/', '.', '=']);
    }

    // ── Named keys ────────────────────────────────────────────────

    #[test]
    fn enter_from_cr_and_lf() {
        assert_eq!(parse(b"\r"), vec![KeyEvent::plain(KeyCode::Enter)]);
        assert_eq!(parse(b"\n"), vec![KeyEvent::plain(KeyCode::Enter)]);
    }

    #[test]
    fn backspace_from_del_and_bs() {
        assert_eq!(parse(b"\x7f"), vec![KeyEvent::plain(KeyCode::Backspace)]);
        assert_eq!(parse(b"\x08"), vec![KeyEvent::plain(KeyCode::Backspace)]);
    }

    #[test]
    fn tab_parses() {
        assert_eq!(parse(b"\t"), vec![KeyEvent::plain(KeyCode::Tab)]);
    }

    // ── Control chords ────────────────────────────────────────────

    #[test]
    fn ctrl_c_parses() {
        assert_eq!(
            parse(b"\x03"),
            vec![KeyEvent::with(KeyCode::Char('c'), Modifiers::CTRL)]
        );
    }

    #[test]
    fn ctrl_q_parses() {
        assert_eq!(
            parse(b"\x11"),
            vec![KeyEvent::with(KeyCode::Char('q'), Modifiers::CTRL)]
        );
    }

    // ── Escape handling ───────────────────────────────────────────

    #[test]
    fn lone_esc_is_held_pending() {
        let mut parser = Parser::new();
        assert_eq!(parser.advance(b"\x1b"), vec![]);
        assert!(parser.has_pending());
    }

    #[test]
    fn flush_resolves_pending_esc_as_escape() {
        let mut parser = Parser::new();
        parser.advance(b"\x1b");
        assert_eq!(parser.flush(), vec![KeyEvent::plain(KeyCode::Escape)]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn alt_char_parses() {
        assert_eq!(
            parse(b"\x1bq"),
            vec![KeyEvent::with(KeyCode::Char('q'), Modifiers::ALT)]
        );
    }

    // ── CSI sequences ─────────────────────────────────────────────

    #[test]
    fn arrow_keys() {
        assert_eq!(parse(b"\x1b[A"), vec![KeyEvent::plain(KeyCode::Up)]);
        assert_eq!(parse(b"\x1b[B"), vec![KeyEvent::plain(KeyCode::Down)]);
        assert_eq!(parse(b"\x1b[C"), vec![KeyEvent::plain(KeyCode::Right)]);
        assert_eq!(parse(b"\x1b[D"), vec![KeyEvent::plain(KeyCode::Left)]);
    }

    #[test]
    fn home_and_end() {
        assert_eq!(parse(b"\x1b[H"), vec![KeyEvent::plain(KeyCode::Home)]);
        assert_eq!(parse(b"\x1b[F"), vec![KeyEvent::plain(KeyCode::End)]);
        assert_eq!(parse(b"\x1b[1~"), vec![KeyEvent::plain(KeyCode::Home)]);
        assert_eq!(parse(b"\x1b[4~"), vec![KeyEvent::plain(KeyCode::End)]);
    }

    #[test]
    fn delete_key() {
        assert_eq!(parse(b"\x1b[3~"), vec![KeyEvent::plain(KeyCode::Delete)]);
    }

    #[test]
    fn csi_with_modifiers() {
        assert_eq!(
            parse(b"\x1b[1;5C"),
            vec![KeyEvent::with(KeyCode::Right, Modifiers::CTRL)]
        );
        assert_eq!(
            parse(b"\x1b[1;2A"),
            vec![KeyEvent::with(KeyCode::Up, Modifiers::SHIFT)]
        );
    }

    #[test]
    fn unknown_csi_is_skipped() {
        assert_eq!(parse(b"\x1b[5~7"), vec![KeyEvent::plain(KeyCode::Char('7'))]);
    }

    #[test]
    fn partial_csi_is_held_pending() {
        let mut parser = Parser::new();
        assert_eq!(parser.advance(b"\x1b["), vec![]);
        assert!(parser.has_pending());
        assert_eq!(parser.advance(b"A"), vec![KeyEvent::plain(KeyCode::Up)]);
    }

    // ── SS3 sequences ─────────────────────────────────────────────

    #[test]
    fn ss3_arrows() {
        assert_eq!(parse(b"\x1bOA"), vec![KeyEvent::plain(KeyCode::Up)]);
        assert_eq!(parse(b"\x1bOD"), vec![KeyEvent::plain(KeyCode::Left)]);
    }

    // ── UTF-8 ─────────────────────────────────────────────────────

    #[test]
    fn multiplication_sign_parses() {
        // '×' is 0xC3 0x97 in UTF-8.
        assert_eq!(
            parse("×".as_bytes()),
            vec![KeyEvent::plain(KeyCode::Char('×'))]
        );
    }

    #[test]
    fn division_sign_parses() {
        assert_eq!(
            parse("÷".as_bytes()),
            vec![KeyEvent::plain(KeyCode::Char('÷'))]
        );
    }

    #[test]
    fn utf8_split_across_reads() {
        let bytes = "÷".as_bytes();
        let mut parser = Parser::new();
        assert_eq!(parser.advance(&bytes[..1]), vec![]);
        assert_eq!(
            parser.advance(&bytes[1..]),
            vec![KeyEvent::plain(KeyCode::Char('÷'))]
        );
    }

    #[test]
    fn stray_continuation_byte_is_skipped() {
        assert_eq!(parse(b"\x80" as &[u8]), vec![]);
    }

    #[test]
    fn mixed_sequence_parses_in_order() {
        let events = parse(b"7\r\x1b[3~");
        assert_eq!(
            events,
            vec![
                KeyEvent::plain(KeyCode::Char('7')),
                KeyEvent::plain(KeyCode::Enter),
                KeyEvent::plain(KeyCode::Delete),
            ]
        );
    }
}

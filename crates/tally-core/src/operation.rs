//! The four binary operations.
//!
//! An [`Operation`] is pure data plus arithmetic — which operator is
//! pending, how it renders, and how it combines two operands. Key dispatch
//! lives in the presentation layer; this enum just maps between input
//! characters, display symbols, and the computation itself.

use std::fmt;

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// A pending arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `×` (typed as `*`)
    Multiply,
    /// `÷` (typed as `/`)
    Divide,
}

impl Operation {
    /// The symbol shown in the operation display.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '×',
            Self::Divide => '÷',
        }
    }

    /// Map an input character to its operation.
    ///
    /// Accepts both the ASCII keyboard form (`*`, `/`) and the display
    /// symbol (`×`, `÷`), so pasted or IME-composed symbols behave like
    /// their key equivalents. Returns `None` for anything else.
    #[must_use]
    pub const fn from_key(key: char) -> Option<Self> {
        match key {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' | '×' => Some(Self::Multiply),
            '/' | '÷' => Some(Self::Divide),
            _ => None,
        }
    }

    /// Apply the operation: `lhs <op> rhs`.
    ///
    /// Operand order matters for `Subtract` and `Divide` — the left-hand
    /// side is the operand captured first. Division by zero follows IEEE
    /// semantics and yields an infinity or NaN, never an error.
    #[must_use]
    pub const fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => lhs / rhs,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- Symbols ------------------------------------------------------------

    #[test]
    fn symbols() {
        assert_eq!(Operation::Add.symbol(), '+');
        assert_eq!(Operation::Subtract.symbol(), '-');
        assert_eq!(Operation::Multiply.symbol(), '×');
        assert_eq!(Operation::Divide.symbol(), '÷');
    }

    #[test]
    fn display_matches_symbol() {
        assert_eq!(format!("{}", Operation::Multiply), "×");
        assert_eq!(format!("{}", Operation::Add), "+");
    }

    // -- Key mapping --------------------------------------------------------

    #[test]
    fn ascii_keys_map() {
        assert_eq!(Operation::from_key('+'), Some(Operation::Add));
        assert_eq!(Operation::from_key('-'), Some(Operation::Subtract));
        assert_eq!(Operation::from_key('*'), Some(Operation::Multiply));
        assert_eq!(Operation::from_key('/'), Some(Operation::Divide));
    }

    #[test]
    fn display_symbols_map_too() {
        assert_eq!(Operation::from_key('×'), Some(Operation::Multiply));
        assert_eq!(Operation::from_key('÷'), Some(Operation::Divide));
    }

    #[test]
    fn other_keys_do_not_map() {
        assert_eq!(Operation::from_key('='), None);
        assert_eq!(Operation::from_key('5'), None);
        assert_eq!(Operation::from_key('x'), None);
    }

    // -- Arithmetic ---------------------------------------------------------

    #[test]
    fn apply_respects_operand_order() {
        assert_eq!(Operation::Subtract.apply(10.0, 3.0), 7.0);
        assert_eq!(Operation::Divide.apply(10.0, 4.0), 2.5);
    }

    #[test]
    fn apply_commutative_operations() {
        assert_eq!(Operation::Add.apply(2.0, 3.0), 5.0);
        assert_eq!(Operation::Multiply.apply(2.0, 3.0), 6.0);
    }

    #[test]
    fn divide_by_zero_is_infinite() {
        assert!(Operation::Divide.apply(5.0, 0.0).is_infinite());
        assert!(Operation::Divide.apply(-5.0, 0.0).is_infinite());
    }

    #[test]
    fn zero_over_zero_is_nan() {
        assert!(Operation::Divide.apply(0.0, 0.0).is_nan());
    }
}

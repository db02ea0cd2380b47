//! The accumulator — two operands and one pending operation.
//!
//! This is the calculator's entire state machine. There is no explicit
//! state enum; the states are the implicit combinations of (operation set
//! or not) × (secondary operand set or not):
//!
//! | operation | secondary | meaning                                |
//! |-----------|-----------|----------------------------------------|
//! | `None`    | `None`    | typing the first number                |
//! | `Some`    | `Some`    | first number captured, typing the next |
//!
//! The other two combinations cannot be constructed: [`choose_operation`]
//! sets both fields together and [`clear`]/[`evaluate`] reset both.
//!
//! [`choose_operation`]: Accumulator::choose_operation
//! [`clear`]: Accumulator::clear
//! [`evaluate`]: Accumulator::evaluate

use crate::operand::Operand;
use crate::operation::Operation;

/// Decimal digits of precision kept after an evaluation.
///
/// `0.1 + 0.2` is `0.30000000000000004` in raw IEEE-754; snapping results
/// to 12 decimal digits hides the representation noise without losing any
/// precision a calculator user can see.
const RESULT_SCALE: f64 = 1e12;

/// Round an evaluation result to 12 decimal digits.
///
/// Non-finite values pass through unchanged: an infinity stays infinite
/// and a NaN stays NaN, matching the everything-is-a-result error model.
fn round_result(value: f64) -> f64 {
    (value * RESULT_SCALE).round() / RESULT_SCALE
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// The calculator state: primary operand, secondary operand, pending
/// operation.
///
/// The *primary* operand is the number currently being typed. Choosing an
/// operation moves it into the *secondary* slot (the eventual left-hand
/// side) and resets the primary for the next number. Evaluation computes
/// `secondary <op> primary`, resets everything, and leaves the rounded
/// result as the new primary.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    primary: Operand,
    secondary: Option<f64>,
    operation: Option<Operation>,
}

impl Accumulator {
    /// A cleared accumulator: primary `0`, no secondary, no operation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The operand currently being typed.
    #[inline]
    #[must_use]
    pub const fn primary(&self) -> &Operand {
        &self.primary
    }

    /// The captured left-hand operand, if an operation is pending.
    #[inline]
    #[must_use]
    pub const fn secondary(&self) -> Option<f64> {
        self.secondary
    }

    /// The pending operation, if one has been chosen.
    #[inline]
    #[must_use]
    pub const fn operation(&self) -> Option<Operation> {
        self.operation
    }

    /// Append a digit or decimal point to the primary operand.
    ///
    /// See [`Operand::push`] for the editing rules; everything outside
    /// `0`–`9` and `.` is a silent no-op.
    pub fn append_digit(&mut self, token: char) {
        self.primary.push(token);
    }

    /// Delete the last character of the primary operand, clamping at `0`.
    pub fn delete_digit(&mut self) {
        self.primary.pop();
    }

    /// Choose the pending operation.
    ///
    /// The first chosen operation is sticky: if one is already pending,
    /// this call has no effect — the operand capture below must happen
    /// exactly once per evaluation. Otherwise the primary operand moves
    /// into the secondary slot and the primary resets to `0` for the next
    /// number.
    pub fn choose_operation(&mut self, operation: Operation) {
        if self.operation.is_some() {
            return;
        }
        self.operation = Some(operation);
        self.secondary = Some(self.primary.value());
        self.primary = Operand::new();
    }

    /// Evaluate `secondary <op> primary` and reset.
    ///
    /// With no pending operation this is a no-op returning `None`. The
    /// result is rounded to 12 decimal digits, the accumulator resets to
    /// its cleared state, and the rounded result becomes the new primary
    /// operand. Division by zero is not an error — the result is simply
    /// infinite (or NaN for `0 ÷ 0`).
    pub fn evaluate(&mut self) -> Option<f64> {
        let operation = self.operation?;
        let lhs = self.secondary?;
        let rhs = self.primary.value();

        let result = round_result(operation.apply(lhs, rhs));

        self.clear();
        self.primary = Operand::from_value(result);
        Some(result)
    }

    /// Reset to the cleared state: primary `0`, no secondary, no operation.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

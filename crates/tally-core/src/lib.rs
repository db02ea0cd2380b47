//! # tally-core — Calculator core for tally
//!
//! This crate contains the arithmetic heart of the calculator:
//!
//! - **[`operand`]** — `Operand`, the primary operand as an editable text buffer
//! - **[`operation`]** — the four binary operations and their key/symbol mapping
//! - **[`accumulator`]** — `Accumulator`, the two-operand state machine
//! - **[`format`]** — thousands-grouped display formatting
//!
//! Nothing here touches a terminal. The presentation layer owns an
//! [`accumulator::Accumulator`], feeds it tokens, and reads state back for
//! rendering — state representation stays decoupled from the screen.

pub mod accumulator;
pub mod format;
pub mod operand;
pub mod operation;

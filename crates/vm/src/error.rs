//! Terminal run-time faults.
//!
//! Every fault ends the run: the machine puts itself back in the idle
//! state, and the next `step` or `run` starts the program over. Variants
//! carry the offending instruction's 1-based source line, except
//! [`Fault::PcOutOfBounds`], where no instruction exists to blame and the
//! escaping index is reported instead.

use thiserror::Error;

/// A terminal fault raised while executing a validated program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    /// An access left the flat memory, reached through an unresolved
    /// variable binding, or overran a stack limit (argument-stack
    /// underflow included).
    #[error("line {line}: memory access out of range")]
    MemoryFault { line: u32 },

    /// The instruction pointer left `[0, program length)`.
    #[error("instruction pointer out of bounds: {pc}")]
    PcOutOfBounds { pc: usize },

    /// A division's resolved divisor was zero.
    #[error("line {line}: division by zero")]
    DivideByZero { line: u32 },

    /// `READ` could not obtain an integer from the input source.
    #[error("line {line}: no integer available to READ")]
    ReadFailed { line: u32 },
}

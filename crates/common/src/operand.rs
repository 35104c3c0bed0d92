//! Operand addressing modes.
//!
//! The IR has four ways to read a value and two ways to name a write
//! target. Address-of and dereference are what make arrays usable: a
//! `DEC` block is reached by taking `&base`, doing arithmetic on the
//! address, and reading or writing through `*ptr`.

use crate::symbol::SymId;

/// A readable operand, resolved to an `i32` at execution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// `#N` — the literal itself.
    Imm(i32),
    /// `x` — the word stored in the variable's cell.
    Var(SymId),
    /// `&x` — the variable's byte address.
    AddrOf(SymId),
    /// `*x` — the word in the cell addressed by the variable's value.
    Deref(SymId),
}

/// An assignment destination.
///
/// Literals and `&x` are not assignable, so this is narrower than
/// [`Operand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dest {
    /// `x` — write the variable's own cell.
    Var(SymId),
    /// `*x` — write the cell addressed by the variable's value.
    Deref(SymId),
}

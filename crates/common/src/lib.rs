//! Shared data model for the tacsim three-address IR.
//!
//! This crate provides the foundational data structures used by the
//! loader and the execution engine:
//!
//! - [`Instruction`] — the validated instruction forms
//! - [`Operand`] / [`Dest`] — addressing modes for reads and writes
//! - [`Relop`] / [`BinOp`] — the comparison and arithmetic operator sets
//! - [`SymbolTable`] / [`VarInfo`] — interned variables and their bindings
//! - [`Program`] — a validated program: instructions plus tables
//!
//! # Dependencies
//!
//! This crate has no runtime dependencies.

pub mod instruction;
pub mod operand;
pub mod ops;
pub mod program;
pub mod symbol;

// Re-export commonly used types at the crate root.
pub use instruction::Instruction;
pub use operand::{Dest, Operand};
pub use ops::{BinOp, Relop};
pub use program::{FuncId, FunctionInfo, Program, MEMORY_BYTES, MEMORY_WORDS, WORD_BYTES};
pub use symbol::{SymId, SymbolTable, VarInfo};

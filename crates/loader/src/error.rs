//! Error types for the loader.

use thiserror::Error;

/// Errors produced while loading IR source text.
///
/// The first error aborts the whole load; no partially validated program
/// ever escapes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The line does not match any recognized instruction form.
    #[error("line {line}: syntax error: {text}")]
    Syntax { line: u32, text: String },

    /// A `LABEL` or `FUNCTION` name was declared twice.
    #[error("line {line}: duplicated label '{name}'")]
    DuplicateLabel { line: u32, name: String },

    /// A `DEC` re-declared an existing variable.
    #[error("line {line}: duplicated variable '{name}'")]
    DuplicateVariable { line: u32, name: String },

    /// A jump or call names a label that is never declared.
    #[error("line {line}: undefined label '{name}'")]
    UndefinedLabel { line: u32, name: String },

    /// An instruction appeared before any `FUNCTION` opened a scope.
    #[error("line {line}: instruction belongs to no function: {text}")]
    OutOfScope { line: u32, text: String },

    /// No `FUNCTION main :` was declared.
    #[error("program has no 'main' function")]
    MissingEntry,

    /// Static storage for the entry function exceeds memory capacity.
    #[error("static allocation of {requested} bytes exceeds the {limit}-byte memory")]
    AllocationOverflow { requested: u64, limit: u32 },
}

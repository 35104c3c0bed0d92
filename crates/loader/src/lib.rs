//! Validating loader for the tacsim three-address IR.
//!
//! [`load`] turns source text into a validated
//! [`Program`](tacsim_common::Program) in two passes. The first pass
//! walks the source line by line: it rejects malformed lines, interns
//! variables (assigning static offsets inside `main`), records labels and
//! functions, and leaves a fixup behind for every jump and call target.
//! The second pass resolves those fixups against the completed tables and
//! applies the whole-program checks (a `main` entry exists, static
//! storage fits in memory).
//!
//! Validation is all-or-nothing: the first fault aborts the load, and a
//! returned program is guaranteed to have every jump target pointing at a
//! label, every call target naming a declared function, and every
//! entry-function variable bound to a static offset.
//!
//! # Usage
//!
//! ```
//! let program = tacsim_loader::load("FUNCTION main :\nx := #1\nRETURN x\n").unwrap();
//! assert_eq!(program.len(), 3);
//! assert_eq!(program.entry, 0);
//! ```

pub mod error;

mod builder;
mod parse;

pub use error::LoadError;

use builder::Builder;
use tacsim_common::Program;

/// Load and validate IR source text.
///
/// Lines are split on whitespace; whitespace-only lines carry no
/// instruction and are skipped. Reported line numbers are 1-based
/// positions in `source`, blank lines included.
///
/// # Errors
///
/// Returns the first [`LoadError`] encountered: per-line faults in source
/// order, then unresolved jump/call targets in source order, then the
/// missing-entry and allocation-ceiling checks.
pub fn load(source: &str) -> Result<Program, LoadError> {
    let mut builder = Builder::new();

    for (idx, raw) in source.lines().enumerate() {
        let line = idx as u32 + 1;
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        let text = tokens.join(" ");
        let parsed = parse::parse_line(&tokens, line, &text)?;
        builder.consume(line, &text, parsed)?;
    }

    builder.finish()
}

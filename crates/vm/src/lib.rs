//! Execution engine for the tacsim three-address IR.
//!
//! A [`Machine`] borrows a validated
//! [`Program`](tacsim_common::Program) and owns all run-time state:
//! - A flat memory of 262144 word cells shared by every scope
//! - A call stack of activation records with bump-allocated frames
//! - A single argument stack bridging `ARG` and `PARAM`
//!
//! Drive it with [`Machine::run`] (reset, then execute to completion) or
//! [`Machine::step`] (one instruction at a time, re-arming after any
//! terminal state). `READ` and `WRITE` go through the [`io`] collaborator
//! traits, never directly to stdio.
//!
//! # Usage
//!
//! ```
//! use tacsim_vm::io::{ReadInput, WriteOutput};
//!
//! let program = tacsim_loader::load(
//!     "FUNCTION main :\nx := #2\ny := #3\nz := x + y\nWRITE z\nRETURN x\n",
//! )
//! .unwrap();
//!
//! let mut output = WriteOutput::new(Vec::new());
//! let executed = tacsim_vm::run(
//!     &program,
//!     &mut ReadInput::new(&b""[..]),
//!     &mut output,
//! )
//! .unwrap();
//! assert_eq!(executed, 5);
//! assert_eq!(output.into_inner(), b"5\n");
//! ```

pub mod error;
pub mod execute;
pub mod io;
pub mod machine;

pub use error::Fault;
pub use execute::Step;
pub use machine::Machine;

use io::{Input, Output};
use tacsim_common::Program;

/// Execute a program to completion on a fresh machine.
///
/// Returns the number of instructions executed.
///
/// # Errors
///
/// Returns the first [`Fault`] (out-of-range access, escaped instruction
/// pointer, division by zero, or failed `READ`).
pub fn run(program: &Program, input: &mut dyn Input, output: &mut dyn Output) -> Result<u64, Fault> {
    let mut machine = Machine::new(program);
    machine.run(input, output)
}

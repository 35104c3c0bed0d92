//! The validated instruction forms.
//!
//! Instructions come out of the loader with every cross-reference already
//! resolved: jump targets are instruction indices into the program (each
//! guaranteed to point at an [`Instruction::Label`]) and call targets are
//! ids into the program's function table. Label and variable *names* live
//! in the program's tables, not here, which keeps instructions `Copy`.

use crate::operand::{Dest, Operand};
use crate::ops::{BinOp, Relop};
use crate::program::FuncId;
use crate::symbol::SymId;

/// One validated IR instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `LABEL name :` or `FUNCTION name :` — holds a position in the
    /// stream; executing it does nothing.
    Label,
    /// `GOTO label` — unconditional jump.
    Goto { target: usize },
    /// `IF lhs op rhs GOTO label` — conditional jump.
    If {
        lhs: Operand,
        op: Relop,
        rhs: Operand,
        target: usize,
    },
    /// `RETURN operand` — leave the current function, or exit the program
    /// from the bottom frame.
    Return { value: Operand },
    /// `READ var` — store the next integer from the input source.
    Read { dest: SymId },
    /// `WRITE operand` — emit the resolved value to the output sink.
    Write { value: Operand },
    /// `ARG operand` — push a call argument.
    Arg { value: Operand },
    /// `PARAM var` — pop a call argument into `var`.
    Param { dest: SymId },
    /// `DEC name size` — storage declaration, consumed at load time;
    /// executing it does nothing.
    Dec,
    /// `dest := src` — copy.
    Move { dest: Dest, src: Operand },
    /// `dest := lhs op rhs` — arithmetic.
    Arith {
        dest: Dest,
        lhs: Operand,
        op: BinOp,
        rhs: Operand,
    },
    /// `dest := CALL function` — push a frame and enter the callee.
    Call { dest: Dest, func: FuncId },
}

impl Instruction {
    /// Whether executing this instruction counts toward the
    /// executed-instruction total. Position holders (`Label`) and
    /// load-time declarations (`Dec`) do not.
    pub fn is_countable(&self) -> bool {
        !matches!(self, Instruction::Label | Instruction::Dec)
    }
}

//! The validated program: instruction stream plus the tables built at
//! load time.
//!
//! A [`Program`] is immutable once the loader hands it out. The engine
//! never mutates it; it copies the load-time variable bindings into its
//! own state and relocates those copies as calls and returns happen.

use std::collections::HashMap;

use crate::instruction::Instruction;
use crate::symbol::{SymId, SymbolTable};

/// Bytes per memory word.
pub const WORD_BYTES: u32 = 4;

/// Word cells in flat memory.
pub const MEMORY_WORDS: usize = 262_144;

/// Total addressable bytes; also the ceiling for static allocation.
pub const MEMORY_BYTES: u32 = MEMORY_WORDS as u32 * WORD_BYTES;

/// Identifies a function. Indexes [`Program::functions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncId(pub u32);

impl FuncId {
    /// The table index this id denotes.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Per-function metadata needed to relocate its frame at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    /// The declared name.
    pub name: String,
    /// Instruction index of the `FUNCTION name :` line.
    pub entry: usize,
    /// Variables first mentioned inside this function, in mention order.
    /// These are the symbols a call relocates and a return restores.
    pub vars: Vec<SymId>,
}

/// A validated program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// The instruction stream, indexed by instruction pointer.
    pub code: Vec<Instruction>,
    /// 1-based source line number of each instruction.
    pub lines: Vec<u32>,
    /// Whitespace-normalized source text of each instruction.
    pub text: Vec<String>,
    /// Label name to instruction index. `FUNCTION` names are included.
    pub labels: HashMap<String, usize>,
    /// Functions in declaration order, indexed by [`FuncId`].
    pub functions: Vec<FunctionInfo>,
    /// Every variable's name and load-time binding.
    pub symbols: SymbolTable,
    /// Instruction index of `FUNCTION main :`.
    pub entry: usize,
    /// Function-table id of the entry function.
    pub entry_func: FuncId,
    /// Bytes of static storage assigned to entry-function variables.
    pub static_size: u32,
}

impl Program {
    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Look up a function by name.
    pub fn function(&self, name: &str) -> Option<FuncId> {
        self.functions
            .iter()
            .position(|f| f.name == name)
            .map(|i| FuncId(i as u32))
    }

    /// The function behind an id.
    pub fn func(&self, id: FuncId) -> &FunctionInfo {
        &self.functions[id.index()]
    }
}

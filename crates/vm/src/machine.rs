//! Engine state: flat memory, live bindings, call and argument stacks.

use tacsim_common::{Dest, FuncId, Operand, Program, SymId, VarInfo, MEMORY_WORDS, WORD_BYTES};

use crate::error::Fault;

/// Deepest call nesting the engine will enter before faulting.
pub const MAX_CALL_DEPTH: usize = 65_536;

/// Most pending (pushed, not yet popped) call arguments.
pub const MAX_ARG_DEPTH: usize = 65_536;

/// One activation record.
#[derive(Debug, Clone)]
pub struct CallFrame {
    /// Index of the `CALL` instruction; control resumes just past it.
    pub return_ip: usize,
    /// Caller-side destination for the return value.
    pub dest: Dest,
    /// The function this frame belongs to.
    pub func: FuncId,
    /// Bindings as they were before this call relocated the callee's
    /// variables, in the callee's first-mention order.
    pub saved: Vec<(SymId, VarInfo)>,
    /// Allocation cursor before the call.
    pub saved_cursor: u32,
}

/// The execution engine for one validated program.
///
/// The machine owns every piece of run-time state; the program stays
/// immutable and shared. [`Machine::reset`] returns the engine to the
/// idle state: memory zeroed, stacks cleared, bindings and cursor back to
/// their load-time values.
pub struct Machine<'a> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    /// Flat word-cell memory.
    pub(crate) memory: Vec<i32>,
    /// Live storage binding per variable, indexed by `SymId`. Starts as a
    /// copy of the load-time table; calls relocate entries and returns
    /// restore them.
    pub(crate) bindings: Vec<VarInfo>,
    /// Activation records, innermost last.
    pub(crate) call_stack: Vec<CallFrame>,
    /// The shared argument stack: `ARG` pushes, `PARAM` pops.
    pub(crate) arg_stack: Vec<i32>,
    /// Bump cursor for activation-relative storage, in bytes. Only grows
    /// within a call; returns wind it back to the caller's value.
    pub(crate) cursor: u32,
    /// Next instruction to execute; `None` while idle.
    pub(crate) ip: Option<usize>,
    /// Instructions executed since the last reset. Labels and
    /// declarations do not count.
    pub(crate) executed: u64,
}

impl<'a> Machine<'a> {
    /// Create an idle machine for the given program.
    pub fn new(program: &'a Program) -> Self {
        Self {
            program,
            memory: vec![0; MEMORY_WORDS],
            bindings: program.symbols.infos().to_vec(),
            call_stack: Vec::new(),
            arg_stack: Vec::new(),
            cursor: program.static_size,
            ip: None,
            executed: 0,
        }
    }

    /// Return to the idle state, discarding all run-time progress.
    pub fn reset(&mut self) {
        self.memory.fill(0);
        self.bindings.clear();
        self.bindings.extend_from_slice(self.program.symbols.infos());
        self.call_stack.clear();
        self.arg_stack.clear();
        self.cursor = self.program.static_size;
        self.ip = None;
        self.executed = 0;
    }

    /// Index of the next instruction to execute, or `None` while idle.
    pub fn ip(&self) -> Option<usize> {
        self.ip
    }

    /// Instructions executed since the last reset.
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Call nesting depth: 0 while in the entry frame.
    pub fn depth(&self) -> usize {
        self.call_stack.len()
    }

    /// Name of the function whose frame is live. The bottom frame always
    /// belongs to the entry function.
    pub fn current_function(&self) -> &str {
        let id = match self.call_stack.last() {
            Some(frame) => frame.func,
            None => self.program.entry_func,
        };
        &self.program.func(id).name
    }

    /// Byte address of a variable's cell in the live frame.
    fn addr_of(&self, id: SymId, line: u32) -> Result<u32, Fault> {
        self.bindings[id.index()]
            .offset
            .ok_or(Fault::MemoryFault { line })
    }

    /// Read the word at a byte address.
    pub(crate) fn load_word(&self, addr: i64, line: u32) -> Result<i32, Fault> {
        if addr < 0 {
            return Err(Fault::MemoryFault { line });
        }
        let cell = (addr / i64::from(WORD_BYTES)) as usize;
        self.memory
            .get(cell)
            .copied()
            .ok_or(Fault::MemoryFault { line })
    }

    /// Write the word at a byte address.
    pub(crate) fn store_word(&mut self, addr: i64, value: i32, line: u32) -> Result<(), Fault> {
        if addr < 0 {
            return Err(Fault::MemoryFault { line });
        }
        let cell = (addr / i64::from(WORD_BYTES)) as usize;
        match self.memory.get_mut(cell) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Fault::MemoryFault { line }),
        }
    }

    /// Resolve a readable operand to its value.
    pub(crate) fn resolve(&self, operand: Operand, line: u32) -> Result<i32, Fault> {
        match operand {
            Operand::Imm(value) => Ok(value),
            Operand::AddrOf(id) => Ok(self.addr_of(id, line)? as i32),
            Operand::Var(id) => {
                let addr = self.addr_of(id, line)?;
                self.load_word(i64::from(addr), line)
            }
            Operand::Deref(id) => {
                let addr = self.addr_of(id, line)?;
                let pointer = self.load_word(i64::from(addr), line)?;
                self.load_word(i64::from(pointer), line)
            }
        }
    }

    /// Write a value through an assignment destination.
    pub(crate) fn store(&mut self, dest: Dest, value: i32, line: u32) -> Result<(), Fault> {
        match dest {
            Dest::Var(id) => {
                let addr = self.addr_of(id, line)?;
                self.store_word(i64::from(addr), value, line)
            }
            Dest::Deref(id) => {
                let addr = self.addr_of(id, line)?;
                let pointer = self.load_word(i64::from(addr), line)?;
                self.store_word(i64::from(pointer), value, line)
            }
        }
    }

    /// Bump-allocate `size` bytes, returning the block's base offset.
    pub(crate) fn alloc(&mut self, size: u32) -> u32 {
        let at = self.cursor;
        self.cursor = self.cursor.saturating_add(size);
        at
    }
}

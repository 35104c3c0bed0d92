//! The dispatch loop: instruction semantics, one step at a time.

use tacsim_common::{Dest, FuncId, Instruction, Operand, VarInfo};

use crate::error::Fault;
use crate::io::{Input, Output};
use crate::machine::{CallFrame, Machine, MAX_ARG_DEPTH, MAX_CALL_DEPTH};

/// Outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// More instructions remain; step again to make progress.
    Continue,
    /// A `RETURN` executed on the bottom frame; the run is complete.
    Exited,
}

/// Where control goes after an instruction.
enum Flow {
    /// Fall through to the next instruction.
    Next,
    /// Jump: resume just past the label at `target` (validated targets
    /// always point at labels, which are no-ops).
    Jump(usize),
    /// `RETURN` with no frame to pop.
    Exit,
}

impl<'a> Machine<'a> {
    /// Run the program to completion on a fresh state.
    ///
    /// Resets first, then steps until the program exits. Returns the
    /// number of instructions executed.
    ///
    /// # Errors
    ///
    /// Returns the first [`Fault`]; the machine is left idle either way.
    pub fn run(&mut self, input: &mut dyn Input, output: &mut dyn Output) -> Result<u64, Fault> {
        self.reset();
        loop {
            match self.step(input, output)? {
                Step::Continue => {}
                Step::Exited => return Ok(self.executed()),
            }
        }
    }

    /// Execute exactly one instruction.
    ///
    /// While idle (fresh, after [`Machine::reset`], or after any terminal
    /// outcome) the first call re-initializes the run state and executes
    /// the entry instruction. A fault or exit leaves the machine idle, so
    /// stepping again starts the program over.
    pub fn step(&mut self, input: &mut dyn Input, output: &mut dyn Output) -> Result<Step, Fault> {
        let ip = match self.ip {
            Some(ip) => ip,
            None => {
                self.reset();
                self.ip = Some(self.program.entry);
                self.program.entry
            }
        };

        let instr = match self.program.code.get(ip) {
            Some(&instr) => instr,
            None => {
                self.ip = None;
                return Err(Fault::PcOutOfBounds { pc: ip });
            }
        };
        let line = self.program.lines[ip];

        if instr.is_countable() {
            self.executed += 1;
        }

        match self.dispatch(instr, ip, line, input, output) {
            Ok(Flow::Next) => {
                self.ip = Some(ip + 1);
                Ok(Step::Continue)
            }
            Ok(Flow::Jump(target)) => {
                self.ip = Some(target + 1);
                Ok(Step::Continue)
            }
            Ok(Flow::Exit) => {
                self.ip = None;
                Ok(Step::Exited)
            }
            Err(fault) => {
                self.ip = None;
                Err(fault)
            }
        }
    }

    fn dispatch(
        &mut self,
        instr: Instruction,
        ip: usize,
        line: u32,
        input: &mut dyn Input,
        output: &mut dyn Output,
    ) -> Result<Flow, Fault> {
        match instr {
            // ---- No-ops: position holders and load-time declarations ----
            Instruction::Label | Instruction::Dec => Ok(Flow::Next),

            // ---- Control flow ----
            Instruction::Goto { target } => Ok(Flow::Jump(target)),
            Instruction::If {
                lhs,
                op,
                rhs,
                target,
            } => {
                let lhs = self.resolve(lhs, line)?;
                let rhs = self.resolve(rhs, line)?;
                if op.holds(lhs, rhs) {
                    Ok(Flow::Jump(target))
                } else {
                    Ok(Flow::Next)
                }
            }

            // ---- I/O ----
            Instruction::Read { dest } => {
                let value = input.next_int().ok_or(Fault::ReadFailed { line })?;
                self.store(Dest::Var(dest), value, line)?;
                Ok(Flow::Next)
            }
            Instruction::Write { value } => {
                let value = self.resolve(value, line)?;
                output.emit_int(value);
                Ok(Flow::Next)
            }

            // ---- Data movement and arithmetic ----
            Instruction::Move { dest, src } => {
                let value = self.resolve(src, line)?;
                self.store(dest, value, line)?;
                Ok(Flow::Next)
            }
            Instruction::Arith { dest, lhs, op, rhs } => {
                let lhs = self.resolve(lhs, line)?;
                let rhs = self.resolve(rhs, line)?;
                let value = op.apply(lhs, rhs).ok_or(Fault::DivideByZero { line })?;
                self.store(dest, value, line)?;
                Ok(Flow::Next)
            }

            // ---- Argument passing ----
            Instruction::Arg { value } => {
                let value = self.resolve(value, line)?;
                if self.arg_stack.len() >= MAX_ARG_DEPTH {
                    return Err(Fault::MemoryFault { line });
                }
                self.arg_stack.push(value);
                Ok(Flow::Next)
            }
            Instruction::Param { dest } => {
                let value = self.arg_stack.pop().ok_or(Fault::MemoryFault { line })?;
                self.store(Dest::Var(dest), value, line)?;
                Ok(Flow::Next)
            }

            // ---- Calls ----
            Instruction::Call { dest, func } => self.exec_call(dest, func, ip, line),
            Instruction::Return { value } => self.exec_return(value, line),
        }
    }

    /// Enter a function: snapshot the callee's bindings, relocate them
    /// onto fresh storage, and jump to its label.
    fn exec_call(&mut self, dest: Dest, func: FuncId, ip: usize, line: u32) -> Result<Flow, Fault> {
        if self.call_stack.len() >= MAX_CALL_DEPTH {
            return Err(Fault::MemoryFault { line });
        }

        let info = self.program.func(func);
        let saved_cursor = self.cursor;
        let mut saved = Vec::with_capacity(info.vars.len());
        for &var in &info.vars {
            let old = self.bindings[var.index()];
            saved.push((var, old));
            self.bindings[var.index()] = VarInfo {
                offset: Some(self.alloc(old.size)),
                ..old
            };
        }

        self.call_stack.push(CallFrame {
            return_ip: ip,
            dest,
            func,
            saved,
            saved_cursor,
        });
        Ok(Flow::Jump(info.entry))
    }

    /// Leave the current function: resolve the value in the callee frame,
    /// then restore the caller's bindings and cursor and deliver it. On
    /// the bottom frame the run simply ends; the operand is not resolved.
    fn exec_return(&mut self, value: Operand, line: u32) -> Result<Flow, Fault> {
        let frame = match self.call_stack.pop() {
            Some(frame) => frame,
            None => return Ok(Flow::Exit),
        };

        // Bindings stay the callee's until the restore loop below, so
        // this still resolves in the callee frame.
        let value = self.resolve(value, line)?;
        for &(var, info) in &frame.saved {
            self.bindings[var.index()] = info;
        }
        self.cursor = frame.saved_cursor;
        self.store(frame.dest, value, line)?;
        Ok(Flow::Jump(frame.return_ip))
    }
}

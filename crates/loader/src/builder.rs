//! Two-phase program construction.
//!
//! Phase 1 consumes recognized lines in source order: it interns
//! variables, assigns static offsets inside the entry function, opens
//! function scopes, and records a fixup for every jump and call target.
//! Phase 2 ([`Builder::finish`]) resolves the fixups against the finished
//! label and function tables, then applies the whole-program checks.
//!
//! Error precedence is deterministic: per-line faults surface in source
//! order during phase 1, unresolved targets surface in source order
//! during phase 2, then the missing-entry check, then the static
//! allocation ceiling.

use std::collections::HashMap;

use tacsim_common::{
    Dest, FuncId, FunctionInfo, Instruction, Operand, Program, SymId, SymbolTable, VarInfo,
    MEMORY_BYTES, WORD_BYTES,
};

use crate::error::LoadError;
use crate::parse::{Line, RawDest, RawOperand};

/// A target recorded during phase 1 and resolved in phase 2.
#[derive(Debug)]
enum Fixup {
    /// `GOTO` / `IF` target: any label.
    Jump { at: usize, label: String, line: u32 },
    /// `CALL` target: must be a declared function.
    Call { at: usize, func: String, line: u32 },
}

/// Accumulates a program line by line.
#[derive(Debug, Default)]
pub(crate) struct Builder {
    code: Vec<Instruction>,
    lines: Vec<u32>,
    text: Vec<String>,
    labels: HashMap<String, usize>,
    functions: Vec<FunctionInfo>,
    func_index: HashMap<String, FuncId>,
    symbols: SymbolTable,
    fixups: Vec<Fixup>,
    /// The open `FUNCTION` scope, if any.
    current: Option<FuncId>,
    /// Static allocation cursor, in bytes. Only entry-function variables
    /// advance it.
    cursor: u64,
    entry: Option<(usize, FuncId)>,
}

impl Builder {
    pub(crate) fn new() -> Builder {
        Builder::default()
    }

    /// Consume one recognized line.
    pub(crate) fn consume(
        &mut self,
        line: u32,
        text: &str,
        parsed: Line<'_>,
    ) -> Result<(), LoadError> {
        match parsed {
            Line::Label { name } => self.declare_label(name, line, text, false)?,
            Line::Function { name } => self.declare_label(name, line, text, true)?,
            Line::Goto { label } => {
                self.require_scope(line, text)?;
                self.fixups.push(Fixup::Jump {
                    at: self.code.len(),
                    label: label.to_string(),
                    line,
                });
                self.push(Instruction::Goto { target: 0 }, line, text);
            }
            Line::Return { value } => {
                let scope = self.require_scope(line, text)?;
                let value = self.operand(scope, value);
                self.push(Instruction::Return { value }, line, text);
            }
            Line::Read { var } => {
                let scope = self.require_scope(line, text)?;
                let dest = self.register_var(scope, var, WORD_BYTES, false);
                self.push(Instruction::Read { dest }, line, text);
            }
            Line::Write { value } => {
                let scope = self.require_scope(line, text)?;
                let value = self.operand(scope, value);
                self.push(Instruction::Write { value }, line, text);
            }
            Line::Arg { value } => {
                let scope = self.require_scope(line, text)?;
                let value = self.operand(scope, value);
                self.push(Instruction::Arg { value }, line, text);
            }
            Line::Param { var } => {
                let scope = self.require_scope(line, text)?;
                let dest = self.register_var(scope, var, WORD_BYTES, false);
                self.push(Instruction::Param { dest }, line, text);
            }
            Line::Dec { name, size } => {
                let scope = self.require_scope(line, text)?;
                if self.symbols.contains(name) {
                    return Err(LoadError::DuplicateVariable {
                        line,
                        name: name.to_string(),
                    });
                }
                self.register_var(scope, name, size, true);
                self.push(Instruction::Dec, line, text);
            }
            Line::If { lhs, op, rhs, label } => {
                let scope = self.require_scope(line, text)?;
                let lhs = self.operand(scope, lhs);
                let rhs = self.operand(scope, rhs);
                self.fixups.push(Fixup::Jump {
                    at: self.code.len(),
                    label: label.to_string(),
                    line,
                });
                self.push(
                    Instruction::If {
                        lhs,
                        op,
                        rhs,
                        target: 0,
                    },
                    line,
                    text,
                );
            }
            Line::Call { dest, func } => {
                let scope = self.require_scope(line, text)?;
                let dest = self.dest(scope, dest);
                self.fixups.push(Fixup::Call {
                    at: self.code.len(),
                    func: func.to_string(),
                    line,
                });
                self.push(
                    Instruction::Call {
                        dest,
                        func: FuncId(0),
                    },
                    line,
                    text,
                );
            }
            Line::Move { dest, src } => {
                let scope = self.require_scope(line, text)?;
                let dest = self.dest(scope, dest);
                let src = self.operand(scope, src);
                self.push(Instruction::Move { dest, src }, line, text);
            }
            Line::Arith { dest, lhs, op, rhs } => {
                let scope = self.require_scope(line, text)?;
                let dest = self.dest(scope, dest);
                let lhs = self.operand(scope, lhs);
                let rhs = self.operand(scope, rhs);
                self.push(Instruction::Arith { dest, lhs, op, rhs }, line, text);
            }
        }
        Ok(())
    }

    /// Resolve fixups and apply the whole-program checks.
    pub(crate) fn finish(mut self) -> Result<Program, LoadError> {
        for fixup in std::mem::take(&mut self.fixups) {
            match fixup {
                Fixup::Jump { at, label, line } => {
                    let target = *self
                        .labels
                        .get(&label)
                        .ok_or(LoadError::UndefinedLabel { line, name: label })?;
                    match &mut self.code[at] {
                        Instruction::Goto { target: t } => *t = target,
                        Instruction::If { target: t, .. } => *t = target,
                        _ => unreachable!("jump fixup recorded on a non-jump"),
                    }
                }
                Fixup::Call { at, func, line } => {
                    let id = *self
                        .func_index
                        .get(&func)
                        .ok_or(LoadError::UndefinedLabel { line, name: func })?;
                    match &mut self.code[at] {
                        Instruction::Call { func: f, .. } => *f = id,
                        _ => unreachable!("call fixup recorded on a non-call"),
                    }
                }
            }
        }

        let (entry, entry_func) = self.entry.ok_or(LoadError::MissingEntry)?;

        if self.cursor > u64::from(MEMORY_BYTES) {
            return Err(LoadError::AllocationOverflow {
                requested: self.cursor,
                limit: MEMORY_BYTES,
            });
        }

        Ok(Program {
            code: self.code,
            lines: self.lines,
            text: self.text,
            labels: self.labels,
            functions: self.functions,
            symbols: self.symbols,
            entry,
            entry_func,
            static_size: self.cursor as u32,
        })
    }

    fn push(&mut self, instr: Instruction, line: u32, text: &str) {
        self.code.push(instr);
        self.lines.push(line);
        self.text.push(text.to_string());
    }

    fn require_scope(&self, line: u32, text: &str) -> Result<FuncId, LoadError> {
        self.current.ok_or_else(|| LoadError::OutOfScope {
            line,
            text: text.to_string(),
        })
    }

    fn declare_label(
        &mut self,
        name: &str,
        line: u32,
        text: &str,
        function: bool,
    ) -> Result<(), LoadError> {
        if self.labels.contains_key(name) {
            return Err(LoadError::DuplicateLabel {
                line,
                name: name.to_string(),
            });
        }
        let at = self.code.len();
        self.labels.insert(name.to_string(), at);
        if function {
            let id = FuncId(self.functions.len() as u32);
            self.functions.push(FunctionInfo {
                name: name.to_string(),
                entry: at,
                vars: Vec::new(),
            });
            self.func_index.insert(name.to_string(), id);
            self.current = Some(id);
            if name == "main" {
                self.entry = Some((at, id));
            }
        }
        self.push(Instruction::Label, line, text);
        Ok(())
    }

    /// Intern a variable on first mention.
    ///
    /// The first mention decides everything: the owning function (whose
    /// call relocation list it joins), the size, and — inside the entry
    /// function — a static offset from the allocation cursor.
    fn register_var(&mut self, scope: FuncId, name: &str, size: u32, is_array: bool) -> SymId {
        if let Some(id) = self.symbols.lookup(name) {
            return id;
        }
        let offset = if self.functions[scope.index()].name == "main" {
            let at = self.cursor;
            self.cursor += u64::from(size);
            Some(at as u32)
        } else {
            None
        };
        let id = self.symbols.register(
            name,
            VarInfo {
                offset,
                size,
                is_array,
            },
        );
        self.functions[scope.index()].vars.push(id);
        id
    }

    fn operand(&mut self, scope: FuncId, raw: RawOperand<'_>) -> Operand {
        match raw {
            RawOperand::Imm(value) => Operand::Imm(value),
            RawOperand::Var(name) => {
                Operand::Var(self.register_var(scope, name, WORD_BYTES, false))
            }
            RawOperand::AddrOf(name) => {
                Operand::AddrOf(self.register_var(scope, name, WORD_BYTES, false))
            }
            RawOperand::Deref(name) => {
                Operand::Deref(self.register_var(scope, name, WORD_BYTES, false))
            }
        }
    }

    fn dest(&mut self, scope: FuncId, raw: RawDest<'_>) -> Dest {
        match raw {
            RawDest::Var(name) => Dest::Var(self.register_var(scope, name, WORD_BYTES, false)),
            RawDest::Deref(name) => Dest::Deref(self.register_var(scope, name, WORD_BYTES, false)),
        }
    }
}

//! Variable identity and storage bindings.
//!
//! Variable names are interned once, program-wide, into dense [`SymId`]
//! indices. Each symbol carries a [`VarInfo`] binding: where its storage
//! lives (if anywhere yet) and how big it is. The loader fixes bindings
//! for entry-function variables; every other binding stays unresolved
//! until a call relocates it.

use std::collections::HashMap;

use crate::program::WORD_BYTES;

/// Identifies an interned variable. Indexes the loader's symbol table and
/// the engine's live binding array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymId(pub u32);

impl SymId {
    /// The table index this id denotes.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Storage binding for one variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInfo {
    /// Byte offset into flat memory, or `None` while no frame has bound
    /// the variable. Entry-function variables are bound at load time,
    /// everything else at call time.
    pub offset: Option<u32>,
    /// Size in bytes: always a positive multiple of the word size, and
    /// exactly one word unless the variable was declared with `DEC`.
    pub size: u32,
    /// Declared as a multi-word block with `DEC`.
    pub is_array: bool,
}

impl VarInfo {
    /// An unbound one-word scalar.
    pub fn scalar() -> VarInfo {
        VarInfo {
            offset: None,
            size: WORD_BYTES,
            is_array: false,
        }
    }
}

/// Interned variable names with their load-time bindings.
///
/// Names are global to a program: the first registration wins, and later
/// mentions of the same name resolve to the same id regardless of which
/// function they appear in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    names: Vec<String>,
    infos: Vec<VarInfo>,
    index: HashMap<String, SymId>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Register a name, returning its id.
    ///
    /// If the name is already interned, the existing id is returned and
    /// `info` is ignored.
    pub fn register(&mut self, name: &str, info: VarInfo) -> SymId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = SymId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.infos.push(info);
        self.index.insert(name.to_string(), id);
        id
    }

    /// Look up an interned name.
    pub fn lookup(&self, name: &str) -> Option<SymId> {
        self.index.get(name).copied()
    }

    /// Whether a name is already interned.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The name behind an id.
    pub fn name(&self, id: SymId) -> &str {
        &self.names[id.index()]
    }

    /// The load-time binding of one variable.
    pub fn info(&self, id: SymId) -> VarInfo {
        self.infos[id.index()]
    }

    /// Load-time bindings for all variables, indexed by [`SymId`].
    pub fn infos(&self) -> &[VarInfo] {
        &self.infos
    }

    /// Number of interned variables.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

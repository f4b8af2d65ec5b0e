//! Lexical regions and their name tables.
//!
//! A [`Scope`] owns the symbols declared inside it, keyed by name in
//! insertion (declaration) order. Parent links form a tree rooted at the
//! single global scope; "top-level" means "has no parent" and must be
//! checked before asking for the parent.

use indexmap::IndexMap;

use crate::arena::{ScopeId, SymbolId, TypeSpecId};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    IntrinsicModules,
    Module,
    Submodule,
    /// A module scope read back from a module file rather than source.
    ModuleFile,
    MainProgram,
    Subprogram,
    BlockData,
    BlockConstruct,
    DerivedType,
    OpenAccConstruct,
}

/// One object named in an EQUIVALENCE set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EquivalenceObject {
    pub symbol: SymbolId,
}

/// An unordered set of objects declared to share storage.
pub type EquivalenceSet = Vec<EquivalenceObject>;

/// One `POINTER (ptr, pointee)` association, keyed by pointee name.
#[derive(Clone, Debug)]
pub struct CrayPointerAssoc {
    pub pointee: String,
    pub pointer: SymbolId,
}

#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    /// Absent only for the single top-level global scope.
    pub parent: Option<ScopeId>,
    /// The symbol this scope belongs to (the type symbol of a derived-type
    /// scope, the subprogram symbol of a body scope, ...).
    pub symbol: Option<SymbolId>,
    names: IndexMap<String, SymbolId>,
    pub equivalence_sets: Vec<EquivalenceSet>,
    pub cray_pointers: Vec<CrayPointerAssoc>,
    /// Derived-type instantiations cached per distinct parameter binding.
    pub(crate) instantiations: Vec<TypeSpecId>,
}

impl Scope {
    pub fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            kind,
            parent,
            symbol: None,
            names: IndexMap::new(),
            equivalence_sets: Vec::new(),
            cray_pointers: Vec::new(),
            instantiations: Vec::new(),
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_module(&self) -> bool {
        matches!(self.kind, ScopeKind::Module | ScopeKind::ModuleFile)
    }

    pub fn is_submodule(&self) -> bool {
        self.kind == ScopeKind::Submodule
    }

    pub fn is_module_file(&self) -> bool {
        self.kind == ScopeKind::ModuleFile
    }

    pub fn is_derived_type(&self) -> bool {
        self.kind == ScopeKind::DerivedType
    }

    /// Look up a name declared directly in this scope.
    pub fn find(&self, name: &str) -> Option<SymbolId> {
        self.names.get(name).copied()
    }

    /// Names and symbols in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, SymbolId)> {
        self.names.iter().map(|(name, &id)| (name.as_str(), id))
    }

    /// Indexed access in declaration order; used by the flat Scope traversal.
    pub fn get_index(&self, index: usize) -> Option<(&str, SymbolId)> {
        self.names.get_index(index).map(|(name, &id)| (name.as_str(), id))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub(crate) fn insert(&mut self, name: String, symbol: SymbolId) -> Option<SymbolId> {
        self.names.insert(name, symbol)
    }
}

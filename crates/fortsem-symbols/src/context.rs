//! The compilation context that owns the graph.
//!
//! [`SemanticsContext`] holds the scope, symbol, and type-spec arenas for one
//! compilation unit, plus the language-feature flags. It is built by the
//! external resolver through the mutating methods here, then handed to the
//! query layer by shared reference; topology never changes once queries
//! begin. There is no ambient global state: every query receives the context
//! explicitly, so independent units can be analyzed in parallel later.

use bitflags::bitflags;
use tracing::debug;

use crate::arena::{ScopeId, SymbolId, TypeSpecId};
use crate::scope::{CrayPointerAssoc, EquivalenceSet, Scope, ScopeKind};
use crate::symbol::{Details, Symbol};
use crate::types::{DeclType, DerivedTypeSpec, ParamValue};

bitflags! {
    /// Language extensions enabled for this compilation unit.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct LanguageFeatures: u32 {
        const CUDA     = 1 << 0;
        const OPEN_ACC = 1 << 1;
    }
}

pub struct SemanticsContext {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
    type_specs: Vec<DerivedTypeSpec>,
    global_scope: ScopeId,
    pub features: LanguageFeatures,
}

impl SemanticsContext {
    pub fn new() -> Self {
        let mut ctx = Self {
            scopes: Vec::new(),
            symbols: Vec::new(),
            type_specs: Vec::new(),
            global_scope: ScopeId(0),
            features: LanguageFeatures::empty(),
        };
        ctx.global_scope = ctx.alloc_scope(Scope::new(ScopeKind::Global, None));
        ctx
    }

    pub fn with_features(features: LanguageFeatures) -> Self {
        let mut ctx = Self::new();
        ctx.features = features;
        ctx
    }

    pub fn global_scope(&self) -> ScopeId {
        self.global_scope
    }

    // Arena access

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn type_spec(&self, id: TypeSpecId) -> &DerivedTypeSpec {
        &self.type_specs[id.index()]
    }

    /// Mutable access for the external resolver while it refines attributes.
    /// Ownership edges must not change once queries have begun.
    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    // Graph construction (resolver-facing)

    /// Create a child scope of `parent`.
    pub fn push_scope(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        assert!(
            kind != ScopeKind::Global,
            "the global scope is created with the context"
        );
        self.alloc_scope(Scope::new(kind, Some(parent)))
    }

    /// Declare `name` in `scope`. Names are unique within a scope; a
    /// duplicate declaration is a contract violation by the resolver.
    pub fn declare(&mut self, scope: ScopeId, name: &str, details: Details) -> SymbolId {
        let id = SymbolId(u32::try_from(self.symbols.len()).expect("symbol arena overflow"));
        self.symbols.push(Symbol::new(name, scope, details));
        let previous = self.scopes[scope.index()].insert(name.to_string(), id);
        assert!(
            previous.is_none(),
            "duplicate declaration of '{name}' in scope {scope:?}"
        );
        id
    }

    /// Attach `symbol` as the symbol a scope belongs to, and record the
    /// scope as the one the symbol defines.
    pub fn bind_scope_symbol(&mut self, scope: ScopeId, symbol: SymbolId) {
        self.scopes[scope.index()].symbol = Some(symbol);
        self.symbols[symbol.index()].scope = Some(scope);
    }

    pub fn add_equivalence_set(&mut self, scope: ScopeId, set: EquivalenceSet) {
        self.scopes[scope.index()].equivalence_sets.push(set);
    }

    pub fn add_cray_pointer(&mut self, scope: ScopeId, pointee: &str, pointer: SymbolId) {
        self.scopes[scope.index()]
            .cray_pointers
            .push(CrayPointerAssoc { pointee: pointee.to_string(), pointer });
    }

    /// Find the cached instantiation of (`type_symbol`, `params`) in `scope`,
    /// or create one. Idempotent per distinct parameter binding: both
    /// requests resolve to the same spec and the same component scope.
    pub fn find_or_instantiate_derived_type(
        &mut self,
        scope: ScopeId,
        type_symbol: SymbolId,
        params: Vec<(String, ParamValue)>,
    ) -> TypeSpecId {
        for &cached in &self.scopes[scope.index()].instantiations {
            let spec = self.type_spec(cached);
            if spec.type_symbol == type_symbol && spec.params == params {
                debug!(?cached, type_symbol = ?type_symbol, "derived type instantiation cache hit");
                return cached;
            }
        }
        let component_scope = self.symbols[type_symbol.index()].scope;
        let id = TypeSpecId(u32::try_from(self.type_specs.len()).expect("type spec arena overflow"));
        self.type_specs.push(DerivedTypeSpec { type_symbol, scope: component_scope, params });
        self.scopes[scope.index()].instantiations.push(id);
        id
    }

    // Graph services shared by the query layer

    /// True if `scope` is `ancestor` or lexically nested inside it.
    pub fn scope_contains(&self, ancestor: ScopeId, scope: ScopeId) -> bool {
        let mut current = scope;
        loop {
            if current == ancestor {
                return true;
            }
            match self.scope(current).parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// The component scope of a derived-type spec: the instantiated scope if
    /// there is one, else the type symbol's defining scope.
    pub fn spec_scope(&self, spec: TypeSpecId) -> Option<ScopeId> {
        let spec = self.type_spec(spec);
        spec.scope.or(self.symbol(spec.type_symbol).scope)
    }

    /// Look up a component name in a derived-type scope, following the
    /// parent-component chain when the name is not declared directly.
    pub fn find_component(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        if let Some(found) = self.scope(scope).find(name) {
            return Some(found);
        }
        let parent_spec = self.parent_type_spec_of_scope(scope)?;
        self.find_component(self.spec_scope(parent_spec)?, name)
    }

    /// The parent (base) type spec of a derived-type spec, if the type
    /// extends another.
    pub fn parent_type_spec(&self, spec: TypeSpecId) -> Option<TypeSpecId> {
        let type_symbol = self.type_spec(spec).type_symbol;
        let scope = self.symbol(type_symbol).scope?;
        self.parent_type_spec_of_scope(scope)
    }

    /// The parent type spec found through a derived-type scope's parent
    /// component.
    pub fn parent_type_spec_of_scope(&self, scope: ScopeId) -> Option<TypeSpecId> {
        if !self.scope(scope).is_derived_type() {
            return None;
        }
        for (_, symbol) in self.scope(scope).iter() {
            let sym = self.symbol(symbol);
            if sym.is_parent_component() {
                return sym.get_type().and_then(DeclType::as_derived);
            }
        }
        None
    }

    /// Type parameter names over the whole inheritance chain, base first.
    pub fn order_parameter_names(&self, type_symbol: SymbolId) -> Vec<String> {
        let mut result = Vec::new();
        if let Some(scope) = self.symbol(type_symbol).scope
            && let Some(parent) = self.parent_type_spec_of_scope(scope)
        {
            result = self.order_parameter_names(self.type_spec(parent).type_symbol);
        }
        if let Some(details) = self.symbol(type_symbol).derived_type_details() {
            result.extend(details.param_names.iter().cloned());
        }
        result
    }

    /// Type parameter declarations over the whole inheritance chain, base
    /// first.
    pub fn order_parameter_declarations(&self, type_symbol: SymbolId) -> Vec<SymbolId> {
        let mut result = Vec::new();
        if let Some(scope) = self.symbol(type_symbol).scope
            && let Some(parent) = self.parent_type_spec_of_scope(scope)
        {
            result = self.order_parameter_declarations(self.type_spec(parent).type_symbol);
        }
        if let Some(details) = self.symbol(type_symbol).derived_type_details() {
            result.extend(details.param_decls.iter().copied());
        }
        result
    }

    fn alloc_scope(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId(u32::try_from(self.scopes.len()).expect("scope arena overflow"));
        self.scopes.push(scope);
        id
    }
}

impl Default for SemanticsContext {
    fn default() -> Self {
        Self::new()
    }
}

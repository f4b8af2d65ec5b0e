//! Component traversal: lazy, policy-parameterized iteration over the
//! component graph of a derived type.
//!
//! A traversal policy decides, per component, whether to descend into the
//! component's own derived-type scope and whether to yield the component
//! before or after descending:
//!
//! | Policy              | Descends into                         | Yields                         |
//! |---------------------|---------------------------------------|--------------------------------|
//! | Ordered             | parent components only                | parents post-order, rest pre   |
//! | Direct              | non-allocatable/pointer               | every component, pre           |
//! | Ultimate            | non-terminal components               | terminal components only       |
//! | Potential           | non-pointer                           | non-pointer components, pre    |
//! | Scope               | non-allocatable/pointer               | every name in the scope, flat  |
//! | PotentialAndPointer | non-pointer                           | every component, pre           |
//!
//! The traversal state is an explicit stack of frames, one per derived type
//! currently being descended into, so deep nesting cannot blow the call
//! stack and the sequence can be suspended and resumed one component at a
//! time. A type may close a cycle through a forward-referenced pointer or
//! allocatable component type, so every push checks the new type against
//! every type already open on the path and skips the descent on a match.

use fortsem_symbols::{
    CudaDataAttr, DeclType, ScopeId, SemanticsContext, Symbol, SymbolId, TypeSpecId,
};
use smallvec::SmallVec;

use crate::resolve::get_ultimate;
use crate::scopes::find_module_containing;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComponentKind {
    Ordered,
    Direct,
    Ultimate,
    Potential,
    Scope,
    PotentialAndPointer,
}

#[derive(Debug)]
struct ComponentPathNode {
    spec: TypeSpecId,
    scope: ScopeId,
    /// Cursor over the type's component names (or, for the Scope policy,
    /// over the scope's entries) in declaration order.
    cursor: usize,
    component: Option<SymbolId>,
    descended: bool,
    visited: bool,
}

impl ComponentPathNode {
    fn new(ctx: &SemanticsContext, spec: TypeSpecId) -> Self {
        let scope = ctx
            .spec_scope(spec)
            .expect("derived type spec has no component scope");
        Self { spec, scope, cursor: 0, component: None, descended: false, visited: false }
    }

    fn type_symbol(&self, ctx: &SemanticsContext) -> SymbolId {
        ctx.type_spec(self.spec).type_symbol
    }
}

/// Lazy depth-first component sequence under one policy. Restartable by
/// constructing a fresh iterator from the root spec.
pub struct ComponentIterator<'a> {
    ctx: &'a SemanticsContext,
    kind: ComponentKind,
    path: SmallVec<[ComponentPathNode; 4]>,
}

impl<'a> ComponentIterator<'a> {
    pub fn new(ctx: &'a SemanticsContext, derived: TypeSpecId, kind: ComponentKind) -> Self {
        let mut path = SmallVec::new();
        path.push(ComponentPathNode::new(ctx, derived));
        Self { ctx, kind, path }
    }

    /// The components currently open on the path, root first, ending with
    /// the most recently yielded component. Only meaningful after `next`
    /// has returned `Some`.
    pub fn component_path(&self) -> Vec<SymbolId> {
        self.path
            .iter()
            .map(|node| node.component.expect("path node has no current component"))
            .collect()
    }

    /// Human-readable designator for the current component, e.g. `%a%b%c`.
    pub fn designator(&self) -> String {
        let mut result = String::new();
        for symbol in self.component_path() {
            result.push('%');
            result.push_str(&self.ctx.symbol(symbol).name);
        }
        result
    }

    /// Whether to descend into `component`'s own derived-type scope, and if
    /// so which spec to push. Declines when the component's type is already
    /// open somewhere on the path (cycle guard) or is not a derived object.
    fn plan_component_traversal(&self, component: SymbolId) -> Option<TypeSpecId> {
        let sym = self.ctx.symbol(component);
        let object = sym.object_details()?;
        let derived = object.ty.as_ref().and_then(DeclType::as_derived)?;
        let traverse = match self.kind {
            // Ordered only visits parents
            ComponentKind::Ordered => sym.is_parent_component(),
            ComponentKind::Direct | ComponentKind::Ultimate | ComponentKind::Scope => {
                !sym.is_allocatable_or_pointer()
            }
            ComponentKind::Potential | ComponentKind::PotentialAndPointer => !sym.is_pointer(),
        };
        if !traverse {
            return None;
        }
        // A pointer or allocatable component may name a type that is still
        // open above us (forward references make such cycles legal), so
        // check the entire chain of ancestor types, not just the parent.
        let new_type_symbol = self.ctx.type_spec(derived).type_symbol;
        for node in &self.path {
            if node.type_symbol(self.ctx) == new_type_symbol {
                return None;
            }
        }
        Some(derived)
    }

    fn stop_at_component_pre(&self, component: &Symbol) -> bool {
        match self.kind {
            // Parent components are yielded after their sub-components so
            // structure-constructor analysis sees them in evaluation order.
            ComponentKind::Ordered => !component.is_parent_component(),
            ComponentKind::Direct | ComponentKind::PotentialAndPointer => true,
            ComponentKind::Ultimate => {
                component.proc_details().is_some()
                    || component.is_allocatable_or_pointer()
                    || component
                        .object_details()
                        .and_then(|object| object.ty.as_ref())
                        .is_some_and(DeclType::is_intrinsic)
            }
            ComponentKind::Potential => !component.is_pointer(),
            ComponentKind::Scope => unreachable!("Scope policy yields inline"),
        }
    }

    fn stop_at_component_post(&self, component: &Symbol) -> bool {
        self.kind == ComponentKind::Ordered && component.is_parent_component()
    }
}

impl Iterator for ComponentIterator<'_> {
    type Item = SymbolId;

    fn next(&mut self) -> Option<SymbolId> {
        while let Some(last) = self.path.len().checked_sub(1) {
            if let Some(component) = self.path[last].component {
                if !self.path[last].descended {
                    self.path[last].descended = true;
                    if let Some(derived) = self.plan_component_traversal(component) {
                        self.path.push(ComponentPathNode::new(self.ctx, derived));
                        continue;
                    }
                } else if !self.path[last].visited {
                    self.path[last].visited = true;
                    return Some(component); // next component, after descending
                }
            }
            if self.kind == ComponentKind::Scope {
                // Flat over every name in the scope, one level.
                let scope = self.ctx.scope(self.path[last].scope);
                match scope.get_index(self.path[last].cursor) {
                    None => {
                        self.path.pop();
                    }
                    Some((_, symbol)) => {
                        let frame = &mut self.path[last];
                        frame.cursor += 1;
                        frame.component = Some(symbol);
                        frame.descended = false;
                        frame.visited = true;
                        return Some(symbol); // next component, before descending
                    }
                }
            } else {
                let type_symbol = self.path[last].type_symbol(self.ctx);
                let name = self
                    .ctx
                    .symbol(type_symbol)
                    .derived_type_details()
                    .and_then(|details| details.component_names.get(self.path[last].cursor))
                    .cloned();
                match name {
                    None => {
                        self.path.pop();
                    }
                    Some(name) => {
                        self.path[last].cursor += 1;
                        // An instantiated scope may lack the name; skip it.
                        if let Some(component) = self.ctx.scope(self.path[last].scope).find(&name) {
                            let stop_pre = self.stop_at_component_pre(self.ctx.symbol(component));
                            let stop_post = self.stop_at_component_post(self.ctx.symbol(component));
                            let frame = &mut self.path[last];
                            frame.component = Some(component);
                            frame.descended = false;
                            if stop_pre {
                                frame.visited = true;
                                return Some(component); // before descending
                            }
                            frame.visited = !stop_post;
                        }
                    }
                }
            }
        }
        None
    }
}

// Finders built on the traversal engine

pub fn find_coarray_potential_component(
    ctx: &SemanticsContext,
    derived: TypeSpecId,
) -> Option<SymbolId> {
    ComponentIterator::new(ctx, derived, ComponentKind::Potential)
        .find(|&component| ctx.symbol(component).is_coarray())
}

pub fn find_pointer_potential_component(
    ctx: &SemanticsContext,
    derived: TypeSpecId,
) -> Option<SymbolId> {
    ComponentIterator::new(ctx, derived, ComponentKind::PotentialAndPointer)
        .find(|&component| ctx.symbol(component).is_pointer())
}

pub fn find_coarray_ultimate_component(
    ctx: &SemanticsContext,
    derived: TypeSpecId,
) -> Option<SymbolId> {
    ComponentIterator::new(ctx, derived, ComponentKind::Ultimate)
        .find(|&component| ctx.symbol(component).is_coarray())
}

pub fn find_pointer_ultimate_component(
    ctx: &SemanticsContext,
    derived: TypeSpecId,
) -> Option<SymbolId> {
    ComponentIterator::new(ctx, derived, ComponentKind::Ultimate)
        .find(|&component| ctx.symbol(component).is_pointer())
}

pub fn find_allocatable_ultimate_component(
    ctx: &SemanticsContext,
    derived: TypeSpecId,
) -> Option<SymbolId> {
    ComponentIterator::new(ctx, derived, ComponentKind::Ultimate)
        .find(|&component| ctx.symbol(component).is_allocatable())
}

pub fn find_allocatable_or_pointer_direct_component(
    ctx: &SemanticsContext,
    derived: TypeSpecId,
) -> Option<SymbolId> {
    ComponentIterator::new(ctx, derived, ComponentKind::Direct)
        .find(|&component| ctx.symbol(component).is_allocatable_or_pointer())
}

pub fn has_allocatable_direct_component(ctx: &SemanticsContext, derived: TypeSpecId) -> bool {
    ComponentIterator::new(ctx, derived, ComponentKind::Direct)
        .any(|component| ctx.symbol(component).is_allocatable())
}

pub fn find_polymorphic_allocatable_potential_component(
    ctx: &SemanticsContext,
    derived: TypeSpecId,
) -> Option<SymbolId> {
    ComponentIterator::new(ctx, derived, ComponentKind::Potential)
        .find(|&component| ctx.symbol(component).is_polymorphic_allocatable())
}

/// First ultimate component satisfying `predicate`.
pub fn find_ultimate_component(
    ctx: &SemanticsContext,
    derived: TypeSpecId,
    predicate: impl Fn(&SemanticsContext, SymbolId) -> bool,
) -> Option<SymbolId> {
    ComponentIterator::new(ctx, derived, ComponentKind::Ultimate)
        .find(|&component| predicate(ctx, component))
}

/// First immediate component satisfying `predicate`, searching this type's
/// scope and then the parent-component chain only (no descent into other
/// component types).
pub fn find_immediate_component(
    ctx: &SemanticsContext,
    derived: TypeSpecId,
    predicate: impl Fn(&SemanticsContext, SymbolId) -> bool,
) -> Option<SymbolId> {
    let mut current = Some(derived);
    while let Some(spec) = current {
        let scope = ctx.spec_scope(spec)?;
        let mut parent = None;
        for (_, symbol) in ctx.scope(scope).iter() {
            if predicate(ctx, symbol) {
                return Some(symbol);
            }
            if ctx.symbol(symbol).is_parent_component() {
                parent = Some(symbol);
            }
        }
        current = parent.and_then(|symbol| {
            ctx.symbol(symbol).get_type().and_then(DeclType::as_derived)
        });
    }
    None
}

fn is_event_type_or_lock_type(ctx: &SemanticsContext, derived: Option<TypeSpecId>) -> bool {
    derived.is_some_and(|spec| {
        let type_symbol = get_ultimate(ctx, ctx.type_spec(spec).type_symbol);
        let sym = ctx.symbol(type_symbol);
        if sym.name != "event_type" && sym.name != "lock_type" {
            return false;
        }
        find_module_containing(ctx, sym.owner).is_some_and(|module| {
            ctx.scope(module)
                .symbol
                .is_some_and(|id| ctx.symbol(id).name == "iso_fortran_env")
        })
    })
}

/// First potential component of EVENT_TYPE or LOCK_TYPE. With
/// `ignore_coarrays`, a component reached through a coarray ancestor is
/// skipped; the component itself being a coarray does not suppress the
/// match (only the ancestors of the path are inspected).
pub fn find_event_or_lock_potential_component(
    ctx: &SemanticsContext,
    derived: TypeSpecId,
    ignore_coarrays: bool,
) -> Option<SymbolId> {
    let mut iter = ComponentIterator::new(ctx, derived, ComponentKind::Potential);
    while let Some(component) = iter.next() {
        let is_match = ctx
            .symbol(component)
            .object_details()
            .and_then(|object| object.ty.as_ref())
            .is_some_and(|ty| is_event_type_or_lock_type(ctx, ty.as_derived()));
        if !is_match {
            continue;
        }
        if !ignore_coarrays {
            return Some(component);
        }
        let mut path = iter.component_path();
        path.pop();
        if !path.iter().any(|&ancestor| ctx.symbol(ancestor).is_coarray()) {
            return Some(component);
        }
    }
    None
}

// CUDA data-attribute queries (feature-refined attributes on object entities)

/// Allocatable with a device-side data attribute other than Pinned.
pub fn is_device_allocatable(ctx: &SemanticsContext, symbol: SymbolId) -> bool {
    ctx.symbol(symbol).is_allocatable()
        && ctx
            .symbol(get_ultimate(ctx, symbol))
            .cuda_attr()
            .is_some_and(|attr| attr != CudaDataAttr::Pinned)
}

pub fn find_cuda_device_allocatable_ultimate_component(
    ctx: &SemanticsContext,
    derived: TypeSpecId,
) -> Option<SymbolId> {
    ComponentIterator::new(ctx, derived, ComponentKind::Ultimate)
        .find(|&component| is_device_allocatable(ctx, component))
}

/// The effective CUDA data attribute of an object: Managed when the object's
/// type reaches a device allocatable ultimate component, else the declared
/// attribute.
pub fn get_cuda_data_attr(ctx: &SemanticsContext, symbol: SymbolId) -> Option<CudaDataAttr> {
    let sym = ctx.symbol(symbol);
    let object = sym.object_details()?;
    if let Some(derived) = object.ty.as_ref().and_then(DeclType::as_derived)
        && find_cuda_device_allocatable_ultimate_component(ctx, derived).is_some()
    {
        return Some(CudaDataAttr::Managed);
    }
    object.cuda_attr
}

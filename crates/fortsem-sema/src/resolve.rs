//! Symbol resolution: association chains, generic bypass, procedure
//! classification, accessibility, and global unification.
//!
//! Resolution functions are total: expected misses return `None`. The only
//! panics are contract checks on the graph itself (association chains that
//! fail to terminate, a Cray pointee with no pointer association).

use fortsem_common::limits::{MAX_ASSOCIATION_DEPTH, MAX_PROC_RESOLUTION_DEPTH};
use fortsem_common::SemanticMessage;
use fortsem_symbols::{
    Details, ScopeId, ScopeKind, SemanticsContext, SubprogramKind, SymbolId,
};
use tracing::trace;

use crate::scopes::{
    does_scope_contain, find_module_containing, find_module_file_containing,
    get_program_unit_containing, get_program_unit_or_block_construct_containing,
    get_top_level_unit_containing,
};

/// Follow use- and host-association links to the final non-associated
/// symbol. Association graphs are acyclic by construction of the resolver
/// that built them; the depth guard turns a malformed chain into a loud
/// contract failure instead of a hang.
pub fn get_ultimate(ctx: &SemanticsContext, symbol: SymbolId) -> SymbolId {
    let mut current = symbol;
    for _ in 0..MAX_ASSOCIATION_DEPTH {
        match &ctx.symbol(current).details {
            Details::Use { symbol: target } | Details::HostAssoc { symbol: target } => {
                current = *target;
            }
            _ => return current,
        }
    }
    panic!("association chain exceeds {MAX_ASSOCIATION_DEPTH} links; graph is malformed");
}

/// Follow host-association links only, leaving use association in place.
pub fn follow_host_assoc(ctx: &SemanticsContext, symbol: SymbolId) -> SymbolId {
    let mut current = symbol;
    for _ in 0..MAX_ASSOCIATION_DEPTH {
        match &ctx.symbol(current).details {
            Details::HostAssoc { symbol: target } => current = *target,
            _ => return current,
        }
    }
    panic!("host association chain exceeds {MAX_ASSOCIATION_DEPTH} links; graph is malformed");
}

/// If `symbol`'s ultimate is a generic with exactly one specific procedure
/// hidden behind it, return that specific; otherwise return `symbol`.
pub fn bypass_generic(ctx: &SemanticsContext, symbol: SymbolId) -> SymbolId {
    let ultimate = get_ultimate(ctx, symbol);
    if let Some(generic) = ctx.symbol(ultimate).generic_details()
        && let Some(specific) = generic.specific
    {
        return specific;
    }
    symbol
}

/// Resolve to the interface declaration, through procedure entities,
/// bindings, association, and generics. `None` when no explicit interface
/// exists (intrinsics, implicit-interface externals).
pub fn find_interface(ctx: &SemanticsContext, symbol: SymbolId) -> Option<SymbolId> {
    find_interface_depth(ctx, symbol, 0)
}

fn find_interface_depth(ctx: &SemanticsContext, symbol: SymbolId, depth: u32) -> Option<SymbolId> {
    assert!(
        depth < MAX_PROC_RESOLUTION_DEPTH,
        "interface resolution does not terminate; graph is malformed"
    );
    match &ctx.symbol(symbol).details {
        Details::Proc(proc) => proc
            .interface
            .and_then(|interface| find_interface_depth(ctx, interface, depth + 1)),
        Details::ProcBinding(binding) => find_interface_depth(ctx, binding.symbol, depth + 1),
        Details::Subprogram(_) => Some(symbol),
        Details::Use { symbol: target } | Details::HostAssoc { symbol: target } => {
            find_interface_depth(ctx, *target, depth + 1)
        }
        Details::Generic(generic) => generic
            .specific
            .and_then(|specific| find_interface_depth(ctx, specific, depth + 1)),
        _ => None,
    }
}

/// Resolve to the subprogram body declaration. Unlike [`find_interface`], a
/// procedure entity with no explicit interface resolves to itself.
pub fn find_subprogram(ctx: &SemanticsContext, symbol: SymbolId) -> Option<SymbolId> {
    find_subprogram_depth(ctx, symbol, 0)
}

fn find_subprogram_depth(ctx: &SemanticsContext, symbol: SymbolId, depth: u32) -> Option<SymbolId> {
    assert!(
        depth < MAX_PROC_RESOLUTION_DEPTH,
        "subprogram resolution does not terminate; graph is malformed"
    );
    match &ctx.symbol(symbol).details {
        Details::Proc(proc) => match proc.interface {
            Some(interface) => find_subprogram_depth(ctx, interface, depth + 1),
            None => Some(symbol),
        },
        Details::ProcBinding(binding) => find_subprogram_depth(ctx, binding.symbol, depth + 1),
        Details::Subprogram(_) => Some(symbol),
        Details::Use { symbol: target } | Details::HostAssoc { symbol: target } => {
            find_subprogram_depth(ctx, *target, depth + 1)
        }
        Details::Generic(generic) => generic
            .specific
            .and_then(|specific| find_subprogram_depth(ctx, specific, depth + 1)),
        _ => None,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProcedureDefinitionClass {
    None,
    Intrinsic,
    Dummy,
    Pointer,
    External,
    Module,
    Internal,
    StatementFunction,
}

/// Classify how a procedure is defined.
pub fn classify_procedure(ctx: &SemanticsContext, symbol: SymbolId) -> ProcedureDefinitionClass {
    let ultimate_id = get_ultimate(ctx, symbol);
    let ultimate = ctx.symbol(ultimate_id);
    if !ultimate.is_procedure() {
        ProcedureDefinitionClass::None
    } else if ultimate.attrs.contains(fortsem_symbols::Attrs::INTRINSIC) {
        ProcedureDefinitionClass::Intrinsic
    } else if ultimate.is_dummy() {
        ProcedureDefinitionClass::Dummy
    } else if ctx.symbol(symbol).is_procedure_pointer() {
        ProcedureDefinitionClass::Pointer
    } else if ultimate.attrs.contains(fortsem_symbols::Attrs::EXTERNAL) {
        ProcedureDefinitionClass::External
    } else if let Details::SubprogramName(name_details) = &ultimate.details {
        match name_details.kind {
            SubprogramKind::Module => ProcedureDefinitionClass::Module,
            SubprogramKind::Internal => ProcedureDefinitionClass::Internal,
        }
    } else if let Some(subprogram) = find_subprogram(ctx, symbol) {
        if ctx
            .symbol(subprogram)
            .subprogram_details()
            .is_some_and(|details| details.is_stmt_function)
        {
            return ProcedureDefinitionClass::StatementFunction;
        }
        match ctx.scope(ultimate.owner).kind {
            ScopeKind::Global | ScopeKind::IntrinsicModules => ProcedureDefinitionClass::External,
            ScopeKind::Module | ScopeKind::Submodule | ScopeKind::ModuleFile => {
                ProcedureDefinitionClass::Module
            }
            ScopeKind::MainProgram | ScopeKind::Subprogram => ProcedureDefinitionClass::Internal,
            _ => ProcedureDefinitionClass::None,
        }
    } else {
        ProcedureDefinitionClass::None
    }
}

pub fn is_external(ctx: &SemanticsContext, symbol: SymbolId) -> bool {
    classify_procedure(ctx, symbol) == ProcedureDefinitionClass::External
}

pub fn is_module_procedure(ctx: &SemanticsContext, symbol: SymbolId) -> bool {
    classify_procedure(ctx, symbol) == ProcedureDefinitionClass::Module
}

/// True unless the ultimate symbol is PRIVATE in a module that does not
/// lexically contain `from_scope`.
pub fn is_accessible(ctx: &SemanticsContext, symbol: SymbolId, from_scope: ScopeId) -> bool {
    let ultimate = get_ultimate(ctx, symbol);
    if ctx
        .symbol(ultimate)
        .attrs
        .contains(fortsem_symbols::Attrs::PRIVATE)
    {
        match find_module_containing(ctx, ctx.symbol(ultimate).owner) {
            Some(module) => ctx.scope_contains(module, from_scope),
            None => true,
        }
    } else {
        true
    }
}

/// Accessibility as a user-visible rule: `None` when accessible, otherwise a
/// structured message payload for the caller to render. Checks are
/// suppressed inside module files, where forward-substituted constants may
/// legitimately reference private components.
pub fn check_accessible_symbol(
    ctx: &SemanticsContext,
    scope: ScopeId,
    symbol: SymbolId,
) -> Option<SemanticMessage> {
    if is_accessible(ctx, symbol, scope) {
        return None;
    }
    if find_module_file_containing(ctx, scope).is_some() {
        return None;
    }
    let ultimate = get_ultimate(ctx, symbol);
    let module = find_module_containing(ctx, ctx.symbol(ultimate).owner)
        .expect("an inaccessible symbol is PRIVATE in some module");
    let module_name = ctx
        .scope(module)
        .symbol
        .map(|id| ctx.symbol(id).name.clone())
        .unwrap_or_default();
    let sym = ctx.symbol(symbol);
    Some(
        SemanticMessage::error(
            format!(
                "PRIVATE name '{}' is accessible only within module '{}'",
                sym.name, module_name
            ),
            sym.location.clone(),
        )
        .attach(
            format!("declaration of '{}'", ctx.symbol(ultimate).name),
            ctx.symbol(ultimate).location.clone(),
        ),
    )
}

/// Map a local external/pointer/interface symbol to the global-scope
/// declaration it refers to, when bind names agree.
pub fn find_global(ctx: &SemanticsContext, original: SymbolId) -> Option<SymbolId> {
    let ultimate_id = get_ultimate(ctx, original);
    let ultimate = ctx.symbol(ultimate_id);
    if ctx.scope(ultimate.owner).kind == ScopeKind::Global {
        return Some(ultimate_id);
    }
    let is_local = if ultimate.is_dummy() || ultimate.is_pointer() {
        false
    } else if matches!(ultimate.details, Details::Proc(_)) {
        is_external(ctx, ultimate_id)
    } else if let Some(subprogram) = ultimate.subprogram_details() {
        subprogram.is_interface
    } else {
        false
    };
    if !is_local {
        return None;
    }
    if let Some(bind) = &ultimate.bind_name
        && *bind != ultimate.name
    {
        return None;
    }
    let global = ctx.scope(ctx.global_scope()).find(&ultimate.name)?;
    let global_sym = ctx.symbol(global);
    match &global_sym.bind_name {
        Some(bind) if *bind != global_sym.name => None,
        _ => {
            trace!(local = %ultimate.name, ?global, "unified local declaration with global");
            Some(global)
        }
    }
}

fn scope_is_pure_function(ctx: &SemanticsContext, scope: ScopeId) -> bool {
    ctx.scope(scope).symbol.is_some_and(|symbol| {
        let sym = ctx.symbol(symbol);
        sym.is_pure_procedure() && sym.is_function()
    })
}

/// The rule set for "this object may be visible outside the current program
/// unit": non-INTENT(IN) dummies (except pointer dummies of a pure function
/// being defined), objects from a different program unit, and COMMON block
/// members. Components of derived types are never externally visible
/// themselves.
pub fn find_externally_visible_object(
    ctx: &SemanticsContext,
    object: SymbolId,
    scope: ScopeId,
    is_pointer_definition: bool,
) -> Option<SymbolId> {
    let ultimate_id = get_ultimate(ctx, object);
    let ultimate = ctx.symbol(ultimate_id);
    if ultimate.is_dummy() {
        if ultimate.is_intent_in() {
            return Some(ultimate_id);
        }
        if !is_pointer_definition
            && ultimate.is_pointer()
            && scope_is_pure_function(ctx, ultimate.owner)
        {
            return Some(ultimate_id);
        }
        None
    } else if ctx.scope(ultimate.owner).kind == ScopeKind::DerivedType {
        None
    } else if get_program_unit_containing(ctx, ultimate.owner)
        != get_program_unit_containing(ctx, scope)
    {
        Some(object)
    } else {
        find_common_block_containing(ctx, ultimate_id)
    }
}

/// True if `symbol` reaches `scope` by use association: its ultimate lives
/// in a module other than the top-level unit containing `scope`.
pub fn is_use_associated(ctx: &SemanticsContext, symbol: SymbolId, scope: ScopeId) -> bool {
    let ultimate = get_ultimate(ctx, symbol);
    let owner_unit = get_top_level_unit_containing(ctx, ctx.symbol(ultimate).owner);
    ctx.scope(owner_unit).is_module() && owner_unit != get_top_level_unit_containing(ctx, scope)
}

pub fn is_host_associated(ctx: &SemanticsContext, symbol: SymbolId, scope: ScopeId) -> bool {
    let base = follow_host_assoc(ctx, symbol);
    let base_owner = ctx.symbol(base).owner;
    ctx.scope(base_owner).is_top_level()
        || does_scope_contain(
            ctx,
            get_program_unit_or_block_construct_containing(ctx, base_owner),
            get_program_unit_or_block_construct_containing(ctx, scope),
        )
}

/// Host association that crosses into a subprogram (BLOCK constructs in the
/// referencing scope do not count as a boundary).
pub fn is_host_associated_into_subprogram(
    ctx: &SemanticsContext,
    symbol: SymbolId,
    scope: ScopeId,
) -> bool {
    let base = follow_host_assoc(ctx, symbol);
    let base_owner = ctx.symbol(base).owner;
    ctx.scope(base_owner).is_top_level()
        || does_scope_contain(
            ctx,
            get_program_unit_or_block_construct_containing(ctx, base_owner),
            get_program_unit_containing(ctx, scope),
        )
}

/// The COMMON block in the symbol's owning scope that lists it, if any.
pub fn find_common_block_containing(ctx: &SemanticsContext, symbol: SymbolId) -> Option<SymbolId> {
    let ultimate = get_ultimate(ctx, symbol);
    let owner = ctx.symbol(ultimate).owner;
    for (_, candidate) in ctx.scope(owner).iter() {
        if let Some(common) = ctx.symbol(candidate).common_block_details()
            && common.objects.contains(&ultimate)
        {
            return Some(candidate);
        }
    }
    None
}

pub fn is_common_block_containing(
    ctx: &SemanticsContext,
    block: SymbolId,
    object: SymbolId,
) -> bool {
    ctx.symbol(block)
        .common_block_details()
        .is_some_and(|common| common.objects.contains(&object))
}

pub fn is_in_blank_common(ctx: &SemanticsContext, symbol: SymbolId) -> bool {
    find_common_block_containing(ctx, symbol)
        .is_some_and(|block| ctx.symbol(block).name.is_empty())
}

/// The EQUIVALENCE set in the symbol's owning scope that names it, if any.
pub fn find_equivalence_set<'a>(
    ctx: &'a SemanticsContext,
    symbol: SymbolId,
) -> Option<&'a fortsem_symbols::EquivalenceSet> {
    let ultimate = get_ultimate(ctx, symbol);
    let owner = ctx.symbol(ultimate).owner;
    ctx.scope(owner)
        .equivalence_sets
        .iter()
        .find(|set| set.iter().any(|object| object.symbol == ultimate))
}

/// The Cray pointer associated with `pointee`. The resolver records the
/// association when it processes the POINTER statement, so a pointee with
/// no pointer is a contract violation.
pub fn get_cray_pointer(ctx: &SemanticsContext, pointee: SymbolId) -> SymbolId {
    let ultimate = get_ultimate(ctx, pointee);
    let owner = ctx.symbol(ultimate).owner;
    let name = &ctx.symbol(ultimate).name;
    ctx.scope(owner)
        .cray_pointers
        .iter()
        .find(|assoc| assoc.pointee == *name)
        .map(|assoc| assoc.pointer)
        .unwrap_or_else(|| panic!("no Cray pointer associated with pointee '{name}'"))
}

/// For a separate module procedure body, the interface it implements.
pub fn find_separate_module_subprogram_interface(
    ctx: &SemanticsContext,
    proc: SymbolId,
) -> Option<SymbolId> {
    ctx.symbol(proc)
        .subprogram_details()
        .and_then(|details| details.module_interface)
}

/// For a type-bound procedure binding, the binding it overrides in the
/// parent type, if any. Only accessible bindings are overridden; an
/// inaccessible DEFERRED binding is still reported, with the second result
/// set, so callers can diagnose it.
pub fn find_overridden_binding(
    ctx: &SemanticsContext,
    symbol: SymbolId,
) -> (Option<SymbolId>, bool) {
    let sym = ctx.symbol(symbol);
    if sym.binding_details().is_none() {
        return (None, false);
    }
    let Some(parent_spec) = ctx.parent_type_spec_of_scope(sym.owner) else {
        return (None, false);
    };
    let Some(parent_scope) = ctx.spec_scope(parent_spec) else {
        return (None, false);
    };
    let Some(overridden) = ctx.find_component(parent_scope, &sym.name) else {
        return (None, false);
    };
    if is_accessible(ctx, overridden, sym.owner) {
        (Some(overridden), false)
    } else if ctx
        .symbol(overridden)
        .attrs
        .contains(fortsem_symbols::Attrs::DEFERRED)
    {
        (Some(overridden), true)
    } else {
        (None, false)
    }
}

/// True for generic defined operators and type-bound defined operators.
pub fn is_generic_defined_op(ctx: &SemanticsContext, symbol: SymbolId) -> bool {
    let ultimate = get_ultimate(ctx, symbol);
    match &ctx.symbol(ultimate).details {
        Details::Generic(generic) => generic.kind.is_defined_operator(),
        Details::Misc(kind) => *kind == fortsem_symbols::MiscKind::TypeBoundDefinedOp,
        _ => false,
    }
}

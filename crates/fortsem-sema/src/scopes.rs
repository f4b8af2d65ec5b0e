//! Scope navigation: ancestor searches over the lexical scope tree.
//!
//! All searches start at a scope and walk parent links toward the global
//! scope. Asking for the top-level unit of a scope that is already top-level
//! is a contract violation and panics; every other miss is an ordinary
//! `None`.

use fortsem_common::limits::MAX_SCOPE_WALK_DEPTH;
use fortsem_symbols::{LanguageFeatures, ScopeId, ScopeKind, SemanticsContext};

/// Find `start` or the nearest ancestor scope matching `predicate`.
pub fn find_scope_containing(
    ctx: &SemanticsContext,
    start: ScopeId,
    predicate: impl Fn(&SemanticsContext, ScopeId) -> bool,
) -> Option<ScopeId> {
    let mut current = start;
    for _ in 0..MAX_SCOPE_WALK_DEPTH {
        if predicate(ctx, current) {
            return Some(current);
        }
        match ctx.scope(current).parent {
            Some(parent) => current = parent,
            None => return None,
        }
    }
    panic!("scope parent chain exceeds {MAX_SCOPE_WALK_DEPTH} links; graph is malformed");
}

/// The top-level unit containing `start`: the first ancestor whose parent is
/// the top-level scope. `start` must not itself be top-level.
pub fn get_top_level_unit_containing(ctx: &SemanticsContext, start: ScopeId) -> ScopeId {
    assert!(
        !ctx.scope(start).is_top_level(),
        "top-level unit requested for the top-level scope"
    );
    find_scope_containing(ctx, start, |ctx, scope| {
        ctx.scope(scope)
            .parent
            .is_some_and(|parent| ctx.scope(parent).is_top_level())
    })
    .expect("a non-top-level scope always has a top-level-unit ancestor")
}

pub fn find_module_containing(ctx: &SemanticsContext, start: ScopeId) -> Option<ScopeId> {
    find_scope_containing(ctx, start, |ctx, scope| ctx.scope(scope).is_module())
}

pub fn find_module_or_submodule_containing(
    ctx: &SemanticsContext,
    start: ScopeId,
) -> Option<ScopeId> {
    find_scope_containing(ctx, start, |ctx, scope| {
        ctx.scope(scope).is_module() || ctx.scope(scope).is_submodule()
    })
}

pub fn find_module_file_containing(ctx: &SemanticsContext, start: ScopeId) -> Option<ScopeId> {
    find_scope_containing(ctx, start, |ctx, scope| ctx.scope(scope).is_module_file())
}

fn is_program_unit(kind: ScopeKind) -> bool {
    matches!(
        kind,
        ScopeKind::Module
            | ScopeKind::Submodule
            | ScopeKind::ModuleFile
            | ScopeKind::MainProgram
            | ScopeKind::Subprogram
            | ScopeKind::BlockData
    )
}

/// The nearest enclosing program unit. `start` must not be top-level.
pub fn get_program_unit_containing(ctx: &SemanticsContext, start: ScopeId) -> ScopeId {
    assert!(
        !ctx.scope(start).is_top_level(),
        "program unit requested for the top-level scope"
    );
    find_scope_containing(ctx, start, |ctx, scope| is_program_unit(ctx.scope(scope).kind))
        .expect("a non-top-level scope always has a program-unit ancestor")
}

/// Like [`get_program_unit_containing`], but a BLOCK construct also counts.
pub fn get_program_unit_or_block_construct_containing(
    ctx: &SemanticsContext,
    start: ScopeId,
) -> ScopeId {
    assert!(
        !ctx.scope(start).is_top_level(),
        "program unit requested for the top-level scope"
    );
    find_scope_containing(ctx, start, |ctx, scope| {
        let kind = ctx.scope(scope).kind;
        is_program_unit(kind) || kind == ScopeKind::BlockConstruct
    })
    .expect("a non-top-level scope always has a program-unit ancestor")
}

/// The enclosing pure procedure, if any. Only the innermost enclosing
/// program unit needs checking: an internal subprogram of a pure subprogram
/// must itself be pure, so purity is inherited downward.
pub fn find_pure_procedure_containing(ctx: &SemanticsContext, start: ScopeId) -> Option<ScopeId> {
    if ctx.scope(start).is_top_level() {
        return None;
    }
    let unit = get_program_unit_containing(ctx, start);
    let symbol = ctx.scope(unit).symbol?;
    if ctx.symbol(symbol).is_pure_procedure() {
        Some(unit)
    } else {
        None
    }
}

pub fn find_openacc_construct_containing(
    ctx: &SemanticsContext,
    start: ScopeId,
) -> Option<ScopeId> {
    find_scope_containing(ctx, start, |ctx, scope| {
        ctx.scope(scope).kind == ScopeKind::OpenAccConstruct
    })
}

/// The nearest ancestor that establishes a CUDA device execution context.
/// The predicate is supplied by the caller; this is just the parameterized
/// ancestor search, gated on the feature being enabled.
pub fn find_cuda_device_context(
    ctx: &SemanticsContext,
    start: ScopeId,
    is_device_context: impl Fn(&SemanticsContext, ScopeId) -> bool,
) -> Option<ScopeId> {
    if !ctx.features.contains(LanguageFeatures::CUDA) {
        return None;
    }
    find_scope_containing(ctx, start, is_device_context)
}

/// Strict ancestry: true if `maybe_ancestor` properly contains
/// `maybe_descendent` (a scope does not contain itself here).
pub fn does_scope_contain(
    ctx: &SemanticsContext,
    maybe_ancestor: ScopeId,
    maybe_descendent: ScopeId,
) -> bool {
    match ctx.scope(maybe_descendent).parent {
        Some(parent) => {
            find_scope_containing(ctx, parent, |_, scope| scope == maybe_ancestor).is_some()
        }
        None => false,
    }
}

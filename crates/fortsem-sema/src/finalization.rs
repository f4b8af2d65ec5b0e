//! Finalization analysis: does a derived type have an applicable FINAL
//! procedure, directly or through a component?
//!
//! Candidate selection prefers a non-elemental finalizer whose dummy rank
//! matches the queried rank; an elemental finalizer is remembered as a
//! fallback. Component recursion shares an in-progress set across the whole
//! query so self-referential types terminate.

use fortsem_symbols::{DeclType, DynamicType, SemanticsContext, SymbolId, TypeSpecId};
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::components::{
    ComponentIterator, ComponentKind, find_polymorphic_allocatable_potential_component,
};
use crate::resolve::get_ultimate;

/// The FINAL subroutines of this type whose single dummy argument's derived
/// type matches the instantiation.
pub fn finals_for_derived_type_instantiation(
    ctx: &SemanticsContext,
    spec: TypeSpecId,
) -> Vec<SymbolId> {
    let mut result = Vec::new();
    let type_symbol = ctx.type_spec(spec).type_symbol;
    let Some(details) = ctx.symbol(type_symbol).derived_type_details() else {
        return result;
    };
    let spec_type = DynamicType::derived(spec);
    for &subr in &details.finals {
        // Malformed FINAL subroutines are diagnosed elsewhere; just skip
        // anything that does not have exactly one typed dummy argument.
        let Some(subprogram) = ctx.symbol(subr).subprogram_details() else {
            continue;
        };
        if subprogram.dummy_args.len() != 1 {
            continue;
        }
        let Some(arg) = subprogram.dummy_args[0] else {
            continue;
        };
        let arg_derived = ctx
            .symbol(arg)
            .get_type()
            .and_then(DeclType::as_derived);
        if let Some(arg_spec) = arg_derived
            && DynamicType::derived(arg_spec).is_tk_compatible_with(&spec_type, ctx)
        {
            result.push(subr);
        }
    }
    result
}

/// The finalizer that applies to an object with this symbol's type and
/// rank, if any. Pointers, assumed-rank objects, and dummies that are not
/// INTENT(OUT) are never finalized on the way out of a scope.
pub fn is_finalizable_symbol(
    ctx: &SemanticsContext,
    symbol: SymbolId,
    in_progress: &mut FxHashSet<TypeSpecId>,
    with_impure_finalizer: bool,
) -> Option<SymbolId> {
    let sym = ctx.symbol(symbol);
    if sym.is_pointer() || sym.is_assumed_rank() {
        return None;
    }
    let object = sym.object_details()?;
    if object.is_dummy && !sym.is_intent_out() {
        return None;
    }
    let derived = object.ty.as_ref().and_then(DeclType::as_derived)?;
    is_finalizable_inner(ctx, derived, in_progress, with_impure_finalizer, Some(sym.rank))
}

/// The finalizer that applies to this derived type at the given rank, if
/// any. `None` rank accepts any non-elemental candidate.
pub fn is_finalizable(
    ctx: &SemanticsContext,
    derived: TypeSpecId,
    rank: Option<u32>,
) -> Option<SymbolId> {
    let mut in_progress = FxHashSet::default();
    is_finalizable_inner(ctx, derived, &mut in_progress, false, rank)
}

/// Like [`is_finalizable`], but only an impure finalizer counts. Pure
/// finalizers are skipped, though component finalizers are still searched.
pub fn has_impure_final(
    ctx: &SemanticsContext,
    derived: TypeSpecId,
    rank: Option<u32>,
) -> Option<SymbolId> {
    let mut in_progress = FxHashSet::default();
    is_finalizable_inner(ctx, derived, &mut in_progress, true, rank)
}

fn is_finalizable_inner(
    ctx: &SemanticsContext,
    derived: TypeSpecId,
    in_progress: &mut FxHashSet<TypeSpecId>,
    with_impure_finalizer: bool,
    rank: Option<u32>,
) -> Option<SymbolId> {
    let mut elemental: Option<SymbolId> = None;
    'candidates: for final_ref in finals_for_derived_type_instantiation(ctx, derived) {
        let mut symbol = Some(get_ultimate(ctx, final_ref));
        if let Some(binding) = symbol.and_then(|id| ctx.symbol(id).binding_details()) {
            symbol = Some(binding.symbol);
        }
        if let Some(proc) = symbol.and_then(|id| ctx.symbol(id).proc_details()) {
            symbol = proc.interface;
        }
        let Some(candidate) = symbol else {
            continue;
        };
        if ctx.symbol(candidate).is_elemental_procedure() {
            elemental = Some(candidate);
        } else {
            if let Some(rank) = rank
                && let Some(subprogram) = ctx.symbol(candidate).subprogram_details()
                && let Some(Some(arg)) = subprogram.dummy_args.first()
                && !ctx.symbol(*arg).is_assumed_rank()
                && ctx.symbol(*arg).rank != rank
            {
                continue 'candidates; // not a finalizer for this rank
            }
            if !with_impure_finalizer || !ctx.symbol(candidate).is_pure_procedure() {
                trace!(?candidate, "matched non-elemental finalizer");
                return Some(candidate);
            }
            // Found a non-elemental pure finalizer of matching rank, but
            // still need to check components for an impure finalizer.
            elemental = None;
            break;
        }
    }
    if let Some(candidate) = elemental
        && (!with_impure_finalizer || !ctx.symbol(candidate).is_pure_procedure())
    {
        return Some(candidate);
    }
    // Check components (including ancestors); don't loop on recursive types.
    if !in_progress.insert(derived) {
        return None;
    }
    let mut result = None;
    for component in ComponentIterator::new(ctx, derived, ComponentKind::Potential) {
        result = is_finalizable_symbol(ctx, component, in_progress, with_impure_finalizer);
        if result.is_some() {
            break;
        }
    }
    in_progress.remove(&derived);
    result
}

/// Finalization may be needed at runtime even without a statically resolved
/// finalizer when a polymorphic allocatable component's dynamic type could
/// be finalizable.
pub fn may_require_finalization(ctx: &SemanticsContext, derived: TypeSpecId) -> bool {
    is_finalizable(ctx, derived, None).is_some()
        || find_polymorphic_allocatable_potential_component(ctx, derived).is_some()
}

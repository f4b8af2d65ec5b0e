//! Type compatibility oracle: intrinsic operator and assignment rules.
//!
//! Pure functions over (category, kind, rank) tuples. Rank conformability
//! is the usual elementwise rule: a scalar conforms with anything, otherwise
//! ranks must match.

use fortsem_symbols::{DeclType, DynamicType, SemanticsContext, TypeCategory, TypeSpecId};
use rustc_hash::FxHashSet;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tristate {
    No,
    Yes,
    Maybe,
}

impl Tristate {
    fn from_bool(value: bool) -> Self {
        if value { Tristate::Yes } else { Tristate::No }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RelationalOperator {
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
}

/// Shape conformability for elementwise intrinsic operations.
pub fn are_conformable(rank0: u32, rank1: u32) -> bool {
    rank0 == 0 || rank1 == 0 || rank0 == rank1
}

pub fn is_intrinsic_numeric(type0: &DynamicType) -> bool {
    type0.category.is_numeric()
}

pub fn is_intrinsic_numeric_pair(
    type0: &DynamicType,
    rank0: u32,
    type1: &DynamicType,
    rank1: u32,
) -> bool {
    are_conformable(rank0, rank1) && type0.category.is_numeric() && type1.category.is_numeric()
}

pub fn is_intrinsic_logical(type0: &DynamicType) -> bool {
    type0.category == TypeCategory::Logical
}

pub fn is_intrinsic_logical_pair(
    type0: &DynamicType,
    rank0: u32,
    type1: &DynamicType,
    rank1: u32,
) -> bool {
    are_conformable(rank0, rank1)
        && type0.category == TypeCategory::Logical
        && type1.category == TypeCategory::Logical
}

/// Concatenation requires character operands of the same kind.
pub fn is_intrinsic_concat(
    type0: &DynamicType,
    rank0: u32,
    type1: &DynamicType,
    rank1: u32,
) -> bool {
    are_conformable(rank0, rank1)
        && type0.category == TypeCategory::Character
        && type1.category == TypeCategory::Character
        && type0.kind == type1.kind
}

pub fn is_intrinsic_relational(
    opr: RelationalOperator,
    type0: &DynamicType,
    rank0: u32,
    type1: &DynamicType,
    rank1: u32,
) -> bool {
    if !are_conformable(rank0, rank1) {
        return false;
    }
    let cat0 = type0.category;
    let cat1 = type1.category;
    if cat0 == TypeCategory::Unsigned || cat1 == TypeCategory::Unsigned {
        cat0 == cat1
    } else if cat0.is_numeric() && cat1.is_numeric() {
        // numeric types: EQ/NE always ok, others ok for non-complex
        opr == RelationalOperator::Eq
            || opr == RelationalOperator::Ne
            || (cat0 != TypeCategory::Complex && cat1 != TypeCategory::Complex)
    } else {
        // not both numeric: only Character is ok
        cat0 == TypeCategory::Character && cat1 == TypeCategory::Character
    }
}

/// 7.5.2.4 "same derived type" test: rely on tk-compatibility to cover
/// distinct (but "same") sequence/BIND(C) derived types.
fn might_be_same_derived_type(
    ctx: &SemanticsContext,
    lhs: Option<&DynamicType>,
    rhs: Option<&DynamicType>,
) -> bool {
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => lhs.is_tk_compatible_with(rhs, ctx),
        _ => false,
    }
}

/// Could this assignment be a defined (user-provided) assignment?
///
/// `No` means intrinsic assignment applies (or the types are unknown);
/// `Yes` means only a defined assignment could be valid; `Maybe` means a
/// derived-to-same-derived assignment where either could apply and the
/// caller must look further.
pub fn is_defined_assignment(
    ctx: &SemanticsContext,
    lhs_type: Option<&DynamicType>,
    lhs_rank: u32,
    rhs_type: Option<&DynamicType>,
    rhs_rank: u32,
) -> Tristate {
    let (Some(lhs), Some(rhs)) = (lhs_type, rhs_type) else {
        return Tristate::No; // error or rhs is untyped
    };
    let lhs_cat = lhs.category;
    let rhs_cat = rhs.category;
    if rhs_rank > 0 && lhs_rank != rhs_rank {
        Tristate::Yes
    } else if lhs_cat != TypeCategory::Derived {
        Tristate::from_bool(
            lhs_cat != rhs_cat
                && (!lhs_cat.is_numeric()
                    || !rhs_cat.is_numeric()
                    || lhs_cat == TypeCategory::Unsigned
                    || rhs_cat == TypeCategory::Unsigned),
        )
    } else if might_be_same_derived_type(ctx, lhs_type, rhs_type) {
        Tristate::Maybe // TYPE(t) = TYPE(t) can be defined or intrinsic
    } else {
        Tristate::Yes
    }
}

/// Does this derived type, or any non-pointer component type reachable from
/// it, declare a generic assignment or contain a polymorphic non-pointer
/// component? Visited scopes are cached within one call, which also bounds
/// the recursion on self-referential types.
pub fn may_have_defined_assignment(ctx: &SemanticsContext, derived: TypeSpecId) -> bool {
    let mut checked = FxHashSet::default();
    may_have_defined_assignment_inner(ctx, derived, &mut checked)
}

fn may_have_defined_assignment_inner(
    ctx: &SemanticsContext,
    derived: TypeSpecId,
    checked: &mut FxHashSet<fortsem_symbols::ScopeId>,
) -> bool {
    let Some(scope) = ctx.spec_scope(derived) else {
        return false;
    };
    if !checked.insert(scope) {
        return false;
    }
    for (_, symbol) in ctx.scope(scope).iter() {
        let sym = ctx.symbol(symbol);
        if let Some(generic) = sym.generic_details() {
            if generic.kind.is_assignment() {
                return true;
            }
        } else if sym.object_details().is_some() && !sym.is_pointer() {
            match sym.get_type() {
                Some(ty) if ty.is_polymorphic() => return true,
                Some(ty) => {
                    if let Some(component_type) = DeclType::as_derived(ty)
                        && may_have_defined_assignment_inner(ctx, component_type, checked)
                    {
                        return true;
                    }
                }
                None => {}
            }
        }
    }
    false
}

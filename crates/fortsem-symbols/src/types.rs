//! Intrinsic and derived type representations.
//!
//! [`DynamicType`] is the (category, kind) pair the compatibility oracle
//! works over; [`DeclType`] is the declared type attached to entities;
//! [`DerivedTypeSpec`] is one instantiation of a derived type with a
//! concrete actual-parameter binding.

use crate::arena::{ScopeId, SymbolId, TypeSpecId};
use crate::context::SemanticsContext;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Unsigned,
    Real,
    Complex,
    Character,
    Logical,
    Derived,
}

impl TypeCategory {
    /// Integer, Unsigned, Real, and Complex count as numeric; callers that
    /// need to exclude Unsigned test it separately.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TypeCategory::Integer | TypeCategory::Unsigned | TypeCategory::Real | TypeCategory::Complex
        )
    }
}

/// The (category, kind) pair of a fully resolved type, plus the spec for
/// derived types.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DynamicType {
    pub category: TypeCategory,
    pub kind: u8,
    pub derived: Option<TypeSpecId>,
}

impl DynamicType {
    pub const fn intrinsic(category: TypeCategory, kind: u8) -> Self {
        Self { category, kind, derived: None }
    }

    pub const fn derived(spec: TypeSpecId) -> Self {
        Self { category: TypeCategory::Derived, kind: 0, derived: Some(spec) }
    }

    /// Type-and-kind compatibility: same category and kind for intrinsics;
    /// for derived types, the same ultimate type definition with equal
    /// actual parameter values. This is the "same derived type" test that
    /// also covers separately declared sequence/BIND(C) types, which compare
    /// by definition rather than by declaration site.
    pub fn is_tk_compatible_with(&self, other: &DynamicType, ctx: &SemanticsContext) -> bool {
        if self.category != other.category {
            return false;
        }
        match (self.derived, other.derived) {
            (Some(a), Some(b)) => derived_type_specs_compatible(ctx, a, b),
            (None, None) => self.kind == other.kind,
            _ => false,
        }
    }
}

/// Equality of derived-type instantiations by definition and parameters.
pub(crate) fn derived_type_specs_compatible(
    ctx: &SemanticsContext,
    a: TypeSpecId,
    b: TypeSpecId,
) -> bool {
    if a == b {
        return true;
    }
    let spec_a = ctx.type_spec(a);
    let spec_b = ctx.type_spec(b);
    if spec_a.type_symbol != spec_b.type_symbol {
        // Distinct SEQUENCE type definitions with the same name compare equal.
        let sym_a = ctx.symbol(spec_a.type_symbol);
        let sym_b = ctx.symbol(spec_b.type_symbol);
        let both_sequence = sym_a
            .derived_type_details()
            .zip(sym_b.derived_type_details())
            .is_some_and(|(da, db)| da.sequence && db.sequence);
        if !(both_sequence && sym_a.name == sym_b.name) {
            return false;
        }
    }
    spec_a.params == spec_b.params
}

/// Character length specification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CharLength {
    Known(u64),
    Assumed,
    Deferred,
}

/// A declared type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeclType {
    /// Numeric or logical intrinsic type.
    Intrinsic(DynamicType),
    Character { kind: u8, len: CharLength },
    /// TYPE(t)
    Derived(TypeSpecId),
    /// CLASS(t) - polymorphic derived
    Class(TypeSpecId),
    /// TYPE(*) - assumed type
    AssumedType,
    /// CLASS(*) - unlimited polymorphic
    ClassStar,
}

impl DeclType {
    pub fn as_derived(&self) -> Option<TypeSpecId> {
        match self {
            DeclType::Derived(spec) | DeclType::Class(spec) => Some(*spec),
            _ => None,
        }
    }

    pub fn is_intrinsic(&self) -> bool {
        matches!(self, DeclType::Intrinsic(_) | DeclType::Character { .. })
    }

    pub fn is_polymorphic(&self) -> bool {
        matches!(self, DeclType::Class(_) | DeclType::ClassStar)
    }

    /// The dynamic type, when one is statically known.
    pub fn dynamic_type(&self) -> Option<DynamicType> {
        match self {
            DeclType::Intrinsic(dynamic) => Some(*dynamic),
            DeclType::Character { kind, .. } => {
                Some(DynamicType::intrinsic(TypeCategory::Character, *kind))
            }
            DeclType::Derived(spec) | DeclType::Class(spec) => Some(DynamicType::derived(*spec)),
            DeclType::AssumedType | DeclType::ClassStar => None,
        }
    }
}

/// An actual value bound to a derived-type parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    Int(i64),
    Assumed,
    Deferred,
}

/// One instantiation of a derived type with a specific actual-parameter
/// binding. Cached per distinct binding within the owning scope.
#[derive(Clone, Debug)]
pub struct DerivedTypeSpec {
    /// The defining type symbol.
    pub type_symbol: SymbolId,
    /// The instantiated component scope; absent until instantiation, in
    /// which case the type symbol's own defining scope stands in.
    pub scope: Option<ScopeId>,
    /// Actual parameter values keyed by parameter name, in declaration order.
    pub params: Vec<(String, ParamValue)>,
}

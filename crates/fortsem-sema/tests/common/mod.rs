//! Shared graph-building helpers for the query-layer integration tests.
//!
//! These drive the same construction API the external resolver uses.
#![allow(dead_code)] // not every test binary uses every helper

use fortsem_symbols::{
    Attrs, DeclType, Details, DerivedTypeDetails, DynamicType, ObjectEntityDetails, ScopeId,
    ScopeKind, SemanticsContext, SymbolFlags, SymbolId, TypeCategory, TypeSpecId,
};

/// Install a test subscriber once; RUST_LOG=trace shows query tracing.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn integer_type() -> DeclType {
    DeclType::Intrinsic(DynamicType::intrinsic(TypeCategory::Integer, 4))
}

pub fn real_type() -> DeclType {
    DeclType::Intrinsic(DynamicType::intrinsic(TypeCategory::Real, 4))
}

/// A module scope with its module symbol declared in the global scope.
pub fn module(ctx: &mut SemanticsContext, name: &str) -> ScopeId {
    let scope = ctx.push_scope(ctx.global_scope(), ScopeKind::Module);
    let symbol = ctx.declare(ctx.global_scope(), name, Details::Module);
    ctx.bind_scope_symbol(scope, symbol);
    scope
}

/// A subprogram scope with its subprogram symbol declared in `parent`.
pub fn subprogram(ctx: &mut SemanticsContext, parent: ScopeId, name: &str) -> (ScopeId, SymbolId) {
    let scope = ctx.push_scope(parent, ScopeKind::Subprogram);
    let symbol = ctx.declare(parent, name, Details::Subprogram(Default::default()));
    ctx.bind_scope_symbol(scope, symbol);
    (scope, symbol)
}

/// An object entity of the given type.
pub fn object(ctx: &mut SemanticsContext, scope: ScopeId, name: &str, ty: DeclType) -> SymbolId {
    ctx.declare(
        scope,
        name,
        Details::Object(ObjectEntityDetails { ty: Some(ty), ..Default::default() }),
    )
}

/// An object entity with layout (offset, size) already assigned.
pub fn laid_out_object(
    ctx: &mut SemanticsContext,
    scope: ScopeId,
    name: &str,
    offset: u64,
    size: u64,
) -> SymbolId {
    ctx.declare(
        scope,
        name,
        Details::Object(ObjectEntityDetails {
            ty: Some(integer_type()),
            offset,
            size,
            ..Default::default()
        }),
    )
}

/// A derived type definition: the type symbol plus its component scope.
pub fn derived_type(
    ctx: &mut SemanticsContext,
    owner: ScopeId,
    name: &str,
) -> (SymbolId, ScopeId) {
    let type_symbol = ctx.declare(owner, name, Details::DerivedType(DerivedTypeDetails::default()));
    let type_scope = ctx.push_scope(owner, ScopeKind::DerivedType);
    ctx.bind_scope_symbol(type_scope, type_symbol);
    (type_symbol, type_scope)
}

/// Declare a component in a type's scope and record it in declaration order.
pub fn component(
    ctx: &mut SemanticsContext,
    type_symbol: SymbolId,
    name: &str,
    ty: DeclType,
    attrs: Attrs,
) -> SymbolId {
    let type_scope = ctx.symbol(type_symbol).scope.expect("type has a component scope");
    let symbol = ctx.declare(
        type_scope,
        name,
        Details::Object(ObjectEntityDetails { ty: Some(ty), ..Default::default() }),
    );
    ctx.symbol_mut(symbol).attrs = attrs;
    match &mut ctx.symbol_mut(type_symbol).details {
        Details::DerivedType(details) => details.component_names.push(name.to_string()),
        _ => panic!("not a derived type symbol"),
    }
    symbol
}

/// Declare the parent (base) component of an extended type.
pub fn parent_component(
    ctx: &mut SemanticsContext,
    type_symbol: SymbolId,
    name: &str,
    base: TypeSpecId,
) -> SymbolId {
    let symbol = component(ctx, type_symbol, name, DeclType::Derived(base), Attrs::empty());
    ctx.symbol_mut(symbol).flags |= SymbolFlags::PARENT_COMP;
    symbol
}

/// The unparameterized instantiation of a type, cached in `scope`.
pub fn spec_of(ctx: &mut SemanticsContext, scope: ScopeId, type_symbol: SymbolId) -> TypeSpecId {
    ctx.find_or_instantiate_derived_type(scope, type_symbol, Vec::new())
}

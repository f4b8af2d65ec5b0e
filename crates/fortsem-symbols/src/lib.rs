//! Symbol, scope, and derived-type graph model.
//!
//! The graph is built once per compilation unit by an external resolver and
//! queried read-only afterwards. All nodes live in arenas owned by
//! [`SemanticsContext`]; cross-references are integer handles (`SymbolId`,
//! `ScopeId`, `TypeSpecId`), never raw pointers, so back-references cannot
//! dangle while the context is alive.
//!
//! Contents:
//! - Arena handles (`arena`)
//! - Declared names and their payloads (`symbol`)
//! - Lexical regions and name tables (`scope`)
//! - Intrinsic and derived types (`types`)
//! - The owning compilation context (`context`)

pub mod arena;
pub use arena::{ScopeId, SymbolId, TypeSpecId};

pub mod symbol;
pub use symbol::{
    Attrs, CommonBlockDetails, CudaDataAttr, Details, DerivedTypeDetails, GenericDetails,
    GenericKind, MiscKind, ObjectEntityDetails, ProcBindingDetails, ProcEntityDetails,
    SubprogramDetails, SubprogramKind, SubprogramNameDetails, Symbol, SymbolFlags,
};

pub mod scope;
pub use scope::{CrayPointerAssoc, EquivalenceObject, EquivalenceSet, Scope, ScopeKind};

pub mod types;
pub use types::{CharLength, DeclType, DerivedTypeSpec, DynamicType, ParamValue, TypeCategory};

pub mod context;
pub use context::{LanguageFeatures, SemanticsContext};

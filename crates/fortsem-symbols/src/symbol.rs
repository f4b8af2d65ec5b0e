//! Declared names and their kind-specific payloads.
//!
//! A [`Symbol`] is one declared name: its attribute flags, rank, owning
//! scope, and a [`Details`] payload that varies with the kind of declaration
//! (object entity, procedure entity, generic, use association, ...). The
//! payload is a tagged union matched exhaustively at every query site.

use bitflags::bitflags;
use fortsem_common::SourceLocation;

use crate::arena::{ScopeId, SymbolId};
use crate::types::DeclType;

bitflags! {
    /// Declared attributes (POINTER, ALLOCATABLE, PRIVATE, ...).
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct Attrs: u32 {
        const POINTER      = 1 << 0;
        const ALLOCATABLE  = 1 << 1;
        const TARGET       = 1 << 2;
        const PRIVATE      = 1 << 3;
        const PUBLIC       = 1 << 4;
        const BIND_C       = 1 << 5;
        const EXTERNAL     = 1 << 6;
        const INTRINSIC    = 1 << 7;
        const DEFERRED     = 1 << 8;
        const MODULE       = 1 << 9;
        const ELEMENTAL    = 1 << 10;
        const PURE         = 1 << 11;
        const IMPURE       = 1 << 12;
        const INTENT_IN    = 1 << 13;
        const INTENT_OUT   = 1 << 14;
        const INTENT_INOUT = 1 << 15;
        const ABSTRACT     = 1 << 16;
        const PARAMETER    = 1 << 17;
        const SAVE         = 1 << 18;
        const OPTIONAL     = 1 << 19;
        const CONTIGUOUS   = 1 << 20;
        const VALUE        = 1 << 21;
        const VOLATILE     = 1 << 22;
    }
}

bitflags! {
    /// Resolver-computed marks that are not source attributes.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct SymbolFlags: u32 {
        /// This component is the parent (base type) component of a derived type.
        const PARENT_COMP   = 1 << 0;
        const FUNCTION      = 1 << 1;
        const SUBROUTINE    = 1 << 2;
        const IN_DATA_STMT  = 1 << 3;
        const CRAY_POINTER  = 1 << 4;
        const CRAY_POINTEE  = 1 << 5;
    }
}

/// CUDA data attribute, refined late by the device-side resolver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CudaDataAttr {
    Constant,
    Device,
    Managed,
    Pinned,
    Shared,
    Texture,
    Unified,
}

/// Payload for a data object entity.
#[derive(Clone, Debug, Default)]
pub struct ObjectEntityDetails {
    pub ty: Option<DeclType>,
    pub is_dummy: bool,
    pub is_assumed_rank: bool,
    /// Corank; nonzero makes the object a coarray.
    pub corank: u32,
    /// Byte offset assigned by the external layout pass.
    pub offset: u64,
    /// Byte size assigned by the external layout pass.
    pub size: u64,
    pub has_init: bool,
    pub cuda_attr: Option<CudaDataAttr>,
}

/// Payload for a procedure entity (dummy procedure, procedure pointer,
/// or EXTERNAL name with or without an explicit interface).
#[derive(Clone, Debug, Default)]
pub struct ProcEntityDetails {
    pub interface: Option<SymbolId>,
    pub is_dummy: bool,
    pub has_init: bool,
}

/// Payload for a type-bound procedure binding.
#[derive(Clone, Debug)]
pub struct ProcBindingDetails {
    pub symbol: SymbolId,
}

/// Payload for a subprogram with a body or interface block.
#[derive(Clone, Debug, Default)]
pub struct SubprogramDetails {
    pub is_interface: bool,
    pub is_stmt_function: bool,
    /// Dummy arguments in declaration order; `None` marks alternate returns.
    pub dummy_args: Vec<Option<SymbolId>>,
    /// For a separate module procedure body, the corresponding interface.
    pub module_interface: Option<SymbolId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubprogramKind {
    Module,
    Internal,
}

/// Payload for a subprogram known only by name so far (from a CONTAINS
/// statement scan, before its body has been resolved).
#[derive(Clone, Debug)]
pub struct SubprogramNameDetails {
    pub kind: SubprogramKind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GenericKind {
    Name,
    Assignment,
    DefinedOperator,
}

impl GenericKind {
    pub fn is_assignment(self) -> bool {
        self == GenericKind::Assignment
    }

    pub fn is_defined_operator(self) -> bool {
        self == GenericKind::DefinedOperator
    }
}

/// Payload for a generic name, generic assignment, or defined operator.
#[derive(Clone, Debug)]
pub struct GenericDetails {
    pub kind: GenericKind,
    /// The single non-generic declaration hidden behind this generic name,
    /// if there is exactly one (e.g. a specific procedure or derived type
    /// with the same name).
    pub specific: Option<SymbolId>,
    pub specifics: Vec<SymbolId>,
}

/// Payload for a derived type definition.
#[derive(Clone, Debug, Default)]
pub struct DerivedTypeDetails {
    /// Component names in declaration order; traversal follows this order.
    pub component_names: Vec<String>,
    /// Type parameter names in declaration order, not including inherited ones.
    pub param_names: Vec<String>,
    pub param_decls: Vec<SymbolId>,
    /// FINAL subroutine symbols.
    pub finals: Vec<SymbolId>,
    pub sequence: bool,
}

/// Payload for a COMMON block name.
#[derive(Clone, Debug, Default)]
pub struct CommonBlockDetails {
    pub objects: Vec<SymbolId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MiscKind {
    TypeBoundDefinedOp,
    ConstructName,
}

/// Kind-specific declaration payload.
#[derive(Clone, Debug)]
pub enum Details {
    Object(ObjectEntityDetails),
    Proc(ProcEntityDetails),
    ProcBinding(ProcBindingDetails),
    Subprogram(SubprogramDetails),
    SubprogramName(SubprogramNameDetails),
    Generic(GenericDetails),
    DerivedType(DerivedTypeDetails),
    /// Name made visible by USE association; refers to the used symbol.
    Use { symbol: SymbolId },
    /// Name captured from the host scope; refers to the host symbol.
    HostAssoc { symbol: SymbolId },
    CommonBlock(CommonBlockDetails),
    TypeParam { ty: Option<DeclType> },
    MainProgram,
    Module,
    Misc(MiscKind),
}

/// A declared name.
///
/// Invariants: exactly one owner scope; a `Use`/`HostAssoc` payload refers to
/// exactly one target symbol other than itself, and the association chain
/// terminates.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    /// Owning scope (non-owning back-reference; the scope owns the name).
    pub owner: ScopeId,
    pub attrs: Attrs,
    pub flags: SymbolFlags,
    pub rank: u32,
    pub bind_name: Option<String>,
    /// The scope this symbol itself defines (component scope of a derived
    /// type, body scope of a subprogram, ...), if any.
    pub scope: Option<ScopeId>,
    pub location: SourceLocation,
    pub details: Details,
}

impl Symbol {
    pub fn new(name: impl Into<String>, owner: ScopeId, details: Details) -> Self {
        Self {
            name: name.into(),
            owner,
            attrs: Attrs::empty(),
            flags: SymbolFlags::empty(),
            rank: 0,
            bind_name: None,
            scope: None,
            location: SourceLocation::default(),
            details,
        }
    }

    // Payload accessors

    pub fn object_details(&self) -> Option<&ObjectEntityDetails> {
        match &self.details {
            Details::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn proc_details(&self) -> Option<&ProcEntityDetails> {
        match &self.details {
            Details::Proc(proc) => Some(proc),
            _ => None,
        }
    }

    pub fn binding_details(&self) -> Option<&ProcBindingDetails> {
        match &self.details {
            Details::ProcBinding(binding) => Some(binding),
            _ => None,
        }
    }

    pub fn subprogram_details(&self) -> Option<&SubprogramDetails> {
        match &self.details {
            Details::Subprogram(subprogram) => Some(subprogram),
            _ => None,
        }
    }

    pub fn generic_details(&self) -> Option<&GenericDetails> {
        match &self.details {
            Details::Generic(generic) => Some(generic),
            _ => None,
        }
    }

    pub fn derived_type_details(&self) -> Option<&DerivedTypeDetails> {
        match &self.details {
            Details::DerivedType(derived) => Some(derived),
            _ => None,
        }
    }

    pub fn common_block_details(&self) -> Option<&CommonBlockDetails> {
        match &self.details {
            Details::CommonBlock(common) => Some(common),
            _ => None,
        }
    }

    /// The declared type, for payloads that carry one.
    pub fn get_type(&self) -> Option<&DeclType> {
        match &self.details {
            Details::Object(object) => object.ty.as_ref(),
            Details::TypeParam { ty } => ty.as_ref(),
            _ => None,
        }
    }

    // Attribute and payload predicates

    pub fn is_pointer(&self) -> bool {
        self.attrs.contains(Attrs::POINTER)
    }

    pub fn is_allocatable(&self) -> bool {
        self.attrs.contains(Attrs::ALLOCATABLE)
    }

    pub fn is_allocatable_or_pointer(&self) -> bool {
        self.attrs.intersects(Attrs::ALLOCATABLE | Attrs::POINTER)
    }

    pub fn is_intent_in(&self) -> bool {
        self.attrs.contains(Attrs::INTENT_IN)
    }

    pub fn is_intent_out(&self) -> bool {
        self.attrs.contains(Attrs::INTENT_OUT)
    }

    pub fn is_dummy(&self) -> bool {
        match &self.details {
            Details::Object(object) => object.is_dummy,
            Details::Proc(proc) => proc.is_dummy,
            _ => false,
        }
    }

    pub fn is_parent_component(&self) -> bool {
        self.flags.contains(SymbolFlags::PARENT_COMP)
    }

    /// True for every payload that can denote a procedure.
    pub fn is_procedure(&self) -> bool {
        matches!(
            self.details,
            Details::Proc(_)
                | Details::ProcBinding(_)
                | Details::Subprogram(_)
                | Details::SubprogramName(_)
                | Details::Generic(_)
        )
    }

    pub fn is_procedure_pointer(&self) -> bool {
        matches!(self.details, Details::Proc(_)) && self.is_pointer()
    }

    pub fn is_function(&self) -> bool {
        self.flags.contains(SymbolFlags::FUNCTION)
    }

    pub fn is_elemental_procedure(&self) -> bool {
        self.is_procedure() && self.attrs.contains(Attrs::ELEMENTAL)
    }

    /// PURE attribute, or ELEMENTAL without IMPURE (elemental implies pure
    /// unless declared IMPURE).
    pub fn is_pure_procedure(&self) -> bool {
        self.is_procedure()
            && (self.attrs.contains(Attrs::PURE)
                || (self.attrs.contains(Attrs::ELEMENTAL) && !self.attrs.contains(Attrs::IMPURE)))
    }

    pub fn is_coarray(&self) -> bool {
        self.object_details().is_some_and(|object| object.corank > 0)
    }

    pub fn is_assumed_rank(&self) -> bool {
        self.object_details().is_some_and(|object| object.is_assumed_rank)
    }

    pub fn is_polymorphic(&self) -> bool {
        self.get_type().is_some_and(|ty| ty.is_polymorphic())
    }

    pub fn is_unlimited_polymorphic(&self) -> bool {
        matches!(self.get_type(), Some(DeclType::ClassStar))
    }

    pub fn is_assumed_type(&self) -> bool {
        matches!(self.get_type(), Some(DeclType::AssumedType))
    }

    pub fn is_polymorphic_allocatable(&self) -> bool {
        self.is_allocatable() && self.is_polymorphic()
    }

    pub fn cuda_attr(&self) -> Option<CudaDataAttr> {
        self.object_details().and_then(|object| object.cuda_attr)
    }
}

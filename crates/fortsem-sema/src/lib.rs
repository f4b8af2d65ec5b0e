//! Read-only semantic queries over the symbol/scope/type graph.
//!
//! Everything here is a pure function of an immutable
//! [`SemanticsContext`](fortsem_symbols::SemanticsContext):
//! - Scope navigation (`scopes`): ancestor searches for program units,
//!   modules, pure procedures, device contexts
//! - Symbol resolution (`resolve`): ultimate resolution through use/host
//!   association, generic bypass, interface and subprogram lookup,
//!   procedure classification, accessibility, global unification
//! - Type compatibility (`compat`): intrinsic operator and assignment rules
//! - Component traversal (`components`): the six-policy lazy iterator over
//!   derived-type component graphs, plus the finders built on it
//! - Finalization analysis (`finalization`)
//! - Storage association (`storage`): EQUIVALENCE aliasing groups
//!
//! Expected misses return `None`/`false`; violated preconditions panic
//! (contract violations abort analysis); user-facing rule violations come
//! back as structured [`SemanticMessage`](fortsem_common::SemanticMessage)
//! payloads for the caller to render.

pub mod scopes;
pub use scopes::{
    does_scope_contain, find_cuda_device_context, find_module_containing,
    find_module_file_containing, find_module_or_submodule_containing,
    find_openacc_construct_containing, find_pure_procedure_containing, find_scope_containing,
    get_program_unit_containing, get_program_unit_or_block_construct_containing,
    get_top_level_unit_containing,
};

pub mod resolve;
pub use resolve::{
    ProcedureDefinitionClass, bypass_generic, check_accessible_symbol, classify_procedure,
    find_common_block_containing, find_equivalence_set, find_externally_visible_object,
    find_global, find_interface, find_overridden_binding,
    find_separate_module_subprogram_interface, find_subprogram, follow_host_assoc,
    get_cray_pointer, get_ultimate, is_accessible, is_common_block_containing, is_external,
    is_generic_defined_op, is_host_associated, is_host_associated_into_subprogram,
    is_in_blank_common, is_module_procedure, is_use_associated,
};

pub mod compat;
pub use compat::{
    RelationalOperator, Tristate, are_conformable, is_defined_assignment, is_intrinsic_concat,
    is_intrinsic_logical, is_intrinsic_logical_pair, is_intrinsic_numeric,
    is_intrinsic_numeric_pair, is_intrinsic_relational, may_have_defined_assignment,
};

pub mod components;
pub use components::{
    ComponentIterator, ComponentKind, find_allocatable_or_pointer_direct_component,
    find_allocatable_ultimate_component, find_coarray_potential_component,
    find_coarray_ultimate_component, find_cuda_device_allocatable_ultimate_component,
    find_event_or_lock_potential_component, find_immediate_component,
    find_pointer_potential_component, find_pointer_ultimate_component,
    find_polymorphic_allocatable_potential_component, find_ultimate_component,
    get_cuda_data_attr, has_allocatable_direct_component, is_device_allocatable,
};

pub mod finalization;
pub use finalization::{
    finals_for_derived_type_instantiation, has_impure_final, is_finalizable,
    is_finalizable_symbol, may_require_finalization,
};

pub mod storage;
pub use storage::get_storage_associations;

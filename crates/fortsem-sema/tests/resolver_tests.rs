mod common;

use common::*;
use fortsem_sema::*;
use fortsem_symbols::{
    Attrs, CommonBlockDetails, Details, GenericDetails, GenericKind, ObjectEntityDetails,
    ProcEntityDetails, ScopeKind, SemanticsContext, SubprogramDetails,
};

#[test]
fn test_get_ultimate_follows_use_and_host_links() {
    init_tracing();
    let mut ctx = SemanticsContext::new();
    let m = module(&mut ctx, "m");
    let x = object(&mut ctx, m, "x", integer_type());

    let gs = ctx.global_scope();
    let (f, _) = subprogram(&mut ctx, gs, "f");
    let used = ctx.declare(f, "x", Details::Use { symbol: x });
    let (inner, _) = subprogram(&mut ctx, f, "g");
    let host = ctx.declare(inner, "x", Details::HostAssoc { symbol: used });

    assert_eq!(get_ultimate(&ctx, host), x);
    assert_eq!(get_ultimate(&ctx, used), x);
    assert_eq!(get_ultimate(&ctx, x), x);
}

#[test]
fn test_get_ultimate_is_idempotent() {
    let mut ctx = SemanticsContext::new();
    let m = module(&mut ctx, "m");
    let x = object(&mut ctx, m, "x", integer_type());
    let gs = ctx.global_scope();
    let (f, _) = subprogram(&mut ctx, gs, "f");
    let used = ctx.declare(f, "x", Details::Use { symbol: x });

    let once = get_ultimate(&ctx, used);
    assert_eq!(get_ultimate(&ctx, once), once);
}

#[test]
fn test_follow_host_assoc_stops_at_use_links() {
    let mut ctx = SemanticsContext::new();
    let m = module(&mut ctx, "m");
    let x = object(&mut ctx, m, "x", integer_type());
    let gs = ctx.global_scope();
    let (f, _) = subprogram(&mut ctx, gs, "f");
    let used = ctx.declare(f, "x", Details::Use { symbol: x });
    let (inner, _) = subprogram(&mut ctx, f, "g");
    let host = ctx.declare(inner, "x", Details::HostAssoc { symbol: used });

    assert_eq!(follow_host_assoc(&ctx, host), used);
}

#[test]
fn test_bypass_generic_with_single_specific() {
    let mut ctx = SemanticsContext::new();
    let m = module(&mut ctx, "m");
    let specific = ctx.declare(m, "sin_r4", Details::Subprogram(SubprogramDetails::default()));
    let generic = ctx.declare(
        m,
        "sin",
        Details::Generic(GenericDetails {
            kind: GenericKind::Name,
            specific: Some(specific),
            specifics: vec![specific],
        }),
    );
    assert_eq!(bypass_generic(&ctx, generic), specific);
}

#[test]
fn test_bypass_generic_without_specific_is_identity() {
    let mut ctx = SemanticsContext::new();
    let m = module(&mut ctx, "m");
    let generic = ctx.declare(
        m,
        "assign",
        Details::Generic(GenericDetails {
            kind: GenericKind::Assignment,
            specific: None,
            specifics: Vec::new(),
        }),
    );
    assert_eq!(bypass_generic(&ctx, generic), generic);
}

#[test]
fn test_find_interface_and_subprogram() {
    let mut ctx = SemanticsContext::new();
    let m = module(&mut ctx, "m");
    let body = ctx.declare(m, "impl", Details::Subprogram(SubprogramDetails::default()));
    let with_iface = ctx.declare(
        m,
        "p",
        Details::Proc(ProcEntityDetails { interface: Some(body), ..Default::default() }),
    );
    let without_iface =
        ctx.declare(m, "q", Details::Proc(ProcEntityDetails::default()));

    assert_eq!(find_interface(&ctx, with_iface), Some(body));
    assert_eq!(find_subprogram(&ctx, with_iface), Some(body));
    // No explicit interface: no interface declaration, but the procedure
    // entity itself stands in as the subprogram.
    assert_eq!(find_interface(&ctx, without_iface), None);
    assert_eq!(find_subprogram(&ctx, without_iface), Some(without_iface));
}

#[test]
fn test_classify_procedure() {
    let mut ctx = SemanticsContext::new();
    let m = module(&mut ctx, "m");

    let data = object(&mut ctx, m, "x", integer_type());
    assert_eq!(classify_procedure(&ctx, data), ProcedureDefinitionClass::None);

    let intrinsic = ctx.declare(m, "sin", Details::Proc(ProcEntityDetails::default()));
    ctx.symbol_mut(intrinsic).attrs |= Attrs::INTRINSIC;
    assert_eq!(classify_procedure(&ctx, intrinsic), ProcedureDefinitionClass::Intrinsic);

    let dummy = ctx.declare(
        m,
        "callback",
        Details::Proc(ProcEntityDetails { is_dummy: true, ..Default::default() }),
    );
    assert_eq!(classify_procedure(&ctx, dummy), ProcedureDefinitionClass::Dummy);

    let pointer = ctx.declare(m, "pp", Details::Proc(ProcEntityDetails::default()));
    ctx.symbol_mut(pointer).attrs |= Attrs::POINTER;
    assert_eq!(classify_procedure(&ctx, pointer), ProcedureDefinitionClass::Pointer);

    let external = ctx.declare(m, "ext", Details::Proc(ProcEntityDetails::default()));
    ctx.symbol_mut(external).attrs |= Attrs::EXTERNAL;
    assert_eq!(classify_procedure(&ctx, external), ProcedureDefinitionClass::External);

    let module_proc = ctx.declare(m, "mp", Details::Subprogram(SubprogramDetails::default()));
    assert_eq!(classify_procedure(&ctx, module_proc), ProcedureDefinitionClass::Module);

    let program = ctx.push_scope(ctx.global_scope(), ScopeKind::MainProgram);
    let internal = ctx.declare(program, "helper", Details::Subprogram(SubprogramDetails::default()));
    assert_eq!(classify_procedure(&ctx, internal), ProcedureDefinitionClass::Internal);

    let stmt_func = ctx.declare(
        program,
        "sf",
        Details::Subprogram(SubprogramDetails { is_stmt_function: true, ..Default::default() }),
    );
    assert_eq!(classify_procedure(&ctx, stmt_func), ProcedureDefinitionClass::StatementFunction);
}

#[test]
fn test_accessibility_of_private_names() {
    let mut ctx = SemanticsContext::new();
    let m = module(&mut ctx, "m");
    let hidden = object(&mut ctx, m, "secret", integer_type());
    ctx.symbol_mut(hidden).attrs |= Attrs::PRIVATE;
    let (inside, _) = subprogram(&mut ctx, m, "f");
    let gs = ctx.global_scope();
    let (outside, _) = subprogram(&mut ctx, gs, "g");

    assert!(is_accessible(&ctx, hidden, inside));
    assert!(!is_accessible(&ctx, hidden, outside));

    assert!(check_accessible_symbol(&ctx, inside, hidden).is_none());
    let message = check_accessible_symbol(&ctx, outside, hidden).expect("payload for violation");
    assert!(message.text.contains("secret"));
    assert!(message.text.contains("'m'"));
    assert_eq!(message.attachments.len(), 1);
}

#[test]
fn test_accessibility_not_enforced_in_module_files() {
    let mut ctx = SemanticsContext::new();
    let m = module(&mut ctx, "m");
    let hidden = object(&mut ctx, m, "secret", integer_type());
    ctx.symbol_mut(hidden).attrs |= Attrs::PRIVATE;

    let module_file = ctx.push_scope(ctx.global_scope(), ScopeKind::ModuleFile);
    let inner = ctx.push_scope(module_file, ScopeKind::Subprogram);
    assert!(!is_accessible(&ctx, hidden, inner));
    assert!(check_accessible_symbol(&ctx, inner, hidden).is_none());
}

#[test]
fn test_find_global_unifies_external_declarations() {
    let mut ctx = SemanticsContext::new();
    let global_decl = ctx.declare(
        ctx.global_scope(),
        "work",
        Details::Subprogram(SubprogramDetails::default()),
    );
    let gs = ctx.global_scope();
    let (f, _) = subprogram(&mut ctx, gs, "f");
    let local = ctx.declare(f, "work", Details::Proc(ProcEntityDetails::default()));
    ctx.symbol_mut(local).attrs |= Attrs::EXTERNAL;

    assert_eq!(find_global(&ctx, local), Some(global_decl));
    assert_eq!(find_global(&ctx, global_decl), Some(global_decl));
}

#[test]
fn test_find_global_respects_bind_names() {
    let mut ctx = SemanticsContext::new();
    ctx.declare(
        ctx.global_scope(),
        "work",
        Details::Subprogram(SubprogramDetails::default()),
    );
    let gs = ctx.global_scope();
    let (f, _) = subprogram(&mut ctx, gs, "f");
    let local = ctx.declare(f, "work", Details::Proc(ProcEntityDetails::default()));
    ctx.symbol_mut(local).attrs |= Attrs::EXTERNAL;
    ctx.symbol_mut(local).bind_name = Some("c_work".to_string());

    assert_eq!(find_global(&ctx, local), None);
}

#[test]
fn test_externally_visible_objects() {
    let mut ctx = SemanticsContext::new();
    let gs = ctx.global_scope();
    let (f, _) = subprogram(&mut ctx, gs, "f");
    let (g, _) = subprogram(&mut ctx, gs, "g");

    // INTENT(IN) dummy is externally visible.
    let dummy = ctx.declare(
        f,
        "arg",
        Details::Object(ObjectEntityDetails {
            ty: Some(integer_type()),
            is_dummy: true,
            ..Default::default()
        }),
    );
    ctx.symbol_mut(dummy).attrs |= Attrs::INTENT_IN;
    assert_eq!(find_externally_visible_object(&ctx, dummy, f, false), Some(dummy));

    // Purely local object: not visible.
    let local = object(&mut ctx, f, "tmp", integer_type());
    assert_eq!(find_externally_visible_object(&ctx, local, f, false), None);

    // Object from a different program unit: visible.
    assert_eq!(find_externally_visible_object(&ctx, local, g, false), Some(local));

    // COMMON member: the block is what is visible.
    let shared = object(&mut ctx, f, "shared", integer_type());
    let block = ctx.declare(
        f,
        "blk",
        Details::CommonBlock(CommonBlockDetails { objects: vec![shared] }),
    );
    assert_eq!(find_externally_visible_object(&ctx, shared, f, false), Some(block));
    assert!(is_common_block_containing(&ctx, block, shared));
}

#[test]
fn test_is_use_associated() {
    let mut ctx = SemanticsContext::new();
    let m = module(&mut ctx, "m");
    let x = object(&mut ctx, m, "x", integer_type());
    let gs = ctx.global_scope();
    let (f, _) = subprogram(&mut ctx, gs, "f");
    let used = ctx.declare(f, "x", Details::Use { symbol: x });

    assert!(is_use_associated(&ctx, used, f));
    let (inside_m, _) = subprogram(&mut ctx, m, "own");
    assert!(!is_use_associated(&ctx, x, inside_m));
}

#[test]
fn test_cray_pointer_association() {
    let mut ctx = SemanticsContext::new();
    let gs = ctx.global_scope();
    let (f, _) = subprogram(&mut ctx, gs, "f");
    let pointer = object(&mut ctx, f, "ptr", integer_type());
    let pointee = object(&mut ctx, f, "buf", integer_type());
    ctx.add_cray_pointer(f, "buf", pointer);

    assert_eq!(get_cray_pointer(&ctx, pointee), pointer);
}

#[test]
#[should_panic(expected = "no Cray pointer")]
fn test_missing_cray_pointer_is_a_contract_violation() {
    let mut ctx = SemanticsContext::new();
    let gs = ctx.global_scope();
    let (f, _) = subprogram(&mut ctx, gs, "f");
    let orphan = object(&mut ctx, f, "buf", integer_type());
    get_cray_pointer(&ctx, orphan);
}

#[test]
fn test_is_host_associated() {
    let mut ctx = SemanticsContext::new();
    let gs = ctx.global_scope();
    let (f, _) = subprogram(&mut ctx, gs, "f");
    let x = object(&mut ctx, f, "x", integer_type());
    let (inner, _) = subprogram(&mut ctx, f, "g");
    let host = ctx.declare(inner, "x", Details::HostAssoc { symbol: x });

    assert!(is_host_associated(&ctx, host, inner));
    assert!(is_host_associated_into_subprogram(&ctx, host, inner));
    // The defining unit does not host-associate its own symbol.
    assert!(!is_host_associated(&ctx, x, f));
}

#[test]
fn test_find_overridden_binding() {
    use fortsem_symbols::ProcBindingDetails;

    let mut ctx = SemanticsContext::new();
    let m = module(&mut ctx, "m");
    let show_base = ctx.declare(m, "show_base", Details::Subprogram(SubprogramDetails::default()));
    let show_ext = ctx.declare(m, "show_ext", Details::Subprogram(SubprogramDetails::default()));

    let (base, base_scope) = derived_type(&mut ctx, m, "base");
    let base_binding =
        ctx.declare(base_scope, "show", Details::ProcBinding(ProcBindingDetails { symbol: show_base }));
    let base_spec = spec_of(&mut ctx, m, base);

    let (ext, ext_scope) = derived_type(&mut ctx, m, "ext");
    parent_component(&mut ctx, ext, "base", base_spec);
    let ext_binding =
        ctx.declare(ext_scope, "show", Details::ProcBinding(ProcBindingDetails { symbol: show_ext }));

    assert_eq!(find_overridden_binding(&ctx, ext_binding), (Some(base_binding), false));
    // A binding with no parent type overrides nothing.
    assert_eq!(find_overridden_binding(&ctx, base_binding), (None, false));

    // An inaccessible DEFERRED binding is still reported, flagged.
    ctx.symbol_mut(base_binding).attrs |= Attrs::PRIVATE | Attrs::DEFERRED;
    // base is declared in m, ext's scope is inside m, so PRIVATE alone
    // would not hide it; move the check to a foreign scope via a fresh
    // module pair instead.
    let other = module(&mut ctx, "other");
    let show_far = ctx.declare(other, "show_far", Details::Subprogram(SubprogramDetails::default()));
    let (far, far_scope) = derived_type(&mut ctx, other, "far");
    parent_component(&mut ctx, far, "base", base_spec);
    let far_binding =
        ctx.declare(far_scope, "show", Details::ProcBinding(ProcBindingDetails { symbol: show_far }));
    assert_eq!(find_overridden_binding(&ctx, far_binding), (Some(base_binding), true));
}

#[test]
fn test_find_equivalence_set() {
    let mut ctx = SemanticsContext::new();
    let gs = ctx.global_scope();
    let (f, _) = subprogram(&mut ctx, gs, "f");
    let a = object(&mut ctx, f, "a", integer_type());
    let b = object(&mut ctx, f, "b", integer_type());
    let c = object(&mut ctx, f, "c", integer_type());
    ctx.add_equivalence_set(
        f,
        vec![
            fortsem_symbols::EquivalenceObject { symbol: a },
            fortsem_symbols::EquivalenceObject { symbol: b },
        ],
    );

    assert!(find_equivalence_set(&ctx, a).is_some());
    assert!(find_equivalence_set(&ctx, b).is_some());
    assert!(find_equivalence_set(&ctx, c).is_none());
}

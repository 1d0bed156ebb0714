use super::*;
use crate::fixtures::Fixture;
use crate::types::Constant;
use clsem_binder::Flags;
use clsem_common::{TermName, TypeName};

#[test]
fn widen_strips_expr_types_and_constants() {
    let f = Fixture::new();
    let ctx = &f.ctx;
    let int = ctx.defn.int_type;
    let nested = ctx.types.expr(ctx.types.expr(int));
    assert_eq!(widen(ctx, nested), int);
    let one = ctx.types.constant(Constant::Int(1));
    assert_eq!(widen(ctx, one), int);
    let hello = ctx.types.constant(Constant::String(ctx.intern("hello")));
    assert_eq!(widen(ctx, hello), ctx.defn.string_type);
}

#[test]
fn widen_leaves_methodic_types_alone() {
    let f = Fixture::new();
    let ctx = &f.ctx;
    let binder = ctx.types.fresh_binder();
    let method = ctx.types.method(binder, vec![], vec![], ctx.defn.int_type);
    assert_eq!(widen(ctx, method), method);
    assert_eq!(final_result_type(ctx, method), ctx.defn.int_type);
}

#[test]
fn widen_term_ref_uses_declared_type() {
    let mut f = Fixture::new();
    let holder = f.class("Holder", &[]);
    let string = f.ctx.defn.string_type;
    let name = f.ctx.term_name("value");
    let value = f.getter(holder, "value", string);
    let prefix = f.ctx.types.this_type(holder);
    let by_symbol = f.ctx.types.symbol_term_ref(prefix, value);
    let by_name = f.ctx.types.named_term_ref(prefix, name);
    assert_eq!(widen(&f.ctx, by_symbol), string);
    assert_eq!(widen(&f.ctx, by_name), string);
}

#[test]
fn widen_term_ref_sees_type_arguments_of_prefix() {
    let mut f = Fixture::new();
    let (boxed, t) = f.box_class();
    let t_ref = f.ctx.types.param_type_ref(t);
    let get = f.getter(boxed, "get", t_ref);

    let holder = f.class("Holder", &[]);
    let box_of_int = f.applied(boxed, vec![f.ctx.defn.int_type]);
    let field_name = TermName::from_str(&f.ctx.names, "b");
    let field = f
        .ctx
        .enter()
        .term(holder, field_name, Flags::empty(), box_of_int)
        .unwrap();
    let this = f.ctx.types.this_type(holder);
    let field_ref = f.ctx.types.symbol_term_ref(this, field);
    let get_ref = f.ctx.types.symbol_term_ref(field_ref, get);

    assert_eq!(widen(&f.ctx, get_ref), f.ctx.defn.int_type);
}

#[test]
fn is_ref_through_aliases_and_widening() {
    let mut f = Fixture::new();
    let holder = f.class("Holder", &[]);
    let string = f.ctx.defn.string_type;
    let alias = f.ctx.enter().type_alias(holder, "Str", string).unwrap();
    let alias_ref = f.ctx.types.symbol_type_ref(f.ctx.types.this_type(holder), alias);
    let ctx = &f.ctx;

    assert!(is_ref(ctx, alias_ref, ctx.defn.string_class));
    assert!(is_ref(ctx, ctx.types.expr(alias_ref), ctx.defn.string_class));
    assert!(!is_ref(ctx, alias_ref, ctx.defn.object_class));
}

#[test]
fn is_ref_resolves_named_references() {
    let f = Fixture::new();
    let ctx = &f.ctx;
    let java_lang = ctx.types.package_ref(ctx.defn.java_lang_package);
    let named = ctx.types.named_type_ref(java_lang, ctx.type_name("String"));
    assert!(is_ref(ctx, named, ctx.defn.string_class));
    let missing = ctx.types.named_type_ref(java_lang, ctx.type_name("Missing"));
    assert!(!is_ref(ctx, missing, ctx.defn.string_class));
    assert_eq!(class_symbol(ctx, missing), None);
}

#[test]
fn is_ref_is_false_for_applied_types() {
    let f = Fixture::new();
    let ctx = &f.ctx;
    let array_of_int = ctx.types.applied(ctx.defn.array_tycon, vec![ctx.defn.int_type]);
    assert!(!is_ref(ctx, array_of_int, ctx.defn.array_class));
    assert_eq!(class_symbol(ctx, array_of_int), Some(ctx.defn.array_class));
}

#[test]
fn is_applied_checks_constructor_and_arguments() {
    let f = Fixture::new();
    let ctx = &f.ctx;
    let array_of_int = ctx.types.applied(ctx.defn.array_tycon, vec![ctx.defn.int_type]);
    let is_array = |t| is_ref(ctx, t, ctx.defn.array_class);
    let is_int = |t| is_ref(ctx, t, ctx.defn.int_class);
    let is_string = |t| is_ref(ctx, t, ctx.defn.string_class);

    assert!(is_applied(ctx, array_of_int, &is_array, &[&is_int]));
    assert!(is_applied(ctx, ctx.types.expr(array_of_int), &is_array, &[&is_int]));
    assert!(!is_applied(ctx, array_of_int, &is_array, &[&is_string]));
    assert!(!is_applied(ctx, array_of_int, &is_array, &[&is_int, &is_int]));
    assert!(!is_applied(ctx, ctx.defn.int_type, &is_array, &[]));
}

#[test]
fn parts_are_flattened_on_demand() {
    let f = Fixture::new();
    let ctx = &f.ctx;
    let (a, b, c) = (ctx.defn.int_type, ctx.defn.string_type, ctx.defn.object_type);
    let nested = ctx.types.and(ctx.types.and(a, b), c);
    assert_eq!(and_parts(ctx, nested).as_slice(), &[a, b, c]);
    assert_eq!(or_parts(ctx, nested).as_slice(), &[nested]);

    let is = |cls| move |t| is_ref(ctx, t, cls);
    let (pa, pb, pc) = (
        is(ctx.defn.int_class),
        is(ctx.defn.string_class),
        is(ctx.defn.object_class),
    );
    assert!(is_intersection_of(ctx, nested, &[&pa, &pb, &pc]));
    assert!(!is_intersection_of(ctx, nested, &[&pa, &pb]));
    assert!(!is_union_of(ctx, nested, &[&pa, &pb, &pc]));

    let union = ctx.types.or(a, ctx.types.or(b, c));
    assert!(is_union_of(ctx, union, &[&pa, &pb, &pc]));
    assert!(!is_intersection_of(ctx, a, &[&pa]));
}

#[test]
fn final_result_of_curried_chain() {
    let f = Fixture::new();
    let ctx = &f.ctx;
    let (b1, b2, b3) = (
        ctx.types.fresh_binder(),
        ctx.types.fresh_binder(),
        ctx.types.fresh_binder(),
    );
    let inner = ctx.types.method(b3, vec![], vec![ctx.defn.int_type], ctx.defn.string_type);
    let middle = ctx.types.method(b2, vec![], vec![], inner);
    let bound = ctx.types.bounds(ctx.defn.nothing_type, ctx.defn.any_type);
    let poly = ctx.types.poly(b1, vec![ctx.intern("T")], vec![bound], middle);
    assert!(is_methodic(ctx, poly));
    assert_eq!(final_result_type(ctx, poly), ctx.defn.string_type);
    assert_eq!(final_result_type(ctx, ctx.defn.int_type), ctx.defn.int_type);
}

#[test]
fn same_type_ignores_prefix_spelling() {
    let f = Fixture::new();
    let ctx = &f.ctx;
    let java_lang = ctx.types.package_ref(ctx.defn.java_lang_package);
    let named = ctx.types.named_type_ref(java_lang, ctx.type_name("String"));
    assert!(is_same_type(ctx, named, ctx.defn.string_type));
    assert!(!is_same_type(ctx, named, ctx.defn.object_type));

    let arr1 = ctx.types.applied(ctx.defn.array_tycon, vec![named]);
    let arr2 = ctx.types.applied(ctx.defn.array_tycon, vec![ctx.defn.string_type]);
    assert!(is_same_type(ctx, arr1, arr2));
}

#[test]
fn same_type_renames_method_binders() {
    let f = Fixture::new();
    let ctx = &f.ctx;
    let (b1, b2) = (ctx.types.fresh_binder(), ctx.types.fresh_binder());
    let bound = ctx.types.bounds(ctx.defn.nothing_type, ctx.defn.any_type);
    let t = ctx.intern("T");
    let p1 = ctx.types.poly(b1, vec![t], vec![bound], ctx.types.param_ref(b1, 0));
    let p2 = ctx.types.poly(b2, vec![t], vec![bound], ctx.types.param_ref(b2, 0));
    assert_ne!(p1, p2);
    assert!(is_same_type(ctx, p1, p2));
}

#[test]
fn class_symbol_of_type_parameter_uses_bound() {
    let mut f = Fixture::new();
    let string = f.ctx.defn.string_type;
    let pkg = f.pkg;
    let mut enter = f.ctx.enter();
    let class = enter
        .class_stub(pkg, TypeName::plain(enter.names.intern("C")))
        .unwrap();
    let params = enter.type_param_stubs(class, &["S"]).unwrap();
    enter.complete_type_param(params[0], Flags::empty(), None, Some(string)).unwrap();
    let param_ref = f.ctx.types.param_type_ref(params[0]);
    assert_eq!(class_symbol(&f.ctx, param_ref), Some(f.ctx.defn.string_class));
}

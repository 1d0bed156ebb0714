//! Read-only queries over a published context from many threads.

use clsem_binder::Flags;
use clsem_solver::{Context, all_overridden_symbols, linearization, widen};
use rayon::prelude::*;

#[test]
fn linearization_and_overrides_from_many_threads() {
    let mut ctx = Context::new().unwrap();
    let object = ctx.defn.object_type;
    let unit = ctx.defn.unit_type;
    let pkg = ctx.enter().package_path("demo.deep").unwrap();

    let mut classes = Vec::new();
    let mut methods = Vec::new();
    let mut parent = object;
    for i in 0..32 {
        let mut enter = ctx.enter();
        let class = enter
            .class(pkg, &format!("C{i}"), Flags::empty(), vec![parent])
            .unwrap();
        let run = enter.method(class, "run", Flags::empty(), &[], unit).unwrap();
        parent = enter.class_type(class);
        classes.push(class);
        methods.push(run);
    }
    let ctx = ctx;

    let lengths: Vec<usize> = classes
        .par_iter()
        .map(|&class| linearization(&ctx, class).unwrap().len())
        .collect();
    for (i, len) in lengths.iter().enumerate() {
        assert_eq!(*len, i + 1 + ctx.defn.root_chain().len());
    }

    let overridden: Vec<usize> = methods
        .par_iter()
        .map(|&m| all_overridden_symbols(&ctx, m).unwrap().len())
        .collect();
    assert_eq!(overridden, (0..32).collect::<Vec<_>>());

    let widened: Vec<_> = (0..64)
        .into_par_iter()
        .map(|_| widen(&ctx, ctx.types.expr(ctx.defn.int_type)))
        .collect();
    assert!(widened.iter().all(|&t| t == ctx.defn.int_type));
}

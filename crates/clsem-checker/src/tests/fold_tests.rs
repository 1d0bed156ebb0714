use super::*;
use crate::fixtures::Model;
use crate::trees::Tree;
use clsem_solver::Constant;

/// `class Printer extends Object { def name: String = "p"; val v: Box[Int] }`
fn sample(model: &Model) -> Tree {
    let ctx = &model.ctx;
    Tree::class_def(
        model.printer_class,
        vec![Tree::type_ident(ctx.defn.object_class)],
        vec![
            Tree::def_def(
                model.printer_name,
                vec![],
                vec![],
                Tree::type_ident(ctx.defn.string_class),
                Some(Tree::literal(Constant::String(ctx.intern("p")))),
            ),
            Tree::val_def(
                model.box_value,
                Tree::applied_type(
                    Tree::type_ident(model.box_class),
                    vec![Tree::type_ident(ctx.defn.int_class)],
                ),
                None,
            ),
        ],
    )
}

#[test]
fn counts_every_node() {
    let model = Model::new();
    // ClassDef, Object, DefDef, String, literal, ValDef, AppliedTypeTree, Box, Int
    assert_eq!(count_nodes(&sample(&model)), 9);
}

#[test]
fn collects_outermost_type_trees() {
    let model = Model::new();
    let tree = sample(&model);
    let found: Vec<&str> = collect_type_trees(&tree)
        .into_iter()
        .map(Tree::node_name)
        .collect();
    assert_eq!(found, vec!["TypeIdent", "TypeIdent", "AppliedTypeTree"]);
}

#[test]
fn collects_defined_symbols() {
    let model = Model::new();
    assert_eq!(
        defined_symbols(&sample(&model)),
        vec![model.printer_class, model.printer_name, model.box_value]
    );
}

#[test]
fn fold_visits_in_pre_order() {
    let model = Model::new();
    let tree = sample(&model);
    let initials = fold(
        &tree,
        Traversal::AllNodes,
        &String::new(),
        &mut |node| node.node_name().chars().next().map(String::from).unwrap_or_default(),
        &|left, right| left + &right,
    );
    assert_eq!(initials, "CTDTLVATT");
}

#[test]
fn type_all_types_every_node() {
    let model = Model::new();
    let tree = sample(&model);
    assert_eq!(type_all(&model.ctx, &tree), Ok(9));
    assert!(collect_type_trees(&tree)
        .iter()
        .all(|tpt| tpt.cached_type().is_some()));

    let broken = Tree::block(
        vec![Tree::apply(Tree::literal(Constant::Int(1)), vec![])],
        Tree::literal(Constant::Unit),
    );
    assert!(type_all(&model.ctx, &broken).is_err());
}

use super::*;
use clsem_common::{SymbolId, TypeId};

fn sym(n: u32) -> SymbolId {
    SymbolId(n)
}

#[test]
fn families_are_disjoint() {
    let term = Tree::literal(Constant::Int(1));
    let tpt = Tree::inferred(TypeId::NO_TYPE);
    let def = Tree::val_def(sym(3), Tree::inferred(TypeId::NO_TYPE), None);
    assert!(term.is_term() && !term.is_type_tree() && !term.is_definition());
    assert!(tpt.is_type_tree() && !tpt.is_term());
    assert!(def.is_definition());
    assert_eq!(def.defined_symbol(), Some(sym(3)));
    assert_eq!(term.defined_symbol(), None);
}

#[test]
fn children_come_in_source_order() {
    let tree = Tree::def_def(
        sym(1),
        vec![Tree::type_def(sym(2), Tree::inferred(TypeId::NO_TYPE))],
        vec![Tree::val_def(sym(3), Tree::type_ident(sym(4)), None)],
        Tree::type_ident(sym(5)),
        Some(Tree::ident(sym(6))),
    );
    let mut names = Vec::new();
    tree.for_each_child(|child| names.push(child.node_name()));
    assert_eq!(names, vec!["TypeDef", "ValDef", "TypeIdent", "Ident"]);
}

#[test]
fn leaves_have_no_children() {
    for leaf in [
        Tree::ident(sym(1)),
        Tree::this(sym(1)),
        Tree::literal(Constant::Null),
        Tree::type_ident(sym(1)),
    ] {
        let mut count = 0;
        leaf.for_each_child(|_| count += 1);
        assert_eq!(count, 0, "{}", leaf.node_name());
    }
}

#[test]
fn fresh_trees_are_untyped() {
    let tree = Tree::apply(Tree::ident(sym(1)), vec![Tree::ident(sym(2))]);
    assert_eq!(tree.cached_type(), None);
    assert!(format!("{tree:?}").contains("Apply"));
}

//! Type traversal helpers.

use crate::context::Context;
use crate::types::{BinderId, TypeData};
use clsem_common::TypeId;
use rustc_hash::FxHashSet;

/// Call `f` on every direct child type of `data`.
pub fn for_each_child(data: &TypeData, mut f: impl FnMut(TypeId)) {
    match data {
        TypeData::TypeRef { prefix, .. } | TypeData::TermRef { prefix, .. } => f(*prefix),
        TypeData::AppliedType { tycon, args } => {
            f(*tycon);
            args.iter().copied().for_each(f);
        }
        TypeData::AndType(left, right) | TypeData::OrType(left, right) => {
            f(*left);
            f(*right);
        }
        TypeData::ExprType(inner)
        | TypeData::WildcardTypeBounds(inner)
        | TypeData::TypeAlias(inner) => f(*inner),
        TypeData::TypeBounds { low, high } => {
            f(*low);
            f(*high);
        }
        TypeData::MethodType {
            param_types: params,
            result,
            ..
        }
        | TypeData::PolyType {
            bounds: params,
            result,
            ..
        }
        | TypeData::TypeLambda {
            bounds: params,
            result,
            ..
        } => {
            params.iter().copied().for_each(&mut f);
            f(*result);
        }
        TypeData::NoType
        | TypeData::NoPrefix
        | TypeData::PackageRef(_)
        | TypeData::ThisType(_)
        | TypeData::ConstantType(_)
        | TypeData::ParamRef { .. } => {}
    }
}

/// Whether `tp` or any type reachable from it satisfies `predicate`.
pub fn contains_type_matching(
    ctx: &Context,
    tp: TypeId,
    predicate: impl Fn(&TypeData) -> bool,
) -> bool {
    let mut visited = FxHashSet::default();
    let mut stack = vec![tp];
    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        let data = ctx.types.data(current);
        if predicate(&data) {
            return true;
        }
        for_each_child(&data, |child| stack.push(child));
    }
    false
}

/// Whether `tp` mentions any parameter of `binder`.
pub fn contains_param_ref(ctx: &Context, tp: TypeId, binder: BinderId) -> bool {
    contains_type_matching(ctx, tp, |data| {
        matches!(data, TypeData::ParamRef { binder: b, .. } if *b == binder)
    })
}

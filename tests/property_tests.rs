//! Property tests over randomly shaped trees.
//!
//! A `Shape` stands in for what a front-end would reduce. It is built once through
//! the eager builder and once through the deferred builder.

use std::collections::BTreeSet;

use cel_ast::ast::{Constant, Expr, ExprId};
use cel_ast::debug::{format_literal, normalize_debug_string, to_debug_string};
use cel_ast::{Builder, DeferredBuilder, Pending};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Shape {
    Ident(String),
    Int(i64),
    Add(Box<Shape>, Box<Shape>),
    List(Vec<Shape>),
    Select(Box<Shape>, String),
    Has(Box<Shape>, String),
    Macro(&'static str, Box<Shape>, Box<Shape>),
}

fn shapes() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        "[a-z]{1,3}".prop_map(Shape::Ident),
        any::<i64>().prop_map(Shape::Int),
    ];
    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Shape::Add(Box::new(l), Box::new(r))),
            prop::collection::vec(inner.clone(), 0..3).prop_map(Shape::List),
            (inner.clone(), "[a-z]{1,3}").prop_map(|(o, f)| Shape::Select(Box::new(o), f)),
            (inner.clone(), "[a-z]{1,3}").prop_map(|(o, f)| Shape::Has(Box::new(o), f)),
            (
                prop::sample::select(vec!["all", "exists", "exists_one", "map", "filter"]),
                inner.clone(),
                inner,
            )
                .prop_map(|(m, t, b)| Shape::Macro(m, Box::new(t), Box::new(b))),
        ]
    })
}

fn build(builder: &mut Builder, shape: &Shape) -> Expr {
    match shape {
        Shape::Ident(name) => builder.new_ident_expr(0, name.as_str()),
        Shape::Int(value) => builder.new_int64_expr(0, &value.to_string()).unwrap(),
        Shape::Add(lhs, rhs) => {
            let lhs = build(builder, lhs);
            let rhs = build(builder, rhs);
            builder.new_infix_expr(1, "+", vec![lhs, rhs])
        }
        Shape::List(elements) => {
            let elements = elements.iter().map(|e| build(builder, e)).collect();
            builder.new_list_expr(2, elements)
        }
        Shape::Select(operand, field) => {
            let operand = build(builder, operand);
            builder.new_select_expr(3, operand, field.as_str())
        }
        Shape::Has(operand, field) => {
            let operand = build(builder, operand);
            let select = builder.new_select_expr(4, operand, field.as_str());
            builder.new_call_expr(5, "has", vec![select])
        }
        Shape::Macro(function, target, body) => {
            let target = build(builder, target);
            let var = builder.new_ident_expr(6, "it");
            let body = build(builder, body);
            builder.new_member_call_expr(7, target, *function, vec![var, body])
        }
    }
}

fn plan(deferred: &DeferredBuilder, shape: &Shape) -> Pending {
    match shape {
        Shape::Ident(name) => deferred.new_ident_expr(0, name.as_str()),
        Shape::Int(value) => deferred.new_int64_expr(0, &value.to_string()),
        Shape::Add(lhs, rhs) => {
            deferred.new_infix_expr(1, "+", vec![plan(deferred, lhs), plan(deferred, rhs)])
        }
        Shape::List(elements) => {
            deferred.new_list_expr(2, elements.iter().map(|e| plan(deferred, e)).collect())
        }
        Shape::Select(operand, field) => {
            deferred.new_select_expr(3, plan(deferred, operand), field.as_str())
        }
        Shape::Has(operand, field) => {
            let select = deferred.new_select_expr(4, plan(deferred, operand), field.as_str());
            deferred.new_call_expr(5, "has", vec![select])
        }
        Shape::Macro(function, target, body) => {
            let target = plan(deferred, target);
            let var = deferred.new_ident_expr(6, "it");
            let body = plan(deferred, body);
            deferred.new_member_call_expr(7, target, *function, vec![var, body])
        }
    }
}

fn eager(shape: &Shape) -> (Expr, Builder) {
    let mut builder = Builder::new();
    let expr = build(&mut builder, shape);
    (expr, builder)
}

proptest! {
    #[test]
    fn ids_are_unique_and_positioned(shape in shapes()) {
        let (expr, builder) = eager(&shape);
        let ids = expr.ids();
        let unique: BTreeSet<ExprId> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), ids.len());
        prop_assert!(ids.iter().all(|id| *id >= 1));

        let info = builder.source_info();
        for id in &ids {
            prop_assert!(info.position(*id).is_some());
        }
        // Ids are dense: orphaned ids dropped by has() are positioned too.
        let allocated: Vec<ExprId> = info.positions.keys().copied().collect();
        let dense: Vec<ExprId> = (1..=allocated.len() as ExprId).collect();
        prop_assert_eq!(allocated, dense);
        prop_assert!(unique.is_subset(&info.positions.keys().copied().collect()));
        for id in info.macro_calls.keys() {
            prop_assert!(info.position(*id).is_some());
        }
    }

    #[test]
    fn deferred_forcing_matches_eager_building(shape in shapes()) {
        let (expected, builder) = eager(&shape);
        let mut deferred = DeferredBuilder::new();
        let pending = plan(&deferred, &shape);
        let actual = deferred.force(pending).unwrap();
        prop_assert_eq!(&actual, &expected);
        prop_assert_eq!(deferred.source_info(), builder.source_info());
    }

    #[test]
    fn rendering_is_stable(shape in shapes()) {
        let (expr, _) = eager(&shape);
        let first = to_debug_string(&expr);
        prop_assert_eq!(&first, &to_debug_string(&expr));
        let normalized = normalize_debug_string(&first);
        prop_assert!(!normalized.contains(char::is_whitespace));
        prop_assert_eq!(normalize_debug_string(&normalized), normalized.clone());
    }

    #[test]
    fn quoted_strings_never_contain_raw_controls(text in any::<String>()) {
        let quoted = format_literal(&Constant::String(text));
        prop_assert!(quoted.starts_with('"') && quoted.ends_with('"'));
        prop_assert!(!quoted.chars().any(|c| c.is_control()));
    }
}

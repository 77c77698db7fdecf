//! # Shared test helpers
//!
//! Small builders for the call shapes the front-end would produce, plus rendering
//! shortcuts. Each helper builds children before parents, in source order, the way
//! a reducing parser does.

#![allow(dead_code)]

use cel_ast::debug::{to_adorned_debug_string, KindAdorner, KindAndIdAdorner};
use cel_ast::{Builder, Expr};

/// Joins expected debug output written one line per array element.
pub fn lines(parts: &[&str]) -> String {
    parts.join("\n")
}

pub fn kinds(expr: &Expr) -> String {
    to_adorned_debug_string(expr, &KindAdorner)
}

pub fn kinds_and_ids(expr: &Expr) -> String {
    to_adorned_debug_string(expr, &KindAndIdAdorner)
}

/// `[1, 2, ...]` with one literal per value, elements at offsets 1, 3, 5...
pub fn int_list(builder: &mut Builder, values: &[i64]) -> Expr {
    let elements = values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            builder
                .new_int64_expr(1 + 2 * i, &value.to_string())
                .expect("valid integer literal")
        })
        .collect();
    builder.new_list_expr(0, elements)
}

/// `target.function(var, <body>)` where `body` is produced after the variable.
pub fn member_macro(
    builder: &mut Builder,
    target: Expr,
    function: &str,
    var: &str,
    body: impl FnOnce(&mut Builder) -> Vec<Expr>,
) -> Expr {
    let iter_var = builder.new_ident_expr(10, var);
    let mut args = vec![iter_var];
    args.extend(body(builder));
    builder.new_member_call_expr(8, target, function, args)
}

/// `name op literal`, e.g. `i > 1`.
pub fn compare(builder: &mut Builder, name: &str, op: &str, value: i64) -> Expr {
    let lhs = builder.new_ident_expr(13, name);
    let rhs = builder
        .new_int64_expr(17, &value.to_string())
        .expect("valid integer literal");
    builder.new_infix_expr(15, op, vec![lhs, rhs])
}

//! Macro expansion engine.
//!
//! Recognises macro call shapes on freshly built calls and rewrites them through
//! the ordinary builder operations, so every synthesised node takes a fresh id at
//! the offset of the originating call.
//!
//! ## Id order
//!
//! Templates allocate in a fixed order: the loop step (or, for `exists_one`, the
//! init and condition first), then the remaining accumulator parts, and the
//! comprehension itself last. The same call shape therefore always yields the same
//! relative id layout.

use tracing::trace;

use crate::ast::{Call, Comprehension, Constant, Expr, ExprKind, Offset, ACCUMULATOR_VAR};
use crate::builder::Builder;
use crate::config::BuilderOptions;

use super::types::Macro;

// =============================
// Public API for macro expansion
// =============================

/// True when a global call is `has(<select>)` and `has` is enabled.
pub fn is_has_call(options: &BuilderOptions, function: &str, args: &[Expr]) -> bool {
    Macro::lookup(function, args.len(), false) == Some(Macro::Has)
        && options.expands(Macro::Has)
        && args[0].as_select().is_some()
}

/// Expands `has(x.y)` into the select node `x.y` with `test_only` set.
///
/// The call node is never handed out, but its id is still allocated and positioned.
/// Arguments that are not a select produce an ordinary `has` call.
pub fn expand_has(builder: &mut Builder, offset: Offset, mut args: Vec<Expr>) -> Expr {
    if args.len() != 1 || args[0].as_select().is_none() {
        return builder.plain_call(offset, Macro::Has.function().to_string(), None, args);
    }
    let call_id = builder.ids_mut().allocate(offset);
    let mut operand = args.remove(0);

    if builder.options().populate_macro_calls {
        let original = Expr::new(
            call_id,
            ExprKind::Call(Call {
                function: Macro::Has.function().to_string(),
                target: None,
                args: vec![operand.clone()],
            }),
        );
        builder
            .ids_mut()
            .source_info_mut()
            .record_macro_call(operand.id, original);
    }

    if let ExprKind::Select(select) = &mut operand.kind {
        select.test_only = true;
    }
    trace!(call_id, select_id = operand.id, "expanded has()");
    operand
}

/// Rewrites a member call into a comprehension when it has a macro shape.
///
/// Anything else is returned untouched.
pub fn maybe_expand(builder: &mut Builder, offset: Offset, call: Expr) -> Expr {
    let Some(found) = recognise(builder.options(), &call) else {
        return call;
    };

    let original = builder.options().populate_macro_calls.then(|| call.clone());
    let call_id = call.id;
    let ExprKind::Call(Call {
        target: Some(target),
        mut args,
        ..
    }) = call.kind
    else {
        unreachable!("recognise only accepts member calls");
    };

    let iter_var = match args.remove(0).kind {
        ExprKind::Ident(ident) => ident.name,
        _ => unreachable!("recognise only accepts an identifier first argument"),
    };
    let iter_range = *target;

    let expanded = match found {
        Macro::Exists => expand_exists(builder, offset, iter_range, iter_var, args.remove(0)),
        Macro::All => expand_all(builder, offset, iter_range, iter_var, args.remove(0)),
        Macro::ExistsOne => {
            expand_exists_one(builder, offset, iter_range, iter_var, args.remove(0))
        }
        Macro::Filter => expand_filter(builder, offset, iter_range, iter_var, args.remove(0)),
        Macro::Map if args.len() == 2 => {
            let test = args.remove(0);
            let step = args.remove(0);
            expand_map_filter(builder, offset, iter_range, iter_var, test, step)
        }
        Macro::Map => expand_map(builder, offset, iter_range, iter_var, args.remove(0)),
        Macro::Has => unreachable!("has is never receiver-style"),
    };

    trace!(
        function = found.function(),
        call_id,
        expanded_id = expanded.id,
        "expanded macro"
    );
    if let Some(original) = original {
        builder
            .ids_mut()
            .source_info_mut()
            .record_macro_call(expanded.id, original);
    }
    expanded
}

// =============================
// Recognition
// =============================

// Target present, exact arity, identifier first argument, macro enabled.
fn recognise(options: &BuilderOptions, call: &Expr) -> Option<Macro> {
    let call = call.as_call()?;
    if !call.is_member() {
        return None;
    }
    let found = Macro::lookup(&call.function, call.args.len(), true)?;
    if !options.expands(found) {
        trace!(function = %call.function, "macro disabled, keeping call");
        return None;
    }
    if call.args[0].as_ident().is_none() {
        trace!(function = %call.function, "first argument is not an identifier, keeping call");
        return None;
    }
    Some(found)
}

// =============================
// Templates
// =============================

fn accumulator(builder: &mut Builder, offset: Offset) -> Expr {
    builder.new_ident_expr(offset, ACCUMULATOR_VAR)
}

fn comprehension(builder: &mut Builder, offset: Offset, parts: Comprehension) -> Expr {
    builder
        .ids_mut()
        .next_expr(offset, ExprKind::Comprehension(Box::new(parts)))
}

// Shared shape of `exists` and `all`: boolean init, result is the accumulator.
fn bool_macro(
    builder: &mut Builder,
    offset: Offset,
    iter_range: Expr,
    iter_var: String,
    init: bool,
    loop_step: Expr,
    loop_condition: Expr,
) -> Expr {
    let accu_init = builder.new_bool_value(offset, init);
    let result = accumulator(builder, offset);
    let parts = Comprehension {
        iter_var,
        iter_var2: String::new(),
        iter_range,
        accu_var: ACCUMULATOR_VAR.to_string(),
        accu_init,
        loop_condition,
        loop_step,
        result,
    };
    comprehension(builder, offset, parts)
}

// Shared shape of `map` and `filter`: list init, always continue.
fn list_macro(
    builder: &mut Builder,
    offset: Offset,
    iter_range: Expr,
    iter_var: String,
    loop_step: Expr,
) -> Expr {
    let accu_init = builder.new_list_expr(offset, Vec::new());
    let loop_condition = builder.new_bool_value(offset, true);
    let result = accumulator(builder, offset);
    let parts = Comprehension {
        iter_var,
        iter_var2: String::new(),
        iter_range,
        accu_var: ACCUMULATOR_VAR.to_string(),
        accu_init,
        loop_condition,
        loop_step,
        result,
    };
    comprehension(builder, offset, parts)
}

// `__result__ + [element]`
fn append_to_accumulator(builder: &mut Builder, offset: Offset, element: Expr) -> Expr {
    let accu = accumulator(builder, offset);
    let wrapped = builder.new_list_expr(offset, vec![element]);
    builder.new_call_expr(offset, "_+_", vec![accu, wrapped])
}

// `test ? then : __result__`
fn conditional_step(builder: &mut Builder, offset: Offset, test: Expr, then: Expr) -> Expr {
    let otherwise = accumulator(builder, offset);
    builder.new_call_expr(offset, "_?_:_", vec![test, then, otherwise])
}

fn expand_exists(
    builder: &mut Builder,
    offset: Offset,
    iter_range: Expr,
    iter_var: String,
    test: Expr,
) -> Expr {
    let accu = accumulator(builder, offset);
    let loop_step = builder.new_call_expr(offset, "_||_", vec![accu, test]);
    let accu = accumulator(builder, offset);
    let negated = builder.new_call_expr(offset, "!_", vec![accu]);
    let loop_condition = builder.new_call_expr(offset, "@not_strictly_false", vec![negated]);
    bool_macro(builder, offset, iter_range, iter_var, false, loop_step, loop_condition)
}

fn expand_all(
    builder: &mut Builder,
    offset: Offset,
    iter_range: Expr,
    iter_var: String,
    test: Expr,
) -> Expr {
    let accu = accumulator(builder, offset);
    let loop_step = builder.new_call_expr(offset, "_&&_", vec![accu, test]);
    let accu = accumulator(builder, offset);
    let loop_condition = builder.new_call_expr(offset, "@not_strictly_false", vec![accu]);
    bool_macro(builder, offset, iter_range, iter_var, true, loop_step, loop_condition)
}

fn expand_map(
    builder: &mut Builder,
    offset: Offset,
    iter_range: Expr,
    iter_var: String,
    step: Expr,
) -> Expr {
    let loop_step = append_to_accumulator(builder, offset, step);
    list_macro(builder, offset, iter_range, iter_var, loop_step)
}

fn expand_map_filter(
    builder: &mut Builder,
    offset: Offset,
    iter_range: Expr,
    iter_var: String,
    test: Expr,
    step: Expr,
) -> Expr {
    let appended = append_to_accumulator(builder, offset, step);
    let loop_step = conditional_step(builder, offset, test, appended);
    list_macro(builder, offset, iter_range, iter_var, loop_step)
}

fn expand_filter(
    builder: &mut Builder,
    offset: Offset,
    iter_range: Expr,
    iter_var: String,
    test: Expr,
) -> Expr {
    let accu = accumulator(builder, offset);
    let element = builder.new_ident_expr(offset, iter_var.as_str());
    let wrapped = builder.new_list_expr(offset, vec![element]);
    let appended = builder.new_call_expr(offset, "_+_", vec![accu, wrapped]);
    let loop_step = conditional_step(builder, offset, test, appended);
    list_macro(builder, offset, iter_range, iter_var, loop_step)
}

fn expand_exists_one(
    builder: &mut Builder,
    offset: Offset,
    iter_range: Expr,
    iter_var: String,
    test: Expr,
) -> Expr {
    let accu_init = builder.new_const_expr(offset, Constant::Int64(0));
    let loop_condition = builder.new_bool_value(offset, true);

    let accu = accumulator(builder, offset);
    let one = builder.new_const_expr(offset, Constant::Int64(1));
    let incremented = builder.new_call_expr(offset, "_+_", vec![accu, one]);
    let loop_step = conditional_step(builder, offset, test, incremented);

    let accu = accumulator(builder, offset);
    let one = builder.new_const_expr(offset, Constant::Int64(1));
    let result = builder.new_call_expr(offset, "_==_", vec![accu, one]);

    let parts = Comprehension {
        iter_var,
        iter_var2: String::new(),
        iter_range,
        accu_var: ACCUMULATOR_VAR.to_string(),
        accu_init,
        loop_condition,
        loop_step,
        result,
    };
    comprehension(builder, offset, parts)
}

//! Deferred builder tests: forcing a plan matches eager construction.

mod common;

use cel_ast::debug::to_debug_string;
use cel_ast::{Builder, BuilderOptions, DeferredBuilder, Fragment, LiteralError, MacroSet};
use common::{kinds_and_ids, lines};

#[cfg(test)]
mod equivalence_tests {
    use super::*;

    #[test]
    fn test_forced_macro_matches_eager_build() {
        let mut eager = Builder::new();
        let l = eager.new_ident_expr(0, "l");
        let x = eager.new_ident_expr(6, "x");
        let lhs = eager.new_ident_expr(9, "x");
        let rhs = eager.new_int64_expr(13, "0").unwrap();
        let test = eager.new_infix_expr(11, ">", vec![lhs, rhs]);
        let expected = eager.new_member_call_expr(1, l, "filter", vec![x, test]);

        let mut deferred = DeferredBuilder::new();
        let l = deferred.new_ident_expr(0, "l");
        let x = deferred.new_ident_expr(6, "x");
        let lhs = deferred.new_ident_expr(9, "x");
        let rhs = deferred.new_int64_expr(13, "0");
        let test = deferred.new_infix_expr(11, ">", vec![lhs, rhs]);
        let plan = deferred.new_member_call_expr(1, l, "filter", vec![x, test]);
        let actual = deferred.force(plan).unwrap();

        assert_eq!(actual, expected);
        assert_eq!(kinds_and_ids(&actual), kinds_and_ids(&expected));
        assert_eq!(deferred.into_source_info(), eager.into_source_info());
    }

    #[test]
    fn test_forced_has_matches_eager_build() {
        let mut eager = Builder::new();
        let a = eager.new_ident_expr(4, "a");
        let select = eager.new_select_expr(5, a, "b");
        let expected = eager.new_call_expr(0, "has", vec![select]);

        let mut deferred = DeferredBuilder::new();
        let a = deferred.new_ident_expr(4, "a");
        let select = deferred.new_select_expr(5, a, "b");
        let plan = deferred.new_call_expr(0, "has", vec![select]);
        let actual = deferred.force(plan).unwrap();

        assert_eq!(actual, expected);
        assert_eq!(deferred.source_info(), eager.source_info());
    }

    #[test]
    fn test_map_entries_force_key_then_value_then_entry() {
        let mut deferred = DeferredBuilder::new();
        let key = deferred.new_string_expr(1, vec![Fragment::from("k")]);
        let value = deferred.new_double_expr(6, "0.5");
        let entry = deferred.new_optional_map_entry(4, key, value);
        let field_value = deferred.new_uint64_expr(14, "3");
        let field = deferred.new_struct_entry(11, "f", field_value);
        let plan = deferred.new_map_expr(0, vec![entry]);
        let message = deferred.new_struct_expr(10, vec![field], "M");

        let map = deferred.force(plan).unwrap();
        assert_eq!(map.ids(), vec![4, 3, 1, 2]);
        assert_eq!(to_debug_string(&map), lines(&["{", "  ?\"k\":0.5", "}"]));

        let message = deferred.force(message).unwrap();
        assert_eq!(message.ids(), vec![7, 6, 5]);
        assert_eq!(to_debug_string(&message), lines(&["M{", "  f:3u", "}"]));
    }

    #[test]
    fn test_index_and_list_plans() {
        let mut deferred = DeferredBuilder::new();
        let one = deferred.new_int64_expr(1, "1");
        let null = deferred.new_null_expr(3);
        let yes = deferred.new_bool_expr(8, "true");
        let list = deferred.new_list_expr(0, vec![one, null, yes]);
        let index = deferred.new_int64_expr(14, "0");
        let plan = deferred.new_index_expr(13, list, index);
        assert_eq!(plan.offset(), 13);

        let expr = deferred.force(plan).unwrap();
        assert_eq!(expr.id, 6);
        assert_eq!(
            to_debug_string(&expr),
            lines(&[
                "_[_](",
                "  [",
                "    1,",
                "    null,",
                "    true",
                "  ],",
                "  0",
                ")",
            ])
        );
    }
}

#[cfg(test)]
mod failure_tests {
    use super::*;

    #[test]
    fn test_bad_bytes_fail_when_forced() {
        let mut deferred = DeferredBuilder::new();
        let bytes = deferred.new_bytes_expr(2, vec![Fragment::from(vec![0x100])]);
        let list = deferred.new_list_expr(0, vec![bytes]);
        let err = deferred.force(list).unwrap_err();
        assert_eq!(err.offset(), 2);
        assert_eq!(err.literal_error(), Some(&LiteralError::ByteOutOfRange(0x100)));
    }

    #[test]
    fn test_options_carry_into_forcing() {
        let options = BuilderOptions::default().with_macros(MacroSet::none());
        let mut deferred = DeferredBuilder::with_options(options);
        let l = deferred.new_ident_expr(0, "l");
        let x = deferred.new_ident_expr(7, "x");
        let y = deferred.new_ident_expr(10, "y");
        let plan = deferred.new_member_call_expr(1, l, "all", vec![x, y]);
        let expr = deferred.force(plan).unwrap();
        assert_eq!(to_debug_string(&expr), lines(&["l.all(", "  x,", "  y", ")"]));
        assert!(deferred.into_builder().source_info().macro_calls.is_empty());
    }
}

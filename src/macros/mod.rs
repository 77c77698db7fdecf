//! # Macro Expansion
//!
//! Macros are recognised structurally on calls the builder has just produced and
//! replaced by primitive tree shapes:
//!
//! - `has(x.y)` becomes the select `x.y` with `test_only` set.
//! - `exists`, `all`, `exists_one`, `map` and `filter` become comprehensions over the
//!   call's target, accumulating into `__result__`.
//!
//! A call that looks like a macro but has the wrong arity, no target, or a first
//! argument that is not a bare identifier is left alone. That is not an error here;
//! later validation stages report it.
//!
//! Expansion never skips id allocation: the discarded call keeps its id and position,
//! and the original call is kept in `SourceInfo::macro_calls` under the id of the
//! node that replaced it.

mod expander;
mod types;

pub use expander::{expand_has, is_has_call, maybe_expand};
pub use types::{Macro, MacroSet};

//! Expression-tree construction for a CEL-like language.
//!
//! A grammar front-end drives a [`Builder`] (or a [`DeferredBuilder`]) while it
//! reduces productions. The builder allocates node ids, records source offsets in
//! [`SourceInfo`], assembles literals and expands the standard macros into
//! comprehensions. [`debug`] renders the finished tree in a canonical text form.

pub use crate::builder::{Builder, DeferredBuilder, Fragment, Pending, PendingEntry};
pub use crate::config::BuilderOptions;
pub use crate::debug::{normalize_debug_string, to_adorned_debug_string, to_debug_string};
pub use crate::errors::{BuildError, LiteralError, Result};

pub mod ast;
pub mod builder;
pub mod config;
pub mod debug;
pub mod errors;
pub mod macros;

pub use crate::ast::{Expr, ExprKind, SourceInfo};
pub use crate::macros::{Macro, MacroSet};

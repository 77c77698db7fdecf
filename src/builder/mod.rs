//! # Builder
//!
//! The façade the grammar front-end drives while reducing productions. Each
//! operation takes the source offset of the construct plus its payload and returns
//! the finished node. Children are always built before their parent, so ids grow
//! from left to right and bottom to top.
//!
//! ## Invariants
//! - Every node and entry consumes exactly one id, with its offset recorded.
//! - Member calls always pass through the macro engine before being returned.
//! - `has(x.y)` hands back the select node itself, flagged `test_only`.
//!
//! ## Example
//!
//! ```rust
//! use cel_ast::builder::Builder;
//! use cel_ast::debug::to_debug_string;
//!
//! let mut builder = Builder::new();
//! let a = builder.new_ident_expr(0, "a");
//! let one = builder.new_int64_expr(4, "1").unwrap();
//! let sum = builder.new_infix_expr(2, "+", vec![a, one]);
//! assert_eq!(to_debug_string(&sum), "_+_(\n  a,\n  1\n)");
//! assert_eq!(builder.source_info().position(sum.id), Some(2));
//! ```

use tracing::debug;

use crate::ast::{
    Call, Constant, Entry, EntryKey, Expr, ExprKind, Ident, List, Offset, Select, SourceInfo,
    Struct,
};
use crate::config::BuilderOptions;
use crate::errors::{BuildError, Result};
use crate::macros;

pub mod deferred;
pub mod ids;
pub mod literal;

pub use deferred::{DeferredBuilder, Pending, PendingEntry};
pub use ids::IdAllocator;
pub use literal::Fragment;

/// Constructs one expression tree together with its [`SourceInfo`].
///
/// A builder is meant for a single parse; independent parses need independent
/// builders since ids are only unique within one instance.
#[derive(Debug, Default)]
pub struct Builder {
    ids: IdAllocator,
    options: BuilderOptions,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuilderOptions) -> Self {
        if options != BuilderOptions::default() {
            debug!(?options, "builder created with non-default options");
        }
        Self {
            ids: IdAllocator::new(),
            options,
        }
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    pub fn source_info(&self) -> &SourceInfo {
        self.ids.source_info()
    }

    pub fn into_source_info(self) -> SourceInfo {
        self.ids.into_source_info()
    }

    pub(crate) fn ids_mut(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    // ------------------------------------------------------------------------
    // Literals
    // ------------------------------------------------------------------------

    pub fn new_const_expr(&mut self, offset: Offset, constant: Constant) -> Expr {
        self.ids.next_expr(offset, ExprKind::Literal(constant))
    }

    pub fn new_null_expr(&mut self, offset: Offset) -> Expr {
        self.new_const_expr(offset, Constant::Null)
    }

    /// Builds a boolean literal from its keyword; anything but `true` is false.
    pub fn new_bool_expr(&mut self, offset: Offset, keyword: &str) -> Expr {
        self.new_bool_value(offset, keyword == "true")
    }

    pub fn new_bool_value(&mut self, offset: Offset, value: bool) -> Expr {
        self.new_const_expr(offset, Constant::Bool(value))
    }

    pub fn new_int64_expr(&mut self, offset: Offset, digits: &str) -> Result<Expr> {
        let value = literal::parse_int64(digits)
            .map_err(|reason| BuildError::invalid_literal(offset, reason))?;
        Ok(self.new_const_expr(offset, Constant::Int64(value)))
    }

    pub fn new_uint64_expr(&mut self, offset: Offset, digits: &str) -> Result<Expr> {
        let value = literal::parse_uint64(digits)
            .map_err(|reason| BuildError::invalid_literal(offset, reason))?;
        Ok(self.new_const_expr(offset, Constant::Uint64(value)))
    }

    pub fn new_double_expr(&mut self, offset: Offset, digits: &str) -> Result<Expr> {
        let value = literal::parse_double(digits)
            .map_err(|reason| BuildError::invalid_literal(offset, reason))?;
        Ok(self.new_const_expr(offset, Constant::Double(value)))
    }

    /// Builds a string literal. Fails before allocating if a fragment holds a surrogate.
    pub fn new_string_expr(&mut self, offset: Offset, fragments: &[Fragment]) -> Result<Expr> {
        let text = literal::assemble_string(fragments)
            .map_err(|reason| BuildError::invalid_literal(offset, reason))?;
        Ok(self.new_const_expr(offset, Constant::String(text)))
    }

    pub fn new_bytes_expr(&mut self, offset: Offset, fragments: &[Fragment]) -> Result<Expr> {
        let bytes = literal::assemble_bytes(fragments)
            .map_err(|reason| BuildError::invalid_literal(offset, reason))?;
        Ok(self.new_const_expr(offset, Constant::Bytes(bytes)))
    }

    // ------------------------------------------------------------------------
    // Identifiers, selection and calls
    // ------------------------------------------------------------------------

    pub fn new_ident_expr(&mut self, offset: Offset, name: impl Into<String>) -> Expr {
        self.ids
            .next_expr(offset, ExprKind::Ident(Ident { name: name.into() }))
    }

    pub fn new_select_expr(
        &mut self,
        offset: Offset,
        operand: Expr,
        field: impl Into<String>,
    ) -> Expr {
        let select = Select {
            operand,
            field: field.into(),
            test_only: false,
        };
        self.ids.next_expr(offset, ExprKind::Select(Box::new(select)))
    }

    /// Builds a global call. `has(x.y)` short-circuits to the `has` expansion.
    pub fn new_call_expr(
        &mut self,
        offset: Offset,
        function: impl Into<String>,
        args: Vec<Expr>,
    ) -> Expr {
        let function = function.into();
        if macros::is_has_call(&self.options, &function, &args) {
            return macros::expand_has(self, offset, args);
        }
        self.plain_call(offset, function, None, args)
    }

    /// Builds a receiver-style call and offers it to the macro engine.
    pub fn new_member_call_expr(
        &mut self,
        offset: Offset,
        target: Expr,
        function: impl Into<String>,
        args: Vec<Expr>,
    ) -> Expr {
        let call = self.plain_call(offset, function.into(), Some(target), args);
        macros::maybe_expand(self, offset, call)
    }

    /// Builds a binary or ternary operator call, `_op_`, with `in` mapped to `@in`.
    pub fn new_infix_expr(&mut self, offset: Offset, op: &str, args: Vec<Expr>) -> Expr {
        let function = if op == "in" {
            "@in".to_string()
        } else {
            format!("_{op}_")
        };
        self.new_call_expr(offset, function, args)
    }

    /// Builds `operand[index]` as a call to `_[_]`.
    pub fn new_index_expr(&mut self, offset: Offset, operand: Expr, index: Expr) -> Expr {
        self.new_call_expr(offset, "_[_]", vec![operand, index])
    }

    pub(crate) fn plain_call(
        &mut self,
        offset: Offset,
        function: String,
        target: Option<Expr>,
        args: Vec<Expr>,
    ) -> Expr {
        let call = Call {
            function,
            target: target.map(Box::new),
            args,
        };
        self.ids.next_expr(offset, ExprKind::Call(call))
    }

    // ------------------------------------------------------------------------
    // Aggregates
    // ------------------------------------------------------------------------

    pub fn new_list_expr(&mut self, offset: Offset, elements: Vec<Expr>) -> Expr {
        self.ids.next_expr(offset, ExprKind::List(List { elements }))
    }

    /// Builds a message literal, or a map literal when `message_name` is empty.
    pub fn new_struct_expr(
        &mut self,
        offset: Offset,
        entries: Vec<Entry>,
        message_name: impl Into<String>,
    ) -> Expr {
        let object = Struct {
            message_name: message_name.into(),
            entries,
        };
        self.ids.next_expr(offset, ExprKind::Struct(object))
    }

    pub fn new_map_expr(&mut self, offset: Offset, entries: Vec<Entry>) -> Expr {
        self.new_struct_expr(offset, entries, "")
    }

    pub fn new_map_entry(&mut self, offset: Offset, key: Expr, value: Expr) -> Entry {
        self.ids.next_entry(offset, EntryKey::MapKey(key), value)
    }

    pub fn new_struct_entry(
        &mut self,
        offset: Offset,
        field: impl Into<String>,
        value: Expr,
    ) -> Entry {
        self.ids
            .next_entry(offset, EntryKey::FieldKey(field.into()), value)
    }

    /// `{?key: value}`: the entry is only set when the value is present.
    pub fn new_optional_map_entry(&mut self, offset: Offset, key: Expr, value: Expr) -> Entry {
        let mut entry = self.new_map_entry(offset, key, value);
        entry.optional_entry = true;
        entry
    }

    /// `Msg{?field: value}`
    pub fn new_optional_struct_entry(
        &mut self,
        offset: Offset,
        field: impl Into<String>,
        value: Expr,
    ) -> Entry {
        let mut entry = self.new_struct_entry(offset, field, value);
        entry.optional_entry = true;
        entry
    }
}

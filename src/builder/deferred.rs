//! Deferred builder.
//!
//! Instead of nodes, every operation returns a [`Pending`] plan that captures the
//! offset, the payload and the child plans. Nothing is allocated until
//! [`DeferredBuilder::force`] materialises a plan, depth-first and left to right,
//! through the eager [`Builder`]. Forcing a plan therefore produces the same ids as
//! building the same tree eagerly in source order.
//!
//! `force` consumes the plan, so a plan can be forced at most once; re-forcing would
//! allocate a second set of ids for the same source range.
//!
//! ```rust
//! use cel_ast::builder::DeferredBuilder;
//!
//! let mut deferred = DeferredBuilder::new();
//! let x = deferred.new_ident_expr(0, "x");
//! let y = deferred.new_ident_expr(4, "y");
//! let plan = deferred.new_infix_expr(2, "+", vec![x, y]);
//! let expr = deferred.force(plan).unwrap();
//! assert_eq!(expr.id, 3);
//! ```

use tracing::trace;

use crate::ast::{Entry, Expr, Offset, SourceInfo};
use crate::config::BuilderOptions;
use crate::errors::Result;

use super::{Builder, Fragment};

/// A node whose construction has been postponed.
#[derive(Debug, PartialEq)]
#[must_use = "a pending node allocates nothing until it is forced"]
pub struct Pending {
    offset: Offset,
    plan: Plan,
}

/// A struct or map entry whose construction has been postponed.
#[derive(Debug, PartialEq)]
#[must_use = "a pending entry allocates nothing until its struct is forced"]
pub struct PendingEntry {
    offset: Offset,
    key: PendingKey,
    value: Pending,
    optional: bool,
}

#[derive(Debug, PartialEq)]
enum PendingKey {
    Map(Pending),
    Field(String),
}

#[derive(Debug, PartialEq)]
enum Plan {
    Null,
    Bool(bool),
    Int64(String),
    Uint64(String),
    Double(String),
    String(Vec<Fragment>),
    Bytes(Vec<Fragment>),
    Ident(String),
    Select {
        operand: Box<Pending>,
        field: String,
    },
    Call {
        function: String,
        args: Vec<Pending>,
    },
    MemberCall {
        target: Box<Pending>,
        function: String,
        args: Vec<Pending>,
    },
    Infix {
        op: String,
        args: Vec<Pending>,
    },
    Index {
        operand: Box<Pending>,
        index: Box<Pending>,
    },
    List(Vec<Pending>),
    Struct {
        message_name: String,
        entries: Vec<PendingEntry>,
    },
}

impl Pending {
    fn new(offset: Offset, plan: Plan) -> Self {
        Self { offset, plan }
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }
}

/// Builder variant whose operations return plans instead of nodes.
#[derive(Debug, Default)]
pub struct DeferredBuilder {
    builder: Builder,
}

impl DeferredBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuilderOptions) -> Self {
        Self {
            builder: Builder::with_options(options),
        }
    }

    /// Materialises a plan into a node, allocating ids in left-to-right order.
    ///
    /// Literal errors surface here, not when the plan was created.
    pub fn force(&mut self, pending: Pending) -> Result<Expr> {
        trace!(offset = pending.offset, "forcing pending node");
        materialise(&mut self.builder, pending)
    }

    pub fn source_info(&self) -> &SourceInfo {
        self.builder.source_info()
    }

    pub fn into_builder(self) -> Builder {
        self.builder
    }

    pub fn into_source_info(self) -> SourceInfo {
        self.builder.into_source_info()
    }

    // ------------------------------------------------------------------------
    // Plan constructors, mirroring `Builder`
    // ------------------------------------------------------------------------

    pub fn new_null_expr(&self, offset: Offset) -> Pending {
        Pending::new(offset, Plan::Null)
    }

    pub fn new_bool_expr(&self, offset: Offset, keyword: &str) -> Pending {
        Pending::new(offset, Plan::Bool(keyword == "true"))
    }

    pub fn new_int64_expr(&self, offset: Offset, digits: &str) -> Pending {
        Pending::new(offset, Plan::Int64(digits.to_string()))
    }

    pub fn new_uint64_expr(&self, offset: Offset, digits: &str) -> Pending {
        Pending::new(offset, Plan::Uint64(digits.to_string()))
    }

    pub fn new_double_expr(&self, offset: Offset, digits: &str) -> Pending {
        Pending::new(offset, Plan::Double(digits.to_string()))
    }

    pub fn new_string_expr(&self, offset: Offset, fragments: Vec<Fragment>) -> Pending {
        Pending::new(offset, Plan::String(fragments))
    }

    pub fn new_bytes_expr(&self, offset: Offset, fragments: Vec<Fragment>) -> Pending {
        Pending::new(offset, Plan::Bytes(fragments))
    }

    pub fn new_ident_expr(&self, offset: Offset, name: impl Into<String>) -> Pending {
        Pending::new(offset, Plan::Ident(name.into()))
    }

    pub fn new_select_expr(
        &self,
        offset: Offset,
        operand: Pending,
        field: impl Into<String>,
    ) -> Pending {
        let plan = Plan::Select {
            operand: Box::new(operand),
            field: field.into(),
        };
        Pending::new(offset, plan)
    }

    pub fn new_call_expr(
        &self,
        offset: Offset,
        function: impl Into<String>,
        args: Vec<Pending>,
    ) -> Pending {
        let plan = Plan::Call {
            function: function.into(),
            args,
        };
        Pending::new(offset, plan)
    }

    pub fn new_member_call_expr(
        &self,
        offset: Offset,
        target: Pending,
        function: impl Into<String>,
        args: Vec<Pending>,
    ) -> Pending {
        let plan = Plan::MemberCall {
            target: Box::new(target),
            function: function.into(),
            args,
        };
        Pending::new(offset, plan)
    }

    pub fn new_infix_expr(&self, offset: Offset, op: &str, args: Vec<Pending>) -> Pending {
        let plan = Plan::Infix {
            op: op.to_string(),
            args,
        };
        Pending::new(offset, plan)
    }

    pub fn new_index_expr(&self, offset: Offset, operand: Pending, index: Pending) -> Pending {
        let plan = Plan::Index {
            operand: Box::new(operand),
            index: Box::new(index),
        };
        Pending::new(offset, plan)
    }

    pub fn new_list_expr(&self, offset: Offset, elements: Vec<Pending>) -> Pending {
        Pending::new(offset, Plan::List(elements))
    }

    pub fn new_struct_expr(
        &self,
        offset: Offset,
        entries: Vec<PendingEntry>,
        message_name: impl Into<String>,
    ) -> Pending {
        let plan = Plan::Struct {
            message_name: message_name.into(),
            entries,
        };
        Pending::new(offset, plan)
    }

    pub fn new_map_expr(&self, offset: Offset, entries: Vec<PendingEntry>) -> Pending {
        self.new_struct_expr(offset, entries, "")
    }

    pub fn new_map_entry(&self, offset: Offset, key: Pending, value: Pending) -> PendingEntry {
        PendingEntry {
            offset,
            key: PendingKey::Map(key),
            value,
            optional: false,
        }
    }

    pub fn new_struct_entry(
        &self,
        offset: Offset,
        field: impl Into<String>,
        value: Pending,
    ) -> PendingEntry {
        PendingEntry {
            offset,
            key: PendingKey::Field(field.into()),
            value,
            optional: false,
        }
    }

    pub fn new_optional_map_entry(
        &self,
        offset: Offset,
        key: Pending,
        value: Pending,
    ) -> PendingEntry {
        PendingEntry {
            optional: true,
            ..self.new_map_entry(offset, key, value)
        }
    }

    pub fn new_optional_struct_entry(
        &self,
        offset: Offset,
        field: impl Into<String>,
        value: Pending,
    ) -> PendingEntry {
        PendingEntry {
            optional: true,
            ..self.new_struct_entry(offset, field, value)
        }
    }
}

// =============================
// Materialisation
// =============================

fn materialise(builder: &mut Builder, pending: Pending) -> Result<Expr> {
    let Pending { offset, plan } = pending;
    let expr = match plan {
        Plan::Null => builder.new_null_expr(offset),
        Plan::Bool(value) => builder.new_bool_value(offset, value),
        Plan::Int64(digits) => builder.new_int64_expr(offset, &digits)?,
        Plan::Uint64(digits) => builder.new_uint64_expr(offset, &digits)?,
        Plan::Double(digits) => builder.new_double_expr(offset, &digits)?,
        Plan::String(fragments) => builder.new_string_expr(offset, &fragments)?,
        Plan::Bytes(fragments) => builder.new_bytes_expr(offset, &fragments)?,
        Plan::Ident(name) => builder.new_ident_expr(offset, name),
        Plan::Select { operand, field } => {
            let operand = materialise(builder, *operand)?;
            builder.new_select_expr(offset, operand, field)
        }
        Plan::Call { function, args } => {
            let args = materialise_all(builder, args)?;
            builder.new_call_expr(offset, function, args)
        }
        Plan::MemberCall {
            target,
            function,
            args,
        } => {
            let target = materialise(builder, *target)?;
            let args = materialise_all(builder, args)?;
            builder.new_member_call_expr(offset, target, function, args)
        }
        Plan::Infix { op, args } => {
            let args = materialise_all(builder, args)?;
            builder.new_infix_expr(offset, &op, args)
        }
        Plan::Index { operand, index } => {
            let operand = materialise(builder, *operand)?;
            let index = materialise(builder, *index)?;
            builder.new_index_expr(offset, operand, index)
        }
        Plan::List(elements) => {
            let elements = materialise_all(builder, elements)?;
            builder.new_list_expr(offset, elements)
        }
        Plan::Struct {
            message_name,
            entries,
        } => {
            let entries = entries
                .into_iter()
                .map(|entry| materialise_entry(builder, entry))
                .collect::<Result<Vec<_>>>()?;
            builder.new_struct_expr(offset, entries, message_name)
        }
    };
    Ok(expr)
}

fn materialise_all(builder: &mut Builder, plans: Vec<Pending>) -> Result<Vec<Expr>> {
    plans
        .into_iter()
        .map(|plan| materialise(builder, plan))
        .collect()
}

fn materialise_entry(builder: &mut Builder, pending: PendingEntry) -> Result<Entry> {
    let PendingEntry {
        offset,
        key,
        value,
        optional,
    } = pending;
    let entry = match key {
        PendingKey::Map(key) => {
            let key = materialise(builder, key)?;
            let value = materialise(builder, value)?;
            if optional {
                builder.new_optional_map_entry(offset, key, value)
            } else {
                builder.new_map_entry(offset, key, value)
            }
        }
        PendingKey::Field(field) => {
            let value = materialise(builder, value)?;
            if optional {
                builder.new_optional_struct_entry(offset, field, value)
            } else {
                builder.new_struct_entry(offset, field, value)
            }
        }
    };
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_is_allocated_before_forcing() {
        let mut deferred = DeferredBuilder::new();
        let a = deferred.new_ident_expr(0, "a");
        let b = deferred.new_ident_expr(2, "b");
        let list = deferred.new_list_expr(0, vec![a, b]);
        assert!(deferred.source_info().positions.is_empty());

        let expr = deferred.force(list).unwrap();
        assert_eq!(expr.ids(), vec![3, 1, 2]);
        assert_eq!(deferred.source_info().positions.len(), 3);
    }

    #[test]
    fn literal_errors_surface_at_force_time() {
        let mut deferred = DeferredBuilder::new();
        let plan = deferred.new_string_expr(9, vec![Fragment::CodePoints(vec![0xD800])]);
        let err = deferred.force(plan).unwrap_err();
        assert_eq!(err.offset(), 9);
    }
}

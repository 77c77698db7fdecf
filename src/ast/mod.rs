//! AST module for the CEL expression tree
//!
//! This module provides the node types produced by the [`Builder`](crate::builder::Builder)
//! together with the [`SourceInfo`] side table that maps node ids back to source offsets.
//!
//! Every node kind is a variant of the closed [`ExprKind`] enum with its own payload
//! struct, so consumers get exhaustiveness checking for free.

// ============================================================================
// IMPORTS
// ============================================================================

use serde::{Deserialize, Serialize};

pub mod source_info;

pub use source_info::SourceInfo;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Identifier assigned to every node and struct entry. Zero is never allocated.
pub type ExprId = i64;

/// Source offset handed to the builder by the front-end.
pub type Offset = usize;

/// Name of the accumulator variable used by every macro comprehension.
pub const ACCUMULATOR_VAR: &str = "__result__";

/// A single node of the expression tree.
///
/// # Examples
///
/// ```rust
/// use cel_ast::ast::{Constant, Expr, ExprKind};
/// let expr = Expr::new(1, ExprKind::Literal(Constant::Bool(true)));
/// assert_eq!(expr.id, 1);
/// assert_eq!(expr.kind_name(), "*expr.Constant_BoolValue");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub id: ExprId,
    pub kind: ExprKind,
}

/// The closed set of node kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Literal(Constant),
    Ident(Ident),
    Select(Box<Select>),
    Call(Call),
    List(List),
    /// Map literal when `message_name` is empty, typed message literal otherwise.
    Struct(Struct),
    Comprehension(Box<Comprehension>),
}

/// Literal constant values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Null,
    Bool(bool),
    Int64(i64),
    Uint64(u64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
}

/// Field selection `operand.field`.
///
/// `test_only` is set exclusively by `has()` expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Select {
    pub operand: Expr,
    pub field: String,
    pub test_only: bool,
}

/// Function call. Member calls carry a `target`, global calls do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub function: String,
    pub target: Option<Box<Expr>>,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub elements: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Struct {
    pub message_name: String,
    pub entries: Vec<Entry>,
}

/// A map or message entry. Entries get their own id from the same allocator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: ExprId,
    pub key: EntryKey,
    pub value: Expr,
    pub optional_entry: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntryKey {
    MapKey(Expr),
    FieldKey(String),
}

/// The primitive fold that every iteration macro desugars into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comprehension {
    pub iter_var: String,
    /// Reserved for two-variable comprehensions; always empty.
    pub iter_var2: String,
    pub iter_range: Expr,
    pub accu_var: String,
    pub accu_init: Expr,
    pub loop_condition: Expr,
    pub loop_step: Expr,
    pub result: Expr,
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Expr {
    pub fn new(id: ExprId, kind: ExprKind) -> Self {
        Self { id, kind }
    }

    /// Returns the debug kind tag used by the kind adorners.
    ///
    /// Literals report the tag of their constant, e.g. `*expr.Constant_Int64Value`.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Literal(constant) => constant.kind_name(),
            ExprKind::Ident(_) => "*expr.Expr_IdentExpr",
            ExprKind::Select(_) => "*expr.Expr_SelectExpr",
            ExprKind::Call(_) => "*expr.Expr_CallExpr",
            ExprKind::List(_) => "*expr.Expr_ListExpr",
            ExprKind::Struct(_) => "*expr.Expr_StructExpr",
            ExprKind::Comprehension(_) => "*expr.Expr_ComprehensionExpr",
        }
    }

    pub fn as_literal(&self) -> Option<&Constant> {
        match &self.kind {
            ExprKind::Literal(constant) => Some(constant),
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident(ident) => Some(&ident.name),
            _ => None,
        }
    }

    pub fn as_select(&self) -> Option<&Select> {
        match &self.kind {
            ExprKind::Select(select) => Some(select),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&Call> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match &self.kind {
            ExprKind::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Struct> {
        match &self.kind {
            ExprKind::Struct(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_comprehension(&self) -> Option<&Comprehension> {
        match &self.kind {
            ExprKind::Comprehension(comprehension) => Some(comprehension),
            _ => None,
        }
    }

    /// Collects every id in the tree, entry ids included, in pre-order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cel_ast::builder::Builder;
    /// let mut builder = Builder::new();
    /// let one = builder.new_int64_expr(1, "1").unwrap();
    /// let list = builder.new_list_expr(0, vec![one]);
    /// assert_eq!(list.ids(), vec![2, 1]);
    /// ```
    pub fn ids(&self) -> Vec<ExprId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    // ------------------------------------------------------------------------
    // Traversal helpers
    // ------------------------------------------------------------------------

    fn collect_ids(&self, ids: &mut Vec<ExprId>) {
        ids.push(self.id);
        match &self.kind {
            ExprKind::Literal(_) | ExprKind::Ident(_) => {}
            ExprKind::Select(select) => select.operand.collect_ids(ids),
            ExprKind::Call(call) => {
                if let Some(target) = &call.target {
                    target.collect_ids(ids);
                }
                for arg in &call.args {
                    arg.collect_ids(ids);
                }
            }
            ExprKind::List(list) => {
                for element in &list.elements {
                    element.collect_ids(ids);
                }
            }
            ExprKind::Struct(object) => {
                for entry in &object.entries {
                    ids.push(entry.id);
                    if let EntryKey::MapKey(key) = &entry.key {
                        key.collect_ids(ids);
                    }
                    entry.value.collect_ids(ids);
                }
            }
            ExprKind::Comprehension(comprehension) => {
                comprehension.iter_range.collect_ids(ids);
                comprehension.accu_init.collect_ids(ids);
                comprehension.loop_condition.collect_ids(ids);
                comprehension.loop_step.collect_ids(ids);
                comprehension.result.collect_ids(ids);
            }
        }
    }
}

impl Constant {
    /// Returns the debug kind tag of this constant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Constant::Null => "*expr.Constant_NullValue",
            Constant::Bool(_) => "*expr.Constant_BoolValue",
            Constant::Int64(_) => "*expr.Constant_Int64Value",
            Constant::Uint64(_) => "*expr.Constant_Uint64Value",
            Constant::Double(_) => "*expr.Constant_DoubleValue",
            Constant::String(_) => "*expr.Constant_StringValue",
            Constant::Bytes(_) => "*expr.Constant_BytesValue",
        }
    }
}

impl Call {
    /// True when the call was written in receiver style, `target.function(...)`.
    pub fn is_member(&self) -> bool {
        self.target.is_some()
    }
}

impl Struct {
    /// True for `{k: v}` map literals, false for `Msg{f: v}` message literals.
    pub fn is_map(&self) -> bool {
        self.message_name.is_empty()
    }
}

impl Entry {
    pub const KIND_NAME: &'static str = "*expr.Expr_CreateStruct_Entry";
}

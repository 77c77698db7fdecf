//! Adorners append per-node metadata to the debug string.
//!
//! They exist for test assertions: the kind adorners make the exact node kind (and
//! optionally the id) visible in the rendered text, so fixtures can check more than
//! the surface syntax.

use crate::ast::{Entry, Expr};

/// The element an adorner is asked about.
#[derive(Debug, Clone, Copy)]
pub enum Adorned<'a> {
    Expr(&'a Expr),
    Entry(&'a Entry),
}

impl Adorned<'_> {
    /// Debug kind tag of the element.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Adorned::Expr(expr) => expr.kind_name(),
            Adorned::Entry(_) => Entry::KIND_NAME,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Adorned::Expr(expr) => expr.id,
            Adorned::Entry(entry) => entry.id,
        }
    }
}

/// Supplies the suffix written after every node and every struct entry.
pub trait Adorner {
    fn metadata(&self, node: Adorned<'_>) -> String;
}

impl<F> Adorner for F
where
    F: Fn(Adorned<'_>) -> String,
{
    fn metadata(&self, node: Adorned<'_>) -> String {
        self(node)
    }
}

/// Appends nothing; used for plain rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyAdorner;

impl Adorner for EmptyAdorner {
    fn metadata(&self, _node: Adorned<'_>) -> String {
        String::new()
    }
}

/// Appends `^#<kind>#`, e.g. `^#*expr.Expr_IdentExpr#`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KindAdorner;

impl Adorner for KindAdorner {
    fn metadata(&self, node: Adorned<'_>) -> String {
        format!("^#{}#", node.kind_name())
    }
}

/// Appends `^#<id>:<kind>#`, e.g. `^#3:*expr.Expr_CallExpr#`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KindAndIdAdorner;

impl Adorner for KindAndIdAdorner {
    fn metadata(&self, node: Adorned<'_>) -> String {
        format!("^#{}:{}#", node.id(), node.kind_name())
    }
}

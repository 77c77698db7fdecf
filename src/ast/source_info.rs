//! Side table produced alongside every tree.
//!
//! `positions` maps each allocated id to the offset it was built at, orphaned ids
//! included. `macro_calls` keeps the pre-expansion call for every node a macro
//! replaced, so diagnostics can show what the author actually wrote.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Expr, ExprId, Offset};

/// Build artifact recorded next to one expression tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub syntax_version: String,
    pub location: String,
    pub line_offsets: Vec<i32>,
    pub positions: BTreeMap<ExprId, Offset>,
    pub macro_calls: BTreeMap<ExprId, Expr>,
    pub extensions: Vec<Extension>,
}

/// Opaque extension marker carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    pub id: String,
    pub affected_components: Vec<i32>,
    pub version: Option<ExtensionVersion>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionVersion {
    pub major: i64,
    pub minor: i64,
}

impl SourceInfo {
    /// Offset recorded for `id`, if it was ever allocated.
    pub fn position(&self, id: ExprId) -> Option<Offset> {
        self.positions.get(&id).copied()
    }

    /// The original call that was expanded into the node `id`.
    pub fn macro_call(&self, id: ExprId) -> Option<&Expr> {
        self.macro_calls.get(&id)
    }

    pub(crate) fn record_position(&mut self, id: ExprId, offset: Offset) {
        self.positions.insert(id, offset);
    }

    pub(crate) fn record_macro_call(&mut self, id: ExprId, call: Expr) {
        self.macro_calls.insert(id, call);
    }
}

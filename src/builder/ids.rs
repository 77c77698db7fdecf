//! Node factory and id allocator.
//!
//! Every node and entry takes exactly one id, and every id gets a position record,
//! even when the node is later dropped by macro expansion. Ids therefore follow the
//! order in which the front-end reduced its productions.

use crate::ast::{Entry, EntryKey, Expr, ExprId, ExprKind, Offset, SourceInfo};

/// Hands out strictly increasing ids and records where each one came from.
#[derive(Debug, Default)]
pub struct IdAllocator {
    prev_id: ExprId,
    source_info: SourceInfo,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-increments the counter and records `positions[id] = offset`.
    pub fn allocate(&mut self, offset: Offset) -> ExprId {
        self.prev_id += 1;
        self.source_info.record_position(self.prev_id, offset);
        self.prev_id
    }

    /// The most recently allocated id, or zero before the first allocation.
    pub fn last_id(&self) -> ExprId {
        self.prev_id
    }

    pub fn next_expr(&mut self, offset: Offset, kind: ExprKind) -> Expr {
        let id = self.allocate(offset);
        Expr::new(id, kind)
    }

    pub fn next_entry(&mut self, offset: Offset, key: EntryKey, value: Expr) -> Entry {
        Entry {
            id: self.allocate(offset),
            key,
            value,
            optional_entry: false,
        }
    }

    pub fn source_info(&self) -> &SourceInfo {
        &self.source_info
    }

    pub(crate) fn source_info_mut(&mut self) -> &mut SourceInfo {
        &mut self.source_info
    }

    pub fn into_source_info(self) -> SourceInfo {
        self.source_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Ident;

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.last_id(), 0);
        assert_eq!(ids.allocate(5), 1);
        assert_eq!(ids.allocate(2), 2);
        assert_eq!(ids.source_info().position(1), Some(5));
        assert_eq!(ids.source_info().position(2), Some(2));
    }

    #[test]
    fn entries_take_their_own_id() {
        let mut ids = IdAllocator::new();
        let value = ids.next_expr(3, ExprKind::Ident(Ident { name: "v".into() }));
        let entry = ids.next_entry(1, EntryKey::FieldKey("f".into()), value);
        assert_eq!(entry.value.id, 1);
        assert_eq!(entry.id, 2);
        assert_eq!(ids.source_info().position(2), Some(1));
    }
}

use std::collections::HashMap;

use ahash::RandomState;

use crate::expr::{ExprId, ExprNode};

/// Read-only schema metadata consulted by fusion rules.
///
/// `None` means the column count has not been established yet. It must never be reported as
/// zero columns.
pub trait SchemaCache {
    fn column_count_if_known(&self, expr: &ExprNode) -> Option<usize>;
}

/// Oracle that knows nothing, so schema-driven rules never fire.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnknownSchema;

impl SchemaCache for UnknownSchema {
    fn column_count_if_known(&self, _expr: &ExprNode) -> Option<usize> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEntry {
    /// The node is tracked but its schema has not been validated.
    Pending,
    Valid(usize),
}

/// In-memory column-count cache keyed by node identity.
#[derive(Debug, Default)]
pub struct ColumnCountCache {
    entries: HashMap<ExprId, CacheEntry, RandomState>,
}

impl ColumnCountCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_column_count(&mut self, expr: &ExprNode, ncols: usize) {
        self.entries.insert(expr.id(), CacheEntry::Valid(ncols));
    }

    /// Keep tracking the node but drop the validity of what is known about it.
    pub fn mark_stale(&mut self, expr: &ExprNode) {
        self.entries.insert(expr.id(), CacheEntry::Pending);
    }

    pub fn forget(&mut self, expr: &ExprNode) -> Option<CacheEntry> {
        self.entries.remove(&expr.id())
    }

    pub fn entry(&self, expr: &ExprNode) -> Option<CacheEntry> {
        self.entries.get(&expr.id()).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SchemaCache for ColumnCountCache {
    fn column_count_if_known(&self, expr: &ExprNode) -> Option<usize> {
        match self.entry(expr)? {
            CacheEntry::Valid(ncols) => Some(ncols),
            CacheEntry::Pending => None,
        }
    }
}

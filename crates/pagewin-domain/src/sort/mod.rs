//! Single-key row sorting.
//!
//! Collections that support ordered sort use [`OrderedSorter`] so every
//! implementation orders rows the same way: by one field, stable, with
//! `Null` after present values when ascending.

use crate::row::Row;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }
}

/// Sorts rows by one field key in a fixed direction.
pub struct OrderedSorter {
    key: String,
    order: SortOrder,
}

impl OrderedSorter {
    pub fn new(key: impl Into<String>, order: SortOrder) -> Self {
        Self {
            key: key.into(),
            order,
        }
    }

    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let cmp = a.value(&self.key).sort_cmp(b.value(&self.key));
        match self.order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    }

    /// Stable in-place sort. Works with both `&Row` and `Row` elements.
    pub fn sort_by<T: Borrow<Row>>(&self, rows: &mut [T]) {
        rows.sort_by(|a, b| self.compare(a.borrow(), b.borrow()));
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }
}

//! Materialized, independently editable copy of one page window.
//!
//! A [`PageView`] is a cheap handle: clones share the same rows, hidden set
//! and subscribers. It never talks to the source collection on its own; writes
//! are announced to subscribers (the change bridge) and the only source read
//! it performs is the re-copy in [`PageView::unhide_all`].

use crate::events::{emit_all, ChangeEvent, ChangeListener, ListenerSet, SubscriptionId};
use crate::row::{Row, RowId};
use crate::schema::Schema;
use crate::source::SourceCollection;
use crate::value::Value;
use pagewin_core::{PageError, PageResult, SyncDirection, WindowBounds};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

#[derive(Default)]
struct RowStore {
    rows: Vec<Row>,
    index: HashMap<RowId, usize>,
    hidden: HashSet<RowId>,
}

impl RowStore {
    fn load(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.id(), i))
            .collect();
    }

    fn get(&self, id: &RowId) -> Option<&Row> {
        self.index.get(id).map(|&i| &self.rows[i])
    }

    fn get_mut(&mut self, id: &RowId) -> Option<&mut Row> {
        self.index.get(id).map(|&i| &mut self.rows[i])
    }
}

struct ViewInner {
    page_number: usize,
    bounds: WindowBounds,
    schema: Schema,
    store: RefCell<RowStore>,
    listeners: RefCell<ListenerSet>,
}

#[derive(Clone)]
pub struct PageView {
    inner: Rc<ViewInner>,
}

/// Non-owning handle to a [`PageView`], held by source-side listeners.
#[derive(Clone)]
pub struct WeakPageView {
    inner: Weak<ViewInner>,
}

impl WeakPageView {
    pub fn upgrade(&self) -> Option<PageView> {
        self.inner.upgrade().map(|inner| PageView { inner })
    }
}

/// Copy rows `[bounds.start, bounds.end)` out of `source`, in source order.
pub fn copy_window<S>(source: &S, bounds: WindowBounds) -> Vec<Row>
where
    S: SourceCollection + ?Sized,
{
    let bounds = bounds.clamped_to(source.len());
    (bounds.start..bounds.end)
        .filter_map(|position| {
            let row = source.id_at(position).and_then(|id| source.get(&id));
            if row.is_none() {
                tracing::warn!("Source has no row at position {}", position);
            }
            row.cloned()
        })
        .collect()
}

impl PageView {
    /// Build a view from already-copied rows. Order is preserved.
    pub fn materialize(
        page_number: usize,
        schema: Schema,
        bounds: WindowBounds,
        rows: Vec<Row>,
    ) -> Self {
        let mut store = RowStore::default();
        store.load(rows);
        Self {
            inner: Rc::new(ViewInner {
                page_number,
                bounds,
                schema,
                store: RefCell::new(store),
                listeners: RefCell::new(ListenerSet::new()),
            }),
        }
    }

    /// Copy the window straight out of `source`.
    pub fn from_source<S>(source: &S, page_number: usize, bounds: WindowBounds) -> Self
    where
        S: SourceCollection + ?Sized,
    {
        let rows = copy_window(source, bounds);
        Self::materialize(page_number, source.schema().clone(), bounds, rows)
    }

    pub fn downgrade(&self) -> WeakPageView {
        WeakPageView {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether two handles refer to the same view.
    pub fn ptr_eq(&self, other: &PageView) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn page_number(&self) -> usize {
        self.inner.page_number
    }

    pub fn bounds(&self) -> WindowBounds {
        self.inner.bounds
    }

    pub fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    pub fn len(&self) -> usize {
        self.inner.store.borrow().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &RowId) -> bool {
        self.inner.store.borrow().index.contains_key(id)
    }

    /// Ids of the visible rows, in source order.
    pub fn ids(&self) -> Vec<RowId> {
        self.inner.store.borrow().rows.iter().map(Row::id).collect()
    }

    /// Snapshot of the visible rows, in source order.
    pub fn rows(&self) -> Vec<Row> {
        self.inner.store.borrow().rows.clone()
    }

    pub fn row(&self, id: &RowId) -> Option<Row> {
        self.inner.store.borrow().get(id).cloned()
    }

    pub fn hidden_ids(&self) -> HashSet<RowId> {
        self.inner.store.borrow().hidden.clone()
    }

    pub fn hidden_count(&self) -> usize {
        self.inner.store.borrow().hidden.len()
    }

    pub fn read(&self, id: &RowId, key: &str) -> PageResult<Value> {
        if !self.inner.schema.contains(key) {
            return Err(PageError::UnknownField(key.to_string()));
        }
        self.inner
            .store
            .borrow()
            .get(id)
            .map(|row| row.value(key).clone())
            .ok_or(PageError::NotFound(*id))
    }

    /// Update the local copy and announce the write to subscribers.
    ///
    /// The local copy is updated even when a subscriber fails; the first
    /// subscriber error is returned.
    pub fn write(&self, id: RowId, key: &str, value: Value) -> PageResult<()> {
        self.inner.schema.check(key, &value)?;
        {
            let mut store = self.inner.store.borrow_mut();
            let row = store.get_mut(&id).ok_or(PageError::NotFound(id))?;
            row.set(key, value.clone());
        }

        let listeners = self.inner.listeners.borrow().snapshot();
        emit_all(&listeners, &ChangeEvent::new(id, key, value))
    }

    /// Apply a change that originated elsewhere, without notifying subscribers.
    ///
    /// Returns `Ok(false)` when the row is not in the view or already holds
    /// the value.
    pub(crate) fn apply_external(&self, event: &ChangeEvent) -> PageResult<bool> {
        // Only reachable if a store borrow is held across a source write.
        let mut store = self.inner.store.try_borrow_mut().map_err(|_| {
            PageError::sync_failure(
                event.id,
                &event.key,
                SyncDirection::SourceToView,
                "page view is busy",
            )
        })?;
        match store.get_mut(&event.id) {
            Some(row) if *row.value(&event.key) != event.value => {
                row.set(event.key.clone(), event.value.clone());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Remove rows from the view and remember them as hidden. Ids not in the
    /// view are ignored. Returns how many rows were hidden by this call.
    pub fn hide<I>(&self, ids: I) -> usize
    where
        I: IntoIterator<Item = RowId>,
    {
        let mut store = self.inner.store.borrow_mut();
        let to_hide: HashSet<RowId> = ids
            .into_iter()
            .filter(|id| store.index.contains_key(id))
            .collect();
        if to_hide.is_empty() {
            return 0;
        }

        store.rows.retain(|row| !to_hide.contains(&row.id()));
        store.reindex();
        let count = to_hide.len();
        store.hidden.extend(to_hide);
        count
    }

    /// Forget hidden rows and re-copy this view's window from `source`.
    pub fn unhide_all<S>(&self, source: &S)
    where
        S: SourceCollection + ?Sized,
    {
        let rows = copy_window(source, self.inner.bounds);
        let mut store = self.inner.store.borrow_mut();
        store.hidden.clear();
        store.load(rows);
    }

    pub fn subscribe(&self, listener: ChangeListener) -> SubscriptionId {
        self.inner.listeners.borrow_mut().subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.listeners.borrow_mut().unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl std::fmt::Debug for PageView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageView")
            .field("page_number", &self.inner.page_number)
            .field("bounds", &self.inner.bounds)
            .field("rows", &self.len())
            .field("hidden", &self.hidden_count())
            .finish()
    }
}

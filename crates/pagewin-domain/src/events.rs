//! Typed field-change notifications.
//!
//! Both source collections and page views announce writes as a
//! [`ChangeEvent`] carrying the row id, field key and new value. Listeners are
//! reference-counted closures so an emitter can snapshot its listener list and
//! release any borrow before calling out.

use crate::row::RowId;
use crate::value::Value;
use pagewin_core::PageResult;
use std::rc::Rc;

/// A field write: `{id, key, value}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub id: RowId,
    pub key: String,
    pub value: Value,
}

impl ChangeEvent {
    pub fn new(id: RowId, key: impl Into<String>, value: Value) -> Self {
        Self {
            id,
            key: key.into(),
            value,
        }
    }
}

pub type ChangeListener = Rc<dyn Fn(&ChangeEvent) -> PageResult<()>>;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct ListenerSet {
    next_id: u64,
    listeners: Vec<(SubscriptionId, ChangeListener)>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: ChangeListener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Clone the current listeners so they can be called without holding a borrow.
    pub fn snapshot(&self) -> Vec<ChangeListener> {
        self.listeners.iter().map(|(_, l)| Rc::clone(l)).collect()
    }

    pub fn emit(&self, event: &ChangeEvent) -> PageResult<()> {
        emit_all(self.listeners.iter().map(|(_, l)| l), event)
    }
}

/// Deliver `event` to every listener. All listeners run; the first error is returned.
pub fn emit_all<'a, I>(listeners: I, event: &ChangeEvent) -> PageResult<()>
where
    I: IntoIterator<Item = &'a ChangeListener>,
{
    let mut first_error = None;
    for listener in listeners {
        if let Err(e) = listener(event) {
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

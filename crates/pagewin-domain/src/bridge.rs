//! Two-way field propagation between a page view and its source collection.
//!
//! A bridge subscribes to the view's writes (view -> source) and, when the
//! source can notify, to the source's writes (source -> view). Equal values
//! are never re-written, which is what stops an edit from bouncing between
//! the two sides. Detaching removes both subscriptions; a detached view is a
//! plain copy.

use crate::events::{ChangeEvent, ChangeListener, SubscriptionId};
use crate::page_view::PageView;
use crate::source::SourceCollection;
use pagewin_core::{PageError, PageResult, SyncDirection};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub struct ChangeBridge<S: SourceCollection + 'static> {
    view: PageView,
    source: Rc<RefCell<S>>,
    view_subscription: Option<SubscriptionId>,
    source_subscription: Option<SubscriptionId>,
}

impl<S: SourceCollection + 'static> ChangeBridge<S> {
    pub fn attach(view: &PageView, source: &Rc<RefCell<S>>) -> PageResult<Self> {
        let weak_source = Rc::downgrade(source);
        let to_source: ChangeListener =
            Rc::new(move |event: &ChangeEvent| -> PageResult<()> {
                push_to_source(&weak_source, event)
            });

        let weak_view = view.downgrade();
        let to_view: ChangeListener = Rc::new(move |event: &ChangeEvent| -> PageResult<()> {
            if let Some(view) = weak_view.upgrade() {
                if view.apply_external(event)? {
                    tracing::debug!(
                        "Source change to row {} field '{}' copied into page {}",
                        event.id,
                        event.key,
                        view.page_number()
                    );
                }
            }
            Ok(())
        });

        let source_subscription = source
            .try_borrow_mut()
            .map_err(|_| PageError::SourceBusy)?
            .subscribe(to_view);
        let view_subscription = view.subscribe(to_source);

        if source_subscription.is_none() {
            tracing::debug!(
                "Source does not notify; page {} syncs view -> source only",
                view.page_number()
            );
        }

        Ok(Self {
            view: view.clone(),
            source: Rc::clone(source),
            view_subscription: Some(view_subscription),
            source_subscription,
        })
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    pub fn is_attached(&self) -> bool {
        self.view_subscription.is_some() || self.source_subscription.is_some()
    }

    /// Whether source-side writes are flowing into the view.
    pub fn is_bidirectional(&self) -> bool {
        self.source_subscription.is_some()
    }

    /// Remove both subscriptions. Calling it again is a no-op.
    pub fn detach(&mut self) -> PageResult<()> {
        if let Some(id) = self.source_subscription {
            self.source
                .try_borrow_mut()
                .map_err(|_| PageError::SourceBusy)?
                .unsubscribe(id);
            self.source_subscription = None;
        }
        if let Some(id) = self.view_subscription.take() {
            self.view.unsubscribe(id);
        }
        Ok(())
    }
}

impl<S: SourceCollection + 'static> Drop for ChangeBridge<S> {
    fn drop(&mut self) {
        if let Err(e) = self.detach() {
            tracing::warn!(
                "Bridge for page {} dropped while attached: {}",
                self.view.page_number(),
                e
            );
        }
    }
}

fn push_to_source<S: SourceCollection>(
    source: &Weak<RefCell<S>>,
    event: &ChangeEvent,
) -> PageResult<()> {
    let fail = |reason: String| {
        let err = PageError::sync_failure(
            event.id,
            &event.key,
            SyncDirection::ViewToSource,
            reason,
        );
        tracing::warn!("{}", err);
        err
    };

    let shared = source
        .upgrade()
        .ok_or_else(|| fail("source collection was dropped".to_string()))?;

    let current = shared
        .try_borrow()
        .map_err(|_| fail("source collection is busy".to_string()))?
        .value(&event.id, &event.key)
        .map_err(|e| fail(e.to_string()))?;
    if current == event.value {
        return Ok(());
    }

    let mut target = shared
        .try_borrow_mut()
        .map_err(|_| fail("source collection is busy".to_string()))?;
    match target.set(event.id, &event.key, event.value.clone()) {
        Ok(()) => Ok(()),
        Err(e @ PageError::SyncFailure { .. }) => Err(e),
        Err(e) => Err(fail(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySource;
    use crate::schema::Schema;
    use crate::value::{FieldType, Value};
    use pagewin_core::WindowBounds;

    fn shared_source(count: i64) -> Rc<RefCell<MemorySource>> {
        let schema = Schema::new().with_field("n", FieldType::Integer);
        let mut source = MemorySource::new(schema);
        for n in 0..count {
            source.push([("n", n)]).unwrap();
        }
        Rc::new(RefCell::new(source))
    }

    fn open(source: &Rc<RefCell<MemorySource>>, bounds: WindowBounds) -> PageView {
        PageView::from_source(&*source.borrow(), 1, bounds)
    }

    #[test]
    fn test_view_write_reaches_source_once() {
        let source = shared_source(4);
        let view = open(&source, WindowBounds::new(0, 2));
        let _bridge = ChangeBridge::attach(&view, &source).unwrap();
        let id = view.ids()[0];

        view.write(id, "n", Value::from(42)).unwrap();
        view.write(id, "n", Value::from(42)).unwrap();

        assert_eq!(source.borrow().value(&id, "n").unwrap(), Value::from(42));
        assert_eq!(source.borrow().write_count(), 1);
    }

    #[test]
    fn test_source_write_reaches_windowed_rows_only() {
        let source = shared_source(4);
        let view = open(&source, WindowBounds::new(0, 2));
        let _bridge = ChangeBridge::attach(&view, &source).unwrap();
        let inside = view.ids()[1];
        let outside = source.borrow().id_at(3).unwrap();

        source.borrow_mut().set(inside, "n", Value::from(7)).unwrap();
        source.borrow_mut().set(outside, "n", Value::from(8)).unwrap();

        assert_eq!(view.read(&inside, "n").unwrap(), Value::from(7));
        assert!(!view.contains(&outside));
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_source_write_to_hidden_row_is_ignored() {
        let source = shared_source(3);
        let view = open(&source, WindowBounds::new(0, 3));
        let _bridge = ChangeBridge::attach(&view, &source).unwrap();
        let hidden = view.ids()[0];
        view.hide([hidden]);

        source.borrow_mut().set(hidden, "n", Value::from(99)).unwrap();
        assert!(!view.contains(&hidden));
    }

    #[test]
    fn test_detach_stops_both_directions() {
        let source = shared_source(2);
        let view = open(&source, WindowBounds::new(0, 2));
        let mut bridge = ChangeBridge::attach(&view, &source).unwrap();
        assert!(bridge.is_bidirectional());
        assert_eq!(source.borrow().listener_count(), 1);

        bridge.detach().unwrap();
        bridge.detach().unwrap();
        assert!(!bridge.is_attached());
        assert_eq!(source.borrow().listener_count(), 0);
        assert_eq!(view.subscriber_count(), 0);

        let id = view.ids()[0];
        view.write(id, "n", Value::from(50)).unwrap();
        assert_eq!(source.borrow().value(&id, "n").unwrap(), Value::from(0));

        source.borrow_mut().set(id, "n", Value::from(60)).unwrap();
        assert_eq!(view.read(&id, "n").unwrap(), Value::from(50));
    }

    #[test]
    fn test_drop_detaches() {
        let source = shared_source(2);
        let view = open(&source, WindowBounds::new(0, 2));
        {
            let _bridge = ChangeBridge::attach(&view, &source).unwrap();
            assert_eq!(view.subscriber_count(), 1);
        }
        assert_eq!(view.subscriber_count(), 0);
        assert_eq!(source.borrow().listener_count(), 0);
    }

    #[test]
    fn test_non_notifying_source_syncs_one_way() {
        let schema = Schema::new().with_field("n", FieldType::Integer);
        let mut plain = MemorySource::new(schema).without_notifications();
        plain.push([("n", 1)]).unwrap();
        let source = Rc::new(RefCell::new(plain));
        let view = open(&source, WindowBounds::new(0, 1));
        let bridge = ChangeBridge::attach(&view, &source).unwrap();
        let id = view.ids()[0];

        assert!(!bridge.is_bidirectional());
        view.write(id, "n", Value::from(2)).unwrap();
        assert_eq!(source.borrow().value(&id, "n").unwrap(), Value::from(2));

        source.borrow_mut().set(id, "n", Value::from(3)).unwrap();
        assert_eq!(view.read(&id, "n").unwrap(), Value::from(2));
    }

    #[test]
    fn test_vanished_source_row_is_sync_failure() {
        let source = shared_source(2);
        let view = open(&source, WindowBounds::new(0, 2));
        let _bridge = ChangeBridge::attach(&view, &source).unwrap();
        let id = view.ids()[0];
        source.borrow_mut().remove(&id);

        let err = view.write(id, "n", Value::from(5)).unwrap_err();
        match err {
            PageError::SyncFailure { id: failed, key, direction, .. } => {
                assert_eq!(failed, id);
                assert_eq!(key, "n");
                assert_eq!(direction, SyncDirection::ViewToSource);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(view.read(&id, "n").unwrap(), Value::from(5));
    }

    #[test]
    fn test_busy_source_is_sync_failure_not_panic() {
        let source = shared_source(1);
        let view = open(&source, WindowBounds::new(0, 1));
        let _bridge = ChangeBridge::attach(&view, &source).unwrap();
        let id = view.ids()[0];

        let guard = source.borrow_mut();
        let err = view.write(id, "n", Value::from(5)).unwrap_err();
        drop(guard);

        assert!(err.is_sync_failure());
    }
}

use crate::events::{ChangeListener, SubscriptionId};
use crate::row::{Row, RowId};
use crate::schema::Schema;
use crate::sort::SortOrder;
use crate::value::Value;
use pagewin_core::{PageError, PageResult};

/// Contract an ordered, indexed row collection must satisfy to be paged.
///
/// Sorting and change notification are optional capabilities; the defaults
/// report them as unsupported.
pub trait SourceCollection {
    fn schema(&self) -> &Schema;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Id of the row at `position`. Stable until rows are added or removed.
    fn id_at(&self, position: usize) -> Option<RowId>;

    fn get(&self, id: &RowId) -> Option<&Row>;

    fn set(&mut self, id: RowId, key: &str, value: Value) -> PageResult<()>;

    fn value(&self, id: &RowId, key: &str) -> PageResult<Value> {
        if !self.schema().contains(key) {
            return Err(PageError::UnknownField(key.to_string()));
        }
        self.get(id)
            .map(|row| row.value(key).clone())
            .ok_or(PageError::NotFound(*id))
    }

    fn supports_ordered_sort(&self) -> bool {
        false
    }

    fn sort_by(&mut self, _key: &str, _order: SortOrder) -> PageResult<()> {
        Err(PageError::UnsupportedSort)
    }

    /// Register for write notifications. `None` means the collection does not notify.
    fn subscribe(&mut self, _listener: ChangeListener) -> Option<SubscriptionId> {
        None
    }

    fn unsubscribe(&mut self, _id: SubscriptionId) -> bool {
        false
    }
}

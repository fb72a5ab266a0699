use crate::events::{ChangeEvent, ChangeListener, ListenerSet, SubscriptionId};
use crate::row::{Row, RowId};
use crate::schema::Schema;
use crate::sort::{OrderedSorter, SortOrder};
use crate::source::SourceCollection;
use crate::value::Value;
use pagewin_core::{PageError, PageResult};
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory [`SourceCollection`] with schema validation, single-key sort and
/// write notifications.
///
/// Sorting and notification can be switched off to stand in for collections
/// that lack those capabilities.
pub struct MemorySource {
    schema: Schema,
    rows: Vec<Row>,
    positions: HashMap<RowId, usize>,
    listeners: ListenerSet,
    sortable: bool,
    notifying: bool,
    write_count: usize,
}

impl MemorySource {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
            positions: HashMap::new(),
            listeners: ListenerSet::new(),
            sortable: true,
            notifying: true,
            write_count: 0,
        }
    }

    pub fn without_sort(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn without_notifications(mut self) -> Self {
        self.notifying = false;
        self
    }

    /// Append a row with a fresh id.
    pub fn push<I, K, V>(&mut self, fields: I) -> PageResult<RowId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let row = fields
            .into_iter()
            .fold(Row::new(Uuid::new_v4()), |row, (k, v)| row.with_value(k, v));
        let id = row.id();
        self.insert_row(row)?;
        Ok(id)
    }

    /// Append an existing row, keeping its id.
    pub fn insert_row(&mut self, row: Row) -> PageResult<()> {
        if self.positions.contains_key(&row.id()) {
            return Err(PageError::DuplicateRow(row.id()));
        }
        for (key, value) in row.values() {
            self.schema.check(key, value)?;
        }
        self.positions.insert(row.id(), self.rows.len());
        self.rows.push(row);
        Ok(())
    }

    pub fn remove(&mut self, id: &RowId) -> Option<Row> {
        let position = self.positions.remove(id)?;
        let row = self.rows.remove(position);
        self.reindex();
        Some(row)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of field writes applied since creation.
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn reindex(&mut self) {
        self.positions = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.id(), i))
            .collect();
    }
}

impl SourceCollection for MemorySource {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn id_at(&self, position: usize) -> Option<RowId> {
        self.rows.get(position).map(Row::id)
    }

    fn get(&self, id: &RowId) -> Option<&Row> {
        self.positions.get(id).map(|&i| &self.rows[i])
    }

    fn set(&mut self, id: RowId, key: &str, value: Value) -> PageResult<()> {
        self.schema.check(key, &value)?;
        let position = *self.positions.get(&id).ok_or(PageError::NotFound(id))?;
        self.rows[position].set(key, value.clone());
        self.write_count += 1;

        self.listeners.emit(&ChangeEvent::new(id, key, value))
    }

    fn supports_ordered_sort(&self) -> bool {
        self.sortable
    }

    fn sort_by(&mut self, key: &str, order: SortOrder) -> PageResult<()> {
        if !self.sortable {
            return Err(PageError::UnsupportedSort);
        }
        if !self.schema.contains(key) {
            return Err(PageError::UnknownField(key.to_string()));
        }
        OrderedSorter::new(key, order).sort_by(&mut self.rows);
        self.reindex();
        Ok(())
    }

    fn subscribe(&mut self, listener: ChangeListener) -> Option<SubscriptionId> {
        self.notifying.then(|| self.listeners.subscribe(listener))
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldType;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn people() -> MemorySource {
        let schema = Schema::new()
            .with_field("name", FieldType::Text)
            .with_field("age", FieldType::Integer);
        let mut source = MemorySource::new(schema);
        for (name, age) in [("Ann", 30), ("Bob", 10), ("Cid", 20)] {
            source
                .push([("name", Value::from(name)), ("age", Value::from(age))])
                .unwrap();
        }
        source
    }

    fn ages(source: &MemorySource) -> Vec<Value> {
        source.rows().iter().map(|r| r.value("age").clone()).collect()
    }

    #[test]
    fn test_id_at_and_get_agree() {
        let source = people();
        let id = source.id_at(1).unwrap();
        assert_eq!(source.get(&id).unwrap().value("name"), &Value::from("Bob"));
        assert!(source.id_at(3).is_none());
    }

    #[test]
    fn test_set_validates_schema_and_row() {
        let mut source = people();
        let id = source.id_at(0).unwrap();

        assert!(matches!(
            source.set(id, "age", Value::from("old")),
            Err(PageError::TypeMismatch { .. })
        ));
        assert!(matches!(
            source.set(Uuid::new_v4(), "age", Value::from(1)),
            Err(PageError::NotFound(_))
        ));
        assert_eq!(source.write_count(), 0);

        source.set(id, "age", Value::from(31)).unwrap();
        assert_eq!(source.value(&id, "age").unwrap(), Value::from(31));
        assert_eq!(source.write_count(), 1);
    }

    #[test]
    fn test_sort_keeps_positions_consistent() {
        let mut source = people();
        source.sort_by("age", SortOrder::Ascending).unwrap();
        assert_eq!(ages(&source), vec![Value::from(10), Value::from(20), Value::from(30)]);

        let id = source.id_at(0).unwrap();
        assert_eq!(source.get(&id).unwrap().value("name"), &Value::from("Bob"));

        assert!(matches!(
            source.sort_by("height", SortOrder::Ascending),
            Err(PageError::UnknownField(_))
        ));
    }

    #[test]
    fn test_sort_unsupported() {
        let mut source = people().without_sort();
        assert!(!source.supports_ordered_sort());
        assert!(matches!(
            source.sort_by("age", SortOrder::Ascending),
            Err(PageError::UnsupportedSort)
        ));
        assert_eq!(ages(&source), vec![Value::from(30), Value::from(10), Value::from(20)]);
    }

    #[test]
    fn test_set_notifies_subscribers() {
        let mut source = people();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = source
            .subscribe(Rc::new(move |event: &ChangeEvent| -> PageResult<()> {
                sink.borrow_mut().push(event.clone());
                Ok(())
            }))
            .unwrap();

        let id = source.id_at(2).unwrap();
        source.set(id, "name", Value::from("Cyd")).unwrap();
        assert!(source.unsubscribe(sub));
        source.set(id, "name", Value::from("Cid")).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![ChangeEvent::new(id, "name", Value::from("Cyd"))]
        );
    }

    #[test]
    fn test_without_notifications_refuses_subscription() {
        let mut source = people().without_notifications();
        let listener: ChangeListener = Rc::new(|_: &ChangeEvent| -> PageResult<()> { Ok(()) });
        assert!(source.subscribe(listener).is_none());
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn test_remove_and_duplicate_insert() {
        let mut source = people();
        let id = source.id_at(0).unwrap();
        let removed = source.remove(&id).unwrap();

        assert_eq!(source.len(), 2);
        assert_eq!(source.get(&source.id_at(0).unwrap()).unwrap().value("name"), &Value::from("Bob"));

        source.insert_row(removed.clone()).unwrap();
        assert_eq!(source.id_at(2), Some(id));
        assert!(matches!(
            source.insert_row(removed),
            Err(PageError::DuplicateRow(_))
        ));
    }
}

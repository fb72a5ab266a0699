use crate::value::Value;
use std::collections::HashMap;
use uuid::Uuid;

pub type RowId = Uuid;

static NULL: Value = Value::Null;

/// One record: a stable id plus its field values. Missing fields read as `Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: RowId,
    values: HashMap<String, Value>,
}

impl Row {
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            values: HashMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value.into());
        self
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn value(&self, key: &str) -> &Value {
        self.values.get(key).unwrap_or(&NULL)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

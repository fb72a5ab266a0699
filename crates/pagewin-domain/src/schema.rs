use crate::value::{FieldType, Value};
use pagewin_core::{PageError, PageResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// Ordered set of field keys with their declared types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. A key that is already declared keeps its first type.
    pub fn with_field(mut self, key: impl Into<String>, field_type: FieldType) -> Self {
        let key = key.into();
        if self.field_type(&key).is_none() {
            self.fields.push(FieldDef { key, field_type });
        }
        self
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field_keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    pub fn field_type(&self, key: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.field_type)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.field_type(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check that `value` may be stored under `key`.
    pub fn check(&self, key: &str, value: &Value) -> PageResult<()> {
        let field_type = self
            .field_type(key)
            .ok_or_else(|| PageError::UnknownField(key.to_string()))?;
        if value.fits(field_type) {
            Ok(())
        } else {
            Err(PageError::TypeMismatch {
                key: key.to_string(),
                expected: field_type.to_string(),
                found: value.type_name(),
            })
        }
    }
}

impl FromIterator<FieldDef> for Schema {
    fn from_iter<I: IntoIterator<Item = FieldDef>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Schema::new(), |schema, def| schema.with_field(def.key, def.field_type))
    }
}

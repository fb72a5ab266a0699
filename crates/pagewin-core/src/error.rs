use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Which side of a page/source link a propagated write was headed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDirection {
    ViewToSource,
    SourceToView,
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncDirection::ViewToSource => write!(f, "view -> source"),
            SyncDirection::SourceToView => write!(f, "source -> view"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PageError {
    #[error("No such page: {page} (last page is {last_page})")]
    InvalidPage { page: usize, last_page: usize },

    #[error("No page is currently open")]
    NoOpenPage,

    #[error("Underlying collection does not allow sorting")]
    UnsupportedSort,

    #[error("Sync failure ({direction}) on row {id}, field '{key}': {reason}")]
    SyncFailure {
        id: Uuid,
        key: String,
        direction: SyncDirection,
        reason: String,
    },

    #[error("Row not found: {0}")]
    NotFound(Uuid),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Type mismatch on field '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },

    #[error("Duplicate row id: {0}")]
    DuplicateRow(Uuid),

    #[error("Source collection is already borrowed")]
    SourceBusy,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl PageError {
    pub fn sync_failure(
        id: Uuid,
        key: impl Into<String>,
        direction: SyncDirection,
        reason: impl Into<String>,
    ) -> Self {
        PageError::SyncFailure {
            id,
            key: key.into(),
            direction,
            reason: reason.into(),
        }
    }

    pub fn is_sync_failure(&self) -> bool {
        matches!(self, PageError::SyncFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_failure_message_names_row_field_and_direction() {
        let id = Uuid::new_v4();
        let err = PageError::sync_failure(id, "age", SyncDirection::ViewToSource, "row vanished");
        let msg = err.to_string();

        assert!(msg.contains(&id.to_string()));
        assert!(msg.contains("'age'"));
        assert!(msg.contains("view -> source"));
        assert!(err.is_sync_failure());
    }

    #[test]
    fn test_invalid_page_message() {
        let err = PageError::InvalidPage {
            page: 12,
            last_page: 10,
        };
        assert_eq!(err.to_string(), "No such page: 12 (last page is 10)");
    }
}

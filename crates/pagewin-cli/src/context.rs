use crate::atomic_writer::AtomicWriter;
use pagewin_core::{EngineConfig, PageError, PageResult};
use pagewin_domain::{
    MemorySource, PageView, PageWindowEngine, Row, Schema, SourceCollection, Value,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// On-disk dataset: the field schema and rows in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFile {
    pub schema: Schema,
    #[serde(default)]
    pub rows: Vec<RowRecord>,
}

pub struct CliContext {
    pub engine: PageWindowEngine<MemorySource>,
    path: PathBuf,
}

impl CliContext {
    /// Load the dataset at `file_path`. Rows saved without an id are given one
    /// and the file is rewritten so later invocations see the same ids.
    pub fn load(file_path: &str, page_size: Option<usize>) -> PageResult<Self> {
        let path = PathBuf::from(file_path);
        let bytes = AtomicWriter::read_all(&path)?;
        let data: DatasetFile = serde_json::from_slice(&bytes)
            .map_err(|e| PageError::Serialization(e.to_string()))?;

        let (source, assigned) = build_source(data)?;
        let page_size = page_size.unwrap_or_else(|| EngineConfig::load().effective_page_size());
        let engine = PageWindowEngine::new(Rc::new(RefCell::new(source)), page_size);

        let ctx = Self { engine, path };
        if assigned > 0 {
            tracing::info!("Assigned ids to {} rows in {}", assigned, ctx.path.display());
            ctx.save()?;
        }
        Ok(ctx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> PageResult<()> {
        let source = self
            .engine
            .source()
            .try_borrow()
            .map_err(|_| PageError::SourceBusy)?;
        let bytes = serde_json::to_vec_pretty(&to_dataset(&source))
            .map_err(|e| PageError::Serialization(e.to_string()))?;
        AtomicWriter::write_atomic(&self.path, &bytes)
    }

    /// Open `page`, turning "no such page" into an error for the caller.
    pub fn open_page(&mut self, page: usize) -> PageResult<PageView> {
        match self.engine.open_page(page)? {
            Some(view) => Ok(view),
            None => Err(PageError::InvalidPage {
                page,
                last_page: self.engine.last_page_number()?,
            }),
        }
    }
}

fn build_source(data: DatasetFile) -> PageResult<(MemorySource, usize)> {
    let mut source = MemorySource::new(data.schema);
    let mut assigned = 0;

    for record in data.rows {
        let id = record.id.unwrap_or_else(|| {
            assigned += 1;
            Uuid::new_v4()
        });
        let mut row = Row::new(id);
        for (key, json) in &record.fields {
            let field_type = source
                .schema()
                .field_type(key)
                .ok_or_else(|| PageError::UnknownField(key.clone()))?;
            row.set(key.as_str(), Value::from_json(key, json, field_type)?);
        }
        source.insert_row(row)?;
    }

    Ok((source, assigned))
}

pub fn row_fields(schema: &Schema, row: &Row) -> serde_json::Map<String, serde_json::Value> {
    schema
        .field_keys()
        .map(|key| (key.to_string(), row.value(key).to_json()))
        .collect()
}

fn to_dataset(source: &MemorySource) -> DatasetFile {
    let schema = source.schema();
    DatasetFile {
        schema: schema.clone(),
        rows: source
            .rows()
            .iter()
            .map(|row| RowRecord {
                id: Some(row.id()),
                fields: row_fields(schema, row),
            })
            .collect(),
    }
}

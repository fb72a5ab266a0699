pub mod edit;
pub mod info;
pub mod page;
pub mod sort;

use crate::context::row_fields;
use pagewin_core::Paginator;
use pagewin_domain::{PageView, Row};
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize)]
pub struct RowOutput {
    pub id: Uuid,
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl RowOutput {
    pub fn new(view: &PageView, row: &Row) -> Self {
        Self {
            id: row.id(),
            fields: row_fields(view.schema(), row),
        }
    }
}

#[derive(Serialize)]
pub struct PageOutput {
    pub page: usize,
    pub last_page: usize,
    pub label: String,
    pub is_first: bool,
    pub is_last: bool,
    pub page_size: usize,
    pub start: usize,
    pub end: usize,
    pub hidden: usize,
    pub count: usize,
    pub rows: Vec<RowOutput>,
}

impl PageOutput {
    pub fn new(view: &PageView, page_size: usize, last_page: usize) -> Self {
        let mut paginator = Paginator::new(page_size);
        let page = paginator.go_to(view.page_number(), last_page);
        let rows: Vec<RowOutput> = view
            .rows()
            .iter()
            .map(|row| RowOutput::new(view, row))
            .collect();
        let bounds = view.bounds();

        Self {
            page,
            last_page,
            label: paginator.label(last_page),
            is_first: paginator.is_first(),
            is_last: paginator.is_last(last_page),
            page_size,
            start: bounds.start,
            end: bounds.end,
            hidden: view.hidden_count(),
            count: rows.len(),
            rows,
        }
    }
}

//! The page window engine.
//!
//! Owns the paging state for one source collection: which page is open, the
//! view materialized for it and the single bridge keeping that view in sync.
//! Opening a page always detaches the previous bridge before the new view is
//! copied, and copies the view before the new bridge attaches.

use crate::bridge::ChangeBridge;
use crate::page_view::PageView;
use crate::row::RowId;
use crate::sort::SortOrder;
use crate::source::SourceCollection;
use pagewin_core::pagination;
use pagewin_core::{EngineConfig, PageError, PageResult};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Unopened,
    PageOpen(usize),
}

struct OpenPage<S: SourceCollection + 'static> {
    page_number: usize,
    view: PageView,
    bridge: ChangeBridge<S>,
}

pub struct PageWindowEngine<S: SourceCollection + 'static> {
    source: Rc<RefCell<S>>,
    page_size: usize,
    current: Option<OpenPage<S>>,
}

impl<S: SourceCollection + 'static> PageWindowEngine<S> {
    /// A page size of zero is accepted and yields a single empty page.
    pub fn new(source: Rc<RefCell<S>>, page_size: usize) -> Self {
        Self {
            source,
            page_size,
            current: None,
        }
    }

    pub fn from_config(source: Rc<RefCell<S>>, config: &EngineConfig) -> Self {
        Self::new(source, config.effective_page_size())
    }

    pub fn source(&self) -> &Rc<RefCell<S>> {
        &self.source
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn state(&self) -> EngineState {
        match &self.current {
            Some(open) => EngineState::PageOpen(open.page_number),
            None => EngineState::Unopened,
        }
    }

    pub fn current_page(&self) -> Option<usize> {
        self.current.as_ref().map(|open| open.page_number)
    }

    pub fn current_view(&self) -> Option<&PageView> {
        self.current.as_ref().map(|open| &open.view)
    }

    pub fn has_attached_bridge(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|open| open.bridge.is_attached())
    }

    /// Live page count; reflects growth or shrinkage of the source.
    pub fn last_page_number(&self) -> PageResult<usize> {
        let len = self.borrow_source()?.len();
        Ok(pagination::total_pages(self.page_size, len))
    }

    /// Open `page_number`, returning its view, or `Ok(None)` when there is no
    /// such page. A rejected page leaves the engine untouched.
    pub fn open_page(&mut self, page_number: usize) -> PageResult<Option<PageView>> {
        let len = self.borrow_source()?.len();
        if !pagination::is_valid_page(page_number, self.page_size, len) {
            tracing::debug!(
                "No such page {} ({} rows, {} per page)",
                page_number,
                len,
                self.page_size
            );
            return Ok(None);
        }

        self.close()?;

        let bounds = pagination::bounds(page_number, self.page_size, len);
        let view = PageView::from_source(&*self.borrow_source()?, page_number, bounds);
        let bridge = ChangeBridge::attach(&view, &self.source)?;

        tracing::debug!(
            "Opened page {} covering rows {}..{}",
            page_number,
            bounds.start,
            bounds.end
        );
        self.current = Some(OpenPage {
            page_number,
            view: view.clone(),
            bridge,
        });
        Ok(Some(view))
    }

    /// Re-open the current page, e.g. after rows were added or removed.
    ///
    /// When the page no longer exists the engine closes and `Ok(None)` is
    /// returned.
    pub fn refresh(&mut self) -> PageResult<Option<PageView>> {
        let page_number = self.current_page().ok_or(PageError::NoOpenPage)?;
        match self.open_page(page_number)? {
            Some(view) => Ok(Some(view)),
            None => {
                tracing::debug!("Page {} vanished on refresh", page_number);
                self.close()?;
                Ok(None)
            }
        }
    }

    /// Detach the active bridge and return to the unopened state.
    pub fn close(&mut self) -> PageResult<()> {
        if let Some(open) = self.current.as_mut() {
            open.bridge.detach()?;
            tracing::debug!("Closed page {}", open.page_number);
        }
        self.current = None;
        Ok(())
    }

    /// Change rows per page. The engine closes; callers re-open from page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> PageResult<()> {
        if page_size == self.page_size {
            return Ok(());
        }
        self.close()?;
        self.page_size = page_size;
        Ok(())
    }

    pub fn hide_rows<I>(&mut self, ids: I) -> PageResult<usize>
    where
        I: IntoIterator<Item = RowId>,
    {
        let open = self.current.as_ref().ok_or(PageError::NoOpenPage)?;
        let hidden = open.view.hide(ids);
        tracing::debug!("Hid {} rows on page {}", hidden, open.page_number);
        Ok(hidden)
    }

    pub fn show_hidden_rows(&mut self) -> PageResult<()> {
        let open = self.current.as_ref().ok_or(PageError::NoOpenPage)?;
        let source = self
            .source
            .try_borrow()
            .map_err(|_| PageError::SourceBusy)?;
        open.view.unhide_all(&*source);
        Ok(())
    }

    /// Sort the source by one field, then re-open the current page so its
    /// window reflects the new order. Hidden rows on that page are reset.
    pub fn sort(&mut self, key: &str, order: SortOrder) -> PageResult<Option<PageView>> {
        {
            let mut source = self.borrow_source_mut()?;
            if !source.supports_ordered_sort() {
                return Err(PageError::UnsupportedSort);
            }
            if !source.schema().contains(key) {
                return Err(PageError::UnknownField(key.to_string()));
            }
            source.sort_by(key, order)?;
        }
        tracing::debug!("Sorted source by '{}' ({:?})", key, order);

        match self.current_page() {
            Some(page_number) => self.open_page(page_number),
            None => Ok(None),
        }
    }

    fn borrow_source(&self) -> PageResult<Ref<'_, S>> {
        self.source.try_borrow().map_err(|_| PageError::SourceBusy)
    }

    fn borrow_source_mut(&self) -> PageResult<RefMut<'_, S>> {
        self.source.try_borrow_mut().map_err(|_| PageError::SourceBusy)
    }
}

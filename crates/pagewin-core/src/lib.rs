pub mod config;
pub mod error;
pub mod pagination;
pub mod result;

pub use config::{EngineConfig, DEFAULT_PAGE_SIZE};
pub use error::{PageError, SyncDirection};
pub use pagination::{Paginator, WindowBounds, PAGE_SIZE_CHOICES};
pub use result::PageResult;

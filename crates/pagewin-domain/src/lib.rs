pub mod bridge;
pub mod engine;
pub mod events;
pub mod memory;
pub mod page_view;
pub mod row;
pub mod schema;
pub mod sort;
pub mod source;
pub mod value;

pub use bridge::ChangeBridge;
pub use engine::{EngineState, PageWindowEngine};
pub use events::{ChangeEvent, ChangeListener, SubscriptionId};
pub use memory::MemorySource;
pub use page_view::{PageView, WeakPageView};
pub use row::{Row, RowId};
pub use schema::{FieldDef, Schema};
pub use sort::{OrderedSorter, SortOrder};
pub use source::SourceCollection;
pub use value::{FieldType, Value};

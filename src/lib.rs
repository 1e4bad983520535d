// Базовые модули
pub mod config;
pub mod error;
pub mod metrics;

// Страница очереди: src/page/{mod,common,checksum,header,record,offsets,io,memory}.rs
pub mod page;

// Удобные реэкспорты
pub use config::{PageBuilder, PageConfig};
pub use error::{page_error_kind, PageError};
pub use page::{
    persisted_byte_count, MemoryPage, PageIo, Queueable, ReadElement, PAGE_FORMAT_VERSION,
};

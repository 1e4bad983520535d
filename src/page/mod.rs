//! page — страница персистентной очереди: фиксированный буфер,
//! заголовок + последовательность записей с seq_num и CRC32.
//!
//! Разделение по подмодулям:
//! - common.rs   — константы формата, размеры полей, persisted_byte_count.
//! - checksum.rs — CRC32 записи (аккумулятор на crc32fast).
//! - header.rs   — заголовок страницы: запись/проверка версии/details.
//! - record.rs   — кодирование/разбор записи с проверкой границ и CRC.
//! - offsets.rs  — in-memory индекс seq_num → смещение.
//! - io.rs       — контракт PageIo (+ no-op хуки), Queueable, ReadElement.
//! - memory.rs   — MemoryPage: in-memory реализация PageIo.

pub mod common;
pub mod checksum;
pub mod header;
pub mod record;
pub mod offsets;
pub mod io;
pub mod memory;

// ---------------- re-exports (внешний API модуля page) ----------------

pub use common::{
    PAGE_FORMAT_VERSION, DEFAULT_PAGE_CAPACITY,
    SEQNUM_SIZE, LENGTH_SIZE, CHECKSUM_SIZE, MIN_RECORD_SIZE,
    VERSION_SIZE, PAGE_HEADER_MIN,
    persisted_byte_count, header_byte_count,
};

pub use checksum::{RecordDigest, record_checksum};

pub use header::{PageHeader, header_write, header_read, header_details};

pub use record::{RecordView, encode_record, record_write, record_read_at, decode_record};

pub use offsets::OffsetIndex;

pub use io::{PageIo, Queueable, ReadElement};

pub use memory::MemoryPage;

//! page/common — константы формата страницы очереди и размеры полей записи.
//!
//! Раскладка (все целые — big-endian):
//!   Header: [version u16][details_len u32][details]
//!   Record: [seq_num u64][payload_len u32][payload][crc32 u32]

/// Версия формата страницы (должна совпадать с версией checkpoint-слоя).
pub const PAGE_FORMAT_VERSION: u16 = 1;

/// Ёмкость страницы по умолчанию (байт).
pub const DEFAULT_PAGE_CAPACITY: usize = 64 * 1024;

// ---------- Поля записи ----------
/// Размер поля seq_num (u64).
pub const SEQNUM_SIZE: usize = 8;
/// Размер поля длины (u32) — и для payload записи, и для details заголовка.
pub const LENGTH_SIZE: usize = 4;
/// Размер трейлера CRC32 (u32).
pub const CHECKSUM_SIZE: usize = 4;
/// Минимальный размер записи (пустой payload).
pub const MIN_RECORD_SIZE: usize = SEQNUM_SIZE + LENGTH_SIZE + CHECKSUM_SIZE;

// ---------- Заголовок ----------
/// Размер поля version (u16).
pub const VERSION_SIZE: usize = 2;
/// Минимальный размер заголовка (details пустые).
pub const PAGE_HEADER_MIN: usize = VERSION_SIZE + LENGTH_SIZE;

// ---------- Offsets внутри записи ----------
pub const REC_OFF_SEQNUM: usize = 0;
pub const REC_OFF_LEN: usize = SEQNUM_SIZE;
pub const REC_OFF_PAYLOAD: usize = SEQNUM_SIZE + LENGTH_SIZE;

/// Полный размер записи на странице для payload длины `len`.
#[inline]
pub fn persisted_byte_count(len: usize) -> usize {
    MIN_RECORD_SIZE + len
}

/// Размер заголовка страницы с details длины `details_len`.
#[inline]
pub fn header_byte_count(details_len: usize) -> usize {
    PAGE_HEADER_MIN + details_len
}

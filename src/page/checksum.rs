//! page/checksum — CRC32 записи страницы.
//!
//! CRC32 (IEEE) считается по [seq_num u64][payload_len u32][payload];
//! сам трейлер в расчёт не входит. Аккумулятор новый на каждую запись.

use byteorder::{BigEndian, ByteOrder};
use crc32fast::Hasher;

use super::common::{LENGTH_SIZE, SEQNUM_SIZE};

/// Инкрементальный аккумулятор CRC32 одной записи.
#[derive(Clone, Default)]
pub struct RecordDigest {
    hasher: Hasher,
}

impl RecordDigest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить фиксированные поля записи (seq_num, длину payload).
    #[inline]
    pub fn update_fields(&mut self, seq_num: u64, payload_len: u32) {
        let mut head = [0u8; SEQNUM_SIZE + LENGTH_SIZE];
        BigEndian::write_u64(&mut head[..SEQNUM_SIZE], seq_num);
        BigEndian::write_u32(&mut head[SEQNUM_SIZE..], payload_len);
        self.hasher.update(&head);
    }

    #[inline]
    pub fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    #[inline]
    pub fn finalize(self) -> u32 {
        self.hasher.finalize()
    }
}

/// CRC32 записи целиком (без аллокаций).
#[inline]
pub fn record_checksum(seq_num: u64, payload: &[u8]) -> u32 {
    let mut d = RecordDigest::new();
    d.update_fields(seq_num, payload.len() as u32);
    d.update(payload);
    d.finalize()
}

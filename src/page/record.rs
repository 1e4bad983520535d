//! page/record — кодирование/чтение одной записи страницы.
//!
//! Формат: [seq_num u64][payload_len u32][payload][crc32 u32], big-endian.
//! CRC — см. page/checksum.rs.
//!
//! Чтение разделено на два шага:
//! - record_read_at: разбор полей с проверкой границ (без CRC);
//! - RecordView::verify: сверка CRC.
//! Так open() может сначала сверить seq_num первой записи, а потом CRC.

use anyhow::Result;
use byteorder::{BigEndian, ByteOrder};
use log::warn;

use super::checksum::record_checksum;
use super::common::{
    persisted_byte_count, CHECKSUM_SIZE, LENGTH_SIZE, MIN_RECORD_SIZE, REC_OFF_LEN,
    REC_OFF_PAYLOAD, REC_OFF_SEQNUM, SEQNUM_SIZE,
};
use crate::error::PageError;
use crate::metrics;

/// Запись, разобранная прямо из буфера страницы (без копирования payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordView<'a> {
    /// Смещение начала записи на странице.
    pub offset: usize,
    pub seq_num: u64,
    pub payload: &'a [u8],
    pub stored_crc: u32,
}

impl<'a> RecordView<'a> {
    /// Полный размер записи на странице.
    #[inline]
    pub fn len_total(&self) -> usize {
        persisted_byte_count(self.payload.len())
    }

    /// Позиция сразу за записью.
    #[inline]
    pub fn next_offset(&self) -> usize {
        self.offset + self.len_total()
    }

    /// Пересчитать CRC и сравнить с сохранённым.
    pub fn verify(&self) -> Result<()> {
        let computed = record_checksum(self.seq_num, self.payload);
        if computed != self.stored_crc {
            metrics::record_checksum_failure();
            warn!(
                "record checksum mismatch at offset {} (seq_num={}, stored={:#010x}, computed={:#010x})",
                self.offset, self.seq_num, self.stored_crc, computed
            );
            return Err(PageError::ChecksumMismatch {
                offset: self.offset,
                seq_num: self.seq_num,
                stored: self.stored_crc,
                computed,
            }
            .into());
        }
        Ok(())
    }
}

/// Закодировать запись в отдельный буфер.
pub fn encode_record(seq_num: u64, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; persisted_byte_count(payload.len())];
    put_record(&mut out, seq_num, payload);
    out
}

/// Записать запись в страницу по смещению `off`. Возвращает размер записи.
///
/// Буфер не трогается, если запись не помещается целиком.
pub fn record_write(page: &mut [u8], off: usize, seq_num: u64, payload: &[u8]) -> Result<usize> {
    let total = persisted_byte_count(payload.len());
    let end = off.checked_add(total);
    if payload.len() > u32::MAX as usize || end.map_or(true, |e| e > page.len()) {
        return Err(PageError::CapacityExceeded {
            needed: off.saturating_add(total),
            capacity: page.len(),
        }
        .into());
    }
    put_record(&mut page[off..off + total], seq_num, payload);
    Ok(total)
}

/// Раскладка полей в срез ровно под запись.
#[inline]
fn put_record(dst: &mut [u8], seq_num: u64, payload: &[u8]) {
    let plen = payload.len();
    BigEndian::write_u64(&mut dst[REC_OFF_SEQNUM..REC_OFF_SEQNUM + SEQNUM_SIZE], seq_num);
    BigEndian::write_u32(&mut dst[REC_OFF_LEN..REC_OFF_LEN + LENGTH_SIZE], plen as u32);
    dst[REC_OFF_PAYLOAD..REC_OFF_PAYLOAD + plen].copy_from_slice(payload);
    let crc = record_checksum(seq_num, payload);
    let crc_off = REC_OFF_PAYLOAD + plen;
    BigEndian::write_u32(&mut dst[crc_off..crc_off + CHECKSUM_SIZE], crc);
}

/// Разобрать запись по смещению `off` (без проверки CRC).
///
/// payload_len не доверяем: он сверяется с остатком страницы до того,
/// как будет взят срез.
pub fn record_read_at(page: &[u8], off: usize) -> Result<RecordView<'_>> {
    let cap = page.len();
    let fixed = SEQNUM_SIZE + LENGTH_SIZE;
    if off.checked_add(fixed).map_or(true, |e| e > cap) {
        warn!("cannot read seq_num and length bytes past capacity (off={}, cap={})", off, cap);
        return Err(PageError::Truncated {
            offset: off,
            needed: fixed,
            capacity: cap,
        }
        .into());
    }

    let seq_num = BigEndian::read_u64(&page[off + REC_OFF_SEQNUM..off + REC_OFF_SEQNUM + SEQNUM_SIZE]);
    let plen = BigEndian::read_u32(&page[off + REC_OFF_LEN..off + REC_OFF_LEN + LENGTH_SIZE]) as usize;

    let base = off + REC_OFF_PAYLOAD;
    let end = base
        .checked_add(plen)
        .and_then(|v| v.checked_add(CHECKSUM_SIZE));
    let end = match end {
        Some(e) if e <= cap => e,
        _ => {
            warn!(
                "record at off={} declares payload_len={} past capacity {}",
                off, plen, cap
            );
            return Err(PageError::Truncated {
                offset: off,
                needed: plen.saturating_add(MIN_RECORD_SIZE),
                capacity: cap,
            }
            .into());
        }
    };

    Ok(RecordView {
        offset: off,
        seq_num,
        payload: &page[base..base + plen],
        stored_crc: BigEndian::read_u32(&page[end - CHECKSUM_SIZE..end]),
    })
}

/// Разобрать и проверить запись (decode целиком).
pub fn decode_record(page: &[u8], off: usize) -> Result<RecordView<'_>> {
    let rec = record_read_at(page, off)?;
    rec.verify()?;
    Ok(rec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::page_error_kind;

    #[test]
    fn layout_is_bit_exact() {
        let bytes = encode_record(1, b"ab");
        assert_eq!(bytes.len(), 18);
        assert_eq!(&bytes[..8], &[0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(&bytes[8..12], &[0, 0, 0, 2]);
        assert_eq!(&bytes[12..14], b"ab");
        let crc = crc32fast::hash(&bytes[..14]);
        assert_eq!(&bytes[14..], &crc.to_be_bytes());
    }

    #[test]
    fn decode_reads_back_in_place() -> Result<()> {
        let mut page = vec![0u8; 64];
        let n = record_write(&mut page, 10, 42, b"hello")?;
        assert_eq!(n, 21);
        let rec = decode_record(&page, 10)?;
        assert_eq!(rec.seq_num, 42);
        assert_eq!(rec.payload, b"hello");
        assert_eq!(rec.next_offset(), 31);
        Ok(())
    }

    #[test]
    fn empty_payload() -> Result<()> {
        let bytes = encode_record(9, &[]);
        assert_eq!(bytes.len(), 16);
        let rec = decode_record(&bytes, 0)?;
        assert_eq!(rec.seq_num, 9);
        assert!(rec.payload.is_empty());
        Ok(())
    }

    #[test]
    fn write_past_end_leaves_buffer_untouched() {
        let mut page = vec![0u8; 20];
        let err = record_write(&mut page, 4, 1, b"abc").unwrap_err();
        assert!(matches!(
            page_error_kind(&err),
            Some(PageError::CapacityExceeded { needed: 23, capacity: 20 })
        ));
        assert!(page.iter().all(|&b| b == 0));
    }

    #[test]
    fn flipped_payload_byte_is_detected() {
        let mut bytes = encode_record(3, b"payload");
        bytes[REC_OFF_PAYLOAD + 2] ^= 0x01;
        let err = decode_record(&bytes, 0).unwrap_err();
        assert!(matches!(
            page_error_kind(&err),
            Some(PageError::ChecksumMismatch { seq_num: 3, offset: 0, .. })
        ));
    }

    #[test]
    fn oversized_length_field_is_truncation() {
        let mut bytes = encode_record(3, b"abc");
        BigEndian::write_u32(&mut bytes[REC_OFF_LEN..REC_OFF_LEN + 4], u32::MAX);
        let err = record_read_at(&bytes, 0).unwrap_err();
        assert!(matches!(
            page_error_kind(&err),
            Some(PageError::Truncated { offset: 0, .. })
        ));
    }

    #[test]
    fn fixed_fields_past_end_is_truncation() {
        let page = vec![0u8; 10];
        let err = record_read_at(&page, 0).unwrap_err();
        assert!(matches!(
            page_error_kind(&err),
            Some(PageError::Truncated { needed: 12, .. })
        ));
    }
}

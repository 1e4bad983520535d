//! page/header — заголовок страницы: [version u16][details_len u32][details].
//!
//! Пишется один раз при create(); при open() проверяется версия, details
//! пропускаются (для работы страницы они не нужны).

use anyhow::Result;
use byteorder::{BigEndian, ByteOrder};
use log::warn;

use super::common::{header_byte_count, LENGTH_SIZE, PAGE_HEADER_MIN, VERSION_SIZE};
use crate::error::PageError;

/// Разобранный заголовок страницы.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    pub version: u16,
    pub details_len: u32,
}

impl PageHeader {
    /// Сколько байт занимает заголовок целиком (= позиция первой записи).
    #[inline]
    pub fn byte_len(&self) -> usize {
        header_byte_count(self.details_len as usize)
    }
}

/// Записать заголовок в начало страницы. Возвращает его длину.
pub fn header_write(page: &mut [u8], version: u16, details: &[u8]) -> Result<usize> {
    let need = header_byte_count(details.len());
    if need > page.len() || details.len() > u32::MAX as usize {
        return Err(PageError::CapacityExceeded {
            needed: need,
            capacity: page.len(),
        }
        .into());
    }
    BigEndian::write_u16(&mut page[..VERSION_SIZE], version);
    BigEndian::write_u32(
        &mut page[VERSION_SIZE..VERSION_SIZE + LENGTH_SIZE],
        details.len() as u32,
    );
    page[PAGE_HEADER_MIN..need].copy_from_slice(details);
    Ok(need)
}

/// Прочитать и проверить заголовок (версия, границы details).
pub fn header_read(page: &[u8], expected_version: u16) -> Result<PageHeader> {
    let cap = page.len();
    if cap < PAGE_HEADER_MIN {
        warn!("page header truncated: capacity {} < {}", cap, PAGE_HEADER_MIN);
        return Err(PageError::Truncated {
            offset: 0,
            needed: PAGE_HEADER_MIN,
            capacity: cap,
        }
        .into());
    }

    let version = BigEndian::read_u16(&page[..VERSION_SIZE]);
    if version != expected_version {
        warn!(
            "page version mismatch, expecting: {}, this version: {}",
            expected_version, version
        );
        return Err(PageError::FormatVersionMismatch {
            expected: expected_version,
            actual: version,
        }
        .into());
    }

    let details_len = BigEndian::read_u32(&page[VERSION_SIZE..PAGE_HEADER_MIN]);
    let hdr = PageHeader {
        version,
        details_len,
    };
    match PAGE_HEADER_MIN.checked_add(details_len as usize) {
        Some(end) if end <= cap => Ok(hdr),
        _ => {
            warn!("page header details_len={} overruns capacity {}", details_len, cap);
            Err(PageError::Truncated {
                offset: PAGE_HEADER_MIN,
                needed: details_len as usize,
                capacity: cap,
            }
            .into())
        }
    }
}

/// Срез details из заголовка (без копирования).
pub fn header_details(page: &[u8], expected_version: u16) -> Result<&[u8]> {
    let hdr = header_read(page, expected_version)?;
    Ok(&page[PAGE_HEADER_MIN..hdr.byte_len()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::page_error_kind;

    #[test]
    fn empty_details_take_six_bytes() -> Result<()> {
        let mut page = vec![0u8; 32];
        let n = header_write(&mut page, 1, &[])?;
        assert_eq!(n, 6);
        assert_eq!(&page[..6], &[0, 1, 0, 0, 0, 0]);
        let hdr = header_read(&page, 1)?;
        assert_eq!(hdr.byte_len(), 6);
        Ok(())
    }

    #[test]
    fn details_are_skipped_and_readable() -> Result<()> {
        let mut page = vec![0u8; 32];
        let n = header_write(&mut page, 1, b"queue-a")?;
        assert_eq!(n, 13);
        assert_eq!(header_read(&page, 1)?.byte_len(), 13);
        assert_eq!(header_details(&page, 1)?, b"queue-a");
        Ok(())
    }

    #[test]
    fn version_mismatch() {
        let mut page = vec![0u8; 16];
        header_write(&mut page, 2, &[]).unwrap();
        let err = header_read(&page, 1).unwrap_err();
        assert_eq!(
            page_error_kind(&err),
            Some(&PageError::FormatVersionMismatch {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn header_does_not_fit() {
        let mut page = vec![0u8; 8];
        let err = header_write(&mut page, 1, b"abc").unwrap_err();
        assert!(matches!(
            page_error_kind(&err),
            Some(PageError::CapacityExceeded { needed: 9, capacity: 8 })
        ));
    }

    #[test]
    fn bogus_details_len_is_truncation() {
        let mut page = vec![0u8; 16];
        BigEndian::write_u16(&mut page[..2], 1);
        BigEndian::write_u32(&mut page[2..6], 1000);
        let err = header_read(&page, 1).unwrap_err();
        assert!(matches!(
            page_error_kind(&err),
            Some(PageError::Truncated { .. })
        ));
    }
}

//! page/memory — in-memory страница очереди фиксированной ёмкости.
//!
//! Состояние: буфер ровно `capacity` байт, курсоры записи/чтения,
//! счётчик записей, min_seq_num и индекс смещений (offsets.rs).
//!
//! Жизненный цикл: Uninitialized → (create | open) → Active.
//! Неудачный open() оставляет страницу в Uninitialized с пустым индексом.
//!
//! Хуки activate/deactivate/ensure_persisted/purge — no-op (дефолты PageIo).

use std::fmt;

use anyhow::{Context, Result};
use log::{debug, trace, warn};

use super::common::{persisted_byte_count, MIN_RECORD_SIZE, PAGE_FORMAT_VERSION};
use super::header::{header_details, header_read, header_write};
use super::io::{PageIo, ReadElement};
use super::offsets::OffsetIndex;
use super::record::{decode_record, record_read_at, record_write};
use crate::config::PageConfig;
use crate::error::PageError;
use crate::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    Uninitialized,
    Active,
}

pub struct MemoryPage {
    buf: Vec<u8>,
    capacity: usize,
    write_pos: usize,
    read_pos: usize,
    element_count: usize,
    min_seq_num: u64,
    format_version: u16,
    header_details: Vec<u8>,
    verify_on_read: bool,
    offsets: OffsetIndex,
    state: PageState,
}

impl MemoryPage {
    /// Пустая (обнулённая) страница заданной ёмкости.
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity],
            capacity,
            write_pos: 0,
            read_pos: 0,
            element_count: 0,
            min_seq_num: 0,
            format_version: PAGE_FORMAT_VERSION,
            header_details: Vec::new(),
            verify_on_read: true,
            offsets: OffsetIndex::new(),
            state: PageState::Uninitialized,
        }
    }

    /// Страница поверх уже существующих байт (для последующего open()).
    /// Буфер дополняется нулями до `capacity`.
    pub fn from_bytes(capacity: usize, bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() > capacity {
            return Err(PageError::CapacityExceeded {
                needed: bytes.len(),
                capacity,
            })
            .context("initial bytes greater than capacity");
        }
        let mut page = Self::new(0);
        page.buf = bytes;
        page.buf.resize(capacity, 0);
        page.capacity = capacity;
        Ok(page)
    }

    pub fn with_config(cfg: &PageConfig) -> Self {
        let mut page = Self::new(cfg.capacity);
        page.apply_config(cfg);
        page
    }

    pub fn from_bytes_with_config(cfg: &PageConfig, bytes: Vec<u8>) -> Result<Self> {
        let mut page = Self::from_bytes(cfg.capacity, bytes)?;
        page.apply_config(cfg);
        Ok(page)
    }

    fn apply_config(&mut self, cfg: &PageConfig) {
        self.format_version = cfg.format_version;
        self.header_details = cfg.header_details.clone();
        self.verify_on_read = cfg.verify_on_read;
    }

    /// Задать details заголовка (только до create()).
    pub fn set_header_details(&mut self, details: impl Into<Vec<u8>>) -> Result<()> {
        if self.is_active() {
            return Err(PageError::AlreadyActive.into());
        }
        self.header_details = details.into();
        Ok(())
    }

    /// Прочитать details из заголовка в буфере. Курсор чтения не двигается.
    pub fn read_header_details(&self) -> Result<Vec<u8>> {
        Ok(header_details(&self.buf, self.format_version)?.to_vec())
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == PageState::Active
    }

    #[inline]
    pub fn read_position(&self) -> usize {
        self.read_pos
    }

    /// Сырые байты страницы (ровно `capacity`).
    #[inline]
    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    #[inline]
    fn ensure_active(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(PageError::NotActive.into())
        }
    }

    /// Реплей заголовка и `count` записей. Поля страницы не трогает:
    /// возвращает (индекс, позицию записи) только при полном успехе.
    fn replay(&self, min_seq_num: u64, count: usize) -> Result<(OffsetIndex, usize)> {
        let hdr = header_read(&self.buf, self.format_version)?;
        let mut pos = hdr.byte_len();
        // count приходит снаружи: резерв не больше, чем физически влезает
        let fits = self.buf.len().saturating_sub(pos) / MIN_RECORD_SIZE;
        let mut offsets = OffsetIndex::with_capacity(count.min(fits));

        for i in 0..count {
            let rec = record_read_at(&self.buf, pos)
                .with_context(|| format!("replay record #{} at offset {}", i, pos))?;

            if i == 0 && rec.seq_num != min_seq_num {
                warn!(
                    "page minSeqNum mismatch, expected: {}, actual: {}",
                    min_seq_num, rec.seq_num
                );
                return Err(PageError::SequenceMismatch {
                    expected: min_seq_num,
                    actual: rec.seq_num,
                }
                .into());
            }

            rec.verify()
                .with_context(|| format!("replay record #{} at offset {}", i, pos))?;

            offsets.append(pos);
            pos = rec.next_offset();
        }
        Ok((offsets, pos))
    }
}

impl PageIo for MemoryPage {
    fn open(&mut self, min_seq_num: u64, element_count: usize) -> Result<()> {
        if self.is_active() {
            return Err(PageError::AlreadyActive.into());
        }

        let (offsets, write_pos) = match self.replay(min_seq_num, element_count) {
            Ok(v) => v,
            Err(e) => {
                metrics::record_page_open_failed();
                self.offsets.clear();
                return Err(e);
            }
        };

        self.read_pos = offsets.lookup(0).unwrap_or(write_pos);
        self.offsets = offsets;
        self.write_pos = write_pos;
        self.min_seq_num = min_seq_num;
        self.element_count = element_count;
        self.state = PageState::Active;

        metrics::record_page_opened(element_count as u64);
        debug!(
            "page opened: min_seq_num={}, elements={}, write_pos={}, capacity={}",
            self.min_seq_num, self.element_count, self.write_pos, self.capacity
        );
        Ok(())
    }

    fn create(&mut self) -> Result<()> {
        if self.is_active() {
            return Err(PageError::AlreadyActive.into());
        }
        let hdr_len = header_write(&mut self.buf, self.format_version, &self.header_details)
            .context("write page header")?;

        self.write_pos = hdr_len;
        self.read_pos = hdr_len;
        self.min_seq_num = 1;
        self.element_count = 0;
        self.offsets.clear();
        self.state = PageState::Active;

        metrics::record_page_created();
        debug!(
            "page created: header_len={}, capacity={}",
            hdr_len, self.capacity
        );
        Ok(())
    }

    fn has_space(&self, byte_size: usize) -> bool {
        byte_size
            .checked_add(MIN_RECORD_SIZE)
            .and_then(|n| self.write_pos.checked_add(n))
            .map_or(false, |end| end <= self.capacity)
    }

    fn write(&mut self, payload: &[u8], seq_num: u64) -> Result<()> {
        self.ensure_active()?;
        if !self.has_space(payload.len()) {
            return Err(PageError::CapacityExceeded {
                needed: self.write_pos.saturating_add(persisted_byte_count(payload.len())),
                capacity: self.capacity,
            }
            .into());
        }
        debug_assert!(
            self.element_count == 0
                || self.min_seq_num.checked_add(self.element_count as u64) == Some(seq_num),
            "non-contiguous seq_num {} (min={}, count={})",
            seq_num,
            self.min_seq_num,
            self.element_count
        );

        let pos = self.write_pos;
        let n = record_write(&mut self.buf, pos, seq_num, payload)?;
        self.offsets.append(pos);
        self.write_pos += n;
        if self.element_count == 0 {
            self.min_seq_num = seq_num;
        }
        self.element_count += 1;

        metrics::record_write(n as u64);
        trace!("page write: seq_num={}, off={}, len={}", seq_num, pos, n);
        Ok(())
    }

    fn read(&mut self, seq_num: u64, limit: usize) -> Result<Vec<ReadElement>> {
        self.ensure_active()?;
        if self.element_count == 0 {
            return Ok(Vec::new());
        }

        let out_of_range = || PageError::SeqNumOutOfRange {
            seq_num,
            min_seq_num: self.min_seq_num,
            element_count: self.element_count,
        };
        let rel = seq_num
            .checked_sub(self.min_seq_num)
            .and_then(|r| usize::try_from(r).ok())
            .filter(|&r| r < self.element_count)
            .ok_or_else(out_of_range)?;
        let start = self.offsets.lookup(rel).ok_or_else(out_of_range)?;

        let upto = limit.min(self.element_count - rel);
        let mut result = Vec::with_capacity(upto);
        let mut pos = start;
        for _ in 0..upto {
            let rec = if self.verify_on_read {
                decode_record(&self.buf, pos)?
            } else {
                record_read_at(&self.buf, pos)?
            };
            result.push(ReadElement::new(rec.seq_num, rec.payload));
            pos = rec.next_offset();
        }
        self.read_pos = pos;

        metrics::record_reads(result.len() as u64);
        trace!(
            "page read: from seq_num={}, limit={}, got={}",
            seq_num,
            limit,
            result.len()
        );
        Ok(result)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn write_position(&self) -> usize {
        self.write_pos
    }

    fn element_count(&self) -> usize {
        self.element_count
    }

    fn min_seq_num(&self) -> u64 {
        self.min_seq_num
    }
}

impl fmt::Debug for MemoryPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryPage")
            .field("capacity", &self.capacity)
            .field("write_pos", &self.write_pos)
            .field("read_pos", &self.read_pos)
            .field("element_count", &self.element_count)
            .field("min_seq_num", &self.min_seq_num)
            .field("state", &self.state)
            .finish()
    }
}

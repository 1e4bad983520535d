//! Lightweight global metrics for queue pages.
//!
//! Потокобезопасные атомарные счётчики:
//! - жизненный цикл страниц (create/open/open failures)
//! - запись/чтение записей
//! - реплей и ошибки целостности

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

// ----- Lifecycle -----
static PAGES_CREATED: AtomicU64 = AtomicU64::new(0);
static PAGES_OPENED: AtomicU64 = AtomicU64::new(0);
static PAGE_OPEN_FAILURES: AtomicU64 = AtomicU64::new(0);

// ----- Records -----
static RECORDS_WRITTEN: AtomicU64 = AtomicU64::new(0);
static RECORD_BYTES_WRITTEN: AtomicU64 = AtomicU64::new(0);
static RECORDS_READ: AtomicU64 = AtomicU64::new(0);
static RECORDS_REPLAYED: AtomicU64 = AtomicU64::new(0);

// ----- Integrity -----
static CHECKSUM_FAILURES: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    // Lifecycle
    pub pages_created: u64,
    pub pages_opened: u64,
    pub page_open_failures: u64,

    // Records
    pub records_written: u64,
    pub record_bytes_written: u64,
    pub records_read: u64,
    pub records_replayed: u64,

    // Integrity
    pub checksum_failures: u64,
}

impl MetricsSnapshot {
    /// Средний размер записи на странице (байт, включая служебные поля).
    pub fn avg_record_bytes(&self) -> f64 {
        if self.records_written == 0 {
            0.0
        } else {
            self.record_bytes_written as f64 / self.records_written as f64
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ----- recorders -----

pub fn record_page_created() {
    PAGES_CREATED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_page_opened(replayed: u64) {
    PAGES_OPENED.fetch_add(1, Ordering::Relaxed);
    RECORDS_REPLAYED.fetch_add(replayed, Ordering::Relaxed);
}

pub fn record_page_open_failed() {
    PAGE_OPEN_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_write(bytes: u64) {
    RECORDS_WRITTEN.fetch_add(1, Ordering::Relaxed);
    RECORD_BYTES_WRITTEN.fetch_add(bytes, Ordering::Relaxed);
}

pub fn record_reads(n: u64) {
    RECORDS_READ.fetch_add(n, Ordering::Relaxed);
}

pub fn record_checksum_failure() {
    CHECKSUM_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        pages_created: PAGES_CREATED.load(Ordering::Relaxed),
        pages_opened: PAGES_OPENED.load(Ordering::Relaxed),
        page_open_failures: PAGE_OPEN_FAILURES.load(Ordering::Relaxed),
        records_written: RECORDS_WRITTEN.load(Ordering::Relaxed),
        record_bytes_written: RECORD_BYTES_WRITTEN.load(Ordering::Relaxed),
        records_read: RECORDS_READ.load(Ordering::Relaxed),
        records_replayed: RECORDS_REPLAYED.load(Ordering::Relaxed),
        checksum_failures: CHECKSUM_FAILURES.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    PAGES_CREATED.store(0, Ordering::Relaxed);
    PAGES_OPENED.store(0, Ordering::Relaxed);
    PAGE_OPEN_FAILURES.store(0, Ordering::Relaxed);
    RECORDS_WRITTEN.store(0, Ordering::Relaxed);
    RECORD_BYTES_WRITTEN.store(0, Ordering::Relaxed);
    RECORDS_READ.store(0, Ordering::Relaxed);
    RECORDS_REPLAYED.store(0, Ordering::Relaxed);
    CHECKSUM_FAILURES.store(0, Ordering::Relaxed);
}

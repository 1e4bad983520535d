//! Centralized configuration and builder for queue pages.
//!
//! Goals:
//! - Single place to collect page tunables instead of scattering env lookups.
//! - PageConfig::from_env() reads the PQ_* env vars on top of the defaults.
//! - PageBuilder returns a PageConfig (or a ready MemoryPage).
//!
//! Defaults:
//! - capacity = 64 KiB
//! - format_version = PAGE_FORMAT_VERSION (must match the checkpoint layer)
//! - header_details = empty
//! - verify_on_read = true (CRC checked on every read, not only on open)

use std::fmt;

use anyhow::Result;

use crate::error::PageError;
use crate::page::common::{header_byte_count, DEFAULT_PAGE_CAPACITY, PAGE_FORMAT_VERSION};
use crate::page::memory::MemoryPage;

/// Top-level configuration for a queue page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageConfig {
    /// Fixed page size in bytes (header + records).
    /// Env: PQ_PAGE_CAPACITY (default 65536)
    pub capacity: usize,

    /// Format version written to and expected in the page header.
    /// Not exposed via env: it belongs to the checkpoint format.
    pub format_version: u16,

    /// Opaque metadata written once into the header at create().
    /// Env: PQ_PAGE_HEADER_DETAILS (string, default empty)
    pub header_details: Vec<u8>,

    /// Verify record CRC on read() as well as on open().
    /// Env: PQ_PAGE_VERIFY_READS = 0|false|off|no disables (default on)
    pub verify_on_read: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_PAGE_CAPACITY,
            format_version: PAGE_FORMAT_VERSION,
            header_details: Vec::new(),
            verify_on_read: true,
        }
    }
}

impl PageConfig {
    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("PQ_PAGE_CAPACITY") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.capacity = n;
            }
        }

        if let Ok(v) = std::env::var("PQ_PAGE_HEADER_DETAILS") {
            cfg.header_details = v.into_bytes();
        }

        if let Ok(v) = std::env::var("PQ_PAGE_VERIFY_READS") {
            let s = v.trim().to_ascii_lowercase();
            cfg.verify_on_read = !(s == "0" || s == "false" || s == "off" || s == "no");
        }

        cfg
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_format_version(mut self, version: u16) -> Self {
        self.format_version = version;
        self
    }

    pub fn with_header_details<B: Into<Vec<u8>>>(mut self, details: B) -> Self {
        self.header_details = details.into();
        self
    }

    pub fn with_verify_on_read(mut self, on: bool) -> Self {
        self.verify_on_read = on;
        self
    }

    /// Header size this config produces at create().
    pub fn header_len(&self) -> usize {
        header_byte_count(self.header_details.len())
    }

    /// The capacity must at least hold the header.
    pub fn validate(&self) -> Result<()> {
        let need = self.header_len();
        if need > self.capacity {
            return Err(PageError::CapacityExceeded {
                needed: need,
                capacity: self.capacity,
            }
            .into());
        }
        Ok(())
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self
    }
}

impl fmt::Display for PageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PageConfig {{ \
             capacity: {}, \
             format_version: {}, \
             header_details: {} bytes, \
             verify_on_read: {} \
             }}",
            self.capacity,
            self.format_version,
            self.header_details.len(),
            self.verify_on_read,
        )
    }
}

/// Lightweight builder that produces a PageConfig or a MemoryPage.
#[derive(Clone, Debug)]
pub struct PageBuilder {
    cfg: PageConfig,
}

impl Default for PageBuilder {
    fn default() -> Self {
        // Start from env, then allow overrides.
        Self {
            cfg: PageConfig::from_env(),
        }
    }
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: PageConfig::default(),
        }
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.cfg.capacity = capacity;
        self
    }

    pub fn format_version(mut self, version: u16) -> Self {
        self.cfg.format_version = version;
        self
    }

    pub fn header_details<B: Into<Vec<u8>>>(mut self, details: B) -> Self {
        self.cfg.header_details = details.into();
        self
    }

    pub fn verify_on_read(mut self, on: bool) -> Self {
        self.cfg.verify_on_read = on;
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> PageConfig {
        self.cfg
    }

    /// Validate and construct an uninitialized page (call create/open next).
    pub fn build_page(self) -> Result<MemoryPage> {
        self.cfg.validate()?;
        Ok(MemoryPage::with_config(&self.cfg))
    }
}

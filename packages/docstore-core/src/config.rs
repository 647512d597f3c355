//! Store configuration.

use crate::types::TypeCoding;
use crate::version::{CompatibilityVersion, DEFAULT_CURRENT_VERSION, DEFAULT_MINIMUM_VERSION};

/// Record store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Version stamped into new documents and the newest version accepted on open
    pub current_version: CompatibilityVersion,
    /// Oldest version accepted on open
    pub minimum_version: CompatibilityVersion,
    /// How field type tags are rendered
    pub type_coding: TypeCoding,
    /// Maximum retry attempts for transient I/O errors on save
    pub io_max_retries: u32,
    /// Delay between retry attempts in milliseconds
    pub io_retry_delay_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            current_version: DEFAULT_CURRENT_VERSION,
            minimum_version: DEFAULT_MINIMUM_VERSION,
            type_coding: TypeCoding::Simple,
            io_max_retries: 3,
            io_retry_delay_ms: 100,
        }
    }
}

impl StoreConfig {
    pub fn with_current_version(mut self, version: CompatibilityVersion) -> Self {
        self.current_version = version;
        self
    }

    pub fn with_minimum_version(mut self, version: CompatibilityVersion) -> Self {
        self.minimum_version = version;
        self
    }

    pub fn with_type_coding(mut self, coding: TypeCoding) -> Self {
        self.type_coding = coding;
        self
    }
}

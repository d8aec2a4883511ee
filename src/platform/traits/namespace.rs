//! Namespaced store interface trait
//!
//! Models preference-style storage (e.g. ESP-IDF NVS) where values live under
//! short string names inside one namespace.

use crate::platform::Result;

/// Namespaced key/value interface
pub trait NamespaceInterface {
    /// Read an unsigned 32-bit entry, `None` if the name is absent
    fn get_u32(&mut self, name: &str) -> Result<Option<u32>>;

    /// Write an unsigned 32-bit entry
    fn put_u32(&mut self, name: &str, value: u32) -> Result<()>;

    /// Read a byte entry into `buf`, returning the number of bytes copied
    ///
    /// Returns `Ok(0)` if the name is absent.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Namespace(NamespaceError::BufferTooSmall)` if the
    /// stored entry is longer than `buf`.
    fn get_bytes(&mut self, name: &str, buf: &mut [u8]) -> Result<usize>;

    /// Write a byte entry
    fn put_bytes(&mut self, name: &str, data: &[u8]) -> Result<()>;
}

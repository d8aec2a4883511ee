//! EEPROM-region interface trait
//!
//! Models the emulated-EEPROM access shape: a fixed-size region is opened,
//! accessed through a RAM mirror at byte offsets, committed to the medium in
//! one operation, and closed again.

use crate::platform::Result;

/// EEPROM-region interface
///
/// Call order for a store: `begin` → (`read` | `write`*) → `commit`? → `end`.
/// `write` only touches the RAM mirror; nothing reaches the medium until
/// `commit`.
pub trait EepromInterface {
    /// Open the region with `size` bytes
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Eeprom(EepromError::BeginFailed)` if the region
    /// cannot be mapped with that size.
    fn begin(&mut self, size: usize) -> Result<()>;

    /// Copy `buf.len()` bytes at `offset` out of the region
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<()>;

    /// Copy `data` into the region at `offset`
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<()>;

    /// Persist the region to the medium
    fn commit(&mut self) -> Result<()>;

    /// Close the region and release its RAM mirror
    fn end(&mut self);
}

//! Flash interface trait
//!
//! Raw NOR flash as found on RP2040/RP2350-class parts. Used by
//! [`FlashRegion`](crate::storage::FlashRegion) to hold one parameter region.

use crate::platform::Result;

/// Raw NOR flash
///
/// - Erase works on whole blocks and sets every byte to 0xFF
/// - Writes only clear bits, so a range must be erased before rewriting
/// - Calls block until the operation finishes
///
/// Implementations must refuse to erase or write below the parameter area
/// so a bad address can never hit firmware. With the default base the
/// layout is:
///
/// ```text
/// [Firmware]           0x000000 - 0x040000   protected
/// [Parameter region]   0x040000 - region size rounded up to a block
/// ```
pub trait FlashInterface {
    /// Read `buf.len()` bytes starting at `address`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` if the range is out of bounds.
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()>;

    /// Write `data` starting at `address`
    ///
    /// The target range must have been erased; only 1→0 bit transitions take effect.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` for protected or
    /// out-of-bounds ranges and `FlashError::WriteFailed` on hardware failure.
    fn write(&mut self, address: u32, data: &[u8]) -> Result<()>;

    /// Erase `size` bytes starting at `address` (both block-aligned)
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` for unaligned or
    /// protected ranges and `FlashError::EraseFailed` on hardware failure.
    fn erase(&mut self, address: u32, size: u32) -> Result<()>;

    /// Minimum erasable unit in bytes
    fn block_size(&self) -> u32;

    /// Total flash size in bytes
    fn capacity(&self) -> u32;
}

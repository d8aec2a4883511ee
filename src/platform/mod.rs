//! Platform abstraction layer
//!
//! Backing media are reached only through the traits in [`traits`]. Each
//! trait mirrors one of the access shapes found on small devices:
//!
//! - [`EepromInterface`]: a byte region that is opened, read/written at
//!   offsets, committed and closed (EEPROM emulation)
//! - [`NamespaceInterface`]: a namespaced key/value store addressed by
//!   fixed string names (NVS-style preferences)
//! - [`FlashInterface`]: raw NOR flash with erase-before-write blocks

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{EepromError, FlashError, NamespaceError, PlatformError, Result};
pub use traits::{EepromInterface, FlashInterface, NamespaceInterface};

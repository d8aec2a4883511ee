//! Platform abstraction traits
//!
//! This module defines the traits that backing media must provide.

pub mod eeprom;
pub mod flash;
pub mod namespace;

// Re-export trait interfaces
pub use eeprom::EepromInterface;
pub use flash::FlashInterface;
pub use namespace::NamespaceInterface;

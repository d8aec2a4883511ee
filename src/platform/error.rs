//! Platform error types
//!
//! This module defines error types for backing-medium operations.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All backend implementations map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// Flash operation failed
    Flash(FlashError),
    /// EEPROM region operation failed
    Eeprom(EepromError),
    /// Namespaced store operation failed
    Namespace(NamespaceError),
    /// Invalid configuration provided
    InvalidConfig,
}

/// Flash-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Address out of range, in a protected region, or not block-aligned
    InvalidAddress,
    /// Read operation failed
    ReadFailed,
    /// Write operation failed
    WriteFailed,
    /// Erase operation failed
    EraseFailed,
}

/// EEPROM-region errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromError {
    /// Region could not be opened with the requested size
    BeginFailed,
    /// Access outside the opened region, or region not open
    OutOfRange,
    /// Read from the region failed
    ReadFailed,
    /// Write into the region failed
    WriteFailed,
    /// Commit to the medium failed
    CommitFailed,
}

/// Namespaced store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NamespaceError {
    /// Read of a named entry failed
    ReadFailed,
    /// Write of a named entry failed
    WriteFailed,
    /// Stored entry does not fit the caller's buffer
    BufferTooSmall,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Flash(e) => write!(f, "Flash error: {:?}", e),
            PlatformError::Eeprom(e) => write!(f, "EEPROM error: {:?}", e),
            PlatformError::Namespace(e) => write!(f, "Namespace error: {:?}", e),
            PlatformError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

impl From<FlashError> for PlatformError {
    fn from(err: FlashError) -> Self {
        PlatformError::Flash(err)
    }
}

impl From<EepromError> for PlatformError {
    fn from(err: EepromError) -> Self {
        PlatformError::Eeprom(err)
    }
}

impl From<NamespaceError> for PlatformError {
    fn from(err: NamespaceError) -> Self {
        PlatformError::Namespace(err)
    }
}

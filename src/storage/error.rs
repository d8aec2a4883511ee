//! Storage error types

use crate::platform::PlatformError;
use core::fmt;

/// Errors from key-value store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Key is empty or contains a NUL byte
    InvalidKey,
    /// Key longer than `MAX_KEY_LEN`
    KeyTooLong,
    /// Value longer than `MAX_VALUE_LEN`
    ValueTooLong,
    /// No free slot left (`MAX_KEYS` reached)
    Full,
    /// Backing medium failed
    Platform(PlatformError),
}

/// Reasons a region image is rejected as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Stored `totalSize` is smaller than the header or larger than the region
    SizeOutOfRange,
    /// Stored hash does not match the contents
    ChecksumMismatch,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidKey => write!(f, "invalid key"),
            StoreError::KeyTooLong => write!(f, "key too long"),
            StoreError::ValueTooLong => write!(f, "value too long"),
            StoreError::Full => write!(f, "key-value store full"),
            StoreError::Platform(e) => write!(f, "storage backend: {}", e),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::SizeOutOfRange => write!(f, "region size out of range"),
            DecodeError::ChecksumMismatch => write!(f, "region checksum mismatch"),
        }
    }
}

impl From<PlatformError> for StoreError {
    fn from(err: PlatformError) -> Self {
        StoreError::Platform(err)
    }
}

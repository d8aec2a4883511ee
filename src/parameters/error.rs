//! Parameter error types

use crate::storage::StoreError;

/// Errors from parameter operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParameterError {
    /// Name is empty, contains NUL or is longer than `MAX_KEY_LEN`
    InvalidName,
    /// Value type does not match the parameter type
    TypeMismatch,
    /// String longer than `MAX_STRING_LEN`
    ValueTooLong,
    /// Registry holds `MAX_PARAMS` parameters already
    RegistryFull,
    /// Underlying store rejected the operation
    Store(StoreError),
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParameterError::InvalidName => write!(f, "invalid parameter name"),
            ParameterError::TypeMismatch => write!(f, "parameter type mismatch"),
            ParameterError::ValueTooLong => write!(f, "parameter value too long"),
            ParameterError::RegistryFull => write!(f, "parameter registry full"),
            ParameterError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl From<StoreError> for ParameterError {
    fn from(err: StoreError) -> Self {
        ParameterError::Store(err)
    }
}

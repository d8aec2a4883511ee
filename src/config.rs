//! Compile-time configuration
//!
//! Values read from the build environment (see `build.rs`) and the fixed
//! capacities of the in-memory structures.

/// Default region capacity in bytes (`NVPARAMS_REGION_SIZE`, default 512)
pub const DEFAULT_REGION_SIZE: usize = parse_size(env!("NVPARAMS_REGION_SIZE"));

/// Name prefix marking a parameter as hidden (`NVPARAMS_HIDDEN_PREFIX`, default `_`)
pub const HIDDEN_PREFIX: &str = env!("NVPARAMS_HIDDEN_PREFIX");

/// Largest supported region (one 4 KB flash sector)
pub const MAX_REGION_SIZE: usize = 4096;

/// Maximum number of keys held by a store (power of two)
pub const MAX_KEYS: usize = 64;

/// Maximum key length in bytes, excluding the NUL terminator
pub const MAX_KEY_LEN: usize = 32;

/// Maximum value length in bytes
pub const MAX_VALUE_LEN: usize = 64;

/// Maximum number of registered parameters (power of two)
pub const MAX_PARAMS: usize = 64;

/// Maximum string parameter length (one byte is reserved for the terminator)
pub const MAX_STRING_LEN: usize = MAX_VALUE_LEN - 1;

/// Capacity of rendered parameter text
pub const MAX_TEXT_LEN: usize = 64;

/// Default flash offset of the parameter region (256 KB, after firmware)
pub const FLASH_REGION_BASE: u32 = 0x040000;

const fn parse_size(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut value = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            panic!("NVPARAMS_REGION_SIZE is not a number");
        }
        value = value * 10 + (b - b'0') as usize;
        i += 1;
    }
    value
}

const _: () = assert!(DEFAULT_REGION_SIZE >= 8 && DEFAULT_REGION_SIZE <= MAX_REGION_SIZE);
const _: () = assert!(MAX_KEYS.is_power_of_two() && MAX_PARAMS.is_power_of_two());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("512"), 512);
        assert_eq!(parse_size("4096"), 4096);
        assert_eq!(parse_size("0"), 0);
    }

    #[test]
    fn test_hidden_prefix_is_set() {
        assert!(!HIDDEN_PREFIX.is_empty());
    }
}

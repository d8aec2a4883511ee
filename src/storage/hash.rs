//! Region checksum
//!
//! Additive 32-bit checksum used to tell a valid region apart from one that
//! was never written, was written by an incompatible layout, or was cut short
//! by power loss. It is an integrity check only, not a security mechanism.

/// Seed added before summing
pub const HASH_SEED: u32 = 0x2c58_ad4d;

/// Compute the region hash
///
/// Sums, with wrapping arithmetic, the seed, the `total_size` header word and
/// the little-endian 32-bit words of `body` (the bytes after the header up to
/// `total_size`). A trailing partial word is zero-padded.
///
/// Any single-byte change inside `body` is caught, as is a `total_size` that
/// grows over the zero padding after the entries. A `total_size` that shrinks
/// by `d` is missed when the words it cuts off happen to sum to `-d`; the
/// entry walk then stops at the cut and the load reports truncation.
pub fn compute_hash(total_size: u32, body: &[u8]) -> u32 {
    body.chunks(4).fold(HASH_SEED.wrapping_add(total_size), |hash, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        hash.wrapping_add(u32::from_le_bytes(word))
    })
}

/// Check `body` against a stored hash
pub fn validate_hash(total_size: u32, body: &[u8], expected: u32) -> bool {
    compute_hash(total_size, body) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_seed_plus_size() {
        assert_eq!(compute_hash(8, &[]), HASH_SEED.wrapping_add(8));
    }

    #[test]
    fn test_words_are_little_endian() {
        let body = [0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00];
        assert_eq!(compute_hash(0, &body), HASH_SEED + 0x0000_0101);
    }

    #[test]
    fn test_partial_word_is_zero_padded() {
        assert_eq!(compute_hash(0, &[0xAA]), compute_hash(0, &[0xAA, 0, 0, 0]));
    }

    #[test]
    fn test_detects_single_byte_change() {
        let body = *b"key\0value bytes";
        let hash = compute_hash(23, &body);
        for i in 0..body.len() {
            let mut corrupted = body;
            corrupted[i] ^= 0x40;
            assert!(!validate_hash(23, &corrupted, hash), "byte {} undetected", i);
        }
        assert!(!validate_hash(24, &body, hash));
    }

    #[test]
    fn test_grown_size_is_detected() {
        let body = [0x11, 0x22, 0x33, 0x44];
        let hash = compute_hash(12, &body);
        assert!(!validate_hash(16, &[0x11, 0x22, 0x33, 0x44, 0, 0, 0, 0], hash));
    }

    #[test]
    fn test_shrunk_size_can_cancel_dropped_words() {
        // Known limit of an additive sum
        let dropped = 4u32.wrapping_neg().to_le_bytes();
        let mut body = [0u8; 8];
        body[..4].copy_from_slice(&1u32.to_le_bytes());
        body[4..].copy_from_slice(&dropped);
        let hash = compute_hash(16, &body);
        assert!(validate_hash(12, &body[..4], hash));
    }

    #[test]
    fn test_wraps_instead_of_overflowing() {
        let body = [0xFF; 64];
        let _ = compute_hash(u32::MAX, &body);
    }
}

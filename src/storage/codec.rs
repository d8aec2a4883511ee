//! Region image encoding and decoding
//!
//! All integers are little-endian regardless of host byte order.

use super::error::DecodeError;
use super::hash::{compute_hash, validate_hash};

/// Region header size (totalSize + hash)
pub const HEADER_SIZE: usize = 8;

/// Per-entry header size (keySize + valueSize)
pub const ENTRY_HEADER_SIZE: usize = 8;

/// Region header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionHeader {
    /// Bytes in use, header included
    pub total_size: u32,
    /// Checksum over `total_size` and the entry bytes
    pub hash: u32,
}

impl RegionHeader {
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.total_size.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.hash.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (total_size, hash) = read_pair(bytes)?;
        Some(Self { total_size, hash })
    }
}

/// Entry header preceding each key/value pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHeader {
    /// Key length including the NUL terminator
    pub key_size: u32,
    pub value_size: u32,
}

impl EntryHeader {
    pub fn to_bytes(&self) -> [u8; ENTRY_HEADER_SIZE] {
        let mut bytes = [0u8; ENTRY_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.key_size.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.value_size.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (key_size, value_size) = read_pair(bytes)?;
        Some(Self {
            key_size,
            value_size,
        })
    }
}

fn read_pair(bytes: &[u8]) -> Option<(u32, u32)> {
    let first = bytes.get(0..4)?;
    let second = bytes.get(4..8)?;
    Some((
        u32::from_le_bytes([first[0], first[1], first[2], first[3]]),
        u32::from_le_bytes([second[0], second[1], second[2], second[3]]),
    ))
}

/// Encoded size of one entry
pub const fn encoded_entry_size(key: &str, value: &[u8]) -> usize {
    ENTRY_HEADER_SIZE + key.len() + 1 + value.len()
}

/// Result of encoding a set of entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncodeSummary {
    /// Bytes used, header included (the stored `totalSize`)
    pub total_size: usize,
    /// Entries written
    pub written: usize,
    /// Non-empty entries that did not fit
    pub dropped: usize,
}

/// Encode entries into `region`
///
/// The region is zero-filled first. Entries are written in iteration order;
/// entries with an empty value are skipped. Encoding stops at the first entry
/// that would run past the end of the region, and every non-empty entry from
/// there on is counted as dropped.
///
/// Keys must be non-empty and free of NUL bytes; the store enforces this.
pub fn encode<'a, I>(entries: I, region: &mut [u8]) -> EncodeSummary
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    region.fill(0);
    let mut summary = EncodeSummary::default();
    if region.len() < HEADER_SIZE {
        summary.dropped = entries.into_iter().filter(|(_, v)| !v.is_empty()).count();
        return summary;
    }

    let mut offset = HEADER_SIZE;
    let mut full = false;
    for (key, value) in entries {
        if value.is_empty() {
            continue;
        }
        debug_assert!(!key.is_empty() && !key.as_bytes().contains(&0));
        let size = encoded_entry_size(key, value);
        if full || offset + size > region.len() {
            full = true;
            summary.dropped += 1;
            continue;
        }

        let header = EntryHeader {
            key_size: (key.len() + 1) as u32,
            value_size: value.len() as u32,
        };
        region[offset..offset + ENTRY_HEADER_SIZE].copy_from_slice(&header.to_bytes());
        offset += ENTRY_HEADER_SIZE;
        region[offset..offset + key.len()].copy_from_slice(key.as_bytes());
        offset += key.len() + 1; // NUL already in place
        region[offset..offset + value.len()].copy_from_slice(value);
        offset += value.len();
        summary.written += 1;
    }

    let total_size = offset as u32;
    let header = RegionHeader {
        total_size,
        hash: compute_hash(total_size, &region[HEADER_SIZE..offset]),
    };
    region[..HEADER_SIZE].copy_from_slice(&header.to_bytes());
    summary.total_size = offset;
    summary
}

/// Validate a region image and return an iterator over its entries
///
/// The header is checked up front: `totalSize` must lie within
/// `[HEADER_SIZE, region.len()]` and the hash must match. Structural problems
/// inside the entry area end iteration early; check
/// [`Entries::is_truncated`] afterwards to tell them apart from a clean end.
pub fn decode(region: &[u8]) -> Result<Entries<'_>, DecodeError> {
    let header = RegionHeader::from_bytes(region).ok_or(DecodeError::SizeOutOfRange)?;
    let total_size = header.total_size as usize;
    if total_size < HEADER_SIZE || total_size > region.len() {
        return Err(DecodeError::SizeOutOfRange);
    }
    if !validate_hash(header.total_size, &region[HEADER_SIZE..total_size], header.hash) {
        return Err(DecodeError::ChecksumMismatch);
    }

    Ok(Entries {
        image: &region[..total_size],
        offset: HEADER_SIZE,
        done: false,
        truncated: false,
    })
}

/// One decoded entry, borrowing from the region image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub key: &'a str,
    pub value: &'a [u8],
}

/// Iterator over the entries of a validated region image
pub struct Entries<'a> {
    image: &'a [u8],
    offset: usize,
    done: bool,
    truncated: bool,
}

impl<'a> Entries<'a> {
    /// Whether iteration stopped at a malformed entry
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    fn stop(&mut self) -> Option<Entry<'a>> {
        self.done = true;
        self.truncated = true;
        None
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Entry<'a>> {
        loop {
            if self.done {
                return None;
            }
            if self.offset >= self.image.len() {
                self.done = true;
                return None;
            }

            let Some(header) = EntryHeader::from_bytes(&self.image[self.offset..]) else {
                return self.stop();
            };
            let key_start = self.offset + ENTRY_HEADER_SIZE;
            let Some(key_end) = key_start.checked_add(header.key_size as usize) else {
                return self.stop();
            };
            let Some(value_end) = key_end.checked_add(header.value_size as usize) else {
                return self.stop();
            };
            if header.key_size < 2 || value_end > self.image.len() {
                return self.stop();
            }

            let key_bytes = &self.image[key_start..key_end - 1];
            if self.image[key_end - 1] != 0 || key_bytes.contains(&0) {
                return self.stop();
            }
            let Ok(key) = core::str::from_utf8(key_bytes) else {
                return self.stop();
            };

            self.offset = value_end;
            if header.value_size == 0 {
                continue;
            }
            return Some(Entry {
                key,
                value: &self.image[key_end..value_end],
            });
        }
    }
}

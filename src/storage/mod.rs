//! Key-value storage over one fixed-size persistent region
//!
//! # Region Format
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ totalSize: u32 (LE)                           │  Offset: 0
//! ├───────────────────────────────────────────────┤
//! │ hash: u32 (LE)                                │  Offset: 4
//! ├───────────────────────────────────────────────┤
//! │ Entries (packed, up to totalSize)             │  Offset: 8
//! │   keySize: u32   (key length + NUL)           │
//! │   valueSize: u32                              │
//! │   key: [u8; keySize] (NUL-terminated)         │
//! │   value: [u8; valueSize]                      │
//! ├───────────────────────────────────────────────┤
//! │ Unused (zero on EEPROM, ignored)              │  Offset: totalSize
//! └───────────────────────────────────────────────┘
//! ```
//!
//! `hash` is an additive checksum over the `totalSize` word and the bytes in
//! `[8, totalSize)`. A region that fails the check loads as an empty store.
//!
//! # Lifecycle
//!
//! - Load reads the whole region once and decodes it into memory
//! - `set`/`unset`/`clear` only touch memory and set the dirty flag
//! - `save` encodes everything and writes the region as one block

pub mod codec;
pub mod error;
pub mod hash;
pub mod region;
pub mod store;

pub use codec::{EncodeSummary, Entry, HEADER_SIZE};
pub use error::{DecodeError, StoreError};
pub use hash::{compute_hash, validate_hash, HASH_SEED};
pub use region::{EepromRegion, FlashRegion, NamespaceRegion, RegionStorage};
pub use store::{KeyId, KeyName, KeyValueStore, LoadStatus, SaveOutcome, Value};

//! Mock backends for testing
//!
//! In-memory implementations of the platform traits with fault injection,
//! so storage behavior under failures can be tested without hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```
//! use nvparams::platform::mock::MockEeprom;
//! use nvparams::storage::{EepromRegion, KeyValueStore};
//!
//! let mut store = KeyValueStore::new(EepromRegion::new(MockEeprom::new(64)), 64);
//! store.load();
//! store.set("k1", b"v1").unwrap();
//! store.save().unwrap();
//! ```

#![cfg(any(test, feature = "mock"))]

mod eeprom;
mod flash;
mod namespace;

pub use eeprom::{EepromFaults, MockEeprom};
pub use flash::{FlashFaults, MockFlash};
pub use namespace::{MockNamespace, NamespaceFaults};

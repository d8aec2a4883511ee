#![cfg_attr(not(test), no_std)]

//! nvparams - Persistent key-value storage and typed parameters for small
//! non-volatile regions (EEPROM emulation, NOR flash, namespaced stores)
//!
//! The crate is layered bottom-up:
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │   UI / CLI collaborators               │
//! │  (enumerate, set-from-text, save)      │
//! └──────────────┬─────────────────────────┘
//!                ▼
//! ┌────────────────────────────────────────┐
//! │   ParameterSet                          │
//! │  - registry of live parameters          │
//! │  - orphan pruning before save           │
//! │  - typed, clamped, lazily loaded values │
//! └──────────────┬─────────────────────────┘
//!                ▼
//! ┌────────────────────────────────────────┐
//! │   KeyValueStore                         │
//! │  - key → slot id → bytes                │
//! │  - dirty tracking, whole-region commit  │
//! └──────────────┬─────────────────────────┘
//!                ▼
//! ┌────────────────────────────────────────┐
//! │   Region codec + RegionStorage backend  │
//! │  (EEPROM, namespace, flash)             │
//! └────────────────────────────────────────┘
//! ```
//!
//! No heap allocation is performed; all collections are fixed-capacity.

#[cfg(all(feature = "mock", not(test)))]
extern crate std;

// Logging macros must be defined before the modules that use them
#[macro_use]
pub mod logging;

pub mod config;

// Backend traits, platform errors and mock backends
pub mod platform;

// Binary region codec and key-value store
pub mod storage;

// Typed parameter overlay and registry
pub mod parameters;

pub use parameters::{
    BooleanParameter, FloatParameter, IntegerParameter, ParamHandle, ParamSpec, ParamType,
    ParamValue, ParameterError, ParameterSet, StringParameter,
};
pub use storage::{KeyId, KeyValueStore, LoadStatus, RegionStorage, SaveOutcome, StoreError};

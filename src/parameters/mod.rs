//! Typed parameters over the key-value store
//!
//! A parameter is a named, typed view of one store key with a default and,
//! for numbers, inclusive bounds. The [`ParameterSet`] owns the store, keeps
//! the registry of live parameters and prunes keys nobody owns before saving.
//!
//! ```text
//! FloatParameter ─┐
//! IntegerParameter├─▶ ParamHandle ─▶ ParameterSet ─▶ KeyValueStore
//! StringParameter │   (lazy load,     (registry,
//! BooleanParameter┘    clamp, cache)   prune, save)
//! ```

pub mod error;
pub mod handle;
pub mod set;
pub mod typed;
pub mod value;

pub use error::ParameterError;
pub use handle::ParamHandle;
pub use set::ParameterSet;
pub use typed::{
    BooleanParameter, FloatParameter, IntegerParameter, ParamKind, StringParameter,
    TypedParameter,
};
pub use value::{ParamSpec, ParamString, ParamText, ParamType, ParamValue};

//! Typed parameters
//!
//! A typed parameter registers itself with a [`ParameterSet`] when built and
//! unregisters when dropped.
//!
//! ```
//! use nvparams::platform::mock::MockEeprom;
//! use nvparams::storage::EepromRegion;
//! use nvparams::{FloatParameter, IntegerParameter, ParameterSet};
//!
//! let set = ParameterSet::with_storage(EepromRegion::new(MockEeprom::new(512)), 512);
//! let gain = FloatParameter::with_bounds(&set, "gain", 0.5, 0.0, 1.0).unwrap();
//! let retries = IntegerParameter::new(&set, "retries", 3).unwrap();
//!
//! gain.set_value(5.0).unwrap();
//! assert_eq!(gain.value(), 1.0);
//! assert_eq!(retries.value(), 3);
//! set.save().unwrap();
//! ```

use super::error::ParameterError;
use super::handle::ParamHandle;
use super::set::ParameterSet;
use super::value::{ParamSpec, ParamString, ParamText, ParamValue, DEFAULT_DECIMAL_PLACES};
use crate::storage::RegionStorage;
use core::marker::PhantomData;

/// Native value type of a parameter
pub trait ParamKind: Sized + Default {
    fn from_value(value: ParamValue) -> Option<Self>;
    fn into_value(self) -> ParamValue;
}

impl ParamKind for ParamString {
    fn from_value(value: ParamValue) -> Option<Self> {
        match value {
            ParamValue::String(v) => Some(v),
            _ => None,
        }
    }

    fn into_value(self) -> ParamValue {
        ParamValue::String(self)
    }
}

impl ParamKind for f32 {
    fn from_value(value: ParamValue) -> Option<Self> {
        match value {
            ParamValue::Float(v) => Some(v),
            _ => None,
        }
    }

    fn into_value(self) -> ParamValue {
        ParamValue::Float(self)
    }
}

impl ParamKind for i32 {
    fn from_value(value: ParamValue) -> Option<Self> {
        match value {
            ParamValue::Integer(v) => Some(v),
            _ => None,
        }
    }

    fn into_value(self) -> ParamValue {
        ParamValue::Integer(self)
    }
}

impl ParamKind for bool {
    fn from_value(value: ParamValue) -> Option<Self> {
        match value {
            ParamValue::Boolean(v) => Some(v),
            _ => None,
        }
    }

    fn into_value(self) -> ParamValue {
        ParamValue::Boolean(self)
    }
}

/// Registered parameter with a native value type
pub struct TypedParameter<'a, S: RegionStorage, T: ParamKind> {
    handle: ParamHandle<'a, S>,
    token: u32,
    _kind: PhantomData<T>,
}

pub type StringParameter<'a, S> = TypedParameter<'a, S, ParamString>;
pub type FloatParameter<'a, S> = TypedParameter<'a, S, f32>;
pub type IntegerParameter<'a, S> = TypedParameter<'a, S, i32>;
pub type BooleanParameter<'a, S> = TypedParameter<'a, S, bool>;

impl<'a, S: RegionStorage, T: ParamKind> TypedParameter<'a, S, T> {
    fn register(
        set: &'a ParameterSet<S>,
        name: &'static str,
        spec: ParamSpec,
    ) -> Result<Self, ParameterError> {
        let token = set.register(name, spec)?;
        Ok(Self {
            handle: ParamHandle::new(set, name, spec),
            token,
            _kind: PhantomData,
        })
    }

    /// Current value, or the default while unset
    ///
    /// # Panics
    ///
    /// Panics if a [`ParameterSet::store`] or [`ParameterSet::store_mut`]
    /// guard is alive, as does every other read or write of a parameter.
    pub fn value(&self) -> T {
        T::from_value(self.handle.get()).unwrap_or_default()
    }

    /// Store `value`; numbers are clamped into bounds
    ///
    /// # Panics
    ///
    /// Panics if a [`ParameterSet::store`] or [`ParameterSet::store_mut`]
    /// guard is alive.
    pub fn set_value(&self, value: T) -> Result<(), ParameterError> {
        self.handle.set(value.into_value())
    }

    pub fn default_value(&self) -> T {
        T::from_value(self.handle.spec().default_value()).unwrap_or_default()
    }

    pub fn name(&self) -> &'static str {
        self.handle.name()
    }

    pub fn is_hidden(&self) -> bool {
        self.handle.is_hidden()
    }

    pub fn set_from_str(&self, text: &str) -> Result<(), ParameterError> {
        self.handle.set_from_str(text)
    }

    pub fn to_text(&self) -> ParamText {
        self.handle.to_text()
    }

    /// Untyped view, as used by registry enumeration
    pub fn handle(&self) -> &ParamHandle<'a, S> {
        &self.handle
    }
}

impl<S: RegionStorage, T: ParamKind> Drop for TypedParameter<'_, S, T> {
    fn drop(&mut self) {
        self.handle
            .parameter_set()
            .unregister(self.handle.name(), self.token);
    }
}

impl<'a, S: RegionStorage> TypedParameter<'a, S, ParamString> {
    pub fn new(
        set: &'a ParameterSet<S>,
        name: &'static str,
        default: &'static str,
    ) -> Result<Self, ParameterError> {
        Self::register(set, name, ParamSpec::string(default))
    }

    /// Store `text`; fails with `ValueTooLong` past `MAX_STRING_LEN` bytes
    pub fn set_str(&self, text: &str) -> Result<(), ParameterError> {
        let value = ParamString::try_from(text).map_err(|_| ParameterError::ValueTooLong)?;
        self.set_value(value)
    }
}

impl<'a, S: RegionStorage> TypedParameter<'a, S, f32> {
    /// Unbounded float shown with two decimal places
    pub fn new(
        set: &'a ParameterSet<S>,
        name: &'static str,
        default: f32,
    ) -> Result<Self, ParameterError> {
        Self::with_precision(set, name, default, DEFAULT_DECIMAL_PLACES, -f32::MAX, f32::MAX)
    }

    pub fn with_bounds(
        set: &'a ParameterSet<S>,
        name: &'static str,
        default: f32,
        min: f32,
        max: f32,
    ) -> Result<Self, ParameterError> {
        Self::with_precision(set, name, default, DEFAULT_DECIMAL_PLACES, min, max)
    }

    pub fn with_precision(
        set: &'a ParameterSet<S>,
        name: &'static str,
        default: f32,
        decimal_places: u8,
        min: f32,
        max: f32,
    ) -> Result<Self, ParameterError> {
        Self::register(set, name, ParamSpec::float(default, min, max, decimal_places))
    }
}

impl<'a, S: RegionStorage> TypedParameter<'a, S, i32> {
    /// Integer bounded to `[-i32::MAX, i32::MAX]`
    pub fn new(
        set: &'a ParameterSet<S>,
        name: &'static str,
        default: i32,
    ) -> Result<Self, ParameterError> {
        Self::with_bounds(set, name, default, -i32::MAX, i32::MAX)
    }

    pub fn with_bounds(
        set: &'a ParameterSet<S>,
        name: &'static str,
        default: i32,
        min: i32,
        max: i32,
    ) -> Result<Self, ParameterError> {
        Self::register(set, name, ParamSpec::integer(default, min, max))
    }
}

impl<'a, S: RegionStorage> TypedParameter<'a, S, bool> {
    pub fn new(
        set: &'a ParameterSet<S>,
        name: &'static str,
        default: bool,
    ) -> Result<Self, ParameterError> {
        Self::register(set, name, ParamSpec::boolean(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_REGION_SIZE, MAX_STRING_LEN};
    use crate::parameters::ParamType;
    use crate::platform::mock::MockEeprom;
    use crate::storage::EepromRegion;

    type TestSet = ParameterSet<EepromRegion<MockEeprom>>;

    fn param_set() -> TestSet {
        ParameterSet::with_storage(EepromRegion::new(MockEeprom::new(512)), 512)
    }

    #[test]
    fn test_float_clamps_to_unit_range() {
        let set = param_set();
        let p = FloatParameter::with_bounds(&set, "p", 0.5, 0.0, 1.0).unwrap();
        p.set_value(5.0).unwrap();
        assert_eq!(p.value(), 1.0);
        p.set_value(-5.0).unwrap();
        assert_eq!(p.value(), 0.0);
    }

    #[test]
    fn test_integer_defaults_and_bounds() {
        let set = param_set();
        let p = IntegerParameter::new(&set, "count", 7).unwrap();
        assert_eq!(p.value(), 7);
        p.set_value(i32::MIN).unwrap();
        assert_eq!(p.value(), -i32::MAX);
    }

    #[test]
    fn test_string_parameter() {
        let set = param_set();
        let p = StringParameter::new(&set, "ssid", "default").unwrap();
        assert_eq!(p.value().as_str(), "default");
        p.set_str("").unwrap();
        assert_eq!(p.value().as_str(), "");
        assert!(set.store().is_set("ssid"));

        let long = "x".repeat(MAX_STRING_LEN + 1);
        assert_eq!(p.set_str(&long), Err(ParameterError::ValueTooLong));
    }

    #[test]
    fn test_boolean_from_text() {
        let set = param_set();
        let p = BooleanParameter::new(&set, "enabled", true).unwrap();
        p.set_from_str("0").unwrap();
        assert!(!p.value());
        p.set_from_str("yes").unwrap();
        assert!(p.value());
    }

    #[test]
    fn test_float_text_uses_precision() {
        let set = param_set();
        let p = FloatParameter::with_precision(&set, "ratio", 0.0, 1, -10.0, 10.0).unwrap();
        p.set_from_str("3.14159").unwrap();
        assert_eq!(p.to_text().as_str(), "3.1");
        p.set_from_str("banana").unwrap();
        assert_eq!(p.value(), 0.0);
    }

    #[test]
    fn test_drop_unregisters() {
        let set = param_set();
        {
            let _p = BooleanParameter::new(&set, "temp", false).unwrap();
            assert!(set.is_registered("temp"));
        }
        assert!(!set.is_registered("temp"));
    }

    #[test]
    fn test_drop_of_replaced_parameter_keeps_newer() {
        let set = param_set();
        let first = IntegerParameter::new(&set, "mode", 1).unwrap();
        let second = IntegerParameter::new(&set, "mode", 2).unwrap();
        drop(first);
        assert!(set.is_registered("mode"));
        assert_eq!(second.default_value(), 2);
    }

    #[test]
    fn test_values_survive_reopen() {
        let set = param_set();
        {
            let speed = IntegerParameter::with_bounds(&set, "speed", 0, 0, 100).unwrap();
            let name = StringParameter::new(&set, "name", "").unwrap();
            speed.set_value(42).unwrap();
            name.set_str("rover").unwrap();
            set.save().unwrap();
        }
        let store = set.into_store();
        let capacity = store.capacity();
        let set = ParameterSet::with_storage(store.into_storage(), capacity);
        let speed = IntegerParameter::with_bounds(&set, "speed", 0, 0, 100).unwrap();
        let name = StringParameter::new(&set, "name", "").unwrap();
        assert_eq!(speed.value(), 42);
        assert_eq!(name.value().as_str(), "rover");
    }

    #[test]
    fn test_default_capacity_and_untyped_handle() {
        let eeprom = MockEeprom::new(DEFAULT_REGION_SIZE);
        let set = ParameterSet::with_default_capacity(EepromRegion::new(eeprom));
        assert_eq!(set.store().capacity(), DEFAULT_REGION_SIZE);

        let speed = IntegerParameter::with_bounds(&set, "speed", 5, 0, 10).unwrap();
        let handle = speed.handle();
        assert_eq!(handle.name(), "speed");
        assert_eq!(handle.param_type(), ParamType::Integer);
        handle.set_from_str("8").unwrap();
        assert_eq!(speed.value(), 8);
        assert!(matches!(set.save(), Ok(crate::SaveOutcome::Written(_))));
    }

    #[test]
    #[should_panic]
    fn test_read_while_store_guard_alive_panics() {
        let set = param_set();
        let count = IntegerParameter::new(&set, "count", 1).unwrap();
        let _store = set.store();
        count.value();
    }
}

//! Untyped parameter view

use super::error::ParameterError;
use super::set::ParameterSet;
use super::value::{ParamSpec, ParamText, ParamType, ParamValue};
use crate::config::HIDDEN_PREFIX;
use crate::storage::{KeyId, RegionStorage};
use core::cell::Cell;

/// Named, typed view onto one key of a [`ParameterSet`]
///
/// Reads load the store on first use and fall back to the default while the
/// key is unset. Writes clamp numbers into bounds and create the key on
/// first use. The slot id is cached after the first lookup; a cached id that
/// went stale (key unset, store reloaded) is resolved again by name.
pub struct ParamHandle<'a, S: RegionStorage> {
    set: &'a ParameterSet<S>,
    name: &'static str,
    spec: ParamSpec,
    key_id: Cell<Option<KeyId>>,
}

impl<'a, S: RegionStorage> ParamHandle<'a, S> {
    pub(crate) fn new(set: &'a ParameterSet<S>, name: &'static str, spec: ParamSpec) -> Self {
        Self {
            set,
            name,
            spec,
            key_id: Cell::new(None),
        }
    }

    pub(crate) fn parameter_set(&self) -> &'a ParameterSet<S> {
        self.set
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn spec(&self) -> ParamSpec {
        self.spec
    }

    pub fn param_type(&self) -> ParamType {
        self.spec.param_type()
    }

    /// Whether the name marks an internal parameter
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with(HIDDEN_PREFIX)
    }

    /// Human-readable label
    ///
    /// `_wifi_ssid` becomes `Wifi ssid`: the hidden prefix is stripped,
    /// underscores become spaces and the first letter is upper-cased.
    pub fn display_name(&self) -> ParamText {
        let base = self.name.strip_prefix(HIDDEN_PREFIX).unwrap_or(self.name);
        let mut text = ParamText::new();
        for (i, c) in base.chars().enumerate() {
            let c = match c {
                '_' => ' ',
                c if i == 0 => c.to_ascii_uppercase(),
                c => c,
            };
            if text.push(c).is_err() {
                break;
            }
        }
        text
    }

    /// Current value, or the default if the key is unset
    ///
    /// # Panics
    ///
    /// Loading may touch the store, so this borrows it mutably. Panics if a
    /// [`ParameterSet::store`] or [`ParameterSet::store_mut`] guard is alive.
    pub fn get(&self) -> ParamValue {
        let mut store = self.set.store.borrow_mut();
        store.load();

        let id = match self.key_id.get().filter(|id| store.is_set_id(*id)) {
            Some(id) => Some(id),
            None => {
                let id = store.key_id(self.name);
                self.key_id.set(id);
                id
            }
        };
        let Some(bytes) = id.and_then(|id| store.get_by_id(id)) else {
            return self.spec.default_value();
        };

        match ParamValue::decode(self.spec.param_type(), bytes) {
            Some(value) => self.spec.constrain(value),
            None => {
                log_warn!("Stored value of {} is malformed, using default", self.name);
                self.spec.default_value()
            }
        }
    }

    /// Store `value`, clamped into bounds
    ///
    /// # Panics
    ///
    /// Panics if a [`ParameterSet::store`] or [`ParameterSet::store_mut`]
    /// guard is alive.
    pub fn set(&self, value: ParamValue) -> Result<(), ParameterError> {
        if value.param_type() != self.spec.param_type() {
            return Err(ParameterError::TypeMismatch);
        }
        let bytes = self.spec.constrain(value).encode();

        let mut store = self.set.store.borrow_mut();
        store.load();
        if let Some(id) = self.key_id.get() {
            if store.set_by_id(id, &bytes)? {
                return Ok(());
            }
        }
        let id = store.set(self.name, &bytes)?;
        self.key_id.set(Some(id));
        Ok(())
    }

    /// Parse `text` and store the result
    pub fn set_from_str(&self, text: &str) -> Result<(), ParameterError> {
        let value = self.spec.parse(text)?;
        self.set(value)
    }

    /// Render the current value
    pub fn to_text(&self) -> ParamText {
        self.spec.render(&self.get())
    }
}

impl<S: RegionStorage> core::fmt::Debug for ParamHandle<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParamHandle")
            .field("name", &self.name)
            .field("spec", &self.spec)
            .field("key_id", &self.key_id.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockEeprom;
    use crate::storage::EepromRegion;

    fn param_set() -> ParameterSet<EepromRegion<MockEeprom>> {
        ParameterSet::with_storage(EepromRegion::new(MockEeprom::new(256)), 256)
    }

    #[test]
    fn test_unset_reads_default() {
        let set = param_set();
        let handle = ParamHandle::new(&set, "gain", ParamSpec::float(0.5, 0.0, 1.0, 2));
        assert_eq!(handle.get(), ParamValue::Float(0.5));
        assert!(set.store().is_loaded());
        assert!(!set.store().is_set("gain"));
    }

    #[test]
    fn test_write_clamps() {
        let set = param_set();
        let handle = ParamHandle::new(&set, "gain", ParamSpec::float(0.5, 0.0, 1.0, 2));
        handle.set(ParamValue::Float(5.0)).unwrap();
        assert_eq!(handle.get(), ParamValue::Float(1.0));
        handle.set(ParamValue::Float(-5.0)).unwrap();
        assert_eq!(handle.get(), ParamValue::Float(0.0));
    }

    #[test]
    fn test_type_mismatch() {
        let set = param_set();
        let handle = ParamHandle::new(&set, "count", ParamSpec::integer(0, 0, 10));
        assert_eq!(
            handle.set(ParamValue::Boolean(true)),
            Err(ParameterError::TypeMismatch)
        );
        assert!(set.store().is_empty());
    }

    #[test]
    fn test_stale_id_is_resolved_again() {
        let set = param_set();
        let handle = ParamHandle::new(&set, "count", ParamSpec::integer(0, 0, 10));
        handle.set(ParamValue::Integer(3)).unwrap();

        assert!(set.store_mut().unset("count"));
        assert_eq!(handle.get(), ParamValue::Integer(0));

        handle.set(ParamValue::Integer(4)).unwrap();
        assert_eq!(set.store().get("count"), Some(&4i32.to_le_bytes()[..]));
        assert_eq!(handle.get(), ParamValue::Integer(4));
    }

    #[test]
    fn test_stored_value_outside_bounds_is_clamped() {
        let set = param_set();
        set.init();
        set.store_mut().set("count", &42i32.to_le_bytes()).unwrap();
        assert!(set.store().is_set("count"));

        let handle = ParamHandle::new(&set, "count", ParamSpec::integer(0, 0, 10));
        assert_eq!(handle.get(), ParamValue::Integer(10));
        // Clamping happens on read only
        assert_eq!(set.store().get("count"), Some(&42i32.to_le_bytes()[..]));
    }

    #[test]
    fn test_malformed_stored_value_reads_default() {
        let set = param_set();
        set.init();
        set.store_mut().set("count", &[1, 2]).unwrap();
        assert!(set.store().is_set("count"));

        let handle = ParamHandle::new(&set, "count", ParamSpec::integer(7, 0, 10));
        assert_eq!(handle.get(), ParamValue::Integer(7));
        assert_eq!(set.store().get("count"), Some(&[1u8, 2][..]));

        // A write replaces the malformed bytes
        handle.set(ParamValue::Integer(3)).unwrap();
        assert_eq!(handle.get(), ParamValue::Integer(3));
    }

    #[test]
    fn test_text_round_trip() {
        let set = param_set();
        let handle = ParamHandle::new(&set, "enabled", ParamSpec::boolean(true));
        assert_eq!(handle.to_text().as_str(), "true");
        handle.set_from_str("F").unwrap();
        assert_eq!(handle.to_text().as_str(), "false");

        let handle = ParamHandle::new(&set, "ratio", ParamSpec::float(0.0, -1.0, 1.0, 3));
        handle.set_from_str("0.12345").unwrap();
        assert_eq!(handle.to_text().as_str(), "0.123");
    }

    #[test]
    fn test_hidden_and_display_name() {
        let set = param_set();
        let hidden = ParamHandle::new(&set, "_wifi_ssid", ParamSpec::string(""));
        assert!(hidden.is_hidden());
        assert_eq!(hidden.display_name().as_str(), "Wifi ssid");

        let visible = ParamHandle::new(&set, "max_speed", ParamSpec::integer(0, 0, 10));
        assert!(!visible.is_hidden());
        assert_eq!(visible.display_name().as_str(), "Max speed");
    }
}

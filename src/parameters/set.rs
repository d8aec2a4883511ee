//! Parameter registry over an owned key-value store

use super::error::ParameterError;
use super::handle::ParamHandle;
use super::value::ParamSpec;
use crate::config::{MAX_KEYS, MAX_KEY_LEN, MAX_PARAMS};
use crate::storage::{KeyName, KeyValueStore, RegionStorage, SaveOutcome};
use core::cell::{Cell, Ref, RefCell, RefMut};
use core::fmt;
use heapless::index_map::FnvIndexMap;

#[derive(Debug, Clone, Copy)]
struct Registration {
    spec: ParamSpec,
    token: u32,
}

/// Registry of live parameters and the store they persist to
///
/// Parameters borrow the set and register themselves on construction. On
/// [`save`](Self::save) every stored key without a registered parameter is
/// removed first, so renamed or retired parameters do not linger in the
/// region.
///
/// All access goes through shared references; the store sits in a
/// `RefCell`. A `Ref`/`RefMut` obtained from [`store`](Self::store) or
/// [`store_mut`](Self::store_mut) must be dropped before parameters are read
/// or written again.
///
/// A device normally builds one set at startup and hands it to everything
/// that declares parameters:
///
/// ```
/// use nvparams::config::DEFAULT_REGION_SIZE;
/// use nvparams::platform::mock::MockEeprom;
/// use nvparams::storage::EepromRegion;
/// use nvparams::{BooleanParameter, ParameterSet, RegionStorage};
///
/// fn declare_logging<S: RegionStorage>(set: &ParameterSet<S>) -> BooleanParameter<'_, S> {
///     BooleanParameter::new(set, "log_enabled", true).unwrap()
/// }
///
/// let eeprom = MockEeprom::new(DEFAULT_REGION_SIZE);
/// let set = ParameterSet::with_default_capacity(EepromRegion::new(eeprom));
/// let logging = declare_logging(&set);
/// logging.set_value(false).unwrap();
/// set.save().unwrap();
/// ```
pub struct ParameterSet<S: RegionStorage> {
    pub(super) store: RefCell<KeyValueStore<S>>,
    registry: RefCell<FnvIndexMap<&'static str, Registration, MAX_PARAMS>>,
    next_token: Cell<u32>,
}

impl<S: RegionStorage> ParameterSet<S> {
    pub fn new(store: KeyValueStore<S>) -> Self {
        Self {
            store: RefCell::new(store),
            registry: RefCell::new(FnvIndexMap::new()),
            next_token: Cell::new(0),
        }
    }

    /// Create a set over `capacity` bytes of `storage`
    pub fn with_storage(storage: S, capacity: usize) -> Self {
        Self::new(KeyValueStore::new(storage, capacity))
    }

    /// Create a set with the configured default region size
    pub fn with_default_capacity(storage: S) -> Self {
        Self::new(KeyValueStore::with_default_capacity(storage))
    }

    /// Load the store unless already loaded; returns the entry count
    pub fn init(&self) -> usize {
        self.store.borrow_mut().load()
    }

    /// Re-read the region, discarding unsaved changes
    pub fn reload(&self) -> usize {
        self.store.borrow_mut().reload()
    }

    /// Register `name`, replacing any earlier registration of that name
    ///
    /// Returns the token that [`unregister`](Self::unregister) expects.
    pub fn register(&self, name: &'static str, spec: ParamSpec) -> Result<u32, ParameterError> {
        validate_name(name)?;
        let token = self.next_token.get();
        self.next_token.set(token.wrapping_add(1));
        let registration = Registration { spec, token };

        let mut registry = self.registry.borrow_mut();
        if let Some(existing) = registry.get_mut(name) {
            log_debug!("Parameter {} registered again, replacing", name);
            *existing = registration;
            return Ok(token);
        }
        registry.insert(name, registration).map_err(|_| {
            log_error!("Parameter registry full, cannot register {}", name);
            ParameterError::RegistryFull
        })?;
        Ok(token)
    }

    /// Remove `name` if it is still held by the registration `token`
    pub fn unregister(&self, name: &str, token: u32) -> bool {
        let mut registry = self.registry.borrow_mut();
        match registry.get(name) {
            Some(registration) if registration.token == token => {
                registry.remove(name);
                true
            }
            _ => false,
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.borrow().contains_key(name)
    }

    /// Number of registered parameters
    pub fn len(&self) -> usize {
        self.registry.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.borrow().is_empty()
    }

    /// Look up a registered parameter by name
    pub fn get_parameter(&self, name: &str) -> Option<ParamHandle<'_, S>> {
        let registry = self.registry.borrow();
        let handle = registry
            .iter()
            .find(|(registered, _)| **registered == name)
            .map(|(&name, registration)| ParamHandle::new(self, name, registration.spec));
        handle
    }

    /// All registered parameters, sorted by name
    pub fn parameters(&self) -> heapless::Vec<ParamHandle<'_, S>, MAX_PARAMS> {
        let registry = self.registry.borrow();
        let mut handles: heapless::Vec<ParamHandle<'_, S>, MAX_PARAMS> = heapless::Vec::new();
        for (&name, registration) in registry.iter() {
            // The registry holds at most MAX_PARAMS entries
            let _ = handles.push(ParamHandle::new(self, name, registration.spec));
        }
        handles.sort_unstable_by(|a, b| a.name().cmp(b.name()));
        handles
    }

    /// Remove stored keys that no registered parameter owns
    ///
    /// Returns the number of keys removed.
    pub fn prune(&self) -> usize {
        let registry = self.registry.borrow();
        let mut store = self.store.borrow_mut();
        store.load();

        let mut orphans: heapless::Vec<KeyName, MAX_KEYS> = heapless::Vec::new();
        for key in store.keys().filter(|key| !registry.contains_key(*key)) {
            if let Ok(name) = KeyName::try_from(key) {
                let _ = orphans.push(name);
            }
        }
        for name in &orphans {
            log_info!("Removing orphaned key {}", name.as_str());
            store.unset(name);
        }
        orphans.len()
    }

    /// Prune orphaned keys and write the store if anything changed
    pub fn save(&self) -> Result<SaveOutcome, ParameterError> {
        self.init();
        self.prune();
        Ok(self.store.borrow_mut().save()?)
    }

    /// Write one `name = value` line per parameter, sorted by name
    pub fn write_listing<W: fmt::Write>(&self, out: &mut W, include_hidden: bool) -> fmt::Result {
        for handle in self.parameters() {
            if handle.is_hidden() && !include_hidden {
                continue;
            }
            writeln!(out, "{} = {}", handle.name(), handle.to_text())?;
        }
        Ok(())
    }

    pub fn store(&self) -> Ref<'_, KeyValueStore<S>> {
        self.store.borrow()
    }

    pub fn store_mut(&self) -> RefMut<'_, KeyValueStore<S>> {
        self.store.borrow_mut()
    }

    pub fn into_store(self) -> KeyValueStore<S> {
        self.store.into_inner()
    }
}

fn validate_name(name: &str) -> Result<(), ParameterError> {
    if name.is_empty() || name.len() > MAX_KEY_LEN || name.contains('\0') {
        return Err(ParameterError::InvalidName);
    }
    Ok(())
}

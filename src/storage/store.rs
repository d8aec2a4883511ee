//! In-memory key-value store backed by one persistent region

use super::codec::{self, EncodeSummary};
use super::error::{DecodeError, StoreError};
use super::region::RegionStorage;
use crate::config::{DEFAULT_REGION_SIZE, MAX_KEYS, MAX_KEY_LEN, MAX_REGION_SIZE, MAX_VALUE_LEN};
use crate::platform::PlatformError;
use core::fmt;
use heapless::index_map::FnvIndexMap;

/// Stored key
pub type KeyName = heapless::String<MAX_KEY_LEN>;

/// Stored value bytes
pub type Value = heapless::Vec<u8, MAX_VALUE_LEN>;

/// Slot identifier
///
/// Ids are handed out in increasing order and never reused by a store
/// instance, so a cached id either still names the same key or names
/// nothing. A region loaded into a fresh store gets ids `0..N` in stored
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyId(u32);

impl KeyId {
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the last load found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadStatus {
    /// No load attempted yet
    NotLoaded,
    /// Region decoded; `truncated` is set when decoding stopped early or
    /// entries had to be skipped
    Valid { entries: usize, truncated: bool },
    /// Region rejected; the store started empty
    Invalid(DecodeError),
    /// Backend failed; the store started empty
    Unavailable(PlatformError),
}

/// Result of a successful [`KeyValueStore::save`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SaveOutcome {
    /// Nothing changed since the last load or save
    Unchanged,
    /// Region written
    Written(EncodeSummary),
}

impl SaveOutcome {
    /// Entries that did not fit the region
    pub fn dropped(&self) -> usize {
        match self {
            SaveOutcome::Unchanged => 0,
            SaveOutcome::Written(summary) => summary.dropped,
        }
    }
}

/// Key-value store over a fixed-size region
///
/// Keys map to slot ids and slot ids to values; callers that resolve an id
/// once can skip the key lookup afterwards. All changes stay in memory until
/// [`save`](Self::save) writes the whole region.
///
/// # Example
///
/// ```
/// use nvparams::platform::mock::MockEeprom;
/// use nvparams::storage::{EepromRegion, KeyValueStore};
///
/// let mut store = KeyValueStore::new(EepromRegion::new(MockEeprom::new(256)), 256);
/// store.load();
/// store.set("mode", b"auto").unwrap();
/// store.save().unwrap();
///
/// store.reload();
/// assert_eq!(store.get("mode"), Some(&b"auto"[..]));
/// ```
pub struct KeyValueStore<S: RegionStorage> {
    storage: S,
    capacity: usize,
    keys: FnvIndexMap<KeyName, KeyId, MAX_KEYS>,
    values: FnvIndexMap<KeyId, Value, MAX_KEYS>,
    next_id: u32,
    loaded: bool,
    modified: bool,
    status: LoadStatus,
}

impl<S: RegionStorage> KeyValueStore<S> {
    /// Create an unloaded store over `capacity` bytes of `storage`
    ///
    /// `capacity` is clamped to `[HEADER_SIZE, MAX_REGION_SIZE]`.
    pub fn new(storage: S, capacity: usize) -> Self {
        Self {
            storage,
            capacity: capacity.clamp(codec::HEADER_SIZE, MAX_REGION_SIZE),
            keys: FnvIndexMap::new(),
            values: FnvIndexMap::new(),
            next_id: 0,
            loaded: false,
            modified: false,
            status: LoadStatus::NotLoaded,
        }
    }

    /// Create an unloaded store with the configured default capacity
    pub fn with_default_capacity(storage: S) -> Self {
        Self::new(storage, DEFAULT_REGION_SIZE)
    }

    /// Load the region once
    ///
    /// Later calls return the current entry count without touching storage.
    /// Never fails: an unreadable or invalid region yields an empty store,
    /// see [`load_status`](Self::load_status).
    pub fn load(&mut self) -> usize {
        if self.loaded {
            return self.len();
        }
        self.reload()
    }

    /// Discard in-memory contents and read the region again
    ///
    /// Unsaved changes are lost. Ids cached before the reload no longer
    /// resolve.
    pub fn reload(&mut self) -> usize {
        self.keys.clear();
        self.values.clear();
        self.loaded = true;

        let mut buffer = [0u8; MAX_REGION_SIZE];
        let image = &mut buffer[..self.capacity];
        self.status = match self.storage.read_region(image) {
            Ok(()) => self.decode_image(image),
            Err(err) => {
                log_warn!("Parameter region unavailable, starting empty");
                LoadStatus::Unavailable(err)
            }
        };
        self.modified = false;
        self.len()
    }

    fn decode_image(&mut self, image: &[u8]) -> LoadStatus {
        let mut entries = match codec::decode(image) {
            Ok(entries) => entries,
            Err(err) => {
                log_info!("No valid parameter region found, using defaults");
                return LoadStatus::Invalid(err);
            }
        };

        let mut skipped = false;
        for entry in entries.by_ref() {
            match self.set(entry.key, entry.value) {
                Ok(_) => {}
                Err(StoreError::Full) => {
                    log_warn!("Key-value store full, ignoring remaining entries");
                    skipped = true;
                    break;
                }
                Err(_) => {
                    log_warn!("Skipping stored entry that exceeds limits");
                    skipped = true;
                }
            }
        }

        let truncated = skipped || entries.is_truncated();
        if entries.is_truncated() {
            log_warn!("Parameter region truncated after {} entries", self.len());
        }
        log_info!("Loaded {} stored entries", self.len());
        LoadStatus::Valid {
            entries: self.len(),
            truncated,
        }
    }

    /// Slot id of `key`, if set
    pub fn key_id(&self, key: &str) -> Option<KeyId> {
        let name = KeyName::try_from(key).ok()?;
        self.keys.get(&name).copied()
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.key_id(key).is_some()
    }

    pub fn is_set_id(&self, id: KeyId) -> bool {
        self.values.contains_key(&id)
    }

    /// Value bytes of `key`, if set
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.get_by_id(self.key_id(key)?)
    }

    /// Value bytes of slot `id`, if it is still set
    pub fn get_by_id(&self, id: KeyId) -> Option<&[u8]> {
        self.values.get(&id).map(|value| &value[..])
    }

    /// Set `key` to `value`, returning its slot id
    ///
    /// An existing key keeps its id. The store only becomes dirty if the
    /// stored bytes actually change.
    pub fn set(&mut self, key: &str, value: &[u8]) -> Result<KeyId, StoreError> {
        let name = key_name(key)?;
        if let Some(&id) = self.keys.get(&name) {
            self.set_by_id(id, value)?;
            return Ok(id);
        }

        let stored = Value::from_slice(value).map_err(|_| StoreError::ValueTooLong)?;
        if self.keys.len() >= MAX_KEYS {
            return Err(StoreError::Full);
        }
        let next_id = self.next_id.checked_add(1).ok_or(StoreError::Full)?;
        let id = KeyId(self.next_id);
        self.keys.insert(name, id).map_err(|_| StoreError::Full)?;
        self.values.insert(id, stored).map_err(|_| StoreError::Full)?;
        self.next_id = next_id;
        self.modified = true;
        Ok(id)
    }

    /// Overwrite the value in slot `id`
    ///
    /// Returns `Ok(false)` when the slot is no longer set; nothing is stored
    /// in that case.
    pub fn set_by_id(&mut self, id: KeyId, value: &[u8]) -> Result<bool, StoreError> {
        let Some(slot) = self.values.get_mut(&id) else {
            return Ok(false);
        };
        if &slot[..] != value {
            *slot = Value::from_slice(value).map_err(|_| StoreError::ValueTooLong)?;
            self.modified = true;
        }
        Ok(true)
    }

    /// Remove `key`; returns whether it was set
    pub fn unset(&mut self, key: &str) -> bool {
        let Ok(name) = KeyName::try_from(key) else {
            return false;
        };
        match self.keys.remove(&name) {
            Some(id) => {
                self.values.remove(&id);
                self.modified = true;
                true
            }
            None => false,
        }
    }

    /// Remove slot `id`; returns whether it was set
    pub fn unset_by_id(&mut self, id: KeyId) -> bool {
        if self.values.remove(&id).is_none() {
            return false;
        }
        let name = self
            .keys
            .iter()
            .find(|(_, slot)| **slot == id)
            .map(|(name, _)| name.clone());
        if let Some(name) = name {
            self.keys.remove(&name);
        }
        self.modified = true;
        true
    }

    /// Remove every key
    pub fn clear(&mut self) {
        if !self.keys.is_empty() {
            self.keys.clear();
            self.values.clear();
            self.modified = true;
        }
    }

    /// Write the region if anything changed
    ///
    /// Entries are encoded in key-map order; those that do not fit are dropped
    /// from the image (and reported) but stay in memory. The dirty flag is
    /// only cleared once the backend accepted the write.
    pub fn save(&mut self) -> Result<SaveOutcome, StoreError> {
        if !self.modified {
            return Ok(SaveOutcome::Unchanged);
        }

        let mut buffer = [0u8; MAX_REGION_SIZE];
        let image = &mut buffer[..self.capacity];
        let summary = codec::encode(self.entries(), image);
        if let Err(err) = self.storage.write_region(image, summary.total_size) {
            log_error!("Failed to write parameter region");
            return Err(err.into());
        }

        self.modified = false;
        if summary.dropped > 0 {
            log_warn!(
                "Parameter region full, {} entries not saved",
                summary.dropped
            );
        }
        log_debug!(
            "Saved {} entries ({} bytes)",
            summary.written,
            summary.total_size
        );
        Ok(SaveOutcome::Written(summary))
    }

    /// Set keys and their values, in key-map order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[u8])> + '_ {
        self.keys.iter().filter_map(move |(name, id)| {
            self.values
                .get(id)
                .map(|value| (name.as_str(), &value[..]))
        })
    }

    /// Set keys, in key-map order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.keys().map(|name| name.as_str())
    }

    /// Write one `key = value` line per entry
    ///
    /// Printable UTF-8 values are quoted; anything else is shown as hex.
    pub fn write_entries<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        for (key, value) in self.entries() {
            write!(out, "{} = ", key)?;
            match core::str::from_utf8(value) {
                Ok(text) if is_printable(text) => {
                    writeln!(out, "\"{}\"", text.trim_end_matches('\0'))?
                }
                _ => {
                    for byte in value {
                        write!(out, "{:02x}", byte)?;
                    }
                    writeln!(out)?;
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Region capacity in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether there are unsaved changes
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn load_status(&self) -> LoadStatus {
        self.status
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

fn key_name(key: &str) -> Result<KeyName, StoreError> {
    if key.is_empty() || key.contains('\0') {
        return Err(StoreError::InvalidKey);
    }
    KeyName::try_from(key).map_err(|_| StoreError::KeyTooLong)
}

fn is_printable(text: &str) -> bool {
    let text = text.strip_suffix('\0').unwrap_or(text);
    text.chars().all(|c| !c.is_control())
}

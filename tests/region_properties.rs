//! Property-based tests for the region format and the store on top of it.
//!
//! - Whatever fits the region is read back exactly after a reload
//! - Encoding never writes past the region and accounts for every entry
//! - Any single-byte change inside the hashed area is rejected on load

use nvparams::config::{MAX_KEY_LEN, MAX_VALUE_LEN};
use nvparams::platform::mock::MockEeprom;
use nvparams::storage::{codec, EepromRegion, KeyValueStore, LoadStatus, SaveOutcome};
use nvparams::{ParamSpec, ParamValue};
use proptest::prelude::*;
use std::collections::BTreeMap;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex(&format!("[a-z][a-z0-9_]{{0,{}}}", MAX_KEY_LEN - 1)).unwrap()
}

fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=MAX_VALUE_LEN)
}

fn entries_strategy(
    min: usize,
    max: usize,
) -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map(key_strategy(), value_strategy(), min..=max)
}

fn saved_store(
    entries: &BTreeMap<String, Vec<u8>>,
    capacity: usize,
) -> KeyValueStore<EepromRegion<MockEeprom>> {
    let mut store = KeyValueStore::new(EepromRegion::new(MockEeprom::new(capacity)), capacity);
    store.load();
    for (key, value) in entries {
        store.set(key, value).unwrap();
    }
    store.save().unwrap();
    store
}

fn reopened(
    store: KeyValueStore<EepromRegion<MockEeprom>>,
) -> KeyValueStore<EepromRegion<MockEeprom>> {
    let capacity = store.capacity();
    let mut store = KeyValueStore::new(store.into_storage(), capacity);
    store.load();
    store
}

// =============================================================================
// STORE PROPERTIES
// =============================================================================

proptest! {
    /// Everything that fits survives a reload unchanged
    #[test]
    fn reload_restores_all_entries(entries in entries_strategy(1, 12)) {
        // 12 entries of at most 8 + 33 + 64 bytes always fit
        let store = reopened(saved_store(&entries, 4096));

        prop_assert_eq!(store.len(), entries.len());
        for (key, value) in &entries {
            prop_assert_eq!(store.get(key), Some(value.as_slice()));
        }
        let is_valid = matches!(store.load_status(), LoadStatus::Valid { truncated: false, .. });
        prop_assert!(is_valid);
    }

    /// A small region keeps a prefix of the entries and reports the rest
    #[test]
    fn overflow_is_accounted_for(entries in entries_strategy(0, 16), capacity in 8usize..512) {
        let mut store = saved_store(&BTreeMap::new(), capacity);
        for (key, value) in &entries {
            store.set(key, value).unwrap();
        }
        let outcome = store.save().unwrap();
        let (written, dropped, total_size) = match outcome {
            SaveOutcome::Written(summary) => (summary.written, summary.dropped, summary.total_size),
            SaveOutcome::Unchanged => (0, 0, codec::HEADER_SIZE),
        };
        prop_assert!(total_size <= capacity);
        prop_assert_eq!(written + dropped, entries.len());

        let store = reopened(store);
        prop_assert_eq!(store.len(), written);
    }

    /// Flipping any bit between the hash field and totalSize invalidates the region
    ///
    /// The size field itself is covered by `size_growth_is_detected`; a
    /// shrinking size can cancel out against the words it cuts off.
    #[test]
    fn corruption_is_detected(
        entries in entries_strategy(1, 6),
        pick in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let store = saved_store(&entries, 512);
        let mut eeprom = store.into_storage().into_inner();
        let total_size = u32::from_le_bytes(eeprom.contents()[0..4].try_into().unwrap()) as usize;
        let offset = 4 + pick.index(total_size - 4);
        eeprom.corrupt(offset, 1 << bit);

        let mut store = KeyValueStore::new(EepromRegion::new(eeprom), 512);
        prop_assert_eq!(store.load(), 0);
        let is_invalid = matches!(store.load_status(), LoadStatus::Invalid(_));
        prop_assert!(is_invalid);
    }

    /// Setting any clear bit of totalSize is caught: the extra bytes are zero
    /// padding and add nothing to the sum
    #[test]
    fn size_growth_is_detected(entries in entries_strategy(1, 6)) {
        let store = saved_store(&entries, 512);
        let mut eeprom = store.into_storage().into_inner();
        let total_size = u32::from_le_bytes(eeprom.contents()[0..4].try_into().unwrap());

        for bit in (0usize..32).filter(|bit| total_size & (1u32 << bit) == 0) {
            let mask = 1u8 << (bit % 8);
            eeprom.corrupt(bit / 8, mask);
            let mut store = KeyValueStore::new(EepromRegion::new(eeprom), 512);
            prop_assert_eq!(store.load(), 0);
            let is_invalid = matches!(store.load_status(), LoadStatus::Invalid(_));
            prop_assert!(is_invalid);

            eeprom = store.into_storage().into_inner();
            eeprom.corrupt(bit / 8, mask);
        }
    }
}

// =============================================================================
// PARAMETER TEXT PROPERTIES
// =============================================================================

proptest! {
    /// Rendered integers parse back to the same value
    #[test]
    fn integer_text_round_trips(value in any::<i32>()) {
        let spec = ParamSpec::integer(0, i32::MIN, i32::MAX);
        let text = spec.render(&ParamValue::Integer(value));
        prop_assert_eq!(spec.parse(&text).unwrap(), ParamValue::Integer(value));
    }

    /// Parsed numbers always end up inside the bounds once written
    #[test]
    fn constrain_respects_bounds(text in "\\PC{0,12}", min in -1000i32..1000, span in 0i32..1000) {
        let spec = ParamSpec::integer(0, min, min + span);
        let value = spec.constrain(spec.parse(&text).unwrap());
        let ParamValue::Integer(v) = value else {
            return Err(TestCaseError::fail("integer spec produced another type"));
        };
        prop_assert!(v >= min && v <= min + span);
    }
}

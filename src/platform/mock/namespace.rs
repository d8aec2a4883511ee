//! Mock namespaced store for testing

use crate::platform::{error::NamespaceError, traits::NamespaceInterface, Result};
use bitflags::bitflags;
use std::collections::BTreeMap;
use std::string::{String, ToString};
use std::vec::Vec;

bitflags! {
    /// Operations that fail while the flag is set
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct NamespaceFaults: u8 {
        /// `get_*` fails
        const READ = 0b01;
        /// `put_*` fails
        const WRITE = 0b10;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    U32(u32),
    Bytes(Vec<u8>),
}

/// Mock namespaced store
#[derive(Debug, Default)]
pub struct MockNamespace {
    entries: BTreeMap<String, Entry>,
    faults: NamespaceFaults,
    /// Next `put_bytes` stores only half of its data
    power_loss: bool,
    /// Successful `put_*` calls
    put_count: u32,
}

impl MockNamespace {
    /// Create an empty namespace
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored byte entry, if any
    pub fn bytes(&self, name: &str) -> Option<&[u8]> {
        match self.entries.get(name) {
            Some(Entry::Bytes(data)) => Some(data),
            _ => None,
        }
    }

    /// Stored u32 entry, if any
    pub fn u32(&self, name: &str) -> Option<u32> {
        match self.entries.get(name) {
            Some(Entry::U32(value)) => Some(*value),
            _ => None,
        }
    }

    /// XOR `mask` into byte `offset` of a stored byte entry
    pub fn corrupt(&mut self, name: &str, offset: usize, mask: u8) {
        if let Some(Entry::Bytes(data)) = self.entries.get_mut(name) {
            data[offset] ^= mask;
        }
    }

    /// Replace the set of failing operations
    pub fn set_faults(&mut self, faults: NamespaceFaults) {
        self.faults = faults;
    }

    /// Cut the next byte write short after half of its data
    pub fn simulate_power_loss(&mut self) {
        self.power_loss = true;
    }

    /// Number of successful writes
    pub fn put_count(&self) -> u32 {
        self.put_count
    }
}

impl NamespaceInterface for MockNamespace {
    fn get_u32(&mut self, name: &str) -> Result<Option<u32>> {
        if self.faults.contains(NamespaceFaults::READ) {
            return Err(NamespaceError::ReadFailed.into());
        }
        Ok(self.u32(name))
    }

    fn put_u32(&mut self, name: &str, value: u32) -> Result<()> {
        if self.faults.contains(NamespaceFaults::WRITE) {
            return Err(NamespaceError::WriteFailed.into());
        }
        self.entries.insert(name.to_string(), Entry::U32(value));
        self.put_count += 1;
        Ok(())
    }

    fn get_bytes(&mut self, name: &str, buf: &mut [u8]) -> Result<usize> {
        if self.faults.contains(NamespaceFaults::READ) {
            return Err(NamespaceError::ReadFailed.into());
        }
        match self.bytes(name) {
            Some(data) if data.len() > buf.len() => Err(NamespaceError::BufferTooSmall.into()),
            Some(data) => {
                buf[..data.len()].copy_from_slice(data);
                Ok(data.len())
            }
            None => Ok(0),
        }
    }

    fn put_bytes(&mut self, name: &str, data: &[u8]) -> Result<()> {
        if self.faults.contains(NamespaceFaults::WRITE) {
            return Err(NamespaceError::WriteFailed.into());
        }
        let len = if self.power_loss {
            self.power_loss = false;
            data.len() / 2
        } else {
            data.len()
        };
        self.entries
            .insert(name.to_string(), Entry::Bytes(data[..len].to_vec()));
        self.put_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_entries() {
        let mut ns = MockNamespace::new();
        let mut buf = [0u8; 8];
        assert_eq!(ns.get_u32("size").unwrap(), None);
        assert_eq!(ns.get_bytes("data", &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_put_and_get() {
        let mut ns = MockNamespace::new();
        ns.put_u32("size", 3).unwrap();
        ns.put_bytes("data", &[1, 2, 3]).unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(ns.get_u32("size").unwrap(), Some(3));
        assert_eq!(ns.get_bytes("data", &mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(ns.put_count(), 2);
    }

    #[test]
    fn test_buffer_too_small() {
        let mut ns = MockNamespace::new();
        ns.put_bytes("data", &[0; 16]).unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(
            ns.get_bytes("data", &mut buf),
            Err(NamespaceError::BufferTooSmall.into())
        );
    }
}

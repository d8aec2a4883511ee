//! Mock EEPROM region for testing

use crate::platform::{error::EepromError, traits::EepromInterface, Result};
use bitflags::bitflags;
use std::vec;
use std::vec::Vec;

bitflags! {
    /// Operations that fail while the flag is set
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EepromFaults: u8 {
        /// `begin` fails
        const BEGIN = 0b0001;
        /// `read` fails
        const READ = 0b0010;
        /// `write` fails
        const WRITE = 0b0100;
        /// `commit` fails
        const COMMIT = 0b1000;
    }
}

/// Mock EEPROM region
///
/// Keeps the persisted medium and the RAM mirror separately, so tests can
/// observe that nothing reaches the medium before `commit`.
#[derive(Debug)]
pub struct MockEeprom {
    /// Persisted bytes
    medium: Vec<u8>,
    /// RAM mirror while the region is open
    mirror: Option<Vec<u8>>,
    /// Injected failures
    faults: EepromFaults,
    /// Next commit persists only half of the mirror
    power_loss: bool,
    /// Successful commits so far
    commit_count: u32,
}

impl MockEeprom {
    /// Create a zero-filled region of `size` bytes
    pub fn new(size: usize) -> Self {
        Self::filled(size, 0x00)
    }

    /// Create a region of `size` bytes filled with `byte`
    pub fn filled(size: usize, byte: u8) -> Self {
        Self {
            medium: vec![byte; size],
            mirror: None,
            faults: EepromFaults::empty(),
            power_loss: false,
            commit_count: 0,
        }
    }

    /// Create a region whose medium starts with `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut eeprom = Self::new(bytes.len());
        eeprom.medium.copy_from_slice(bytes);
        eeprom
    }

    /// Persisted bytes
    pub fn contents(&self) -> &[u8] {
        &self.medium
    }

    /// XOR `mask` into the persisted byte at `offset`
    pub fn corrupt(&mut self, offset: usize, mask: u8) {
        self.medium[offset] ^= mask;
    }

    /// Replace the set of failing operations
    pub fn set_faults(&mut self, faults: EepromFaults) {
        self.faults = faults;
    }

    /// Cut the next commit short after half of the region
    pub fn simulate_power_loss(&mut self) {
        self.power_loss = true;
    }

    /// Number of successful commits
    pub fn commit_count(&self) -> u32 {
        self.commit_count
    }

    /// True while the region is open
    pub fn is_open(&self) -> bool {
        self.mirror.is_some()
    }

    fn window(&mut self, offset: usize, len: usize) -> Result<&mut [u8]> {
        let mirror = self.mirror.as_mut().ok_or(EepromError::OutOfRange)?;
        mirror
            .get_mut(offset..offset + len)
            .ok_or_else(|| EepromError::OutOfRange.into())
    }
}

impl EepromInterface for MockEeprom {
    fn begin(&mut self, size: usize) -> Result<()> {
        if self.faults.contains(EepromFaults::BEGIN) || size > self.medium.len() {
            return Err(EepromError::BeginFailed.into());
        }
        self.mirror = Some(self.medium[..size].to_vec());
        Ok(())
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<()> {
        if self.faults.contains(EepromFaults::READ) {
            return Err(EepromError::ReadFailed.into());
        }
        let window = self.window(offset, buf.len())?;
        buf.copy_from_slice(window);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        if self.faults.contains(EepromFaults::WRITE) {
            return Err(EepromError::WriteFailed.into());
        }
        let window = self.window(offset, data.len())?;
        window.copy_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.faults.contains(EepromFaults::COMMIT) {
            return Err(EepromError::CommitFailed.into());
        }
        let mirror = self.mirror.as_ref().ok_or(EepromError::OutOfRange)?;
        let len = if self.power_loss {
            self.power_loss = false;
            mirror.len() / 2
        } else {
            mirror.len()
        };
        self.medium[..len].copy_from_slice(&mirror[..len]);
        self.commit_count += 1;
        Ok(())
    }

    fn end(&mut self) {
        self.mirror = None;
    }
}

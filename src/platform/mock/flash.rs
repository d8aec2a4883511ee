//! Mock NOR flash for testing

use crate::config::FLASH_REGION_BASE;
use crate::platform::{error::FlashError, traits::FlashInterface, Result};
use bitflags::bitflags;
use std::vec;
use std::vec::Vec;

/// Erase block size (4 KB)
const BLOCK_SIZE: u32 = 4096;

/// Total size (512 KB)
const FLASH_CAPACITY: u32 = 512 * 1024;

bitflags! {
    /// Operations that fail while the flag is set
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FlashFaults: u8 {
        const READ = 0b001;
        const WRITE = 0b010;
        const ERASE = 0b100;
    }
}

/// In-memory NOR flash
///
/// Everything below the protected boundary (the default region base) is
/// treated as firmware and refuses erase and write. Writes only clear bits,
/// so writing without a prior erase shows up in tests as corrupted data.
///
/// # Example
///
/// ```
/// use nvparams::platform::mock::MockFlash;
/// use nvparams::platform::FlashInterface;
///
/// let mut flash = MockFlash::new();
/// flash.erase(0x040000, 4096).unwrap();
/// flash.write(0x040000, &[0x12, 0x34]).unwrap();
///
/// let mut buf = [0u8; 2];
/// flash.read(0x040000, &mut buf).unwrap();
/// assert_eq!(buf, [0x12, 0x34]);
/// assert_eq!(flash.erase_count(0x040000), 1);
/// ```
#[derive(Debug)]
pub struct MockFlash {
    /// Cell contents, 0xFF when erased
    cells: Vec<u8>,
    /// Erases per block
    erase_counts: Vec<u32>,
    /// First writable address
    protected_end: u32,
    faults: FlashFaults,
    /// Next write stops after half of its bytes
    power_loss: bool,
}

impl MockFlash {
    /// Fully erased flash protecting everything below the default region base
    pub fn new() -> Self {
        Self::with_protected(FLASH_REGION_BASE)
    }

    /// Fully erased flash protecting `[0, protected_end)`
    pub fn with_protected(protected_end: u32) -> Self {
        Self {
            cells: vec![0xFF; FLASH_CAPACITY as usize],
            erase_counts: vec![0; (FLASH_CAPACITY / BLOCK_SIZE) as usize],
            protected_end,
            faults: FlashFaults::empty(),
            power_loss: false,
        }
    }

    /// Raw cell contents
    pub fn contents(&self, address: u32, len: usize) -> &[u8] {
        let start = address as usize;
        &self.cells[start..start + len]
    }

    /// XOR `mask` into the cell at `address`, bypassing NOR semantics
    pub fn corrupt(&mut self, address: u32, mask: u8) {
        self.cells[address as usize] ^= mask;
    }

    pub fn erase_count(&self, address: u32) -> u32 {
        self.erase_counts[(address / BLOCK_SIZE) as usize]
    }

    /// Replace the set of failing operations
    pub fn set_faults(&mut self, faults: FlashFaults) {
        self.faults = faults;
    }

    /// Cut the next write short after half of its bytes
    pub fn simulate_power_loss(&mut self) {
        self.power_loss = true;
    }

    fn writable(&self, address: u32, len: usize) -> Result<usize> {
        let start = address as usize;
        if address < self.protected_end || start + len > FLASH_CAPACITY as usize {
            return Err(FlashError::InvalidAddress.into());
        }
        Ok(start)
    }
}

impl Default for MockFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashInterface for MockFlash {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        if self.faults.contains(FlashFaults::READ) {
            return Err(FlashError::ReadFailed.into());
        }
        let start = address as usize;
        let src = self
            .cells
            .get(start..start + buf.len())
            .ok_or(FlashError::InvalidAddress)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        let start = self.writable(address, data.len())?;
        if self.faults.contains(FlashFaults::WRITE) {
            return Err(FlashError::WriteFailed.into());
        }

        let len = if self.power_loss {
            self.power_loss = false;
            data.len() / 2
        } else {
            data.len()
        };
        // NOR cells only go 1 → 0
        for (cell, byte) in self.cells[start..start + len].iter_mut().zip(data) {
            *cell &= *byte;
        }
        Ok(())
    }

    fn erase(&mut self, address: u32, size: u32) -> Result<()> {
        if !address.is_multiple_of(BLOCK_SIZE) || !size.is_multiple_of(BLOCK_SIZE) {
            return Err(FlashError::InvalidAddress.into());
        }
        let start = self.writable(address, size as usize)?;
        if self.faults.contains(FlashFaults::ERASE) {
            return Err(FlashError::EraseFailed.into());
        }

        self.cells[start..start + size as usize].fill(0xFF);
        let first = (address / BLOCK_SIZE) as usize;
        let blocks = (size / BLOCK_SIZE) as usize;
        for count in &mut self.erase_counts[first..first + blocks] {
            *count += 1;
        }
        Ok(())
    }

    fn block_size(&self) -> u32 {
        BLOCK_SIZE
    }

    fn capacity(&self) -> u32 {
        FLASH_CAPACITY
    }
}

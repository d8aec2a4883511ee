//! Region storage adapters
//!
//! The store only ever reads or writes its region as one block. This module
//! maps that block onto the supported backing media.

use crate::config::FLASH_REGION_BASE;
use crate::platform::{
    EepromInterface, FlashError, FlashInterface, NamespaceInterface, Result,
};

/// Whole-region access to a backing medium
pub trait RegionStorage {
    /// Fill `buf` with the persisted region
    ///
    /// Bytes the medium does not hold are left zero.
    fn read_region(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Persist `image`
    ///
    /// `image` is the full zero-padded region; only the first `used` bytes
    /// carry data. Media that store a length may write just that prefix.
    fn write_region(&mut self, image: &[u8], used: usize) -> Result<()>;
}

impl<T: RegionStorage + ?Sized> RegionStorage for &mut T {
    fn read_region(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_region(buf)
    }

    fn write_region(&mut self, image: &[u8], used: usize) -> Result<()> {
        (**self).write_region(image, used)
    }
}

/// Region stored at offset 0 of an EEPROM-emulation area
///
/// Each access opens the area with the region size and closes it again, so
/// the RAM mirror is only held during the call.
#[derive(Debug)]
pub struct EepromRegion<E> {
    eeprom: E,
}

impl<E: EepromInterface> EepromRegion<E> {
    pub fn new(eeprom: E) -> Self {
        Self { eeprom }
    }

    pub fn inner(&self) -> &E {
        &self.eeprom
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.eeprom
    }

    pub fn into_inner(self) -> E {
        self.eeprom
    }
}

impl<E: EepromInterface> RegionStorage for EepromRegion<E> {
    fn read_region(&mut self, buf: &mut [u8]) -> Result<()> {
        self.eeprom.begin(buf.len())?;
        let result = self.eeprom.read(0, buf);
        self.eeprom.end();
        result
    }

    fn write_region(&mut self, image: &[u8], _used: usize) -> Result<()> {
        self.eeprom.begin(image.len())?;
        let result = self
            .eeprom
            .write(0, image)
            .and_then(|()| self.eeprom.commit());
        self.eeprom.end();
        result
    }
}

/// Entry holding the number of valid region bytes
pub const SIZE_ENTRY: &str = "size";

/// Entry holding the region bytes
pub const DATA_ENTRY: &str = "data";

/// Region stored as two entries of a namespaced store
///
/// `data` holds the used prefix of the image and `size` its length. Data is
/// written before size; a crash between the two leaves the previous size,
/// which cuts a longer new image short so that it fails validation.
#[derive(Debug)]
pub struct NamespaceRegion<N> {
    namespace: N,
}

impl<N: NamespaceInterface> NamespaceRegion<N> {
    pub fn new(namespace: N) -> Self {
        Self { namespace }
    }

    pub fn inner(&self) -> &N {
        &self.namespace
    }

    pub fn inner_mut(&mut self) -> &mut N {
        &mut self.namespace
    }

    pub fn into_inner(self) -> N {
        self.namespace
    }
}

impl<N: NamespaceInterface> RegionStorage for NamespaceRegion<N> {
    fn read_region(&mut self, buf: &mut [u8]) -> Result<()> {
        buf.fill(0);
        let size = self.namespace.get_u32(SIZE_ENTRY)?.unwrap_or(0) as usize;
        if size == 0 {
            return Ok(());
        }

        let read = self.namespace.get_bytes(DATA_ENTRY, buf)?;
        // Only the recorded prefix counts
        let valid = size.min(read);
        buf[valid..].fill(0);
        Ok(())
    }

    fn write_region(&mut self, image: &[u8], used: usize) -> Result<()> {
        let used = used.min(image.len());
        self.namespace.put_bytes(DATA_ENTRY, &image[..used])?;
        self.namespace.put_u32(SIZE_ENTRY, used as u32)
    }
}

/// Region stored in a dedicated flash area
///
/// The area starts on a block boundary. Saving erases the blocks covering the
/// region and programs the used prefix; the erased tail reads back as 0xFF,
/// which lies outside `totalSize` and is ignored.
#[derive(Debug)]
pub struct FlashRegion<F> {
    flash: F,
    address: u32,
}

impl<F: FlashInterface> FlashRegion<F> {
    /// Create a region at `address`, which must be block-aligned
    pub fn new(flash: F, address: u32) -> Result<Self> {
        if !address.is_multiple_of(flash.block_size()) || address >= flash.capacity() {
            return Err(FlashError::InvalidAddress.into());
        }
        Ok(Self { flash, address })
    }

    /// Create a region at [`FLASH_REGION_BASE`]
    pub fn at_default_base(flash: F) -> Result<Self> {
        Self::new(flash, FLASH_REGION_BASE)
    }

    pub fn address(&self) -> u32 {
        self.address
    }

    pub fn inner(&self) -> &F {
        &self.flash
    }

    pub fn inner_mut(&mut self) -> &mut F {
        &mut self.flash
    }

    pub fn into_inner(self) -> F {
        self.flash
    }
}

impl<F: FlashInterface> RegionStorage for FlashRegion<F> {
    fn read_region(&mut self, buf: &mut [u8]) -> Result<()> {
        self.flash.read(self.address, buf)
    }

    fn write_region(&mut self, image: &[u8], used: usize) -> Result<()> {
        let block_size = self.flash.block_size();
        let span = (image.len() as u32).div_ceil(block_size) * block_size;
        self.flash.erase(self.address, span)?;
        self.flash.write(self.address, &image[..used.min(image.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{
        EepromFaults, FlashFaults, MockEeprom, MockFlash, MockNamespace, NamespaceFaults,
    };
    use crate::platform::{EepromError, FlashError, PlatformError};

    #[test]
    fn test_eeprom_round_trip() {
        let mut region = EepromRegion::new(MockEeprom::new(32));
        let image: [u8; 16] = core::array::from_fn(|i| i as u8 + 1);
        region.write_region(&image, 10).unwrap();
        assert!(!region.inner().is_open());
        assert_eq!(region.inner().commit_count(), 1);

        let mut buf = [0u8; 16];
        region.read_region(&mut buf).unwrap();
        assert_eq!(buf, image);
    }

    #[test]
    fn test_eeprom_closes_after_failure() {
        let mut eeprom = MockEeprom::new(32);
        eeprom.set_faults(EepromFaults::COMMIT);
        let mut region = EepromRegion::new(eeprom);
        let result = region.write_region(&[1; 16], 16);
        assert_eq!(result, Err(PlatformError::Eeprom(EepromError::CommitFailed)));
        assert!(!region.inner().is_open());
        assert_eq!(region.inner().contents()[0], 0);
    }

    #[test]
    fn test_eeprom_region_larger_than_medium() {
        let mut region = EepromRegion::new(MockEeprom::new(8));
        let mut buf = [0u8; 16];
        assert_eq!(
            region.read_region(&mut buf),
            Err(PlatformError::Eeprom(EepromError::BeginFailed))
        );
    }

    #[test]
    fn test_namespace_writes_used_prefix() {
        let mut region = NamespaceRegion::new(MockNamespace::new());
        let mut image = [0u8; 32];
        image[..5].copy_from_slice(&[5, 4, 3, 2, 1]);
        region.write_region(&image, 5).unwrap();

        assert_eq!(region.inner().u32(SIZE_ENTRY), Some(5));
        assert_eq!(region.inner().bytes(DATA_ENTRY), Some(&[5u8, 4, 3, 2, 1][..]));

        let mut buf = [0xAAu8; 32];
        region.read_region(&mut buf).unwrap();
        assert_eq!(buf, image);
    }

    #[test]
    fn test_namespace_absent_reads_zero() {
        let mut region = NamespaceRegion::new(MockNamespace::new());
        let mut buf = [0xAAu8; 16];
        region.read_region(&mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_namespace_size_limits_data() {
        let mut ns = MockNamespace::new();
        ns.put_bytes(DATA_ENTRY, &[9; 8]).unwrap();
        ns.put_u32(SIZE_ENTRY, 3).unwrap();
        let mut region = NamespaceRegion::new(ns);

        let mut buf = [0u8; 8];
        region.read_region(&mut buf).unwrap();
        assert_eq!(buf, [9, 9, 9, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_namespace_read_failure() {
        let mut ns = MockNamespace::new();
        ns.set_faults(NamespaceFaults::READ);
        let mut region = NamespaceRegion::new(ns);
        let mut buf = [0u8; 8];
        assert!(region.read_region(&mut buf).is_err());
    }

    #[test]
    fn test_flash_rejects_unaligned_address() {
        assert!(FlashRegion::new(MockFlash::new(), FLASH_REGION_BASE + 1).is_err());
        assert!(FlashRegion::new(MockFlash::new(), 512 * 1024).is_err());
        assert!(FlashRegion::at_default_base(MockFlash::new()).is_ok());
    }

    #[test]
    fn test_flash_erases_then_writes() {
        let mut region = FlashRegion::at_default_base(MockFlash::new()).unwrap();
        region.write_region(&[0x00; 64], 64).unwrap();
        region.write_region(&[0x5A; 64], 12).unwrap();
        assert_eq!(region.inner().erase_count(FLASH_REGION_BASE), 2);

        let mut buf = [0u8; 16];
        region.read_region(&mut buf).unwrap();
        assert_eq!(&buf[..12], &[0x5A; 12]);
        assert_eq!(&buf[12..], &[0xFF; 4]);
    }

    #[test]
    fn test_flash_region_spanning_blocks() {
        let mut region = FlashRegion::at_default_base(MockFlash::new()).unwrap();
        region.write_region(&[0x11; 4097], 4097).unwrap();
        assert_eq!(region.inner().erase_count(FLASH_REGION_BASE), 1);
        assert_eq!(region.inner().erase_count(FLASH_REGION_BASE + 4096), 1);
    }

    #[test]
    fn test_flash_erase_failure_keeps_old_image() {
        let mut region = FlashRegion::at_default_base(MockFlash::new()).unwrap();
        region.write_region(&[0x11; 16], 16).unwrap();
        region.inner_mut().set_faults(FlashFaults::ERASE);

        assert_eq!(
            region.write_region(&[0x22; 16], 16),
            Err(PlatformError::Flash(FlashError::EraseFailed))
        );
        let mut buf = [0u8; 16];
        region.read_region(&mut buf).unwrap();
        assert_eq!(buf, [0x11; 16]);
    }
}

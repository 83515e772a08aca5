//! Byte-addressed persistent storage seam.

use crate::error::Error;

/// Sequential byte reads from persistent storage (EEPROM or similar).
///
/// Only the `$E` template directive uses this: it reads bytes from a start
/// address until it hits a NUL.
pub trait PersistentStore {
    /// Read the byte stored at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the address is out of range or the
    /// device could not be read.
    fn read_byte(&mut self, addr: u16) -> Result<u8, Error>;
}

/// RAM mirror of a storage image.
impl PersistentStore for [u8] {
    fn read_byte(&mut self, addr: u16) -> Result<u8, Error> {
        self.get(usize::from(addr)).copied().ok_or(Error::Storage)
    }
}

impl<const N: usize> PersistentStore for [u8; N] {
    fn read_byte(&mut self, addr: u16) -> Result<u8, Error> {
        self.as_slice()
            .get(usize::from(addr))
            .copied()
            .ok_or(Error::Storage)
    }
}

/// Stand-in for templates rendered without a store attached.
pub(crate) struct NoStore;

impl PersistentStore for NoStore {
    fn read_byte(&mut self, _addr: u16) -> Result<u8, Error> {
        Err(Error::Storage)
    }
}

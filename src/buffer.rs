//! The one shared network buffer.

use static_cell::StaticCell;

use crate::config::ETHER_BUFFER_SIZE;

/// Backing storage for requests, replies and NTP frames.
pub type EtherBuffer = [u8; ETHER_BUFFER_SIZE];

/// Hand out the buffer stored in `cell`, zeroed.
///
/// Only the first call succeeds; later calls return `None`, so there is never
/// more than one live mutable reference to the buffer.
///
/// # Example
///
/// ```
/// use sprinkler_ether::{take_buffer, EtherBuffer};
/// use static_cell::StaticCell;
///
/// static BUFFER: StaticCell<EtherBuffer> = StaticCell::new();
///
/// let buf = take_buffer(&BUFFER).unwrap();
/// assert!(buf.iter().all(|&b| b == 0));
/// assert!(take_buffer(&BUFFER).is_none());
/// ```
pub fn take_buffer(cell: &'static StaticCell<EtherBuffer>) -> Option<&'static mut EtherBuffer> {
    cell.try_init([0; ETHER_BUFFER_SIZE])
}

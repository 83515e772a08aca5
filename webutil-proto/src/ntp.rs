//! NTP request and response frame layout.
//!
//! Only the handful of fields the device needs are touched: the client
//! request header, the reference identifier, and the transmit timestamp
//! seconds in the server's reply. Everything else in the request is zero.
//!
//! ```text
//!  0       1       2       3
//! +-------+-------+-------+-------+
//! | flags |stratum| poll  | prec  |   0..4    REQUEST_HEADER
//! |          root delay           |   4..8
//! |        root dispersion        |   8..12
//! |      reference identifier     |  12..16    REFERENCE_ID
//! |      ... timestamps ...       |  16..40
//! |  transmit timestamp seconds   |  40..44    big-endian
//! |  transmit timestamp fraction  |  44..48
//! +-------+-------+-------+-------+
//! ```

use crate::error::Error;

/// Size of an NTP frame without extension fields.
pub const NTP_PACKET_SIZE: usize = 48;

/// UDP port NTP servers listen on.
pub const NTP_PORT: u16 = 123;

/// First four request bytes: LI = 3 (unsynchronised), version 4, mode 3
/// (client); stratum 0; poll interval 2^6 s; precision byte 0xEC.
pub const REQUEST_HEADER: [u8; 4] = [0xE3, 0x00, 0x06, 0xEC];

/// Offset of the reference identifier.
pub const REFERENCE_ID_OFFSET: usize = 12;

/// Reference identifier sent in requests (`"1N14"`).
pub const REFERENCE_ID: [u8; 4] = [0x31, 0x4E, 0x31, 0x34];

/// Offset of the transmit timestamp seconds in a reply.
pub const TIMESTAMP_OFFSET: usize = 40;

/// Seconds from the NTP epoch (1900) to the Unix epoch (1970).
pub const NTP_UNIX_OFFSET: u32 = 2_208_988_800;

/// Build a client request at the start of `buf`.
///
/// The whole of `buf` is zeroed first, then the header and reference
/// identifier are written. Returns [`NTP_PACKET_SIZE`], the number of bytes
/// to transmit.
///
/// # Errors
///
/// Returns [`Error::BufferOverflow`] if `buf` is shorter than one frame.
///
/// # Example
///
/// ```
/// use webutil_proto::ntp;
///
/// let mut buf = [0xFFu8; 64];
/// let len = ntp::write_request(&mut buf).unwrap();
/// assert_eq!(len, ntp::NTP_PACKET_SIZE);
/// assert_eq!(buf[0], 0xE3);
/// assert_eq!(&buf[12..16], b"1N14");
/// ```
pub fn write_request(buf: &mut [u8]) -> Result<usize, Error> {
    if buf.len() < NTP_PACKET_SIZE {
        return Err(Error::BufferOverflow);
    }
    buf.fill(0);
    buf[..REQUEST_HEADER.len()].copy_from_slice(&REQUEST_HEADER);
    buf[REFERENCE_ID_OFFSET..REFERENCE_ID_OFFSET + REFERENCE_ID.len()]
        .copy_from_slice(&REFERENCE_ID);
    Ok(NTP_PACKET_SIZE)
}

/// Read the transmit timestamp seconds from a reply frame.
///
/// The field is big-endian on the wire; the result is in native order.
///
/// # Errors
///
/// Returns [`Error::Malformed`] if `frame` is too short to hold the field.
pub fn read_timestamp(frame: &[u8]) -> Result<u32, Error> {
    let field = frame
        .get(TIMESTAMP_OFFSET..TIMESTAMP_OFFSET + 4)
        .ok_or(Error::Malformed)?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(field);
    Ok(u32::from_be_bytes(bytes))
}

/// Convert NTP seconds to Unix seconds.
///
/// Wraps for timestamps before 1970, the same as unsigned subtraction on the
/// device.
#[inline]
#[must_use]
pub const fn ntp_to_unix(ntp_seconds: u32) -> u32 {
    ntp_seconds.wrapping_sub(NTP_UNIX_OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_layout() {
        let mut buf = [0xAAu8; NTP_PACKET_SIZE];
        assert_eq!(write_request(&mut buf), Ok(NTP_PACKET_SIZE));
        assert_eq!(&buf[..4], &REQUEST_HEADER);
        assert_eq!(&buf[4..12], &[0u8; 8]);
        assert_eq!(&buf[12..16], &REFERENCE_ID);
        assert!(buf[16..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_request_zeroes_whole_buffer() {
        let mut buf = [0x55u8; 100];
        write_request(&mut buf).unwrap();
        assert!(buf[NTP_PACKET_SIZE..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_request_short_buffer() {
        let mut buf = [0u8; NTP_PACKET_SIZE - 1];
        assert_eq!(write_request(&mut buf), Err(Error::BufferOverflow));
    }

    #[test]
    fn test_read_timestamp() {
        let mut frame = [0u8; NTP_PACKET_SIZE];
        frame[40..44].copy_from_slice(&[0xE8, 0xF0, 0x12, 0x34]);
        assert_eq!(read_timestamp(&frame), Ok(0xE8F0_1234));
    }

    #[test]
    fn test_read_timestamp_short_frame() {
        let frame = [0u8; 43];
        assert_eq!(read_timestamp(&frame), Err(Error::Malformed));
        // The fraction half is not needed
        let frame = [0u8; 44];
        assert_eq!(read_timestamp(&frame), Ok(0));
    }

    #[test]
    fn test_ntp_to_unix() {
        assert_eq!(ntp_to_unix(NTP_UNIX_OFFSET), 0);
        // 2024-01-01T00:00:00Z
        assert_eq!(ntp_to_unix(3_913_056_000), 1_704_067_200);
    }
}

//! Textual forms of IPv4 and MAC addresses.
//!
//! Addresses are plain byte arrays (`[u8; 4]` for IPv4, `[u8; 6]` for MAC).
//! Rendering goes through [`make_net_str`]; parsing dotted-decimal text goes
//! through [`parse_ip`] or [`parse_ip_strict`].

use crate::error::Error;
use crate::format::{cstr_len, write_u32};

/// Length of an IPv4 address in bytes.
pub const IP_LEN: usize = 4;

/// Length of a MAC address in bytes.
pub const MAC_LEN: usize = 6;

/// Buffer size that fits any rendering of a MAC or IPv4 address, terminator
/// included: six base-10 octets and five separators is 23 bytes.
pub const MAX_NET_STR_LEN: usize = 24;

/// Owned rendering of a network address.
pub type NetStr = heapless::String<MAX_NET_STR_LEN>;

/// Render an address as text.
///
/// Each byte of `bytes` is written as an unpadded, lowercase numeral in
/// `base` (10 for IPv4, 16 for MAC), with `separator` between bytes and a
/// NUL after the last one. Returns the text length without the terminator.
///
/// # Errors
///
/// - [`Error::Malformed`] if `base` is outside 2..=16.
/// - [`Error::BufferOverflow`] if `out` cannot hold the text and terminator.
///
/// # Example
///
/// ```
/// use webutil_proto::make_net_str;
///
/// let mut out = [0u8; 24];
/// let len = make_net_str(&mut out, &[192, 168, 1, 5], b'.', 10).unwrap();
/// assert_eq!(&out[..len], b"192.168.1.5");
///
/// let len = make_net_str(&mut out, &[0x00, 0x69, 0x69, 0x2d, 0x31, 0x0a], b':', 16).unwrap();
/// assert_eq!(&out[..len], b"0:69:69:2d:31:a");
/// ```
pub fn make_net_str(
    out: &mut [u8],
    bytes: &[u8],
    separator: u8,
    base: u8,
) -> Result<usize, Error> {
    if !(2..=16).contains(&base) {
        return Err(Error::Malformed);
    }

    let mut pos = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if i > 0 {
            *out.get_mut(pos).ok_or(Error::BufferOverflow)? = separator;
            pos += 1;
        }
        let spare = out.get_mut(pos..).ok_or(Error::BufferOverflow)?;
        pos += write_u32(spare, u32::from(b), base).ok_or(Error::BufferOverflow)?;
    }

    *out.get_mut(pos).ok_or(Error::BufferOverflow)? = 0;
    Ok(pos)
}

/// Render an IPv4 address in dotted decimal.
#[must_use]
pub fn format_ip(ip: &[u8; IP_LEN]) -> NetStr {
    net_str(ip, b'.', 10)
}

/// Render a MAC address as colon-separated hex.
#[must_use]
pub fn format_mac(mac: &[u8; MAC_LEN]) -> NetStr {
    net_str(mac, b':', 16)
}

fn net_str(bytes: &[u8], separator: u8, base: u8) -> NetStr {
    let mut raw = [0u8; MAX_NET_STR_LEN];
    let rendered = make_net_str(&mut raw, bytes, separator, base);
    debug_assert!(rendered.is_ok(), "address does not fit MAX_NET_STR_LEN");
    let len = rendered.unwrap_or(0);

    // Digits and the separators used here are ASCII.
    let ascii = core::str::from_utf8(&raw[..len]).unwrap_or_default();
    let mut text = NetStr::new();
    let pushed = text.push_str(ascii);
    debug_assert!(pushed.is_ok(), "NetStr shorter than MAX_NET_STR_LEN");
    text
}

/// How octets above 255 are treated.
#[derive(Clone, Copy)]
enum OctetPolicy {
    /// Keep the low 8 bits (`"300"` becomes 44).
    Truncate,
    /// Fail with [`Error::OutOfRange`].
    Reject,
}

/// Parse dotted-decimal text into an IPv4 address.
///
/// Each octet is the run of digits that starts the field; anything after the
/// digits up to the next `.` is ignored. Octets above 255 keep only their
/// low 8 bits, so `"300"` parses as 44. Text is read up to its first NUL.
/// The input is not modified.
///
/// # Errors
///
/// Returns [`Error::Malformed`] unless exactly four octets are found, each
/// with at least one digit.
///
/// # Example
///
/// ```
/// use webutil_proto::{parse_ip, Error};
///
/// assert_eq!(parse_ip(b"192.168.1.5"), Ok([192, 168, 1, 5]));
/// assert_eq!(parse_ip(b"1.2.3"), Err(Error::Malformed));
/// assert_eq!(parse_ip(b"10.0.0.300"), Ok([10, 0, 0, 44]));
/// ```
pub fn parse_ip(text: &[u8]) -> Result<[u8; IP_LEN], Error> {
    parse_ip_with(text, OctetPolicy::Truncate)
}

/// Parse dotted-decimal text into an IPv4 address, rejecting octets above
/// 255.
///
/// # Errors
///
/// - [`Error::Malformed`] under the same conditions as [`parse_ip`].
/// - [`Error::OutOfRange`] if any octet exceeds 255.
pub fn parse_ip_strict(text: &[u8]) -> Result<[u8; IP_LEN], Error> {
    parse_ip_with(text, OctetPolicy::Reject)
}

fn parse_ip_with(text: &[u8], policy: OctetPolicy) -> Result<[u8; IP_LEN], Error> {
    let text = &text[..cstr_len(text)];
    let mut ip = [0u8; IP_LEN];
    let mut octets = 0;
    let mut start = None;

    for (i, &c) in text.iter().enumerate() {
        if octets == IP_LEN {
            break;
        }
        if start.is_none() && c.is_ascii_digit() {
            start = Some(i);
        }
        if c == b'.' {
            ip[octets] = octet(text, start.take(), policy)?;
            octets += 1;
        }
    }

    // Three separators seen; the last octet runs to the end of the text.
    if octets != IP_LEN - 1 {
        return Err(Error::Malformed);
    }
    ip[IP_LEN - 1] = octet(text, start, policy)?;
    Ok(ip)
}

fn octet(text: &[u8], start: Option<usize>, policy: OctetPolicy) -> Result<u8, Error> {
    let start = start.ok_or(Error::Malformed)?;

    let mut value: u32 = 0;
    let mut fits = true;
    for &c in text[start..].iter().take_while(|c| c.is_ascii_digit()) {
        let digit = u32::from(c - b'0');
        value = match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
            Some(v) => v,
            None => {
                fits = false;
                value.wrapping_mul(10).wrapping_add(digit)
            }
        };
    }
    fits &= value <= u32::from(u8::MAX);

    match policy {
        OctetPolicy::Reject if !fits => Err(Error::OutOfRange),
        // 2^32 is a multiple of 256, so the wrapped value keeps the right
        // low byte.
        _ => Ok((value & 0xFF) as u8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_net_str_ip() {
        let mut out = [0xAAu8; 16];
        let len = make_net_str(&mut out, &[10, 0, 0, 254], b'.', 10).unwrap();
        assert_eq!(&out[..len], b"10.0.0.254");
        assert_eq!(out[len], 0);
    }

    #[test]
    fn test_make_net_str_mac() {
        let mut out = [0u8; MAX_NET_STR_LEN];
        let mac = [0x00, 0x1A, 0x2B, 0xFF, 0x01, 0x10];
        let len = make_net_str(&mut out, &mac, b':', 16).unwrap();
        assert_eq!(&out[..len], b"0:1a:2b:ff:1:10");
    }

    #[test]
    fn test_make_net_str_empty() {
        let mut out = [0xAAu8; 4];
        assert_eq!(make_net_str(&mut out, &[], b'.', 10), Ok(0));
        assert_eq!(out[0], 0);
    }

    #[test]
    fn test_make_net_str_overflow() {
        // "1.2.3.4" needs 7 bytes plus the terminator
        let mut out = [0u8; 7];
        assert_eq!(
            make_net_str(&mut out, &[1, 2, 3, 4], b'.', 10),
            Err(Error::BufferOverflow)
        );
        let mut out = [0u8; 8];
        assert_eq!(make_net_str(&mut out, &[1, 2, 3, 4], b'.', 10), Ok(7));
    }

    #[test]
    fn test_make_net_str_bad_base() {
        let mut out = [0u8; 16];
        assert_eq!(
            make_net_str(&mut out, &[1, 2, 3, 4], b'.', 1),
            Err(Error::Malformed)
        );
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_ip(&[255, 255, 255, 0]).as_str(), "255.255.255.0");
        assert_eq!(
            format_mac(&[0x00, 0x69, 0x69, 0x2D, 0x31, 0x00]).as_str(),
            "0:69:69:2d:31:0"
        );
    }

    #[test]
    fn test_widest_renderings_fit() {
        assert_eq!(format_ip(&[255; IP_LEN]).as_str(), "255.255.255.255");
        assert_eq!(format_mac(&[0xFF; MAC_LEN]).as_str(), "ff:ff:ff:ff:ff:ff");

        // Six decimal octets is the longest text make_net_str is sized for
        let mut out = [0u8; MAX_NET_STR_LEN];
        assert_eq!(make_net_str(&mut out, &[255; MAC_LEN], b'.', 10), Ok(23));
        assert_eq!(out[23], 0);
    }

    #[test]
    fn test_parse_ip() {
        assert_eq!(parse_ip(b"192.168.1.5"), Ok([192, 168, 1, 5]));
        assert_eq!(parse_ip(b"0.0.0.0"), Ok([0, 0, 0, 0]));
        assert_eq!(parse_ip(b"8.8.4.4\0garbage"), Ok([8, 8, 4, 4]));
    }

    #[test]
    fn test_parse_ip_too_few_octets() {
        assert_eq!(parse_ip(b"1.2.3"), Err(Error::Malformed));
        assert_eq!(parse_ip(b""), Err(Error::Malformed));
    }

    #[test]
    fn test_parse_ip_too_many_octets() {
        assert_eq!(parse_ip(b"1.2.3.4.5"), Err(Error::Malformed));
    }

    #[test]
    fn test_parse_ip_empty_octet() {
        assert_eq!(parse_ip(b"1..2.3"), Err(Error::Malformed));
        assert_eq!(parse_ip(b"1.2.3."), Err(Error::Malformed));
    }

    #[test]
    fn test_parse_ip_truncates_octets() {
        assert_eq!(parse_ip(b"300.256.1.2"), Ok([44, 0, 1, 2]));
        // Far past u32: still the value modulo 256
        // 4294967296 + 300 = 4294967596
        assert_eq!(parse_ip(b"4294967596.1.1.1"), Ok([44, 1, 1, 1]));
    }

    #[test]
    fn test_parse_ip_ignores_trailing_junk_in_field() {
        assert_eq!(parse_ip(b"192x.168.1.5 "), Ok([192, 168, 1, 5]));
    }

    #[test]
    fn test_parse_ip_strict() {
        assert_eq!(parse_ip_strict(b"10.1.2.255"), Ok([10, 1, 2, 255]));
        assert_eq!(parse_ip_strict(b"10.1.2.256"), Err(Error::OutOfRange));
        assert_eq!(parse_ip_strict(b"1.2.3"), Err(Error::Malformed));
    }

    #[test]
    fn test_ip_round_trip() {
        // Every value in every octet position, with the other octets varied
        for position in 0..IP_LEN {
            for value in 0..=u8::MAX {
                let mut ip = [0u8; IP_LEN];
                for (i, octet) in ip.iter_mut().enumerate() {
                    *octet = value.wrapping_add(i as u8 * 37);
                }
                ip[position] = value;

                let mut text = [0u8; MAX_NET_STR_LEN];
                let len = make_net_str(&mut text, &ip, b'.', 10).unwrap();
                assert_eq!(parse_ip(&text[..len]), Ok(ip));
                assert_eq!(parse_ip_strict(&text), Ok(ip));
            }
        }
    }
}

//! Character-level hex and numeral primitives.
//!
//! These functions write into caller-supplied byte slices and report how many
//! bytes they produced. Nothing here allocates or panics on short buffers;
//! the writers return `None` instead.

/// Digit lookup table shared by every radix up to 16.
const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Widest rendering `write_u32` can produce (radix 2).
const MAX_U32_DIGITS: usize = 32;

/// Convert a single hex character to its value.
///
/// `0-9`, `a-f` and `A-F` map to 0..=15. Any other character maps to 0.
/// This lenient policy is what request decoding has always relied on; use
/// [`hex_digit`] when the caller needs to tell a bad digit apart from `'0'`.
#[inline]
#[must_use]
pub fn hex_to_int(c: u8) -> u8 {
    hex_digit(c).unwrap_or(0)
}

/// Convert a hex character to its value, or `None` if it is not a hex digit.
#[inline]
#[must_use]
pub fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Render a byte as two lowercase hex digits.
#[inline]
#[must_use]
pub fn int_to_hex(value: u8) -> [u8; 2] {
    [
        HEX_DIGITS[(value >> 4) as usize],
        HEX_DIGITS[(value & 0xF) as usize],
    ]
}

/// Write `value` as a numeral in `radix` (2..=16), lowercase, unpadded.
///
/// Returns the number of bytes written, or `None` if the radix is outside
/// 2..=16 or `buf` cannot hold every digit.
pub fn write_u32(buf: &mut [u8], value: u32, radix: u8) -> Option<usize> {
    if !(2..=16).contains(&radix) {
        return None;
    }
    let radix = u32::from(radix);

    // Digits come out least significant first.
    let mut temp = [0u8; MAX_U32_DIGITS];
    let mut n = value;
    let mut len = 0;
    loop {
        temp[len] = HEX_DIGITS[(n % radix) as usize];
        n /= radix;
        len += 1;
        if n == 0 {
            break;
        }
    }

    let out = buf.get_mut(..len)?;
    for (dst, &src) in out.iter_mut().zip(temp[..len].iter().rev()) {
        *dst = src;
    }
    Some(len)
}

/// Write an i16 as a signed decimal string.
///
/// Returns the number of bytes written (1-6), or `None` if `buf` is too short.
pub fn write_i16(buf: &mut [u8], value: i16) -> Option<usize> {
    if value >= 0 {
        return write_u32(buf, value as u32, 10);
    }
    let (sign, rest) = buf.split_first_mut()?;
    *sign = b'-';
    write_u32(rest, u32::from(value.unsigned_abs()), 10).map(|len| len + 1)
}

/// Length of a NUL-terminated byte string.
///
/// Slices without a terminator are taken whole.
#[inline]
#[must_use]
pub fn cstr_len(s: &[u8]) -> usize {
    s.iter().position(|&b| b == 0).unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_int() {
        assert_eq!(hex_to_int(b'0'), 0);
        assert_eq!(hex_to_int(b'9'), 9);
        assert_eq!(hex_to_int(b'a'), 10);
        assert_eq!(hex_to_int(b'F'), 15);
    }

    #[test]
    fn test_hex_to_int_lenient() {
        // Non-hex characters silently decode as zero
        assert_eq!(hex_to_int(b'g'), 0);
        assert_eq!(hex_to_int(b' '), 0);
        assert_eq!(hex_to_int(0), 0);
        assert_eq!(hex_digit(b'g'), None);
    }

    #[test]
    fn test_int_to_hex() {
        assert_eq!(&int_to_hex(0x00), b"00");
        assert_eq!(&int_to_hex(0x2B), b"2b");
        assert_eq!(&int_to_hex(0xFF), b"ff");
        assert_eq!(&int_to_hex(0x0A), b"0a");
    }

    #[test]
    fn test_write_u32_decimal() {
        let mut buf = [0u8; 10];

        let len = write_u32(&mut buf, 0, 10).unwrap();
        assert_eq!(&buf[..len], b"0");

        let len = write_u32(&mut buf, 4_294_967_295, 10).unwrap();
        assert_eq!(&buf[..len], b"4294967295");

        let len = write_u32(&mut buf, 192, 10).unwrap();
        assert_eq!(&buf[..len], b"192");
    }

    #[test]
    fn test_write_u32_hex_unpadded() {
        let mut buf = [0u8; 8];

        let len = write_u32(&mut buf, 0x0A, 16).unwrap();
        assert_eq!(&buf[..len], b"a");

        let len = write_u32(&mut buf, 0xDE, 16).unwrap();
        assert_eq!(&buf[..len], b"de");
    }

    #[test]
    fn test_write_u32_short_buffer() {
        let mut buf = [0u8; 2];
        assert_eq!(write_u32(&mut buf, 100, 10), None);
        assert_eq!(write_u32(&mut buf, 99, 10), Some(2));
    }

    #[test]
    fn test_write_u32_bad_radix() {
        let mut buf = [0u8; 8];
        assert_eq!(write_u32(&mut buf, 5, 0), None);
        assert_eq!(write_u32(&mut buf, 5, 1), None);
        assert_eq!(write_u32(&mut buf, 5, 17), None);
    }

    #[test]
    fn test_write_i16() {
        let mut buf = [0u8; 6];

        let len = write_i16(&mut buf, 0).unwrap();
        assert_eq!(&buf[..len], b"0");

        let len = write_i16(&mut buf, -1).unwrap();
        assert_eq!(&buf[..len], b"-1");

        let len = write_i16(&mut buf, 32767).unwrap();
        assert_eq!(&buf[..len], b"32767");

        let len = write_i16(&mut buf, -32768).unwrap();
        assert_eq!(&buf[..len], b"-32768");
    }

    #[test]
    fn test_write_i16_short_buffer() {
        let mut buf = [0u8; 2];
        assert_eq!(write_i16(&mut buf, -10), None);
        assert_eq!(write_i16(&mut [], -1), None);
    }

    #[test]
    fn test_cstr_len() {
        assert_eq!(cstr_len(b"abc\0def"), 3);
        assert_eq!(cstr_len(b"abc"), 3);
        assert_eq!(cstr_len(b"\0"), 0);
        assert_eq!(cstr_len(b""), 0);
    }
}

//! Query-string percent encoding.
//!
//! Decoding works in place on a NUL-terminated (or full-length) buffer, the
//! way request text arrives in the shared network buffer. Encoding copies
//! into a separate output buffer, which must have room for three bytes per
//! input byte in the worst case plus the terminator.

use crate::error::Error;
use crate::format::{cstr_len, hex_digit, int_to_hex};

/// Result of an in-place decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Decoded {
    /// Length of the decoded text, not counting the terminator.
    pub len: usize,
    /// At least one `%` escape had a missing or non-hex digit. Those digits
    /// were decoded as 0.
    pub malformed: bool,
}

/// Decode a URL-encoded string in place.
///
/// `+` becomes a space, `%XY` becomes the byte `0xXY`, everything else is
/// copied through. Decoding stops at the first NUL or at the end of `buf`.
/// Output is written from the start of `buf` and never overtakes the read
/// position. A NUL terminator follows the decoded text when there is room
/// for it.
///
/// Invalid hex digits decode as 0 rather than failing; the returned
/// [`Decoded::malformed`] flag records that it happened.
///
/// # Example
///
/// ```
/// use webutil_proto::url_decode;
///
/// let mut buf = *b"hello%20joe+bloggs\0";
/// let decoded = url_decode(&mut buf);
/// assert_eq!(&buf[..decoded.len], b"hello joe bloggs");
/// assert!(!decoded.malformed);
/// ```
pub fn url_decode(buf: &mut [u8]) -> Decoded {
    let end = cstr_len(buf);
    let mut read = 0;
    let mut write = 0;
    let mut malformed = false;

    while read < end {
        let c = match buf[read] {
            b'+' => {
                read += 1;
                b' '
            }
            b'%' => {
                let hi = escape_digit(&buf[..end], read + 1, &mut malformed);
                let lo = escape_digit(&buf[..end], read + 2, &mut malformed);
                read = (read + 3).min(end);
                (hi << 4) | lo
            }
            c => {
                read += 1;
                c
            }
        };
        buf[write] = c;
        write += 1;
    }

    if let Some(term) = buf.get_mut(write) {
        *term = 0;
    }

    Decoded {
        len: write,
        malformed,
    }
}

/// Hex digit of a `%` escape, or 0 (flagging `malformed`) if it is missing
/// or invalid.
#[inline]
fn escape_digit(text: &[u8], index: usize, malformed: &mut bool) -> u8 {
    match text.get(index).copied().and_then(hex_digit) {
        Some(value) => value,
        None => {
            *malformed = true;
            0
        }
    }
}

/// URL-encode `src` into `dst`.
///
/// Spaces become `+`, ASCII alphanumerics are copied, and every other byte
/// becomes `%` plus two lowercase hex digits. `src` is read up to its first
/// NUL. The output is NUL-terminated; the returned length excludes the
/// terminator.
///
/// # Errors
///
/// Returns [`Error::BufferOverflow`] if `dst` cannot hold the encoded text
/// and its terminator. `dst` contents are unspecified in that case.
///
/// # Example
///
/// ```
/// use webutil_proto::url_encode;
///
/// let mut out = [0u8; 32];
/// let len = url_encode(b"New York, NY", &mut out).unwrap();
/// assert_eq!(&out[..len], b"New+York%2c+NY");
/// ```
pub fn url_encode(src: &[u8], dst: &mut [u8]) -> Result<usize, Error> {
    let mut pos = 0;

    for &c in &src[..cstr_len(src)] {
        if c == b' ' || c.is_ascii_alphanumeric() {
            let out = dst.get_mut(pos).ok_or(Error::BufferOverflow)?;
            *out = if c == b' ' { b'+' } else { c };
            pos += 1;
        } else {
            let out = dst.get_mut(pos..pos + 3).ok_or(Error::BufferOverflow)?;
            out[0] = b'%';
            out[1..].copy_from_slice(&int_to_hex(c));
            pos += 3;
        }
    }

    *dst.get_mut(pos).ok_or(Error::BufferOverflow)? = 0;
    Ok(pos)
}

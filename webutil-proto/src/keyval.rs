//! `key=value` lookup in HTTP request lines.
//!
//! Request lines look like `GET /cv?pw=secret&rsn=1 HTTP/1.1`. Only the part
//! before the first space, newline or NUL is scanned, so with a full request
//! line callers pass the text after the method (`/cv?pw=...`).
//!
//! The key is found with a single forward pass: the match position resets
//! whenever a byte disagrees with the key, and the key counts as found only
//! when `=` follows it directly. Keys match anywhere in the text, so `b` also
//! matches the tail of `ab=1`. Request lines are short and bounded, so no
//! smarter substring search is needed.
//!
//! # Compatibility
//!
//! This scan finds some keys the legacy EtherCard `findKeyVal` missed:
//!
//! - The byte that breaks a partial match is tested again as the start of a
//!   new match. The legacy scan skipped it, so `ab` was not found in
//!   `aab=1`.
//! - After a full key match without `=`, scanning resumes at the next byte.
//!   The legacy scan skipped that byte too, so `b` was not found in `bb=2`.
//!
//! Both lines are found here. Lines the legacy scan did match give the same
//! value.
//!
//! A key that appears without `=` (`/jo?pw`) is reported the same as a key
//! that is absent: both give `None`. Callers only ever act on a value, and a
//! bare key carries none.

use crate::format::cstr_len;

/// True for bytes that end the scanned part of a request line.
#[inline]
fn is_line_end(c: u8) -> bool {
    matches!(c, 0 | b' ' | b'\n')
}

/// Find the value for `key` without copying it.
///
/// Returns the bytes after `key=` up to the next `&`, space, newline, NUL or
/// the end of `line`. Returns `None` if the key is empty or never appears
/// followed by `=`.
///
/// # Example
///
/// ```
/// use webutil_proto::find_value;
///
/// let line = b"/cv?pw=opendoor&rsn=1 HTTP/1.1";
/// assert_eq!(find_value(line, b"pw"), Some(&b"opendoor"[..]));
/// assert_eq!(find_value(line, b"HTTP"), None);
/// ```
#[must_use]
pub fn find_value<'a>(line: &'a [u8], key: &[u8]) -> Option<&'a [u8]> {
    if key.is_empty() {
        return None;
    }

    let mut matched = 0;
    for (i, &c) in line.iter().enumerate() {
        if is_line_end(c) {
            break;
        }
        if c != key[matched] {
            matched = 0;
        }
        if c != key[matched] {
            continue;
        }
        matched += 1;
        if matched < key.len() {
            continue;
        }
        matched = 0;
        if line.get(i + 1) == Some(&b'=') {
            let rest = &line[i + 2..];
            let end = rest
                .iter()
                .position(|&b| is_line_end(b) || b == b'&')
                .unwrap_or(rest.len());
            return Some(&rest[..end]);
        }
    }
    None
}

/// Copy the value for `key` into `out`.
///
/// At most `out.len() - 1` bytes are copied; longer values are truncated
/// silently. A NUL terminator follows the copied bytes whenever `out` is not
/// empty. Returns the number of bytes copied, or `None` if the key was not
/// found (`out` is left untouched then).
///
/// `key` is read up to its first NUL, so C-style key constants work as-is.
///
/// # Example
///
/// ```
/// use webutil_proto::find_key_val;
///
/// let mut value = [0u8; 8];
/// assert_eq!(find_key_val(b"a=1&b=22", &mut value, b"b"), Some(2));
/// assert_eq!(&value[..3], b"22\0");
/// assert_eq!(find_key_val(b"a=1&b=22", &mut value, b"c"), None);
/// ```
pub fn find_key_val(line: &[u8], out: &mut [u8], key: &[u8]) -> Option<usize> {
    let value = find_value(line, &key[..cstr_len(key)])?;
    let len = value.len().min(out.len().saturating_sub(1));
    out[..len].copy_from_slice(&value[..len]);
    if let Some(term) = out.get_mut(len) {
        *term = 0;
    }
    Some(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_key_val_boundary() {
        let mut buf = [0xAAu8; 8];
        assert_eq!(find_key_val(b"a=1&b=22", &mut buf, b"b"), Some(2));
        assert_eq!(&buf[..3], b"22\0");

        let mut buf = [0u8; 8];
        assert_eq!(find_key_val(b"a=1&b=22", &mut buf, b"c"), None);
        assert_eq!(find_key_val(b"a=1&b=22", &mut buf, b"c").unwrap_or(0), 0);
    }

    #[test]
    fn test_first_key() {
        assert_eq!(find_value(b"a=1&b=22", b"a"), Some(&b"1"[..]));
    }

    #[test]
    fn test_value_stops_at_line_end() {
        let line = b"/cv?rsn=1 HTTP/1.1\r\n";
        assert_eq!(find_value(line, b"rsn"), Some(&b"1"[..]));

        assert_eq!(find_value(b"x=abc\ny=2", b"x"), Some(&b"abc"[..]));
        assert_eq!(find_value(b"x=ab\0cd", b"x"), Some(&b"ab"[..]));
    }

    #[test]
    fn test_scan_stops_at_line_end() {
        // Keys after the first space are never looked at
        assert_eq!(find_value(b"/x?a=1 b=2", b"b"), None);
        assert_eq!(find_value(b"/x?a=1\nb=2", b"b"), None);
        assert_eq!(find_value(b"/x?a=1\0b=2", b"b"), None);
    }

    #[test]
    fn test_empty_value() {
        let mut buf = [0xAAu8; 4];
        assert_eq!(find_key_val(b"pw=&x=1", &mut buf, b"pw"), Some(0));
        assert_eq!(buf[0], 0);
        assert_eq!(find_value(b"pw=", b"pw"), Some(&b""[..]));
    }

    #[test]
    fn test_key_without_equals() {
        assert_eq!(find_value(b"/jo?pw", b"pw"), None);
        assert_eq!(find_value(b"pw:x&pw=2", b"pw"), Some(&b"2"[..]));
    }

    #[test]
    fn test_key_matches_as_suffix() {
        assert_eq!(find_value(b"xb=5", b"b"), Some(&b"5"[..]));
    }

    #[test]
    fn test_bare_key_same_as_absent() {
        let mut buf = [0xAAu8; 4];
        assert_eq!(find_key_val(b"/jo?pw&x=1", &mut buf, b"pw"), None);
        assert_eq!(find_key_val(b"/jo?x=1", &mut buf, b"pw"), None);
        assert_eq!(buf, [0xAA; 4]);
    }

    #[test]
    fn test_match_restarts_on_mismatch() {
        // The byte that broke a partial match can start the next one
        assert_eq!(find_value(b"aab=1", b"ab"), Some(&b"1"[..]));
        assert_eq!(find_value(b"bb=2", b"b"), Some(&b"2"[..]));
    }

    #[test]
    fn test_truncates_to_buffer() {
        let mut buf = [0u8; 4];
        assert_eq!(find_key_val(b"loc=brisbane", &mut buf, b"loc"), Some(3));
        assert_eq!(&buf, b"bri\0");
    }

    #[test]
    fn test_empty_output_buffer() {
        let mut buf: [u8; 0] = [];
        assert_eq!(find_key_val(b"a=1", &mut buf, b"a"), Some(0));
    }

    #[test]
    fn test_nul_terminated_key() {
        let mut buf = [0u8; 8];
        assert_eq!(find_key_val(b"sid=3", &mut buf, b"sid\0"), Some(1));
        assert_eq!(buf[0], b'3');
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(find_value(b"=1", b""), None);
    }
}

//! Allocation-free web utilities for a small networked controller.
//!
//! Everything here works on caller-provided byte buffers; nothing allocates
//! and nothing blocks:
//!
//! - **Buffer formatter**: [`BufferFiller`] renders `$`-directive templates
//!   ([`BufferFiller::emit_p`]) into a fixed buffer
//! - **Query parsing**: [`find_key_val`] and [`find_value`] pull `key=value`
//!   pairs out of request lines
//! - **URL codec**: [`url_decode`] (in place) and [`url_encode`]
//! - **Address codec**: [`make_net_str`], [`parse_ip`] and friends
//! - **Hex codec**: [`hex_to_int`], [`int_to_hex`]
//! - **NTP framing**: [`ntp::write_request`], [`ntp::read_timestamp`]
//!
//! Strings are byte slices. Where a function writes text it also writes a NUL
//! terminator, and where it reads text it stops at the first NUL, so buffers
//! can be handed between these helpers without tracking lengths separately.
//!
//! # Example
//!
//! ```
//! use webutil_proto::{find_key_val, url_decode, Arg, BufferFiller};
//!
//! let mut sid = [0u8; 8];
//! let len = find_key_val(b"/cm?sid=3&name=Back%20yard", &mut sid, b"sid").unwrap();
//! assert_eq!(&sid[..len], b"3");
//!
//! let mut name = [0u8; 16];
//! find_key_val(b"/cm?sid=3&name=Back%20yard", &mut name, b"name").unwrap();
//! let decoded = url_decode(&mut name);
//! assert_eq!(&name[..decoded.len], b"Back yard");
//!
//! let mut buf = [0u8; 64];
//! let mut bfill = BufferFiller::new(&mut buf);
//! bfill
//!     .emit_p("Station $D: $S", &[Arg::Int(3), Arg::Str(&name[..decoded.len])])
//!     .unwrap();
//! assert_eq!(bfill.as_bytes(), b"Station 3: Back yard");
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting of the public types
//! - **`embedded-io`**: Implement `embedded_io::Write` for [`BufferFiller`]

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod emit;
pub mod error;
pub mod format;
pub mod keyval;
pub mod netaddr;
pub mod ntp;
pub mod store;
pub mod url;

// Re-export types at crate root for convenience
pub use emit::{Arg, BufferFiller, Directive, Template};
pub use error::Error;
pub use format::{cstr_len, hex_digit, hex_to_int, int_to_hex, write_i16, write_u32};
pub use keyval::{find_key_val, find_value};
pub use netaddr::{
    format_ip, format_mac, make_net_str, parse_ip, parse_ip_strict, NetStr, IP_LEN, MAC_LEN,
    MAX_NET_STR_LEN,
};
pub use ntp::{NTP_PACKET_SIZE, NTP_PORT};
pub use store::PersistentStore;
pub use url::{url_decode, url_encode, Decoded};

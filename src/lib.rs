//! Request/reply framing over one shared network buffer for a sprinkler
//! controller.
//!
//! [`EtherCard`] accepts HTTP clients, reads each request into the shared
//! buffer, and sends the reply rendered over it with a
//! [`BufferFiller`](webutil_proto::BufferFiller). The same buffer carries NTP
//! request and answer frames. The network stack itself sits behind the
//! [`transport`] traits, so the crate runs unchanged against a W5100 driver,
//! an embassy-net socket, or a test mock.
//!
//! Everything is polled: [`EtherCard::packet_loop`] and
//! [`EtherCard::ntp_process_answer`] return `Poll::Pending` when there is
//! nothing to do yet and never wait.
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Log through `defmt` instead of the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod buffer;
pub mod config;
pub mod ether;
pub mod transport;

pub use buffer::{take_buffer, EtherBuffer};
pub use config::{
    Ipv4Addr, MacAddr, NetConfig, ETHER_BUFFER_SIZE, HTTP_PORT, REPLY_LINGER_MS, TCP_OFFSET,
};
pub use ether::{EtherCard, EtherError};
pub use transport::{NetInterface, TcpClient, TcpServer, TransportError, UdpSocket};
pub use webutil_proto;

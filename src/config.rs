//! Compile-time sizes and the runtime network address state.

use webutil_proto::{IP_LEN, MAC_LEN};

pub use webutil_proto::ntp::{NTP_PACKET_SIZE, NTP_PORT, TIMESTAMP_OFFSET};

/// Capacity of the shared network buffer. Raising it costs RAM one-for-one.
pub const ETHER_BUFFER_SIZE: usize = 1100;

/// Bytes reserved at the start of the buffer in front of request and reply
/// text. They hold a space so the request line reads like `" GET /..."`.
pub const TCP_OFFSET: usize = 1;

/// Default HTTP listen port.
pub const HTTP_PORT: u16 = 80;

/// How long to keep a connection open after the reply was written.
pub const REPLY_LINGER_MS: u32 = 1;

/// IPv4 address bytes.
pub type Ipv4Addr = [u8; IP_LEN];

/// MAC address bytes.
pub type MacAddr = [u8; MAC_LEN];

/// Addresses in use by the network interface.
///
/// `mac` is set by [`EtherCard::begin`](crate::EtherCard::begin); the rest is
/// read back from the interface after static or DHCP setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetConfig {
    pub mac: MacAddr,
    pub ip: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub dns: Ipv4Addr,
    /// Port of the HTTP listener.
    pub http_port: u16,
}

impl NetConfig {
    /// All-zero addresses on the default HTTP port.
    pub const fn new() -> Self {
        Self {
            mac: [0; MAC_LEN],
            ip: [0; IP_LEN],
            mask: [0; IP_LEN],
            gateway: [0; IP_LEN],
            dns: [0; IP_LEN],
            http_port: HTTP_PORT,
        }
    }
}

impl Default for NetConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NetConfig::default();
        assert_eq!(config.http_port, 80);
        assert_eq!(config.ip, [0; 4]);
        assert_eq!(config, NetConfig::new());
    }

    #[test]
    fn test_reply_region_fits_buffer() {
        assert!(TCP_OFFSET < ETHER_BUFFER_SIZE);
        assert!(NTP_PACKET_SIZE <= ETHER_BUFFER_SIZE);
    }
}

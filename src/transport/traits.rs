use embedded_io::ErrorKind;

use crate::config::{Ipv4Addr, MacAddr};

/// Error type for transport operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Network controller or socket I/O error.
    Io,
    /// No link, no lease, or no peer on the socket.
    NotConnected,
    /// Peer closed or reset the connection.
    Closed,
}

impl TransportError {
    /// Map an `embedded-io` error from a client socket.
    pub fn from_io<E: embedded_io::Error>(err: E) -> Self {
        match err.kind() {
            ErrorKind::NotConnected => Self::NotConnected,
            ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe => {
                Self::Closed
            }
            _ => Self::Io,
        }
    }
}

/// Network interface bring-up and address readback.
pub trait NetInterface {
    /// Configure fixed addresses.
    fn begin_static(
        &mut self,
        mac: &MacAddr,
        ip: &Ipv4Addr,
        dns: &Ipv4Addr,
        gateway: &Ipv4Addr,
    ) -> Result<(), TransportError>;

    /// Obtain addresses from a DHCP server.
    ///
    /// Returns [`TransportError::NotConnected`] if no lease was obtained.
    fn begin_dhcp(&mut self, mac: &MacAddr, hostname: &str) -> Result<(), TransportError>;

    fn local_ip(&self) -> Ipv4Addr;
    fn gateway_ip(&self) -> Ipv4Addr;
    fn dns_server_ip(&self) -> Ipv4Addr;
    fn subnet_mask(&self) -> Ipv4Addr;
}

/// Listening TCP socket.
///
/// All methods return immediately; nothing here waits for the network.
pub trait TcpServer {
    type Client: TcpClient;

    /// Start listening.
    fn begin(&mut self) -> Result<(), TransportError>;

    /// Take a client with pending data, if there is one.
    fn available(&mut self) -> Option<Self::Client>;
}

/// Accepted TCP connection.
///
/// Replies go out through [`embedded_io::Write`].
pub trait TcpClient: embedded_io::Write {
    /// Whether the peer is still connected (or unread data remains).
    fn connected(&self) -> bool;

    /// Number of bytes that can be read without waiting.
    fn available(&self) -> usize;

    /// Read one byte if one is ready.
    fn read_byte(&mut self) -> Option<u8>;

    /// Close the connection.
    fn stop(&mut self);
}

/// UDP socket with packet framing.
pub trait UdpSocket {
    /// Bind the local port.
    fn begin(&mut self, port: u16) -> Result<(), TransportError>;

    /// Start a datagram to `ip:port`.
    fn begin_packet(&mut self, ip: Ipv4Addr, port: u16) -> Result<(), TransportError>;

    /// Append to the datagram started by [`begin_packet`](Self::begin_packet).
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError>;

    /// Send the datagram.
    fn end_packet(&mut self) -> Result<(), TransportError>;

    /// Check for an incoming datagram and return its size, 0 if none.
    fn parse_packet(&mut self) -> usize;

    /// Read from the current datagram into `buf`; returns the bytes read.
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Source address of the current datagram.
    fn remote_ip(&self) -> Ipv4Addr;

    /// Source port of the current datagram.
    fn remote_port(&self) -> u16;
}

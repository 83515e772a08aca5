use core::task::Poll;

use embedded_hal::delay::DelayNs;
use embedded_io::Write as _;
use webutil_proto::{cstr_len, ntp, BufferFiller};

use crate::buffer::EtherBuffer;
use crate::config::{
    Ipv4Addr, MacAddr, NetConfig, ETHER_BUFFER_SIZE, NTP_PORT, REPLY_LINGER_MS, TCP_OFFSET,
};
use crate::transport::{NetInterface, TcpClient, TcpServer, TransportError, UdpSocket};

/// Error type for request/reply operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EtherError {
    /// Error from the network transport.
    Transport(TransportError),
    /// Error from framing or formatting.
    Codec(webutil_proto::Error),
    /// Reply attempted with no client to send it to.
    NotConnected,
}

impl From<TransportError> for EtherError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}

impl From<webutil_proto::Error> for EtherError {
    fn from(err: webutil_proto::Error) -> Self {
        Self::Codec(err)
    }
}

/// HTTP server and NTP client sharing one network buffer.
///
/// Requests are read into the buffer by [`packet_loop`](Self::packet_loop),
/// the reply is rendered over the request with [`bfill`](Self::bfill), and
/// [`http_server_reply`](Self::http_server_reply) sends it and closes the
/// connection. NTP uses the same buffer for its request and answer frames.
///
/// One request/reply cycle is in flight at a time. The buffer is borrowed
/// exclusively for the life of this value.
pub struct EtherCard<'b, S: TcpServer, U, D> {
    config: NetConfig,
    buffer: &'b mut EtherBuffer,
    server: S,
    udp: U,
    delay: D,
    client: Option<S::Client>,
    ntp_server: Option<Ipv4Addr>,
    request_len: usize,
}

impl<'b, S, U, D> EtherCard<'b, S, U, D>
where
    S: TcpServer,
    U: UdpSocket,
    D: DelayNs,
{
    /// Create an idle instance over `buffer`.
    pub fn new(buffer: &'b mut EtherBuffer, server: S, udp: U, delay: D) -> Self {
        Self {
            config: NetConfig::new(),
            buffer,
            server,
            udp,
            delay,
            client: None,
            ntp_server: None,
            request_len: 0,
        }
    }

    /// Record the MAC address used by the setup calls.
    pub fn begin(&mut self, mac: MacAddr) {
        self.config.mac = mac;
    }

    /// Bring the interface up with fixed addresses and start listening.
    pub fn static_setup<I: NetInterface>(
        &mut self,
        iface: &mut I,
        ip: Ipv4Addr,
        gateway: Ipv4Addr,
        dns: Ipv4Addr,
    ) -> Result<(), EtherError> {
        iface.begin_static(&self.config.mac, &ip, &dns, &gateway)?;
        self.listen(iface)
    }

    /// Bring the interface up over DHCP and start listening.
    pub fn dhcp_setup<I: NetInterface>(
        &mut self,
        iface: &mut I,
        hostname: &str,
    ) -> Result<(), EtherError> {
        if let Err(e) = iface.begin_dhcp(&self.config.mac, hostname) {
            warn!("DHCP failed: {:?}", e);
            return Err(e.into());
        }
        self.listen(iface)
    }

    fn listen<I: NetInterface>(&mut self, iface: &I) -> Result<(), EtherError> {
        self.server.begin()?;
        self.config.ip = iface.local_ip();
        self.config.gateway = iface.gateway_ip();
        self.config.dns = iface.dns_server_ip();
        self.config.mask = iface.subnet_mask();

        let ip = self.config.ip;
        info!("Listening on {}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3]);
        Ok(())
    }

    /// Current addresses.
    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    /// Accept a pending client and read its request into the buffer.
    ///
    /// Returns `Poll::Ready(TCP_OFFSET)`, the offset of the request text in
    /// the buffer, when a client was accepted, and `Poll::Pending` when
    /// nobody is waiting. The buffer is cleared and reading stops when the
    /// client disconnects or after a fixed number of polls, whichever comes
    /// first. The last buffer byte is never filled so a reply can always be
    /// terminated.
    pub fn packet_loop(&mut self) -> Poll<usize> {
        let Some(mut client) = self.server.available() else {
            return Poll::Pending;
        };

        if let Some(mut stale) = self.client.take() {
            warn!("Dropping client that was never answered");
            stale.stop();
        }

        self.buffer.fill(0);
        self.buffer[..TCP_OFFSET].fill(b' ');

        let mut len = TCP_OFFSET;
        for _ in TCP_OFFSET..ETHER_BUFFER_SIZE - 1 {
            if !client.connected() {
                break;
            }
            if client.available() == 0 {
                continue;
            }
            if let Some(byte) = client.read_byte() {
                self.buffer[len] = byte;
                len += 1;
            }
        }

        self.request_len = len - TCP_OFFSET;
        self.client = Some(client);
        debug!("Request read: {} bytes", self.request_len);
        Poll::Ready(TCP_OFFSET)
    }

    /// Text of the last request read by [`packet_loop`](Self::packet_loop).
    pub fn request(&self) -> &[u8] {
        &self.buffer[TCP_OFFSET..TCP_OFFSET + self.request_len]
    }

    /// Whether a client is waiting for a reply.
    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Start a reply.
    ///
    /// The filler writes over the request text, starting after the TCP
    /// offset. It stops one byte short of the buffer end, which leaves room
    /// for the terminator added by [`http_server_reply`](Self::http_server_reply).
    pub fn bfill(&mut self) -> BufferFiller<'_> {
        BufferFiller::new(&mut self.buffer[TCP_OFFSET..ETHER_BUFFER_SIZE - 1])
    }

    /// Send the `len` bytes rendered by [`bfill`](Self::bfill) and close the
    /// connection.
    ///
    /// The text is terminated at `len` and sent up to its first NUL. After
    /// writing, the connection lingers for [`REPLY_LINGER_MS`] so the peer
    /// can finish reading, then it is closed. The connection is closed even
    /// when the write fails.
    pub fn http_server_reply(&mut self, len: usize) -> Result<(), EtherError> {
        let end = TCP_OFFSET
            .checked_add(len)
            .filter(|&end| end < ETHER_BUFFER_SIZE)
            .ok_or(webutil_proto::Error::BufferOverflow)?;
        let Some(mut client) = self.client.take() else {
            warn!("Reply without a client");
            return Err(EtherError::NotConnected);
        };

        self.buffer[end] = 0;
        let reply = &self.buffer[TCP_OFFSET..];
        let reply = &reply[..cstr_len(reply)];

        let sent = client
            .write_all(reply)
            .and_then(|()| client.flush())
            .map_err(TransportError::from_io);

        self.delay.delay_ms(REPLY_LINGER_MS);
        client.stop();

        match sent {
            Ok(()) => {
                trace!("Reply sent: {} bytes", reply.len());
                Ok(())
            }
            Err(e) => {
                error!("Reply failed: {:?}", e);
                Err(e.into())
            }
        }
    }

    /// Send an NTP request to `server`, from local port `src_port`.
    ///
    /// The whole buffer is cleared to build the frame. Short socket writes
    /// are retried until the full frame is queued; a write that accepts
    /// nothing fails with [`TransportError::Io`].
    pub fn ntp_request(&mut self, server: Ipv4Addr, src_port: u16) -> Result<(), EtherError> {
        self.udp.begin(src_port)?;

        let len = ntp::write_request(&mut self.buffer[..])?;
        self.ntp_server = Some(server);

        self.udp.begin_packet(server, NTP_PORT)?;
        let mut written = 0;
        while written < len {
            let n = self.udp.write(&self.buffer[written..len])?;
            if n == 0 {
                warn!("NTP request stalled after {} of {} bytes", written, len);
                return Err(TransportError::Io.into());
            }
            written += n;
        }
        self.udp.end_packet()?;

        debug!(
            "NTP request to {}.{}.{}.{}",
            server[0], server[1], server[2], server[3]
        );
        Ok(())
    }

    /// Check for the answer to the last NTP request.
    ///
    /// Returns the transmit timestamp in NTP seconds. `Poll::Pending` means no
    /// datagram arrived, or one arrived from somewhere other than port 123 of
    /// the server last asked. A datagram too short to hold a timestamp is an
    /// error.
    pub fn ntp_process_answer(&mut self) -> Poll<Result<u32, EtherError>> {
        let size = self.udp.parse_packet();
        if size == 0 {
            return Poll::Pending;
        }

        let from_server = Some(self.udp.remote_ip()) == self.ntp_server;
        if self.udp.remote_port() != NTP_PORT || !from_server {
            trace!("Ignoring datagram from port {}", self.udp.remote_port());
            return Poll::Pending;
        }

        let read = self.udp.read(&mut self.buffer[..size.min(ETHER_BUFFER_SIZE)]);
        match ntp::read_timestamp(&self.buffer[..read]) {
            Ok(seconds) => {
                info!("NTP time {}", seconds);
                Poll::Ready(Ok(seconds))
            }
            Err(e) => {
                warn!("Short NTP answer: {} bytes", read);
                Poll::Ready(Err(e.into()))
            }
        }
    }

    /// The whole shared buffer.
    pub fn buffer(&self) -> &EtherBuffer {
        &*self.buffer
    }

    /// Get a reference to the TCP server.
    pub fn server(&self) -> &S {
        &self.server
    }

    /// Get a reference to the UDP socket.
    pub fn udp(&self) -> &U {
        &self.udp
    }

    /// Decompose into the buffer and transports.
    pub fn into_parts(self) -> (&'b mut EtherBuffer, S, U, D) {
        (self.buffer, self.server, self.udp, self.delay)
    }
}

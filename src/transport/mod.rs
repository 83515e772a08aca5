mod traits;

pub use traits::{NetInterface, TcpClient, TcpServer, TransportError, UdpSocket};

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Configuration for the [`crate::ApiServer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiConfig {
    /// The socket the server listens on.
    pub socket: SocketAddr,
}

impl ApiConfig {
    /// The default listen port.
    pub const DEFAULT_PORT: u16 = 8000;

    /// Creates a new [`ApiConfig`] listening on `addr:port`.
    pub const fn new(addr: IpAddr, port: u16) -> Self {
        Self { socket: SocketAddr::new(addr, port) }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), Self::DEFAULT_PORT)
    }
}

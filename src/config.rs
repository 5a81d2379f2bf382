use std::net::{Ipv4Addr, SocketAddr};

/// Port the server listens on when started from the command line.
pub const DEFAULT_PORT: u16 = 20443;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub listen_addr: SocketAddr,
}

impl Default for Config {
    /// All interfaces, port 20443.
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
        }
    }
}

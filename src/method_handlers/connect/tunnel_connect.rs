use std::{io, net::SocketAddr};

use tokio::net::TcpStream;
use tracing::trace;

use crate::protocol::SocksSocketAddr;

use super::Connect;

/// Dials the destination over plain TCP, resolving domain names through the system resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct TunnelConnect;

impl Connect for TunnelConnect {
    type ServerConnection = TcpStream;

    async fn establish_connection(&mut self, destination: &SocksSocketAddr) -> io::Result<TcpStream> {
        let target = destination.to_string();
        trace!("Dialing {}", target);
        TcpStream::connect(target).await
    }

    fn bound_addr(&self, connection: &TcpStream) -> io::Result<SocketAddr> {
        connection.local_addr()
    }
}

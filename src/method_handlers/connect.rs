use std::{future::Future, io, net::SocketAddr};

use tokio::io::{AsyncRead, AsyncWrite};

pub mod tunnel_connect;

use crate::protocol::SocksSocketAddr;

/// The `Connect` trait is the outbound side of a CONNECT request: it opens a reliable,
/// ordered, full-duplex byte stream to the requested destination.
///
/// The session only needs to read, write and drop the returned connection, plus the
/// local address it reports back to the client as BND.ADDR/BND.PORT.
pub trait Connect {
    /// The stream the relay copies bytes to and from.
    type ServerConnection: AsyncRead + AsyncWrite + Send + Unpin + 'static;

    /// Opens a connection to `destination`. No timeout is applied.
    fn establish_connection(
        &mut self,
        destination: &SocksSocketAddr,
    ) -> impl Future<Output = io::Result<Self::ServerConnection>> + Send;

    /// Local address of an established connection.
    fn bound_addr(&self, connection: &Self::ServerConnection) -> io::Result<SocketAddr>;
}

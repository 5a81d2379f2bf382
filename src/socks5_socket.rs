use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, instrument, trace, warn};

use crate::{
    method_handlers::Connect,
    protocol::{Command, ConnectReply, Greeting, MethodSelection, Request, SocksSocketAddr},
    relay::relay,
    Socks5Error,
};

/// Where a session is in the handshake. Transitions only move forward; any state may
/// jump straight to `Closed` on error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionState {
    AwaitGreeting,
    AwaitRequest,
    Resolving,
    Dialing,
    Relaying,
    Closed,
}

/// One accepted client connection.
///
/// Owns the client stream for its whole lifetime. The destination stream only exists once
/// the dial succeeds, and both are dropped when [`Socks5Socket::run`] returns.
pub struct Socks5Socket<T, C> {
    inner: T,
    connect_handler: C,
    state: SessionState,
}

impl<T, C> Socks5Socket<T, C>
where
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    C: Connect,
{
    pub fn new(inner: T, connect_handler: C) -> Self {
        Self {
            inner,
            connect_handler,
            state: SessionState::AwaitGreeting,
        }
    }

    /// Drives the session from greeting to the end of the relay.
    ///
    /// Malformed input closes the connection without a reply. A failed dial is answered
    /// with a general failure reply before closing. BIND and UDP ASSOCIATE get no reply.
    #[instrument(skip_all)]
    pub async fn run(mut self) -> crate::Result<()> {
        let server = match self.handshake().await {
            Ok(Some(server)) => server,
            Ok(None) => {
                self.transition(SessionState::Closed);
                return Ok(());
            }
            Err(err) => {
                debug!("Session aborted in {:?}: {}", self.state, err);
                self.transition(SessionState::Closed);
                return Err(err);
            }
        };

        self.transition(SessionState::Relaying);
        let result = relay(self.inner, server).await;
        match &result {
            Ok(report) => debug!(
                "Relay finished: {} bytes sent, {} bytes received",
                report.client_to_server, report.server_to_client
            ),
            Err(err) => debug!("Relay finished with error: {}", err),
        }
        result.map(|_| ())
    }

    /// Runs everything up to and including the CONNECT reply. `None` means the request
    /// was a command this server does not implement.
    async fn handshake(&mut self) -> crate::Result<Option<C::ServerConnection>> {
        let greeting = Greeting::read_from(&mut self.inner).await?;
        debug!("Client offered {:?}", greeting.methods);
        MethodSelection::NO_AUTH.write_to(&mut self.inner).await?;

        self.transition(SessionState::AwaitRequest);
        let request = Request::read_from(&mut self.inner).await?;

        match request.command {
            Command::Connect => self.connect(request.destination).await.map(Some),
            Command::Bind | Command::UdpAssociate => {
                warn!(
                    "{:?} to {} is not implemented, closing",
                    request.command, request.destination
                );
                Ok(None)
            }
        }
    }

    async fn connect(&mut self, destination: SocksSocketAddr) -> crate::Result<C::ServerConnection> {
        self.transition(SessionState::Resolving);
        debug!("CONNECT to {}", destination);

        self.transition(SessionState::Dialing);
        let dialed = self
            .connect_handler
            .establish_connection(&destination)
            .await
            .and_then(|server| {
                let bound = self.connect_handler.bound_addr(&server)?;
                Ok((server, bound))
            });

        // The reply code comes from this dial attempt only.
        let (server, bound) = match dialed {
            Ok(dialed) => dialed,
            Err(err) => {
                if let Err(write_err) = ConnectReply::failed().write_to(&mut self.inner).await {
                    trace!("Failure reply not delivered: {}", write_err);
                }
                return Err(Socks5Error::Dial(err));
            }
        };

        debug!("Connection established with {} from {}", destination, bound);
        ConnectReply::succeeded(bound)
            .write_to(&mut self.inner)
            .await?;

        Ok(server)
    }

    fn transition(&mut self, next: SessionState) {
        trace!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

use std::{io, net::SocketAddr};

use tokio::net::TcpListener;
use tracing::{debug, info, span, warn, Instrument, Level};

use crate::{
    config::Config,
    method_handlers::{Connect, TunnelConnect},
    Socks5Socket,
};

/// Accept loop spawning one [`Socks5Socket`] task per client.
pub struct Server<C = TunnelConnect> {
    listener: TcpListener,
    connect_handler: C,
}

impl Server<TunnelConnect> {
    pub async fn bind(config: &Config) -> io::Result<Self> {
        let listener = TcpListener::bind(config.listen_addr).await?;
        Ok(Self::new(listener, TunnelConnect))
    }
}

impl<C> Server<C>
where
    C: Connect + Clone + Send + 'static,
{
    pub fn new(listener: TcpListener, connect_handler: C) -> Self {
        Self {
            listener,
            connect_handler,
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs forever. A failed accept is logged and skipped; a failed session only ends
    /// its own task.
    pub async fn run(self) {
        if let Ok(addr) = self.local_addr() {
            info!("Serving SOCKS5 on {}", addr);
        }

        loop {
            let (client, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    warn!("Failed to accept connection: {}", err);
                    continue;
                }
            };
            debug!("Received connection from: {}", addr);

            let connection = span!(Level::INFO, "connection", %addr);
            let session = Socks5Socket::new(client, self.connect_handler.clone());
            tokio::spawn(
                async move {
                    if let Err(err) = session.run().await {
                        warn!("Failed connection: {}", err);
                    }
                }
                .instrument(connection),
            );
        }
    }
}

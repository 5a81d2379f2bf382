//! Duplex relay between the client and the destination.
//!
//! Each direction runs as its own task and reports exactly one [`RelayOutcome`] into a
//! two-slot channel. The session is over once both outcomes are in; a finished direction
//! never cancels the surviving one.

use std::io;

use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    sync::mpsc,
};
use tracing::{debug, trace};

use crate::Socks5Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ClientToServer,
    ServerToClient,
}

/// What one copy task reports when it stops.
#[derive(Debug)]
pub struct RelayOutcome {
    pub direction: Direction,
    pub result: io::Result<u64>,
}

/// Bytes copied in each direction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RelayReport {
    pub client_to_server: u64,
    pub server_to_client: u64,
}

impl RelayReport {
    fn record(&mut self, direction: Direction, copied: u64) {
        match direction {
            Direction::ClientToServer => self.client_to_server = copied,
            Direction::ServerToClient => self.server_to_client = copied,
        }
    }
}

/// Copies bytes between `client` and `server` until both directions have stopped.
///
/// Both streams are dropped (closed) before this returns. If either direction failed,
/// the first failure is returned once the other direction has also reported.
pub async fn relay<C, S>(client: C, server: S) -> crate::Result<RelayReport>
where
    C: AsyncRead + AsyncWrite + Send + 'static,
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (client_read, client_write) = tokio::io::split(client);
    let (server_read, server_write) = tokio::io::split(server);

    let (outcomes, mut completions) = mpsc::channel(2);
    tokio::spawn(pipe(
        Direction::ClientToServer,
        client_read,
        server_write,
        outcomes.clone(),
    ));
    tokio::spawn(pipe(
        Direction::ServerToClient,
        server_read,
        client_write,
        outcomes,
    ));

    let mut report = RelayReport::default();
    let mut failure = None;
    for _ in 0..2 {
        // A closed channel means a copy task went away without reporting.
        let Some(outcome) = completions.recv().await else {
            break;
        };
        match outcome.result {
            Ok(copied) => {
                trace!("{:?} finished after {} bytes", outcome.direction, copied);
                report.record(outcome.direction, copied);
            }
            Err(err) => {
                debug!("{:?} failed: {}", outcome.direction, err);
                failure.get_or_insert(err);
            }
        }
    }

    match failure {
        Some(err) => Err(Socks5Error::Relay(err)),
        None => Ok(report),
    }
}

async fn pipe<R, W>(
    direction: Direction,
    mut reader: R,
    mut writer: W,
    outcomes: mpsc::Sender<RelayOutcome>,
) where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let result = tokio::io::copy(&mut reader, &mut writer).await;

    // Propagate the half-close so the peer sees end-of-stream.
    if result.is_ok() {
        if let Err(err) = writer.shutdown().await {
            trace!("{:?} shutdown after EOF failed: {}", direction, err);
        }
    }

    // Capacity covers both producers; only a dropped receiver makes this fail.
    let _ = outcomes.try_send(RelayOutcome { direction, result });
}

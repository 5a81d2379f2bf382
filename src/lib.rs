//! # socksd
//!
//! A minimal asynchronous SOCKS5 proxy server (RFC 1928 subset).
//!
//! ## Protocol Flow
//!
//! 1. **Greeting**: The client sends the authentication methods it supports. The server
//!    always answers with "no authentication required".
//! 2. **Request**: The client asks for a destination, given as an IPv4 address or a domain
//!    name plus a port. Only CONNECT is serviced; BIND and UDP ASSOCIATE are read but get
//!    no reply, and IPv6 destinations close the connection.
//! 3. **Dial**: The server opens a TCP connection to the destination and reports the local
//!    end of that connection back to the client, or a general failure if the dial failed.
//! 4. **Relay**: Bytes are copied in both directions until both directions have finished.
//!
//! No timeouts are applied anywhere: a silent peer or an unreachable destination keeps
//! its session alive until the operating system gives up.
//!
//! ## Examples
//!
//! ```no_run
//! use socksd::{Config, Server};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let server = Server::bind(&Config::default()).await?;
//!     server.run().await;
//!     Ok(())
//! }
//! ```

use std::io;

pub mod config;
pub mod method_handlers;
pub mod protocol;
pub mod relay;
mod server;
mod socks5_socket;

pub use config::Config;
pub use protocol::ProtocolError;
pub use server::Server;
pub use socks5_socket::Socks5Socket;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Socks5Error>;

#[derive(Error, Debug)]
pub enum Socks5Error {
    #[error("Socks protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("Failed to reach destination: {0}")]
    Dial(#[source] io::Error),
    #[error("Relay failed: {0}")]
    Relay(#[source] io::Error),
    #[error("Error in network operation: {0}")]
    Io(#[from] io::Error),
}

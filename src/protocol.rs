use thiserror::Error;

mod addr;
mod command;
mod greeting;
mod methods;
mod reply;
mod request;

pub use addr::Addr;
pub use addr::AddressType;
pub use addr::SocksSocketAddr;
pub use command::Command;
pub use greeting::{Greeting, MethodSelection};
pub use methods::AuthMethod;
pub use reply::{ConnectReply, Reply};
pub use request::Request;

pub const VERSION: u8 = 0x05;
pub const RESERVED: u8 = 0x00;

/// Malformed or unexpected bytes seen while parsing the greeting or the request.
///
/// Every variant aborts the session; the codec never tries to resynchronize.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unsupported protocol version {0:#04x}")]
    BadVersion(u8),
    #[error("greeting offers no authentication methods")]
    NoMethods,
    #[error("unknown command {0:#04x}")]
    BadCommand(u8),
    #[error("unsupported address type {0:#04x}")]
    BadAddressType(u8),
    #[error("domain name has zero length")]
    EmptyDomain,
}

pub(crate) fn check_version(version: u8) -> Result<(), ProtocolError> {
    if version == VERSION {
        Ok(())
    } else {
        Err(ProtocolError::BadVersion(version))
    }
}

use std::{
    io,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{check_version, AddressType, ProtocolError, RESERVED, VERSION};

/// REP codes this server sends. Every dial failure is a general failure.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Success = 0x00,
    GeneralFailure = 0x01,
}

impl Reply {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Reply::Success),
            0x01 => Some(Reply::GeneralFailure),
            _ => None,
        }
    }

    pub fn to_u8(&self) -> u8 {
        *self as u8
    }
}

/// Reply to a CONNECT request. Always IPv4-shaped:
///
/// ```text
/// +----+-----+-------+------+----------+----------+
/// |VER | REP |  RSV  | ATYP | BND.ADDR | BND.PORT |
/// +----+-----+-------+------+----------+----------+
/// | 1  |  1  | X'00' | X'01'|    4     |    2     |
/// +----+-----+-------+------+----------+----------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectReply {
    pub reply: Reply,
    pub bound: SocketAddrV4,
}

impl ConnectReply {
    pub const LEN: usize = 10;

    pub fn new(succeeded: bool, bound: SocketAddrV4) -> Self {
        let reply = if succeeded {
            Reply::Success
        } else {
            Reply::GeneralFailure
        };
        Self { reply, bound }
    }

    /// Success reply carrying the local end of the outbound connection.
    ///
    /// IPv4-mapped IPv6 addresses are unwrapped; any other IPv6 address is
    /// reported as `0.0.0.0` with its port kept.
    pub fn succeeded(bound: SocketAddr) -> Self {
        let bound = match bound {
            SocketAddr::V4(v4) => v4,
            SocketAddr::V6(v6) => SocketAddrV4::new(
                v6.ip().to_ipv4_mapped().unwrap_or(Ipv4Addr::UNSPECIFIED),
                v6.port(),
            ),
        };
        Self::new(true, bound)
    }

    /// General failure with zeroed bound fields.
    pub fn failed() -> Self {
        Self::new(false, SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0))
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut bytes = [0; Self::LEN];
        bytes[0] = VERSION;
        bytes[1] = self.reply.to_u8();
        bytes[2] = RESERVED;
        bytes[3] = AddressType::Ipv4.to_u8();
        bytes[4..8].copy_from_slice(&self.bound.ip().octets());
        bytes[8..].copy_from_slice(&self.bound.port().to_be_bytes());
        bytes
    }

    pub async fn write_to<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_all(&self.to_bytes()).await
    }

    pub async fn read_from<R>(reader: &mut R) -> crate::Result<Self>
    where
        R: AsyncRead + Unpin,
    {
        let mut bytes = [0; Self::LEN];
        reader.read_exact(&mut bytes).await?;

        check_version(bytes[0])?;
        let reply = Reply::from_u8(bytes[1]).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown reply code {:#04x}", bytes[1]),
            )
        })?;
        if bytes[3] != AddressType::Ipv4.to_u8() {
            return Err(ProtocolError::BadAddressType(bytes[3]).into());
        }

        let ip = Ipv4Addr::new(bytes[4], bytes[5], bytes[6], bytes[7]);
        let port = u16::from_be_bytes([bytes[8], bytes[9]]);

        Ok(Self {
            reply,
            bound: SocketAddrV4::new(ip, port),
        })
    }
}

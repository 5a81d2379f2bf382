use std::{fmt, io, net::Ipv4Addr};

use tokio::io::{AsyncRead, AsyncReadExt};

use super::ProtocolError;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    Ipv4 = 0x01,
    DomainName = 0x03,
}

impl AddressType {
    /// IPv6 (0x04) is deliberately absent: it is rejected like any unknown tag.
    pub fn from_u8(value: u8) -> Result<Self, ProtocolError> {
        match value {
            0x01 => Ok(AddressType::Ipv4),
            0x03 => Ok(AddressType::DomainName),
            _ => Err(ProtocolError::BadAddressType(value)),
        }
    }

    pub fn to_u8(&self) -> u8 {
        *self as u8
    }
}

/// Destination of a CONNECT request: ATYP + DST.ADDR + DST.PORT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocksSocketAddr {
    pub port: u16,
    pub addr: Addr,
}

impl SocksSocketAddr {
    pub fn new(addr: Addr, port: u16) -> Self {
        Self { port, addr }
    }

    /// Reads ATYP, the address and the big-endian port.
    pub async fn read<R>(reader: &mut R) -> crate::Result<Self>
    where
        R: AsyncRead + Unpin,
    {
        let addr_type = AddressType::from_u8(reader.read_u8().await?)?;

        let addr = match addr_type {
            AddressType::Ipv4 => {
                let mut octets = [0; 4];
                reader.read_exact(&mut octets).await?;
                Addr::Ipv4(Ipv4Addr::from(octets))
            }
            AddressType::DomainName => {
                let len = reader.read_u8().await?;
                if len == 0 {
                    return Err(ProtocolError::EmptyDomain.into());
                }
                let mut domain = vec![0; len as usize];
                reader.read_exact(&mut domain).await?;
                // Invalid UTF-8 survives as replacement characters and fails to resolve.
                Addr::Domain(String::from_utf8_lossy(&domain).into_owned())
            }
        };

        let port = reader.read_u16().await?;

        Ok(Self { port, addr })
    }

    /// Turns `Self` into: AddrType+ADDR+PORT
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(7);

        bytes.push(self.addr.addr_type().to_u8());

        match &self.addr {
            Addr::Ipv4(addr) => bytes.extend_from_slice(&addr.octets()[..]),
            Addr::Domain(domain) => {
                let len = u8::try_from(domain.len())
                    .ok()
                    .filter(|len| *len > 0)
                    .ok_or_else(|| {
                        io::Error::new(
                            io::ErrorKind::InvalidInput,
                            "domain name must be 1 to 255 bytes long",
                        )
                    })?;
                bytes.push(len);
                bytes.extend_from_slice(domain.as_bytes())
            }
        }
        bytes.extend_from_slice(&self.port.to_be_bytes());

        Ok(bytes)
    }
}

/// Formats the dial target: `a.b.c.d:port` or `name:port`.
impl fmt::Display for SocksSocketAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.addr {
            Addr::Ipv4(addr) => write!(f, "{}:{}", addr, self.port),
            Addr::Domain(domain) => write!(f, "{}:{}", domain, self.port),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addr {
    Ipv4(Ipv4Addr),
    Domain(String),
}

impl Addr {
    pub fn addr_type(&self) -> AddressType {
        match self {
            Addr::Ipv4(_) => AddressType::Ipv4,
            Addr::Domain(_) => AddressType::DomainName,
        }
    }
}

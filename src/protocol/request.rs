use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{check_version, Command, SocksSocketAddr, RESERVED, VERSION};

/// SOCKS request sent once the method negotiation is done.
///
/// ```text
/// +----+-----+-------+------+----------+----------+
/// |VER | CMD |  RSV  | ATYP | DST.ADDR | DST.PORT |
/// +----+-----+-------+------+----------+----------+
/// | 1  |  1  | X'00' |  1   | Variable |    2     |
/// +----+-----+-------+------+----------+----------+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub command: Command,
    pub destination: SocksSocketAddr,
}

impl Request {
    pub fn connect(destination: SocksSocketAddr) -> Self {
        Self {
            command: Command::Connect,
            destination,
        }
    }

    pub async fn read_from<R>(reader: &mut R) -> crate::Result<Self>
    where
        R: AsyncRead + Unpin,
    {
        let mut header = [0; 3];
        reader.read_exact(&mut header).await?;

        check_version(header[0])?;
        let command = Command::from_u8(header[1])?;
        // RSV is not checked.

        let destination = SocksSocketAddr::read(reader).await?;

        Ok(Self {
            command,
            destination,
        })
    }

    pub async fn write_to<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut bytes = vec![VERSION, self.command.to_u8(), RESERVED];
        bytes.extend(self.destination.to_bytes()?);
        writer.write_all(&bytes).await
    }
}

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{check_version, AuthMethod, ProtocolError, VERSION};

/// Version identifier / method selection message sent by the client.
///
/// ```text
/// +----+----------+----------+
/// |VER | NMETHODS | METHODS  |
/// +----+----------+----------+
/// | 1  |    1     | 1 to 255 |
/// +----+----------+----------+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    pub methods: Vec<AuthMethod>,
}

impl Greeting {
    pub fn new(methods: Vec<AuthMethod>) -> Self {
        Self { methods }
    }

    pub async fn read_from<R>(reader: &mut R) -> crate::Result<Self>
    where
        R: AsyncRead + Unpin,
    {
        check_version(reader.read_u8().await?)?;

        let nmethods = reader.read_u8().await?;
        if nmethods == 0 {
            return Err(ProtocolError::NoMethods.into());
        }

        let mut methods = vec![0; nmethods as usize];
        reader.read_exact(&mut methods).await?;

        Ok(Self {
            methods: methods.into_iter().map(AuthMethod::from_u8).collect(),
        })
    }

    pub async fn write_to<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let nmethods = u8::try_from(self.methods.len()).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "too many authentication methods")
        })?;

        let mut bytes = Vec::with_capacity(2 + self.methods.len());
        bytes.push(VERSION);
        bytes.push(nmethods);
        bytes.extend(self.methods.iter().map(|method| method.to_u8()));
        writer.write_all(&bytes).await
    }
}

/// The server's METHOD selection message: `VER, METHOD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSelection {
    pub method: AuthMethod,
}

impl MethodSelection {
    /// The only selection this server makes.
    pub const NO_AUTH: MethodSelection = MethodSelection {
        method: AuthMethod::NoAuthRequired,
    };

    pub async fn write_to<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_all(&[VERSION, self.method.to_u8()]).await
    }

    pub async fn read_from<R>(reader: &mut R) -> crate::Result<Self>
    where
        R: AsyncRead + Unpin,
    {
        check_version(reader.read_u8().await?)?;
        let method = AuthMethod::from_u8(reader.read_u8().await?);
        Ok(Self { method })
    }
}

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};

use tracing::info;

use crate::connection::RpcConnection;
use crate::error::Result;

/// Connection over a connected TCP socket.
///
/// Both stream ends are clones of the same socket; `close` shuts the
/// socket down in both directions, after which reads return EOF and
/// writes fail.
pub struct TcpConnection {
    stream: TcpStream,
}

impl TcpConnection {
    /// Wrap an already-connected socket.
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }

    /// Connect to `addr` and wrap the resulting socket.
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        Ok(Self::new(TcpStream::connect(addr)?))
    }
}

impl RpcConnection for TcpConnection {
    fn incoming(&mut self) -> Result<Box<dyn Read + Send>> {
        Ok(Box::new(self.stream.try_clone()?))
    }

    fn outgoing(&mut self) -> Result<Box<dyn Write + Send>> {
        Ok(Box::new(self.stream.try_clone()?))
    }

    fn close(&mut self) -> Result<()> {
        info!(peer = ?self.stream.peer_addr().ok(), "closing tcp connection");
        self.stream.shutdown(Shutdown::Both)?;
        Ok(())
    }
}

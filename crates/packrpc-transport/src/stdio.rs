use std::io::{Read, Write};

use tracing::info;

use crate::connection::RpcConnection;
use crate::error::Result;

/// Connection over the current process's standard streams.
///
/// Used when this process was itself spawned as an RPC peer by its parent.
/// Anything the process wants to log must go to stderr — stdout belongs to
/// the wire.
#[derive(Debug, Default)]
pub struct StdIoConnection;

impl StdIoConnection {
    pub fn new() -> Self {
        Self
    }
}

impl RpcConnection for StdIoConnection {
    fn incoming(&mut self) -> Result<Box<dyn Read + Send>> {
        Ok(Box::new(std::io::stdin()))
    }

    fn outgoing(&mut self) -> Result<Box<dyn Write + Send>> {
        Ok(Box::new(std::io::stdout()))
    }

    /// No-op: the process does not own its standard streams.
    fn close(&mut self) -> Result<()> {
        info!("closing stdio connection");
        Ok(())
    }
}

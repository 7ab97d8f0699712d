use std::io::{Read, Write};
use std::process::Child;

use tracing::info;

use crate::connection::RpcConnection;
use crate::error::{Result, TransportError};

/// Connection over a spawned child process's pipes.
///
/// The child must be spawned with `Stdio::piped()` on both stdin and
/// stdout; each pipe can be handed out exactly once. Optionally kills the
/// child when the connection is closed.
pub struct ProcessConnection {
    child: Child,
    kill_on_close: bool,
}

impl ProcessConnection {
    /// Wrap `child`; the child keeps running after `close`.
    pub fn new(child: Child) -> Self {
        Self::with_kill_on_close(child, false)
    }

    /// Wrap `child`, killing it on `close` if `kill_on_close` is set.
    pub fn with_kill_on_close(child: Child, kill_on_close: bool) -> Self {
        Self {
            child,
            kill_on_close,
        }
    }

    /// OS process id of the wrapped child.
    pub fn child_id(&self) -> u32 {
        self.child.id()
    }
}

impl RpcConnection for ProcessConnection {
    fn incoming(&mut self) -> Result<Box<dyn Read + Send>> {
        let stdout = self
            .child
            .stdout
            .take()
            .ok_or(TransportError::StreamUnavailable("child stdout"))?;
        Ok(Box::new(stdout))
    }

    fn outgoing(&mut self) -> Result<Box<dyn Write + Send>> {
        let stdin = self
            .child
            .stdin
            .take()
            .ok_or(TransportError::StreamUnavailable("child stdin"))?;
        Ok(Box::new(stdin))
    }

    fn close(&mut self) -> Result<()> {
        info!(kill = self.kill_on_close, "closing process connection");
        if self.kill_on_close {
            self.child.kill()?;
            // Reap the child so it does not linger as a zombie.
            let _ = self.child.wait();
        }
        Ok(())
    }
}

use std::io::{ErrorKind, Write};
use std::sync::{Mutex, MutexGuard};

use bytes::{BufMut, BytesMut};
use packrpc_message::Message;
use rmpv::encode::write_value;
use tracing::{debug, trace};

use crate::error::{ClientError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

type Output = Option<Box<dyn Write + Send>>;

/// Writes messages to the outgoing stream, one whole frame at a time.
///
/// Concurrent callers are serialized; a frame is never interleaved with
/// another caller's bytes.
pub struct RpcSender {
    output: Mutex<Output>,
}

impl RpcSender {
    /// Sender with no output attached yet.
    pub fn new() -> Self {
        Self {
            output: Mutex::new(None),
        }
    }

    /// Bind the destination stream. Replaces any previous attachment.
    pub fn attach(&self, output: Box<dyn Write + Send>) {
        *self.lock_output() = Some(output);
    }

    /// Serialize `message` to its wire shape and write the frame atomically.
    ///
    /// Fails with [`ClientError::NotAttached`] before [`attach`](Self::attach)
    /// or after [`stop`](Self::stop).
    pub fn send(&self, message: &Message) -> Result<()> {
        // Encode outside the lock; only the write itself is serialized.
        let mut staging = BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY).writer();
        write_value(&mut staging, &message.to_value())?;
        let frame = staging.into_inner();

        let mut guard = self.lock_output();
        let output = guard.as_mut().ok_or(ClientError::NotAttached)?;
        write_all_retrying(output.as_mut(), &frame)?;
        flush_retrying(output.as_mut())?;
        trace!(kind = ?message.kind(), bytes = frame.len(), "sent frame");
        Ok(())
    }

    /// Release the output stream. Idempotent; later `send` calls fail
    /// cleanly with [`ClientError::NotAttached`], so no partial frame can
    /// ever reach the wire.
    pub fn stop(&self) {
        if self.lock_output().take().is_some() {
            debug!("sender stopped");
        }
    }

    fn lock_output(&self) -> MutexGuard<'_, Output> {
        self.output
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RpcSender {
    fn default() -> Self {
        Self::new()
    }
}

fn write_all_retrying(output: &mut dyn Write, frame: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < frame.len() {
        match output.write(&frame[offset..]) {
            Ok(0) => return Err(ClientError::ConnectionClosed),
            Ok(written) => offset += written,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(ClientError::Io(err)),
        }
    }
    Ok(())
}

fn flush_retrying(output: &mut dyn Write) -> Result<()> {
    loop {
        match output.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(ClientError::Io(err)),
        }
    }
}

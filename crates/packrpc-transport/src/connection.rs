use std::io::{Read, Write};

use crate::error::Result;

/// A bidirectional byte-stream connection an RPC endpoint can attach to.
///
/// The two stream ends are handed out by ownership: the incoming end goes
/// to the decode loop, which becomes its only reader, and the outgoing end
/// goes to the sender. Adapters only know how to produce the ends and how
/// to close the underlying resource.
pub trait RpcConnection: Send {
    /// Readable end carrying the remote peer's frames.
    fn incoming(&mut self) -> Result<Box<dyn Read + Send>>;

    /// Writable end for frames going to the remote peer.
    fn outgoing(&mut self) -> Result<Box<dyn Write + Send>>;

    /// Close the underlying resource.
    ///
    /// What happens to stream ends already handed out is adapter-specific:
    /// a TCP shutdown cuts them off, killing a child process ends its
    /// pipes, closing stdio does nothing at all.
    fn close(&mut self) -> Result<()>;
}

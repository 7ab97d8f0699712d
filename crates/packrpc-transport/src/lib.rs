//! Byte-stream connection adapters.
//!
//! A connection is two independent stream ends and a close operation,
//! nothing more — no protocol knowledge lives here. Three adapters cover
//! the usual ways an RPC peer is reached:
//! - [`StdIoConnection`] — the current process's stdin/stdout
//! - [`ProcessConnection`] — the pipes of a spawned child process
//! - [`TcpConnection`] — a connected TCP socket

pub mod connection;
pub mod error;
pub mod process;
pub mod stdio;
pub mod tcp;

pub use connection::RpcConnection;
pub use error::{Result, TransportError};
pub use process::ProcessConnection;
pub use stdio::StdIoConnection;
pub use tcp::TcpConnection;

//! Array-framed MessagePack-RPC over byte streams.
//!
//! packrpc lets a process issue requests and await correlated responses,
//! receive asynchronous notifications, and answer requests initiated by
//! the remote peer — all concurrently, over a single stream (process
//! pipes, a TCP socket, or standard I/O).
//!
//! # Crate Structure
//!
//! - [`message`] — Wire message model and id generation
//! - [`transport`] — Connection adapters (stdio, child process, TCP)
//! - [`client`] — Sender, background listener and streamer
//! - [`RpcClient`] — Ready-made facade assembling the pieces

pub mod logging;
pub mod rpc_client;

/// Re-export message types.
pub mod message {
    pub use packrpc_message::*;
}

/// Re-export transport types.
pub mod transport {
    pub use packrpc_transport::*;
}

/// Re-export endpoint types.
pub mod client {
    pub use packrpc_client::*;
}

pub use rpc_client::{RpcClient, RpcClientBuilder};

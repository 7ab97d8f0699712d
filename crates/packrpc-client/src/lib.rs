//! RPC endpoint plumbing: sender, background listener and streamer.
//!
//! The [`RpcStreamer`] is the piece applications hold. It binds one
//! connection's streams to an [`RpcSender`] (outgoing frames, serialized
//! writes) and a [`BackgroundListener`] (a dedicated decode thread routing
//! incoming frames by kind), and stamps outgoing requests with generated
//! correlation ids.

pub mod error;
pub mod listener;
pub mod sender;
pub mod streamer;

pub use error::{ClientError, Result};
pub use listener::{
    BackgroundListener, ListenerState, NotificationCallback, RequestCallback,
};
pub use sender::RpcSender;
pub use streamer::RpcStreamer;

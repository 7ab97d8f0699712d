//! Message model for the packrpc wire protocol.
//!
//! Every frame on the wire is a MessagePack array whose first element is an
//! integer kind tag. Three kinds exist:
//! - `[0, id, method, args]` — a request expecting a correlated response
//! - `[1, id, error, result]` — the response matching a request id
//! - `[2, name, args]` — a one-way notification
//!
//! The types here are immutable value objects. Mutation happens in the
//! builders, which copy their staged state on every `build` call.

pub mod error;
pub mod id;
pub mod kind;
pub mod message;
pub mod notification;
pub mod request;
pub mod response;
pub mod rpc_error;
mod wire;

pub use error::{MessageError, Result};
pub use id::{IdGenerator, SequentialIdGenerator};
pub use kind::MessageKind;
pub use message::Message;
pub use notification::{NotificationBuilder, NotificationMessage};
pub use request::{RequestBuilder, RequestMessage};
pub use response::{ResponseBuilder, ResponseMessage};
pub use rpc_error::{RpcError, RpcErrorKind};

pub use rmpv::Value;

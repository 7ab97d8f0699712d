/// Errors raised by the sender, listener and streamer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The frame does not match the wire shape (protocol error).
    #[error("message error: {0}")]
    Message(#[from] packrpc_message::MessageError),

    /// Failed to obtain a stream end from the connection.
    #[error("transport error: {0}")]
    Transport(#[from] packrpc_transport::TransportError),

    /// An I/O error on the attached stream.
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// MessagePack encoding of an outgoing frame failed.
    #[error("encode error: {0}")]
    Encode(#[from] rmpv::encode::Error),

    /// MessagePack decoding of an incoming frame failed (malformed bytes
    /// or EOF in the middle of a frame).
    #[error("decode error: {0}")]
    Decode(#[from] rmpv::decode::Error),

    /// The stream closed while a frame was being written.
    #[error("connection closed mid-write")]
    ConnectionClosed,

    /// `send` was called with no output stream attached.
    #[error("sender is not attached to an output stream")]
    NotAttached,

    /// `start` was called on a listener that already ran.
    #[error("listener already started")]
    AlreadyStarted,
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur in connection adapters.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error on the underlying stream, socket or process.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested stream end cannot be handed out — already taken, or
    /// the child was spawned without piping it.
    #[error("{0} is not available")]
    StreamUnavailable(&'static str),
}

pub type Result<T> = std::result::Result<T, TransportError>;

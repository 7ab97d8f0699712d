/// Errors raised while converting wire values into messages.
///
/// All of these are protocol errors: the peer sent a frame that does not
/// match the wire shape. They are fatal to the decode loop that hit them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    /// The kind tag is an integer outside the known set {0, 1, 2}.
    #[error("unknown message kind {0}")]
    UnknownKind(u64),

    /// The frame is not a MessagePack array.
    #[error("frame is not an array")]
    NotAnArray,

    /// The frame array has the wrong number of elements for its kind.
    #[error("{kind} frame has {got} elements, expected {expected}")]
    WrongArity {
        kind: &'static str,
        expected: usize,
        got: usize,
    },

    /// A frame element could not be decoded as the expected type.
    #[error("invalid {0} field")]
    InvalidField(&'static str),
}

pub type Result<T> = std::result::Result<T, MessageError>;

use crate::error::{MessageError, Result};

/// Wire tag of a frame, always the first array element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Request,
    Response,
    Notification,
}

impl MessageKind {
    /// Decode a wire tag. Anything outside the closed set is a protocol
    /// error, never silently mapped to a known kind.
    pub fn from_wire(value: u64) -> Result<Self> {
        match value {
            0 => Ok(MessageKind::Request),
            1 => Ok(MessageKind::Response),
            2 => Ok(MessageKind::Notification),
            other => Err(MessageError::UnknownKind(other)),
        }
    }

    /// Integer representation used on the wire.
    pub fn as_wire(self) -> u64 {
        match self {
            MessageKind::Request => 0,
            MessageKind::Response => 1,
            MessageKind::Notification => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_wire_known_tags() {
        assert_eq!(MessageKind::from_wire(0).unwrap(), MessageKind::Request);
        assert_eq!(MessageKind::from_wire(1).unwrap(), MessageKind::Response);
        assert_eq!(
            MessageKind::from_wire(2).unwrap(),
            MessageKind::Notification
        );
    }

    #[test]
    fn from_wire_rejects_out_of_range() {
        let err = MessageKind::from_wire(27).unwrap_err();
        assert_eq!(err, MessageError::UnknownKind(27));
    }

    #[test]
    fn as_wire_roundtrip() {
        for kind in [
            MessageKind::Request,
            MessageKind::Response,
            MessageKind::Notification,
        ] {
            assert_eq!(MessageKind::from_wire(kind.as_wire()).unwrap(), kind);
        }
    }
}

use std::fmt;

use rmpv::Value;

use crate::error::{MessageError, Result};
use crate::kind::MessageKind;
use crate::notification::NotificationMessage;
use crate::request::RequestMessage;
use crate::response::ResponseMessage;

/// A decoded wire frame.
///
/// The kind set is closed by the protocol, so the one dispatch site in the
/// listener matches exhaustively on this enum.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Request(RequestMessage),
    Response(ResponseMessage),
    Notification(NotificationMessage),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Request(_) => MessageKind::Request,
            Message::Response(_) => MessageKind::Response,
            Message::Notification(_) => MessageKind::Notification,
        }
    }

    /// Encode to the array wire shape.
    pub fn to_value(&self) -> Value {
        match self {
            Message::Request(request) => request.to_value(),
            Message::Response(response) => response.to_value(),
            Message::Notification(notification) => notification.to_value(),
        }
    }

    /// Classify a decoded frame by its kind tag and convert it into the
    /// concrete message type.
    pub fn from_value(value: Value) -> Result<Message> {
        let elements = match value {
            Value::Array(elements) => elements,
            _ => return Err(MessageError::NotAnArray),
        };
        let kind = elements
            .first()
            .and_then(Value::as_u64)
            .ok_or(MessageError::InvalidField("kind"))?;
        match MessageKind::from_wire(kind)? {
            MessageKind::Request => {
                RequestMessage::from_elements(elements).map(Message::Request)
            }
            MessageKind::Response => {
                ResponseMessage::from_elements(elements).map(Message::Response)
            }
            MessageKind::Notification => {
                NotificationMessage::from_elements(elements).map(Message::Notification)
            }
        }
    }
}

impl From<RequestMessage> for Message {
    fn from(request: RequestMessage) -> Self {
        Message::Request(request)
    }
}

impl From<ResponseMessage> for Message {
    fn from(response: ResponseMessage) -> Self {
        Message::Response(response)
    }
}

impl From<NotificationMessage> for Message {
    fn from(notification: NotificationMessage) -> Self {
        Message::Notification(notification)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Request(request) => request.fmt(f),
            Message::Response(response) => response.fmt(f),
            Message::Notification(notification) => notification.fmt(f),
        }
    }
}

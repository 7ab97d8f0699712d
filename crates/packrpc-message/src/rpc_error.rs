use std::fmt;

use rmpv::Value;

use crate::error::{MessageError, Result};
use crate::wire;

/// Integer-coded category of an [`RpcError`].
///
/// Identity is purely the integer code; codes outside the well-known set
/// round-trip losslessly through [`RpcErrorKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcErrorKind {
    /// Code 0: the peer hit an unexpected failure handling the request.
    Exception,
    /// Code 1: the request itself was rejected as invalid.
    Validation,
    /// Any other non-negative code, application-defined.
    Other(u64),
}

impl RpcErrorKind {
    /// Canonical kind for a wire code. Codes 0 and 1 always map to the
    /// named variants, so derived equality matches code equality.
    pub fn from_code(code: u64) -> Self {
        match code {
            0 => RpcErrorKind::Exception,
            1 => RpcErrorKind::Validation,
            other => RpcErrorKind::Other(other),
        }
    }

    /// Integer representation used on the wire.
    pub fn code(self) -> u64 {
        match self {
            RpcErrorKind::Exception => 0,
            RpcErrorKind::Validation => 1,
            RpcErrorKind::Other(code) => code,
        }
    }
}

impl fmt::Display for RpcErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcErrorKind::Exception => write!(f, "exception"),
            RpcErrorKind::Validation => write!(f, "validation"),
            RpcErrorKind::Other(code) => write!(f, "error({code})"),
        }
    }
}

/// Application-level error carried inside a response.
///
/// This is not a fault of the transport itself; peers exchange these to
/// signal bad requests, bad payloads and similar conditions. Wire shape:
/// `[code, message]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    kind: RpcErrorKind,
    message: String,
}

impl RpcError {
    pub fn new(kind: RpcErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Error with the exception code (0).
    pub fn exception(message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::Exception, message)
    }

    /// Error with the validation code (1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::Validation, message)
    }

    /// Error with an application-defined code.
    pub fn other(code: u64, message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::from_code(code), message)
    }

    pub fn kind(&self) -> RpcErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn to_value(&self) -> Value {
        Value::Array(vec![
            Value::from(self.kind.code()),
            Value::from(self.message.as_str()),
        ])
    }

    pub(crate) fn from_value(value: Value) -> Result<Self> {
        let elements = wire::array_field(value, "error")?;
        wire::check_arity("error", 2, elements.len())?;
        let mut elements = elements.into_iter();
        let code = elements
            .next()
            .and_then(|code| code.as_u64())
            .ok_or(MessageError::InvalidField("error code"))?;
        let message = wire::string_field(
            elements.next().unwrap_or(Value::Nil),
            "error message",
        )?;
        Ok(Self::new(RpcErrorKind::from_code(code), message))
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_codes() {
        assert_eq!(RpcError::exception("boom").kind(), RpcErrorKind::Exception);
        assert_eq!(
            RpcError::validation("bad arg").kind(),
            RpcErrorKind::Validation
        );
        assert_eq!(RpcErrorKind::Exception.code(), 0);
        assert_eq!(RpcErrorKind::Validation.code(), 1);
    }

    #[test]
    fn identity_is_the_code_alone() {
        // `other` with a well-known code must compare equal to the named
        // constructor, regardless of message-independent variant paths.
        assert_eq!(
            RpcError::other(0, "x").kind(),
            RpcError::exception("y").kind()
        );
        assert_eq!(RpcErrorKind::from_code(0), RpcErrorKind::Exception);
        assert_eq!(RpcErrorKind::from_code(1), RpcErrorKind::Validation);
    }

    #[test]
    fn unknown_codes_roundtrip() {
        let error = RpcError::other(77, "custom");
        assert_eq!(error.kind(), RpcErrorKind::Other(77));
        assert_eq!(error.kind().code(), 77);

        let decoded = RpcError::from_value(error.to_value()).unwrap();
        assert_eq!(decoded, error);
    }

    #[test]
    fn wire_shape_is_code_then_message() {
        let value = RpcError::validation("nope").to_value();
        let Value::Array(elements) = value else {
            panic!("error must encode as an array");
        };
        assert_eq!(elements[0].as_u64(), Some(1));
        assert_eq!(elements[1].as_str(), Some("nope"));
    }

    #[test]
    fn malformed_error_values_rejected() {
        assert!(RpcError::from_value(Value::from("not an array")).is_err());
        assert!(RpcError::from_value(Value::Array(vec![Value::from(1)])).is_err());
        assert!(RpcError::from_value(Value::Array(vec![
            Value::from("code?"),
            Value::from("msg"),
        ]))
        .is_err());
    }

    #[test]
    fn display_names_the_kind() {
        assert_eq!(RpcError::exception("boom").to_string(), "exception: boom");
        assert_eq!(RpcError::other(9, "odd").to_string(), "error(9): odd");
    }
}

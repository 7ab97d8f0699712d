use std::fmt;

use rmpv::Value;

use crate::error::{MessageError, Result};
use crate::kind::MessageKind;
use crate::rpc_error::RpcError;
use crate::wire;

/// The answer to a request, correlated by id.
///
/// Wire shape: `[1, id, error, result]`, with `nil` standing in for an
/// absent error or result. Normally exactly one of the two is populated,
/// but the model does not enforce that; when both appear, error wins
/// ([`is_error`](ResponseMessage::is_error)).
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMessage {
    id: u32,
    error: Option<RpcError>,
    result: Option<Value>,
}

impl ResponseMessage {
    /// Start building a successful response carrying `result`.
    pub fn from_result(result: impl Into<Value>) -> ResponseBuilder {
        ResponseBuilder::from_result(result)
    }

    /// Start building an error response carrying `error`.
    pub fn from_error(error: RpcError) -> ResponseBuilder {
        ResponseBuilder::from_error(error)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn error(&self) -> Option<&RpcError> {
        self.error.as_ref()
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Error presence wins over any result also present.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn kind(&self) -> MessageKind {
        MessageKind::Response
    }

    pub(crate) fn to_value(&self) -> Value {
        let error = match &self.error {
            Some(error) => error.to_value(),
            None => Value::Nil,
        };
        let result = self.result.clone().unwrap_or(Value::Nil);
        Value::Array(vec![
            Value::from(MessageKind::Response.as_wire()),
            Value::from(self.id),
            error,
            result,
        ])
    }

    pub(crate) fn from_elements(elements: Vec<Value>) -> Result<Self> {
        wire::check_arity("response", 4, elements.len())?;
        let mut elements = elements.into_iter().skip(1);
        let id = wire::id_field(&elements.next().unwrap_or(Value::Nil))?;
        let error = match elements.next().unwrap_or(Value::Nil) {
            Value::Nil => None,
            value @ Value::Array(_) => Some(RpcError::from_value(value)?),
            _ => return Err(MessageError::InvalidField("error")),
        };
        let result = match elements.next().unwrap_or(Value::Nil) {
            Value::Nil => None,
            value => Some(value),
        };
        Ok(Self { id, error, result })
    }
}

impl fmt::Display for ResponseMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(error) => write!(f, "response #{} error ({error})", self.id),
            None => write!(f, "response #{} ok", self.id),
        }
    }
}

/// Incremental builder for [`ResponseMessage`], copy-on-build like the
/// request builder.
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    id: u32,
    error: Option<RpcError>,
    result: Option<Value>,
}

impl ResponseBuilder {
    /// Builder for a successful response.
    pub fn from_result(result: impl Into<Value>) -> Self {
        Self {
            id: 0,
            error: None,
            result: Some(result.into()),
        }
    }

    /// Builder for an error response.
    pub fn from_error(error: RpcError) -> Self {
        Self {
            id: 0,
            error: Some(error),
            result: None,
        }
    }

    /// Set the id this response answers. Must match the request's id.
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    /// Set or replace the error payload.
    pub fn with_error(mut self, error: RpcError) -> Self {
        self.error = Some(error);
        self
    }

    /// Set or replace the result payload.
    pub fn with_result(mut self, result: impl Into<Value>) -> Self {
        self.result = Some(result.into());
        self
    }

    /// Build an independent [`ResponseMessage`] from the staged state.
    pub fn build(&self) -> ResponseMessage {
        ResponseMessage {
            id: self.id,
            error: self.error.clone(),
            result: self.result.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_builder() {
        let response = ResponseBuilder::from_result("done").with_id(7).build();
        assert_eq!(response.id(), 7);
        assert!(!response.is_error());
        assert_eq!(response.result(), Some(&Value::from("done")));
        assert_eq!(response.kind(), MessageKind::Response);
    }

    #[test]
    fn error_builder() {
        let response = ResponseBuilder::from_error(RpcError::validation("bad"))
            .with_id(8)
            .build();
        assert!(response.is_error());
        assert_eq!(response.error().unwrap().message(), "bad");
        assert_eq!(response.result(), None);
    }

    #[test]
    fn error_wins_when_both_present() {
        let response = ResponseBuilder::from_result("partial")
            .with_error(RpcError::exception("late failure"))
            .build();
        assert!(response.is_error());
        assert!(response.result().is_some());
    }

    #[test]
    fn build_is_copy_on_build() {
        let builder = ResponseBuilder::from_result("first");
        let first = builder.build();
        let second = builder.with_result("second").build();
        assert_eq!(first.result(), Some(&Value::from("first")));
        assert_eq!(second.result(), Some(&Value::from("second")));
    }

    #[test]
    fn wire_roundtrip_with_result() {
        let response = ResponseBuilder::from_result(Value::Array(vec![Value::from(1u32)]))
            .with_id(3)
            .build();

        let Value::Array(elements) = response.to_value() else {
            panic!("response must encode as an array");
        };
        assert_eq!(elements[0].as_u64(), Some(1));
        assert_eq!(elements[1].as_u64(), Some(3));
        assert_eq!(elements[2], Value::Nil);

        let decoded = ResponseMessage::from_elements(elements).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn wire_roundtrip_with_error() {
        let response = ResponseBuilder::from_error(RpcError::other(40, "full"))
            .with_id(4)
            .build();

        let Value::Array(elements) = response.to_value() else {
            panic!("response must encode as an array");
        };
        assert_eq!(elements[3], Value::Nil);

        let decoded = ResponseMessage::from_elements(elements).unwrap();
        assert_eq!(decoded.error().unwrap().kind().code(), 40);
        assert_eq!(decoded.result(), None);
    }

    #[test]
    fn nil_error_and_result_decode_as_absent() {
        let decoded = ResponseMessage::from_elements(vec![
            Value::from(1u32),
            Value::from(12u32),
            Value::Nil,
            Value::Nil,
        ])
        .unwrap();
        assert_eq!(decoded.id(), 12);
        assert!(decoded.error().is_none());
        assert!(decoded.result().is_none());
    }

    #[test]
    fn non_array_error_field_rejected() {
        let err = ResponseMessage::from_elements(vec![
            Value::from(1u32),
            Value::from(12u32),
            Value::from("not an error"),
            Value::Nil,
        ])
        .unwrap_err();
        assert_eq!(err, MessageError::InvalidField("error"));
    }
}

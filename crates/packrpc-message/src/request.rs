use std::fmt;

use rmpv::Value;

use crate::error::Result;
use crate::kind::MessageKind;
use crate::wire;

/// A named method invocation expecting a correlated response.
///
/// Wire shape: `[0, id, method, args]`. A locally-built, not-yet-sent
/// request carries id 0 as a placeholder; the streamer stamps a real id
/// right before transmission.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestMessage {
    id: u32,
    method: String,
    arguments: Vec<Value>,
}

impl RequestMessage {
    /// Start building a request for `method`.
    pub fn builder(method: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn kind(&self) -> MessageKind {
        MessageKind::Request
    }

    pub(crate) fn to_value(&self) -> Value {
        Value::Array(vec![
            Value::from(MessageKind::Request.as_wire()),
            Value::from(self.id),
            Value::from(self.method.as_str()),
            Value::Array(self.arguments.clone()),
        ])
    }

    pub(crate) fn from_elements(elements: Vec<Value>) -> Result<Self> {
        wire::check_arity("request", 4, elements.len())?;
        let mut elements = elements.into_iter().skip(1);
        let id = wire::id_field(&elements.next().unwrap_or(Value::Nil))?;
        let method = wire::string_field(elements.next().unwrap_or(Value::Nil), "method")?;
        let arguments = wire::array_field(elements.next().unwrap_or(Value::Nil), "arguments")?;
        Ok(Self {
            id,
            method,
            arguments,
        })
    }
}

impl fmt::Display for RequestMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "request #{} {}/{}",
            self.id,
            self.method,
            self.arguments.len()
        )
    }
}

/// Incremental builder for [`RequestMessage`].
///
/// `build` copies the staged state, so mutating the builder afterwards
/// never affects instances that were already built.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    id: u32,
    method: String,
    arguments: Vec<Value>,
}

impl RequestBuilder {
    /// Builder for `method` with no arguments yet.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            id: 0,
            method: method.into(),
            arguments: Vec::new(),
        }
    }

    /// Builder for `method` with an initial argument list.
    pub fn with_arguments(method: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            id: 0,
            method: method.into(),
            arguments,
        }
    }

    /// Append a single argument.
    pub fn add_argument(mut self, argument: impl Into<Value>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// Append every argument in `arguments`.
    pub fn add_arguments(mut self, arguments: impl IntoIterator<Item = Value>) -> Self {
        self.arguments.extend(arguments);
        self
    }

    /// Replace the correlation id. Callers normally leave this to the
    /// streamer, which stamps a generated id on send.
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    /// Build an independent [`RequestMessage`] from the staged state.
    pub fn build(&self) -> RequestMessage {
        RequestMessage {
            id: self.id,
            method: self.method.clone(),
            arguments: self.arguments.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_only_builder_defaults() {
        let request = RequestBuilder::new("status").build();
        assert_eq!(request.method(), "status");
        assert_eq!(request.id(), 0);
        assert!(request.arguments().is_empty());
        assert_eq!(request.kind(), MessageKind::Request);
    }

    #[test]
    fn builder_with_initial_arguments() {
        let request =
            RequestBuilder::with_arguments("open", vec![Value::from("file.txt")]).build();
        assert_eq!(request.arguments(), [Value::from("file.txt")]);
    }

    #[test]
    fn with_id_rewrites_only_the_id() {
        let builder = RequestBuilder::new("status").add_argument("verbose");
        assert_eq!(builder.build().id(), 0);

        let stamped = builder.with_id(5);
        let request = stamped.build();
        assert_eq!(request.id(), 5);
        assert_eq!(request.method(), "status");
        assert_eq!(request.arguments().len(), 1);
    }

    #[test]
    fn build_is_copy_on_build() {
        let builder = RequestBuilder::new("sum").add_argument(1u32);
        let one_arg = builder.build();

        let builder = builder.add_argument(2u32);
        let two_args = builder.build();

        // The earlier instance must not grow retroactively.
        assert_eq!(one_arg.arguments().len(), 1);
        assert_eq!(two_args.arguments().len(), 2);

        let builder = builder.add_arguments(vec![Value::from(3u32), Value::from(4u32)]);
        assert_eq!(builder.build().arguments().len(), 4);
        assert_eq!(two_args.arguments().len(), 2);
    }

    #[test]
    fn repeated_builds_are_independent() {
        let builder = RequestBuilder::new("ping");
        let first = builder.build();
        let second = builder.build();
        assert_eq!(first, second);
        // Value objects: equal but not the same allocation.
        assert_ne!(
            first.method().as_ptr(),
            second.method().as_ptr()
        );
    }

    #[test]
    fn wire_roundtrip() {
        let request = RequestBuilder::new("echo")
            .add_argument("hello")
            .with_id(9)
            .build();

        let Value::Array(elements) = request.to_value() else {
            panic!("request must encode as an array");
        };
        assert_eq!(elements[0].as_u64(), Some(0));
        assert_eq!(elements[1].as_u64(), Some(9));
        assert_eq!(elements[2].as_str(), Some("echo"));

        let decoded = RequestMessage::from_elements(elements).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn wrong_arity_rejected() {
        let err = RequestMessage::from_elements(vec![Value::from(0u32), Value::from(1u32)])
            .unwrap_err();
        assert_eq!(
            err,
            crate::MessageError::WrongArity {
                kind: "request",
                expected: 4,
                got: 2
            }
        );
    }

    #[test]
    fn non_string_method_rejected() {
        let err = RequestMessage::from_elements(vec![
            Value::from(0u32),
            Value::from(1u32),
            Value::from(42u32),
            Value::Array(vec![]),
        ])
        .unwrap_err();
        assert_eq!(err, crate::MessageError::InvalidField("method"));
    }
}

use std::fmt;

use rmpv::Value;

use crate::error::Result;
use crate::kind::MessageKind;
use crate::wire;

/// A one-way event: no id, no response expected.
///
/// Wire shape: `[2, name, args]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationMessage {
    name: String,
    arguments: Vec<Value>,
}

impl NotificationMessage {
    /// Start building a notification named `name`.
    pub fn builder(name: impl Into<String>) -> NotificationBuilder {
        NotificationBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn kind(&self) -> MessageKind {
        MessageKind::Notification
    }

    pub(crate) fn to_value(&self) -> Value {
        Value::Array(vec![
            Value::from(MessageKind::Notification.as_wire()),
            Value::from(self.name.as_str()),
            Value::Array(self.arguments.clone()),
        ])
    }

    pub(crate) fn from_elements(elements: Vec<Value>) -> Result<Self> {
        wire::check_arity("notification", 3, elements.len())?;
        let mut elements = elements.into_iter().skip(1);
        let name = wire::string_field(elements.next().unwrap_or(Value::Nil), "name")?;
        let arguments = wire::array_field(elements.next().unwrap_or(Value::Nil), "arguments")?;
        Ok(Self { name, arguments })
    }
}

impl fmt::Display for NotificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notification {}/{}", self.name, self.arguments.len())
    }
}

/// Incremental builder for [`NotificationMessage`], copy-on-build like the
/// request builder.
#[derive(Debug, Clone)]
pub struct NotificationBuilder {
    name: String,
    arguments: Vec<Value>,
}

impl NotificationBuilder {
    /// Builder for `name` with no arguments yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Builder for `name` with an initial argument list.
    pub fn with_arguments(name: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            name: name.into(),
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

    /// Build an independent [`NotificationMessage`] from the staged state.
    pub fn build(&self) -> NotificationMessage {
        NotificationMessage {
            name: self.name.clone(),
            arguments: self.arguments.clone(),
        }
    }
}

//! Element-level decode helpers shared by the message types.

use rmpv::Value;

use crate::error::{MessageError, Result};

pub(crate) fn check_arity(kind: &'static str, expected: usize, got: usize) -> Result<()> {
    if got != expected {
        return Err(MessageError::WrongArity {
            kind,
            expected,
            got,
        });
    }
    Ok(())
}

pub(crate) fn id_field(value: &Value) -> Result<u32> {
    value
        .as_u64()
        .and_then(|id| u32::try_from(id).ok())
        .ok_or(MessageError::InvalidField("id"))
}

pub(crate) fn string_field(value: Value, field: &'static str) -> Result<String> {
    match value {
        Value::String(text) => text.into_str().ok_or(MessageError::InvalidField(field)),
        _ => Err(MessageError::InvalidField(field)),
    }
}

pub(crate) fn array_field(value: Value, field: &'static str) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(MessageError::InvalidField(field)),
    }
}

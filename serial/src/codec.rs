//! Payload codec: one object's fields ↔ text.
//!
//! A payload is the object's field record (inherited fields first, then the
//! type's own) rendered in a [`Format`]. The type tag is not part of the
//! payload; [`TaggedElement`](crate::TaggedElement) carries it alongside.

use crate::context::{DeserializeContext, SerializeContext};
use crate::error::{DeserializeError, PayloadFault, SerializeError};
use crate::format::Format;
use crate::object::SerialObject;
use crate::registry::{TypeDescriptor, TypeRegistry};
use crate::value::Value;

/// Encode an object's fields as a [`Value::Map`], returning its registered name.
///
/// # Errors
///
/// [`SerializeError::UnregisteredType`] if the runtime type (or the runtime
/// type of any nested object) is not registered.
pub fn encode_value(
    registry: &TypeRegistry,
    object: &dyn SerialObject,
) -> Result<(&'static str, Value), SerializeError> {
    let type_name = registry.identifier_for(object)?;
    let mut ctx = SerializeContext::new(registry);
    object.write_record(&mut ctx)?;
    Ok((type_name, ctx.finish()))
}

/// Encode an object's fields as payload text.
pub fn encode(
    registry: &TypeRegistry,
    object: &dyn SerialObject,
    format: Format,
) -> Result<String, SerializeError> {
    let (_, record) = encode_value(registry, object)?;
    format.to_text(&record)
}

/// Fill a blank instance from a field record.
///
/// `into` must be an instance of the descriptor's type (normally from
/// [`TypeDescriptor::instantiate`]).
pub fn decode_value(
    registry: &TypeRegistry,
    descriptor: &TypeDescriptor,
    record: Value,
    into: &mut dyn SerialObject,
) -> Result<(), DeserializeError> {
    if into.as_any().type_id() != descriptor.type_id() {
        return Err(DeserializeError::TypeMismatch {
            type_name: descriptor.name().to_owned(),
            view: into.serial_name().to_owned(),
        });
    }
    let mut ctx = DeserializeContext::new(registry);
    ctx.load(descriptor, record)?;
    into.read_record(&mut ctx)?;
    ctx.finish()
}

/// Fill a blank instance from payload text.
pub fn decode(
    registry: &TypeRegistry,
    payload: &str,
    descriptor: &TypeDescriptor,
    into: &mut dyn SerialObject,
    format: Format,
) -> Result<(), DeserializeError> {
    let record: Value = format.from_text(payload).map_err(|e| match e {
        DeserializeError::Format(message) => {
            DeserializeError::malformed(descriptor.name(), PayloadFault::Syntax(message))
        }
        other => other,
    })?;
    decode_value(registry, descriptor, record, into)
}

//! Serialization and deserialization contexts.
//!
//! [`SerializeContext`] accumulates a record's fields and gives field codecs
//! access to the [`TypeRegistry`] for nested polymorphic objects.
//! [`DeserializeContext`] holds a loaded record, hands fields out by name
//! and checks the record against its type descriptor.

use crate::codec;
use crate::error::{DeserializeError, PayloadFault, SerializeError};
use crate::field::{FieldError, SerialField};
use crate::object::SerialObject;
use crate::registry::{TypeDescriptor, TypeRegistry};
use crate::value::Value;

// ---------------------------------------------------------------------------
// SerializeContext
// ---------------------------------------------------------------------------

/// Context for serializing one record's fields.
pub struct SerializeContext<'r> {
    registry: &'r TypeRegistry,
    fields: Vec<(String, Value)>,
}

impl<'r> SerializeContext<'r> {
    /// Create a new context for serialization.
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            fields: Vec::new(),
        }
    }

    /// Registry used to tag nested objects.
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Encode a field through its [`SerialField`] impl.
    pub fn write_field<F: SerialField>(&mut self, name: &str, field: &F) -> Result<(), SerializeError> {
        let value = field.to_value(self).map_err(|e| match e {
            FieldError::Serialize(inner) => *inner,
            FieldError::Unrepresentable(message) => SerializeError::Field {
                field: name.to_owned(),
                message,
            },
            other => SerializeError::Field {
                field: name.to_owned(),
                message: format!("{other:?}"),
            },
        })?;
        self.write_value(name, value);
        Ok(())
    }

    /// Write a pre-built Value for a field.
    pub fn write_value(&mut self, name: &str, value: Value) {
        self.fields.push((name.to_owned(), value));
    }

    /// Encode a nested polymorphic object with its type tag.
    pub fn write_object(&self, object: &dyn SerialObject) -> Result<Value, SerializeError> {
        let (type_name, data) = codec::encode_value(self.registry, object)?;
        Ok(Value::object(type_name, data))
    }

    /// Return the accumulated fields as a [`Value::Map`], leaving the context empty.
    pub fn finish(&mut self) -> Value {
        Value::Map(std::mem::take(&mut self.fields))
    }
}

// ---------------------------------------------------------------------------
// DeserializeContext
// ---------------------------------------------------------------------------

/// Context for deserializing one record's fields.
pub struct DeserializeContext<'r> {
    registry: &'r TypeRegistry,
    type_name: &'static str,
    fields: Vec<(String, Value)>,
}

impl<'r> DeserializeContext<'r> {
    /// Create a new, empty context.
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            type_name: "",
            fields: Vec::new(),
        }
    }

    /// Registry used to resolve nested objects.
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Identifier of the record being read.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Load a record and check its shape against the descriptor's field set.
    ///
    /// Unknown keys are reported before missing ones; a record with the
    /// right keys but the wrong entry count (repeated keys) fails with
    /// [`PayloadFault::FieldCount`].
    pub fn load(&mut self, descriptor: &TypeDescriptor, data: Value) -> Result<(), DeserializeError> {
        self.type_name = descriptor.name();
        let entries = match data {
            Value::Map(entries) => entries,
            other => {
                return Err(self.malformed(PayloadFault::NotARecord {
                    found: other.kind_name().to_owned(),
                }));
            }
        };

        let expected = descriptor.fields();
        if let Some((key, _)) = entries
            .iter()
            .find(|(key, _)| !expected.iter().any(|f| f.name == key))
        {
            return Err(self.malformed(PayloadFault::UnexpectedField { field: key.clone() }));
        }
        if let Some(missing) = expected
            .iter()
            .find(|f| !entries.iter().any(|(key, _)| key == f.name))
        {
            return Err(self.malformed(PayloadFault::MissingField {
                field: missing.name.to_owned(),
            }));
        }
        if entries.len() != expected.len() {
            return Err(self.malformed(PayloadFault::FieldCount {
                expected: expected.len(),
                found: entries.len(),
            }));
        }

        self.fields = entries;
        Ok(())
    }

    /// Decode a field through its [`SerialField`] impl.
    pub fn read_field<F: SerialField>(&mut self, name: &str) -> Result<F, DeserializeError> {
        let value = self.take_value(name)?;
        F::from_value(value, self).map_err(|e| match e {
            FieldError::Deserialize(inner) => *inner,
            FieldError::Invalid { expected, found } => self.malformed(PayloadFault::InvalidValue {
                field: name.to_owned(),
                expected,
                found,
            }),
            FieldError::ArrayLength { expected, found } => {
                self.malformed(PayloadFault::ArrayLength {
                    field: name.to_owned(),
                    expected,
                    found,
                })
            }
            other => self.malformed(PayloadFault::InvalidValue {
                field: name.to_owned(),
                expected: "a decodable value".to_owned(),
                found: format!("{other:?}"),
            }),
        })
    }

    /// Remove a raw Value for a field.
    pub fn take_value(&mut self, name: &str) -> Result<Value, DeserializeError> {
        let Some(index) = self.fields.iter().position(|(key, _)| key == name) else {
            return Err(self.malformed(PayloadFault::MissingField {
                field: name.to_owned(),
            }));
        };
        Ok(self.fields.remove(index).1)
    }

    /// Rebuild a nested polymorphic object from its tagged value.
    pub fn read_object(&self, value: Value) -> Result<Box<dyn SerialObject>, FieldError> {
        let Some((type_name, data)) = value.clone().into_object() else {
            return Err(FieldError::invalid("tagged object", &value));
        };
        let descriptor = self
            .registry
            .resolve(&type_name)
            .map_err(|e| FieldError::Deserialize(Box::new(e)))?;
        let mut object = descriptor.instantiate();
        codec::decode_value(self.registry, descriptor, data, object.as_mut())
            .map_err(|e| FieldError::Deserialize(Box::new(e)))?;
        Ok(object)
    }

    /// Finish record deserialization; every loaded field must have been read.
    pub fn finish(&mut self) -> Result<(), DeserializeError> {
        if let Some((key, _)) = self.fields.first() {
            return Err(self.malformed(PayloadFault::UnexpectedField { field: key.clone() }));
        }
        Ok(())
    }

    fn malformed(&self, fault: PayloadFault) -> DeserializeError {
        DeserializeError::malformed(self.type_name, fault)
    }
}

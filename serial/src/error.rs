//! Error types for registration, serialization and deserialization.

use thiserror::Error;

/// Errors raised while writing objects out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SerializeError {
    /// The object's runtime type was never registered.
    #[error("type '{type_name}' is not registered")]
    UnregisteredType { type_name: String },
    /// A field value cannot be represented (e.g. a non-finite float).
    #[error("failed to serialize field '{field}': {message}")]
    Field { field: String, message: String },
    /// Text encoding failed.
    #[error("format error: {0}")]
    Format(String),
}

/// Errors raised while reading objects back.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeserializeError {
    /// No type was registered under the element's identifier.
    #[error("unknown type '{type_name}'")]
    UnknownType { type_name: String },
    /// The resolved type does not declare the requested view.
    #[error("type '{type_name}' cannot be viewed as '{view}'")]
    TypeMismatch { type_name: String, view: String },
    /// The payload does not match the resolved type's field layout.
    #[error("malformed payload for '{type_name}': {fault}")]
    MalformedPayload {
        type_name: String,
        fault: PayloadFault,
    },
    /// Text outside any element payload (e.g. a container) failed to parse.
    #[error("format error: {0}")]
    Format(String),
}

impl DeserializeError {
    pub(crate) fn malformed(type_name: &str, fault: PayloadFault) -> Self {
        Self::MalformedPayload {
            type_name: type_name.to_owned(),
            fault,
        }
    }
}

/// What exactly was wrong with a malformed payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadFault {
    /// The payload text did not parse.
    #[error("syntax error: {0}")]
    Syntax(String),
    /// The payload parsed, but not to a field record.
    #[error("expected a field record, found {found}")]
    NotARecord { found: String },
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("missing field '{field}'")]
    MissingField { field: String },
    #[error("unexpected field '{field}'")]
    UnexpectedField { field: String },
    /// A literal could not be read as the field's type.
    #[error("field '{field}': expected {expected}, found {found}")]
    InvalidValue {
        field: String,
        expected: String,
        found: String,
    },
    /// Recorded array length disagrees with the items or the target size.
    #[error("field '{field}': expected {expected} array items, found {found}")]
    ArrayLength {
        field: String,
        expected: usize,
        found: usize,
    },
}

/// Errors raised while populating a [`TypeRegistry`](crate::TypeRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Another type already uses this identifier.
    #[error("type name '{type_name}' is already used by '{existing}'")]
    DuplicateName {
        type_name: &'static str,
        existing: &'static str,
    },
    /// The same Rust type was registered twice.
    #[error("type '{type_name}' is already registered")]
    AlreadyRegistered { type_name: &'static str },
    /// A field name appears twice in the flattened field set.
    #[error("type '{type_name}' declares field '{field}' more than once")]
    DuplicateField {
        type_name: &'static str,
        field: &'static str,
    },
}

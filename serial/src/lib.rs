//! # RedLilium Serial
//!
//! Polymorphic serialization of typed value objects to text.
//!
//! Objects are written as an ordered list of [`TaggedElement`]s, each
//! pairing the object's registered type name with its field payload. On
//! load the recorded name, not the caller's static type, selects the
//! concrete type to rebuild, so collections viewed through a base trait
//! or an unrelated capability trait come back with their original types.
//!
//! ## Core Types
//!
//! - [`TypeRegistry`]: explicit name ↔ type mapping with per-type views
//! - [`ElementSerializer`]: serializes / deserializes ordered collections
//! - [`SerialType`] / [`SerialObject`]: static and object-safe halves of a
//!   serializable record (derive with `#[derive(Serializable)]`)
//! - [`SerialField`]: field-level codec for every supported field shape
//! - [`Value`]: format-agnostic intermediate representation
//! - [`Format`]: textual encodings (JSON, RON)
//!
//! ## Example
//!
//! ```ignore
//! #[derive(Debug, Default, Serializable)]
//! struct Record {
//!     label: String,
//!     weights: Vec<i32>,
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Record>()?;
//!
//! let serializer = registry.serializer();
//! let elements = serializer.serialize_iter([&record])?;
//! let loaded: Vec<Box<Record>> = serializer.deserialize(&elements)?;
//! ```

// Lets the derive macro's absolute `redlilium_serial::` paths resolve inside
// this crate's own tests.
extern crate self as redlilium_serial;

pub mod codec;
mod context;
mod element;
mod error;
pub mod field;
mod format;
mod helper;
mod object;
mod registry;
pub mod slot;
pub mod value;

pub use context::{DeserializeContext, SerializeContext};
pub use element::{ElementContainer, TaggedElement};
pub use error::{DeserializeError, PayloadFault, RegistryError, SerializeError};
pub use field::{FieldError, FieldInfo, FieldKind, SerialField};
pub use format::Format;
pub use helper::ElementSerializer;
pub use object::{SerialObject, SerialType};
pub use registry::{Registration, TypeDescriptor, TypeRegistry};
pub use serial_macro::Serializable;
pub use value::Value;

//! Serializable record traits.
//!
//! [`SerialType`] is the static half: a type name, a flattened field list and
//! typed field readers/writers. It is normally generated by
//! `#[derive(Serializable)]`.
//!
//! [`SerialObject`] is the object-safe half, implemented for every
//! `SerialType`. Collections hold `Box<dyn SerialObject>` or a box of any
//! view trait that has `SerialObject` as a supertrait.

use std::any::Any;
use std::fmt;

use crate::context::{DeserializeContext, SerializeContext};
use crate::error::{DeserializeError, SerializeError};
use crate::field::FieldInfo;

/// A concrete serializable record.
///
/// # Deriving
///
/// ```ignore
/// #[derive(Default, Serializable)]
/// struct Record {
///     label: String,
///     count: i32,
/// }
///
/// #[derive(Default, Serializable)]
/// #[serial(name = "LabeledRecord")]
/// struct Labeled {
///     #[serial(extends)]
///     base: Record,
///     note: String,
/// }
/// ```
///
/// A field marked `#[serial(extends)]` contributes its fields to the
/// record in place, ahead of the type's own fields.
pub trait SerialType: Default + Send + Sync + 'static {
    /// Stable identifier written next to every payload of this type.
    const NAME: &'static str;

    /// Identifier of the embedded base record, if any.
    const EXTENDS: Option<&'static str> = None;

    /// Full field list, inherited fields first.
    fn fields() -> Vec<FieldInfo>;

    /// Write every field (inherited ones included) into the context.
    fn write_fields(&self, ctx: &mut SerializeContext<'_>) -> Result<(), SerializeError>;

    /// Overwrite every field (inherited ones included) from the context.
    fn read_fields(&mut self, ctx: &mut DeserializeContext<'_>) -> Result<(), DeserializeError>;
}

/// Object-safe view of a [`SerialType`].
///
/// Implemented automatically; do not implement by hand. View traits used
/// with [`ElementSerializer`](crate::ElementSerializer) should declare
/// `SerialObject` as a supertrait so their objects can be serialized.
pub trait SerialObject: Any + Send + Sync {
    /// The [`SerialType::NAME`] of the runtime type.
    fn serial_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Upcast from any view back to `dyn SerialObject`.
    fn as_serial(&self) -> &dyn SerialObject;

    /// Type-erased [`SerialType::write_fields`].
    fn write_record(&self, ctx: &mut SerializeContext<'_>) -> Result<(), SerializeError>;

    /// Type-erased [`SerialType::read_fields`].
    fn read_record(&mut self, ctx: &mut DeserializeContext<'_>) -> Result<(), DeserializeError>;
}

impl<T: SerialType> SerialObject for T {
    fn serial_name(&self) -> &'static str {
        T::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn as_serial(&self) -> &dyn SerialObject {
        self
    }

    fn write_record(&self, ctx: &mut SerializeContext<'_>) -> Result<(), SerializeError> {
        T::write_fields(self, ctx)
    }

    fn read_record(&mut self, ctx: &mut DeserializeContext<'_>) -> Result<(), DeserializeError> {
        T::read_fields(self, ctx)
    }
}

impl dyn SerialObject {
    /// Returns `true` if the runtime type is `T`.
    pub fn is<T: SerialType>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: SerialType>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: SerialType>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Take ownership of the concrete record. Returns `None` on a type mismatch.
    pub fn downcast<T: SerialType>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast::<T>().ok()
    }
}

impl fmt::Debug for dyn SerialObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.serial_name()).finish_non_exhaustive()
    }
}

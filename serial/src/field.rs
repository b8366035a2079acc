//! Field-level encoding and decoding.
//!
//! [`SerialField`] is the single extension point for types used as fields
//! inside `#[derive(Serializable)]` structs. The derive macro calls
//! [`SerializeContext::write_field`] / [`DeserializeContext::read_field`]
//! for every field, which dispatch to the field type's `SerialField` impl.
//!
//! Built-in impls cover scalars, strings, `Vec<T>`, `[T; N]`, `Option<T>`,
//! [`glam::Vec2`] and nested polymorphic objects (`Box<dyn SerialObject>`).
//! Unit enums and plain serde records opt in with [`serde_field!`].
//!
//! # Adding a custom field type
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! enum BlendMode { Alpha, Additive }
//!
//! redlilium_serial::serde_field!(BlendMode => Enum);
//! ```

use glam::Vec2;

use crate::context::{DeserializeContext, SerializeContext};
use crate::error::{DeserializeError, SerializeError};
use crate::object::SerialObject;
use crate::value::Value;

/// Shape of a serialized field, as listed in a type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    Integer,
    Float,
    Text,
    /// Unit enum stored by variant name.
    Enum,
    /// Plain nested record without its own type tag.
    Record,
    /// Sequence with an explicitly recorded length.
    Array,
    /// Two-component float vector.
    Vector2,
    /// Value that may be absent (`null`).
    Optional,
    /// Nested polymorphic object carrying its own type tag.
    Object,
}

/// Metadata for a single serialized field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Name of the field in the payload record.
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Field-level failure, before the owning field name is known.
///
/// [`SerializeContext`] and [`DeserializeContext`] attach the field name
/// and the record's type name when converting to the public error types.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// The stored value has the wrong shape for the field type.
    Invalid { expected: String, found: String },
    /// An array's recorded length disagrees with its items or target size.
    ArrayLength { expected: usize, found: usize },
    /// The field value has no textual representation.
    Unrepresentable(String),
    /// A nested object failed to serialize.
    Serialize(Box<SerializeError>),
    /// A nested object failed to deserialize.
    Deserialize(Box<DeserializeError>),
}

impl FieldError {
    pub fn invalid(expected: impl Into<String>, found: &Value) -> Self {
        Self::Invalid {
            expected: expected.into(),
            found: found.to_string(),
        }
    }
}

/// Field-level codec.
///
/// Implement this for any type you want to use as a field inside a
/// `#[derive(Serializable)]` struct.
pub trait SerialField: Sized {
    /// Shape reported in [`FieldInfo`].
    const KIND: FieldKind;

    /// Encode this field value.
    fn to_value(&self, ctx: &SerializeContext<'_>) -> Result<Value, FieldError>;

    /// Decode a field value.
    fn from_value(value: Value, ctx: &DeserializeContext<'_>) -> Result<Self, FieldError>;
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

impl SerialField for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn to_value(&self, _ctx: &SerializeContext<'_>) -> Result<Value, FieldError> {
        Ok(Value::Bool(*self))
    }

    fn from_value(value: Value, _ctx: &DeserializeContext<'_>) -> Result<Self, FieldError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(FieldError::invalid("bool", &other)),
        }
    }
}

impl SerialField for String {
    const KIND: FieldKind = FieldKind::Text;

    fn to_value(&self, _ctx: &SerializeContext<'_>) -> Result<Value, FieldError> {
        Ok(Value::String(self.clone()))
    }

    fn from_value(value: Value, _ctx: &DeserializeContext<'_>) -> Result<Self, FieldError> {
        match value {
            Value::String(v) => Ok(v),
            other => Err(FieldError::invalid("string", &other)),
        }
    }
}

macro_rules! signed_field {
    ($($ty:ty),*) => {$(
        impl SerialField for $ty {
            const KIND: FieldKind = FieldKind::Integer;

            fn to_value(&self, _ctx: &SerializeContext<'_>) -> Result<Value, FieldError> {
                Ok(Value::I64(*self as i64))
            }

            fn from_value(value: Value, _ctx: &DeserializeContext<'_>) -> Result<Self, FieldError> {
                let converted = match &value {
                    Value::I64(v) => <$ty>::try_from(*v).ok(),
                    Value::U64(v) => <$ty>::try_from(*v).ok(),
                    _ => None,
                };
                converted.ok_or_else(|| FieldError::invalid(stringify!($ty), &value))
            }
        }
    )*};
}

macro_rules! unsigned_field {
    ($($ty:ty),*) => {$(
        impl SerialField for $ty {
            const KIND: FieldKind = FieldKind::Integer;

            fn to_value(&self, _ctx: &SerializeContext<'_>) -> Result<Value, FieldError> {
                Ok(Value::U64(*self as u64))
            }

            fn from_value(value: Value, _ctx: &DeserializeContext<'_>) -> Result<Self, FieldError> {
                let converted = match &value {
                    Value::I64(v) => <$ty>::try_from(*v).ok(),
                    Value::U64(v) => <$ty>::try_from(*v).ok(),
                    _ => None,
                };
                converted.ok_or_else(|| FieldError::invalid(stringify!($ty), &value))
            }
        }
    )*};
}

signed_field!(i8, i16, i32, i64);
unsigned_field!(u8, u16, u32, u64);

impl SerialField for f32 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_value(&self, _ctx: &SerializeContext<'_>) -> Result<Value, FieldError> {
        if !self.is_finite() {
            return Err(FieldError::Unrepresentable(format!(
                "non-finite float {self}"
            )));
        }
        Ok(Value::F32(*self))
    }

    fn from_value(value: Value, _ctx: &DeserializeContext<'_>) -> Result<Self, FieldError> {
        let narrowed = match value {
            Value::F32(v) => Some(v),
            // Text parsers widen to f64; the shortest-repr literal narrows back exactly.
            Value::F64(v) => Some(v as f32),
            Value::I64(v) => Some(v as f32).filter(|f| *f as i128 == v as i128),
            Value::U64(v) => Some(v as f32).filter(|f| *f as u128 == v as u128),
            _ => None,
        };
        narrowed
            .filter(|f| f.is_finite())
            .ok_or_else(|| FieldError::invalid("f32", &value))
    }
}

impl SerialField for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_value(&self, _ctx: &SerializeContext<'_>) -> Result<Value, FieldError> {
        if !self.is_finite() {
            return Err(FieldError::Unrepresentable(format!(
                "non-finite float {self}"
            )));
        }
        Ok(Value::F64(*self))
    }

    fn from_value(value: Value, _ctx: &DeserializeContext<'_>) -> Result<Self, FieldError> {
        let widened = match value {
            Value::F64(v) => Some(v),
            Value::F32(v) => Some(v as f64),
            Value::I64(v) => Some(v as f64).filter(|f| *f as i128 == v as i128),
            Value::U64(v) => Some(v as f64).filter(|f| *f as u128 == v as u128),
            _ => None,
        };
        widened
            .filter(|f| f.is_finite())
            .ok_or_else(|| FieldError::invalid("f64", &value))
    }
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

fn decode_items<T: SerialField>(
    value: Value,
    ctx: &DeserializeContext<'_>,
) -> Result<Vec<T>, FieldError> {
    let Some((length, items)) = value.clone().into_array() else {
        return Err(FieldError::invalid("array", &value));
    };
    if length != items.len() {
        return Err(FieldError::ArrayLength {
            expected: length,
            found: items.len(),
        });
    }
    items
        .into_iter()
        .map(|item| T::from_value(item, ctx))
        .collect()
}

impl<T: SerialField> SerialField for Vec<T> {
    const KIND: FieldKind = FieldKind::Array;

    fn to_value(&self, ctx: &SerializeContext<'_>) -> Result<Value, FieldError> {
        let items = self
            .iter()
            .map(|item| item.to_value(ctx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::array(items))
    }

    fn from_value(value: Value, ctx: &DeserializeContext<'_>) -> Result<Self, FieldError> {
        decode_items(value, ctx)
    }
}

impl<T: SerialField, const N: usize> SerialField for [T; N] {
    const KIND: FieldKind = FieldKind::Array;

    fn to_value(&self, ctx: &SerializeContext<'_>) -> Result<Value, FieldError> {
        let items = self
            .iter()
            .map(|item| item.to_value(ctx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::array(items))
    }

    fn from_value(value: Value, ctx: &DeserializeContext<'_>) -> Result<Self, FieldError> {
        let items = decode_items::<T>(value, ctx)?;
        let found = items.len();
        items.try_into().map_err(|_| FieldError::ArrayLength {
            expected: N,
            found,
        })
    }
}

impl<T: SerialField> SerialField for Option<T> {
    const KIND: FieldKind = FieldKind::Optional;

    fn to_value(&self, ctx: &SerializeContext<'_>) -> Result<Value, FieldError> {
        match self {
            Some(inner) => inner.to_value(ctx),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: Value, ctx: &DeserializeContext<'_>) -> Result<Self, FieldError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other, ctx).map(Some),
        }
    }
}

impl SerialField for Vec2 {
    const KIND: FieldKind = FieldKind::Vector2;

    fn to_value(&self, ctx: &SerializeContext<'_>) -> Result<Value, FieldError> {
        self.to_array().to_value(ctx)
    }

    fn from_value(value: Value, ctx: &DeserializeContext<'_>) -> Result<Self, FieldError> {
        <[f32; 2]>::from_value(value, ctx).map(Vec2::from_array)
    }
}

// ---------------------------------------------------------------------------
// Nested polymorphic objects
// ---------------------------------------------------------------------------

impl SerialField for Box<dyn SerialObject> {
    const KIND: FieldKind = FieldKind::Object;

    fn to_value(&self, ctx: &SerializeContext<'_>) -> Result<Value, FieldError> {
        ctx.write_object(self.as_ref())
            .map_err(|e| FieldError::Serialize(Box::new(e)))
    }

    fn from_value(value: Value, ctx: &DeserializeContext<'_>) -> Result<Self, FieldError> {
        ctx.read_object(value)
    }
}

// ---------------------------------------------------------------------------
// serde fallback
// ---------------------------------------------------------------------------

/// Implement [`SerialField`] for serde types (unit enums, plain records).
///
/// The value goes through [`value::to_value`](crate::value::to_value) /
/// [`value::from_value`](crate::value::from_value). The second argument is
/// the [`FieldKind`] variant to report.
///
/// ```ignore
/// serde_field!(SlotType => Enum);
/// serde_field!(Margins => Record);
/// ```
#[macro_export]
macro_rules! serde_field {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl $crate::SerialField for $ty {
            const KIND: $crate::FieldKind = $crate::FieldKind::$kind;

            fn to_value(
                &self,
                _ctx: &$crate::SerializeContext<'_>,
            ) -> ::core::result::Result<$crate::Value, $crate::FieldError> {
                $crate::value::to_value(self)
                    .map_err(|e| $crate::FieldError::Unrepresentable(e.to_string()))
            }

            fn from_value(
                value: $crate::Value,
                _ctx: &$crate::DeserializeContext<'_>,
            ) -> ::core::result::Result<Self, $crate::FieldError> {
                let found = value.to_string();
                $crate::value::from_value(value).map_err(|e| $crate::FieldError::Invalid {
                    expected: ::std::format!("{} ({e})", ::core::any::type_name::<$ty>()),
                    found,
                })
            }
        }
    )*};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;

    fn roundtrip<T: SerialField>(registry: &TypeRegistry, value: &T) -> Result<T, FieldError> {
        let ser = SerializeContext::new(registry);
        let encoded = value.to_value(&ser)?;
        let de = DeserializeContext::new(registry);
        T::from_value(encoded, &de)
    }

    #[test]
    fn scalars_keep_exact_values() {
        let registry = TypeRegistry::new();
        assert_eq!(roundtrip(&registry, &-17i32).unwrap(), -17);
        assert_eq!(roundtrip(&registry, &u64::MAX).unwrap(), u64::MAX);
        assert_eq!(roundtrip(&registry, &7.7f32).unwrap(), 7.7);
        assert_eq!(roundtrip(&registry, &0.1f64).unwrap(), 0.1);
        assert!(roundtrip(&registry, &true).unwrap());
        assert_eq!(
            roundtrip(&registry, &"ABCD".to_string()).unwrap(),
            "ABCD"
        );
    }

    #[test]
    fn integer_out_of_range_is_invalid() {
        let registry = TypeRegistry::new();
        let de = DeserializeContext::new(&registry);
        assert!(matches!(
            u8::from_value(Value::I64(-1), &de),
            Err(FieldError::Invalid { .. })
        ));
        assert!(matches!(
            i32::from_value(Value::String("5".into()), &de),
            Err(FieldError::Invalid { .. })
        ));
    }

    #[test]
    fn float_decode_rejects_lossy_values() {
        let registry = TypeRegistry::new();
        let de = DeserializeContext::new(&registry);
        assert!(matches!(
            f32::from_value(Value::F64(1e300), &de),
            Err(FieldError::Invalid { .. })
        ));
        assert!(matches!(
            f64::from_value(Value::F64(f64::INFINITY), &de),
            Err(FieldError::Invalid { .. })
        ));
        assert!(matches!(
            f32::from_value(Value::I64(16_777_217), &de),
            Err(FieldError::Invalid { .. })
        ));
        assert!(matches!(
            f64::from_value(Value::U64(u64::MAX), &de),
            Err(FieldError::Invalid { .. })
        ));
        assert_eq!(f32::from_value(Value::I64(-3), &de), Ok(-3.0));
        assert_eq!(f64::from_value(Value::U64(1 << 40), &de), Ok((1u64 << 40) as f64));
    }

    #[test]
    fn non_finite_float_is_unrepresentable() {
        let registry = TypeRegistry::new();
        let ser = SerializeContext::new(&registry);
        assert!(matches!(
            f32::NAN.to_value(&ser),
            Err(FieldError::Unrepresentable(_))
        ));
    }

    #[test]
    fn vec_records_length() {
        let registry = TypeRegistry::new();
        let ser = SerializeContext::new(&registry);
        let encoded = vec![1i32, 2, 3].to_value(&ser).unwrap();
        assert_eq!(
            encoded,
            Value::array(vec![Value::I64(1), Value::I64(2), Value::I64(3)])
        );
    }

    #[test]
    fn array_length_mismatch_detected() {
        let registry = TypeRegistry::new();
        let de = DeserializeContext::new(&registry);

        // Recorded length disagrees with the item list.
        let lying = Value::Map(vec![
            ("length".into(), Value::U64(3)),
            ("items".into(), Value::List(vec![Value::I64(1)])),
        ]);
        assert_eq!(
            Vec::<i32>::from_value(lying, &de),
            Err(FieldError::ArrayLength {
                expected: 3,
                found: 1
            })
        );

        // Consistent array of the wrong size for a fixed array.
        let three = Value::array(vec![Value::F32(1.0); 3]);
        assert_eq!(
            <[f32; 2]>::from_value(three, &de),
            Err(FieldError::ArrayLength {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn empty_and_absent_arrays_differ() {
        let registry = TypeRegistry::new();
        let ser = SerializeContext::new(&registry);
        let empty: Option<Vec<i32>> = Some(Vec::new());
        let absent: Option<Vec<i32>> = None;
        assert_ne!(empty.to_value(&ser).unwrap(), absent.to_value(&ser).unwrap());
        assert_eq!(roundtrip(&registry, &empty).unwrap(), Some(Vec::new()));
        assert_eq!(roundtrip(&registry, &absent).unwrap(), None);
    }

    #[test]
    fn vec2_as_two_item_array() {
        let registry = TypeRegistry::new();
        let v = Vec2::new(0.25, -3.5);
        assert_eq!(roundtrip(&registry, &v).unwrap(), v);
    }

    #[test]
    fn serde_enum_field() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        enum Blend {
            Alpha,
            Additive,
        }
        crate::serde_field!(Blend => Enum);

        let registry = TypeRegistry::new();
        assert_eq!(Blend::KIND, FieldKind::Enum);
        assert_eq!(roundtrip(&registry, &Blend::Additive).unwrap(), Blend::Additive);
        assert_ne!(roundtrip(&registry, &Blend::Alpha).unwrap(), Blend::Additive);

        let de = DeserializeContext::new(&registry);
        assert!(matches!(
            Blend::from_value(Value::String("Multiply".into()), &de),
            Err(FieldError::Invalid { .. })
        ));
    }
}

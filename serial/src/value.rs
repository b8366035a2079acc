//! Format-agnostic intermediate value representation.
//!
//! A payload is built as a [`Value::Map`] of field name → [`Value`] and only
//! then rendered to text by a [`Format`](crate::Format). Parsing goes the
//! other way, so the field layer never sees format-specific types.
//!
//! Use [`to_value`] and [`from_value`] to convert between arbitrary serde
//! types and `Value`.

use std::fmt;

use serde::de::value::{MapAccessDeserializer, MapDeserializer, SeqDeserializer};
use serde::de::{self, IntoDeserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, SerializeMap as _, SerializeSeq as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Key holding the explicit element count of an encoded array.
pub const ARRAY_LENGTH_KEY: &str = "length";
/// Key holding the elements of an encoded array.
pub const ARRAY_ITEMS_KEY: &str = "items";
/// Key holding the type name of an embedded polymorphic object.
pub const OBJECT_TYPE_KEY: &str = "type";
/// Key holding the field record of an embedded polymorphic object.
pub const OBJECT_DATA_KEY: &str = "data";

/// Format-agnostic value representation for record fields.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    List(Vec<Value>),
    /// Ordered key/value entries; field records and encoded arrays.
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::I64(_) | Self::U64(_) => "integer",
            Self::F32(_) | Self::F64(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Encode a sequence with its length recorded next to the items.
    pub fn array(items: Vec<Value>) -> Self {
        Self::Map(vec![
            (ARRAY_LENGTH_KEY.to_owned(), Value::U64(items.len() as u64)),
            (ARRAY_ITEMS_KEY.to_owned(), Value::List(items)),
        ])
    }

    /// Decode a value built by [`Value::array`].
    ///
    /// Returns `(recorded_length, items)`; the caller decides how to treat a
    /// disagreement between the two.
    pub fn into_array(self) -> Option<(usize, Vec<Value>)> {
        let Value::Map(entries) = self else {
            return None;
        };
        let mut length = None;
        let mut items = None;
        for (key, value) in entries {
            match (key.as_str(), value) {
                (ARRAY_LENGTH_KEY, Value::U64(n)) => length = usize::try_from(n).ok(),
                (ARRAY_LENGTH_KEY, Value::I64(n)) => length = usize::try_from(n).ok(),
                (ARRAY_ITEMS_KEY, Value::List(list)) => items = Some(list),
                _ => return None,
            }
        }
        Some((length?, items?))
    }

    /// Encode an embedded polymorphic object.
    pub fn object(type_name: &str, data: Value) -> Self {
        Self::Map(vec![
            (OBJECT_TYPE_KEY.to_owned(), Value::String(type_name.to_owned())),
            (OBJECT_DATA_KEY.to_owned(), data),
        ])
    }

    /// Decode a value built by [`Value::object`].
    pub fn into_object(self) -> Option<(String, Value)> {
        let Value::Map(entries) = self else {
            return None;
        };
        let mut type_name = None;
        let mut data = None;
        for (key, value) in entries {
            match (key.as_str(), value) {
                (OBJECT_TYPE_KEY, Value::String(name)) => type_name = Some(name),
                (OBJECT_DATA_KEY, value) => data = Some(value),
                _ => return None,
            }
        }
        Some((type_name?, data?))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::List(items) => write!(f, "list of {}", items.len()),
            Self::Map(entries) => write!(f, "map of {}", entries.len()),
        }
    }
}

// ---------------------------------------------------------------------------
// Text mapping: Value <-> any serde format
// ---------------------------------------------------------------------------

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::I64(v) => serializer.serialize_i64(*v),
            Self::U64(v) => serializer.serialize_u64(*v),
            Self::F32(v) if !v.is_finite() => Err(serde::ser::Error::custom(format!(
                "non-finite float {v} has no textual form"
            ))),
            Self::F64(v) if !v.is_finite() => Err(serde::ser::Error::custom(format!(
                "non-finite float {v} has no textual form"
            ))),
            Self::F32(v) => serializer.serialize_f32(*v),
            Self::F64(v) => serializer.serialize_f64(*v),
            Self::String(v) => serializer.serialize_str(v),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TextValueVisitor)
    }
}

struct TextValueVisitor;

impl<'de> Visitor<'de> for TextValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a null, bool, number, string, list or map")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }
    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }
    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::I64(v))
    }
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::U64(v))
    }
    fn visit_f32<E: de::Error>(self, v: f32) -> Result<Value, E> {
        Ok(Value::F32(v))
    }
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::F64(v))
    }
    fn visit_char<E: de::Error>(self, v: char) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }
    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            entries.push((key, value));
        }
        Ok(Value::Map(entries))
    }
}

// ---------------------------------------------------------------------------
// serde bridge: T <-> Value
// ---------------------------------------------------------------------------

/// Error produced by [`to_value`] / [`from_value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError(String);

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ValueError {}

impl ser::Error for ValueError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        ValueError(msg.to_string())
    }
}

impl de::Error for ValueError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        ValueError(msg.to_string())
    }
}

/// Convert any `T: Serialize` into a [`Value`].
///
/// Structs become ordered maps, unit variants their name, and data-carrying
/// variants a single-entry map `{variant: data}`.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, ValueError> {
    value.serialize(ValueSerializer)
}

/// Convert a [`Value`] back into any `T: DeserializeOwned`.
pub fn from_value<T: de::DeserializeOwned>(value: Value) -> Result<T, ValueError> {
    T::deserialize(ValueDeserializer(value))
}

struct ValueSerializer;

macro_rules! serialize_scalar {
    ($($method:ident($ty:ty) => $variant:ident as $wide:ty),* $(,)?) => {$(
        fn $method(self, v: $ty) -> Result<Value, ValueError> {
            Ok(Value::$variant(v as $wide))
        }
    )*};
}

impl Serializer for ValueSerializer {
    type Ok = Value;
    type Error = ValueError;
    type SerializeSeq = Compound;
    type SerializeTuple = Compound;
    type SerializeTupleStruct = Compound;
    type SerializeTupleVariant = Compound;
    type SerializeMap = Compound;
    type SerializeStruct = Compound;
    type SerializeStructVariant = Compound;

    serialize_scalar! {
        serialize_i8(i8) => I64 as i64,
        serialize_i16(i16) => I64 as i64,
        serialize_i32(i32) => I64 as i64,
        serialize_i64(i64) => I64 as i64,
        serialize_u8(u8) => U64 as u64,
        serialize_u16(u16) => U64 as u64,
        serialize_u32(u32) => U64 as u64,
        serialize_u64(u64) => U64 as u64,
        serialize_f32(f32) => F32 as f32,
        serialize_f64(f64) => F64 as f64,
    }

    fn serialize_bool(self, v: bool) -> Result<Value, ValueError> {
        Ok(Value::Bool(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, ValueError> {
        Ok(Value::String(v.into()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, ValueError> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, ValueError> {
        Ok(Value::List(v.iter().map(|&b| Value::U64(b.into())).collect()))
    }

    fn serialize_none(self) -> Result<Value, ValueError> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value, ValueError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, ValueError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, ValueError> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Value, ValueError> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, ValueError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, ValueError> {
        Ok(Compound::tag(Some(variant), to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Compound, ValueError> {
        Ok(Compound::new(None, len))
    }

    fn serialize_tuple(self, len: usize) -> Result<Compound, ValueError> {
        Ok(Compound::new(None, Some(len)))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<Compound, ValueError> {
        Ok(Compound::new(None, Some(len)))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Compound, ValueError> {
        Ok(Compound::new(Some(variant), Some(len)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Compound, ValueError> {
        Ok(Compound::new(None, len))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Compound, ValueError> {
        Ok(Compound::new(None, Some(len)))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Compound, ValueError> {
        Ok(Compound::new(Some(variant), Some(len)))
    }
}

/// Collects the parts of a sequence or map, optionally wrapped as
/// `{variant: ...}`.
struct Compound {
    variant: Option<&'static str>,
    items: Vec<Value>,
    entries: Vec<(String, Value)>,
    key: Option<String>,
}

impl Compound {
    fn new(variant: Option<&'static str>, len: Option<usize>) -> Self {
        let capacity = len.unwrap_or(0);
        Self {
            variant,
            items: Vec::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
            key: None,
        }
    }

    fn tag(variant: Option<&'static str>, value: Value) -> Value {
        match variant {
            Some(name) => Value::Map(vec![(name.to_owned(), value)]),
            None => value,
        }
    }

    fn item<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ValueError> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn entry<T: ?Sized + Serialize>(&mut self, key: &str, value: &T) -> Result<(), ValueError> {
        self.entries.push((key.to_owned(), to_value(value)?));
        Ok(())
    }

    fn list(self) -> Result<Value, ValueError> {
        Ok(Self::tag(self.variant, Value::List(self.items)))
    }

    fn map(self) -> Result<Value, ValueError> {
        Ok(Self::tag(self.variant, Value::Map(self.entries)))
    }
}

macro_rules! compound_list {
    ($($trait:ident :: $method:ident),*) => {$(
        impl ser::$trait for Compound {
            type Ok = Value;
            type Error = ValueError;

            fn $method<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ValueError> {
                self.item(value)
            }

            fn end(self) -> Result<Value, ValueError> {
                self.list()
            }
        }
    )*};
}

compound_list!(
    SerializeSeq::serialize_element,
    SerializeTuple::serialize_element,
    SerializeTupleStruct::serialize_field,
    SerializeTupleVariant::serialize_field
);

macro_rules! compound_struct {
    ($($trait:ident),*) => {$(
        impl ser::$trait for Compound {
            type Ok = Value;
            type Error = ValueError;

            fn serialize_field<T: ?Sized + Serialize>(
                &mut self,
                key: &'static str,
                value: &T,
            ) -> Result<(), ValueError> {
                self.entry(key, value)
            }

            fn end(self) -> Result<Value, ValueError> {
                self.map()
            }
        }
    )*};
}

compound_struct!(SerializeStruct, SerializeStructVariant);

impl ser::SerializeMap for Compound {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), ValueError> {
        self.key = Some(match to_value(key)? {
            Value::String(s) => s,
            other => other.to_string(),
        });
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ValueError> {
        let key = self
            .key
            .take()
            .ok_or_else(|| ValueError("map value without a key".into()))?;
        self.entry(&key, value)
    }

    fn end(self) -> Result<Value, ValueError> {
        self.map()
    }
}

/// Reads a [`Value`] through serde's stock seq/map/enum accessors.
pub struct ValueDeserializer(Value);

impl<'de> IntoDeserializer<'de, ValueError> for Value {
    type Deserializer = ValueDeserializer;

    fn into_deserializer(self) -> ValueDeserializer {
        ValueDeserializer(self)
    }
}

impl<'de> Deserializer<'de> for ValueDeserializer {
    type Error = ValueError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        match self.0 {
            Value::Null => visitor.visit_unit(),
            Value::Bool(v) => visitor.visit_bool(v),
            Value::I64(v) => visitor.visit_i64(v),
            Value::U64(v) => visitor.visit_u64(v),
            Value::F32(v) => visitor.visit_f32(v),
            Value::F64(v) => visitor.visit_f64(v),
            Value::String(v) => visitor.visit_string(v),
            Value::List(items) => visitor.visit_seq(SeqDeserializer::new(items.into_iter())),
            Value::Map(entries) => visitor.visit_map(MapDeserializer::new(entries.into_iter())),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        match self.0 {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(ValueDeserializer(other)),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, ValueError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, ValueError> {
        match self.0 {
            Value::String(variant) => visitor.visit_enum(variant.into_deserializer()),
            Value::Map(entries) if entries.len() == 1 => visitor.visit_enum(
                MapAccessDeserializer::new(MapDeserializer::new(entries.into_iter())),
            ),
            other => Err(ValueError(format!(
                "expected a variant name or a single-entry map, found {}",
                other.kind_name()
            ))),
        }
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

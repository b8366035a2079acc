//! Element serializer: ordered collections ↔ tagged elements.

use crate::codec;
use crate::element::{ElementContainer, TaggedElement};
use crate::error::{DeserializeError, SerializeError};
use crate::format::Format;
use crate::object::SerialObject;
use crate::registry::TypeRegistry;

/// Serializes collections of objects viewed through `V` and rebuilds them.
///
/// Every element is tagged with the registered name of its runtime type, so
/// a `Vec<Box<dyn Base>>` holding several concrete types comes back with
/// the same concrete types in the same order.
#[derive(Clone, Copy)]
pub struct ElementSerializer<'r> {
    registry: &'r TypeRegistry,
    format: Format,
}

impl<'r> ElementSerializer<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            format: Format::default(),
        }
    }

    /// Use `format` for payload text.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Serialize one object by its runtime type.
    pub fn serialize_one(&self, object: &dyn SerialObject) -> Result<TaggedElement, SerializeError> {
        let type_name = self.registry.identifier_for(object)?;
        let payload = codec::encode(self.registry, object, self.format)?;
        Ok(TaggedElement::new(type_name, payload))
    }

    /// Serialize a collection, one element per object, in order.
    ///
    /// # Errors
    ///
    /// Fails without partial output if any object's runtime type is not
    /// registered or any field cannot be represented.
    pub fn serialize<V>(&self, objects: &[Box<V>]) -> Result<Vec<TaggedElement>, SerializeError>
    where
        V: SerialObject + ?Sized,
    {
        self.serialize_iter(objects.iter().map(|object| object.as_ref()))
    }

    /// [`serialize`](Self::serialize) over any iterator of borrowed objects.
    pub fn serialize_iter<'a, V, I>(&self, objects: I) -> Result<Vec<TaggedElement>, SerializeError>
    where
        V: SerialObject + ?Sized + 'a,
        I: IntoIterator<Item = &'a V>,
    {
        let elements = objects
            .into_iter()
            .map(|object| self.serialize_one(object.as_serial()))
            .collect::<Result<Vec<_>, _>>()?;
        log::trace!("Serialized {} elements as {}", elements.len(), self.format);
        Ok(elements)
    }

    /// Rebuild one element and cast it to `V`.
    ///
    /// The element's recorded type name picks the concrete type;
    /// `V` only has to be a view that type declared.
    pub fn deserialize_one<V: ?Sized + 'static>(
        &self,
        element: &TaggedElement,
    ) -> Result<Box<V>, DeserializeError> {
        let descriptor = self.registry.resolve(&element.type_name)?;
        let mut object = self.registry.instantiate(descriptor);
        codec::decode(
            self.registry,
            &element.payload,
            descriptor,
            object.as_mut(),
            self.format,
        )?;
        descriptor.cast::<V>(object)
    }

    /// Rebuild a collection, preserving order.
    ///
    /// # Errors
    ///
    /// Stops at the first element that fails: [`DeserializeError::UnknownType`],
    /// [`DeserializeError::MalformedPayload`] or
    /// [`DeserializeError::TypeMismatch`]. Use
    /// [`deserialize_each`](Self::deserialize_each) to keep the good ones.
    pub fn deserialize<V: ?Sized + 'static>(
        &self,
        elements: &[TaggedElement],
    ) -> Result<Vec<Box<V>>, DeserializeError> {
        let objects = elements
            .iter()
            .map(|element| self.deserialize_one::<V>(element))
            .collect::<Result<Vec<_>, _>>()?;
        log::trace!("Deserialized {} elements as {}", objects.len(), self.format);
        Ok(objects)
    }

    /// Rebuild every element independently.
    pub fn deserialize_each<V: ?Sized + 'static>(
        &self,
        elements: &[TaggedElement],
    ) -> Vec<Result<Box<V>, DeserializeError>> {
        elements
            .iter()
            .map(|element| self.deserialize_one::<V>(element))
            .collect()
    }

    /// Serialize a collection into a container.
    pub fn serialize_container<V>(&self, objects: &[Box<V>]) -> Result<ElementContainer, SerializeError>
    where
        V: SerialObject + ?Sized,
    {
        self.serialize(objects).map(ElementContainer::new)
    }

    /// Rebuild every element of a container.
    pub fn deserialize_container<V: ?Sized + 'static>(
        &self,
        container: &ElementContainer,
    ) -> Result<Vec<Box<V>>, DeserializeError> {
        self.deserialize(&container.elements)
    }

    /// Serialize a collection straight to container text.
    pub fn to_text<V>(&self, objects: &[Box<V>]) -> Result<String, SerializeError>
    where
        V: SerialObject + ?Sized,
    {
        self.serialize_container(objects)?.to_text(self.format)
    }

    /// Parse container text and rebuild its elements.
    pub fn from_text<V: ?Sized + 'static>(&self, text: &str) -> Result<Vec<Box<V>>, DeserializeError> {
        let container = ElementContainer::from_text(text, self.format)?;
        self.deserialize_container(&container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Serializable;

    #[derive(Debug, Default, PartialEq, Serializable)]
    struct Note {
        text: String,
    }

    #[derive(Debug, Default, PartialEq, Serializable)]
    struct Tally {
        count: u16,
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<Note>().unwrap();
        registry.register::<Tally>().unwrap();
        registry
    }

    fn objects() -> Vec<Box<dyn SerialObject>> {
        vec![
            Box::new(Note { text: "a".into() }),
            Box::new(Tally { count: 2 }),
            Box::new(Note { text: "b".into() }),
        ]
    }

    #[test]
    fn one_element_per_object_in_order() {
        let registry = registry();
        let elements = registry.serializer().serialize(&objects()).unwrap();
        let names: Vec<_> = elements.iter().map(|e| e.type_name.as_str()).collect();
        assert_eq!(names, ["Note", "Tally", "Note"]);
        assert_eq!(elements[1].payload, r#"{"count":2}"#);
    }

    #[test]
    fn empty_collection() {
        let registry = registry();
        let serializer = registry.serializer();
        let none: Vec<Box<dyn SerialObject>> = Vec::new();
        let elements = serializer.serialize(&none).unwrap();
        assert!(elements.is_empty());
        assert!(serializer.deserialize::<dyn SerialObject>(&elements).unwrap().is_empty());
    }

    #[test]
    fn same_instance_twice_gives_independent_outputs() {
        let registry = registry();
        let serializer = registry.serializer();
        let note = Note { text: "same".into() };
        let elements = serializer.serialize_iter([&note, &note]).unwrap();
        let mut loaded: Vec<Box<Note>> = serializer.deserialize(&elements).unwrap();
        loaded[0].text.push('!');
        assert_eq!(loaded[0].text, "same!");
        assert_eq!(loaded[1].text, "same");
    }

    #[test]
    fn abort_versus_each() {
        let registry = registry();
        let serializer = registry.serializer();
        let mut elements = serializer.serialize(&objects()).unwrap();
        elements[1].type_name = "Gone".into();

        assert_eq!(
            serializer.deserialize::<dyn SerialObject>(&elements).unwrap_err(),
            DeserializeError::UnknownType {
                type_name: "Gone".into()
            }
        );

        let each = serializer.deserialize_each::<dyn SerialObject>(&elements);
        assert_eq!(each.len(), 3);
        assert!(each[0].is_ok());
        assert!(each[1].is_err());
        assert!(each[2].is_ok());
    }

    #[test]
    fn concrete_view_rejects_other_types() {
        let registry = registry();
        let serializer = registry.serializer();
        let elements = serializer.serialize(&objects()).unwrap();
        assert!(matches!(
            serializer.deserialize::<Note>(&elements),
            Err(DeserializeError::TypeMismatch { type_name, .. }) if type_name == "Tally"
        ));
    }

    #[test]
    fn text_roundtrip() {
        let registry = registry();
        let serializer = registry.serializer().with_format(Format::JsonPretty);
        let text = serializer.to_text(&objects()).unwrap();
        let loaded = serializer.from_text::<dyn SerialObject>(&text).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[1].downcast_ref::<Tally>(), Some(&Tally { count: 2 }));
    }
}

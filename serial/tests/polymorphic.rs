use redlilium_serial::{
    DeserializeError, ElementContainer, Format, PayloadFault, SerialObject, Serializable,
    SerializeError, TaggedElement, TypeRegistry,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serializable)]
struct SimpleRecord {
    string_value: String,
    int_value: i32,
    float_value: f32,
    array_value: Vec<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serializable)]
struct ChildA {
    #[serial(extends)]
    base: SimpleRecord,
    child_string: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serializable)]
struct ChildB {
    #[serial(extends)]
    base: SimpleRecord,
    child_int: i32,
}

/// Never registered.
#[derive(Debug, Clone, Default, PartialEq, Serializable)]
struct Stranger {
    note: String,
}

/// Record holding a nested polymorphic object and optional array.
#[derive(Debug, Default, Serializable)]
struct Holder {
    inner: Option<Box<dyn SerialObject>>,
    extra: Option<Vec<u8>>,
}

/// Base view shared by the record family.
trait SimpleView: SerialObject {
    fn simple(&self) -> &SimpleRecord;
}

/// Capability unrelated to the record family.
trait Marker: SerialObject {}

impl SimpleView for SimpleRecord {
    fn simple(&self) -> &SimpleRecord {
        self
    }
}

impl SimpleView for ChildA {
    fn simple(&self) -> &SimpleRecord {
        &self.base
    }
}

impl SimpleView for ChildB {
    fn simple(&self) -> &SimpleRecord {
        &self.base
    }
}

impl Marker for SimpleRecord {}
impl Marker for ChildA {}
impl Marker for ChildB {}

fn simple_reference() -> SimpleRecord {
    SimpleRecord {
        string_value: "ABCD".into(),
        int_value: 5,
        float_value: 7.7,
        array_value: vec![1, 2, 3, 4],
    }
}

fn child_base() -> SimpleRecord {
    SimpleRecord {
        string_value: "qwee".into(),
        int_value: 5,
        float_value: 6.0,
        array_value: vec![5, 6, 7, 8],
    }
}

fn child_a_reference() -> ChildA {
    ChildA {
        base: child_base(),
        child_string: "CHILD".into(),
    }
}

fn child_b_reference() -> ChildB {
    ChildB {
        base: child_base(),
        child_int: 666,
    }
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register::<SimpleRecord>()
        .unwrap()
        .view::<dyn SimpleView>(|r| r as Box<dyn SimpleView>)
        .view::<dyn Marker>(|r| r as Box<dyn Marker>);
    registry
        .register::<ChildA>()
        .unwrap()
        .view::<dyn SimpleView>(|r| r as Box<dyn SimpleView>)
        .view::<dyn Marker>(|r| r as Box<dyn Marker>);
    registry
        .register::<ChildB>()
        .unwrap()
        .view::<dyn SimpleView>(|r| r as Box<dyn SimpleView>)
        .view::<dyn Marker>(|r| r as Box<dyn Marker>);
    registry.register::<Holder>().unwrap();
    registry
}

/// Checks the object's concrete type and every field against its reference.
fn assert_as_reference(object: &dyn SerialObject) {
    if let Some(record) = object.downcast_ref::<SimpleRecord>() {
        assert_eq!(record, &simple_reference());
        assert_eq!(record.array_value.len(), 4);
    } else if let Some(record) = object.downcast_ref::<ChildA>() {
        assert_eq!(record, &child_a_reference());
    } else if let Some(record) = object.downcast_ref::<ChildB>() {
        assert_eq!(record, &child_b_reference());
    } else {
        panic!("unexpected type {}", object.serial_name());
    }
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn simple_record_round_trip() {
    let registry = registry();
    let serializer = registry.serializer();
    let records: Vec<Box<SimpleRecord>> = vec![Box::new(simple_reference())];

    let elements = serializer.serialize(&records).unwrap();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].type_name, "SimpleRecord");
    assert_eq!(
        elements[0].payload,
        r#"{"string_value":"ABCD","int_value":5,"float_value":7.7,"array_value":{"length":4,"items":[1,2,3,4]}}"#
    );

    let loaded: Vec<Box<SimpleRecord>> = serializer.deserialize(&elements).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(*loaded[0], simple_reference());
}

#[test]
fn polymorphism_via_base_view() {
    let registry = registry();
    let serializer = registry.serializer();
    let records: Vec<Box<dyn SimpleView>> = vec![
        Box::new(simple_reference()),
        Box::new(child_a_reference()),
        Box::new(child_b_reference()),
    ];

    let elements = serializer.serialize(&records).unwrap();
    assert_eq!(elements.len(), records.len());

    let loaded: Vec<Box<dyn SimpleView>> = serializer.deserialize(&elements).unwrap();
    assert_eq!(loaded.len(), 3);
    assert!(loaded[0].as_serial().is::<SimpleRecord>());
    assert!(loaded[1].as_serial().is::<ChildA>());
    assert!(loaded[2].as_serial().is::<ChildB>());
    for record in &loaded {
        assert_as_reference(record.as_serial());
    }
    assert_eq!(loaded[2].simple().string_value, "qwee");
}

#[test]
fn polymorphism_via_capability_view() {
    let registry = registry();
    let serializer = registry.serializer();
    let records: Vec<Box<dyn Marker>> = vec![
        Box::new(simple_reference()),
        Box::new(child_a_reference()),
        Box::new(child_b_reference()),
    ];

    let elements = serializer.serialize(&records).unwrap();
    assert_eq!(elements.len(), 3);

    let loaded: Vec<Box<dyn Marker>> = serializer.deserialize(&elements).unwrap();
    let names: Vec<_> = loaded.iter().map(|r| r.serial_name()).collect();
    assert_eq!(names, ["SimpleRecord", "ChildA", "ChildB"]);
    for record in &loaded {
        assert_as_reference(record.as_serial());
    }
}

#[test]
fn views_are_interchangeable() {
    let registry = registry();
    let serializer = registry.serializer();
    let records: Vec<Box<dyn SimpleView>> = vec![
        Box::new(child_a_reference()),
        Box::new(simple_reference()),
    ];

    let elements = serializer.serialize(&records).unwrap();
    let as_marker: Vec<Box<dyn Marker>> = serializer.deserialize(&elements).unwrap();
    let as_object: Vec<Box<dyn SerialObject>> = serializer.deserialize(&elements).unwrap();
    assert_as_reference(as_marker[0].as_serial());
    assert_as_reference(as_object[1].as_ref());
}

#[test]
fn container_round_trip_through_text() {
    let registry = registry();
    let records: Vec<Box<dyn SimpleView>> = vec![
        Box::new(simple_reference()),
        Box::new(child_a_reference()),
        Box::new(child_b_reference()),
    ];

    for format in [
        Format::Json,
        Format::JsonPretty,
        #[cfg(feature = "serialize-ron")]
        Format::Ron,
    ] {
        let serializer = registry.serializer().with_format(format);
        let container = serializer.serialize_container(&records).unwrap();
        let text = container.to_text(format).unwrap();
        let parsed = ElementContainer::from_text(&text, format).unwrap();
        assert_eq!(parsed, container);

        let loaded: Vec<Box<dyn SimpleView>> = serializer.deserialize_container(&parsed).unwrap();
        assert_eq!(loaded.len(), 3);
        for record in &loaded {
            assert_as_reference(record.as_serial());
        }
    }
}

#[test]
fn nested_object_and_optional_fields() {
    let registry = registry();
    let serializer = registry.serializer();
    let holders: Vec<Box<Holder>> = vec![
        Box::new(Holder {
            inner: Some(Box::new(child_b_reference())),
            extra: Some(Vec::new()),
        }),
        Box::new(Holder::default()),
    ];

    let elements = serializer.serialize(&holders).unwrap();
    assert!(elements[0].payload.contains(r#""inner":{"type":"ChildB","data":{"#));
    assert!(elements[0].payload.contains(r#""extra":{"length":0,"items":[]}"#));
    assert_eq!(elements[1].payload, r#"{"inner":null,"extra":null}"#);

    let loaded: Vec<Box<Holder>> = serializer.deserialize(&elements).unwrap();
    let inner = loaded[0].inner.as_deref().unwrap();
    assert_as_reference(inner);
    assert_eq!(loaded[0].extra, Some(Vec::new()));
    assert!(loaded[1].inner.is_none());
    assert_eq!(loaded[1].extra, None);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn unknown_identifier() {
    let registry = registry();
    let elements = vec![TaggedElement::new("NoSuchType", "{}")];
    let result = registry.serializer().deserialize::<dyn SerialObject>(&elements);
    assert_eq!(
        result.unwrap_err(),
        DeserializeError::UnknownType {
            type_name: "NoSuchType".into()
        }
    );
}

#[test]
fn unknown_identifier_inside_nested_object() {
    let registry = registry();
    let payload = r#"{"inner":{"type":"Gone","data":{}},"extra":null}"#;
    let elements = vec![TaggedElement::new("Holder", payload)];
    assert_eq!(
        registry
            .serializer()
            .deserialize::<Holder>(&elements)
            .unwrap_err(),
        DeserializeError::UnknownType {
            type_name: "Gone".into()
        }
    );
}

#[test]
fn view_not_declared() {
    let registry = registry();
    let serializer = registry.serializer();
    let holders: Vec<Box<Holder>> = vec![Box::new(Holder::default())];
    let elements = serializer.serialize(&holders).unwrap();

    match serializer.deserialize::<dyn Marker>(&elements) {
        Err(DeserializeError::TypeMismatch { type_name, view }) => {
            assert_eq!(type_name, "Holder");
            assert!(view.contains("Marker"));
        }
        other => panic!("expected TypeMismatch, got {:?}", other.map(|v| v.len())),
    }
}

#[test]
fn unregistered_type_aborts_whole_batch() {
    let registry = registry();
    let records: Vec<Box<dyn SerialObject>> = vec![
        Box::new(simple_reference()),
        Box::new(Stranger::default()),
    ];
    assert_eq!(
        registry.serializer().serialize(&records),
        Err(SerializeError::UnregisteredType {
            type_name: "Stranger".into()
        })
    );
}

#[test]
fn malformed_payload_names_type_and_field() {
    let registry = registry();
    let elements = vec![TaggedElement::new(
        "ChildB",
        r#"{"string_value":"x","int_value":1,"float_value":1.0,"array_value":{"length":0,"items":[]},"child_int":"lots"}"#,
    )];
    match registry.serializer().deserialize::<dyn SimpleView>(&elements) {
        Err(DeserializeError::MalformedPayload { type_name, fault }) => {
            assert_eq!(type_name, "ChildB");
            assert!(matches!(fault, PayloadFault::InvalidValue { ref field, .. } if field == "child_int"));
        }
        other => panic!("expected MalformedPayload, got {:?}", other.map(|v| v.len())),
    }
}

#[test]
fn non_finite_float_is_rejected() {
    let registry = registry();
    let mut record = simple_reference();
    record.float_value = f32::NAN;
    assert!(matches!(
        registry.serializer().serialize_iter([&record]),
        Err(SerializeError::Field { field, .. }) if field == "float_value"
    ));
}

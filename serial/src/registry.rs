//! Type registry: stable names ↔ concrete serializable types.
//!
//! Types are registered explicitly, once, before any serialization happens.
//! Each registration records a [`TypeDescriptor`]: the type's name, its full
//! (flattened) field list, a factory for blank instances and the set of
//! views the type can be cast to on load.
//!
//! A view is any `'static` type `V`, usually a trait object. Both base views
//! (a trait shared by a family of records) and unrelated capability traits
//! are declared the same way:
//!
//! ```ignore
//! registry
//!     .register::<ChildRecord>()?
//!     .view::<dyn RecordView>(|r| r as Box<dyn RecordView>)
//!     .view::<dyn Tagged>(|r| r as Box<dyn Tagged>);
//! ```
//!
//! Every registered type also conforms to itself and to `dyn SerialObject`.
//! After population the registry is only read; share it with `Arc` when
//! several threads serialize at once.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;

use crate::error::{DeserializeError, RegistryError, SerializeError};
use crate::field::FieldInfo;
use crate::helper::ElementSerializer;
use crate::object::{SerialObject, SerialType};

type ViewCast = Box<dyn Fn(Box<dyn SerialObject>) -> Option<Box<dyn Any>> + Send + Sync>;

/// A view a concrete type declared at registration.
struct ViewEntry {
    name: &'static str,
    cast: ViewCast,
}

/// Everything the registry knows about one concrete type.
pub struct TypeDescriptor {
    name: &'static str,
    rust_type_name: &'static str,
    type_id: TypeId,
    extends: Option<&'static str>,
    fields: Vec<FieldInfo>,
    factory: fn() -> Box<dyn SerialObject>,
    views: HashMap<TypeId, ViewEntry>,
}

impl TypeDescriptor {
    /// The stable identifier written into tagged elements.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `std::any::type_name` of the registered type.
    pub fn rust_type_name(&self) -> &'static str {
        self.rust_type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Identifier of the embedded base record, if the type extends one.
    pub fn extends(&self) -> Option<&'static str> {
        self.extends
    }

    /// Full field list, inherited fields first.
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Create a blank (default-valued) instance.
    pub fn instantiate(&self) -> Box<dyn SerialObject> {
        (self.factory)()
    }

    /// Whether this type declared the view `V`.
    pub fn conforms_to<V: ?Sized + 'static>(&self) -> bool {
        self.views.contains_key(&TypeId::of::<V>())
    }

    /// Names of every declared view, sorted.
    pub fn view_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.views.values().map(|v| v.name).collect();
        names.sort_unstable();
        names
    }

    /// Cast an instance of this type to the view `V`.
    ///
    /// # Errors
    ///
    /// [`DeserializeError::TypeMismatch`] if `V` was not declared, or if
    /// `object` is not an instance of this type.
    pub fn cast<V: ?Sized + 'static>(
        &self,
        object: Box<dyn SerialObject>,
    ) -> Result<Box<V>, DeserializeError> {
        let mismatch = || DeserializeError::TypeMismatch {
            type_name: self.name.to_owned(),
            view: std::any::type_name::<V>().to_owned(),
        };
        let view = self.views.get(&TypeId::of::<V>()).ok_or_else(mismatch)?;
        let erased = (view.cast)(object).ok_or_else(mismatch)?;
        erased
            .downcast::<Box<V>>()
            .map(|boxed| *boxed)
            .map_err(|_| mismatch())
    }
}

impl std::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("rust_type_name", &self.rust_type_name)
            .field("extends", &self.extends)
            .field("fields", &self.fields)
            .field("views", &self.view_names())
            .finish()
    }
}

/// Handle returned by [`TypeRegistry::register`] for declaring views.
pub struct Registration<'a, T> {
    descriptor: &'a mut TypeDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: SerialType> Registration<'_, T> {
    /// Declare that `T` can be viewed as `V`.
    ///
    /// `cast` is usually an unsizing coercion, e.g.
    /// `|r| r as Box<dyn MyTrait>`.
    pub fn view<V: ?Sized + 'static>(self, cast: fn(Box<T>) -> Box<V>) -> Self {
        insert_view::<T, V>(self.descriptor, cast);
        self
    }

    /// The descriptor recorded so far.
    pub fn descriptor(&self) -> &TypeDescriptor {
        self.descriptor
    }
}

fn insert_view<T: SerialType, V: ?Sized + 'static>(
    descriptor: &mut TypeDescriptor,
    cast: fn(Box<T>) -> Box<V>,
) {
    let erased: ViewCast = Box::new(move |object: Box<dyn SerialObject>| {
        let concrete = object.into_any().downcast::<T>().ok()?;
        Some(Box::new(cast(concrete)) as Box<dyn Any>)
    });
    descriptor.views.insert(
        TypeId::of::<V>(),
        ViewEntry {
            name: std::any::type_name::<V>(),
            cast: erased,
        },
    );
}

fn instantiate_default<T: SerialType>() -> Box<dyn SerialObject> {
    Box::new(T::default())
}

/// Registry of serializable types, keyed by their stable names.
#[derive(Default)]
pub struct TypeRegistry {
    by_name: BTreeMap<&'static str, TypeDescriptor>,
    by_type: HashMap<TypeId, &'static str>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under [`SerialType::NAME`].
    ///
    /// The flattened field list is captured here, once. `T` automatically
    /// conforms to the views `T` and `dyn SerialObject`; declare further
    /// views on the returned [`Registration`].
    ///
    /// # Errors
    ///
    /// - [`RegistryError::AlreadyRegistered`] if `T` was registered before.
    /// - [`RegistryError::DuplicateName`] if another type uses the same name.
    /// - [`RegistryError::DuplicateField`] if a field name repeats (usually a
    ///   child re-declaring a field of its base).
    pub fn register<T: SerialType>(&mut self) -> Result<Registration<'_, T>, RegistryError> {
        let type_id = TypeId::of::<T>();
        if self.by_type.contains_key(&type_id) {
            return Err(RegistryError::AlreadyRegistered { type_name: T::NAME });
        }
        if let Some(existing) = self.by_name.get(T::NAME) {
            return Err(RegistryError::DuplicateName {
                type_name: T::NAME,
                existing: existing.rust_type_name,
            });
        }

        let fields = T::fields();
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(RegistryError::DuplicateField {
                    type_name: T::NAME,
                    field: field.name,
                });
            }
        }

        log::debug!(
            "Registered serial type '{}' ({} fields{})",
            T::NAME,
            fields.len(),
            T::EXTENDS
                .map(|base| format!(", extends '{base}'"))
                .unwrap_or_default()
        );

        let mut descriptor = TypeDescriptor {
            name: T::NAME,
            rust_type_name: std::any::type_name::<T>(),
            type_id,
            extends: T::EXTENDS,
            fields,
            factory: instantiate_default::<T>,
            views: HashMap::new(),
        };
        insert_view::<T, T>(&mut descriptor, |record| record);
        insert_view::<T, dyn SerialObject>(&mut descriptor, |record| record as Box<dyn SerialObject>);

        self.by_type.insert(type_id, T::NAME);
        let descriptor = self.by_name.entry(T::NAME).or_insert(descriptor);
        Ok(Registration {
            descriptor,
            _marker: PhantomData,
        })
    }

    /// Identifier of the object's runtime type.
    ///
    /// # Errors
    ///
    /// [`SerializeError::UnregisteredType`] if the runtime type was never
    /// registered.
    pub fn identifier_for(&self, object: &dyn SerialObject) -> Result<&'static str, SerializeError> {
        self.by_type
            .get(&object.as_any().type_id())
            .copied()
            .ok_or_else(|| SerializeError::UnregisteredType {
                type_name: object.serial_name().to_owned(),
            })
    }

    /// Look up the descriptor registered under `name`.
    ///
    /// # Errors
    ///
    /// [`DeserializeError::UnknownType`] if nothing was registered under it.
    pub fn resolve(&self, name: &str) -> Result<&TypeDescriptor, DeserializeError> {
        self.by_name
            .get(name)
            .ok_or_else(|| DeserializeError::UnknownType {
                type_name: name.to_owned(),
            })
    }

    /// Create a blank instance of a resolved type.
    pub fn instantiate(&self, descriptor: &TypeDescriptor) -> Box<dyn SerialObject> {
        descriptor.instantiate()
    }

    /// Descriptor of a registered type.
    pub fn descriptor_of<T: SerialType>(&self) -> Option<&TypeDescriptor> {
        let name = self.by_type.get(&TypeId::of::<T>())?;
        self.by_name.get(name)
    }

    /// Whether a type is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Registered descriptors, ordered by name.
    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> + '_ {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Element serializer over this registry, using the default [`Format`](crate::Format).
    pub fn serializer(&self) -> ElementSerializer<'_> {
        ElementSerializer::new(self)
    }
}

//! Target side of a transform: the [`Model`] capability trait, the field
//! accessor table and the descriptors used to name a target type or instance.

use crate::error::{BoxError, FieldError, MapError};
use crate::mapper::Mapper;
use crate::mapping::PropertyMapping;
use crate::parsing::kind_of;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::any::{Any, TypeId, type_name};
use std::fmt;

/// Per-field transformer, invoked with the raw JSON value found for the field.
pub type Transformer = fn(Value) -> Result<FieldValue, BoxError>;

type Setter<T> = Box<dyn Fn(&mut T, FieldValue) -> Result<(), FieldError>>;
type Construct = fn() -> Box<dyn Any>;
type Populate = fn(&Mapper, &Map<String, Value>, &mut dyn Any) -> Result<(), MapError>;

/// A type that JSON objects can be mapped into.
///
/// Only [`Model::fields`] is required. Every other hook defaults to "not
/// provided", which leaves the field to the plain same-name mapping.
///
/// ```
/// use json_mapper::{Field, Fields, Model, PropertyMapping};
///
/// #[derive(Default)]
/// struct User {
///     username: String,
///     profile_url: String,
/// }
///
/// impl Model for User {
///     fn fields() -> Fields<Self> {
///         Fields::new()
///             .with(Field::json("username", |user: &mut User, value: String| user.username = value))
///             .with(Field::json("profileUrl", |user: &mut User, value: String| user.profile_url = value))
///     }
///
///     fn property_mapping() -> Option<PropertyMapping> {
///         Some(PropertyMapping::new().map("profileUrl", "_links.profile.href"))
///     }
/// }
/// ```
pub trait Model: Sized + 'static {
    /// Accessor table of the type, in declaration order
    fn fields() -> Fields<Self>;

    /// Explicit destination to source path overrides
    fn property_mapping() -> Option<PropertyMapping> {
        None
    }

    /// Transformer applied to the raw value of `field` before it is committed
    fn transformer(_field: &str) -> Option<Transformer> {
        None
    }

    /// Type the value of `field` is recursively mapped into
    fn nested_type(_field: &str) -> Option<TargetType> {
        None
    }
}

/// How a field can be written from the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Directly writable field
    Public,
    /// Field written through an explicit mutator
    Mutator,
    /// Field hidden from the default mapping; only written when a property
    /// mapping names it
    Private,
}

impl Access {
    pub fn is_committable(self) -> bool {
        matches!(self, Access::Public | Access::Mutator)
    }
}

/// One entry of a [`Fields`] table: a destination name plus its setter.
pub struct Field<T> {
    name: &'static str,
    access: Access,
    setter: Setter<T>,
}

impl<T: 'static> Field<T> {
    /// Create a field from a raw setter working on [`FieldValue`]
    pub fn new<F>(name: &'static str, setter: F) -> Self
    where
        F: Fn(&mut T, FieldValue) -> Result<(), FieldError> + 'static,
    {
        Field {
            name,
            access: Access::Public,
            setter: Box::new(setter),
        }
    }

    /// Field whose value is deserialized from JSON with serde
    pub fn json<V, F>(name: &'static str, assign: F) -> Self
    where
        V: DeserializeOwned + Any,
        F: Fn(&mut T, V) + 'static,
    {
        Self::new(name, move |target, value| {
            assign(target, value.into_json()?);
            Ok(())
        })
    }

    /// Field holding a native value: a transformer output or a nested model.
    ///
    /// Raw JSON never converts into a native field, so the type must declare
    /// a transformer or a nested type for it. Otherwise the field is skipped
    /// on every transform and a `warn!` event is emitted.
    pub fn native<V, F>(name: &'static str, assign: F) -> Self
    where
        V: Any,
        F: Fn(&mut T, V) + 'static,
    {
        Self::new(name, move |target, value| {
            assign(target, value.into_native()?);
            Ok(())
        })
    }

    /// Field holding a list of nested models
    pub fn list<V, F>(name: &'static str, assign: F) -> Self
    where
        V: Any,
        F: Fn(&mut T, Vec<V>) + 'static,
    {
        Self::new(name, move |target, value| {
            assign(target, value.into_list()?);
            Ok(())
        })
    }

    /// Mark the field as written through a mutator
    pub fn mutator(mut self) -> Self {
        self.access = Access::Mutator;
        self
    }

    /// Hide the field from the default mapping
    pub fn private(mut self) -> Self {
        self.access = Access::Private;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub(crate) fn commit(&self, target: &mut T, value: FieldValue) -> Result<(), FieldError> {
        (self.setter)(target, value)
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

/// Field accessor table of a [`Model`].
pub struct Fields<T> {
    entries: Vec<Field<T>>,
}

impl<T: 'static> Fields<T> {
    pub fn new() -> Self {
        Fields {
            entries: Vec::new(),
        }
    }

    /// Append a field. A later field with the same name replaces the earlier one.
    pub fn with(mut self, field: Field<T>) -> Self {
        match self.entries.iter_mut().find(|entry| entry.name == field.name) {
            Some(entry) => *entry = field,
            None => self.entries.push(field),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field<T>> {
        self.entries.iter().find(|field| field.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: 'static> Default for Fields<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> FromIterator<Field<T>> for Fields<T> {
    fn from_iter<I: IntoIterator<Item = Field<T>>>(iter: I) -> Self {
        iter.into_iter().fold(Fields::new(), Fields::with)
    }
}

impl<T> fmt::Debug for Fields<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

/// Working value of a field while it travels from lookup to commit.
pub enum FieldValue {
    /// Value as found in the JSON tree, or as reshaped by a transformer
    Json(Value),
    /// Native value produced by a transformer or by nested mapping
    Native(Box<dyn Any>),
    /// Objects produced by mapping a JSON array into a nested type
    List(Vec<Box<dyn Any>>),
}

impl FieldValue {
    pub fn native<V: Any>(value: V) -> Self {
        FieldValue::Native(Box::new(value))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Json(value) => kind_of(value),
            FieldValue::Native(_) => "native value",
            FieldValue::List(_) => "list of mapped objects",
        }
    }

    /// Deserialize a JSON value, or unwrap a native value of the same type
    pub fn into_json<V: DeserializeOwned + Any>(self) -> Result<V, FieldError> {
        match self {
            FieldValue::Json(value) => Ok(serde_json::from_value(value)?),
            other => other.into_native(),
        }
    }

    pub fn into_native<V: Any>(self) -> Result<V, FieldError> {
        match self {
            FieldValue::Native(boxed) => downcast(boxed),
            other => Err(FieldError::Type {
                expected: type_name::<V>(),
                found: other.kind(),
            }),
        }
    }

    pub fn into_list<V: Any>(self) -> Result<Vec<V>, FieldError> {
        match self {
            FieldValue::List(items) => items.into_iter().map(downcast).collect(),
            other => Err(FieldError::Type {
                expected: type_name::<Vec<V>>(),
                found: other.kind(),
            }),
        }
    }
}

fn downcast<V: Any>(boxed: Box<dyn Any>) -> Result<V, FieldError> {
    boxed
        .downcast::<V>()
        .map(|value| *value)
        .map_err(|_| FieldError::Type {
            expected: type_name::<V>(),
            found: "native value of another type",
        })
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Json(value) => f.debug_tuple("Json").field(value).finish(),
            FieldValue::Native(_) => f.write_str("Native(..)"),
            FieldValue::List(items) => write!(f, "List(len = {})", items.len()),
        }
    }
}

/// Identifier of a constructible [`Model`] type.
#[derive(Clone, Copy)]
pub struct TargetType {
    id: TypeId,
    name: &'static str,
    construct: Construct,
    populate: Populate,
}

impl TargetType {
    pub fn of<T: Model + Default>() -> Self {
        TargetType {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            construct: construct::<T>,
            populate: populate::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn construct(&self) -> Box<dyn Any> {
        (self.construct)()
    }

    pub(crate) fn populate(
        &self,
        mapper: &Mapper,
        json: &Map<String, Value>,
        object: &mut dyn Any,
    ) -> Result<(), MapError> {
        (self.populate)(mapper, json, object)
    }
}

impl PartialEq for TargetType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TargetType {}

impl fmt::Debug for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TargetType").field(&self.name).finish()
    }
}

fn construct<T: Default + 'static>() -> Box<dyn Any> {
    Box::new(T::default())
}

fn populate<T: Model>(
    mapper: &Mapper,
    json: &Map<String, Value>,
    object: &mut dyn Any,
) -> Result<(), MapError> {
    let object = object
        .downcast_mut::<T>()
        .ok_or(MapError::UnexpectedResult {
            expected: type_name::<T>(),
            found: "object of another type",
        })?;
    mapper.populate(json, object)
}

/// Existing object a JSON object is mapped into.
pub struct Instance<'a> {
    pub(crate) object: &'a mut dyn Any,
    pub(crate) populate: Populate,
    name: &'static str,
}

impl fmt::Debug for Instance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Instance").field(&self.name).finish()
    }
}

/// What a transform produces: a fresh object of a type, or an existing one.
#[derive(Debug)]
pub enum Target<'a> {
    Type(TargetType),
    Instance(Instance<'a>),
}

impl<'a> Target<'a> {
    pub fn of<T: Model + Default>() -> Self {
        Target::Type(TargetType::of::<T>())
    }

    pub fn instance<T: Model>(object: &'a mut T) -> Self {
        Target::Instance(Instance {
            object,
            populate: populate::<T>,
            name: type_name::<T>(),
        })
    }
}

impl From<TargetType> for Target<'_> {
    fn from(target_type: TargetType) -> Self {
        Target::Type(target_type)
    }
}

/// Result of a transform.
pub enum Mapped<'a> {
    /// Freshly constructed object
    Object(Box<dyn Any>),
    /// The existing object passed as target
    Instance(&'a mut dyn Any),
    /// Freshly constructed objects, in input order
    List(Vec<Box<dyn Any>>),
}

impl<'a> Mapped<'a> {
    pub fn kind(&self) -> &'static str {
        match self {
            Mapped::Object(_) => "object",
            Mapped::Instance(_) => "existing object",
            Mapped::List(_) => "list",
        }
    }

    pub fn into_object<T: Any>(self) -> Result<T, MapError> {
        match self {
            Mapped::Object(object) => downcast_object(object),
            other => Err(MapError::UnexpectedResult {
                expected: "a single object",
                found: other.kind(),
            }),
        }
    }

    pub fn into_objects<T: Any>(self) -> Result<Vec<T>, MapError> {
        match self {
            Mapped::List(objects) => objects.into_iter().map(downcast_object).collect(),
            other => Err(MapError::UnexpectedResult {
                expected: "a list of objects",
                found: other.kind(),
            }),
        }
    }

    pub fn into_instance<T: Any>(self) -> Result<&'a mut T, MapError> {
        match self {
            Mapped::Instance(object) => {
                object
                    .downcast_mut::<T>()
                    .ok_or(MapError::UnexpectedResult {
                        expected: type_name::<T>(),
                        found: "object of another type",
                    })
            }
            other => Err(MapError::UnexpectedResult {
                expected: "an existing object",
                found: other.kind(),
            }),
        }
    }
}

fn downcast_object<T: Any>(object: Box<dyn Any>) -> Result<T, MapError> {
    object
        .downcast::<T>()
        .map(|object| *object)
        .map_err(|_| MapError::UnexpectedResult {
            expected: type_name::<T>(),
            found: "object of another type",
        })
}

impl fmt::Debug for Mapped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mapped::Object(_) => f.write_str("Object(..)"),
            Mapped::Instance(_) => f.write_str("Instance(..)"),
            Mapped::List(objects) => write!(f, "List(len = {})", objects.len()),
        }
    }
}

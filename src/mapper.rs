use crate::error::{FieldError, MapError};
use crate::mapping;
use crate::model::{FieldValue, Fields, Instance, Mapped, Model, Target, TargetType};
use crate::parsing::{self, kind_of, path::SourcePath};
use serde_json::{Map, Value};
use std::any::{Any, type_name};
use tracing::{debug, trace, warn};

/// Second lookup attempted when a source path is not found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameFallback {
    /// Retry once with the path converted to snake_case
    #[default]
    SnakeCase,
    /// Only the declared path is looked up
    Disabled,
}

/// Maps JSON objects and arrays of objects onto [`Model`] types.
///
/// The mapper only carries configuration; every call resolves mappings from
/// scratch and nothing is kept between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mapper {
    fallback: NameFallback,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(mut self, fallback: NameFallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> NameFallback {
        self.fallback
    }

    /// Transforms a JSON object or array of objects into `target`
    pub fn transform<'a>(&self, json: &Value, target: Target<'a>) -> Result<Mapped<'a>, MapError> {
        self.dispatch(json, target, None)
    }

    /// Like [`Mapper::transform`], calling `callback` on every top-level
    /// object once all of its fields are set
    pub fn transform_with<'a>(
        &self,
        json: &Value,
        target: Target<'a>,
        callback: &mut dyn FnMut(&mut dyn Any),
    ) -> Result<Mapped<'a>, MapError> {
        self.dispatch(json, target, Some(callback))
    }

    /// Maps a JSON object into a new `T`
    pub fn map_object<T: Model + Default>(&self, json: &Value) -> Result<T, MapError> {
        self.map_object_with(json, |_: &mut T| {})
    }

    pub fn map_object_with<T, F>(&self, json: &Value, mut callback: F) -> Result<T, MapError>
    where
        T: Model + Default,
        F: FnMut(&mut T),
    {
        if json.is_array() {
            return Err(MapError::UnexpectedResult {
                expected: "a JSON object",
                found: "array",
            });
        }
        let mut erased = typed_callback(&mut callback);
        self.transform_with(json, Target::of::<T>(), &mut erased)?
            .into_object()
    }

    /// Maps a JSON array of objects into a list of new `T`
    pub fn map_objects<T: Model + Default>(&self, json: &Value) -> Result<Vec<T>, MapError> {
        self.map_objects_with(json, |_: &mut T| {})
    }

    pub fn map_objects_with<T, F>(&self, json: &Value, mut callback: F) -> Result<Vec<T>, MapError>
    where
        T: Model + Default,
        F: FnMut(&mut T),
    {
        if json.is_object() {
            return Err(MapError::UnexpectedResult {
                expected: "a JSON array",
                found: "object",
            });
        }
        let mut erased = typed_callback(&mut callback);
        self.transform_with(json, Target::of::<T>(), &mut erased)?
            .into_objects()
    }

    /// Maps a JSON object into an existing `T`, returning the same reference
    pub fn map_into<'a, T: Model>(
        &self,
        json: &Value,
        object: &'a mut T,
    ) -> Result<&'a mut T, MapError> {
        self.map_into_with(json, object, |_: &mut T| {})
    }

    pub fn map_into_with<'a, T, F>(
        &self,
        json: &Value,
        object: &'a mut T,
        mut callback: F,
    ) -> Result<&'a mut T, MapError>
    where
        T: Model,
        F: FnMut(&mut T),
    {
        let mut erased = typed_callback(&mut callback);
        self.transform_with(json, Target::instance(object), &mut erased)?
            .into_instance()
    }

    fn dispatch<'a>(
        &self,
        json: &Value,
        target: Target<'a>,
        callback: Option<&mut dyn FnMut(&mut dyn Any)>,
    ) -> Result<Mapped<'a>, MapError> {
        match json {
            Value::Array(items) if items.is_empty() => Ok(Mapped::List(Vec::new())),
            Value::Array(items) => match target {
                Target::Type(target_type) => self
                    .transform_array(items, target_type, callback)
                    .map(Mapped::List),
                Target::Instance(_) => Err(MapError::InvalidTarget),
            },
            Value::Object(object) => match target {
                Target::Type(target_type) => {
                    let mut instance = self.transform_object(object, target_type)?;
                    if let Some(callback) = callback {
                        callback(&mut *instance);
                    }
                    Ok(Mapped::Object(instance))
                }
                Target::Instance(Instance {
                    object: instance,
                    populate,
                    ..
                }) => {
                    trace!("transforming object into existing instance");
                    populate(self, object, &mut *instance)?;
                    if let Some(callback) = callback {
                        callback(&mut *instance);
                    }
                    Ok(Mapped::Instance(instance))
                }
            },
            other => Err(MapError::InvalidInput {
                found: kind_of(other),
            }),
        }
    }

    fn transform_array(
        &self,
        items: &[Value],
        target_type: TargetType,
        mut callback: Option<&mut dyn FnMut(&mut dyn Any)>,
    ) -> Result<Vec<Box<dyn Any>>, MapError> {
        trace!(
            target_type = target_type.name(),
            len = items.len(),
            "transforming array"
        );

        if let Some(item) = items.iter().find(|item| !item.is_object()) {
            return Err(MapError::InvalidInput {
                found: kind_of(item),
            });
        }

        let mut objects = Vec::with_capacity(items.len());
        for object in items.iter().filter_map(Value::as_object) {
            let mut instance = self.transform_object(object, target_type)?;
            if let Some(callback) = callback.as_deref_mut() {
                callback(&mut *instance);
            }
            objects.push(instance);
        }

        Ok(objects)
    }

    fn transform_object(
        &self,
        json: &Map<String, Value>,
        target_type: TargetType,
    ) -> Result<Box<dyn Any>, MapError> {
        trace!(target_type = target_type.name(), "transforming object");

        let mut instance = target_type.construct();
        target_type.populate(self, json, &mut *instance)?;
        Ok(instance)
    }

    /// Materializes every mapped field of `target` from `json`
    pub(crate) fn populate<T: Model>(
        &self,
        json: &Map<String, Value>,
        target: &mut T,
    ) -> Result<(), MapError> {
        let fields = T::fields();
        let mapping = mapping::resolve(&fields);
        trace!(
            target_type = type_name::<T>(),
            fields = mapping.len(),
            "resolved field mapping"
        );

        for (destination, source) in mapping.iter() {
            self.materialize(json, source, target, destination, &fields)?;
        }

        Ok(())
    }

    fn materialize<T: Model>(
        &self,
        json: &Map<String, Value>,
        source: &SourcePath,
        target: &mut T,
        destination: &str,
        fields: &Fields<T>,
    ) -> Result<(), MapError> {
        let Some(raw) = self.find(json, source) else {
            debug!(
                field = destination,
                source = %source,
                "no value found for field, skipping"
            );
            return Ok(());
        };

        let field = fields
            .get(destination)
            .ok_or_else(|| MapError::UnknownField {
                type_name: type_name::<T>(),
                field: destination.to_string(),
            })?;

        let mut value = match T::transformer(destination) {
            Some(transformer) => transformer(raw.clone()).map_err(MapError::Callback)?,
            None => FieldValue::Json(raw.clone()),
        };

        if let Some(nested_type) = T::nested_type(destination) {
            value = self.transform_nested(value, nested_type)?;
        }

        match field.commit(target, value) {
            Ok(()) => {}
            // The field declaration cannot hold this kind of value at all
            Err(error @ FieldError::Type { .. }) => warn!(
                target_type = type_name::<T>(),
                field = destination,
                %error,
                "field cannot take the mapped value, skipping"
            ),
            Err(error) => debug!(
                field = destination,
                %error,
                "value does not fit field, skipping"
            ),
        }

        Ok(())
    }

    fn find<'j>(&self, json: &'j Map<String, Value>, source: &SourcePath) -> Option<&'j Value> {
        if let Some(value) = parsing::lookup(json, source) {
            return Some(value);
        }

        match self.fallback {
            NameFallback::SnakeCase => {
                let converted = source.to_snake_case();
                if converted == *source {
                    return None;
                }
                trace!(source = %source, fallback = %converted, "retrying lookup");
                parsing::lookup(json, &converted)
            }
            NameFallback::Disabled => None,
        }
    }

    fn transform_nested(
        &self,
        value: FieldValue,
        nested_type: TargetType,
    ) -> Result<FieldValue, MapError> {
        match value {
            FieldValue::Json(json) => match self.dispatch(&json, Target::Type(nested_type), None)? {
                Mapped::Object(object) => Ok(FieldValue::Native(object)),
                Mapped::List(objects) => Ok(FieldValue::List(objects)),
                other => Err(MapError::UnexpectedResult {
                    expected: "a new object or list of objects",
                    found: other.kind(),
                }),
            },
            other => Err(MapError::InvalidInput {
                found: other.kind(),
            }),
        }
    }
}

fn typed_callback<T: Any>(callback: &mut impl FnMut(&mut T)) -> impl FnMut(&mut dyn Any) + '_ {
    move |object: &mut dyn Any| {
        if let Some(object) = object.downcast_mut::<T>() {
            callback(object);
        }
    }
}

//! Declarative mapping of parsed JSON onto typed objects.
//!
//! A type opts in by implementing [`Model`]: it lists its writable fields and
//! may override where a field is read from, transform the raw value, or name
//! a nested [`Model`] the value is recursively mapped into.
//!
//! ```
//! use json_mapper::{Field, Fields, Model, PropertyMapping};
//! use serde_json::json;
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     username: String,
//!     profile_url: String,
//! }
//!
//! impl Model for User {
//!     fn fields() -> Fields<Self> {
//!         Fields::new()
//!             .with(Field::json("username", |user: &mut User, value: String| user.username = value))
//!             .with(Field::json("profileUrl", |user: &mut User, value: String| user.profile_url = value))
//!     }
//!
//!     fn property_mapping() -> Option<PropertyMapping> {
//!         Some(PropertyMapping::new().map("profileUrl", "_links.profile.href"))
//!     }
//! }
//!
//! let input = json!({
//!     "username": "alice",
//!     "_links": { "profile": { "href": "http://x/alice" } }
//! });
//!
//! let user: User = json_mapper::map_object(&input).unwrap();
//! assert_eq!(user.username, "alice");
//! assert_eq!(user.profile_url, "http://x/alice");
//! ```

mod error;
mod mapper;
mod mapping;
mod model;
pub(crate) mod parsing;

pub use error::{BoxError, FieldError, MapError};
pub use mapper::{Mapper, NameFallback};
pub use mapping::PropertyMapping;
pub use model::{
    Access, Field, FieldValue, Fields, Instance, Mapped, Model, Target, TargetType, Transformer,
};

use serde_json::Value;
use std::any::Any;

/// Transforms a JSON object or array of objects into `target`
pub fn transform<'a>(json: &Value, target: Target<'a>) -> Result<Mapped<'a>, MapError> {
    Mapper::default().transform(json, target)
}

/// Transforms JSON into `target`, calling `callback` on each top-level object
pub fn transform_with<'a>(
    json: &Value,
    target: Target<'a>,
    callback: &mut dyn FnMut(&mut dyn Any),
) -> Result<Mapped<'a>, MapError> {
    Mapper::default().transform_with(json, target, callback)
}

/// Maps a JSON object into a new `T`
pub fn map_object<T: Model + Default>(json: &Value) -> Result<T, MapError> {
    Mapper::default().map_object(json)
}

/// Maps a JSON array of objects into a list of new `T`
pub fn map_objects<T: Model + Default>(json: &Value) -> Result<Vec<T>, MapError> {
    Mapper::default().map_objects(json)
}

/// Maps a JSON object into an existing `T`
pub fn map_into<'a, T: Model>(json: &Value, object: &'a mut T) -> Result<&'a mut T, MapError> {
    Mapper::default().map_into(json, object)
}

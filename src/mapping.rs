use crate::model::{Fields, Model};
use crate::parsing::path::SourcePath;

/// Explicit destination to source overrides declared by a [`Model`].
///
/// A destination mapped to `None` or to an empty path is suppressed: it is
/// left out of the mapping even if the default mapping would include it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMapping {
    entries: Vec<(String, Option<String>)>,
}

impl PropertyMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `destination` from the dotted `source` path
    pub fn map(mut self, destination: &str, source: &str) -> Self {
        self.insert(destination, Some(source));
        self
    }

    /// Never populate `destination`
    pub fn suppress(mut self, destination: &str) -> Self {
        self.insert(destination, None);
        self
    }

    pub fn insert(&mut self, destination: &str, source: Option<&str>) {
        let source = source.map(str::to_string);
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing == destination)
        {
            Some(entry) => entry.1 = source,
            None => self.entries.push((destination.to_string(), source)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(destination, source)| (destination.as_str(), source.as_deref()))
    }
}

impl<'a> FromIterator<(&'a str, Option<&'a str>)> for PropertyMapping {
    fn from_iter<I: IntoIterator<Item = (&'a str, Option<&'a str>)>>(iter: I) -> Self {
        let mut mapping = PropertyMapping::new();
        for (destination, source) in iter {
            mapping.insert(destination, source);
        }
        mapping
    }
}

/// Resolved destination to source mapping of one target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldMapping {
    entries: Vec<(String, SourcePath)>,
}

impl FieldMapping {
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &SourcePath)> {
        self.entries
            .iter()
            .map(|(destination, source)| (destination.as_str(), source))
    }

    #[cfg(test)]
    pub(crate) fn get(&self, destination: &str) -> Option<&SourcePath> {
        self.iter()
            .find(|(existing, _)| *existing == destination)
            .map(|(_, source)| source)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Builds the mapping of `T`: identity for every committable field, then the
/// type's property mapping on top, then suppressed entries removed.
pub(crate) fn resolve<T: Model>(fields: &Fields<T>) -> FieldMapping {
    let mut merged: Vec<(String, Option<String>)> = fields
        .iter()
        .filter(|field| field.access().is_committable())
        .map(|field| (field.name().to_string(), Some(field.name().to_string())))
        .collect();

    if let Some(overrides) = T::property_mapping() {
        for (destination, source) in overrides.iter() {
            let source = source.map(str::to_string);
            match merged
                .iter_mut()
                .find(|(existing, _)| existing == destination)
            {
                Some(entry) => entry.1 = source,
                None => merged.push((destination.to_string(), source)),
            }
        }
    }

    let entries = merged
        .into_iter()
        .filter_map(|(destination, source)| match source {
            Some(source) if !source.is_empty() => Some((destination, SourcePath::new(&source))),
            _ => None,
        })
        .collect();

    FieldMapping { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    #[derive(Default)]
    #[allow(dead_code)]
    struct Plain {
        username: String,
        email: String,
    }

    impl Model for Plain {
        fn fields() -> Fields<Self> {
            Fields::new()
                .with(Field::json("username", |plain: &mut Plain, value: String| {
                    plain.username = value
                }))
                .with(Field::json("email", |plain: &mut Plain, value: String| {
                    plain.email = value
                }))
        }
    }

    #[derive(Default)]
    #[allow(dead_code)]
    struct Customized {
        username: String,
        profile_url: String,
        friends: Vec<String>,
        secret: String,
        token: String,
    }

    impl Model for Customized {
        fn fields() -> Fields<Self> {
            Fields::new()
                .with(Field::json("username", |target: &mut Customized, value: String| {
                    target.username = value
                }))
                .with(Field::json("profileUrl", |target: &mut Customized, value: String| {
                    target.profile_url = value
                }))
                .with(
                    Field::json("friends", |target: &mut Customized, value: Vec<String>| {
                        target.friends = value
                    })
                    .mutator(),
                )
                .with(
                    Field::json("secret", |target: &mut Customized, value: String| {
                        target.secret = value
                    })
                    .private(),
                )
                .with(
                    Field::json("token", |target: &mut Customized, value: String| {
                        target.token = value
                    })
                    .private(),
                )
        }

        fn property_mapping() -> Option<PropertyMapping> {
            Some(
                PropertyMapping::new()
                    .map("profileUrl", "_links.profile.href")
                    .suppress("friends")
                    .map("username", "")
                    .map("token", "auth.token"),
            )
        }
    }

    fn entries(mapping: &FieldMapping) -> Vec<(String, String)> {
        mapping
            .iter()
            .map(|(destination, source)| (destination.to_string(), source.as_str().to_string()))
            .collect()
    }

    #[test]
    fn test_default_mapping_is_identity() {
        let mapping = resolve(&Plain::fields());

        assert_eq!(
            entries(&mapping),
            vec![
                ("username".to_string(), "username".to_string()),
                ("email".to_string(), "email".to_string()),
            ]
        );
    }

    #[test]
    fn test_override_mapping_wins_and_suppresses() {
        let mapping = resolve(&Customized::fields());

        assert_eq!(
            entries(&mapping),
            vec![
                (
                    "profileUrl".to_string(),
                    "_links.profile.href".to_string()
                ),
                ("token".to_string(), "auth.token".to_string()),
            ]
        );
        // Suppressed with `None` and with an empty path
        assert!(mapping.get("friends").is_none());
        assert!(mapping.get("username").is_none());
        // Private fields stay out unless a property mapping names them
        assert!(mapping.get("secret").is_none());
        assert_eq!(
            mapping.get("token").map(SourcePath::as_str),
            Some("auth.token")
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let first = resolve(&Customized::fields());
        let second = resolve(&Customized::fields());

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_property_mapping_last_insert_wins() {
        let mapping = PropertyMapping::new()
            .map("profileUrl", "links.profile")
            .suppress("profileUrl")
            .map("profileUrl", "_links.profile.href");

        assert_eq!(
            mapping.iter().collect::<Vec<_>>(),
            vec![("profileUrl", Some("_links.profile.href"))]
        );
    }

    #[test]
    fn test_property_mapping_from_iterator() {
        let mapping: PropertyMapping = [("profileUrl", Some("_links.profile.href")), ("friends", None)]
            .into_iter()
            .collect();

        assert_eq!(
            mapping,
            PropertyMapping::new()
                .map("profileUrl", "_links.profile.href")
                .suppress("friends")
        );
    }
}

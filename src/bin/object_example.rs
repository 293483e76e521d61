use json_mapper::{Field, Fields, Model, PropertyMapping, TargetType, map_object};
use serde_json::json;

#[derive(Debug, Default)]
#[allow(dead_code)]
struct User {
    username: String,
    profile_url: String,
    profile: Option<Profile>,
}

#[derive(Debug, Default)]
#[allow(dead_code)]
struct Profile {
    bio: String,
    age: u32,
}

impl Model for User {
    fn fields() -> Fields<Self> {
        Fields::new()
            .with(Field::json("username", |user: &mut User, value: String| {
                user.username = value
            }))
            .with(Field::json("profileUrl", |user: &mut User, value: String| {
                user.profile_url = value
            }))
            .with(Field::native("profile", |user: &mut User, value: Profile| {
                user.profile = Some(value)
            }))
    }

    fn property_mapping() -> Option<PropertyMapping> {
        Some(PropertyMapping::new().map("profileUrl", "_links.profile.href"))
    }

    fn nested_type(field: &str) -> Option<TargetType> {
        match field {
            "profile" => Some(TargetType::of::<Profile>()),
            _ => None,
        }
    }
}

impl Model for Profile {
    fn fields() -> Fields<Self> {
        Fields::new()
            .with(Field::json("bio", |profile: &mut Profile, value: String| {
                profile.bio = value
            }))
            .with(Field::json("age", |profile: &mut Profile, value: u32| {
                profile.age = value
            }))
    }
}

fn main() {
    let input = json!({
        "username": "alice",
        "_links": {
            "profile": { "href": "http://example.org/users/alice/profile" }
        },
        "profile": {
            "bio": "Software Engineer",
            "age": 30
        }
    });

    let user: User = map_object(&input).expect("Failed to map JSON");

    println!("{}", input);
    println!("{:?}", user);
    println!("{}", user.username);
}

use json_mapper::{Field, Fields, Mapper, Model};
use serde_json::json;

#[derive(Debug, Default)]
#[allow(dead_code)]
struct User {
    username: String,
    display_name: String,
}

impl Model for User {
    fn fields() -> Fields<Self> {
        Fields::new()
            .with(Field::json("username", |user: &mut User, value: String| {
                user.username = value
            }))
            .with(Field::json("displayName", |user: &mut User, value: String| {
                user.display_name = value
            }))
    }
}

fn main() {
    let input = json!([
        { "username": "alice", "display_name": "Alice" },
        { "username": "bob", "display_name": "Bob" }
    ]);

    let users: Vec<User> = Mapper::new()
        .map_objects_with(&input, |user: &mut User| {
            user.username = format!("user_{}", user.username)
        })
        .expect("Failed to map JSON");

    println!("{}", input);
    println!("{:?}", users);
}

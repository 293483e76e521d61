use json_mapper::{Field, Fields, Model, PropertyMapping, map_into};
use serde_json::json;

#[derive(Debug)]
#[allow(dead_code)]
struct Settings {
    theme: String,
    language: String,
    api_token: String,
}

impl Model for Settings {
    fn fields() -> Fields<Self> {
        Fields::new()
            .with(Field::json("theme", |settings: &mut Settings, value: String| {
                settings.theme = value
            }))
            .with(Field::json("language", |settings: &mut Settings, value: String| {
                settings.language = value
            }))
            .with(
                Field::json("apiToken", |settings: &mut Settings, value: String| {
                    settings.api_token = value
                })
                .mutator(),
            )
    }

    fn property_mapping() -> Option<PropertyMapping> {
        Some(PropertyMapping::new().suppress("apiToken"))
    }
}

fn main() {
    let mut settings = Settings {
        theme: "light".to_string(),
        language: "en".to_string(),
        api_token: "secret".to_string(),
    };

    let input = json!({
        "theme": "dark",
        "api_token": "ignored"
    });

    map_into(&input, &mut settings).expect("Failed to map JSON");

    println!("{}", input);
    println!("{:?}", settings);
}

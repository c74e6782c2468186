//! JSON Schema for the configuration file.

use crate::config::Settings;

/// Schema identifier embedded as `$id`.
pub const SCHEMA_ID: &str =
    "https://raw.githubusercontent.com/lordofscripts/carousel/main/carousel.schema.json";

/// Generates the JSON Schema describing [`Settings`].
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(Settings);

    if let Some(obj) = schema.as_object_mut() {
        obj.insert("$id".to_string(), serde_json::json!(SCHEMA_ID));
        obj.insert("title".to_string(), serde_json::json!("Carousel configuration"));
    }

    schema
}

/// Pretty-printed JSON form of [`generate_schema`].
#[must_use]
pub fn generate_schema_json() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}

//! Helpers for turning Rust type information into JSON Schema, produced with
//! [`schemars`]. The umbrella crate uses this to publish the shape of the
//! generate endpoint's request body.

use schemars::{JsonSchema, SchemaGenerator, r#gen::SchemaSettings};
use serde_json::{self, Value};

use crate::error::Result;

/// Generate a JSON Schema for the given `T` **inline**, i.e. without `$ref`
/// pointers to external definitions.
///
/// # Example
///
/// ```
/// use playground_core::schema_util::derive_schema;
/// use schemars::JsonSchema;
///
/// #[derive(JsonSchema)]
/// struct Foo { bar: String }
///
/// let schema = derive_schema::<Foo>().unwrap();
/// assert_eq!(schema["type"], "object");
/// ```
pub fn derive_schema<T>() -> Result<Value>
where
    T: JsonSchema + 'static,
{
    let mut settings = SchemaSettings::draft07();
    settings.inline_subschemas = true;

    let generator = SchemaGenerator::new(settings);
    let root = generator.into_root_schema_for::<T>();

    Ok(serde_json::to_value(root)?)
}

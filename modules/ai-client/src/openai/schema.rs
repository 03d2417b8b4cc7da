use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// Trait for types that can be requested as schema-constrained JSON output.
///
/// Automatically implemented for any type that implements
/// `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Render this type's schema in the shape OpenAI strict mode expects:
    /// fully inlined (no `$ref`), `additionalProperties: false` on every
    /// object, and all properties listed in `required`.
    fn response_schema() -> serde_json::Value {
        let generator = SchemaSettings::draft07()
            .with(|settings| {
                settings.inline_subschemas = true;
                settings.meta_schema = None;
            })
            .into_generator();
        let schema = generator.into_root_schema_for::<Self>();

        let mut value = serde_json::to_value(schema).unwrap_or_default();
        tighten_objects(&mut value);
        value
    }

    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Strict mode rejects open objects and optional properties: force
/// `additionalProperties: false` and a full `required` list, recursively.
fn tighten_objects(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            if map.get("type") == Some(&serde_json::Value::String("object".to_string())) {
                map.insert(
                    "additionalProperties".to_string(),
                    serde_json::Value::Bool(false),
                );
                if let Some(serde_json::Value::Object(props)) = map.get("properties") {
                    let all_keys: Vec<serde_json::Value> = props
                        .keys()
                        .map(|k| serde_json::Value::String(k.clone()))
                        .collect();
                    map.insert("required".to_string(), serde_json::Value::Array(all_keys));
                }
            }
            for (_, v) in map.iter_mut() {
                tighten_objects(v);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items.iter_mut() {
                tighten_objects(item);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, JsonSchema)]
    struct Sample {
        #[allow(dead_code)]
        name: String,
        #[allow(dead_code)]
        score: Option<f64>,
    }

    #[test]
    fn test_schema_is_strict() {
        let schema = Sample::response_schema();

        assert_eq!(schema["additionalProperties"], serde_json::json!(false));

        let required = schema["required"].as_array().expect("required array");
        assert!(required.contains(&serde_json::json!("name")));
        assert!(required.contains(&serde_json::json!("score")));
    }

    #[test]
    fn test_schema_has_no_meta_schema() {
        let schema = Sample::response_schema();
        assert!(schema.get("$schema").is_none());
    }
}

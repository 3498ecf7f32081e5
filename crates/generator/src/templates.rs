//! Template loading and management

use crd2schema_common::{GeneratorError, Result, TypeDescriptor};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("type_label", type_label_filter);

    tera.add_raw_template("README.md", include_str!("../templates/README.md.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load README.md template: {}", e))
        })?;

    Ok(tera)
}

/// Filter to render a serialized property or type spec as a short label
fn type_label_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let descriptor: TypeDescriptor = serde_json::from_value(value.clone())
        .map_err(|e| tera::Error::msg(format!("type_label filter expects a type spec: {}", e)))?;

    Ok(Value::String(descriptor.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_label_of_property() {
        let label = type_label_filter(
            &json!({ "type": "array", "items": { "type": "string" }, "description": "names" }),
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(label, json!("string[]"));
    }

    #[test]
    fn test_type_label_rejects_non_types() {
        assert!(type_label_filter(&json!("nope"), &HashMap::new()).is_err());
    }

    #[test]
    fn test_templates_load() {
        let tera = load_templates().unwrap();
        assert!(tera.get_template_names().any(|name| name == "README.md"));
    }
}

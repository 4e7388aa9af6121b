//! Structural shape matching for `json` body assertions
//!
//! A schema is plain JSON. String nodes name a type (`string`, `number`,
//! `integer`, `boolean`, `array`, `object`, `null`, `any`); any other string
//! is an exact literal. Object schemas require their keys and allow extras.
//! A one-element array schema applies to every element; longer array schemas
//! match positionally and require equal length. Scalar schemas compare for
//! equality.

use serde_json::Value;

/// Checks a value against a schema, reporting the first mismatch with its
/// JSON path, e.g. `$.users[2].id: expected number, got string`.
///
/// # Errors
///
/// Returns the mismatch detail.
pub fn check(schema: &Value, value: &Value) -> Result<(), String> {
    check_at(schema, value, "$")
}

fn check_at(schema: &Value, value: &Value, path: &str) -> Result<(), String> {
    match schema {
        Value::String(name) => check_string_schema(name, value, path),
        Value::Object(fields) => {
            let Value::Object(object) = value else {
                return Err(format!("{path}: expected object, got {}", kind(value)));
            };
            for (key, field_schema) in fields {
                let child_path = format!("{path}.{key}");
                let Some(child) = object.get(key) else {
                    return Err(format!("{child_path}: missing"));
                };
                check_at(field_schema, child, &child_path)?;
            }
            Ok(())
        }
        Value::Array(items) => {
            let Value::Array(elements) = value else {
                return Err(format!("{path}: expected array, got {}", kind(value)));
            };
            if items.len() == 1 {
                for (index, element) in elements.iter().enumerate() {
                    check_at(&items[0], element, &format!("{path}[{index}]"))?;
                }
                return Ok(());
            }
            if items.len() != elements.len() {
                return Err(format!(
                    "{path}: expected {} elements, got {}",
                    items.len(),
                    elements.len()
                ));
            }
            for (index, (item_schema, element)) in items.iter().zip(elements).enumerate() {
                check_at(item_schema, element, &format!("{path}[{index}]"))?;
            }
            Ok(())
        }
        literal => {
            if value == literal {
                Ok(())
            } else {
                Err(format!("{path}: expected {literal}, got {value}"))
            }
        }
    }
}

fn check_string_schema(name: &str, value: &Value, path: &str) -> Result<(), String> {
    let matches = match name {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        "any" => true,
        literal => {
            return if value.as_str() == Some(literal) {
                Ok(())
            } else {
                Err(format!("{path}: expected \"{literal}\", got {value}"))
            };
        }
    };
    if matches {
        Ok(())
    } else {
        Err(format!("{path}: expected {name}, got {}", kind(value)))
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
